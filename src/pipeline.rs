//! Coverage map pipeline
//!
//! The pipeline:
//! 1. Loads and validates measurements from the CSV source
//! 2. Fits the color scale to the observed metric range
//! 3. Composes markers, popups and legend
//! 4. Writes the Leaflet document atomically
//!
//! Every stage fails fast; a failed run never leaves an artifact behind.

use crate::config::MapConfig;
use crate::coverage::{self, ColorScale, CoverageError, Domain, MeasurementSet, RenderedMap};
use crate::leaflet;
use std::fmt;
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;

/// Pipeline stage, for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Configure,
    Load,
    Scale,
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Configure => "configuration",
            Stage::Load => "loading measurements",
            Stage::Scale => "building color scale",
            Stage::Write => "writing map document",
        })
    }
}

/// A failed run: which stage failed and why
#[derive(Debug, Error)]
#[error("{stage} failed")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: CoverageError,
}

impl PipelineError {
    fn at(stage: Stage) -> impl FnOnce(CoverageError) -> PipelineError {
        move |source| PipelineError { stage, source }
    }
}

/// What a successful run produced
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub output: PathBuf,
    pub markers: usize,
    pub domain: Domain,
}

/// Fit the scale and compose the map for already-loaded measurements
pub fn build_map(
    measurements: &MeasurementSet,
    config: &MapConfig,
) -> Result<RenderedMap, PipelineError> {
    let palette = config
        .palette
        .resolve()
        .map_err(PipelineError::at(Stage::Scale))?;
    let scale = ColorScale::build(&measurements.metrics(), &palette)
        .map_err(PipelineError::at(Stage::Scale))?;

    let domain = scale.domain();
    tracing::info!(
        min = domain.min,
        max = domain.max,
        constant = domain.is_degenerate(),
        "color scale ready"
    );

    Ok(coverage::compose(
        measurements,
        &scale,
        &config.compose_options(),
    ))
}

/// Run the whole pipeline for `config`
pub fn run(config: &MapConfig) -> Result<RunSummary, PipelineError> {
    let t0 = Instant::now();

    let input = config
        .validate()
        .map_err(PipelineError::at(Stage::Configure))?;

    tracing::info!(input = %input.display(), "[1/3] loading measurements");
    let measurements =
        coverage::load(input, &config.columns()).map_err(PipelineError::at(Stage::Load))?;

    tracing::info!("[2/3] composing map");
    let map = build_map(&measurements, config)?;

    tracing::info!(output = %config.output_path.display(), "[3/3] writing map document");
    leaflet::write(&map, &config.output_path).map_err(PipelineError::at(Stage::Write))?;

    tracing::info!(elapsed_ms = t0.elapsed().as_millis() as u64, "run complete");

    Ok(RunSummary {
        output: config.output_path.clone(),
        markers: map.markers.len(),
        domain: map.legend.domain,
    })
}
