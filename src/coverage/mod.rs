//! Coverage mapping core
//!
//! Turns signal-strength measurements into a colored map composition.
//!
//! Structure:
//! - `loader.rs`: CSV → validated `MeasurementSet`
//! - `colors.rs`: `Color` and the fitted `ColorScale`
//! - `palettes.rs`: named palette registry (embedded palettes.json)
//! - `composer.rs`: markers, legend and base view → `RenderedMap`
//! - `error.rs`: Error types

pub mod colors;
pub mod composer;
pub mod error;
pub mod loader;
pub mod palettes;

// Re-exports for convenience
pub use colors::{Color, ColorScale, Domain};
pub use composer::{
    compose, Bounds, CenterPolicy, ComposeOptions, Legend, Marker, RenderedMap, TileLayer,
};
pub use error::{CoverageError, DataError, Result};
pub use loader::{load, load_from_reader, ColumnMapping, Measurement, MeasurementSet};
pub use palettes::{registry, PaletteRegistry, DEFAULT_PALETTE};
