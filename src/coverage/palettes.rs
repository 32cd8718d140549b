//! Palette registry for loading and accessing named color palettes
//!
//! Loads palettes from palettes.json (embedded at compile time) and provides
//! case-insensitive access by name. The default ramp is the 11-step
//! red→yellow→green `RdYlGn`, so weak signal reads red and strong signal green.
//!
//! Palette types:
//! - `sequential`: Gradient from low to high values
//! - `diverging`: Gradient with a neutral midpoint

use super::colors::{parse_colors, Color};
use super::error::{CoverageError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Embedded palettes.json content
const PALETTES_JSON: &str = include_str!("../../palettes.json");

/// Default palette name
pub const DEFAULT_PALETTE: &str = "RdYlGn";

/// Palette type as defined in palettes.json
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteType {
    Sequential,
    Diverging,
}

/// A single palette definition from palettes.json
#[derive(Debug, Clone, Deserialize)]
pub struct PaletteDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub palette_type: PaletteType,
    pub colors: Vec<String>,
}

impl PaletteDefinition {
    /// Get all colors as parsed anchors
    pub fn anchors(&self) -> Result<Vec<Color>> {
        parse_colors(&self.colors)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Registry of all available palettes
#[derive(Debug, Clone, Default)]
pub struct PaletteRegistry {
    /// All palettes by name (lowercase keys for case-insensitive lookup)
    palettes: HashMap<String, PaletteDefinition>,
    /// Palette names in file order (for listing)
    names: Vec<String>,
}

impl PaletteRegistry {
    /// Load palettes from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let definitions: Vec<PaletteDefinition> = serde_json::from_str(json)
            .map_err(|e| CoverageError::Palette(format!("failed to parse palettes JSON: {}", e)))?;

        let mut registry = Self::default();
        for def in definitions {
            registry.names.push(def.name.clone());
            registry.palettes.insert(def.name.to_lowercase(), def);
        }

        tracing::debug!(count = registry.palettes.len(), "loaded palette registry");

        Ok(registry)
    }

    /// Get a palette by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&PaletteDefinition> {
        self.palettes.get(&name.to_lowercase())
    }

    /// Resolve a palette name to its anchors
    pub fn anchors(&self, name: &str) -> Result<Vec<Color>> {
        self.get(name)
            .ok_or_else(|| {
                CoverageError::Palette(format!(
                    "unknown palette '{}' (available: {})",
                    name,
                    self.names.join(", ")
                ))
            })?
            .anchors()
    }

    /// All palettes in file order
    pub fn definitions(&self) -> impl Iterator<Item = &PaletteDefinition> {
        self.names.iter().filter_map(move |name| self.get(name))
    }
}

/// Global registry instance (initialized lazily, read-only afterwards)
static REGISTRY: OnceLock<PaletteRegistry> = OnceLock::new();

/// Get the global palette registry
pub fn registry() -> &'static PaletteRegistry {
    REGISTRY.get_or_init(|| {
        PaletteRegistry::from_json(PALETTES_JSON).unwrap_or_else(|e| {
            tracing::error!(error = %e, "embedded palettes.json is invalid");
            PaletteRegistry::default()
        })
    })
}
