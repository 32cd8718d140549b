//! Signal Map Library
//!
//! Turns geotagged signal-strength measurements (CSV) into a standalone
//! Leaflet map with one colored circle per measurement and a color-ramp legend.
//!
//! Module organization:
//! - `coverage`: loading, color scale and map composition
//! - `leaflet`: HTML artifact rendering and writing
//! - `config` / `cli`: run configuration
//! - `pipeline`: the end-to-end run

pub mod cli;
pub mod config;
pub mod coverage;
pub mod leaflet;
pub mod pipeline;
