//! Leaflet HTML output
//!
//! - `writer.rs`: payload serialization, document rendering and atomic write
//! - `template.rs`: static document chrome

pub mod template;
pub mod writer;

pub use writer::{extract_payload, render, write, MapPayload};
