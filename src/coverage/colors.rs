//! Color handling and the continuous value→color scale
//!
//! This module provides:
//! - `Color`: an sRGB triple that renders as `#rrggbb`
//! - `ColorScale`: a piecewise-linear interpolator over N ≥ 2 palette anchors,
//!   fitted to the observed metric range
//!
//! Values outside the fitted domain clamp to the boundary anchors; the scale
//! never produces a color outside the palette's range.

use super::error::{CoverageError, DataError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An 8-bit sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Blend `self` towards `other` by `frac` ∈ [0, 1], rounding each channel
    pub fn lerp(self, other: Color, frac: f64) -> Color {
        let mix = |a: u8, b: u8| (a as f64 * (1.0 - frac) + b as f64 * frac).round() as u8;
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Parse a hex color string
///
/// Supports formats:
/// - `#RRGGBB` (6 hex digits)
/// - `#RRGGBBAA` (8 hex digits, alpha ignored)
/// - `RRGGBB` / `RRGGBBAA` (without #)
impl FromStr for Color {
    type Err = CoverageError;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');

        if (hex.len() != 6 && hex.len() != 8) || !hex.is_ascii() {
            return Err(CoverageError::Palette(format!("invalid hex color '{}'", s)));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| CoverageError::Palette(format!("invalid hex color '{}'", s)))
        };

        Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse a list of hex strings into palette anchors
pub fn parse_colors<S: AsRef<str>>(hexes: &[S]) -> Result<Vec<Color>> {
    hexes.iter().map(|h| h.as_ref().parse()).collect()
}

/// Closed metric range a scale was fitted to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    /// `n` evenly spaced values from min to max inclusive (one value if degenerate)
    pub fn ticks(&self, n: usize) -> Vec<f64> {
        if self.is_degenerate() || n < 2 {
            return vec![self.min];
        }
        let step = (self.max - self.min) / (n - 1) as f64;
        (0..n)
            .map(|i| {
                if i == n - 1 {
                    self.max
                } else {
                    self.min + step * i as f64
                }
            })
            .collect()
    }
}

/// Continuous value→color mapping fitted to a metric range
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    domain: Domain,
    palette: Vec<Color>,
}

impl ColorScale {
    /// Fit a scale to `values` over `palette`
    ///
    /// # Errors
    /// - `EmptyDataset` if `values` is empty
    /// - `Palette` if fewer than two anchors are given
    /// - `Data` if any value is not finite
    pub fn build(values: &[f64], palette: &[Color]) -> Result<Self> {
        if values.is_empty() {
            return Err(CoverageError::EmptyDataset);
        }
        if palette.len() < 2 {
            return Err(CoverageError::Palette(format!(
                "a color scale needs at least 2 anchor colors, got {}",
                palette.len()
            )));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(DataError::NonFiniteValue(*bad).into());
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        tracing::debug!(min, max, anchors = palette.len(), "fitted color scale");

        Ok(ColorScale {
            domain: Domain { min, max },
            palette: palette.to_vec(),
        })
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    /// Normalized position of `value` within the domain, clamped to [0, 1]
    ///
    /// A degenerate domain puts every value at the midpoint.
    pub fn normalize(&self, value: f64) -> f64 {
        if self.domain.is_degenerate() {
            return 0.5;
        }
        let Domain { min, max } = self.domain;
        let t = if (max - min).is_finite() {
            (value - min) / (max - min)
        } else {
            // span overflows f64
            (value / 2.0 - min / 2.0) / (max / 2.0 - min / 2.0)
        };
        if t.is_nan() {
            return 0.5;
        }
        t.clamp(0.0, 1.0)
    }

    /// Fractional palette index of `value`, in [0, N-1]
    pub fn position(&self, value: f64) -> f64 {
        self.normalize(value) * (self.palette.len() - 1) as f64
    }

    /// Color for `value`
    pub fn color(&self, value: f64) -> Color {
        let pos = self.position(value);
        let last = self.palette.len() - 1;
        let idx_low = (pos.floor() as usize).min(last);
        let idx_high = (pos.ceil() as usize).min(last);
        let frac = pos - idx_low as f64;

        self.palette[idx_low].lerp(self.palette[idx_high], frac)
    }
}
