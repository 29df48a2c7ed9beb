//! URL bar configuration

use std::path::Path;

use serde::Deserialize;

use crate::error::UrlBarResult;

/// Physical display the URL bar is shown on
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct DisplayMetrics {
    pub width_px: u32,
    pub height_px: u32,
    /// Pixels per density-independent pixel
    pub density: f32,
}

impl DisplayMetrics {
    /// Largest screen dimension in density-independent pixels
    ///
    /// The larger dimension is used so rotating the device never makes a
    /// previous estimate too small.
    pub fn max_dimension_dp(&self) -> u32 {
        let density = if self.density > 0.0 { self.density } else { 1.0 };
        let px = self.width_px.max(self.height_px) as f32;
        (px / density).round() as u32
    }
}

impl Default for DisplayMetrics {
    fn default() -> Self {
        Self {
            width_px: 1080,
            height_px: 2400,
            density: 2.625,
        }
    }
}

/// URL bar configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UrlBarConfig {
    /// Text shorter than this is never truncated
    pub min_length_for_truncation: usize,
    /// Density-independent pixels assumed per character (5dp ~ 0.8mm)
    pub dp_per_char: u32,
    /// Longest text rendered without a middle ellipsis
    pub max_displayable_length: usize,
    /// Same limit on low-end devices
    pub max_displayable_length_low_end: usize,
    pub low_end_device: bool,
    pub display: DisplayMetrics,
    /// Only compute a visible hint when the origin matches the previous one
    pub no_visible_hint_for_different_tld: bool,
}

impl UrlBarConfig {
    /// Parse a configuration from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> UrlBarResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> UrlBarResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Display length limit for this device class
    pub fn max_displayable_length(&self) -> usize {
        if self.low_end_device {
            self.max_displayable_length_low_end
        } else {
            self.max_displayable_length
        }
    }
}

impl Default for UrlBarConfig {
    fn default() -> Self {
        Self {
            min_length_for_truncation: 100,
            dp_per_char: 5,
            max_displayable_length: 4000,
            max_displayable_length_low_end: 1000,
            low_end_device: false,
            display: DisplayMetrics::default(),
            no_visible_hint_for_different_tld: false,
        }
    }
}
