//! Hex color strings and their normalized channel values.

use serde::{Deserialize, Serialize};

use crate::error::ScriptError;

/// A color written as hex byte pairs, with channels normalized to `[0, 1)`.
///
/// Channels keep the order they were written in (`rrggbbaa`, `aarrggbb`,
/// whatever the script uses); nothing is reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HexColor {
    /// Hex digits as written, without a leading `#`.
    pub hex: String,
    /// One value per byte pair: `byte / 256.0`.
    pub channels: Vec<f64>,
}

impl HexColor {
    /// Parse a hex color. A leading `#` is accepted.
    pub fn parse(value: &str) -> Result<Self, ScriptError> {
        let hex = value.trim().trim_start_matches('#');
        let channels = hex_to_channels(hex)?;
        Ok(Self {
            hex: hex.to_string(),
            channels,
        })
    }

    /// Number of channels (3 for RGB, 4 for RGBA).
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}

/// Convert a hex string into one normalized value per byte pair.
///
/// Each pair is read base 16 and divided by 256, so `ff` maps to
/// `0.99609375` and `80` to exactly `0.5`.
pub fn hex_to_channels(hex: &str) -> Result<Vec<f64>, ScriptError> {
    let invalid = || ScriptError::InvalidColorHex {
        value: hex.to_string(),
        row: None,
    };

    if hex.is_empty() || hex.len() % 2 != 0 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map(|byte| f64::from(byte) / 256.0)
                .map_err(|_| invalid())
        })
        .collect()
}
