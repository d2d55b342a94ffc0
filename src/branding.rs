//! Branding Snapshot + Color Resolution
//!
//! The snapshot is a point-in-time copy of the subscriber's branding, stored
//! with each generated asset so later profile edits do not rewrite history.

use image::Rgba;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PRIMARY: &str = "#000000";
pub const DEFAULT_SECONDARY: &str = "#666666";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandingSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_primary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_secondary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
}

/// Map a symbolic color reference to a concrete value. Exactly two symbolic
/// cases; anything else passes through unchanged so layouts may carry literal
/// colors.
pub fn resolve_color(color_ref: &str, branding: &BrandingSnapshot) -> String {
    match color_ref {
        "brand_primary" => non_empty(&branding.color_primary)
            .unwrap_or(DEFAULT_PRIMARY)
            .to_string(),
        "brand_secondary" => non_empty(&branding.color_secondary)
            .unwrap_or(DEFAULT_SECONDARY)
            .to_string(),
        literal => literal.to_string(),
    }
}

pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Parse `#rgb`, `#rrggbb`, or `#rrggbbaa` into a pixel value.
pub fn parse_color(value: &str) -> Option<Rgba<u8>> {
    let hex = value.trim().strip_prefix('#')?;
    match hex.len() {
        3 => {
            let mut channels = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let nibble = c.to_digit(16)? as u8;
                channels[i] = nibble << 4 | nibble;
            }
            Some(Rgba([channels[0], channels[1], channels[2], 255]))
        }
        6 | 8 => {
            let mut channels = [0u8, 0, 0, 255];
            for (i, pair) in hex.as_bytes().chunks(2).enumerate() {
                let pair = std::str::from_utf8(pair).ok()?;
                channels[i] = u8::from_str_radix(pair, 16).ok()?;
            }
            Some(Rgba(channels))
        }
        _ => None,
    }
}
