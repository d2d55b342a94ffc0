//! Layout System - Declarative Zone Contracts
//!
//! A layout is immutable per template; it is versioned only by replacing the
//! whole template row.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    #[serde(default = "default_canvas")]
    pub canvas_width: u32,
    #[serde(default = "default_canvas")]
    pub canvas_height: u32,
    #[serde(default)]
    pub zones: Zones,
}

fn default_canvas() -> u32 { 1080 }

impl LayoutConfig {
    pub fn new(canvas_width: u32, canvas_height: u32) -> Self {
        Self {
            canvas_width,
            canvas_height,
            zones: Zones::default(),
        }
    }
}

/// The closed zone vocabulary. Adding a kind is a compile-time extension,
/// not a string-keyed lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Zones {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<ImageZone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<ImageZone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<TextZone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<TextZone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_bar: Option<FillZone>,
}

/// Photo and logo zones. `shape` is honored for photo; `fit` falls back to
/// the kind's default when unset (photo: cover, logo: inside).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageZone {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub shape: ZoneShape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit: Option<ImageFit>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneShape {
    #[default]
    Rect,
    Circle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    /// Fill the box exactly, cropping overflow, aspect preserved.
    Cover,
    /// Fit entirely within the box, no cropping, aspect preserved.
    Inside,
}

/// Name and tagline zones. (x, y) is the text baseline origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextZone {
    pub x: u32,
    pub y: u32,
    #[serde(default = "default_color_ref")]
    pub color_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
}

/// Solid fill zones (`brand_bar`). Renders whenever declared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillZone {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_color_ref")]
    pub color_ref: String,
}

fn default_color_ref() -> String {
    "brand_primary".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_layout_json() {
        let json = r##"{
            "canvasWidth": 1080,
            "canvasHeight": 1350,
            "zones": {
                "photo": {"x": 40, "y": 40, "width": 200, "height": 300, "shape": "circle"},
                "logo": {"x": 800, "y": 40, "width": 240, "height": 120},
                "name": {"x": 40, "y": 1000, "colorRef": "brand_primary", "fontSize": 28},
                "tagline": {"x": 40, "y": 1040, "colorRef": "#ffffff"},
                "brand_bar": {"x": 0, "y": 1300, "width": 1080, "height": 50, "colorRef": "brand_secondary"}
            }
        }"##;

        let layout: LayoutConfig = serde_json::from_str(json).unwrap();
        assert_eq!(layout.canvas_width, 1080);
        assert_eq!(layout.canvas_height, 1350);

        let photo = layout.zones.photo.unwrap();
        assert_eq!(photo.shape, ZoneShape::Circle);
        assert_eq!(photo.fit, None);

        let name = layout.zones.name.unwrap();
        assert_eq!(name.font_size, Some(28.0));

        let tagline = layout.zones.tagline.unwrap();
        assert_eq!(tagline.color_ref, "#ffffff");
        assert_eq!(tagline.font_size, None);

        assert_eq!(layout.zones.brand_bar.unwrap().color_ref, "brand_secondary");
    }

    #[test]
    fn canvas_defaults_when_absent() {
        let layout: LayoutConfig = serde_json::from_str(r#"{"zones": {}}"#).unwrap();
        assert_eq!(layout.canvas_width, 1080);
        assert_eq!(layout.canvas_height, 1080);
        assert_eq!(layout.zones, Zones::default());
    }

    #[test]
    fn text_zone_color_ref_defaults_to_brand_primary() {
        let zone: TextZone = serde_json::from_str(r#"{"x": 10, "y": 20}"#).unwrap();
        assert_eq!(zone.color_ref, "brand_primary");
    }

    #[test]
    fn unknown_zone_shape_is_rejected() {
        let result = serde_json::from_str::<ImageZone>(
            r#"{"x": 0, "y": 0, "width": 10, "height": 10, "shape": "hexagon"}"#,
        );
        assert!(result.is_err());
    }
}
