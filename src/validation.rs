//! Layout Validation - Rule/Report Separation
//!
//! Rules produce structured violations. Any violation aborts generation
//! before compositing work begins.

use serde::{Deserialize, Serialize};

use crate::layout::LayoutConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutViolation {
    pub rule: String,
    pub zone: Option<String>,
    pub message: String,
}

impl LayoutViolation {
    fn new(rule: &str, zone: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            zone: zone.map(str::to_string),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub violations: Vec<LayoutViolation>,
}

impl ValidationReport {
    pub fn summary(&self) -> String {
        self.violations
            .iter()
            .map(|v| match &v.zone {
                Some(zone) => format!("{} ({}): {}", v.rule, zone, v.message),
                None => format!("{}: {}", v.rule, v.message),
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Validation rule - produces violations
pub trait LayoutRule {
    fn name(&self) -> &'static str;
    fn check(&self, layout: &LayoutConfig) -> Vec<LayoutViolation>;
}

// --- Concrete Rules ---

pub struct CanvasRule;

impl LayoutRule for CanvasRule {
    fn name(&self) -> &'static str { "canvas" }

    fn check(&self, layout: &LayoutConfig) -> Vec<LayoutViolation> {
        let mut violations = vec![];
        if layout.canvas_width == 0 {
            violations.push(LayoutViolation::new(self.name(), None, "canvas width must be positive"));
        }
        if layout.canvas_height == 0 {
            violations.push(LayoutViolation::new(self.name(), None, "canvas height must be positive"));
        }
        violations
    }
}

pub struct ZoneGeometryRule;

impl LayoutRule for ZoneGeometryRule {
    fn name(&self) -> &'static str { "zone_geometry" }

    fn check(&self, layout: &LayoutConfig) -> Vec<LayoutViolation> {
        let mut violations = vec![];
        let mut check_box = |zone: &str, width: u32, height: u32| {
            if width == 0 || height == 0 {
                violations.push(LayoutViolation::new(
                    self.name(),
                    Some(zone),
                    format!("zone size must be positive, got {}x{}", width, height),
                ));
            }
        };

        if let Some(z) = &layout.zones.photo {
            check_box("photo", z.width, z.height);
        }
        if let Some(z) = &layout.zones.logo {
            check_box("logo", z.width, z.height);
        }
        if let Some(z) = &layout.zones.brand_bar {
            check_box("brand_bar", z.width, z.height);
        }
        violations
    }
}

pub struct TextStyleRule;

impl LayoutRule for TextStyleRule {
    fn name(&self) -> &'static str { "text_style" }

    fn check(&self, layout: &LayoutConfig) -> Vec<LayoutViolation> {
        let mut violations = vec![];
        let text_zones = [
            ("name", &layout.zones.name),
            ("tagline", &layout.zones.tagline),
        ];

        for (zone_name, zone) in text_zones {
            let Some(zone) = zone else { continue };
            if zone.color_ref.is_empty() {
                violations.push(LayoutViolation::new(
                    self.name(),
                    Some(zone_name),
                    "colorRef must not be empty",
                ));
            }
            if let Some(size) = zone.font_size {
                if !(size.is_finite() && size > 0.0) {
                    violations.push(LayoutViolation::new(
                        self.name(),
                        Some(zone_name),
                        format!("fontSize must be positive, got {}", size),
                    ));
                }
            }
        }

        if let Some(bar) = &layout.zones.brand_bar {
            if bar.color_ref.is_empty() {
                violations.push(LayoutViolation::new(
                    self.name(),
                    Some("brand_bar"),
                    "colorRef must not be empty",
                ));
            }
        }
        violations
    }
}

/// Validator orchestrates rules. Every violation is fatal: a structurally
/// broken layout never reaches the renderer.
pub struct LayoutValidator {
    rules: Vec<Box<dyn LayoutRule>>,
}

impl LayoutValidator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(CanvasRule),
                Box::new(ZoneGeometryRule),
                Box::new(TextStyleRule),
            ],
        }
    }

    pub fn validate(&self, layout: &LayoutConfig) -> ValidationReport {
        let mut violations = vec![];
        for rule in &self.rules {
            violations.extend(rule.check(layout));
        }
        ValidationReport {
            valid: violations.is_empty(),
            violations,
        }
    }
}

impl Default for LayoutValidator {
    fn default() -> Self {
        Self::new()
    }
}
