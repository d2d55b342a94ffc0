//! Zone Resolution - layout + branding -> ordered render tasks
//!
//! The render order is fixed to [photo, logo, name, tagline, brand_bar] so
//! compositing is deterministic regardless of input ordering. A zone without
//! its branding input is silently skipped: a subscriber with no logo still
//! gets a personalized photo and name.

use crate::branding::{non_empty, resolve_color, BrandingSnapshot};
use crate::layout::{FillZone, ImageZone, LayoutConfig, TextZone};

pub const NAME_FONT_SIZE: f32 = 28.0;
pub const TAGLINE_FONT_SIZE: f32 = 18.0;

/// One renderable layer request, carrying the zone spec and the branding
/// values it needs, with defaults already applied.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderTask {
    Photo {
        zone: ImageZone,
        url: String,
    },
    Logo {
        zone: ImageZone,
        url: String,
    },
    Name {
        zone: TextZone,
        text: String,
        color: String,
        font_size: f32,
    },
    Tagline {
        zone: TextZone,
        text: String,
        color: String,
        font_size: f32,
    },
    BrandBar {
        zone: FillZone,
        color: String,
    },
}

impl RenderTask {
    pub fn kind(&self) -> &'static str {
        match self {
            RenderTask::Photo { .. } => "photo",
            RenderTask::Logo { .. } => "logo",
            RenderTask::Name { .. } => "name",
            RenderTask::Tagline { .. } => "tagline",
            RenderTask::BrandBar { .. } => "brand_bar",
        }
    }
}

pub fn resolve_zones(layout: &LayoutConfig, branding: &BrandingSnapshot) -> Vec<RenderTask> {
    let zones = &layout.zones;
    let mut tasks = Vec::new();

    if let (Some(zone), Some(url)) = (&zones.photo, non_empty(&branding.photo_url)) {
        tasks.push(RenderTask::Photo {
            zone: zone.clone(),
            url: url.to_string(),
        });
    }

    if let (Some(zone), Some(url)) = (&zones.logo, non_empty(&branding.logo_url)) {
        tasks.push(RenderTask::Logo {
            zone: zone.clone(),
            url: url.to_string(),
        });
    }

    if let (Some(zone), Some(text)) = (&zones.name, non_empty(&branding.name)) {
        tasks.push(RenderTask::Name {
            zone: zone.clone(),
            text: text.to_string(),
            color: resolve_color(&zone.color_ref, branding),
            font_size: zone.font_size.unwrap_or(NAME_FONT_SIZE),
        });
    }

    if let (Some(zone), Some(text)) = (&zones.tagline, non_empty(&branding.tagline)) {
        tasks.push(RenderTask::Tagline {
            zone: zone.clone(),
            text: text.to_string(),
            color: resolve_color(&zone.color_ref, branding),
            font_size: zone.font_size.unwrap_or(TAGLINE_FONT_SIZE),
        });
    }

    // brand_bar needs no branding input; it renders whenever declared
    if let Some(zone) = &zones.brand_bar {
        tasks.push(RenderTask::BrandBar {
            zone: zone.clone(),
            color: resolve_color(&zone.color_ref, branding),
        });
    }

    tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{ZoneShape, Zones};

    fn full_layout() -> LayoutConfig {
        LayoutConfig {
            canvas_width: 1080,
            canvas_height: 1080,
            zones: Zones {
                photo: Some(ImageZone {
                    x: 40,
                    y: 40,
                    width: 200,
                    height: 200,
                    shape: ZoneShape::Circle,
                    fit: None,
                }),
                logo: Some(ImageZone {
                    x: 800,
                    y: 40,
                    width: 240,
                    height: 120,
                    shape: ZoneShape::Rect,
                    fit: None,
                }),
                name: Some(TextZone {
                    x: 40,
                    y: 980,
                    color_ref: "brand_primary".to_string(),
                    font_size: None,
                }),
                tagline: Some(TextZone {
                    x: 40,
                    y: 1020,
                    color_ref: "brand_secondary".to_string(),
                    font_size: None,
                }),
                brand_bar: Some(FillZone {
                    x: 0,
                    y: 1040,
                    width: 1080,
                    height: 40,
                    color_ref: "brand_primary".to_string(),
                }),
            },
        }
    }

    fn full_branding() -> BrandingSnapshot {
        BrandingSnapshot {
            photo_url: Some("https://cdn.example.com/photo.jpg".to_string()),
            logo_url: Some("https://cdn.example.com/logo.png".to_string()),
            color_primary: Some("#112233".to_string()),
            color_secondary: Some("#445566".to_string()),
            name: Some("Jane Doe".to_string()),
            tagline: Some("Your trusted partner".to_string()),
        }
    }

    #[test]
    fn emits_tasks_in_fixed_order() {
        let tasks = resolve_zones(&full_layout(), &full_branding());
        let kinds: Vec<_> = tasks.iter().map(RenderTask::kind).collect();
        assert_eq!(kinds, ["photo", "logo", "name", "tagline", "brand_bar"]);
    }

    #[test]
    fn missing_logo_url_skips_logo_zone() {
        let mut branding = full_branding();
        branding.logo_url = None;
        let tasks = resolve_zones(&full_layout(), &branding);
        assert!(tasks.iter().all(|t| t.kind() != "logo"));
        assert_eq!(tasks.len(), 4);
    }

    #[test]
    fn empty_string_branding_counts_as_absent() {
        let mut branding = full_branding();
        branding.name = Some(String::new());
        let tasks = resolve_zones(&full_layout(), &branding);
        assert!(tasks.iter().all(|t| t.kind() != "name"));
    }

    #[test]
    fn undeclared_zone_is_never_emitted() {
        let mut layout = full_layout();
        layout.zones.photo = None;
        let tasks = resolve_zones(&layout, &full_branding());
        assert!(tasks.iter().all(|t| t.kind() != "photo"));
    }

    #[test]
    fn brand_bar_renders_without_any_branding() {
        let mut layout = LayoutConfig::new(1080, 1080);
        layout.zones.brand_bar = Some(FillZone {
            x: 0,
            y: 1040,
            width: 1080,
            height: 40,
            color_ref: "brand_primary".to_string(),
        });
        let tasks = resolve_zones(&layout, &BrandingSnapshot::default());
        assert_eq!(tasks.len(), 1);
        // no primary color in the snapshot, so the bar falls back to black
        assert!(matches!(&tasks[0], RenderTask::BrandBar { color, .. } if color.as_str() == "#000000"));
    }

    #[test]
    fn text_font_sizes_default_per_kind() {
        let branding = full_branding();
        let tasks = resolve_zones(&full_layout(), &branding);
        for task in tasks {
            match task {
                RenderTask::Name { font_size, color, .. } => {
                    assert_eq!(font_size, NAME_FONT_SIZE);
                    assert_eq!(color, "#112233");
                }
                RenderTask::Tagline { font_size, color, .. } => {
                    assert_eq!(font_size, TAGLINE_FONT_SIZE);
                    assert_eq!(color, "#445566");
                }
                _ => {}
            }
        }
    }
}
