//! Layer Rendering - per-zone raster production
//!
//! Every renderer returns a positioned `Layer`. Image layers may fail
//! (network, decode); text and fill layers cannot.

use std::path::Path;

use image::imageops::FilterType;
use image::{imageops, DynamicImage, Rgba, RgbaImage};
use rusttype::{point, Font, Scale};
use thiserror::Error;
use tracing::warn;

use crate::branding::parse_color;
use crate::layout::{FillZone, ImageFit, ImageZone, TextZone, ZoneShape};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("fetch: {0}")]
    Fetch(#[from] crate::fetch::FetchError),
    #[error("decode: {0}")]
    Decode(#[from] image::ImageError),
}

#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read font {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {face} font data")]
    Parse { face: &'static str },
}

/// A raster ready for compositing at (x, y) on the base canvas.
#[derive(Debug, Clone)]
pub struct Layer {
    pub pixels: RgbaImage,
    pub x: u32,
    pub y: u32,
}

/// Typeface pair for text zones: name renders bold, tagline regular.
/// The engine owns its faces; layouts do not choose fonts.
pub struct FontStore {
    regular: Font<'static>,
    bold: Font<'static>,
}

impl FontStore {
    pub fn from_bytes(regular: Vec<u8>, bold: Vec<u8>) -> Result<Self, FontError> {
        Ok(Self {
            regular: Font::try_from_vec(regular).ok_or(FontError::Parse { face: "regular" })?,
            bold: Font::try_from_vec(bold).ok_or(FontError::Parse { face: "bold" })?,
        })
    }

    pub fn load(regular_path: &Path, bold_path: &Path) -> Result<Self, FontError> {
        let read = |path: &Path| {
            std::fs::read(path).map_err(|source| FontError::Io {
                path: path.display().to_string(),
                source,
            })
        };
        Self::from_bytes(read(regular_path)?, read(bold_path)?)
    }

    pub fn regular(&self) -> &Font<'static> {
        &self.regular
    }

    pub fn bold(&self) -> &Font<'static> {
        &self.bold
    }
}

/// Cover-fit: fill the target box exactly, center-cropping overflow.
pub fn cover_fit(source: &DynamicImage, width: u32, height: u32) -> RgbaImage {
    let src = source.to_rgba8();
    let (sw, sh) = src.dimensions();
    let scale = f64::max(width as f64 / sw as f64, height as f64 / sh as f64);
    let rw = ((sw as f64 * scale).round() as u32).max(width);
    let rh = ((sh as f64 * scale).round() as u32).max(height);
    let resized = imageops::resize(&src, rw, rh, FilterType::Lanczos3);
    let left = (rw - width) / 2;
    let top = (rh - height) / 2;
    imageops::crop_imm(&resized, left, top, width, height).to_image()
}

/// Inside-fit: largest size within the box, aspect preserved, no cropping.
pub fn inside_fit(source: &DynamicImage, width: u32, height: u32) -> RgbaImage {
    source.resize(width, height, FilterType::Lanczos3).to_rgba8()
}

/// Zero out alpha outside the inscribed circle (dest-in mask).
pub fn circle_mask(image: &mut RgbaImage) {
    let (w, h) = image.dimensions();
    let cx = (w as f32 - 1.0) / 2.0;
    let cy = (h as f32 - 1.0) / 2.0;
    let radius = w.min(h) as f32 / 2.0;
    for y in 0..h {
        for x in 0..w {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            if dx * dx + dy * dy > radius * radius {
                image.get_pixel_mut(x, y).0[3] = 0;
            }
        }
    }
}

/// Render a photo or logo zone from fetched bytes.
///
/// A circular zone is cover-fit to a square sized to the smaller of
/// (width, height), then masked. Rect zones honor the declared fit, falling
/// back to the kind's default (photo: cover, logo: inside).
pub fn render_image(bytes: &[u8], zone: &ImageZone, default_fit: ImageFit) -> Result<Layer, RenderError> {
    let source = image::load_from_memory(bytes)?;
    let pixels = match zone.shape {
        ZoneShape::Circle => {
            let size = zone.width.min(zone.height);
            let mut square = cover_fit(&source, size, size);
            circle_mask(&mut square);
            square
        }
        ZoneShape::Rect => match zone.fit.unwrap_or(default_fit) {
            ImageFit::Cover => cover_fit(&source, zone.width, zone.height),
            ImageFit::Inside => inside_fit(&source, zone.width, zone.height),
        },
    };
    Ok(Layer {
        pixels,
        x: zone.x,
        y: zone.y,
    })
}

/// Rasterize text onto a transparent canvas-sized layer. The zone's (x, y)
/// is the baseline origin, matching vector text anchoring.
pub fn render_text(
    text: &str,
    zone: &TextZone,
    color_value: &str,
    font: &Font<'static>,
    font_size: f32,
    canvas_width: u32,
    canvas_height: u32,
) -> Layer {
    let color = rasterizable_color(color_value);
    let mut pixels = RgbaImage::from_pixel(canvas_width, canvas_height, Rgba([0, 0, 0, 0]));
    draw_text(&mut pixels, font, font_size, zone.x as i32, zone.y as i32, color, text);
    Layer { pixels, x: 0, y: 0 }
}

/// Render a solid color bar.
pub fn render_fill(zone: &FillZone, color_value: &str) -> Layer {
    let color = rasterizable_color(color_value);
    Layer {
        pixels: RgbaImage::from_pixel(zone.width, zone.height, color),
        x: zone.x,
        y: zone.y,
    }
}

fn rasterizable_color(value: &str) -> Rgba<u8> {
    parse_color(value).unwrap_or_else(|| {
        warn!(color = value, "unparsable color value, rendering opaque black");
        Rgba([0, 0, 0, 255])
    })
}

fn draw_text(
    image: &mut RgbaImage,
    font: &Font<'static>,
    size: f32,
    x: i32,
    baseline_y: i32,
    color: Rgba<u8>,
    text: &str,
) {
    let scale = Scale::uniform(size);
    for glyph in font.layout(text, scale, point(x as f32, baseline_y as f32)) {
        let Some(bb) = glyph.pixel_bounding_box() else { continue };
        glyph.draw(|gx, gy, coverage| {
            let px = gx as i32 + bb.min.x;
            let py = gy as i32 + bb.min.y;
            if px < 0 || py < 0 {
                return;
            }
            let (px, py) = (px as u32, py as u32);
            if px >= image.width() || py >= image.height() {
                return;
            }
            let alpha = (coverage * color.0[3] as f32).round() as u8;
            if alpha == 0 {
                return;
            }
            let dst = image.get_pixel_mut(px, py);
            // keep the strongest coverage where glyphs overlap
            if alpha > dst.0[3] {
                *dst = Rgba([color.0[0], color.0[1], color.0[2], alpha]);
            }
        });
    }
}
