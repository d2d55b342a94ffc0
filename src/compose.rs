//! Compositing - fixed z-order flattening
//!
//! Pure functions: the same template and the same ordered layers produce
//! byte-identical output.

use std::io::Cursor;

use image::{imageops, DynamicImage, ImageOutputFormat, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::render::Layer;

const JPEG_QUALITY: u8 = 90;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossless, alpha-capable. The default.
    #[default]
    Png,
    /// Alpha flattens to opaque.
    Jpeg,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
        }
    }
}

/// Layer the renderable pieces onto the template and flatten.
pub fn compose(
    template_bytes: &[u8],
    layers: &[Layer],
    format: OutputFormat,
) -> Result<Vec<u8>, image::ImageError> {
    let base = image::load_from_memory(template_bytes)?.to_rgba8();
    flatten(base, layers, format)
}

/// Overlay `layers` in order onto an already decoded base, then encode.
pub fn flatten(
    mut base: RgbaImage,
    layers: &[Layer],
    format: OutputFormat,
) -> Result<Vec<u8>, image::ImageError> {
    for layer in layers {
        imageops::overlay(&mut base, &layer.pixels, layer.x as i64, layer.y as i64);
    }
    encode(&base, format)
}

pub fn encode(pixels: &RgbaImage, format: OutputFormat) -> Result<Vec<u8>, image::ImageError> {
    let mut out = Cursor::new(Vec::new());
    match format {
        OutputFormat::Png => {
            DynamicImage::ImageRgba8(pixels.clone()).write_to(&mut out, ImageOutputFormat::Png)?;
        }
        OutputFormat::Jpeg => {
            let opaque = DynamicImage::ImageRgba8(pixels.clone()).to_rgb8();
            DynamicImage::ImageRgb8(opaque)
                .write_to(&mut out, ImageOutputFormat::Jpeg(JPEG_QUALITY))?;
        }
    }
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn template_bytes(w: u32, h: u32, color: Rgba<u8>) -> Vec<u8> {
        encode(&RgbaImage::from_pixel(w, h, color), OutputFormat::Png).unwrap()
    }

    #[test]
    fn zero_layers_is_a_noop_on_pixels() {
        let white = Rgba([255, 255, 255, 255]);
        let template = template_bytes(32, 32, white);
        let out = compose(&template, &[], OutputFormat::Png).unwrap();
        let decoded = image::load_from_memory(&out).unwrap().to_rgba8();
        assert!(decoded.pixels().all(|p| *p == white));
    }

    #[test]
    fn layers_overlay_at_declared_position() {
        let template = template_bytes(32, 32, Rgba([255, 255, 255, 255]));
        let layer = Layer {
            pixels: RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 255])),
            x: 4,
            y: 4,
        };
        let out = compose(&template, &[layer], OutputFormat::Png).unwrap();
        let decoded = image::load_from_memory(&out).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(5, 5), &Rgba([255, 0, 0, 255]));
        assert_eq!(decoded.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
        assert_eq!(decoded.get_pixel(20, 20), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn later_layers_win_where_they_overlap() {
        let template = template_bytes(16, 16, Rgba([255, 255, 255, 255]));
        let below = Layer {
            pixels: RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 255])),
            x: 0,
            y: 0,
        };
        let above = Layer {
            pixels: RgbaImage::from_pixel(8, 8, Rgba([0, 0, 255, 255])),
            x: 4,
            y: 4,
        };
        let out = compose(&template, &[below, above], OutputFormat::Png).unwrap();
        let decoded = image::load_from_memory(&out).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(5, 5), &Rgba([0, 0, 255, 255]));
        assert_eq!(decoded.get_pixel(1, 1), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn identical_inputs_produce_identical_bytes() {
        let template = template_bytes(24, 24, Rgba([10, 20, 30, 255]));
        let layer = Layer {
            pixels: RgbaImage::from_pixel(6, 6, Rgba([200, 100, 50, 128])),
            x: 2,
            y: 3,
        };
        let a = compose(&template, std::slice::from_ref(&layer), OutputFormat::Png).unwrap();
        let b = compose(&template, std::slice::from_ref(&layer), OutputFormat::Png).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn jpeg_output_decodes_opaque() {
        let template = template_bytes(16, 16, Rgba([255, 255, 255, 255]));
        let out = compose(&template, &[], OutputFormat::Jpeg).unwrap();
        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!(decoded.to_rgba8().get_pixel(0, 0).0[3], 255);
    }
}
