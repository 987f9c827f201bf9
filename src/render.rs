// render.rs - Scaled Image Renderer
//
// Produces the bitmap an overlay window shows for a zoom percentage. The
// source image is never modified; every call returns a fresh buffer and the
// caller drops the one it replaces.

use std::path::Path;

use anyhow::{Context, Result};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::constants::zoom;

/// Decode an image file into RGBA8
pub fn load_rgba(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).with_context(|| format!("Failed to open image {:?}", path))?;
    Ok(img.to_rgba8())
}

/// Output size for `percent` of `(width, height)`.
///
/// `None` for 0%, which means "show nothing". Otherwise each side is
/// `side * percent / 100` rounded down, never below 1. Percent above 100 is
/// treated as 100.
pub fn scaled_dimensions(width: u32, height: u32, percent: u8) -> Option<(u32, u32)> {
    let percent = u64::from(percent.min(zoom::MAX));
    if percent == 0 {
        return None;
    }
    let scale = |side: u32| ((u64::from(side) * percent / 100) as u32).max(1);
    Some((scale(width), scale(height)))
}

/// Resample `source` to `percent` of its size.
///
/// Uses Catmull-Rom (bicubic) filtering on premultiplied RGBA, so
/// transparent pixels contribute no color and anti-aliased edges blend
/// cleanly over a transparent window.
pub fn render(source: &RgbaImage, percent: u8) -> Option<RgbaImage> {
    let (w, h) = scaled_dimensions(source.width(), source.height(), percent)?;
    if (w, h) == source.dimensions() {
        return Some(source.clone());
    }
    let mut premultiplied = source.clone();
    premultiply(&mut premultiplied);
    let mut scaled = imageops::resize(&premultiplied, w, h, FilterType::CatmullRom);
    unpremultiply(&mut scaled);
    Some(scaled)
}

/// Make every pixel of exactly `key` fully transparent black
pub fn apply_transparency_key(image: &mut RgbaImage, key: [u8; 3]) {
    for pixel in image.pixels_mut() {
        let Rgba([r, g, b, _]) = *pixel;
        if [r, g, b] == key {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }
}

fn premultiply(image: &mut RgbaImage) {
    for pixel in image.pixels_mut() {
        let alpha = u16::from(pixel[3]);
        for channel in &mut pixel.0[..3] {
            *channel = ((u16::from(*channel) * alpha + 127) / 255) as u8;
        }
    }
}

fn unpremultiply(image: &mut RgbaImage) {
    for pixel in image.pixels_mut() {
        let alpha = u16::from(pixel[3]);
        if alpha == 0 {
            *pixel = Rgba([0, 0, 0, 0]);
            continue;
        }
        for channel in &mut pixel.0[..3] {
            // Bicubic overshoot can leave color above alpha
            *channel = ((u16::from(*channel) * 255 + alpha / 2) / alpha).min(255) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_percent_renders_nothing() {
        let source = RgbaImage::new(40, 20);
        assert_eq!(scaled_dimensions(40, 20, 0), None);
        assert!(render(&source, 0).is_none());
    }

    #[test]
    fn dimensions_round_down_with_floor_of_one() {
        assert_eq!(scaled_dimensions(200, 100, 50), Some((100, 50)));
        assert_eq!(scaled_dimensions(3, 3, 50), Some((1, 1)));
        assert_eq!(scaled_dimensions(1, 1, 1), Some((1, 1)));
        assert_eq!(scaled_dimensions(199, 101, 33), Some((65, 33)));
    }

    #[test]
    fn render_matches_scaled_dimensions_for_every_percent() {
        let source = RgbaImage::from_pixel(37, 23, Rgba([10, 20, 30, 255]));
        for percent in 1..=100u8 {
            let out = render(&source, percent).unwrap();
            let expected = scaled_dimensions(37, 23, percent).unwrap();
            assert_eq!(out.dimensions(), expected, "percent {percent}");
        }
    }

    #[test]
    fn render_leaves_source_untouched() {
        let source = RgbaImage::from_pixel(10, 10, Rgba([1, 2, 3, 255]));
        let before = source.clone();
        let _ = render(&source, 50);
        assert_eq!(source, before);
    }

    #[test]
    fn over_hundred_percent_is_clamped() {
        assert_eq!(scaled_dimensions(10, 10, 250), Some((10, 10)));
    }

    #[test]
    fn transparency_key_clears_only_exact_matches() {
        let mut img = RgbaImage::from_pixel(2, 1, Rgba([255, 255, 255, 255]));
        img.put_pixel(1, 0, Rgba([255, 255, 254, 255]));
        apply_transparency_key(&mut img, [255, 255, 255]);
        assert_eq!(*img.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
        assert_eq!(*img.get_pixel(1, 0), Rgba([255, 255, 254, 255]));
    }

    #[test]
    fn keyed_color_does_not_tint_visible_edges() {
        let mut img = RgbaImage::from_pixel(40, 10, Rgba([0, 0, 0, 255]));
        for x in 0..20 {
            for y in 0..10 {
                img.put_pixel(x, y, Rgba([255, 0, 255, 255]));
            }
        }
        apply_transparency_key(&mut img, [255, 0, 255]);

        let out = render(&img, 50).unwrap();
        for pixel in out.pixels().filter(|p| p[3] > 0) {
            assert_eq!(&pixel.0[..3], &[0, 0, 0], "tinted edge pixel {:?}", pixel);
        }
        // the opaque half is still there
        assert_eq!(out.get_pixel(19, 5)[3], 255);
    }

    #[test]
    fn half_transparent_color_survives_resampling() {
        let source = RgbaImage::from_pixel(8, 8, Rgba([200, 100, 50, 128]));
        let out = render(&source, 50).unwrap();
        for pixel in out.pixels() {
            assert_eq!(pixel[3], 128);
            assert!(pixel[0].abs_diff(200) <= 2, "{:?}", pixel);
            assert!(pixel[1].abs_diff(100) <= 2, "{:?}", pixel);
            assert!(pixel[2].abs_diff(50) <= 2, "{:?}", pixel);
        }
    }
}
