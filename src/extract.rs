//! Dominant color extraction
//!
//! Reduces a wallpaper image to the single sRGB color used to seed a
//! scheme. The image is downscaled, unique colors accumulate weight, and a
//! sharpness-powered weighted average in CIE Lab picks a representative
//! color that favors the most prominent hues without snapping to a single
//! pixel value.

use std::collections::HashMap;

use image::{imageops::FilterType, RgbImage};

use crate::color::{CieLab, Srgb};
use crate::error::EngineError;

// Analysis resolution; enough for a dominant color, cheap to scan
const SAMPLE_SIZE: u32 = 64;

// Exponent applied to accumulated weights so frequent colors dominate
const SHARPNESS: f64 = 4.0;

/// Extract the dominant color of an image.
pub fn dominant_color(img: &RgbImage) -> Srgb {
    let small = image::imageops::resize(img, SAMPLE_SIZE, SAMPLE_SIZE, FilterType::Triangle);

    // Accumulate per-color weight, converting each unique color once
    let mut weights: HashMap<u32, (CieLab, f64)> = HashMap::new();
    for pixel in small.pixels() {
        let key = ((pixel[0] as u32) << 16) | ((pixel[1] as u32) << 8) | pixel[2] as u32;
        weights
            .entry(key)
            .and_modify(|(_, weight)| *weight += 1.0)
            .or_insert_with(|| {
                let lab = CieLab::from_xyz(
                    Srgb::from_rgb8(pixel[0], pixel[1], pixel[2])
                        .to_linear()
                        .to_xyz(),
                );
                (lab, 1.0)
            });
    }

    let mut sum_l = 0.0;
    let mut sum_a = 0.0;
    let mut sum_b = 0.0;
    let mut total = 0.0;
    for (lab, weight) in weights.values() {
        let w = weight.powf(SHARPNESS);
        sum_l += lab.l * w;
        sum_a += lab.a * w;
        sum_b += lab.b * w;
        total += w;
    }

    let average = CieLab::new(sum_l / total, sum_a / total, sum_b / total);
    tracing::debug!(
        "dominant color L {:.1} a {:.1} b {:.1} from {} unique colors",
        average.l,
        average.a,
        average.b,
        weights.len(),
    );
    average.to_xyz().to_linear_srgb().to_srgb()
}

/// Decode an encoded image (PNG or JPEG) and extract its dominant color.
pub fn dominant_color_from_bytes(data: &[u8]) -> Result<Srgb, EngineError> {
    let img = image::load_from_memory(data)
        .map_err(|e| EngineError::ImageDecode(format!("failed to decode image: {}", e)))?;
    Ok(dominant_color(&img.to_rgb8()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_image_returns_its_color() {
        let img = RgbImage::from_pixel(32, 32, image::Rgb([0x6B, 0x42, 0x26]));
        let (r, g, b) = dominant_color(&img).to_rgb8();
        assert!(r.abs_diff(0x6B) <= 1);
        assert!(g.abs_diff(0x42) <= 1);
        assert!(b.abs_diff(0x26) <= 1);
    }

    #[test]
    fn test_majority_color_dominates() {
        // 3/4 red, 1/4 blue: the sharpened weighting must land near red
        let mut img = RgbImage::from_pixel(64, 64, image::Rgb([200, 30, 30]));
        for y in 0..64 {
            for x in 0..16 {
                img.put_pixel(x, y, image::Rgb([30, 30, 200]));
            }
        }
        let (r, _, b) = dominant_color(&img).to_rgb8();
        assert!(r > b, "expected red-dominant result, got r={} b={}", r, b);
    }

    #[test]
    fn test_invalid_bytes_fail_cleanly() {
        let result = dominant_color_from_bytes(&[0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(EngineError::ImageDecode(_))));
    }
}
