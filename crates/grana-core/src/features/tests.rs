//! Tests for the feature extractor.

use super::*;
use crate::decoders::DecodedImage;

fn flat_image(width: u32, height: u32, rgb: [f32; 3]) -> DecodedImage {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for _ in 0..width * height {
        data.extend_from_slice(&rgb);
    }
    DecodedImage::from_rgb(width, height, data).unwrap()
}

fn checkerboard(width: u32, height: u32, a: f32, b: f32) -> DecodedImage {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            let v = if (x + y) % 2 == 0 { a } else { b };
            data.extend_from_slice(&[v, v, v]);
        }
    }
    DecodedImage::from_rgb(width, height, data).unwrap()
}

#[test]
fn test_extraction_is_deterministic() {
    let img = checkerboard(200, 150, 0.2, 0.8);
    let a = extract_features(&img).unwrap();
    let b = extract_features(&img).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_uniform_gray_tonal_distribution() {
    // Uniform mid-gray: no highlights, no shadows, all midtones.
    let img = flat_image(64, 64, [0.5, 0.5, 0.5]);
    let f = extract_features(&img).unwrap();

    assert_eq!(f.highlights, 0.0);
    assert_eq!(f.shadows, 0.0);
    assert_eq!(f.midtone_ratio, 1.0);
    assert!((f.avg_luma - 0.5).abs() < 1e-3);
    assert_eq!(f.rms_contrast, 0.0);
    assert_eq!(f.color_var, 0.0);
    assert_eq!(f.sat_std_dev, 0.0);
    assert_eq!(f.hue_variance, 0.0);
}

#[test]
fn test_white_image_is_all_highlights() {
    let img = flat_image(32, 32, [1.0, 1.0, 1.0]);
    let f = extract_features(&img).unwrap();
    assert_eq!(f.highlights, 1.0);
    assert_eq!(f.shadows, 0.0);
    assert_eq!(f.midtone_ratio, 0.0);
}

#[test]
fn test_black_image_is_all_shadows() {
    let img = flat_image(32, 32, [0.0, 0.0, 0.0]);
    let f = extract_features(&img).unwrap();
    assert_eq!(f.shadows, 1.0);
    assert_eq!(f.highlights, 0.0);
    assert_eq!(f.midtone_ratio, 0.0);
}

#[test]
fn test_contrast_orders_flat_vs_checkerboard() {
    let flat = flat_image(64, 64, [0.5, 0.5, 0.5]);
    let busy = checkerboard(64, 64, 0.15, 0.85);

    let f_flat = extract_features(&flat).unwrap();
    let f_busy = extract_features(&busy).unwrap();
    assert!(
        f_busy.rms_contrast > f_flat.rms_contrast,
        "checkerboard should measure more contrast ({} vs {})",
        f_busy.rms_contrast,
        f_flat.rms_contrast
    );
}

#[test]
fn test_saturated_image_has_spread_only_with_mixed_saturation() {
    // One flat saturated color still has zero spread.
    let red = flat_image(64, 64, [1.0, 0.0, 0.0]);
    let f_red = extract_features(&red).unwrap();
    assert_eq!(f_red.sat_std_dev, 0.0);

    // Mixing saturated and neutral pixels produces spread.
    let mut data = Vec::new();
    for i in 0..64 * 64 {
        if i % 2 == 0 {
            data.extend_from_slice(&[1.0, 0.0, 0.0]);
        } else {
            data.extend_from_slice(&[0.5, 0.5, 0.5]);
        }
    }
    let mixed = DecodedImage::from_rgb(64, 64, data).unwrap();
    let f_mixed = extract_features(&mixed).unwrap();
    assert!(f_mixed.sat_std_dev > 0.0);
}

#[test]
fn test_hue_of_solid_green() {
    let img = flat_image(48, 48, [0.0, 1.0, 0.0]);
    let f = extract_features(&img).unwrap();
    // Green hue 1/3 lands in bin 12 of 36; bin centers divide by 36.
    assert!((f.mean_hue - 12.0 / 36.0).abs() < 1e-3, "got {}", f.mean_hue);
    assert_eq!(f.hue_variance, 0.0);
}

#[test]
fn test_features_are_bounded() {
    let img = checkerboard(150, 90, 0.05, 0.95);
    let f = extract_features(&img).unwrap();
    for (i, v) in f.to_vector().iter().enumerate() {
        assert!(
            (0.0..=1.0).contains(v),
            "feature {} out of bounds: {}",
            i,
            v
        );
    }
}

#[test]
fn test_large_image_uses_thumbnail() {
    // Statistics from a 1024px image and its 128px thumbnail agree,
    // because extraction always downsamples first.
    let img = checkerboard(1024, 768, 0.2, 0.8);
    let pre = img.downscale_to(128);
    let a = extract_features(&img).unwrap();
    let b = extract_features(&pre).unwrap();
    assert!((a.avg_luma - b.avg_luma).abs() < 1e-6);
    assert!((a.rms_contrast - b.rms_contrast).abs() < 1e-6);
}

#[test]
fn test_feature_vector_order() {
    let f = ImageFeatures {
        avg_luma: 0.1,
        rms_contrast: 0.2,
        color_var: 0.3,
        sat_std_dev: 0.4,
        highlights: 0.5,
        shadows: 0.6,
        midtone_ratio: 0.7,
        mean_hue: 0.8,
        hue_variance: 0.9,
    };
    assert_eq!(
        f.to_vector(),
        [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9]
    );
}
