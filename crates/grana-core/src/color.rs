//! Color math shared across the pipeline and feature extraction.

/// Rec.601 luma weights used by the grading threshold and the analyzer.
pub const LUMA_R: f32 = 0.299;
pub const LUMA_G: f32 = 0.587;
pub const LUMA_B: f32 = 0.114;

/// Rec.601 luminance of an RGB triple.
#[inline]
pub fn luminance(r: f32, g: f32, b: f32) -> f32 {
    LUMA_R * r + LUMA_G * g + LUMA_B * b
}

/// HSV hue of an RGB triple, normalized to [0, 1).
///
/// Achromatic pixels (max == min) report hue 0.
#[inline]
pub fn rgb_to_hue(r: f32, g: f32, b: f32) -> f32 {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    if delta <= 0.0 {
        return 0.0;
    }

    let mut hue = if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    hue /= 6.0;
    if hue < 0.0 {
        hue += 1.0;
    }
    hue
}

/// HSV saturation of an RGB triple.
#[inline]
pub fn rgb_to_saturation(r: f32, g: f32, b: f32) -> f32 {
    let max = r.max(g).max(b);
    if max <= 0.0 {
        return 0.0;
    }
    let min = r.min(g).min(b);
    (max - min) / max
}

/// Parse a hex color string ("RRGGBB" or "#RRGGBB") into normalized RGB.
pub fn parse_hex_rgb(s: &str) -> Result<[f32; 3], String> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 {
        return Err(format!("Expected 6 hex digits, got \"{}\"", s));
    }

    let byte = |range: std::ops::Range<usize>| -> Result<f32, String> {
        u8::from_str_radix(&hex[range], 16)
            .map(|v| v as f32 / 255.0)
            .map_err(|e| format!("Invalid hex color \"{}\": {}", s, e))
    };

    Ok([byte(0..2)?, byte(2..4)?, byte(4..6)?])
}
