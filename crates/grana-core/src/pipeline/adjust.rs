//! Stages 2-3: contrast and temperature-based white balance.

use super::helpers::{clamp01, for_each_chunk_mut};
use crate::models::NEUTRAL_TEMPERATURE;

/// Stage 2: scale channel values around the neutral midpoint.
pub(crate) fn apply_contrast(data: &mut [f32], contrast: f32) {
    if (contrast - 1.0).abs() < f32::EPSILON {
        return;
    }

    for_each_chunk_mut(data, 3, move |px| {
        px[0] = clamp01((px[0] - 0.5) * contrast + 0.5);
        px[1] = clamp01((px[1] - 0.5) * contrast + 0.5);
        px[2] = clamp01((px[2] - 0.5) * contrast + 0.5);
    });
}

/// Stage 3: shift colors toward the target Kelvin temperature.
///
/// Multipliers are normalized against the 6500 K neutral so that the
/// default temperature is an exact identity, and only the red/blue axis
/// moves: the green channel (tint) is preserved.
pub(crate) fn apply_white_balance(data: &mut [f32], kelvin: f32) {
    let m = temperature_shift_multipliers(kelvin);
    if m == [1.0, 1.0, 1.0] {
        return;
    }

    for_each_chunk_mut(data, 3, move |px| {
        px[0] = clamp01(px[0] * m[0]);
        px[1] = clamp01(px[1] * m[1]);
        px[2] = clamp01(px[2] * m[2]);
    });
}

/// RGB multipliers that move a neutral-balanced image toward the look of
/// the given Kelvin temperature, identity at 6500 K.
pub fn temperature_shift_multipliers(kelvin: f32) -> [f32; 3] {
    if (kelvin - NEUTRAL_TEMPERATURE).abs() < f32::EPSILON {
        return [1.0, 1.0, 1.0];
    }

    let target = kelvin_to_rgb_multipliers(kelvin);
    let neutral = kelvin_to_rgb_multipliers(NEUTRAL_TEMPERATURE);
    [
        target[0] / neutral[0],
        1.0, // tint axis untouched
        target[2] / neutral[2],
    ]
}

/// Convert color temperature in Kelvin to RGB multipliers
///
/// Based on Tanner Helland's algorithm which approximates the Planckian
/// locus. Multipliers are normalized to green = 1.0; applying them warms
/// or cools a neutral image toward the given temperature.
#[allow(clippy::excessive_precision)] // Published constants from Tanner Helland algorithm
pub fn kelvin_to_rgb_multipliers(kelvin: f32) -> [f32; 3] {
    let temp = (kelvin / 100.0).clamp(10.0, 400.0);

    let (r, g, b) = if temp <= 66.0 {
        let r = 255.0;
        let g = 99.4708025861 * temp.ln() - 161.1195681661;
        let b = if temp <= 19.0 {
            0.0
        } else {
            138.5177312231 * (temp - 10.0).ln() - 305.0447927307
        };
        (r, g.clamp(0.0, 255.0), b.clamp(0.0, 255.0))
    } else {
        let r = 329.698727446 * (temp - 60.0).powf(-0.1332047592);
        let g = 288.1221695283 * (temp - 60.0).powf(-0.0755148492);
        let b = 255.0;
        (r.clamp(0.0, 255.0), g.clamp(0.0, 255.0), b)
    };

    let g_ref = (g / 255.0).max(0.001);
    [
        (r / 255.0).max(0.001) / g_ref,
        1.0,
        (b / 255.0).max(0.001) / g_ref,
    ]
}
