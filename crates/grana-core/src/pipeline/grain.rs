//! Stages 4-6: grain alpha, grain scale, and the soft-light blend.
//!
//! The cached noise field is weighted by a uniform alpha, pixelated into
//! blocks centered on the image, and composited over the graded base with
//! soft-light math.

use super::helpers::{clamp01, for_each_pixel_indexed};
use crate::noise::NoiseField;

/// Stage 4-5: sample the noise field at base resolution and pixelate it.
///
/// `block` is the edge length of one grain cell in pixels; the block grid
/// is aligned so a cell is centered on the image center. Block 1 leaves
/// the field at native resolution.
pub(crate) fn build_grain_plane(
    noise: &NoiseField,
    width: u32,
    height: u32,
    block: u32,
) -> Vec<f32> {
    let w = width as usize;
    let h = height as usize;

    let mut plane = Vec::with_capacity(w * h);
    for y in 0..height {
        for x in 0..width {
            plane.push(noise.at(x, y));
        }
    }

    if block > 1 {
        pixelate(&mut plane, w, h, block as usize);
    }
    plane
}

/// Replace each grid cell with its average value.
fn pixelate(plane: &mut [f32], width: usize, height: usize, block: usize) {
    let first = |center: usize| -> i64 {
        // Grid phase that centers one cell on the image center.
        let phase = (center as i64 - block as i64 / 2).rem_euclid(block as i64);
        if phase == 0 {
            0
        } else {
            phase - block as i64
        }
    };

    let mut cy = first(height / 2);
    while cy < height as i64 {
        let y0 = cy.max(0) as usize;
        let y1 = ((cy + block as i64) as usize).min(height);

        let mut cx = first(width / 2);
        while cx < width as i64 {
            let x0 = cx.max(0) as usize;
            let x1 = ((cx + block as i64) as usize).min(width);

            let mut sum = 0.0f64;
            for y in y0..y1 {
                for x in x0..x1 {
                    sum += plane[y * width + x] as f64;
                }
            }
            let avg = (sum / ((y1 - y0) * (x1 - x0)) as f64) as f32;
            for y in y0..y1 {
                for x in x0..x1 {
                    plane[y * width + x] = avg;
                }
            }

            cx += block as i64;
        }
        cy += block as i64;
    }
}

/// Stage 6: composite the alpha-weighted grain over the base.
///
/// Per channel soft-light: values near mid-gray leave the base alone,
/// darker grain darkens and lighter grain lightens. The uniform grain
/// alpha mixes the blended result back over the base.
pub(crate) fn soft_light_blend(base: &mut [f32], grain: &[f32], alpha: f32) {
    if alpha <= 0.0 {
        return;
    }

    for_each_pixel_indexed(base, 3, move |i, px| {
        let g = grain[i];
        for channel in px.iter_mut() {
            let b = *channel;
            let blended = if b <= 0.5 {
                2.0 * b * g + b * b * (1.0 - 2.0 * g)
            } else {
                b.sqrt() * (2.0 * g - 1.0) + 2.0 * b * (1.0 - g)
            };
            *channel = clamp01(b + alpha * (blended - b));
        }
    });
}
