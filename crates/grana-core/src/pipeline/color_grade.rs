//! Stage 1: luminance-threshold color grading
//!
//! Splits the image into shadows and highlights at a luminance threshold
//! and composites a per-side tint over the base with standard alpha-over
//! math. This is the CPU form of the source's single-purpose color kernel:
//! a pure per-pixel function of (pixel, threshold, colors).

use super::helpers::for_each_chunk_mut;
use crate::color::luminance;
use crate::models::Rgb;

/// Resolved overlay settings after mute evaluation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GradeOverlay {
    pub threshold: f32,
    pub dark_color: Rgb,
    pub dark_alpha: f32,
    pub bright_color: Rgb,
    pub bright_alpha: f32,
}

impl GradeOverlay {
    /// True when neither side contributes, letting the stage short-circuit.
    fn is_identity(&self) -> bool {
        self.dark_alpha <= 0.0 && self.bright_alpha <= 0.0
    }
}

/// Apply the threshold overlay to interleaved RGB data.
pub(crate) fn apply(data: &mut [f32], overlay: &GradeOverlay) {
    if overlay.is_identity() {
        return;
    }

    let o = *overlay;
    for_each_chunk_mut(data, 3, move |px| {
        let l = luminance(px[0], px[1], px[2]);
        let (color, alpha) = if l < o.threshold {
            (o.dark_color, o.dark_alpha)
        } else {
            (o.bright_color, o.bright_alpha)
        };

        px[0] = color.r * alpha + px[0] * (1.0 - alpha);
        px[1] = color.g * alpha + px[1] * (1.0 - alpha);
        px[2] = color.b * alpha + px[2] * (1.0 - alpha);
    });
}
