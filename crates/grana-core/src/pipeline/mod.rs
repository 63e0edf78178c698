//! Render pipeline
//!
//! The fixed six-stage compositing sequence:
//! color grade → contrast → white balance → grain alpha → grain scale →
//! soft-light blend. Every render executes all stages in order on a fresh
//! copy of the base; there is no incremental re-render. The output is a
//! pure function of (context, base, noise, params).

mod adjust;
mod color_grade;
mod grain;
mod helpers;


pub use adjust::{kelvin_to_rgb_multipliers, temperature_shift_multipliers};

use crate::config::CoreDefaults;
use crate::decoders::DecodedImage;
use crate::models::{EditParams, NEUTRAL_TEMPERATURE};
use crate::noise::NoiseField;

use color_grade::GradeOverlay;

/// Explicit render resource handle.
///
/// Replaces the source's process-wide cached GPU context: the pipeline
/// owns no global state, callers pass the handle in. A stub handle with
/// any reference dimension is enough for tests.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Long-side reference resolution the grain block size scales against.
    pub reference_dim: u32,
}

impl RenderContext {
    pub fn new(defaults: &CoreDefaults) -> Self {
        Self {
            reference_dim: defaults.reference_dim.max(1),
        }
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(&CoreDefaults::default())
    }
}

/// Result of one full pipeline pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFrame {
    /// Image width
    pub width: u32,

    /// Image height
    pub height: u32,

    /// Composited RGB data (f32, 0.0-1.0)
    pub data: Vec<f32>,

    /// Number of channels
    pub channels: u8,
}

/// Mute-resolved effective parameters.
///
/// Mute flags never mutate the stored [`EditParams`]; they are folded into
/// the effective values here, at the pipeline boundary, and nowhere else.
struct Effective {
    overlay: GradeOverlay,
    contrast: f32,
    temperature: f32,
    grain_alpha: f32,
    grain_scale: f32,
}

impl Effective {
    fn resolve(params: &EditParams) -> Self {
        let tone_on = !params.is_tone_mute;
        Self {
            overlay: GradeOverlay {
                threshold: params.threshold,
                dark_color: params.dark_color,
                dark_alpha: if params.is_on_dark_color && tone_on {
                    params.dark_alpha
                } else {
                    0.0
                },
                bright_color: params.bright_color,
                bright_alpha: if params.is_on_bright_color && tone_on {
                    params.bright_alpha
                } else {
                    0.0
                },
            },
            contrast: if params.is_adjust_mute {
                1.0
            } else {
                params.contrast
            },
            temperature: if params.is_adjust_mute {
                NEUTRAL_TEMPERATURE
            } else {
                params.temperature
            },
            grain_alpha: if params.is_grain_mute {
                0.0
            } else {
                params.grain_alpha
            },
            grain_scale: params.grain_scale,
        }
    }
}

/// Execute the full six-stage pipeline.
///
/// Pure given its inputs; safe to call concurrently on captured snapshots
/// of the parameters.
pub fn render(
    ctx: &RenderContext,
    base: &DecodedImage,
    noise: &NoiseField,
    params: &EditParams,
) -> RenderedFrame {
    let fx = Effective::resolve(params);
    let mut data = base.data.clone();

    // Stages 1-3 on the base plane.
    color_grade::apply(&mut data, &fx.overlay);
    adjust::apply_contrast(&mut data, fx.contrast);
    adjust::apply_white_balance(&mut data, fx.temperature);

    // Stages 4-6: grain plane, pixelation, blend. With alpha 0 the grain
    // contributes nothing and the whole branch is skipped.
    if fx.grain_alpha > 0.0 {
        let block = grain_block_size(ctx, base.long_side(), fx.grain_scale);
        let plane = grain::build_grain_plane(noise, base.width, base.height, block);
        grain::soft_light_blend(&mut data, &plane, fx.grain_alpha);
    }

    RenderedFrame {
        width: base.width,
        height: base.height,
        data,
        channels: 3,
    }
}

/// Grain cell edge length in pixels for a given source size.
///
/// Scales the user-facing grain_scale control by the ratio of the source
/// long side to the reference resolution, so grain looks the same at
/// preview and export sizes.
pub fn grain_block_size(ctx: &RenderContext, long_side: u32, grain_scale: f32) -> u32 {
    let ratio = long_side as f32 / ctx.reference_dim as f32;
    ((grain_scale * ratio).round() as u32).max(1)
}
