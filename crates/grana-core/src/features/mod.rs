//! Image feature extraction
//!
//! Computes the nine scalar statistics the preset predictor consumes.
//! Every statistic is taken on a bounded thumbnail (longest side ≤128 px
//! by default): the numbers only feed regression models, so bounded cost
//! wins over pixel-exactness. Extraction is deterministic for a given
//! bitmap.

mod histogram;

#[cfg(test)]
mod tests;

use crate::color::{luminance, rgb_to_hue, rgb_to_saturation};
use crate::decoders::DecodedImage;

use histogram::Histogram;

/// Default longest side of the analysis thumbnail.
pub const DEFAULT_THUMBNAIL_DIM: u32 = 128;

const LUMA_BINS: usize = 64;
const CHANNEL_BINS: usize = 32;
const SATURATION_BINS: usize = 32;
const HUE_BINS: usize = 36;

/// Luminance above which a pixel counts as a highlight.
const HIGHLIGHT_CUTOFF: f32 = 0.9;

/// Luminance below which a pixel counts as a shadow.
const SHADOW_CUTOFF: f32 = 0.1;

/// The nine-scalar statistical summary of an image.
///
/// All values are in [0, 1]; hue statistics are bounded by construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageFeatures {
    /// Mean luminance.
    pub avg_luma: f32,

    /// Standard deviation of the 64-bin luminance histogram.
    pub rms_contrast: f32,

    /// Per-channel histogram variance, averaged over R, G, B.
    pub color_var: f32,

    /// Standard deviation of a 2x-boosted saturation histogram.
    pub sat_std_dev: f32,

    /// Fraction of pixels with luminance above 0.9.
    pub highlights: f32,

    /// Fraction of pixels with luminance below 0.1.
    pub shadows: f32,

    /// `max(0, 1 - highlights - shadows)`.
    pub midtone_ratio: f32,

    /// Mean of the 36-bin hue histogram, hue in [0, 1).
    pub mean_hue: f32,

    /// Variance of the hue histogram.
    pub hue_variance: f32,
}

impl ImageFeatures {
    /// The feature vector in the order every regression model expects.
    pub fn to_vector(self) -> [f32; 9] {
        [
            self.avg_luma,
            self.rms_contrast,
            self.color_var,
            self.sat_std_dev,
            self.highlights,
            self.shadows,
            self.midtone_ratio,
            self.mean_hue,
            self.hue_variance,
        ]
    }
}

/// Extract features on a thumbnail bounded to [`DEFAULT_THUMBNAIL_DIM`].
pub fn extract_features(image: &DecodedImage) -> Option<ImageFeatures> {
    extract_features_with(image, DEFAULT_THUMBNAIL_DIM)
}

/// Extract features with an explicit thumbnail bound.
///
/// Returns `None` for a degenerate image (no pixels / zero histogram
/// mass). Never partial: either all nine statistics or nothing.
pub fn extract_features_with(image: &DecodedImage, thumbnail_dim: u32) -> Option<ImageFeatures> {
    let thumb = image.downscale_to(thumbnail_dim);
    let pixel_count = (thumb.width as usize) * (thumb.height as usize);
    if pixel_count == 0 || thumb.data.len() < pixel_count * 3 {
        return None;
    }

    let px = |i: usize| (thumb.data[i * 3], thumb.data[i * 3 + 1], thumb.data[i * 3 + 2]);

    // Mean luminance plus the tonal-distribution counts in one pass.
    let mut luma_sum = 0.0f64;
    let mut highlight_count = 0usize;
    let mut shadow_count = 0usize;
    let mut luma_hist = Histogram::new(LUMA_BINS);

    for i in 0..pixel_count {
        let (r, g, b) = px(i);
        let l = luminance(r, g, b);
        luma_sum += l as f64;
        if l > HIGHLIGHT_CUTOFF {
            highlight_count += 1;
        } else if l < SHADOW_CUTOFF {
            shadow_count += 1;
        }
        luma_hist.add(l);
    }

    let avg_luma = (luma_sum / pixel_count as f64) as f32;
    let luma_scale = 1.0 / (LUMA_BINS - 1) as f32;
    let (_, luma_variance) = luma_hist.stats(luma_scale)?;
    let rms_contrast = luma_variance.sqrt();

    // Per-channel variance, averaged.
    let channel_scale = 1.0 / (CHANNEL_BINS - 1) as f32;
    let mut channel_variance_sum = 0.0f32;
    for channel in 0..3 {
        let hist = Histogram::accumulate(CHANNEL_BINS, pixel_count, |i| {
            thumb.data[i * 3 + channel]
        });
        let (_, variance) = hist.stats(channel_scale)?;
        channel_variance_sum += variance;
    }
    let color_var = channel_variance_sum / 3.0;

    // Saturation spread, boosted 2x before binning.
    let sat_hist = Histogram::accumulate(SATURATION_BINS, pixel_count, |i| {
        let (r, g, b) = px(i);
        rgb_to_saturation(r, g, b) * 2.0
    });
    let sat_scale = 1.0 / (SATURATION_BINS - 1) as f32;
    let (_, sat_variance) = sat_hist.stats(sat_scale)?;
    let sat_std_dev = sat_variance.sqrt();

    // Tonal distribution.
    let highlights = highlight_count as f32 / pixel_count as f32;
    let shadows = shadow_count as f32 / pixel_count as f32;
    let midtone_ratio = (1.0 - highlights - shadows).max(0.0);

    // Hue statistics; bin centers divide by the bin count.
    let hue_hist = Histogram::accumulate(HUE_BINS, pixel_count, |i| {
        let (r, g, b) = px(i);
        rgb_to_hue(r, g, b)
    });
    let (mean_hue, hue_variance) = hue_hist.stats(1.0 / HUE_BINS as f32)?;

    Some(ImageFeatures {
        avg_luma,
        rms_contrast,
        color_var,
        sat_std_dev,
        highlights,
        shadows,
        midtone_ratio,
        mean_hue,
        hue_variance,
    })
}
