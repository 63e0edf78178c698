//! Preset prediction
//!
//! Runs the seven independent regressors over one feature vector and
//! assembles a proposed parameter set. Prediction is all-or-nothing: if
//! any single model fails, the whole prediction is discarded and the
//! caller's state stays untouched.

mod registry;


pub use registry::{ModelRegistry, RegressionModel, FEATURE_COUNT, MODEL_NAMES};

use crate::features::ImageFeatures;
use crate::models::{EditParams, ParamField, PredictedPreset};
use crate::verbose_println;

/// Predict a preset from extracted features.
///
/// Returns `None` when any model fails; never a partial result.
pub fn predict_preset(registry: &ModelRegistry, features: &ImageFeatures) -> Option<PredictedPreset> {
    let run = |model: &RegressionModel| -> Option<f32> {
        match model.predict(features) {
            Ok(value) => Some(value),
            Err(e) => {
                verbose_println!("[grana] preset prediction aborted: {}", e);
                None
            }
        }
    };

    Some(PredictedPreset {
        grain_alpha: run(&registry.grain_alpha)?,
        grain_scale: run(&registry.grain_scale)?,
        contrast: run(&registry.contrast)?,
        temperature: run(&registry.temperature)?,
        threshold: run(&registry.threshold)?,
        bright_alpha: run(&registry.bright_alpha)?,
        dark_alpha: run(&registry.dark_alpha)?,
    })
}

/// Fold a prediction into a parameter set.
///
/// Scalar controls are assigned directly (clamped). The tone overlays are
/// only activated when their predicted alpha is nonzero, and the threshold
/// is taken from the prediction only when both overlays activate.
pub fn apply_prediction(params: &mut EditParams, preset: &PredictedPreset) {
    params.set_field(ParamField::GrainAlpha, preset.grain_alpha);
    params.set_field(ParamField::GrainScale, preset.grain_scale);
    params.set_field(ParamField::Contrast, preset.contrast);
    params.set_field(ParamField::Temperature, preset.temperature);

    let dark_on = preset.dark_alpha != 0.0;
    let bright_on = preset.bright_alpha != 0.0;

    if dark_on {
        params.set_field(ParamField::DarkAlpha, preset.dark_alpha);
        params.is_on_dark_color = true;
    }
    if bright_on {
        params.set_field(ParamField::BrightAlpha, preset.bright_alpha);
        params.is_on_bright_color = true;
    }
    if dark_on && bright_on {
        params.set_field(ParamField::Threshold, preset.threshold);
    }
}
