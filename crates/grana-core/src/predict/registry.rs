//! Regression model registry
//!
//! Loads the seven pre-trained regressors the preset predictor runs. The
//! models are opaque artifacts shipped as YAML (weights, intercept, output
//! clamp range) and validated against the fixed feature-vector shape.
//!
//! Invariant: the registry holds exactly the seven known models or nothing.
//! A missing or malformed model is a fatal load error; the predictor never
//! runs on a partial model set.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::features::ImageFeatures;

/// Length of the feature vector every model consumes.
pub const FEATURE_COUNT: usize = 9;

/// The seven model names the registry requires, in prediction order.
pub const MODEL_NAMES: [&str; 7] = [
    "grain_alpha",
    "grain_scale",
    "contrast",
    "temperature",
    "threshold",
    "bright_alpha",
    "dark_alpha",
];

/// Builtin model file compiled into the crate.
const BUILTIN_MODELS: &str = include_str!("../../models/preset_models.yml");

/// One pre-trained linear regressor.
#[derive(Debug, Clone, Deserialize)]
pub struct RegressionModel {
    #[serde(skip)]
    pub name: String,

    /// One weight per feature, in feature-vector order.
    pub weights: Vec<f32>,

    pub intercept: f32,

    /// Output clamp range; matches the target control's declared range.
    pub output_min: f32,
    pub output_max: f32,
}

impl RegressionModel {
    fn validate(&self) -> Result<(), String> {
        if self.weights.len() != FEATURE_COUNT {
            return Err(format!(
                "Model \"{}\" has {} weights, expected {}",
                self.name,
                self.weights.len(),
                FEATURE_COUNT
            ));
        }
        if self.weights.iter().any(|w| !w.is_finite()) || !self.intercept.is_finite() {
            return Err(format!("Model \"{}\" has non-finite coefficients", self.name));
        }
        if !(self.output_min <= self.output_max) {
            return Err(format!(
                "Model \"{}\" has inverted output range [{}, {}]",
                self.name, self.output_min, self.output_max
            ));
        }
        Ok(())
    }

    /// Evaluate the regressor on a feature vector.
    ///
    /// Fails on a non-finite result rather than producing garbage; the
    /// caller treats any single failure as aborting the whole prediction.
    pub fn predict(&self, features: &ImageFeatures) -> Result<f32, String> {
        let vector = features.to_vector();
        let mut value = self.intercept;
        for (w, x) in self.weights.iter().zip(vector.iter()) {
            value += w * x;
        }

        if !value.is_finite() {
            return Err(format!("Model \"{}\" produced a non-finite value", self.name));
        }
        Ok(value.clamp(self.output_min, self.output_max))
    }
}

/// The full seven-model set.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    pub grain_alpha: RegressionModel,
    pub grain_scale: RegressionModel,
    pub contrast: RegressionModel,
    pub temperature: RegressionModel,
    pub threshold: RegressionModel,
    pub bright_alpha: RegressionModel,
    pub dark_alpha: RegressionModel,
}

impl ModelRegistry {
    /// Load the models compiled into the crate.
    pub fn load_builtin() -> Result<Self, String> {
        Self::from_yaml(BUILTIN_MODELS)
    }

    /// Load a model file from disk.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read model file {}: {}", path.display(), e))?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate a model set.
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let mut specs: BTreeMap<String, RegressionModel> =
            serde_yaml::from_str(yaml).map_err(|e| format!("Failed to parse model file: {}", e))?;

        let mut take = |name: &str| -> Result<RegressionModel, String> {
            let mut model = specs
                .remove(name)
                .ok_or_else(|| format!("Model file is missing required model \"{}\"", name))?;
            model.name = name.to_string();
            model.validate()?;
            Ok(model)
        };

        let registry = Self {
            grain_alpha: take("grain_alpha")?,
            grain_scale: take("grain_scale")?,
            contrast: take("contrast")?,
            temperature: take("temperature")?,
            threshold: take("threshold")?,
            bright_alpha: take("bright_alpha")?,
            dark_alpha: take("dark_alpha")?,
        };

        if let Some(extra) = specs.keys().next() {
            return Err(format!("Model file contains unknown model \"{}\"", extra));
        }

        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_features(value: f32) -> ImageFeatures {
        ImageFeatures {
            avg_luma: value,
            rms_contrast: value,
            color_var: value,
            sat_std_dev: value,
            highlights: value,
            shadows: value,
            midtone_ratio: value,
            mean_hue: value,
            hue_variance: value,
        }
    }

    #[test]
    fn test_builtin_models_load() {
        let registry = ModelRegistry::load_builtin().unwrap();
        assert_eq!(registry.grain_alpha.name, "grain_alpha");
        assert_eq!(registry.temperature.weights.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_builtin_outputs_stay_in_declared_ranges() {
        let registry = ModelRegistry::load_builtin().unwrap();
        for value in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let f = flat_features(value);
            let alpha = registry.grain_alpha.predict(&f).unwrap();
            assert!((0.0..=1.0).contains(&alpha));
            let scale = registry.grain_scale.predict(&f).unwrap();
            assert!((1.0..=3.0).contains(&scale));
            let contrast = registry.contrast.predict(&f).unwrap();
            assert!((0.8..=1.2).contains(&contrast));
            let kelvin = registry.temperature.predict(&f).unwrap();
            assert!((2000.0..=10_000.0).contains(&kelvin));
        }
    }

    #[test]
    fn test_missing_model_is_fatal() {
        let yaml = r#"
grain_alpha:
  weights: [0, 0, 0, 0, 0, 0, 0, 0, 0]
  intercept: 0.5
  output_min: 0.0
  output_max: 1.0
"#;
        let err = ModelRegistry::from_yaml(yaml).unwrap_err();
        assert!(err.contains("missing required model"), "{}", err);
    }

    #[test]
    fn test_wrong_weight_count_is_fatal() {
        let mut yaml = String::new();
        for name in MODEL_NAMES {
            let weights = if name == "threshold" {
                "[0.1, 0.2]".to_string()
            } else {
                "[0, 0, 0, 0, 0, 0, 0, 0, 0]".to_string()
            };
            yaml.push_str(&format!(
                "{}:\n  weights: {}\n  intercept: 0.5\n  output_min: 0.0\n  output_max: 1.0\n",
                name, weights
            ));
        }
        let err = ModelRegistry::from_yaml(&yaml).unwrap_err();
        assert!(err.contains("threshold"), "{}", err);
    }

    #[test]
    fn test_unknown_model_is_fatal() {
        let mut yaml = String::new();
        for name in MODEL_NAMES.iter().chain(["mystery"].iter()) {
            yaml.push_str(&format!(
                "{}:\n  weights: [0, 0, 0, 0, 0, 0, 0, 0, 0]\n  intercept: 0.0\n  output_min: 0.0\n  output_max: 1.0\n",
                name
            ));
        }
        let err = ModelRegistry::from_yaml(&yaml).unwrap_err();
        assert!(err.contains("unknown model"), "{}", err);
    }

    #[test]
    fn test_predict_clamps_to_output_range() {
        let model = RegressionModel {
            name: "test".to_string(),
            weights: vec![10.0; FEATURE_COUNT],
            intercept: 0.0,
            output_min: 0.0,
            output_max: 1.0,
        };
        let value = model.predict(&flat_features(1.0)).unwrap();
        assert_eq!(value, 1.0);
    }
}
