//! Data models for grana
//!
//! The editable parameter set, its clamping rules, and the preset
//! prediction produced by the regression models.

use serde::{Deserialize, Serialize};

/// A plain RGB color in normalized [0, 1] components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// Default highlight overlay color (warm orange).
pub const DEFAULT_BRIGHT_COLOR: Rgb = Rgb::new(1.0, 0.56, 0.0);

/// Default shadow overlay color (teal).
pub const DEFAULT_DARK_COLOR: Rgb = Rgb::new(0.0, 0.5, 0.5);

/// Neutral color temperature in Kelvin.
pub const NEUTRAL_TEMPERATURE: f32 = 6500.0;

/// The full editable parameter set for one editing session.
///
/// Numeric fields are clamped to their declared range whenever they are
/// assigned through [`EditParams::set_field`]; the mute flags never alter
/// the stored values and are interpreted only by the render pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditParams {
    // Grain
    /// Grain opacity, 0.0-1.0.
    #[serde(default)]
    pub grain_alpha: f32,

    /// Grain block scale, 1.0-3.0.
    #[serde(default = "default_grain_scale")]
    pub grain_scale: f32,

    /// Mutes the grain layer (renders as alpha 0).
    #[serde(default)]
    pub is_grain_mute: bool,

    // Adjust
    /// Contrast factor about the midpoint, 0.8-1.2.
    #[serde(default = "default_contrast")]
    pub contrast: f32,

    /// White balance target in Kelvin, 2000-10000.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Mutes contrast and temperature (renders as 1.0 / 6500 K).
    #[serde(default)]
    pub is_adjust_mute: bool,

    // Tone
    /// Luminance threshold splitting shadows from highlights, 0.0-1.0.
    #[serde(default = "default_threshold")]
    pub threshold: f32,

    /// Enables the highlight overlay.
    #[serde(default)]
    pub is_on_bright_color: bool,

    /// Highlight overlay color.
    #[serde(default = "default_bright_color")]
    pub bright_color: Rgb,

    /// Highlight overlay opacity, 0.0-1.0.
    #[serde(default = "default_half")]
    pub bright_alpha: f32,

    /// Enables the shadow overlay.
    #[serde(default)]
    pub is_on_dark_color: bool,

    /// Shadow overlay color.
    #[serde(default = "default_dark_color")]
    pub dark_color: Rgb,

    /// Shadow overlay opacity, 0.0-1.0.
    #[serde(default = "default_half")]
    pub dark_alpha: f32,

    /// Mutes both tone overlays (renders both alphas as 0).
    #[serde(default)]
    pub is_tone_mute: bool,
}

fn default_grain_scale() -> f32 {
    1.0
}

fn default_contrast() -> f32 {
    1.0
}

fn default_temperature() -> f32 {
    NEUTRAL_TEMPERATURE
}

fn default_threshold() -> f32 {
    0.5
}

fn default_half() -> f32 {
    0.5
}

fn default_bright_color() -> Rgb {
    DEFAULT_BRIGHT_COLOR
}

fn default_dark_color() -> Rgb {
    DEFAULT_DARK_COLOR
}

impl Default for EditParams {
    fn default() -> Self {
        Self {
            grain_alpha: 0.0,
            grain_scale: default_grain_scale(),
            is_grain_mute: false,
            contrast: default_contrast(),
            temperature: default_temperature(),
            is_adjust_mute: false,
            threshold: default_threshold(),
            is_on_bright_color: false,
            bright_color: default_bright_color(),
            bright_alpha: default_half(),
            is_on_dark_color: false,
            dark_color: default_dark_color(),
            dark_alpha: default_half(),
            is_tone_mute: false,
        }
    }
}

/// Identifies one clamped numeric control of [`EditParams`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamField {
    GrainAlpha,
    GrainScale,
    Contrast,
    Temperature,
    Threshold,
    BrightAlpha,
    DarkAlpha,
}

impl ParamField {
    /// Declared (min, max) range of this control.
    pub fn range(self) -> (f32, f32) {
        match self {
            Self::GrainAlpha => (0.0, 1.0),
            Self::GrainScale => (1.0, 3.0),
            Self::Contrast => (0.8, 1.2),
            Self::Temperature => (2000.0, 10000.0),
            Self::Threshold => (0.0, 1.0),
            Self::BrightAlpha => (0.0, 1.0),
            Self::DarkAlpha => (0.0, 1.0),
        }
    }

    /// Clamp a candidate value into this control's range.
    pub fn clamp(self, value: f32) -> f32 {
        let (min, max) = self.range();
        if value.is_nan() {
            return min;
        }
        value.clamp(min, max)
    }
}

impl EditParams {
    /// Assign a numeric control, clamping to its declared range.
    ///
    /// Out-of-range input is never rejected, only clamped.
    pub fn set_field(&mut self, field: ParamField, value: f32) {
        let value = field.clamp(value);
        match field {
            ParamField::GrainAlpha => self.grain_alpha = value,
            ParamField::GrainScale => self.grain_scale = value,
            ParamField::Contrast => self.contrast = value,
            ParamField::Temperature => self.temperature = value,
            ParamField::Threshold => self.threshold = value,
            ParamField::BrightAlpha => self.bright_alpha = value,
            ParamField::DarkAlpha => self.dark_alpha = value,
        }
    }

    /// Read a numeric control.
    pub fn field(&self, field: ParamField) -> f32 {
        match field {
            ParamField::GrainAlpha => self.grain_alpha,
            ParamField::GrainScale => self.grain_scale,
            ParamField::Contrast => self.contrast,
            ParamField::Temperature => self.temperature,
            ParamField::Threshold => self.threshold,
            ParamField::BrightAlpha => self.bright_alpha,
            ParamField::DarkAlpha => self.dark_alpha,
        }
    }

    /// Re-clamp every numeric field. Used after deserializing presets
    /// that may carry hand-edited values.
    pub fn sanitize(&mut self) {
        for field in [
            ParamField::GrainAlpha,
            ParamField::GrainScale,
            ParamField::Contrast,
            ParamField::Temperature,
            ParamField::Threshold,
            ParamField::BrightAlpha,
            ParamField::DarkAlpha,
        ] {
            self.set_field(field, self.field(field));
        }
    }
}

/// Output of the preset predictor: one value per predictable control.
///
/// Ranges match the corresponding [`EditParams`] fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictedPreset {
    pub grain_alpha: f32,
    pub grain_scale: f32,
    pub contrast: f32,
    pub temperature: f32,
    pub threshold: f32,
    pub bright_alpha: f32,
    pub dark_alpha: f32,
}
