use std::path::PathBuf;

use serde::Serialize;

/// Analysis result structure for JSON output.
///
/// Contains image metadata and the extracted feature vector the preset
/// predictor consumes, serializable to JSON for machine-readable output.
#[derive(Serialize)]
pub struct AnalysisResult {
    pub file: String,
    pub dimensions: [u32; 2],
    pub features: FeatureReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_preset: Option<PresetReport>,
}

/// The nine-scalar feature vector for JSON output.
#[derive(Serialize)]
pub struct FeatureReport {
    pub avg_luma: f32,
    pub rms_contrast: f32,
    pub color_var: f32,
    pub sat_std_dev: f32,
    pub highlights: f32,
    pub shadows: f32,
    pub midtone_ratio: f32,
    pub mean_hue: f32,
    pub hue_variance: f32,
}

/// Predicted control values for JSON output.
#[derive(Serialize)]
pub struct PresetReport {
    pub grain_alpha: f32,
    pub grain_scale: f32,
    pub contrast: f32,
    pub temperature: f32,
    pub threshold: f32,
    pub bright_alpha: f32,
    pub dark_alpha: f32,
}

/// Execute the analyze command to inspect an image.
///
/// Extracts the feature vector used by the preset predictor and, with
/// `predict` set, runs the regression models over it. Output can be
/// displayed as human-readable text or printed as JSON.
pub fn cmd_analyze(
    input: PathBuf,
    predict: bool,
    json_output: bool,
    verbose: bool,
) -> Result<(), String> {
    if verbose {
        grana_core::config::set_verbose(true);
    }

    let decoded = grana_core::decoders::decode_image(&input)?;

    let features = grana_core::features::extract_features(&decoded)
        .ok_or_else(|| format!("Image {} has no analyzable pixels", input.display()))?;

    let predicted = if predict {
        let registry = grana_core::ModelRegistry::load_builtin()?;
        grana_core::predict::predict_preset(&registry, &features)
    } else {
        None
    };

    let result = AnalysisResult {
        file: input.display().to_string(),
        dimensions: [decoded.width, decoded.height],
        features: FeatureReport {
            avg_luma: features.avg_luma,
            rms_contrast: features.rms_contrast,
            color_var: features.color_var,
            sat_std_dev: features.sat_std_dev,
            highlights: features.highlights,
            shadows: features.shadows,
            midtone_ratio: features.midtone_ratio,
            mean_hue: features.mean_hue,
            hue_variance: features.hue_variance,
        },
        predicted_preset: predicted.map(|p| PresetReport {
            grain_alpha: p.grain_alpha,
            grain_scale: p.grain_scale,
            contrast: p.contrast,
            temperature: p.temperature,
            threshold: p.threshold,
            bright_alpha: p.bright_alpha,
            dark_alpha: p.dark_alpha,
        }),
    };

    if json_output {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| format!("Failed to serialize analysis: {}", e))?;
        println!("{}", json);
    } else {
        println!("Analyzing: {}\n", input.display());

        println!("Image Info:");
        println!("  Dimensions: {}x{}", decoded.width, decoded.height);

        println!("\nFeatures:");
        println!("  Average luminance: {:.4}", result.features.avg_luma);
        println!("  RMS contrast:      {:.4}", result.features.rms_contrast);
        println!("  Color variance:    {:.4}", result.features.color_var);
        println!("  Saturation spread: {:.4}", result.features.sat_std_dev);
        println!("  Highlights:        {:.4}", result.features.highlights);
        println!("  Shadows:           {:.4}", result.features.shadows);
        println!("  Midtone ratio:     {:.4}", result.features.midtone_ratio);
        println!("  Mean hue:          {:.4}", result.features.mean_hue);
        println!("  Hue variance:      {:.4}", result.features.hue_variance);

        if predict {
            match &result.predicted_preset {
                Some(p) => {
                    println!("\nPredicted Preset:");
                    println!("  Grain alpha:  {:.4}", p.grain_alpha);
                    println!("  Grain scale:  {:.4}", p.grain_scale);
                    println!("  Contrast:     {:.4}", p.contrast);
                    println!("  Temperature:  {:.0} K", p.temperature);
                    println!("  Threshold:    {:.4}", p.threshold);
                    println!("  Bright alpha: {:.4}", p.bright_alpha);
                    println!("  Dark alpha:   {:.4}", p.dark_alpha);
                }
                None => println!("\nPredicted Preset: unavailable for this image"),
            }
        }
    }

    Ok(())
}
