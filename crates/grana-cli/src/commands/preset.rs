use std::path::PathBuf;

use grana_core::EditParams;

/// List available parameter presets in the specified or default directory.
pub fn cmd_preset_list(dir: Option<PathBuf>) -> Result<(), String> {
    let dir = dir.unwrap_or_else(|| {
        grana_core::presets::get_presets_dir().unwrap_or_else(|_| PathBuf::from("presets"))
    });

    println!("Listing presets in: {}", dir.display());
    match grana_core::presets::list_presets(&dir) {
        Ok(presets) => {
            if presets.is_empty() {
                println!("No presets found.");
            } else {
                for preset in presets {
                    println!("  {}", preset);
                }
            }
            Ok(())
        }
        Err(e) => Err(format!("Failed to list presets: {}", e)),
    }
}

/// Display the control values stored in a preset.
pub fn cmd_preset_show(preset: String) -> Result<(), String> {
    println!("Loading preset: {}", preset);

    // Try to load as file first
    let preset_path = PathBuf::from(&preset);
    let params = if preset_path.exists() {
        grana_core::presets::load_preset(&preset_path)?
    } else {
        // Validate preset name before constructing path to prevent path traversal
        grana_core::presets::validate_preset_name(&preset)?;
        // Try to find it in the presets directory
        let dir = grana_core::presets::get_presets_dir()
            .unwrap_or_else(|_| PathBuf::from("presets"));
        let full_path = dir.join(format!("{}.yml", preset));
        grana_core::presets::load_preset(&full_path)?
    };

    println!("\nGrain:");
    println!("  Alpha: {:.4}{}", params.grain_alpha, mute_tag(params.is_grain_mute));
    println!("  Scale: {:.4}", params.grain_scale);

    println!("\nAdjust:");
    println!("  Contrast:    {:.4}{}", params.contrast, mute_tag(params.is_adjust_mute));
    println!("  Temperature: {:.0} K", params.temperature);

    println!("\nTone:");
    println!("  Threshold: {:.4}{}", params.threshold, mute_tag(params.is_tone_mute));
    println!(
        "  Bright: {} color=[{:.3}, {:.3}, {:.3}] alpha={:.4}",
        on_tag(params.is_on_bright_color),
        params.bright_color.r,
        params.bright_color.g,
        params.bright_color.b,
        params.bright_alpha
    );
    println!(
        "  Dark:   {} color=[{:.3}, {:.3}, {:.3}] alpha={:.4}",
        on_tag(params.is_on_dark_color),
        params.dark_color.r,
        params.dark_color.g,
        params.dark_color.b,
        params.dark_alpha
    );

    Ok(())
}

/// Create a new preset template with default control values.
pub fn cmd_preset_create(output: PathBuf, name: String) -> Result<(), String> {
    grana_core::presets::validate_preset_name(&name)?;

    let params = EditParams::default();
    grana_core::presets::save_preset(&params, &output)?;

    println!("Created preset template: {}", output.display());
    println!("Edit the file to adjust control values, then apply it with:");
    println!("  grana render <input> --preset {}", output.display());

    Ok(())
}

fn mute_tag(muted: bool) -> &'static str {
    if muted {
        " (muted)"
    } else {
        ""
    }
}

fn on_tag(on: bool) -> &'static str {
    if on {
        "on, "
    } else {
        "off,"
    }
}
