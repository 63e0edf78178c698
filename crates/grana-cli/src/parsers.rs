//! Argument parsing helpers for colors and output paths.

use std::path::{Path, PathBuf};

use grana_core::color::parse_hex_rgb;
use grana_core::Rgb;

/// Parse a color argument as either hex ("#RRGGBB") or "R,G,B" floats.
pub fn parse_color(s: &str) -> Result<Rgb, String> {
    if !s.contains(',') {
        let [r, g, b] = parse_hex_rgb(s)?;
        return Ok(Rgb::new(r, g, b));
    }

    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!(
            "Color must be hex (#RRGGBB) or R,G,B (e.g., 0.0,0.5,0.5), got: {}",
            s
        ));
    }

    let mut rgb = [0.0f32; 3];
    for (slot, (part, name)) in rgb
        .iter_mut()
        .zip(parts.iter().zip(["Red", "Green", "Blue"]))
    {
        let value = part
            .trim()
            .parse::<f32>()
            .map_err(|_| format!("Invalid {} value: {}", name.to_lowercase(), part))?;
        if !(0.0..=1.0).contains(&value) {
            return Err(format!("{} value {} must be in range [0.0, 1.0]", name, value));
        }
        *slot = value;
    }

    Ok(Rgb::new(rgb[0], rgb[1], rgb[2]))
}

/// Determine the output path for a rendered image.
///
/// Uses the explicit path when given, otherwise derives one next to the
/// input with a "_graded" suffix and the requested extension.
pub fn determine_output_path(
    input: &Path,
    out: Option<PathBuf>,
    extension: &str,
) -> PathBuf {
    if let Some(out) = out {
        return out;
    }

    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    input.with_file_name(format!("{}_graded.{}", stem, extension))
}
