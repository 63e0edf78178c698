//! Preset management
//!
//! Save and load named parameter sets as YAML files.

use std::path::Path;

use crate::models::EditParams;

/// Validate a preset name to prevent path traversal attacks.
/// Rejects names containing path separators, "..", or other dangerous patterns.
pub fn validate_preset_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Preset name cannot be empty".to_string());
    }

    // Reject path separators
    if name.contains('/') || name.contains('\\') {
        return Err("Preset name cannot contain path separators".to_string());
    }

    // Reject parent directory references
    if name.contains("..") {
        return Err("Preset name cannot contain '..'".to_string());
    }

    // Reject names that start with a dot (hidden files)
    if name.starts_with('.') {
        return Err("Preset name cannot start with '.'".to_string());
    }

    // Reject null bytes
    if name.contains('\0') {
        return Err("Preset name cannot contain null bytes".to_string());
    }

    Ok(())
}

/// Load a parameter preset from a YAML file.
///
/// Numeric fields are re-clamped on load; hand-edited files cannot smuggle
/// out-of-range values into a session.
pub fn load_preset<P: AsRef<Path>>(path: P) -> Result<EditParams, String> {
    let path = path.as_ref();
    let contents =
        std::fs::read_to_string(path).map_err(|e| format!("Failed to read preset file: {}", e))?;

    let mut params: EditParams = serde_yaml::from_str(&contents)
        .map_err(|e| format!("Failed to parse preset YAML: {}", e))?;
    params.sanitize();
    Ok(params)
}

/// Save a parameter preset to a YAML file
pub fn save_preset<P: AsRef<Path>>(params: &EditParams, path: P) -> Result<(), String> {
    let path = path.as_ref();
    let yaml =
        serde_yaml::to_string(params).map_err(|e| format!("Failed to serialize preset: {}", e))?;

    std::fs::write(path, yaml).map_err(|e| format!("Failed to write preset file: {}", e))
}

/// List all available presets in a directory
pub fn list_presets<P: AsRef<Path>>(dir: P) -> Result<Vec<String>, String> {
    let dir = dir.as_ref();
    let mut presets = Vec::new();

    let entries =
        std::fs::read_dir(dir).map_err(|e| format!("Failed to read presets directory: {}", e))?;

    for entry in entries {
        let entry = entry.map_err(|e| format!("Failed to read directory entry: {}", e))?;
        let path = entry.path();

        if path.extension().and_then(|e| e.to_str()) == Some("yml")
            || path.extension().and_then(|e| e.to_str()) == Some("yaml")
        {
            if let Some(name) = path.file_stem().and_then(|n| n.to_str()) {
                presets.push(name.to_string());
            }
        }
    }

    Ok(presets)
}

/// Get the default presets directory
pub fn get_presets_dir() -> Result<std::path::PathBuf, String> {
    let home_dir =
        dirs::home_dir().ok_or_else(|| "Could not determine home directory".to_string())?;

    let presets_dir = home_dir.join("grana").join("presets");

    // Create directory if it doesn't exist
    if !presets_dir.exists() {
        std::fs::create_dir_all(&presets_dir)
            .map_err(|e| format!("Failed to create presets directory: {}", e))?;
    }

    Ok(presets_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ParamField;
    use tempfile::tempdir;

    #[test]
    fn test_validate_preset_name() {
        assert!(validate_preset_name("kodak-gold").is_ok());
        assert!(validate_preset_name("").is_err());
        assert!(validate_preset_name("a/b").is_err());
        assert!(validate_preset_name("..").is_err());
        assert!(validate_preset_name(".hidden").is_err());
        assert!(validate_preset_name("nul\0").is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.yml");

        let mut params = EditParams::default();
        params.set_field(ParamField::GrainAlpha, 0.7);
        params.is_on_dark_color = true;

        save_preset(&params, &path).unwrap();
        let loaded = load_preset(&path).unwrap();
        assert_eq!(loaded, params);
    }

    #[test]
    fn test_load_reclamps_out_of_range_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wild.yml");
        std::fs::write(&path, "grain_alpha: 3.5\ncontrast: 0.1\n").unwrap();

        let loaded = load_preset(&path).unwrap();
        assert_eq!(loaded.grain_alpha, 1.0);
        assert_eq!(loaded.contrast, 0.8);
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.yml");
        std::fs::write(&path, "temperature: 5000\n").unwrap();

        let loaded = load_preset(&path).unwrap();
        assert_eq!(loaded.temperature, 5000.0);
        assert_eq!(loaded.grain_scale, 1.0);
        assert_eq!(loaded.threshold, 0.5);
    }

    #[test]
    fn test_load_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.yml");
        std::fs::write(&path, ": not yaml {{{").unwrap();
        assert!(load_preset(&path).is_err());
    }

    #[test]
    fn test_list_presets_filters_extensions() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.yml"), "").unwrap();
        std::fs::write(dir.path().join("b.yaml"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();

        let mut names = list_presets(dir.path()).unwrap();
        names.sort();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }
}
