//! Core configuration management.
//!
//! Provides the global verbose flag, the `verbose_println!` diagnostic
//! macro, and the tunable defaults that bound working image sizes and
//! grain scaling.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::Deserialize;

// Global verbose flag for controlling debug output
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set the global verbose flag. When true, debug messages will be printed.
pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::SeqCst);
}

/// Check if verbose mode is enabled.
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Print a message to stderr only if verbose mode is enabled.
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if $crate::config::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

/// Candidate config file names searched in the working directory.
const CONFIG_FILENAMES: &[&str] = &["grana.yml", "grana.yaml"];

/// Tunable defaults for session and pipeline behavior.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CoreDefaults {
    /// Longest side the working (preview) base image is bounded to.
    pub max_working_dim: u32,

    /// Long-side reference resolution the grain block size is scaled
    /// against, so grain keeps its apparent size across source sizes.
    pub reference_dim: u32,

    /// Longest side of the analysis thumbnail used by feature extraction.
    pub thumbnail_dim: u32,

    /// Minimum time, in milliseconds, a frontend should keep its busy
    /// affordance visible while a preset prediction runs.
    pub min_preset_busy_ms: u64,
}

impl Default for CoreDefaults {
    fn default() -> Self {
        Self {
            max_working_dim: 2048,
            reference_dim: 1080,
            thumbnail_dim: 128,
            min_preset_busy_ms: 800,
        }
    }
}

impl CoreDefaults {
    /// Minimum visible busy duration for the preset prediction affordance.
    pub fn min_preset_busy(&self) -> Duration {
        Duration::from_millis(self.min_preset_busy_ms)
    }

    /// Load defaults from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {}", path.display(), e))
    }

    /// Discover a config file in the given directory and load it, falling
    /// back to built-in defaults when none exists. A malformed file is an
    /// error rather than a silent fallback.
    pub fn discover<P: AsRef<Path>>(dir: P) -> Result<(Self, Option<PathBuf>), String> {
        for name in CONFIG_FILENAMES {
            let candidate = dir.as_ref().join(name);
            if candidate.is_file() {
                let config = Self::load_from_file(&candidate)?;
                return Ok((config, Some(candidate)));
            }
        }
        Ok((Self::default(), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_defaults() {
        let d = CoreDefaults::default();
        assert_eq!(d.max_working_dim, 2048);
        assert_eq!(d.reference_dim, 1080);
        assert_eq!(d.thumbnail_dim, 128);
        assert_eq!(d.min_preset_busy().as_millis(), 800);
    }

    #[test]
    fn test_partial_yaml_fills_in_defaults() {
        let config: CoreDefaults = serde_yaml::from_str("reference_dim: 720\n").unwrap();
        assert_eq!(config.reference_dim, 720);
        assert_eq!(config.max_working_dim, 2048);
    }

    #[test]
    fn test_discover_missing_dir_falls_back() {
        let (config, source) = CoreDefaults::discover("/nonexistent/grana-test").unwrap();
        assert!(source.is_none());
        assert_eq!(config.thumbnail_dim, 128);
    }
}
