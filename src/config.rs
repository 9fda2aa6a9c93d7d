use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration for the exif-geotag library.
///
/// Controls the limits applied to incoming updates and files, and output
/// behavior (dry run, output directory).
///
/// Every section falls back to its defaults when omitted from the file, so a
/// partial `config.json` is valid.
///
/// # Loading
///
/// ```rust,no_run
/// use exif_geotag::config::Config;
///
/// // From a JSON file
/// let config = Config::load(Some("config.json".as_ref())).unwrap();
///
/// // Or use defaults and customize
/// let mut config = Config::default();
/// config.output.dry_run = true;
/// config.limits.max_description_chars = 500;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Validation limits for updates and input files.
    pub limits: Limits,
    /// Output behavior (dry run, output directory).
    pub output: OutputConfig,
}

/// Bounds checked by [`validate_update`](crate::pipeline::validate_update)
/// and the file pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum description length, in characters.
    pub max_description_chars: usize,
    /// Maximum keywords length, in characters.
    pub max_keywords_chars: usize,
    /// Largest input file accepted, in bytes.
    pub max_file_bytes: u64,
}

/// Output and behavior configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// If `true`, preview what would be written without creating any files.
    pub dry_run: bool,
    /// Directory for `geotagged_*` files. `None` writes next to the input.
    pub output_dir: Option<PathBuf>,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_description_chars: 1300,
            max_keywords_chars: 6600,
            max_file_bytes: 50 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Resolve the config file path (same directory as the executable).
    pub fn config_path() -> Result<PathBuf> {
        let exe_path = std::env::current_exe().context("Failed to get executable path")?;
        let exe_dir = exe_path
            .parent()
            .context("Failed to get executable directory")?;
        Ok(exe_dir.join("config.json"))
    }

    /// Load config from the given path, or from the default location.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            log::warn!(
                "Config file not found at {}. Using defaults.",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;
        let config: Config =
            serde_json::from_str(&contents).context("Failed to parse config file")?;
        log::debug!("Loaded config from {}", config_path.display());
        Ok(config)
    }

    /// Save config to the given path, or to the default location.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, contents).context("Failed to write config file")?;
        log::info!("Config saved to {}", config_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_upload_limits() {
        let config = Config::default();
        assert_eq!(config.limits.max_description_chars, 1300);
        assert_eq!(config.limits.max_keywords_chars, 6600);
        assert_eq!(config.limits.max_file_bytes, 52_428_800);
        assert!(!config.output.dry_run);
        assert_eq!(config.output.output_dir, None);
    }

    #[test]
    fn load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(dir.path().join("absent.json").as_path())).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.output.dry_run = true;
        config.output.output_dir = Some(dir.path().join("out"));
        config.limits.max_keywords_chars = 10;
        config.save(Some(path.as_path())).unwrap();

        assert_eq!(Config::load(Some(path.as_path())).unwrap(), config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"limits": {"max_description_chars": 42}}"#).unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.limits.max_description_chars, 42);
        assert_eq!(config.limits.max_keywords_chars, 6600);
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = Config::load(Some(path.as_path())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
