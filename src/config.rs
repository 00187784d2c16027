//! Settings file support
//!
//! Loads settings from ~/.mda-diffusion.toml (or %USERPROFILE%\.mda-diffusion.toml
//! on Windows), or from an explicit path given on the command line.
//!
//! Example:
//! ```text
//! # mda-diffusion settings
//! [backend]
//! command = ["python3", "-m", "mdadiffusion_bridge"]
//!
//! [sampling]
//! ensemble-size = 100
//! bootstrap-rounds = 20
//!
//! [theme]
//! primary = "#ffd740"
//! secondary = "#232629"
//! alert = "#dc3545"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::syntax::Theme;

/// Settings for the computation backend
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// Program and arguments implementing the backend protocol
    pub command: Vec<String>,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            command: vec![
                "python3".to_string(),
                "-m".to_string(),
                "mdadiffusion_bridge".to_string(),
            ],
        }
    }
}

/// Ensemble and bootstrap sizes for the radius estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Sampling {
    pub ensemble_size: u32,
    pub bootstrap_rounds: u32,
}

impl Default for Sampling {
    fn default() -> Self {
        Self {
            ensemble_size: 100,
            bootstrap_rounds: 20,
        }
    }
}

/// Configuration settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub backend: BackendSettings,
    pub sampling: Sampling,
    pub theme: Theme,
}

impl Settings {
    /// Get the default settings file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(".mda-diffusion.toml"))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".mda-diffusion.toml"))
        }
    }

    /// Load settings from `path`, or from the default location
    ///
    /// A missing default file means defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_file(path),
            None => match Self::config_path() {
                Some(path) if path.exists() => Self::load_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn load_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| AppError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::parse(&contents).map_err(|source| AppError::Settings {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), ?settings, "loaded settings");
        Ok(settings)
    }

    /// Parse settings file contents
    fn parse(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        let mut settings: Settings = toml::from_str(contents)?;
        // Sampling sizes are at least one
        settings.sampling.ensemble_size = settings.sampling.ensemble_size.max(1);
        settings.sampling.bootstrap_rounds = settings.sampling.bootstrap_rounds.max(1);
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Color;

    #[test]
    fn test_parse_full() {
        let contents = r##"
# Comment
[backend]
command = ["/opt/mda/bin/bridge", "--fast"]

[sampling]
ensemble-size = 250
bootstrap-rounds = 5

[theme]
primary = "#112233"
secondary = "black"
alert = "bright-red"
        "##;

        let settings = Settings::parse(contents).unwrap();
        assert_eq!(settings.backend.command, vec!["/opt/mda/bin/bridge", "--fast"]);
        assert_eq!(settings.sampling.ensemble_size, 250);
        assert_eq!(settings.sampling.bootstrap_rounds, 5);
        assert_eq!(settings.theme.primary, Color::Rgb(0x11, 0x22, 0x33));
        assert_eq!(settings.theme.secondary, Color::Black);
        assert_eq!(settings.theme.alert, Color::BrightRed);
    }

    #[test]
    fn test_parse_partial_keeps_defaults() {
        let settings = Settings::parse("[sampling]\nbootstrap-rounds = 7\n").unwrap();
        assert_eq!(settings.sampling.ensemble_size, 100);
        assert_eq!(settings.sampling.bootstrap_rounds, 7);
        assert_eq!(settings.backend, BackendSettings::default());
        assert_eq!(settings.theme, Theme::default());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Settings::parse("").unwrap(), Settings::default());
    }

    #[test]
    fn test_zero_sampling_clamped() {
        let settings = Settings::parse("[sampling]\nensemble-size = 0\n").unwrap();
        assert_eq!(settings.sampling.ensemble_size, 1);
    }

    #[test]
    fn test_bad_color_rejected() {
        assert!(Settings::parse("[theme]\nalert = \"#nothex\"\n").is_err());
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let err = Settings::load(Some(Path::new("/nonexistent/settings.toml"))).unwrap_err();
        assert!(matches!(err, AppError::Read { .. }));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "[backend]\ncommand = [\"sh\"]\n").unwrap();
        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.backend.command, vec!["sh"]);
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "[sampling\n").unwrap();
        assert!(matches!(
            Settings::load(Some(&path)).unwrap_err(),
            AppError::Settings { .. }
        ));
    }
}
