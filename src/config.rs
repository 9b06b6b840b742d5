//! Run options and the optional options file.
//!
//! The category table is fixed; the only tunables are the two run options.
//! They can come from a TOML file, and command-line flags override them.
//!
//! # Configuration File Format
//!
//! ```toml
//! [organize]
//! recursive = false
//! skip_errors = true
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the current directory.
pub const LOCAL_CONFIG_FILE: &str = ".foldersort.toml";

/// Options for a single organize run. Immutable while the run is going.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizeOptions {
    /// Also sort files found in subdirectories.
    pub recursive: bool,
    /// Count a failed move and keep going instead of aborting the run.
    pub skip_errors: bool,
}

impl Default for OrganizeOptions {
    fn default() -> Self {
        Self {
            recursive: false,
            skip_errors: true,
        }
    }
}

/// Contents of an options file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub organize: OrganizeOptions,
}

impl Settings {
    /// Load settings, with fallback to defaults.
    ///
    /// Attempts to load settings in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.foldersort.toml` in the current directory
    /// 3. Look for `~/.config/foldersort/config.toml`
    /// 4. Fall back to default settings
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly provided file cannot be read or parsed,
    /// or if a discovered file is malformed.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Some(home_config) = Self::home_config_path()
            && home_config.exists()
        {
            return Self::load_from_file(&home_config);
        }

        Ok(Self::default())
    }

    fn home_config_path() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join("foldersort")
                .join("config.toml")
        })
    }

    /// Load settings from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content).map_err(|reason| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Applies command-line overrides on top of the loaded options.
    ///
    /// Flags can only switch behavior on: `recursive` forces recursive mode and
    /// `fail_fast` forces `skip_errors = false`.
    pub fn options_with_overrides(&self, recursive: bool, fail_fast: bool) -> OrganizeOptions {
        let mut options = self.organize;
        if recursive {
            options.recursive = true;
        }
        if fail_fast {
            options.skip_errors = false;
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_options() {
        let options = OrganizeOptions::default();
        assert!(!options.recursive);
        assert!(options.skip_errors);
    }

    #[test]
    fn test_parse_full_file() {
        let settings = Settings::parse(
            r#"
            [organize]
            recursive = true
            skip_errors = false
            "#,
        )
        .unwrap();

        assert_eq!(
            settings.organize,
            OrganizeOptions {
                recursive: true,
                skip_errors: false,
            }
        );
    }

    #[test]
    fn test_parse_partial_file_keeps_defaults() {
        let settings = Settings::parse("[organize]\nrecursive = true\n").unwrap();
        assert!(settings.organize.recursive);
        assert!(settings.organize.skip_errors);

        let settings = Settings::parse("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_parse_rejects_wrong_types() {
        assert!(Settings::parse("[organize]\nrecursive = \"yes\"\n").is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("options.toml");
        fs::write(&path, "[organize]\nskip_errors = false\n").unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert!(!settings.organize.skip_errors);
    }

    #[test]
    fn test_load_explicit_missing_file_is_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("missing.toml");

        let result = Settings::load(Some(&path));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_invalid_file_reports_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("broken.toml");
        fs::write(&path, "[organize\n").unwrap();

        match Settings::load(Some(&path)) {
            Err(ConfigError::Invalid { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected invalid config error, got {:?}", other),
        }
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::default();

        let options = settings.options_with_overrides(false, false);
        assert_eq!(options, OrganizeOptions::default());

        let options = settings.options_with_overrides(true, true);
        assert!(options.recursive);
        assert!(!options.skip_errors);
    }
}
