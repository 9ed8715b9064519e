//! Settings loading
//!
//! Settings are read from a TOML file. The host normally points at an
//! explicit path; `load_default_settings` falls back to the platform
//! config directory.

use std::fs;
use std::path::{Path, PathBuf};

use restrictor_types::Settings;
use thiserror::Error;

const APP_NAME: &str = "restrictor";
const CONFIG_NAME: &str = "settings";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Serialize error for {path:?}: {source}")]
    Serialize {
        path: PathBuf,
        source: toml::ser::Error,
    },

    #[error(transparent)]
    Confy(#[from] confy::ConfyError),
}

/// Load settings from a TOML file. Missing keys take their defaults.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let settings: Settings = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(
        path = %path.display(),
        overrides = settings.overrides.len(),
        notifications = settings.show_notifications,
        "Loaded settings"
    );
    Ok(settings)
}

pub fn save_settings(path: &Path, settings: &Settings) -> Result<(), ConfigError> {
    let contents = toml::to_string_pretty(settings).map_err(|e| ConfigError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;

    fs::write(path, contents).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

/// Load from the platform config directory, creating the file with
/// defaults on first run.
pub fn load_default_settings() -> Result<Settings, ConfigError> {
    let path = confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)?;
    load_or_create_settings(&path)
}

/// Load from `path`, writing the defaults there first if it does not exist.
pub fn load_or_create_settings(path: &Path) -> Result<Settings, ConfigError> {
    let settings: Settings = confy::load_path(path)?;
    tracing::info!(path = %path.display(), overrides = settings.overrides.len(), "Loaded settings");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use restrictor_types::{RestrictParams, RestrictReason};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("restrictor-{}-{name}.toml", std::process::id()))
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("roundtrip");
        let mut settings = Settings::default();
        settings.show_notifications = false;
        settings
            .overrides
            .insert("DaedricHelmet".to_string(), "The helmet rejects you.".to_string());

        save_settings(&path, &settings).unwrap();
        let loaded = load_settings(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let path = temp_path("partial");
        fs::write(
            &path,
            r#"
[cast]
skill = "Your {item} fizzles."
"#,
        )
        .unwrap();
        let settings = load_settings(&path).unwrap();
        let _ = fs::remove_file(&path);

        let mut params = RestrictParams::cast();
        params.reason = RestrictReason::Skill;
        assert_eq!(settings.notification("Flames", "Flames", &params), "Your Flames fizzles.");
        assert_eq!(settings.equip, Settings::default().equip);
    }

    #[test]
    fn test_errors_name_the_file() {
        let missing = temp_path("missing");
        let err = load_settings(&missing).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("missing"));

        let broken = temp_path("broken");
        fs::write(&broken, "show_notifications = maybe").unwrap();
        let err = load_settings(&broken).unwrap_err();
        let _ = fs::remove_file(&broken);
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_or_create_writes_defaults_once() {
        let path = temp_path("first-run");
        let _ = fs::remove_file(&path);

        let created = load_or_create_settings(&path).unwrap();
        assert_eq!(created, Settings::default());
        assert!(path.exists());

        let mut edited = created;
        edited.show_notifications = false;
        save_settings(&path, &edited).unwrap();

        // An existing file is read, not replaced
        let loaded = load_or_create_settings(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert!(!loaded.show_notifications);
    }
}
