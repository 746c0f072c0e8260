//! Shared configuration for the topsync tools.
//!
//! Profiles live in a single TOML file under the platform config
//! directory (`~/.config/topsync/config.toml` on Linux). Each profile
//! names a NetBox endpoint, how to obtain its API token, and the default
//! set of devices to sync. Environment variables prefixed `TOPSYNC_`
//! override file values; CLI flags override both (handled by the caller).
//!
//! Tokens are never written to the config file by this crate — profiles
//! reference an environment variable instead, and an inline `token`
//! value is only honored for throwaway lab setups.

use std::collections::BTreeMap;
use std::path::PathBuf;

use figment::Figment;
use figment::providers::{Env, Format, Toml};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("could not determine a config directory for this platform")]
    NoConfigDir,

    #[error("failed to read config: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("profile '{0}' not found in config")]
    UnknownProfile(String),

    #[error(
        "no API token for profile '{profile}': set {hint}, or add token_env to the profile"
    )]
    MissingToken { profile: String, hint: String },
}

// ── Types ───────────────────────────────────────────────────────────

/// Root of the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,

    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

/// One NetBox endpoint plus sync defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    /// Base URL of the NetBox instance, with or without `/api`.
    pub url: String,

    /// Inline API token. Lab use only; prefer `token_env`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Name of the environment variable holding the API token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,

    /// Accept self-signed certificates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,

    /// HTTP timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Directory of collected fact files for offline syncs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facts_dir: Option<PathBuf>,

    /// Devices synced when none are named on the command line.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub devices: Vec<String>,
}

impl Config {
    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile(name.to_owned()))
    }
}

// ── Loading and saving ──────────────────────────────────────────────

/// Platform config file path: `<config dir>/topsync/config.toml`.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dirs = directories::ProjectDirs::from("", "", "topsync")
        .ok_or(ConfigError::NoConfigDir)?;
    Ok(dirs.config_dir().join("config.toml"))
}

/// Load config from the given path, layered under `TOPSYNC_*` env vars.
///
/// A missing file yields the default (empty) config rather than an
/// error, so first-run flows work without `config init`.
pub fn load_config_from(path: &std::path::Path) -> Result<Config, ConfigError> {
    let config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("TOPSYNC_").split("__"))
        .extract()
        .map_err(Box::new)?;
    Ok(config)
}

/// Load config from the platform default location.
pub fn load_config_or_default() -> Result<Config, ConfigError> {
    load_config_from(&config_path()?)
}

/// Serialize and write the config, creating parent directories.
pub fn save_config_to(config: &Config, path: &std::path::Path) -> Result<(), ConfigError> {
    let rendered = toml::to_string_pretty(config)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: path.to_owned(),
            source,
        })?;
    }
    std::fs::write(path, rendered).map_err(|source| ConfigError::Write {
        path: path.to_owned(),
        source,
    })
}

/// Save config to the platform default location.
pub fn save_config(config: &Config) -> Result<(), ConfigError> {
    save_config_to(config, &config_path()?)
}

// ── Token resolution ────────────────────────────────────────────────

/// Resolve the API token for a profile.
///
/// Precedence: `TOPSYNC_TOKEN` env var, then the profile's `token_env`
/// variable, then an inline `token` value.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var("TOPSYNC_TOKEN") {
        if !value.is_empty() {
            return Ok(SecretString::from(value));
        }
    }

    if let Some(var) = &profile.token_env {
        if let Ok(value) = std::env::var(var) {
            if !value.is_empty() {
                return Ok(SecretString::from(value));
            }
        }
    }

    if let Some(token) = &profile.token {
        return Ok(SecretString::from(token.clone()));
    }

    let hint = profile
        .token_env
        .clone()
        .unwrap_or_else(|| "TOPSYNC_TOKEN".to_owned());
    Err(ConfigError::MissingToken {
        profile: profile_name.to_owned(),
        hint,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_config(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn missing_file_loads_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("nope.toml")).unwrap();
        assert!(config.profiles.is_empty());
        assert_eq!(config.default_profile, None);
    }

    #[test]
    fn profiles_round_trip_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
            default_profile = "lab"

            [profiles.lab]
            url = "https://netbox.lab.example.com"
            token_env = "LAB_NETBOX_TOKEN"
            insecure = true
            devices = ["SW1", "SW2"]
            "#,
        );

        let config = load_config_from(&path).unwrap();
        let profile = config.profile("lab").unwrap();

        assert_eq!(profile.url, "https://netbox.lab.example.com");
        assert_eq!(profile.token_env.as_deref(), Some("LAB_NETBOX_TOKEN"));
        assert_eq!(profile.insecure, Some(true));
        assert_eq!(profile.devices, vec!["SW1", "SW2"]);

        // Writing it back and re-reading loses nothing.
        let out = dir.path().join("saved.toml");
        save_config_to(&config, &out).unwrap();
        let reloaded = load_config_from(&out).unwrap();
        assert_eq!(reloaded.profile("lab").unwrap().devices, profile.devices);
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let config = Config::default();
        assert!(matches!(
            config.profile("nope"),
            Err(ConfigError::UnknownProfile(_))
        ));
    }

    #[test]
    fn inline_token_is_honored_when_no_env_set() {
        let profile = Profile {
            url: "https://netbox.example.com".into(),
            token: Some("abc123".into()),
            ..Profile::default()
        };
        let token = resolve_token(&profile, "lab").unwrap();
        assert_eq!(secrecy::ExposeSecret::expose_secret(&token), "abc123");
    }

    #[test]
    fn missing_token_names_the_env_hint() {
        let profile = Profile {
            url: "https://netbox.example.com".into(),
            token_env: Some("LAB_NETBOX_TOKEN".into()),
            ..Profile::default()
        };
        let err = resolve_token(&profile, "lab").unwrap_err();
        assert!(err.to_string().contains("LAB_NETBOX_TOKEN"));
    }
}
