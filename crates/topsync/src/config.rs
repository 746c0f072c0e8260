//! CLI configuration — thin wrapper around `topsync_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--url, --token, etc.).

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use topsync_api::{NetBoxClient, NetBoxStore, TransportOptions};

use crate::cli::{GlobalOpts, SyncArgs};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use topsync_config::{Config, Profile, config_path, load_config_or_default, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a NetBox-backed store from the active profile and flag
/// overrides. Flags win over profile values.
pub fn build_store(global: &GlobalOpts, config: &Config) -> Result<NetBoxStore, CliError> {
    let profile_name = active_profile_name(global, config);

    // The profile is optional when both --url and --token are given.
    let profile = config.profiles.get(&profile_name);

    let url = match (&global.url, profile) {
        (Some(url), _) => url.clone(),
        (None, Some(p)) => p.url.clone(),
        (None, None) => {
            return Err(CliError::Validation {
                field: "url".into(),
                reason: format!(
                    "no profile '{profile_name}' in config and no --url given"
                ),
            });
        }
    };

    let token = resolve_token_with_flag(profile, &profile_name, global)?;

    let insecure = global.insecure || profile.and_then(|p| p.insecure).unwrap_or(false);
    let timeout = profile
        .and_then(|p| p.timeout_secs)
        .unwrap_or(global.timeout);

    let transport = TransportOptions {
        timeout: Duration::from_secs(timeout),
        accept_invalid_certs: insecure,
    };
    let client = NetBoxClient::from_token(&url, &token, &transport)?;
    Ok(NetBoxStore::new(client))
}

/// Resolve API token with CLI flag override, then fall through to
/// shared resolution.
fn resolve_token_with_flag(
    profile: Option<&Profile>,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<SecretString, CliError> {
    // CLI flag takes priority
    if let Some(ref token) = global.token {
        return Ok(SecretString::from(token.clone()));
    }
    let Some(profile) = profile else {
        return Err(CliError::Validation {
            field: "token".into(),
            reason: format!("no profile '{profile_name}' in config and no --token given"),
        });
    };
    Ok(topsync_config::resolve_token(profile, profile_name)?)
}

/// Resolve the facts directory: flag, then profile.
pub fn resolve_facts_dir(
    args: &SyncArgs,
    global: &GlobalOpts,
    config: &Config,
) -> Result<PathBuf, CliError> {
    if let Some(dir) = &args.facts_dir {
        return Ok(dir.clone());
    }
    let profile_name = active_profile_name(global, config);
    if let Some(dir) = config
        .profiles
        .get(&profile_name)
        .and_then(|p| p.facts_dir.clone())
    {
        return Ok(dir);
    }
    Err(CliError::Validation {
        field: "facts-dir".into(),
        reason: "no --facts-dir given and the profile has no facts_dir".into(),
    })
}

/// Resolve the device list: positional args, then the profile's list.
pub fn resolve_devices(
    args: &SyncArgs,
    global: &GlobalOpts,
    config: &Config,
) -> Result<Vec<String>, CliError> {
    if !args.devices.is_empty() {
        return Ok(args.devices.clone());
    }
    let profile_name = active_profile_name(global, config);
    let devices = config
        .profiles
        .get(&profile_name)
        .map(|p| p.devices.clone())
        .unwrap_or_default();
    if devices.is_empty() {
        return Err(CliError::Validation {
            field: "devices".into(),
            reason: "no devices named and the profile's device list is empty".into(),
        });
    }
    Ok(devices)
}
