//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking sensitive fields.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }

    for (name, p) in &cfg.profiles {
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "url = \"{}\"", p.url);
        if p.token.is_some() {
            let _ = writeln!(out, "token = \"****\"");
        }
        if let Some(ref env) = p.token_env {
            let _ = writeln!(out, "token_env = \"{env}\"");
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout_secs {
            let _ = writeln!(out, "timeout_secs = {timeout}");
        }
        if let Some(ref dir) = p.facts_dir {
            let _ = writeln!(out, "facts_dir = \"{}\"", dir.display());
        }
        if !p.devices.is_empty() {
            let _ = writeln!(out, "devices = {:?}", p.devices);
        }
    }

    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default()?;
            output::print_output(format_config_redacted(&cfg).trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            let path = config::config_path()?;
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Init {
            name,
            url,
            token_env,
            default,
        } => {
            let mut cfg = config::load_config_or_default()?;
            cfg.profiles.insert(
                name.clone(),
                Profile {
                    url,
                    token_env: Some(token_env),
                    ..Profile::default()
                },
            );
            if default || cfg.default_profile.is_none() {
                cfg.default_profile = Some(name.clone());
            }
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("profile '{name}' written to {}", config::config_path()?.display());
            }
            Ok(())
        }
    }
}
