//! Clap derive structures for the `topsync` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// topsync -- sync discovered network topology into NetBox
#[derive(Debug, Parser)]
#[command(
    name = "topsync",
    version,
    about = "Reconcile discovered network topology against NetBox",
    long_about = "Replays collected device fact snapshots into a NetBox instance.\n\n\
        Every pass is idempotent: devices, interfaces, addresses, VLANs,\n\
        cables, and hardware inventory are created on first sighting and\n\
        updated in place on every run after that.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config profile to use
    #[arg(long, short = 'p', env = "TOPSYNC_PROFILE", global = true)]
    pub profile: Option<String>,

    /// NetBox base URL (overrides profile)
    #[arg(long, short = 'u', env = "TOPSYNC_URL", global = true)]
    pub url: Option<String>,

    /// NetBox API token
    #[arg(long, env = "TOPSYNC_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "TOPSYNC_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "TOPSYNC_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "TOPSYNC_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a reconciliation pass over one or more devices
    #[command(alias = "s")]
    Sync(SyncArgs),

    /// Delete cables with a missing termination
    GcCables,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SYNC
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Devices to sync; defaults to the profile's device list
    #[arg(value_name = "DEVICE")]
    pub devices: Vec<String>,

    /// Directory of collected fact files (<device>.json)
    #[arg(long, value_name = "DIR")]
    pub facts_dir: Option<PathBuf>,

    /// Replay against an in-memory store instead of NetBox
    #[arg(long)]
    pub dry_run: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the resolved config with secrets masked
    Show,

    /// Print the config file path
    Path,

    /// Create or replace a profile
    Init {
        /// Profile name
        #[arg(long, default_value = "default")]
        name: String,

        /// NetBox base URL
        #[arg(long)]
        url: String,

        /// Environment variable that will hold the API token
        #[arg(long, default_value = "TOPSYNC_TOKEN")]
        token_env: String,

        /// Make this the default profile
        #[arg(long)]
        default: bool,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn sync_accepts_device_list_and_facts_dir() {
        let cli = Cli::try_parse_from([
            "topsync",
            "sync",
            "SW1",
            "SW2",
            "--facts-dir",
            "/tmp/facts",
        ])
        .unwrap();
        let Command::Sync(args) = cli.command else {
            panic!("expected sync");
        };
        assert_eq!(args.devices, vec!["SW1", "SW2"]);
        assert_eq!(args.facts_dir.as_deref(), Some(std::path::Path::new("/tmp/facts")));
    }
}
