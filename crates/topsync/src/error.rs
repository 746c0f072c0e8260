//! CLI error type, rendered through miette.

use miette::Diagnostic;

#[derive(Debug, thiserror::Error, Diagnostic)]
#[non_exhaustive]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(code(topsync::config))]
    Config(#[from] topsync_config::ConfigError),

    #[error(transparent)]
    #[diagnostic(code(topsync::api))]
    Api(#[from] topsync_api::Error),

    #[error(transparent)]
    #[diagnostic(code(topsync::sync))]
    Sync(#[from] topsync_core::Error),

    #[error("invalid {field}: {reason}")]
    #[diagnostic(code(topsync::validation))]
    Validation { field: String, reason: String },

    #[error("{failed} of {total} devices failed to sync")]
    #[diagnostic(
        code(topsync::partial_failure),
        help("re-run with -v for per-device detail; completed devices are safe to re-sync")
    )]
    PartialFailure { failed: usize, total: usize },

    #[error("I/O error: {0}")]
    #[diagnostic(code(topsync::io))]
    Io(#[from] std::io::Error),
}
