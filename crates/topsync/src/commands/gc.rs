//! Loose-cable GC command handler.

use topsync_core::reconcile::cables::remove_loose_cables;

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;

/// Delete every cable with a missing termination.
///
/// The sync pass runs this per device anyway; the standalone command
/// exists for cleaning up after interrupted runs without replaying
/// facts.
pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config_or_default()?;
    let store = config::build_store(global, &cfg)?;

    let removed = remove_loose_cables(&store).await?;
    if !global.quiet {
        eprintln!("removed {removed} loose cables");
    }
    Ok(())
}
