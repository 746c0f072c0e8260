//! Sync command handler.

use owo_colors::OwoColorize;
use tabled::Tabled;

use topsync_core::{Collector, DeviceOutcome, Engine, FileCollector, MemoryStore, Store, SyncReport};

use crate::cli::{GlobalOpts, SyncArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(serde::Serialize)]
struct OutcomeSummary {
    device: String,
    outcome: &'static str,
    detail: String,
}

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Outcome")]
    outcome: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

impl From<&OutcomeSummary> for OutcomeRow {
    fn from(s: &OutcomeSummary) -> Self {
        Self {
            device: s.device.clone(),
            outcome: s.outcome.to_owned(),
            detail: s.detail.clone(),
        }
    }
}

fn summarize(report: &SyncReport) -> Vec<OutcomeSummary> {
    report
        .outcomes
        .iter()
        .map(|(device, outcome)| {
            let (label, detail) = match outcome {
                DeviceOutcome::Synced => ("synced", String::new()),
                DeviceOutcome::Skipped { reason } => ("skipped", reason.clone()),
                DeviceOutcome::Failed { error } => ("failed", error.to_string()),
            };
            OutcomeSummary {
                device: device.clone(),
                outcome: label,
                detail,
            }
        })
        .collect()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: SyncArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config_or_default()?;
    let facts_dir = config::resolve_facts_dir(&args, global, &cfg)?;
    let devices = config::resolve_devices(&args, global, &cfg)?;
    let collector = FileCollector::new(facts_dir);

    if args.dry_run {
        let store = MemoryStore::new();
        let report = run_engine(collector, store, &devices).await;
        if !global.quiet {
            eprintln!("dry run: no changes were sent to NetBox");
        }
        finish(&report, global)
    } else {
        let store = config::build_store(global, &cfg)?;
        let report = run_engine(collector, store, &devices).await;
        finish(&report, global)
    }
}

async fn run_engine<C: Collector, S: Store>(
    collector: C,
    store: S,
    devices: &[String],
) -> SyncReport {
    Engine::new(collector, store).run(devices).await
}

fn finish(report: &SyncReport, global: &GlobalOpts) -> Result<(), CliError> {
    let summaries = summarize(report);
    let out = output::render_list(
        &global.output,
        &summaries,
        |s| OutcomeRow::from(s),
        |s| format!("{}\t{}", s.device, s.outcome),
    );
    output::print_output(&out, global.quiet);

    let total = report.outcomes.len();
    let synced = report.synced();
    let failed = report.failed();
    if !global.quiet {
        eprintln!(
            "{} synced, {} failed, {} total",
            synced.green(),
            failed.red(),
            total
        );
    }

    if failed > 0 {
        return Err(CliError::PartialFailure { failed, total });
    }
    Ok(())
}
