//! Apply command implementation.

use super::{CommandError, ConnectOptions};
use desec_codec::encode_all;
use desec_sync_engine::SyncError;
use desec_sync_protocol::Plan;
use std::path::Path;
use tracing::info;

/// Runs the apply command.
///
/// With `dry_run` the encoded update batch is printed instead of sent.
pub fn run(options: &ConnectOptions, path: &Path, dry_run: bool) -> Result<(), CommandError> {
    let plan = read_plan(path)?;

    if plan.is_empty() {
        info!(zone = %plan.zone, "plan has no changes");
        return Ok(());
    }

    if dry_run {
        let batch = encode_all(&plan.changes).map_err(SyncError::from)?;
        println!("{}", serde_json::to_string_pretty(&batch)?);
        return Ok(());
    }

    let provider = options.connect()?;
    let report = provider.apply(&plan)?;
    println!(
        "{}: applied {} changes ({} deletions) in {:.2?}",
        plan.zone, report.changes, report.deletions, report.duration
    );

    Ok(())
}

/// Reads a plan from a JSON file.
pub fn read_plan(path: &Path) -> Result<Plan, CommandError> {
    let content = std::fs::read_to_string(path).map_err(|source| CommandError::ReadPlan {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CommandError::ParsePlan {
        path: path.to_path_buf(),
        source,
    })
}
