//! Activity log loading

use anyhow::{Context, Result};
use fitlog_shared::ActivityLog;
use std::fs;
use std::path::Path;
use tracing::info;

/// Read an `ActivityLog` from a JSON file
pub fn load_activity_log(path: &Path) -> Result<ActivityLog> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let log: ActivityLog = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid activity log", path.display()))?;

    info!(
        path = %path.display(),
        workouts = log.workouts.len(),
        body_metrics = log.body_metrics.len(),
        "loaded activity log"
    );
    Ok(log)
}
