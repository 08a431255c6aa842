use crate::models::snapshot::SprintSnapshot;
use crate::Result;
use log::debug;
use std::fs;
use std::path::Path;

/// Load a snapshot document. Accepts either a full snapshot object or a bare
/// array of issues.
pub fn load_snapshot(path: &Path) -> Result<SprintSnapshot> {
    let raw = fs::read_to_string(path)?;
    parse_snapshot(&raw)
}

pub fn parse_snapshot(raw: &str) -> Result<SprintSnapshot> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let snapshot = if value.is_array() {
        SprintSnapshot {
            issues: serde_json::from_value(value)?,
            ..Default::default()
        }
    } else {
        serde_json::from_value(value)?
    };

    debug!(
        "loaded snapshot: {} issues, roster {}, {} activity repos",
        snapshot.issues.len(),
        snapshot
            .assignee_stats
            .as_ref()
            .map_or("derived".to_string(), |r| format!("{} entries", r.len())),
        snapshot.github_activity.len()
    );
    Ok(snapshot)
}
