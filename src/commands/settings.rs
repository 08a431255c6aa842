use crate::{Error, Result};
use log::warn;
use serde_json::{json, Map, Value};
use std::fs;
use std::path::Path;

const SETTINGS_SCHEMA_VERSION: i64 = 1;
const MAX_SLIPPED_TICKET_LIMIT: u64 = 1000;

/// Which report sections to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSections {
    pub summary: bool,
    pub slippage: bool,
    pub ratings: bool,
    pub failures: bool,
}

impl Default for ReportSections {
    fn default() -> Self {
        Self {
            summary: true,
            slippage: true,
            ratings: true,
            failures: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveSettings {
    pub include_github_activity: bool,
    pub github_repo_filter: Option<String>,
    /// 0 keeps every slipped ticket.
    pub slipped_ticket_limit: usize,
    pub sections: ReportSections,
    pub collapsed_assignees: Vec<String>,
}

impl Default for EffectiveSettings {
    fn default() -> Self {
        effective_from_value(&default_settings())
    }
}

pub fn load_effective_settings(path: &Path) -> Result<EffectiveSettings> {
    let settings = load_settings_from_disk(path)?;
    Ok(effective_from_value(&settings))
}

pub fn effective_from_value(settings: &Value) -> EffectiveSettings {
    let section = |key: &str| {
        settings
            .get("sections")
            .and_then(|s| s.get(key))
            .and_then(Value::as_bool)
            .unwrap_or(true)
    };

    EffectiveSettings {
        include_github_activity: settings
            .get("includeGithubActivity")
            .and_then(Value::as_bool)
            .unwrap_or(true),
        github_repo_filter: settings
            .get("githubRepoFilter")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string),
        slipped_ticket_limit: settings
            .get("slippedTicketLimit")
            .and_then(Value::as_u64)
            .unwrap_or(0)
            .min(MAX_SLIPPED_TICKET_LIMIT) as usize,
        sections: ReportSections {
            summary: section("summary"),
            slippage: section("slippage"),
            ratings: section("ratings"),
            failures: section("failures"),
        },
        collapsed_assignees: settings
            .get("collapsedAssignees")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
    }
}

/// Read and migrate a settings file. A missing or unreadable document falls
/// back to defaults; only I/O errors other than "not found" are reported.
pub fn load_settings_from_disk(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Ok(default_settings());
    }

    let raw = fs::read_to_string(path)?;
    let original = serde_json::from_str::<Value>(&raw).unwrap_or_else(|e| {
        warn!("ignoring malformed settings file {}: {e}", path.display());
        json!({})
    });

    Ok(migrate_settings(original))
}

/// Merge a partial update into the stored settings and write the result.
pub fn save_settings_to_disk(path: &Path, settings: Value) -> Result<Value> {
    if !settings.is_object() {
        return Err(Error::InvalidInput("settings update must be a JSON object".to_string()));
    }

    let mut merged = load_settings_from_disk(path).unwrap_or_else(|_| default_settings());
    merge_settings(&mut merged, &settings);

    let migrated = migrate_settings(merged);
    write_settings_file(path, &migrated)?;
    Ok(migrated)
}

fn write_settings_file(path: &Path, settings: &Value) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let raw = serde_json::to_string_pretty(settings)?;
    fs::write(path, raw)?;
    Ok(())
}

fn migrate_settings(input: Value) -> Value {
    let defaults = default_settings();
    let mut out = match input {
        Value::Object(map) => Value::Object(map),
        _ => Value::Object(Map::new()),
    };

    let version = out
        .get("schema_version")
        .and_then(Value::as_i64)
        .unwrap_or(0);

    if version < 1 {
        migrate_legacy_keys(&mut out);
    }

    deep_merge_defaults(&mut out, &defaults);
    sanitize_settings(&mut out);
    if let Some(obj) = out.as_object_mut() {
        obj.insert("schema_version".to_string(), json!(SETTINGS_SCHEMA_VERSION));
    }

    out
}

/// Unversioned files used `maxSlippedTickets` and a `hiddenSections` name list.
fn migrate_legacy_keys(settings: &mut Value) {
    let Some(obj) = settings.as_object_mut() else {
        return;
    };

    if let Some(limit) = obj.remove("maxSlippedTickets") {
        obj.entry("slippedTicketLimit".to_string()).or_insert(limit);
    }

    let Some(hidden) = obj.remove("hiddenSections") else {
        return;
    };
    let sections = obj
        .entry("sections".to_string())
        .or_insert_with(|| json!({}));
    if let (Some(section_obj), Some(names)) = (sections.as_object_mut(), hidden.as_array()) {
        for name in names.iter().filter_map(Value::as_str) {
            section_obj.entry(name.to_string()).or_insert(json!(false));
        }
    }
}

pub fn default_settings() -> Value {
    json!({
        "schema_version": SETTINGS_SCHEMA_VERSION,
        "includeGithubActivity": true,
        "githubRepoFilter": null,
        "slippedTicketLimit": 0,
        "sections": {
            "summary": true,
            "slippage": true,
            "ratings": true,
            "failures": true
        },
        "collapsedAssignees": []
    })
}

fn deep_merge_defaults(target: &mut Value, defaults: &Value) {
    let (Some(target_obj), Some(default_obj)) = (target.as_object_mut(), defaults.as_object()) else {
        return;
    };

    for (key, default_value) in default_obj {
        match target_obj.get_mut(key) {
            Some(existing) => {
                if existing.is_object() && default_value.is_object() {
                    deep_merge_defaults(existing, default_value);
                }
            }
            None => {
                target_obj.insert(key.clone(), default_value.clone());
            }
        }
    }
}

fn merge_settings(target: &mut Value, incoming: &Value) {
    match (target, incoming) {
        (Value::Object(target_obj), Value::Object(incoming_obj)) => {
            for (key, value) in incoming_obj {
                if let Some(existing) = target_obj.get_mut(key) {
                    merge_settings(existing, value);
                } else {
                    target_obj.insert(key.clone(), value.clone());
                }
            }
        }
        (target_slot, incoming_value) => {
            *target_slot = incoming_value.clone();
        }
    }
}

fn sanitize_settings(settings: &mut Value) {
    let Some(obj) = settings.as_object_mut() else {
        return;
    };

    ensure_bool(obj, "includeGithubActivity", true);

    let limit = obj
        .get("slippedTicketLimit")
        .and_then(Value::as_u64)
        .unwrap_or(0)
        .min(MAX_SLIPPED_TICKET_LIMIT);
    obj.insert("slippedTicketLimit".to_string(), json!(limit));

    let filter_valid = matches!(obj.get("githubRepoFilter"), Some(Value::String(_)) | Some(Value::Null));
    if !filter_valid {
        obj.insert("githubRepoFilter".to_string(), Value::Null);
    }

    let sections = obj
        .entry("sections".to_string())
        .or_insert_with(|| json!({}));
    if !sections.is_object() {
        *sections = json!({});
    }
    if let Some(section_obj) = sections.as_object_mut() {
        for key in ["summary", "slippage", "ratings", "failures"] {
            ensure_bool(section_obj, key, true);
        }
    }

    let collapsed: Vec<Value> = obj
        .get("collapsedAssignees")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter(|n| n.is_string()).cloned().collect())
        .unwrap_or_default();
    obj.insert("collapsedAssignees".to_string(), Value::Array(collapsed));
}

fn ensure_bool(map: &mut Map<String, Value>, key: &str, default: bool) {
    let value = map.get(key).and_then(Value::as_bool).unwrap_or(default);
    map.insert(key.to_string(), json!(value));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_out_of_range_and_wrong_typed_values() {
        let migrated = migrate_settings(json!({
            "slippedTicketLimit": 50000,
            "includeGithubActivity": "yes",
            "githubRepoFilter": 42,
            "sections": { "ratings": false, "summary": "no" },
            "collapsedAssignees": ["alice", 7, "bob"]
        }));

        assert_eq!(migrated["slippedTicketLimit"], json!(1000));
        assert_eq!(migrated["includeGithubActivity"], json!(true));
        assert_eq!(migrated["githubRepoFilter"], Value::Null);
        assert_eq!(migrated["sections"]["ratings"], json!(false));
        assert_eq!(migrated["sections"]["summary"], json!(true));
        assert_eq!(migrated["collapsedAssignees"], json!(["alice", "bob"]));
        assert_eq!(migrated["schema_version"], json!(SETTINGS_SCHEMA_VERSION));
    }

    #[test]
    fn merges_partial_settings_without_losing_existing_values() {
        let mut existing = default_settings();
        merge_settings(&mut existing, &json!({ "sections": { "failures": false } }));
        let migrated = migrate_settings(existing);

        assert_eq!(migrated["sections"]["failures"], json!(false));
        assert_eq!(migrated["sections"]["slippage"], json!(true));
        assert_eq!(migrated["includeGithubActivity"], json!(true));
    }

    #[test]
    fn effective_settings_read_typed_values() {
        let effective = effective_from_value(&migrate_settings(json!({
            "includeGithubActivity": false,
            "githubRepoFilter": "web",
            "slippedTicketLimit": 5
        })));

        assert!(!effective.include_github_activity);
        assert_eq!(effective.github_repo_filter.as_deref(), Some("web"));
        assert_eq!(effective.slipped_ticket_limit, 5);
        assert_eq!(effective.sections, ReportSections::default());
    }

    #[test]
    fn unversioned_legacy_keys_are_migrated() {
        let migrated = migrate_settings(json!({
            "maxSlippedTickets": 25,
            "hiddenSections": ["summary", "failures", "unknown"]
        }));

        assert_eq!(migrated["slippedTicketLimit"], json!(25));
        assert_eq!(migrated["sections"]["summary"], json!(false));
        assert_eq!(migrated["sections"]["failures"], json!(false));
        assert_eq!(migrated["sections"]["ratings"], json!(true));
        assert!(migrated.get("maxSlippedTickets").is_none());
        assert!(migrated.get("hiddenSections").is_none());
        assert_eq!(migrated["schema_version"], json!(SETTINGS_SCHEMA_VERSION));
    }

    #[test]
    fn versioned_files_skip_legacy_migration() {
        let migrated = migrate_settings(json!({
            "schema_version": 1,
            "maxSlippedTickets": 25
        }));

        assert_eq!(migrated["slippedTicketLimit"], json!(0));
        assert_eq!(migrated["maxSlippedTickets"], json!(25));
    }

    #[test]
    fn non_object_input_resets_to_defaults() {
        assert_eq!(migrate_settings(json!([1, 2, 3])), default_settings());
    }
}
