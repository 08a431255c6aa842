use serde::{Deserialize, Deserializer, Serialize};

pub const UNASSIGNED: &str = "Unassigned";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusTransition {
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub from_status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub key: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub summary: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub priority: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub issue_type: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub assignee: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub reporter: Option<String>,
    #[serde(default, deserialize_with = "lenient_points")]
    pub story_points: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub created: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub updated: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub resolved: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub sprint: Option<String>,
    #[serde(default, deserialize_with = "lenient_labels")]
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub status_history: Vec<StatusTransition>,
    #[serde(default, deserialize_with = "lenient_points")]
    pub development_time_days: Option<f64>,
    #[serde(default, rename = "inProgressToQADays", deserialize_with = "lenient_points")]
    pub in_progress_to_qa_days: Option<f64>,
}

impl Issue {
    /// Story points, with missing or invalid values counted as zero.
    pub fn points(&self) -> f64 {
        self.story_points
            .filter(|p| p.is_finite() && *p > 0.0)
            .unwrap_or(0.0)
    }

    /// Assignee display name; absent or blank names collapse to "Unassigned".
    pub fn assignee_name(&self) -> &str {
        match self.assignee.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => UNASSIGNED,
        }
    }
}

/// Accepts non-negative numbers, numeric strings and null. Anything else
/// becomes `None` instead of failing the whole snapshot.
fn lenient_points<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(value.filter(|v| v.is_finite() && *v >= 0.0))
}

/// Null or non-string values become `None`; the date code reports those as unknown.
fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_string(deserializer)?.unwrap_or_default())
}

fn lenient_labels<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let labels = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(labels)
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<StatusTransition>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<StatusTransition>>::deserialize(deserializer)?.unwrap_or_default())
}
