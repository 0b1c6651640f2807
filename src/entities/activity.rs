// 📰 Activity Item - Audit/log entry shown in the dashboard feed

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivitySeverity {
    Success,
    Warning,
    Info,
    Error,
}

impl ActivitySeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivitySeverity::Success => "success",
            ActivitySeverity::Warning => "warning",
            ActivitySeverity::Info => "info",
            ActivitySeverity::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityItem {
    pub id: String,

    #[serde(rename = "type")]
    pub severity: ActivitySeverity,

    pub description: String,
    pub details: String,

    /// Display label, e.g. "5 minutes ago"
    pub time: String,
}

impl ActivityItem {
    /// Create an item with a fresh UUID
    pub fn new(severity: ActivitySeverity, description: String, details: String, time: String) -> Self {
        ActivityItem {
            id: uuid::Uuid::new_v4().to_string(),
            severity,
            description,
            details,
            time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_serialized_as_type() {
        let item = ActivityItem::new(
            ActivitySeverity::Warning,
            "Batch vendors.csv finished".to_string(),
            "3 records skipped".to_string(),
            "just now".to_string(),
        );

        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["type"], "warning");
        assert_eq!(json["details"], "3 records skipped");
        assert!(json.get("severity").is_none());
        assert_eq!(item.id.len(), 36);
    }
}
