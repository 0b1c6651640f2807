// 📊 Dashboard read models - aggregate counters and category shares
//
// Both are snapshots recomputed on demand (see `stats`), never
// maintained incrementally.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationStats {
    pub total_payees: u64,

    /// Ratio in [0, 1]
    pub accuracy: f64,

    pub pending_review: u64,
    pub files_processed: u64,
}

impl ClassificationStats {
    pub fn empty() -> Self {
        ClassificationStats {
            total_payees: 0,
            accuracy: 0.0,
            pending_review: 0,
            files_processed: 0,
        }
    }

    /// Accuracy as a percentage for display
    pub fn accuracy_percent(&self) -> f64 {
        self.accuracy * 100.0
    }
}

/// One slice of the payee-type breakdown chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessCategory {
    pub name: String,

    /// Share of total, 0..=100
    pub percentage: f64,

    /// "#RRGGBB"
    pub color: String,
}

impl BusinessCategory {
    pub fn new(name: String, percentage: f64, color: String) -> Self {
        BusinessCategory {
            name,
            percentage,
            color,
        }
    }

    /// Whether the color is a `#RRGGBB` hex string
    pub fn has_hex_color(&self) -> bool {
        let bytes = self.color.as_bytes();
        bytes.len() == 7 && bytes[0] == b'#' && bytes[1..].iter().all(u8::is_ascii_hexdigit)
    }
}
