// 📦 Upload Batch - One user-submitted file and its processing lifecycle
//
// A batch is created when a file lands, base classification fills the
// record counters, then optional enrichment phases (Finexio matching,
// Google address validation, Mastercard enrichment, Akkio prediction)
// run on top of the classified records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// BATCH STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    /// File stored, classification not started
    Pending,

    /// Base classification running
    Processing,

    /// Classification done, enrichment phases running
    Enriching,

    /// All phases finished
    Completed,

    /// Aborted by an error
    Failed,

    /// Aborted by the user
    Cancelled,
}

impl BatchStatus {
    pub const ALL: [BatchStatus; 6] = [
        BatchStatus::Pending,
        BatchStatus::Processing,
        BatchStatus::Enriching,
        BatchStatus::Completed,
        BatchStatus::Failed,
        BatchStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Pending => "pending",
            BatchStatus::Processing => "processing",
            BatchStatus::Enriching => "enriching",
            BatchStatus::Completed => "completed",
            BatchStatus::Failed => "failed",
            BatchStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|status| status.as_str() == s)
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            BatchStatus::Pending | BatchStatus::Processing | BatchStatus::Enriching
        )
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_in_progress()
    }
}

// ============================================================================
// ENRICHMENT STATUS
// ============================================================================

/// State of one enrichment phase layered on a batch.
/// An absent status on the wire means the phase has not started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Failed,
    Skipped,
}

impl EnrichmentStatus {
    pub const ALL: [EnrichmentStatus; 5] = [
        EnrichmentStatus::Pending,
        EnrichmentStatus::InProgress,
        EnrichmentStatus::Completed,
        EnrichmentStatus::Failed,
        EnrichmentStatus::Skipped,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnrichmentStatus::Pending => "pending",
            EnrichmentStatus::InProgress => "in_progress",
            EnrichmentStatus::Completed => "completed",
            EnrichmentStatus::Failed => "failed",
            EnrichmentStatus::Skipped => "skipped",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|status| status.as_str() == s)
    }

    pub fn has_started(&self) -> bool {
        *self != EnrichmentStatus::Pending
    }
}

/// The enrichment phases a batch can go through after classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentPhase {
    Finexio,
    GoogleAddress,
    Mastercard,
    Akkio,
}

impl EnrichmentPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrichmentPhase::Finexio => "finexio",
            EnrichmentPhase::GoogleAddress => "google_address",
            EnrichmentPhase::Mastercard => "mastercard",
            EnrichmentPhase::Akkio => "akkio",
        }
    }

    /// Label shown next to the progress bar
    pub fn label(&self) -> &'static str {
        match self {
            EnrichmentPhase::Finexio => "Finexio matching",
            EnrichmentPhase::GoogleAddress => "Google address validation",
            EnrichmentPhase::Mastercard => "Mastercard enrichment",
            EnrichmentPhase::Akkio => "Akkio prediction",
        }
    }
}

// ============================================================================
// UPLOAD BATCH
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadBatch {
    pub id: i64,

    /// Name the file was stored under
    pub filename: String,

    /// Name the user uploaded
    pub original_filename: String,

    pub status: BatchStatus,

    // ========================================================================
    // RECORD COUNTERS
    // ========================================================================
    pub total_records: u64,
    pub processed_records: u64,
    pub skipped_records: u64,

    // ========================================================================
    // PROGRESS (free-form, for display)
    // ========================================================================
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_step: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_message: Option<String>,

    /// Ratio in [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,

    pub user_id: String,
    pub created_at: DateTime<Utc>,

    /// Absent while the batch is in progress
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    // ========================================================================
    // MASTERCARD ENRICHMENT
    // ========================================================================
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mastercard_enrichment_status: Option<EnrichmentStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mastercard_enrichment_started_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mastercard_enrichment_completed_at: Option<DateTime<Utc>>,

    /// Percent, 0..=100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mastercard_enrichment_progress: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mastercard_enrichment_total: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mastercard_enrichment_processed: Option<u64>,

    // ========================================================================
    // OTHER ENRICHMENT PHASES
    // ========================================================================
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finexio_matching_status: Option<EnrichmentStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_address_status: Option<EnrichmentStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub akkio_prediction_status: Option<EnrichmentStatus>,
}

impl UploadBatch {
    /// Create a freshly stored batch with nothing processed yet
    pub fn new(
        id: i64,
        filename: String,
        original_filename: String,
        user_id: String,
        total_records: u64,
    ) -> Self {
        UploadBatch {
            id,
            filename,
            original_filename,
            status: BatchStatus::Pending,
            total_records,
            processed_records: 0,
            skipped_records: 0,
            current_step: None,
            progress_message: None,
            accuracy: None,
            user_id,
            created_at: Utc::now(),
            completed_at: None,
            mastercard_enrichment_status: None,
            mastercard_enrichment_started_at: None,
            mastercard_enrichment_completed_at: None,
            mastercard_enrichment_progress: None,
            mastercard_enrichment_total: None,
            mastercard_enrichment_processed: None,
            finexio_matching_status: None,
            google_address_status: None,
            akkio_prediction_status: None,
        }
    }

    pub fn is_in_progress(&self) -> bool {
        self.status.is_in_progress()
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Records neither processed nor skipped yet
    pub fn unaccounted_records(&self) -> u64 {
        self.total_records
            .saturating_sub(self.processed_records.saturating_add(self.skipped_records))
    }

    /// Share of records handled so far, 0.0 for an empty batch
    pub fn completion_ratio(&self) -> f64 {
        if self.total_records == 0 {
            return 0.0;
        }
        let handled = self.processed_records.saturating_add(self.skipped_records);
        (handled as f64 / self.total_records as f64).min(1.0)
    }

    pub fn mastercard_status(&self) -> EnrichmentStatus {
        self.mastercard_enrichment_status.unwrap_or_default()
    }

    /// True when any Mastercard sub-state field carries a value
    pub fn has_mastercard_fields(&self) -> bool {
        self.mastercard_enrichment_status.is_some()
            || self.mastercard_enrichment_started_at.is_some()
            || self.mastercard_enrichment_completed_at.is_some()
            || self.mastercard_enrichment_progress.is_some()
            || self.mastercard_enrichment_total.is_some()
            || self.mastercard_enrichment_processed.is_some()
    }

    pub fn phase_status(&self, phase: EnrichmentPhase) -> EnrichmentStatus {
        let status = match phase {
            EnrichmentPhase::Finexio => self.finexio_matching_status,
            EnrichmentPhase::GoogleAddress => self.google_address_status,
            EnrichmentPhase::Mastercard => self.mastercard_enrichment_status,
            EnrichmentPhase::Akkio => self.akkio_prediction_status,
        };
        status.unwrap_or_default()
    }

    /// Every enrichment phase in pipeline order with its current status
    pub fn enrichment_phases(&self) -> Vec<(EnrichmentPhase, EnrichmentStatus)> {
        [
            EnrichmentPhase::Finexio,
            EnrichmentPhase::GoogleAddress,
            EnrichmentPhase::Mastercard,
            EnrichmentPhase::Akkio,
        ]
        .into_iter()
        .map(|phase| (phase, self.phase_status(phase)))
        .collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================
