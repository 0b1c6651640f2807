// Payee Contract - Core Library
// Shared data contract for payee classification: records, wire codec,
// boundary validation, review workflow and dashboard read models

pub mod config;
pub mod entities;
pub mod schema;         // Boundary validation
pub mod codec;          // JSON decode-and-validate
pub mod review;         // Review workflow transitions
pub mod stats;          // Dashboard read models
pub mod export;         // CSV export

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use config::{ConfigError, ContractConfig, ServerConfig};
pub use entities::{
    ActivityItem, ActivitySeverity,
    BatchStatus, EnrichmentPhase, EnrichmentStatus, UploadBatch,
    ClassificationStatus, MatchStatus, PayeeClassification, PayeeType,
    BusinessCategory, ClassificationStats,
};
pub use schema::{
    ContractValidator, Entity, ValidationError, ValidationResult,
};
pub use codec::{
    BatchWithRecords, ContractError, Snapshot,
    decode_activity, decode_batch, decode_batch_with_records, decode_categories,
    decode_category, decode_classification, decode_snapshot, decode_stats,
    encode, encode_pretty,
};
pub use review::{ReviewError, SicCorrection, triage_all};
pub use stats::{
    DashboardSummary,
    activity_feed, category_breakdown, compute_stats, dashboard_summary, relative_time,
};
pub use export::write_classifications_csv;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
