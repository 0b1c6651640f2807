// 🧩 Contract entities - the records exchanged between backend and client
//
// All of them are passive data. Lifecycles belong to whoever stores them.
//
// Relationships:
// - UploadBatch 1 ── * PayeeClassification (by batch id)
// - ClassificationStats, BusinessCategory, ActivityItem are read models

pub mod activity;
pub mod batch;
pub mod payee;
pub mod summary;

pub use activity::{ActivityItem, ActivitySeverity};
pub use batch::{BatchStatus, EnrichmentPhase, EnrichmentStatus, UploadBatch};
pub use payee::{ClassificationStatus, MatchStatus, PayeeClassification, PayeeType};
pub use summary::{BusinessCategory, ClassificationStats};
