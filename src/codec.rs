// 🔌 Wire codec - JSON in, validated records out
//
// Decoding is the boundary: a payload either becomes a record that passed
// every check in `schema`, or an error. Unknown variant strings fail at the
// serde step and never reach the caller.

use crate::entities::{
    ActivityItem, BusinessCategory, ClassificationStats, PayeeClassification, UploadBatch,
};
use crate::schema::{ContractValidator, Entity, ValidationError, ValidationResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("malformed {entity} payload: {source}")]
    Decode {
        entity: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{entity} failed validation with {} violation(s)", .errors.len())]
    Invalid {
        entity: &'static str,
        errors: Vec<ValidationError>,
    },

    #[error("failed to encode payload: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    /// Violations carried by an `Invalid` error, empty otherwise
    pub fn violations(&self) -> &[ValidationError] {
        match self {
            ContractError::Invalid { errors, .. } => errors,
            _ => &[],
        }
    }
}

/// A batch together with the records classified from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchWithRecords {
    pub batch: UploadBatch,

    #[serde(default)]
    pub records: Vec<PayeeClassification>,
}

/// Whatever the client currently holds, used to derive dashboard figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub batches: Vec<UploadBatch>,

    #[serde(default)]
    pub classifications: Vec<PayeeClassification>,
}

// ============================================================================
// DECODING
// ============================================================================

fn decode<T, F>(json: &str, entity: Entity, validate: F) -> Result<T, ContractError>
where
    T: DeserializeOwned,
    F: FnOnce(&T) -> ValidationResult,
{
    let value: T = serde_json::from_str(json).map_err(|source| {
        warn!(entity = entity.name(), error = %source, "rejected malformed payload");
        ContractError::Decode {
            entity: entity.name(),
            source,
        }
    })?;

    match validate(&value) {
        Ok(()) => {
            debug!(entity = entity.name(), "decoded payload");
            Ok(value)
        }
        Err(errors) => {
            warn!(
                entity = entity.name(),
                violations = errors.len(),
                "rejected payload at boundary"
            );
            Err(ContractError::Invalid {
                entity: entity.name(),
                errors,
            })
        }
    }
}

pub fn decode_batch(validator: &ContractValidator, json: &str) -> Result<UploadBatch, ContractError> {
    decode(json, Entity::UploadBatch, |batch| validator.validate_batch(batch))
}

pub fn decode_classification(
    validator: &ContractValidator,
    json: &str,
) -> Result<PayeeClassification, ContractError> {
    decode(json, Entity::PayeeClassification, |record| {
        validator.validate_classification(record)
    })
}

pub fn decode_batch_with_records(
    validator: &ContractValidator,
    json: &str,
) -> Result<BatchWithRecords, ContractError> {
    decode(json, Entity::UploadBatch, |payload: &BatchWithRecords| {
        validator.validate_batch_with_records(&payload.batch, &payload.records)
    })
}

pub fn decode_snapshot(validator: &ContractValidator, json: &str) -> Result<Snapshot, ContractError> {
    decode(json, Entity::UploadBatch, |snapshot: &Snapshot| {
        validator.validate_snapshot(&snapshot.batches, &snapshot.classifications)
    })
}

pub fn decode_activity(validator: &ContractValidator, json: &str) -> Result<ActivityItem, ContractError> {
    decode(json, Entity::ActivityItem, |item| validator.validate_activity(item))
}

pub fn decode_category(
    validator: &ContractValidator,
    json: &str,
) -> Result<BusinessCategory, ContractError> {
    decode(json, Entity::BusinessCategory, |category| {
        validator.validate_category(category)
    })
}

/// Decode a full breakdown; shares must add up to ~100
pub fn decode_categories(
    validator: &ContractValidator,
    json: &str,
) -> Result<Vec<BusinessCategory>, ContractError> {
    decode(json, Entity::BusinessCategory, |categories: &Vec<BusinessCategory>| {
        validator.validate_category_set(categories)
    })
}

pub fn decode_stats(
    validator: &ContractValidator,
    json: &str,
) -> Result<ClassificationStats, ContractError> {
    decode(json, Entity::ClassificationStats, |stats| validator.validate_stats(stats))
}

// ============================================================================
// ENCODING
// ============================================================================

pub fn encode<T: Serialize>(value: &T) -> Result<String, ContractError> {
    serde_json::to_string(value).map_err(ContractError::Encode)
}

pub fn encode_pretty<T: Serialize>(value: &T) -> Result<String, ContractError> {
    serde_json::to_string_pretty(value).map_err(ContractError::Encode)
}

// ============================================================================
// TESTS
// ============================================================================
