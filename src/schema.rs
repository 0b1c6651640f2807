// 📐 Shape Layer - Boundary validation of contract records
//
// Closed variant sets are enforced by serde at decode time. Everything
// serde cannot express (counter arithmetic, bounded ratios, workflow and
// enrichment invariants, cross-entity links) is checked here. Every
// violation is collected so callers see the whole picture at once.

use crate::config::ContractConfig;
use crate::entities::{
    ActivityItem, BatchStatus, BusinessCategory, ClassificationStats, ClassificationStatus,
    EnrichmentPhase, EnrichmentStatus, PayeeClassification, UploadBatch,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// ENTITY KINDS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    UploadBatch,
    PayeeClassification,
    ActivityItem,
    BusinessCategory,
    ClassificationStats,
}

impl Entity {
    pub fn name(&self) -> &'static str {
        match self {
            Entity::UploadBatch => "UploadBatch",
            Entity::PayeeClassification => "PayeeClassification",
            Entity::ActivityItem => "ActivityItem",
            Entity::BusinessCategory => "BusinessCategory",
            Entity::ClassificationStats => "ClassificationStats",
        }
    }
}

// ============================================================================
// VALIDATION RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Wire name of the offending field, prefixed for nested records
    pub field: String,
    pub message: String,
    pub context: String,
}

impl ValidationError {
    fn new(entity: Entity, field: &str, message: impl Into<String>) -> Self {
        ValidationError {
            field: field.to_string(),
            message: message.into(),
            context: entity.name().to_string(),
        }
    }

    fn prefixed(mut self, prefix: &str) -> Self {
        self.field = format!("{}.{}", prefix, self.field);
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.context, self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), Vec<ValidationError>>;

fn into_result(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn collect(result: ValidationResult, errors: &mut Vec<ValidationError>) {
    if let Err(mut found) = result {
        errors.append(&mut found);
    }
}

fn is_ratio(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

// ============================================================================
// CONTRACT VALIDATOR
// ============================================================================

pub struct ContractValidator {
    config: ContractConfig,
}

impl ContractValidator {
    pub fn new() -> Self {
        Self::with_config(ContractConfig::default())
    }

    pub fn with_config(config: ContractConfig) -> Self {
        ContractValidator { config }
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    // ------------------------------------------------------------------------
    // UploadBatch
    // ------------------------------------------------------------------------

    pub fn validate_batch(&self, batch: &UploadBatch) -> ValidationResult {
        let entity = Entity::UploadBatch;
        let mut errors = Vec::new();

        if is_blank(&batch.filename) {
            errors.push(ValidationError::new(entity, "filename", "Required field is empty"));
        }
        if is_blank(&batch.original_filename) {
            errors.push(ValidationError::new(entity, "originalFilename", "Required field is empty"));
        }
        if is_blank(&batch.user_id) {
            errors.push(ValidationError::new(entity, "userId", "Required field is empty"));
        }

        // Counters
        match batch.processed_records.checked_add(batch.skipped_records) {
            Some(handled) if handled <= batch.total_records => {}
            _ => errors.push(ValidationError::new(
                entity,
                "processedRecords",
                format!(
                    "processedRecords ({}) + skippedRecords ({}) exceeds totalRecords ({})",
                    batch.processed_records, batch.skipped_records, batch.total_records
                ),
            )),
        }

        if let Some(accuracy) = batch.accuracy {
            if !is_ratio(accuracy) {
                errors.push(ValidationError::new(
                    entity,
                    "accuracy",
                    format!("Must be between 0.0 and 1.0, got {}", accuracy),
                ));
            }
        }

        // Lifecycle timestamps
        if batch.is_in_progress() && batch.completed_at.is_some() {
            errors.push(ValidationError::new(
                entity,
                "completedAt",
                format!("Must be absent while status is {}", batch.status.as_str()),
            ));
        }
        if batch.status == BatchStatus::Completed && batch.completed_at.is_none() {
            errors.push(ValidationError::new(
                entity,
                "completedAt",
                "Required once status is completed",
            ));
        }
        if let Some(completed_at) = batch.completed_at {
            if completed_at < batch.created_at {
                errors.push(ValidationError::new(entity, "completedAt", "Precedes createdAt"));
            }
        }

        self.validate_enrichment(batch, &mut errors);

        into_result(errors)
    }

    fn validate_enrichment(&self, batch: &UploadBatch, errors: &mut Vec<ValidationError>) {
        let entity = Entity::UploadBatch;

        // Enrichment runs on classified records only
        if batch.processed_records == 0 {
            for (phase, status) in batch.enrichment_phases() {
                if status.has_started() {
                    errors.push(ValidationError::new(
                        entity,
                        phase_field(phase),
                        format!(
                            "{} is {} but no records were classified",
                            phase.label(),
                            status.as_str()
                        ),
                    ));
                }
            }
        }

        let status = batch.mastercard_status();

        match (
            batch.mastercard_enrichment_started_at,
            batch.mastercard_enrichment_completed_at,
        ) {
            (None, Some(_)) => errors.push(ValidationError::new(
                entity,
                "mastercardEnrichmentCompletedAt",
                "Requires mastercardEnrichmentStartedAt",
            )),
            (Some(started), Some(completed)) if completed < started => {
                errors.push(ValidationError::new(
                    entity,
                    "mastercardEnrichmentCompletedAt",
                    "Precedes mastercardEnrichmentStartedAt",
                ))
            }
            _ => {}
        }

        if status == EnrichmentStatus::Completed && batch.mastercard_enrichment_completed_at.is_none() {
            errors.push(ValidationError::new(
                entity,
                "mastercardEnrichmentCompletedAt",
                "Required once enrichment is completed",
            ));
        }

        if let Some(progress) = batch.mastercard_enrichment_progress {
            if progress > 100 {
                errors.push(ValidationError::new(
                    entity,
                    "mastercardEnrichmentProgress",
                    format!("Must be between 0 and 100, got {}", progress),
                ));
            }
        }

        if let (Some(total), Some(processed)) = (
            batch.mastercard_enrichment_total,
            batch.mastercard_enrichment_processed,
        ) {
            if processed > total {
                errors.push(ValidationError::new(
                    entity,
                    "mastercardEnrichmentProcessed",
                    format!("Exceeds mastercardEnrichmentTotal ({} > {})", processed, total),
                ));
            }
        }
    }

    // ------------------------------------------------------------------------
    // PayeeClassification
    // ------------------------------------------------------------------------

    pub fn validate_classification(&self, record: &PayeeClassification) -> ValidationResult {
        let entity = Entity::PayeeClassification;
        let mut errors = Vec::new();

        if is_blank(&record.original_name) {
            errors.push(ValidationError::new(entity, "originalName", "Required field is empty"));
        }
        if is_blank(&record.cleaned_name) {
            errors.push(ValidationError::new(entity, "cleanedName", "Required field is empty"));
        }

        if !is_ratio(record.confidence) {
            errors.push(ValidationError::new(
                entity,
                "confidence",
                format!("Must be between 0.0 and 1.0, got {}", record.confidence),
            ));
        }

        // Review workflow
        let reviewer = record.reviewed_by.as_deref().filter(|r| !is_blank(r));
        match record.status {
            ClassificationStatus::PendingReview if record.reviewed_by.is_some() => {
                errors.push(ValidationError::new(
                    entity,
                    "reviewedBy",
                    "Must be absent while pending review",
                ));
            }
            status if status.is_reviewed() && reviewer.is_none() => {
                errors.push(ValidationError::new(
                    entity,
                    "reviewedBy",
                    format!("Required once status is {}", status.as_str()),
                ));
            }
            _ => {}
        }

        check_timestamps(entity, record.created_at, record.updated_at, &mut errors);

        // Mastercard attributes
        if record.has_mastercard_details() {
            match record.mastercard_match_status {
                None => errors.push(ValidationError::new(
                    entity,
                    "mastercardMatchStatus",
                    "Required when Mastercard attributes are present",
                )),
                Some(status) if !record.is_mastercard_matched() => {
                    errors.push(ValidationError::new(
                        entity,
                        "mastercardMatchStatus",
                        format!("Mastercard attributes present but match status is {}", status.as_str()),
                    ))
                }
                _ => {}
            }
        }

        if let Some(confidence) = record.mastercard_match_confidence {
            if !is_ratio(confidence) {
                errors.push(ValidationError::new(
                    entity,
                    "mastercardMatchConfidence",
                    format!("Must be between 0.0 and 1.0, got {}", confidence),
                ));
            }
        }

        into_result(errors)
    }

    // ------------------------------------------------------------------------
    // Batch with its records
    // ------------------------------------------------------------------------

    /// Validate a batch, each of its records, and the links between them
    pub fn validate_batch_with_records(
        &self,
        batch: &UploadBatch,
        records: &[PayeeClassification],
    ) -> ValidationResult {
        let mut errors = Vec::new();

        collect(self.validate_batch(batch), &mut errors);

        if records.len() as u64 > batch.total_records {
            errors.push(ValidationError::new(
                Entity::UploadBatch,
                "totalRecords",
                format!(
                    "Batch lists {} records but totalRecords is {}",
                    records.len(),
                    batch.total_records
                ),
            ));
        }

        let enrichment_started = batch.mastercard_status().has_started();

        for (index, record) in records.iter().enumerate() {
            let prefix = format!("records[{}]", index);

            if let Err(found) = self.validate_classification(record) {
                errors.extend(found.into_iter().map(|e| e.prefixed(&prefix)));
            }

            if record.batch_id != batch.id {
                errors.push(
                    ValidationError::new(
                        Entity::PayeeClassification,
                        "batchId",
                        format!("Belongs to batch {} not {}", record.batch_id, batch.id),
                    )
                    .prefixed(&prefix),
                );
            }

            if record.has_mastercard_fields() && !enrichment_started {
                errors.push(
                    ValidationError::new(
                        Entity::PayeeClassification,
                        "mastercardMatchStatus",
                        "Enriched before the batch started Mastercard enrichment",
                    )
                    .prefixed(&prefix),
                );
            }
        }

        into_result(errors)
    }

    /// Validate an arbitrary snapshot of batches and records.
    /// Records must point at a batch in the snapshot.
    pub fn validate_snapshot(
        &self,
        batches: &[UploadBatch],
        records: &[PayeeClassification],
    ) -> ValidationResult {
        let mut errors = Vec::new();

        for (index, batch) in batches.iter().enumerate() {
            let prefix = format!("batches[{}]", index);

            if let Err(found) = self.validate_batch(batch) {
                errors.extend(found.into_iter().map(|e| e.prefixed(&prefix)));
            }

            if batches[..index].iter().any(|b| b.id == batch.id) {
                errors.push(
                    ValidationError::new(
                        Entity::UploadBatch,
                        "id",
                        format!("Duplicate batch {}", batch.id),
                    )
                    .prefixed(&prefix),
                );
            }
        }

        for (index, record) in records.iter().enumerate() {
            let prefix = format!("classifications[{}]", index);

            if let Err(found) = self.validate_classification(record) {
                errors.extend(found.into_iter().map(|e| e.prefixed(&prefix)));
            }

            match batches.iter().find(|b| b.id == record.batch_id) {
                None => errors.push(
                    ValidationError::new(
                        Entity::PayeeClassification,
                        "batchId",
                        format!("Unknown batch {}", record.batch_id),
                    )
                    .prefixed(&prefix),
                ),
                Some(batch)
                    if record.has_mastercard_fields() && !batch.mastercard_status().has_started() =>
                {
                    errors.push(
                        ValidationError::new(
                            Entity::PayeeClassification,
                            "mastercardMatchStatus",
                            "Enriched before the batch started Mastercard enrichment",
                        )
                        .prefixed(&prefix),
                    )
                }
                Some(_) => {}
            }
        }

        into_result(errors)
    }

    // ------------------------------------------------------------------------
    // Read models
    // ------------------------------------------------------------------------

    pub fn validate_activity(&self, item: &ActivityItem) -> ValidationResult {
        let entity = Entity::ActivityItem;
        let mut errors = Vec::new();

        if is_blank(&item.id) {
            errors.push(ValidationError::new(entity, "id", "Required field is empty"));
        }
        if is_blank(&item.description) {
            errors.push(ValidationError::new(entity, "description", "Required field is empty"));
        }
        if is_blank(&item.time) {
            errors.push(ValidationError::new(entity, "time", "Required field is empty"));
        }

        into_result(errors)
    }

    pub fn validate_category(&self, category: &BusinessCategory) -> ValidationResult {
        let entity = Entity::BusinessCategory;
        let mut errors = Vec::new();

        if is_blank(&category.name) {
            errors.push(ValidationError::new(entity, "name", "Required field is empty"));
        }
        if !(0.0..=100.0).contains(&category.percentage) {
            errors.push(ValidationError::new(
                entity,
                "percentage",
                format!("Must be between 0 and 100, got {}", category.percentage),
            ));
        }
        if !category.has_hex_color() {
            errors.push(ValidationError::new(
                entity,
                "color",
                format!("Must be a #RRGGBB hex color, got {:?}", category.color),
            ));
        }

        into_result(errors)
    }

    /// Validate each entry plus the share sum
    pub fn validate_category_set(&self, categories: &[BusinessCategory]) -> ValidationResult {
        let mut errors = Vec::new();

        for (index, category) in categories.iter().enumerate() {
            if let Err(found) = self.validate_category(category) {
                let prefix = format!("[{}]", index);
                errors.extend(found.into_iter().map(|e| e.prefixed(&prefix)));
            }
        }

        if !categories.is_empty() {
            let total: f64 = categories.iter().map(|c| c.percentage).sum();
            if (total - 100.0).abs() > self.config.share_tolerance {
                errors.push(ValidationError::new(
                    Entity::BusinessCategory,
                    "percentage",
                    format!(
                        "Shares sum to {:.2}, expected 100 ± {}",
                        total, self.config.share_tolerance
                    ),
                ));
            }
        }

        into_result(errors)
    }

    pub fn validate_stats(&self, stats: &ClassificationStats) -> ValidationResult {
        let entity = Entity::ClassificationStats;
        let mut errors = Vec::new();

        if !is_ratio(stats.accuracy) {
            errors.push(ValidationError::new(
                entity,
                "accuracy",
                format!("Must be between 0.0 and 1.0, got {}", stats.accuracy),
            ));
        }
        if stats.pending_review > stats.total_payees {
            errors.push(ValidationError::new(
                entity,
                "pendingReview",
                format!(
                    "Exceeds totalPayees ({} > {})",
                    stats.pending_review, stats.total_payees
                ),
            ));
        }

        into_result(errors)
    }
}

impl Default for ContractValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn phase_field(phase: EnrichmentPhase) -> &'static str {
    match phase {
        EnrichmentPhase::Finexio => "finexioMatchingStatus",
        EnrichmentPhase::GoogleAddress => "googleAddressStatus",
        EnrichmentPhase::Mastercard => "mastercardEnrichmentStatus",
        EnrichmentPhase::Akkio => "akkioPredictionStatus",
    }
}

fn check_timestamps(
    entity: Entity,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    errors: &mut Vec<ValidationError>,
) {
    if updated_at < created_at {
        errors.push(ValidationError::new(entity, "updatedAt", "Precedes createdAt"));
    }
}

// ============================================================================
// TESTS
// ============================================================================
