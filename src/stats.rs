// 📈 Read models - dashboard figures derived from batch and record snapshots
//
// Everything here is recomputed from scratch on each call.

use crate::config::ContractConfig;
use crate::entities::{
    ActivityItem, ActivitySeverity, BatchStatus, BusinessCategory, ClassificationStats,
    ClassificationStatus, PayeeClassification, PayeeType, UploadBatch,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// CLASSIFICATION STATS
// ============================================================================

/// Aggregate counters over a snapshot.
///
/// Accuracy is the share of human-reviewed records the reviewer confirmed
/// rather than corrected. Before anything is reviewed it falls back to the
/// mean model confidence.
pub fn compute_stats(
    batches: &[UploadBatch],
    classifications: &[PayeeClassification],
) -> ClassificationStats {
    let mut confirmed = 0u64;
    let mut corrected = 0u64;
    let mut pending = 0u64;
    let mut confidence_sum = 0.0;

    for record in classifications {
        match record.status {
            ClassificationStatus::UserConfirmed => confirmed += 1,
            ClassificationStatus::UserCorrected => corrected += 1,
            ClassificationStatus::PendingReview => pending += 1,
            ClassificationStatus::AutoClassified => {}
        }
        confidence_sum += record.confidence;
    }

    let reviewed = confirmed + corrected;
    let accuracy = if reviewed > 0 {
        confirmed as f64 / reviewed as f64
    } else if !classifications.is_empty() {
        confidence_sum / classifications.len() as f64
    } else {
        0.0
    };

    ClassificationStats {
        total_payees: classifications.len() as u64,
        accuracy,
        pending_review: pending,
        files_processed: batches
            .iter()
            .filter(|b| b.status == BatchStatus::Completed)
            .count() as u64,
    }
}

// ============================================================================
// CATEGORY BREAKDOWN
// ============================================================================

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Share of records per payee type, largest first
pub fn category_breakdown(
    classifications: &[PayeeClassification],
    config: &ContractConfig,
) -> Vec<BusinessCategory> {
    if classifications.is_empty() {
        return Vec::new();
    }

    let mut counts: BTreeMap<PayeeType, u64> = BTreeMap::new();
    for record in classifications {
        *counts.entry(record.payee_type).or_insert(0) += 1;
    }

    let total = classifications.len() as f64;
    let mut categories: Vec<BusinessCategory> = counts
        .into_iter()
        .map(|(payee_type, count)| {
            BusinessCategory::new(
                payee_type.as_str().to_string(),
                round_one_decimal(count as f64 * 100.0 / total),
                config.color_for(payee_type).to_string(),
            )
        })
        .collect();

    categories.sort_by(|a, b| {
        b.percentage
            .total_cmp(&a.percentage)
            .then_with(|| a.name.cmp(&b.name))
    });

    categories
}

// ============================================================================
// ACTIVITY FEED
// ============================================================================

/// "just now", "5 minutes ago", "2 hours ago", "3 days ago"
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();

    let (amount, unit) = match seconds {
        s if s < 60 => return "just now".to_string(),
        s if s < 3_600 => (s / 60, "minute"),
        s if s < 86_400 => (s / 3_600, "hour"),
        s => (s / 86_400, "day"),
    };

    if amount == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", amount, unit)
    }
}

fn last_event_at(batch: &UploadBatch) -> DateTime<Utc> {
    batch.completed_at.unwrap_or(batch.created_at)
}

fn batch_activity(batch: &UploadBatch, now: DateTime<Utc>) -> ActivityItem {
    let name = &batch.original_filename;
    let has_skipped = batch.skipped_records > 0;

    let (severity, description, details) = match batch.status {
        BatchStatus::Completed => {
            let severity = if has_skipped {
                ActivitySeverity::Warning
            } else {
                ActivitySeverity::Success
            };
            (
                severity,
                format!("Batch {} completed", name),
                format!(
                    "{} payees classified, {} skipped",
                    batch.processed_records, batch.skipped_records
                ),
            )
        }
        BatchStatus::Failed => (
            ActivitySeverity::Error,
            format!("Batch {} failed", name),
            batch.progress_message.clone().unwrap_or_else(|| {
                format!(
                    "Stopped after {} of {} records",
                    batch.processed_records, batch.total_records
                )
            }),
        ),
        BatchStatus::Cancelled => (
            ActivitySeverity::Warning,
            format!("Batch {} cancelled", name),
            format!(
                "{} of {} records processed",
                batch.processed_records, batch.total_records
            ),
        ),
        BatchStatus::Pending | BatchStatus::Processing | BatchStatus::Enriching => (
            if has_skipped {
                ActivitySeverity::Warning
            } else {
                ActivitySeverity::Info
            },
            format!("Processing {}", name),
            batch
                .progress_message
                .clone()
                .or_else(|| batch.current_step.clone())
                .unwrap_or_else(|| {
                    format!(
                        "{} of {} records processed",
                        batch.processed_records, batch.total_records
                    )
                }),
        ),
    };

    ActivityItem {
        id: format!("batch-{}-{}", batch.id, batch.status.as_str()),
        severity,
        description,
        details,
        time: relative_time(last_event_at(batch), now),
    }
}

/// One item per batch, most recent first
pub fn activity_feed(batches: &[UploadBatch], now: DateTime<Utc>) -> Vec<ActivityItem> {
    let mut ordered: Vec<&UploadBatch> = batches.iter().collect();
    ordered.sort_by(|a, b| last_event_at(b).cmp(&last_event_at(a)).then(b.id.cmp(&a.id)));

    ordered
        .into_iter()
        .map(|batch| batch_activity(batch, now))
        .collect()
}

// ============================================================================
// DASHBOARD SUMMARY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub stats: ClassificationStats,
    pub categories: Vec<BusinessCategory>,
    pub activity: Vec<ActivityItem>,
}

pub fn dashboard_summary(
    batches: &[UploadBatch],
    classifications: &[PayeeClassification],
    config: &ContractConfig,
    now: DateTime<Utc>,
) -> DashboardSummary {
    DashboardSummary {
        stats: compute_stats(batches, classifications),
        categories: category_breakdown(classifications, config),
        activity: activity_feed(batches, now),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ContractValidator;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn record(id: i64, payee_type: PayeeType, confidence: f64) -> PayeeClassification {
        PayeeClassification::new(
            id,
            1,
            format!("PAYEE {}", id),
            format!("Payee {}", id),
            payee_type,
            confidence,
        )
    }

    fn batch(id: i64, status: BatchStatus, created_minutes_ago: i64) -> UploadBatch {
        let mut batch = UploadBatch::new(
            id,
            format!("upload_{}.csv", id),
            format!("file{}.csv", id),
            "user-1".to_string(),
            10,
        );
        batch.status = status;
        batch.created_at = now() - Duration::minutes(created_minutes_ago);
        batch
    }

    #[test]
    fn test_stats_empty() {
        assert_eq!(compute_stats(&[], &[]), ClassificationStats::empty());
    }

    #[test]
    fn test_stats_from_reviews() {
        let mut records = vec![
            record(1, PayeeType::Business, 0.9),
            record(2, PayeeType::Business, 0.9),
            record(3, PayeeType::Individual, 0.9),
            record(4, PayeeType::Individual, 0.4),
            record(5, PayeeType::Government, 0.9),
        ];
        records[0].confirm("alice").unwrap();
        records[1].confirm("alice").unwrap();
        records[2].confirm("alice").unwrap();
        records[3].correct("alice", PayeeType::Business, None).unwrap();
        records[4].flag_for_review().unwrap();

        let batches = vec![
            batch(1, BatchStatus::Completed, 30),
            batch(2, BatchStatus::Processing, 5),
            batch(3, BatchStatus::Completed, 90),
        ];

        let stats = compute_stats(&batches, &records);

        assert_eq!(stats.total_payees, 5);
        assert_eq!(stats.pending_review, 1);
        assert_eq!(stats.files_processed, 2);
        assert!((stats.accuracy - 0.75).abs() < 1e-9);
        assert!(ContractValidator::new().validate_stats(&stats).is_ok());
    }

    #[test]
    fn test_stats_falls_back_to_confidence() {
        let records = vec![
            record(1, PayeeType::Business, 0.9),
            record(2, PayeeType::Business, 0.7),
        ];

        let stats = compute_stats(&[], &records);

        assert!((stats.accuracy - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_breakdown_shares() {
        let config = ContractConfig::default();
        let records = vec![
            record(1, PayeeType::Business, 0.9),
            record(2, PayeeType::Business, 0.9),
            record(3, PayeeType::Individual, 0.9),
            record(4, PayeeType::InternalTransfer, 0.9),
            record(5, PayeeType::Business, 0.9),
            record(6, PayeeType::Government, 0.9),
        ];

        let categories = category_breakdown(&records, &config);

        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Business", "Government", "Individual", "Internal Transfer"]);
        assert_eq!(categories[0].percentage, 50.0);
        assert_eq!(categories[1].percentage, 16.7);
        assert_eq!(categories[0].color, "#2196F3");
        assert!(ContractValidator::new().validate_category_set(&categories).is_ok());
    }

    #[test]
    fn test_breakdown_empty() {
        assert!(category_breakdown(&[], &ContractConfig::default()).is_empty());
    }

    #[test]
    fn test_relative_time_labels() {
        let now = now();

        assert_eq!(relative_time(now - Duration::seconds(10), now), "just now");
        assert_eq!(relative_time(now + Duration::seconds(10), now), "just now");
        assert_eq!(relative_time(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(relative_time(now - Duration::minutes(5), now), "5 minutes ago");
        assert_eq!(relative_time(now - Duration::hours(2), now), "2 hours ago");
        assert_eq!(relative_time(now - Duration::days(3), now), "3 days ago");
    }

    #[test]
    fn test_activity_feed_order_and_severity() {
        let mut done = batch(1, BatchStatus::Completed, 120);
        done.processed_records = 10;
        done.completed_at = Some(now() - Duration::minutes(60));

        let mut partial = batch(2, BatchStatus::Completed, 300);
        partial.processed_records = 8;
        partial.skipped_records = 2;
        partial.completed_at = Some(now() - Duration::hours(4));

        let mut failed = batch(3, BatchStatus::Failed, 10);
        failed.progress_message = Some("Upstream timeout".to_string());

        let mut running = batch(4, BatchStatus::Enriching, 2);
        running.current_step = Some("Mastercard enrichment".to_string());

        let feed = activity_feed(&[done, partial, failed, running], now());

        let ids: Vec<&str> = feed.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["batch-4-enriching", "batch-3-failed", "batch-1-completed", "batch-2-completed"]
        );

        assert_eq!(feed[0].severity, ActivitySeverity::Info);
        assert_eq!(feed[0].details, "Mastercard enrichment");
        assert_eq!(feed[0].time, "2 minutes ago");
        assert_eq!(feed[1].severity, ActivitySeverity::Error);
        assert_eq!(feed[1].details, "Upstream timeout");
        assert_eq!(feed[2].severity, ActivitySeverity::Success);
        assert_eq!(feed[2].time, "1 hour ago");
        assert_eq!(feed[3].severity, ActivitySeverity::Warning);
        assert_eq!(feed[3].details, "8 payees classified, 2 skipped");

        let validator = ContractValidator::new();
        assert!(feed.iter().all(|item| validator.validate_activity(item).is_ok()));
    }

    #[test]
    fn test_in_progress_batch_with_skipped_records_warns() {
        let mut running = batch(5, BatchStatus::Processing, 1);
        running.processed_records = 4;

        let feed = activity_feed(&[running.clone()], now());
        assert_eq!(feed[0].severity, ActivitySeverity::Info);

        running.skipped_records = 1;
        let feed = activity_feed(&[running], now());
        assert_eq!(feed[0].severity, ActivitySeverity::Warning);
        assert_eq!(feed[0].description, "Processing file5.csv");
    }

    #[test]
    fn test_dashboard_summary() {
        let records = vec![record(1, PayeeType::Banking, 0.8)];
        let batches = vec![batch(1, BatchStatus::Processing, 1)];

        let summary = dashboard_summary(&batches, &records, &ContractConfig::default(), now());

        assert_eq!(summary.stats.total_payees, 1);
        assert_eq!(summary.categories.len(), 1);
        assert_eq!(summary.categories[0].percentage, 100.0);
        assert_eq!(summary.activity.len(), 1);
    }
}
