// 🔍 Review workflow - human review of classified payees
//
//   auto-classified ──confirm──▶ user-confirmed
//          │  │                        │
//          │  └──────correct──────┐    │ correct
//          │                      ▼    ▼
//          └──flag/triage──▶ pending-review ──confirm/correct──▶ ...
//
// Every transition stamps `updatedAt`. A rejected transition leaves the
// record untouched.

use crate::config::ContractConfig;
use crate::entities::{ClassificationStatus, PayeeClassification, PayeeType};
use chrono::Utc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("cannot {action} a record that is {from}")]
    IllegalTransition {
        action: &'static str,
        from: &'static str,
    },

    #[error("reviewer identity is required")]
    MissingReviewer,
}

/// Corrected SIC code and its description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SicCorrection {
    pub code: String,
    pub description: Option<String>,
}

fn require_reviewer(reviewer: &str) -> Result<String, ReviewError> {
    let reviewer = reviewer.trim();
    if reviewer.is_empty() {
        return Err(ReviewError::MissingReviewer);
    }
    Ok(reviewer.to_string())
}

fn illegal(action: &'static str, from: ClassificationStatus) -> ReviewError {
    ReviewError::IllegalTransition {
        action,
        from: from.as_str(),
    }
}

impl PayeeClassification {
    /// Reviewer agrees with the automatic result
    pub fn confirm(&mut self, reviewer: &str) -> Result<(), ReviewError> {
        match self.status {
            ClassificationStatus::AutoClassified | ClassificationStatus::PendingReview => {}
            other => return Err(illegal("confirm", other)),
        }
        let reviewer = require_reviewer(reviewer)?;

        self.status = ClassificationStatus::UserConfirmed;
        self.reviewed_by = Some(reviewer);
        self.touch();
        Ok(())
    }

    /// Reviewer overrides the payee type (and optionally the SIC code)
    pub fn correct(
        &mut self,
        reviewer: &str,
        payee_type: PayeeType,
        sic: Option<SicCorrection>,
    ) -> Result<(), ReviewError> {
        if self.status == ClassificationStatus::UserCorrected {
            return Err(illegal("correct", self.status));
        }
        let reviewer = require_reviewer(reviewer)?;

        self.status = ClassificationStatus::UserCorrected;
        self.reviewed_by = Some(reviewer);
        self.payee_type = payee_type;
        self.confidence = 1.0;
        if let Some(sic) = sic {
            self.sic_code = Some(sic.code);
            self.sic_description = sic.description;
        }
        self.touch();
        Ok(())
    }

    /// Send an automatic result to the review queue
    pub fn flag_for_review(&mut self) -> Result<(), ReviewError> {
        if self.status != ClassificationStatus::AutoClassified {
            return Err(illegal("flag", self.status));
        }

        self.status = ClassificationStatus::PendingReview;
        self.reviewed_by = None;
        self.touch();
        Ok(())
    }

    /// Queue low-confidence automatic results; returns whether the record moved
    pub fn triage(&mut self, config: &ContractConfig) -> bool {
        if self.status == ClassificationStatus::AutoClassified
            && self.confidence < config.review_threshold
        {
            return self.flag_for_review().is_ok();
        }
        false
    }

    pub fn needs_review(&self) -> bool {
        self.status == ClassificationStatus::PendingReview
    }

    // Backend clocks may run ahead of ours; never stamp before createdAt
    fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.created_at);
    }
}

/// Triage a whole batch of records, returns how many were queued
pub fn triage_all(records: &mut [PayeeClassification], config: &ContractConfig) -> usize {
    records
        .iter_mut()
        .map(|r| r.triage(config))
        .filter(|moved| *moved)
        .count()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ContractValidator;

    fn create_test_record(confidence: f64) -> PayeeClassification {
        PayeeClassification::new(
            1,
            7,
            "J SMITH".to_string(),
            "J Smith".to_string(),
            PayeeType::Individual,
            confidence,
        )
    }

    #[test]
    fn test_confirm_auto_classified() {
        let mut record = create_test_record(0.92);
        let before = record.updated_at;

        record.confirm("alice").unwrap();

        assert_eq!(record.status, ClassificationStatus::UserConfirmed);
        assert_eq!(record.reviewed_by.as_deref(), Some("alice"));
        assert!(record.updated_at >= before);
        assert!(ContractValidator::new().validate_classification(&record).is_ok());
    }

    #[test]
    fn test_review_of_future_dated_record_keeps_timestamps_ordered() {
        let mut record = create_test_record(0.92);
        record.created_at = Utc::now() + chrono::Duration::hours(2);
        record.updated_at = record.created_at;

        record.confirm("alice").unwrap();

        assert_eq!(record.updated_at, record.created_at);
        assert!(ContractValidator::new().validate_classification(&record).is_ok());
    }

    #[test]
    fn test_confirm_requires_reviewer() {
        let mut record = create_test_record(0.92);

        assert_eq!(record.confirm("   "), Err(ReviewError::MissingReviewer));
        assert_eq!(record.status, ClassificationStatus::AutoClassified);
    }

    #[test]
    fn test_confirm_twice_rejected() {
        let mut record = create_test_record(0.92);
        record.confirm("alice").unwrap();

        let err = record.confirm("bob").unwrap_err();

        assert_eq!(
            err,
            ReviewError::IllegalTransition {
                action: "confirm",
                from: "user-confirmed"
            }
        );
        assert_eq!(record.reviewed_by.as_deref(), Some("alice"));
        println!("{}", err);
    }

    #[test]
    fn test_correct_sets_type_and_confidence() {
        let mut record = create_test_record(0.55);

        record
            .correct(
                "bob",
                PayeeType::Business,
                Some(SicCorrection {
                    code: "7389".to_string(),
                    description: Some("Business Services".to_string()),
                }),
            )
            .unwrap();

        assert_eq!(record.status, ClassificationStatus::UserCorrected);
        assert_eq!(record.payee_type, PayeeType::Business);
        assert_eq!(record.confidence, 1.0);
        assert_eq!(record.sic_code.as_deref(), Some("7389"));
        assert!(ContractValidator::new().validate_classification(&record).is_ok());
    }

    #[test]
    fn test_correct_after_confirm() {
        let mut record = create_test_record(0.92);
        record.confirm("alice").unwrap();

        record.correct("bob", PayeeType::Banking, None).unwrap();

        assert_eq!(record.status, ClassificationStatus::UserCorrected);
        assert_eq!(record.reviewed_by.as_deref(), Some("bob"));
        assert!(record.correct("carol", PayeeType::Unknown, None).is_err());
    }

    #[test]
    fn test_flag_only_from_auto() {
        let mut record = create_test_record(0.92);
        record.flag_for_review().unwrap();
        assert!(record.needs_review());
        assert!(record.flag_for_review().is_err());

        record.confirm("alice").unwrap();
        assert!(!record.needs_review());
    }

    #[test]
    fn test_triage_threshold() {
        let config = ContractConfig::default();
        let mut records = vec![
            create_test_record(0.95),
            create_test_record(0.69),
            create_test_record(0.70),
            create_test_record(0.10),
        ];
        records[3].confirm("alice").unwrap();

        let queued = triage_all(&mut records, &config);

        assert_eq!(queued, 1);
        assert!(records[1].needs_review());
        assert!(!records[2].needs_review());
        assert_eq!(records[3].status, ClassificationStatus::UserConfirmed);
    }
}
