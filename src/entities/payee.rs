// 🧾 Payee Classification - One classified record inside an upload batch
//
// Review workflow:
//   auto-classified → user-confirmed | user-corrected   (human review)
//   auto-classified → pending-review                    (confidence too low)
//
// Mastercard attributes are filled only after a successful enrichment
// lookup for this record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// PAYEE TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PayeeType {
    Individual,
    Business,
    Government,
    Insurance,
    Banking,
    #[serde(rename = "Internal Transfer")]
    InternalTransfer,
    Unknown,
}

impl PayeeType {
    pub const ALL: [PayeeType; 7] = [
        PayeeType::Individual,
        PayeeType::Business,
        PayeeType::Government,
        PayeeType::Insurance,
        PayeeType::Banking,
        PayeeType::InternalTransfer,
        PayeeType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PayeeType::Individual => "Individual",
            PayeeType::Business => "Business",
            PayeeType::Government => "Government",
            PayeeType::Insurance => "Insurance",
            PayeeType::Banking => "Banking",
            PayeeType::InternalTransfer => "Internal Transfer",
            PayeeType::Unknown => "Unknown",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == s)
    }

    /// Member of the narrower base set (Individual / Business / Government)
    pub fn is_legacy(&self) -> bool {
        matches!(
            self,
            PayeeType::Individual | PayeeType::Business | PayeeType::Government
        )
    }
}

// ============================================================================
// CLASSIFICATION STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassificationStatus {
    AutoClassified,
    UserConfirmed,
    UserCorrected,
    PendingReview,
}

impl ClassificationStatus {
    pub const ALL: [ClassificationStatus; 4] = [
        ClassificationStatus::AutoClassified,
        ClassificationStatus::UserConfirmed,
        ClassificationStatus::UserCorrected,
        ClassificationStatus::PendingReview,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationStatus::AutoClassified => "auto-classified",
            ClassificationStatus::UserConfirmed => "user-confirmed",
            ClassificationStatus::UserCorrected => "user-corrected",
            ClassificationStatus::PendingReview => "pending-review",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|status| status.as_str() == s)
    }

    /// A human has looked at the record
    pub fn is_reviewed(&self) -> bool {
        matches!(
            self,
            ClassificationStatus::UserConfirmed | ClassificationStatus::UserCorrected
        )
    }
}

// ============================================================================
// MASTERCARD MATCH STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Matched,
    NoMatch,
    Error,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Matched => "matched",
            MatchStatus::NoMatch => "no_match",
            MatchStatus::Error => "error",
        }
    }
}

// ============================================================================
// PAYEE CLASSIFICATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayeeClassification {
    pub id: i64,

    /// Owning upload batch
    pub batch_id: i64,

    /// Name as it appeared in the uploaded file
    pub original_name: String,

    /// Normalized name used for matching
    pub cleaned_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,

    pub payee_type: PayeeType,

    /// Ratio in [0, 1]
    pub confidence: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sic_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sic_description: Option<String>,

    pub status: ClassificationStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,

    /// Source row passthrough, key order preserved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_data: Option<Map<String, Value>>,

    // ========================================================================
    // MASTERCARD ENRICHMENT
    // ========================================================================
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mastercard_match_status: Option<MatchStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mastercard_match_confidence: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mastercard_merchant_category_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mastercard_merchant_category_description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mastercard_acceptance_network: Option<Vec<String>>,

    /// Kept verbatim, the upstream format varies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mastercard_last_transaction_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mastercard_data_quality_level: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mastercard_enrichment_date: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PayeeClassification {
    /// Create an auto-classified record
    pub fn new(
        id: i64,
        batch_id: i64,
        original_name: String,
        cleaned_name: String,
        payee_type: PayeeType,
        confidence: f64,
    ) -> Self {
        let now = Utc::now();

        PayeeClassification {
            id,
            batch_id,
            original_name,
            cleaned_name,
            address: None,
            city: None,
            state: None,
            zip_code: None,
            payee_type,
            confidence,
            sic_code: None,
            sic_description: None,
            status: ClassificationStatus::AutoClassified,
            reviewed_by: None,
            original_data: None,
            mastercard_match_status: None,
            mastercard_match_confidence: None,
            mastercard_merchant_category_code: None,
            mastercard_merchant_category_description: None,
            mastercard_acceptance_network: None,
            mastercard_last_transaction_date: None,
            mastercard_data_quality_level: None,
            mastercard_enrichment_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Read a known sub-field of the passthrough payload
    pub fn original_field(&self, key: &str) -> Option<&Value> {
        self.original_data.as_ref().and_then(|data| data.get(key))
    }

    /// Read a passthrough sub-field that is expected to be a string
    pub fn original_str(&self, key: &str) -> Option<&str> {
        self.original_field(key).and_then(Value::as_str)
    }

    pub fn has_mastercard_fields(&self) -> bool {
        self.mastercard_match_status.is_some() || self.has_mastercard_details()
    }

    /// Any Mastercard attribute besides the match status itself
    pub fn has_mastercard_details(&self) -> bool {
        self.mastercard_match_confidence.is_some()
            || self.mastercard_merchant_category_code.is_some()
            || self.mastercard_merchant_category_description.is_some()
            || self.mastercard_acceptance_network.is_some()
            || self.mastercard_last_transaction_date.is_some()
            || self.mastercard_data_quality_level.is_some()
            || self.mastercard_enrichment_date.is_some()
    }

    pub fn is_mastercard_matched(&self) -> bool {
        self.mastercard_match_status == Some(MatchStatus::Matched)
    }
}

// ============================================================================
// TESTS
// ============================================================================
