// 📤 CSV export of classified payees
//
// Columns use the wire names so an exported file reads the same as the
// JSON contract. Absent optionals become empty cells.

use crate::codec::ContractError;
use crate::entities::PayeeClassification;
use serde::Serialize;
use std::io::Write;

const HEADER: [&str; 16] = [
    "id",
    "batchId",
    "originalName",
    "cleanedName",
    "payeeType",
    "confidence",
    "sicCode",
    "sicDescription",
    "status",
    "reviewedBy",
    "address",
    "city",
    "state",
    "zipCode",
    "mastercardMatchStatus",
    "mastercardMerchantCategoryCode",
];

// Field order must match HEADER
#[derive(Debug, Serialize)]
struct ClassificationRow<'a> {
    id: i64,
    batch_id: i64,
    original_name: &'a str,
    cleaned_name: &'a str,
    payee_type: &'static str,
    confidence: f64,
    sic_code: Option<&'a str>,
    sic_description: Option<&'a str>,
    status: &'static str,
    reviewed_by: Option<&'a str>,
    address: Option<&'a str>,
    city: Option<&'a str>,
    state: Option<&'a str>,
    zip_code: Option<&'a str>,
    mastercard_match_status: Option<&'static str>,
    mastercard_merchant_category_code: Option<&'a str>,
}

impl<'a> From<&'a PayeeClassification> for ClassificationRow<'a> {
    fn from(record: &'a PayeeClassification) -> Self {
        ClassificationRow {
            id: record.id,
            batch_id: record.batch_id,
            original_name: &record.original_name,
            cleaned_name: &record.cleaned_name,
            payee_type: record.payee_type.as_str(),
            confidence: record.confidence,
            sic_code: record.sic_code.as_deref(),
            sic_description: record.sic_description.as_deref(),
            status: record.status.as_str(),
            reviewed_by: record.reviewed_by.as_deref(),
            address: record.address.as_deref(),
            city: record.city.as_deref(),
            state: record.state.as_deref(),
            zip_code: record.zip_code.as_deref(),
            mastercard_match_status: record.mastercard_match_status.map(|s| s.as_str()),
            mastercard_merchant_category_code: record.mastercard_merchant_category_code.as_deref(),
        }
    }
}

/// Write one header row plus one row per record; returns the row count
pub fn write_classifications_csv<W: Write>(
    records: &[PayeeClassification],
    writer: W,
) -> Result<usize, ContractError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(HEADER)?;
    for record in records {
        csv_writer.serialize(ClassificationRow::from(record))?;
    }
    csv_writer.flush()?;

    Ok(records.len())
}
