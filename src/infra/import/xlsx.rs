use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use csv::StringRecord;

use crate::domain::entities::claim::Claim;
use crate::infra::import::csv::validate_claim;

pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(v) => v.trim().to_string(),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(v) => v.to_string(),
        Data::DateTimeIso(v) => v.to_string(),
        Data::DurationIso(v) => v.to_string(),
        Data::Error(v) => format!("{v:?}"),
        Data::Empty => String::new(),
    }
}

/// Reads claims from the first sheet. Row one holds the same headers as the
/// CSV import; timestamps must be ISO-8601 text cells.
pub fn read_claims_xlsx(xlsx_path: &Path) -> Result<Vec<Claim>> {
    let mut workbook = open_workbook_auto(xlsx_path)
        .with_context(|| format!("failed to open xlsx: {}", xlsx_path.display()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .with_context(|| format!("xlsx has no sheets: {}", xlsx_path.display()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("failed to read sheet: {sheet_name}"))?;

    let mut rows = range.rows();
    let headers: StringRecord = rows
        .next()
        .map(|row| row.iter().map(cell_to_string).collect())
        .context("xlsx header row is required")?;

    let mut claims = Vec::new();
    for (row_idx, row) in rows.enumerate() {
        let record: StringRecord = row.iter().map(cell_to_string).collect();
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = row_idx + 2;
        let claim: Claim = record
            .deserialize(Some(&headers))
            .with_context(|| format!("failed to parse claim on row {line} of {sheet_name}"))?;
        claims.push(
            validate_claim(claim)
                .with_context(|| format!("invalid claim on row {line} of {sheet_name}"))?,
        );
    }

    Ok(claims)
}
