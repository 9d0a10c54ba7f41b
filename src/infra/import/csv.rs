use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};

use crate::domain::entities::claim::Claim;

/// Reads claims from a CSV file whose header row uses the camelCase field
/// names (`id,patient,patientId,serviceDate,...`).
pub fn read_claims_csv(csv_path: &Path) -> Result<Vec<Claim>> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("failed to open csv: {}", csv_path.display()))?;
    read_claims_from_reader(file)
        .with_context(|| format!("failed to import csv: {}", csv_path.display()))
}

pub fn read_claims_from_reader<R: Read>(reader: R) -> Result<Vec<Claim>> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let headers = reader.headers().context("failed to read csv headers")?;
    if headers.is_empty() {
        anyhow::bail!("csv header is required")
    }

    let mut claims = Vec::new();
    for (row_idx, record) in reader.deserialize::<Claim>().enumerate() {
        // +2: one for the header, one for 1-based lines.
        let line = row_idx + 2;
        let claim = record.with_context(|| format!("failed to parse claim on line {line}"))?;
        claims.push(validate_claim(claim).with_context(|| format!("invalid claim on line {line}"))?);
    }

    Ok(claims)
}

/// Rejects values serde accepts but the store and the sort cannot hold.
pub(crate) fn validate_claim(claim: Claim) -> Result<Claim> {
    if !claim.amount.is_finite() {
        anyhow::bail!("claim {} has a non-finite amount: {}", claim.id, claim.amount)
    }
    Ok(claim)
}
