use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, OptionalExtension};

use crate::domain::entities::claim::{Claim, ClaimId};
use crate::infra::sqlite::schema::open_connection;
use crate::usecase::ports::repo::ImportResult;

const CLAIM_COLUMNS: &str = "id, patient, patient_id, service_date, insurance_carrier, \
     insurance_plan, insurance_type, amount, status, last_updated, user_name, user_initials, \
     date_sent, date_sent_orig, pms_sync_status, pms_sync_message, provider, provider_id";

/// Raw column values as stored; converted to a [`Claim`] outside the row
/// callback so parse failures carry context.
struct ClaimRow {
    id: String,
    patient: String,
    patient_id: String,
    service_date: String,
    insurance_carrier: String,
    insurance_plan: String,
    insurance_type: String,
    amount: f64,
    status: String,
    last_updated: String,
    user: String,
    user_initials: String,
    date_sent: String,
    date_sent_orig: String,
    pms_sync_status: String,
    pms_sync_message: String,
    provider: String,
    provider_id: String,
}

impl ClaimRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            patient: row.get(1)?,
            patient_id: row.get(2)?,
            service_date: row.get(3)?,
            insurance_carrier: row.get(4)?,
            insurance_plan: row.get(5)?,
            insurance_type: row.get(6)?,
            amount: row.get(7)?,
            status: row.get(8)?,
            last_updated: row.get(9)?,
            user: row.get(10)?,
            user_initials: row.get(11)?,
            date_sent: row.get(12)?,
            date_sent_orig: row.get(13)?,
            pms_sync_status: row.get(14)?,
            pms_sync_message: row.get(15)?,
            provider: row.get(16)?,
            provider_id: row.get(17)?,
        })
    }

    fn into_claim(self) -> Result<Claim> {
        let context = format!("invalid stored claim {}", self.id);
        Ok(Claim {
            service_date: parse_instant(&self.service_date).context(context.clone())?,
            insurance_type: self.insurance_type.parse().context(context.clone())?,
            status: self.status.parse().context(context.clone())?,
            last_updated: parse_instant(&self.last_updated).context(context.clone())?,
            date_sent: parse_instant(&self.date_sent).context(context.clone())?,
            date_sent_orig: parse_instant(&self.date_sent_orig).context(context.clone())?,
            pms_sync_status: self.pms_sync_status.parse().context(context)?,
            id: ClaimId(self.id),
            patient: self.patient,
            patient_id: self.patient_id,
            insurance_carrier: self.insurance_carrier,
            insurance_plan: self.insurance_plan,
            amount: self.amount,
            user: self.user,
            user_initials: self.user_initials,
            pms_sync_message: self.pms_sync_message,
            provider: self.provider,
            provider_id: self.provider_id,
        })
    }
}

fn format_instant(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("invalid timestamp: {value}"))?;
    Ok(parsed.with_timezone(&Utc))
}

/// Swaps the whole claim set in one transaction and records where it came
/// from. Input order is kept as the stored order.
pub fn replace_claims(db_path: &Path, source_path: &str, claims: &[Claim]) -> Result<i64> {
    let mut conn = open_connection(db_path)?;
    let tx = conn.transaction().context("failed to start transaction")?;

    tx.execute("DELETE FROM claim", [])
        .context("failed to clear existing claims")?;

    let row_count = claims.len() as i64;
    tx.execute(
        "INSERT INTO claim_import(source_path, row_count) VALUES (?1, ?2)",
        params![source_path, row_count],
    )
    .context("failed to insert claim import")?;
    let import_id = tx.last_insert_rowid();

    let mut insert_claim = tx
        .prepare(&format!(
            "INSERT INTO claim(row_idx, import_id, {CLAIM_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)"
        ))
        .context("failed to prepare claim insert")?;

    for (row_idx, claim) in claims.iter().enumerate() {
        insert_claim
            .execute(params![
                row_idx as i64,
                import_id,
                claim.id.0,
                claim.patient,
                claim.patient_id,
                format_instant(&claim.service_date),
                claim.insurance_carrier,
                claim.insurance_plan,
                claim.insurance_type.as_str(),
                claim.amount,
                claim.status.as_str(),
                format_instant(&claim.last_updated),
                claim.user,
                claim.user_initials,
                format_instant(&claim.date_sent),
                format_instant(&claim.date_sent_orig),
                claim.pms_sync_status.as_str(),
                claim.pms_sync_message,
                claim.provider,
                claim.provider_id,
            ])
            .with_context(|| format!("failed to insert claim {}", claim.id))?;
    }
    drop(insert_claim);

    tx.commit().context("failed to commit claim import")?;
    Ok(row_count)
}

pub fn load_claims(db_path: &Path) -> Result<Vec<Claim>> {
    let conn = open_connection(db_path)?;
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {CLAIM_COLUMNS} FROM claim ORDER BY row_idx ASC"
        ))
        .context("failed to prepare claims query")?;

    let rows = stmt
        .query_map([], ClaimRow::from_row)
        .context("failed to query claims")?;

    let mut claims = Vec::new();
    for row in rows {
        let row = row.context("failed to read claim row")?;
        claims.push(row.into_claim()?);
    }

    Ok(claims)
}

pub fn count_claims(db_path: &Path) -> Result<i64> {
    let conn = open_connection(db_path)?;
    conn.query_row("SELECT COUNT(*) FROM claim", [], |row| row.get(0))
        .context("failed to count claims")
}

pub fn last_import(db_path: &Path) -> Result<Option<ImportResult>> {
    let conn = open_connection(db_path)?;
    conn.query_row(
        "SELECT source_path, row_count
         FROM claim_import
         ORDER BY id DESC
         LIMIT 1",
        [],
        |row| {
            Ok(ImportResult {
                source_path: row.get(0)?,
                row_count: row.get(1)?,
            })
        },
    )
    .optional()
    .context("failed to query last import")
}
