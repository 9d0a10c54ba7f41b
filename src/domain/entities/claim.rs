use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimId(pub String);

impl From<String> for ClaimId {
    fn from(value: String) -> Self {
        ClaimId(value)
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value: {value:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    Pending,
    Call,
    Resubmitted,
    Rejected,
}

impl ClaimStatus {
    pub const ALL: [ClaimStatus; 4] = [
        ClaimStatus::Pending,
        ClaimStatus::Call,
        ClaimStatus::Resubmitted,
        ClaimStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ClaimStatus::Pending => "PENDING",
            ClaimStatus::Call => "CALL",
            ClaimStatus::Resubmitted => "RESUBMITTED",
            ClaimStatus::Rejected => "REJECTED",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ClaimStatus::Pending => "Pending",
            ClaimStatus::Call => "Call",
            ClaimStatus::Resubmitted => "Resubmitted",
            ClaimStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ClaimStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| ParseEnumError {
                kind: "status",
                value: value.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PmsSyncStatus {
    Synced,
    Pending,
    Failed,
    NotSynced,
}

impl PmsSyncStatus {
    pub const ALL: [PmsSyncStatus; 4] = [
        PmsSyncStatus::Synced,
        PmsSyncStatus::Pending,
        PmsSyncStatus::Failed,
        PmsSyncStatus::NotSynced,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PmsSyncStatus::Synced => "SYNCED",
            PmsSyncStatus::Pending => "PENDING",
            PmsSyncStatus::Failed => "FAILED",
            PmsSyncStatus::NotSynced => "NOT_SYNCED",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PmsSyncStatus::Synced => "Synced",
            PmsSyncStatus::Pending => "Pending",
            PmsSyncStatus::Failed => "Failed",
            PmsSyncStatus::NotSynced => "Not synced",
        }
    }
}

impl fmt::Display for PmsSyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PmsSyncStatus {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        PmsSyncStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| ParseEnumError {
                kind: "pmsSyncStatus",
                value: value.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InsuranceType {
    Primary,
    Secondary,
}

impl InsuranceType {
    pub fn as_str(self) -> &'static str {
        match self {
            InsuranceType::Primary => "Primary",
            InsuranceType::Secondary => "Secondary",
        }
    }
}

impl fmt::Display for InsuranceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InsuranceType {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Primary" => Ok(InsuranceType::Primary),
            "Secondary" => Ok(InsuranceType::Secondary),
            _ => Err(ParseEnumError {
                kind: "insuranceType",
                value: value.to_string(),
            }),
        }
    }
}

/// One billing claim row. Read-only once loaded; the table pipeline only
/// reorders, filters and slices references to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub id: ClaimId,
    pub patient: String,
    pub patient_id: String,
    pub service_date: DateTime<Utc>,
    pub insurance_carrier: String,
    pub insurance_plan: String,
    pub insurance_type: InsuranceType,
    pub amount: f64,
    pub status: ClaimStatus,
    pub last_updated: DateTime<Utc>,
    pub user: String,
    pub user_initials: String,
    pub date_sent: DateTime<Utc>,
    pub date_sent_orig: DateTime<Utc>,
    pub pms_sync_status: PmsSyncStatus,
    pub pms_sync_message: String,
    pub provider: String,
    pub provider_id: String,
}

/// Every displayable attribute of a claim, addressed by its wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimField {
    Patient,
    ServiceDate,
    InsuranceCarrier,
    Amount,
    Status,
    LastUpdated,
    User,
    DateSent,
    DateSentOrig,
    PmsSyncStatus,
    Provider,
}

/// A borrowed scalar pulled out of a claim for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    Text(&'a str),
    Number(f64),
    Instant(&'a DateTime<Utc>),
    Status(ClaimStatus),
    PmsSync(PmsSyncStatus),
}

impl Claim {
    pub fn value(&self, field: ClaimField) -> CellValue<'_> {
        match field {
            ClaimField::Patient => CellValue::Text(&self.patient),
            ClaimField::ServiceDate => CellValue::Instant(&self.service_date),
            ClaimField::InsuranceCarrier => CellValue::Text(&self.insurance_carrier),
            ClaimField::Amount => CellValue::Number(self.amount),
            ClaimField::Status => CellValue::Status(self.status),
            ClaimField::LastUpdated => CellValue::Instant(&self.last_updated),
            ClaimField::User => CellValue::Text(&self.user),
            ClaimField::DateSent => CellValue::Instant(&self.date_sent),
            ClaimField::DateSentOrig => CellValue::Instant(&self.date_sent_orig),
            ClaimField::PmsSyncStatus => CellValue::PmsSync(self.pms_sync_status),
            ClaimField::Provider => CellValue::Text(&self.provider),
        }
    }
}
