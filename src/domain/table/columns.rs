//! Column descriptors and the cell formatter registry.
//!
//! A column names the claim field it shows and the semantic kind of its
//! cells; the kind alone picks the formatter.

use chrono::{DateTime, Utc};

use crate::domain::entities::claim::{CellValue, Claim, ClaimField, InsuranceType, PmsSyncStatus};
use crate::domain::entities::table::SortField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Patient,
    Date,
    DateWithTime,
    Currency,
    InsuranceCarrier,
    StatusLabel,
    UserAvatar,
    PmsSync,
    Provider,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Info,
    Warning,
    Success,
    Danger,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub label: String,
    pub tone: BadgeTone,
}

/// Presentation-neutral cell content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellDisplay {
    pub primary: String,
    pub secondary: Option<String>,
    pub badge: Option<Badge>,
}

impl CellDisplay {
    fn plain(primary: String) -> Self {
        Self {
            primary,
            ..Self::default()
        }
    }
}

pub type Formatter = fn(&CellValue<'_>, &Claim) -> CellDisplay;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub field: ClaimField,
    pub sort_field: Option<SortField>,
    pub kind: CellKind,
}

impl ColumnDescriptor {
    pub fn sortable(&self) -> bool {
        self.sort_field.is_some()
    }

    pub fn render(&self, claim: &Claim) -> CellDisplay {
        formatter_for(self.kind)(&claim.value(self.field), claim)
    }
}

static CLAIM_COLUMNS: [ColumnDescriptor; 11] = [
    ColumnDescriptor {
        key: "patient",
        label: "Patient",
        field: ClaimField::Patient,
        sort_field: Some(SortField::Patient),
        kind: CellKind::Patient,
    },
    ColumnDescriptor {
        key: "serviceDate",
        label: "Service Date",
        field: ClaimField::ServiceDate,
        sort_field: Some(SortField::ServiceDate),
        kind: CellKind::Date,
    },
    ColumnDescriptor {
        key: "insuranceCarrier",
        label: "Insurance Carrier",
        field: ClaimField::InsuranceCarrier,
        sort_field: None,
        kind: CellKind::InsuranceCarrier,
    },
    ColumnDescriptor {
        key: "amount",
        label: "Amount",
        field: ClaimField::Amount,
        sort_field: Some(SortField::Amount),
        kind: CellKind::Currency,
    },
    ColumnDescriptor {
        key: "status",
        label: "Status",
        field: ClaimField::Status,
        sort_field: Some(SortField::Status),
        kind: CellKind::StatusLabel,
    },
    ColumnDescriptor {
        key: "lastUpdated",
        label: "Last Updated",
        field: ClaimField::LastUpdated,
        sort_field: Some(SortField::LastUpdated),
        kind: CellKind::DateWithTime,
    },
    ColumnDescriptor {
        key: "user",
        label: "User",
        field: ClaimField::User,
        sort_field: None,
        kind: CellKind::UserAvatar,
    },
    ColumnDescriptor {
        key: "dateSent",
        label: "Date Sent",
        field: ClaimField::DateSent,
        sort_field: None,
        kind: CellKind::Date,
    },
    ColumnDescriptor {
        key: "dateSentOrig",
        label: "Date Sent Orig",
        field: ClaimField::DateSentOrig,
        sort_field: None,
        kind: CellKind::Date,
    },
    ColumnDescriptor {
        key: "pmsSyncStatus",
        label: "PMS Sync Status",
        field: ClaimField::PmsSyncStatus,
        sort_field: Some(SortField::PmsSyncStatus),
        kind: CellKind::PmsSync,
    },
    ColumnDescriptor {
        key: "provider",
        label: "Provider",
        field: ClaimField::Provider,
        sort_field: None,
        kind: CellKind::Provider,
    },
];

pub fn claim_columns() -> &'static [ColumnDescriptor] {
    &CLAIM_COLUMNS
}

pub fn column_by_key(key: &str) -> Option<&'static ColumnDescriptor> {
    CLAIM_COLUMNS.iter().find(|column| column.key == key)
}

pub fn formatter_for(kind: CellKind) -> Formatter {
    match kind {
        CellKind::Patient => format_patient,
        CellKind::Date => format_date_cell,
        CellKind::DateWithTime => format_date_with_time,
        CellKind::Currency => format_currency_cell,
        CellKind::InsuranceCarrier => format_insurance_carrier,
        CellKind::StatusLabel => format_status_label,
        CellKind::UserAvatar => format_user_avatar,
        CellKind::PmsSync => format_pms_sync,
        CellKind::Provider => format_provider,
        CellKind::Text => format_text,
    }
}

pub fn format_date(value: &DateTime<Utc>) -> String {
    value.format("%b %d, %Y").to_string()
}

pub fn format_time(value: &DateTime<Utc>) -> String {
    value.format("%H:%M").to_string()
}

pub fn format_number_with_commas(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return String::new();
    }
    let text = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, digit) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(frac_part) = frac_part {
        grouped.push('.');
        grouped.push_str(frac_part);
    }

    let is_zero = text.chars().all(|c| c == '0' || c == '.');
    if value.is_sign_negative() && !is_zero {
        format!("-{grouped}")
    } else {
        grouped
    }
}

pub fn format_currency(amount: f64) -> String {
    let text = format_number_with_commas(amount, 2);
    match text.strip_prefix('-') {
        Some(abs) => format!("-${abs}"),
        None => format!("${text}"),
    }
}

fn value_text(value: &CellValue<'_>) -> String {
    match value {
        CellValue::Text(text) => (*text).to_string(),
        CellValue::Number(number) => format_number_with_commas(*number, 2),
        CellValue::Instant(instant) => format_date(instant),
        CellValue::Status(status) => status.as_str().to_string(),
        CellValue::PmsSync(status) => status.label().to_string(),
    }
}

fn format_text(value: &CellValue<'_>, _claim: &Claim) -> CellDisplay {
    CellDisplay::plain(value_text(value))
}

fn format_patient(value: &CellValue<'_>, claim: &Claim) -> CellDisplay {
    CellDisplay {
        primary: value_text(value),
        secondary: Some(format!("ID: {}", claim.patient_id)),
        badge: None,
    }
}

fn format_provider(value: &CellValue<'_>, claim: &Claim) -> CellDisplay {
    CellDisplay {
        primary: value_text(value),
        secondary: Some(format!("ID: {}", claim.provider_id)),
        badge: None,
    }
}

fn format_date_cell(value: &CellValue<'_>, _claim: &Claim) -> CellDisplay {
    CellDisplay::plain(value_text(value))
}

fn format_date_with_time(value: &CellValue<'_>, _claim: &Claim) -> CellDisplay {
    match value {
        CellValue::Instant(instant) => CellDisplay {
            primary: format_date(instant),
            secondary: Some(format_time(instant)),
            badge: None,
        },
        other => CellDisplay::plain(value_text(other)),
    }
}

fn format_currency_cell(value: &CellValue<'_>, _claim: &Claim) -> CellDisplay {
    match value {
        CellValue::Number(amount) => CellDisplay::plain(format_currency(*amount)),
        other => CellDisplay::plain(value_text(other)),
    }
}

fn format_insurance_carrier(value: &CellValue<'_>, claim: &Claim) -> CellDisplay {
    let tone = match claim.insurance_type {
        InsuranceType::Primary => BadgeTone::Info,
        InsuranceType::Secondary => BadgeTone::Warning,
    };
    CellDisplay {
        primary: value_text(value),
        secondary: Some(claim.insurance_plan.clone()),
        badge: Some(Badge {
            label: claim.insurance_type.as_str().to_string(),
            tone,
        }),
    }
}

fn format_status_label(value: &CellValue<'_>, _claim: &Claim) -> CellDisplay {
    CellDisplay::plain(format!("NCOF - {}", value_text(value)))
}

fn format_user_avatar(_value: &CellValue<'_>, claim: &Claim) -> CellDisplay {
    CellDisplay {
        primary: claim.user_initials.clone(),
        secondary: None,
        badge: Some(Badge {
            label: claim.user_initials.clone(),
            tone: BadgeTone::Success,
        }),
    }
}

fn format_pms_sync(value: &CellValue<'_>, claim: &Claim) -> CellDisplay {
    let tone = match value {
        CellValue::PmsSync(PmsSyncStatus::Synced) => BadgeTone::Success,
        CellValue::PmsSync(PmsSyncStatus::Failed) => BadgeTone::Danger,
        CellValue::PmsSync(PmsSyncStatus::Pending) => BadgeTone::Warning,
        _ => BadgeTone::Neutral,
    };
    CellDisplay {
        primary: value_text(value),
        secondary: Some(claim.pms_sync_message.clone()).filter(|message| !message.is_empty()),
        badge: Some(Badge {
            label: value_text(value),
            tone,
        }),
    }
}
