use std::fmt;
use std::str::FromStr;

use crate::domain::entities::claim::{ClaimField, ClaimStatus, ParseEnumError, PmsSyncStatus};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const ALL_SENTINEL: &str = "ALL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(ParseEnumError {
                kind: "order",
                value: value.to_string(),
            }),
        }
    }
}

/// Columns the sort engine knows how to key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Patient,
    ServiceDate,
    Amount,
    Status,
    LastUpdated,
    PmsSyncStatus,
}

impl SortField {
    pub const ALL: [SortField; 6] = [
        SortField::Patient,
        SortField::ServiceDate,
        SortField::Amount,
        SortField::Status,
        SortField::LastUpdated,
        SortField::PmsSyncStatus,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Patient => "patient",
            SortField::ServiceDate => "serviceDate",
            SortField::Amount => "amount",
            SortField::Status => "status",
            SortField::LastUpdated => "lastUpdated",
            SortField::PmsSyncStatus => "pmsSyncStatus",
        }
    }

    pub fn claim_field(self) -> ClaimField {
        match self {
            SortField::Patient => ClaimField::Patient,
            SortField::ServiceDate => ClaimField::ServiceDate,
            SortField::Amount => ClaimField::Amount,
            SortField::Status => ClaimField::Status,
            SortField::LastUpdated => ClaimField::LastUpdated,
            SortField::PmsSyncStatus => ClaimField::PmsSyncStatus,
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|field| field.as_str() == value)
            .ok_or_else(|| ParseEnumError {
                kind: "sort field",
                value: value.to_string(),
            })
    }
}

/// Active sort. `None` at the [`TableState`] level means unsorted: the
/// filtered order is shown as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

/// An enumerated criterion: the `ALL` wildcard or one exact value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumFilter<T> {
    All,
    Only(T),
}

impl<T> Default for EnumFilter<T> {
    fn default() -> Self {
        EnumFilter::All
    }
}

impl<T: PartialEq + Copy> EnumFilter<T> {
    pub fn matches(&self, value: T) -> bool {
        match self {
            EnumFilter::All => true,
            EnumFilter::Only(expected) => *expected == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, EnumFilter::All)
    }
}

impl<T: fmt::Display> fmt::Display for EnumFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumFilter::All => f.write_str(ALL_SENTINEL),
            EnumFilter::Only(value) => value.fmt(f),
        }
    }
}

impl<T: FromStr<Err = ParseEnumError>> FromStr for EnumFilter<T> {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == ALL_SENTINEL {
            return Ok(EnumFilter::All);
        }
        value.parse().map(EnumFilter::Only)
    }
}

/// Every configured criterion, always defined. Text criteria are empty
/// when inactive, enum criteria are `ALL`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClaimFilters {
    pub patient: String,
    pub status: EnumFilter<ClaimStatus>,
    pub insurance_carrier: String,
    pub pms_sync_status: EnumFilter<PmsSyncStatus>,
    pub provider: String,
}

impl ClaimFilters {
    pub fn is_default(&self) -> bool {
        *self == ClaimFilters::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationSpec {
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
}

impl PaginationSpec {
    pub fn first_page(page_size: usize) -> Self {
        Self { page: 1, page_size }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDefaults {
    pub page_size: usize,
}

impl Default for TableDefaults {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// The composite view state. Replaced wholesale on every transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    pub sort: Option<SortSpec>,
    pub filters: ClaimFilters,
    pub pagination: PaginationSpec,
}

impl TableState {
    pub fn initial(defaults: &TableDefaults) -> Self {
        Self {
            sort: None,
            filters: ClaimFilters::default(),
            pagination: PaginationSpec::first_page(defaults.page_size),
        }
    }

    pub fn sort_field(&self) -> Option<SortField> {
        self.sort.map(|sort| sort.field)
    }

    pub fn sort_direction(&self) -> Option<SortDirection> {
        self.sort.map(|sort| sort.direction)
    }
}
