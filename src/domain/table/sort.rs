use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use thiserror::Error;

use crate::domain::entities::claim::{Claim, ClaimStatus, PmsSyncStatus};
use crate::domain::entities::table::{SortDirection, SortField, SortSpec};
use crate::domain::table::compare::compare_values;

/// Scalar a record is ordered by once a field has been picked.
///
/// Totally ordered: numbers use [`f64::total_cmp`], so NaN amounts sort
/// after every finite value instead of breaking the sort.
#[derive(Debug, Clone)]
pub enum SortKey {
    Text(String),
    Number(f64),
    Rank(usize),
    Instant(i64),
}

impl SortKey {
    fn variant_index(&self) -> u8 {
        match self {
            SortKey::Text(_) => 0,
            SortKey::Number(_) => 1,
            SortKey::Rank(_) => 2,
            SortKey::Instant(_) => 3,
        }
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Rank(a), SortKey::Rank(b)) => a.cmp(b),
            (SortKey::Instant(a), SortKey::Instant(b)) => a.cmp(b),
            _ => self.variant_index().cmp(&other.variant_index()),
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey {}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriorityError {
    #[error("{kind} priority list is missing {value}")]
    Missing { kind: &'static str, value: String },
    #[error("{kind} priority list ranks {value} more than once")]
    Duplicate { kind: &'static str, value: String },
}

/// Domain ranking for enumerated columns. Sorting by status follows these
/// lists, never the alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortPriorities {
    status: Vec<ClaimStatus>,
    pms_sync: Vec<PmsSyncStatus>,
}

impl Default for SortPriorities {
    fn default() -> Self {
        Self {
            status: vec![
                ClaimStatus::Pending,
                ClaimStatus::Call,
                ClaimStatus::Resubmitted,
                ClaimStatus::Rejected,
            ],
            pms_sync: vec![
                PmsSyncStatus::Synced,
                PmsSyncStatus::Pending,
                PmsSyncStatus::Failed,
                PmsSyncStatus::NotSynced,
            ],
        }
    }
}

impl SortPriorities {
    /// Both lists must be exact permutations of their live enum.
    pub fn new(
        status: Vec<ClaimStatus>,
        pms_sync: Vec<PmsSyncStatus>,
    ) -> Result<Self, PriorityError> {
        check_permutation("status", &status, &ClaimStatus::ALL)?;
        check_permutation("pmsSyncStatus", &pms_sync, &PmsSyncStatus::ALL)?;
        Ok(Self { status, pms_sync })
    }

    pub fn status(&self) -> &[ClaimStatus] {
        &self.status
    }

    pub fn pms_sync(&self) -> &[PmsSyncStatus] {
        &self.pms_sync
    }

    pub fn status_rank(&self, status: ClaimStatus) -> usize {
        rank_of("status", &self.status, status)
    }

    pub fn pms_sync_rank(&self, status: PmsSyncStatus) -> usize {
        rank_of("pmsSyncStatus", &self.pms_sync, status)
    }
}

fn check_permutation<T>(kind: &'static str, list: &[T], live: &[T]) -> Result<(), PriorityError>
where
    T: Copy + Eq + Hash + fmt::Display,
{
    let mut seen = HashSet::new();
    for value in list {
        if !seen.insert(*value) {
            return Err(PriorityError::Duplicate {
                kind,
                value: value.to_string(),
            });
        }
    }
    if let Some(missing) = live.iter().find(|value| !seen.contains(*value)) {
        return Err(PriorityError::Missing {
            kind,
            value: missing.to_string(),
        });
    }
    Ok(())
}

fn rank_of<T: Copy + Eq + fmt::Display>(kind: &str, list: &[T], value: T) -> usize {
    list.iter().position(|item| *item == value).unwrap_or_else(|| {
        tracing::warn!(kind, %value, "value has no priority rank, sorting it last");
        list.len()
    })
}

pub fn claim_sort_key(claim: &Claim, field: SortField, priorities: &SortPriorities) -> SortKey {
    match field {
        SortField::Patient => SortKey::Text(claim.patient.to_lowercase()),
        SortField::Amount => SortKey::Number(claim.amount),
        SortField::Status => SortKey::Rank(priorities.status_rank(claim.status)),
        SortField::PmsSyncStatus => SortKey::Rank(priorities.pms_sync_rank(claim.pms_sync_status)),
        SortField::ServiceDate => SortKey::Instant(claim.service_date.timestamp_millis()),
        SortField::LastUpdated => SortKey::Instant(claim.last_updated.timestamp_millis()),
    }
}

/// Stable sort of borrowed records by an extracted key. The input slice is
/// never touched; without a direction the result keeps the input order.
pub fn sort_by_key<'a, R, K, F>(
    records: &[&'a R],
    direction: Option<SortDirection>,
    key: F,
) -> Vec<&'a R>
where
    R: ?Sized,
    K: Ord,
    F: Fn(&R) -> K,
{
    if direction.is_none() {
        return records.to_vec();
    }

    let mut keyed: Vec<(K, &'a R)> = records.iter().map(|record| (key(*record), *record)).collect();
    keyed.sort_by(|(a, _), (b, _)| compare_values(a, b, direction));
    keyed.into_iter().map(|(_, record)| record).collect()
}

pub fn sort_claims<'a>(
    records: &[&'a Claim],
    field: SortField,
    direction: Option<SortDirection>,
    priorities: &SortPriorities,
) -> Vec<&'a Claim> {
    sort_by_key(records, direction, |claim| {
        claim_sort_key(claim, field, priorities)
    })
}

/// Header click cycling: another column always starts ascending, the same
/// column goes unsorted -> asc -> desc -> unsorted.
pub fn next_sort_direction(
    current_field: Option<SortField>,
    clicked: SortField,
    current_direction: Option<SortDirection>,
) -> Option<SortDirection> {
    if current_field != Some(clicked) {
        return Some(SortDirection::Asc);
    }

    match current_direction {
        None => Some(SortDirection::Asc),
        Some(SortDirection::Asc) => Some(SortDirection::Desc),
        Some(SortDirection::Desc) => None,
    }
}

/// Applies [`next_sort_direction`] to a whole [`SortSpec`]. Landing on no direction
/// drops the field too, so unsorted has exactly one representation.
pub fn next_sort(current: Option<SortSpec>, clicked: SortField) -> Option<SortSpec> {
    let direction = next_sort_direction(
        current.map(|sort| sort.field),
        clicked,
        current.map(|sort| sort.direction),
    )?;
    Some(SortSpec {
        field: clicked,
        direction,
    })
}
