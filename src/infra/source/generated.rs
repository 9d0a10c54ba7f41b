use std::sync::OnceLock;

use chrono::{DateTime, TimeDelta, Utc};
use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::entities::claim::{Claim, ClaimId, ClaimStatus, InsuranceType, PmsSyncStatus};
use crate::usecase::ports::repo::{ClaimSource, SourceError};

pub const DEFAULT_ROW_COUNT: usize = 250;
pub const DEFAULT_SEED: u64 = 12345;

/// Roughly eighteen months.
const SERVICE_WINDOW_SECS: i64 = 548 * 24 * 60 * 60;

/// Percentages.
const STATUS_WEIGHTS: [(ClaimStatus, u32); 4] = [
    (ClaimStatus::Rejected, 15),
    (ClaimStatus::Pending, 35),
    (ClaimStatus::Call, 25),
    (ClaimStatus::Resubmitted, 25),
];

const PMS_SYNC_WEIGHTS: [(PmsSyncStatus, u32); 4] = [
    (PmsSyncStatus::Synced, 60),
    (PmsSyncStatus::NotSynced, 20),
    (PmsSyncStatus::Pending, 10),
    (PmsSyncStatus::Failed, 10),
];

const FIRST_NAMES: [&str; 16] = [
    "Alice", "Bob", "Charlie", "Diana", "Ethan", "Fiona", "George", "Hannah", "Ivan", "Julia",
    "Kevin", "Laura", "Miguel", "Nora", "Oscar", "Priya",
];

const LAST_NAMES: [&str; 16] = [
    "Smith", "Johnson", "Brown", "Garcia", "Miller", "Davis", "Khan", "Wilson", "Moore",
    "Taylor", "Anderson", "Thomas", "Lee", "Martin", "Clark", "Lewis",
];

const CARRIERS: [(&str, &[&str]); 5] = [
    ("Aetna", &["Dental PPO", "Open Access"]),
    ("Blue Cross Blue Shield", &["Federal Employee", "Blue Choice"]),
    ("Cigna", &["Dental 1500", "Total DPPO"]),
    ("Delta Dental", &["PPO Plus Premier", "DeltaCare USA"]),
    ("MetLife", &["PDP Plus", "Dental Advantage"]),
];

const PROVIDERS: [&str; 6] = [
    "Dr. Sarah Chen",
    "Dr. Michael Ortiz",
    "Dr. Emily Park",
    "Dr. James Walker",
    "Dr. Olivia Reed",
    "Dr. Daniel Brooks",
];

const USERS: [&str; 5] = [
    "Amy Watson",
    "Brian Cole",
    "Carmen Diaz",
    "Derek Hale",
    "Erin Fox",
];

/// Deterministic stand-in for a claims backend. Rows are generated on the
/// first fetch and handed out unchanged afterwards.
pub struct GeneratedClaimSource {
    count: usize,
    seed: u64,
    anchor: DateTime<Utc>,
    cache: OnceLock<Result<Vec<Claim>, SourceError>>,
}

impl GeneratedClaimSource {
    pub fn new(count: usize, seed: u64) -> Self {
        Self::with_anchor(count, seed, Utc::now())
    }

    /// `anchor` plays the role of "now" for every generated timestamp.
    pub fn with_anchor(count: usize, seed: u64, anchor: DateTime<Utc>) -> Self {
        Self {
            count,
            seed,
            anchor,
            cache: OnceLock::new(),
        }
    }
}

impl ClaimSource for GeneratedClaimSource {
    fn fetch_claims(&self) -> Result<Vec<Claim>, SourceError> {
        self.cache
            .get_or_init(|| {
                generate_claims(self.count, self.seed, self.anchor)
                    .map_err(|err| SourceError::Message(format!("claim generator: {err}")))
            })
            .clone()
    }
}

/// Picks enum values with fixed relative weights.
struct Weighted<T> {
    values: Vec<T>,
    index: WeightedIndex<u32>,
}

impl<T: Copy> Weighted<T> {
    fn new(table: &[(T, u32)]) -> Result<Self, WeightedError> {
        let index = WeightedIndex::new(table.iter().map(|(_, weight)| *weight))?;
        Ok(Self {
            values: table.iter().map(|(value, _)| *value).collect(),
            index,
        })
    }

    fn pick(&self, rng: &mut StdRng) -> T {
        self.values[self.index.sample(rng)]
    }
}

struct Weights {
    status: Weighted<ClaimStatus>,
    pms_sync: Weighted<PmsSyncStatus>,
}

pub fn generate_claims(
    count: usize,
    seed: u64,
    anchor: DateTime<Utc>,
) -> Result<Vec<Claim>, WeightedError> {
    let weights = Weights {
        status: Weighted::new(&STATUS_WEIGHTS)?,
        pms_sync: Weighted::new(&PMS_SYNC_WEIGHTS)?,
    };
    let mut rng = StdRng::seed_from_u64(seed);
    Ok((1..=count)
        .map(|idx| generate_claim(&mut rng, &weights, idx, anchor))
        .collect())
}

fn generate_claim(
    rng: &mut StdRng,
    weights: &Weights,
    idx: usize,
    anchor: DateTime<Utc>,
) -> Claim {
    let service_date = anchor - TimeDelta::seconds(rng.gen_range(0..=SERVICE_WINDOW_SECS));
    let last_updated = between(rng, service_date, anchor);
    let date_sent = between(rng, service_date, last_updated);
    let date_sent_orig = between(rng, service_date, date_sent);

    let (carrier, plans) = CARRIERS[rng.gen_range(0..CARRIERS.len())];
    let user = USERS[rng.gen_range(0..USERS.len())];
    let pms_sync_status = weights.pms_sync.pick(rng);
    let amount = (rng.gen_range(50.0..5000.0_f64) * 100.0).round() / 100.0;

    Claim {
        id: ClaimId(format!("row-{idx}")),
        patient: format!(
            "{} {}",
            FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())],
            LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())]
        ),
        patient_id: format!("P{:06}", rng.gen_range(0..1_000_000)),
        service_date,
        insurance_carrier: carrier.to_string(),
        insurance_plan: plans[rng.gen_range(0..plans.len())].to_string(),
        insurance_type: if rng.gen_bool(0.7) {
            InsuranceType::Primary
        } else {
            InsuranceType::Secondary
        },
        amount,
        status: weights.status.pick(rng),
        last_updated,
        user: user.to_string(),
        user_initials: initials(user),
        date_sent,
        date_sent_orig,
        pms_sync_status,
        pms_sync_message: sync_message(pms_sync_status).to_string(),
        provider: PROVIDERS[rng.gen_range(0..PROVIDERS.len())].to_string(),
        provider_id: format!("NPI{:07}", rng.gen_range(0..10_000_000)),
    }
}

fn between(rng: &mut StdRng, from: DateTime<Utc>, to: DateTime<Utc>) -> DateTime<Utc> {
    let span = (to - from).num_seconds().max(0);
    from + TimeDelta::seconds(rng.gen_range(0..=span))
}

fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .collect::<String>()
        .to_uppercase()
}

fn sync_message(status: PmsSyncStatus) -> &'static str {
    match status {
        PmsSyncStatus::Synced => "Claim synced to practice management system",
        PmsSyncStatus::Pending => "Waiting for next sync window",
        PmsSyncStatus::Failed => "Sync failed: practice system rejected the record",
        PmsSyncStatus::NotSynced => "Missing procedure codes",
    }
}
