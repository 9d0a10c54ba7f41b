use crate::domain::entities::claim::Claim;
use crate::domain::entities::table::ClaimFilters;

/// Case-insensitive containment. An empty needle matches everything.
pub fn text_matches(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// A claim passes when every criterion passes. All five are evaluated, none
/// is short-circuited away for being inactive.
pub fn claim_matches(claim: &Claim, filters: &ClaimFilters) -> bool {
    let patient = text_matches(&claim.patient, &filters.patient);
    let status = filters.status.matches(claim.status);
    let carrier = text_matches(&claim.insurance_carrier, &filters.insurance_carrier);
    let pms_sync = filters.pms_sync_status.matches(claim.pms_sync_status);
    let provider = text_matches(&claim.provider, &filters.provider);

    patient && status && carrier && pms_sync && provider
}

pub fn filter_claims<'a>(records: &'a [Claim], filters: &ClaimFilters) -> Vec<&'a Claim> {
    records
        .iter()
        .filter(|claim| claim_matches(claim, filters))
        .collect()
}
