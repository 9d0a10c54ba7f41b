//! Query-string form of [`TableState`].
//!
//! Only values that differ from their default are written, so the default
//! state encodes to an empty string. Decoding is total: a missing or
//! unparseable parameter falls back to its default.

use std::collections::HashMap;
use std::str::FromStr;

use url::form_urlencoded;

use crate::domain::entities::table::{
    ClaimFilters, PaginationSpec, SortSpec, TableDefaults, TableState,
};

pub const SORT_KEY: &str = "sort";
pub const ORDER_KEY: &str = "order";
pub const PATIENT_KEY: &str = "patient";
pub const STATUS_KEY: &str = "status";
pub const INSURANCE_CARRIER_KEY: &str = "insuranceCarrier";
pub const PMS_SYNC_STATUS_KEY: &str = "pmsSyncStatus";
pub const PROVIDER_KEY: &str = "provider";
pub const PAGE_KEY: &str = "page";
pub const PAGE_SIZE_KEY: &str = "pageSize";

pub fn encode_query(state: &TableState, defaults: &TableDefaults) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());

    if let Some(sort) = state.sort {
        serializer.append_pair(SORT_KEY, sort.field.as_str());
        serializer.append_pair(ORDER_KEY, sort.direction.as_str());
    }

    let filters = &state.filters;
    if !filters.patient.is_empty() {
        serializer.append_pair(PATIENT_KEY, &filters.patient);
    }
    if !filters.status.is_all() {
        serializer.append_pair(STATUS_KEY, &filters.status.to_string());
    }
    if !filters.insurance_carrier.is_empty() {
        serializer.append_pair(INSURANCE_CARRIER_KEY, &filters.insurance_carrier);
    }
    if !filters.pms_sync_status.is_all() {
        serializer.append_pair(PMS_SYNC_STATUS_KEY, &filters.pms_sync_status.to_string());
    }
    if !filters.provider.is_empty() {
        serializer.append_pair(PROVIDER_KEY, &filters.provider);
    }

    if state.pagination.page != 1 {
        serializer.append_pair(PAGE_KEY, &state.pagination.page.to_string());
    }
    if state.pagination.page_size != defaults.page_size {
        serializer.append_pair(PAGE_SIZE_KEY, &state.pagination.page_size.to_string());
    }

    serializer.finish()
}

pub fn decode_query(query: &str, defaults: &TableDefaults) -> TableState {
    let query = query.strip_prefix('?').unwrap_or(query);

    // First occurrence wins for repeated keys.
    let mut params = HashMap::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        params
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }

    let sort = match (
        parse_param(&params, SORT_KEY),
        parse_param(&params, ORDER_KEY),
    ) {
        (Some(field), Some(direction)) => Some(SortSpec { field, direction }),
        _ => None,
    };

    let filters = ClaimFilters {
        patient: text_param(&params, PATIENT_KEY),
        status: parse_param(&params, STATUS_KEY).unwrap_or_default(),
        insurance_carrier: text_param(&params, INSURANCE_CARRIER_KEY),
        pms_sync_status: parse_param(&params, PMS_SYNC_STATUS_KEY).unwrap_or_default(),
        provider: text_param(&params, PROVIDER_KEY),
    };

    let pagination = PaginationSpec {
        page: positive_param(&params, PAGE_KEY).unwrap_or(1),
        page_size: positive_param(&params, PAGE_SIZE_KEY).unwrap_or(defaults.page_size),
    };

    TableState {
        sort,
        filters,
        pagination,
    }
}

/// `path` alone for an empty query, `path?query` otherwise.
pub fn href(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

/// Splits a pasted link into its query part. Accepts a full link, a bare
/// `?query` or a bare query; any `#fragment` is dropped.
pub fn query_from_link(link: &str) -> &str {
    let link = link.trim();
    let link = link.split_once('#').map_or(link, |(before, _)| before);
    match link.split_once('?') {
        Some((_, query)) => query,
        None if link.contains('=') => link,
        None => "",
    }
}

fn text_param(params: &HashMap<String, String>, key: &str) -> String {
    params.get(key).cloned().unwrap_or_default()
}

fn parse_param<T: FromStr>(params: &HashMap<String, String>, key: &str) -> Option<T> {
    let raw = params.get(key)?;
    let parsed = raw.parse().ok();
    if parsed.is_none() {
        tracing::debug!(key, value = %raw, "unparseable query parameter, using default");
    }
    parsed
}

fn positive_param(params: &HashMap<String, String>, key: &str) -> Option<usize> {
    parse_param::<usize>(params, key).filter(|value| *value > 0)
}
