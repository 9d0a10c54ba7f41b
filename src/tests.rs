use std::io::Write;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use rstest::rstest;

use crate::config::{AppConfig, ConfigError};
use crate::domain::entities::claim::{
    CellValue, Claim, ClaimField, ClaimId, ClaimStatus, InsuranceType, PmsSyncStatus,
};
use crate::domain::entities::table::{
    ClaimFilters, EnumFilter, PaginationSpec, SortDirection, SortField, SortSpec, TableDefaults,
    TableState,
};
use crate::domain::table::columns::{
    claim_columns, column_by_key, format_currency, format_date, format_number_with_commas,
    BadgeTone,
};
use crate::domain::table::compare::compare_values;
use crate::domain::table::filter::{claim_matches, filter_claims, text_matches};
use crate::domain::table::paginate::{
    change_page, change_page_size, paginate, total_pages, validate_pagination, InvalidPagination,
    PageNavigation, PageOutOfRange,
};
use crate::domain::table::pipeline::{derive_view, TableView};
use crate::domain::table::query::{decode_query, encode_query, href, query_from_link};
use crate::domain::table::sort::{
    claim_sort_key, next_sort, next_sort_direction, sort_by_key, sort_claims, PriorityError,
    SortPriorities,
};
use crate::infra::import::csv::{read_claims_csv, read_claims_from_reader};
use crate::infra::location::memory::MemoryLocation;
use crate::infra::source::generated::{generate_claims, GeneratedClaimSource};
use crate::infra::sqlite::queries::{count_claims, last_import, load_claims, replace_claims};
use crate::infra::sqlite::repo::SqliteRepo;
use crate::infra::sqlite::schema::init_db;
use crate::ui::debounce::{Debouncer, DEFAULT_FILTER_DEBOUNCE_MS};
use crate::ui::styles::{badge_style, sort_indicator, sortable_header_cell_style};
use crate::usecase::ports::location::QueryLocation;
use crate::usecase::ports::repo::{ClaimSource, SourceError};
use crate::usecase::services::import_service::{ImportService, GENERATED_SOURCE_PATH};
use crate::usecase::services::query_service::{LoadState, QueryService};
use crate::usecase::services::table_service::TableService;

fn anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
        .single()
        .expect("anchor should be a valid instant")
}

fn claim(idx: usize, patient: &str, status: ClaimStatus, amount: f64) -> Claim {
    let service_date = anchor() - TimeDelta::days(idx as i64);
    Claim {
        id: ClaimId(format!("row-{idx}")),
        patient: patient.to_string(),
        patient_id: format!("P{idx:06}"),
        service_date,
        insurance_carrier: "Aetna".to_string(),
        insurance_plan: "Dental PPO".to_string(),
        insurance_type: InsuranceType::Primary,
        amount,
        status,
        last_updated: service_date + TimeDelta::hours(3),
        user: "Amy Watson".to_string(),
        user_initials: "AW".to_string(),
        date_sent: service_date + TimeDelta::hours(1),
        date_sent_orig: service_date,
        pms_sync_status: PmsSyncStatus::Synced,
        pms_sync_message: String::new(),
        provider: "Dr. Sarah Chen".to_string(),
        provider_id: format!("NPI{idx:07}"),
    }
}

fn numbered_claims(count: usize) -> Vec<Claim> {
    (1..=count)
        .map(|idx| claim(idx, &format!("Patient {idx}"), ClaimStatus::Pending, idx as f64))
        .collect()
}

fn ids(rows: &[&Claim]) -> Vec<String> {
    rows.iter().map(|claim| claim.id.0.clone()).collect()
}

fn generated(count: usize, seed: u64) -> Vec<Claim> {
    generate_claims(count, seed, anchor()).expect("weights should be valid")
}

fn service(query: &str) -> (Arc<MemoryLocation>, TableService) {
    let location = Arc::new(MemoryLocation::new("/claims", query));
    let service = TableService::from_location(
        location.clone(),
        TableDefaults::default(),
        SortPriorities::default(),
    );
    (location, service)
}

struct FailingSource;

impl ClaimSource for FailingSource {
    fn fetch_claims(&self) -> Result<Vec<Claim>, SourceError> {
        Err(SourceError::Message("backend unavailable".to_string()))
    }
}

#[rstest]
#[case(Some(SortDirection::Asc), std::cmp::Ordering::Less)]
#[case(Some(SortDirection::Desc), std::cmp::Ordering::Greater)]
#[case(None, std::cmp::Ordering::Equal)]
fn compare_values_honours_direction(
    #[case] direction: Option<SortDirection>,
    #[case] expected: std::cmp::Ordering,
) {
    assert_eq!(compare_values(&1, &2, direction), expected);
}

#[test]
fn amount_sort_with_nan_amounts_puts_them_last() {
    let mut records = numbered_claims(60);
    for claim in records.iter_mut().step_by(3) {
        claim.amount = f64::NAN;
    }
    let refs: Vec<&Claim> = records.iter().rev().collect();

    let sorted = sort_claims(
        &refs,
        SortField::Amount,
        Some(SortDirection::Asc),
        &SortPriorities::default(),
    );

    assert_eq!(sorted.len(), 60);
    let (finite, nan): (Vec<f64>, Vec<f64>) = sorted
        .iter()
        .map(|claim| claim.amount)
        .partition(|amount| amount.is_finite());
    assert_eq!(nan.len(), 20);
    assert!(finite.windows(2).all(|pair| pair[0] <= pair[1]));
    assert!(sorted[40..].iter().all(|claim| claim.amount.is_nan()));
}

#[rstest]
#[case(SortDirection::Asc)]
#[case(SortDirection::Desc)]
fn generated_claims_sort_in_order_for_every_field(#[case] direction: SortDirection) {
    let records = generated(250, 12345);
    let refs: Vec<&Claim> = records.iter().collect();
    let priorities = SortPriorities::default();

    for field in SortField::ALL {
        let sorted = sort_claims(&refs, field, Some(direction), &priorities);

        assert_eq!(sorted.len(), records.len());
        for pair in sorted.windows(2) {
            let ordering = compare_values(
                &claim_sort_key(pair[0], field, &priorities),
                &claim_sort_key(pair[1], field, &priorities),
                Some(direction),
            );
            assert_ne!(
                ordering,
                std::cmp::Ordering::Greater,
                "{field} {direction:?} out of order at {} / {}",
                pair[0].id,
                pair[1].id
            );
        }
    }
}

#[test]
fn status_sort_follows_priority_list_not_alphabet() {
    let records = vec![
        claim(1, "A", ClaimStatus::Pending, 1.0),
        claim(2, "B", ClaimStatus::Rejected, 1.0),
        claim(3, "C", ClaimStatus::Call, 1.0),
    ];
    let refs: Vec<&Claim> = records.iter().collect();

    let sorted = sort_claims(
        &refs,
        SortField::Status,
        Some(SortDirection::Asc),
        &SortPriorities::default(),
    );

    let statuses: Vec<ClaimStatus> = sorted.iter().map(|claim| claim.status).collect();
    assert_eq!(
        statuses,
        vec![ClaimStatus::Pending, ClaimStatus::Call, ClaimStatus::Rejected]
    );
}

#[test]
fn pms_sync_sort_uses_its_own_priority_list() {
    let mut records = numbered_claims(4);
    records[0].pms_sync_status = PmsSyncStatus::NotSynced;
    records[1].pms_sync_status = PmsSyncStatus::Failed;
    records[2].pms_sync_status = PmsSyncStatus::Synced;
    records[3].pms_sync_status = PmsSyncStatus::Pending;
    let refs: Vec<&Claim> = records.iter().collect();

    let sorted = sort_claims(
        &refs,
        SortField::PmsSyncStatus,
        Some(SortDirection::Asc),
        &SortPriorities::default(),
    );

    assert_eq!(ids(&sorted), vec!["row-3", "row-4", "row-2", "row-1"]);
}

#[test]
fn text_sort_is_case_insensitive() {
    let records = vec![
        claim(1, "bob", ClaimStatus::Pending, 1.0),
        claim(2, "Alice", ClaimStatus::Pending, 1.0),
        claim(3, "Carol", ClaimStatus::Pending, 1.0),
    ];
    let refs: Vec<&Claim> = records.iter().collect();

    let sorted = sort_claims(
        &refs,
        SortField::Patient,
        Some(SortDirection::Asc),
        &SortPriorities::default(),
    );

    assert_eq!(ids(&sorted), vec!["row-2", "row-1", "row-3"]);
}

#[test]
fn date_sort_compares_instants() {
    let records = numbered_claims(3);
    let refs: Vec<&Claim> = records.iter().collect();

    // Higher index means an older service date.
    let sorted = sort_claims(
        &refs,
        SortField::ServiceDate,
        Some(SortDirection::Asc),
        &SortPriorities::default(),
    );

    assert_eq!(ids(&sorted), vec!["row-3", "row-2", "row-1"]);
}

#[rstest]
#[case(SortDirection::Asc)]
#[case(SortDirection::Desc)]
fn equal_keys_keep_input_order(#[case] direction: SortDirection) {
    let records = vec![
        claim(1, "A", ClaimStatus::Pending, 10.0),
        claim(2, "B", ClaimStatus::Pending, 5.0),
        claim(3, "C", ClaimStatus::Pending, 10.0),
        claim(4, "D", ClaimStatus::Pending, 5.0),
    ];
    let refs: Vec<&Claim> = records.iter().collect();

    let sorted = sort_claims(
        &refs,
        SortField::Amount,
        Some(direction),
        &SortPriorities::default(),
    );

    let expected = match direction {
        SortDirection::Asc => vec!["row-2", "row-4", "row-1", "row-3"],
        SortDirection::Desc => vec!["row-1", "row-3", "row-2", "row-4"],
    };
    assert_eq!(ids(&sorted), expected);
}

#[test]
fn sort_without_direction_keeps_order_and_leaves_input_alone() {
    let records = numbered_claims(5);
    let refs: Vec<&Claim> = records.iter().rev().collect();

    let sorted = sort_by_key(&refs, None, |claim: &Claim| claim.patient.clone());

    assert_eq!(ids(&sorted), ids(&refs));
    assert_eq!(refs[0].id.0, "row-5", "input should be untouched");
}

#[test]
fn unknown_sort_field_in_link_keeps_source_order() {
    let records: Vec<Claim> = numbered_claims(3).into_iter().rev().collect();
    let (_location, service) = service("sort=bogus&order=asc");

    assert_eq!(service.state().sort, None);
    assert_eq!(
        ids(service.view(&records).rows()),
        vec!["row-3", "row-2", "row-1"]
    );
}

#[test]
fn direction_cycles_on_same_column_and_restarts_on_another() {
    let amount = Some(SortField::Amount);

    assert_eq!(
        next_sort_direction(amount, SortField::Amount, None),
        Some(SortDirection::Asc)
    );
    assert_eq!(
        next_sort_direction(amount, SortField::Amount, Some(SortDirection::Asc)),
        Some(SortDirection::Desc)
    );
    assert_eq!(
        next_sort_direction(amount, SortField::Amount, Some(SortDirection::Desc)),
        None
    );
    assert_eq!(
        next_sort_direction(amount, SortField::Patient, Some(SortDirection::Desc)),
        Some(SortDirection::Asc)
    );
}

#[test]
fn three_header_clicks_return_to_unsorted() {
    let mut sort = None;
    for _ in 0..3 {
        sort = next_sort(sort, SortField::Amount);
    }

    assert_eq!(sort, None);
}

#[test]
fn priority_lists_must_be_permutations() {
    let missing = SortPriorities::new(
        vec![ClaimStatus::Pending, ClaimStatus::Call, ClaimStatus::Rejected],
        PmsSyncStatus::ALL.to_vec(),
    );
    assert!(matches!(missing, Err(PriorityError::Missing { .. })));

    let duplicate = SortPriorities::new(
        ClaimStatus::ALL.to_vec(),
        vec![
            PmsSyncStatus::Synced,
            PmsSyncStatus::Synced,
            PmsSyncStatus::Failed,
            PmsSyncStatus::NotSynced,
        ],
    );
    assert!(matches!(duplicate, Err(PriorityError::Duplicate { .. })));

    let custom = SortPriorities::new(
        vec![
            ClaimStatus::Rejected,
            ClaimStatus::Pending,
            ClaimStatus::Call,
            ClaimStatus::Resubmitted,
        ],
        PmsSyncStatus::ALL.to_vec(),
    )
    .expect("permutation should be accepted");
    assert_eq!(custom.status_rank(ClaimStatus::Rejected), 0);
}

#[rstest]
#[case("Alice Smith", "Ali", true)]
#[case("Bob Jones", "Ali", false)]
#[case("Ali Khan", "ali", true)]
#[case("anything", "", true)]
fn text_filter_is_case_insensitive_containment(
    #[case] haystack: &str,
    #[case] needle: &str,
    #[case] expected: bool,
) {
    assert_eq!(text_matches(haystack, needle), expected);
}

#[test]
fn text_filter_keeps_matching_names_in_order() {
    let records = vec![
        claim(1, "Alice Smith", ClaimStatus::Pending, 1.0),
        claim(2, "Bob Jones", ClaimStatus::Pending, 1.0),
        claim(3, "Ali Khan", ClaimStatus::Pending, 1.0),
    ];
    let filters = ClaimFilters {
        patient: "Ali".to_string(),
        ..ClaimFilters::default()
    };

    let matched = filter_claims(&records, &filters);

    let names: Vec<&str> = matched.iter().map(|claim| claim.patient.as_str()).collect();
    assert_eq!(names, vec!["Alice Smith", "Ali Khan"]);
}

#[test]
fn filters_combine_with_and() {
    let mut target = claim(1, "Ali Khan", ClaimStatus::Call, 1.0);
    target.pms_sync_status = PmsSyncStatus::Failed;
    let filters = ClaimFilters {
        patient: "ali".to_string(),
        status: EnumFilter::Only(ClaimStatus::Call),
        insurance_carrier: "aet".to_string(),
        pms_sync_status: EnumFilter::Only(PmsSyncStatus::Failed),
        provider: "chen".to_string(),
    };
    assert!(claim_matches(&target, &filters));

    let wrong_provider = ClaimFilters {
        provider: "ortiz".to_string(),
        ..filters.clone()
    };
    assert!(!claim_matches(&target, &wrong_provider));

    let wrong_status = ClaimFilters {
        status: EnumFilter::Only(ClaimStatus::Pending),
        ..filters
    };
    assert!(!claim_matches(&target, &wrong_status));
}

#[test]
fn default_filters_match_everything() {
    let records = numbered_claims(7);
    assert_eq!(filter_claims(&records, &ClaimFilters::default()).len(), 7);
}

#[test]
fn paginate_slices_pages_and_clips_the_last() {
    let records = numbered_claims(25);
    let page = |page| PaginationSpec { page, page_size: 10 };

    let first = paginate(&records, page(1));
    assert_eq!(first.len(), 10);
    assert_eq!(first[0].id.0, "row-1");
    assert_eq!(first[9].id.0, "row-10");

    let third = paginate(&records, page(3));
    assert_eq!(third.len(), 5);
    assert_eq!(third[0].id.0, "row-21");

    assert!(paginate(&records, page(4)).is_empty());
    assert_eq!(total_pages(records.len(), 10), 3);
}

#[test]
fn pages_cover_every_record_exactly_once() {
    for count in [0, 1, 10, 11, 25] {
        let records = numbered_claims(count);
        for page_size in [1, 3, 10, 25] {
            let pages = total_pages(count, page_size);
            let mut seen = Vec::new();

            for page in 1..=pages {
                let slice = paginate(&records, PaginationSpec { page, page_size });
                let expected = page_size.min(count - (page - 1) * page_size);
                assert_eq!(slice.len(), expected, "count {count} size {page_size} page {page}");
                seen.extend(slice.iter().map(|claim| claim.id.0.clone()));
            }

            let all: Vec<String> = records.iter().map(|claim| claim.id.0.clone()).collect();
            assert_eq!(seen, all, "count {count} size {page_size}");
            assert!(paginate(&records, PaginationSpec { page: pages + 1, page_size }).is_empty());
        }
    }
}

#[rstest]
#[case(0, 10, 0)]
#[case(1, 10, 1)]
#[case(10, 10, 1)]
#[case(11, 10, 2)]
#[case(5, 0, 0)]
fn total_pages_rounds_up(#[case] count: usize, #[case] size: usize, #[case] expected: usize) {
    assert_eq!(total_pages(count, size), expected);
}

#[test]
fn change_page_rejects_out_of_range() {
    let current = PaginationSpec {
        page: 2,
        page_size: 10,
    };

    assert_eq!(
        change_page(current, 4, 3),
        Err(PageOutOfRange {
            requested: 4,
            total_pages: 3
        })
    );
    assert!(change_page(current, 0, 3).is_err());
    assert_eq!(
        change_page(current, 3, 3).map(|spec| spec.page),
        Ok(3)
    );
}

#[rstest]
#[case(0, 10)]
#[case(1, 0)]
#[case(0, 0)]
fn zero_page_or_page_size_is_invalid(#[case] page: usize, #[case] page_size: usize) {
    assert_eq!(
        validate_pagination(PaginationSpec { page, page_size }),
        Err(InvalidPagination { page, page_size })
    );
}

#[test]
fn change_page_size_resets_to_first_page() {
    let spec = change_page_size(25).expect("positive size should be accepted");
    assert_eq!(spec, PaginationSpec::first_page(25));
    assert!(change_page_size(0).is_err());
}

#[test]
fn navigation_disables_unreachable_controls() {
    let first = PageNavigation::new(PaginationSpec::first_page(10), 25);
    assert_eq!(first.total_pages, 3);
    assert!(!first.can_first && !first.can_previous);
    assert!(first.can_next && first.can_last);

    let last = PageNavigation::new(PaginationSpec { page: 3, page_size: 10 }, 25);
    assert!(last.can_first && last.can_previous);
    assert!(!last.can_next && !last.can_last);
}

#[test]
fn derive_view_filters_then_sorts_then_paginates() {
    let mut records = numbered_claims(30);
    for claim in records.iter_mut().filter(|claim| claim.amount as usize % 2 == 0) {
        claim.status = ClaimStatus::Call;
    }
    let state = TableState {
        sort: Some(SortSpec {
            field: SortField::Amount,
            direction: SortDirection::Desc,
        }),
        filters: ClaimFilters {
            status: EnumFilter::Only(ClaimStatus::Call),
            ..ClaimFilters::default()
        },
        pagination: PaginationSpec {
            page: 2,
            page_size: 10,
        },
    };

    let view = derive_view(&records, &state, &SortPriorities::default());

    assert_eq!(view.filtered_count(), 15);
    let amounts: Vec<f64> = view.rows().iter().map(|claim| claim.amount).collect();
    assert_eq!(amounts, vec![10.0, 8.0, 6.0, 4.0, 2.0]);
}

#[test]
fn derive_view_reports_no_rows_when_everything_is_filtered_out() {
    let records = numbered_claims(5);
    let state = TableState {
        filters: ClaimFilters {
            patient: "nobody".to_string(),
            ..ClaimFilters::default()
        },
        ..TableState::initial(&TableDefaults::default())
    };

    let view = derive_view(&records, &state, &SortPriorities::default());

    assert_eq!(view, TableView::NoRows);
    assert!(view.rows().is_empty());
}

#[test]
fn default_state_encodes_to_empty_query() {
    let defaults = TableDefaults::default();
    assert_eq!(encode_query(&TableState::initial(&defaults), &defaults), "");
}

#[test]
fn encode_writes_only_non_default_values() {
    let defaults = TableDefaults::default();
    let state = TableState {
        sort: Some(SortSpec {
            field: SortField::Amount,
            direction: SortDirection::Desc,
        }),
        filters: ClaimFilters {
            patient: "Ali Khan".to_string(),
            status: EnumFilter::Only(ClaimStatus::Call),
            ..ClaimFilters::default()
        },
        pagination: PaginationSpec {
            page: 2,
            page_size: 10,
        },
    };

    assert_eq!(
        encode_query(&state, &defaults),
        "sort=amount&order=desc&patient=Ali+Khan&status=CALL&page=2"
    );
}

#[rstest]
#[case("")]
#[case("sort=amount&order=desc&page=2")]
#[case("sort=status&order=asc&status=REJECTED&pmsSyncStatus=NOT_SYNCED")]
#[case("patient=O%27Brien+%26+Co&insuranceCarrier=Delta&provider=Dr.+Park&pageSize=25")]
#[case("sort=lastUpdated&order=asc&page=7&pageSize=50")]
fn query_round_trips(#[case] query: &str) {
    let defaults = TableDefaults::default();
    let state = decode_query(query, &defaults);
    let encoded = encode_query(&state, &defaults);

    assert_eq!(decode_query(&encoded, &defaults), state);
    assert_eq!(encoded, query);
}

#[test]
fn loading_shared_query_initializes_state() {
    let state = decode_query("?sort=amount&order=desc&page=2", &TableDefaults::default());

    assert_eq!(
        state.sort,
        Some(SortSpec {
            field: SortField::Amount,
            direction: SortDirection::Desc
        })
    );
    assert_eq!(state.pagination.page, 2);
    assert_eq!(state.pagination.page_size, 10);
    assert!(state.filters.is_default());
}

#[rstest]
#[case("sort=bogus&order=desc")]
#[case("sort=amount")]
#[case("sort=amount&order=sideways")]
#[case("page=0&pageSize=0")]
#[case("page=-3&pageSize=abc")]
#[case("status=NOPE&pmsSyncStatus=whatever")]
fn malformed_parameters_fall_back_to_defaults(#[case] query: &str) {
    let defaults = TableDefaults::default();
    assert_eq!(decode_query(query, &defaults), TableState::initial(&defaults));
}

#[test]
fn first_occurrence_of_repeated_key_wins() {
    let state = decode_query("page=3&page=5", &TableDefaults::default());
    assert_eq!(state.pagination.page, 3);
}

#[rstest]
#[case("https://example.com/claims?sort=amount&order=asc#top", "sort=amount&order=asc")]
#[case("?page=2", "page=2")]
#[case("page=2", "page=2")]
#[case("/claims", "")]
fn query_from_link_extracts_query_part(#[case] link: &str, #[case] expected: &str) {
    assert_eq!(query_from_link(link), expected);
}

#[test]
fn href_omits_question_mark_for_empty_query() {
    assert_eq!(href("/claims", ""), "/claims");
    assert_eq!(href("/claims", "page=2"), "/claims?page=2");
}

#[test]
fn table_service_decodes_initial_location() {
    let (_location, service) = service("?sort=amount&order=desc&page=2");

    assert_eq!(service.state().sort_field(), Some(SortField::Amount));
    assert_eq!(service.state().sort_direction(), Some(SortDirection::Desc));
    assert_eq!(service.state().pagination.page, 2);
}

#[test]
fn sort_and_filter_changes_reset_page() {
    let (location, mut service) = service("page=3");

    service.apply_sort(SortField::Patient);
    assert_eq!(service.state().pagination.page, 1);

    service
        .apply_pagination(PaginationSpec {
            page: 4,
            page_size: 10,
        })
        .expect("page 4 should be accepted");
    service.apply_filters(ClaimFilters {
        provider: "chen".to_string(),
        ..ClaimFilters::default()
    });

    assert_eq!(service.state().pagination.page, 1);
    assert_eq!(
        location.current_query(),
        "sort=patient&order=asc&provider=chen"
    );
}

#[test]
fn every_transition_replaces_location_without_history() {
    let (location, mut service) = service("");

    service.apply_sort(SortField::Amount);
    service.apply_sort(SortField::Amount);
    service.change_page_size(25).expect("size should be accepted");
    for page in 2..=5 {
        service.change_page(page, 250).expect("page should exist");
    }
    service.apply_filters(ClaimFilters {
        patient: "ali".to_string(),
        ..ClaimFilters::default()
    });

    assert_eq!(location.replacements(), 8);
    assert_eq!(location.history_len(), 1);
    assert_eq!(
        location.href(),
        "/claims?sort=amount&order=desc&patient=ali&pageSize=25"
    );
    assert_eq!(service.href(), location.href());
}

#[test]
fn location_always_decodes_to_current_state() {
    let defaults = TableDefaults::default();
    let (location, mut service) = service("");
    let in_sync = |service: &TableService| {
        assert_eq!(
            decode_query(&location.current_query(), &defaults),
            *service.state()
        );
    };

    service.apply_sort(SortField::Status);
    in_sync(&service);
    service.apply_filters(ClaimFilters {
        patient: "O'Brien & Co".to_string(),
        pms_sync_status: EnumFilter::Only(PmsSyncStatus::NotSynced),
        ..ClaimFilters::default()
    });
    in_sync(&service);
    service.change_page_size(50).expect("size should be accepted");
    in_sync(&service);
    service.change_page(3, 140).expect("page 3 should exist");
    in_sync(&service);
    service.apply_sort(SortField::Status);
    in_sync(&service);
    service.apply_sort(SortField::Status);
    in_sync(&service);
    service.apply_sort_column("lastUpdated");
    in_sync(&service);
    service
        .apply_pagination(PaginationSpec {
            page: 7,
            page_size: 20,
        })
        .expect("page 7 should be accepted");
    in_sync(&service);
    service.open_link("/claims?provider=Dr.+Park&order=desc&sort=amount");
    in_sync(&service);
    service.reset();
    in_sync(&service);
}

#[test]
fn invalid_pagination_leaves_state_and_location_alone() {
    let (location, mut service) = service("sort=amount&order=asc&page=2");
    let before = service.state().clone();

    let result = service.apply_pagination(PaginationSpec {
        page: 0,
        page_size: 0,
    });

    assert_eq!(
        result,
        Err(InvalidPagination {
            page: 0,
            page_size: 0
        })
    );
    assert_eq!(service.state(), &before);
    assert_eq!(location.replacements(), 0);
    assert_eq!(
        decode_query(&location.current_query(), &TableDefaults::default()),
        before
    );
}

#[test]
fn out_of_range_page_change_leaves_state_unchanged() {
    let (location, mut service) = service("page=2");
    let before = service.state().clone();

    let result = service.change_page(4, 25);

    assert_eq!(
        result,
        Err(PageOutOfRange {
            requested: 4,
            total_pages: 3
        })
    );
    assert_eq!(service.state(), &before);
    assert_eq!(location.replacements(), 0);

    service.change_page(3, 25).expect("page 3 should exist");
    assert_eq!(location.current_query(), "page=3");
}

#[test]
fn unsortable_column_click_is_ignored() {
    let (location, mut service) = service("");

    assert!(!service.apply_sort_column("provider"));
    assert!(!service.apply_sort_column("nope"));
    assert!(service.apply_sort_column("serviceDate"));
    assert_eq!(location.current_query(), "sort=serviceDate&order=asc");
}

#[test]
fn three_clicks_restore_filtered_order() {
    let records = vec![
        claim(1, "C", ClaimStatus::Pending, 30.0),
        claim(2, "A", ClaimStatus::Pending, 10.0),
        claim(3, "B", ClaimStatus::Pending, 20.0),
    ];
    let (_location, mut service) = service("");
    let original = ids(service.view(&records).rows());

    for _ in 0..3 {
        service.apply_sort(SortField::Amount);
    }

    assert_eq!(service.state().sort, None);
    assert_eq!(ids(service.view(&records).rows()), original);
}

#[test]
fn reset_clears_state_and_query() {
    let (location, mut service) =
        service("sort=amount&order=desc&patient=ali&status=CALL&page=3&pageSize=50");

    service.apply_sort(SortField::Status);
    service.reset();

    assert_eq!(
        service.state(),
        &TableState::initial(&TableDefaults::default())
    );
    assert_eq!(location.current_query(), "");
    assert_eq!(location.href(), "/claims");
}

#[test]
fn open_link_and_reload_decode_location() {
    let (location, mut service) = service("");

    service.open_link("https://example.com/claims?page=2&status=REJECTED");
    assert_eq!(
        service.state().filters.status,
        EnumFilter::Only(ClaimStatus::Rejected)
    );
    assert_eq!(location.current_query(), "status=REJECTED&page=2");
    assert_eq!(location.history_len(), 2, "opening a link is a navigation");

    location.replace_query("sort=patient&order=desc");
    service.reload();
    assert_eq!(service.state().sort_field(), Some(SortField::Patient));
}

#[test]
fn query_service_reports_ready_and_failed() {
    let ready = QueryService::new(Arc::new(GeneratedClaimSource::with_anchor(12, 7, anchor())))
        .load();
    assert_eq!(ready.claims().map(<[Claim]>::len), Some(12));

    let failed = QueryService::new(Arc::new(FailingSource)).load();
    assert_eq!(failed, LoadState::Failed("backend unavailable".to_string()));
    assert!(failed.claims().is_none());
}

#[test]
fn generated_claims_are_deterministic_and_memoized() {
    let source = GeneratedClaimSource::with_anchor(250, 12345, anchor());
    let first = source.fetch_claims().expect("generation should not fail");
    let second = source.fetch_claims().expect("generation should not fail");

    assert_eq!(first.len(), 250);
    assert_eq!(first, second);
    assert_eq!(first, generated(250, 12345));
    assert_ne!(first, generated(250, 54321));
}

#[test]
fn generated_claims_have_consistent_dates() {
    let window = TimeDelta::days(548);
    for claim in generated(250, 12345) {
        assert!(claim.service_date <= anchor());
        assert!(claim.service_date >= anchor() - window);
        assert!(claim.last_updated >= claim.service_date);
        assert!(claim.date_sent <= claim.last_updated);
        assert!(claim.date_sent_orig <= claim.date_sent);
        assert!(claim.amount > 0.0);
        assert_eq!(claim.user_initials.len(), 2);
    }
}

#[test]
fn generated_statuses_cover_every_value() {
    let claims = generated(250, 12345);
    for status in ClaimStatus::ALL {
        assert!(
            claims.iter().any(|claim| claim.status == status),
            "expected at least one {status} claim"
        );
    }
}

#[test]
fn sqlite_round_trip_keeps_order_and_values() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let db_path = dir.path().join("nested").join("claims.sqlite");
    init_db(&db_path).expect("should init db");

    let claims = generated(40, 99);
    let row_count = replace_claims(&db_path, "fixture.csv", &claims).expect("should store claims");

    assert_eq!(row_count, 40);
    assert_eq!(count_claims(&db_path).expect("should count"), 40);
    assert_eq!(load_claims(&db_path).expect("should load"), claims);
    let import = last_import(&db_path)
        .expect("should query last import")
        .expect("import should be recorded");
    assert_eq!(import.source_path, "fixture.csv");
    assert_eq!(import.row_count, 40);
}

#[test]
fn replace_claims_drops_previous_set() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let db_path = dir.path().join("claims.sqlite");
    init_db(&db_path).expect("should init db");

    replace_claims(&db_path, "first", &generated(10, 1)).expect("first import");
    let second = generated(3, 2);
    replace_claims(&db_path, "second", &second).expect("second import");

    assert_eq!(load_claims(&db_path).expect("should load"), second);
}

#[test]
fn seed_if_empty_only_seeds_once() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let repo = Arc::new(SqliteRepo {
        db_path: dir.path().join("claims.sqlite"),
    });
    let import = ImportService::new(repo.clone());
    let seed = GeneratedClaimSource::with_anchor(25, 12345, anchor());

    let seeded = import
        .seed_if_empty(&seed)
        .expect("seeding should succeed")
        .expect("empty store should be seeded");
    assert_eq!(seeded.source_path, GENERATED_SOURCE_PATH);
    assert_eq!(seeded.row_count, 25);

    assert!(import
        .seed_if_empty(&seed)
        .expect("second call should succeed")
        .is_none());
    assert_eq!(
        repo.fetch_claims().expect("should load"),
        seed.fetch_claims().expect("should generate")
    );
}

const CSV_HEADER: &str = "id,patient,patientId,serviceDate,insuranceCarrier,insurancePlan,\
insuranceType,amount,status,lastUpdated,user,userInitials,dateSent,dateSentOrig,\
pmsSyncStatus,pmsSyncMessage,provider,providerId";

#[test]
fn csv_reader_parses_claims() {
    let csv = format!(
        "{CSV_HEADER}\n\
         c-1, Ali Khan ,P000001,2024-03-01T10:00:00Z,Aetna,Dental PPO,Primary,1234.5,PENDING,\
         2024-03-02T08:30:00Z,Amy Watson,AW,2024-03-01T12:00:00Z,2024-03-01T11:00:00Z,\
         NOT_SYNCED,Missing codes,Dr. Sarah Chen,NPI0000001\n"
    );

    let claims = read_claims_from_reader(csv.as_bytes()).expect("csv should parse");

    assert_eq!(claims.len(), 1);
    let claim = &claims[0];
    assert_eq!(claim.patient, "Ali Khan");
    assert_eq!(claim.status, ClaimStatus::Pending);
    assert_eq!(claim.pms_sync_status, PmsSyncStatus::NotSynced);
    assert_eq!(claim.amount, 1234.5);
    assert_eq!(format_date(&claim.service_date), "Mar 01, 2024");
}

#[test]
fn csv_reader_reports_line_of_bad_row() {
    let csv = format!(
        "{CSV_HEADER}\n\
         c-1,Ali,P1,2024-03-01T10:00:00Z,Aetna,PPO,Primary,10,BOGUS,\
         2024-03-02T08:30:00Z,Amy,AW,2024-03-01T12:00:00Z,2024-03-01T11:00:00Z,SYNCED,,Dr,N1\n"
    );

    let err = read_claims_from_reader(csv.as_bytes()).expect_err("bad status should fail");
    assert!(format!("{err:#}").contains("line 2"));
}

#[rstest]
#[case("NaN")]
#[case("inf")]
fn csv_reader_rejects_non_finite_amounts(#[case] amount: &str) {
    let csv = format!(
        "{CSV_HEADER}\n\
         c-1,Ali,P1,2024-03-01T10:00:00Z,Aetna,PPO,Primary,10,PENDING,\
         2024-03-02T08:30:00Z,Amy,AW,2024-03-01T12:00:00Z,2024-03-01T11:00:00Z,SYNCED,,Dr,N1\n\
         c-2,Bob,P2,2024-03-01T10:00:00Z,Aetna,PPO,Primary,{amount},PENDING,\
         2024-03-02T08:30:00Z,Amy,AW,2024-03-01T12:00:00Z,2024-03-01T11:00:00Z,SYNCED,,Dr,N2\n"
    );

    let err = read_claims_from_reader(csv.as_bytes()).expect_err("non-finite amount should fail");
    let message = format!("{err:#}");
    assert!(message.contains("line 3"), "{message}");
    assert!(message.contains("non-finite amount"), "{message}");
}

#[test]
fn import_file_replaces_stored_claims() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let csv_path = dir.path().join("claims.csv");
    let mut file = std::fs::File::create(&csv_path).expect("should create csv");
    writeln!(file, "{CSV_HEADER}").expect("should write header");
    writeln!(
        file,
        "c-9,Bob Jones,P9,2024-05-01T00:00:00Z,Cigna,Total DPPO,Secondary,99.99,CALL,\
         2024-05-02T00:00:00Z,Brian Cole,BC,2024-05-01T00:00:00Z,2024-05-01T00:00:00Z,\
         SYNCED,,Dr. Emily Park,NPI9"
    )
    .expect("should write row");
    drop(file);

    let repo = Arc::new(SqliteRepo {
        db_path: dir.path().join("claims.sqlite"),
    });
    let import = ImportService::new(repo.clone());
    import
        .seed_if_empty(&GeneratedClaimSource::with_anchor(5, 1, anchor()))
        .expect("should seed");

    let result = import.import_file(&csv_path).expect("import should succeed");

    assert_eq!(result.row_count, 1);
    assert_eq!(
        import.last_import().expect("should read last import"),
        Some(result.clone())
    );
    let stored = repo.fetch_claims().expect("should load");
    assert_eq!(stored, read_claims_csv(&csv_path).expect("csv should parse"));
    assert_eq!(stored[0].id.0, "c-9");
}

#[rstest]
#[case(12345.678, 0, "12,346")]
#[case(12345.678, 2, "12,345.68")]
#[case(-1234.5, 2, "-1,234.50")]
#[case(999.0, 0, "999")]
#[case(1_000_000.0, 0, "1,000,000")]
fn format_number_with_commas_groups_thousands(
    #[case] value: f64,
    #[case] decimals: usize,
    #[case] expected: &str,
) {
    assert_eq!(format_number_with_commas(value, decimals), expected);
}

#[test]
fn format_currency_places_sign_before_symbol() {
    assert_eq!(format_currency(1234.5), "$1,234.50");
    assert_eq!(format_currency(-5.0), "-$5.00");
}

#[test]
fn column_registry_renders_cells_by_kind() {
    let mut record = claim(1, "Ali Khan", ClaimStatus::Resubmitted, 1234.5);
    record.insurance_type = InsuranceType::Secondary;
    record.pms_sync_status = PmsSyncStatus::Failed;
    record.pms_sync_message = "Rejected by PMS".to_string();

    let render = |key: &str| {
        column_by_key(key)
            .expect("column should exist")
            .render(&record)
    };

    let patient = render("patient");
    assert_eq!(patient.primary, "Ali Khan");
    assert_eq!(patient.secondary.as_deref(), Some("ID: P000001"));

    assert_eq!(render("amount").primary, "$1,234.50");
    assert_eq!(render("status").primary, "NCOF - RESUBMITTED");

    let carrier = render("insuranceCarrier");
    assert_eq!(carrier.secondary.as_deref(), Some("Dental PPO"));
    let badge = carrier.badge.expect("carrier should carry a badge");
    assert_eq!((badge.label.as_str(), badge.tone), ("Secondary", BadgeTone::Warning));

    let sync = render("pmsSyncStatus");
    assert_eq!(sync.secondary.as_deref(), Some("Rejected by PMS"));
    assert_eq!(sync.badge.map(|badge| badge.tone), Some(BadgeTone::Danger));

    let updated = render("lastUpdated");
    assert_eq!(updated.primary, format_date(&record.last_updated));
    assert_eq!(updated.secondary.as_deref(), Some("15:00"));
}

#[test]
fn sortable_columns_match_sort_fields() {
    let sortable: Vec<SortField> = claim_columns()
        .iter()
        .filter_map(|column| column.sort_field)
        .collect();

    assert_eq!(sortable.len(), SortField::ALL.len());
    for field in SortField::ALL {
        assert!(sortable.contains(&field), "{field} should have a column");
    }
    assert!(!column_by_key("provider")
        .expect("provider column")
        .sortable());
}

#[test]
fn claim_value_exposes_typed_cells() {
    let record = claim(2, "Bob", ClaimStatus::Call, 12.0);
    assert_eq!(record.value(ClaimField::Amount), CellValue::Number(12.0));
    assert_eq!(
        record.value(ClaimField::Status),
        CellValue::Status(ClaimStatus::Call)
    );
}

#[test]
fn config_defaults_are_valid() {
    let config = AppConfig::default();

    config.validate().expect("defaults should validate");
    assert_eq!(config.table_defaults(), TableDefaults { page_size: 10 });
    assert_eq!(config.page_size_options, vec![10, 20, 25, 50]);
    assert_eq!(
        config.sort_priorities().expect("default priorities"),
        SortPriorities::default()
    );
}

#[test]
fn config_parses_partial_toml() {
    let config = AppConfig::from_toml(
        r#"
        default_page_size = 25
        status_priority = ["REJECTED", "CALL", "PENDING", "RESUBMITTED"]
        "#,
    )
    .expect("config should parse");

    assert_eq!(config.default_page_size, 25);
    assert_eq!(config.generated_rows, 250);
    assert_eq!(config.seed, 12345);
    assert_eq!(
        config
            .sort_priorities()
            .expect("priorities should be valid")
            .status_rank(ClaimStatus::Rejected),
        0
    );
}

#[rstest]
#[case(AppConfig { default_page_size: 0, ..AppConfig::default() }, ConfigError::ZeroPageSize)]
#[case(AppConfig { page_size_options: vec![], ..AppConfig::default() }, ConfigError::NoPageSizes)]
#[case(AppConfig { default_page_size: 15, ..AppConfig::default() }, ConfigError::DefaultPageSizeNotOffered(15))]
fn config_rejects_bad_page_sizes(#[case] config: AppConfig, #[case] expected: ConfigError) {
    assert_eq!(config.validate(), Err(expected));
}

#[test]
fn config_rejects_mismatched_priority_list() {
    let config = AppConfig {
        pms_sync_priority: vec![PmsSyncStatus::Synced, PmsSyncStatus::Failed],
        ..AppConfig::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::Priority(PriorityError::Missing { .. }))
    ));
    assert!(AppConfig::from_toml("status_priority = [\"PENDING\", \"UNKNOWN\"]").is_err());
}

#[test]
fn config_load_falls_back_to_defaults_when_missing() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let config = AppConfig::load(&dir.path().join("config.toml")).expect("missing file is fine");
    assert_eq!(config, AppConfig::default());
}

#[test]
fn debouncer_commits_only_the_last_edit_of_a_burst() {
    let mut debouncer = Debouncer::default();
    assert!(!debouncer.is_pending());

    let first = debouncer.schedule();
    let second = debouncer.schedule();
    let last = debouncer.schedule();
    assert!(debouncer.is_pending());

    assert!(!debouncer.settle(first));
    assert!(!debouncer.settle(second));
    assert!(debouncer.settle(last));
    assert!(!debouncer.settle(last), "a token settles once");
    assert!(!debouncer.is_pending());
}

#[test]
fn cancelled_debounce_never_settles() {
    let mut debouncer = Debouncer::default();
    let token = debouncer.schedule();

    debouncer.cancel();

    assert!(!debouncer.is_pending());
    assert!(!debouncer.settle(token));
    let next = debouncer.schedule();
    assert!(debouncer.settle(next));
}

#[test]
fn config_defaults_debounce_filters() {
    assert_eq!(AppConfig::default().filter_debounce_ms, DEFAULT_FILTER_DEBOUNCE_MS);
    let config = AppConfig::from_toml("filter_debounce_ms = 150").expect("config should parse");
    assert_eq!(config.filter_debounce_ms, 150);
}

#[test]
fn sortable_headers_stay_sticky_and_clickable() {
    let style = sortable_header_cell_style();

    assert!(style.contains("position: sticky"));
    assert!(style.contains("cursor: pointer"));
}

#[test]
fn badge_tones_use_distinct_colours() {
    let tones = [
        BadgeTone::Info,
        BadgeTone::Warning,
        BadgeTone::Success,
        BadgeTone::Danger,
        BadgeTone::Neutral,
    ];
    let styles: Vec<String> = tones.into_iter().map(badge_style).collect();

    for (idx, style) in styles.iter().enumerate() {
        assert!(!styles[idx + 1..].contains(style), "{style}");
    }
    assert!(badge_style(BadgeTone::Danger).contains("#b91c1c"));
}

#[rstest]
#[case(Some(SortDirection::Asc), "▲")]
#[case(Some(SortDirection::Desc), "▼")]
#[case(None, "↕")]
fn sort_indicator_matches_direction(
    #[case] direction: Option<SortDirection>,
    #[case] expected: &str,
) {
    assert_eq!(sort_indicator(direction), expected);
}
