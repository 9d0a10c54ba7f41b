use crate::domain::entities::claim::Claim;
use crate::domain::entities::table::TableState;
use crate::domain::table::filter::filter_claims;
use crate::domain::table::paginate::{paginate, PageNavigation};
use crate::domain::table::sort::{sort_claims, SortPriorities};

#[derive(Debug, Clone, PartialEq)]
pub struct PageView<'a> {
    pub rows: Vec<&'a Claim>,
    pub filtered_count: usize,
    pub navigation: PageNavigation,
}

/// What the presentation layer renders. `NoRows` means every record was
/// filtered out; it is an outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum TableView<'a> {
    NoRows,
    Page(PageView<'a>),
}

impl<'a> TableView<'a> {
    pub fn rows(&self) -> &[&'a Claim] {
        match self {
            TableView::NoRows => &[],
            TableView::Page(page) => &page.rows,
        }
    }

    pub fn filtered_count(&self) -> usize {
        match self {
            TableView::NoRows => 0,
            TableView::Page(page) => page.filtered_count,
        }
    }
}

/// Filter, then sort, then paginate. The order is fixed: sorting must see
/// only surviving rows and pagination must cut the final order.
pub fn derive_view<'a>(
    records: &'a [Claim],
    state: &TableState,
    priorities: &SortPriorities,
) -> TableView<'a> {
    let filtered = filter_claims(records, &state.filters);
    if filtered.is_empty() {
        return TableView::NoRows;
    }

    let sorted = match state.sort {
        Some(sort) => sort_claims(&filtered, sort.field, Some(sort.direction), priorities),
        None => filtered,
    };

    let filtered_count = sorted.len();
    TableView::Page(PageView {
        rows: paginate(&sorted, state.pagination).to_vec(),
        filtered_count,
        navigation: PageNavigation::new(state.pagination, filtered_count),
    })
}
