use std::sync::Arc;

use crate::domain::entities::claim::Claim;
use crate::domain::entities::table::{
    ClaimFilters, PaginationSpec, SortField, TableDefaults, TableState,
};
use crate::domain::table::columns::column_by_key;
use crate::domain::table::paginate::{
    change_page, change_page_size, total_pages, validate_pagination, InvalidPagination,
    PageOutOfRange, PageSizeError,
};
use crate::domain::table::pipeline::{derive_view, TableView};
use crate::domain::table::query::{decode_query, encode_query, href, query_from_link};
use crate::domain::table::sort::{next_sort, SortPriorities};
use crate::usecase::ports::location::QueryLocation;

/// Owns the single [`TableState`] and keeps the location in step with it.
///
/// Every transition builds a fresh state, stores it and re-encodes the query
/// before returning, so state and address never diverge.
pub struct TableService {
    state: TableState,
    defaults: TableDefaults,
    priorities: SortPriorities,
    location: Arc<dyn QueryLocation>,
}

impl TableService {
    /// Decodes the initial state from the location, defaulting whatever is
    /// missing or malformed.
    pub fn from_location(
        location: Arc<dyn QueryLocation>,
        defaults: TableDefaults,
        priorities: SortPriorities,
    ) -> Self {
        let state = decode_query(&location.current_query(), &defaults);
        tracing::debug!(?state, "table state decoded from location");
        Self {
            state,
            defaults,
            priorities,
            location,
        }
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn defaults(&self) -> &TableDefaults {
        &self.defaults
    }

    pub fn query(&self) -> String {
        encode_query(&self.state, &self.defaults)
    }

    pub fn href(&self) -> String {
        href(&self.location.path(), &self.query())
    }

    pub fn apply_sort(&mut self, field: SortField) {
        let next = TableState {
            sort: next_sort(self.state.sort, field),
            pagination: self.first_page(),
            ..self.state.clone()
        };
        self.commit(next);
    }

    /// Header click by column key. Unknown or unsortable columns leave the
    /// state alone and return `false`.
    pub fn apply_sort_column(&mut self, key: &str) -> bool {
        match column_by_key(key).and_then(|column| column.sort_field) {
            Some(field) => {
                self.apply_sort(field);
                true
            }
            None => {
                tracing::warn!(column = key, "ignoring sort on unsortable column");
                false
            }
        }
    }

    pub fn apply_filters(&mut self, filters: ClaimFilters) {
        let next = TableState {
            filters,
            pagination: self.first_page(),
            ..self.state.clone()
        };
        self.commit(next);
    }

    /// Replaces pagination as given. A zero page or page size is rejected
    /// and leaves state and location untouched. Resetting the page on a size
    /// change is the caller's job, see [`TableService::change_page_size`].
    pub fn apply_pagination(
        &mut self,
        pagination: PaginationSpec,
    ) -> Result<(), InvalidPagination> {
        let pagination = validate_pagination(pagination).inspect_err(|err| {
            tracing::warn!(%err, "rejected pagination");
        })?;
        self.commit_pagination(pagination);
        Ok(())
    }

    pub fn change_page(
        &mut self,
        requested: usize,
        filtered_count: usize,
    ) -> Result<(), PageOutOfRange> {
        let total_pages = total_pages(filtered_count, self.state.pagination.page_size);
        match change_page(self.state.pagination, requested, total_pages) {
            Ok(pagination) => {
                self.commit_pagination(pagination);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(%err, "rejected page change");
                Err(err)
            }
        }
    }

    pub fn change_page_size(&mut self, page_size: usize) -> Result<(), PageSizeError> {
        let pagination = change_page_size(page_size)?;
        self.commit_pagination(pagination);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.commit(TableState::initial(&self.defaults));
    }

    /// Re-reads the location, as a reload would.
    pub fn reload(&mut self) {
        let next = decode_query(&self.location.current_query(), &self.defaults);
        self.commit(next);
    }

    /// Navigates to a pasted link: a new history entry holding its query,
    /// then the reload path. Only the query part of the link matters.
    pub fn open_link(&mut self, link: &str) {
        self.location.push_query(query_from_link(link));
        self.reload();
    }

    pub fn view<'a>(&self, records: &'a [Claim]) -> TableView<'a> {
        derive_view(records, &self.state, &self.priorities)
    }

    fn first_page(&self) -> PaginationSpec {
        PaginationSpec {
            page: 1,
            ..self.state.pagination
        }
    }

    fn commit_pagination(&mut self, pagination: PaginationSpec) {
        let next = TableState {
            pagination,
            ..self.state.clone()
        };
        self.commit(next);
    }

    fn commit(&mut self, next: TableState) {
        let query = encode_query(&next, &self.defaults);
        self.state = next;
        self.location.replace_query(&query);
        tracing::debug!(query = %query, "table state committed");
    }
}
