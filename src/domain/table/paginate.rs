use thiserror::Error;

use crate::domain::entities::table::PaginationSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("page {requested} is outside 1..={total_pages}")]
pub struct PageOutOfRange {
    pub requested: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("page size must be greater than zero")]
pub struct PageSizeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid pagination: page {page}, page size {page_size}")]
pub struct InvalidPagination {
    pub page: usize,
    pub page_size: usize,
}

/// Page and page size are both 1-based counts; zero is never a valid value.
pub fn validate_pagination(
    pagination: PaginationSpec,
) -> Result<PaginationSpec, InvalidPagination> {
    if pagination.page == 0 || pagination.page_size == 0 {
        return Err(InvalidPagination {
            page: pagination.page,
            page_size: pagination.page_size,
        });
    }
    Ok(pagination)
}

/// `[start, end)` of the requested page, clipped to `len`. A start past the
/// end yields an empty slice rather than an error.
pub fn paginate<T>(records: &[T], pagination: PaginationSpec) -> &[T] {
    if pagination.page_size == 0 {
        return &[];
    }
    let start = pagination
        .page
        .saturating_sub(1)
        .saturating_mul(pagination.page_size)
        .min(records.len());
    let end = start.saturating_add(pagination.page_size).min(records.len());
    &records[start..end]
}

/// `ceil(count / page_size)`; zero records means zero pages.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Moves to `requested` when it lies in `[1, total_pages]`. Anything else is
/// rejected, never clamped.
pub fn change_page(
    current: PaginationSpec,
    requested: usize,
    total_pages: usize,
) -> Result<PaginationSpec, PageOutOfRange> {
    if requested < 1 || requested > total_pages {
        return Err(PageOutOfRange {
            requested,
            total_pages,
        });
    }
    Ok(PaginationSpec {
        page: requested,
        ..current
    })
}

/// A new unit of pagination invalidates the old position.
pub fn change_page_size(page_size: usize) -> Result<PaginationSpec, PageSizeError> {
    if page_size == 0 {
        return Err(PageSizeError);
    }
    Ok(PaginationSpec::first_page(page_size))
}

/// Which navigation controls are reachable from the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNavigation {
    pub page: usize,
    pub total_pages: usize,
    pub can_first: bool,
    pub can_previous: bool,
    pub can_next: bool,
    pub can_last: bool,
}

impl PageNavigation {
    pub fn new(pagination: PaginationSpec, filtered_count: usize) -> Self {
        let total_pages = total_pages(filtered_count, pagination.page_size);
        let page = pagination.page;
        let has_pages = total_pages > 0;
        Self {
            page,
            total_pages,
            can_first: has_pages && page != 1,
            can_previous: page > 1 && page - 1 <= total_pages,
            can_next: page < total_pages,
            can_last: has_pages && page != total_pages,
        }
    }
}
