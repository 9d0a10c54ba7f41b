use std::cmp::Ordering;

use crate::domain::entities::table::SortDirection;

/// Total order over two extracted sort keys.
///
/// No direction yields `Equal` for every pair, which a stable sort turns into
/// the identity ordering.
pub fn compare_values<T: Ord + ?Sized>(
    a: &T,
    b: &T,
    direction: Option<SortDirection>,
) -> Ordering {
    let Some(direction) = direction else {
        return Ordering::Equal;
    };

    let natural = a.cmp(b);
    match direction {
        SortDirection::Asc => natural,
        SortDirection::Desc => natural.reverse(),
    }
}
