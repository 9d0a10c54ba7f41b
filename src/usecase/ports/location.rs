/// The page address the table state is mirrored into.
///
/// `replace_query` swaps the current history entry in place: no new back-stack
/// entry and no scroll jump. `push_query` is a navigation and adds one.
pub trait QueryLocation: Send + Sync {
    fn path(&self) -> String;
    fn current_query(&self) -> String;
    fn replace_query(&self, query: &str);
    fn push_query(&self, query: &str);
}
