use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::table::query::href;
use crate::usecase::ports::location::QueryLocation;

/// In-process address for shells without an address bar.
///
/// Keeps a history stack the way a browser tab does. Opening a link pushes an
/// entry; state syncs overwrite the top one and never grow history.
#[derive(Debug)]
pub struct MemoryLocation {
    path: String,
    entries: Mutex<Vec<String>>,
    replacements: AtomicUsize,
}

impl MemoryLocation {
    pub fn new(path: impl Into<String>, initial_query: &str) -> Self {
        let initial_query = initial_query.strip_prefix('?').unwrap_or(initial_query);
        Self {
            path: path.into(),
            entries: Mutex::new(vec![initial_query.to_string()]),
            replacements: AtomicUsize::new(0),
        }
    }

    pub fn replacements(&self) -> usize {
        self.replacements.load(Ordering::Relaxed)
    }

    pub fn history_len(&self) -> usize {
        self.entries().len()
    }

    pub fn href(&self) -> String {
        href(&self.path, &self.current_query())
    }

    fn entries(&self) -> MutexGuard<'_, Vec<String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl QueryLocation for MemoryLocation {
    fn path(&self) -> String {
        self.path.clone()
    }

    fn current_query(&self) -> String {
        self.entries().last().cloned().unwrap_or_default()
    }

    fn replace_query(&self, query: &str) {
        let mut entries = self.entries();
        match entries.last_mut() {
            Some(current) => *current = query.to_string(),
            None => entries.push(query.to_string()),
        }
        drop(entries);
        self.replacements.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(path = %self.path, query, "replaced location query");
    }

    fn push_query(&self, query: &str) {
        let query = query.strip_prefix('?').unwrap_or(query);
        self.entries().push(query.to_string());
        tracing::debug!(path = %self.path, query, "pushed location entry");
    }
}
