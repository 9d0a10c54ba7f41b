use thiserror::Error;

use crate::domain::entities::claim::Claim;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("{0}")]
    Message(String),
}

/// Whatever produces the full claim set. One call returns everything; there
/// is no streaming or incremental update.
pub trait ClaimSource: Send + Sync {
    fn fetch_claims(&self) -> Result<Vec<Claim>, SourceError>;
}

/// A source that can also be written, used by imports.
pub trait ClaimRepository: ClaimSource {
    fn init(&self) -> Result<(), SourceError>;
    fn count_claims(&self) -> Result<i64, SourceError>;
    fn replace_claims(&self, source_path: &str, claims: &[Claim]) -> Result<i64, SourceError>;
    /// Most recent import, `None` for a store that was never filled.
    fn last_import(&self) -> Result<Option<ImportResult>, SourceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResult {
    pub source_path: String,
    pub row_count: i64,
}
