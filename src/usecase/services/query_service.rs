use std::sync::Arc;

use crate::domain::entities::claim::Claim;
use crate::usecase::ports::repo::ClaimSource;

/// Where the record set stands from the table's point of view.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Ready(Arc<Vec<Claim>>),
    Failed(String),
}

impl LoadState {
    pub fn claims(&self) -> Option<&[Claim]> {
        match self {
            LoadState::Ready(claims) => Some(claims.as_slice()),
            LoadState::Loading | LoadState::Failed(_) => None,
        }
    }
}

pub struct QueryService {
    source: Arc<dyn ClaimSource>,
}

impl QueryService {
    pub fn new(source: Arc<dyn ClaimSource>) -> Self {
        Self { source }
    }

    /// Fetches once. A failure is terminal until the caller loads again.
    pub fn load(&self) -> LoadState {
        match self.source.fetch_claims() {
            Ok(claims) => {
                tracing::info!(count = claims.len(), "claims loaded");
                LoadState::Ready(Arc::new(claims))
            }
            Err(err) => {
                tracing::warn!(%err, "claim source failed");
                LoadState::Failed(err.to_string())
            }
        }
    }
}
