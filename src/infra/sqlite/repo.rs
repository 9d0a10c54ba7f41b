use std::path::PathBuf;

use crate::domain::entities::claim::Claim;
use crate::infra::sqlite::queries::{count_claims, last_import, load_claims, replace_claims};
use crate::infra::sqlite::schema::init_db;
use crate::usecase::ports::repo::{ClaimRepository, ClaimSource, ImportResult, SourceError};

pub struct SqliteRepo {
    pub db_path: PathBuf,
}

impl ClaimSource for SqliteRepo {
    fn fetch_claims(&self) -> Result<Vec<Claim>, SourceError> {
        load_claims(&self.db_path).map_err(|err| SourceError::Message(format!("{err:#}")))
    }
}

impl ClaimRepository for SqliteRepo {
    fn init(&self) -> Result<(), SourceError> {
        init_db(&self.db_path).map_err(|err| SourceError::Message(err.to_string()))
    }

    fn count_claims(&self) -> Result<i64, SourceError> {
        count_claims(&self.db_path).map_err(|err| SourceError::Message(err.to_string()))
    }

    fn replace_claims(&self, source_path: &str, claims: &[Claim]) -> Result<i64, SourceError> {
        replace_claims(&self.db_path, source_path, claims)
            .map_err(|err| SourceError::Message(err.to_string()))
    }

    fn last_import(&self) -> Result<Option<ImportResult>, SourceError> {
        last_import(&self.db_path).map_err(|err| SourceError::Message(err.to_string()))
    }
}
