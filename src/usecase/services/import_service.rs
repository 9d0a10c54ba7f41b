use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::infra::import::csv::read_claims_csv;
use crate::infra::import::xlsx::read_claims_xlsx;
use crate::usecase::ports::repo::{ClaimRepository, ClaimSource, ImportResult};

pub const GENERATED_SOURCE_PATH: &str = "generated";

pub struct ImportService {
    repo: Arc<dyn ClaimRepository>,
}

impl ImportService {
    pub fn new(repo: Arc<dyn ClaimRepository>) -> Self {
        Self { repo }
    }

    /// Replaces the stored claims with the contents of a CSV or XLSX file.
    pub fn import_file(&self, path: &Path) -> Result<ImportResult> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase())
            .unwrap_or_default();

        let claims = if ext == "xlsx" {
            read_claims_xlsx(path)?
        } else {
            read_claims_csv(path)?
        };

        let source_path = path.to_string_lossy().into_owned();
        let row_count = self
            .repo
            .replace_claims(&source_path, &claims)
            .with_context(|| format!("failed to store claims from {}", path.display()))?;
        tracing::info!(path = %path.display(), row_count, "claims imported");

        Ok(ImportResult {
            source_path,
            row_count,
        })
    }

    /// Fills an empty store from `seed`. A store that already holds claims is
    /// left alone.
    pub fn seed_if_empty(&self, seed: &dyn ClaimSource) -> Result<Option<ImportResult>> {
        self.repo.init().context("failed to initialize claim store")?;
        if self.repo.count_claims().context("failed to count claims")? > 0 {
            return Ok(None);
        }

        let claims = seed.fetch_claims().context("failed to generate seed claims")?;
        let row_count = self
            .repo
            .replace_claims(GENERATED_SOURCE_PATH, &claims)
            .context("failed to store seed claims")?;
        tracing::info!(row_count, "seeded empty claim store");

        Ok(Some(ImportResult {
            source_path: GENERATED_SOURCE_PATH.to_string(),
            row_count,
        }))
    }

    pub fn last_import(&self) -> Result<Option<ImportResult>> {
        self.repo.last_import().context("failed to read last import")
    }
}
