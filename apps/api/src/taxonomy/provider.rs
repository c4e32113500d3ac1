//! Taxonomy providers — pluggable sources for the taxonomy snapshot.
//!
//! Default: `BuiltinTaxonomyProvider` (bundled JSON).
//! `FileTaxonomyProvider` reads an externally edited file (`TAXONOMY_PATH`).
//!
//! A failing provider never takes the service down: `load_or_degrade` logs the error
//! and hands back an empty taxonomy, which classifies everything as `GENERAL_TECH`.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::taxonomy::{Taxonomy, TaxonomyError};

const BUILTIN_TAXONOMY_JSON: &str = include_str!("../../assets/default_taxonomy.json");

/// Parses the bundled default taxonomy.
pub fn builtin_taxonomy() -> Result<Taxonomy, TaxonomyError> {
    Taxonomy::from_json_str(BUILTIN_TAXONOMY_JSON)
}

/// A source of taxonomy snapshots. Implement this to add a new backend without
/// touching startup or handler code.
#[async_trait]
pub trait TaxonomyProvider: Send + Sync {
    async fn load(&self) -> Result<Taxonomy, TaxonomyError>;

    /// Human-readable source label for logs.
    fn describe(&self) -> String;
}

pub struct BuiltinTaxonomyProvider;

#[async_trait]
impl TaxonomyProvider for BuiltinTaxonomyProvider {
    async fn load(&self) -> Result<Taxonomy, TaxonomyError> {
        builtin_taxonomy()
    }

    fn describe(&self) -> String {
        "builtin".to_string()
    }
}

pub struct FileTaxonomyProvider {
    path: PathBuf,
}

impl FileTaxonomyProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TaxonomyProvider for FileTaxonomyProvider {
    async fn load(&self) -> Result<Taxonomy, TaxonomyError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| TaxonomyError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        Taxonomy::from_json_str(&raw)
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

/// Loads from the provider, falling back to an empty taxonomy on any error.
pub async fn load_or_degrade(provider: &dyn TaxonomyProvider) -> Taxonomy {
    match provider.load().await {
        Ok(taxonomy) => {
            info!(
                "Taxonomy loaded from {} ({} categories)",
                provider.describe(),
                taxonomy.entries().len()
            );
            taxonomy
        }
        Err(e) => {
            warn!(
                "Taxonomy load from {} failed: {e}. Every skill will classify as GENERAL_TECH",
                provider.describe()
            );
            Taxonomy::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_taxonomy_is_valid() {
        let taxonomy = builtin_taxonomy().unwrap();
        assert!(!taxonomy.is_empty());
        let paths = taxonomy.paths();
        assert_eq!(paths[0], "TECHNICAL_ML_AI_MACHINE_LEARNING");
        assert_eq!(paths.last().unwrap(), "SOFT_SKILLS_WORK_ETHIC");
    }

    #[tokio::test]
    async fn test_builtin_provider_loads() {
        let taxonomy = BuiltinTaxonomyProvider.load().await.unwrap();
        assert!(taxonomy
            .paths()
            .contains(&"TECHNICAL_CLOUD_AWS".to_string()));
    }

    #[tokio::test]
    async fn test_file_provider_reads_bare_tree() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"CLOUD_AWS": ["aws", "lambda"]}}"#).unwrap();

        let provider = FileTaxonomyProvider::new(file.path());
        let taxonomy = provider.load().await.unwrap();
        assert_eq!(taxonomy.paths(), vec!["CLOUD_AWS"]);
        assert!(provider.describe().starts_with("file:"));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileTaxonomyProvider::new(dir.path().join("missing.json"));
        assert!(matches!(
            provider.load().await,
            Err(TaxonomyError::Io { .. })
        ));
    }

    #[tokio::test]
    async fn test_malformed_file_degrades_to_empty_taxonomy() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"A\": [1, 2").unwrap();

        let taxonomy = load_or_degrade(&FileTaxonomyProvider::new(file.path())).await;
        assert!(taxonomy.is_empty());
    }
}
