//! Configuration module
//!
//! Limits and allow-lists for the ingestion pipeline. Values come from the
//! environment (optionally through a `.env` file) with conservative defaults.

use std::env;

use crate::models::DocumentKind;

const MAX_FILE_SIZE_MB: usize = 10;
const MAX_MEMBER_BYTES_MB: usize = 8;
const MAX_INSPECTED_BYTES_MB: usize = 32;
const BATCH_CONCURRENCY: usize = 4;
const BYTES_PER_MB: usize = 1024 * 1024;

/// Ingestion pipeline configuration
#[derive(Clone, Debug)]
pub struct IngestConfig {
    pub max_file_size_bytes: usize,
    pub allowed_extensions: Vec<String>,
    /// Most decompressed bytes read from a single archive member.
    pub max_member_bytes: usize,
    /// Most decompressed bytes read from one archive across all members.
    pub max_inspected_bytes: usize,
    /// Files processed at once by the concurrent batch entry point.
    pub batch_concurrency: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: MAX_FILE_SIZE_MB * BYTES_PER_MB,
            allowed_extensions: DocumentKind::ALL
                .iter()
                .map(|k| k.extension().to_string())
                .collect(),
            max_member_bytes: MAX_MEMBER_BYTES_MB * BYTES_PER_MB,
            max_inspected_bytes: MAX_INSPECTED_BYTES_MB * BYTES_PER_MB,
            batch_concurrency: BATCH_CONCURRENCY,
        }
    }
}

impl IngestConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let max_file_size_bytes = env_megabytes("DOCSENTRY_MAX_FILE_SIZE_MB", MAX_FILE_SIZE_MB)?;

        let allowed_extensions = env::var("DOCSENTRY_ALLOWED_EXTENSIONS")
            .unwrap_or_else(|_| "pdf,docx,doc".to_string())
            .split(',')
            .map(|s| s.trim().trim_start_matches('.').to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let max_member_bytes =
            env_megabytes("DOCSENTRY_MAX_MEMBER_BYTES_MB", MAX_MEMBER_BYTES_MB)?;
        let max_inspected_bytes =
            env_megabytes("DOCSENTRY_MAX_INSPECTED_BYTES_MB", MAX_INSPECTED_BYTES_MB)?;
        let batch_concurrency = env_usize("DOCSENTRY_BATCH_CONCURRENCY", BATCH_CONCURRENCY)?;

        let config = Self {
            max_file_size_bytes,
            allowed_extensions,
            max_member_bytes,
            max_inspected_bytes,
            batch_concurrency,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!(
                "DOCSENTRY_MAX_FILE_SIZE_MB must be greater than zero"
            ));
        }

        if self.allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!(
                "DOCSENTRY_ALLOWED_EXTENSIONS must list at least one extension"
            ));
        }

        if let Some(unknown) = self
            .allowed_extensions
            .iter()
            .find(|ext| DocumentKind::from_extension(ext).is_none())
        {
            return Err(anyhow::anyhow!(
                "DOCSENTRY_ALLOWED_EXTENSIONS contains unsupported extension '{}' (supported: pdf, docx, doc)",
                unknown
            ));
        }

        if self.max_member_bytes == 0 || self.max_inspected_bytes < self.max_member_bytes {
            return Err(anyhow::anyhow!(
                "DOCSENTRY_MAX_INSPECTED_BYTES_MB must be at least DOCSENTRY_MAX_MEMBER_BYTES_MB, and both must be greater than zero"
            ));
        }

        if self.batch_concurrency == 0 {
            return Err(anyhow::anyhow!(
                "DOCSENTRY_BATCH_CONCURRENCY must be greater than zero"
            ));
        }

        Ok(())
    }
}

/// Numeric variable, or `default` when unset. A set but malformed value is an
/// error rather than a silent fallback.
fn env_usize(key: &str, default: usize) -> Result<usize, anyhow::Error> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<usize>()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number", key)),
        Err(_) => Ok(default),
    }
}

fn env_megabytes(key: &str, default_mb: usize) -> Result<usize, anyhow::Error> {
    let mb = env_usize(key, default_mb)?;
    mb_to_bytes(mb).ok_or_else(|| anyhow::anyhow!("{} is too large", key))
}

fn mb_to_bytes(mb: usize) -> Option<usize> {
    mb.checked_mul(BYTES_PER_MB)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = IngestConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_file_size_bytes, 10 * 1024 * 1024);
        assert_eq!(config.allowed_extensions, vec!["pdf", "docx", "doc"]);
    }

    #[test]
    fn test_mb_to_bytes_overflow() {
        assert_eq!(mb_to_bytes(8), Some(8 * 1024 * 1024));
        assert_eq!(mb_to_bytes(usize::MAX), None);
    }

    // Each test uses its own variable so parallel tests do not race.
    #[test]
    fn test_env_usize_rejects_malformed_value() {
        env::set_var("DOCSENTRY_TEST_MALFORMED_COUNT", "four");
        let err = env_usize("DOCSENTRY_TEST_MALFORMED_COUNT", 4).unwrap_err();
        assert!(err.to_string().contains("DOCSENTRY_TEST_MALFORMED_COUNT"));
    }

    #[test]
    fn test_env_usize_defaults_when_unset() {
        env::remove_var("DOCSENTRY_TEST_UNSET_COUNT");
        assert_eq!(env_usize("DOCSENTRY_TEST_UNSET_COUNT", 4).unwrap(), 4);
    }

    #[test]
    fn test_env_megabytes_rejects_overflow() {
        env::set_var("DOCSENTRY_TEST_HUGE_MB", usize::MAX.to_string());
        let err = env_megabytes("DOCSENTRY_TEST_HUGE_MB", 8).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn test_validate_rejects_unknown_extension() {
        let config = IngestConfig {
            allowed_extensions: vec!["pdf".to_string(), "exe".to_string()],
            ..IngestConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("exe"));
    }

    #[test]
    fn test_validate_rejects_empty_allow_list() {
        let config = IngestConfig {
            allowed_extensions: vec![],
            ..IngestConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_budgets() {
        let config = IngestConfig {
            max_member_bytes: 4 * BYTES_PER_MB,
            max_inspected_bytes: BYTES_PER_MB,
            ..IngestConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let config = IngestConfig {
            batch_concurrency: 0,
            ..IngestConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
