use docsentry_core::{IngestConfig, IngestError};

/// Upload validator
///
/// Cheap checks that run before any byte of the content is interpreted:
/// extension allow-list, empty file and size guard.
#[derive(Clone, Debug)]
pub struct UploadValidator {
    max_file_size: usize,
    allowed_extensions: Vec<String>,
}

impl UploadValidator {
    pub fn new(max_file_size: usize, allowed_extensions: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_extensions,
        }
    }

    pub fn from_config(config: &IngestConfig) -> Self {
        Self::new(
            config.max_file_size_bytes,
            config.allowed_extensions.clone(),
        )
    }

    /// Validate the declared extension against the allow-list
    pub fn validate_extension(&self, extension: &str) -> Result<(), IngestError> {
        let normalized = extension.to_lowercase();

        if !self.allowed_extensions.contains(&normalized) {
            return Err(IngestError::UnsupportedExtension {
                extension: normalized,
                allowed: self.allowed_extensions.clone(),
            });
        }

        Ok(())
    }

    pub fn validate_not_empty(&self, size: usize) -> Result<(), IngestError> {
        if size == 0 {
            return Err(IngestError::EmptyFile);
        }
        Ok(())
    }

    /// Validate file size. Runs before parsing so scan cost stays bounded.
    pub fn validate_file_size(&self, size: usize) -> Result<(), IngestError> {
        if size > self.max_file_size {
            return Err(IngestError::OversizedFile {
                size,
                max: self.max_file_size,
            });
        }
        Ok(())
    }
}
