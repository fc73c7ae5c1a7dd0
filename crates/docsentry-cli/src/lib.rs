use docsentry_core::{ErrorMetadata, IngestError};
use serde::Serialize;

/// Truncate to at most `max_chars` characters, appending "..." if truncated.
pub fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Client-safe error body. Matched patterns and member names stay in the logs.
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub error: String,
    pub code: &'static str,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<&'static str>,
}

impl From<&IngestError> for ErrorReport {
    fn from(err: &IngestError) -> Self {
        Self {
            error: err.client_message(),
            code: err.error_code(),
            status: err.http_status_code(),
            suggested_action: err.suggested_action(),
        }
    }
}

/// Initialize tracing for CLI binaries. Logs go to stderr so stdout stays
/// clean for extracted text and JSON.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
