use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Browser session unavailable: {0}")]
    SessionUnavailable(String),

    #[error("Navigation to {url} did not finish within {timeout_secs}s")]
    NavigationTimeout { url: String, timeout_secs: u64 },

    #[error("Scan of {url} failed: {reason}")]
    ScanFailed { url: String, reason: String },

    #[error("Audit task was cancelled: {0}")]
    Cancelled(String),

    #[error("{0}")]
    Internal(String),
}

impl AuditError {
    /// Stable machine-readable kind included in error responses.
    pub fn kind(&self) -> &'static str {
        match self {
            AuditError::InvalidUrl(_) => "invalid_url",
            AuditError::SessionUnavailable(_) => "session_unavailable",
            AuditError::NavigationTimeout { .. } => "navigation_timeout",
            AuditError::ScanFailed { .. } => "scan_failed",
            AuditError::Cancelled(_) | AuditError::Internal(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuditError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            AuditError::SessionUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AuditError::NavigationTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            AuditError::ScanFailed { .. } => StatusCode::BAD_GATEWAY,
            AuditError::Cancelled(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuditError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn scan_failed(url: &str, reason: impl Into<String>) -> Self {
        AuditError::ScanFailed {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

impl IntoResponse for AuditError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = serde_json::json!({
            "kind": self.kind(),
            "error": self.to_string(),
        });

        (status, axum::Json(body)).into_response()
    }
}
