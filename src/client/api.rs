use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::CLIENT_TIMEOUT_SECS;
use crate::model::AuditReport;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid audit service URL: {0}")]
    InvalidServiceUrl(String),

    #[error("Request to audit service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Audit service returned {status} ({kind}): {message}")]
    Server {
        status: u16,
        kind: String,
        message: String,
    },
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the audit service.
pub struct AuditClient {
    base: Url,
    http: reqwest::Client,
}

impl AuditClient {
    pub fn new(base: &str) -> Result<Self, ClientError> {
        let base = Url::parse(base)
            .map_err(|e| ClientError::InvalidServiceUrl(format!("{}: {}", base, e)))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(CLIENT_TIMEOUT_SECS))
            .build()?;
        Ok(Self { base, http })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base
            .join(path)
            .map_err(|e| ClientError::InvalidServiceUrl(format!("{}: {}", path, e)))
    }

    /// POST /audit for `target`.
    pub async fn audit(&self, target: &str) -> Result<AuditReport, ClientError> {
        let endpoint = self.endpoint("audit")?;
        debug!("Requesting audit of {} from {}", target, endpoint);

        let resp = self
            .http
            .post(endpoint)
            .json(&serde_json::json!({ "url": target }))
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json::<AuditReport>().await?);
        }

        let text = resp.text().await.unwrap_or_default();
        Err(server_error(status.as_u16(), &text))
    }

    /// GET /health; true when the service answers 200.
    pub async fn is_ready(&self) -> bool {
        let endpoint = match self.endpoint("health") {
            Ok(url) => url,
            Err(_) => return false,
        };
        match self.http.get(endpoint).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}

fn server_error(status: u16, body: &str) -> ClientError {
    let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();
    let (kind, message) = match parsed {
        Some(ErrorBody { kind, error }) => (
            kind.unwrap_or_else(|| "unknown".to_string()),
            error.unwrap_or_else(|| body.to_string()),
        ),
        None => ("unknown".to_string(), body.to_string()),
    };
    ClientError::Server {
        status,
        kind,
        message,
    }
}
