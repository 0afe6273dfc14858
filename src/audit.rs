use futures::FutureExt;
use serde::Deserialize;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};
use url::Url;

use crate::browser::SessionManager;
use crate::error::AuditError;
use crate::model::AuditReport;
use crate::normalize::{normalize, NormalizeOutcome};
use crate::scan::ScanExecutor;

#[derive(Debug, Clone, Deserialize)]
pub struct AuditRequest {
    pub url: String,
}

/// Parse `raw` as an absolute http(s) URL with a host.
pub fn validate_url(raw: &str) -> Result<Url, AuditError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AuditError::InvalidUrl("URL is empty".to_string()));
    }

    let url = Url::parse(trimmed)
        .map_err(|e| AuditError::InvalidUrl(format!("{:?} is not a valid URL: {}", trimmed, e)))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(AuditError::InvalidUrl(format!(
                "Unsupported scheme {:?}; only http and https can be audited",
                other
            )))
        }
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(AuditError::InvalidUrl(format!("{:?} has no host", trimmed)));
    }

    Ok(url)
}

/// acquire → run → normalize → release, one browser session per request.
#[derive(Clone)]
pub struct AuditPipeline {
    sessions: Arc<dyn SessionManager>,
    executor: Arc<dyn ScanExecutor>,
}

impl AuditPipeline {
    pub fn new(sessions: Arc<dyn SessionManager>, executor: Arc<dyn ScanExecutor>) -> Self {
        Self { sessions, executor }
    }

    pub fn sessions(&self) -> &Arc<dyn SessionManager> {
        &self.sessions
    }

    /// Validate, then audit on a detached task. If the caller stops waiting
    /// the task still runs to completion, so the session is always released.
    pub async fn run(&self, request: AuditRequest) -> Result<AuditReport, AuditError> {
        let url = validate_url(&request.url)?;

        let sessions = self.sessions.clone();
        let executor = self.executor.clone();
        let task = tokio::spawn(async move {
            audit_in_session(sessions.as_ref(), executor.as_ref(), &url).await
        });

        match task.await {
            Ok(result) => result.map(|outcome| outcome.report),
            Err(e) => {
                error!("Audit task failed to complete: {}", e);
                Err(AuditError::Cancelled(e.to_string()))
            }
        }
    }
}

/// Run one audit inside a freshly acquired session. The session is released
/// on every exit path, including a panicking executor.
pub async fn audit_in_session(
    sessions: &dyn SessionManager,
    executor: &dyn ScanExecutor,
    url: &Url,
) -> Result<NormalizeOutcome, AuditError> {
    let started = Instant::now();
    let handle = sessions.acquire().await?;
    let session_id = handle.id;
    info!(session = %session_id, url = %url, "Audit started");

    let outcome = AssertUnwindSafe(async {
        let raw = executor.run(&handle, url).await?;
        Ok::<_, AuditError>(normalize(raw))
    })
    .catch_unwind()
    .await;

    sessions.release(handle).await;

    let elapsed_ms = started.elapsed().as_millis() as u64;
    match outcome {
        Ok(Ok(normalized)) => {
            let report = &normalized.report;
            info!(
                session = %session_id,
                url = %url,
                elapsed_ms,
                violations = report.violations.len(),
                passes = report.passes.len(),
                dropped = normalized.dropped,
                "Audit completed"
            );
            Ok(normalized)
        }
        Ok(Err(e)) => {
            warn!(session = %session_id, url = %url, elapsed_ms, kind = e.kind(), "Audit failed: {}", e);
            Err(e)
        }
        Err(_) => {
            error!(session = %session_id, url = %url, "Scan executor panicked");
            Err(AuditError::Internal(format!(
                "Scanning {} aborted unexpectedly",
                url
            )))
        }
    }
}
