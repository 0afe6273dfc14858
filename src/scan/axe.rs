use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

use super::{RawScanResult, ScanExecutor};
use crate::browser::{NavigationTimedOut, SessionHandle};
use crate::config::AuditConfig;
use crate::error::AuditError;

// Resolves to the JSON-encoded results so large reports survive the CDP
// by-value transfer intact.
const RUN_AXE: &str = r#"
(async () => {
    if (typeof window.axe === 'undefined') {
        throw new Error('axe-core is not loaded in this page');
    }
    const results = await window.axe.run(document, {
        resultTypes: ['violations', 'incomplete', 'passes', 'inapplicable'],
    });
    return JSON.stringify({
        violations: results.violations,
        passes: results.passes,
        incomplete: results.incomplete,
        inapplicable: results.inapplicable,
    });
})()
"#;

/// Drives axe-core inside a browser session.
pub struct AxeExecutor {
    script: Option<Arc<String>>,
    navigation_timeout: Duration,
    scan_timeout: Duration,
}

impl AxeExecutor {
    pub fn new(script: Option<String>, navigation_timeout: Duration, scan_timeout: Duration) -> Self {
        Self {
            script: script.map(Arc::new),
            navigation_timeout,
            scan_timeout,
        }
    }

    /// Read the axe-core bundle named in the config, if any.
    pub fn from_config(config: &AuditConfig) -> anyhow::Result<Self> {
        let script = match &config.axe_script {
            Some(path) => {
                let source = std::fs::read_to_string(path).map_err(|e| {
                    anyhow::anyhow!("Failed to read axe-core bundle {:?}: {}", path, e)
                })?;
                info!("Loaded axe-core bundle from {:?} ({} bytes)", path, source.len());
                Some(source)
            }
            None => None,
        };
        Ok(Self::new(
            script,
            config.navigation_timeout,
            config.scan_timeout,
        ))
    }

    pub fn has_engine(&self) -> bool {
        self.script.is_some()
    }

    async fn scan(&self, handle: &SessionHandle, url: &Url) -> Result<RawScanResult, AuditError> {
        let target = url.as_str();
        let session = handle.session();

        let script = self.script.as_ref().ok_or_else(|| {
            AuditError::scan_failed(target, "No axe-core bundle configured (--axe-script)")
        })?;

        // 1. Navigate and wait for the load event
        info!(session = %handle.id, url = target, "Navigating");
        let nav_start = Instant::now();
        let timed_out = match tokio::time::timeout(self.navigation_timeout, session.goto(target))
            .await
        {
            Ok(Ok(())) => false,
            Ok(Err(e)) if e.is::<NavigationTimedOut>() => true,
            Ok(Err(e)) => {
                return Err(AuditError::scan_failed(
                    target,
                    format!("Navigation failed: {}", e),
                ))
            }
            Err(_) => true,
        };
        if timed_out {
            warn!(session = %handle.id, url = target, "Navigation timed out");
            return Err(AuditError::NavigationTimeout {
                url: target.to_string(),
                timeout_secs: self.navigation_timeout.as_secs(),
            });
        }
        debug!(
            session = %handle.id,
            "Page loaded in {:.0}ms",
            nav_start.elapsed().as_secs_f64() * 1000.0
        );

        // 2. Inject the engine
        let inject = format!("{}\n;true", script.as_str());
        self.bounded(target, session.evaluate(inject))
            .await?
            .map_err(|e| {
                AuditError::scan_failed(target, format!("Failed to inject axe-core: {}", e))
            })?;

        // 3. Run it
        let scan_start = Instant::now();
        let encoded = self
            .bounded(target, session.evaluate(RUN_AXE.to_string()))
            .await?
            .map_err(|e| AuditError::scan_failed(target, format!("axe.run failed: {}", e)))?;

        let raw = decode_results(target, encoded)?;
        info!(
            session = %handle.id,
            url = target,
            violations = raw.violations.len(),
            passes = raw.passes.len(),
            "Scan finished in {:.0}ms",
            scan_start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(raw)
    }

    async fn bounded<T>(
        &self,
        target: &str,
        fut: impl std::future::Future<Output = T>,
    ) -> Result<T, AuditError> {
        tokio::time::timeout(self.scan_timeout, fut)
            .await
            .map_err(|_| {
                AuditError::scan_failed(
                    target,
                    format!(
                        "Scanning engine did not finish within {}s",
                        self.scan_timeout.as_secs()
                    ),
                )
            })
    }
}

impl ScanExecutor for AxeExecutor {
    fn run<'a>(
        &'a self,
        session: &'a SessionHandle,
        url: &'a Url,
    ) -> BoxFuture<'a, Result<RawScanResult, AuditError>> {
        self.scan(session, url).boxed()
    }
}

/// Accepts either the JSON string produced by `RUN_AXE` or an already
/// structured object.
fn decode_results(target: &str, value: serde_json::Value) -> Result<RawScanResult, AuditError> {
    let decoded = match value {
        serde_json::Value::String(text) => serde_json::from_str::<RawScanResult>(&text),
        other => serde_json::from_value::<RawScanResult>(other),
    };
    decoded.map_err(|e| {
        AuditError::scan_failed(target, format!("Engine returned malformed results: {}", e))
    })
}
