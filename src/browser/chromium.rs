use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::error::CdpError;
use chromiumoxide::Page;
use futures::future::BoxFuture;
use futures::{FutureExt, StreamExt};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{BrowserSession, NavigationTimedOut, SessionHandle, SessionManager};
use crate::config::{AuditConfig, BROWSER_CLOSE_TIMEOUT_SECS};
use crate::error::AuditError;

/// Launches one headless Chromium process per session, each with its own
/// throwaway profile directory.
pub struct ChromiumSessions {
    executable: Option<PathBuf>,
    slots: Arc<Semaphore>,
    max_sessions: usize,
    acquire_timeout: Duration,
    request_timeout: Duration,
    launch_lock: Mutex<()>,
    active: Arc<AtomicUsize>,
}

impl ChromiumSessions {
    pub fn new(config: &AuditConfig) -> Self {
        let max_sessions = config.max_sessions.max(1);
        Self {
            executable: config.chrome_executable.clone(),
            slots: Arc::new(Semaphore::new(max_sessions)),
            max_sessions,
            acquire_timeout: config.acquire_timeout,
            request_timeout: config.browser_request_timeout(),
            launch_lock: Mutex::new(()),
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn browser_config(&self, profile: &TempDir) -> Result<BrowserConfig, AuditError> {
        let mut builder = BrowserConfig::builder()
            .user_data_dir(profile.path())
            .request_timeout(self.request_timeout)
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .arg("--disable-sync")
            .arg("--incognito");

        if let Some(exe) = &self.executable {
            builder = builder.chrome_executable(exe);
        }

        builder
            .build()
            .map_err(|e| AuditError::SessionUnavailable(format!("Invalid browser config: {}", e)))
    }

    /// Wait up to the acquire timeout for a free admission slot.
    async fn acquire_slot(&self) -> Result<OwnedSemaphorePermit, AuditError> {
        tokio::time::timeout(self.acquire_timeout, self.slots.clone().acquire_owned())
            .await
            .map_err(|_| {
                AuditError::SessionUnavailable(format!(
                    "All {} browser sessions are busy",
                    self.max_sessions
                ))
            })?
            .map_err(|_| AuditError::SessionUnavailable("Session pool is closed".to_string()))
    }

    /// Wrap a launched session in a handle that owns its slot.
    fn admit(
        &self,
        session: Box<dyn BrowserSession>,
        slot: OwnedSemaphorePermit,
    ) -> SessionHandle {
        let handle = SessionHandle::new(session, Some(slot));
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        info!(session = %handle.id, active, "Browser session launched");
        handle
    }

    async fn launch(&self) -> Result<SessionHandle, AuditError> {
        let slot = self.acquire_slot().await?;

        let profile = tempfile::Builder::new()
            .prefix("a11y-audit-profile-")
            .tempdir()
            .map_err(|e| {
                AuditError::SessionUnavailable(format!("Failed to create browser profile: {}", e))
            })?;

        let config = self.browser_config(&profile)?;

        // Launches are serialized; concurrent process spawns race on the
        // devtools port handshake.
        let (browser, mut handler) = {
            let _guard = self.launch_lock.lock().await;
            Browser::launch(config).await.map_err(|e| {
                AuditError::SessionUnavailable(format!("Failed to launch browser: {}", e))
            })?
        };

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("CDP handler event error: {}", e);
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                ChromiumSession::shutdown(browser, handler_task, profile).await;
                return Err(AuditError::SessionUnavailable(format!(
                    "Failed to open browser tab: {}",
                    e
                )));
            }
        };

        let session = ChromiumSession {
            browser,
            page,
            handler_task,
            profile,
        };

        Ok(self.admit(Box::new(session), slot))
    }
}

impl SessionManager for ChromiumSessions {
    fn acquire(&self) -> BoxFuture<'_, Result<SessionHandle, AuditError>> {
        self.launch().boxed()
    }

    fn release(&self, handle: SessionHandle) -> BoxFuture<'_, ()> {
        async move {
            let id = handle.id;
            let lifetime_ms = (chrono::Utc::now() - handle.started_at).num_milliseconds();
            handle.close().await;
            let active = self.active.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
            info!(session = %id, active, lifetime_ms, "Browser session released");
        }
        .boxed()
    }

    fn active_sessions(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    fn max_sessions(&self) -> usize {
        self.max_sessions
    }
}

struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    profile: TempDir,
}

impl ChromiumSession {
    async fn shutdown(mut browser: Browser, handler_task: JoinHandle<()>, profile: TempDir) {
        let grace = Duration::from_secs(BROWSER_CLOSE_TIMEOUT_SECS);

        match tokio::time::timeout(grace, browser.close()).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => warn!("Browser close command failed: {}", e),
            Err(_) => warn!("Browser did not acknowledge close within {:?}", grace),
        }

        if tokio::time::timeout(grace, browser.wait()).await.is_err() {
            warn!("Browser process did not exit within {:?}; dropping it", grace);
        }

        handler_task.abort();
        // Dropping the browser kills any surviving child; dropping the
        // profile removes its directory.
        drop(browser);
        if let Err(e) = profile.close() {
            warn!("Failed to remove browser profile: {}", e);
        }
    }
}

impl BrowserSession for ChromiumSession {
    fn goto<'a>(&'a self, url: &'a str) -> BoxFuture<'a, anyhow::Result<()>> {
        async move {
            match self.page.goto(url).await {
                Ok(_) => Ok(()),
                Err(CdpError::Timeout) => Err(NavigationTimedOut.into()),
                Err(e) => Err(e.into()),
            }
        }
        .boxed()
    }

    fn evaluate(&self, script: String) -> BoxFuture<'_, anyhow::Result<serde_json::Value>> {
        async move {
            let params = EvaluateParams::builder()
                .expression(script)
                .await_promise(true)
                .return_by_value(true)
                .build()
                .map_err(anyhow::Error::msg)?;
            let result = self.page.evaluate_expression(params).await?;
            Ok(result.into_value::<serde_json::Value>()?)
        }
        .boxed()
    }

    fn close(self: Box<Self>) -> BoxFuture<'static, ()> {
        let ChromiumSession {
            browser,
            page,
            handler_task,
            profile,
        } = *self;
        async move {
            drop(page);
            ChromiumSession::shutdown(browser, handler_task, profile).await;
        }
        .boxed()
    }
}
