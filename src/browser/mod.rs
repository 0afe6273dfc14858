pub mod chromium;

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use tokio::sync::OwnedSemaphorePermit;
use uuid::Uuid;

use crate::error::AuditError;

/// Returned (inside `anyhow::Error`) by [`BrowserSession::goto`] when the
/// browser itself gave up waiting for the page.
#[derive(Debug, thiserror::Error)]
#[error("Page did not finish loading before the browser timed out")]
pub struct NavigationTimedOut;

/// One isolated, disposable browser context. Used for exactly one audit.
pub trait BrowserSession: Send + Sync {
    /// Navigate to `url` and resolve once the page has finished loading.
    fn goto<'a>(&'a self, url: &'a str) -> BoxFuture<'a, anyhow::Result<()>>;

    /// Evaluate a script in the loaded page, awaiting any returned promise.
    fn evaluate(&self, script: String) -> BoxFuture<'_, anyhow::Result<serde_json::Value>>;

    /// Tear down the browser context and everything it owns.
    fn close(self: Box<Self>) -> BoxFuture<'static, ()>;
}

/// Allocator for browser sessions. Shared by every in-flight audit; the
/// sessions it hands out never are.
pub trait SessionManager: Send + Sync {
    fn acquire(&self) -> BoxFuture<'_, Result<SessionHandle, AuditError>>;

    /// Consumes the handle so a session can only be released once.
    fn release(&self, handle: SessionHandle) -> BoxFuture<'_, ()>;

    fn active_sessions(&self) -> usize;

    fn max_sessions(&self) -> usize;
}

pub struct SessionHandle {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    session: Box<dyn BrowserSession>,
    // Held for the life of the session; dropping it frees the admission slot.
    _slot: Option<OwnedSemaphorePermit>,
}

impl SessionHandle {
    pub fn new(session: Box<dyn BrowserSession>, slot: Option<OwnedSemaphorePermit>) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            session,
            _slot: slot,
        }
    }

    pub fn session(&self) -> &dyn BrowserSession {
        self.session.as_ref()
    }

    /// Close the underlying browser, then free the admission slot.
    pub async fn close(self) {
        let SessionHandle {
            session,
            _slot: slot,
            ..
        } = self;
        session.close().await;
        drop(slot);
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("id", &self.id)
            .field("started_at", &self.started_at)
            .finish()
    }
}
