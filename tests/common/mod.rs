#![allow(dead_code)]

use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::json;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;
use uuid::Uuid;

use a11y_audit::audit::AuditPipeline;
use a11y_audit::browser::{BrowserSession, NavigationTimedOut, SessionHandle, SessionManager};
use a11y_audit::error::AuditError;
use a11y_audit::scan::axe::AxeExecutor;
use a11y_audit::scan::{RawScanResult, ScanExecutor};

/// How pages behave inside fake sessions.
#[derive(Clone)]
pub enum PageBehavior {
    Loads { results: serde_json::Value },
    NeverLoads,
    /// The browser gives up on the page before the audit's own deadline.
    BrowserTimesOut,
    Unreachable,
}

struct FakeBrowser {
    behavior: PageBehavior,
}

impl BrowserSession for FakeBrowser {
    fn goto<'a>(&'a self, _url: &'a str) -> BoxFuture<'a, anyhow::Result<()>> {
        async move {
            match &self.behavior {
                PageBehavior::Loads { .. } => Ok(()),
                PageBehavior::NeverLoads => futures::future::pending().await,
                PageBehavior::BrowserTimesOut => Err(NavigationTimedOut.into()),
                PageBehavior::Unreachable => Err(anyhow::anyhow!("net::ERR_NAME_NOT_RESOLVED")),
            }
        }
        .boxed()
    }

    fn evaluate(&self, script: String) -> BoxFuture<'_, anyhow::Result<serde_json::Value>> {
        async move {
            match &self.behavior {
                PageBehavior::Loads { results } if script.contains("axe.run") => {
                    Ok(serde_json::Value::String(results.to_string()))
                }
                _ => Ok(json!(true)),
            }
        }
        .boxed()
    }

    fn close(self: Box<Self>) -> BoxFuture<'static, ()> {
        async {}.boxed()
    }
}

/// Session allocator that counts every acquire and release.
pub struct FakeSessions {
    pub acquired: AtomicUsize,
    pub released: AtomicUsize,
    active: AtomicUsize,
    pub max: usize,
    pub fail_launch: bool,
    pub behavior: PageBehavior,
    pub seen: Mutex<HashSet<Uuid>>,
}

impl FakeSessions {
    pub fn new(behavior: PageBehavior) -> Self {
        Self {
            acquired: AtomicUsize::new(0),
            released: AtomicUsize::new(0),
            active: AtomicUsize::new(0),
            max: 4,
            fail_launch: false,
            behavior,
            seen: Mutex::new(HashSet::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            fail_launch: true,
            ..Self::new(PageBehavior::NeverLoads)
        }
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn active_sessions_now(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

impl SessionManager for FakeSessions {
    fn acquire(&self) -> BoxFuture<'_, Result<SessionHandle, AuditError>> {
        async move {
            if self.fail_launch {
                return Err(AuditError::SessionUnavailable(
                    "chrome executable not found".to_string(),
                ));
            }
            let handle = SessionHandle::new(
                Box::new(FakeBrowser {
                    behavior: self.behavior.clone(),
                }),
                None,
            );
            self.seen.lock().unwrap().insert(handle.id);
            self.acquired.fetch_add(1, Ordering::SeqCst);
            self.active.fetch_add(1, Ordering::SeqCst);
            Ok(handle)
        }
        .boxed()
    }

    fn release(&self, handle: SessionHandle) -> BoxFuture<'_, ()> {
        async move {
            handle.close().await;
            self.released.fetch_add(1, Ordering::SeqCst);
            self.active.fetch_sub(1, Ordering::SeqCst);
        }
        .boxed()
    }

    fn active_sessions(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    fn max_sessions(&self) -> usize {
        self.max
    }
}

pub struct FailingExecutor;

impl ScanExecutor for FailingExecutor {
    fn run<'a>(
        &'a self,
        _session: &'a SessionHandle,
        url: &'a Url,
    ) -> BoxFuture<'a, Result<RawScanResult, AuditError>> {
        async move {
            Err(AuditError::scan_failed(
                url.as_str(),
                "axe-core could not be injected into a cross-origin frame",
            ))
        }
        .boxed()
    }
}

pub struct PanickingExecutor;

impl ScanExecutor for PanickingExecutor {
    fn run<'a>(
        &'a self,
        _session: &'a SessionHandle,
        _url: &'a Url,
    ) -> BoxFuture<'a, Result<RawScanResult, AuditError>> {
        async move { panic!("engine exploded") }.boxed()
    }
}

/// Returns a fixed raw result after an optional delay.
pub struct StaticExecutor {
    pub raw: RawScanResult,
    pub delay: Duration,
}

impl ScanExecutor for StaticExecutor {
    fn run<'a>(
        &'a self,
        _session: &'a SessionHandle,
        _url: &'a Url,
    ) -> BoxFuture<'a, Result<RawScanResult, AuditError>> {
        async move {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            Ok(self.raw.clone())
        }
        .boxed()
    }
}

pub fn axe_executor(navigation_timeout: Duration) -> AxeExecutor {
    AxeExecutor::new(
        Some("window.axe = window.axe || {};".to_string()),
        navigation_timeout,
        Duration::from_secs(5),
    )
}

pub fn pipeline(
    sessions: &Arc<FakeSessions>,
    executor: impl ScanExecutor + 'static,
) -> AuditPipeline {
    AuditPipeline::new(sessions.clone(), Arc::new(executor))
}

pub fn rule(id: &str, tags: &[&str]) -> serde_json::Value {
    json!({
        "id": id,
        "impact": "moderate",
        "description": format!("{} rule", id),
        "helpUrl": format!("https://dequeuniversity.com/rules/axe/4.10/{}", id),
        "tags": tags,
        "nodes": [{"html": "<div></div>", "target": ["div"], "failureSummary": "Fix this"}]
    })
}

/// Raw axe-style results with the given bucket sizes.
pub fn axe_results(
    violations: usize,
    passes: usize,
    incomplete: usize,
    inapplicable: usize,
) -> serde_json::Value {
    let bucket = |prefix: &str, n: usize| -> Vec<serde_json::Value> {
        let category = format!("cat.{}", prefix);
        (0..n)
            .map(|i| rule(&format!("{}-{}", prefix, i), &["wcag2a", category.as_str()]))
            .collect()
    };
    json!({
        "testEngine": {"name": "axe-core", "version": "4.10.2"},
        "violations": bucket("violation", violations),
        "passes": bucket("pass", passes),
        "incomplete": bucket("incomplete", incomplete),
        "inapplicable": bucket("inapplicable", inapplicable),
    })
}

pub fn raw_results(
    violations: usize,
    passes: usize,
    incomplete: usize,
    inapplicable: usize,
) -> RawScanResult {
    serde_json::from_value(axe_results(violations, passes, incomplete, inapplicable)).unwrap()
}
