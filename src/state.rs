use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::audit::AuditPipeline;
use crate::browser::SessionManager;
use crate::config::AuditConfig;
use crate::scan::ScanExecutor;

pub type SharedState = Arc<AppState>;

/// Process-wide state. Holds no per-audit data: each request gets its own
/// session from the shared allocator and nothing else is shared.
pub struct AppState {
    pub config: AuditConfig,
    pub pipeline: AuditPipeline,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        config: AuditConfig,
        sessions: Arc<dyn SessionManager>,
        executor: Arc<dyn ScanExecutor>,
    ) -> Self {
        Self {
            config,
            pipeline: AuditPipeline::new(sessions, executor),
            started_at: Utc::now(),
        }
    }

    pub fn sessions(&self) -> &Arc<dyn SessionManager> {
        self.pipeline.sessions()
    }
}
