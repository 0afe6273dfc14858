/// Single read/write interface to the persisted audit target.
pub trait AuditUrlStore: Send + Sync {
    fn read(&self) -> Option<String>;
    fn write(&self, url: &str);
}

/// Audit target shared by every screen. Built once and passed explicitly to
/// whatever needs it.
pub struct AuditContext {
    store: Box<dyn AuditUrlStore>,
    current: Option<String>,
}

impl AuditContext {
    /// Load the last audited URL so a previous session can be resumed.
    pub fn load(store: Box<dyn AuditUrlStore>) -> Self {
        let current = store.read().filter(|url| !url.trim().is_empty());
        Self { store, current }
    }

    pub fn current_url(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Choose a new audit target. Persisted only when it changes.
    pub fn set_url(&mut self, url: &str) {
        let url = url.trim();
        if self.current.as_deref() == Some(url) {
            return;
        }
        self.store.write(url);
        self.current = Some(url.to_string());
    }
}
