use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::client::context::AuditUrlStore;

/// On-disk client settings. The last audited URL is the only durable state.
#[derive(Serialize, Deserialize, Default)]
pub struct PersistentSettings {
    #[serde(rename = "auditUrl", default, skip_serializing_if = "Option::is_none")]
    pub audit_url: Option<String>,
}

pub fn load_settings(path: &Path) -> PersistentSettings {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => PersistentSettings::default(),
    }
}

pub fn save_settings(path: &Path, settings: &PersistentSettings) {
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            warn!("Failed to create settings dir {:?}: {}", parent, e);
            return;
        }
    }
    match serde_json::to_string_pretty(settings) {
        Ok(json) => {
            if let Err(e) = std::fs::write(path, json) {
                warn!("Failed to save settings to {:?}: {}", path, e);
            }
        }
        Err(e) => {
            warn!("Failed to serialize settings: {}", e);
        }
    }
}

/// [`AuditUrlStore`] backed by a JSON settings file.
pub struct FileAuditUrlStore {
    path: PathBuf,
}

impl FileAuditUrlStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditUrlStore for FileAuditUrlStore {
    fn read(&self) -> Option<String> {
        load_settings(&self.path).audit_url
    }

    fn write(&self, url: &str) {
        let mut settings = load_settings(&self.path);
        settings.audit_url = Some(url.to_string());
        save_settings(&self.path, &settings);
    }
}
