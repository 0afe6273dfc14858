pub mod axe;

use futures::future::BoxFuture;
use serde::Deserialize;
use url::Url;

use crate::browser::SessionHandle;
use crate::error::AuditError;

/// Raw engine output. Buckets stay untyped here; each item is validated on
/// its own by the normalizer so one bad entry cannot sink the whole scan.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawScanResult {
    #[serde(default)]
    pub violations: Vec<serde_json::Value>,
    #[serde(default)]
    pub passes: Vec<serde_json::Value>,
    #[serde(default)]
    pub incomplete: Vec<serde_json::Value>,
    #[serde(default)]
    pub inapplicable: Vec<serde_json::Value>,
    /// Only some engines report this bucket; derived when absent.
    #[serde(default)]
    pub tests_run: Option<Vec<serde_json::Value>>,
}

pub trait ScanExecutor: Send + Sync {
    /// Navigate the session to `url` and run the scanning engine against it.
    fn run<'a>(
        &'a self,
        session: &'a SessionHandle,
        url: &'a Url,
    ) -> BoxFuture<'a, Result<RawScanResult, AuditError>>;
}
