use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::model::Category;

/// a11y-audit: runs accessibility audits in isolated headless browser sessions.
#[derive(Parser, Debug, Clone)]
#[command(name = "a11y-audit", version)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Log file (in addition to stderr)
    #[arg(short = 'l', long = "log-file", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the audit HTTP service (default)
    Serve(ServeArgs),
    /// Fetch an audit from a running service and print the report
    Report(ReportArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// HTTP port
    #[arg(long = "port", default_value_t = DEFAULT_AUDIT_PORT)]
    pub port: u16,

    /// Bind address
    #[arg(long = "bind", default_value = DEFAULT_BIND_ADDR)]
    pub bind: String,

    /// Chrome/Chromium executable (auto-detected when omitted)
    #[arg(long = "chrome")]
    pub chrome: Option<PathBuf>,

    /// Path to the axe-core bundle injected into each page
    #[arg(long = "axe-script")]
    pub axe_script: Option<PathBuf>,

    /// Maximum number of concurrent browser sessions
    #[arg(long = "max-sessions", default_value_t = DEFAULT_MAX_SESSIONS)]
    pub max_sessions: usize,

    /// Seconds to wait for the target page to load
    #[arg(long = "navigation-timeout-secs", default_value_t = NAVIGATION_TIMEOUT_SECS)]
    pub navigation_timeout_secs: u64,

    /// Seconds to wait for the scanning engine to finish
    #[arg(long = "scan-timeout-secs", default_value_t = SCAN_TIMEOUT_SECS)]
    pub scan_timeout_secs: u64,

    /// Seconds to wait for a free session slot before giving up
    #[arg(long = "acquire-timeout-secs", default_value_t = ACQUIRE_TIMEOUT_SECS)]
    pub acquire_timeout_secs: u64,
}

impl Default for ServeArgs {
    fn default() -> Self {
        Self {
            port: DEFAULT_AUDIT_PORT,
            bind: DEFAULT_BIND_ADDR.to_string(),
            chrome: None,
            axe_script: None,
            max_sessions: DEFAULT_MAX_SESSIONS,
            navigation_timeout_secs: NAVIGATION_TIMEOUT_SECS,
            scan_timeout_secs: SCAN_TIMEOUT_SECS,
            acquire_timeout_secs: ACQUIRE_TIMEOUT_SECS,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Page to audit (defaults to the last audited URL)
    pub url: Option<String>,

    /// Base URL of the audit service
    #[arg(long = "server", default_value = DEFAULT_SERVER_URL)]
    pub server: String,

    /// Category to list
    #[arg(long = "category", value_enum, default_value_t = Category::Violations)]
    pub category: Category,

    /// Only list items carrying this tag
    #[arg(long = "tag")]
    pub tag: Option<String>,

    /// Print the three detail pages for one rule id
    #[arg(long = "detail")]
    pub detail: Option<String>,

    /// JSON file with remediation records keyed by rule id
    #[arg(long = "knowledge-base")]
    pub knowledge_base: Option<PathBuf>,

    /// Settings file holding the last audited URL
    #[arg(long = "settings")]
    pub settings: Option<PathBuf>,
}

pub struct AuditConfig {
    pub port: u16,
    pub bind: String,
    pub chrome_executable: Option<PathBuf>,
    pub axe_script: Option<PathBuf>,
    pub max_sessions: usize,
    pub navigation_timeout: Duration,
    pub scan_timeout: Duration,
    pub acquire_timeout: Duration,
}

// Port constants
pub const DEFAULT_AUDIT_PORT: u16 = 9890;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:9890";

// Session constants
pub const DEFAULT_MAX_SESSIONS: usize = 4;
pub const ACQUIRE_TIMEOUT_SECS: u64 = 10;
pub const BROWSER_CLOSE_TIMEOUT_SECS: u64 = 5;
// Added on top of the longest audit step so CDP never times out first.
pub const BROWSER_REQUEST_MARGIN_SECS: u64 = 5;

// Scan constants
pub const NAVIGATION_TIMEOUT_SECS: u64 = 30;
pub const SCAN_TIMEOUT_SECS: u64 = 60;

// Client constants
pub const AUDIT_URL_KEY: &str = "auditUrl";
pub const ALL_TAGS: &str = "all";
pub const CLIENT_TIMEOUT_SECS: u64 = 120;
pub const AUDIT_FAILED_MESSAGE: &str = "Failed to audit this page. Please try again.";
pub const NO_DATA_AVAILABLE: &str = "No data available";

impl AuditConfig {
    pub fn from_args(args: ServeArgs) -> Self {
        AuditConfig {
            port: args.port,
            bind: args.bind,
            chrome_executable: args.chrome,
            axe_script: args.axe_script,
            max_sessions: args.max_sessions.max(1),
            navigation_timeout: Duration::from_secs(args.navigation_timeout_secs),
            scan_timeout: Duration::from_secs(args.scan_timeout_secs),
            acquire_timeout: Duration::from_secs(args.acquire_timeout_secs),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    /// One-line summary of the effective (clamped) settings for the startup log.
    pub fn describe(&self) -> String {
        format!(
            "Max concurrent sessions: {}; timeouts: navigation={}s scan={}s acquire={}s",
            self.max_sessions,
            self.navigation_timeout.as_secs(),
            self.scan_timeout.as_secs(),
            self.acquire_timeout.as_secs()
        )
    }

    /// Per-command CDP timeout. Must outlast both navigation and scanning so
    /// those are always bounded by their own configured timeouts.
    pub fn browser_request_timeout(&self) -> Duration {
        self.navigation_timeout.max(self.scan_timeout)
            + Duration::from_secs(BROWSER_REQUEST_MARGIN_SECS)
    }
}

/// Default settings location: `<config dir>/a11y-audit/settings.json`.
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("a11y-audit")
        .join("settings.json")
}
