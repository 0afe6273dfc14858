use a11y_audit::config::*;
use a11y_audit::model::Category;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn test_default_ports() {
    assert_eq!(DEFAULT_AUDIT_PORT, 9890);
    assert_eq!(DEFAULT_SERVER_URL, "http://127.0.0.1:9890");
}

#[test]
fn test_client_constants() {
    assert_eq!(AUDIT_URL_KEY, "auditUrl");
    assert_eq!(ALL_TAGS, "all");
    assert_eq!(NO_DATA_AVAILABLE, "No data available");
}

#[test]
fn test_config_from_default_args() {
    let config = AuditConfig::from_args(ServeArgs::default());

    assert_eq!(config.port, DEFAULT_AUDIT_PORT);
    assert_eq!(config.max_sessions, DEFAULT_MAX_SESSIONS);
    assert_eq!(config.navigation_timeout, Duration::from_secs(NAVIGATION_TIMEOUT_SECS));
    assert_eq!(config.scan_timeout, Duration::from_secs(SCAN_TIMEOUT_SECS));
    assert_eq!(config.acquire_timeout, Duration::from_secs(ACQUIRE_TIMEOUT_SECS));
    assert!(config.axe_script.is_none());
    assert_eq!(config.listen_addr(), "0.0.0.0:9890");
}

#[test]
fn test_zero_sessions_clamped_to_one() {
    let config = AuditConfig::from_args(ServeArgs {
        max_sessions: 0,
        ..ServeArgs::default()
    });
    assert_eq!(config.max_sessions, 1);
}

#[test]
fn test_no_subcommand_means_serve() {
    let args = CliArgs::try_parse_from(["a11y-audit"]).unwrap();
    assert!(args.command.is_none());
    assert!(args.log_file.is_none());
}

#[test]
fn test_parse_serve_flags() {
    let args = CliArgs::try_parse_from([
        "a11y-audit",
        "serve",
        "--port",
        "9999",
        "--max-sessions",
        "2",
        "--axe-script",
        "/opt/axe/axe.min.js",
        "--log-file",
        "/tmp/audit.log",
    ])
    .unwrap();

    assert_eq!(args.log_file, Some(PathBuf::from("/tmp/audit.log")));
    match args.command {
        Some(Command::Serve(serve)) => {
            assert_eq!(serve.port, 9999);
            assert_eq!(serve.max_sessions, 2);
            assert_eq!(serve.axe_script, Some(PathBuf::from("/opt/axe/axe.min.js")));
            assert_eq!(serve.scan_timeout_secs, SCAN_TIMEOUT_SECS);
        }
        other => panic!("expected serve, got {:?}", other),
    }
}

#[test]
fn test_parse_report_flags() {
    let args = CliArgs::try_parse_from([
        "a11y-audit",
        "report",
        "https://example.com",
        "--category",
        "passes",
        "--tag",
        "wcag2a",
    ])
    .unwrap();

    match args.command {
        Some(Command::Report(report)) => {
            assert_eq!(report.url.as_deref(), Some("https://example.com"));
            assert_eq!(report.category, Category::Passes);
            assert_eq!(report.tag.as_deref(), Some("wcag2a"));
            assert_eq!(report.server, DEFAULT_SERVER_URL);
        }
        other => panic!("expected report, got {:?}", other),
    }
}

#[test]
fn test_report_url_is_optional() {
    let args = CliArgs::try_parse_from(["a11y-audit", "report"]).unwrap();
    match args.command {
        Some(Command::Report(report)) => {
            assert!(report.url.is_none());
            assert_eq!(report.category, Category::Violations);
        }
        other => panic!("expected report, got {:?}", other),
    }
}

#[test]
fn test_browser_request_timeout_follows_longest_step() {
    let mut config = AuditConfig::from_args(ServeArgs::default());
    let margin = Duration::from_secs(BROWSER_REQUEST_MARGIN_SECS);
    assert_eq!(config.browser_request_timeout(), config.scan_timeout + margin);

    config.navigation_timeout = Duration::from_secs(120);
    assert_eq!(config.browser_request_timeout(), Duration::from_secs(120) + margin);
}

#[test]
fn test_describe_reports_effective_settings() {
    let config = AuditConfig::from_args(ServeArgs {
        max_sessions: 0,
        scan_timeout_secs: 45,
        ..ServeArgs::default()
    });
    let summary = config.describe();
    assert!(summary.contains("Max concurrent sessions: 1;"), "{}", summary);
    assert!(summary.contains("scan=45s"), "{}", summary);
}
