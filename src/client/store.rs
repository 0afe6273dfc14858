use tracing::{debug, warn};

use super::api::ClientError;
use super::tags::{available_tags, filter_items, TagFilter};
use super::view::SummaryView;
use crate::config::AUDIT_FAILED_MESSAGE;
use crate::model::{AuditReport, Category, ResultItem};
use crate::score::{score_report, Score};

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading { target: String },
    Ready { target: String, report: AuditReport },
    Failed { target: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub active_category: Category,
    pub active_tag: TagFilter,
}

/// Holds the last fetched report and the category/tag selection over it.
///
/// `Idle -> Loading -> Ready | Failed`. Selections only apply in `Ready`;
/// in any other state they are ignored and reported as such.
#[derive(Debug, Clone)]
pub struct ReportStore {
    state: LoadState,
    filter: FilterState,
    available_tags: Vec<String>,
}

impl Default for ReportStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportStore {
    pub fn new() -> Self {
        Self {
            state: LoadState::Idle,
            filter: FilterState::default(),
            available_tags: Vec::new(),
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, LoadState::Ready { .. })
    }

    /// Start a new audit. Any previous report is discarded.
    pub fn begin_loading(&mut self, target: &str) {
        self.state = LoadState::Loading {
            target: target.to_string(),
        };
        self.filter.active_tag = TagFilter::All;
        self.available_tags.clear();
    }

    /// Settle a pending load. Returns false (and changes nothing) when no
    /// load is pending.
    pub fn finish(&mut self, result: Result<AuditReport, ClientError>) -> bool {
        let target = match &self.state {
            LoadState::Loading { target } => target.clone(),
            other => {
                debug!("Ignoring audit result outside of Loading: {:?}", other);
                return false;
            }
        };

        match result {
            Ok(report) => {
                self.state = LoadState::Ready { target, report };
                self.filter.active_tag = TagFilter::All;
                self.recompute_tags();
            }
            Err(e) => {
                warn!("Audit of {} failed: {}", target, e);
                self.state = LoadState::Failed {
                    target,
                    reason: e.to_string(),
                };
                self.available_tags.clear();
            }
        }
        true
    }

    /// Switch the visible category. Always resets the tag filter to "all".
    pub fn select_category(&mut self, category: Category) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.filter.active_category = category;
        self.filter.active_tag = TagFilter::All;
        self.recompute_tags();
        true
    }

    pub fn select_tag(&mut self, tag: &str) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.filter.active_tag = TagFilter::parse(tag);
        true
    }

    pub fn report(&self) -> Option<&AuditReport> {
        match &self.state {
            LoadState::Ready { report, .. } => Some(report),
            _ => None,
        }
    }

    /// `"all"` plus the distinct tags of the active category.
    pub fn available_tags(&self) -> &[String] {
        &self.available_tags
    }

    pub fn visible_items(&self) -> Vec<&ResultItem> {
        match self.report() {
            Some(report) => filter_items(
                report.items(self.filter.active_category),
                &self.filter.active_tag,
            ),
            None => Vec::new(),
        }
    }

    /// Recomputed from the current report on every call.
    pub fn score(&self) -> Option<Score> {
        self.report().map(score_report)
    }

    pub fn summary(&self) -> Option<SummaryView> {
        self.report().map(SummaryView::from_report)
    }

    /// The single user-facing failure message. Internal error kinds are
    /// never shown.
    pub fn error_message(&self) -> Option<&'static str> {
        match self.state {
            LoadState::Failed { .. } => Some(AUDIT_FAILED_MESSAGE),
            _ => None,
        }
    }

    pub fn retry_target(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed { target, .. } => Some(target),
            _ => None,
        }
    }

    fn recompute_tags(&mut self) {
        self.available_tags = match self.report() {
            Some(report) => available_tags(report.items(self.filter.active_category)),
            None => Vec::new(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, tags: &[&str]) -> ResultItem {
        ResultItem {
            id: id.to_string(),
            impact: None,
            description: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            nodes: vec![],
        }
    }

    fn ready_store() -> ReportStore {
        let report = AuditReport {
            violations: vec![item("image-alt", &["wcag2a", "cat.text-alternatives"])],
            passes: vec![
                item("document-title", &["wcag2a", "cat.text-alternatives"]),
                item("html-has-lang", &["wcag2a", "cat.language"]),
            ],
            ..Default::default()
        };
        let mut store = ReportStore::new();
        store.begin_loading("https://example.com");
        assert!(store.finish(Ok(report)));
        store
    }

    #[test]
    fn test_starts_idle() {
        let store = ReportStore::new();
        assert_eq!(store.state(), &LoadState::Idle);
        assert!(store.visible_items().is_empty());
        assert!(store.score().is_none());
    }

    #[test]
    fn test_selection_ignored_unless_ready() {
        let mut store = ReportStore::new();
        assert!(!store.select_category(Category::Passes));
        assert!(!store.select_tag("wcag2a"));
        store.begin_loading("https://example.com");
        assert!(!store.select_category(Category::Passes));
        assert_eq!(store.filter(), &FilterState::default());
    }

    #[test]
    fn test_finish_without_pending_load_is_ignored() {
        let mut store = ReportStore::new();
        assert!(!store.finish(Ok(AuditReport::default())));
        assert_eq!(store.state(), &LoadState::Idle);
    }

    #[test]
    fn test_category_switch_resets_tag() {
        let mut store = ready_store();
        assert!(store.select_tag("cat.text-alternatives"));
        assert_eq!(
            store.filter().active_tag,
            TagFilter::Tag("cat.text-alternatives".into())
        );
        assert!(store.select_category(Category::Passes));
        assert_eq!(store.filter().active_tag, TagFilter::All);
        assert_eq!(store.visible_items().len(), 2);
    }

    #[test]
    fn test_tags_follow_active_category() {
        let mut store = ready_store();
        assert_eq!(store.available_tags(), ["all", "wcag2a", "cat.text-alternatives"]);
        store.select_category(Category::Passes);
        assert_eq!(
            store.available_tags(),
            ["all", "wcag2a", "cat.text-alternatives", "cat.language"]
        );
    }

    #[test]
    fn test_tag_filter_narrows_visible_items() {
        let mut store = ready_store();
        store.select_category(Category::Passes);
        store.select_tag("cat.language");
        let ids: Vec<&str> = store.visible_items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["html-has-lang"]);
        store.select_tag("all");
        assert_eq!(store.visible_items().len(), 2);
    }

    #[test]
    fn test_new_report_drops_stale_tags() {
        let mut store = ready_store();
        store.select_category(Category::Passes);
        store.select_tag("cat.language");

        store.begin_loading("https://other.example");
        assert!(store.available_tags().is_empty());
        store.finish(Ok(AuditReport {
            passes: vec![item("region", &["best-practice"])],
            ..Default::default()
        }));

        assert_eq!(store.filter().active_tag, TagFilter::All);
        assert_eq!(store.available_tags(), ["all", "best-practice"]);
        assert!(!store.available_tags().iter().any(|t| t == "cat.language"));
    }

    #[test]
    fn test_failure_exposes_single_message_and_retry_target() {
        let mut store = ReportStore::new();
        store.begin_loading("https://down.example");
        store.finish(Err(ClientError::Server {
            status: 504,
            kind: "navigation_timeout".into(),
            message: "Navigation to https://down.example did not finish within 30s".into(),
        }));
        assert_eq!(store.error_message(), Some(AUDIT_FAILED_MESSAGE));
        assert_eq!(store.retry_target(), Some("https://down.example"));
        assert!(store.report().is_none());

        store.begin_loading("https://down.example");
        assert!(store.error_message().is_none());
    }

    #[test]
    fn test_score_recomputed_from_report() {
        let store = ready_store();
        // 2 passes, no testsRun supplied -> 0 applicable
        assert_eq!(store.score().unwrap().value(), 0.0);
    }
}
