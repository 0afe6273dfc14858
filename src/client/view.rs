//! Typed view-models, one per rendering boundary.

use serde::Serialize;

use super::knowledge::{KnowledgeBase, Remediation, Resource};
use super::navigator::{DetailNavigator, DetailPage};
use crate::config::NO_DATA_AVAILABLE;
use crate::model::{AuditReport, Category, ResultItem};
use crate::score::{score_report, Score};

/// One row in the result list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultCardView {
    pub id: String,
    pub impact: String,
    pub description: String,
    pub tags: Vec<String>,
    pub node_count: usize,
}

impl From<&ResultItem> for ResultCardView {
    fn from(item: &ResultItem) -> Self {
        Self {
            id: item.id.clone(),
            impact: item
                .impact
                .map(|i| i.as_str().to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            description: item.description.clone(),
            tags: item.tags.clone(),
            node_count: item.nodes.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: Category,
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryView {
    pub counts: Vec<CategoryCount>,
    pub score: Score,
}

impl SummaryView {
    pub fn from_report(report: &AuditReport) -> Self {
        let counts = Category::ALL
            .iter()
            .map(|c| CategoryCount {
                category: *c,
                label: c.label(),
                count: report.items(*c).len(),
            })
            .collect();
        Self {
            counts,
            score: score_report(report),
        }
    }

    pub fn count(&self, category: Category) -> usize {
        self.counts
            .iter()
            .find(|c| c.category == category)
            .map_or(0, |c| c.count)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub html: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum DetailPageView {
    Impact {
        id: String,
        impact: String,
        description: String,
        issue_explanation: String,
        impact_description: String,
    },
    Analysis {
        id: String,
        technical_analysis: String,
        nodes: Vec<NodeView>,
    },
    Fixes {
        id: String,
        fixes: Vec<String>,
        best_practices: Vec<String>,
        code_before: String,
        code_after: String,
        resources: Vec<Resource>,
    },
}

fn or_placeholder(text: Option<&String>) -> String {
    match text {
        Some(t) if !t.trim().is_empty() => t.clone(),
        _ => NO_DATA_AVAILABLE.to_string(),
    }
}

fn list_or_placeholder(items: Option<&Vec<String>>) -> Vec<String> {
    match items {
        Some(list) if !list.is_empty() => list.clone(),
        _ => vec![NO_DATA_AVAILABLE.to_string()],
    }
}

/// Build the view for `page` of `item`. `record` may be absent; every
/// field then renders as a placeholder.
pub fn detail_page(
    item: &ResultItem,
    record: Option<&Remediation>,
    page: DetailPage,
) -> DetailPageView {
    let id = item.id.clone();
    match page {
        DetailPage::Impact => DetailPageView::Impact {
            id,
            impact: ResultCardView::from(item).impact,
            description: item.description.clone(),
            issue_explanation: or_placeholder(
                record.and_then(|r| r.issue_explanation.as_ref()),
            ),
            impact_description: or_placeholder(
                record.and_then(|r| r.impact.description.as_ref()),
            ),
        },
        DetailPage::Analysis => DetailPageView::Analysis {
            id,
            technical_analysis: or_placeholder(
                record.and_then(|r| r.technical_analysis.as_ref()),
            ),
            nodes: item
                .nodes
                .iter()
                .map(|n| NodeView {
                    html: n.html.clone(),
                    target: n.target.join(", "),
                })
                .collect(),
        },
        DetailPage::Fixes => DetailPageView::Fixes {
            id,
            fixes: list_or_placeholder(record.map(|r| &r.fixes)),
            best_practices: list_or_placeholder(record.map(|r| &r.best_practices)),
            code_before: or_placeholder(record.and_then(|r| r.code_examples.before.as_ref())),
            code_after: or_placeholder(record.and_then(|r| r.code_examples.after.as_ref())),
            resources: record.map(|r| r.resources.clone()).unwrap_or_default(),
        },
    }
}

/// The page currently shown by `nav`, enriched from `kb`.
pub fn current_detail(nav: &DetailNavigator, kb: &dyn KnowledgeBase) -> Option<DetailPageView> {
    let item = nav.selected()?;
    Some(detail_page(item, kb.lookup(&item.id), nav.page()))
}
