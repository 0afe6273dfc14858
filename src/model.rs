//! Public report schema returned by `POST /audit`.
//!
//! Everything downstream of the normalizer only ever sees these types; the
//! scanning engine's own field names stop at `normalize`.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Impact {
    #[serde(rename = "N/A")]
    NotApplicable,
    #[serde(rename = "minor")]
    Minor,
    #[serde(rename = "moderate")]
    Moderate,
    #[serde(rename = "serious")]
    Serious,
    #[serde(rename = "critical")]
    Critical,
}

impl Impact {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "n/a" => Some(Impact::NotApplicable),
            "minor" => Some(Impact::Minor),
            "moderate" => Some(Impact::Moderate),
            "serious" => Some(Impact::Serious),
            "critical" => Some(Impact::Critical),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::NotApplicable => "N/A",
            Impact::Minor => "minor",
            Impact::Moderate => "moderate",
            Impact::Serious => "serious",
            Impact::Critical => "critical",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete DOM location found during the scan. Display-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRef {
    pub html: String,
    pub target: Vec<String>,
}

/// One rule-evaluation outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    pub id: String,
    pub impact: Option<Impact>,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub nodes: Vec<NodeRef>,
}

impl ResultItem {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub violations: Vec<ResultItem>,
    pub passes: Vec<ResultItem>,
    pub incomplete: Vec<ResultItem>,
    pub inapplicable: Vec<ResultItem>,
    pub tests_run: Vec<ResultItem>,
}

impl AuditReport {
    pub fn items(&self, category: Category) -> &[ResultItem] {
        match category {
            Category::Violations => &self.violations,
            Category::Passes => &self.passes,
            Category::Incomplete => &self.incomplete,
            Category::Inapplicable => &self.inapplicable,
            Category::TestsRun => &self.tests_run,
        }
    }

    pub fn total_items(&self) -> usize {
        Category::ALL.iter().map(|c| self.items(*c).len()).sum()
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    #[default]
    Violations,
    Passes,
    Incomplete,
    Inapplicable,
    TestsRun,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Violations,
        Category::Passes,
        Category::Incomplete,
        Category::Inapplicable,
        Category::TestsRun,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Violations => "Violations",
            Category::Passes => "Passes",
            Category::Incomplete => "Incomplete",
            Category::Inapplicable => "Inapplicable",
            Category::TestsRun => "Tests run",
        }
    }
}
