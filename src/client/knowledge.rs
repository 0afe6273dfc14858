//! Remediation lookup keyed by rule id. The data itself is external; a
//! missing record or file only ever degrades to placeholders.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImpactNote {
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CodeExamples {
    #[serde(default)]
    pub before: Option<String>,
    #[serde(default)]
    pub after: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Remediation {
    #[serde(default)]
    pub issue_explanation: Option<String>,
    #[serde(default)]
    pub impact: ImpactNote,
    #[serde(default)]
    pub technical_analysis: Option<String>,
    #[serde(default)]
    pub best_practices: Vec<String>,
    #[serde(default)]
    pub fixes: Vec<String>,
    #[serde(default)]
    pub code_examples: CodeExamples,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

pub trait KnowledgeBase: Send + Sync {
    fn lookup(&self, rule_id: &str) -> Option<&Remediation>;
}

#[derive(Debug, Default)]
pub struct JsonKnowledgeBase {
    records: HashMap<String, Remediation>,
}

impl JsonKnowledgeBase {
    pub fn from_records(records: HashMap<String, Remediation>) -> Self {
        Self { records }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        Ok(Self::from_records(serde_json::from_str(json)?))
    }

    /// Load a `{ "<rule id>": { ... } }` file. Any failure yields an empty
    /// knowledge base.
    pub fn load_or_empty(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Knowledge base {:?} unreadable: {}", path, e);
                return Self::default();
            }
        };
        match Self::from_json(&content) {
            Ok(kb) => {
                info!("Loaded {} remediation records from {:?}", kb.len(), path);
                kb
            }
            Err(e) => {
                warn!("Knowledge base {:?} is not valid JSON: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl KnowledgeBase for JsonKnowledgeBase {
    fn lookup(&self, rule_id: &str) -> Option<&Remediation> {
        self.records.get(rule_id)
    }
}
