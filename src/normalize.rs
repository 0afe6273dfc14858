//! Maps raw scanning-engine output onto the public [`AuditReport`] schema.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::model::{AuditReport, Impact, NodeRef, ResultItem};
use crate::scan::RawScanResult;

/// Separator used when a node target crosses frame or shadow-DOM boundaries.
pub const NESTED_TARGET_SEPARATOR: &str = " >>> ";

#[derive(Debug, Clone, Default)]
pub struct NormalizeOutcome {
    pub report: AuditReport,
    /// Items excluded because they failed validation.
    pub dropped: usize,
}

#[derive(Deserialize)]
struct RawRuleResult {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    impact: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    help: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    nodes: Vec<RawNode>,
}

#[derive(Deserialize)]
struct RawNode {
    #[serde(default)]
    html: Option<String>,
    #[serde(default)]
    target: Vec<serde_json::Value>,
}

pub fn normalize(raw: RawScanResult) -> NormalizeOutcome {
    let mut dropped = 0;

    let violations = normalize_bucket("violations", raw.violations, &mut dropped);
    let passes = normalize_bucket("passes", raw.passes, &mut dropped);
    let incomplete = normalize_bucket("incomplete", raw.incomplete, &mut dropped);
    let inapplicable = normalize_bucket("inapplicable", raw.inapplicable, &mut dropped);

    let tests_run = match raw.tests_run {
        Some(items) => normalize_bucket("testsRun", items, &mut dropped),
        None => violations
            .iter()
            .chain(&passes)
            .chain(&incomplete)
            .chain(&inapplicable)
            .cloned()
            .collect(),
    };

    if dropped > 0 {
        warn!("Normalization dropped {} malformed result item(s)", dropped);
    }

    NormalizeOutcome {
        report: AuditReport {
            violations,
            passes,
            incomplete,
            inapplicable,
            tests_run,
        },
        dropped,
    }
}

fn normalize_bucket(
    bucket: &str,
    items: Vec<serde_json::Value>,
    dropped: &mut usize,
) -> Vec<ResultItem> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match normalize_item(value) {
            Ok(item) => Some(item),
            Err(reason) => {
                warn!(bucket, index, "Dropped result item: {}", reason);
                *dropped += 1;
                None
            }
        })
        .collect()
}

fn normalize_item(value: serde_json::Value) -> Result<ResultItem, String> {
    let raw: RawRuleResult =
        serde_json::from_value(value).map_err(|e| format!("invalid shape: {}", e))?;

    let id = match raw.id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => return Err("missing id".to_string()),
    };

    let impact = raw.impact.as_deref().and_then(|text| {
        let parsed = Impact::parse(text);
        if parsed.is_none() {
            debug!(rule = %id, "Unknown impact {:?} treated as none", text);
        }
        parsed
    });

    let description = raw.description.or(raw.help).unwrap_or_default();

    let tags = raw
        .tags
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    let nodes = raw
        .nodes
        .into_iter()
        .map(|node| NodeRef {
            html: node.html.unwrap_or_default(),
            target: node.target.iter().filter_map(flatten_target).collect(),
        })
        .collect();

    Ok(ResultItem {
        id,
        impact,
        description,
        tags,
        nodes,
    })
}

fn flatten_target(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(selector) => Some(selector.clone()),
        serde_json::Value::Array(parts) => {
            let parts: Vec<String> = parts.iter().filter_map(flatten_target).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(NESTED_TARGET_SEPARATOR))
            }
        }
        _ => None,
    }
}
