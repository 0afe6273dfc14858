use std::collections::HashSet;
use std::fmt;

use crate::config::ALL_TAGS;
use crate::model::ResultItem;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TagFilter {
    #[default]
    All,
    Tag(String),
}

impl TagFilter {
    /// `"all"` (or a blank string) selects everything; anything else is an
    /// exact tag.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw == ALL_TAGS {
            TagFilter::All
        } else {
            TagFilter::Tag(raw.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TagFilter::All => ALL_TAGS,
            TagFilter::Tag(tag) => tag,
        }
    }

    pub fn matches(&self, item: &ResultItem) -> bool {
        match self {
            TagFilter::All => true,
            TagFilter::Tag(tag) => item.has_tag(tag),
        }
    }
}

impl fmt::Display for TagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `"all"` followed by every distinct tag in `items`, in first-seen order.
pub fn available_tags(items: &[ResultItem]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut tags = vec![ALL_TAGS.to_string()];
    seen.insert(ALL_TAGS);

    for tag in items.iter().flat_map(|item| item.tags.iter()) {
        if seen.insert(tag.as_str()) {
            tags.push(tag.clone());
        }
    }
    tags
}

pub fn filter_items<'a>(items: &'a [ResultItem], filter: &TagFilter) -> Vec<&'a ResultItem> {
    items.iter().filter(|item| filter.matches(item)).collect()
}
