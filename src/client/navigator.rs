use crate::model::ResultItem;

/// The three detail pages, in reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum DetailPage {
    /// Impact and description
    #[default]
    Impact,
    /// Technical analysis
    Analysis,
    /// Fixes and examples
    Fixes,
}

impl DetailPage {
    pub fn number(&self) -> u8 {
        match self {
            DetailPage::Impact => 1,
            DetailPage::Analysis => 2,
            DetailPage::Fixes => 3,
        }
    }

    pub fn next(&self) -> Option<Self> {
        match self {
            DetailPage::Impact => Some(DetailPage::Analysis),
            DetailPage::Analysis => Some(DetailPage::Fixes),
            DetailPage::Fixes => None,
        }
    }

    pub fn prev(&self) -> Option<Self> {
        match self {
            DetailPage::Impact => None,
            DetailPage::Analysis => Some(DetailPage::Impact),
            DetailPage::Fixes => Some(DetailPage::Analysis),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Other,
}

/// Where keyboard focus was when a key arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    TextInput,
    Elsewhere,
}

/// Side effects the renderer must carry out after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEffect {
    /// Move focus to the detail content region.
    FocusContent,
    Closed,
}

/// Three-page detail view for one selected result item.
///
/// Opening always lands on page 1 and closing forgets everything, so no
/// state carries over between items.
#[derive(Debug, Clone, Default)]
pub struct DetailNavigator {
    selected: Option<ResultItem>,
    page: DetailPage,
}

impl DetailNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&ResultItem> {
        self.selected.as_ref()
    }

    pub fn page(&self) -> DetailPage {
        self.page
    }

    pub fn is_open(&self) -> bool {
        self.selected.is_some()
    }

    pub fn open(&mut self, item: ResultItem) -> NavEffect {
        self.selected = Some(item);
        self.page = DetailPage::Impact;
        NavEffect::FocusContent
    }

    /// Advance one page. No-op on the last page or when closed.
    pub fn next(&mut self) -> Option<NavEffect> {
        if !self.is_open() {
            return None;
        }
        let next = self.page.next()?;
        self.page = next;
        Some(NavEffect::FocusContent)
    }

    /// Go back one page. No-op on the first page or when closed.
    pub fn prev(&mut self) -> Option<NavEffect> {
        if !self.is_open() {
            return None;
        }
        let prev = self.page.prev()?;
        self.page = prev;
        Some(NavEffect::FocusContent)
    }

    pub fn close(&mut self) -> Option<NavEffect> {
        let was_open = self.selected.take().is_some();
        self.page = DetailPage::Impact;
        was_open.then_some(NavEffect::Closed)
    }

    /// Arrow keys page through the detail view unless the user is typing.
    pub fn handle_key(&mut self, key: Key, focus: FocusTarget) -> Option<NavEffect> {
        if focus == FocusTarget::TextInput {
            return None;
        }
        match key {
            Key::ArrowRight => self.next(),
            Key::ArrowLeft => self.prev(),
            Key::Other => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str) -> ResultItem {
        ResultItem {
            id: id.to_string(),
            impact: None,
            description: String::new(),
            tags: vec![],
            nodes: vec![],
        }
    }

    #[test]
    fn test_open_starts_on_first_page() {
        let mut nav = DetailNavigator::new();
        assert_eq!(nav.open(item("image-alt")), NavEffect::FocusContent);
        assert_eq!(nav.page(), DetailPage::Impact);
        assert_eq!(nav.selected().unwrap().id, "image-alt");
    }

    #[test]
    fn test_forward_and_back_without_skipping() {
        let mut nav = DetailNavigator::new();
        nav.open(item("a"));
        assert_eq!(nav.next(), Some(NavEffect::FocusContent));
        assert_eq!(nav.page(), DetailPage::Analysis);
        assert_eq!(nav.next(), Some(NavEffect::FocusContent));
        assert_eq!(nav.page(), DetailPage::Fixes);
        assert_eq!(nav.next(), None);
        assert_eq!(nav.page(), DetailPage::Fixes);
        nav.prev();
        nav.prev();
        assert_eq!(nav.prev(), None);
        assert_eq!(nav.page(), DetailPage::Impact);
    }

    #[test]
    fn test_arrow_keys_stay_in_range() {
        let mut nav = DetailNavigator::new();
        nav.open(item("a"));
        let keys = [
            Key::ArrowLeft,
            Key::ArrowRight,
            Key::ArrowRight,
            Key::ArrowRight,
            Key::ArrowRight,
            Key::ArrowLeft,
            Key::Other,
            Key::ArrowLeft,
            Key::ArrowLeft,
            Key::ArrowLeft,
        ];
        for key in keys {
            nav.handle_key(key, FocusTarget::Elsewhere);
            assert!((1..=3).contains(&nav.page().number()));
        }
        assert_eq!(nav.page(), DetailPage::Impact);
    }

    #[test]
    fn test_keys_ignored_while_typing() {
        let mut nav = DetailNavigator::new();
        nav.open(item("a"));
        assert_eq!(nav.handle_key(Key::ArrowRight, FocusTarget::TextInput), None);
        assert_eq!(nav.page(), DetailPage::Impact);
    }

    #[test]
    fn test_close_resets_for_next_open() {
        let mut nav = DetailNavigator::new();
        nav.open(item("a"));
        nav.next();
        nav.next();
        assert_eq!(nav.close(), Some(NavEffect::Closed));
        assert!(nav.selected().is_none());
        assert_eq!(nav.page(), DetailPage::Impact);

        nav.open(item("b"));
        assert_eq!(nav.page(), DetailPage::Impact);
        assert_eq!(nav.selected().unwrap().id, "b");
    }

    #[test]
    fn test_transitions_when_closed_are_noops() {
        let mut nav = DetailNavigator::new();
        assert_eq!(nav.next(), None);
        assert_eq!(nav.prev(), None);
        assert_eq!(nav.close(), None);
        assert_eq!(nav.handle_key(Key::ArrowRight, FocusTarget::Elsewhere), None);
        assert_eq!(nav.page(), DetailPage::Impact);
    }

    #[test]
    fn test_page_numbers() {
        assert_eq!(DetailPage::Impact.number(), 1);
        assert_eq!(DetailPage::Analysis.number(), 2);
        assert_eq!(DetailPage::Fixes.number(), 3);
    }
}
