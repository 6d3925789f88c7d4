//! Query state for paginated tables.
//!
//! `QueryState` is an immutable value: every user action builds a new one and the
//! controller swaps it in wholesale. The same query always produces the same request.

use std::fmt::{Display, Formatter};

/// Prefix marking a descending ordering key, e.g. `-name`.
pub const DESCENDING_PREFIX: char = '-';

/// Sort column plus direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ordering {
    column: String,
    descending: bool,
}

impl Ordering {
    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
        }
    }

    pub fn descending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }

    /// Parses `name` / `-name`. Returns `None` for an empty key.
    pub fn parse(key: &str) -> Option<Self> {
        let key = key.trim();
        let (column, descending) = match key.strip_prefix(DESCENDING_PREFIX) {
            Some(rest) => (rest, true),
            None => (key, false),
        };
        if column.is_empty() {
            return None;
        }
        Some(Self {
            column: column.to_owned(),
            descending,
        })
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn is_descending(&self) -> bool {
        self.descending
    }

    /// Ordering after the user selects `column`.
    ///
    /// Reselecting the current column flips direction; a different column starts ascending.
    pub fn select(current: Option<&Self>, column: &str) -> Self {
        match current {
            Some(current) if current.column == column => Self {
                column: current.column.clone(),
                descending: !current.descending,
            },
            _ => Self::ascending(column),
        }
    }

    /// The wire form used as the `ordering` query parameter.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl Display for Ordering {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.descending {
            write!(f, "{DESCENDING_PREFIX}{}", self.column)
        } else {
            f.write_str(&self.column)
        }
    }
}

/// Everything that determines the next page request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryState {
    ordering: Option<Ordering>,
    search: String,
    page: u32,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            ordering: None,
            search: String::new(),
            page: 1,
        }
    }
}

impl QueryState {
    pub fn new(ordering: Option<Ordering>) -> Self {
        Self {
            ordering,
            ..Self::default()
        }
    }

    pub fn ordering(&self) -> Option<&Ordering> {
        self.ordering.as_ref()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// New query sorted by `column`; sorting invalidates the page position.
    #[must_use]
    pub fn with_ordering_toggled(&self, column: &str) -> Self {
        Self {
            ordering: Some(Ordering::select(self.ordering.as_ref(), column)),
            search: self.search.clone(),
            page: 1,
        }
    }

    /// New query filtered by `term`, back on page 1.
    #[must_use]
    pub fn with_search(&self, term: impl Into<String>) -> Self {
        Self {
            ordering: self.ordering.clone(),
            search: term.into(),
            page: 1,
        }
    }

    /// New query on page `page` (clamped to at least 1).
    #[must_use]
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            ordering: self.ordering.clone(),
            search: self.search.clone(),
            page: page.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_round_trips_through_key() {
        assert_eq!(Ordering::parse("name"), Some(Ordering::ascending("name")));
        assert_eq!(Ordering::parse("-name"), Some(Ordering::descending("name")));
        assert_eq!(Ordering::descending("name").key(), "-name");
        assert_eq!(Ordering::parse("-"), None);
        assert_eq!(Ordering::parse(""), None);
    }

    #[test]
    fn selecting_same_column_toggles() {
        let query = QueryState::default();
        let first = query.with_ordering_toggled("name");
        assert_eq!(first.ordering().map(Ordering::key).as_deref(), Some("name"));

        let second = first.with_ordering_toggled("name");
        assert_eq!(second.ordering().map(Ordering::key).as_deref(), Some("-name"));

        let third = second.with_ordering_toggled("name");
        assert_eq!(third.ordering().map(Ordering::key).as_deref(), Some("name"));
    }

    #[test]
    fn selecting_new_column_starts_ascending() {
        let query = QueryState::new(Some(Ordering::descending("name")));
        let next = query.with_ordering_toggled("type");
        assert_eq!(next.ordering(), Some(&Ordering::ascending("type")));
    }

    #[test]
    fn ordering_and_search_reset_page() {
        let query = QueryState::default().with_page(4);
        assert_eq!(query.page(), 4);
        assert_eq!(query.with_ordering_toggled("name").page(), 1);
        assert_eq!(query.with_search("proxy").page(), 1);
        assert_eq!(query.with_search("proxy").search(), "proxy");
    }

    #[test]
    fn page_zero_is_clamped() {
        assert_eq!(QueryState::default().with_page(0).page(), 1);
    }
}
