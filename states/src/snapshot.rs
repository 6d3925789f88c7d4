use std::sync::Arc;

use crate::{ApiError, Page, QueryState};

/// Immutable view of a table controller, published to subscribers on every change.
#[derive(Debug)]
pub struct TableSnapshot<T> {
    pub(crate) query: QueryState,
    pub(crate) page: Option<Arc<Page<T>>>,
    pub(crate) page_query: Option<QueryState>,
    pub(crate) loading: bool,
    pub(crate) error: Option<ApiError>,
    pub(crate) applied_generation: u64,
}

impl<T> Clone for TableSnapshot<T> {
    fn clone(&self) -> Self {
        Self {
            query: self.query.clone(),
            page: self.page.clone(),
            page_query: self.page_query.clone(),
            loading: self.loading,
            error: self.error.clone(),
            applied_generation: self.applied_generation,
        }
    }
}

impl<T> TableSnapshot<T> {
    pub(crate) fn new(query: QueryState) -> Self {
        Self {
            query,
            page: None,
            page_query: None,
            loading: false,
            error: None,
            applied_generation: 0,
        }
    }

    /// The most recently requested query.
    pub fn query(&self) -> &QueryState {
        &self.query
    }

    /// The last successfully applied page.
    pub fn page(&self) -> Option<&Page<T>> {
        self.page.as_deref()
    }

    /// The query that produced `page()`.
    pub fn page_query(&self) -> Option<&QueryState> {
        self.page_query.as_ref()
    }

    /// Items of the last applied page, empty before the first fetch.
    pub fn items(&self) -> &[T] {
        self.page.as_deref().map_or(&[][..], Page::items)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Generation of the fetch that produced `page()`, 0 before the first.
    pub fn applied_generation(&self) -> u64 {
        self.applied_generation
    }
}
