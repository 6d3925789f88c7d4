use std::sync::Arc;

use async_trait::async_trait;

use crate::{ApiError, Page, QueryState};

/// Parameters of one list request, derived from a `QueryState`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub ordering: Option<String>,
    pub page: u32,
    pub page_size: u32,
    pub search: String,
}

impl PageRequest {
    pub fn from_query(query: &QueryState, page_size: u32) -> Self {
        Self {
            ordering: query.ordering().map(ToString::to_string),
            page: query.page(),
            page_size,
            search: query.search().to_owned(),
        }
    }
}

/// Anything a table controller can page through.
#[async_trait]
pub trait PageSource: Send + Sync + 'static {
    type Item: Send + Sync + 'static;

    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<Self::Item>, ApiError>;
}

#[async_trait]
impl<S> PageSource for Arc<S>
where
    S: PageSource + ?Sized,
{
    type Item = S::Item;

    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<Self::Item>, ApiError> {
        (**self).fetch_page(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Ordering;

    #[test]
    fn request_mirrors_query() {
        let query = QueryState::new(Some(Ordering::descending("name")))
            .with_search("ldap")
            .with_page(3);

        assert_eq!(
            PageRequest::from_query(&query, 20),
            PageRequest {
                ordering: Some("-name".to_owned()),
                page: 3,
                page_size: 20,
                search: "ldap".to_owned(),
            }
        );
    }

    #[test]
    fn same_query_same_request() {
        let query = QueryState::default().with_search("a");
        assert_eq!(
            PageRequest::from_query(&query, 10),
            PageRequest::from_query(&query.clone(), 10)
        );
    }
}
