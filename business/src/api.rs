//! Outposts REST client.
//!
//! [`OutpostsClient`] is the seam between the page and the network: the page,
//! its actions and the health widget only see the trait. [`OutpostsApi`] is the
//! `reqwest`-backed implementation, and [`OutpostSource`] adapts any client into
//! a [`PageSource`] for the table controller.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use outposts_states::{ApiError, Page, PageRequest, PageSource};
use serde::{Deserialize, Serialize};
use ustr::Ustr;

use crate::http::HttpClient;
use crate::{BusinessConfig, Outpost, OutpostHealth, OutpostRequest};

const OUTPOSTS_PATH: &str = "outposts/outposts/";

/// Pagination block of a list response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Next page number, 0 when there is none.
    #[serde(default)]
    pub next: u32,
    /// Previous page number, 0 when there is none.
    #[serde(default)]
    pub previous: u32,
    pub count: u64,
    pub current: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub start_index: u64,
    #[serde(default)]
    pub end_index: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub pagination: Pagination,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    /// Converts into a controller page, checking the page invariants.
    pub fn into_page(self, page_size: u32) -> Result<Page<T>, ApiError> {
        Page::new(
            self.results,
            self.pagination.count,
            page_size,
            self.pagination.current.max(1),
        )
    }
}

#[derive(Debug, Deserialize)]
struct TokenKey {
    key: String,
}

#[async_trait]
pub trait OutpostsClient: Send + Sync + 'static {
    async fn list(&self, params: &PageRequest) -> Result<Paginated<Outpost>, ApiError>;

    async fn retrieve(&self, pk: Ustr) -> Result<Outpost, ApiError>;

    async fn create(&self, body: &OutpostRequest) -> Result<Outpost, ApiError>;

    async fn update(&self, pk: Ustr, body: &OutpostRequest) -> Result<Outpost, ApiError>;

    async fn delete(&self, pk: Ustr) -> Result<(), ApiError>;

    /// Health reports of every running instance of the outpost.
    async fn health(&self, pk: Ustr) -> Result<Vec<OutpostHealth>, ApiError>;

    /// Secret key of an API token, by token identifier.
    async fn view_token_key(&self, identifier: &str) -> Result<String, ApiError>;
}

#[async_trait]
impl<C> OutpostsClient for Arc<C>
where
    C: OutpostsClient + ?Sized,
{
    async fn list(&self, params: &PageRequest) -> Result<Paginated<Outpost>, ApiError> {
        (**self).list(params).await
    }

    async fn retrieve(&self, pk: Ustr) -> Result<Outpost, ApiError> {
        (**self).retrieve(pk).await
    }

    async fn create(&self, body: &OutpostRequest) -> Result<Outpost, ApiError> {
        (**self).create(body).await
    }

    async fn update(&self, pk: Ustr, body: &OutpostRequest) -> Result<Outpost, ApiError> {
        (**self).update(pk, body).await
    }

    async fn delete(&self, pk: Ustr) -> Result<(), ApiError> {
        (**self).delete(pk).await
    }

    async fn health(&self, pk: Ustr) -> Result<Vec<OutpostHealth>, ApiError> {
        (**self).health(pk).await
    }

    async fn view_token_key(&self, identifier: &str) -> Result<String, ApiError> {
        (**self).view_token_key(identifier).await
    }
}

/// HTTP implementation of [`OutpostsClient`].
#[derive(Debug, Clone)]
pub struct OutpostsApi {
    http: HttpClient,
}

impl OutpostsApi {
    pub fn new(config: &BusinessConfig) -> Result<Self, ApiError> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }
}

fn outpost_path(pk: Ustr) -> String {
    format!("{OUTPOSTS_PATH}{pk}/")
}

#[async_trait]
impl OutpostsClient for OutpostsApi {
    async fn list(&self, params: &PageRequest) -> Result<Paginated<Outpost>, ApiError> {
        debug!(
            "Listing outposts: page={} page_size={} ordering={:?} search={:?}",
            params.page, params.page_size, params.ordering, params.search
        );
        self.http
            .get(OUTPOSTS_PATH)
            .query("ordering", params.ordering.as_deref().unwrap_or_default())
            .query("page", params.page)
            .query("page_size", params.page_size)
            .query("search", &params.search)
            .send_checked()
            .await?
            .json()
    }

    async fn retrieve(&self, pk: Ustr) -> Result<Outpost, ApiError> {
        self.http
            .get(&outpost_path(pk))
            .send_checked()
            .await?
            .json()
    }

    async fn create(&self, body: &OutpostRequest) -> Result<Outpost, ApiError> {
        let created: Outpost = self
            .http
            .post(OUTPOSTS_PATH)
            .json(body)?
            .send_checked()
            .await?
            .json()?;
        info!("Created outpost {} ({})", created.name, created.pk);
        Ok(created)
    }

    async fn update(&self, pk: Ustr, body: &OutpostRequest) -> Result<Outpost, ApiError> {
        let updated: Outpost = self
            .http
            .put(&outpost_path(pk))
            .json(body)?
            .send_checked()
            .await?
            .json()?;
        info!("Updated outpost {} ({pk})", updated.name);
        Ok(updated)
    }

    async fn delete(&self, pk: Ustr) -> Result<(), ApiError> {
        self.http.delete(&outpost_path(pk)).send_checked().await?;
        info!("Deleted outpost {pk}");
        Ok(())
    }

    async fn health(&self, pk: Ustr) -> Result<Vec<OutpostHealth>, ApiError> {
        self.http
            .get(&format!("{OUTPOSTS_PATH}{pk}/health/"))
            .send_checked()
            .await?
            .json()
    }

    async fn view_token_key(&self, identifier: &str) -> Result<String, ApiError> {
        let token: TokenKey = self
            .http
            .get(&format!("core/tokens/{identifier}/view_key/"))
            .send_checked()
            .await?
            .json()?;
        Ok(token.key)
    }
}

/// Pages of outposts for a `TableController`.
#[derive(Debug, Clone)]
pub struct OutpostSource<C> {
    client: C,
}

impl<C: OutpostsClient> OutpostSource<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }
}

#[async_trait]
impl<C: OutpostsClient> PageSource for OutpostSource<C> {
    type Item = Outpost;

    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<Outpost>, ApiError> {
        self.client
            .list(request)
            .await?
            .into_page(request.page_size)
    }
}
