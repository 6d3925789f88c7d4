//! Outposts domain on top of `outposts-states`.
//!
//! - [`OutpostsApi`] talks to the REST API; everything else goes through the
//!   [`OutpostsClient`] trait.
//! - [`project_row`] maps an [`Outpost`] to table cells.
//! - [`CreateOutpost`], [`EditOutpost`], [`DeleteOutpost`] and [`DeploymentInfo`]
//!   are the page's modal actions.
//! - [`HealthWidget`] polls one outpost's health in the background.
//! - [`OutpostListPage`] ties the table controller and the modals together.

mod actions;
mod api;
mod config;
mod health;
pub mod http;
mod outpost;
mod page;
mod row;
mod test_utils;

pub use actions::{
    CreateOutpost, DEPLOYMENT_DOCS_URL, DeleteOutcome, DeleteOutpost, DeploymentDetails,
    DeploymentInfo, EditOutpost,
};
pub use api::{OutpostSource, OutpostsApi, OutpostsClient, Paginated, Pagination};
pub use config::{
    BusinessConfig, DEFAULT_BASE_URL, DEFAULT_HEALTH_INTERVAL, DEFAULT_REQUEST_TIMEOUT, ENV_PREFIX,
};
pub use health::{HealthKey, HealthStatus, HealthWidget, check_health};
pub use outpost::{Outpost, OutpostHealth, OutpostRequest, OutpostType, ProviderRef};
pub use page::{OUTPOSTS_PAGE, OutpostListPage, PageMeta, RowModal};
pub use row::{COLUMNS, Cell, Column, LinkRef, RowAction, project_row, provider_link};
