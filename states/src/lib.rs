//! Headless building blocks for paginated admin tables.
//!
//! - [`TableController`] owns query state (ordering, search, page), fetches pages from a
//!   [`PageSource`] and publishes immutable [`TableSnapshot`]s to subscribers.
//! - [`Modal`] hosts a [`ModalAction`] (create, edit, delete, ...) and enforces its
//!   open/submit/close lifecycle.
//! - [`ApiError`] is the error taxonomy shared by sources and actions.

mod controller;
mod error;
mod modal;
mod page;
mod query;
mod snapshot;
mod source;
pub mod task;

pub use controller::{
    DEFAULT_PAGE_SIZE, DEFAULT_SEARCH_DEBOUNCE, FetchOutcome, TableController, TableOptions,
};
pub use error::{ApiError, FieldErrors};
pub use modal::{Modal, ModalAction, ModalError, ModalState};
pub use page::{Page, total_pages};
pub use query::{DESCENDING_PREFIX, Ordering, QueryState};
pub use snapshot::TableSnapshot;
pub use source::{PageRequest, PageSource};
