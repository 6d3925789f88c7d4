//! Paginated table controller.
//!
//! The controller owns the query state of one table and the last page it applied.
//! User actions (`set_ordering`, `set_search`, `go_to_page`, `refresh`) build a new
//! `QueryState`, issue a fetch ticket and request a page from the `PageSource`.
//!
//! Only the most recently issued ticket may apply its result. Older requests are
//! cancelled cooperatively; if one still completes, its page (or error) is dropped.
//! A failed fetch keeps the last applied page and sets the error flag instead; the
//! query rolls back to the one that produced that page.
//!
//! Every state change is published as a `TableSnapshot` to all subscribers.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, info, warn};

use crate::task::{TaskHandle, Tickets};
use crate::{ApiError, Ordering, PageRequest, PageSource, QueryState, TableSnapshot};

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Default quiet period before a search term is sent.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct TableOptions {
    pub page_size: u32,
    pub search_debounce: Duration,
    /// Ordering applied before the user picks a column.
    pub ordering: Option<Ordering>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            ordering: None,
        }
    }
}

/// What happened to a user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The fetched page replaced the previous one.
    Applied,
    /// A newer request was issued before this one finished; nothing was applied.
    Superseded,
    /// The fetch failed; the previous page is kept and the error is published.
    Failed(ApiError),
    /// The requested page lies outside `1..=total_pages`; nothing was requested.
    OutOfRange { requested: u32, total_pages: u32 },
}

impl FetchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

pub struct TableController<S: PageSource> {
    source: S,
    options: TableOptions,
    tickets: Tickets,
    state: Mutex<TableSnapshot<S::Item>>,
    subscribers: Mutex<Vec<flume::Sender<TableSnapshot<S::Item>>>>,
}

impl<S: PageSource> std::fmt::Debug for TableController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock_state();
        f.debug_struct("TableController")
            .field("options", &self.options)
            .field("query", state.query())
            .field("loading", &state.is_loading())
            .field("error", &state.error())
            .field("generation", &self.tickets.current())
            .finish_non_exhaustive()
    }
}

impl<S: PageSource> TableController<S> {
    pub fn new(source: S, options: TableOptions) -> Self {
        let query = QueryState::new(options.ordering.clone());
        Self {
            source,
            options: TableOptions {
                page_size: options.page_size.max(1),
                ..options
            },
            tickets: Tickets::default(),
            state: Mutex::new(TableSnapshot::new(query)),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Current snapshot; cheap, the page is shared.
    pub fn snapshot(&self) -> TableSnapshot<S::Item> {
        self.lock_state().clone()
    }

    pub fn query(&self) -> QueryState {
        self.lock_state().query().clone()
    }

    /// Subscribes to state changes. The current snapshot is delivered first.
    pub fn subscribe(&self) -> flume::Receiver<TableSnapshot<S::Item>> {
        let (tx, rx) = flume::unbounded();
        let current = self.snapshot();
        if tx.send(current).is_ok() {
            self.lock_subscribers().push(tx);
        }
        rx
    }

    /// Refetches the current query, e.g. after a mutation succeeded.
    pub async fn refresh(&self) -> FetchOutcome {
        let query = self.query();
        self.fetch(query).await
    }

    /// Sorts by `column`, toggling direction when it is already the sort column.
    pub async fn set_ordering(&self, column: &str) -> FetchOutcome {
        let query = self.query().with_ordering_toggled(column);
        debug!(
            "Ordering changed to {:?}",
            query.ordering().map(Ordering::key)
        );
        self.fetch(query).await
    }

    /// Filters by `term` after the debounce delay.
    ///
    /// Another `set_search` (or any other fetch) issued during the delay supersedes
    /// this one before a request is sent.
    pub async fn set_search(&self, term: impl Into<String>) -> FetchOutcome {
        let query = self.query().with_search(term);
        let ticket = self.begin(&query);

        if !self.options.search_debounce.is_zero() {
            let token = ticket.cancellation_token();
            tokio::select! {
                biased;
                () = token.cancelled() => {
                    debug!("Search {:?} superseded during debounce", query.search());
                    return FetchOutcome::Superseded;
                }
                () = tokio::time::sleep(self.options.search_debounce) => {}
            }
        }

        self.run(query, ticket).await
    }

    /// Moves to page `page` if it exists according to the last applied page.
    pub async fn go_to_page(&self, page: u32) -> FetchOutcome {
        let (query, total_pages) = {
            let state = self.lock_state();
            let total_pages = state.page().map_or(1, |p| p.total_pages());
            (state.query().clone(), total_pages)
        };

        if page < 1 || page > total_pages {
            warn!("Ignoring page {page}, table has {total_pages} page(s)");
            return FetchOutcome::OutOfRange {
                requested: page,
                total_pages,
            };
        }

        self.fetch(query.with_page(page)).await
    }

    pub async fn next_page(&self) -> FetchOutcome {
        let next = self.lock_state().query().page().saturating_add(1);
        self.go_to_page(next).await
    }

    pub async fn previous_page(&self) -> FetchOutcome {
        let previous = self.lock_state().query().page().saturating_sub(1);
        self.go_to_page(previous).await
    }

    async fn fetch(&self, query: QueryState) -> FetchOutcome {
        let ticket = self.begin(&query);
        self.run(query, ticket).await
    }

    /// Swaps in the new query, marks the table loading and issues the ticket.
    fn begin(&self, query: &QueryState) -> TaskHandle {
        let (ticket, snapshot) = {
            let mut state = self.lock_state();
            let ticket = self.tickets.issue();
            state.query = query.clone();
            state.loading = true;
            (ticket, state.clone())
        };
        self.publish(snapshot);
        ticket
    }

    async fn run(&self, query: QueryState, ticket: TaskHandle) -> FetchOutcome {
        let request = PageRequest::from_query(&query, self.options.page_size);
        let token = ticket.cancellation_token();

        let result = tokio::select! {
            biased;
            () = token.cancelled() => {
                debug!("Fetch #{} cancelled", ticket.id().generation());
                return FetchOutcome::Superseded;
            }
            result = self.source.fetch_page(&request) => result,
        };

        let (outcome, snapshot) = {
            let mut state = self.lock_state();
            if !self.tickets.is_current(ticket.id()) {
                debug!(
                    "Dropping stale response #{} (current is #{})",
                    ticket.id().generation(),
                    self.tickets.current()
                );
                return FetchOutcome::Superseded;
            }

            state.loading = false;
            let outcome = match result {
                Ok(page) => {
                    info!(
                        "Applied page {} ({} of {} items)",
                        page.page_number(),
                        page.items().len(),
                        page.total_count()
                    );
                    state.page = Some(Arc::new(page));
                    state.page_query = Some(query);
                    state.error = None;
                    state.applied_generation = ticket.id().generation();
                    FetchOutcome::Applied
                }
                Err(err) => {
                    warn!("Fetching page failed, keeping previous page: {err}");
                    // navigation continues from the page that is still shown
                    state.query = state
                        .page_query
                        .clone()
                        .unwrap_or_else(|| QueryState::new(self.options.ordering.clone()));
                    state.error = Some(err.clone());
                    FetchOutcome::Failed(err)
                }
            };
            (outcome, state.clone())
        };

        self.publish(snapshot);
        outcome
    }

    fn publish(&self, snapshot: TableSnapshot<S::Item>) {
        self.lock_subscribers()
            .retain(|tx| tx.send(snapshot.clone()).is_ok());
    }

    fn lock_state(&self) -> MutexGuard<'_, TableSnapshot<S::Item>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_subscribers(&self) -> MutexGuard<'_, Vec<flume::Sender<TableSnapshot<S::Item>>>> {
        self.subscribers.lock().unwrap_or_else(|e| e.into_inner())
    }
}
