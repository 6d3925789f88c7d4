//! The outpost list page: one table controller plus the modals around it.

use log::{debug, info};
use outposts_states::{FetchOutcome, Modal, ModalAction, ModalError, Ordering, TableController};

use crate::{
    BusinessConfig, Cell, CreateOutpost, DeleteOutpost, DeploymentInfo, EditOutpost, HealthKey,
    HealthWidget, OutpostSource, OutpostsClient, RowAction, project_row,
};

/// Static description of a list page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMeta {
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub search_enabled: bool,
    pub default_ordering: &'static str,
}

pub const OUTPOSTS_PAGE: PageMeta = PageMeta {
    title: "Outposts",
    description: "Outposts are deployments of authentik components to support different \
                  environments and protocols, like reverse proxies.",
    icon: "pf-icon pf-icon-zone",
    search_enabled: true,
    default_ordering: "name",
};

/// A row action turned into an openable modal.
#[derive(Debug)]
pub enum RowModal<C: OutpostsClient + Clone> {
    Edit(Modal<EditOutpost<C>>),
    Delete(Modal<DeleteOutpost<C>>),
    DeploymentInfo(Modal<DeploymentInfo<C>>),
}

pub struct OutpostListPage<C: OutpostsClient + Clone> {
    client: C,
    config: BusinessConfig,
    table: TableController<OutpostSource<C>>,
}

impl<C: OutpostsClient + Clone> std::fmt::Debug for OutpostListPage<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutpostListPage")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

impl<C: OutpostsClient + Clone> OutpostListPage<C> {
    /// A page sorted by name.
    pub fn new(client: C, config: BusinessConfig) -> Self {
        Self::with_ordering(client, config, Ordering::parse(OUTPOSTS_PAGE.default_ordering))
    }

    pub fn with_ordering(client: C, config: BusinessConfig, ordering: Option<Ordering>) -> Self {
        let options = config.table_options(ordering);
        let table = TableController::new(OutpostSource::new(client.clone()), options);
        Self {
            client,
            config,
            table,
        }
    }

    pub fn table(&self) -> &TableController<OutpostSource<C>> {
        &self.table
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Fetches the current query.
    pub async fn load(&self) -> FetchOutcome {
        self.table.refresh().await
    }

    /// Cells of every row on the last applied page.
    pub fn rows(&self) -> Vec<Vec<Cell>> {
        self.table.snapshot().items().iter().map(project_row).collect()
    }

    /// The toolbar's create modal.
    pub fn create_modal(&self) -> Modal<CreateOutpost<C>> {
        Modal::new(CreateOutpost::new(self.client.clone()))
    }

    pub fn modal_for(&self, action: &RowAction) -> RowModal<C> {
        match action {
            RowAction::Edit(outpost) => {
                RowModal::Edit(Modal::new(EditOutpost::new(self.client.clone(), outpost)))
            }
            RowAction::Delete { pk, name } => RowModal::Delete(Modal::new(DeleteOutpost::new(
                self.client.clone(),
                *pk,
                name.clone(),
            ))),
            RowAction::DeploymentInfo {
                pk,
                token_identifier,
            } => RowModal::DeploymentInfo(Modal::new(DeploymentInfo::new(
                self.client.clone(),
                self.config.api_base_url.clone(),
                *pk,
                token_identifier.clone(),
            ))),
        }
    }

    /// Submits a mutating modal. On success the table refetches its current query.
    pub async fn submit<A: ModalAction>(
        &self,
        modal: &Modal<A>,
    ) -> Result<A::Output, ModalError> {
        let output = modal.submit().await?;
        info!("{} succeeded, refreshing outposts", modal.action().header());
        let outcome = self.table.refresh().await;
        debug!("Refresh after mutation: {outcome:?}");
        Ok(output)
    }

    /// Starts the health poller behind one row's health cell.
    pub fn health_widget(&self, key: HealthKey) -> HealthWidget {
        HealthWidget::spawn(self.client.clone(), key, self.config.health_interval)
    }
}
