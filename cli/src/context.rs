//! Resolved configuration and API client shared by the commands.

use anyhow::{Context as _, Result};
use outposts_business::{BusinessConfig, OutpostListPage, OutpostsApi};
use outposts_states::Ordering;
use tracing::{debug, instrument};

use crate::config::CliConfig;
use crate::output::Output;

pub struct CliContext {
    pub config: BusinessConfig,
    pub api: OutpostsApi,
    pub out: Output,
}

impl CliContext {
    /// Resolves configuration from flags, the config file and the environment.
    #[instrument(skip_all, name = "connect")]
    pub fn connect(base_url: Option<&str>, token: Option<&str>) -> Result<Self> {
        let env = BusinessConfig::init().context("Invalid OUTPOSTS_* environment")?;
        let config = CliConfig::load()?.resolve(env, base_url, token);
        debug!(base_url = %config.api_base_url, token = config.token.is_some(), "Resolved configuration");

        let api = OutpostsApi::new(&config).context("Failed to build HTTP client")?;
        Ok(Self {
            config,
            api,
            out: Output::new(),
        })
    }

    /// The outpost list page, sorted by name.
    pub fn page(&self) -> OutpostListPage<OutpostsApi> {
        OutpostListPage::new(self.api.clone(), self.config.clone())
    }

    pub fn page_ordered(&self, ordering: Option<Ordering>) -> OutpostListPage<OutpostsApi> {
        OutpostListPage::with_ordering(self.api.clone(), self.config.clone(), ordering)
    }
}
