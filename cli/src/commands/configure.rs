//! Configure command: persists connection flags to the config file.

use std::process::ExitCode;

use anyhow::Result;
use tracing::{info, instrument};

use crate::config::CliConfig;
use crate::output::Output;

#[instrument(skip_all, name = "configure")]
pub fn run_configure(base_url: Option<&str>, token: Option<&str>) -> Result<ExitCode> {
    let out = Output::new();
    anyhow::ensure!(
        base_url.is_some() || token.is_some(),
        "Nothing to save; pass --base-url and/or --token"
    );

    let mut config = CliConfig::load()?;
    if let Some(url) = base_url {
        config.server.base_url = Some(url.to_owned());
    }
    if let Some(token) = token {
        // a blank token clears the saved one
        config.auth.token = (!token.trim().is_empty()).then(|| token.to_owned());
    }

    let path = config.save()?;
    info!("Saved configuration to {}", path.display());
    out.success(format!("Saved configuration to {}", path.display()));
    Ok(ExitCode::SUCCESS)
}
