//! Delete command.

use std::io::IsTerminal as _;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use inquire::Confirm;
use outposts_business::{DeleteOutcome, DeleteOutpost, OutpostsClient as _};
use outposts_states::{ApiError, Modal, ModalAction as _, ModalError};
use tracing::{info, instrument, warn};
use ustr::ustr;

use crate::context::CliContext;

#[instrument(skip_all, name = "delete", fields(pk = %pk))]
pub async fn run_delete(ctx: &CliContext, pk: &str, yes: bool) -> Result<ExitCode> {
    let out = &ctx.out;
    let pk = ustr(pk);

    // The name is only used in the prompt; a vanished record still goes through delete.
    let name = match ctx.api.retrieve(pk).await {
        Ok(outpost) => outpost.name,
        Err(ApiError::NotFound) => {
            warn!("Outpost {pk} not found before delete");
            pk.to_string()
        }
        Err(err) => {
            out.api_error(format!("Failed to load outpost {pk}"), &err);
            return Ok(ExitCode::FAILURE);
        }
    };

    let page = ctx.page();
    let modal = Modal::new(DeleteOutpost::new(ctx.api.clone(), pk, name));
    modal.open();

    if !yes {
        anyhow::ensure!(
            std::io::stdin().is_terminal(),
            "Refusing to delete without confirmation; pass --yes"
        );
        let help = format!(
            "y to {}, n to cancel",
            modal.action().submit_label().to_lowercase()
        );
        let confirmed = Confirm::new(&modal.action().prompt())
            .with_help_message(&help)
            .with_default(false)
            .prompt()
            .context("Failed to read confirmation")?;
        if !confirmed {
            modal.close();
            out.dim("Cancelled.");
            return Ok(ExitCode::SUCCESS);
        }
    }

    match page.submit(&modal).await {
        Ok(DeleteOutcome::Deleted) => {
            info!("Deleted outpost {pk}");
            out.success(format!("Deleted outpost {pk}"));
            Ok(ExitCode::SUCCESS)
        }
        Ok(DeleteOutcome::AlreadyDeleted) => {
            out.warning(format!("Outpost {pk} was already deleted"));
            Ok(ExitCode::SUCCESS)
        }
        Err(ModalError::Api(err)) => {
            out.api_error("Delete failed", &err);
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err).context("Delete failed"),
    }
}
