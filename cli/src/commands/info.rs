//! Deployment info command.

use std::process::ExitCode;

use anyhow::Result;
use outposts_business::{DeploymentInfo, OutpostsClient as _};
use outposts_states::ModalAction as _;
use tracing::instrument;
use ustr::ustr;

use crate::context::CliContext;

#[instrument(skip_all, name = "info", fields(pk = %pk))]
pub async fn run_info(ctx: &CliContext, pk: &str) -> Result<ExitCode> {
    let out = &ctx.out;
    let outpost = match ctx.api.retrieve(ustr(pk)).await {
        Ok(outpost) => outpost,
        Err(err) => {
            out.api_error(format!("Failed to load outpost {pk}"), &err);
            return Ok(ExitCode::FAILURE);
        }
    };

    let info = DeploymentInfo::new(
        ctx.api.clone(),
        ctx.config.api_base_url.clone(),
        outpost.pk,
        outpost.token_identifier,
    );
    let details = match info.load().await {
        Ok(details) => details,
        Err(err) => {
            out.api_error("Failed to load deployment token", &err);
            return Ok(ExitCode::FAILURE);
        }
    };

    out.header(format!("{} ({})", info.header(), outpost.name));
    for (name, value) in details.env() {
        out.print(format!("{name}={value}"));
    }
    out.dim("AUTHENTIK_INSECURE is only needed when the server uses a self-signed certificate.");
    out.labeled("Documentation", details.docs_url);
    Ok(ExitCode::SUCCESS)
}
