//! Health command.

use std::process::ExitCode;

use anyhow::Result;
use outposts_business::{HealthKey, HealthStatus, check_health};
use tracing::instrument;
use ustr::ustr;

use crate::context::CliContext;

#[instrument(skip_all, name = "health", fields(pk = %pk))]
pub async fn run_health(ctx: &CliContext, pk: &str) -> Result<ExitCode> {
    let status = check_health(&ctx.api, HealthKey(ustr(pk))).await;

    ctx.out.header(format!("Health of {pk}"));
    for line in status.lines() {
        ctx.out.print(line);
    }

    Ok(match status {
        HealthStatus::Failed(_) => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}
