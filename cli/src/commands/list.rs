//! List outposts command.

use std::collections::HashMap;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context as _, Result};
use outposts_business::{
    HealthKey, HealthStatus, HealthWidget, OUTPOSTS_PAGE, Outpost, OutpostsApi, check_health,
};
use outposts_states::{FetchOutcome, Ordering};
use tokio::task::JoinSet;
use tracing::instrument;

use crate::context::CliContext;
use crate::render::{page_summary, render_table};

const REDRAW_INTERVAL: Duration = Duration::from_millis(500);

#[instrument(skip_all, name = "list", fields(page = page, ordering = %ordering))]
pub async fn run_list(
    ctx: &CliContext,
    page: u32,
    search: Option<String>,
    ordering: &str,
    watch_health: bool,
) -> Result<ExitCode> {
    let out = &ctx.out;
    let ordering = Ordering::parse(ordering)
        .with_context(|| format!("Invalid ordering {ordering:?}, expected e.g. name or -name"))?;
    let list = ctx.page_ordered(Some(ordering));

    let outcome = match search {
        Some(term) => list.table().set_search(term).await,
        None => list.load().await,
    };
    let outcome = match outcome {
        FetchOutcome::Applied if page > 1 => list.table().go_to_page(page).await,
        other => other,
    };
    match outcome {
        FetchOutcome::Applied => {}
        FetchOutcome::Failed(err) => {
            out.api_error("Failed to list outposts", &err);
            return Ok(ExitCode::FAILURE);
        }
        FetchOutcome::OutOfRange {
            requested,
            total_pages,
        } => {
            out.error(format!(
                "Page {requested} does not exist, there are {total_pages} page(s)"
            ));
            return Ok(ExitCode::FAILURE);
        }
        FetchOutcome::Superseded => anyhow::bail!("List request was superseded"),
    }

    let snapshot = list.table().snapshot();
    let outposts = snapshot.items();
    if outposts.is_empty() {
        out.dim(page_summary(&snapshot));
        return Ok(ExitCode::SUCCESS);
    }

    if watch_health {
        let widgets: Vec<HealthWidget> = outposts
            .iter()
            .map(|o| list.health_widget(HealthKey(o.pk)))
            .collect();
        watch(ctx, outposts, &page_summary(&snapshot), &widgets).await;
    } else {
        let health = check_all(&ctx.api, outposts).await;
        print_page(ctx, outposts, &health, &page_summary(&snapshot));
    }
    Ok(ExitCode::SUCCESS)
}

fn print_page(
    ctx: &CliContext,
    outposts: &[Outpost],
    health: &HashMap<HealthKey, HealthStatus>,
    summary: &str,
) {
    ctx.out.header(OUTPOSTS_PAGE.title);
    ctx.out.dim(OUTPOSTS_PAGE.description);
    ctx.out.print(render_table(outposts, health));
    ctx.out.dim(summary);
}

/// One health check per row, concurrently.
#[instrument(skip_all, name = "check_health", fields(rows = outposts.len()))]
async fn check_all(api: &OutpostsApi, outposts: &[Outpost]) -> HashMap<HealthKey, HealthStatus> {
    let mut tasks = JoinSet::new();
    for outpost in outposts {
        let api = api.clone();
        let key = HealthKey(outpost.pk);
        tasks.spawn(async move { (key, check_health(&api, key).await) });
    }

    let mut statuses = HashMap::new();
    while let Some(joined) = tasks.join_next().await {
        if let Ok((key, status)) = joined {
            statuses.insert(key, status);
        }
    }
    statuses
}

/// Redraws whenever a widget publishes, until Ctrl-C.
async fn watch(ctx: &CliContext, outposts: &[Outpost], summary: &str, widgets: &[HealthWidget]) {
    let mut statuses: HashMap<HealthKey, HealthStatus> = HashMap::new();
    loop {
        let mut changed = false;
        for widget in widgets {
            if let Some(status) = widget.latest() {
                statuses.insert(widget.key(), status);
                changed = true;
            }
        }
        if changed {
            ctx.out.clear();
            print_page(ctx, outposts, &statuses, summary);
            ctx.out.dim("Watching health, press Ctrl-C to stop.");
        }

        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            () = tokio::time::sleep(REDRAW_INTERVAL) => {}
        }
    }
    for widget in widgets {
        widget.cancel();
    }
}
