mod cli;
mod commands;
mod config;
mod context;
mod output;
mod render;
mod timing;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser as _;
use tracing::{error, instrument};

use crate::cli::{Cli, Commands};
use crate::commands::{
    generate_completions, run_configure, run_create, run_delete, run_health, run_info, run_list,
    run_update,
};
use crate::context::CliContext;
use crate::output::Output;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    timing::init_tracing(cli.verbose, cli.timing);

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            Output::new().error(format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

#[instrument(skip_all, name = "outposts")]
async fn run(cli: Cli) -> Result<ExitCode> {
    let Cli {
        command,
        base_url,
        token,
        ..
    } = cli;

    let connect = || CliContext::connect(base_url.as_deref(), token.as_deref());
    match command {
        Commands::List {
            page,
            search,
            ordering,
            watch_health,
        } => run_list(&connect()?, page, search, &ordering, watch_health).await,
        Commands::Create { fields } => run_create(&connect()?, fields).await,
        Commands::Update { pk, fields } => run_update(&connect()?, &pk, fields).await,
        Commands::Delete { pk, yes } => run_delete(&connect()?, &pk, yes).await,
        Commands::Health { pk } => run_health(&connect()?, &pk).await,
        Commands::Info { pk } => run_info(&connect()?, &pk).await,
        Commands::Configure => run_configure(base_url.as_deref(), token.as_deref()),
        Commands::Completions { shell } => {
            generate_completions(shell);
            Ok(ExitCode::SUCCESS)
        }
    }
}
