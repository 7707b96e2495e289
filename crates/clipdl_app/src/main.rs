mod app;
mod cli;
mod config;
mod effects;
mod render;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use clipdl_engine::JobClient;
use clipdl_logging::clip_info;
use log::LevelFilter;

use crate::app::{App, RunOutcome};
use crate::cli::{Cli, JobArgs};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(RunOutcome::Completed { .. }) => ExitCode::SUCCESS,
        Ok(RunOutcome::Failed { .. } | RunOutcome::Errored { .. }) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<RunOutcome> {
    let file = config::load_file_config(cli.config.as_deref())?;
    let settings = config::resolve(file, cli)?;

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    clipdl_logging::initialize(cli.log.destination(&settings.log_file), level);
    clip_info!(
        "Starting clipdl api_base={:?} origin={} max_polls={:?}",
        settings.api.api_base(),
        settings.api.origin(),
        settings.poll.max_polls
    );

    let client = JobClient::connect(settings.api, &settings.http, settings.poll)
        .context("failed to build HTTP client")?;
    let mut app = App::new(client);
    let outcome = app.run(&JobArgs::from_cli(cli))?;
    Ok(outcome)
}
