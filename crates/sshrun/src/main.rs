//! sshrun
//!
//! Runs a single command on a remote host over SSH and exits with its status

use std::process::ExitCode;

use clap::Parser;
use color_eyre::Result;
use sshrun_exec::RemoteCommandRunner;

mod app;
mod cli;
mod config;
mod telemetry;

use crate::cli::Cli;
use crate::config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let Some(command) = cli.command_line() else {
        eprintln!("{}", Cli::usage());
        return Ok(ExitCode::from(1));
    };

    let config = Config::load(&cli, None)?;
    telemetry::init(&config.log_level, cli.verbose);

    let runner = RemoteCommandRunner::ssh(config.connection_parameters()?);

    let code = app::execute(
        &runner,
        &command,
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    )
    .await?;

    Ok(ExitCode::from(code))
}
