use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use modsweep::app;
use modsweep::cli::Cli;
use modsweep::config::Config;
use modsweep::fs::LocalFs;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let cwd = std::env::current_dir()?;
    let mut config = Config::load(cli.config.as_deref(), &cwd)?;
    cli.apply(&mut config);

    let report = app::run(&config, LocalFs::new(cwd)).await?;
    println!("{}", app::summary(&report));

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
