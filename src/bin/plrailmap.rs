use std::process::ExitCode;

use anyhow::Result;

use plrailmap_tools::cli;
use plrailmap_tools::config::Config;

fn main() -> Result<ExitCode> {
    // Parse configuration from command line and environment
    let config = Config::from_args_and_env()?;

    // RUST_LOG takes precedence over --log-level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    cli::run(config)
}
