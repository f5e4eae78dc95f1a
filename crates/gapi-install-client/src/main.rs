//! gapi-install CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use gapi_install_client::tracing::{TracingConfig, init_tracing};
use gapi_install_client::{Cli, ClientError, load_config, report, run};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => return report(&e, &mut stderr),
    };

    let mut tracing_config = if cli.debug || config.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::cli()
    };
    tracing_config = tracing_config.with_format(config.log_format);
    if let Some(ref filter) = config.log_filter {
        tracing_config = tracing_config.with_env_filter(filter);
    }
    if let Err(e) = init_tracing(tracing_config) {
        return report(&ClientError::from(e), &mut stderr);
    }

    let mut stdout = std::io::stdout();
    match run(&cli, &config, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e, &mut stderr),
    }
}
