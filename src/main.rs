// src/main.rs
use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use lb_pool_check::cli::{is_bare_invocation, Cli, USAGE_EXIT_CODE};
use lb_pool_check::probe;
use std::process;
use tracing::{debug, error};

#[tokio::main]
async fn main() {
    // Logging is best effort; stdout belongs to the plugin output.
    if let Err(err) = init_tracing() {
        eprintln!("failed to initialise logging: {err}");
    }

    if is_bare_invocation(std::env::args_os()) {
        println!("no parameters specified\n");
        let _ = Cli::command().print_help();
        process::exit(USAGE_EXIT_CODE);
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => USAGE_EXIT_CODE,
            };
            let _ = err.print();
            process::exit(code);
        }
    };

    let config = match cli.resolve().await {
        Ok(config) => config,
        Err(err) => {
            error!("invalid configuration: {err:#}");
            eprintln!("{err:#}\n");
            let _ = Cli::command().print_help();
            process::exit(USAGE_EXIT_CODE);
        }
    };
    debug!(
        pool = %config.pool,
        partition = %config.connection.partition,
        warning = config.thresholds.warning_percent,
        critical = config.thresholds.critical_percent,
        "configuration loaded"
    );

    let report = probe::run(&config).await;
    println!("{report}");
    process::exit(report.exit_code());
}

fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lb_pool_check=warn,reqwest=warn".into()),
        )
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))?;
    Ok(())
}
