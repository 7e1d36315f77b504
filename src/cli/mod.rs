// src/cli/mod.rs
use crate::config::{load_config, CheckConfig, PartialConfig};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// Exit code for operator mistakes; kept apart from the 0-3 status codes.
pub const USAGE_EXIT_CODE: i32 = -1;

/// True when the program was started without any argument.
///
/// Only argv is counted. A run configured solely through the
/// `LB_POOL_CHECK_*` variables is not supported and still needs at least one
/// flag, e.g. `--config`.
pub fn is_bare_invocation<I>(args: I) -> bool
where
    I: IntoIterator,
    I::IntoIter: ExactSizeIterator,
{
    args.into_iter().len() < 2
}

#[derive(Parser, Debug, Default)]
#[command(
    name = "check_lb_pool",
    version,
    about = "Report the health of a load-balancer pool to Nagios/Icinga",
    after_help = "Exit status: 0 OK, 1 WARNING, 2 CRITICAL, 3 UNKNOWN"
)]
pub struct Cli {
    /// Management host, or a base URL such as https://lb:8443
    #[arg(short = 'H', long, env = "LB_POOL_CHECK_HOST", help_heading = "Mandatory parameters")]
    pub host: Option<String>,

    /// Partition (environment) the pool lives in [default: Common]
    #[arg(short = 'e', long = "env", visible_alias = "partition", help_heading = "Mandatory parameters")]
    pub partition: Option<String>,

    /// User to connect as
    #[arg(short = 'U', long, env = "LB_POOL_CHECK_USER", help_heading = "Mandatory parameters")]
    pub user: Option<String>,

    /// Password of the user
    #[arg(
        short = 'P',
        long = "pass",
        env = "LB_POOL_CHECK_PASSWORD",
        hide_env_values = true,
        help_heading = "Mandatory parameters"
    )]
    pub password: Option<String>,

    /// Pool to check
    #[arg(short = 'p', long, help_heading = "Mandatory parameters")]
    pub pool: Option<String>,

    /// Warning percent of connections
    #[arg(short = 'W', long, help_heading = "Mandatory parameters")]
    pub warning: Option<f64>,

    /// Critical percent of connections
    #[arg(short = 'C', long, help_heading = "Mandatory parameters")]
    pub critical: Option<f64>,

    /// Print extended output
    #[arg(short, long)]
    pub verbose: bool,

    /// Show member statistics
    #[arg(short, long)]
    pub members: bool,

    /// Read settings from a YAML or JSON file; flags take precedence
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds [default: 10]
    #[arg(short = 't', long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Skip TLS certificate validation
    #[arg(short = 'k', long)]
    pub insecure: bool,
}

impl Cli {
    /// Settings given on the command line, as an overlay for file settings.
    pub fn overrides(&self) -> PartialConfig {
        PartialConfig {
            host: self.host.clone(),
            partition: self.partition.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
            pool: self.pool.clone(),
            warning: self.warning,
            critical: self.critical,
            verbose: self.verbose.then_some(true),
            members: self.members.then_some(true),
            timeout_secs: self.timeout,
            verify_tls: self.insecure.then_some(false),
            retry: None,
        }
    }

    /// Combine the optional config file with command-line flags.
    pub async fn resolve(&self) -> Result<CheckConfig> {
        let base = match &self.config {
            Some(path) => load_config(path).await?,
            None => PartialConfig::default(),
        };
        Ok(base.merge(self.overrides()).build()?)
    }
}
