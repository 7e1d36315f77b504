// src/probe/mod.rs
//! One end-to-end pool check: collect, aggregate, report.

use crate::collector::{collect, CollectionError, IControlClient, StatsSource};
use crate::config::CheckConfig;
use crate::health::{Evaluation, SeverityAggregator, Status};
use std::fmt;
use tracing::{error, info};

/// The single line handed back to the monitoring scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub status: Status,
    /// Diagnostic text, starting with its own ` -- ` separator.
    pub message: String,
}

impl Report {
    pub fn from_evaluation(evaluation: &Evaluation) -> Self {
        Self {
            status: evaluation.status(),
            message: evaluation.diagnostic.to_string(),
        }
    }

    pub fn from_collection_error(err: &CollectionError) -> Self {
        let message = match err {
            CollectionError::Decode(_) => " -- No JSON object could be decoded".to_string(),
            other => format!(" -- an error occurred: {other}"),
        };
        Self {
            status: Status::Unknown,
            message,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.status.exit_code()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.status, self.message)
    }
}

/// Run the check against the management API described by `config`.
pub async fn run(config: &CheckConfig) -> Report {
    match IControlClient::new(&config.connection, config.retry.clone()) {
        Ok(client) => run_with_source(&client, config).await,
        Err(err) => {
            error!(error = %err, "could not set up the statistics client");
            Report::from_collection_error(&err)
        }
    }
}

/// Run the check against any source of pool facts.
pub async fn run_with_source<S>(source: &S, config: &CheckConfig) -> Report
where
    S: StatsSource + ?Sized,
{
    let facts = match collect(source, &config.pool, config.members).await {
        Ok(facts) => facts,
        Err(err) => {
            error!(pool = %config.pool, error = %err, "failed to collect pool statistics");
            return Report::from_collection_error(&err);
        }
    };

    let evaluation =
        SeverityAggregator::new(config.thresholds, config.evaluate_options()).evaluate(&facts);
    info!(
        pool = %facts.pool_name,
        status = %evaluation.status(),
        availability = %facts.availability_state,
        active_members = facts.active_members,
        total_members = facts.total_members,
        current_connections = facts.current_connections,
        max_connections = facts.max_connections,
        "pool evaluated"
    );

    Report::from_evaluation(&evaluation)
}
