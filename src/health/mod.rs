// src/health/mod.rs
mod aggregator;
mod facts;
mod status;
mod thresholds;

pub use aggregator::{
    availability_rule, connection_rule, evaluate, membership_rule, Diagnostic, EvaluateOptions,
    Evaluation, RuleOutcome, SeverityAggregator,
};
pub use facts::{MemberStat, PoolFacts, AVAILABLE};
pub use status::{Severity, Status};
pub use thresholds::{connection_limit, Thresholds};
