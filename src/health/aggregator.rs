// src/health/aggregator.rs
//! Reduces one pool's facts to a severity and a diagnostic message.
//!
//! Every rule is evaluated independently and yields its own candidate
//! severity plus an optional message fragment. The final severity is the
//! maximum over all candidates, so reordering the rules never changes the
//! verdict, only the fragment order (which is fixed: availability,
//! membership, connections).

use super::facts::{MemberStat, PoolFacts};
use super::status::{Severity, Status};
use super::thresholds::Thresholds;
use std::fmt;

const SEPARATOR: &str = " -- ";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluateOptions {
    /// Append raw counts to the membership and connection fragments.
    pub verbose: bool,
    /// Append one line per pool member after the verdict message.
    pub show_members: bool,
}

/// Outcome of a single rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutcome {
    pub severity: Severity,
    pub fragment: Option<String>,
}

impl RuleOutcome {
    fn ok() -> Self {
        Self {
            severity: Severity::Ok,
            fragment: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pool_name: String,
    fragments: Vec<String>,
    member_lines: Vec<String>,
}

impl Diagnostic {
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn member_lines(&self) -> &[String] {
        &self.member_lines
    }

    /// The verdict-bearing part of the message, without member lines.
    pub fn summary(&self) -> String {
        if self.fragments.is_empty() {
            return format!("{SEPARATOR}{}", self.pool_name);
        }
        self.fragments
            .iter()
            .map(|fragment| format!("{SEPARATOR}{fragment}"))
            .collect()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())?;
        for line in &self.member_lines {
            write!(f, "\n\t{line}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub severity: Severity,
    pub diagnostic: Diagnostic,
}

impl Evaluation {
    pub fn status(&self) -> Status {
        self.severity.into()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SeverityAggregator {
    thresholds: Thresholds,
    options: EvaluateOptions,
}

impl SeverityAggregator {
    pub fn new(thresholds: Thresholds, options: EvaluateOptions) -> Self {
        Self {
            thresholds,
            options,
        }
    }

    pub fn evaluate(&self, facts: &PoolFacts) -> Evaluation {
        let outcomes = [
            availability_rule(facts),
            membership_rule(facts, self.options.verbose),
            connection_rule(facts, &self.thresholds, self.options.verbose),
        ];

        let mut severity = Severity::Ok;
        let mut fragments = Vec::new();
        for outcome in outcomes {
            severity.escalate(outcome.severity);
            if let Some(fragment) = outcome.fragment.filter(|f| !f.is_empty()) {
                fragments.push(fragment);
            }
        }

        let member_lines = match (&facts.members, self.options.show_members) {
            (Some(members), true) => members.iter().map(member_line).collect(),
            _ => Vec::new(),
        };

        Evaluation {
            severity,
            diagnostic: Diagnostic {
                pool_name: facts.pool_name.clone(),
                fragments,
                member_lines,
            },
        }
    }
}

/// Convenience wrapper for a one-off evaluation.
pub fn evaluate(
    facts: &PoolFacts,
    thresholds: Thresholds,
    options: EvaluateOptions,
) -> Evaluation {
    SeverityAggregator::new(thresholds, options).evaluate(facts)
}

pub fn availability_rule(facts: &PoolFacts) -> RuleOutcome {
    if facts.is_available() {
        return RuleOutcome::ok();
    }
    RuleOutcome {
        severity: Severity::Critical,
        fragment: Some(format!("'{}' pool is not available", facts.pool_name)),
    }
}

pub fn membership_rule(facts: &PoolFacts, verbose: bool) -> RuleOutcome {
    let mut outcome = RuleOutcome::ok();
    let mut fragment = String::new();

    if facts.has_inactive_members() {
        outcome.severity = Severity::Warning;
        fragment.push_str(&format!(
            "'{}' active members is less than total members.",
            facts.pool_name
        ));
    }
    if verbose {
        fragment.push_str(&format!(
            "( active:{}, total:{} )",
            facts.active_members, facts.total_members
        ));
    }

    outcome.fragment = Some(fragment).filter(|f| !f.is_empty());
    outcome
}

pub fn connection_rule(facts: &PoolFacts, thresholds: &Thresholds, verbose: bool) -> RuleOutcome {
    let mut outcome = RuleOutcome::ok();
    let mut fragment = String::new();

    // A pool without a connection limit has no load to speak of.
    if facts.max_connections > 0 {
        let current = facts.current_connections;
        if current >= thresholds.critical_connections(facts.max_connections) {
            outcome.severity = Severity::Critical;
            fragment.push_str(&over_limit_fragment(&facts.pool_name, thresholds.critical_percent));
        } else if current >= thresholds.warning_connections(facts.max_connections) {
            outcome.severity = Severity::Warning;
            fragment.push_str(&over_limit_fragment(&facts.pool_name, thresholds.warning_percent));
        }
    }
    if verbose {
        fragment.push_str(&format!(
            " ({} / {})",
            facts.current_connections, facts.max_connections
        ));
    }

    outcome.fragment = Some(fragment).filter(|f| !f.is_empty());
    outcome
}

fn over_limit_fragment(pool_name: &str, percent: f64) -> String {
    format!("'{pool_name}' current connections are over {percent}% of pool maximum")
}

fn member_line(member: &MemberStat) -> String {
    format!("{}: {}", member.name, member.current_connections)
}
