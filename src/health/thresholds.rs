// src/health/thresholds.rs

/// Connection-load thresholds, as percentages of the pool's maximum.
///
/// `critical_percent >= warning_percent` is expected but not enforced; an
/// inverted pair makes the warning branch fire only when critical did not.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub warning_percent: f64,
    pub critical_percent: f64,
}

impl Thresholds {
    pub fn new(warning_percent: f64, critical_percent: f64) -> Self {
        Self {
            warning_percent,
            critical_percent,
        }
    }

    pub fn is_inverted(&self) -> bool {
        self.critical_percent < self.warning_percent
    }

    pub fn warning_connections(&self, max_connections: u64) -> u64 {
        connection_limit(max_connections, self.warning_percent)
    }

    pub fn critical_connections(&self, max_connections: u64) -> u64 {
        connection_limit(max_connections, self.critical_percent)
    }
}

/// Number of connections at which `percent` of `max_connections` is reached.
///
/// Half-way values round to even, so 2.5 becomes 2 and 3.5 becomes 4.
pub fn connection_limit(max_connections: u64, percent: f64) -> u64 {
    let limit = (max_connections as f64 * percent / 100.0).round_ties_even();
    if limit <= 0.0 {
        0
    } else {
        limit as u64
    }
}
