// src/health/facts.rs
use serde::{Deserialize, Serialize};

/// The string the load balancer reports for a pool it considers healthy.
pub const AVAILABLE: &str = "available";

/// Runtime statistics for one pool, as fetched from the management API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolFacts {
    pub pool_name: String,
    pub availability_state: String,
    pub active_members: u64,
    pub total_members: u64,
    pub current_connections: u64,
    pub max_connections: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<MemberStat>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberStat {
    pub name: String,
    pub current_connections: u64,
}

impl PoolFacts {
    pub fn is_available(&self) -> bool {
        self.availability_state == AVAILABLE
    }

    pub fn has_inactive_members(&self) -> bool {
        self.active_members < self.total_members
    }

    pub fn with_members(mut self, members: Vec<MemberStat>) -> Self {
        self.members = Some(members);
        self
    }
}
