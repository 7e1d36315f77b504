// src/collector/parse.rs
//! Decoding of the management API's stats documents.
//!
//! Both documents share the same nesting:
//!
//! ```text
//! { "entries": { "<link>": { "nestedStats": { "entries": {
//!     "serverside.curConns": { "value": 12 },
//!     "status.availabilityState": { "description": "available" },
//!     ...
//! } } } } }
//! ```

use super::error::CollectionError;
use crate::health::{MemberStat, PoolFacts};
use serde_json::{Map, Value};

const ACTIVE_MEMBERS: &str = "activeMemberCnt";
const TOTAL_MEMBERS: &str = "memberCnt";
const AVAILABILITY: &str = "status.availabilityState";
// Older releases spell the availability key in snake case.
const AVAILABILITY_LEGACY: &str = "status.availability_state";
const CURRENT_CONNECTIONS: &str = "serverside.curConns";
const MAX_CONNECTIONS: &str = "serverside.maxConns";
const NODE_NAME: &str = "nodeName";

/// Self link the API uses as the key of the pool's stats entry.
pub fn pool_stats_link(partition: &str, pool: &str) -> String {
    format!("https://localhost/mgmt/tm/ltm/pool/~{partition}~{pool}/stats")
}

pub fn parse_pool_stats(
    body: &Value,
    partition: &str,
    pool: &str,
) -> Result<PoolFacts, CollectionError> {
    let entries = object(body, "entries")?;
    let link = pool_stats_link(partition, pool);

    let entry = match entries.get(&link) {
        Some(entry) => entry,
        // Some releases key the entry by a longer link; a lone entry is ours.
        None if entries.len() == 1 => entries.values().next().ok_or_else(|| missing(&link))?,
        None => return Err(missing(&link)),
    };
    let stats = nested_entries(entry)?;

    Ok(PoolFacts {
        pool_name: pool.to_string(),
        availability_state: description(stats, AVAILABILITY)
            .or_else(|_| description(stats, AVAILABILITY_LEGACY))
            .map_err(|_| missing(&format!("{AVAILABILITY}.description")))?,
        active_members: value(stats, ACTIVE_MEMBERS)?,
        total_members: value(stats, TOTAL_MEMBERS)?,
        current_connections: value(stats, CURRENT_CONNECTIONS)?,
        max_connections: value(stats, MAX_CONNECTIONS)?,
        members: None,
    })
}

/// Members come back ordered by their entry link.
pub fn parse_member_stats(body: &Value, partition: &str) -> Result<Vec<MemberStat>, CollectionError> {
    let entries = match body.get("entries") {
        Some(_) => object(body, "entries")?,
        // A pool without members has no entries at all.
        None => return Ok(Vec::new()),
    };
    let folder = format!("/{partition}/");

    entries
        .values()
        .map(|entry| -> Result<MemberStat, CollectionError> {
            let stats = nested_entries(entry)?;
            let node = description(stats, NODE_NAME)?;
            let name = node.strip_prefix(folder.as_str()).unwrap_or(node.as_str()).to_string();
            Ok(MemberStat {
                name,
                current_connections: value(stats, CURRENT_CONNECTIONS)?,
            })
        })
        .collect()
}

fn object<'a>(value: &'a Value, key: &str) -> Result<&'a Map<String, Value>, CollectionError> {
    value
        .get(key)
        .and_then(Value::as_object)
        .ok_or_else(|| missing(key))
}

fn nested_entries(entry: &Value) -> Result<&Map<String, Value>, CollectionError> {
    entry
        .get("nestedStats")
        .and_then(|nested| nested.get("entries"))
        .and_then(Value::as_object)
        .ok_or_else(|| missing("nestedStats.entries"))
}

fn value(stats: &Map<String, Value>, name: &str) -> Result<u64, CollectionError> {
    stats
        .get(name)
        .and_then(|stat| stat.get("value"))
        .and_then(Value::as_u64)
        .ok_or_else(|| missing(&format!("{name}.value")))
}

fn description(stats: &Map<String, Value>, name: &str) -> Result<String, CollectionError> {
    stats
        .get(name)
        .and_then(|stat| stat.get("description"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| missing(&format!("{name}.description")))
}

fn missing(field: &str) -> CollectionError {
    CollectionError::MissingField(field.to_string())
}
