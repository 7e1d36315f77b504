// src/collector/mod.rs
mod client;
mod error;
mod parse;

pub use client::{base_url, IControlClient, StatsSource};
pub use error::CollectionError;
pub use parse::{parse_member_stats, parse_pool_stats, pool_stats_link};

use crate::health::PoolFacts;

/// Fetch the facts for one pool, plus its members when asked.
///
/// Both requests run concurrently and either failing fails the whole
/// collection, so the aggregator only ever sees complete facts.
pub async fn collect<S>(
    source: &S,
    pool: &str,
    with_members: bool,
) -> Result<PoolFacts, CollectionError>
where
    S: StatsSource + ?Sized,
{
    if !with_members {
        return source.pool_stats(pool).await;
    }

    let (facts, members) =
        futures::future::try_join(source.pool_stats(pool), source.member_stats(pool)).await?;
    Ok(facts.with_members(members))
}
