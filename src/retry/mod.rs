mod strategy;

pub use strategy::{RetryDecision, RetryStrategy};
