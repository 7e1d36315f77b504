// src/lib.rs
pub mod cli;
pub mod collector;
pub mod config;
pub mod health;
pub mod probe;
pub mod retry;
