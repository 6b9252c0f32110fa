//! Append-only hash chain with proof-of-work mining and tamper detection.

pub mod api;
pub mod blockchain;
pub mod config;

pub use blockchain::{Block, Blockchain, ChainError};
