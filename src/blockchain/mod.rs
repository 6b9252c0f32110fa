pub mod block;
pub mod clock;
pub mod error;
pub mod hasher;
pub mod model;
pub mod pow;

pub use block::Block;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::ChainError;
pub use model::Blockchain;

/// Default Proof-of-Work difficulty (number of leading hex zeros).
pub const DEFAULT_DIFFICULTY: u32 = 4;

/// A SHA-256 hex digest has 64 characters; anything above can never be mined.
pub const MAX_DIFFICULTY: u32 = 64;

pub const GENESIS_TRANSACTIONS: &str = "Genesis Block";
pub const GENESIS_PREVIOUS_HASH: &str = "0";
