use serde::{Deserialize, Serialize};

use super::clock::Clock;
use super::hasher::sha256_hex;
use super::ChainError;

/// A single block in the chain holding an opaque transaction payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: i64, // Unix timestamp (UTC)
    pub transactions: String,
    pub previous_hash: String,
    pub hash: String, // Stored, never re-derived automatically
    pub nonce: u64,   // Proof-of-Work nonce
}

impl Block {
    /// Create a new block (not mined yet) stamped with `clock`'s current time.
    /// Call `pow::mine()` to perform PoW.
    pub fn new(
        index: u64,
        transactions: impl Into<String>,
        previous_hash: impl Into<String>,
        clock: &dyn Clock,
    ) -> Result<Self, ChainError> {
        let timestamp = clock.now()?;
        Ok(Self::new_with_timestamp(
            index,
            transactions,
            previous_hash,
            timestamp,
        ))
    }

    pub fn new_with_timestamp(
        index: u64,
        transactions: impl Into<String>,
        previous_hash: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        let mut block = Self {
            index,
            timestamp,
            transactions: transactions.into(),
            previous_hash: previous_hash.into(),
            hash: String::new(),
            nonce: 0,
        };
        block.hash = block.compute_hash();
        block
    }

    /// Compute the SHA-256 hash of this block from its fields (excluding the
    /// `hash` field itself). The preimage is index, timestamp, transactions,
    /// previous hash and nonce concatenated without separators.
    pub fn compute_hash(&self) -> String {
        let preimage = format!(
            "{}{}{}{}{}",
            self.index, self.timestamp, self.transactions, self.previous_hash, self.nonce
        );
        sha256_hex(preimage.as_bytes())
    }

    /// Whether the stored `hash` matches the block's current contents.
    /// (Does NOT validate chain linkage or difficulty.)
    pub fn has_valid_hash(&self) -> bool {
        self.hash == self.compute_hash()
    }
}
