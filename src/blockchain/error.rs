use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("clock unavailable: {0}")]
    Clock(String),
    #[error("difficulty {difficulty} exceeds maximum of {max}")]
    DifficultyTooHigh { difficulty: u32, max: u32 },
    #[error("block index {index} out of range (chain length {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("block #{index} stored hash does not match its contents")]
    HashMismatch { index: usize },
    #[error("block #{index} previous_hash does not match its predecessor's hash")]
    BrokenLink { index: usize },
}
