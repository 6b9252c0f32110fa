use super::Block;

/// Whether `hash` starts with `difficulty` hex zeros.
pub fn meets_difficulty(hash: &str, difficulty: u32) -> bool {
    let difficulty = difficulty as usize;
    hash.len() >= difficulty && hash.bytes().take(difficulty).all(|c| c == b'0')
}

/// Perform Proof-of-Work by bumping the nonce until the block's hash
/// starts with `difficulty` leading zeros (in hex).
///
/// The search resumes from the block's current nonce and checks the stored
/// hash before the first increment, so an already-satisfying block is left
/// untouched. Returns the number of nonce increments performed.
pub fn mine(block: &mut Block, difficulty: u32) -> u64 {
    let mut attempts = 0u64;
    while !meets_difficulty(&block.hash, difficulty) {
        block.nonce = block.nonce.wrapping_add(1);
        block.hash = block.compute_hash();
        attempts += 1;
    }
    attempts
}
