use log::{debug, info, warn};

use super::clock::{Clock, SystemClock};
use super::{Block, ChainError, GENESIS_PREVIOUS_HASH, GENESIS_TRANSACTIONS, MAX_DIFFICULTY, pow};

/// Simple in-memory blockchain with Proof-of-Work.
#[derive(Debug)]
pub struct Blockchain {
    pub chain: Vec<Block>,
    pub difficulty: u32,
    clock: Box<dyn Clock>,
}

impl Blockchain {
    /// Initialize a new blockchain with a genesis block, stamped by the wall clock.
    pub fn new(difficulty: u32) -> Result<Self, ChainError> {
        Self::with_clock(difficulty, Box::new(SystemClock))
    }

    pub fn with_clock(difficulty: u32, clock: Box<dyn Clock>) -> Result<Self, ChainError> {
        if difficulty > MAX_DIFFICULTY {
            return Err(ChainError::DifficultyTooHigh {
                difficulty,
                max: MAX_DIFFICULTY,
            });
        }
        let genesis = Self::create_genesis_block(clock.as_ref())?;
        debug!("genesis block created (hash={})", genesis.hash);
        Ok(Self {
            chain: vec![genesis],
            difficulty,
            clock,
        })
    }

    /// Create the genesis block. It is never mined.
    pub fn create_genesis_block(clock: &dyn Clock) -> Result<Block, ChainError> {
        Block::new(0, GENESIS_TRANSACTIONS, GENESIS_PREVIOUS_HASH, clock)
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("Blockchain should always have at least the genesis block")
    }

    /// Mine and append a new block carrying `transactions`.
    pub fn add_block(&mut self, transactions: impl Into<String>) -> Result<&Block, ChainError> {
        let tip = self.last_block();
        let index = self.chain.len() as u64;
        let previous_hash = tip.hash.clone();
        // Keep timestamps non-decreasing along the chain.
        let timestamp = self.clock.now()?.max(tip.timestamp);

        let mut block = Block::new_with_timestamp(index, transactions, previous_hash, timestamp);
        let attempts = pow::mine(&mut block, self.difficulty);
        info!(
            "sealed block #{} (hash={}, nonce={}, attempts={})",
            block.index, block.hash, block.nonce, attempts
        );

        self.chain.push(block);
        Ok(self.last_block())
    }

    /// Walk blocks 1.. checking each stored hash against its contents and
    /// against the next block's `previous_hash`. Reports the first violation.
    /// The genesis block itself is not checked.
    pub fn verify(&self) -> Result<(), ChainError> {
        for (i, pair) in self.chain.windows(2).enumerate() {
            let (prev, current) = (&pair[0], &pair[1]);
            let index = i + 1;

            if !current.has_valid_hash() {
                debug!("validation failed: block #{index} hash mismatch");
                return Err(ChainError::HashMismatch { index });
            }
            if current.previous_hash != prev.hash {
                debug!("validation failed: block #{index} broken link");
                return Err(ChainError::BrokenLink { index });
            }
        }
        Ok(())
    }

    pub fn is_valid_chain(&self) -> bool {
        self.verify().is_ok()
    }

    /// Overwrite a block's payload and recompute its hash, simulating an attack.
    /// Out-of-range indices are ignored.
    pub fn tamper_block(&mut self, index: usize, new_transactions: impl Into<String>) {
        if let Err(e) = self.try_tamper_block(index, new_transactions) {
            warn!("tamper ignored: {e}");
        }
    }

    pub fn try_tamper_block(
        &mut self,
        index: usize,
        new_transactions: impl Into<String>,
    ) -> Result<(), ChainError> {
        let len = self.chain.len();
        let block = self
            .chain
            .get_mut(index)
            .ok_or(ChainError::IndexOutOfRange { index, len })?;

        block.transactions = new_transactions.into();
        block.hash = block.compute_hash();
        info!("tampered block #{index} (new hash={})", block.hash);
        Ok(())
    }

    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.chain.get(index)
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::FixedClock;
    use std::sync::Mutex;

    const T0: i64 = 1_700_000_000;

    fn chain(difficulty: u32) -> Blockchain {
        Blockchain::with_clock(difficulty, Box::new(FixedClock(T0))).unwrap()
    }

    /// Replays the given instants, then sticks to the last one.
    #[derive(Debug)]
    struct ScriptedClock(Mutex<Vec<i64>>);

    impl Clock for ScriptedClock {
        fn now(&self) -> Result<i64, ChainError> {
            let mut times = self.0.lock().unwrap();
            if times.len() > 1 {
                Ok(times.remove(0))
            } else {
                Ok(times[0])
            }
        }
    }

    #[derive(Debug)]
    struct BrokenClock;

    impl Clock for BrokenClock {
        fn now(&self) -> Result<i64, ChainError> {
            Err(ChainError::Clock("no time source".into()))
        }
    }

    #[test]
    fn genesis_invariant() {
        let bc = chain(2);
        assert_eq!(bc.len(), 1);
        let genesis = bc.last_block();
        assert_eq!(genesis.index, 0);
        assert_eq!(genesis.previous_hash, "0");
        assert_eq!(genesis.transactions, "Genesis Block");
        assert_eq!(genesis.nonce, 0);
        assert_eq!(genesis.hash, genesis.compute_hash());
        assert!(bc.is_valid_chain());
    }

    #[test]
    fn genesis_is_not_mined() {
        let bc = chain(2);
        let genesis = Blockchain::create_genesis_block(&FixedClock(T0)).unwrap();
        assert_eq!(bc.chain[0], genesis);
        // The genesis hash is whatever its contents produce at nonce 0.
        assert_eq!(genesis.nonce, 0);
    }

    #[test]
    fn rejects_unreachable_difficulty() {
        let err = Blockchain::with_clock(65, Box::new(FixedClock(T0))).unwrap_err();
        assert_eq!(
            err,
            ChainError::DifficultyTooHigh {
                difficulty: 65,
                max: 64
            }
        );
    }

    #[test]
    fn clock_failure_propagates() {
        let err = Blockchain::with_clock(1, Box::new(BrokenClock)).unwrap_err();
        assert!(matches!(err, ChainError::Clock(_)));
    }

    #[test]
    fn mining_postcondition() {
        let mut bc = chain(2);
        let tip = bc.add_block("Transaction 1: A -> B").unwrap().clone();

        assert_eq!(tip.index, 1);
        assert!(tip.hash.starts_with("00"));
        assert_eq!(tip.hash, tip.compute_hash());
        assert_eq!(bc.last_block(), &tip);
    }

    #[test]
    fn linkage_holds_after_appends() {
        let mut bc = chain(1);
        for i in 0..5 {
            bc.add_block(format!("tx {i}")).unwrap();
        }

        assert_eq!(bc.len(), 6);
        for i in 1..bc.len() {
            assert_eq!(bc.chain[i].index, i as u64);
            assert_eq!(bc.chain[i].previous_hash, bc.chain[i - 1].hash);
        }
        assert!(bc.is_valid_chain());
        assert_eq!(bc.verify(), Ok(()));
    }

    #[test]
    fn zero_difficulty_appends_with_nonce_zero() {
        let mut bc = chain(0);
        let tip = bc.add_block("free").unwrap();
        assert_eq!(tip.nonce, 0);
    }

    #[test]
    fn timestamps_never_go_backwards() {
        let clock = ScriptedClock(Mutex::new(vec![T0, T0 - 100, T0 + 5]));
        let mut bc = Blockchain::with_clock(0, Box::new(clock)).unwrap();
        bc.add_block("earlier clock reading").unwrap();
        bc.add_block("later clock reading").unwrap();

        assert_eq!(bc.chain[0].timestamp, T0);
        assert_eq!(bc.chain[1].timestamp, T0);
        assert_eq!(bc.chain[2].timestamp, T0 + 5);
    }

    #[test]
    fn failed_append_leaves_chain_untouched() {
        let clock = ScriptedClock(Mutex::new(vec![T0]));
        let mut bc = Blockchain::with_clock(0, Box::new(clock)).unwrap();
        bc.clock = Box::new(BrokenClock);

        assert!(bc.add_block("never appended").is_err());
        assert_eq!(bc.len(), 1);
    }

    #[test]
    fn tamper_is_detected_through_linkage() {
        let mut bc = chain(2);
        bc.add_block("A").unwrap();
        bc.add_block("B").unwrap();
        let old_hash = bc.chain[1].hash.clone();

        bc.tamper_block(1, "X");

        let tampered = &bc.chain[1];
        assert_eq!(tampered.transactions, "X");
        assert_ne!(tampered.hash, old_hash);
        // Self-consistency alone does not catch it.
        assert_eq!(tampered.hash, tampered.compute_hash());
        assert!(!bc.is_valid_chain());
        assert_eq!(bc.verify(), Err(ChainError::BrokenLink { index: 2 }));
    }

    #[test]
    fn scenario_append_tamper_and_ignore_out_of_range() {
        let mut bc = chain(2);
        bc.add_block("A").unwrap();
        bc.add_block("B").unwrap();
        assert!(bc.chain[1].hash.starts_with("00"));
        assert!(bc.chain[2].hash.starts_with("00"));
        assert!(bc.is_valid_chain());

        let before = bc.chain.clone();
        bc.tamper_block(5, "Y");
        assert_eq!(bc.chain, before);
        assert!(bc.is_valid_chain());

        bc.tamper_block(1, "X");
        assert!(!bc.is_valid_chain());
    }

    #[test]
    fn try_tamper_reports_out_of_range() {
        let mut bc = chain(1);
        bc.add_block("A").unwrap();

        let err = bc.try_tamper_block(2, "Y").unwrap_err();
        assert_eq!(err, ChainError::IndexOutOfRange { index: 2, len: 2 });
        assert_eq!(err.to_string(), "block index 2 out of range (chain length 2)");
        assert!(bc.is_valid_chain());
    }

    #[test]
    fn tampering_the_tip_goes_unnoticed() {
        let mut bc = chain(1);
        bc.add_block("A").unwrap();
        bc.add_block("B").unwrap();

        bc.tamper_block(2, "forged");

        // No successor references the tip, and difficulty is not re-checked.
        assert!(bc.is_valid_chain());
    }

    #[test]
    fn tampering_genesis_breaks_first_link() {
        let mut bc = chain(1);
        bc.add_block("A").unwrap();

        bc.tamper_block(0, "rewritten history");

        assert_eq!(bc.verify(), Err(ChainError::BrokenLink { index: 1 }));
    }

    #[test]
    fn genesis_contents_are_not_checked() {
        let mut bc = chain(1);
        bc.add_block("A").unwrap();

        // Stale genesis hash: link to block 1 still matches the stored value.
        bc.chain[0].transactions = "edited without rehash".into();

        assert!(!bc.chain[0].has_valid_hash());
        assert!(bc.is_valid_chain());
    }

    #[test]
    fn unhashed_edit_is_a_hash_mismatch() {
        let mut bc = chain(1);
        bc.add_block("A").unwrap();
        bc.add_block("B").unwrap();

        bc.chain[1].transactions = "edited without rehash".into();

        assert_eq!(bc.verify(), Err(ChainError::HashMismatch { index: 1 }));
    }

    #[test]
    fn read_access() {
        let mut bc = chain(1);
        bc.add_block("A").unwrap();

        assert_eq!(bc.blocks().len(), 2);
        assert_eq!(bc.get(1).map(|b| b.transactions.as_str()), Some("A"));
        assert!(bc.get(2).is_none());
        assert_eq!(bc.difficulty(), 1);
        assert!(!bc.is_empty());
    }
}
