use crate::config::LedgerConfig;
use crate::constants::{GENESIS_PAYLOAD, GENESIS_PREVIOUS_HASH};
use crate::error::{LedgerError, Result, ValidationCheck, ValidationMismatch};
use crate::hashing::HashStrategy;
use crate::pow::{check_difficulty, meets_difficulty, mine_block_until};
use crate::Block;
use serde::Serialize;
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Build a single-hash ledger. `None` or `Some(0)` disables mining.
pub fn create_ledger(difficulty: Option<u32>) -> Result<Ledger> {
    Ledger::new(LedgerConfig {
        difficulty,
        ..LedgerConfig::default()
    })
}

/// Append-only chain of finalized blocks, seeded with a genesis block.
///
/// Appends take `&mut self`, so there is only ever one writer, and validation
/// can never observe a half-built block.
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    difficulty: Option<u32>,
    max_mining_attempts: Option<u64>,
    strategy: Box<dyn HashStrategy>,
}

impl Ledger {
    pub fn new(config: LedgerConfig) -> Result<Self> {
        let strategy = config.hashing.build()?;
        Self::with_strategy(config.effective_difficulty(), strategy, config.max_mining_attempts)
    }

    pub fn with_strategy(
        difficulty: Option<u32>,
        strategy: Box<dyn HashStrategy>,
        max_mining_attempts: Option<u64>,
    ) -> Result<Self> {
        let difficulty = difficulty.filter(|d| *d > 0);
        if let Some(d) = difficulty {
            check_difficulty(d)?;
        }

        // Genesis carries no proof-of-work; it is finalized as-is.
        let mut genesis = Block::new(
            0,
            Value::String(GENESIS_PAYLOAD.to_string()),
            current_timestamp(),
            GENESIS_PREVIOUS_HASH,
            0,
        );
        genesis.hash = Some(strategy.finalize(&genesis)?);
        debug!(
            strategy = strategy.name(),
            ?difficulty,
            "created genesis block {}",
            hex::encode(genesis.hash.unwrap_or_default())
        );

        Ok(Self {
            chain: vec![genesis],
            difficulty,
            max_mining_attempts,
            strategy,
        })
    }

    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }

    pub fn genesis(&self) -> &Block {
        &self.chain[0]
    }

    pub fn head(&self) -> &Block {
        // never empty: genesis is pushed in the constructor
        &self.chain[self.chain.len() - 1]
    }

    pub fn difficulty(&self) -> Option<u32> {
        self.difficulty
    }

    pub fn strategy(&self) -> &dyn HashStrategy {
        self.strategy.as_ref()
    }

    /// Append `transactions` stamped with the current time.
    pub fn append_block<T>(&mut self, transactions: &T) -> Result<&Block>
    where
        T: Serialize + ?Sized,
    {
        self.append_block_at(transactions, current_timestamp())
    }

    /// Append `transactions` with a caller-supplied timestamp.
    ///
    /// On error the chain is left untouched.
    pub fn append_block_at<T>(&mut self, transactions: &T, timestamp: u64) -> Result<&Block>
    where
        T: Serialize + ?Sized,
    {
        let payload = serde_json::to_value(transactions)?;
        let head = self.head();
        let previous_hash = head.hash.ok_or_else(|| LedgerError::Finalization {
            index: head.index,
            reason: "head block has no hash".to_string(),
        })?;
        let index = self.chain.len() as u64;

        let mut block = Block::new(index, payload, timestamp, previous_hash, 0);
        if let Some(difficulty) = self.difficulty {
            let cap = self.max_mining_attempts;
            block = mine_block_until(block, difficulty, self.strategy(), |attempts| {
                cap.is_some_and(|max| attempts >= max)
            })?;
        }
        block.hash = Some(self.strategy.finalize(&block)?);

        info!(
            "Appended block {} (nonce {}) hash {}",
            block.index,
            block.nonce,
            block.hash_hex().unwrap_or_default()
        );
        self.chain.push(block);
        Ok(self.head())
    }

    /// Walk the chain from block 1 and report the first failing block and check.
    pub fn validate(&self) -> std::result::Result<(), ValidationMismatch> {
        validate_chain(&self.chain, self.difficulty, self.strategy())
    }

    pub fn is_chain_valid(&self) -> bool {
        match self.validate() {
            Ok(()) => true,
            Err(mismatch) => {
                warn!("Validation failed: {mismatch}");
                false
            }
        }
    }
}

/// Check `blocks` as a chain produced under `difficulty` and `strategy`.
///
/// Blocks are visited in order starting at index 1 and each one is checked
/// for its position, its proof of work, its stored hash and its link to the
/// predecessor, in that order. The genesis block is trusted.
pub fn validate_chain(
    blocks: &[Block],
    difficulty: Option<u32>,
    strategy: &dyn HashStrategy,
) -> std::result::Result<(), ValidationMismatch> {
    let difficulty = difficulty.unwrap_or(0);
    for (position, pair) in blocks.windows(2).enumerate() {
        let (previous, current) = (&pair[0], &pair[1]);
        let fail = |check| ValidationMismatch {
            index: current.index,
            check,
        };

        if current.index != position as u64 + 1 {
            return Err(fail(ValidationCheck::Index));
        }

        if !meets_difficulty(&strategy.proof_hash(current), difficulty) {
            return Err(fail(ValidationCheck::ProofOfWork));
        }

        match strategy.finalize(current) {
            Ok(recomputed) if current.hash == Some(recomputed) => {}
            Ok(_) => return Err(fail(ValidationCheck::FinalizedHash)),
            Err(e) => {
                debug!("recomputing hash of block {} failed: {e}", current.index);
                return Err(fail(ValidationCheck::FinalizedHash));
            }
        }

        if previous.hash != Some(current.previous_hash) {
            return Err(fail(ValidationCheck::PreviousHash));
        }
    }
    Ok(())
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
