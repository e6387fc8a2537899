use crate::constants::HASH_HEX_SIZE;
use crate::error::{LedgerError, Result};
use crate::hashing::HashStrategy;
use crate::{Block, Hash};
use tracing::info;

/// Number of leading `0` characters in the lowercase hex rendering of `hash`.
pub fn leading_zero_hex_digits(hash: &Hash) -> u32 {
    let mut total = 0u32;
    for b in hash {
        if *b == 0 {
            total += 2;
        } else {
            if *b < 0x10 {
                total += 1;
            }
            break;
        }
    }
    total
}

pub fn meets_difficulty(hash: &Hash, difficulty: u32) -> bool {
    leading_zero_hex_digits(hash) >= difficulty
}

/// Difficulties above the digest width can never be met.
pub fn check_difficulty(difficulty: u32) -> Result<()> {
    let max = HASH_HEX_SIZE as u32;
    if difficulty > max {
        return Err(LedgerError::InvalidDifficulty { difficulty, max });
    }
    Ok(())
}

/// Mine the block by incrementing the nonce until its proof hash starts with
/// `difficulty` zero hex digits. Runs until a nonce is found.
pub fn mine_block(mut block: Block, difficulty: u32, strategy: &dyn HashStrategy) -> Block {
    loop {
        if meets_difficulty(&strategy.proof_hash(&block), difficulty) {
            return block;
        }
        block.nonce = block.nonce.wrapping_add(1);
    }
}

/// Same search as [`mine_block`], but `stop` is asked after every miss with
/// the number of attempts made so far and ends the search when it returns
/// `true`.
pub fn mine_block_until<F>(
    mut block: Block,
    difficulty: u32,
    strategy: &dyn HashStrategy,
    mut stop: F,
) -> Result<Block>
where
    F: FnMut(u64) -> bool,
{
    let mut attempts = 0u64;
    loop {
        let proof = strategy.proof_hash(&block);
        attempts += 1;
        if meets_difficulty(&proof, difficulty) {
            info!(
                "Mined block {} with nonce {} after {} attempts, proof {}",
                block.index,
                block.nonce,
                attempts,
                hex::encode(proof)
            );
            return Ok(block);
        }
        if stop(attempts) {
            return Err(LedgerError::MiningAborted {
                index: block.index,
                attempts,
            });
        }
        block.nonce = block.nonce.wrapping_add(1);
    }
}
