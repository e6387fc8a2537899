use std::fmt;
use thiserror::Error;

/// Errors raised while building a ledger or appending to it.
///
/// A failed append never leaves a partial block behind: the candidate is
/// dropped and the chain is exactly as it was before the call.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to finalize hash of block {index}: {reason}")]
    Finalization { index: u64, reason: String },

    #[error("payload is not representable as JSON: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("difficulty {difficulty} exceeds the {max} hex digits of a block hash")]
    InvalidDifficulty { difficulty: u32, max: u32 },

    #[error("mining block {index} stopped after {attempts} attempts")]
    MiningAborted { index: u64, attempts: u64 },

    #[error("invalid ledger configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

/// The check that rejected a block during chain validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationCheck {
    /// Stored index differs from the block's position. Runs before the
    /// proof-of-work, stored-hash and link checks, so a reordered chain is
    /// reported here rather than as a broken link.
    Index,
    /// Recomputed proof hash misses the configured difficulty.
    ProofOfWork,
    /// Recomputed finalized hash differs from the stored hash.
    FinalizedHash,
    /// `previous_hash` differs from the predecessor's hash.
    PreviousHash,
}

impl fmt::Display for ValidationCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValidationCheck::Index => "index",
            ValidationCheck::ProofOfWork => "proof-of-work",
            ValidationCheck::FinalizedHash => "hash",
            ValidationCheck::PreviousHash => "previous hash",
        };
        f.write_str(name)
    }
}

/// First failure found by [`crate::chain::validate_chain`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("block {index} failed {check} check")]
pub struct ValidationMismatch {
    pub index: u64,
    pub check: ValidationCheck,
}
