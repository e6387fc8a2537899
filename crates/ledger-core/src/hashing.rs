//! How a block's proof hash and finalized hash are produced.
//!
//! Mining always searches on the cheap SHA-256 proof hash. The strategy then
//! decides what becomes the block's stored identity: the proof hash itself
//! ([`SingleHash`]) or a second, keyed Argon2id digest of the same bytes
//! ([`Argon2Finalizer`]).

use crate::constants::{ARGON2_DOMAIN_SALT, HASH_SIZE};
use crate::error::{LedgerError, Result};
use crate::{Block, Hash};
use argon2::{Algorithm, Argon2, Params, Version};
use std::fmt;

pub trait HashStrategy: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    /// Hash checked against the difficulty target.
    fn proof_hash(&self, block: &Block) -> Hash {
        block.compute_hash()
    }

    /// Hash stored on the block once it is accepted.
    fn finalize(&self, block: &Block) -> Result<Hash>;
}

/// Stores the proof hash as the block hash.
#[derive(Clone, Copy, Debug, Default)]
pub struct SingleHash;

impl HashStrategy for SingleHash {
    fn name(&self) -> &'static str {
        "single"
    }

    fn finalize(&self, block: &Block) -> Result<Hash> {
        Ok(self.proof_hash(block))
    }
}

/// Argon2id over the canonical block bytes, keyed with an optional secret.
#[derive(Clone)]
pub struct Argon2Finalizer {
    params: Params,
    secret: Vec<u8>,
}

impl Argon2Finalizer {
    /// `memory_kib`, `iterations` and `parallelism` are the usual Argon2
    /// m/t/p costs. Rejects combinations Argon2 itself would refuse.
    pub fn new(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
        secret: Vec<u8>,
    ) -> Result<Self> {
        let params = Params::new(memory_kib, iterations, parallelism, Some(HASH_SIZE))
            .map_err(|e| LedgerError::Config(format!("argon2 parameters: {e}")))?;
        // Surface a bad secret here rather than on the first append.
        Argon2::new_with_secret(&secret, Algorithm::Argon2id, Version::V0x13, params.clone())
            .map_err(|e| LedgerError::Config(format!("argon2 secret: {e}")))?;
        Ok(Self { params, secret })
    }

    pub fn with_default_costs(secret: Vec<u8>) -> Result<Self> {
        Self::new(
            Params::DEFAULT_M_COST,
            Params::DEFAULT_T_COST,
            Params::DEFAULT_P_COST,
            secret,
        )
    }
}

impl fmt::Debug for Argon2Finalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Argon2Finalizer")
            .field("m_cost", &self.params.m_cost())
            .field("t_cost", &self.params.t_cost())
            .field("p_cost", &self.params.p_cost())
            .field("keyed", &!self.secret.is_empty())
            .finish()
    }
}

impl HashStrategy for Argon2Finalizer {
    fn name(&self) -> &'static str {
        "argon2"
    }

    fn finalize(&self, block: &Block) -> Result<Hash> {
        let failed = |e: argon2::Error| LedgerError::Finalization {
            index: block.index,
            reason: e.to_string(),
        };
        let argon2 = Argon2::new_with_secret(
            &self.secret,
            Algorithm::Argon2id,
            Version::V0x13,
            self.params.clone(),
        )
        .map_err(failed)?;

        let mut out = [0u8; HASH_SIZE];
        argon2
            .hash_password_into(&block.hash_bytes(), ARGON2_DOMAIN_SALT, &mut out)
            .map_err(failed)?;
        Ok(out)
    }
}
