use crate::error::Result;
use crate::hashing::{Argon2Finalizer, HashStrategy, SingleHash};
use serde::{Deserialize, Serialize};

/// Ledger settings. The default is single-hash linking with no mining.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedgerConfig {
    /// Leading zero hex digits required of every proof hash. `None` and `0`
    /// both disable mining.
    pub difficulty: Option<u32>,
    pub hashing: HashingConfig,
    /// Give up on an append after this many mining attempts.
    pub max_mining_attempts: Option<u64>,
}

impl LedgerConfig {
    pub fn with_difficulty(difficulty: u32) -> Self {
        Self {
            difficulty: Some(difficulty),
            ..Self::default()
        }
    }

    /// Difficulty with `Some(0)` folded into `None`.
    pub fn effective_difficulty(&self) -> Option<u32> {
        self.difficulty.filter(|d| *d > 0)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum HashingConfig {
    #[default]
    Single,
    Argon2 {
        #[serde(default)]
        key: String,
        #[serde(default = "default_memory_kib")]
        memory_kib: u32,
        #[serde(default = "default_iterations")]
        iterations: u32,
        #[serde(default = "default_parallelism")]
        parallelism: u32,
    },
}

fn default_memory_kib() -> u32 {
    argon2::Params::DEFAULT_M_COST
}

fn default_iterations() -> u32 {
    argon2::Params::DEFAULT_T_COST
}

fn default_parallelism() -> u32 {
    argon2::Params::DEFAULT_P_COST
}

impl HashingConfig {
    /// Argon2 with the library's default costs and the given key.
    pub fn argon2(key: impl Into<String>) -> Self {
        HashingConfig::Argon2 {
            key: key.into(),
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }

    pub fn build(&self) -> Result<Box<dyn HashStrategy>> {
        match self {
            HashingConfig::Single => Ok(Box::new(SingleHash)),
            HashingConfig::Argon2 {
                key,
                memory_kib,
                iterations,
                parallelism,
            } => Ok(Box::new(Argon2Finalizer::new(
                *memory_kib,
                *iterations,
                *parallelism,
                key.as_bytes().to_vec(),
            )?)),
        }
    }
}
