use ledger_core::{HashingConfig, Ledger, LedgerConfig};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct Transfer {
    pub from: String,
    pub to: String,
    pub amount: u64,
}

pub fn random_transfers(rng: &mut StdRng, count: usize) -> Vec<Transfer> {
    (0..count)
        .map(|i| Transfer {
            from: format!("user-{}", rng.gen_range(0..100)),
            to: format!("user-{i}"),
            amount: rng.gen_range(1..1_000),
        })
        .collect()
}

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// Argon2 costs small enough to keep tests fast.
pub fn cheap_argon2(key: &str) -> HashingConfig {
    HashingConfig::Argon2 {
        key: key.to_string(),
        memory_kib: 64,
        iterations: 1,
        parallelism: 1,
    }
}

pub fn ledger_with(difficulty: Option<u32>, hashing: HashingConfig) -> Ledger {
    Ledger::new(LedgerConfig {
        difficulty,
        hashing,
        max_mining_attempts: None,
    })
    .expect("Failed to create ledger")
}
