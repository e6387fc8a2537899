pub const HASH_SIZE: usize = 32;
pub const HASH_HEX_SIZE: usize = HASH_SIZE * 2;

/// `previous_hash` of the genesis block.
pub const GENESIS_PREVIOUS_HASH: [u8; HASH_SIZE] = [0u8; HASH_SIZE];
pub const GENESIS_PAYLOAD: &str = "Genesis Block";

/// Fixed salt for the Argon2 finalizer; the per-ledger secret key does the keying.
pub const ARGON2_DOMAIN_SALT: &[u8] = b"ledger-core/finalize/v1";

pub const DEMO_DIFFICULTY: u32 = 4;
