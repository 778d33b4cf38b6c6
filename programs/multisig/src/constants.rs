//! PDA seed tags and capacity limits

/// Seed tag for the per-company registry PDA.
pub const PROJECT_SEED: &[u8] = b"project";

/// Seed tag for the treasury PDA holding pooled lamports.
pub const TREASURY_SEED: &[u8] = b"treasury";

/// Seed tag for proposition PDAs.
pub const PROPOSITION_SEED: &[u8] = b"proposition";

/// Anchor account discriminator size.
pub const ANCHOR_DISCRIMINATOR_SIZE: usize = 8;

/// Company identifiers are external database ids, at most 24 bytes.
pub const MAX_COMPANY_ID_LEN: usize = 24;

/// Maximum number of registered users per company.
pub const MAX_USERS: usize = 20;

/// Maximum number of accounts a generic proposal may record.
pub const MAX_TRANSACTION_ACCOUNTS: usize = 8;

/// Maximum instruction data length for a generic proposal.
pub const MAX_INSTRUCTION_DATA_LEN: usize = 256;
