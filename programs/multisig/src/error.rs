//! Error definitions

use anchor_lang::prelude::*;

#[error_code]
pub enum MultisigError {
    #[msg("User not authorized")]
    UserNotAuthorized,
    #[msg("User already exists")]
    UserAlreadyExists,
    #[msg("User does not exist")]
    UserNotFound,
    #[msg("Threshold value is more than approver count")]
    ThresholdOverflow,
    #[msg("User has already voted")]
    UserAlreadyVoted,
    #[msg("Required vote count is not met")]
    InsufficientVotes,
    #[msg("This transaction already executed")]
    TransactionAlreadyExecuted,
    #[msg("Invalid treasury key")]
    InvalidTreasury,
    #[msg("Invalid transfer amount")]
    InvalidTransferAmount,
    #[msg("Insufficient funds in treasury for action")]
    InsufficientTreasuryFunds,
    #[msg("Lamport balance calculation overflowed")]
    InvalidCalculation,
    #[msg("User limit reached")]
    MaxUsersReached,
    #[msg("Transaction sequence number exhausted")]
    TransactionLimitReached,
    #[msg("Invalid company id")]
    InvalidCompanyId,
    #[msg("Invalid program instruction")]
    InvalidProgramInstruction,
    #[msg("Recorded account missing from instruction")]
    MissingAccount,
    #[msg("Supplied account does not match recorded account")]
    AccountMismatch,
}
