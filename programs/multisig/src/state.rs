//! Account state for the registry, treasury reference, and propositions.
//!
//! The business rules live here as methods on the account types so the
//! instruction handlers stay thin and the rules stay unit-testable.

use anchor_lang::prelude::*;

use crate::constants::{MAX_COMPANY_ID_LEN, MAX_INSTRUCTION_DATA_LEN, MAX_TRANSACTION_ACCOUNTS, MAX_USERS};
use crate::error::MultisigError;
use crate::role::{Role, RoleSet};

/// Per-company registry: users with their roles, the approval threshold,
/// and the treasury reference.
#[account]
#[derive(InitSpace)]
pub struct MultiSigAccount {
    /// External company identifier; immutable, also a PDA seed.
    #[max_len(MAX_COMPANY_ID_LEN)]
    pub company_id: String,

    /// Registered users; keys unique, insertion-ordered.
    #[max_len(MAX_USERS)]
    pub users: Vec<UserInfo>,

    /// Minimum affirmative votes required before execution.
    pub threshold: u8,

    /// Sequence number of the next proposition; +1 per successful propose.
    pub transaction_count: u8,

    /// Treasury PDA holding pooled lamports.
    pub treasury: Pubkey,
    pub treasury_bump: u8,
    pub bump: u8,
}

/// One registered user and the roles they hold.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, InitSpace, Debug, PartialEq, Eq)]
pub struct UserInfo {
    pub key: Pubkey,
    pub roles: RoleSet,
}

impl MultiSigAccount {
    /// Company ids are non-empty external identifiers that must fit the
    /// allocated account space.
    pub fn validate_company_id(company_id: &str) -> Result<()> {
        require!(
            !company_id.is_empty() && company_id.len() <= MAX_COMPANY_ID_LEN,
            MultisigError::InvalidCompanyId
        );
        Ok(())
    }

    pub fn user(&self, key: &Pubkey) -> Option<&UserInfo> {
        self.users.iter().find(|user| user.key == *key)
    }

    pub fn has_role(&self, key: &Pubkey, role: Role) -> bool {
        self.user(key).is_some_and(|user| user.roles.contains(role))
    }

    /// Fails with `UserNotAuthorized` unless `key` is registered and holds `role`.
    pub fn require_role(&self, key: &Pubkey, role: Role) -> Result<()> {
        require!(self.has_role(key, role), MultisigError::UserNotAuthorized);
        Ok(())
    }

    /// Number of live users holding the Approver role.
    pub fn approver_count(&self) -> usize {
        self.users
            .iter()
            .filter(|user| user.roles.contains(Role::Approver))
            .count()
    }

    pub fn add_user(&mut self, key: Pubkey, roles: RoleSet) -> Result<()> {
        require!(self.users.len() < MAX_USERS, MultisigError::MaxUsersReached);
        require!(self.user(&key).is_none(), MultisigError::UserAlreadyExists);
        self.users.push(UserInfo { key, roles });
        Ok(())
    }

    /// Removes `key`. Rejected if dropping an Approver would leave the
    /// threshold above the remaining Approver count.
    pub fn remove_user(&mut self, key: &Pubkey) -> Result<()> {
        let index = self
            .users
            .iter()
            .position(|user| user.key == *key)
            .ok_or(MultisigError::UserNotFound)?;
        if self.users[index].roles.contains(Role::Approver) {
            require!(
                self.approver_count() - 1 >= usize::from(self.threshold),
                MultisigError::ThresholdOverflow
            );
        }
        self.users.remove(index);
        Ok(())
    }

    /// Replaces `key`'s role mask wholesale. Clearing the Approver bit is
    /// subject to the same threshold check as removal.
    pub fn update_permission(&mut self, key: &Pubkey, roles: RoleSet) -> Result<()> {
        let index = self
            .users
            .iter()
            .position(|user| user.key == *key)
            .ok_or(MultisigError::UserNotFound)?;
        let was_approver = self.users[index].roles.contains(Role::Approver);
        if was_approver && !roles.contains(Role::Approver) {
            require!(
                self.approver_count() - 1 >= usize::from(self.threshold),
                MultisigError::ThresholdOverflow
            );
        }
        self.users[index].roles = roles;
        Ok(())
    }

    pub fn update_threshold(&mut self, value: u8) -> Result<()> {
        require!(
            value >= 1 && usize::from(value) <= self.approver_count(),
            MultisigError::ThresholdOverflow
        );
        self.threshold = value;
        Ok(())
    }

    /// Returns the sequence number for the proposition being created and
    /// advances the counter by exactly one.
    pub fn next_sequence(&mut self) -> Result<u8> {
        let sequence = self.transaction_count;
        self.transaction_count = sequence
            .checked_add(1)
            .ok_or(MultisigError::TransactionLimitReached)?;
        Ok(sequence)
    }
}

/// The action a proposition requests.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, InitSpace, Debug, PartialEq, Eq)]
pub enum ProposalType {
    /// Move `amount` lamports from the treasury to `destination`.
    Transfer { destination: Pubkey, amount: u64 },
    /// Forward a recorded instruction to `program_id`, signed by the
    /// treasury PDA.
    Generic {
        program_id: Pubkey,
        #[max_len(MAX_TRANSACTION_ACCOUNTS)]
        accounts: Vec<TransactionAccount>,
        #[max_len(MAX_INSTRUCTION_DATA_LEN)]
        data: Vec<u8>,
    },
}

impl ProposalType {
    /// Shape check applied at proposal time so execution never forwards
    /// something the account could not have stored faithfully.
    pub fn validate(&self) -> Result<()> {
        match self {
            ProposalType::Transfer { amount, .. } => {
                require!(*amount > 0, MultisigError::InvalidTransferAmount);
            }
            ProposalType::Generic { accounts, data, .. } => {
                require!(
                    accounts.len() <= MAX_TRANSACTION_ACCOUNTS
                        && data.len() <= MAX_INSTRUCTION_DATA_LEN,
                    MultisigError::InvalidProgramInstruction
                );
            }
        }
        Ok(())
    }
}

/// Account descriptor recorded by a generic proposal.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, InitSpace, Debug, PartialEq, Eq)]
pub struct TransactionAccount {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

/// One vote on a proposition.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, InitSpace, Debug, PartialEq, Eq)]
pub struct VoteRecord {
    pub key: Pubkey,
    pub approved: bool,
}

/// A proposed action and its accumulated votes.
#[account]
#[derive(InitSpace)]
pub struct Proposition {
    /// Creator; held the Proposer role at creation time.
    pub proposer: Pubkey,

    pub proposal_type: ProposalType,

    /// Votes in insertion order; one per user, immutable once cast.
    #[max_len(MAX_USERS)]
    pub signers: Vec<VoteRecord>,

    /// Flips to true exactly once, after the underlying action succeeds.
    pub did_execute: bool,

    /// Registry sequence number this proposition was created under;
    /// re-derives the PDA.
    pub sequence: u8,
    pub bump: u8,
}

impl Proposition {
    /// Records a vote. One vote per user; no votes on executed propositions.
    pub fn record_vote(&mut self, key: Pubkey, approved: bool) -> Result<()> {
        require!(!self.did_execute, MultisigError::TransactionAlreadyExecuted);
        require!(
            !self.signers.iter().any(|vote| vote.key == key),
            MultisigError::UserAlreadyVoted
        );
        self.signers.push(VoteRecord { key, approved });
        Ok(())
    }

    pub fn affirmative_votes(&self) -> usize {
        self.signers.iter().filter(|vote| vote.approved).count()
    }

    pub fn require_quorum(&self, threshold: u8) -> Result<()> {
        require!(
            self.affirmative_votes() >= usize::from(threshold),
            MultisigError::InsufficientVotes
        );
        Ok(())
    }
}
