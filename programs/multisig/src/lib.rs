//! Multisig treasury program
//!
//! A per-company registry of users with role bitmasks governs who may
//! propose, vote on, and execute fund releases from a treasury PDA,
//! subject to a configurable approval threshold.

#![allow(unexpected_cfgs)]

use anchor_lang::prelude::*;

pub mod constants;
pub mod error;
pub mod instructions;
pub mod role;
pub mod state;

pub use constants::*;
use instructions::*;
pub use role::*;
pub use state::*;

declare_id!("CyCee1ukFyDgRndFMW84d2nstCktbyUBzkpMVcHgX28d");

#[program]
pub mod multisig {
    use super::*;

    /// Create the registry and treasury PDAs for a company. The creator
    /// becomes the sole user and holds every role; threshold starts at 1.
    pub fn initialize_project(ctx: Context<InitializeProject>, company_id: String) -> Result<()> {
        ctx.accounts.initialize(&ctx.bumps, company_id)
    }

    /// Register a new user with the given roles. Owner only.
    pub fn add_user(ctx: Context<AdminOp>, user: Pubkey, roles: Vec<Role>) -> Result<()> {
        ctx.accounts.add_user(user, roles)
    }

    /// Remove a user. Owner only; rejected if the threshold would exceed
    /// the remaining Approver count.
    pub fn remove_user(ctx: Context<AdminOp>, user: Pubkey) -> Result<()> {
        ctx.accounts.remove_user(user)
    }

    /// Replace a user's role mask wholesale. Owner only.
    pub fn update_permission(ctx: Context<AdminOp>, user: Pubkey, roles: Vec<Role>) -> Result<()> {
        ctx.accounts.update_permission(user, roles)
    }

    /// Change the approval threshold. Owner only; bounded by the live
    /// Approver count.
    pub fn update_threshold(ctx: Context<AdminOp>, value: u8) -> Result<()> {
        ctx.accounts.update_threshold(value)
    }

    /// Create a proposition. Proposer only; advances the registry's
    /// sequence counter by exactly one.
    pub fn propose(ctx: Context<Propose>, proposal_type: ProposalType) -> Result<()> {
        ctx.accounts.propose(&ctx.bumps, proposal_type)
    }

    /// Vote on a proposition. Approver only; one immutable vote per user.
    pub fn approve(ctx: Context<Approve>, decision: bool) -> Result<()> {
        ctx.accounts.approve(decision)
    }

    /// Execute a proposition once affirmative votes reach the threshold.
    /// Executor only. The accounts the underlying action touches are
    /// passed as remaining accounts.
    pub fn execute<'info>(ctx: Context<'_, '_, 'info, 'info, Execute<'info>>) -> Result<()> {
        ctx.accounts.execute(ctx.remaining_accounts)
    }
}
