use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::solana_program::program::invoke_signed;

use crate::constants::{PROJECT_SEED, PROPOSITION_SEED, TREASURY_SEED};
use crate::error::MultisigError;
use crate::role::Role;
use crate::state::{MultiSigAccount, ProposalType, Proposition, TransactionAccount};

// ---------------------------------------------------------------------------
// Execute
// ---------------------------------------------------------------------------
// Releases funds (or forwards the recorded instruction) once quorum is met.
// The accounts the underlying action touches arrive as remaining accounts
// and are validated against the recorded descriptors before dispatch.
// `did_execute` flips only after the action itself succeeds, so a failed
// dispatch leaves the proposition open for retry.
// ---------------------------------------------------------------------------

#[derive(Accounts)]
pub struct Execute<'info> {
    pub executor: Signer<'info>,

    #[account(
        seeds = [PROJECT_SEED, multisig.company_id.as_bytes()],
        bump = multisig.bump,
    )]
    pub multisig: Account<'info, MultiSigAccount>,

    #[account(
        mut,
        seeds = [
            PROPOSITION_SEED,
            multisig.key().as_ref(),
            &[proposition.sequence],
        ],
        bump = proposition.bump,
    )]
    pub proposition: Account<'info, Proposition>,

    /// CHECK: data-less vault PDA; the seeds plus the stored key pin it to
    /// this registry.
    #[account(
        mut,
        seeds = [TREASURY_SEED, multisig.company_id.as_bytes()],
        bump = multisig.treasury_bump,
        constraint = treasury.key() == multisig.treasury @ MultisigError::InvalidTreasury,
    )]
    pub treasury: UncheckedAccount<'info>,
}

/// Checks one recorded descriptor against the flags of the supplied account
/// (`None` when no remaining account carries the recorded key). The treasury
/// PDA is exempt from the signer requirement: it signs via seeds.
fn match_recorded_account(
    recorded: &TransactionAccount,
    supplied: Option<(bool, bool)>,
    treasury: &Pubkey,
) -> Result<()> {
    let (is_signer, is_writable) = supplied.ok_or(MultisigError::MissingAccount)?;
    let signer_satisfied = !recorded.is_signer || is_signer || recorded.pubkey == *treasury;
    require!(signer_satisfied, MultisigError::AccountMismatch);
    require!(
        !recorded.is_writable || is_writable,
        MultisigError::AccountMismatch
    );
    Ok(())
}

impl<'info> Execute<'info> {
    pub fn execute(&mut self, remaining: &[AccountInfo<'info>]) -> Result<()> {
        self.multisig
            .require_role(&self.executor.key(), Role::Executor)?;
        require!(
            !self.proposition.did_execute,
            MultisigError::TransactionAlreadyExecuted
        );
        self.proposition.require_quorum(self.multisig.threshold)?;

        match self.proposition.proposal_type.clone() {
            ProposalType::Transfer {
                destination,
                amount,
            } => self.transfer(destination, amount, remaining)?,
            ProposalType::Generic {
                program_id,
                accounts,
                data,
            } => self.forward(program_id, &accounts, &data, remaining)?,
        }

        self.proposition.did_execute = true;
        msg!("Proposition {} executed", self.proposition.sequence);
        Ok(())
    }

    /// Moves lamports out of the program-owned treasury by direct balance
    /// mutation; only the owning program may debit it.
    fn transfer(
        &self,
        destination: Pubkey,
        amount: u64,
        remaining: &[AccountInfo<'info>],
    ) -> Result<()> {
        let destination_info = remaining
            .iter()
            .find(|info| info.key() == destination)
            .ok_or(MultisigError::MissingAccount)?;
        require!(destination_info.is_writable, MultisigError::AccountMismatch);

        let treasury_info = self.treasury.to_account_info();
        let mut treasury_lamports = treasury_info.try_borrow_mut_lamports()?;
        require!(
            **treasury_lamports >= amount,
            MultisigError::InsufficientTreasuryFunds
        );
        let mut destination_lamports = destination_info.try_borrow_mut_lamports()?;

        **treasury_lamports = treasury_lamports
            .checked_sub(amount)
            .ok_or(MultisigError::InsufficientTreasuryFunds)?;
        **destination_lamports = destination_lamports
            .checked_add(amount)
            .ok_or(MultisigError::InvalidCalculation)?;
        Ok(())
    }

    /// Rebuilds the recorded instruction and forwards it with the treasury
    /// PDA as signer. Every recorded account must be present with matching
    /// flags; unknown shapes are rejected, never forwarded.
    fn forward(
        &self,
        program_id: Pubkey,
        accounts: &[TransactionAccount],
        data: &[u8],
        remaining: &[AccountInfo<'info>],
    ) -> Result<()> {
        let treasury_key = self.treasury.key();
        let mut metas = Vec::with_capacity(accounts.len());
        let mut infos = Vec::with_capacity(accounts.len() + 1);

        for recorded in accounts {
            let supplied = remaining.iter().find(|info| info.key() == recorded.pubkey);
            match_recorded_account(
                recorded,
                supplied.map(|info| (info.is_signer, info.is_writable)),
                &treasury_key,
            )?;
            let info = supplied.ok_or(MultisigError::MissingAccount)?;
            metas.push(AccountMeta {
                pubkey: recorded.pubkey,
                is_signer: recorded.is_signer,
                is_writable: recorded.is_writable,
            });
            infos.push(info.clone());
        }

        let program_info = remaining
            .iter()
            .find(|info| info.key() == program_id)
            .ok_or(MultisigError::MissingAccount)?;
        infos.push(program_info.clone());

        let instruction = Instruction {
            program_id,
            accounts: metas,
            data: data.to_vec(),
        };
        let company_id = self.multisig.company_id.as_bytes();
        let seeds: &[&[u8]] = &[
            TREASURY_SEED,
            company_id,
            &[self.multisig.treasury_bump],
        ];
        invoke_signed(&instruction, &infos, &[seeds])?;
        Ok(())
    }
}
