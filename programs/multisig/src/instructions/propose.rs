use anchor_lang::prelude::*;

use crate::constants::{ANCHOR_DISCRIMINATOR_SIZE, PROJECT_SEED, PROPOSITION_SEED};
use crate::role::Role;
use crate::state::{MultiSigAccount, ProposalType, Proposition};

// ---------------------------------------------------------------------------
// Propose
// ---------------------------------------------------------------------------
// Creates a proposition PDA keyed by the registry's current sequence number
// and advances the counter. Both happen inside this one instruction, so the
// pair is atomic from the caller's point of view.
// ---------------------------------------------------------------------------

#[derive(Accounts)]
pub struct Propose<'info> {
    #[account(mut)]
    pub proposer: Signer<'info>,

    #[account(
        mut,
        seeds = [PROJECT_SEED, multisig.company_id.as_bytes()],
        bump = multisig.bump,
    )]
    pub multisig: Account<'info, MultiSigAccount>,

    #[account(
        init,
        payer = proposer,
        space = ANCHOR_DISCRIMINATOR_SIZE + Proposition::INIT_SPACE,
        seeds = [
            PROPOSITION_SEED,
            multisig.key().as_ref(),
            &[multisig.transaction_count],
        ],
        bump,
    )]
    pub proposition: Account<'info, Proposition>,

    pub system_program: Program<'info, System>,
}

impl<'info> Propose<'info> {
    pub fn propose(&mut self, bumps: &ProposeBumps, proposal_type: ProposalType) -> Result<()> {
        self.multisig
            .require_role(&self.proposer.key(), Role::Proposer)?;
        proposal_type.validate()?;

        let sequence = self.multisig.next_sequence()?;

        let proposition = &mut self.proposition;
        proposition.proposer = self.proposer.key();
        proposition.proposal_type = proposal_type;
        proposition.signers = Vec::new();
        proposition.did_execute = false;
        proposition.sequence = sequence;
        proposition.bump = bumps.proposition;

        msg!(
            "Proposition {} created by {}",
            sequence,
            proposition.proposer
        );
        Ok(())
    }
}
