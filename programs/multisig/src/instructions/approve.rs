use anchor_lang::prelude::*;

use crate::constants::{PROJECT_SEED, PROPOSITION_SEED};
use crate::role::Role;
use crate::state::{MultiSigAccount, Proposition};

// ---------------------------------------------------------------------------
// Approve
// ---------------------------------------------------------------------------
// Records one immutable vote per Approver. Votes on an already executed
// proposition are rejected.
// ---------------------------------------------------------------------------

#[derive(Accounts)]
pub struct Approve<'info> {
    pub approver: Signer<'info>,

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
}

impl<'info> Approve<'info> {
    pub fn approve(&mut self, decision: bool) -> Result<()> {
        let approver = self.approver.key();
        self.multisig.require_role(&approver, Role::Approver)?;
        self.proposition.record_vote(approver, decision)?;

        msg!(
            "Vote {} by {}, {} affirmative of {} required",
            if decision { "yes" } else { "no" },
            approver,
            self.proposition.affirmative_votes(),
            self.multisig.threshold
        );
        Ok(())
    }
}
