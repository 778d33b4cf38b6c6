use anchor_lang::prelude::*;

use crate::constants::{ANCHOR_DISCRIMINATOR_SIZE, PROJECT_SEED, TREASURY_SEED};
use crate::role::RoleSet;
use crate::state::{MultiSigAccount, UserInfo};

// ---------------------------------------------------------------------------
// Initialize Project
// ---------------------------------------------------------------------------
// Creates the registry PDA and the data-less treasury PDA for a company.
// The creator becomes the only user and holds every role, so the registry
// starts with threshold 1 satisfied.
// ---------------------------------------------------------------------------

#[derive(Accounts)]
#[instruction(company_id: String)]
pub struct InitializeProject<'info> {
    #[account(mut)]
    pub signer: Signer<'info>,

    #[account(
        init,
        payer = signer,
        space = ANCHOR_DISCRIMINATOR_SIZE + MultiSigAccount::INIT_SPACE,
        seeds = [PROJECT_SEED, company_id.as_bytes()],
        bump,
    )]
    pub multisig: Account<'info, MultiSigAccount>,

    /// CHECK: data-less PDA that only holds lamports; debited by `execute`
    /// and used as the CPI signer for generic proposals.
    #[account(
        init,
        payer = signer,
        space = 0,
        seeds = [TREASURY_SEED, company_id.as_bytes()],
        bump,
    )]
    pub treasury: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

impl<'info> InitializeProject<'info> {
    pub fn initialize(
        &mut self,
        bumps: &InitializeProjectBumps,
        company_id: String,
    ) -> Result<()> {
        MultiSigAccount::validate_company_id(&company_id)?;

        let multisig = &mut self.multisig;
        multisig.company_id = company_id;
        multisig.users.push(UserInfo {
            key: self.signer.key(),
            roles: RoleSet::ALL,
        });
        multisig.threshold = 1;
        multisig.transaction_count = 0;
        multisig.treasury = self.treasury.key();
        multisig.treasury_bump = bumps.treasury;
        multisig.bump = bumps.multisig;

        msg!(
            "Registry {} created, treasury {}",
            multisig.company_id,
            multisig.treasury
        );
        Ok(())
    }
}
