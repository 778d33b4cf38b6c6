use anchor_lang::prelude::*;

use crate::constants::PROJECT_SEED;
use crate::role::{Role, RoleSet};
use crate::state::MultiSigAccount;

// ---------------------------------------------------------------------------
// Registry administration
// ---------------------------------------------------------------------------
// add_user / remove_user / update_permission / update_threshold share one
// account shape: an Owner signer and the registry. The threshold invariant
// (threshold <= live Approver count) is enforced by the state methods; any
// mutation that would break it is rejected whole.
// ---------------------------------------------------------------------------

#[derive(Accounts)]
pub struct AdminOp<'info> {
    pub signer: Signer<'info>,

    #[account(
        mut,
        seeds = [PROJECT_SEED, multisig.company_id.as_bytes()],
        bump = multisig.bump,
    )]
    pub multisig: Account<'info, MultiSigAccount>,
}

impl<'info> AdminOp<'info> {
    fn require_owner(&self) -> Result<()> {
        self.multisig.require_role(&self.signer.key(), Role::Owner)
    }

    pub fn add_user(&mut self, user: Pubkey, roles: Vec<Role>) -> Result<()> {
        self.require_owner()?;
        self.multisig.add_user(user, RoleSet::from_roles(&roles))?;
        msg!("User {} added", user);
        Ok(())
    }

    pub fn remove_user(&mut self, user: Pubkey) -> Result<()> {
        self.require_owner()?;
        self.multisig.remove_user(&user)?;
        msg!("User {} removed", user);
        Ok(())
    }

    pub fn update_permission(&mut self, user: Pubkey, roles: Vec<Role>) -> Result<()> {
        self.require_owner()?;
        self.multisig
            .update_permission(&user, RoleSet::from_roles(&roles))?;
        msg!("Permissions replaced for {}", user);
        Ok(())
    }

    pub fn update_threshold(&mut self, value: u8) -> Result<()> {
        self.require_owner()?;
        self.multisig.update_threshold(value)?;
        msg!("Threshold set to {}", value);
        Ok(())
    }
}
