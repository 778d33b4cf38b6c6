//! Role model: named permissions encoded as bit positions in a `u8` mask.
//!
//! Wire-compatible with clients that pass role positions as small integers:
//! Proposer = 0, Approver = 1, Executor = 2, Owner = 3.

use anchor_lang::prelude::*;

/// A single permission a registered user may hold.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Role {
    /// May create propositions.
    Proposer,
    /// May vote on propositions; counts toward the threshold.
    Approver,
    /// May execute a proposition once quorum is met.
    Executor,
    /// May mutate the registry (users, permissions, threshold).
    Owner,
}

impl Role {
    /// The bit this role occupies in a [`RoleSet`] mask.
    pub const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of [`Role`]s held by one user, stored as a single byte.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct RoleSet(u8);

impl RoleSet {
    /// Every role. Granted to the registry creator.
    pub const ALL: RoleSet = RoleSet(
        Role::Proposer.bit() | Role::Approver.bit() | Role::Executor.bit() | Role::Owner.bit(),
    );

    pub const fn empty() -> Self {
        RoleSet(0)
    }

    pub fn from_roles(roles: &[Role]) -> Self {
        RoleSet(roles.iter().fold(0u8, |mask, role| mask | role.bit()))
    }

    pub const fn contains(self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl Space for RoleSet {
    const INIT_SPACE: usize = 1;
}
