//! Fuzz test for the registry's quorum invariant.
//!
//! Generates random sequences of registry mutations (add user, remove user,
//! replace permissions, change threshold) and checks that after every
//! accepted operation:
//!
//!   1. threshold <= count(users holding the Approver bit)
//!   2. 1 <= threshold
//!   3. user keys stay unique
//!
//! This mirrors the on-chain rules in `programs/multisig/src/state.rs`
//! without the account plumbing, so millions of sequences run in seconds.

const PROPOSER: u8 = 1 << 0;
const APPROVER: u8 = 1 << 1;
const EXECUTOR: u8 = 1 << 2;
const OWNER: u8 = 1 << 3;
const ALL_ROLES: u8 = PROPOSER | APPROVER | EXECUTOR | OWNER;

const MAX_USERS: usize = 20;

/// Mirror of the on-chain registry (user keys reduced to small integers).
#[derive(Debug, Clone)]
struct Registry {
    users: Vec<(u32, u8)>,
    threshold: u8,
}

#[derive(Debug, Clone, Copy)]
enum Op {
    AddUser { key: u32, roles: u8 },
    RemoveUser { key: u32 },
    UpdatePermission { key: u32, roles: u8 },
    UpdateThreshold { value: u8 },
}

impl Registry {
    fn new() -> Self {
        Registry {
            users: vec![(0, ALL_ROLES)],
            threshold: 1,
        }
    }

    fn approver_count(&self) -> usize {
        self.users.iter().filter(|(_, roles)| roles & APPROVER != 0).count()
    }

    /// Applies one operation with the same accept/reject rules as the
    /// program. Returns whether the operation was accepted.
    fn apply(&mut self, op: Op) -> bool {
        match op {
            Op::AddUser { key, roles } => {
                if self.users.len() >= MAX_USERS {
                    return false;
                }
                if self.users.iter().any(|(k, _)| *k == key) {
                    return false;
                }
                self.users.push((key, roles));
                true
            }
            Op::RemoveUser { key } => {
                let Some(index) = self.users.iter().position(|(k, _)| *k == key) else {
                    return false;
                };
                if self.users[index].1 & APPROVER != 0
                    && self.approver_count() - 1 < usize::from(self.threshold)
                {
                    return false;
                }
                self.users.remove(index);
                true
            }
            Op::UpdatePermission { key, roles } => {
                let Some(index) = self.users.iter().position(|(k, _)| *k == key) else {
                    return false;
                };
                let was_approver = self.users[index].1 & APPROVER != 0;
                if was_approver
                    && roles & APPROVER == 0
                    && self.approver_count() - 1 < usize::from(self.threshold)
                {
                    return false;
                }
                self.users[index].1 = roles;
                true
            }
            Op::UpdateThreshold { value } => {
                if value < 1 || usize::from(value) > self.approver_count() {
                    return false;
                }
                self.threshold = value;
                true
            }
        }
    }

    fn check_invariants(&self) -> Result<(), String> {
        if self.threshold < 1 {
            return Err(format!("threshold {} below 1", self.threshold));
        }
        if usize::from(self.threshold) > self.approver_count() {
            return Err(format!(
                "threshold {} exceeds approver count {}",
                self.threshold,
                self.approver_count()
            ));
        }
        for (i, (key, _)) in self.users.iter().enumerate() {
            if self.users.iter().skip(i + 1).any(|(k, _)| k == key) {
                return Err(format!("duplicate user key {}", key));
            }
        }
        Ok(())
    }
}

/// Small xorshift RNG so the fuzzer needs no dependencies.
struct Rng(u64);

impl Rng {
    fn seeded() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64;
        Rng(seed | 1)
    }

    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn op(&mut self) -> Op {
        // Keys drawn from a small pool so removals and duplicates happen.
        let key = (self.next() % 8) as u32;
        let roles = (self.next() % 16) as u8;
        match self.next() % 4 {
            0 => Op::AddUser { key, roles },
            1 => Op::RemoveUser { key },
            2 => Op::UpdatePermission { key, roles },
            _ => Op::UpdateThreshold {
                value: (self.next() % 6) as u8,
            },
        }
    }
}

fn run_sequence(rng: &mut Rng, ops: usize) -> Result<(), String> {
    let mut registry = Registry::new();
    registry.check_invariants()?;
    for step in 0..ops {
        let op = rng.op();
        let before = registry.clone();
        let accepted = registry.apply(op);
        if let Err(violation) = registry.check_invariants() {
            return Err(format!(
                "step {}: {:?} (accepted: {}) broke invariant: {}\nbefore: {:?}\nafter: {:?}",
                step, op, accepted, violation, before, registry
            ));
        }
        // Rejections must leave the registry unchanged.
        if !accepted
            && (registry.users != before.users || registry.threshold != before.threshold)
        {
            return Err(format!("step {}: rejected {:?} mutated state", step, op));
        }
    }
    Ok(())
}

fn main() {
    let mut rng = Rng::seeded();
    let sequences = 100_000;

    println!("fuzzing {} mutation sequences...", sequences);
    for i in 0..sequences {
        if let Err(violation) = run_sequence(&mut rng, 64) {
            eprintln!("FAILED on sequence {}: {}", i, violation);
            std::process::exit(1);
        }
    }
    println!("ok: quorum invariant held across all sequences");
}
