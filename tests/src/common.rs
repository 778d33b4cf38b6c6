//! Shared LiteSVM harness for the multisig program tests.
//!
//! Instructions are built by hand (Anchor discriminator + Borsh-encoded
//! args) so the tests exercise the exact wire format clients use.

use std::path::PathBuf;
use std::str::FromStr;

use litesvm::types::FailedTransactionMetadata;
use litesvm::LiteSVM;
use solana_instruction::{AccountMeta, Instruction};
use solana_keypair::Keypair;
use solana_message::Message;
use solana_native_token::LAMPORTS_PER_SOL;
use solana_pubkey::Pubkey;
use solana_signer::Signer;
use solana_transaction::Transaction;

pub const COMPANY_ID: &str = "67840a280000000000000000";

// Role bit positions, matching the on-chain Role enum.
pub const PROPOSER: u8 = 0;
pub const APPROVER: u8 = 1;
pub const EXECUTOR: u8 = 2;
pub const OWNER: u8 = 3;

pub fn program_id() -> Pubkey {
    Pubkey::from_str("CyCee1ukFyDgRndFMW84d2nstCktbyUBzkpMVcHgX28d").unwrap()
}

/// Returns the compiled program, or `None` when `cargo build-sbf` has not
/// produced the deploy artifact. Tests skip themselves in that case so a
/// plain `cargo test` stays green.
pub fn read_program() -> Option<Vec<u8>> {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("../target/deploy/multisig.so");
    std::fs::read(path).ok()
}

pub fn setup() -> Option<(LiteSVM, Keypair)> {
    let program = read_program()?;
    let mut svm = LiteSVM::new();
    svm.add_program(program_id(), &program);

    let payer = Keypair::new();
    svm.airdrop(&payer.pubkey(), 100 * LAMPORTS_PER_SOL)
        .expect("Airdrop failed");
    Some((svm, payer))
}

pub fn airdrop(svm: &mut LiteSVM, pubkey: &Pubkey, lamports: u64) {
    svm.airdrop(pubkey, lamports).expect("Airdrop failed");
}

pub fn balance(svm: &LiteSVM, pubkey: &Pubkey) -> u64 {
    svm.get_account(pubkey).map(|a| a.lamports).unwrap_or(0)
}

fn discriminator(name: &str) -> [u8; 8] {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(format!("global:{}", name).as_bytes());
    let result = hasher.finalize();
    let mut disc = [0u8; 8];
    disc.copy_from_slice(&result[..8]);
    disc
}

// ---------------------------------------------------------------------------
// PDA derivation
// ---------------------------------------------------------------------------

pub fn project_pda() -> Pubkey {
    Pubkey::find_program_address(&[b"project", COMPANY_ID.as_bytes()], &program_id()).0
}

pub fn treasury_pda() -> Pubkey {
    Pubkey::find_program_address(&[b"treasury", COMPANY_ID.as_bytes()], &program_id()).0
}

pub fn proposition_pda(sequence: u8) -> Pubkey {
    Pubkey::find_program_address(
        &[b"proposition", project_pda().as_ref(), &[sequence]],
        &program_id(),
    )
    .0
}

// ---------------------------------------------------------------------------
// Instruction builders
// ---------------------------------------------------------------------------

fn push_string(data: &mut Vec<u8>, value: &str) {
    data.extend_from_slice(&(value.len() as u32).to_le_bytes());
    data.extend_from_slice(value.as_bytes());
}

fn push_roles(data: &mut Vec<u8>, roles: &[u8]) {
    data.extend_from_slice(&(roles.len() as u32).to_le_bytes());
    data.extend_from_slice(roles);
}

pub fn ix_initialize_project(signer: Pubkey) -> Instruction {
    let mut data = discriminator("initialize_project").to_vec();
    push_string(&mut data, COMPANY_ID);

    Instruction {
        program_id: program_id(),
        accounts: vec![
            AccountMeta::new(signer, true),
            AccountMeta::new(project_pda(), false),
            AccountMeta::new(treasury_pda(), false),
            AccountMeta::new_readonly(solana_sdk_ids::system_program::ID, false),
        ],
        data,
    }
}

fn admin_accounts(signer: Pubkey) -> Vec<AccountMeta> {
    vec![
        AccountMeta::new_readonly(signer, true),
        AccountMeta::new(project_pda(), false),
    ]
}

pub fn ix_add_user(signer: Pubkey, user: Pubkey, roles: &[u8]) -> Instruction {
    let mut data = discriminator("add_user").to_vec();
    data.extend_from_slice(user.as_ref());
    push_roles(&mut data, roles);
    Instruction {
        program_id: program_id(),
        accounts: admin_accounts(signer),
        data,
    }
}

pub fn ix_remove_user(signer: Pubkey, user: Pubkey) -> Instruction {
    let mut data = discriminator("remove_user").to_vec();
    data.extend_from_slice(user.as_ref());
    Instruction {
        program_id: program_id(),
        accounts: admin_accounts(signer),
        data,
    }
}

pub fn ix_update_permission(signer: Pubkey, user: Pubkey, roles: &[u8]) -> Instruction {
    let mut data = discriminator("update_permission").to_vec();
    data.extend_from_slice(user.as_ref());
    push_roles(&mut data, roles);
    Instruction {
        program_id: program_id(),
        accounts: admin_accounts(signer),
        data,
    }
}

pub fn ix_update_threshold(signer: Pubkey, value: u8) -> Instruction {
    let mut data = discriminator("update_threshold").to_vec();
    data.push(value);
    Instruction {
        program_id: program_id(),
        accounts: admin_accounts(signer),
        data,
    }
}

/// `propose` with a `ProposalType::Transfer` payload.
pub fn ix_propose_transfer(
    proposer: Pubkey,
    sequence: u8,
    destination: Pubkey,
    amount: u64,
) -> Instruction {
    let mut data = discriminator("propose").to_vec();
    data.push(0); // ProposalType::Transfer
    data.extend_from_slice(destination.as_ref());
    data.extend_from_slice(&amount.to_le_bytes());

    Instruction {
        program_id: program_id(),
        accounts: vec![
            AccountMeta::new(proposer, true),
            AccountMeta::new(project_pda(), false),
            AccountMeta::new(proposition_pda(sequence), false),
            AccountMeta::new_readonly(solana_sdk_ids::system_program::ID, false),
        ],
        data,
    }
}

pub fn ix_approve(approver: Pubkey, sequence: u8, decision: bool) -> Instruction {
    let mut data = discriminator("approve").to_vec();
    data.push(decision as u8);
    Instruction {
        program_id: program_id(),
        accounts: vec![
            AccountMeta::new_readonly(approver, true),
            AccountMeta::new_readonly(project_pda(), false),
            AccountMeta::new(proposition_pda(sequence), false),
        ],
        data,
    }
}

/// `execute`, with the accounts the proposed action touches appended as
/// remaining accounts.
pub fn ix_execute(executor: Pubkey, sequence: u8, remaining: &[AccountMeta]) -> Instruction {
    let mut accounts = vec![
        AccountMeta::new_readonly(executor, true),
        AccountMeta::new_readonly(project_pda(), false),
        AccountMeta::new(proposition_pda(sequence), false),
        AccountMeta::new(treasury_pda(), false),
    ];
    accounts.extend_from_slice(remaining);
    Instruction {
        program_id: program_id(),
        accounts,
        data: discriminator("execute").to_vec(),
    }
}

// ---------------------------------------------------------------------------
// Transaction helpers
// ---------------------------------------------------------------------------

pub fn send(
    svm: &mut LiteSVM,
    ix: Instruction,
    payer: &Keypair,
) -> Result<(), FailedTransactionMetadata> {
    let msg = Message::new(&[ix], Some(&payer.pubkey()));
    let tx = Transaction::new(&[payer], msg, svm.latest_blockhash());
    svm.send_transaction(tx).map(|_| ())
}

pub fn send_ok(svm: &mut LiteSVM, ix: Instruction, payer: &Keypair) {
    if let Err(failed) = send(svm, ix, payer) {
        panic!("transaction failed: {:?}\nlogs: {:#?}", failed.err, failed.meta.logs);
    }
}

/// Asserts the transaction failed and that the program logged the given
/// error message (the same strings client test suites match on).
pub fn assert_fails_with(
    result: Result<(), FailedTransactionMetadata>,
    message: &str,
) {
    match result {
        Ok(()) => panic!("expected failure with '{}', but transaction succeeded", message),
        Err(failed) => {
            let logged = failed.meta.logs.iter().any(|line| line.contains(message));
            assert!(
                logged,
                "expected '{}' in logs, got: {:#?} (err: {:?})",
                message, failed.meta.logs, failed.err
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Account state decoding (Borsh layout written by the program)
// ---------------------------------------------------------------------------

pub struct RegistryState {
    pub company_id: String,
    pub users: Vec<(Pubkey, u8)>,
    pub threshold: u8,
    pub transaction_count: u8,
    pub treasury: Pubkey,
}

pub struct PropositionState {
    pub proposer: Pubkey,
    pub signers: Vec<(Pubkey, bool)>,
    pub did_execute: bool,
    pub sequence: u8,
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        // Skip the 8-byte Anchor discriminator.
        Cursor { data, pos: 8 }
    }

    fn u8(&mut self) -> u8 {
        let v = self.data[self.pos];
        self.pos += 1;
        v
    }

    fn u32(&mut self) -> u32 {
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().unwrap());
        self.pos += 4;
        v
    }

    fn u64(&mut self) -> u64 {
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().unwrap());
        self.pos += 8;
        v
    }

    fn pubkey(&mut self) -> Pubkey {
        let v = Pubkey::try_from(&self.data[self.pos..self.pos + 32]).unwrap();
        self.pos += 32;
        v
    }

    fn string(&mut self) -> String {
        let len = self.u32() as usize;
        let v = String::from_utf8(self.data[self.pos..self.pos + len].to_vec()).unwrap();
        self.pos += len;
        v
    }
}

pub fn fetch_registry(svm: &LiteSVM) -> RegistryState {
    let account = svm.get_account(&project_pda()).expect("registry missing");
    let mut cursor = Cursor::new(&account.data);

    let company_id = cursor.string();
    let user_count = cursor.u32() as usize;
    let users = (0..user_count)
        .map(|_| (cursor.pubkey(), cursor.u8()))
        .collect();
    RegistryState {
        company_id,
        users,
        threshold: cursor.u8(),
        transaction_count: cursor.u8(),
        treasury: cursor.pubkey(),
    }
}

pub fn fetch_proposition(svm: &LiteSVM, sequence: u8) -> PropositionState {
    let account = svm
        .get_account(&proposition_pda(sequence))
        .expect("proposition missing");
    let mut cursor = Cursor::new(&account.data);

    let proposer = cursor.pubkey();
    // proposal_type
    match cursor.u8() {
        0 => {
            // Transfer { destination, amount }
            cursor.pubkey();
            cursor.u64();
        }
        1 => {
            // Generic { program_id, accounts, data }
            cursor.pubkey();
            let accounts = cursor.u32() as usize;
            for _ in 0..accounts {
                cursor.pubkey();
                cursor.u8();
                cursor.u8();
            }
            let len = cursor.u32() as usize;
            cursor.pos += len;
        }
        other => panic!("unknown proposal tag {}", other),
    }
    let vote_count = cursor.u32() as usize;
    let signers = (0..vote_count)
        .map(|_| (cursor.pubkey(), cursor.u8() != 0))
        .collect();
    PropositionState {
        proposer,
        signers,
        did_execute: cursor.u8() != 0,
        sequence: cursor.u8(),
    }
}
