//! Instruction builders over fully resolved accounts.
//!
//! Every builder takes the accounts in the program's order and the instruction
//! arguments, and nothing else: no PDA derivation, no defaults. Optional
//! accounts left as `None` are passed as the program id, read-only and not
//! signing, which the program reads as "not provided".

use {
    solana_program::{
        instruction::{AccountMeta, Instruction},
        pubkey::Pubkey,
    },
    token_metadata_interface::{
        instruction::{
            BurnArgs, CreateArgs, DelegateArgs, LockArgs, MetadataInstruction, MintArgs,
            RevokeArgs, TransferArgs, UnlockArgs, UpdateArgs, VerificationArgs,
        },
        SPL_ASSOCIATED_TOKEN_PROGRAM_ID, SYSTEM_PROGRAM_ID, SYSVAR_INSTRUCTIONS_ID,
    },
};

fn meta(key: Pubkey, writable: bool, signer: bool) -> AccountMeta {
    if writable {
        AccountMeta::new(key, signer)
    } else {
        AccountMeta::new_readonly(key, signer)
    }
}

fn optional(program_id: &Pubkey, key: Option<Pubkey>, writable: bool) -> AccountMeta {
    match key {
        Some(key) => meta(key, writable, false),
        None => AccountMeta::new_readonly(*program_id, false),
    }
}

fn build(
    program_id: &Pubkey,
    instruction: MetadataInstruction,
    accounts: Vec<AccountMeta>,
) -> anyhow::Result<Instruction> {
    let data = instruction.pack()?;
    tracing::debug!(
        instruction = instruction.name(),
        accounts = accounts.len(),
        data_len = data.len(),
        "built instruction"
    );
    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Accounts of `Create`.
#[derive(Clone, Debug)]
pub struct CreateAccounts {
    pub metadata: Pubkey,
    pub master_edition: Option<Pubkey>,
    pub mint: Pubkey,
    /// Set when the instruction initializes a new mint
    pub mint_is_signer: bool,
    pub authority: Pubkey,
    pub payer: Pubkey,
    pub update_authority: Pubkey,
    pub update_authority_is_signer: bool,
    pub spl_token_program: Pubkey,
}

/// Build a `Create` instruction.
///
/// Accounts (strict order):
/// - metadata (writable)
/// - master_edition (optional, writable)
/// - mint (writable, signer when initializing)
/// - authority (readonly, signer)
/// - payer (writable, signer)
/// - update_authority (readonly, signer when required)
/// - system_program (readonly)
/// - sysvar_instructions (readonly)
/// - spl_token_program (readonly)
pub fn create(
    program_id: &Pubkey,
    accounts: &CreateAccounts,
    args: CreateArgs,
) -> anyhow::Result<Instruction> {
    build(
        program_id,
        MetadataInstruction::Create(args),
        vec![
            meta(accounts.metadata, true, false),
            optional(program_id, accounts.master_edition, true),
            meta(accounts.mint, true, accounts.mint_is_signer),
            meta(accounts.authority, false, true),
            meta(accounts.payer, true, true),
            meta(
                accounts.update_authority,
                false,
                accounts.update_authority_is_signer,
            ),
            meta(SYSTEM_PROGRAM_ID, false, false),
            meta(SYSVAR_INSTRUCTIONS_ID, false, false),
            meta(accounts.spl_token_program, false, false),
        ],
    )
}

/// Accounts of `Mint`.
#[derive(Clone, Debug)]
pub struct MintAccounts {
    pub token: Pubkey,
    pub token_owner: Option<Pubkey>,
    pub metadata: Pubkey,
    pub master_edition: Option<Pubkey>,
    pub token_record: Option<Pubkey>,
    pub mint: Pubkey,
    pub authority: Pubkey,
    pub delegate_record: Option<Pubkey>,
    pub payer: Pubkey,
    pub spl_token_program: Pubkey,
    pub authorization_rules_program: Option<Pubkey>,
    pub authorization_rules: Option<Pubkey>,
}

/// Build a `Mint` instruction.
///
/// Accounts (strict order):
/// - token (writable)
/// - token_owner (optional)
/// - metadata (readonly)
/// - master_edition (optional)
/// - token_record (optional, writable)
/// - mint (writable)
/// - authority (readonly, signer)
/// - delegate_record (optional)
/// - payer (writable, signer)
/// - system_program, sysvar_instructions, spl_token_program, spl_ata_program
/// - authorization_rules_program (optional)
/// - authorization_rules (optional)
pub fn mint(
    program_id: &Pubkey,
    accounts: &MintAccounts,
    args: MintArgs,
) -> anyhow::Result<Instruction> {
    build(
        program_id,
        MetadataInstruction::Mint(args),
        vec![
            meta(accounts.token, true, false),
            optional(program_id, accounts.token_owner, false),
            meta(accounts.metadata, false, false),
            optional(program_id, accounts.master_edition, false),
            optional(program_id, accounts.token_record, true),
            meta(accounts.mint, true, false),
            meta(accounts.authority, false, true),
            optional(program_id, accounts.delegate_record, false),
            meta(accounts.payer, true, true),
            meta(SYSTEM_PROGRAM_ID, false, false),
            meta(SYSVAR_INSTRUCTIONS_ID, false, false),
            meta(accounts.spl_token_program, false, false),
            meta(SPL_ASSOCIATED_TOKEN_PROGRAM_ID, false, false),
            optional(program_id, accounts.authorization_rules_program, false),
            optional(program_id, accounts.authorization_rules, false),
        ],
    )
}

/// Accounts shared by `Delegate` and `Revoke`.
#[derive(Clone, Debug)]
pub struct DelegateAccounts {
    pub delegate_record: Option<Pubkey>,
    pub delegate: Pubkey,
    pub metadata: Pubkey,
    pub master_edition: Option<Pubkey>,
    pub token_record: Option<Pubkey>,
    pub mint: Pubkey,
    pub token: Option<Pubkey>,
    pub authority: Pubkey,
    pub payer: Pubkey,
    pub spl_token_program: Option<Pubkey>,
    pub authorization_rules_program: Option<Pubkey>,
    pub authorization_rules: Option<Pubkey>,
}

impl DelegateAccounts {
    fn metas(&self, program_id: &Pubkey) -> Vec<AccountMeta> {
        vec![
            optional(program_id, self.delegate_record, true),
            meta(self.delegate, false, false),
            meta(self.metadata, true, false),
            optional(program_id, self.master_edition, false),
            optional(program_id, self.token_record, true),
            meta(self.mint, false, false),
            optional(program_id, self.token, true),
            meta(self.authority, false, true),
            meta(self.payer, true, true),
            meta(SYSTEM_PROGRAM_ID, false, false),
            meta(SYSVAR_INSTRUCTIONS_ID, false, false),
            optional(program_id, self.spl_token_program, false),
            optional(program_id, self.authorization_rules_program, false),
            optional(program_id, self.authorization_rules, false),
        ]
    }
}

/// Build a `Delegate` instruction.
///
/// Accounts (strict order):
/// - delegate_record (optional, writable)
/// - delegate (readonly)
/// - metadata (writable)
/// - master_edition (optional)
/// - token_record (optional, writable)
/// - mint (readonly)
/// - token (optional, writable)
/// - authority (readonly, signer)
/// - payer (writable, signer)
/// - system_program, sysvar_instructions
/// - spl_token_program (optional)
/// - authorization_rules_program (optional)
/// - authorization_rules (optional)
pub fn delegate(
    program_id: &Pubkey,
    accounts: &DelegateAccounts,
    args: DelegateArgs,
) -> anyhow::Result<Instruction> {
    build(
        program_id,
        MetadataInstruction::Delegate(args),
        accounts.metas(program_id),
    )
}

/// Build a `Revoke` instruction. Same accounts as [`delegate`].
pub fn revoke(
    program_id: &Pubkey,
    accounts: &DelegateAccounts,
    args: RevokeArgs,
) -> anyhow::Result<Instruction> {
    build(
        program_id,
        MetadataInstruction::Revoke(args),
        accounts.metas(program_id),
    )
}

/// Accounts of `Update`.
#[derive(Clone, Debug)]
pub struct UpdateAccounts {
    pub authority: Pubkey,
    pub delegate_record: Option<Pubkey>,
    pub token: Option<Pubkey>,
    pub mint: Pubkey,
    pub metadata: Pubkey,
    pub edition: Option<Pubkey>,
    pub payer: Pubkey,
    pub authorization_rules_program: Option<Pubkey>,
    pub authorization_rules: Option<Pubkey>,
}

/// Build an `Update` instruction.
///
/// Accounts (strict order):
/// - authority (readonly, signer)
/// - delegate_record (optional)
/// - token (optional)
/// - mint (readonly)
/// - metadata (writable)
/// - edition (optional)
/// - payer (writable, signer)
/// - system_program, sysvar_instructions
/// - authorization_rules_program (optional)
/// - authorization_rules (optional)
pub fn update(
    program_id: &Pubkey,
    accounts: &UpdateAccounts,
    args: UpdateArgs,
) -> anyhow::Result<Instruction> {
    build(
        program_id,
        MetadataInstruction::Update(args),
        vec![
            meta(accounts.authority, false, true),
            optional(program_id, accounts.delegate_record, false),
            optional(program_id, accounts.token, false),
            meta(accounts.mint, false, false),
            meta(accounts.metadata, true, false),
            optional(program_id, accounts.edition, false),
            meta(accounts.payer, true, true),
            meta(SYSTEM_PROGRAM_ID, false, false),
            meta(SYSVAR_INSTRUCTIONS_ID, false, false),
            optional(program_id, accounts.authorization_rules_program, false),
            optional(program_id, accounts.authorization_rules, false),
        ],
    )
}

/// Accounts of `Burn`.
#[derive(Clone, Debug)]
pub struct BurnAccounts {
    pub authority: Pubkey,
    pub collection_metadata: Option<Pubkey>,
    pub metadata: Pubkey,
    pub edition: Option<Pubkey>,
    pub mint: Pubkey,
    pub token: Pubkey,
    pub master_edition: Option<Pubkey>,
    pub master_edition_mint: Option<Pubkey>,
    pub master_edition_token: Option<Pubkey>,
    pub edition_marker: Option<Pubkey>,
    pub token_record: Option<Pubkey>,
    pub spl_token_program: Pubkey,
}

/// Build a `Burn` instruction.
///
/// Accounts (strict order):
/// - authority (writable, signer)
/// - collection_metadata (optional, writable)
/// - metadata (writable)
/// - edition (optional, writable)
/// - mint (writable)
/// - token (writable)
/// - master_edition (optional, writable)
/// - master_edition_mint (optional)
/// - master_edition_token (optional)
/// - edition_marker (optional, writable)
/// - token_record (optional, writable)
/// - system_program, sysvar_instructions, spl_token_program
pub fn burn(
    program_id: &Pubkey,
    accounts: &BurnAccounts,
    args: BurnArgs,
) -> anyhow::Result<Instruction> {
    build(
        program_id,
        MetadataInstruction::Burn(args),
        vec![
            meta(accounts.authority, true, true),
            optional(program_id, accounts.collection_metadata, true),
            meta(accounts.metadata, true, false),
            optional(program_id, accounts.edition, true),
            meta(accounts.mint, true, false),
            meta(accounts.token, true, false),
            optional(program_id, accounts.master_edition, true),
            optional(program_id, accounts.master_edition_mint, false),
            optional(program_id, accounts.master_edition_token, false),
            optional(program_id, accounts.edition_marker, true),
            optional(program_id, accounts.token_record, true),
            meta(SYSTEM_PROGRAM_ID, false, false),
            meta(SYSVAR_INSTRUCTIONS_ID, false, false),
            meta(accounts.spl_token_program, false, false),
        ],
    )
}

/// Accounts of `Transfer`.
#[derive(Clone, Debug)]
pub struct TransferAccounts {
    pub token: Pubkey,
    pub token_owner: Pubkey,
    pub destination_token: Pubkey,
    pub destination_owner: Pubkey,
    pub mint: Pubkey,
    pub metadata: Pubkey,
    pub edition: Option<Pubkey>,
    pub owner_token_record: Option<Pubkey>,
    pub destination_token_record: Option<Pubkey>,
    pub authority: Pubkey,
    pub payer: Pubkey,
    pub spl_token_program: Pubkey,
    pub authorization_rules_program: Option<Pubkey>,
    pub authorization_rules: Option<Pubkey>,
}

/// Build a `Transfer` instruction.
///
/// Accounts (strict order):
/// - token (writable)
/// - token_owner (readonly)
/// - destination_token (writable)
/// - destination_owner (readonly)
/// - mint (readonly)
/// - metadata (writable)
/// - edition (optional)
/// - owner_token_record (optional, writable)
/// - destination_token_record (optional, writable)
/// - authority (readonly, signer)
/// - payer (writable, signer)
/// - system_program, sysvar_instructions, spl_token_program, spl_ata_program
/// - authorization_rules_program (optional)
/// - authorization_rules (optional)
pub fn transfer(
    program_id: &Pubkey,
    accounts: &TransferAccounts,
    args: TransferArgs,
) -> anyhow::Result<Instruction> {
    build(
        program_id,
        MetadataInstruction::Transfer(args),
        vec![
            meta(accounts.token, true, false),
            meta(accounts.token_owner, false, false),
            meta(accounts.destination_token, true, false),
            meta(accounts.destination_owner, false, false),
            meta(accounts.mint, false, false),
            meta(accounts.metadata, true, false),
            optional(program_id, accounts.edition, false),
            optional(program_id, accounts.owner_token_record, true),
            optional(program_id, accounts.destination_token_record, true),
            meta(accounts.authority, false, true),
            meta(accounts.payer, true, true),
            meta(SYSTEM_PROGRAM_ID, false, false),
            meta(SYSVAR_INSTRUCTIONS_ID, false, false),
            meta(accounts.spl_token_program, false, false),
            meta(SPL_ASSOCIATED_TOKEN_PROGRAM_ID, false, false),
            optional(program_id, accounts.authorization_rules_program, false),
            optional(program_id, accounts.authorization_rules, false),
        ],
    )
}

/// Accounts shared by `Lock` and `Unlock`.
#[derive(Clone, Debug)]
pub struct LockAccounts {
    pub authority: Pubkey,
    pub token_owner: Option<Pubkey>,
    pub token: Pubkey,
    pub mint: Pubkey,
    pub metadata: Pubkey,
    pub edition: Option<Pubkey>,
    pub token_record: Option<Pubkey>,
    pub payer: Pubkey,
    pub spl_token_program: Option<Pubkey>,
    pub authorization_rules_program: Option<Pubkey>,
    pub authorization_rules: Option<Pubkey>,
}

impl LockAccounts {
    fn metas(&self, program_id: &Pubkey) -> Vec<AccountMeta> {
        vec![
            meta(self.authority, false, true),
            optional(program_id, self.token_owner, false),
            meta(self.token, true, false),
            meta(self.mint, false, false),
            meta(self.metadata, true, false),
            optional(program_id, self.edition, false),
            optional(program_id, self.token_record, true),
            meta(self.payer, true, true),
            meta(SYSTEM_PROGRAM_ID, false, false),
            meta(SYSVAR_INSTRUCTIONS_ID, false, false),
            optional(program_id, self.spl_token_program, false),
            optional(program_id, self.authorization_rules_program, false),
            optional(program_id, self.authorization_rules, false),
        ]
    }
}

/// Build a `Lock` instruction.
///
/// Accounts (strict order):
/// - authority (readonly, signer)
/// - token_owner (optional)
/// - token (writable)
/// - mint (readonly)
/// - metadata (writable)
/// - edition (optional)
/// - token_record (optional, writable)
/// - payer (writable, signer)
/// - system_program, sysvar_instructions
/// - spl_token_program (optional)
/// - authorization_rules_program (optional)
/// - authorization_rules (optional)
pub fn lock(
    program_id: &Pubkey,
    accounts: &LockAccounts,
    args: LockArgs,
) -> anyhow::Result<Instruction> {
    build(
        program_id,
        MetadataInstruction::Lock(args),
        accounts.metas(program_id),
    )
}

/// Build an `Unlock` instruction. Same accounts as [`lock`].
pub fn unlock(
    program_id: &Pubkey,
    accounts: &LockAccounts,
    args: UnlockArgs,
) -> anyhow::Result<Instruction> {
    build(
        program_id,
        MetadataInstruction::Unlock(args),
        accounts.metas(program_id),
    )
}

/// Accounts of `Verify` and `Unverify`.
#[derive(Clone, Debug)]
pub struct VerifyAccounts {
    pub authority: Pubkey,
    pub delegate_record: Option<Pubkey>,
    pub metadata: Pubkey,
    pub collection_mint: Option<Pubkey>,
    pub collection_metadata: Option<Pubkey>,
    /// Not part of `Unverify`
    pub collection_master_edition: Option<Pubkey>,
}

/// Build a `Verify` instruction.
///
/// Accounts (strict order):
/// - authority (readonly, signer)
/// - delegate_record (optional)
/// - metadata (writable)
/// - collection_mint (optional)
/// - collection_metadata (optional, writable)
/// - collection_master_edition (optional)
/// - system_program, sysvar_instructions
pub fn verify(
    program_id: &Pubkey,
    accounts: &VerifyAccounts,
    args: VerificationArgs,
) -> anyhow::Result<Instruction> {
    build(
        program_id,
        MetadataInstruction::Verify(args),
        vec![
            meta(accounts.authority, false, true),
            optional(program_id, accounts.delegate_record, false),
            meta(accounts.metadata, true, false),
            optional(program_id, accounts.collection_mint, false),
            optional(program_id, accounts.collection_metadata, true),
            optional(program_id, accounts.collection_master_edition, false),
            meta(SYSTEM_PROGRAM_ID, false, false),
            meta(SYSVAR_INSTRUCTIONS_ID, false, false),
        ],
    )
}

/// Build an `Unverify` instruction. Like [`verify`] without the collection
/// master edition.
pub fn unverify(
    program_id: &Pubkey,
    accounts: &VerifyAccounts,
    args: VerificationArgs,
) -> anyhow::Result<Instruction> {
    build(
        program_id,
        MetadataInstruction::Unverify(args),
        vec![
            meta(accounts.authority, false, true),
            optional(program_id, accounts.delegate_record, false),
            meta(accounts.metadata, true, false),
            optional(program_id, accounts.collection_mint, false),
            optional(program_id, accounts.collection_metadata, true),
            meta(SYSTEM_PROGRAM_ID, false, false),
            meta(SYSVAR_INSTRUCTIONS_ID, false, false),
        ],
    )
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        token_metadata_interface::{instruction::RevokeArgs, SPL_TOKEN_PROGRAM_ID},
    };

    fn key(n: u8) -> Pubkey {
        Pubkey::new_from_array([n; 32])
    }

    #[test]
    fn omitted_optional_accounts_are_the_program_id() {
        let program_id = token_metadata_interface::id();
        let accounts = VerifyAccounts {
            authority: key(1),
            delegate_record: None,
            metadata: key(2),
            collection_mint: None,
            collection_metadata: None,
            collection_master_edition: None,
        };
        let ix = verify(&program_id, &accounts, VerificationArgs::CreatorV1).unwrap();
        assert_eq!(ix.data, vec![52, 0]);
        assert_eq!(ix.accounts.len(), 8);
        for index in [1, 3, 4, 5] {
            let meta = &ix.accounts[index];
            assert_eq!(meta.pubkey, program_id);
            assert!(!meta.is_writable);
            assert!(!meta.is_signer);
        }
        assert!(ix.accounts[0].is_signer);
        assert!(ix.accounts[2].is_writable);

        let ix = unverify(&program_id, &accounts, VerificationArgs::CreatorV1).unwrap();
        assert_eq!(ix.accounts.len(), 7);
        assert_eq!(ix.accounts[5].pubkey, SYSTEM_PROGRAM_ID);
    }

    #[test]
    fn create_account_roles() {
        let program_id = token_metadata_interface::id();
        let accounts = CreateAccounts {
            metadata: key(1),
            master_edition: Some(key(2)),
            mint: key(3),
            mint_is_signer: true,
            authority: key(4),
            payer: key(5),
            update_authority: key(4),
            update_authority_is_signer: false,
            spl_token_program: SPL_TOKEN_PROGRAM_ID,
        };
        let ix = create(
            &program_id,
            &accounts,
            CreateArgs::V1 {
                asset_data: crate::tests::asset_data(),
                decimals: Some(0),
                print_supply: None,
            },
        )
        .unwrap();
        let roles: Vec<(Pubkey, bool, bool)> = ix
            .accounts
            .iter()
            .map(|m| (m.pubkey, m.is_writable, m.is_signer))
            .collect();
        assert_eq!(
            roles,
            vec![
                (key(1), true, false),
                (key(2), true, false),
                (key(3), true, true),
                (key(4), false, true),
                (key(5), true, true),
                (key(4), false, false),
                (SYSTEM_PROGRAM_ID, false, false),
                (SYSVAR_INSTRUCTIONS_ID, false, false),
                (SPL_TOKEN_PROGRAM_ID, false, false),
            ]
        );
        assert_eq!(&ix.data[..2], &[42, 0]);
    }

    #[test]
    fn delegate_and_revoke_share_accounts() {
        let program_id = token_metadata_interface::id();
        let accounts = DelegateAccounts {
            delegate_record: Some(key(1)),
            delegate: key(2),
            metadata: key(3),
            master_edition: None,
            token_record: None,
            mint: key(4),
            token: None,
            authority: key(5),
            payer: key(6),
            spl_token_program: None,
            authorization_rules_program: None,
            authorization_rules: None,
        };
        let granted = delegate(
            &program_id,
            &accounts,
            DelegateArgs::DataV1 {
                authorization_data: None,
            },
        )
        .unwrap();
        let revoked = revoke(&program_id, &accounts, RevokeArgs::DataV1).unwrap();
        assert_eq!(granted.accounts, revoked.accounts);
        assert_eq!(granted.data, vec![44, 3, 0]);
        assert_eq!(revoked.data, vec![45, 3]);
        assert_eq!(granted.accounts.len(), 14);
        assert!(granted.accounts[0].is_writable);
    }
}
