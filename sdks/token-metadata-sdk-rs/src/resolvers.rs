//! Default account resolution.
//!
//! Each `*_ix` method fills the accounts a caller left as `None`, validates
//! client-side limits, and hands the resolved accounts to [`crate::builders`].

use {
    crate::{
        builders::{
            self, BurnAccounts, CreateAccounts, DelegateAccounts, LockAccounts, MintAccounts,
            TransferAccounts, UpdateAccounts, VerifyAccounts,
        },
        validation, BurnParams, CreateParams, DelegateParams, LockParams, MintParams,
        RevokeParams, TokenMetadataClient, TransferParams, UpdateParams, VerifyParams,
    },
    solana_program::{instruction::Instruction, pubkey::Pubkey},
    token_metadata_interface::{
        instruction::{
            BurnArgs, CreateArgs, DelegateArgs, LockArgs, MintArgs, RevokeArgs, TransferArgs,
            UnlockArgs, UpdateArgs, VerificationArgs,
        },
        seeds::{HolderDelegateRole, MetadataDelegateRole},
        types::{AssetData, CollectionDetails, Creator, PrintSupply, TokenStandard},
        MPL_TOKEN_AUTH_RULES_PROGRAM_ID, SPL_TOKEN_PROGRAM_ID,
    },
};

/// Where a delegation is recorded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DelegateRecordKind {
    /// Metadata delegate record keyed by the update authority
    Metadata(MetadataDelegateRole),
    /// Holder delegate record keyed by the token owner
    Holder(HolderDelegateRole),
    /// On the token account (and its token record for programmable assets)
    Token,
}

/// Record kind of a `Delegate` role.
pub fn delegate_record_kind(args: &DelegateArgs) -> DelegateRecordKind {
    use {DelegateRecordKind::*, MetadataDelegateRole as Role};
    match args {
        DelegateArgs::CollectionV1 { .. } => Metadata(Role::Collection),
        DelegateArgs::DataV1 { .. } => Metadata(Role::Data),
        DelegateArgs::ProgrammableConfigV1 { .. } => Metadata(Role::ProgrammableConfig),
        DelegateArgs::AuthorityItemV1 { .. } => Metadata(Role::AuthorityItem),
        DelegateArgs::DataItemV1 { .. } => Metadata(Role::DataItem),
        DelegateArgs::CollectionItemV1 { .. } => Metadata(Role::CollectionItem),
        DelegateArgs::ProgrammableConfigItemV1 { .. } => Metadata(Role::ProgrammableConfigItem),
        DelegateArgs::PrintDelegateV1 { .. } => Holder(HolderDelegateRole::PrintDelegate),
        DelegateArgs::SaleV1 { .. }
        | DelegateArgs::TransferV1 { .. }
        | DelegateArgs::UtilityV1 { .. }
        | DelegateArgs::StakingV1 { .. }
        | DelegateArgs::StandardV1 { .. }
        | DelegateArgs::LockedTransferV1 { .. } => Token,
    }
}

/// Record kind of a `Revoke` role.
pub fn revoke_record_kind(args: RevokeArgs) -> DelegateRecordKind {
    use {DelegateRecordKind::*, MetadataDelegateRole as Role};
    match args {
        RevokeArgs::CollectionV1 => Metadata(Role::Collection),
        RevokeArgs::DataV1 => Metadata(Role::Data),
        RevokeArgs::ProgrammableConfigV1 => Metadata(Role::ProgrammableConfig),
        RevokeArgs::AuthorityItemV1 => Metadata(Role::AuthorityItem),
        RevokeArgs::DataItemV1 => Metadata(Role::DataItem),
        RevokeArgs::CollectionItemV1 => Metadata(Role::CollectionItem),
        RevokeArgs::ProgrammableConfigItemV1 => Metadata(Role::ProgrammableConfigItem),
        RevokeArgs::PrintDelegateV1 => Holder(HolderDelegateRole::PrintDelegate),
        RevokeArgs::SaleV1
        | RevokeArgs::TransferV1
        | RevokeArgs::UtilityV1
        | RevokeArgs::StakingV1
        | RevokeArgs::StandardV1
        | RevokeArgs::LockedTransferV1
        | RevokeArgs::MigrationV1 => Token,
    }
}

/// Delegate role an `Update` variant signs as, if any.
pub fn update_delegate_role(args: &UpdateArgs) -> Option<MetadataDelegateRole> {
    match args {
        UpdateArgs::V1 { .. } | UpdateArgs::AsUpdateAuthorityV2 { .. } => None,
        UpdateArgs::AsAuthorityItemDelegateV2 { .. } => Some(MetadataDelegateRole::AuthorityItem),
        UpdateArgs::AsCollectionDelegateV2 { .. } => Some(MetadataDelegateRole::Collection),
        UpdateArgs::AsDataDelegateV2 { .. } => Some(MetadataDelegateRole::Data),
        UpdateArgs::AsProgrammableConfigDelegateV2 { .. } => {
            Some(MetadataDelegateRole::ProgrammableConfig)
        }
        UpdateArgs::AsDataItemDelegateV2 { .. } => Some(MetadataDelegateRole::DataItem),
        UpdateArgs::AsCollectionItemDelegateV2 { .. } => {
            Some(MetadataDelegateRole::CollectionItem)
        }
        UpdateArgs::AsProgrammableConfigItemDelegateV2 { .. } => {
            Some(MetadataDelegateRole::ProgrammableConfigItem)
        }
    }
}

fn update_data(args: &UpdateArgs) -> Option<&token_metadata_interface::types::Data> {
    match args {
        UpdateArgs::V1 { data, .. }
        | UpdateArgs::AsUpdateAuthorityV2 { data, .. }
        | UpdateArgs::AsDataDelegateV2 { data, .. }
        | UpdateArgs::AsDataItemDelegateV2 { data, .. } => data.as_ref(),
        _ => None,
    }
}

fn or_derive(
    explicit: Option<Pubkey>,
    derive: impl FnOnce() -> anyhow::Result<Pubkey>,
) -> anyhow::Result<Pubkey> {
    match explicit {
        Some(key) => Ok(key),
        None => derive(),
    }
}

fn or_derive_if(
    explicit: Option<Pubkey>,
    condition: bool,
    derive: impl FnOnce() -> anyhow::Result<Pubkey>,
) -> anyhow::Result<Option<Pubkey>> {
    match explicit {
        Some(key) => Ok(Some(key)),
        None if condition => derive().map(Some),
        None => Ok(None),
    }
}

fn rules_program(rules: Option<Pubkey>, program: Option<Pubkey>) -> Option<Pubkey> {
    program.or(rules.map(|_| MPL_TOKEN_AUTH_RULES_PROGRAM_ID))
}

// Fields shared by Delegate and Revoke.
struct DelegateInputs {
    mint: Pubkey,
    delegate: Pubkey,
    token_standard: TokenStandard,
    authority: Option<Pubkey>,
    update_authority: Option<Pubkey>,
    token_owner: Option<Pubkey>,
    token: Option<Pubkey>,
    payer: Option<Pubkey>,
    metadata: Option<Pubkey>,
    master_edition: Option<Pubkey>,
    token_record: Option<Pubkey>,
    delegate_record: Option<Pubkey>,
    spl_token_program: Option<Pubkey>,
    authorization_rules: Option<Pubkey>,
    authorization_rules_program: Option<Pubkey>,
}

macro_rules! delegate_inputs_from {
    ($($params:ty),*) => {
        $(
            impl From<&$params> for DelegateInputs {
                fn from(p: &$params) -> Self {
                    Self {
                        mint: p.mint,
                        delegate: p.delegate,
                        token_standard: p.token_standard,
                        authority: p.authority,
                        update_authority: p.update_authority,
                        token_owner: p.token_owner,
                        token: p.token,
                        payer: p.payer,
                        metadata: p.metadata,
                        master_edition: p.master_edition,
                        token_record: p.token_record,
                        delegate_record: p.delegate_record,
                        spl_token_program: p.spl_token_program,
                        authorization_rules: p.authorization_rules,
                        authorization_rules_program: p.authorization_rules_program,
                    }
                }
            }
        )*
    };
}

delegate_inputs_from!(DelegateParams, RevokeParams);

impl TokenMetadataClient {
    fn resolve_metadata(&self, explicit: Option<Pubkey>, mint: &Pubkey) -> anyhow::Result<Pubkey> {
        or_derive(explicit, || self.metadata_pda(mint))
    }

    /// Master edition when the standard has one.
    fn resolve_edition(
        &self,
        explicit: Option<Pubkey>,
        mint: &Pubkey,
        token_standard: TokenStandard,
    ) -> anyhow::Result<Option<Pubkey>> {
        or_derive_if(explicit, token_standard.is_non_fungible(), || {
            self.master_edition_pda(mint)
        })
    }

    /// Token record when the standard is programmable.
    fn resolve_token_record(
        &self,
        explicit: Option<Pubkey>,
        mint: &Pubkey,
        token: &Pubkey,
        token_standard: TokenStandard,
    ) -> anyhow::Result<Option<Pubkey>> {
        or_derive_if(explicit, token_standard.is_programmable(), || {
            self.token_record_pda(mint, token)
        })
    }

    fn resolve_token(
        &self,
        explicit: Option<Pubkey>,
        owner: &Pubkey,
        mint: &Pubkey,
        token_program: &Pubkey,
    ) -> anyhow::Result<Pubkey> {
        or_derive(explicit, || self.associated_token(owner, mint, token_program))
    }

    /// Build a Create instruction.
    ///
    /// Defaults: authority is the identity, payer is the client payer, update
    /// authority is the authority, metadata and (for non-fungibles) master
    /// edition are PDAs. Non-fungibles get zero decimals and zero print
    /// supply; creators default to the authority with a 100% share;
    /// `is_collection` sets sized collection details.
    pub fn create_ix(&self, params: CreateParams) -> anyhow::Result<Instruction> {
        let authority = params.authority.unwrap_or(self.identity);
        let non_fungible = params.token_standard.is_non_fungible();
        let creators = params.creators.unwrap_or_else(|| {
            vec![Creator {
                address: authority,
                verified: true,
                share: 100,
            }]
        });
        validation::validate_metadata_fields(
            &params.name,
            &params.symbol,
            &params.uri,
            params.seller_fee_basis_points,
            Some(&creators),
        )?;

        let accounts = CreateAccounts {
            metadata: self.resolve_metadata(params.metadata, &params.mint)?,
            master_edition: self.resolve_edition(
                params.master_edition,
                &params.mint,
                params.token_standard,
            )?,
            mint: params.mint,
            mint_is_signer: params.mint_is_signer,
            authority,
            payer: params.payer.unwrap_or(self.payer),
            update_authority: params.update_authority.unwrap_or(authority),
            update_authority_is_signer: params.update_authority_is_signer,
            spl_token_program: params.spl_token_program.unwrap_or(SPL_TOKEN_PROGRAM_ID),
        };
        let args = CreateArgs::V1 {
            asset_data: AssetData {
                name: params.name,
                symbol: params.symbol,
                uri: params.uri,
                seller_fee_basis_points: params.seller_fee_basis_points,
                creators: Some(creators),
                primary_sale_happened: params.primary_sale_happened,
                is_mutable: params.is_mutable,
                token_standard: params.token_standard,
                collection: params.collection,
                uses: params.uses,
                collection_details: params
                    .is_collection
                    .then_some(CollectionDetails::V1 { size: 0 }),
                rule_set: params.rule_set,
            },
            decimals: params.decimals.or(non_fungible.then_some(0)),
            print_supply: params
                .print_supply
                .or(non_fungible.then_some(PrintSupply::Zero)),
        };
        builders::create(&self.program_id, &accounts, args)
    }

    /// Build a Mint instruction.
    ///
    /// Defaults: token owner and authority are the identity, the token is the
    /// owner's ATA, master edition for non-fungibles, token record for
    /// programmables.
    pub fn mint_ix(&self, params: MintParams) -> anyhow::Result<Instruction> {
        let owner = params.token_owner.unwrap_or(self.identity);
        let spl_token_program = params.spl_token_program.unwrap_or(SPL_TOKEN_PROGRAM_ID);
        let token = self.resolve_token(params.token, &owner, &params.mint, &spl_token_program)?;
        let accounts = MintAccounts {
            token,
            token_owner: Some(owner),
            metadata: self.resolve_metadata(params.metadata, &params.mint)?,
            master_edition: self.resolve_edition(
                params.master_edition,
                &params.mint,
                params.token_standard,
            )?,
            token_record: self.resolve_token_record(
                params.token_record,
                &params.mint,
                &token,
                params.token_standard,
            )?,
            mint: params.mint,
            authority: params.authority.unwrap_or(self.identity),
            delegate_record: params.delegate_record,
            payer: params.payer.unwrap_or(self.payer),
            spl_token_program,
            authorization_rules_program: rules_program(
                params.authorization_rules,
                params.authorization_rules_program,
            ),
            authorization_rules: params.authorization_rules,
        };
        let args = MintArgs::V1 {
            amount: params.amount,
            authorization_data: params.authorization_data,
        };
        builders::mint(&self.program_id, &accounts, args)
    }

    fn resolve_delegate_accounts(
        &self,
        inputs: DelegateInputs,
        kind: DelegateRecordKind,
    ) -> anyhow::Result<DelegateAccounts> {
        let mint = inputs.mint;
        let authority = inputs.authority.unwrap_or(self.identity);
        let owner = inputs.token_owner.unwrap_or(authority);
        let spl_token_program = inputs.spl_token_program.unwrap_or(SPL_TOKEN_PROGRAM_ID);

        let (delegate_record, token, token_record, spl_token_program) = match kind {
            DelegateRecordKind::Metadata(role) => {
                let update_authority = inputs.update_authority.unwrap_or(authority);
                let record = or_derive(inputs.delegate_record, || {
                    self.metadata_delegate_record_pda(
                        &mint,
                        role,
                        &update_authority,
                        &inputs.delegate,
                    )
                })?;
                (
                    Some(record),
                    inputs.token,
                    inputs.token_record,
                    inputs.spl_token_program,
                )
            }
            DelegateRecordKind::Holder(role) => {
                let record = or_derive(inputs.delegate_record, || {
                    self.holder_delegate_record_pda(&mint, role, &owner, &inputs.delegate)
                })?;
                let token = self.resolve_token(inputs.token, &owner, &mint, &spl_token_program)?;
                (
                    Some(record),
                    Some(token),
                    inputs.token_record,
                    Some(spl_token_program),
                )
            }
            DelegateRecordKind::Token => {
                let token = self.resolve_token(inputs.token, &owner, &mint, &spl_token_program)?;
                let token_record = self.resolve_token_record(
                    inputs.token_record,
                    &mint,
                    &token,
                    inputs.token_standard,
                )?;
                (
                    inputs.delegate_record,
                    Some(token),
                    token_record,
                    Some(spl_token_program),
                )
            }
        };

        Ok(DelegateAccounts {
            delegate_record,
            delegate: inputs.delegate,
            metadata: self.resolve_metadata(inputs.metadata, &mint)?,
            master_edition: self.resolve_edition(
                inputs.master_edition,
                &mint,
                inputs.token_standard,
            )?,
            token_record,
            mint,
            token,
            authority,
            payer: inputs.payer.unwrap_or(self.payer),
            spl_token_program,
            authorization_rules_program: rules_program(
                inputs.authorization_rules,
                inputs.authorization_rules_program,
            ),
            authorization_rules: inputs.authorization_rules,
        })
    }

    /// Build a Delegate instruction.
    ///
    /// Metadata roles derive the metadata delegate record from the update
    /// authority; the print delegate derives the holder delegate record from
    /// the token owner; token roles resolve the owner's token account and,
    /// for programmables, its token record.
    pub fn delegate_ix(&self, params: DelegateParams) -> anyhow::Result<Instruction> {
        let kind = delegate_record_kind(&params.args);
        let accounts = self.resolve_delegate_accounts((&params).into(), kind)?;
        builders::delegate(&self.program_id, &accounts, params.args)
    }

    /// Build a Revoke instruction. Resolves accounts like [`Self::delegate_ix`].
    pub fn revoke_ix(&self, params: RevokeParams) -> anyhow::Result<Instruction> {
        let kind = revoke_record_kind(params.args);
        let accounts = self.resolve_delegate_accounts((&params).into(), kind)?;
        builders::revoke(&self.program_id, &accounts, params.args)
    }

    /// Build an Update instruction.
    ///
    /// Delegate variants (`As*DelegateV2`) sign as the delegate; their
    /// delegate record is derived from `update_authority`, which is then
    /// required.
    pub fn update_ix(&self, params: UpdateParams) -> anyhow::Result<Instruction> {
        if let Some(data) = update_data(&params.args) {
            validation::validate_data(data)?;
        }
        let authority = params.authority.unwrap_or(self.identity);
        let delegate_record = match (params.delegate_record, update_delegate_role(&params.args)) {
            (Some(record), _) => Some(record),
            (None, Some(role)) => {
                let update_authority = params.update_authority.ok_or_else(|| {
                    anyhow::anyhow!("update_authority is required to derive the {role} record")
                })?;
                Some(self.metadata_delegate_record_pda(
                    &params.mint,
                    role,
                    &update_authority,
                    &authority,
                )?)
            }
            (None, None) => None,
        };
        let accounts = UpdateAccounts {
            authority,
            delegate_record,
            token: params.token,
            mint: params.mint,
            metadata: self.resolve_metadata(params.metadata, &params.mint)?,
            edition: self.resolve_edition(params.edition, &params.mint, params.token_standard)?,
            payer: params.payer.unwrap_or(self.payer),
            authorization_rules_program: rules_program(
                params.authorization_rules,
                params.authorization_rules_program,
            ),
            authorization_rules: params.authorization_rules,
        };
        builders::update(&self.program_id, &accounts, params.args)
    }

    /// Build a Burn instruction.
    ///
    /// Print editions pass `master_edition_mint` (and `edition_number` to
    /// resolve the edition marker).
    pub fn burn_ix(&self, params: BurnParams) -> anyhow::Result<Instruction> {
        let authority = params.authority.unwrap_or(self.identity);
        let owner = params.token_owner.unwrap_or(authority);
        let spl_token_program = params.spl_token_program.unwrap_or(SPL_TOKEN_PROGRAM_ID);
        let token = self.resolve_token(params.token, &owner, &params.mint, &spl_token_program)?;
        let master_edition = params
            .master_edition_mint
            .map(|mint| self.master_edition_pda(&mint))
            .transpose()?;
        let edition_marker = match (params.master_edition_mint, params.edition_number) {
            (Some(mint), Some(number)) => Some(self.edition_marker_pda(&mint, number)?),
            _ => None,
        };
        let accounts = BurnAccounts {
            authority,
            collection_metadata: params.collection_metadata,
            metadata: self.resolve_metadata(params.metadata, &params.mint)?,
            edition: self.resolve_edition(params.edition, &params.mint, params.token_standard)?,
            mint: params.mint,
            token,
            master_edition,
            master_edition_mint: params.master_edition_mint,
            master_edition_token: params.master_edition_token,
            edition_marker,
            token_record: self.resolve_token_record(
                params.token_record,
                &params.mint,
                &token,
                params.token_standard,
            )?,
            spl_token_program,
        };
        builders::burn(
            &self.program_id,
            &accounts,
            BurnArgs::V1 {
                amount: params.amount,
            },
        )
    }

    /// Build a Transfer instruction.
    ///
    /// Defaults: source owner is the authority, both token accounts are ATAs,
    /// both token records are PDAs for programmables.
    pub fn transfer_ix(&self, params: TransferParams) -> anyhow::Result<Instruction> {
        let authority = params.authority.unwrap_or(self.identity);
        let owner = params.token_owner.unwrap_or(authority);
        let spl_token_program = params.spl_token_program.unwrap_or(SPL_TOKEN_PROGRAM_ID);
        let token = self.resolve_token(params.token, &owner, &params.mint, &spl_token_program)?;
        let destination_token = self.resolve_token(
            params.destination_token,
            &params.destination_owner,
            &params.mint,
            &spl_token_program,
        )?;
        let accounts = TransferAccounts {
            token,
            token_owner: owner,
            destination_token,
            destination_owner: params.destination_owner,
            mint: params.mint,
            metadata: self.resolve_metadata(params.metadata, &params.mint)?,
            edition: self.resolve_edition(params.edition, &params.mint, params.token_standard)?,
            owner_token_record: self.resolve_token_record(
                params.owner_token_record,
                &params.mint,
                &token,
                params.token_standard,
            )?,
            destination_token_record: self.resolve_token_record(
                params.destination_token_record,
                &params.mint,
                &destination_token,
                params.token_standard,
            )?,
            authority,
            payer: params.payer.unwrap_or(self.payer),
            spl_token_program,
            authorization_rules_program: rules_program(
                params.authorization_rules,
                params.authorization_rules_program,
            ),
            authorization_rules: params.authorization_rules,
        };
        let args = TransferArgs::V1 {
            amount: params.amount,
            authorization_data: params.authorization_data,
        };
        builders::transfer(&self.program_id, &accounts, args)
    }

    fn resolve_lock_accounts(&self, params: &LockParams) -> anyhow::Result<LockAccounts> {
        let authority = params.authority.unwrap_or(self.identity);
        let owner = params.token_owner.unwrap_or(authority);
        let spl_token_program = params.spl_token_program.unwrap_or(SPL_TOKEN_PROGRAM_ID);
        let token = self.resolve_token(params.token, &owner, &params.mint, &spl_token_program)?;
        Ok(LockAccounts {
            authority,
            token_owner: Some(owner),
            token,
            mint: params.mint,
            metadata: self.resolve_metadata(params.metadata, &params.mint)?,
            edition: self.resolve_edition(params.edition, &params.mint, params.token_standard)?,
            token_record: self.resolve_token_record(
                params.token_record,
                &params.mint,
                &token,
                params.token_standard,
            )?,
            payer: params.payer.unwrap_or(self.payer),
            spl_token_program: Some(spl_token_program),
            authorization_rules_program: rules_program(
                params.authorization_rules,
                params.authorization_rules_program,
            ),
            authorization_rules: params.authorization_rules,
        })
    }

    /// Build a Lock instruction.
    pub fn lock_ix(&self, params: LockParams) -> anyhow::Result<Instruction> {
        let accounts = self.resolve_lock_accounts(&params)?;
        let args = LockArgs::V1 {
            authorization_data: params.authorization_data,
        };
        builders::lock(&self.program_id, &accounts, args)
    }

    /// Build an Unlock instruction. Resolves accounts like [`Self::lock_ix`].
    pub fn unlock_ix(&self, params: LockParams) -> anyhow::Result<Instruction> {
        let accounts = self.resolve_lock_accounts(&params)?;
        let args = UnlockArgs::V1 {
            authorization_data: params.authorization_data,
        };
        builders::unlock(&self.program_id, &accounts, args)
    }

    fn resolve_verify_accounts(&self, params: &VerifyParams) -> anyhow::Result<VerifyAccounts> {
        let (collection_metadata, collection_master_edition) = match params.args {
            VerificationArgs::CreatorV1 => {
                (params.collection_metadata, params.collection_master_edition)
            }
            VerificationArgs::CollectionV1 => {
                let collection_mint = params.collection_mint.ok_or_else(|| {
                    anyhow::anyhow!("collection_mint is required for collection verification")
                })?;
                (
                    Some(or_derive(params.collection_metadata, || {
                        self.metadata_pda(&collection_mint)
                    })?),
                    Some(or_derive(params.collection_master_edition, || {
                        self.master_edition_pda(&collection_mint)
                    })?),
                )
            }
        };
        Ok(VerifyAccounts {
            authority: params.authority.unwrap_or(self.identity),
            delegate_record: params.delegate_record,
            metadata: params.metadata,
            collection_mint: params.collection_mint,
            collection_metadata,
            collection_master_edition,
        })
    }

    /// Build a Verify instruction.
    ///
    /// Collection verification requires `collection_mint`; the collection
    /// metadata and master edition default to its PDAs.
    pub fn verify_ix(&self, params: VerifyParams) -> anyhow::Result<Instruction> {
        let accounts = self.resolve_verify_accounts(&params)?;
        builders::verify(&self.program_id, &accounts, params.args)
    }

    /// Build an Unverify instruction.
    pub fn unverify_ix(&self, params: VerifyParams) -> anyhow::Result<Instruction> {
        let accounts = self.resolve_verify_accounts(&params)?;
        builders::unverify(&self.program_id, &accounts, params.args)
    }
}
