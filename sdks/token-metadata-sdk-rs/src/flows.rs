// Transaction patterns (compose instructions; signing and submission left to caller)

use {
    crate::{
        resolvers::update_delegate_role, BurnParams, CreateParams, DelegateParams, LockParams,
        MintParams, RevokeParams, TokenMetadataClient, TransferParams, UpdateParams,
        VerifyParams,
    },
    solana_program::{instruction::Instruction, pubkey::Pubkey},
    token_metadata_interface::{
        instruction::{DelegateArgs, RevokeArgs, UpdateArgs, VerificationArgs},
        types::{AuthorizationData, TokenStandard},
        SPL_TOKEN_PROGRAM_ID,
    },
};

/// Convenience return type when a flow returns derived PDAs too.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DerivedPdas {
    /// Metadata PDA of the mint
    pub metadata: Pubkey,
    /// Master edition PDA, for non-fungible standards
    pub master_edition: Option<Pubkey>,
    /// Token account receiving the minted tokens, if the flow mints
    pub token: Option<Pubkey>,
    /// Token record of `token`, for programmable standards
    pub token_record: Option<Pubkey>,
}

/// Parameters shared by the metadata-role delegate helpers.
#[derive(Clone, Debug)]
pub struct MetadataDelegateFlowParams {
    pub mint: Pubkey,
    pub delegate: Pubkey,
    pub token_standard: TokenStandard,
    /// Update authority keying the record (default: client identity)
    pub update_authority: Option<Pubkey>,
    pub authorization_data: Option<AuthorizationData>,
}

/// Parameters shared by the token-role and holder-role delegate helpers.
#[derive(Clone, Debug)]
pub struct TokenDelegateFlowParams {
    pub mint: Pubkey,
    pub delegate: Pubkey,
    pub token_standard: TokenStandard,
    /// Tokens the delegate may act on (token roles only)
    pub amount: u64,
    /// Holder (default: client identity)
    pub token_owner: Option<Pubkey>,
    pub authorization_data: Option<AuthorizationData>,
}

impl TokenMetadataClient {
    /// Create metadata then mint `amount` tokens to `token_owner`.
    ///
    /// Returns: [create, mint]
    pub fn create_and_mint(
        &self,
        params: CreateParams,
        amount: u64,
        token_owner: Option<Pubkey>,
    ) -> anyhow::Result<Vec<Instruction>> {
        let mut mint = MintParams::new(params.mint, amount, params.token_standard);
        mint.token_owner = token_owner;
        mint.authority = params.authority;
        mint.payer = params.payer;
        mint.spl_token_program = params.spl_token_program;
        let rule_set = params.rule_set;
        let create_ix = self.create_ix(params)?;
        mint.authorization_rules = rule_set;
        Ok(vec![create_ix, self.mint_ix(mint)?])
    }

    /// Create a non-fungible and mint its single token.
    ///
    /// Returns: [create, mint(1)]
    pub fn create_nft(
        &self,
        mut params: CreateParams,
        token_owner: Option<Pubkey>,
    ) -> anyhow::Result<Vec<Instruction>> {
        params.token_standard = TokenStandard::NonFungible;
        self.create_and_mint(params, 1, token_owner)
    }

    /// Same as `create_nft` but also returns the derived PDAs.
    pub fn create_nft_with_pdas(
        &self,
        params: CreateParams,
        token_owner: Option<Pubkey>,
    ) -> anyhow::Result<(Vec<Instruction>, DerivedPdas)> {
        let pdas = self.derived_pdas(
            &params.mint,
            TokenStandard::NonFungible,
            token_owner.unwrap_or(self.identity),
            params.spl_token_program,
        )?;
        Ok((self.create_nft(params, token_owner)?, pdas))
    }

    /// Create a programmable non-fungible and mint its single token.
    ///
    /// Returns: [create, mint(1)]
    pub fn create_programmable_nft(
        &self,
        mut params: CreateParams,
        token_owner: Option<Pubkey>,
    ) -> anyhow::Result<Vec<Instruction>> {
        params.token_standard = TokenStandard::ProgrammableNonFungible;
        self.create_and_mint(params, 1, token_owner)
    }

    /// Same as `create_programmable_nft` but also returns the derived PDAs.
    pub fn create_programmable_nft_with_pdas(
        &self,
        params: CreateParams,
        token_owner: Option<Pubkey>,
    ) -> anyhow::Result<(Vec<Instruction>, DerivedPdas)> {
        let pdas = self.derived_pdas(
            &params.mint,
            TokenStandard::ProgrammableNonFungible,
            token_owner.unwrap_or(self.identity),
            params.spl_token_program,
        )?;
        Ok((self.create_programmable_nft(params, token_owner)?, pdas))
    }

    /// Create fungible metadata without minting.
    ///
    /// Returns: [create]
    pub fn create_fungible(&self, mut params: CreateParams) -> anyhow::Result<Vec<Instruction>> {
        params.token_standard = TokenStandard::Fungible;
        Ok(vec![self.create_ix(params)?])
    }

    /// Create fungible-asset metadata without minting.
    ///
    /// Returns: [create]
    pub fn create_fungible_asset(
        &self,
        mut params: CreateParams,
    ) -> anyhow::Result<Vec<Instruction>> {
        params.token_standard = TokenStandard::FungibleAsset;
        Ok(vec![self.create_ix(params)?])
    }

    fn derived_pdas(
        &self,
        mint: &Pubkey,
        token_standard: TokenStandard,
        token_owner: Pubkey,
        spl_token_program: Option<Pubkey>,
    ) -> anyhow::Result<DerivedPdas> {
        let token = self.associated_token(
            &token_owner,
            mint,
            &spl_token_program.unwrap_or(SPL_TOKEN_PROGRAM_ID),
        )?;
        Ok(DerivedPdas {
            metadata: self.metadata_pda(mint)?,
            master_edition: token_standard
                .is_non_fungible()
                .then(|| self.master_edition_pda(mint))
                .transpose()?,
            token: Some(token),
            token_record: token_standard
                .is_programmable()
                .then(|| self.token_record_pda(mint, &token))
                .transpose()?,
        })
    }

    fn metadata_delegate(
        &self,
        params: MetadataDelegateFlowParams,
        args: DelegateArgs,
    ) -> anyhow::Result<Vec<Instruction>> {
        let mut delegate =
            DelegateParams::new(params.mint, params.delegate, args, params.token_standard);
        delegate.update_authority = params.update_authority;
        Ok(vec![self.delegate_ix(delegate)?])
    }

    fn token_delegate(
        &self,
        params: TokenDelegateFlowParams,
        args: DelegateArgs,
    ) -> anyhow::Result<Vec<Instruction>> {
        let mut delegate =
            DelegateParams::new(params.mint, params.delegate, args, params.token_standard);
        delegate.token_owner = params.token_owner;
        Ok(vec![self.delegate_ix(delegate)?])
    }

    /// Collection delegate: may set and verify the collection.
    pub fn delegate_collection(
        &self,
        params: MetadataDelegateFlowParams,
    ) -> anyhow::Result<Vec<Instruction>> {
        let authorization_data = params.authorization_data.clone();
        self.metadata_delegate(params, DelegateArgs::CollectionV1 { authorization_data })
    }

    /// Data delegate: may update the `Data` fields.
    pub fn delegate_data(
        &self,
        params: MetadataDelegateFlowParams,
    ) -> anyhow::Result<Vec<Instruction>> {
        let authorization_data = params.authorization_data.clone();
        self.metadata_delegate(params, DelegateArgs::DataV1 { authorization_data })
    }

    /// Programmable config delegate: may change the rule set.
    pub fn delegate_programmable_config(
        &self,
        params: MetadataDelegateFlowParams,
    ) -> anyhow::Result<Vec<Instruction>> {
        let authorization_data = params.authorization_data.clone();
        self.metadata_delegate(
            params,
            DelegateArgs::ProgrammableConfigV1 { authorization_data },
        )
    }

    /// Authority item delegate: may change primary sale and authority fields.
    pub fn delegate_authority_item(
        &self,
        params: MetadataDelegateFlowParams,
    ) -> anyhow::Result<Vec<Instruction>> {
        let authorization_data = params.authorization_data.clone();
        self.metadata_delegate(params, DelegateArgs::AuthorityItemV1 { authorization_data })
    }

    /// Data item delegate: may update individual data fields.
    pub fn delegate_data_item(
        &self,
        params: MetadataDelegateFlowParams,
    ) -> anyhow::Result<Vec<Instruction>> {
        let authorization_data = params.authorization_data.clone();
        self.metadata_delegate(params, DelegateArgs::DataItemV1 { authorization_data })
    }

    /// Collection item delegate: may set the collection of this item only.
    pub fn delegate_collection_item(
        &self,
        params: MetadataDelegateFlowParams,
    ) -> anyhow::Result<Vec<Instruction>> {
        let authorization_data = params.authorization_data.clone();
        self.metadata_delegate(params, DelegateArgs::CollectionItemV1 { authorization_data })
    }

    /// Programmable config item delegate for this item only.
    pub fn delegate_programmable_config_item(
        &self,
        params: MetadataDelegateFlowParams,
    ) -> anyhow::Result<Vec<Instruction>> {
        let authorization_data = params.authorization_data.clone();
        self.metadata_delegate(
            params,
            DelegateArgs::ProgrammableConfigItemV1 { authorization_data },
        )
    }

    /// Sale delegate on the token: may transfer, and marks the token listed.
    pub fn delegate_sale(
        &self,
        params: TokenDelegateFlowParams,
    ) -> anyhow::Result<Vec<Instruction>> {
        let args = DelegateArgs::SaleV1 {
            amount: params.amount,
            authorization_data: params.authorization_data.clone(),
        };
        self.token_delegate(params, args)
    }

    /// Transfer delegate on the token.
    pub fn delegate_transfer(
        &self,
        params: TokenDelegateFlowParams,
    ) -> anyhow::Result<Vec<Instruction>> {
        let args = DelegateArgs::TransferV1 {
            amount: params.amount,
            authorization_data: params.authorization_data.clone(),
        };
        self.token_delegate(params, args)
    }

    /// Utility delegate: may lock, unlock and burn.
    pub fn delegate_utility(
        &self,
        params: TokenDelegateFlowParams,
    ) -> anyhow::Result<Vec<Instruction>> {
        let args = DelegateArgs::UtilityV1 {
            amount: params.amount,
            authorization_data: params.authorization_data.clone(),
        };
        self.token_delegate(params, args)
    }

    /// Staking delegate: may lock and unlock.
    pub fn delegate_staking(
        &self,
        params: TokenDelegateFlowParams,
    ) -> anyhow::Result<Vec<Instruction>> {
        let args = DelegateArgs::StakingV1 {
            amount: params.amount,
            authorization_data: params.authorization_data.clone(),
        };
        self.token_delegate(params, args)
    }

    /// SPL-style delegate; authorization data does not apply.
    pub fn delegate_standard(
        &self,
        params: TokenDelegateFlowParams,
    ) -> anyhow::Result<Vec<Instruction>> {
        let args = DelegateArgs::StandardV1 {
            amount: params.amount,
        };
        self.token_delegate(params, args)
    }

    /// Locked transfer delegate, limited to one destination.
    pub fn delegate_locked_transfer(
        &self,
        params: TokenDelegateFlowParams,
        locked_address: Pubkey,
    ) -> anyhow::Result<Vec<Instruction>> {
        let args = DelegateArgs::LockedTransferV1 {
            amount: params.amount,
            locked_address,
            authorization_data: params.authorization_data.clone(),
        };
        self.token_delegate(params, args)
    }

    /// Holder delegate allowed to print editions.
    pub fn delegate_print_delegate(
        &self,
        params: TokenDelegateFlowParams,
    ) -> anyhow::Result<Vec<Instruction>> {
        let args = DelegateArgs::PrintDelegateV1 {
            authorization_data: params.authorization_data.clone(),
        };
        self.token_delegate(params, args)
    }

    fn metadata_revoke(
        &self,
        params: MetadataDelegateFlowParams,
        args: RevokeArgs,
    ) -> anyhow::Result<Vec<Instruction>> {
        let mut revoke =
            RevokeParams::new(params.mint, params.delegate, args, params.token_standard);
        revoke.update_authority = params.update_authority;
        Ok(vec![self.revoke_ix(revoke)?])
    }

    fn token_revoke(
        &self,
        params: TokenDelegateFlowParams,
        args: RevokeArgs,
    ) -> anyhow::Result<Vec<Instruction>> {
        let mut revoke =
            RevokeParams::new(params.mint, params.delegate, args, params.token_standard);
        revoke.token_owner = params.token_owner;
        Ok(vec![self.revoke_ix(revoke)?])
    }

    /// Revoke a collection delegate.
    pub fn revoke_collection(
        &self,
        params: MetadataDelegateFlowParams,
    ) -> anyhow::Result<Vec<Instruction>> {
        self.metadata_revoke(params, RevokeArgs::CollectionV1)
    }

    /// Revoke a data delegate.
    pub fn revoke_data(
        &self,
        params: MetadataDelegateFlowParams,
    ) -> anyhow::Result<Vec<Instruction>> {
        self.metadata_revoke(params, RevokeArgs::DataV1)
    }

    /// Revoke a programmable config delegate.
    pub fn revoke_programmable_config(
        &self,
        params: MetadataDelegateFlowParams,
    ) -> anyhow::Result<Vec<Instruction>> {
        self.metadata_revoke(params, RevokeArgs::ProgrammableConfigV1)
    }

    /// Revoke an authority item delegate.
    pub fn revoke_authority_item(
        &self,
        params: MetadataDelegateFlowParams,
    ) -> anyhow::Result<Vec<Instruction>> {
        self.metadata_revoke(params, RevokeArgs::AuthorityItemV1)
    }

    /// Revoke a data item delegate.
    pub fn revoke_data_item(
        &self,
        params: MetadataDelegateFlowParams,
    ) -> anyhow::Result<Vec<Instruction>> {
        self.metadata_revoke(params, RevokeArgs::DataItemV1)
    }

    /// Revoke a collection item delegate.
    pub fn revoke_collection_item(
        &self,
        params: MetadataDelegateFlowParams,
    ) -> anyhow::Result<Vec<Instruction>> {
        self.metadata_revoke(params, RevokeArgs::CollectionItemV1)
    }

    /// Revoke a programmable config item delegate.
    pub fn revoke_programmable_config_item(
        &self,
        params: MetadataDelegateFlowParams,
    ) -> anyhow::Result<Vec<Instruction>> {
        self.metadata_revoke(params, RevokeArgs::ProgrammableConfigItemV1)
    }

    /// Revoke a sale delegate.
    pub fn revoke_sale(
        &self,
        params: TokenDelegateFlowParams,
    ) -> anyhow::Result<Vec<Instruction>> {
        self.token_revoke(params, RevokeArgs::SaleV1)
    }

    /// Revoke a transfer delegate.
    pub fn revoke_transfer(
        &self,
        params: TokenDelegateFlowParams,
    ) -> anyhow::Result<Vec<Instruction>> {
        self.token_revoke(params, RevokeArgs::TransferV1)
    }

    /// Revoke a utility delegate.
    pub fn revoke_utility(
        &self,
        params: TokenDelegateFlowParams,
    ) -> anyhow::Result<Vec<Instruction>> {
        self.token_revoke(params, RevokeArgs::UtilityV1)
    }

    /// Revoke a staking delegate.
    pub fn revoke_staking(
        &self,
        params: TokenDelegateFlowParams,
    ) -> anyhow::Result<Vec<Instruction>> {
        self.token_revoke(params, RevokeArgs::StakingV1)
    }

    /// Revoke an SPL-style delegate.
    pub fn revoke_standard(
        &self,
        params: TokenDelegateFlowParams,
    ) -> anyhow::Result<Vec<Instruction>> {
        self.token_revoke(params, RevokeArgs::StandardV1)
    }

    /// Revoke a locked transfer delegate.
    pub fn revoke_locked_transfer(
        &self,
        params: TokenDelegateFlowParams,
    ) -> anyhow::Result<Vec<Instruction>> {
        self.token_revoke(params, RevokeArgs::LockedTransferV1)
    }

    /// Clear the migration delegate left by a programmable migration.
    pub fn revoke_migration(
        &self,
        params: TokenDelegateFlowParams,
    ) -> anyhow::Result<Vec<Instruction>> {
        self.token_revoke(params, RevokeArgs::MigrationV1)
    }

    /// Revoke a print delegate.
    pub fn revoke_print_delegate(
        &self,
        params: TokenDelegateFlowParams,
    ) -> anyhow::Result<Vec<Instruction>> {
        self.token_revoke(params, RevokeArgs::PrintDelegateV1)
    }

    /// Update signed by the update authority. `args` must be `V1` or
    /// `AsUpdateAuthorityV2`; start from [`UpdateArgs::as_update_authority`].
    pub fn update_as_update_authority(
        &self,
        mint: Pubkey,
        token_standard: TokenStandard,
        args: UpdateArgs,
    ) -> anyhow::Result<Vec<Instruction>> {
        anyhow::ensure!(
            update_delegate_role(&args).is_none(),
            "delegate update variants are not signed by the update authority"
        );
        Ok(vec![self.update_ix(UpdateParams::new(
            mint,
            args,
            token_standard,
        ))?])
    }

    /// Convenience wrapper returning one-instruction Vec for transfer.
    pub fn transfer(&self, params: TransferParams) -> anyhow::Result<Vec<Instruction>> {
        Ok(vec![self.transfer_ix(params)?])
    }

    /// Convenience wrapper returning one-instruction Vec for burn.
    pub fn burn(&self, params: BurnParams) -> anyhow::Result<Vec<Instruction>> {
        Ok(vec![self.burn_ix(params)?])
    }

    /// Convenience wrapper returning one-instruction Vec for lock.
    pub fn lock(&self, params: LockParams) -> anyhow::Result<Vec<Instruction>> {
        Ok(vec![self.lock_ix(params)?])
    }

    /// Convenience wrapper returning one-instruction Vec for unlock.
    pub fn unlock(&self, params: LockParams) -> anyhow::Result<Vec<Instruction>> {
        Ok(vec![self.unlock_ix(params)?])
    }

    /// Verify `metadata` as a member of the collection of `collection_mint`,
    /// signed by the identity as collection authority.
    pub fn verify_collection(
        &self,
        metadata: Pubkey,
        collection_mint: Pubkey,
    ) -> anyhow::Result<Vec<Instruction>> {
        let mut params = VerifyParams::new(VerificationArgs::CollectionV1, metadata);
        params.collection_mint = Some(collection_mint);
        Ok(vec![self.verify_ix(params)?])
    }

    /// Sign off on `metadata` as the identity creator.
    pub fn verify_creator(&self, metadata: Pubkey) -> anyhow::Result<Vec<Instruction>> {
        Ok(vec![self.verify_ix(VerifyParams::new(
            VerificationArgs::CreatorV1,
            metadata,
        ))?])
    }

    pub fn unverify_collection(
        &self,
        metadata: Pubkey,
        collection_mint: Pubkey,
    ) -> anyhow::Result<Vec<Instruction>> {
        let mut params = VerifyParams::new(VerificationArgs::CollectionV1, metadata);
        params.collection_mint = Some(collection_mint);
        Ok(vec![self.unverify_ix(params)?])
    }

    pub fn unverify_creator(&self, metadata: Pubkey) -> anyhow::Result<Vec<Instruction>> {
        Ok(vec![self.unverify_ix(VerifyParams::new(
            VerificationArgs::CreatorV1,
            metadata,
        ))?])
    }
}
