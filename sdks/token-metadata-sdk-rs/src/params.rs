// === Params ===
//
// One struct per resolver. `None` fields are filled in by the resolver; see
// the `*_ix` methods on `TokenMetadataClient` for each default.

use {
    solana_program::pubkey::Pubkey,
    token_metadata_interface::{
        instruction::{DelegateArgs, RevokeArgs, UpdateArgs, VerificationArgs},
        types::{AuthorizationData, Collection, Creator, PrintSupply, TokenStandard, Uses},
    },
};

/// Parameters for the Create instruction.
#[derive(Clone, Debug)]
pub struct CreateParams {
    /// Mint the metadata describes
    pub mint: Pubkey,
    /// True when the mint account does not exist yet and signs to be created
    pub mint_is_signer: bool,
    /// Mint authority (default: client identity)
    pub authority: Option<Pubkey>,
    /// Rent payer (default: client payer)
    pub payer: Option<Pubkey>,
    /// Update authority (default: `authority`)
    pub update_authority: Option<Pubkey>,
    /// Whether the update authority signs
    pub update_authority_is_signer: bool,
    /// Metadata account (default: PDA)
    pub metadata: Option<Pubkey>,
    /// Master edition (default: PDA for non-fungible standards)
    pub master_edition: Option<Pubkey>,
    /// Token program (default: SPL Token)
    pub spl_token_program: Option<Pubkey>,
    /// Name (<= 32 bytes)
    pub name: String,
    /// Symbol (<= 10 bytes)
    pub symbol: String,
    /// URI (<= 200 bytes)
    pub uri: String,
    /// Royalty in basis points (<= 10000)
    pub seller_fee_basis_points: u16,
    /// Creators (default: the authority, verified, with a 100% share)
    pub creators: Option<Vec<Creator>>,
    pub primary_sale_happened: bool,
    pub is_mutable: bool,
    pub token_standard: TokenStandard,
    pub collection: Option<Collection>,
    pub uses: Option<Uses>,
    /// Create a (sized) collection parent
    pub is_collection: bool,
    /// Rule set for programmable assets
    pub rule_set: Option<Pubkey>,
    /// Mint decimals (default: 0 for non-fungible standards)
    pub decimals: Option<u8>,
    /// Print supply (default: zero for non-fungible standards)
    pub print_supply: Option<PrintSupply>,
}

impl CreateParams {
    /// Params for a new, mutable mint with everything else defaulted.
    pub fn new(
        mint: Pubkey,
        name: impl Into<String>,
        uri: impl Into<String>,
        seller_fee_basis_points: u16,
        token_standard: TokenStandard,
    ) -> Self {
        Self {
            mint,
            mint_is_signer: true,
            authority: None,
            payer: None,
            update_authority: None,
            update_authority_is_signer: false,
            metadata: None,
            master_edition: None,
            spl_token_program: None,
            name: name.into(),
            symbol: String::new(),
            uri: uri.into(),
            seller_fee_basis_points,
            creators: None,
            primary_sale_happened: false,
            is_mutable: true,
            token_standard,
            collection: None,
            uses: None,
            is_collection: false,
            rule_set: None,
            decimals: None,
            print_supply: None,
        }
    }
}

/// Parameters for the Mint instruction.
#[derive(Clone, Debug)]
pub struct MintParams {
    /// Mint to issue tokens of
    pub mint: Pubkey,
    /// Tokens to mint
    pub amount: u64,
    /// Standard of the asset; drives the edition and token record defaults
    pub token_standard: TokenStandard,
    /// Receiving wallet (default: client identity)
    pub token_owner: Option<Pubkey>,
    /// Receiving token account (default: ATA of `token_owner`)
    pub token: Option<Pubkey>,
    /// Mint authority (default: client identity)
    pub authority: Option<Pubkey>,
    pub payer: Option<Pubkey>,
    pub metadata: Option<Pubkey>,
    pub master_edition: Option<Pubkey>,
    /// Token record (default: PDA for programmable standards)
    pub token_record: Option<Pubkey>,
    pub delegate_record: Option<Pubkey>,
    pub spl_token_program: Option<Pubkey>,
    /// Rule set account
    pub authorization_rules: Option<Pubkey>,
    /// Rule set program (default: Token Auth Rules when a rule set is given)
    pub authorization_rules_program: Option<Pubkey>,
    pub authorization_data: Option<AuthorizationData>,
}

impl MintParams {
    pub fn new(mint: Pubkey, amount: u64, token_standard: TokenStandard) -> Self {
        Self {
            mint,
            amount,
            token_standard,
            token_owner: None,
            token: None,
            authority: None,
            payer: None,
            metadata: None,
            master_edition: None,
            token_record: None,
            delegate_record: None,
            spl_token_program: None,
            authorization_rules: None,
            authorization_rules_program: None,
            authorization_data: None,
        }
    }
}

/// Parameters for the Delegate instruction.
#[derive(Clone, Debug)]
pub struct DelegateParams {
    pub mint: Pubkey,
    /// Address receiving the role
    pub delegate: Pubkey,
    /// Role and role arguments
    pub args: DelegateArgs,
    pub token_standard: TokenStandard,
    /// Granting authority (default: client identity)
    pub authority: Option<Pubkey>,
    /// Update authority keying metadata delegate records (default: `authority`)
    pub update_authority: Option<Pubkey>,
    /// Token holder for token and holder roles (default: `authority`)
    pub token_owner: Option<Pubkey>,
    pub token: Option<Pubkey>,
    pub payer: Option<Pubkey>,
    pub metadata: Option<Pubkey>,
    pub master_edition: Option<Pubkey>,
    pub token_record: Option<Pubkey>,
    /// Delegate record (default: PDA for metadata and holder roles)
    pub delegate_record: Option<Pubkey>,
    pub spl_token_program: Option<Pubkey>,
    pub authorization_rules: Option<Pubkey>,
    pub authorization_rules_program: Option<Pubkey>,
}

impl DelegateParams {
    pub fn new(
        mint: Pubkey,
        delegate: Pubkey,
        args: DelegateArgs,
        token_standard: TokenStandard,
    ) -> Self {
        Self {
            mint,
            delegate,
            args,
            token_standard,
            authority: None,
            update_authority: None,
            token_owner: None,
            token: None,
            payer: None,
            metadata: None,
            master_edition: None,
            token_record: None,
            delegate_record: None,
            spl_token_program: None,
            authorization_rules: None,
            authorization_rules_program: None,
        }
    }
}

/// Parameters for the Revoke instruction. Same defaults as [`DelegateParams`].
#[derive(Clone, Debug)]
pub struct RevokeParams {
    pub mint: Pubkey,
    /// Address losing the role
    pub delegate: Pubkey,
    pub args: RevokeArgs,
    pub token_standard: TokenStandard,
    pub authority: Option<Pubkey>,
    pub update_authority: Option<Pubkey>,
    pub token_owner: Option<Pubkey>,
    pub token: Option<Pubkey>,
    pub payer: Option<Pubkey>,
    pub metadata: Option<Pubkey>,
    pub master_edition: Option<Pubkey>,
    pub token_record: Option<Pubkey>,
    pub delegate_record: Option<Pubkey>,
    pub spl_token_program: Option<Pubkey>,
    pub authorization_rules: Option<Pubkey>,
    pub authorization_rules_program: Option<Pubkey>,
}

impl RevokeParams {
    pub fn new(
        mint: Pubkey,
        delegate: Pubkey,
        args: RevokeArgs,
        token_standard: TokenStandard,
    ) -> Self {
        Self {
            mint,
            delegate,
            args,
            token_standard,
            authority: None,
            update_authority: None,
            token_owner: None,
            token: None,
            payer: None,
            metadata: None,
            master_edition: None,
            token_record: None,
            delegate_record: None,
            spl_token_program: None,
            authorization_rules: None,
            authorization_rules_program: None,
        }
    }
}

/// Parameters for the Update instruction.
#[derive(Clone, Debug)]
pub struct UpdateParams {
    pub mint: Pubkey,
    pub args: UpdateArgs,
    pub token_standard: TokenStandard,
    /// Signing authority (default: client identity)
    pub authority: Option<Pubkey>,
    /// Update authority keying the delegate record for `As*DelegateV2`
    /// updates (default: `authority`)
    pub update_authority: Option<Pubkey>,
    pub payer: Option<Pubkey>,
    pub metadata: Option<Pubkey>,
    /// Edition (default: master edition PDA for non-fungible standards)
    pub edition: Option<Pubkey>,
    pub token: Option<Pubkey>,
    /// Delegate record (default: PDA for metadata delegate updates)
    pub delegate_record: Option<Pubkey>,
    pub authorization_rules: Option<Pubkey>,
    pub authorization_rules_program: Option<Pubkey>,
}

impl UpdateParams {
    pub fn new(mint: Pubkey, args: UpdateArgs, token_standard: TokenStandard) -> Self {
        Self {
            mint,
            args,
            token_standard,
            authority: None,
            update_authority: None,
            payer: None,
            metadata: None,
            edition: None,
            token: None,
            delegate_record: None,
            authorization_rules: None,
            authorization_rules_program: None,
        }
    }
}

/// Parameters for the Burn instruction.
#[derive(Clone, Debug)]
pub struct BurnParams {
    pub mint: Pubkey,
    /// Tokens to burn
    pub amount: u64,
    pub token_standard: TokenStandard,
    /// Signing owner or delegate (default: client identity)
    pub authority: Option<Pubkey>,
    /// Holder (default: `authority`)
    pub token_owner: Option<Pubkey>,
    pub token: Option<Pubkey>,
    pub metadata: Option<Pubkey>,
    pub edition: Option<Pubkey>,
    /// Metadata of the collection the asset is verified in
    pub collection_metadata: Option<Pubkey>,
    /// Master edition mint, when burning a print edition
    pub master_edition_mint: Option<Pubkey>,
    /// Token account holding the master edition, when burning a print
    pub master_edition_token: Option<Pubkey>,
    /// Print edition number; selects the edition marker
    pub edition_number: Option<u64>,
    pub token_record: Option<Pubkey>,
    pub spl_token_program: Option<Pubkey>,
}

impl BurnParams {
    pub fn new(mint: Pubkey, amount: u64, token_standard: TokenStandard) -> Self {
        Self {
            mint,
            amount,
            token_standard,
            authority: None,
            token_owner: None,
            token: None,
            metadata: None,
            edition: None,
            collection_metadata: None,
            master_edition_mint: None,
            master_edition_token: None,
            edition_number: None,
            token_record: None,
            spl_token_program: None,
        }
    }
}

/// Parameters for the Transfer instruction.
#[derive(Clone, Debug)]
pub struct TransferParams {
    pub mint: Pubkey,
    /// Receiving wallet
    pub destination_owner: Pubkey,
    pub amount: u64,
    pub token_standard: TokenStandard,
    /// Signing owner or delegate (default: client identity)
    pub authority: Option<Pubkey>,
    /// Source wallet (default: `authority`)
    pub token_owner: Option<Pubkey>,
    /// Source token account (default: ATA of `token_owner`)
    pub token: Option<Pubkey>,
    /// Destination token account (default: ATA of `destination_owner`)
    pub destination_token: Option<Pubkey>,
    pub payer: Option<Pubkey>,
    pub metadata: Option<Pubkey>,
    pub edition: Option<Pubkey>,
    pub owner_token_record: Option<Pubkey>,
    pub destination_token_record: Option<Pubkey>,
    pub spl_token_program: Option<Pubkey>,
    pub authorization_rules: Option<Pubkey>,
    pub authorization_rules_program: Option<Pubkey>,
    pub authorization_data: Option<AuthorizationData>,
}

impl TransferParams {
    pub fn new(
        mint: Pubkey,
        destination_owner: Pubkey,
        amount: u64,
        token_standard: TokenStandard,
    ) -> Self {
        Self {
            mint,
            destination_owner,
            amount,
            token_standard,
            authority: None,
            token_owner: None,
            token: None,
            destination_token: None,
            payer: None,
            metadata: None,
            edition: None,
            owner_token_record: None,
            destination_token_record: None,
            spl_token_program: None,
            authorization_rules: None,
            authorization_rules_program: None,
            authorization_data: None,
        }
    }
}

/// Parameters for the Lock and Unlock instructions.
#[derive(Clone, Debug)]
pub struct LockParams {
    pub mint: Pubkey,
    pub token_standard: TokenStandard,
    /// Signing delegate or freeze authority (default: client identity)
    pub authority: Option<Pubkey>,
    /// Holder (default: `authority`)
    pub token_owner: Option<Pubkey>,
    pub token: Option<Pubkey>,
    pub payer: Option<Pubkey>,
    pub metadata: Option<Pubkey>,
    pub edition: Option<Pubkey>,
    pub token_record: Option<Pubkey>,
    pub spl_token_program: Option<Pubkey>,
    pub authorization_rules: Option<Pubkey>,
    pub authorization_rules_program: Option<Pubkey>,
    pub authorization_data: Option<AuthorizationData>,
}

impl LockParams {
    pub fn new(mint: Pubkey, token_standard: TokenStandard) -> Self {
        Self {
            mint,
            token_standard,
            authority: None,
            token_owner: None,
            token: None,
            payer: None,
            metadata: None,
            edition: None,
            token_record: None,
            spl_token_program: None,
            authorization_rules: None,
            authorization_rules_program: None,
            authorization_data: None,
        }
    }
}

/// Parameters for the Verify and Unverify instructions.
#[derive(Clone, Debug)]
pub struct VerifyParams {
    /// Creator or collection verification
    pub args: VerificationArgs,
    /// Metadata of the item being verified
    pub metadata: Pubkey,
    /// Signing creator or collection authority (default: client identity)
    pub authority: Option<Pubkey>,
    pub delegate_record: Option<Pubkey>,
    /// Collection parent mint; required for collection verification
    pub collection_mint: Option<Pubkey>,
    pub collection_metadata: Option<Pubkey>,
    pub collection_master_edition: Option<Pubkey>,
}

impl VerifyParams {
    pub fn new(args: VerificationArgs, metadata: Pubkey) -> Self {
        Self {
            args,
            metadata,
            authority: None,
            delegate_record: None,
            collection_mint: None,
            collection_metadata: None,
            collection_master_edition: None,
        }
    }
}
