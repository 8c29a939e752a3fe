//! Token Metadata – Rust SDK (client-side helpers)
//!
//! This crate provides:
//! - PDA helpers for every Token Metadata account
//! - Instruction builders with correct account ordering ([`builders`])
//! - Builders with default account resolution and client-side validation
//!   (`*_ix` methods on [`TokenMetadataClient`])
//! - Flows for common sequences (compose `Vec<Instruction>`)
//! - An async account reader over any [`AccountFetcher`]
//!
//! Signers, recent blockhashes, and submission are left to the caller.

pub mod builders;
mod flows;
mod params;
pub mod reader;
mod resolvers;
#[cfg(feature = "rpc")]
pub mod rpc;
pub mod validation;

use {
    solana_program::pubkey::Pubkey,
    token_metadata_interface::{
        pda::PdaFinder,
        seeds::{HolderDelegateRole, MetadataDelegateFamily, RoleSeed},
        EditionNumber,
    },
};

pub use {
    flows::{DerivedPdas, MetadataDelegateFlowParams, TokenDelegateFlowParams},
    params::*,
    reader::{
        AccountFetcher, DigitalAsset, DigitalAssetWithToken, MemoryAccountFetcher,
        TokenMetadataReader,
    },
    resolvers::{
        delegate_record_kind, revoke_record_kind, update_delegate_role, DelegateRecordKind,
    },
    token_metadata_interface as interface,
};

/// Client for building PDAs and instructions for the Token Metadata program.
///
/// `identity` is the default authority of every instruction and `payer` the
/// default fee/rent payer; both can be overridden per call.
#[derive(Clone, Debug)]
pub struct TokenMetadataClient {
    /// Token Metadata program every PDA and instruction targets
    pub program_id: Pubkey,
    /// Default authority
    pub identity: Pubkey,
    /// Default payer
    pub payer: Pubkey,
    pdas: PdaFinder,
}

impl TokenMetadataClient {
    /// Client for the canonical program id, with `identity` also paying.
    pub fn new(identity: Pubkey) -> Self {
        Self::with_program_id(token_metadata_interface::id(), identity)
    }

    /// Client for a program deployed at `program_id`.
    pub fn with_program_id(program_id: Pubkey, identity: Pubkey) -> Self {
        Self {
            program_id,
            identity,
            payer: identity,
            pdas: PdaFinder::new(program_id),
        }
    }

    /// Use `payer` instead of the identity for fees and rent.
    pub fn with_payer(mut self, payer: Pubkey) -> Self {
        self.payer = payer;
        self
    }

    /// PDA finder bound to this client's program id.
    pub fn pdas(&self) -> &PdaFinder {
        &self.pdas
    }

    /// Derive the metadata PDA for a given mint.
    pub fn metadata_pda(&self, mint: &Pubkey) -> anyhow::Result<Pubkey> {
        Ok(self.metadata_pda_and_bump(mint)?.0)
    }

    /// Derive the metadata PDA for a given mint, with the bump.
    pub fn metadata_pda_and_bump(&self, mint: &Pubkey) -> anyhow::Result<(Pubkey, u8)> {
        Ok(self.pdas.metadata(mint)?)
    }

    /// Derive the (master) edition PDA for a given mint.
    pub fn master_edition_pda(&self, mint: &Pubkey) -> anyhow::Result<Pubkey> {
        Ok(self.master_edition_pda_and_bump(mint)?.0)
    }

    /// Derive the (master) edition PDA for a given mint, with the bump.
    pub fn master_edition_pda_and_bump(&self, mint: &Pubkey) -> anyhow::Result<(Pubkey, u8)> {
        Ok(self.pdas.master_edition(mint)?)
    }

    /// Derive the edition marker PDA tracking `edition_number`.
    pub fn edition_marker_pda(
        &self,
        mint: &Pubkey,
        edition_number: impl Into<EditionNumber>,
    ) -> anyhow::Result<Pubkey> {
        Ok(self.pdas.edition_marker(mint, edition_number)?.0)
    }

    /// Derive the edition marker V2 PDA, one per master edition.
    pub fn edition_marker_v2_pda(&self, mint: &Pubkey) -> anyhow::Result<Pubkey> {
        Ok(self.pdas.edition_marker_v2(mint)?.0)
    }

    /// Derive the token record PDA of a token account.
    pub fn token_record_pda(&self, mint: &Pubkey, token: &Pubkey) -> anyhow::Result<Pubkey> {
        Ok(self.pdas.token_record(mint, token)?.0)
    }

    /// Derive a metadata delegate record PDA, keyed by the update authority.
    pub fn metadata_delegate_record_pda<R: MetadataDelegateFamily>(
        &self,
        mint: &Pubkey,
        role: impl Into<RoleSeed<R>>,
        update_authority: &Pubkey,
        delegate: &Pubkey,
    ) -> anyhow::Result<Pubkey> {
        Ok(self
            .pdas
            .metadata_delegate_record(mint, role, update_authority, delegate)?
            .0)
    }

    /// Derive a holder delegate record PDA, keyed by the token owner.
    pub fn holder_delegate_record_pda(
        &self,
        mint: &Pubkey,
        role: impl Into<RoleSeed<HolderDelegateRole>>,
        owner: &Pubkey,
        delegate: &Pubkey,
    ) -> anyhow::Result<Pubkey> {
        Ok(self
            .pdas
            .holder_delegate_record(mint, role, owner, delegate)?
            .0)
    }

    /// Derive the legacy collection authority record PDA.
    pub fn collection_authority_record_pda(
        &self,
        mint: &Pubkey,
        collection_authority: &Pubkey,
    ) -> anyhow::Result<Pubkey> {
        Ok(self
            .pdas
            .collection_authority_record(mint, collection_authority)?
            .0)
    }

    /// Derive the legacy use authority record PDA.
    pub fn use_authority_record_pda(
        &self,
        mint: &Pubkey,
        use_authority: &Pubkey,
    ) -> anyhow::Result<Pubkey> {
        Ok(self.pdas.use_authority_record(mint, use_authority)?.0)
    }

    /// Associated token account of `owner` for `mint` under `token_program`.
    pub fn associated_token(
        &self,
        owner: &Pubkey,
        mint: &Pubkey,
        token_program: &Pubkey,
    ) -> anyhow::Result<Pubkey> {
        Ok(self
            .pdas
            .associated_token_with_program(owner, mint, token_program)?
            .0)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use {
        super::*,
        token_metadata_interface::{
            seeds::MetadataDelegateRole,
            types::{AssetData, TokenStandard},
        },
    };

    pub(crate) fn key(n: u8) -> Pubkey {
        Pubkey::new_from_array([n; 32])
    }

    pub(crate) fn asset_data() -> AssetData {
        AssetData {
            name: "Asset".to_string(),
            symbol: "AST".to_string(),
            uri: "https://example.com/asset.json".to_string(),
            seller_fee_basis_points: 500,
            creators: None,
            primary_sale_happened: false,
            is_mutable: true,
            token_standard: TokenStandard::NonFungible,
            collection: None,
            uses: None,
            collection_details: None,
            rule_set: None,
        }
    }

    #[test]
    fn client_defaults() {
        let client = TokenMetadataClient::new(key(1));
        assert_eq!(client.program_id, token_metadata_interface::id());
        assert_eq!(client.payer, key(1));
        let client = client.with_payer(key(2));
        assert_eq!(client.identity, key(1));
        assert_eq!(client.payer, key(2));
    }

    #[test]
    fn pda_helpers_follow_the_interface() {
        let client = TokenMetadataClient::new(key(1));
        let mint = key(9);
        assert_eq!(
            client.metadata_pda(&mint).unwrap(),
            token_metadata_interface::find_metadata_pda_with_program(&client.program_id, &mint)
                .unwrap()
                .0
        );
        assert_eq!(
            client.master_edition_pda(&mint).unwrap(),
            client.pdas().edition(&mint).unwrap().0
        );
        let by_role = client
            .metadata_delegate_record_pda(&mint, MetadataDelegateRole::Data, &key(1), &key(2))
            .unwrap();
        let by_literal = client
            .metadata_delegate_record_pda::<MetadataDelegateRole>(
                &mint,
                "data_delegate",
                &key(1),
                &key(2),
            )
            .unwrap();
        assert_eq!(by_role, by_literal);
    }
}
