//! Typed account reads over any account source.

use {
    anyhow::Context,
    async_trait::async_trait,
    solana_program::pubkey::Pubkey,
    std::{
        collections::HashMap,
        sync::{Arc, RwLock},
    },
    token_metadata_interface::{
        pda::PdaFinder,
        seeds::{MetadataDelegateFamily, RoleSeed},
        state::{
            EditionAccount, EditionMarker, EditionMarkerV2, MasterEdition, Metadata,
            MetadataAccount, MetadataDelegateRecord, Mint, TokenAccount, TokenRecord,
        },
    },
    tracing::debug,
};

/// Source of raw account data.
#[async_trait]
pub trait AccountFetcher: Send + Sync {
    /// Account data at `address`, or `None` when the account does not exist.
    async fn fetch_account_data(&self, address: &Pubkey) -> anyhow::Result<Option<Vec<u8>>>;
}

/// In-memory account source.
#[derive(Debug, Default)]
pub struct MemoryAccountFetcher {
    accounts: RwLock<HashMap<Pubkey, Vec<u8>>>,
}

impl MemoryAccountFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, address: Pubkey, data: Vec<u8>) -> anyhow::Result<()> {
        self.accounts
            .write()
            .map_err(|_| anyhow::anyhow!("account store lock poisoned"))?
            .insert(address, data);
        Ok(())
    }

    pub fn remove(&self, address: &Pubkey) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self
            .accounts
            .write()
            .map_err(|_| anyhow::anyhow!("account store lock poisoned"))?
            .remove(address))
    }
}

#[async_trait]
impl AccountFetcher for MemoryAccountFetcher {
    async fn fetch_account_data(&self, address: &Pubkey) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self
            .accounts
            .read()
            .map_err(|_| anyhow::anyhow!("account store lock poisoned"))?
            .get(address)
            .cloned())
    }
}

#[async_trait]
impl<T: AccountFetcher + ?Sized> AccountFetcher for Arc<T> {
    async fn fetch_account_data(&self, address: &Pubkey) -> anyhow::Result<Option<Vec<u8>>> {
        (**self).fetch_account_data(address).await
    }
}

/// A mint with its metadata and, for non-fungibles, its edition.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DigitalAsset {
    pub mint_address: Pubkey,
    pub mint: Mint,
    pub metadata_address: Pubkey,
    pub metadata: Metadata,
    pub edition_address: Pubkey,
    /// `None` for fungible assets
    pub edition: Option<EditionAccount>,
}

/// A digital asset as held in one token account.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DigitalAssetWithToken {
    pub asset: DigitalAsset,
    pub token_address: Pubkey,
    pub token: TokenAccount,
    /// Present for programmable assets
    pub token_record: Option<TokenRecord>,
}

/// Reads and decodes Token Metadata accounts through an [`AccountFetcher`].
#[derive(Clone, Debug)]
pub struct TokenMetadataReader<F> {
    fetcher: F,
    pdas: PdaFinder,
}

impl<F: AccountFetcher> TokenMetadataReader<F> {
    /// Reader for the canonical program id.
    pub fn new(fetcher: F) -> Self {
        Self::with_program_id(fetcher, token_metadata_interface::id())
    }

    pub fn with_program_id(fetcher: F, program_id: Pubkey) -> Self {
        Self {
            fetcher,
            pdas: PdaFinder::new(program_id),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn pdas(&self) -> &PdaFinder {
        &self.pdas
    }

    async fn fetch_decoded<T>(
        &self,
        address: &Pubkey,
        what: &str,
        unpack: impl FnOnce(&[u8]) -> token_metadata_interface::Result<T>,
    ) -> anyhow::Result<Option<T>> {
        let Some(data) = self.fetcher.fetch_account_data(address).await? else {
            debug!(%address, what, "account not found");
            return Ok(None);
        };
        let decoded = unpack(&data).with_context(|| format!("decode {what} at {address}"))?;
        Ok(Some(decoded))
    }

    async fn fetch_program_account<T: MetadataAccount>(
        &self,
        address: &Pubkey,
        what: &str,
    ) -> anyhow::Result<Option<T>> {
        self.fetch_decoded(address, what, T::unpack).await
    }

    pub async fn fetch_metadata(&self, mint: &Pubkey) -> anyhow::Result<Option<Metadata>> {
        let (address, _) = self.pdas.metadata(mint)?;
        self.fetch_program_account(&address, "metadata").await
    }

    pub async fn fetch_master_edition(
        &self,
        mint: &Pubkey,
    ) -> anyhow::Result<Option<MasterEdition>> {
        let (address, _) = self.pdas.master_edition(mint)?;
        self.fetch_program_account(&address, "master edition").await
    }

    /// Master or print edition at the edition PDA of `mint`.
    pub async fn fetch_edition_account(
        &self,
        mint: &Pubkey,
    ) -> anyhow::Result<Option<EditionAccount>> {
        let (address, _) = self.pdas.edition(mint)?;
        self.fetch_decoded(&address, "edition", EditionAccount::unpack)
            .await
    }

    pub async fn fetch_token_record(
        &self,
        mint: &Pubkey,
        token: &Pubkey,
    ) -> anyhow::Result<Option<TokenRecord>> {
        let (address, _) = self.pdas.token_record(mint, token)?;
        self.fetch_program_account(&address, "token record").await
    }

    pub async fn fetch_metadata_delegate_record<R: MetadataDelegateFamily>(
        &self,
        mint: &Pubkey,
        role: impl Into<RoleSeed<R>>,
        update_authority: &Pubkey,
        delegate: &Pubkey,
    ) -> anyhow::Result<Option<MetadataDelegateRecord>> {
        let (address, _) =
            self.pdas
                .metadata_delegate_record(mint, role, update_authority, delegate)?;
        self.fetch_program_account(&address, "metadata delegate record")
            .await
    }

    pub async fn fetch_mint(&self, mint: &Pubkey) -> anyhow::Result<Option<Mint>> {
        self.fetch_decoded(mint, "mint", Mint::unpack).await
    }

    pub async fn fetch_token_account(
        &self,
        token: &Pubkey,
    ) -> anyhow::Result<Option<TokenAccount>> {
        self.fetch_decoded(token, "token account", TokenAccount::unpack)
            .await
    }

    /// Mint, metadata and edition of `mint`. `None` unless both the mint and
    /// its metadata exist.
    pub async fn fetch_digital_asset(
        &self,
        mint: &Pubkey,
    ) -> anyhow::Result<Option<DigitalAsset>> {
        let Some(mint_account) = self.fetch_mint(mint).await? else {
            return Ok(None);
        };
        let (metadata_address, _) = self.pdas.metadata(mint)?;
        let Some(metadata) = self
            .fetch_program_account::<Metadata>(&metadata_address, "metadata")
            .await?
        else {
            return Ok(None);
        };
        let (edition_address, _) = self.pdas.edition(mint)?;
        let edition = self
            .fetch_decoded(&edition_address, "edition", EditionAccount::unpack)
            .await?;
        Ok(Some(DigitalAsset {
            mint_address: *mint,
            mint: mint_account,
            metadata_address,
            metadata,
            edition_address,
            edition,
        }))
    }

    /// Digital asset held in `owner`'s associated token account, with the
    /// token record when the asset is programmable.
    pub async fn fetch_digital_asset_with_token(
        &self,
        mint: &Pubkey,
        owner: &Pubkey,
    ) -> anyhow::Result<Option<DigitalAssetWithToken>> {
        let (token_address, _) = self.pdas.associated_token(owner, mint)?;
        self.fetch_digital_asset_with_token_account(mint, &token_address)
            .await
    }

    pub async fn fetch_digital_asset_with_token_account(
        &self,
        mint: &Pubkey,
        token_address: &Pubkey,
    ) -> anyhow::Result<Option<DigitalAssetWithToken>> {
        let Some(asset) = self.fetch_digital_asset(mint).await? else {
            return Ok(None);
        };
        let Some(token) = self.fetch_token_account(token_address).await? else {
            return Ok(None);
        };
        anyhow::ensure!(
            token.mint == *mint,
            "token account {token_address} holds mint {}, not {mint}",
            token.mint
        );
        let programmable = asset
            .metadata
            .token_standard
            .is_some_and(|standard| standard.is_programmable());
        let token_record = if programmable {
            self.fetch_token_record(mint, token_address).await?
        } else {
            None
        };
        Ok(Some(DigitalAssetWithToken {
            asset,
            token_address: *token_address,
            token,
            token_record,
        }))
    }

    /// Whether print `edition` of master `mint` has been minted. Checks the
    /// V2 marker first, then the V1 marker of the edition's bucket.
    pub async fn is_edition_printed(&self, mint: &Pubkey, edition: u64) -> anyhow::Result<bool> {
        let (v2_address, _) = self.pdas.edition_marker_v2(mint)?;
        if let Some(marker) = self
            .fetch_program_account::<EditionMarkerV2>(&v2_address, "edition marker v2")
            .await?
        {
            return Ok(marker.edition_taken(edition));
        }
        let (v1_address, _) = self.pdas.edition_marker(mint, edition)?;
        Ok(self
            .fetch_program_account::<EditionMarker>(&v1_address, "edition marker")
            .await?
            .is_some_and(|marker| marker.edition_taken(edition)))
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        token_metadata_interface::{
            codec::{encode, COption},
            seeds::MetadataDelegateRole,
            state::{AccountState, Edition},
            types::{Key, TokenStandard, TokenState},
        },
    };

    fn key(n: u8) -> Pubkey {
        Pubkey::new_from_array([n; 32])
    }

    fn metadata(mint: Pubkey, token_standard: TokenStandard) -> Metadata {
        Metadata {
            key: Key::MetadataV1,
            update_authority: key(1),
            mint,
            name: "Asset".into(),
            symbol: "AST".into(),
            uri: "https://example.com/a.json".into(),
            seller_fee_basis_points: 500,
            creators: None,
            primary_sale_happened: false,
            is_mutable: true,
            edition_nonce: Some(255),
            token_standard: Some(token_standard),
            collection: None,
            uses: None,
            collection_details: None,
            programmable_config: None,
        }
    }

    fn mint_account() -> Mint {
        Mint {
            mint_authority: COption(Some(key(1))),
            supply: 1,
            decimals: 0,
            is_initialized: true,
            freeze_authority: COption(Some(key(1))),
        }
    }

    fn token_account(mint: Pubkey, owner: Pubkey) -> TokenAccount {
        TokenAccount {
            mint,
            owner,
            amount: 1,
            state: AccountState::Initialized,
            ..TokenAccount::default()
        }
    }

    fn seeded(mint: Pubkey, standard: TokenStandard) -> TokenMetadataReader<MemoryAccountFetcher> {
        let reader = TokenMetadataReader::new(MemoryAccountFetcher::new());
        let pdas = reader.pdas().clone();
        let store = reader.fetcher();
        store.insert(mint, encode(&mint_account()).unwrap()).unwrap();
        store
            .insert(
                pdas.metadata(&mint).unwrap().0,
                encode(&metadata(mint, standard)).unwrap(),
            )
            .unwrap();
        store
            .insert(
                pdas.master_edition(&mint).unwrap().0,
                encode(&MasterEdition {
                    key: Key::MasterEditionV2,
                    supply: 0,
                    max_supply: Some(10),
                })
                .unwrap(),
            )
            .unwrap();
        reader
    }

    #[tokio::test]
    async fn missing_accounts_are_none() {
        let reader = TokenMetadataReader::new(MemoryAccountFetcher::new());
        let mint = key(3);
        assert_eq!(reader.fetch_metadata(&mint).await.unwrap(), None);
        assert_eq!(reader.fetch_mint(&mint).await.unwrap(), None);
        assert_eq!(reader.fetch_edition_account(&mint).await.unwrap(), None);
        assert_eq!(reader.fetch_digital_asset(&mint).await.unwrap(), None);
        assert_eq!(
            reader
                .fetch_metadata_delegate_record(&mint, MetadataDelegateRole::Data, &key(1), &key(2))
                .await
                .unwrap(),
            None
        );
        assert!(!reader.is_edition_printed(&mint, 1).await.unwrap());
    }

    #[tokio::test]
    async fn decodes_full_digital_asset() {
        let mint = key(3);
        let reader = seeded(mint, TokenStandard::NonFungible);
        let asset = reader.fetch_digital_asset(&mint).await.unwrap().unwrap();
        assert_eq!(asset.metadata.trimmed_name(), "Asset");
        assert_eq!(asset.mint.supply, 1);
        assert!(asset.edition.as_ref().is_some_and(EditionAccount::is_master));
        assert_eq!(
            asset.metadata_address,
            reader.pdas().metadata(&mint).unwrap().0
        );
    }

    #[tokio::test]
    async fn wrong_key_byte_is_an_error() {
        let mint = key(3);
        let reader = seeded(mint, TokenStandard::NonFungible);
        let address = reader.pdas().metadata(&mint).unwrap().0;
        let mut data = reader
            .fetcher()
            .fetch_account_data(&address)
            .await
            .unwrap()
            .unwrap();
        data[0] = Key::TokenRecord as u8;
        reader.fetcher().insert(address, data).unwrap();
        let err = reader.fetch_metadata(&mint).await.unwrap_err();
        assert!(err.to_string().contains("decode metadata"));
    }

    #[tokio::test]
    async fn print_edition_dispatches_on_key() {
        let mint = key(3);
        let reader = seeded(mint, TokenStandard::NonFungible);
        let edition = Edition {
            key: Key::EditionV1,
            parent: key(9),
            edition: 4,
        };
        reader
            .fetcher()
            .insert(
                reader.pdas().edition(&mint).unwrap().0,
                encode(&edition).unwrap(),
            )
            .unwrap();
        assert_eq!(
            reader.fetch_edition_account(&mint).await.unwrap(),
            Some(EditionAccount::Print(edition))
        );
        assert!(reader.fetch_master_edition(&mint).await.is_err());
    }

    #[tokio::test]
    async fn programmable_asset_with_token_loads_record() {
        let mint = key(3);
        let owner = key(4);
        let reader = seeded(mint, TokenStandard::ProgrammableNonFungible);
        let pdas = reader.pdas().clone();
        let token = pdas.associated_token(&owner, &mint).unwrap().0;
        let record = TokenRecord {
            key: Key::TokenRecord,
            bump: 254,
            state: TokenState::Locked,
            rule_set_revision: None,
            delegate: Some(key(5)),
            delegate_role: None,
            locked_transfer: None,
        };
        let store = reader.fetcher();
        store
            .insert(token, encode(&token_account(mint, owner)).unwrap())
            .unwrap();
        store
            .insert(
                pdas.token_record(&mint, &token).unwrap().0,
                encode(&record).unwrap(),
            )
            .unwrap();

        let held = reader
            .fetch_digital_asset_with_token(&mint, &owner)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(held.token_address, token);
        assert_eq!(held.token.owner, owner);
        assert_eq!(held.token_record, Some(record));

        store
            .insert(token, encode(&token_account(key(8), owner)).unwrap())
            .unwrap();
        assert!(reader
            .fetch_digital_asset_with_token(&mint, &owner)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn edition_printed_prefers_v2_marker() {
        let mint = key(3);
        let reader = seeded(mint, TokenStandard::NonFungible);
        let pdas = reader.pdas().clone();

        let mut v1 = EditionMarker {
            key: Key::EditionMarker,
            ledger: [0; 31],
        };
        v1.insert_edition(250);
        reader
            .fetcher()
            .insert(
                pdas.edition_marker(&mint, 250u64).unwrap().0,
                encode(&v1).unwrap(),
            )
            .unwrap();
        assert!(reader.is_edition_printed(&mint, 250).await.unwrap());
        assert!(!reader.is_edition_printed(&mint, 251).await.unwrap());

        let mut v2 = EditionMarkerV2 {
            key: Key::EditionMarkerV2,
            ledger: Vec::new(),
        };
        v2.insert_edition(251).unwrap();
        reader
            .fetcher()
            .insert(
                pdas.edition_marker_v2(&mint).unwrap().0,
                encode(&v2).unwrap(),
            )
            .unwrap();
        assert!(reader.is_edition_printed(&mint, 251).await.unwrap());
        assert!(!reader.is_edition_printed(&mint, 250).await.unwrap());
    }
}
