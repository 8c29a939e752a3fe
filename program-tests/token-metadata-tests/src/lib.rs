//! Shared harness for the SDK integration tests: a client and reader over one
//! in-memory account store, plus a ledger that records the accounts the
//! program would write for the instructions the SDK builds.

use {
    borsh::BorshSerialize,
    solana_program::{instruction::Instruction, pubkey::Pubkey},
    std::{future::Future, sync::Arc},
    token_metadata_interface::{
        codec::{encode, COption},
        instruction::{CreateArgs, DelegateArgs, MetadataInstruction, MintArgs},
        state::{
            AccountState, HolderDelegateRecord, MasterEdition, Metadata, MetadataAccount,
            MetadataDelegateRecord, Mint, TokenAccount, TokenRecord,
        },
        types::{Key, PrintSupply, ProgrammableConfig, TokenDelegateRole, TokenState},
    },
    token_metadata_sdk::{
        delegate_record_kind, DelegateRecordKind, MemoryAccountFetcher, TokenMetadataClient,
        TokenMetadataReader,
    },
    tracing::debug,
};

pub struct TestContext {
    pub identity: Pubkey,
    pub client: TokenMetadataClient,
    pub reader: TokenMetadataReader<Arc<MemoryAccountFetcher>>,
    store: Arc<MemoryAccountFetcher>,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        let identity = Pubkey::new_unique();
        let store = Arc::new(MemoryAccountFetcher::new());
        Self {
            identity,
            client: TokenMetadataClient::new(identity),
            reader: TokenMetadataReader::new(Arc::clone(&store)),
            store,
        }
    }

    pub fn generate_pubkey(&self) -> Pubkey {
        Pubkey::new_unique()
    }

    pub fn store(&self) -> &MemoryAccountFetcher {
        &self.store
    }

    fn program_id(&self) -> Pubkey {
        self.client.program_id
    }

    fn supplied(&self, ix: &Instruction, index: usize) -> anyhow::Result<Option<Pubkey>> {
        let meta = ix
            .accounts
            .get(index)
            .ok_or_else(|| anyhow::anyhow!("instruction has no account #{index}"))?;
        Ok((meta.pubkey != self.program_id()).then_some(meta.pubkey))
    }

    fn account(&self, ix: &Instruction, index: usize) -> anyhow::Result<Pubkey> {
        self.supplied(ix, index)?
            .ok_or_else(|| anyhow::anyhow!("account #{index} omitted"))
    }

    async fn load<T: MetadataAccount>(&self, address: &Pubkey) -> anyhow::Result<Option<T>> {
        use token_metadata_sdk::AccountFetcher as _;
        match self.store.fetch_account_data(address).await? {
            Some(data) => Ok(Some(T::unpack(&data)?)),
            None => Ok(None),
        }
    }

    fn store_account(&self, address: Pubkey, value: &impl BorshSerialize) -> anyhow::Result<()> {
        self.store.insert(address, encode(value)?)
    }

    /// Record the accounts written by each instruction, in order.
    pub async fn apply_all(&self, ixs: &[Instruction]) -> anyhow::Result<()> {
        for ix in ixs {
            self.apply(ix).await?;
        }
        Ok(())
    }

    /// Record the accounts one instruction writes. Create, Mint, Delegate,
    /// Lock and Unlock are modelled.
    pub async fn apply(&self, ix: &Instruction) -> anyhow::Result<()> {
        anyhow::ensure!(
            ix.program_id == self.program_id(),
            "instruction for foreign program {}",
            ix.program_id
        );
        let instruction = MetadataInstruction::unpack(&ix.data)?;
        debug!(name = instruction.name(), "applying");
        match instruction {
            MetadataInstruction::Create(args) => self.apply_create(ix, args).await,
            MetadataInstruction::Mint(args) => self.apply_mint(ix, args).await,
            MetadataInstruction::Delegate(args) => self.apply_delegate(ix, args).await,
            MetadataInstruction::Lock(_) => self.apply_lock(ix, true).await,
            MetadataInstruction::Unlock(_) => self.apply_lock(ix, false).await,
            other => anyhow::bail!("{} is not modelled by the test ledger", other.name()),
        }
    }

    async fn apply_create(&self, ix: &Instruction, args: CreateArgs) -> anyhow::Result<()> {
        let CreateArgs::V1 {
            asset_data,
            decimals,
            print_supply,
        } = args;
        let metadata_address = self.account(ix, 0)?;
        let master_edition = self.supplied(ix, 1)?;
        let mint = self.account(ix, 2)?;
        let authority = self.account(ix, 3)?;
        let update_authority = self.account(ix, 5)?;

        let edition_nonce = match master_edition {
            Some(_) => Some(self.client.master_edition_pda_and_bump(&mint)?.1),
            None => None,
        };
        let programmable_config = asset_data
            .token_standard
            .is_programmable()
            .then_some(ProgrammableConfig::V1 {
                rule_set: asset_data.rule_set,
            });
        let metadata = Metadata {
            key: Key::MetadataV1,
            update_authority,
            mint,
            name: asset_data.name,
            symbol: asset_data.symbol,
            uri: asset_data.uri,
            seller_fee_basis_points: asset_data.seller_fee_basis_points,
            creators: asset_data.creators,
            primary_sale_happened: asset_data.primary_sale_happened,
            is_mutable: asset_data.is_mutable,
            edition_nonce,
            token_standard: Some(asset_data.token_standard),
            collection: asset_data.collection,
            uses: asset_data.uses,
            collection_details: asset_data.collection_details,
            programmable_config,
        };
        self.store_account(metadata_address, &metadata)?;

        if self.reader.fetch_mint(&mint).await?.is_none() {
            let mint_account = Mint {
                mint_authority: COption(Some(master_edition.unwrap_or(authority))),
                supply: 0,
                decimals: decimals.unwrap_or(0),
                is_initialized: true,
                freeze_authority: COption(Some(master_edition.unwrap_or(authority))),
            };
            self.store_account(mint, &mint_account)?;
        }

        if let Some(address) = master_edition {
            let max_supply = match print_supply.unwrap_or(PrintSupply::Zero) {
                PrintSupply::Zero => Some(0),
                PrintSupply::Limited(n) => Some(n),
                PrintSupply::Unlimited => None,
            };
            self.store_account(
                address,
                &MasterEdition {
                    key: Key::MasterEditionV2,
                    supply: 0,
                    max_supply,
                },
            )?;
        }
        Ok(())
    }

    async fn apply_mint(&self, ix: &Instruction, args: MintArgs) -> anyhow::Result<()> {
        let MintArgs::V1 { amount, .. } = args;
        let token = self.account(ix, 0)?;
        let owner = self.supplied(ix, 1)?.unwrap_or(self.identity);
        let token_record = self.supplied(ix, 4)?;
        let mint = self.account(ix, 5)?;

        let mut mint_account = self
            .reader
            .fetch_mint(&mint)
            .await?
            .ok_or_else(|| anyhow::anyhow!("mint {mint} does not exist"))?;
        mint_account.supply = mint_account
            .supply
            .checked_add(amount)
            .ok_or_else(|| anyhow::anyhow!("supply overflow"))?;
        self.store_account(mint, &mint_account)?;

        let mut token_account = self
            .reader
            .fetch_token_account(&token)
            .await?
            .unwrap_or(TokenAccount {
                mint,
                owner,
                state: AccountState::Initialized,
                ..TokenAccount::default()
            });
        token_account.amount += amount;
        if token_record.is_some() {
            token_account.state = AccountState::Frozen;
        }
        self.store_account(token, &token_account)?;

        if let Some(address) = token_record {
            if self.load::<TokenRecord>(&address).await?.is_none() {
                let (_, bump) = self.client.pdas().token_record(&mint, &token)?;
                self.store_account(
                    address,
                    &TokenRecord {
                        key: Key::TokenRecord,
                        bump,
                        state: TokenState::Unlocked,
                        rule_set_revision: None,
                        delegate: None,
                        delegate_role: None,
                        locked_transfer: None,
                    },
                )?;
            }
        }
        Ok(())
    }

    async fn apply_delegate(&self, ix: &Instruction, args: DelegateArgs) -> anyhow::Result<()> {
        let delegate = self.account(ix, 1)?;
        let mint = self.account(ix, 5)?;
        let authority = self.account(ix, 7)?;

        match delegate_record_kind(&args) {
            DelegateRecordKind::Metadata(role) => {
                let (address, bump) =
                    self.client
                        .pdas()
                        .metadata_delegate_record(&mint, role, &authority, &delegate)?;
                anyhow::ensure!(
                    self.supplied(ix, 0)? == Some(address),
                    "delegate record is not the {role} PDA"
                );
                return self.store_account(
                    address,
                    &MetadataDelegateRecord {
                        key: Key::MetadataDelegate,
                        bump,
                        mint,
                        delegate,
                        update_authority: authority,
                    },
                );
            }
            DelegateRecordKind::Holder(role) => {
                let (address, bump) =
                    self.client
                        .pdas()
                        .holder_delegate_record(&mint, role, &authority, &delegate)?;
                anyhow::ensure!(
                    self.supplied(ix, 0)? == Some(address),
                    "delegate record is not the {role} PDA"
                );
                return self.store_account(
                    address,
                    &HolderDelegateRecord {
                        key: Key::HolderDelegate,
                        bump,
                        mint,
                        delegate,
                        update_authority: authority,
                    },
                );
            }
            DelegateRecordKind::Token => {}
        }

        let (role, locked_transfer) = match args {
            DelegateArgs::SaleV1 { .. } => (TokenDelegateRole::Sale, None),
            DelegateArgs::TransferV1 { .. } => (TokenDelegateRole::Transfer, None),
            DelegateArgs::UtilityV1 { .. } => (TokenDelegateRole::Utility, None),
            DelegateArgs::StakingV1 { .. } => (TokenDelegateRole::Staking, None),
            DelegateArgs::StandardV1 { .. } => (TokenDelegateRole::Standard, None),
            DelegateArgs::LockedTransferV1 { locked_address, .. } => {
                (TokenDelegateRole::LockedTransfer, Some(locked_address))
            }
            _ => anyhow::bail!("not a token delegate"),
        };
        let amount = match args {
            DelegateArgs::SaleV1 { amount, .. }
            | DelegateArgs::TransferV1 { amount, .. }
            | DelegateArgs::UtilityV1 { amount, .. }
            | DelegateArgs::StakingV1 { amount, .. }
            | DelegateArgs::StandardV1 { amount }
            | DelegateArgs::LockedTransferV1 { amount, .. } => amount,
            _ => 0,
        };

        let token = self.account(ix, 6)?;
        let mut token_account = self
            .reader
            .fetch_token_account(&token)
            .await?
            .ok_or_else(|| anyhow::anyhow!("token account {token} does not exist"))?;
        token_account.delegate = COption(Some(delegate));
        token_account.delegated_amount = amount;
        self.store_account(token, &token_account)?;

        if let Some(address) = self.supplied(ix, 4)? {
            let mut record = self
                .load::<TokenRecord>(&address)
                .await?
                .ok_or_else(|| anyhow::anyhow!("token record {address} does not exist"))?;
            record.delegate = Some(delegate);
            record.delegate_role = Some(role);
            record.locked_transfer = locked_transfer;
            if role == TokenDelegateRole::Sale {
                record.state = TokenState::Listed;
            }
            self.store_account(address, &record)?;
        }
        Ok(())
    }

    async fn apply_lock(&self, ix: &Instruction, locked: bool) -> anyhow::Result<()> {
        if let Some(address) = self.supplied(ix, 6)? {
            let mut record = self
                .load::<TokenRecord>(&address)
                .await?
                .ok_or_else(|| anyhow::anyhow!("token record {address} does not exist"))?;
            record.state = if locked {
                TokenState::Locked
            } else {
                TokenState::Unlocked
            };
            return self.store_account(address, &record);
        }
        let token = self.account(ix, 2)?;
        let mut token_account = self
            .reader
            .fetch_token_account(&token)
            .await?
            .ok_or_else(|| anyhow::anyhow!("token account {token} does not exist"))?;
        token_account.state = if locked {
            AccountState::Frozen
        } else {
            AccountState::Initialized
        };
        self.store_account(token, &token_account)
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Run `test` against a fresh context, failing with the full error chain.
pub async fn run<F, Fut>(test: F)
where
    F: FnOnce(TestContext) -> Fut,
    Fut: Future<Output = anyhow::Result<()>>,
{
    init_tracing();
    if let Err(err) = test(TestContext::new()).await {
        panic!("test failed: {err:?}");
    }
}
