mod render;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_program::{instruction::Instruction, pubkey::Pubkey};
use std::{io::Read as _, str::FromStr};
use token_metadata_sdk::{
    interface::{
        instruction::{DelegateArgs, MetadataInstruction, RevokeArgs},
        state::{
            CollectionAuthorityRecord, Edition, EditionAccount, EditionMarker, EditionMarkerV2,
            HolderDelegateRecord, MasterEdition, Metadata, MetadataAccount,
            MetadataDelegateRecord, Mint, TokenAccount, TokenRecord, UseAuthorityRecord,
        },
        types::TokenStandard,
        EditionNumber, HolderDelegateRole, LegacyMetadataDelegateRole, MetadataDelegateRole,
        PayloadKey, SeedEnum,
    },
    BurnParams, CreateParams, DelegateParams, LockParams, RevokeParams, TokenMetadataClient,
    TokenMetadataReader, TransferParams,
};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Base58, or 32 bytes of hex.
fn parse_pubkey(s: &str) -> anyhow::Result<Pubkey> {
    if s.len() == 64 {
        if let Ok(bytes) = hex::decode(s) {
            let array: [u8; 32] = bytes
                .try_into()
                .map_err(|_| anyhow::anyhow!("expected 32-byte hex"))?;
            return Ok(Pubkey::new_from_array(array));
        }
    }
    Pubkey::from_str(s).with_context(|| format!("invalid pubkey {s}"))
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StandardArg {
    NonFungible,
    FungibleAsset,
    Fungible,
    NonFungibleEdition,
    ProgrammableNonFungible,
    ProgrammableNonFungibleEdition,
}

impl From<StandardArg> for TokenStandard {
    fn from(arg: StandardArg) -> Self {
        match arg {
            StandardArg::NonFungible => TokenStandard::NonFungible,
            StandardArg::FungibleAsset => TokenStandard::FungibleAsset,
            StandardArg::Fungible => TokenStandard::Fungible,
            StandardArg::NonFungibleEdition => TokenStandard::NonFungibleEdition,
            StandardArg::ProgrammableNonFungible => TokenStandard::ProgrammableNonFungible,
            StandardArg::ProgrammableNonFungibleEdition => {
                TokenStandard::ProgrammableNonFungibleEdition
            }
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SeedFamily {
    MetadataDelegate,
    LegacyMetadataDelegate,
    HolderDelegate,
    Payload,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DelegateRoleArg {
    Collection,
    Sale,
    Transfer,
    Data,
    Utility,
    Staking,
    Standard,
    LockedTransfer,
    ProgrammableConfig,
    Migration,
    AuthorityItem,
    DataItem,
    CollectionItem,
    ProgrammableConfigItem,
    PrintDelegate,
}

impl DelegateRoleArg {
    fn delegate_args(
        self,
        amount: u64,
        locked_address: Option<Pubkey>,
    ) -> anyhow::Result<DelegateArgs> {
        let authorization_data = None;
        Ok(match self {
            Self::Collection => DelegateArgs::CollectionV1 { authorization_data },
            Self::Sale => DelegateArgs::SaleV1 {
                amount,
                authorization_data,
            },
            Self::Transfer => DelegateArgs::TransferV1 {
                amount,
                authorization_data,
            },
            Self::Data => DelegateArgs::DataV1 { authorization_data },
            Self::Utility => DelegateArgs::UtilityV1 {
                amount,
                authorization_data,
            },
            Self::Staking => DelegateArgs::StakingV1 {
                amount,
                authorization_data,
            },
            Self::Standard => DelegateArgs::StandardV1 { amount },
            Self::LockedTransfer => DelegateArgs::LockedTransferV1 {
                amount,
                locked_address: locked_address.context("--locked-address required")?,
                authorization_data,
            },
            Self::ProgrammableConfig => DelegateArgs::ProgrammableConfigV1 { authorization_data },
            Self::Migration => anyhow::bail!("migration delegates can only be revoked"),
            Self::AuthorityItem => DelegateArgs::AuthorityItemV1 { authorization_data },
            Self::DataItem => DelegateArgs::DataItemV1 { authorization_data },
            Self::CollectionItem => DelegateArgs::CollectionItemV1 { authorization_data },
            Self::ProgrammableConfigItem => {
                DelegateArgs::ProgrammableConfigItemV1 { authorization_data }
            }
            Self::PrintDelegate => DelegateArgs::PrintDelegateV1 { authorization_data },
        })
    }

    fn revoke_args(self) -> RevokeArgs {
        match self {
            Self::Collection => RevokeArgs::CollectionV1,
            Self::Sale => RevokeArgs::SaleV1,
            Self::Transfer => RevokeArgs::TransferV1,
            Self::Data => RevokeArgs::DataV1,
            Self::Utility => RevokeArgs::UtilityV1,
            Self::Staking => RevokeArgs::StakingV1,
            Self::Standard => RevokeArgs::StandardV1,
            Self::LockedTransfer => RevokeArgs::LockedTransferV1,
            Self::ProgrammableConfig => RevokeArgs::ProgrammableConfigV1,
            Self::Migration => RevokeArgs::MigrationV1,
            Self::AuthorityItem => RevokeArgs::AuthorityItemV1,
            Self::DataItem => RevokeArgs::DataItemV1,
            Self::CollectionItem => RevokeArgs::CollectionItemV1,
            Self::ProgrammableConfigItem => RevokeArgs::ProgrammableConfigItemV1,
            Self::PrintDelegate => RevokeArgs::PrintDelegateV1,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AccountKind {
    Metadata,
    MasterEdition,
    Edition,
    /// Master or print, by key byte
    EditionAccount,
    EditionMarker,
    EditionMarkerV2,
    TokenRecord,
    MetadataDelegate,
    HolderDelegate,
    CollectionAuthority,
    UseAuthority,
    Mint,
    TokenAccount,
    /// Instruction data rather than an account
    Instruction,
}

#[derive(Clone, Debug, Args)]
struct InputArg {
    /// Hex-encoded bytes; read from stdin when omitted
    #[arg(long)]
    hex: Option<String>,
}

impl InputArg {
    fn bytes(&self) -> anyhow::Result<Vec<u8>> {
        let text = match &self.hex {
            Some(hex) => hex.clone(),
            None => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("read stdin")?;
                buf
            }
        };
        hex::decode(text.trim()).context("decode hex input")
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "token-metadata",
    version,
    about = "Token Metadata CLI",
    long_about = "Derive seeds and PDAs, decode accounts, and build Token Metadata \
                  instructions.\nJSON is always printed to stdout; logs/status to stderr."
)]
struct Cli {
    /// RPC endpoint URL (used by `show`)
    #[arg(
        default_value = "http://localhost:8899",
        env = "TOKEN_METADATA_RPC",
        global = true,
        long
    )]
    rpc: String,

    /// Metadata program id (defaults to the canonical deployment)
    #[arg(env = "TOKEN_METADATA_PROGRAM_ID", global = true, long)]
    program_id: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn program_id(&self) -> anyhow::Result<Pubkey> {
        self.program_id
            .as_deref()
            .map_or(Ok(token_metadata_sdk::interface::id()), parse_pubkey)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a role or payload key by variant name or seed string
    Seed {
        #[arg(value_enum)]
        family: SeedFamily,
        /// Variant name (e.g. `Data`) or seed string (e.g. `data_delegate`)
        value: String,
    },
    #[command(subcommand, about = "Derive program addresses")]
    Pda(PdaCmd),
    /// Decode account or instruction data
    Decode {
        #[arg(value_enum)]
        kind: AccountKind,
        #[command(flatten)]
        input: InputArg,
    },
    #[command(subcommand, alias = "ix", about = "Build instructions (printed, not sent)")]
    Instruction(IxCmd),
    /// Fetch and show mint, metadata, edition and (with --owner) token
    #[command(alias = "inspect", alias = "info")]
    Show {
        #[arg(long)]
        mint: String,
        /// Token owner; shows the associated token account too
        #[arg(long)]
        owner: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum PdaCmd {
    Metadata {
        #[arg(long)]
        mint: String,
    },
    MasterEdition {
        #[arg(long)]
        mint: String,
    },
    EditionMarker {
        #[arg(long)]
        mint: String,
        /// Decimal edition number (any size)
        #[arg(long)]
        edition: String,
    },
    EditionMarkerV2 {
        #[arg(long)]
        mint: String,
    },
    TokenRecord {
        #[arg(long)]
        mint: String,
        #[arg(long)]
        token: String,
    },
    MetadataDelegate {
        #[arg(long)]
        mint: String,
        /// Role name or seed string
        #[arg(long)]
        role: String,
        #[arg(long)]
        update_authority: String,
        #[arg(long)]
        delegate: String,
        /// Resolve `role` through the legacy role table
        #[arg(long, default_value_t = false)]
        legacy: bool,
    },
    HolderDelegate {
        #[arg(long)]
        mint: String,
        #[arg(long, default_value = "print_delegate")]
        role: String,
        #[arg(long)]
        owner: String,
        #[arg(long)]
        delegate: String,
    },
    CollectionAuthority {
        #[arg(long)]
        mint: String,
        #[arg(long)]
        authority: String,
    },
    UseAuthority {
        #[arg(long)]
        mint: String,
        #[arg(long)]
        authority: String,
    },
    Burner,
    AssociatedToken {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        mint: String,
        #[arg(long)]
        token_program: Option<String>,
    },
}

#[derive(Clone, Debug, Args)]
struct AssetArg {
    /// Signing authority and default payer
    #[arg(long)]
    identity: String,
    #[arg(long)]
    mint: String,
    #[arg(long, value_enum, default_value_t = StandardArg::NonFungible)]
    standard: StandardArg,
}

#[derive(Subcommand, Debug)]
enum IxCmd {
    /// Create metadata; mints `--amount` too when given (1 for non-fungibles)
    Create {
        #[command(flatten)]
        asset: AssetArg,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        symbol: String,
        #[arg(long)]
        uri: String,
        #[arg(long, default_value_t = 0)]
        seller_fee_basis_points: u16,
        #[arg(long)]
        amount: Option<u64>,
        #[arg(long)]
        token_owner: Option<String>,
        /// Create a collection parent
        #[arg(long, default_value_t = false)]
        collection: bool,
    },
    Delegate {
        #[command(flatten)]
        asset: AssetArg,
        #[arg(long, value_enum)]
        role: DelegateRoleArg,
        #[arg(long)]
        delegate: String,
        #[arg(long, default_value_t = 1)]
        amount: u64,
        #[arg(long)]
        locked_address: Option<String>,
    },
    Revoke {
        #[command(flatten)]
        asset: AssetArg,
        #[arg(long, value_enum)]
        role: DelegateRoleArg,
        #[arg(long)]
        delegate: String,
    },
    Transfer {
        #[command(flatten)]
        asset: AssetArg,
        #[arg(long)]
        destination_owner: String,
        #[arg(long, default_value_t = 1)]
        amount: u64,
    },
    Burn {
        #[command(flatten)]
        asset: AssetArg,
        #[arg(long, default_value_t = 1)]
        amount: u64,
    },
    Lock {
        #[command(flatten)]
        asset: AssetArg,
    },
    Unlock {
        #[command(flatten)]
        asset: AssetArg,
    },
    VerifyCollection {
        #[arg(long)]
        identity: String,
        /// Metadata account of the item
        #[arg(long)]
        metadata: String,
        #[arg(long)]
        collection_mint: String,
        #[arg(long, default_value_t = false)]
        unverify: bool,
    },
    VerifyCreator {
        #[arg(long)]
        identity: String,
        #[arg(long)]
        metadata: String,
        #[arg(long, default_value_t = false)]
        unverify: bool,
    },
}

fn seed_json<R: SeedEnum>(value: &str) -> anyhow::Result<Value> {
    let role = R::from_name(value).or_else(|_| R::from_seed(value))?;
    Ok(json!({
        "family": R::FAMILY,
        "name": role.name(),
        "seed": role.seed(),
        "hex": hex::encode(role.seed()),
    }))
}

fn pda_json((address, bump): (Pubkey, u8)) -> Value {
    json!({ "address": address.to_string(), "bump": bump })
}

fn decode_program_account<T: MetadataAccount>(
    data: &[u8],
    render: fn(&T) -> Value,
) -> anyhow::Result<Value> {
    Ok(render(&T::unpack(data)?))
}

fn decode(kind: AccountKind, data: &[u8]) -> anyhow::Result<Value> {
    match kind {
        AccountKind::Metadata => decode_program_account::<Metadata>(data, render::metadata),
        AccountKind::MasterEdition => {
            decode_program_account::<MasterEdition>(data, render::master_edition)
        }
        AccountKind::Edition => decode_program_account::<Edition>(data, render::edition),
        AccountKind::EditionAccount => Ok(render::edition_account(&EditionAccount::unpack(data)?)),
        AccountKind::EditionMarker => {
            decode_program_account::<EditionMarker>(data, render::edition_marker)
        }
        AccountKind::EditionMarkerV2 => {
            decode_program_account::<EditionMarkerV2>(data, render::edition_marker_v2)
        }
        AccountKind::TokenRecord => {
            decode_program_account::<TokenRecord>(data, render::token_record)
        }
        AccountKind::MetadataDelegate => decode_program_account::<MetadataDelegateRecord>(
            data,
            render::metadata_delegate_record,
        ),
        AccountKind::HolderDelegate => {
            decode_program_account::<HolderDelegateRecord>(data, render::holder_delegate_record)
        }
        AccountKind::CollectionAuthority => decode_program_account::<CollectionAuthorityRecord>(
            data,
            render::collection_authority_record,
        ),
        AccountKind::UseAuthority => {
            decode_program_account::<UseAuthorityRecord>(data, render::use_authority_record)
        }
        AccountKind::Mint => Ok(render::mint(&Mint::unpack(data)?)),
        AccountKind::TokenAccount => Ok(render::token_account(&TokenAccount::unpack(data)?)),
        AccountKind::Instruction => Ok(render::instruction(&MetadataInstruction::unpack(data)?)),
    }
}

fn pda(client: &TokenMetadataClient, cmd: PdaCmd) -> anyhow::Result<Value> {
    let pdas = client.pdas();
    let found = match cmd {
        PdaCmd::Metadata { mint } => pdas.metadata(&parse_pubkey(&mint)?)?,
        PdaCmd::MasterEdition { mint } => pdas.master_edition(&parse_pubkey(&mint)?)?,
        PdaCmd::EditionMarker { mint, edition } => {
            let edition: EditionNumber = edition
                .parse::<num_bigint::BigUint>()
                .with_context(|| format!("invalid edition number {edition}"))?
                .into();
            pdas.edition_marker(&parse_pubkey(&mint)?, edition)?
        }
        PdaCmd::EditionMarkerV2 { mint } => pdas.edition_marker_v2(&parse_pubkey(&mint)?)?,
        PdaCmd::TokenRecord { mint, token } => {
            pdas.token_record(&parse_pubkey(&mint)?, &parse_pubkey(&token)?)?
        }
        PdaCmd::MetadataDelegate {
            mint,
            role,
            update_authority,
            delegate,
            legacy,
        } => {
            let (mint, update_authority, delegate) = (
                parse_pubkey(&mint)?,
                parse_pubkey(&update_authority)?,
                parse_pubkey(&delegate)?,
            );
            if legacy {
                let role = LegacyMetadataDelegateRole::from_name(&role)
                    .or_else(|_| LegacyMetadataDelegateRole::from_seed(&role))?;
                pdas.metadata_delegate_record(&mint, role, &update_authority, &delegate)?
            } else {
                let role = MetadataDelegateRole::from_name(&role)
                    .or_else(|_| MetadataDelegateRole::from_seed(&role))?;
                pdas.metadata_delegate_record(&mint, role, &update_authority, &delegate)?
            }
        }
        PdaCmd::HolderDelegate {
            mint,
            role,
            owner,
            delegate,
        } => {
            let role = HolderDelegateRole::from_name(&role)
                .or_else(|_| HolderDelegateRole::from_seed(&role))?;
            pdas.holder_delegate_record(
                &parse_pubkey(&mint)?,
                role,
                &parse_pubkey(&owner)?,
                &parse_pubkey(&delegate)?,
            )?
        }
        PdaCmd::CollectionAuthority { mint, authority } => pdas
            .collection_authority_record(&parse_pubkey(&mint)?, &parse_pubkey(&authority)?)?,
        PdaCmd::UseAuthority { mint, authority } => {
            pdas.use_authority_record(&parse_pubkey(&mint)?, &parse_pubkey(&authority)?)?
        }
        PdaCmd::Burner => pdas.burner()?,
        PdaCmd::AssociatedToken {
            owner,
            mint,
            token_program,
        } => {
            let token_program = token_program
                .as_deref()
                .map_or(Ok(token_metadata_sdk::interface::SPL_TOKEN_PROGRAM_ID), parse_pubkey)?;
            pdas.associated_token_with_program(
                &parse_pubkey(&owner)?,
                &parse_pubkey(&mint)?,
                &token_program,
            )?
        }
    };
    Ok(pda_json(found))
}

fn client_for(program_id: Pubkey, identity: &str) -> anyhow::Result<TokenMetadataClient> {
    Ok(TokenMetadataClient::with_program_id(
        program_id,
        parse_pubkey(identity)?,
    ))
}

fn build(program_id: Pubkey, cmd: IxCmd) -> anyhow::Result<Vec<Instruction>> {
    match cmd {
        IxCmd::Create {
            asset,
            name,
            symbol,
            uri,
            seller_fee_basis_points,
            amount,
            token_owner,
            collection,
        } => {
            let client = client_for(program_id, &asset.identity)?;
            let standard = TokenStandard::from(asset.standard);
            let mut params = CreateParams::new(
                parse_pubkey(&asset.mint)?,
                name,
                uri,
                seller_fee_basis_points,
                standard,
            );
            params.symbol = symbol;
            params.is_collection = collection;
            let token_owner = token_owner.as_deref().map(parse_pubkey).transpose()?;
            let amount = amount.or(standard.is_non_fungible().then_some(1));
            match amount {
                Some(amount) => client.create_and_mint(params, amount, token_owner),
                None => Ok(vec![client.create_ix(params)?]),
            }
        }
        IxCmd::Delegate {
            asset,
            role,
            delegate,
            amount,
            locked_address,
        } => {
            let client = client_for(program_id, &asset.identity)?;
            let locked_address = locked_address.as_deref().map(parse_pubkey).transpose()?;
            let params = DelegateParams::new(
                parse_pubkey(&asset.mint)?,
                parse_pubkey(&delegate)?,
                role.delegate_args(amount, locked_address)?,
                asset.standard.into(),
            );
            Ok(vec![client.delegate_ix(params)?])
        }
        IxCmd::Revoke {
            asset,
            role,
            delegate,
        } => {
            let client = client_for(program_id, &asset.identity)?;
            let params = RevokeParams::new(
                parse_pubkey(&asset.mint)?,
                parse_pubkey(&delegate)?,
                role.revoke_args(),
                asset.standard.into(),
            );
            Ok(vec![client.revoke_ix(params)?])
        }
        IxCmd::Transfer {
            asset,
            destination_owner,
            amount,
        } => {
            let client = client_for(program_id, &asset.identity)?;
            client.transfer(TransferParams::new(
                parse_pubkey(&asset.mint)?,
                parse_pubkey(&destination_owner)?,
                amount,
                asset.standard.into(),
            ))
        }
        IxCmd::Burn { asset, amount } => {
            let client = client_for(program_id, &asset.identity)?;
            client.burn(BurnParams::new(
                parse_pubkey(&asset.mint)?,
                amount,
                asset.standard.into(),
            ))
        }
        IxCmd::Lock { asset } => {
            let client = client_for(program_id, &asset.identity)?;
            client.lock(LockParams::new(
                parse_pubkey(&asset.mint)?,
                asset.standard.into(),
            ))
        }
        IxCmd::Unlock { asset } => {
            let client = client_for(program_id, &asset.identity)?;
            client.unlock(LockParams::new(
                parse_pubkey(&asset.mint)?,
                asset.standard.into(),
            ))
        }
        IxCmd::VerifyCollection {
            identity,
            metadata,
            collection_mint,
            unverify,
        } => {
            let client = client_for(program_id, &identity)?;
            let (metadata, collection_mint) =
                (parse_pubkey(&metadata)?, parse_pubkey(&collection_mint)?);
            if unverify {
                client.unverify_collection(metadata, collection_mint)
            } else {
                client.verify_collection(metadata, collection_mint)
            }
        }
        IxCmd::VerifyCreator {
            identity,
            metadata,
            unverify,
        } => {
            let client = client_for(program_id, &identity)?;
            let metadata = parse_pubkey(&metadata)?;
            if unverify {
                client.unverify_creator(metadata)
            } else {
                client.verify_creator(metadata)
            }
        }
    }
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Cli::parse();
    let program_id = args.program_id()?;
    debug!(%program_id, rpc = %args.rpc, "starting");

    match args.command {
        Commands::Seed { family, value } => print_json(&match family {
            SeedFamily::MetadataDelegate => seed_json::<MetadataDelegateRole>(&value)?,
            SeedFamily::LegacyMetadataDelegate => {
                seed_json::<LegacyMetadataDelegateRole>(&value)?
            }
            SeedFamily::HolderDelegate => seed_json::<HolderDelegateRole>(&value)?,
            SeedFamily::Payload => seed_json::<PayloadKey>(&value)?,
        })?,
        Commands::Pda(cmd) => {
            let client = TokenMetadataClient::with_program_id(program_id, Pubkey::default());
            print_json(&pda(&client, cmd)?)?
        }
        Commands::Decode { kind, input } => print_json(&decode(kind, &input.bytes()?)?)?,
        Commands::Instruction(cmd) => {
            let ixs = build(program_id, cmd)?;
            eprintln!("built {} instruction(s)", ixs.len());
            print_json(&render::instructions(&ixs))?
        }
        Commands::Show { mint, owner } => {
            let mint = parse_pubkey(&mint)?;
            let reader =
                TokenMetadataReader::with_program_id(RpcClient::new(args.rpc.clone()), program_id);
            let view = match owner {
                Some(owner) => reader
                    .fetch_digital_asset_with_token(&mint, &parse_pubkey(&owner)?)
                    .await?
                    .as_ref()
                    .map(render::digital_asset_with_token),
                None => reader
                    .fetch_digital_asset(&mint)
                    .await?
                    .as_ref()
                    .map(render::digital_asset),
            };
            if view.is_none() {
                eprintln!("show: no digital asset at mint {mint}");
            }
            print_json(&view.unwrap_or(Value::Null))?
        }
    }

    Ok(())
}
