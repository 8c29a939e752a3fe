use anyhow::Context;
use serde::Serialize;
use serde_json::{json, Value};
use solana_program::{instruction::Instruction, pubkey::Pubkey};
use token_metadata_interface::{
    find_metadata_pda_with_program, id as program_id_fn,
    instruction::{DelegateArgs, RevokeArgs, UpdateArgs, VerificationArgs},
    types::TokenStandard,
    HolderDelegateRole, LegacyMetadataDelegateRole, MetadataDelegateRole, PayloadKey, SeedEnum,
};
use token_metadata_sdk::{
    BurnParams, CreateParams, DelegateParams, LockParams, MintParams, RevokeParams,
    TokenMetadataClient, TransferParams, UpdateParams,
};

const DEFAULT_OUT_DIR: &str = "target/fixtures";

fn key(n: u8) -> Pubkey {
    Pubkey::new_from_array([n; 32])
}

/// One built instruction: hex data and `[pubkey, writable, signer]` triples.
#[derive(Debug, Serialize)]
struct InstructionFixture {
    data: String,
    accounts: Vec<(String, bool, bool)>,
}

impl From<&Instruction> for InstructionFixture {
    fn from(ix: &Instruction) -> Self {
        Self {
            data: hex::encode(&ix.data),
            accounts: ix
                .accounts
                .iter()
                .map(|meta| (meta.pubkey.to_string(), meta.is_writable, meta.is_signer))
                .collect(),
        }
    }
}

fn ix_fixture(ix: &Instruction) -> InstructionFixture {
    ix.into()
}

fn seed_table<R: SeedEnum>() -> Value {
    R::ALL
        .iter()
        .map(|role| (role.name().to_string(), Value::from(role.seed())))
        .collect::<serde_json::Map<_, _>>()
        .into()
}

fn fixtures() -> anyhow::Result<Value> {
    // Deterministic example inputs
    let identity = key(1);
    let mint = key(2);
    let delegate = key(5);
    let destination = key(6);
    let client = TokenMetadataClient::new(identity);
    let nft = TokenStandard::NonFungible;
    let pnft = TokenStandard::ProgrammableNonFungible;

    let mut create = CreateParams::new(mint, "Name", "https://i", 500, nft);
    create.symbol = "SYM".into();
    let create = client.create_ix(create)?;
    let mint_ix = client.mint_ix(MintParams::new(mint, 1, nft))?;
    let delegate_ix = client.delegate_ix(DelegateParams::new(
        mint,
        delegate,
        DelegateArgs::TransferV1 {
            amount: 1,
            authorization_data: None,
        },
        pnft,
    ))?;
    let revoke_ix = client.revoke_ix(RevokeParams::new(
        mint,
        delegate,
        RevokeArgs::TransferV1,
        pnft,
    ))?;
    let update_ix = client.update_ix(UpdateParams::new(
        mint,
        UpdateArgs::as_update_authority(),
        nft,
    ))?;
    let transfer_ix = client.transfer_ix(TransferParams::new(mint, destination, 1, pnft))?;
    let burn_ix = client.burn_ix(BurnParams::new(mint, 1, nft))?;
    let lock_ix = client.lock_ix(LockParams::new(mint, pnft))?;
    let unlock_ix = client.unlock_ix(LockParams::new(mint, pnft))?;
    let metadata = client.metadata_pda(&mint)?;
    let verify_creator = client.verify_creator(metadata)?;

    let program_id = program_id_fn();
    let pda_samples = [key(2), key(3)]
        .iter()
        .map(|mint| -> anyhow::Result<Value> {
            let (metadata, metadata_bump) = find_metadata_pda_with_program(&program_id, mint)?;
            let (edition, edition_bump) = client.master_edition_pda_and_bump(mint)?;
            let token = client.associated_token(
                &identity,
                mint,
                &token_metadata_interface::SPL_TOKEN_PROGRAM_ID,
            )?;
            Ok(json!({
                "mint": mint.to_string(),
                "metadata": [metadata.to_string(), metadata_bump],
                "master_edition": [edition.to_string(), edition_bump],
                "edition_marker_0": client.edition_marker_pda(mint, 0u64)?.to_string(),
                "edition_marker_248": client.edition_marker_pda(mint, 248u64)?.to_string(),
                "edition_marker_v2": client.edition_marker_v2_pda(mint)?.to_string(),
                "token": token.to_string(),
                "token_record": client.token_record_pda(mint, &token)?.to_string(),
                "data_delegate_record": client
                    .metadata_delegate_record_pda(
                        mint,
                        MetadataDelegateRole::Data,
                        &identity,
                        &delegate,
                    )?
                    .to_string(),
                "print_delegate_record": client
                    .holder_delegate_record_pda(
                        mint,
                        HolderDelegateRole::PrintDelegate,
                        &identity,
                        &delegate,
                    )?
                    .to_string(),
                "collection_authority_record": client
                    .collection_authority_record_pda(mint, &delegate)?
                    .to_string(),
                "use_authority_record": client
                    .use_authority_record_pda(mint, &delegate)?
                    .to_string(),
            }))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(json!({
        "ProgramId": program_id.to_string(),
        "Identity": identity.to_string(),
        "Create": ix_fixture(&create),
        "Mint": ix_fixture(&mint_ix),
        "DelegateTransfer": ix_fixture(&delegate_ix),
        "RevokeTransfer": ix_fixture(&revoke_ix),
        "UpdateAsUpdateAuthority": ix_fixture(&update_ix),
        "Transfer": ix_fixture(&transfer_ix),
        "Burn": ix_fixture(&burn_ix),
        "Lock": ix_fixture(&lock_ix),
        "Unlock": ix_fixture(&unlock_ix),
        "VerifyCreator": verify_creator.iter().map(ix_fixture).collect::<Vec<_>>(),
        "VerifyArgs": {
            "CreatorV1": VerificationArgs::CreatorV1 as u8,
            "CollectionV1": VerificationArgs::CollectionV1 as u8,
        },
        "Seeds": {
            "MetadataDelegateRole": seed_table::<MetadataDelegateRole>(),
            "LegacyMetadataDelegateRole": seed_table::<LegacyMetadataDelegateRole>(),
            "HolderDelegateRole": seed_table::<HolderDelegateRole>(),
            "PayloadKey": seed_table::<PayloadKey>(),
        },
        "PdaSamples": pda_samples,
    }))
}

fn write_fixtures(out_dir: &str) -> anyhow::Result<String> {
    let fixtures = fixtures()?;
    std::fs::create_dir_all(out_dir).context("create fixtures dir")?;
    let path = format!("{}/metadata_instructions.json", out_dir);
    std::fs::write(&path, serde_json::to_vec_pretty(&fixtures)?)
        .with_context(|| format!("write {}", path))?;
    Ok(path)
}

fn main() -> anyhow::Result<()> {
    let out_dir =
        std::env::var("OUT_FIXTURES_DIR").unwrap_or_else(|_| DEFAULT_OUT_DIR.to_string());
    let path = write_fixtures(&out_dir)?;
    println!("wrote fixtures to {}", path);
    Ok(())
}
