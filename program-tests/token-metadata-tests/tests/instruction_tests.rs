use solana_program::instruction::Instruction;
use token_metadata_interface::{
    instruction::{
        CreateArgs, DelegateArgs, MetadataInstruction, MintArgs, RevokeArgs, VerificationArgs,
    },
    types::{PrintSupply, TokenStandard},
    SPL_TOKEN_PROGRAM_ID, SYSTEM_PROGRAM_ID,
};
use token_metadata_sdk::{
    CreateParams, DelegateParams, LockParams, MetadataDelegateFlowParams, RevokeParams,
    TokenDelegateFlowParams, TransferParams, VerifyParams,
};
use token_metadata_tests::TestContext;

fn is_omitted(ix: &Instruction, index: usize) -> bool {
    let meta = &ix.accounts[index];
    meta.pubkey == ix.program_id && !meta.is_signer && !meta.is_writable
}

#[test]
fn create_nft_builds_create_then_mint() {
    let ctx = TestContext::new();
    let mint = ctx.generate_pubkey();
    let params = CreateParams::new(
        mint,
        "My NFT",
        "https://example.com/nft.json",
        550,
        TokenStandard::Fungible,
    );
    let (ixs, pdas) = ctx.client.create_nft_with_pdas(params, None).unwrap();
    assert_eq!(ixs.len(), 2);

    let create = &ixs[0];
    assert_eq!(create.data[0], 42);
    assert_eq!(create.accounts.len(), 9);
    assert_eq!(create.accounts[0].pubkey, pdas.metadata);
    assert_eq!(Some(create.accounts[1].pubkey), pdas.master_edition);
    assert!(create.accounts[2].is_signer);
    assert_eq!(create.accounts[6].pubkey, SYSTEM_PROGRAM_ID);
    assert_eq!(create.accounts[8].pubkey, SPL_TOKEN_PROGRAM_ID);
    match MetadataInstruction::unpack(&create.data).unwrap() {
        MetadataInstruction::Create(CreateArgs::V1 {
            asset_data,
            decimals,
            print_supply,
        }) => {
            // the flow overrides the requested standard
            assert_eq!(asset_data.token_standard, TokenStandard::NonFungible);
            assert_eq!(asset_data.name, "My NFT");
            let creators = asset_data.creators.unwrap();
            assert_eq!(creators.len(), 1);
            assert_eq!(creators[0].address, ctx.identity);
            assert!(creators[0].verified);
            assert_eq!(creators[0].share, 100);
            assert_eq!(decimals, Some(0));
            assert_eq!(print_supply, Some(PrintSupply::Zero));
        }
        other => panic!("unexpected {other:?}"),
    }

    let mint_ix = &ixs[1];
    assert_eq!(mint_ix.data[0], 43);
    assert_eq!(Some(mint_ix.accounts[0].pubkey), pdas.token);
    assert_eq!(mint_ix.accounts[1].pubkey, ctx.identity);
    // no token record for a plain NFT
    assert!(is_omitted(mint_ix, 4));
    assert!(pdas.token_record.is_none());
    assert_eq!(
        MetadataInstruction::unpack(&mint_ix.data).unwrap(),
        MetadataInstruction::Mint(MintArgs::V1 {
            amount: 1,
            authorization_data: None,
        })
    );
}

#[test]
fn programmable_nft_mints_into_a_token_record() {
    let ctx = TestContext::new();
    let mint = ctx.generate_pubkey();
    let params = CreateParams::new(mint, "pNFT", "", 0, TokenStandard::NonFungible);
    let (ixs, pdas) = ctx
        .client
        .create_programmable_nft_with_pdas(params, None)
        .unwrap();
    let token = pdas.token.unwrap();
    let record = pdas.token_record.unwrap();
    assert_eq!(
        record,
        ctx.client.token_record_pda(&mint, &token).unwrap()
    );
    assert_eq!(ixs[1].accounts[4].pubkey, record);
    assert!(ixs[1].accounts[4].is_writable);
}

#[test]
fn fungible_create_has_no_master_edition() {
    let ctx = TestContext::new();
    let mint = ctx.generate_pubkey();
    let ixs = ctx
        .client
        .create_fungible(CreateParams::new(mint, "Coin", "", 0, TokenStandard::NonFungible))
        .unwrap();
    assert_eq!(ixs.len(), 1);
    assert!(is_omitted(&ixs[0], 1));
    let MetadataInstruction::Create(CreateArgs::V1 {
        decimals,
        print_supply,
        ..
    }) = MetadataInstruction::unpack(&ixs[0].data).unwrap()
    else {
        panic!("not a create");
    };
    assert_eq!(decimals, None);
    assert_eq!(print_supply, None);
}

#[test]
fn invalid_metadata_is_rejected_before_building() {
    let ctx = TestContext::new();
    let mut params = CreateParams::new(
        ctx.generate_pubkey(),
        "n".repeat(33),
        "",
        0,
        TokenStandard::NonFungible,
    );
    assert!(ctx.client.create_ix(params.clone()).is_err());
    params.name = "ok".to_string();
    params.seller_fee_basis_points = 10_001;
    assert!(ctx.client.create_ix(params).is_err());
}

#[test]
fn metadata_delegate_record_is_keyed_by_update_authority() {
    let ctx = TestContext::new();
    let mint = ctx.generate_pubkey();
    let delegate = ctx.generate_pubkey();
    let update_authority = ctx.generate_pubkey();
    let ixs = ctx
        .client
        .delegate_data(MetadataDelegateFlowParams {
            mint,
            delegate,
            token_standard: TokenStandard::NonFungible,
            update_authority: Some(update_authority),
            authorization_data: None,
        })
        .unwrap();
    let ix = &ixs[0];
    assert_eq!(&ix.data[..2], &[44, 3]);
    assert_eq!(ix.accounts.len(), 14);
    assert_eq!(
        ix.accounts[0].pubkey,
        ctx.client
            .metadata_delegate_record_pda(
                &mint,
                token_metadata_interface::MetadataDelegateRole::Data,
                &update_authority,
                &delegate
            )
            .unwrap()
    );
    assert_eq!(ix.accounts[1].pubkey, delegate);
    assert_eq!(ix.accounts[7].pubkey, ctx.identity);
    assert!(ix.accounts[7].is_signer);
    // metadata roles leave token accounts and the token program out
    assert!(is_omitted(ix, 6));
    assert!(is_omitted(ix, 11));
}

#[test]
fn token_delegate_targets_the_owner_token_account() {
    let ctx = TestContext::new();
    let mint = ctx.generate_pubkey();
    let delegate = ctx.generate_pubkey();
    let ixs = ctx
        .client
        .delegate_transfer(TokenDelegateFlowParams {
            mint,
            delegate,
            token_standard: TokenStandard::ProgrammableNonFungible,
            amount: 1,
            token_owner: None,
            authorization_data: None,
        })
        .unwrap();
    let ix = &ixs[0];
    let token = ctx
        .client
        .associated_token(&ctx.identity, &mint, &SPL_TOKEN_PROGRAM_ID)
        .unwrap();
    assert!(is_omitted(ix, 0));
    assert_eq!(ix.accounts[4].pubkey, ctx.client.token_record_pda(&mint, &token).unwrap());
    assert_eq!(ix.accounts[6].pubkey, token);
    assert_eq!(ix.accounts[11].pubkey, SPL_TOKEN_PROGRAM_ID);
    assert_eq!(
        MetadataInstruction::unpack(&ix.data).unwrap(),
        MetadataInstruction::Delegate(DelegateArgs::TransferV1 {
            amount: 1,
            authorization_data: None,
        })
    );
}

#[test]
fn revoke_uses_the_same_accounts_as_delegate() {
    let ctx = TestContext::new();
    let mint = ctx.generate_pubkey();
    let delegate = ctx.generate_pubkey();
    let granted = ctx
        .client
        .delegate_ix(DelegateParams::new(
            mint,
            delegate,
            DelegateArgs::CollectionV1 {
                authorization_data: None,
            },
            TokenStandard::NonFungible,
        ))
        .unwrap();
    let revoked = ctx
        .client
        .revoke_ix(RevokeParams::new(
            mint,
            delegate,
            RevokeArgs::CollectionV1,
            TokenStandard::NonFungible,
        ))
        .unwrap();
    assert_eq!(granted.accounts, revoked.accounts);
    assert_eq!(revoked.data, vec![45, 0]);
}

#[test]
fn print_delegate_uses_the_holder_record() {
    let ctx = TestContext::new();
    let mint = ctx.generate_pubkey();
    let delegate = ctx.generate_pubkey();
    let ixs = ctx
        .client
        .revoke_print_delegate(TokenDelegateFlowParams {
            mint,
            delegate,
            token_standard: TokenStandard::NonFungible,
            amount: 0,
            token_owner: None,
            authorization_data: None,
        })
        .unwrap();
    assert_eq!(ixs[0].data, vec![45, 14]);
    assert_eq!(
        ixs[0].accounts[0].pubkey,
        ctx.client
            .holder_delegate_record_pda(
                &mint,
                token_metadata_interface::HolderDelegateRole::PrintDelegate,
                &ctx.identity,
                &delegate
            )
            .unwrap()
    );
}

#[test]
fn transfer_resolves_both_token_records() {
    let ctx = TestContext::new();
    let mint = ctx.generate_pubkey();
    let destination_owner = ctx.generate_pubkey();
    let ixs = ctx
        .client
        .transfer(TransferParams::new(
            mint,
            destination_owner,
            1,
            TokenStandard::ProgrammableNonFungible,
        ))
        .unwrap();
    let ix = &ixs[0];
    assert_eq!(ix.data[0], 49);
    assert_eq!(ix.accounts.len(), 17);
    let destination_token = ctx
        .client
        .associated_token(&destination_owner, &mint, &SPL_TOKEN_PROGRAM_ID)
        .unwrap();
    assert_eq!(ix.accounts[2].pubkey, destination_token);
    assert_eq!(ix.accounts[3].pubkey, destination_owner);
    assert_eq!(
        ix.accounts[8].pubkey,
        ctx.client.token_record_pda(&mint, &destination_token).unwrap()
    );
}

#[test]
fn lock_and_unlock_share_accounts() {
    let ctx = TestContext::new();
    let mint = ctx.generate_pubkey();
    let params = LockParams::new(mint, TokenStandard::ProgrammableNonFungible);
    let lock = ctx.client.lock(params.clone()).unwrap().remove(0);
    let unlock = ctx.client.unlock(params).unwrap().remove(0);
    assert_eq!(&lock.data[..2], &[46, 0]);
    assert_eq!(&unlock.data[..2], &[47, 0]);
    assert_eq!(lock.accounts, unlock.accounts);
}

#[test]
fn collection_verification_needs_the_collection_mint() {
    let ctx = TestContext::new();
    let metadata = ctx.generate_pubkey();
    let err = ctx
        .client
        .verify_ix(VerifyParams::new(VerificationArgs::CollectionV1, metadata))
        .unwrap_err();
    assert!(err.to_string().contains("collection_mint"));

    let collection_mint = ctx.generate_pubkey();
    let ixs = ctx
        .client
        .verify_collection(metadata, collection_mint)
        .unwrap();
    let ix = &ixs[0];
    assert_eq!(ix.data, vec![52, 1]);
    assert_eq!(ix.accounts[3].pubkey, collection_mint);
    assert_eq!(
        ix.accounts[4].pubkey,
        ctx.client.metadata_pda(&collection_mint).unwrap()
    );
    assert_eq!(
        ix.accounts[5].pubkey,
        ctx.client.master_edition_pda(&collection_mint).unwrap()
    );

    let creator = ctx.client.unverify_creator(metadata).unwrap().remove(0);
    assert_eq!(creator.data, vec![53, 0]);
    assert!(is_omitted(&creator, 3));
}

#[test]
fn unknown_discriminator_is_rejected() {
    assert!(MetadataInstruction::unpack(&[48]).is_err());
    assert!(MetadataInstruction::unpack(&[]).is_err());
    // trailing bytes after a complete instruction
    assert!(MetadataInstruction::unpack(&[45, 0, 0]).is_err());
}
