use token_metadata_interface::{
    codec::encode,
    state::{AccountState, EditionAccount, EditionMarkerV2},
    types::{Key, TokenDelegateRole, TokenStandard, TokenState},
    MetadataDelegateRole, SPL_TOKEN_PROGRAM_ID,
};
use token_metadata_sdk::{
    CreateParams, LockParams, MetadataDelegateFlowParams, TokenDelegateFlowParams,
};
use token_metadata_tests::run;

#[tokio::test]
async fn created_nft_reads_back_as_a_digital_asset() {
    run(|ctx| async move {
        let mint = ctx.generate_pubkey();
        let params = CreateParams::new(
            mint,
            "Reader NFT",
            "https://example.com/r.json",
            250,
            TokenStandard::NonFungible,
        );
        let (ixs, pdas) = ctx.client.create_nft_with_pdas(params, None)?;
        ctx.apply_all(&ixs).await?;

        let asset = ctx
            .reader
            .fetch_digital_asset(&mint)
            .await?
            .ok_or_else(|| anyhow::anyhow!("asset missing"))?;
        assert_eq!(asset.metadata_address, pdas.metadata);
        assert_eq!(asset.metadata.name, "Reader NFT");
        assert_eq!(asset.metadata.seller_fee_basis_points, 250);
        assert_eq!(asset.metadata.update_authority, ctx.identity);
        assert_eq!(asset.metadata.token_standard, Some(TokenStandard::NonFungible));
        assert_eq!(asset.mint.supply, 1);
        assert_eq!(asset.mint.decimals, 0);
        match asset.edition {
            Some(EditionAccount::Master(master)) => {
                assert_eq!(master.supply, 0);
                assert_eq!(master.max_supply, Some(0));
            }
            other => anyhow::bail!("expected a master edition, got {other:?}"),
        }

        let held = ctx
            .reader
            .fetch_digital_asset_with_token(&mint, &ctx.identity)
            .await?
            .ok_or_else(|| anyhow::anyhow!("holding missing"))?;
        assert_eq!(Some(held.token_address), pdas.token);
        assert_eq!(held.token.amount, 1);
        assert_eq!(held.token.owner, ctx.identity);
        assert!(held.token_record.is_none());
        Ok(())
    })
    .await;
}

#[tokio::test]
async fn missing_accounts_read_as_none() {
    run(|ctx| async move {
        let mint = ctx.generate_pubkey();
        assert!(ctx.reader.fetch_metadata(&mint).await?.is_none());
        assert!(ctx.reader.fetch_digital_asset(&mint).await?.is_none());
        assert!(ctx
            .reader
            .fetch_digital_asset_with_token(&mint, &ctx.identity)
            .await?
            .is_none());

        // Metadata alone is not an asset without its mint.
        let ixs = ctx
            .client
            .create_fungible(CreateParams::new(mint, "Coin", "", 0, TokenStandard::Fungible))?;
        ctx.apply_all(&ixs).await?;
        ctx.store().remove(&mint)?;
        assert!(ctx.reader.fetch_metadata(&mint).await?.is_some());
        assert!(ctx.reader.fetch_digital_asset(&mint).await?.is_none());
        Ok(())
    })
    .await;
}

#[tokio::test]
async fn programmable_nft_carries_a_token_record() {
    run(|ctx| async move {
        let mint = ctx.generate_pubkey();
        let params = CreateParams::new(mint, "pNFT", "", 0, TokenStandard::ProgrammableNonFungible);
        let (ixs, pdas) = ctx.client.create_programmable_nft_with_pdas(params, None)?;
        ctx.apply_all(&ixs).await?;

        let held = ctx
            .reader
            .fetch_digital_asset_with_token(&mint, &ctx.identity)
            .await?
            .ok_or_else(|| anyhow::anyhow!("holding missing"))?;
        assert!(held.asset.metadata.programmable_config.is_some());
        assert_eq!(held.token.state, AccountState::Frozen);
        let record = held
            .token_record
            .ok_or_else(|| anyhow::anyhow!("token record missing"))?;
        assert_eq!(record.state, TokenState::Unlocked);
        assert_eq!(
            Some(ctx.client.token_record_pda(&mint, &held.token_address)?),
            pdas.token_record
        );
        Ok(())
    })
    .await;
}

#[tokio::test]
async fn sale_delegate_then_lock_updates_the_token_record() {
    run(|ctx| async move {
        let mint = ctx.generate_pubkey();
        let delegate = ctx.generate_pubkey();
        let params = CreateParams::new(
            mint,
            "Listed",
            "",
            0,
            TokenStandard::ProgrammableNonFungible,
        );
        ctx.apply_all(&ctx.client.create_programmable_nft(params, None)?)
            .await?;

        let delegation = ctx.client.delegate_sale(TokenDelegateFlowParams {
            mint,
            delegate,
            token_standard: TokenStandard::ProgrammableNonFungible,
            amount: 1,
            token_owner: None,
            authorization_data: None,
        })?;
        ctx.apply_all(&delegation).await?;

        let token = ctx
            .client
            .associated_token(&ctx.identity, &mint, &SPL_TOKEN_PROGRAM_ID)?;
        let record = ctx
            .reader
            .fetch_token_record(&mint, &token)
            .await?
            .ok_or_else(|| anyhow::anyhow!("token record missing"))?;
        assert_eq!(record.state, TokenState::Listed);
        assert_eq!(record.delegate, Some(delegate));
        assert_eq!(record.delegate_role, Some(TokenDelegateRole::Sale));

        ctx.apply_all(
            &ctx.client
                .lock(LockParams::new(mint, TokenStandard::ProgrammableNonFungible))?,
        )
        .await?;
        let record = ctx.reader.fetch_token_record(&mint, &token).await?;
        assert_eq!(record.map(|r| r.state), Some(TokenState::Locked));

        ctx.apply_all(
            &ctx.client
                .unlock(LockParams::new(mint, TokenStandard::ProgrammableNonFungible))?,
        )
        .await?;
        let record = ctx.reader.fetch_token_record(&mint, &token).await?;
        assert_eq!(record.map(|r| r.state), Some(TokenState::Unlocked));
        Ok(())
    })
    .await;
}

#[tokio::test]
async fn locking_a_plain_nft_freezes_the_token_account() {
    run(|ctx| async move {
        let mint = ctx.generate_pubkey();
        let params = CreateParams::new(mint, "Frozen", "", 0, TokenStandard::NonFungible);
        ctx.apply_all(&ctx.client.create_nft(params, None)?).await?;
        ctx.apply_all(&ctx.client.lock(LockParams::new(mint, TokenStandard::NonFungible))?)
            .await?;

        let held = ctx
            .reader
            .fetch_digital_asset_with_token(&mint, &ctx.identity)
            .await?
            .ok_or_else(|| anyhow::anyhow!("holding missing"))?;
        assert!(held.token.is_frozen());
        Ok(())
    })
    .await;
}

#[tokio::test]
async fn metadata_delegate_record_is_fetchable() {
    run(|ctx| async move {
        let mint = ctx.generate_pubkey();
        let delegate = ctx.generate_pubkey();
        let params = CreateParams::new(mint, "Delegated", "", 0, TokenStandard::NonFungible);
        ctx.apply_all(&ctx.client.create_nft(params, None)?).await?;
        ctx.apply_all(&ctx.client.delegate_collection(MetadataDelegateFlowParams {
            mint,
            delegate,
            token_standard: TokenStandard::NonFungible,
            update_authority: None,
            authorization_data: None,
        })?)
        .await?;

        let record = ctx
            .reader
            .fetch_metadata_delegate_record(
                &mint,
                MetadataDelegateRole::Collection,
                &ctx.identity,
                &delegate,
            )
            .await?
            .ok_or_else(|| anyhow::anyhow!("delegate record missing"))?;
        assert_eq!(record.key, Key::MetadataDelegate);
        assert_eq!(record.mint, mint);
        assert_eq!(record.delegate, delegate);
        assert_eq!(record.update_authority, ctx.identity);

        // A different role derives a different record.
        assert!(ctx
            .reader
            .fetch_metadata_delegate_record(
                &mint,
                MetadataDelegateRole::Data,
                &ctx.identity,
                &delegate,
            )
            .await?
            .is_none());
        Ok(())
    })
    .await;
}

#[tokio::test]
async fn printed_editions_are_tracked_by_marker() {
    run(|ctx| async move {
        let mint = ctx.generate_pubkey();
        assert!(!ctx.reader.is_edition_printed(&mint, 5).await?);

        let mut marker = EditionMarkerV2 {
            key: Key::EditionMarkerV2,
            ledger: Vec::new(),
        };
        marker.insert_edition(5)?;
        marker.insert_edition(300)?;
        let (address, _) = ctx.client.pdas().edition_marker_v2(&mint)?;
        ctx.store().insert(address, encode(&marker)?)?;

        assert!(ctx.reader.is_edition_printed(&mint, 5).await?);
        assert!(ctx.reader.is_edition_printed(&mint, 300).await?);
        assert!(!ctx.reader.is_edition_printed(&mint, 6).await?);
        assert!(!ctx.reader.is_edition_printed(&mint, 10_000).await?);
        Ok(())
    })
    .await;
}

#[tokio::test]
async fn ledger_rejects_instructions_it_does_not_model() {
    run(|ctx| async move {
        let mint = ctx.generate_pubkey();
        let ixs = ctx.client.burn(token_metadata_sdk::BurnParams::new(
            mint,
            1,
            TokenStandard::NonFungible,
        ))?;
        let err = ctx.apply_all(&ixs).await.unwrap_err();
        assert!(err.to_string().contains("Burn"));
        Ok(())
    })
    .await;
}
