//! JSON views of decoded accounts and built instructions.

use {
    serde_json::{json, Value},
    solana_program::{instruction::Instruction, pubkey::Pubkey},
    token_metadata_sdk::{
        interface::{
            state::{
                CollectionAuthorityRecord, Edition, EditionAccount, EditionMarker,
                EditionMarkerV2, HolderDelegateRecord, MasterEdition, Metadata,
                MetadataDelegateRecord, Mint, TokenAccount, TokenRecord, UseAuthorityRecord,
            },
            instruction::{
                BurnArgs, CreateArgs, DelegateArgs, LockArgs, MetadataInstruction, MintArgs,
                TransferArgs, UnlockArgs, UpdateArgs,
            },
            types::{
                AssetData, AuthorizationData, Collection, CollectionDetails, Creator, Data,
                PayloadType, PrintSupply, ProgrammableConfig, Toggle, Uses,
            },
        },
        DigitalAsset, DigitalAssetWithToken,
    },
};

fn key_opt(key: Option<Pubkey>) -> Value {
    key.map_or(Value::Null, |k| Value::String(k.to_string()))
}

fn creators(creators: &[Creator]) -> Value {
    creators
        .iter()
        .map(|c| {
            json!({
                "address": c.address.to_string(),
                "verified": c.verified,
                "share": c.share,
            })
        })
        .collect()
}

fn collection(c: &Collection) -> Value {
    json!({ "verified": c.verified, "key": c.key.to_string() })
}

fn uses(u: &Uses) -> Value {
    json!({
        "use_method": format!("{:?}", u.use_method),
        "remaining": u.remaining,
        "total": u.total,
    })
}

fn collection_details(d: &CollectionDetails) -> Value {
    match d {
        CollectionDetails::V1 { size } => json!({ "V1": { "size": size } }),
        CollectionDetails::V2 { .. } => json!("V2"),
    }
}

fn toggle<T>(t: &Toggle<T>, set: impl Fn(&T) -> Value) -> Value {
    match t {
        Toggle::None => json!("None"),
        Toggle::Clear => json!("Clear"),
        Toggle::Set(value) => json!({ "Set": set(value) }),
    }
}

fn authorization_data(data: &Option<AuthorizationData>) -> Value {
    let Some(data) = data else {
        return Value::Null;
    };
    let payload: serde_json::Map<String, Value> = data
        .payload
        .map
        .iter()
        .map(|(key, value)| {
            let value = match value {
                PayloadType::Pubkey(k) => json!({ "Pubkey": k.to_string() }),
                PayloadType::Seeds(s) => {
                    json!({ "Seeds": s.seeds.iter().map(hex::encode).collect::<Vec<_>>() })
                }
                PayloadType::MerkleProof(p) => {
                    json!({ "MerkleProof": p.proof.iter().map(hex::encode).collect::<Vec<_>>() })
                }
                PayloadType::Number(n) => json!({ "Number": n }),
            };
            (key.clone(), value)
        })
        .collect();
    json!({ "payload": payload })
}

fn data(d: &Data) -> Value {
    json!({
        "name": d.name,
        "symbol": d.symbol,
        "uri": d.uri,
        "seller_fee_basis_points": d.seller_fee_basis_points,
        "creators": d.creators.as_deref().map(creators),
    })
}

fn asset_data(a: &AssetData) -> Value {
    json!({
        "name": a.name,
        "symbol": a.symbol,
        "uri": a.uri,
        "seller_fee_basis_points": a.seller_fee_basis_points,
        "creators": a.creators.as_deref().map(creators),
        "primary_sale_happened": a.primary_sale_happened,
        "is_mutable": a.is_mutable,
        "token_standard": format!("{:?}", a.token_standard),
        "collection": a.collection.as_ref().map(collection),
        "uses": a.uses.as_ref().map(uses),
        "collection_details": a.collection_details.as_ref().map(collection_details),
        "rule_set": key_opt(a.rule_set),
    })
}

fn print_supply(p: &PrintSupply) -> Value {
    match p {
        PrintSupply::Zero => json!("Zero"),
        PrintSupply::Limited(max) => json!({ "Limited": max }),
        PrintSupply::Unlimited => json!("Unlimited"),
    }
}

fn delegate_args(args: &DelegateArgs) -> (String, Value) {
    let auth = |a: &Option<AuthorizationData>| {
        json!({ "authorization_data": authorization_data(a) })
    };
    let amount_auth = |amount: &u64, a: &Option<AuthorizationData>| {
        json!({ "amount": amount, "authorization_data": authorization_data(a) })
    };
    let fields = match args {
        DelegateArgs::CollectionV1 { authorization_data }
        | DelegateArgs::DataV1 { authorization_data }
        | DelegateArgs::ProgrammableConfigV1 { authorization_data }
        | DelegateArgs::AuthorityItemV1 { authorization_data }
        | DelegateArgs::DataItemV1 { authorization_data }
        | DelegateArgs::CollectionItemV1 { authorization_data }
        | DelegateArgs::ProgrammableConfigItemV1 { authorization_data }
        | DelegateArgs::PrintDelegateV1 { authorization_data } => auth(authorization_data),
        DelegateArgs::SaleV1 {
            amount,
            authorization_data,
        }
        | DelegateArgs::TransferV1 {
            amount,
            authorization_data,
        }
        | DelegateArgs::UtilityV1 {
            amount,
            authorization_data,
        }
        | DelegateArgs::StakingV1 {
            amount,
            authorization_data,
        } => amount_auth(amount, authorization_data),
        DelegateArgs::StandardV1 { amount } => json!({ "amount": amount }),
        DelegateArgs::LockedTransferV1 {
            amount,
            locked_address,
            authorization_data: a,
        } => json!({
            "amount": amount,
            "locked_address": locked_address.to_string(),
            "authorization_data": authorization_data(a),
        }),
    };
    (variant_name(args), fields)
}

fn update_args(args: &UpdateArgs) -> Value {
    match args {
        UpdateArgs::V1 {
            new_update_authority,
            data: d,
            primary_sale_happened,
            is_mutable,
            collection: c,
            collection_details: details,
            uses: u,
            rule_set,
            authorization_data: a,
        } => json!({
            "new_update_authority": key_opt(*new_update_authority),
            "data": d.as_ref().map(data),
            "primary_sale_happened": primary_sale_happened,
            "is_mutable": is_mutable,
            "collection": toggle(c, collection),
            "collection_details": toggle(details, collection_details),
            "uses": toggle(u, uses),
            "rule_set": toggle(rule_set, |k| json!(k.to_string())),
            "authorization_data": authorization_data(a),
        }),
        UpdateArgs::AsUpdateAuthorityV2 {
            new_update_authority,
            data: d,
            primary_sale_happened,
            is_mutable,
            collection: c,
            collection_details: details,
            uses: u,
            rule_set,
            token_standard,
            authorization_data: a,
        } => json!({
            "new_update_authority": key_opt(*new_update_authority),
            "data": d.as_ref().map(data),
            "primary_sale_happened": primary_sale_happened,
            "is_mutable": is_mutable,
            "collection": toggle(c, collection),
            "collection_details": toggle(details, collection_details),
            "uses": toggle(u, uses),
            "rule_set": toggle(rule_set, |k| json!(k.to_string())),
            "token_standard": token_standard.map(|s| format!("{s:?}")),
            "authorization_data": authorization_data(a),
        }),
        UpdateArgs::AsAuthorityItemDelegateV2 {
            new_update_authority,
            primary_sale_happened,
            is_mutable,
            token_standard,
            authorization_data: a,
        } => json!({
            "new_update_authority": key_opt(*new_update_authority),
            "primary_sale_happened": primary_sale_happened,
            "is_mutable": is_mutable,
            "token_standard": token_standard.map(|s| format!("{s:?}")),
            "authorization_data": authorization_data(a),
        }),
        UpdateArgs::AsCollectionDelegateV2 {
            collection: c,
            authorization_data: a,
        }
        | UpdateArgs::AsCollectionItemDelegateV2 {
            collection: c,
            authorization_data: a,
        } => json!({
            "collection": toggle(c, collection),
            "authorization_data": authorization_data(a),
        }),
        UpdateArgs::AsDataDelegateV2 {
            data: d,
            authorization_data: a,
        }
        | UpdateArgs::AsDataItemDelegateV2 {
            data: d,
            authorization_data: a,
        } => json!({
            "data": d.as_ref().map(data),
            "authorization_data": authorization_data(a),
        }),
        UpdateArgs::AsProgrammableConfigDelegateV2 {
            rule_set,
            authorization_data: a,
        }
        | UpdateArgs::AsProgrammableConfigItemDelegateV2 {
            rule_set,
            authorization_data: a,
        } => json!({
            "rule_set": toggle(rule_set, |k| json!(k.to_string())),
            "authorization_data": authorization_data(a),
        }),
    }
}

// Variant name from the derived Debug output, up to the first field.
fn variant_name(value: &impl std::fmt::Debug) -> String {
    let debug = format!("{value:?}");
    debug
        .split(|c: char| !c.is_alphanumeric())
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Decoded instruction data: name, discriminator, argument variant and its
/// fields.
pub fn instruction(ix: &MetadataInstruction) -> Value {
    let (variant, args) = match ix {
        MetadataInstruction::Burn(BurnArgs::V1 { amount }) => {
            ("V1".to_string(), json!({ "amount": amount }))
        }
        MetadataInstruction::Create(CreateArgs::V1 {
            asset_data: a,
            decimals,
            print_supply: supply,
        }) => (
            "V1".to_string(),
            json!({
                "asset_data": asset_data(a),
                "decimals": decimals,
                "print_supply": supply.as_ref().map(print_supply),
            }),
        ),
        MetadataInstruction::Mint(MintArgs::V1 {
            amount,
            authorization_data: a,
        })
        | MetadataInstruction::Transfer(TransferArgs::V1 {
            amount,
            authorization_data: a,
        }) => (
            "V1".to_string(),
            json!({ "amount": amount, "authorization_data": authorization_data(a) }),
        ),
        MetadataInstruction::Delegate(args) => delegate_args(args),
        MetadataInstruction::Revoke(args) => (variant_name(args), json!({})),
        MetadataInstruction::Lock(LockArgs::V1 {
            authorization_data: a,
        })
        | MetadataInstruction::Unlock(UnlockArgs::V1 {
            authorization_data: a,
        }) => (
            "V1".to_string(),
            json!({ "authorization_data": authorization_data(a) }),
        ),
        MetadataInstruction::Update(args) => (variant_name(args), update_args(args)),
        MetadataInstruction::Verify(args) | MetadataInstruction::Unverify(args) => {
            (variant_name(args), json!({}))
        }
    };
    json!({
        "instruction": ix.name(),
        "discriminator": ix.discriminator(),
        "variant": variant,
        "args": args,
    })
}

pub fn instructions(ixs: &[Instruction]) -> Value {
    ixs.iter()
        .map(|ix| {
            json!({
                "program_id": ix.program_id.to_string(),
                "accounts": ix.accounts.iter().map(|meta| json!({
                    "pubkey": meta.pubkey.to_string(),
                    "is_signer": meta.is_signer,
                    "is_writable": meta.is_writable,
                })).collect::<Vec<_>>(),
                "data": hex::encode(&ix.data),
            })
        })
        .collect()
}

pub fn metadata(m: &Metadata) -> Value {
    json!({
        "update_authority": m.update_authority.to_string(),
        "mint": m.mint.to_string(),
        "name": m.trimmed_name(),
        "symbol": m.trimmed_symbol(),
        "uri": m.trimmed_uri(),
        "seller_fee_basis_points": m.seller_fee_basis_points,
        "creators": m.creators.as_deref().map(creators),
        "primary_sale_happened": m.primary_sale_happened,
        "is_mutable": m.is_mutable,
        "edition_nonce": m.edition_nonce,
        "token_standard": m.token_standard.map(|s| format!("{s:?}")),
        "collection": m.collection.as_ref().map(collection),
        "uses": m.uses.as_ref().map(uses),
        "collection_details": m.collection_details.as_ref().map(collection_details),
        "programmable_config": m.programmable_config.as_ref().map(|p| match p {
            ProgrammableConfig::V1 { rule_set } => {
                json!({ "V1": { "rule_set": key_opt(*rule_set) } })
            }
        }),
    })
}

pub fn master_edition(e: &MasterEdition) -> Value {
    json!({ "supply": e.supply, "max_supply": e.max_supply })
}

pub fn edition(e: &Edition) -> Value {
    json!({ "parent": e.parent.to_string(), "edition": e.edition })
}

pub fn edition_account(e: &EditionAccount) -> Value {
    match e {
        EditionAccount::Master(master) => json!({ "master": master_edition(master) }),
        EditionAccount::Print(print) => json!({ "print": edition(print) }),
    }
}

pub fn edition_marker(m: &EditionMarker) -> Value {
    json!({ "ledger": hex::encode(m.ledger) })
}

pub fn edition_marker_v2(m: &EditionMarkerV2) -> Value {
    json!({ "ledger": hex::encode(&m.ledger) })
}

pub fn token_record(r: &TokenRecord) -> Value {
    json!({
        "bump": r.bump,
        "state": format!("{:?}", r.state),
        "rule_set_revision": r.rule_set_revision,
        "delegate": key_opt(r.delegate),
        "delegate_role": r.delegate_role.map(|role| format!("{role:?}")),
        "locked_transfer": key_opt(r.locked_transfer),
    })
}

pub fn metadata_delegate_record(r: &MetadataDelegateRecord) -> Value {
    json!({
        "bump": r.bump,
        "mint": r.mint.to_string(),
        "delegate": r.delegate.to_string(),
        "update_authority": r.update_authority.to_string(),
    })
}

pub fn holder_delegate_record(r: &HolderDelegateRecord) -> Value {
    json!({
        "bump": r.bump,
        "mint": r.mint.to_string(),
        "delegate": r.delegate.to_string(),
        "update_authority": r.update_authority.to_string(),
    })
}

pub fn collection_authority_record(r: &CollectionAuthorityRecord) -> Value {
    json!({ "bump": r.bump, "update_authority": key_opt(r.update_authority) })
}

pub fn use_authority_record(r: &UseAuthorityRecord) -> Value {
    json!({ "bump": r.bump, "allowed_uses": r.allowed_uses })
}

pub fn mint(m: &Mint) -> Value {
    json!({
        "mint_authority": key_opt(m.mint_authority.0),
        "supply": m.supply,
        "decimals": m.decimals,
        "is_initialized": m.is_initialized,
        "freeze_authority": key_opt(m.freeze_authority.0),
    })
}

pub fn token_account(t: &TokenAccount) -> Value {
    json!({
        "mint": t.mint.to_string(),
        "owner": t.owner.to_string(),
        "amount": t.amount,
        "delegate": key_opt(t.delegate.0),
        "state": format!("{:?}", t.state),
        "is_native": t.is_native.0,
        "delegated_amount": t.delegated_amount,
        "close_authority": key_opt(t.close_authority.0),
    })
}

pub fn digital_asset(asset: &DigitalAsset) -> Value {
    json!({
        "mint_address": asset.mint_address.to_string(),
        "mint": mint(&asset.mint),
        "metadata_address": asset.metadata_address.to_string(),
        "metadata": metadata(&asset.metadata),
        "edition_address": asset.edition_address.to_string(),
        "edition": asset.edition.as_ref().map(edition_account),
    })
}

pub fn digital_asset_with_token(held: &DigitalAssetWithToken) -> Value {
    json!({
        "asset": digital_asset(&held.asset),
        "token_address": held.token_address.to_string(),
        "token": token_account(&held.token),
        "token_record": held.token_record.as_ref().map(token_record),
    })
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        solana_program::instruction::AccountMeta,
        token_metadata_sdk::interface::codec::COption,
    };

    #[test]
    fn instruction_view_hex_encodes_data() {
        let ix = Instruction {
            program_id: token_metadata_sdk::interface::id(),
            accounts: vec![AccountMeta::new_readonly(Pubkey::new_from_array([1; 32]), true)],
            data: vec![42, 0],
        };
        let view = instructions(&[ix]);
        assert_eq!(view[0]["data"], "2a00");
        assert_eq!(view[0]["accounts"][0]["is_signer"], true);
        assert_eq!(view[0]["accounts"][0]["is_writable"], false);
        assert_eq!(
            view[0]["program_id"],
            "metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s"
        );
    }

    #[test]
    fn delegate_args_render_as_fields() {
        let mut payload = token_metadata_sdk::interface::types::Payload::default();
        payload
            .map
            .insert("amount".to_string(), PayloadType::Number(7));
        let view = instruction(&MetadataInstruction::Delegate(
            DelegateArgs::LockedTransferV1 {
                amount: 3,
                locked_address: Pubkey::new_from_array([4; 32]),
                authorization_data: Some(AuthorizationData { payload }),
            },
        ));
        assert_eq!(view["instruction"], "Delegate");
        assert_eq!(view["discriminator"], 44);
        assert_eq!(view["variant"], "LockedTransferV1");
        assert_eq!(view["args"]["amount"], 3);
        assert_eq!(
            view["args"]["locked_address"],
            Pubkey::new_from_array([4; 32]).to_string()
        );
        assert_eq!(
            view["args"]["authorization_data"]["payload"]["amount"]["Number"],
            7
        );
    }

    #[test]
    fn update_toggles_and_fieldless_args_render() {
        let view = instruction(&MetadataInstruction::Update(
            UpdateArgs::AsCollectionDelegateV2 {
                collection: Toggle::Set(Collection {
                    verified: false,
                    key: Pubkey::new_from_array([6; 32]),
                }),
                authorization_data: None,
            },
        ));
        assert_eq!(view["variant"], "AsCollectionDelegateV2");
        assert_eq!(view["args"]["collection"]["Set"]["verified"], false);
        assert!(view["args"]["authorization_data"].is_null());

        let view = instruction(&MetadataInstruction::Revoke(
            token_metadata_sdk::interface::instruction::RevokeArgs::MigrationV1,
        ));
        assert_eq!(view["variant"], "MigrationV1");
        assert_eq!(view["args"], json!({}));
    }

    #[test]
    fn absent_coption_renders_null() {
        let view = mint(&Mint {
            mint_authority: COption(None),
            supply: 5,
            decimals: 2,
            is_initialized: true,
            freeze_authority: COption(None),
        });
        assert!(view["mint_authority"].is_null());
        assert_eq!(view["supply"], 5);
    }
}
