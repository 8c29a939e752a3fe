//! Instruction types

use {
    crate::{
        codec::{decode_exact, encode, impl_wire_decode_unit_enum, WireDecode, WireReader},
        error::Result,
        types::{
            unknown_variant, AssetData, AuthorizationData, CollectionDetailsToggle,
            CollectionToggle, Data, PrintSupply, RuleSetToggle, Toggle, TokenStandard, UsesToggle,
        },
    },
    borsh::BorshSerialize,
    num_derive::FromPrimitive,
    solana_program::pubkey::Pubkey,
};

/// Arguments of `Burn`.
#[derive(BorshSerialize, Clone, Debug, Eq, PartialEq)]
pub enum BurnArgs {
    /// First version
    V1 {
        /// Tokens to burn
        amount: u64,
    },
}

impl WireDecode for BurnArgs {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        match reader.read_u8()? {
            0 => Ok(Self::V1 {
                amount: u64::decode(reader)?,
            }),
            tag => Err(unknown_variant("BurnArgs", tag)),
        }
    }
}

/// Arguments of `Create`.
#[derive(BorshSerialize, Clone, Debug, Eq, PartialEq)]
pub enum CreateArgs {
    /// First version
    V1 {
        /// Metadata to write
        asset_data: AssetData,
        /// Decimals of the mint, when the instruction initializes it
        decimals: Option<u8>,
        /// Print supply of the master edition
        print_supply: Option<PrintSupply>,
    },
}

impl WireDecode for CreateArgs {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        match reader.read_u8()? {
            0 => Ok(Self::V1 {
                asset_data: AssetData::decode(reader)?,
                decimals: Option::decode(reader)?,
                print_supply: Option::decode(reader)?,
            }),
            tag => Err(unknown_variant("CreateArgs", tag)),
        }
    }
}

/// Arguments of `Mint`.
#[derive(BorshSerialize, Clone, Debug, Eq, PartialEq)]
pub enum MintArgs {
    /// First version
    V1 {
        /// Tokens to mint
        amount: u64,
        /// Rule set payload
        authorization_data: Option<AuthorizationData>,
    },
}

impl WireDecode for MintArgs {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        match reader.read_u8()? {
            0 => Ok(Self::V1 {
                amount: u64::decode(reader)?,
                authorization_data: Option::decode(reader)?,
            }),
            tag => Err(unknown_variant("MintArgs", tag)),
        }
    }
}

/// Arguments of `Delegate`; the variant selects the role being granted.
#[derive(BorshSerialize, Clone, Debug, Eq, PartialEq)]
pub enum DelegateArgs {
    /// Collection delegate
    CollectionV1 {
        /// Rule set payload
        authorization_data: Option<AuthorizationData>,
    },
    /// Sale delegate (programmable only)
    SaleV1 {
        /// Tokens the delegate may act on
        amount: u64,
        /// Rule set payload
        authorization_data: Option<AuthorizationData>,
    },
    /// Transfer delegate
    TransferV1 {
        /// Tokens the delegate may act on
        amount: u64,
        /// Rule set payload
        authorization_data: Option<AuthorizationData>,
    },
    /// Data delegate
    DataV1 {
        /// Rule set payload
        authorization_data: Option<AuthorizationData>,
    },
    /// Utility delegate
    UtilityV1 {
        /// Tokens the delegate may act on
        amount: u64,
        /// Rule set payload
        authorization_data: Option<AuthorizationData>,
    },
    /// Staking delegate
    StakingV1 {
        /// Tokens the delegate may act on
        amount: u64,
        /// Rule set payload
        authorization_data: Option<AuthorizationData>,
    },
    /// SPL Token delegate
    StandardV1 {
        /// Tokens the delegate may act on
        amount: u64,
    },
    /// Transfer delegate bound to one destination
    LockedTransferV1 {
        /// Tokens the delegate may act on
        amount: u64,
        /// Only destination the delegate may transfer to
        locked_address: Pubkey,
        /// Rule set payload
        authorization_data: Option<AuthorizationData>,
    },
    /// Programmable config delegate
    ProgrammableConfigV1 {
        /// Rule set payload
        authorization_data: Option<AuthorizationData>,
    },
    /// Authority item delegate
    AuthorityItemV1 {
        /// Rule set payload
        authorization_data: Option<AuthorizationData>,
    },
    /// Data item delegate
    DataItemV1 {
        /// Rule set payload
        authorization_data: Option<AuthorizationData>,
    },
    /// Collection item delegate
    CollectionItemV1 {
        /// Rule set payload
        authorization_data: Option<AuthorizationData>,
    },
    /// Programmable config item delegate
    ProgrammableConfigItemV1 {
        /// Rule set payload
        authorization_data: Option<AuthorizationData>,
    },
    /// Holder delegate allowed to print editions
    PrintDelegateV1 {
        /// Rule set payload
        authorization_data: Option<AuthorizationData>,
    },
}

impl DelegateArgs {
    /// Wire discriminator of the variant.
    pub fn variant_index(&self) -> u8 {
        match self {
            DelegateArgs::CollectionV1 { .. } => 0,
            DelegateArgs::SaleV1 { .. } => 1,
            DelegateArgs::TransferV1 { .. } => 2,
            DelegateArgs::DataV1 { .. } => 3,
            DelegateArgs::UtilityV1 { .. } => 4,
            DelegateArgs::StakingV1 { .. } => 5,
            DelegateArgs::StandardV1 { .. } => 6,
            DelegateArgs::LockedTransferV1 { .. } => 7,
            DelegateArgs::ProgrammableConfigV1 { .. } => 8,
            DelegateArgs::AuthorityItemV1 { .. } => 9,
            DelegateArgs::DataItemV1 { .. } => 10,
            DelegateArgs::CollectionItemV1 { .. } => 11,
            DelegateArgs::ProgrammableConfigItemV1 { .. } => 12,
            DelegateArgs::PrintDelegateV1 { .. } => 13,
        }
    }

    /// Whether the delegation is recorded on the token (token record or SPL
    /// delegate) rather than in a delegate record.
    pub fn is_token_delegate(&self) -> bool {
        matches!(
            self,
            DelegateArgs::SaleV1 { .. }
                | DelegateArgs::TransferV1 { .. }
                | DelegateArgs::UtilityV1 { .. }
                | DelegateArgs::StakingV1 { .. }
                | DelegateArgs::StandardV1 { .. }
                | DelegateArgs::LockedTransferV1 { .. }
        )
    }
}

impl WireDecode for DelegateArgs {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        let tag = reader.read_u8()?;
        if tag == 6 {
            return Ok(Self::StandardV1 {
                amount: u64::decode(reader)?,
            });
        }
        if tag == 7 {
            return Ok(Self::LockedTransferV1 {
                amount: u64::decode(reader)?,
                locked_address: Pubkey::decode(reader)?,
                authorization_data: Option::decode(reader)?,
            });
        }
        // remaining variants are `{ amount?, authorization_data }`
        let amount = match tag {
            1 | 2 | 4 | 5 => Some(u64::decode(reader)?),
            0 | 3 | 8..=13 => None,
            _ => return Err(unknown_variant("DelegateArgs", tag)),
        };
        let authorization_data = Option::decode(reader)?;
        let amount = amount.unwrap_or_default();
        Ok(match tag {
            0 => Self::CollectionV1 { authorization_data },
            1 => Self::SaleV1 {
                amount,
                authorization_data,
            },
            2 => Self::TransferV1 {
                amount,
                authorization_data,
            },
            3 => Self::DataV1 { authorization_data },
            4 => Self::UtilityV1 {
                amount,
                authorization_data,
            },
            5 => Self::StakingV1 {
                amount,
                authorization_data,
            },
            8 => Self::ProgrammableConfigV1 { authorization_data },
            9 => Self::AuthorityItemV1 { authorization_data },
            10 => Self::DataItemV1 { authorization_data },
            11 => Self::CollectionItemV1 { authorization_data },
            12 => Self::ProgrammableConfigItemV1 { authorization_data },
            _ => Self::PrintDelegateV1 { authorization_data },
        })
    }
}

/// Arguments of `Revoke`; the variant selects the role being revoked.
#[derive(BorshSerialize, Clone, Copy, Debug, Eq, FromPrimitive, PartialEq)]
pub enum RevokeArgs {
    /// Collection delegate
    CollectionV1,
    /// Sale delegate (programmable only)
    SaleV1,
    /// Transfer delegate
    TransferV1,
    /// Data delegate
    DataV1,
    /// Utility delegate
    UtilityV1,
    /// Staking delegate
    StakingV1,
    /// SPL Token delegate
    StandardV1,
    /// Transfer delegate bound to one destination
    LockedTransferV1,
    /// Programmable config delegate
    ProgrammableConfigV1,
    /// Migration delegate
    MigrationV1,
    /// Authority item delegate
    AuthorityItemV1,
    /// Data item delegate
    DataItemV1,
    /// Collection item delegate
    CollectionItemV1,
    /// Programmable config item delegate
    ProgrammableConfigItemV1,
    /// Holder delegate allowed to print editions
    PrintDelegateV1,
}

/// Arguments of `Verify` and `Unverify`.
#[derive(BorshSerialize, Clone, Copy, Debug, Eq, FromPrimitive, PartialEq)]
pub enum VerificationArgs {
    /// Sign off as a creator
    CreatorV1,
    /// Verify collection membership
    CollectionV1,
}

impl_wire_decode_unit_enum!(RevokeArgs, VerificationArgs);

/// Arguments of `Lock`.
#[derive(BorshSerialize, Clone, Debug, Eq, PartialEq)]
pub enum LockArgs {
    /// First version
    V1 {
        /// Rule set payload
        authorization_data: Option<AuthorizationData>,
    },
}

/// Arguments of `Unlock`.
#[derive(BorshSerialize, Clone, Debug, Eq, PartialEq)]
pub enum UnlockArgs {
    /// First version
    V1 {
        /// Rule set payload
        authorization_data: Option<AuthorizationData>,
    },
}

impl WireDecode for LockArgs {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        match reader.read_u8()? {
            0 => Ok(Self::V1 {
                authorization_data: Option::decode(reader)?,
            }),
            tag => Err(unknown_variant("LockArgs", tag)),
        }
    }
}

impl WireDecode for UnlockArgs {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        match reader.read_u8()? {
            0 => Ok(Self::V1 {
                authorization_data: Option::decode(reader)?,
            }),
            tag => Err(unknown_variant("UnlockArgs", tag)),
        }
    }
}

/// Arguments of `Transfer`.
#[derive(BorshSerialize, Clone, Debug, Eq, PartialEq)]
pub enum TransferArgs {
    /// First version
    V1 {
        /// Tokens to move
        amount: u64,
        /// Rule set payload
        authorization_data: Option<AuthorizationData>,
    },
}

impl WireDecode for TransferArgs {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        match reader.read_u8()? {
            0 => Ok(Self::V1 {
                amount: u64::decode(reader)?,
                authorization_data: Option::decode(reader)?,
            }),
            tag => Err(unknown_variant("TransferArgs", tag)),
        }
    }
}

/// Arguments of `Update`. V2 variants are named after the authority that
/// signs; each carries only the fields that authority may change.
#[derive(BorshSerialize, Clone, Debug, Eq, PartialEq)]
pub enum UpdateArgs {
    /// First version, signed by the update authority
    V1 {
        /// Replacement update authority
        new_update_authority: Option<Pubkey>,
        /// Replacement name, symbol, uri, fee and creators
        data: Option<Data>,
        /// Set the primary sale flag
        primary_sale_happened: Option<bool>,
        /// Set mutability (can only go false)
        is_mutable: Option<bool>,
        /// Collection change
        collection: CollectionToggle,
        /// Collection details change
        collection_details: CollectionDetailsToggle,
        /// Uses change
        uses: UsesToggle,
        /// Rule set change
        rule_set: RuleSetToggle,
        /// Rule set payload
        authorization_data: Option<AuthorizationData>,
    },
    /// Signed by the update authority
    AsUpdateAuthorityV2 {
        /// Replacement update authority
        new_update_authority: Option<Pubkey>,
        /// Replacement name, symbol, uri, fee and creators
        data: Option<Data>,
        /// Set the primary sale flag
        primary_sale_happened: Option<bool>,
        /// Set mutability (can only go false)
        is_mutable: Option<bool>,
        /// Collection change
        collection: CollectionToggle,
        /// Collection details change
        collection_details: CollectionDetailsToggle,
        /// Uses change
        uses: UsesToggle,
        /// Rule set change
        rule_set: RuleSetToggle,
        /// Corrected token standard
        token_standard: Option<TokenStandard>,
        /// Rule set payload
        authorization_data: Option<AuthorizationData>,
    },
    /// Signed by an authority item delegate
    AsAuthorityItemDelegateV2 {
        /// Replacement update authority
        new_update_authority: Option<Pubkey>,
        /// Set the primary sale flag
        primary_sale_happened: Option<bool>,
        /// Set mutability (can only go false)
        is_mutable: Option<bool>,
        /// Corrected token standard
        token_standard: Option<TokenStandard>,
        /// Rule set payload
        authorization_data: Option<AuthorizationData>,
    },
    /// Signed by a collection delegate
    AsCollectionDelegateV2 {
        /// Collection change
        collection: CollectionToggle,
        /// Rule set payload
        authorization_data: Option<AuthorizationData>,
    },
    /// Signed by a data delegate
    AsDataDelegateV2 {
        /// Replacement name, symbol, uri, fee and creators
        data: Option<Data>,
        /// Rule set payload
        authorization_data: Option<AuthorizationData>,
    },
    /// Signed by a programmable config delegate
    AsProgrammableConfigDelegateV2 {
        /// Rule set change
        rule_set: RuleSetToggle,
        /// Rule set payload
        authorization_data: Option<AuthorizationData>,
    },
    /// Signed by a data item delegate
    AsDataItemDelegateV2 {
        /// Replacement name, symbol, uri, fee and creators
        data: Option<Data>,
        /// Rule set payload
        authorization_data: Option<AuthorizationData>,
    },
    /// Signed by a collection item delegate
    AsCollectionItemDelegateV2 {
        /// Collection change
        collection: CollectionToggle,
        /// Rule set payload
        authorization_data: Option<AuthorizationData>,
    },
    /// Signed by a programmable config item delegate
    AsProgrammableConfigItemDelegateV2 {
        /// Rule set change
        rule_set: RuleSetToggle,
        /// Rule set payload
        authorization_data: Option<AuthorizationData>,
    },
}

impl UpdateArgs {
    /// An update-authority update that changes nothing; callers fill in the
    /// fields they want to touch.
    pub fn as_update_authority() -> Self {
        UpdateArgs::AsUpdateAuthorityV2 {
            new_update_authority: None,
            data: None,
            primary_sale_happened: None,
            is_mutable: None,
            collection: CollectionToggle::None,
            collection_details: CollectionDetailsToggle::None,
            uses: UsesToggle::None,
            rule_set: RuleSetToggle::None,
            token_standard: None,
            authorization_data: None,
        }
    }
}

impl WireDecode for UpdateArgs {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        Ok(match reader.read_u8()? {
            0 => Self::V1 {
                new_update_authority: Option::decode(reader)?,
                data: Option::decode(reader)?,
                primary_sale_happened: Option::decode(reader)?,
                is_mutable: Option::decode(reader)?,
                collection: Toggle::decode(reader)?,
                collection_details: Toggle::decode(reader)?,
                uses: Toggle::decode(reader)?,
                rule_set: Toggle::decode(reader)?,
                authorization_data: Option::decode(reader)?,
            },
            1 => Self::AsUpdateAuthorityV2 {
                new_update_authority: Option::decode(reader)?,
                data: Option::decode(reader)?,
                primary_sale_happened: Option::decode(reader)?,
                is_mutable: Option::decode(reader)?,
                collection: Toggle::decode(reader)?,
                collection_details: Toggle::decode(reader)?,
                uses: Toggle::decode(reader)?,
                rule_set: Toggle::decode(reader)?,
                token_standard: Option::decode(reader)?,
                authorization_data: Option::decode(reader)?,
            },
            2 => Self::AsAuthorityItemDelegateV2 {
                new_update_authority: Option::decode(reader)?,
                primary_sale_happened: Option::decode(reader)?,
                is_mutable: Option::decode(reader)?,
                token_standard: Option::decode(reader)?,
                authorization_data: Option::decode(reader)?,
            },
            3 => Self::AsCollectionDelegateV2 {
                collection: Toggle::decode(reader)?,
                authorization_data: Option::decode(reader)?,
            },
            4 => Self::AsDataDelegateV2 {
                data: Option::decode(reader)?,
                authorization_data: Option::decode(reader)?,
            },
            5 => Self::AsProgrammableConfigDelegateV2 {
                rule_set: Toggle::decode(reader)?,
                authorization_data: Option::decode(reader)?,
            },
            6 => Self::AsDataItemDelegateV2 {
                data: Option::decode(reader)?,
                authorization_data: Option::decode(reader)?,
            },
            7 => Self::AsCollectionItemDelegateV2 {
                collection: Toggle::decode(reader)?,
                authorization_data: Option::decode(reader)?,
            },
            8 => Self::AsProgrammableConfigItemDelegateV2 {
                rule_set: Toggle::decode(reader)?,
                authorization_data: Option::decode(reader)?,
            },
            tag => return Err(unknown_variant("UpdateArgs", tag)),
        })
    }
}

/// Instructions of the Token Metadata program covered by this crate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MetadataInstruction {
    /// Burn an asset and close its accounts
    Burn(BurnArgs),
    /// Create metadata (and master edition) for a mint
    Create(CreateArgs),
    /// Mint tokens of an asset
    Mint(MintArgs),
    /// Grant a delegate role
    Delegate(DelegateArgs),
    /// Revoke a delegate role
    Revoke(RevokeArgs),
    /// Lock a programmable token
    Lock(LockArgs),
    /// Unlock a programmable token
    Unlock(UnlockArgs),
    /// Transfer tokens of an asset
    Transfer(TransferArgs),
    /// Update metadata
    Update(UpdateArgs),
    /// Verify a creator or collection
    Verify(VerificationArgs),
    /// Unverify a creator or collection
    Unverify(VerificationArgs),
}

impl MetadataInstruction {
    /// Leading data byte identifying the instruction.
    pub fn discriminator(&self) -> u8 {
        match self {
            MetadataInstruction::Burn(_) => 41,
            MetadataInstruction::Create(_) => 42,
            MetadataInstruction::Mint(_) => 43,
            MetadataInstruction::Delegate(_) => 44,
            MetadataInstruction::Revoke(_) => 45,
            MetadataInstruction::Lock(_) => 46,
            MetadataInstruction::Unlock(_) => 47,
            MetadataInstruction::Transfer(_) => 49,
            MetadataInstruction::Update(_) => 50,
            MetadataInstruction::Verify(_) => 52,
            MetadataInstruction::Unverify(_) => 53,
        }
    }

    /// Short instruction name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            MetadataInstruction::Burn(_) => "Burn",
            MetadataInstruction::Create(_) => "Create",
            MetadataInstruction::Mint(_) => "Mint",
            MetadataInstruction::Delegate(_) => "Delegate",
            MetadataInstruction::Revoke(_) => "Revoke",
            MetadataInstruction::Lock(_) => "Lock",
            MetadataInstruction::Unlock(_) => "Unlock",
            MetadataInstruction::Transfer(_) => "Transfer",
            MetadataInstruction::Update(_) => "Update",
            MetadataInstruction::Verify(_) => "Verify",
            MetadataInstruction::Unverify(_) => "Unverify",
        }
    }

    /// Pack into instruction data: discriminator followed by the arguments.
    pub fn pack(&self) -> Result<Vec<u8>> {
        let mut data = vec![self.discriminator()];
        data.extend(match self {
            MetadataInstruction::Burn(args) => encode(args)?,
            MetadataInstruction::Create(args) => encode(args)?,
            MetadataInstruction::Mint(args) => encode(args)?,
            MetadataInstruction::Delegate(args) => encode(args)?,
            MetadataInstruction::Revoke(args) => encode(args)?,
            MetadataInstruction::Lock(args) => encode(args)?,
            MetadataInstruction::Unlock(args) => encode(args)?,
            MetadataInstruction::Transfer(args) => encode(args)?,
            MetadataInstruction::Update(args) => encode(args)?,
            MetadataInstruction::Verify(args) => encode(args)?,
            MetadataInstruction::Unverify(args) => encode(args)?,
        });
        Ok(data)
    }

    /// Unpack instruction data. The whole buffer must be consumed.
    pub fn unpack(input: &[u8]) -> Result<Self> {
        let mut reader = WireReader::new(input);
        let discriminator = reader.read_u8()?;
        let rest = &input[reader.offset()..];
        Ok(match discriminator {
            41 => Self::Burn(decode_exact(rest)?),
            42 => Self::Create(decode_exact(rest)?),
            43 => Self::Mint(decode_exact(rest)?),
            44 => Self::Delegate(decode_exact(rest)?),
            45 => Self::Revoke(decode_exact(rest)?),
            46 => Self::Lock(decode_exact(rest)?),
            47 => Self::Unlock(decode_exact(rest)?),
            49 => Self::Transfer(decode_exact(rest)?),
            50 => Self::Update(decode_exact(rest)?),
            52 => Self::Verify(decode_exact(rest)?),
            53 => Self::Unverify(decode_exact(rest)?),
            other => return Err(unknown_variant("MetadataInstruction", other)),
        })
    }
}
