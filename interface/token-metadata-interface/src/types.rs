//! Shared data types used by accounts and instruction arguments

use {
    crate::{
        codec::{impl_wire_decode, impl_wire_decode_unit_enum, WireDecode, WireReader},
        error::{MetadataError, Result},
        seeds::{PayloadKey, SeedEnum},
    },
    borsh::BorshSerialize,
    num_derive::FromPrimitive,
    solana_program::pubkey::Pubkey,
    std::collections::BTreeMap,
};

/// Account discriminator stored in the first byte of every program account.
#[derive(BorshSerialize, Clone, Copy, Debug, Eq, FromPrimitive, Hash, PartialEq)]
pub enum Key {
    /// Unused account
    Uninitialized,
    /// Print edition
    EditionV1,
    /// Deprecated master edition
    MasterEditionV1,
    /// Deprecated reservation list
    ReservationListV1,
    /// Metadata account
    MetadataV1,
    /// Deprecated reservation list
    ReservationListV2,
    /// Master edition
    MasterEditionV2,
    /// Edition marker (31-byte ledger)
    EditionMarker,
    /// Use authority record
    UseAuthorityRecord,
    /// Collection authority record
    CollectionAuthorityRecord,
    /// Token owned escrow
    TokenOwnedEscrow,
    /// Token record for programmable assets
    TokenRecord,
    /// Metadata delegate record
    MetadataDelegate,
    /// Edition marker with a variable ledger
    EditionMarkerV2,
    /// Holder delegate record
    HolderDelegate,
}

/// Asset class of a mint.
#[derive(BorshSerialize, Clone, Copy, Debug, Eq, FromPrimitive, Hash, PartialEq)]
pub enum TokenStandard {
    /// Single-supply NFT with a master edition
    NonFungible,
    /// Fungible token with zero decimals and rich metadata
    FungibleAsset,
    /// Regular fungible token
    Fungible,
    /// Print of a master edition
    NonFungibleEdition,
    /// NFT governed by a token record and rule set
    ProgrammableNonFungible,
    /// Print of a programmable master edition
    ProgrammableNonFungibleEdition,
}

impl TokenStandard {
    /// Standards backed by a (master) edition account.
    pub fn is_non_fungible(self) -> bool {
        matches!(
            self,
            TokenStandard::NonFungible
                | TokenStandard::NonFungibleEdition
                | TokenStandard::ProgrammableNonFungible
                | TokenStandard::ProgrammableNonFungibleEdition
        )
    }

    /// Standards that require a token record.
    pub fn is_programmable(self) -> bool {
        matches!(
            self,
            TokenStandard::ProgrammableNonFungible | TokenStandard::ProgrammableNonFungibleEdition
        )
    }
}

/// How `Uses` are consumed.
#[derive(BorshSerialize, Clone, Copy, Debug, Eq, FromPrimitive, PartialEq)]
pub enum UseMethod {
    /// Burn the asset on use
    Burn,
    /// Decrement a counter
    Multiple,
    /// Single use
    Single,
}

/// Lock state of a programmable token account.
#[derive(BorshSerialize, Clone, Copy, Debug, Default, Eq, FromPrimitive, PartialEq)]
pub enum TokenState {
    /// Transferable
    #[default]
    Unlocked,
    /// Locked by a delegate
    Locked,
    /// Listed by a sale delegate
    Listed,
}

/// Token-level delegate roles recorded on a token record.
#[derive(BorshSerialize, Clone, Copy, Debug, Eq, FromPrimitive, PartialEq)]
pub enum TokenDelegateRole {
    /// Sale delegate
    Sale,
    /// Transfer delegate
    Transfer,
    /// Utility delegate
    Utility,
    /// Staking delegate
    Staking,
    /// SPL standard delegate
    Standard,
    /// Transfer delegate locked to a destination
    LockedTransfer,
    /// Migration delegate
    Migration,
}

impl_wire_decode_unit_enum!(Key, TokenStandard, UseMethod, TokenState, TokenDelegateRole);

/// Creator entry with royalty share.
#[derive(BorshSerialize, Clone, Debug, Eq, PartialEq)]
pub struct Creator {
    /// Creator address
    pub address: Pubkey,
    /// Whether the creator signed off on the asset
    pub verified: bool,
    /// Royalty share in percent
    pub share: u8,
}

impl_wire_decode!(Creator {
    address,
    verified,
    share
});

/// Collection membership.
#[derive(BorshSerialize, Clone, Debug, Eq, PartialEq)]
pub struct Collection {
    /// Whether the collection authority verified the membership
    pub verified: bool,
    /// Collection mint
    pub key: Pubkey,
}

impl_wire_decode!(Collection { verified, key });

/// Usage tracking.
#[derive(BorshSerialize, Clone, Debug, Eq, PartialEq)]
pub struct Uses {
    /// Consumption method
    pub use_method: UseMethod,
    /// Uses left
    pub remaining: u64,
    /// Total uses granted
    pub total: u64,
}

impl_wire_decode!(Uses {
    use_method,
    remaining,
    total
});

/// Details kept on collection parents.
#[derive(BorshSerialize, Clone, Debug, Eq, PartialEq)]
pub enum CollectionDetails {
    /// Sized collection
    V1 {
        /// Number of verified items
        size: u64,
    },
    /// Reserved layout
    V2 {
        /// Unused bytes
        padding: [u8; 8],
    },
}

impl WireDecode for CollectionDetails {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        match reader.read_u8()? {
            0 => Ok(Self::V1 {
                size: u64::decode(reader)?,
            }),
            1 => Ok(Self::V2 {
                padding: <[u8; 8]>::decode(reader)?,
            }),
            tag => Err(unknown_variant("CollectionDetails", tag)),
        }
    }
}

/// Rule-set configuration for programmable assets.
#[derive(BorshSerialize, Clone, Debug, Eq, PartialEq)]
pub enum ProgrammableConfig {
    /// First layout
    V1 {
        /// Authorization rule set, if any
        rule_set: Option<Pubkey>,
    },
}

impl WireDecode for ProgrammableConfig {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        match reader.read_u8()? {
            0 => Ok(Self::V1 {
                rule_set: Option::decode(reader)?,
            }),
            tag => Err(unknown_variant("ProgrammableConfig", tag)),
        }
    }
}

/// Maximum number of prints a master edition allows.
#[derive(BorshSerialize, Clone, Copy, Debug, Eq, PartialEq)]
pub enum PrintSupply {
    /// No prints
    Zero,
    /// At most this many prints
    Limited(u64),
    /// Unbounded prints
    Unlimited,
}

impl WireDecode for PrintSupply {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        match reader.read_u8()? {
            0 => Ok(Self::Zero),
            1 => Ok(Self::Limited(u64::decode(reader)?)),
            2 => Ok(Self::Unlimited),
            tag => Err(unknown_variant("PrintSupply", tag)),
        }
    }
}

/// Mutable metadata fields.
#[derive(BorshSerialize, Clone, Debug, Eq, PartialEq)]
pub struct Data {
    /// Asset name
    pub name: String,
    /// Asset symbol
    pub symbol: String,
    /// Off-chain JSON URI
    pub uri: String,
    /// Royalty in basis points
    pub seller_fee_basis_points: u16,
    /// Royalty recipients
    pub creators: Option<Vec<Creator>>,
}

impl_wire_decode!(Data {
    name,
    symbol,
    uri,
    seller_fee_basis_points,
    creators
});

/// Full asset description passed to `Create`.
#[derive(BorshSerialize, Clone, Debug, Eq, PartialEq)]
pub struct AssetData {
    /// Asset name
    pub name: String,
    /// Asset symbol
    pub symbol: String,
    /// Off-chain JSON URI
    pub uri: String,
    /// Royalty in basis points
    pub seller_fee_basis_points: u16,
    /// Royalty recipients
    pub creators: Option<Vec<Creator>>,
    /// Whether the primary sale already happened
    pub primary_sale_happened: bool,
    /// Whether the metadata can be updated later
    pub is_mutable: bool,
    /// Asset class
    pub token_standard: TokenStandard,
    /// Collection membership
    pub collection: Option<Collection>,
    /// Usage tracking
    pub uses: Option<Uses>,
    /// Set when the asset is itself a collection
    pub collection_details: Option<CollectionDetails>,
    /// Rule set for programmable assets
    pub rule_set: Option<Pubkey>,
}

impl_wire_decode!(AssetData {
    name,
    symbol,
    uri,
    seller_fee_basis_points,
    creators,
    primary_sale_happened,
    is_mutable,
    token_standard,
    collection,
    uses,
    collection_details,
    rule_set
});

/// Seed list passed to the authorization rules program.
#[derive(BorshSerialize, Clone, Debug, Default, Eq, PartialEq)]
pub struct SeedsVec {
    /// Raw seeds
    pub seeds: Vec<Vec<u8>>,
}

impl_wire_decode!(SeedsVec { seeds });

/// Merkle proof passed to the authorization rules program.
#[derive(BorshSerialize, Clone, Debug, Default, Eq, PartialEq)]
pub struct ProofInfo {
    /// Proof nodes
    pub proof: Vec<[u8; 32]>,
}

impl_wire_decode!(ProofInfo { proof });

/// Typed value stored in an authorization payload.
#[derive(BorshSerialize, Clone, Debug, Eq, PartialEq)]
pub enum PayloadType {
    /// An address
    Pubkey(Pubkey),
    /// PDA seeds
    Seeds(SeedsVec),
    /// Merkle proof
    MerkleProof(ProofInfo),
    /// Integer
    Number(u64),
}

impl WireDecode for PayloadType {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        match reader.read_u8()? {
            0 => Ok(Self::Pubkey(Pubkey::decode(reader)?)),
            1 => Ok(Self::Seeds(SeedsVec::decode(reader)?)),
            2 => Ok(Self::MerkleProof(ProofInfo::decode(reader)?)),
            3 => Ok(Self::Number(u64::decode(reader)?)),
            tag => Err(unknown_variant("PayloadType", tag)),
        }
    }
}

/// Authorization payload keyed by canonical payload key strings.
#[derive(BorshSerialize, Clone, Debug, Default, Eq, PartialEq)]
pub struct Payload {
    /// Entries; serialized in key order
    pub map: BTreeMap<String, PayloadType>,
}

impl_wire_decode!(Payload { map });

impl Payload {
    /// Insert a value under the canonical string of `key`.
    pub fn insert(&mut self, key: PayloadKey, value: PayloadType) -> Option<PayloadType> {
        self.map.insert(key.seed().to_string(), value)
    }

    /// Value stored under the canonical string of `key`.
    pub fn get(&self, key: PayloadKey) -> Option<&PayloadType> {
        self.map.get(key.seed())
    }
}

/// Extra data forwarded to the authorization rules program.
#[derive(BorshSerialize, Clone, Debug, Default, Eq, PartialEq)]
pub struct AuthorizationData {
    /// Payload checked by the rule set
    pub payload: Payload,
}

impl_wire_decode!(AuthorizationData { payload });

/// Three-state update field: leave as is, clear, or set.
#[derive(BorshSerialize, Clone, Debug, Eq, PartialEq)]
pub enum Toggle<T> {
    /// Keep the current value
    None,
    /// Remove the current value
    Clear,
    /// Replace the current value
    Set(T),
}

impl<T: WireDecode> WireDecode for Toggle<T> {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        match reader.read_u8()? {
            0 => Ok(Self::None),
            1 => Ok(Self::Clear),
            2 => Ok(Self::Set(T::decode(reader)?)),
            tag => Err(unknown_variant("Toggle", tag)),
        }
    }
}

/// Collection update.
pub type CollectionToggle = Toggle<Collection>;
/// Collection details update.
pub type CollectionDetailsToggle = Toggle<CollectionDetails>;
/// Uses update.
pub type UsesToggle = Toggle<Uses>;
/// Rule set update.
pub type RuleSetToggle = Toggle<Pubkey>;

pub(crate) fn unknown_variant(type_name: &'static str, tag: u8) -> MetadataError {
    MetadataError::UnknownVariant {
        type_name,
        discriminator: tag.into(),
    }
}
