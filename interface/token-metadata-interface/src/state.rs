//! Account layouts

use {
    crate::{
        codec::{
            decode_prefix, encode, impl_wire_decode, impl_wire_decode_unit_enum, COption,
            WireDecode, WireReader,
        },
        error::{MetadataError, Result},
        seeds::EDITION_MARKER_BIT_SIZE,
        types::{
            unknown_variant, Collection, CollectionDetails, Creator, Key, ProgrammableConfig,
            TokenDelegateRole, TokenStandard, TokenState, Uses,
        },
    },
    borsh::BorshSerialize,
    num_derive::FromPrimitive,
    solana_program::pubkey::Pubkey,
};

/// Maximum name length (bytes)
pub const MAX_NAME_LENGTH: usize = 32;
/// Maximum symbol length (bytes)
pub const MAX_SYMBOL_LENGTH: usize = 10;
/// Maximum URI length (bytes)
pub const MAX_URI_LENGTH: usize = 200;
/// Maximum number of creators
pub const MAX_CREATOR_LIMIT: usize = 5;
/// Upper bound of `seller_fee_basis_points`
pub const MAX_SELLER_FEE_BASIS_POINTS: u16 = 10_000;
/// Largest `EditionMarkerV2` ledger (bytes): an account holds at most 10 MiB,
/// less the key byte and the vector length prefix
pub const MAX_EDITION_MARKER_V2_LEDGER_LEN: usize = 10 * 1024 * 1024 - 5;

/// Program-owned account whose first byte is a [`Key`].
pub trait MetadataAccount: WireDecode + BorshSerialize {
    /// Discriminator this layout requires
    const KEY: Key;

    /// Decode account data, checking the key byte first. Trailing padding is
    /// ignored.
    fn unpack(data: &[u8]) -> Result<Self> {
        let found = *data.first().ok_or(MetadataError::BufferUnderrun {
            needed: 1,
            remaining: 0,
        })?;
        if found != Self::KEY as u8 {
            return Err(MetadataError::UnexpectedAccountKey {
                expected: Self::KEY,
                found,
            });
        }
        decode_prefix(data)
    }

    fn pack(&self) -> Result<Vec<u8>> {
        encode(self)
    }
}

/// Metadata account
#[derive(BorshSerialize, Clone, Debug, Eq, PartialEq)]
pub struct Metadata {
    /// Always `Key::MetadataV1`
    pub key: Key,
    /// Authority allowed to update the metadata
    pub update_authority: Pubkey,
    /// Mint the metadata describes
    pub mint: Pubkey,
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
    /// Whether the metadata can be updated
    pub is_mutable: bool,
    /// Bump of the edition PDA, when one exists
    pub edition_nonce: Option<u8>,
    /// Asset class
    pub token_standard: Option<TokenStandard>,
    /// Collection membership
    pub collection: Option<Collection>,
    /// Usage tracking
    pub uses: Option<Uses>,
    /// Set on collection parents
    pub collection_details: Option<CollectionDetails>,
    /// Rule set config for programmable assets
    pub programmable_config: Option<ProgrammableConfig>,
}

impl Metadata {
    /// The name without the NUL padding older accounts carry.
    pub fn trimmed_name(&self) -> &str {
        self.name.trim_end_matches('\0')
    }

    /// The symbol without NUL padding.
    pub fn trimmed_symbol(&self) -> &str {
        self.symbol.trim_end_matches('\0')
    }

    /// The URI without NUL padding.
    pub fn trimmed_uri(&self) -> &str {
        self.uri.trim_end_matches('\0')
    }
}

// Fields after `is_mutable` were appended over time; accounts written before
// a field existed simply end early.
fn optional_tail<T: WireDecode>(reader: &mut WireReader<'_>) -> Result<Option<T>> {
    if reader.is_empty() {
        return Ok(None);
    }
    Option::<T>::decode(reader)
}

impl WireDecode for Metadata {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        Ok(Self {
            key: Key::decode(reader)?,
            update_authority: Pubkey::decode(reader)?,
            mint: Pubkey::decode(reader)?,
            name: String::decode(reader)?,
            symbol: String::decode(reader)?,
            uri: String::decode(reader)?,
            seller_fee_basis_points: u16::decode(reader)?,
            creators: Option::decode(reader)?,
            primary_sale_happened: bool::decode(reader)?,
            is_mutable: bool::decode(reader)?,
            edition_nonce: optional_tail(reader)?,
            token_standard: optional_tail(reader)?,
            collection: optional_tail(reader)?,
            uses: optional_tail(reader)?,
            collection_details: optional_tail(reader)?,
            programmable_config: optional_tail(reader)?,
        })
    }
}

impl MetadataAccount for Metadata {
    const KEY: Key = Key::MetadataV1;
}

/// Master edition account (V2 layout)
#[derive(BorshSerialize, Clone, Debug, Eq, PartialEq)]
pub struct MasterEdition {
    /// Always `Key::MasterEditionV2`
    pub key: Key,
    /// Prints minted so far
    pub supply: u64,
    /// Print cap; `None` is unlimited
    pub max_supply: Option<u64>,
}

impl_wire_decode!(MasterEdition {
    key,
    supply,
    max_supply
});

impl MetadataAccount for MasterEdition {
    const KEY: Key = Key::MasterEditionV2;
}

/// Print edition account
#[derive(BorshSerialize, Clone, Debug, Eq, PartialEq)]
pub struct Edition {
    /// Always `Key::EditionV1`
    pub key: Key,
    /// Master edition this was printed from
    pub parent: Pubkey,
    /// Edition number
    pub edition: u64,
}

impl_wire_decode!(Edition {
    key,
    parent,
    edition
});

impl MetadataAccount for Edition {
    const KEY: Key = Key::EditionV1;
}

/// Either kind of edition; both live at the edition PDA.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EditionAccount {
    /// Master edition
    Master(MasterEdition),
    /// Print edition
    Print(Edition),
}

impl EditionAccount {
    /// Decode an account at the edition PDA by dispatching on its key byte.
    pub fn unpack(data: &[u8]) -> Result<Self> {
        match data.first().copied() {
            Some(k) if k == Key::MasterEditionV2 as u8 => {
                Ok(Self::Master(MasterEdition::unpack(data)?))
            }
            Some(k) if k == Key::EditionV1 as u8 => Ok(Self::Print(Edition::unpack(data)?)),
            Some(k) => Err(unknown_variant("EditionAccount", k)),
            None => Err(MetadataError::BufferUnderrun {
                needed: 1,
                remaining: 0,
            }),
        }
    }

    /// Whether this is a master edition rather than a print.
    pub fn is_master(&self) -> bool {
        matches!(self, EditionAccount::Master(_))
    }
}

/// Byte index and bit mask of `edition` inside a 248-edition ledger.
pub fn edition_marker_bit(edition: u64) -> (usize, u8) {
    let offset = (edition % EDITION_MARKER_BIT_SIZE) as usize;
    (offset / 8, 1u8 << (7 - offset % 8))
}

/// Edition marker account: one bit per edition in its bucket of 248
#[derive(BorshSerialize, Clone, Debug, Eq, PartialEq)]
pub struct EditionMarker {
    /// Always `Key::EditionMarker`
    pub key: Key,
    /// Minted-edition bitmap
    pub ledger: [u8; 31],
}

impl_wire_decode!(EditionMarker { key, ledger });

impl MetadataAccount for EditionMarker {
    const KEY: Key = Key::EditionMarker;
}

impl EditionMarker {
    /// Whether `edition` has been printed. Only meaningful for editions in this
    /// marker's bucket.
    pub fn edition_taken(&self, edition: u64) -> bool {
        let (index, mask) = edition_marker_bit(edition);
        self.ledger[index] & mask != 0
    }

    /// Set the bit for `edition` within this bucket.
    pub fn insert_edition(&mut self, edition: u64) {
        let (index, mask) = edition_marker_bit(edition);
        self.ledger[index] |= mask;
    }
}

/// Edition marker with a ledger indexed by edition number
#[derive(BorshSerialize, Clone, Debug, Eq, PartialEq)]
pub struct EditionMarkerV2 {
    /// Always `Key::EditionMarkerV2`
    pub key: Key,
    /// Minted-edition bitmap
    pub ledger: Vec<u8>,
}

impl_wire_decode!(EditionMarkerV2 { key, ledger });

impl MetadataAccount for EditionMarkerV2 {
    const KEY: Key = Key::EditionMarkerV2;
}

impl EditionMarkerV2 {
    /// Whether `edition` has been printed. Editions past the ledger's end
    /// are not taken.
    pub fn edition_taken(&self, edition: u64) -> bool {
        let (index, mask) = Self::bit(edition);
        usize::try_from(index)
            .ok()
            .and_then(|index| self.ledger.get(index))
            .is_some_and(|byte| byte & mask != 0)
    }

    /// Set the bit for `edition`, growing the ledger as needed. Editions
    /// whose bit would land past [`MAX_EDITION_MARKER_V2_LEDGER_LEN`] are
    /// rejected with [`MetadataError::EncodingRange`].
    pub fn insert_edition(&mut self, edition: u64) -> Result<()> {
        let (index, mask) = Self::bit(edition);
        let index = usize::try_from(index)
            .ok()
            .filter(|index| *index < MAX_EDITION_MARKER_V2_LEDGER_LEN)
            .ok_or_else(|| MetadataError::EncodingRange {
                value: edition.to_string(),
                type_name: "EditionMarkerV2 ledger",
            })?;
        if self.ledger.len() <= index {
            self.ledger.resize(index + 1, 0);
        }
        self.ledger[index] |= mask;
        Ok(())
    }

    fn bit(edition: u64) -> (u64, u8) {
        (edition / 8, 1u8 << (7 - edition % 8))
    }
}

/// Per-token-account state of a programmable asset
#[derive(BorshSerialize, Clone, Debug, Eq, PartialEq)]
pub struct TokenRecord {
    /// Always `Key::TokenRecord`
    pub key: Key,
    /// PDA bump
    pub bump: u8,
    /// Lock state
    pub state: TokenState,
    /// Rule set revision pinned at delegation
    pub rule_set_revision: Option<u64>,
    /// Current token delegate
    pub delegate: Option<Pubkey>,
    /// Role of the current delegate
    pub delegate_role: Option<TokenDelegateRole>,
    /// Destination a locked transfer delegate may send to
    pub locked_transfer: Option<Pubkey>,
}

impl_wire_decode!(TokenRecord {
    key,
    bump,
    state,
    rule_set_revision,
    delegate,
    delegate_role,
    locked_transfer
});

impl MetadataAccount for TokenRecord {
    const KEY: Key = Key::TokenRecord;
}

/// Metadata delegate record
#[derive(BorshSerialize, Clone, Debug, Eq, PartialEq)]
pub struct MetadataDelegateRecord {
    /// Always `Key::MetadataDelegate`
    pub key: Key,
    /// PDA bump
    pub bump: u8,
    /// Mint the delegation applies to
    pub mint: Pubkey,
    /// Delegate address
    pub delegate: Pubkey,
    /// Update authority that granted the delegation
    pub update_authority: Pubkey,
}

impl_wire_decode!(MetadataDelegateRecord {
    key,
    bump,
    mint,
    delegate,
    update_authority
});

impl MetadataAccount for MetadataDelegateRecord {
    const KEY: Key = Key::MetadataDelegate;
}

/// Holder delegate record
#[derive(BorshSerialize, Clone, Debug, Eq, PartialEq)]
pub struct HolderDelegateRecord {
    /// Always `Key::HolderDelegate`
    pub key: Key,
    /// PDA bump
    pub bump: u8,
    /// Mint the delegation applies to
    pub mint: Pubkey,
    /// Delegate address
    pub delegate: Pubkey,
    /// Update authority at the time of delegation
    pub update_authority: Pubkey,
}

impl_wire_decode!(HolderDelegateRecord {
    key,
    bump,
    mint,
    delegate,
    update_authority
});

impl MetadataAccount for HolderDelegateRecord {
    const KEY: Key = Key::HolderDelegate;
}

/// Collection authority record
#[derive(BorshSerialize, Clone, Debug, Eq, PartialEq)]
pub struct CollectionAuthorityRecord {
    /// Always `Key::CollectionAuthorityRecord`
    pub key: Key,
    /// PDA bump
    pub bump: u8,
    /// Update authority that approved the record
    pub update_authority: Option<Pubkey>,
}

impl_wire_decode!(CollectionAuthorityRecord {
    key,
    bump,
    update_authority
});

impl MetadataAccount for CollectionAuthorityRecord {
    const KEY: Key = Key::CollectionAuthorityRecord;
}

/// Use authority record
#[derive(BorshSerialize, Clone, Debug, Eq, PartialEq)]
pub struct UseAuthorityRecord {
    /// Always `Key::UseAuthorityRecord`
    pub key: Key,
    /// Uses the authority may consume
    pub allowed_uses: u64,
    /// PDA bump
    pub bump: u8,
}

impl_wire_decode!(UseAuthorityRecord {
    key,
    allowed_uses,
    bump
});

impl MetadataAccount for UseAuthorityRecord {
    const KEY: Key = Key::UseAuthorityRecord;
}

/// SPL Token mint account
#[derive(BorshSerialize, Clone, Debug, Default, Eq, PartialEq)]
pub struct Mint {
    /// Authority allowed to mint
    pub mint_authority: COption<Pubkey>,
    /// Total supply
    pub supply: u64,
    /// Decimal places
    pub decimals: u8,
    /// Whether the mint was initialized
    pub is_initialized: bool,
    /// Authority allowed to freeze token accounts
    pub freeze_authority: COption<Pubkey>,
}

impl_wire_decode!(Mint {
    mint_authority,
    supply,
    decimals,
    is_initialized,
    freeze_authority
});

impl Mint {
    /// Size of the SPL mint layout
    pub const LEN: usize = 82;

    /// Decode the first [`Self::LEN`] bytes of a mint account.
    pub fn unpack(data: &[u8]) -> Result<Self> {
        if data.len() < Self::LEN {
            return Err(MetadataError::BufferUnderrun {
                needed: Self::LEN,
                remaining: data.len(),
            });
        }
        decode_prefix(&data[..Self::LEN])
    }
}

/// SPL Token account state
#[derive(BorshSerialize, Clone, Copy, Debug, Default, Eq, FromPrimitive, PartialEq)]
pub enum AccountState {
    /// Not yet initialized
    #[default]
    Uninitialized,
    /// Usable
    Initialized,
    /// Frozen by the mint's freeze authority
    Frozen,
}

impl_wire_decode_unit_enum!(AccountState);

/// SPL Token account
#[derive(BorshSerialize, Clone, Debug, Default, Eq, PartialEq)]
pub struct TokenAccount {
    /// Mint of the held tokens
    pub mint: Pubkey,
    /// Owner allowed to move the tokens
    pub owner: Pubkey,
    /// Token balance
    pub amount: u64,
    /// SPL delegate, if approved
    pub delegate: COption<Pubkey>,
    /// Account state
    pub state: AccountState,
    /// Rent-exempt reserve when the account wraps native SOL
    pub is_native: COption<u64>,
    /// Amount the delegate may still move
    pub delegated_amount: u64,
    /// Authority allowed to close the account
    pub close_authority: COption<Pubkey>,
}

impl_wire_decode!(TokenAccount {
    mint,
    owner,
    amount,
    delegate,
    state,
    is_native,
    delegated_amount,
    close_authority
});

impl TokenAccount {
    /// Size of the SPL token account layout
    pub const LEN: usize = 165;

    /// Decode the first [`Self::LEN`] bytes of a token account.
    pub fn unpack(data: &[u8]) -> Result<Self> {
        if data.len() < Self::LEN {
            return Err(MetadataError::BufferUnderrun {
                needed: Self::LEN,
                remaining: data.len(),
            });
        }
        decode_prefix(&data[..Self::LEN])
    }

    /// Whether the account is frozen.
    pub fn is_frozen(&self) -> bool {
        self.state == AccountState::Frozen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> Metadata {
        Metadata {
            key: Key::MetadataV1,
            update_authority: Pubkey::new_from_array([1; 32]),
            mint: Pubkey::new_from_array([2; 32]),
            name: "Name\0\0\0".to_string(),
            symbol: "SYM".to_string(),
            uri: "https://example.com/m.json".to_string(),
            seller_fee_basis_points: 500,
            creators: None,
            primary_sale_happened: false,
            is_mutable: true,
            edition_nonce: Some(254),
            token_standard: Some(TokenStandard::NonFungible),
            collection: None,
            uses: None,
            collection_details: None,
            programmable_config: Some(ProgrammableConfig::V1 { rule_set: None }),
        }
    }

    #[test]
    fn metadata_roundtrip_with_padding() {
        let md = metadata();
        let mut data = md.pack().unwrap();
        data.resize(679, 0);
        let decoded = Metadata::unpack(&data).unwrap();
        assert_eq!(decoded, md);
        assert_eq!(decoded.trimmed_name(), "Name");
    }

    #[test]
    fn metadata_tolerates_truncated_tail() {
        let mut md = metadata();
        md.edition_nonce = None;
        md.token_standard = None;
        md.programmable_config = None;
        let mut data = md.pack().unwrap();
        // drop the six trailing option tags
        data.truncate(data.len() - 6);
        assert_eq!(Metadata::unpack(&data).unwrap(), md);
    }

    #[test]
    fn wrong_key_is_rejected() {
        let mut data = metadata().pack().unwrap();
        data[0] = Key::MasterEditionV2 as u8;
        assert_eq!(
            Metadata::unpack(&data),
            Err(MetadataError::UnexpectedAccountKey {
                expected: Key::MetadataV1,
                found: 6
            })
        );
        assert!(matches!(
            Metadata::unpack(&[]),
            Err(MetadataError::BufferUnderrun { .. })
        ));
    }

    #[test]
    fn edition_account_dispatch() {
        let master = MasterEdition {
            key: Key::MasterEditionV2,
            supply: 3,
            max_supply: Some(10),
        };
        let print = Edition {
            key: Key::EditionV1,
            parent: Pubkey::new_from_array([3; 32]),
            edition: 2,
        };
        let decoded = EditionAccount::unpack(&master.pack().unwrap()).unwrap();
        assert_eq!(decoded, EditionAccount::Master(master));
        assert!(decoded.is_master());
        assert_eq!(
            EditionAccount::unpack(&print.pack().unwrap()).unwrap(),
            EditionAccount::Print(print)
        );
        assert_eq!(
            EditionAccount::unpack(&[Key::MetadataV1 as u8]),
            Err(MetadataError::UnknownVariant {
                type_name: "EditionAccount",
                discriminator: 4
            })
        );
    }

    #[test]
    fn edition_marker_bits() {
        assert_eq!(edition_marker_bit(0), (0, 0b1000_0000));
        assert_eq!(edition_marker_bit(9), (1, 0b0100_0000));
        assert_eq!(edition_marker_bit(248), (0, 0b1000_0000));
        assert_eq!(edition_marker_bit(247), (30, 0b0000_0001));

        let mut marker = EditionMarker {
            key: Key::EditionMarker,
            ledger: [0; 31],
        };
        marker.insert_edition(500);
        assert!(marker.edition_taken(500));
        assert!(!marker.edition_taken(501));
        let decoded = EditionMarker::unpack(&marker.pack().unwrap()).unwrap();
        assert_eq!(decoded, marker);
    }

    #[test]
    fn edition_marker_v2_grows() {
        let mut marker = EditionMarkerV2 {
            key: Key::EditionMarkerV2,
            ledger: vec![],
        };
        assert!(!marker.edition_taken(1000));
        marker.insert_edition(1000).unwrap();
        assert_eq!(marker.ledger.len(), 126);
        assert!(marker.edition_taken(1000));
        assert!(!marker.edition_taken(999));
    }

    #[test]
    fn edition_marker_v2_rejects_editions_past_account_size() {
        let mut marker = EditionMarkerV2 {
            key: Key::EditionMarkerV2,
            ledger: vec![],
        };
        let err = marker.insert_edition(u64::MAX).unwrap_err();
        assert_eq!(
            err,
            MetadataError::EncodingRange {
                value: u64::MAX.to_string(),
                type_name: "EditionMarkerV2 ledger",
            }
        );
        let first_out_of_range = MAX_EDITION_MARKER_V2_LEDGER_LEN as u64 * 8;
        assert!(marker.insert_edition(first_out_of_range).is_err());
        assert!(marker.ledger.is_empty());

        marker.insert_edition(first_out_of_range - 1).unwrap();
        assert_eq!(marker.ledger.len(), MAX_EDITION_MARKER_V2_LEDGER_LEN);
        assert!(marker.edition_taken(first_out_of_range - 1));
        assert!(!marker.edition_taken(u64::MAX));
    }

    #[test]
    fn token_record_layout() {
        let record = TokenRecord {
            key: Key::TokenRecord,
            bump: 253,
            state: TokenState::Locked,
            rule_set_revision: None,
            delegate: Some(Pubkey::new_from_array([9; 32])),
            delegate_role: Some(TokenDelegateRole::Utility),
            locked_transfer: None,
        };
        let data = record.pack().unwrap();
        assert_eq!(&data[..4], &[11, 253, 1, 0]);
        assert_eq!(TokenRecord::unpack(&data).unwrap(), record);

        let mut bad = data.clone();
        bad[2] = 7;
        assert_eq!(
            TokenRecord::unpack(&bad),
            Err(MetadataError::UnknownVariant {
                type_name: "TokenState",
                discriminator: 7
            })
        );
    }

    #[test]
    fn mint_layout() {
        let mint = Mint {
            mint_authority: COption(Some(Pubkey::new_from_array([5; 32]))),
            supply: 1,
            decimals: 0,
            is_initialized: true,
            freeze_authority: COption(None),
        };
        let data = encode(&mint).unwrap();
        assert_eq!(data.len(), Mint::LEN);
        assert_eq!(Mint::unpack(&data).unwrap(), mint);
        assert!(matches!(
            Mint::unpack(&data[..40]),
            Err(MetadataError::BufferUnderrun { needed: 82, .. })
        ));
    }

    #[test]
    fn token_account_layout() {
        let account = TokenAccount {
            mint: Pubkey::new_from_array([1; 32]),
            owner: Pubkey::new_from_array([2; 32]),
            amount: 1,
            delegate: COption(Some(Pubkey::new_from_array([3; 32]))),
            state: AccountState::Frozen,
            is_native: COption(None),
            delegated_amount: 1,
            close_authority: COption(None),
        };
        let mut data = encode(&account).unwrap();
        assert_eq!(data.len(), TokenAccount::LEN);
        let decoded = TokenAccount::unpack(&data).unwrap();
        assert!(decoded.is_frozen());
        assert_eq!(decoded, account);

        data[108] = 3;
        assert!(matches!(
            TokenAccount::unpack(&data),
            Err(MetadataError::UnknownVariant {
                type_name: "AccountState",
                ..
            })
        ));
    }
}
