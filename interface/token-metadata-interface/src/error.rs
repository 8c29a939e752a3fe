//! Error types

use {crate::types::Key, solana_program::pubkey::Pubkey, thiserror::Error};

/// Errors raised while encoding seeds, deriving addresses, or (de)serializing
/// Token Metadata layouts.
///
/// Every variant carries the offending value so failures can be diagnosed
/// without re-running the call.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum MetadataError {
    /// A role or key argument did not map to a known variant
    #[error("invalid {family} argument: {value:?}")]
    InvalidRoleArgument {
        /// Role family being resolved, e.g. "metadata delegate role"
        family: &'static str,
        /// The rejected input
        value: String,
    },
    /// The address derivation primitive found no valid bump
    #[error("could not derive a program address for {program_id} from {seed_count} seeds")]
    AddressDerivation {
        /// Program the address was derived for
        program_id: Pubkey,
        /// Number of seeds supplied
        seed_count: usize,
    },
    /// A value does not fit the wire width of its field
    #[error("value {value} is out of range for {type_name}")]
    EncodingRange {
        /// The rejected value, rendered in decimal
        value: String,
        /// Target wire type
        type_name: &'static str,
    },
    /// Bytes that violate the wire format of a field
    #[error(transparent)]
    EncodingFormat(#[from] FormatError),
    /// Decoding needed more bytes than the buffer holds
    #[error("buffer underrun: needed {needed} bytes, {remaining} remaining")]
    BufferUnderrun {
        /// Bytes requested by the field being decoded
        needed: usize,
        /// Bytes left in the buffer
        remaining: usize,
    },
    /// A tagged union discriminator outside the declared variant set
    #[error("unknown {type_name} variant: {discriminator}")]
    UnknownVariant {
        /// Union being decoded
        type_name: &'static str,
        /// The unrecognized discriminator
        discriminator: u32,
    },
    /// Bytes left over after decoding a complete value
    #[error("{remaining} trailing bytes after decoding")]
    TrailingBytes {
        /// Unread bytes
        remaining: usize,
    },
    /// Account data starts with the wrong `Key` discriminator
    #[error("expected {expected:?} account, found key byte {found}")]
    UnexpectedAccountKey {
        /// Key the layout requires
        expected: Key,
        /// Key byte found in the data
        found: u8,
    },
}

/// Wire-format violations.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum FormatError {
    /// Bool byte other than 0x00 or 0x01
    #[error("invalid bool byte {0:#04x}")]
    InvalidBool(u8),
    /// Option presence tag other than 0 or 1
    #[error("invalid option tag {0}")]
    InvalidOptionTag(u32),
    /// String bytes are not valid UTF-8
    #[error("invalid utf-8 at byte {offset}")]
    InvalidUtf8 {
        /// Buffer offset of the first invalid byte
        offset: usize,
    },
    /// A map key that repeats an earlier entry
    #[error("duplicate map key at entry {entry}")]
    DuplicateMapKey {
        /// Zero-based position of the repeated entry
        entry: u32,
    },
}

/// Convenience alias used across the interface crate.
pub type Result<T> = std::result::Result<T, MetadataError>;
