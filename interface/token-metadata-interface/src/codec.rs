//! Wire codec
//!
//! Layouts are Borsh-compatible: little-endian integers, one-byte bools,
//! raw 32-byte public keys, `Option` as a one-byte tag, and `Vec`/`String`
//! as a `u32` length prefix. Encoding goes through `borsh`; decoding goes
//! through [`WireDecode`] so that every failure maps onto [`MetadataError`].

use {
    crate::error::{FormatError, MetadataError, Result},
    borsh::BorshSerialize,
    solana_program::pubkey::Pubkey,
    std::collections::BTreeMap,
};

/// Cursor over a byte buffer.
#[derive(Debug)]
pub struct WireReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> WireReader<'a> {
    /// Start reading at the front of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Whether every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Borrow the next `len` bytes and advance past them.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(MetadataError::BufferUnderrun {
                needed: len,
                remaining,
            });
        }
        let bytes = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(bytes)
    }

    /// Read the next `N` bytes as an array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Read one byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Fail if any input is left unread.
    pub fn finish(&self) -> Result<()> {
        match self.remaining() {
            0 => Ok(()),
            remaining => Err(MetadataError::TrailingBytes { remaining }),
        }
    }
}

/// Types that can be read back from their wire layout.
pub trait WireDecode: Sized {
    /// Read one value, advancing `reader` past its bytes.
    fn decode(reader: &mut WireReader<'_>) -> Result<Self>;
}

/// Encode a value with its Borsh layout.
pub fn encode<T: BorshSerialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    borsh::to_vec(value).map_err(|e| MetadataError::EncodingRange {
        value: e.to_string(),
        type_name: "u32 length prefix",
    })
}

/// Decode a value that must span the whole buffer (instruction data).
pub fn decode_exact<T: WireDecode>(data: &[u8]) -> Result<T> {
    let mut reader = WireReader::new(data);
    let value = T::decode(&mut reader)?;
    reader.finish()?;
    Ok(value)
}

/// Decode a value from the front of the buffer, ignoring trailing padding
/// (account data is usually allocated larger than its contents).
pub fn decode_prefix<T: WireDecode>(data: &[u8]) -> Result<T> {
    T::decode(&mut WireReader::new(data))
}

/// Fixed 8-byte little-endian encoding used for integer PDA seeds.
pub fn encode_u64_le(value: u64) -> [u8; 8] {
    value.to_le_bytes()
}

macro_rules! impl_decode_le {
    ($($ty:ty),*) => {
        $(
            impl WireDecode for $ty {
                fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
                    Ok(<$ty>::from_le_bytes(reader.read_array()?))
                }
            }
        )*
    };
}

impl_decode_le!(u8, u16, u32, u64, u128, i64);

impl WireDecode for bool {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        match reader.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(FormatError::InvalidBool(other).into()),
        }
    }
}

impl WireDecode for Pubkey {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        Ok(Pubkey::new_from_array(reader.read_array()?))
    }
}

impl<const N: usize> WireDecode for [u8; N] {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        reader.read_array()
    }
}

impl WireDecode for String {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        let len = u32::decode(reader)? as usize;
        let start = reader.offset();
        let bytes = reader.read_bytes(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| {
                FormatError::InvalidUtf8 {
                    offset: start + e.valid_up_to(),
                }
                .into()
            })
    }
}

impl<T: WireDecode> WireDecode for Vec<T> {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        let len = u32::decode(reader)? as usize;
        // a hostile length prefix must not drive the allocation
        let mut items = Vec::with_capacity(len.min(reader.remaining()));
        for _ in 0..len {
            items.push(T::decode(reader)?);
        }
        Ok(items)
    }
}

impl<T: WireDecode> WireDecode for Option<T> {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        match reader.read_u8()? {
            0 => Ok(None),
            1 => Ok(Some(T::decode(reader)?)),
            tag => Err(FormatError::InvalidOptionTag(tag.into()).into()),
        }
    }
}

impl<K: WireDecode + Ord, V: WireDecode> WireDecode for BTreeMap<K, V> {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        let len = u32::decode(reader)?;
        let mut map = BTreeMap::new();
        for entry in 0..len {
            let key = K::decode(reader)?;
            let value = V::decode(reader)?;
            if map.insert(key, value).is_some() {
                return Err(FormatError::DuplicateMapKey { entry }.into());
            }
        }
        Ok(map)
    }
}

/// SPL-style optional value: a `u32` presence tag followed by a payload that
/// is always present on the wire (zeroed when absent).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct COption<T>(pub Option<T>);

impl<T> COption<T> {
    /// Unwrap into a plain `Option`.
    pub fn into_option(self) -> Option<T> {
        self.0
    }
}

impl<T> From<Option<T>> for COption<T> {
    fn from(value: Option<T>) -> Self {
        Self(value)
    }
}

impl<T: WireDecode> WireDecode for COption<T> {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self> {
        let present = match u32::decode(reader)? {
            0 => false,
            1 => true,
            other => return Err(FormatError::InvalidOptionTag(other).into()),
        };
        // the payload occupies its slot whether or not it is present
        let payload = T::decode(reader)?;
        Ok(Self(present.then_some(payload)))
    }
}

impl<T: BorshSerialize + Default> BorshSerialize for COption<T> {
    fn serialize<W: borsh::io::Write>(&self, writer: &mut W) -> borsh::io::Result<()> {
        match &self.0 {
            Some(value) => {
                1u32.serialize(writer)?;
                value.serialize(writer)
            }
            None => {
                0u32.serialize(writer)?;
                T::default().serialize(writer)
            }
        }
    }
}

/// Implement [`WireDecode`] for a struct by decoding its fields in
/// declaration order.
macro_rules! impl_wire_decode {
    ($ty:ident { $($field:ident),* $(,)? }) => {
        impl $crate::codec::WireDecode for $ty {
            fn decode(
                reader: &mut $crate::codec::WireReader<'_>,
            ) -> $crate::error::Result<Self> {
                Ok(Self {
                    $($field: $crate::codec::WireDecode::decode(reader)?,)*
                })
            }
        }
    };
}

/// Implement [`WireDecode`] for a fieldless enum through its
/// `FromPrimitive` discriminant.
macro_rules! impl_wire_decode_unit_enum {
    ($($ty:ident),* $(,)?) => {
        $(
            impl $crate::codec::WireDecode for $ty {
                fn decode(
                    reader: &mut $crate::codec::WireReader<'_>,
                ) -> $crate::error::Result<Self> {
                    let tag = reader.read_u8()?;
                    <$ty as num_traits::FromPrimitive>::from_u8(tag).ok_or(
                        $crate::error::MetadataError::UnknownVariant {
                            type_name: stringify!($ty),
                            discriminator: tag.into(),
                        },
                    )
                }
            }
        )*
    };
}

pub(crate) use {impl_wire_decode, impl_wire_decode_unit_enum};

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(BorshSerialize, Debug, PartialEq)]
    struct Sample {
        flag: bool,
        count: u16,
        owner: Pubkey,
        label: String,
        extra: Option<u64>,
    }

    impl_wire_decode!(Sample {
        flag,
        count,
        owner,
        label,
        extra
    });

    #[test]
    fn struct_layout_is_sum_of_fields() {
        let sample = Sample {
            flag: true,
            count: 0x0102,
            owner: Pubkey::new_from_array([9; 32]),
            label: "ab".to_string(),
            extra: None,
        };
        let bytes = encode(&sample).unwrap();
        assert_eq!(bytes.len(), 1 + 2 + 32 + (4 + 2) + 1);
        assert_eq!(&bytes[..3], &[1, 0x02, 0x01]);
        assert_eq!(decode_exact::<Sample>(&bytes).unwrap(), sample);
    }

    #[test]
    fn optional_payload_consumes_its_bytes() {
        let bytes = encode(&(Some(7u64), 5u8)).unwrap();
        assert_eq!(bytes, vec![1, 7, 0, 0, 0, 0, 0, 0, 0, 5]);

        let mut reader = WireReader::new(&bytes);
        assert_eq!(Option::<u64>::decode(&mut reader).unwrap(), Some(7));
        assert_eq!(u8::decode(&mut reader).unwrap(), 5);
        reader.finish().unwrap();

        let absent = encode(&(None::<u64>, 5u8)).unwrap();
        assert_eq!(absent, vec![0, 5]);
    }

    #[test]
    fn bool_is_strict() {
        assert!(!decode_exact::<bool>(&[0]).unwrap());
        assert!(decode_exact::<bool>(&[1]).unwrap());
        assert_eq!(
            decode_exact::<bool>(&[2]),
            Err(MetadataError::EncodingFormat(FormatError::InvalidBool(2)))
        );
    }

    #[test]
    fn option_tag_is_strict() {
        assert_eq!(
            decode_exact::<Option<u8>>(&[3, 0]),
            Err(MetadataError::EncodingFormat(FormatError::InvalidOptionTag(3)))
        );
    }

    #[test]
    fn pubkey_underrun() {
        assert_eq!(
            decode_exact::<Pubkey>(&[0u8; 31]),
            Err(MetadataError::BufferUnderrun {
                needed: 32,
                remaining: 31
            })
        );
    }

    #[test]
    fn any_32_bytes_is_a_pubkey() {
        let key = decode_exact::<Pubkey>(&[0xff; 32]).unwrap();
        assert_eq!(key.to_bytes(), [0xff; 32]);
    }

    #[test]
    fn string_rejects_bad_utf8() {
        assert_eq!(
            decode_exact::<String>(&[2, 0, 0, 0, 0xc3, 0x28]),
            Err(MetadataError::EncodingFormat(FormatError::InvalidUtf8 {
                offset: 4
            }))
        );

        // offset is relative to the whole buffer, not the string
        let bytes = [7, 3, 0, 0, 0, b'o', b'k', 0xff];
        let mut reader = WireReader::new(&bytes);
        assert_eq!(u8::decode(&mut reader).unwrap(), 7);
        assert_eq!(
            String::decode(&mut reader),
            Err(MetadataError::EncodingFormat(FormatError::InvalidUtf8 {
                offset: 7
            }))
        );
    }

    #[test]
    fn huge_length_prefix_underruns_instead_of_allocating() {
        let err = decode_exact::<Vec<u64>>(&[0xff, 0xff, 0xff, 0xff, 1]).unwrap_err();
        assert!(matches!(err, MetadataError::BufferUnderrun { .. }));
    }

    #[test]
    fn exact_rejects_trailing_bytes_prefix_does_not() {
        assert_eq!(
            decode_exact::<u8>(&[1, 0, 0]),
            Err(MetadataError::TrailingBytes { remaining: 2 })
        );
        assert_eq!(decode_prefix::<u8>(&[1, 0, 0]).unwrap(), 1);
    }

    #[test]
    fn coption_keeps_fixed_width() {
        let some = COption(Some(Pubkey::new_from_array([4; 32])));
        let none = COption::<Pubkey>(None);
        let some_bytes = encode(&some).unwrap();
        let none_bytes = encode(&none).unwrap();
        assert_eq!(some_bytes.len(), 36);
        assert_eq!(none_bytes.len(), 36);
        assert_eq!(&none_bytes[..4], &[0, 0, 0, 0]);
        assert_eq!(decode_exact::<COption<Pubkey>>(&some_bytes).unwrap(), some);
        assert_eq!(decode_exact::<COption<Pubkey>>(&none_bytes).unwrap(), none);
    }

    #[test]
    fn coption_tag_is_checked_before_payload() {
        // a bad tag wins over a truncated payload
        assert_eq!(
            decode_exact::<COption<Pubkey>>(&[2, 0, 0, 0, 1]),
            Err(MetadataError::EncodingFormat(FormatError::InvalidOptionTag(2)))
        );

        let mut bytes = vec![0, 0, 0, 0];
        bytes.extend_from_slice(&9u64.to_le_bytes());
        bytes.push(0xaa);
        let mut reader = WireReader::new(&bytes);
        assert_eq!(COption::<u64>::decode(&mut reader).unwrap(), COption(None));
        assert_eq!(u8::decode(&mut reader).unwrap(), 0xaa);
        reader.finish().unwrap();
    }

    #[test]
    fn map_decodes_in_key_order() {
        let mut map = BTreeMap::new();
        map.insert("b".to_string(), 2u8);
        map.insert("a".to_string(), 1u8);
        let bytes = encode(&map).unwrap();
        assert_eq!(&bytes[..4], &[2, 0, 0, 0]);
        assert_eq!(&bytes[4..10], &[1, 0, 0, 0, b'a', 1]);
        assert_eq!(decode_exact::<BTreeMap<String, u8>>(&bytes).unwrap(), map);
    }

    #[test]
    fn map_rejects_repeated_keys() {
        let bytes = [3, 0, 0, 0, 1, 10, 2, 20, 1, 30];
        assert_eq!(
            decode_exact::<BTreeMap<u8, u8>>(&bytes),
            Err(MetadataError::EncodingFormat(FormatError::DuplicateMapKey {
                entry: 2
            }))
        );
    }
}
