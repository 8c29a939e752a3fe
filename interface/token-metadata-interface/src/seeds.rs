//! Seed encoders
//!
//! Every role family maps each variant to one fixed lowercase string. The
//! string is used verbatim as a PDA seed (delegate roles) or as a payload map
//! key (`PayloadKey`). Tables are per family; two families that share variant
//! names do not share strings.

use {
    crate::error::{MetadataError, Result},
    borsh::BorshSerialize,
    num_derive::FromPrimitive,
    std::{fmt, str::FromStr},
};

/// PDA prefix shared by every Token Metadata account
pub const PREFIX: &str = "metadata";
/// Seed for master edition, edition and edition marker PDAs
pub const EDITION: &str = "edition";
/// Seed for the V2 edition marker PDA
pub const MARKER: &str = "marker";
/// Seed for token record PDAs
pub const TOKEN_RECORD: &str = "token_record";
/// Seed for collection authority record PDAs
pub const COLLECTION_AUTHORITY: &str = "collection_authority";
/// Seed for use authority record PDAs
pub const USER: &str = "user";
/// Seed for the burner PDA
pub const BURN: &str = "burn";

/// Editions tracked by one edition marker account.
pub const EDITION_MARKER_BIT_SIZE: u64 = 248;

/// A closed set of variants with one canonical string each.
pub trait SeedEnum: Copy + fmt::Debug + Sized + 'static {
    /// Family name used in error messages.
    const FAMILY: &'static str;

    /// Every variant, in discriminant order.
    const ALL: &'static [Self];

    /// Canonical seed string.
    fn seed(self) -> &'static str;

    /// Variant name as written in the IDL.
    fn name(self) -> &'static str;

    /// Inverse of [`SeedEnum::seed`].
    fn from_seed(seed: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|variant| variant.seed() == seed)
            .ok_or_else(|| invalid_argument(Self::FAMILY, seed))
    }

    /// Look a variant up by its IDL name.
    fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|variant| variant.name() == name)
            .ok_or_else(|| invalid_argument(Self::FAMILY, name))
    }
}

fn invalid_argument(family: &'static str, value: impl ToString) -> MetadataError {
    MetadataError::InvalidRoleArgument {
        family,
        value: value.to_string(),
    }
}

macro_rules! seed_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident ($family:literal) {
            $($(#[$vmeta:meta])* $variant:ident => $seed:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(BorshSerialize, Clone, Copy, Debug, Eq, FromPrimitive, Hash, PartialEq)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl SeedEnum for $name {
            const FAMILY: &'static str = $family;
            const ALL: &'static [Self] = &[$($name::$variant,)+];

            fn seed(self) -> &'static str {
                match self {
                    $($name::$variant => $seed,)+
                }
            }

            fn name(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant),)+
                }
            }
        }

        impl FromStr for $name {
            type Err = MetadataError;

            fn from_str(name: &str) -> Result<Self> {
                <Self as SeedEnum>::from_name(name)
            }
        }

        impl TryFrom<u8> for $name {
            type Error = MetadataError;

            fn try_from(value: u8) -> Result<Self> {
                <Self as num_traits::FromPrimitive>::from_u8(value)
                    .ok_or_else(|| invalid_argument($family, value))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.seed())
            }
        }

        impl From<$name> for RoleSeed<$name> {
            fn from(role: $name) -> Self {
                RoleSeed::Role(role)
            }
        }
    };
}

seed_enum! {
    /// Delegate roles granted by the update authority over metadata.
    pub enum MetadataDelegateRole("metadata delegate role") {
        /// Update a subset of authority-level fields
        AuthorityItem => "authority_item_delegate",
        /// Verify and unverify collection items
        Collection => "collection_delegate",
        /// Consume uses
        Use => "use_delegate",
        /// Update the data struct
        Data => "data_delegate",
        /// Update the programmable config
        ProgrammableConfig => "programmable_config_delegate",
        /// Update individual data fields
        DataItem => "data_item_delegate",
        /// Update the collection field of one item
        CollectionItem => "collection_item_delegate",
        /// Update the programmable config of one item
        ProgrammableConfigItem => "prog_config_item_delegate",
    }
}

seed_enum! {
    /// Metadata delegate roles of the earlier delegate scheme.
    ///
    /// Records created under this scheme live at addresses derived from these
    /// strings; keep it separate from [`MetadataDelegateRole`].
    pub enum LegacyMetadataDelegateRole("legacy metadata delegate role") {
        /// Full authority delegate
        Authority => "authority_delegate",
        /// Collection delegate
        Collection => "collection_delegate",
        /// Use delegate
        Use => "use_delegate",
        /// Update delegate
        Update => "update_delegate",
        /// Programmable config delegate
        ProgrammableConfig => "programmable_config_delegate",
    }
}

seed_enum! {
    /// Delegate roles granted by the token holder.
    pub enum HolderDelegateRole("holder delegate role") {
        /// Print editions from a master edition
        PrintDelegate => "print_delegate",
    }
}

seed_enum! {
    /// Keys of the authorization payload map.
    pub enum PayloadKey("payload key") {
        /// Amount being transferred
        Amount => "amount",
        /// Authority address
        Authority => "authority",
        /// Seeds of an authority PDA
        AuthoritySeeds => "authority_seeds",
        /// Delegate address
        Delegate => "delegate",
        /// Seeds of a delegate PDA
        DelegateSeeds => "delegate_seeds",
        /// Destination address
        Destination => "destination",
        /// Seeds of a destination PDA
        DestinationSeeds => "destination_seeds",
        /// Holder address
        Holder => "holder",
        /// Source address
        Source => "source",
        /// Seeds of a source PDA
        SourceSeeds => "source_seeds",
    }
}

/// Marker for role families whose records are keyed by the update authority.
pub trait MetadataDelegateFamily: SeedEnum {}

impl MetadataDelegateFamily for MetadataDelegateRole {}
impl MetadataDelegateFamily for LegacyMetadataDelegateRole {}

/// A role argument: either a structured role or an already-resolved seed
/// string.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RoleSeed<R> {
    /// Resolve through the family's table
    Role(R),
    /// Use as is
    Literal(String),
}

impl<R: SeedEnum> RoleSeed<R> {
    /// The seed string. Literals are returned unchanged.
    pub fn resolve(&self) -> &str {
        match self {
            RoleSeed::Role(role) => role.seed(),
            RoleSeed::Literal(seed) => seed,
        }
    }

    /// UTF-8 bytes of the seed string.
    pub fn to_seed_bytes(&self) -> Vec<u8> {
        self.resolve().as_bytes().to_vec()
    }

    /// Turn a literal into a structured role, if it names one.
    pub fn to_role(&self) -> Result<R> {
        match self {
            RoleSeed::Role(role) => Ok(*role),
            RoleSeed::Literal(seed) => R::from_seed(seed),
        }
    }
}

impl<R> From<&str> for RoleSeed<R> {
    fn from(seed: &str) -> Self {
        RoleSeed::Literal(seed.to_string())
    }
}

impl<R> From<String> for RoleSeed<R> {
    fn from(seed: String) -> Self {
        RoleSeed::Literal(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_table<R: SeedEnum>(expected: &[&str]) {
        let seeds: Vec<&str> = R::ALL.iter().map(|role| role.seed()).collect();
        assert_eq!(seeds, expected);
        for role in R::ALL {
            assert_eq!(R::from_seed(role.seed()).unwrap().seed(), role.seed());
            assert_eq!(R::from_name(role.name()).unwrap().name(), role.name());
        }
    }

    #[test]
    fn metadata_delegate_table() {
        assert_table::<MetadataDelegateRole>(&[
            "authority_item_delegate",
            "collection_delegate",
            "use_delegate",
            "data_delegate",
            "programmable_config_delegate",
            "data_item_delegate",
            "collection_item_delegate",
            "prog_config_item_delegate",
        ]);
    }

    #[test]
    fn legacy_metadata_delegate_table() {
        assert_table::<LegacyMetadataDelegateRole>(&[
            "authority_delegate",
            "collection_delegate",
            "use_delegate",
            "update_delegate",
            "programmable_config_delegate",
        ]);
    }

    #[test]
    fn holder_and_payload_tables() {
        assert_table::<HolderDelegateRole>(&["print_delegate"]);
        assert_table::<PayloadKey>(&[
            "amount",
            "authority",
            "authority_seeds",
            "delegate",
            "delegate_seeds",
            "destination",
            "destination_seeds",
            "holder",
            "source",
            "source_seeds",
        ]);
    }

    #[test]
    fn tables_are_not_interchangeable() {
        let err = MetadataDelegateRole::from_seed("update_delegate").unwrap_err();
        assert_eq!(
            err,
            MetadataError::InvalidRoleArgument {
                family: "metadata delegate role",
                value: "update_delegate".to_string(),
            }
        );
        assert!(LegacyMetadataDelegateRole::from_seed("data_item_delegate").is_err());
    }

    #[test]
    fn role_resolves_through_table() {
        let role: MetadataDelegateRole = "CollectionItem".parse().unwrap();
        let seed = RoleSeed::from(role);
        assert_eq!(seed.resolve(), "collection_item_delegate");
        assert_eq!(seed.to_seed_bytes(), b"collection_item_delegate".to_vec());
    }

    #[test]
    fn literal_is_returned_unchanged() {
        let seed: RoleSeed<MetadataDelegateRole> = "collection_item_delegate".into();
        assert_eq!(seed.resolve(), "collection_item_delegate");
        assert_eq!(
            seed.to_role().unwrap(),
            MetadataDelegateRole::CollectionItem
        );

        let custom: RoleSeed<MetadataDelegateRole> = "not_a_role".into();
        assert_eq!(custom.resolve(), "not_a_role");
        assert!(custom.to_role().is_err());
    }

    #[test]
    fn unknown_inputs_name_the_value() {
        let err = "Owner".parse::<MetadataDelegateRole>().unwrap_err();
        assert!(err.to_string().contains("Owner"));

        let err = MetadataDelegateRole::try_from(8u8).unwrap_err();
        assert_eq!(
            err,
            MetadataError::InvalidRoleArgument {
                family: "metadata delegate role",
                value: "8".to_string(),
            }
        );
        assert_eq!(
            LegacyMetadataDelegateRole::try_from(3u8).unwrap(),
            LegacyMetadataDelegateRole::Update
        );
    }

    #[test]
    fn display_is_the_seed() {
        assert_eq!(PayloadKey::SourceSeeds.to_string(), "source_seeds");
        assert_eq!(HolderDelegateRole::PrintDelegate.to_string(), "print_delegate");
    }
}
