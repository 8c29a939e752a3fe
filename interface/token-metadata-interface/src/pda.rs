//! PDA derivation
//!
//! Seed lists are built by plain functions so they can be inspected; the
//! address search itself sits behind [`AddressDeriver`]. Seed order is part of
//! the address: a swapped seed yields a different, valid-looking address.

use {
    crate::{
        codec::encode_u64_le,
        error::{MetadataError, Result},
        seeds::{
            HolderDelegateRole, MetadataDelegateFamily, RoleSeed, BURN, COLLECTION_AUTHORITY,
            EDITION, EDITION_MARKER_BIT_SIZE, MARKER, PREFIX, TOKEN_RECORD, USER,
        },
    },
    num_bigint::BigUint,
    num_traits::ToPrimitive,
    solana_program::pubkey::Pubkey,
};

/// Ordered seed list.
pub type Seeds = Vec<Vec<u8>>;

/// Computes `(address, bump)` from a program id and ordered seeds.
pub trait AddressDeriver {
    fn derive(&self, program_id: &Pubkey, seeds: &[&[u8]]) -> Result<(Pubkey, u8)>;
}

/// The runtime's off-curve bump search.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProgramAddressDeriver;

impl AddressDeriver for ProgramAddressDeriver {
    fn derive(&self, program_id: &Pubkey, seeds: &[&[u8]]) -> Result<(Pubkey, u8)> {
        Pubkey::try_find_program_address(seeds, program_id).ok_or(
            MetadataError::AddressDerivation {
                program_id: *program_id,
                seed_count: seeds.len(),
            },
        )
    }
}

/// An edition number of any width.
///
/// Edition numbers come from user input and JSON where they may exceed
/// 2^53; the big form keeps them exact until the marker index is taken.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EditionNumber {
    /// Fits in a u64
    Small(u64),
    /// Arbitrary precision
    Big(BigUint),
}

impl EditionNumber {
    /// Index of the edition marker account tracking this edition.
    pub fn marker_index(&self) -> Result<u64> {
        match self {
            EditionNumber::Small(n) => Ok(n / EDITION_MARKER_BIT_SIZE),
            EditionNumber::Big(n) => {
                let index = n / BigUint::from(EDITION_MARKER_BIT_SIZE);
                index.to_u64().ok_or_else(|| MetadataError::EncodingRange {
                    value: index.to_string(),
                    type_name: "u64 edition marker index",
                })
            }
        }
    }
}

impl From<u64> for EditionNumber {
    fn from(value: u64) -> Self {
        EditionNumber::Small(value)
    }
}

impl From<u32> for EditionNumber {
    fn from(value: u32) -> Self {
        EditionNumber::Small(value.into())
    }
}

impl From<u128> for EditionNumber {
    fn from(value: u128) -> Self {
        match u64::try_from(value) {
            Ok(small) => EditionNumber::Small(small),
            Err(_) => EditionNumber::Big(BigUint::from(value)),
        }
    }
}

impl From<BigUint> for EditionNumber {
    fn from(value: BigUint) -> Self {
        match value.to_u64() {
            Some(small) => EditionNumber::Small(small),
            None => EditionNumber::Big(value),
        }
    }
}

fn prefixed(program_id: &Pubkey, mint: &Pubkey) -> Seeds {
    vec![
        PREFIX.as_bytes().to_vec(),
        program_id.to_bytes().to_vec(),
        mint.to_bytes().to_vec(),
    ]
}

/// `["metadata", program_id, mint]`
pub fn metadata_seeds(program_id: &Pubkey, mint: &Pubkey) -> Seeds {
    prefixed(program_id, mint)
}

/// `["metadata", program_id, mint, "edition"]`, shared by master and print
/// editions.
pub fn master_edition_seeds(program_id: &Pubkey, mint: &Pubkey) -> Seeds {
    let mut seeds = prefixed(program_id, mint);
    seeds.push(EDITION.as_bytes().to_vec());
    seeds
}

/// `["metadata", program_id, mint, "edition", u64_le(edition / 248)]`
pub fn edition_marker_seeds(
    program_id: &Pubkey,
    mint: &Pubkey,
    edition_number: &EditionNumber,
) -> Result<Seeds> {
    let mut seeds = master_edition_seeds(program_id, mint);
    seeds.push(encode_u64_le(edition_number.marker_index()?).to_vec());
    Ok(seeds)
}

/// `["metadata", program_id, mint, "edition", "marker"]`
pub fn edition_marker_v2_seeds(program_id: &Pubkey, mint: &Pubkey) -> Seeds {
    let mut seeds = master_edition_seeds(program_id, mint);
    seeds.push(MARKER.as_bytes().to_vec());
    seeds
}

/// `["metadata", program_id, mint, "token_record", token]`
pub fn token_record_seeds(program_id: &Pubkey, mint: &Pubkey, token: &Pubkey) -> Seeds {
    let mut seeds = prefixed(program_id, mint);
    seeds.push(TOKEN_RECORD.as_bytes().to_vec());
    seeds.push(token.to_bytes().to_vec());
    seeds
}

/// `["metadata", program_id, mint, role_seed, update_authority, delegate]`
pub fn metadata_delegate_record_seeds<R: MetadataDelegateFamily>(
    program_id: &Pubkey,
    mint: &Pubkey,
    role: &RoleSeed<R>,
    update_authority: &Pubkey,
    delegate: &Pubkey,
) -> Seeds {
    let mut seeds = prefixed(program_id, mint);
    seeds.push(role.to_seed_bytes());
    seeds.push(update_authority.to_bytes().to_vec());
    seeds.push(delegate.to_bytes().to_vec());
    seeds
}

/// `["metadata", program_id, mint, role_seed, owner, delegate]`
pub fn holder_delegate_record_seeds(
    program_id: &Pubkey,
    mint: &Pubkey,
    role: &RoleSeed<HolderDelegateRole>,
    owner: &Pubkey,
    delegate: &Pubkey,
) -> Seeds {
    let mut seeds = prefixed(program_id, mint);
    seeds.push(role.to_seed_bytes());
    seeds.push(owner.to_bytes().to_vec());
    seeds.push(delegate.to_bytes().to_vec());
    seeds
}

/// `["metadata", program_id, mint, "collection_authority", authority]`
pub fn collection_authority_record_seeds(
    program_id: &Pubkey,
    mint: &Pubkey,
    collection_authority: &Pubkey,
) -> Seeds {
    let mut seeds = prefixed(program_id, mint);
    seeds.push(COLLECTION_AUTHORITY.as_bytes().to_vec());
    seeds.push(collection_authority.to_bytes().to_vec());
    seeds
}

/// `["metadata", program_id, mint, "user", use_authority]`
pub fn use_authority_record_seeds(
    program_id: &Pubkey,
    mint: &Pubkey,
    use_authority: &Pubkey,
) -> Seeds {
    let mut seeds = prefixed(program_id, mint);
    seeds.push(USER.as_bytes().to_vec());
    seeds.push(use_authority.to_bytes().to_vec());
    seeds
}

/// `["metadata", program_id, "burn"]`
pub fn burner_seeds(program_id: &Pubkey) -> Seeds {
    vec![
        PREFIX.as_bytes().to_vec(),
        program_id.to_bytes().to_vec(),
        BURN.as_bytes().to_vec(),
    ]
}

/// `[owner, token_program, mint]`, derived under the associated token program.
pub fn associated_token_seeds(owner: &Pubkey, token_program: &Pubkey, mint: &Pubkey) -> Seeds {
    vec![
        owner.to_bytes().to_vec(),
        token_program.to_bytes().to_vec(),
        mint.to_bytes().to_vec(),
    ]
}

/// Derives Token Metadata PDAs for one program id with one derivation
/// primitive.
#[derive(Clone, Debug)]
pub struct PdaFinder<D = ProgramAddressDeriver> {
    /// Token Metadata program id
    pub program_id: Pubkey,
    deriver: D,
}

impl Default for PdaFinder<ProgramAddressDeriver> {
    fn default() -> Self {
        Self::new(crate::id())
    }
}

impl PdaFinder<ProgramAddressDeriver> {
    /// Finder using `Pubkey::try_find_program_address`.
    pub fn new(program_id: Pubkey) -> Self {
        Self::with_deriver(program_id, ProgramAddressDeriver)
    }
}

impl<D: AddressDeriver> PdaFinder<D> {
    /// Finder delegating derivation to `deriver`.
    pub fn with_deriver(program_id: Pubkey, deriver: D) -> Self {
        Self {
            program_id,
            deriver,
        }
    }

    /// The derivation primitive in use.
    pub fn deriver(&self) -> &D {
        &self.deriver
    }

    /// Derive an address for `seeds` under `program_id`.
    pub fn find(&self, program_id: &Pubkey, seeds: &Seeds) -> Result<(Pubkey, u8)> {
        let refs: Vec<&[u8]> = seeds.iter().map(Vec::as_slice).collect();
        let found = self.deriver.derive(program_id, &refs);
        match &found {
            Ok((address, bump)) => tracing::debug!(
                %program_id,
                seeds = seeds.len(),
                %address,
                bump,
                "derived program address"
            ),
            Err(e) => tracing::debug!(%program_id, error = %e, "program address derivation failed"),
        }
        found
    }

    fn find_own(&self, seeds: &Seeds) -> Result<(Pubkey, u8)> {
        self.find(&self.program_id, seeds)
    }

    /// `["metadata", program, mint]`
    pub fn metadata(&self, mint: &Pubkey) -> Result<(Pubkey, u8)> {
        self.find_own(&metadata_seeds(&self.program_id, mint))
    }

    /// `["metadata", program, mint, "edition"]`
    pub fn master_edition(&self, mint: &Pubkey) -> Result<(Pubkey, u8)> {
        self.find_own(&master_edition_seeds(&self.program_id, mint))
    }

    /// Print editions live at the same address as master editions.
    pub fn edition(&self, mint: &Pubkey) -> Result<(Pubkey, u8)> {
        self.master_edition(mint)
    }

    /// Marker for the bucket of 248 editions containing `edition_number`.
    pub fn edition_marker(
        &self,
        mint: &Pubkey,
        edition_number: impl Into<EditionNumber>,
    ) -> Result<(Pubkey, u8)> {
        let seeds = edition_marker_seeds(&self.program_id, mint, &edition_number.into())?;
        self.find_own(&seeds)
    }

    /// `["metadata", program, mint, "edition", "marker"]`
    pub fn edition_marker_v2(&self, mint: &Pubkey) -> Result<(Pubkey, u8)> {
        self.find_own(&edition_marker_v2_seeds(&self.program_id, mint))
    }

    /// `["metadata", program, mint, "token_record", token]`
    pub fn token_record(&self, mint: &Pubkey, token: &Pubkey) -> Result<(Pubkey, u8)> {
        self.find_own(&token_record_seeds(&self.program_id, mint, token))
    }

    /// Record of a metadata (or legacy metadata) delegate role.
    pub fn metadata_delegate_record<R: MetadataDelegateFamily>(
        &self,
        mint: &Pubkey,
        role: impl Into<RoleSeed<R>>,
        update_authority: &Pubkey,
        delegate: &Pubkey,
    ) -> Result<(Pubkey, u8)> {
        let seeds = metadata_delegate_record_seeds(
            &self.program_id,
            mint,
            &role.into(),
            update_authority,
            delegate,
        );
        self.find_own(&seeds)
    }

    /// Record of a holder delegate role, keyed by the token owner.
    pub fn holder_delegate_record(
        &self,
        mint: &Pubkey,
        role: impl Into<RoleSeed<HolderDelegateRole>>,
        owner: &Pubkey,
        delegate: &Pubkey,
    ) -> Result<(Pubkey, u8)> {
        let seeds =
            holder_delegate_record_seeds(&self.program_id, mint, &role.into(), owner, delegate);
        self.find_own(&seeds)
    }

    /// Legacy collection authority record.
    pub fn collection_authority_record(
        &self,
        mint: &Pubkey,
        collection_authority: &Pubkey,
    ) -> Result<(Pubkey, u8)> {
        self.find_own(&collection_authority_record_seeds(
            &self.program_id,
            mint,
            collection_authority,
        ))
    }

    /// Legacy use authority record.
    pub fn use_authority_record(
        &self,
        mint: &Pubkey,
        use_authority: &Pubkey,
    ) -> Result<(Pubkey, u8)> {
        self.find_own(&use_authority_record_seeds(
            &self.program_id,
            mint,
            use_authority,
        ))
    }

    /// `["metadata", program, "burn"]`
    pub fn burner(&self) -> Result<(Pubkey, u8)> {
        self.find_own(&burner_seeds(&self.program_id))
    }

    /// Associated token account for `owner` under the SPL Token program.
    pub fn associated_token(&self, owner: &Pubkey, mint: &Pubkey) -> Result<(Pubkey, u8)> {
        self.associated_token_with_program(owner, mint, &crate::SPL_TOKEN_PROGRAM_ID)
    }

    /// Associated token account for `owner` under `token_program`.
    pub fn associated_token_with_program(
        &self,
        owner: &Pubkey,
        mint: &Pubkey,
        token_program: &Pubkey,
    ) -> Result<(Pubkey, u8)> {
        self.find(
            &crate::SPL_ASSOCIATED_TOKEN_PROGRAM_ID,
            &associated_token_seeds(owner, token_program, mint),
        )
    }
}

/// Helper to derive the `Metadata` PDA for a given mint
pub fn find_metadata_pda_with_program(program_id: &Pubkey, mint: &Pubkey) -> Result<(Pubkey, u8)> {
    PdaFinder::new(*program_id).metadata(mint)
}

/// Helper to derive the `MasterEdition` PDA for a given mint
pub fn find_master_edition_pda_with_program(
    program_id: &Pubkey,
    mint: &Pubkey,
) -> Result<(Pubkey, u8)> {
    PdaFinder::new(*program_id).master_edition(mint)
}

/// Helper to derive the `EditionMarker` PDA tracking `edition_number`
pub fn find_edition_marker_pda_with_program(
    program_id: &Pubkey,
    mint: &Pubkey,
    edition_number: impl Into<EditionNumber>,
) -> Result<(Pubkey, u8)> {
    PdaFinder::new(*program_id).edition_marker(mint, edition_number)
}

/// Helper to derive the `TokenRecord` PDA for a token account
pub fn find_token_record_pda_with_program(
    program_id: &Pubkey,
    mint: &Pubkey,
    token: &Pubkey,
) -> Result<(Pubkey, u8)> {
    PdaFinder::new(*program_id).token_record(mint, token)
}

/// Helper to derive the associated token account address
pub fn find_associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Result<(Pubkey, u8)> {
    PdaFinder::default().associated_token(owner, mint)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::seeds::{LegacyMetadataDelegateRole, MetadataDelegateRole},
        std::sync::Mutex,
    };

    /// Records every call and returns a fixed address.
    #[derive(Default)]
    struct CapturingDeriver {
        calls: Mutex<Vec<(Pubkey, Seeds)>>,
    }

    impl CapturingDeriver {
        fn last(&self) -> (Pubkey, Seeds) {
            self.calls.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl AddressDeriver for CapturingDeriver {
        fn derive(&self, program_id: &Pubkey, seeds: &[&[u8]]) -> Result<(Pubkey, u8)> {
            let seeds = seeds.iter().map(|s| s.to_vec()).collect();
            self.calls.lock().unwrap().push((*program_id, seeds));
            Ok((Pubkey::new_from_array([0xaa; 32]), 255))
        }
    }

    struct FailingDeriver;

    impl AddressDeriver for FailingDeriver {
        fn derive(&self, program_id: &Pubkey, seeds: &[&[u8]]) -> Result<(Pubkey, u8)> {
            Err(MetadataError::AddressDerivation {
                program_id: *program_id,
                seed_count: seeds.len(),
            })
        }
    }

    fn key(byte: u8) -> Pubkey {
        Pubkey::new_from_array([byte; 32])
    }

    #[test]
    fn marker_index_buckets() {
        let indexes: Vec<u64> = [0u64, 247, 248, 495, 496]
            .into_iter()
            .map(|n| EditionNumber::from(n).marker_index().unwrap())
            .collect();
        assert_eq!(indexes, vec![0, 0, 1, 1, 2]);
    }

    #[test]
    fn marker_index_accepts_big_numbers() {
        let big = BigUint::from(u64::MAX) * BigUint::from(10u32);
        let index = EditionNumber::from(big.clone()).marker_index().unwrap();
        assert_eq!(BigUint::from(index), big / BigUint::from(248u32));

        let too_big = BigUint::from(u64::MAX) * BigUint::from(1000u32);
        let err = EditionNumber::from(too_big).marker_index().unwrap_err();
        assert!(matches!(err, MetadataError::EncodingRange { .. }));
    }

    #[test]
    fn edition_marker_seeds_for_500() {
        let program_id = crate::id();
        let mint = key(3);
        let finder = PdaFinder::with_deriver(program_id, CapturingDeriver::default());
        finder
            .edition_marker(&mint, BigUint::from(500u32))
            .unwrap();

        let (derived_under, seeds) = finder.deriver().last();
        assert_eq!(derived_under, program_id);
        assert_eq!(
            seeds,
            vec![
                b"metadata".to_vec(),
                program_id.to_bytes().to_vec(),
                mint.to_bytes().to_vec(),
                b"edition".to_vec(),
                2u64.to_le_bytes().to_vec(),
            ]
        );
    }

    #[test]
    fn associated_token_seed_order() {
        let owner = key(1);
        let mint = key(2);
        let finder = PdaFinder::with_deriver(crate::id(), CapturingDeriver::default());
        finder.associated_token(&owner, &mint).unwrap();

        let (derived_under, seeds) = finder.deriver().last();
        assert_eq!(derived_under, crate::SPL_ASSOCIATED_TOKEN_PROGRAM_ID);
        assert_eq!(
            seeds,
            vec![
                owner.to_bytes().to_vec(),
                crate::SPL_TOKEN_PROGRAM_ID.to_bytes().to_vec(),
                mint.to_bytes().to_vec(),
            ]
        );
    }

    #[test]
    fn delegate_record_seeds_use_the_callers_table() {
        let finder = PdaFinder::with_deriver(crate::id(), CapturingDeriver::default());
        let (mint, authority, delegate) = (key(1), key(2), key(3));

        finder
            .metadata_delegate_record(&mint, MetadataDelegateRole::Data, &authority, &delegate)
            .unwrap();
        assert_eq!(finder.deriver().last().1[3], b"data_delegate".to_vec());

        finder
            .metadata_delegate_record(
                &mint,
                LegacyMetadataDelegateRole::Update,
                &authority,
                &delegate,
            )
            .unwrap();
        let seeds = finder.deriver().last().1;
        assert_eq!(seeds[3], b"update_delegate".to_vec());
        assert_eq!(seeds[4], authority.to_bytes().to_vec());
        assert_eq!(seeds[5], delegate.to_bytes().to_vec());

        finder
            .metadata_delegate_record::<MetadataDelegateRole>(
                &mint,
                "custom_delegate",
                &authority,
                &delegate,
            )
            .unwrap();
        assert_eq!(finder.deriver().last().1[3], b"custom_delegate".to_vec());
    }

    #[test]
    fn holder_delegate_record_seeds() {
        let finder = PdaFinder::with_deriver(crate::id(), CapturingDeriver::default());
        let (mint, owner, delegate) = (key(1), key(2), key(3));
        finder
            .holder_delegate_record(&mint, HolderDelegateRole::PrintDelegate, &owner, &delegate)
            .unwrap();
        let seeds = finder.deriver().last().1;
        assert_eq!(seeds.len(), 6);
        assert_eq!(seeds[3], b"print_delegate".to_vec());
        assert_eq!(seeds[4], owner.to_bytes().to_vec());
    }

    #[test]
    fn fixed_seed_lists() {
        let program_id = crate::id();
        let mint = key(4);
        assert_eq!(
            edition_marker_v2_seeds(&program_id, &mint)[3..].to_vec(),
            vec![b"edition".to_vec(), b"marker".to_vec()]
        );
        assert_eq!(
            burner_seeds(&program_id),
            vec![
                b"metadata".to_vec(),
                program_id.to_bytes().to_vec(),
                b"burn".to_vec()
            ]
        );
        assert_eq!(use_authority_record_seeds(&program_id, &mint, &mint)[3], b"user");
        assert_eq!(
            collection_authority_record_seeds(&program_id, &mint, &mint)[3],
            b"collection_authority"
        );
    }

    #[test]
    fn derivation_is_deterministic_and_order_sensitive() {
        let mint = key(7);
        let token = key(8);
        let finder = PdaFinder::default();
        let a = finder.token_record(&mint, &token).unwrap();
        let b = finder.token_record(&mint, &token).unwrap();
        assert_eq!(a, b);
        let swapped = finder.token_record(&token, &mint).unwrap();
        assert_ne!(a.0, swapped.0);

        let (metadata, _) = finder.metadata(&mint).unwrap();
        let (expected, _) = Pubkey::find_program_address(
            &[b"metadata", crate::id().as_ref(), mint.as_ref()],
            &crate::id(),
        );
        assert_eq!(metadata, expected);
    }

    #[test]
    fn derivation_failure_surfaces() {
        let finder = PdaFinder::with_deriver(crate::id(), FailingDeriver);
        let err = finder.metadata(&key(1)).unwrap_err();
        assert_eq!(
            err,
            MetadataError::AddressDerivation {
                program_id: crate::id(),
                seed_count: 3
            }
        );
    }
}
