//! Client-side checks mirroring the program's limits, so bad input fails
//! before a transaction is built.

use {
    std::collections::HashSet,
    token_metadata_interface::{
        state::{
            MAX_CREATOR_LIMIT, MAX_NAME_LENGTH, MAX_SELLER_FEE_BASIS_POINTS, MAX_SYMBOL_LENGTH,
            MAX_URI_LENGTH,
        },
        types::{Creator, Data},
    },
};

pub fn validate_name(name: &str) -> anyhow::Result<()> {
    anyhow::ensure!(
        name.len() <= MAX_NAME_LENGTH,
        "name too long: {} bytes (max {MAX_NAME_LENGTH})",
        name.len()
    );
    Ok(())
}

pub fn validate_symbol(symbol: &str) -> anyhow::Result<()> {
    anyhow::ensure!(
        symbol.len() <= MAX_SYMBOL_LENGTH,
        "symbol too long: {} bytes (max {MAX_SYMBOL_LENGTH})",
        symbol.len()
    );
    Ok(())
}

pub fn validate_uri(uri: &str) -> anyhow::Result<()> {
    anyhow::ensure!(
        uri.len() <= MAX_URI_LENGTH,
        "uri too long: {} bytes (max {MAX_URI_LENGTH})",
        uri.len()
    );
    Ok(())
}

pub fn validate_seller_fee(seller_fee_basis_points: u16) -> anyhow::Result<()> {
    anyhow::ensure!(
        seller_fee_basis_points <= MAX_SELLER_FEE_BASIS_POINTS,
        "seller fee {seller_fee_basis_points} exceeds {MAX_SELLER_FEE_BASIS_POINTS} basis points"
    );
    Ok(())
}

/// One to five creators, no duplicates, shares summing to 100. Omit the
/// list entirely (`None`) to create metadata without creators.
pub fn validate_creators(creators: &[Creator]) -> anyhow::Result<()> {
    anyhow::ensure!(!creators.is_empty(), "at least one creator is required");
    anyhow::ensure!(
        creators.len() <= MAX_CREATOR_LIMIT,
        "too many creators: {} (max {MAX_CREATOR_LIMIT})",
        creators.len()
    );
    let mut seen = HashSet::new();
    for creator in creators {
        anyhow::ensure!(
            seen.insert(creator.address),
            "duplicate creator {}",
            creator.address
        );
    }
    let total: u32 = creators.iter().map(|c| u32::from(c.share)).sum();
    anyhow::ensure!(total == 100, "creator shares sum to {total}, expected 100");
    Ok(())
}

/// Validate every field of a metadata payload.
pub fn validate_metadata_fields(
    name: &str,
    symbol: &str,
    uri: &str,
    seller_fee_basis_points: u16,
    creators: Option<&[Creator]>,
) -> anyhow::Result<()> {
    validate_name(name)?;
    validate_symbol(symbol)?;
    validate_uri(uri)?;
    validate_seller_fee(seller_fee_basis_points)?;
    if let Some(creators) = creators {
        validate_creators(creators)?;
    }
    Ok(())
}

pub fn validate_data(data: &Data) -> anyhow::Result<()> {
    validate_metadata_fields(
        &data.name,
        &data.symbol,
        &data.uri,
        data.seller_fee_basis_points,
        data.creators.as_deref(),
    )
}
