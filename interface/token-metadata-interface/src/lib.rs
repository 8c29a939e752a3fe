#![warn(missing_docs)]
#![cfg_attr(not(test), forbid(unsafe_code))]

//! Token Metadata program interface: ids, seeds, PDA derivation, and the wire
//! layouts of accounts and instructions.

pub mod codec;
pub mod error;
pub mod instruction;
pub mod pda;
pub mod seeds;
pub mod state;
pub mod types;

use solana_program::pubkey::Pubkey;

pub use {
    error::{FormatError, MetadataError, Result},
    pda::{
        find_associated_token_address, find_edition_marker_pda_with_program,
        find_master_edition_pda_with_program, find_metadata_pda_with_program,
        find_token_record_pda_with_program, AddressDeriver, EditionNumber, PdaFinder,
        ProgramAddressDeriver,
    },
    seeds::{
        HolderDelegateRole, LegacyMetadataDelegateRole, MetadataDelegateRole, PayloadKey,
        RoleSeed, SeedEnum,
    },
};

solana_program::declare_id!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");

/// SPL Token program
pub const SPL_TOKEN_PROGRAM_ID: Pubkey =
    solana_program::pubkey!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");

/// SPL Associated Token Account program
pub const SPL_ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey =
    solana_program::pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

/// Token Auth Rules program
pub const MPL_TOKEN_AUTH_RULES_PROGRAM_ID: Pubkey =
    solana_program::pubkey!("auth9SigNpDKz4sJJ1DfCTuZrZNSAgh9sFD3rboVmgg");

/// System program
pub const SYSTEM_PROGRAM_ID: Pubkey = solana_program::system_program::ID;

/// Instructions sysvar
pub const SYSVAR_INSTRUCTIONS_ID: Pubkey = solana_program::sysvar::instructions::ID;

/// Checks that the supplied program ID is the Token Metadata program
pub fn check_program_account(program_id: &Pubkey) -> bool {
    program_id == &id()
}
