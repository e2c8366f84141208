//! # Wallet Module
//!
//! Domain types for whale wallets plus the helpers shared by fetchers and
//! routes: address validation and fallback data.

pub mod address;
pub mod fallback;
pub mod types;

pub use address::{is_valid_solana_address, short_address};
