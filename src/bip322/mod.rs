//! BIP-322 generic signed message structures
//!
//! Builds the two virtual transactions ("to_spend" and "to_sign") that a
//! BIP-322 signature commits to, and computes the sighash digests over
//! them for each script type.

pub mod sighash;
pub mod transaction;

pub use transaction::{message_hash, to_sign, to_spend, TxInput, TxOutput, VirtualTransaction};
