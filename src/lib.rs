//! Bitcoin message signing and verification
//!
//! Signs and verifies messages for Bitcoin addresses without a node or a
//! wallet backend.
//!
//! # Architecture
//!
//! - **address**: address formats, script templates, encode/decode
//! - **bip322**: virtual transactions and sighash digests
//! - **signer**: BIP-322 witness-stack and Taproot envelope signing
//! - **verifier**: layered verification (Taproot, BIP-322, BIP-137
//!   strict, BIP-137 loose)
//! - **encoding**: CompactSize, DER and witness-stack byte codecs
//!
//! Signing is deterministic; verifying never returns an error, only a
//! boolean result (optionally with the strategy that matched).
//!
//! # Example
//!
//! ```rust,ignore
//! use bitcoin_message_signer::{sign_message, verify_message, AddressFormat};
//!
//! let signature = sign_message("hello", &private_key, AddressFormat::P2WPKH)?;
//! assert!(verify_message(&address, "hello", &signature));
//! ```

pub mod address;
pub mod bip322;
pub mod encoding;
pub mod error;
pub mod hashes;
pub mod signer;
pub mod verifier;

pub use address::{decode_address, derive_address, script_pubkey, AddressFormat};
pub use error::{SignerError, SignerResult};
pub use signer::{sign_message, sign_p2tr_simplified};
pub use verifier::{
    verify_message, verify_message_with_method, VerificationMethod, VerificationReport,
};
