//! Error types for message signing
//!
//! Only the signing entry points surface errors: signing with a bad key is
//! a programming error the caller must fix. The
//! verification entry points never return errors; every malformed input or
//! failed cryptographic check collapses into an invalid result so the API
//! does not leak why a signature was rejected.

/// Error types for message signing
#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),
}

pub type SignerResult<T> = Result<T, SignerError>;
