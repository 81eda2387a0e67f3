//! Message verification
//!
//! Verification walks an ordered chain of independent strategies and
//! accepts on the first that matches: Taproot envelope, BIP-322 witness
//! stack, strict BIP-137, then loose BIP-137 (address-type agnostic
//! recovery). Verification never returns an error; malformed input,
//! unknown formats and failed checks all come back as a negative result.

mod bip137;
mod taproot;
mod witness_stack;

use serde::Serialize;

#[cfg(debug_assertions)]
macro_rules! debug_log {
    ($($arg:tt)*) => { eprintln!($($arg)*) }
}
#[cfg(not(debug_assertions))]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

pub(crate) use debug_log;

/// Which strategy in the chain accepted a signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerificationMethod {
    Taproot,
    Bip322,
    Bip137,
    Bip137Loose,
}

impl VerificationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Taproot => "taproot",
            Self::Bip322 => "bip322",
            Self::Bip137 => "bip137",
            Self::Bip137Loose => "bip137-loose",
        }
    }
}

/// Outcome of a verification attempt
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub valid: bool,
    pub method: Option<VerificationMethod>,
    pub details: Option<String>,
}

/// Verify a signature against an address and message
pub fn verify_message(address: &str, message: &str, signature: &str) -> bool {
    verify_message_with_method(address, message, signature).valid
}

/// Verify and report which strategy matched
pub fn verify_message_with_method(
    address: &str,
    message: &str,
    signature: &str,
) -> VerificationReport {
    type Strategy = fn(&str, &str, &str) -> Option<String>;
    let chain: [(VerificationMethod, Strategy); 4] = [
        (VerificationMethod::Taproot, taproot::try_verify),
        (VerificationMethod::Bip322, witness_stack::try_verify),
        (VerificationMethod::Bip137, bip137::try_verify_strict),
        (VerificationMethod::Bip137Loose, bip137::try_verify_loose),
    ];

    for (method, strategy) in chain {
        if let Some(details) = strategy(address, message, signature) {
            debug_log!("Verification succeeded via {}", method.as_str());
            return VerificationReport {
                valid: true,
                method: Some(method),
                details: Some(details),
            };
        }
    }

    VerificationReport {
        valid: false,
        method: None,
        details: None,
    }
}
