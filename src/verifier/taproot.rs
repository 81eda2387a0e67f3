//! Taproot envelope verification
//!
//! Handles the `tr:<hex signature>:<hex x-only key>` format emitted by
//! [`crate::signer::sign_p2tr_simplified`]. The Schnorr signature covers
//! the tagged message hash directly; the key is checked by re-deriving
//! the Taproot address and comparing case-insensitively.

use secp256k1::{schnorr, Message, Secp256k1, XOnlyPublicKey};

use crate::address::{decode_address, p2tr_address, AddressFormat};
use crate::bip322;

pub(super) fn try_verify(address: &str, message: &str, signature: &str) -> Option<String> {
    let payload = signature.strip_prefix("tr:")?;

    let (format, _program) = decode_address(address)?;
    if format != AddressFormat::P2TR {
        return None;
    }

    let (sig_hex, key_hex) = payload.split_once(':')?;
    let sig_bytes = hex::decode(sig_hex).ok()?;
    let key_bytes = hex::decode(key_hex).ok()?;
    if sig_bytes.len() != 64 || key_bytes.len() != 32 {
        return None;
    }

    let sig = schnorr::Signature::from_slice(&sig_bytes).ok()?;
    let x_only = XOnlyPublicKey::from_slice(&key_bytes).ok()?;

    let digest = bip322::message_hash(message.as_bytes());
    let msg = Message::from_digest(digest);

    let secp = Secp256k1::verification_only();
    secp.verify_schnorr(&sig, &msg, &x_only).ok()?;

    // the embedded key must actually produce this address
    let derived = p2tr_address(&key_bytes.try_into().ok()?).ok()?;
    if !derived.eq_ignore_ascii_case(address) {
        return None;
    }

    Some("schnorr signature over tagged message hash".to_string())
}
