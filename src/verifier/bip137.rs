//! BIP-137 legacy signed-message verification
//!
//! A 65-byte base64 signature: one recovery flag byte followed by the
//! compact (r, s) pair. The flag encodes the recovery id, the key
//! compression and the address type the signer claims. Strict mode holds
//! the signer to that claim; loose mode re-derives every ECDSA address
//! type from the recovered key and accepts any match. Taproot addresses
//! are never candidates, since recovery yields an ECDSA key.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, Secp256k1};

use crate::address::{derive_address, AddressFormat};
use crate::encoding::compact_size;
use crate::hashes::sha256d;

use super::debug_log;

const MESSAGE_MAGIC: &[u8] = b"\x18Bitcoin Signed Message:\n";

/// Decoded recovery flag byte
struct RecoveryFlag {
    recovery_id: i32,
    compressed: bool,
    implied: AddressFormat,
}

/// Map a flag byte to its recovery parameters
///
/// Bytes outside 27..=42 are not BIP-137 signatures.
fn parse_flag(byte: u8) -> Option<RecoveryFlag> {
    let (base, compressed, implied) = match byte {
        27..=30 => (27, false, AddressFormat::P2PKH),
        31..=34 => (31, true, AddressFormat::P2PKH),
        35..=38 => (35, true, AddressFormat::P2SH_P2WPKH),
        39..=42 => (39, true, AddressFormat::P2WPKH),
        _ => return None,
    };
    Some(RecoveryFlag {
        recovery_id: i32::from(byte - base),
        compressed,
        implied,
    })
}

/// Double-SHA256 of the magic-prefixed message
fn signed_message_hash(message: &str) -> [u8; 32] {
    let mut preimage = Vec::with_capacity(MESSAGE_MAGIC.len() + 9 + message.len());
    preimage.extend_from_slice(MESSAGE_MAGIC);
    compact_size::encode_into(&mut preimage, message.len() as u64);
    preimage.extend_from_slice(message.as_bytes());
    sha256d(&preimage)
}

/// Recover the signing key from a 65-byte compact signature
fn recover(message: &str, signature: &[u8]) -> Option<(RecoveryFlag, PublicKey)> {
    let flag = parse_flag(*signature.first()?)?;

    let recovery_id = RecoveryId::from_i32(flag.recovery_id).ok()?;
    let rsig = RecoverableSignature::from_compact(&signature[1..], recovery_id).ok()?;

    let msg = Message::from_digest(signed_message_hash(message));
    let secp = Secp256k1::new();
    let pubkey = secp.recover_ecdsa(&msg, &rsig).ok()?;
    Some((flag, pubkey))
}

fn serialize_key(pubkey: &PublicKey, compressed: bool) -> Vec<u8> {
    if compressed {
        pubkey.serialize().to_vec()
    } else {
        pubkey.serialize_uncompressed().to_vec()
    }
}

/// Strict mode: the recovered key must produce `address` in the exact
/// format the flag byte claims
pub(super) fn try_verify_strict(address: &str, message: &str, signature: &str) -> Option<String> {
    let bytes = BASE64.decode(signature).ok()?;
    if bytes.len() != 65 {
        return None;
    }

    let (flag, pubkey) = recover(message, &bytes)?;
    let key = serialize_key(&pubkey, flag.compressed);
    let derived = derive_address(&key, flag.implied).ok()?;
    if !derived.eq_ignore_ascii_case(address) {
        debug_log!("Recovered key derives {} under {:?}", derived, flag.implied);
        return None;
    }

    Some(format!("recovery flag implies {:?}", flag.implied))
}

/// Loose mode: accept if the recovered key produces `address` under any
/// ECDSA format, regardless of what the flag byte claims
pub(super) fn try_verify_loose(address: &str, message: &str, signature: &str) -> Option<String> {
    let bytes = BASE64.decode(signature).ok()?;
    if bytes.len() != 65 {
        return None;
    }

    let (_flag, pubkey) = recover(message, &bytes)?;

    let candidates = [
        (AddressFormat::P2PKH, true),
        (AddressFormat::P2PKH, false),
        (AddressFormat::P2SH_P2WPKH, true),
        (AddressFormat::P2WPKH, true),
    ];
    for (format, compressed) in candidates {
        let key = serialize_key(&pubkey, compressed);
        if let Ok(derived) = derive_address(&key, format) {
            if derived.eq_ignore_ascii_case(address) {
                return Some(format!("recovered key matches as {:?}", format));
            }
        }
    }
    None
}
