//! Message signing
//!
//! Produces BIP-322 witness-stack signatures for the ECDSA address
//! formats, and a compact Schnorr envelope for Taproot. Signing is
//! deterministic (RFC 6979 for ECDSA, no-aux-rand for Schnorr), so the
//! same key, message and format always yield the same signature string.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use secp256k1::{Keypair, Message, PublicKey, Secp256k1, SecretKey};

use crate::address::{script_pubkey, AddressFormat};
use crate::bip322::{self, sighash};
use crate::encoding::{der, witness};
use crate::error::{SignerError, SignerResult};
use crate::hashes::hash160;

/// Sign a message for the given address format
///
/// # Arguments
/// * `message` - UTF-8 message text
/// * `private_key` - 32-byte secp256k1 secret key
/// * `format` - address format that determines the proving script
///
/// # Returns
/// The signature string: base64 witness stack for ECDSA formats, a
/// `tr:`-prefixed hex envelope for Taproot.
pub fn sign_message(
    message: &str,
    private_key: &[u8],
    format: AddressFormat,
) -> SignerResult<String> {
    if private_key.len() != 32 {
        return Err(SignerError::InvalidPrivateKey(format!(
            "Expected 32 bytes, got {}",
            private_key.len()
        )));
    }

    match format {
        AddressFormat::P2TR => sign_p2tr_simplified(message, private_key),
        _ => sign_bip322_ecdsa(message, private_key, format),
    }
}

/// Sign with the Schnorr envelope used for Taproot addresses
///
/// The message hash is signed directly (no key tweak, no virtual
/// transaction). The result carries the x-only public key so the
/// verifier can re-derive the address:
/// `tr:<hex signature>:<hex x-only key>`.
pub fn sign_p2tr_simplified(message: &str, private_key: &[u8]) -> SignerResult<String> {
    let secp = Secp256k1::new();
    let secret_key = SecretKey::from_slice(private_key)
        .map_err(|e| SignerError::InvalidPrivateKey(e.to_string()))?;
    let keypair = Keypair::from_secret_key(&secp, &secret_key);
    let (x_only, _parity) = keypair.x_only_public_key();

    let digest = bip322::message_hash(message.as_bytes());
    let msg = Message::from_digest(digest);
    let sig = secp.sign_schnorr_no_aux_rand(&msg, &keypair);
    let sig_bytes: [u8; 64] = *sig.as_ref();

    Ok(format!(
        "tr:{}:{}",
        hex::encode(sig_bytes),
        hex::encode(x_only.serialize())
    ))
}

fn sign_bip322_ecdsa(
    message: &str,
    private_key: &[u8],
    format: AddressFormat,
) -> SignerResult<String> {
    let secp = Secp256k1::new();
    let secret_key = SecretKey::from_slice(private_key)
        .map_err(|e| SignerError::InvalidPrivateKey(e.to_string()))?;
    let pubkey = PublicKey::from_secret_key(&secp, &secret_key).serialize();

    let spk = script_pubkey(&pubkey, format)?;
    let to_spend = bip322::to_spend(&spk, message.as_bytes());
    let to_sign = bip322::to_sign(to_spend.txid());

    let digest = if format.uses_legacy_sighash() {
        sighash::legacy(&to_sign, &spk)
    } else {
        let script_code = sighash::p2pkh_script_code(&hash160(&pubkey));
        sighash::segwit_v0(&to_sign, &script_code, 0)
    };

    let msg = Message::from_digest(digest);
    let sig = secp.sign_ecdsa(&msg, &secret_key);
    let compact = sig.serialize_compact();

    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&compact[..32]);
    s.copy_from_slice(&compact[32..]);

    let mut der_sig = der::encode(&r, &s);
    der_sig.push(sighash::SIGHASH_ALL);

    let stack = witness::encode(&[der_sig, pubkey.to_vec()]);
    Ok(BASE64.encode(stack))
}
