//! BIP-322 witness-stack verification
//!
//! The signature is a base64 witness stack. Key-hash spends carry
//! `[DER signature + hash type, public key]`; Taproot key-path spends
//! carry a single 64- or 65-byte Schnorr signature verified against the
//! witness program with the full BIP-341 sighash.
//!
//! Exactly 65-byte blobs are left alone: that length is the BIP-137
//! compact layout and is handled by the next strategy in the chain.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use secp256k1::{ecdsa, schnorr, Message, PublicKey, Secp256k1, XOnlyPublicKey};

use crate::address::{
    decode_address, expected_script_pubkey, p2wpkh_script, AddressFormat,
};
use crate::bip322::{self, sighash};
use crate::encoding::{der, witness};
use crate::hashes::hash160;

use super::debug_log;

pub(super) fn try_verify(address: &str, message: &str, signature: &str) -> Option<String> {
    let blob = BASE64.decode(signature).ok()?;
    if blob.len() == 65 {
        return None;
    }

    let items = witness::decode(&blob)?;
    let (format, payload) = decode_address(address)?;

    match format {
        AddressFormat::P2TR => verify_taproot_key_path(address, message, &items, &payload),
        _ => verify_key_hash(address, message, format, &items, &payload),
    }
}

fn verify_key_hash(
    address: &str,
    message: &str,
    format: AddressFormat,
    items: &[Vec<u8>],
    payload: &[u8],
) -> Option<String> {
    if items.len() < 2 {
        return None;
    }
    let sig_item = &items[0];
    let key_item = &items[1];
    // segwit programs commit to compressed keys only
    let compressed_only = !matches!(format, AddressFormat::P2PKH);
    if key_item.len() != 33 && (compressed_only || key_item.len() != 65) {
        return None;
    }

    // the witness key must hash to the address payload
    let key_hash = hash160(key_item);
    let committed: [u8; 20] = match format {
        AddressFormat::P2PKH | AddressFormat::P2WPKH => key_hash,
        AddressFormat::P2SH_P2WPKH => hash160(&p2wpkh_script(&key_hash)),
        _ => return None,
    };
    if committed != payload {
        debug_log!("Witness key does not match address payload");
        return None;
    }

    let (r, s) = parse_der_signature(sig_item)?;

    let spk = expected_script_pubkey(address)?;
    let to_sign = bip322::to_sign(bip322::to_spend(&spk, message.as_bytes()).txid());
    let digest = match format {
        AddressFormat::P2PKH => sighash::legacy(&to_sign, &spk),
        _ => {
            let script_code = sighash::p2pkh_script_code(&key_hash);
            sighash::segwit_v0(&to_sign, &script_code, 0)
        }
    };

    let mut compact = [0u8; 64];
    compact[..32].copy_from_slice(&r);
    compact[32..].copy_from_slice(&s);
    let mut sig = ecdsa::Signature::from_compact(&compact).ok()?;
    sig.normalize_s();

    let pubkey = PublicKey::from_slice(key_item).ok()?;
    let secp = Secp256k1::verification_only();
    secp.verify_ecdsa(&Message::from_digest(digest), &sig, &pubkey)
        .ok()?;

    Some(format!("witness stack over {:?} script", format))
}

fn verify_taproot_key_path(
    address: &str,
    message: &str,
    items: &[Vec<u8>],
    program: &[u8],
) -> Option<String> {
    if items.len() != 1 {
        return None;
    }
    let item = &items[0];
    let (sig_bytes, hash_type) = match item.len() {
        64 => (&item[..], 0x00),
        65 if item[64] == sighash::SIGHASH_ALL => (&item[..64], sighash::SIGHASH_ALL),
        _ => return None,
    };

    let spk = expected_script_pubkey(address)?;
    let to_sign = bip322::to_sign(bip322::to_spend(&spk, message.as_bytes()).txid());
    let digest = sighash::taproot_key_path(&to_sign, &spk, 0, hash_type);

    let sig = schnorr::Signature::from_slice(sig_bytes).ok()?;
    let x_only = XOnlyPublicKey::from_slice(program).ok()?;

    let secp = Secp256k1::verification_only();
    secp.verify_schnorr(&sig, &Message::from_digest(digest), &x_only)
        .ok()?;

    Some("taproot key-path witness".to_string())
}

/// Parse a DER signature item, tolerating an appended SIGHASH_ALL byte
fn parse_der_signature(item: &[u8]) -> Option<([u8; 32], [u8; 32])> {
    if let Some(parsed) = der::decode(item) {
        return Some(parsed);
    }
    let (hash_type, body) = item.split_last()?;
    if *hash_type != sighash::SIGHASH_ALL {
        return None;
    }
    der::decode(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::derive_address;
    use crate::signer::sign_message;
    use secp256k1::SecretKey;

    fn test_key() -> [u8; 32] {
        let mut key = [0u8; 32];
        key[31] = 3;
        key
    }

    fn test_pubkey() -> Vec<u8> {
        let secp = Secp256k1::new();
        let sk = SecretKey::from_slice(&test_key()).unwrap();
        PublicKey::from_secret_key(&secp, &sk).serialize().to_vec()
    }

    #[test]
    fn test_round_trip_each_key_hash_format() {
        for format in [
            AddressFormat::P2PKH,
            AddressFormat::P2WPKH,
            AddressFormat::P2SH_P2WPKH,
        ] {
            let sig = sign_message("witness test", &test_key(), format).unwrap();
            let address = derive_address(&test_pubkey(), format).unwrap();
            assert!(
                try_verify(&address, "witness test", &sig).is_some(),
                "{:?}",
                format
            );
        }
    }

    #[test]
    fn test_wrong_message_rejected() {
        let sig = sign_message("one message", &test_key(), AddressFormat::P2WPKH).unwrap();
        let address = derive_address(&test_pubkey(), AddressFormat::P2WPKH).unwrap();
        assert!(try_verify(&address, "another message", &sig).is_none());
    }

    #[test]
    fn test_cross_format_rejected() {
        let sig = sign_message("msg", &test_key(), AddressFormat::P2WPKH).unwrap();
        let address = derive_address(&test_pubkey(), AddressFormat::P2PKH).unwrap();
        assert!(try_verify(&address, "msg", &sig).is_none());
    }

    #[test]
    fn test_65_byte_blob_deferred() {
        let blob = BASE64.encode([0u8; 65]);
        let address = derive_address(&test_pubkey(), AddressFormat::P2PKH).unwrap();
        assert!(try_verify(&address, "msg", &blob).is_none());
    }

    #[test]
    fn test_standard_taproot_vector() {
        // Signature produced by an external BIP-322 implementation for a
        // key-path-only Taproot output
        let address = "bc1ppv609nr0vr25u07u95waq5lucwfm6tde4nydujnu8npg4q75mr5sxq8lt3";
        let signature =
            "AUHd69PrJQEv+oKTfZ8l+WROBHuy9HKrbFCJu7U1iK2iiEy1vMU5EfMtjc+VSHM7aU0SDbak5IUZRVno2P5mjSafAQ==";
        assert!(try_verify(address, "Hello World", signature).is_some());
        // the signature commits to exactly that message
        assert!(try_verify(address, "", signature).is_none());
    }

    #[test]
    fn test_uncompressed_key_rejected_for_segwit() {
        let secp = Secp256k1::new();
        let sk = SecretKey::from_slice(&test_key()).unwrap();
        let pubkey = PublicKey::from_secret_key(&secp, &sk).serialize_uncompressed();
        let key_hash = hash160(&pubkey);

        // bc1q address whose program is the uncompressed key's hash
        let version = bech32::u5::try_from_u8(0).unwrap();
        let mut data = vec![version];
        for value in bech32::convert_bits(&key_hash, 8, 5, true).unwrap() {
            data.push(bech32::u5::try_from_u8(value).unwrap());
        }
        let address = bech32::encode("bc", data, bech32::Variant::Bech32).unwrap();

        // a signature that is otherwise cryptographically valid
        let spk = expected_script_pubkey(&address).unwrap();
        let to_sign = bip322::to_sign(bip322::to_spend(&spk, b"msg").txid());
        let digest = sighash::segwit_v0(&to_sign, &sighash::p2pkh_script_code(&key_hash), 0);
        let sig = secp.sign_ecdsa(&Message::from_digest(digest), &sk);
        let compact = sig.serialize_compact();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&compact[..32]);
        s.copy_from_slice(&compact[32..]);
        let mut der_sig = der::encode(&r, &s);
        der_sig.push(sighash::SIGHASH_ALL);

        let blob = witness::encode(&[der_sig, pubkey.to_vec()]);
        assert!(try_verify(&address, "msg", &BASE64.encode(blob)).is_none());
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let sig = sign_message("msg", &test_key(), AddressFormat::P2WPKH).unwrap();
        let address = derive_address(&test_pubkey(), AddressFormat::P2WPKH).unwrap();
        let mut blob = BASE64.decode(&sig).unwrap();
        let mid = blob.len() / 2;
        blob[mid] ^= 0x01;
        assert!(try_verify(&address, "msg", &BASE64.encode(blob)).is_none());
    }
}
