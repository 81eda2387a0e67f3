//! Address formats and script derivation
//!
//! Maps a public key to the scriptPubKey and canonical address string for
//! each supported format, and decodes an address string back into the
//! script expected during verification. Mainnet constants only; the wallet
//! layer that owns network selection sits outside this crate.

use bech32::{self, Variant};
use serde::{Deserialize, Serialize};

use crate::error::{SignerError, SignerResult};
use crate::hashes::{hash160, sha256d};

/// Base58check version byte for P2PKH addresses
const P2PKH_VERSION: u8 = 0x00;
/// Base58check version byte for P2SH addresses
const P2SH_VERSION: u8 = 0x05;
/// Human-readable part for mainnet segwit addresses
const SEGWIT_HRP: &str = "bc";

/// Supported address formats
///
/// The two Counterwallet variants share the P2PKH / P2WPKH script and
/// sighash paths; they exist as distinct variants because callers select
/// them explicitly.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressFormat {
    /// Legacy pay-to-pubkey-hash ("1...")
    P2PKH,
    /// Native segwit v0 key hash ("bc1q...")
    P2WPKH,
    /// Segwit key hash nested in P2SH ("3...")
    P2SH_P2WPKH,
    /// Taproot ("bc1p...")
    P2TR,
    /// Counterwallet legacy (P2PKH script path)
    Counterwallet,
    /// Counterwallet segwit (P2WPKH script path)
    CounterwalletSegwit,
}

impl AddressFormat {
    /// True for formats signed with the legacy (pre-segwit) sighash
    pub fn uses_legacy_sighash(&self) -> bool {
        matches!(self, Self::P2PKH | Self::Counterwallet)
    }

    /// True for formats signed with the BIP-143 witness-v0 sighash
    pub fn uses_segwit_v0_sighash(&self) -> bool {
        matches!(self, Self::P2WPKH | Self::P2SH_P2WPKH | Self::CounterwalletSegwit)
    }
}

// MARK: - Script templates

/// P2PKH script: DUP HASH160 <hash> EQUALVERIFY CHECKSIG
pub fn p2pkh_script(pubkey_hash: &[u8; 20]) -> Vec<u8> {
    let mut script = Vec::with_capacity(25);
    script.extend_from_slice(&[0x76, 0xa9, 0x14]);
    script.extend_from_slice(pubkey_hash);
    script.extend_from_slice(&[0x88, 0xac]);
    script
}

/// P2SH script: HASH160 <hash> EQUAL
pub fn p2sh_script(script_hash: &[u8; 20]) -> Vec<u8> {
    let mut script = Vec::with_capacity(23);
    script.extend_from_slice(&[0xa9, 0x14]);
    script.extend_from_slice(script_hash);
    script.push(0x87);
    script
}

/// P2WPKH script: OP_0 <20-byte hash>
pub fn p2wpkh_script(pubkey_hash: &[u8; 20]) -> Vec<u8> {
    let mut script = Vec::with_capacity(22);
    script.extend_from_slice(&[0x00, 0x14]);
    script.extend_from_slice(pubkey_hash);
    script
}

/// P2TR script: OP_1 <32-byte x-only key>
pub fn p2tr_script(x_only: &[u8; 32]) -> Vec<u8> {
    let mut script = Vec::with_capacity(34);
    script.extend_from_slice(&[0x51, 0x20]);
    script.extend_from_slice(x_only);
    script
}

/// Derive the scriptPubKey committing to `pubkey` for the given format
pub fn script_pubkey(pubkey: &[u8], format: AddressFormat) -> SignerResult<Vec<u8>> {
    match format {
        AddressFormat::P2PKH | AddressFormat::Counterwallet => {
            check_pubkey(pubkey, false)?;
            Ok(p2pkh_script(&hash160(pubkey)))
        }
        AddressFormat::P2WPKH | AddressFormat::CounterwalletSegwit => {
            check_pubkey(pubkey, true)?;
            Ok(p2wpkh_script(&hash160(pubkey)))
        }
        AddressFormat::P2SH_P2WPKH => {
            check_pubkey(pubkey, true)?;
            let redeem = p2wpkh_script(&hash160(pubkey));
            Ok(p2sh_script(&hash160(&redeem)))
        }
        AddressFormat::P2TR => {
            check_pubkey(pubkey, true)?;
            let mut x_only = [0u8; 32];
            x_only.copy_from_slice(&pubkey[1..33]);
            Ok(p2tr_script(&x_only))
        }
    }
}

/// Derive the canonical address string for `pubkey` in the given format
pub fn derive_address(pubkey: &[u8], format: AddressFormat) -> SignerResult<String> {
    match format {
        AddressFormat::P2PKH | AddressFormat::Counterwallet => {
            check_pubkey(pubkey, false)?;
            Ok(base58check_encode(P2PKH_VERSION, &hash160(pubkey)))
        }
        AddressFormat::P2WPKH | AddressFormat::CounterwalletSegwit => {
            check_pubkey(pubkey, true)?;
            segwit_encode(0, &hash160(pubkey))
        }
        AddressFormat::P2SH_P2WPKH => {
            check_pubkey(pubkey, true)?;
            let redeem = p2wpkh_script(&hash160(pubkey));
            Ok(base58check_encode(P2SH_VERSION, &hash160(&redeem)))
        }
        AddressFormat::P2TR => {
            check_pubkey(pubkey, true)?;
            segwit_encode(1, &pubkey[1..33])
        }
    }
}

/// Derive a Taproot address directly from a 32-byte x-only key
pub fn p2tr_address(x_only: &[u8; 32]) -> SignerResult<String> {
    segwit_encode(1, x_only)
}

/// Decode an address string into its format and payload
///
/// The payload is the 20-byte key/script hash or the 32-byte witness
/// program. Checksums and segwit variant/version/length rules are all
/// enforced; anything that fails them decodes to `None`.
pub fn decode_address(address: &str) -> Option<(AddressFormat, Vec<u8>)> {
    let is_segwit = address
        .get(..3)
        .map_or(false, |prefix| prefix.eq_ignore_ascii_case("bc1"));
    if is_segwit {
        let (version, program) = segwit_decode(address)?;
        return match (version, program.len()) {
            (0, 20) => Some((AddressFormat::P2WPKH, program)),
            (1, 32) => Some((AddressFormat::P2TR, program)),
            _ => None,
        };
    }

    let (version, payload) = base58check_decode(address)?;
    match version {
        P2PKH_VERSION => Some((AddressFormat::P2PKH, payload)),
        P2SH_VERSION => Some((AddressFormat::P2SH_P2WPKH, payload)),
        _ => None,
    }
}

/// Build the scriptPubKey an address string commits to
pub fn expected_script_pubkey(address: &str) -> Option<Vec<u8>> {
    let (format, payload) = decode_address(address)?;
    match format {
        AddressFormat::P2PKH => Some(p2pkh_script(&payload.try_into().ok()?)),
        AddressFormat::P2SH_P2WPKH => Some(p2sh_script(&payload.try_into().ok()?)),
        AddressFormat::P2WPKH => Some(p2wpkh_script(&payload.try_into().ok()?)),
        AddressFormat::P2TR => Some(p2tr_script(&payload.try_into().ok()?)),
        _ => None,
    }
}

fn check_pubkey(pubkey: &[u8], compressed_only: bool) -> SignerResult<()> {
    match pubkey.len() {
        33 => Ok(()),
        65 if !compressed_only => Ok(()),
        65 => Err(SignerError::InvalidPublicKey(
            "segwit and taproot derivations require a compressed key".to_string(),
        )),
        n => Err(SignerError::InvalidPublicKey(format!(
            "Expected 33 or 65 bytes, got {}",
            n
        ))),
    }
}

// MARK: - Base58check

fn base58check_encode(version: u8, payload: &[u8; 20]) -> String {
    let mut data = Vec::with_capacity(25);
    data.push(version);
    data.extend_from_slice(payload);
    let checksum = sha256d(&data);
    data.extend_from_slice(&checksum[..4]);
    bs58::encode(data).into_string()
}

fn base58check_decode(address: &str) -> Option<(u8, Vec<u8>)> {
    let raw = bs58::decode(address).into_vec().ok()?;
    if raw.len() != 25 {
        return None;
    }
    let checksum = sha256d(&raw[..21]);
    if raw[21..] != checksum[..4] {
        return None;
    }
    Some((raw[0], raw[1..21].to_vec()))
}

// MARK: - Bech32 / Bech32m

fn segwit_encode(witness_version: u8, program: &[u8]) -> SignerResult<String> {
    let version = bech32::u5::try_from_u8(witness_version)
        .map_err(|e| SignerError::SigningFailed(format!("Bech32 error: {}", e)))?;
    let converted = bech32::convert_bits(program, 8, 5, true)
        .map_err(|e| SignerError::SigningFailed(format!("Bech32 error: {}", e)))?;

    let mut data = Vec::with_capacity(1 + converted.len());
    data.push(version);
    for value in converted {
        let u5 = bech32::u5::try_from_u8(value)
            .map_err(|e| SignerError::SigningFailed(format!("Bech32 error: {}", e)))?;
        data.push(u5);
    }

    let variant = if witness_version == 0 {
        Variant::Bech32
    } else {
        Variant::Bech32m
    };
    bech32::encode(SEGWIT_HRP, data, variant)
        .map_err(|e| SignerError::SigningFailed(format!("Bech32 error: {}", e)))
}

fn segwit_decode(address: &str) -> Option<(u8, Vec<u8>)> {
    let (hrp, data, variant) = bech32::decode(address).ok()?;
    if hrp != SEGWIT_HRP || data.is_empty() {
        return None;
    }

    let version = data[0].to_u8();
    let program = bech32::convert_bits(&data[1..], 5, 8, false).ok()?;

    // BIP-350: v0 must use bech32, v1+ must use bech32m
    match (version, variant) {
        (0, Variant::Bech32) | (1, Variant::Bech32m) => Some((version, program)),
        _ => None,
    }
}
