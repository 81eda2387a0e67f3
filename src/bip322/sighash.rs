//! Sighash digests over the BIP-322 virtual transactions
//!
//! Three algorithms, selected by the address format being proven:
//! legacy (pre-segwit), BIP-143 witness v0, and BIP-341 Taproot key path.
//! All operate on the single-input single-output "to_sign" shape, so the
//! input index is always 0 and the spent amount is always 0.

use crate::encoding::compact_size;
use crate::hashes::{sha256, sha256d, tagged_hash};

use super::transaction::VirtualTransaction;

/// The only hash type used for message signatures
pub const SIGHASH_ALL: u8 = 0x01;

/// P2PKH-style script code for a 20-byte pubkey hash
///
/// BIP-143 uses this as the scriptCode for both P2WPKH and nested
/// P2SH-P2WPKH spends.
pub fn p2pkh_script_code(pubkey_hash: &[u8; 20]) -> Vec<u8> {
    crate::address::p2pkh_script(pubkey_hash)
}

/// Legacy sighash: splice the spent scriptPubKey into the scriptSig,
/// serialize, append the hash type and double-SHA256
pub fn legacy(to_sign: &VirtualTransaction, script_pubkey: &[u8]) -> [u8; 32] {
    let mut tx = to_sign.clone();
    tx.inputs[0].script_sig = script_pubkey.to_vec();

    let mut preimage = tx.serialize();
    preimage.extend_from_slice(&u32::from(SIGHASH_ALL).to_le_bytes());
    sha256d(&preimage)
}

/// BIP-143 witness v0 sighash for input 0
pub fn segwit_v0(to_sign: &VirtualTransaction, script_code: &[u8], amount: u64) -> [u8; 32] {
    let input = &to_sign.inputs[0];

    let mut prevouts = Vec::with_capacity(36);
    prevouts.extend_from_slice(&input.prev_txid);
    prevouts.extend_from_slice(&input.prev_vout.to_le_bytes());

    let sequences = input.sequence.to_le_bytes();

    let mut outputs = Vec::new();
    for output in &to_sign.outputs {
        outputs.extend_from_slice(&output.value.to_le_bytes());
        compact_size::encode_into(&mut outputs, output.script_pubkey.len() as u64);
        outputs.extend_from_slice(&output.script_pubkey);
    }

    let mut preimage = Vec::with_capacity(160 + script_code.len());
    preimage.extend_from_slice(&to_sign.version.to_le_bytes());
    preimage.extend_from_slice(&sha256d(&prevouts));
    preimage.extend_from_slice(&sha256d(&sequences));
    preimage.extend_from_slice(&input.prev_txid);
    preimage.extend_from_slice(&input.prev_vout.to_le_bytes());
    compact_size::encode_into(&mut preimage, script_code.len() as u64);
    preimage.extend_from_slice(script_code);
    preimage.extend_from_slice(&amount.to_le_bytes());
    preimage.extend_from_slice(&input.sequence.to_le_bytes());
    preimage.extend_from_slice(&sha256d(&outputs));
    preimage.extend_from_slice(&to_sign.locktime.to_le_bytes());
    preimage.extend_from_slice(&u32::from(SIGHASH_ALL).to_le_bytes());

    sha256d(&preimage)
}

/// BIP-341 Taproot key-path sighash for input 0
///
/// `prevout_script` and `amount` describe the single spent output. The
/// intermediate field hashes use single SHA256, and the final digest is
/// tagged with "TapSighash".
pub fn taproot_key_path(
    to_sign: &VirtualTransaction,
    prevout_script: &[u8],
    amount: u64,
    hash_type: u8,
) -> [u8; 32] {
    let input = &to_sign.inputs[0];

    let mut prevouts = Vec::with_capacity(36);
    prevouts.extend_from_slice(&input.prev_txid);
    prevouts.extend_from_slice(&input.prev_vout.to_le_bytes());

    let amounts = amount.to_le_bytes();

    let mut scriptpubkeys = Vec::with_capacity(1 + prevout_script.len());
    compact_size::encode_into(&mut scriptpubkeys, prevout_script.len() as u64);
    scriptpubkeys.extend_from_slice(prevout_script);

    let sequences = input.sequence.to_le_bytes();

    let mut outputs = Vec::new();
    for output in &to_sign.outputs {
        outputs.extend_from_slice(&output.value.to_le_bytes());
        compact_size::encode_into(&mut outputs, output.script_pubkey.len() as u64);
        outputs.extend_from_slice(&output.script_pubkey);
    }

    let mut message = Vec::with_capacity(192);
    message.push(0x00); // epoch
    message.push(hash_type);
    message.extend_from_slice(&to_sign.version.to_le_bytes());
    message.extend_from_slice(&to_sign.locktime.to_le_bytes());
    message.extend_from_slice(&sha256(&prevouts));
    message.extend_from_slice(&sha256(&amounts));
    message.extend_from_slice(&sha256(&scriptpubkeys));
    message.extend_from_slice(&sha256(&sequences));
    message.extend_from_slice(&sha256(&outputs));
    message.push(0x00); // spend type: key path, no annex
    message.extend_from_slice(&0u32.to_le_bytes());

    tagged_hash("TapSighash", &message)
}
