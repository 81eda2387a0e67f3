//! Virtual transaction construction and serialization
//!
//! BIP-322 defines two never-broadcast transactions. "to_spend" commits to
//! the message hash in its scriptSig and pays the signer's scriptPubKey;
//! "to_sign" spends that output into a single unspendable OP_RETURN. Both
//! are serialized by hand in consensus format (no witness data is included
//! in the txid serialization).

use crate::encoding::compact_size;
use crate::hashes::{sha256d, tagged_hash};

/// Domain-separation tag for BIP-322 message hashing
const MESSAGE_TAG: &str = "BIP0322-signed-message";

/// Hash a message under the BIP-322 tag
pub fn message_hash(message: &[u8]) -> [u8; 32] {
    tagged_hash(MESSAGE_TAG, message)
}

/// A transaction input in consensus serialization order
#[derive(Debug, Clone)]
pub struct TxInput {
    /// Previous txid in internal byte order
    pub prev_txid: [u8; 32],
    pub prev_vout: u32,
    pub script_sig: Vec<u8>,
    pub sequence: u32,
}

/// A transaction output
#[derive(Debug, Clone)]
pub struct TxOutput {
    pub value: u64,
    pub script_pubkey: Vec<u8>,
}

/// A minimal transaction, sufficient for the two BIP-322 shapes
#[derive(Debug, Clone)]
pub struct VirtualTransaction {
    pub version: u32,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    pub locktime: u32,
}

impl VirtualTransaction {
    /// Serialize in legacy consensus format
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(128);
        buf.extend_from_slice(&self.version.to_le_bytes());

        compact_size::encode_into(&mut buf, self.inputs.len() as u64);
        for input in &self.inputs {
            buf.extend_from_slice(&input.prev_txid);
            buf.extend_from_slice(&input.prev_vout.to_le_bytes());
            compact_size::encode_into(&mut buf, input.script_sig.len() as u64);
            buf.extend_from_slice(&input.script_sig);
            buf.extend_from_slice(&input.sequence.to_le_bytes());
        }

        compact_size::encode_into(&mut buf, self.outputs.len() as u64);
        for output in &self.outputs {
            buf.extend_from_slice(&output.value.to_le_bytes());
            compact_size::encode_into(&mut buf, output.script_pubkey.len() as u64);
            buf.extend_from_slice(&output.script_pubkey);
        }

        buf.extend_from_slice(&self.locktime.to_le_bytes());
        buf
    }

    /// Transaction id in internal byte order (reverse for display)
    pub fn txid(&self) -> [u8; 32] {
        sha256d(&self.serialize())
    }
}

/// Build the "to_spend" transaction for a message and scriptPubKey
///
/// Spends the null outpoint with a scriptSig of `OP_0 PUSH32 <message hash>`
/// and creates a zero-value output paying `script_pubkey`.
pub fn to_spend(script_pubkey: &[u8], message: &[u8]) -> VirtualTransaction {
    let hash = message_hash(message);
    let mut script_sig = Vec::with_capacity(34);
    script_sig.push(0x00);
    script_sig.push(0x20);
    script_sig.extend_from_slice(&hash);

    VirtualTransaction {
        version: 0,
        inputs: vec![TxInput {
            prev_txid: [0u8; 32],
            prev_vout: 0xffff_ffff,
            script_sig,
            sequence: 0,
        }],
        outputs: vec![TxOutput {
            value: 0,
            script_pubkey: script_pubkey.to_vec(),
        }],
        locktime: 0,
    }
}

/// Build the "to_sign" transaction spending `to_spend_txid` at index 0
///
/// The single output is an unspendable OP_RETURN with no payload.
pub fn to_sign(to_spend_txid: [u8; 32]) -> VirtualTransaction {
    VirtualTransaction {
        version: 0,
        inputs: vec![TxInput {
            prev_txid: to_spend_txid,
            prev_vout: 0,
            script_sig: Vec::new(),
            sequence: 0,
        }],
        outputs: vec![TxOutput {
            value: 0,
            script_pubkey: vec![0x6a],
        }],
        locktime: 0,
    }
}
