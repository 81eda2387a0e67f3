//! Primitive byte codecs
//!
//! Pure, stateless transforms used by the transaction serializer and the
//! signature envelopes: CompactSize varints, DER ECDSA signatures and the
//! simplified witness-stack blob format.

pub mod compact_size;
pub mod der;
pub mod witness;
