//! DER encoding and decoding for ECDSA signatures
//!
//! DER structure for an ECDSA signature:
//!
//! ```text
//! 0x30 [total-length] 0x02 [R-length] [R] 0x02 [S-length] [S]
//! ```
//!
//! Internally r and s are always exact 32-byte scalars; DER varies the
//! encoded length by stripping leading zeros and re-adding a single 0x00
//! pad byte when the high bit is set. Decoding reverses this and left-pads
//! back to 32 bytes. Malformed input yields `None`, never a partial result.

/// Encode a 64-byte compact (r, s) pair as a minimal DER signature
pub fn encode(r: &[u8; 32], s: &[u8; 32]) -> Vec<u8> {
    let mut body = Vec::with_capacity(70);
    push_integer(&mut body, r);
    push_integer(&mut body, s);

    let mut out = Vec::with_capacity(2 + body.len());
    out.push(0x30);
    out.push(body.len() as u8);
    out.extend_from_slice(&body);
    out
}

fn push_integer(out: &mut Vec<u8>, scalar: &[u8; 32]) {
    let mut start = 0;
    while start < 31 && scalar[start] == 0 {
        start += 1;
    }

    let pad = scalar[start] & 0x80 != 0;
    let len = (32 - start) + usize::from(pad);

    out.push(0x02);
    out.push(len as u8);
    if pad {
        out.push(0x00);
    }
    out.extend_from_slice(&scalar[start..]);
}

/// Decode a DER signature back into exact 32-byte (r, s) scalars
///
/// Strict parse: sequence/integer tags, short-form lengths only (ECDSA
/// signatures never need long-form), exact total length, components at most
/// 33 bytes (one pad byte plus 32 significant bytes).
pub fn decode(bytes: &[u8]) -> Option<([u8; 32], [u8; 32])> {
    if bytes.len() < 8 || bytes[0] != 0x30 {
        return None;
    }
    let total = bytes[1] as usize;
    if bytes[1] & 0x80 != 0 || total + 2 != bytes.len() {
        return None;
    }

    let (r, rest) = read_integer(&bytes[2..])?;
    let (s, rest) = read_integer(rest)?;
    if !rest.is_empty() {
        return None;
    }
    Some((r, s))
}

fn read_integer(bytes: &[u8]) -> Option<([u8; 32], &[u8])> {
    if bytes.len() < 2 || bytes[0] != 0x02 {
        return None;
    }
    let len = bytes[1] as usize;
    if bytes[1] & 0x80 != 0 || len == 0 || len > 33 || bytes.len() < 2 + len {
        return None;
    }

    let mut component = &bytes[2..2 + len];
    // Drop pad bytes down to the 32 significant ones
    while component.len() > 32 {
        if component[0] != 0 {
            return None;
        }
        component = &component[1..];
    }

    let mut scalar = [0u8; 32];
    scalar[32 - component.len()..].copy_from_slice(component);
    Some((scalar, &bytes[2 + len..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_plain() {
        let r = [0x11u8; 32];
        let s = [0x22u8; 32];
        let der = encode(&r, &s);
        assert_eq!(decode(&der), Some((r, s)));
    }

    #[test]
    fn test_round_trip_high_bit_padding() {
        let mut r = [0u8; 32];
        r[0] = 0x80; // needs a 0x00 pad byte in DER
        let s = [0x01u8; 32];
        let der = encode(&r, &s);
        assert_eq!(der[3], 0x21); // 33-byte padded integer
        assert_eq!(decode(&der), Some((r, s)));
    }

    #[test]
    fn test_round_trip_leading_zeros() {
        let mut r = [0u8; 32];
        r[31] = 0x05; // encodes as a single byte
        let mut s = [0u8; 32];
        s[30] = 0x01;
        let der = encode(&r, &s);
        assert_eq!(der[3], 0x01);
        assert_eq!(decode(&der), Some((r, s)));
    }

    #[test]
    fn test_malformed_rejected() {
        let r = [0x11u8; 32];
        let s = [0x22u8; 32];
        let der = encode(&r, &s);

        // wrong sequence tag
        let mut bad = der.clone();
        bad[0] = 0x31;
        assert_eq!(decode(&bad), None);

        // wrong integer tag
        let mut bad = der.clone();
        bad[2] = 0x03;
        assert_eq!(decode(&bad), None);

        // truncated
        assert_eq!(decode(&der[..der.len() - 1]), None);

        // trailing garbage
        let mut bad = der.clone();
        bad.push(0x00);
        assert_eq!(decode(&bad), None);

        // empty / too short
        assert_eq!(decode(&[]), None);
        assert_eq!(decode(&[0x30, 0x00]), None);
    }

    #[test]
    fn test_oversized_component_rejected() {
        // 34-byte integer can never hold a valid 32-byte scalar
        let mut bad = vec![0x30, 0x26, 0x02, 0x22];
        bad.extend_from_slice(&[0x01; 34]);
        bad.extend_from_slice(&[0x02, 0x01, 0x01]);
        assert_eq!(decode(&bad), None);
    }
}
