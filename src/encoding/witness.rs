//! Simplified witness-stack codec
//!
//! A stack is `count:u8` followed by `count` items, each `len:u8` + data.
//! This is the envelope format for BIP-322 signatures here, not a fully
//! general consensus witness: item lengths above 252 are out of scope
//! (signatures and public keys are far below that).

/// Encode a witness stack as a length-prefixed byte blob
///
/// Every item must be at most 252 bytes.
pub fn encode(items: &[Vec<u8>]) -> Vec<u8> {
    debug_assert!(items.len() <= 0xfc);
    let mut out = Vec::with_capacity(1 + items.iter().map(|i| 1 + i.len()).sum::<usize>());
    out.push(items.len() as u8);
    for item in items {
        debug_assert!(item.len() <= 0xfc);
        out.push(item.len() as u8);
        out.extend_from_slice(item);
    }
    out
}

/// Decode a witness stack, bound-checking every length
///
/// Returns `None` on any overrun, on reserved length prefixes and on
/// trailing bytes past the declared items.
pub fn decode(bytes: &[u8]) -> Option<Vec<Vec<u8>>> {
    let (&count, mut rest) = bytes.split_first()?;
    if count > 0xfc {
        return None;
    }

    let mut items = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let (&len, tail) = rest.split_first()?;
        if len > 0xfc || tail.len() < len as usize {
            return None;
        }
        let (item, tail) = tail.split_at(len as usize);
        items.push(item.to_vec());
        rest = tail;
    }

    if !rest.is_empty() {
        return None;
    }
    Some(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let items = vec![vec![0xde, 0xad], vec![], vec![0x01; 72]];
        let encoded = encode(&items);
        assert_eq!(decode(&encoded), Some(items));
    }

    #[test]
    fn test_empty_stack() {
        assert_eq!(decode(&[0x00]), Some(vec![]));
        assert_eq!(encode(&[]), vec![0x00]);
    }

    #[test]
    fn test_truncated_rejected() {
        let encoded = encode(&[vec![0xaa; 10], vec![0xbb; 33]]);
        for cut in 0..encoded.len() {
            assert_eq!(decode(&encoded[..cut]), None, "cut at {}", cut);
        }
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut encoded = encode(&[vec![0x01, 0x02]]);
        encoded.push(0xff);
        assert_eq!(decode(&encoded), None);
    }

    #[test]
    fn test_item_length_overrun_rejected() {
        // claims a 5-byte item but only 2 bytes follow
        assert_eq!(decode(&[0x01, 0x05, 0xaa, 0xbb]), None);
        // claims two items but only one is present
        assert_eq!(decode(&[0x02, 0x01, 0xaa]), None);
    }

    #[test]
    fn test_reserved_length_rejected() {
        assert_eq!(decode(&[0x01, 0xfd, 0x00]), None);
        assert_eq!(decode(&[0xfd]), None);
    }
}
