//! Bitcoin CompactSize (varint) encoding

/// Append a CompactSize-encoded integer to `buf`
///
/// - < 0xfd: single byte
/// - <= 0xffff: 0xfd + u16 little-endian
/// - <= 0xffffffff: 0xfe + u32 little-endian
/// - otherwise: 0xff + u64 little-endian
pub fn encode_into(buf: &mut Vec<u8>, value: u64) {
    if value < 0xfd {
        buf.push(value as u8);
    } else if value <= 0xffff {
        buf.push(0xfd);
        buf.extend_from_slice(&(value as u16).to_le_bytes());
    } else if value <= 0xffff_ffff {
        buf.push(0xfe);
        buf.extend_from_slice(&(value as u32).to_le_bytes());
    } else {
        buf.push(0xff);
        buf.extend_from_slice(&value.to_le_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: u64) -> Vec<u8> {
        let mut buf = Vec::new();
        encode_into(&mut buf, value);
        buf
    }

    #[test]
    fn test_single_byte_range() {
        assert_eq!(encode(0), vec![0x00]);
        assert_eq!(encode(0xfc), vec![0xfc]);
    }

    #[test]
    fn test_u16_range() {
        assert_eq!(encode(0xfd), vec![0xfd, 0xfd, 0x00]);
        assert_eq!(encode(0xffff), vec![0xfd, 0xff, 0xff]);
    }

    #[test]
    fn test_u32_range() {
        assert_eq!(encode(0x10000), vec![0xfe, 0x00, 0x00, 0x01, 0x00]);
        assert_eq!(encode(0xffff_ffff), vec![0xfe, 0xff, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn test_u64_range() {
        assert_eq!(
            encode(0x1_0000_0000),
            vec![0xff, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]
        );
    }
}
