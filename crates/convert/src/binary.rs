//! Binary encodings used by the byte-array conversions
//!
//! # Formats
//!
//! - Decimal: 4-byte big-endian scale, then the unscaled value as minimal
//!   big-endian two's complement. Inputs shorter than five bytes, or with a
//!   scale above `i16::MAX`, are read as a plain integer instead.
//! - UUID: 16 bytes, most significant half first. Shorter inputs are
//!   zero-padded on the right, longer ones truncated.
//! - Text: standard Base64 with padding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bigdecimal::BigDecimal;
use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use num_bigint::BigInt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use uuid::Uuid;

/// Encode bytes as standard Base64
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode standard Base64 text
pub fn decode_base64(text: &str) -> Option<Vec<u8>> {
    STANDARD.decode(text).ok()
}

/// True when `text` is shaped like padded standard Base64
///
/// Only the alphabet and padding are checked; decoding may still fail.
pub fn looks_like_base64(text: &str) -> bool {
    if text.is_empty() || text.len() % 4 != 0 {
        return false;
    }
    let body = text.trim_end_matches('=');
    if text.len() - body.len() > 2 {
        return false;
    }
    body.bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/')
}

/// Encode a decimal as scale plus unscaled two's complement bytes
pub fn decimal_to_bytes(value: &BigDecimal) -> Vec<u8> {
    let (unscaled, scale) = value.as_bigint_and_exponent();
    let scale = scale.clamp(i32::MIN as i64, i32::MAX as i64) as i32;
    let digits = unscaled.to_signed_bytes_be();
    let mut out = Vec::with_capacity(4 + digits.len());
    // Writing into a Vec cannot fail
    let _ = out.write_i32::<BigEndian>(scale);
    out.extend_from_slice(&digits);
    out
}

/// Decode bytes produced by [`decimal_to_bytes`]
pub fn bytes_to_decimal(raw: &[u8]) -> BigDecimal {
    if raw.len() < 5 {
        return BigDecimal::from(BigInt::from_signed_bytes_be(raw));
    }
    let scale = BigEndian::read_i32(&raw[..4]);
    if scale > i16::MAX as i32 {
        return BigDecimal::from(BigInt::from_signed_bytes_be(raw));
    }
    let unscaled = BigInt::from_signed_bytes_be(&raw[4..]);
    if unscaled == BigInt::from(0) {
        return BigDecimal::from(0);
    }
    BigDecimal::new(unscaled, scale as i64)
}

/// Minimal big-endian two's complement bytes of an integer
pub fn integer_to_bytes(value: i64) -> Vec<u8> {
    BigInt::from(value).to_signed_bytes_be()
}

/// 16 big-endian bytes of a UUID
pub fn uuid_to_bytes(value: &Uuid) -> Vec<u8> {
    value.as_bytes().to_vec()
}

/// Build a UUID from up to 16 bytes, right-padding with zeros
pub fn bytes_to_uuid(raw: &[u8]) -> Uuid {
    let mut buf = [0u8; 16];
    for (slot, byte) in buf.iter_mut().zip(raw.iter()) {
        *slot = *byte;
    }
    Uuid::from_bytes(buf)
}

/// Most significant 64 bits of a UUID as a signed value
pub fn uuid_msb(value: &Uuid) -> i64 {
    value.as_u64_pair().0 as i64
}

/// Address octets in network order
pub fn address_to_bytes(addr: &IpAddr) -> Vec<u8> {
    match addr {
        IpAddr::V4(v4) => v4.octets().to_vec(),
        IpAddr::V6(v6) => v6.octets().to_vec(),
    }
}

/// Build an address from raw octets
///
/// Up to four bytes give an IPv4 address (zero-padded on the right);
/// anything longer is padded or truncated to an IPv6 address.
pub fn bytes_to_address(raw: &[u8]) -> IpAddr {
    if raw.len() <= 4 {
        let mut buf = [0u8; 4];
        buf[..raw.len()].copy_from_slice(raw);
        IpAddr::V4(Ipv4Addr::from(buf))
    } else {
        let mut buf = [0u8; 16];
        for (slot, byte) in buf.iter_mut().zip(raw.iter()) {
            *slot = *byte;
        }
        IpAddr::V6(Ipv6Addr::from(buf))
    }
}

/// IPv4 address from the low 32 bits of an integer
pub fn integer_to_address(value: i64) -> IpAddr {
    IpAddr::V4(Ipv4Addr::from(value as u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_base64_round_trip() {
        let encoded = encode_base64(&[1, 2, 3, 255]);
        assert_eq!(encoded, "AQID/w==");
        assert_eq!(decode_base64(&encoded), Some(vec![1, 2, 3, 255]));
    }

    #[test]
    fn test_looks_like_base64() {
        assert!(looks_like_base64("AQID/w=="));
        assert!(looks_like_base64("abcd"));
        assert!(!looks_like_base64("abc"));
        assert!(!looks_like_base64("ab c"));
        assert!(!looks_like_base64("a==="));
        assert!(!looks_like_base64(""));
    }

    #[test]
    fn test_decimal_bytes_layout() {
        let value = BigDecimal::from_str("32.56").unwrap();
        let bytes = decimal_to_bytes(&value);
        // scale 2, unscaled 3256 = 0x0CB8
        assert_eq!(bytes, vec![0, 0, 0, 2, 0x0C, 0xB8]);
        assert_eq!(bytes_to_decimal(&bytes), value);
    }

    #[test]
    fn test_decimal_bytes_negative() {
        let value = BigDecimal::from_str("-1.5").unwrap();
        assert_eq!(bytes_to_decimal(&decimal_to_bytes(&value)), value);
    }

    #[test]
    fn test_short_input_is_plain_integer() {
        assert_eq!(bytes_to_decimal(&[0x01, 0x00]), BigDecimal::from(256));
        assert_eq!(bytes_to_decimal(&[]), BigDecimal::from(0));
    }

    #[test]
    fn test_oversized_scale_is_plain_integer() {
        let raw = [0x00, 0x01, 0x00, 0x00, 0x01];
        assert_eq!(
            bytes_to_decimal(&raw),
            BigDecimal::from(BigInt::from_signed_bytes_be(&raw))
        );
    }

    #[test]
    fn test_zero_unscaled_is_zero() {
        assert_eq!(bytes_to_decimal(&[0, 0, 0, 3, 0]), BigDecimal::from(0));
    }

    #[test]
    fn test_uuid_bytes() {
        let id = Uuid::from_u64_pair(0x0102030405060708, 0x090A0B0C0D0E0F10);
        let bytes = uuid_to_bytes(&id);
        assert_eq!(bytes[0], 0x01);
        assert_eq!(bytes[15], 0x10);
        assert_eq!(bytes_to_uuid(&bytes), id);
        assert_eq!(uuid_msb(&id), 0x0102030405060708);
        assert_eq!(
            bytes_to_uuid(&[0xFF]),
            Uuid::from_u64_pair(0xFF00_0000_0000_0000, 0)
        );
    }

    #[test]
    fn test_address_bytes() {
        let v4: IpAddr = "127.0.0.1".parse().unwrap();
        assert_eq!(bytes_to_address(&address_to_bytes(&v4)), v4);
        let v6: IpAddr = "::1".parse().unwrap();
        assert_eq!(bytes_to_address(&address_to_bytes(&v6)), v6);
        assert_eq!(integer_to_address(2130706433), v4);
    }

    #[test]
    fn test_integer_to_bytes_minimal() {
        assert_eq!(integer_to_bytes(0), vec![0]);
        assert_eq!(integer_to_bytes(255), vec![0, 255]);
        assert_eq!(integer_to_bytes(-1), vec![255]);
    }
}
