//! Integer view of pattern literals, used for counter arithmetic.
//!
//! Address literals map onto fixed-width unsigned integers (IPv4: 32 bits, MAC: 48 bits,
//! IPv6: 128 bits); integer fields use their declared bit width. Arithmetic wraps modulo
//! 2^width.

use crate::constraint::Format;
use byteorder::{BigEndian, ByteOrder};
use std::net::{Ipv4Addr, Ipv6Addr};

/// Bit width of a format's integer view.
pub fn width(format: Format) -> u32 {
    match format {
        Format::Uint { bits } | Format::Int { bits } => bits,
        Format::Ipv4 => 32,
        Format::Mac => 48,
        Format::Ipv6 => 128,
        Format::Oid => 0,
    }
}

fn mask(bits: u32) -> u128 {
    if bits >= 128 {
        u128::MAX
    } else {
        (1u128 << bits) - 1
    }
}

/// `base ± step * n`, wrapped to `bits`.
pub fn offset(base: u128, step: u128, n: u32, up: bool, bits: u32) -> u128 {
    let delta = step.wrapping_mul(n as u128);
    let r = if up {
        base.wrapping_add(delta)
    } else {
        base.wrapping_sub(delta)
    };
    r & mask(bits)
}

pub fn parse_ipv4(s: &str) -> Option<u32> {
    let mut octets = [0u8; 4];
    let mut parts = s.split('.');
    for o in octets.iter_mut() {
        *o = parts.next()?.parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(u32::from(Ipv4Addr::from(octets)))
}

pub fn format_ipv4(n: u32) -> String {
    Ipv4Addr::from(n).to_string()
}

pub fn parse_ipv6(s: &str) -> Option<u128> {
    s.parse::<Ipv6Addr>().ok().map(u128::from)
}

pub fn format_ipv6(n: u128) -> String {
    Ipv6Addr::from(n).to_string()
}

pub fn parse_mac(s: &str) -> Option<u64> {
    let mut buf = [0u8; 6];
    let mut parts = s.split(':');
    for b in buf.iter_mut() {
        let part = parts.next()?;
        if part.is_empty() || part.len() > 2 {
            return None;
        }
        *b = u8::from_str_radix(part, 16).ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(BigEndian::read_u48(&buf))
}

pub fn format_mac(n: u64) -> String {
    let mut buf = [0u8; 6];
    BigEndian::write_u48(&mut buf, n & 0xffff_ffff_ffff);
    buf.iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}

/// Parse a textual literal into its integer view.
pub fn literal_to_wide(s: &str, format: Format) -> Option<u128> {
    match format {
        Format::Ipv4 => parse_ipv4(s).map(u128::from),
        Format::Ipv6 => parse_ipv6(s),
        Format::Mac => parse_mac(s).map(u128::from),
        _ => None,
    }
}

/// Render an integer view back into a textual literal.
pub fn wide_to_literal(n: u128, format: Format) -> Option<String> {
    match format {
        Format::Ipv4 => Some(format_ipv4(n as u32)),
        Format::Ipv6 => Some(format_ipv6(n)),
        Format::Mac => Some(format_mac(n as u64)),
        _ => None,
    }
}

/// Two's complement view of a signed value within `bits`.
pub fn signed_to_wide(v: i64, bits: u32) -> u128 {
    (v as i128 as u128) & mask(bits)
}

/// Sign-extend a `bits` wide value. A width of 0 or above 64 is read as plain 64-bit.
pub fn wide_to_signed(n: u128, bits: u32) -> i64 {
    if bits == 0 || bits > 64 {
        return n as i64;
    }
    let n = n & mask(bits);
    let sign = 1u128 << (bits - 1);
    if n & sign != 0 {
        (n as i128 - (1i128 << bits)) as i64
    } else {
        n as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv4_carries_across_octets() {
        let base = parse_ipv4("10.0.0.255").unwrap() as u128;
        let one = parse_ipv4("0.0.0.1").unwrap() as u128;
        assert_eq!(format_ipv4(offset(base, one, 1, true, 32) as u32), "10.0.1.0");
        assert_eq!(format_ipv4(offset(0, one, 1, false, 32) as u32), "255.255.255.255");
    }

    #[test]
    fn mac_round_trip_and_wrap() {
        let n = parse_mac("00:00:00:00:00:ff").unwrap();
        assert_eq!(format_mac(n + 1), "00:00:00:00:01:00");
        let top = parse_mac("ff:ff:ff:ff:ff:ff").unwrap() as u128;
        assert_eq!(format_mac(offset(top, 1, 1, true, 48) as u64), "00:00:00:00:00:00");
        assert!(parse_mac("00:00:00:00:00").is_none());
    }

    #[test]
    fn ipv6_compressed_output() {
        let step = parse_ipv6("::1").unwrap();
        assert_eq!(format_ipv6(offset(0, step, 2, true, 128)), "::2");
        assert_eq!(format_ipv6(offset(0, step, 1, false, 128)), "ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff");
    }

    #[test]
    fn signed_wrap_within_width() {
        let max = signed_to_wide(127, 8);
        assert_eq!(wide_to_signed(offset(max, 1, 1, true, 8), 8), -128);
        assert_eq!(wide_to_signed(signed_to_wide(-1, 8), 8), -1);
        assert_eq!(wide_to_signed(signed_to_wide(i32::MIN as i64, 32), 32), i32::MIN as i64);
    }

    #[test]
    fn degenerate_widths_do_not_overflow() {
        assert_eq!(wide_to_signed(5, 0), 5);
        assert_eq!(wide_to_signed(u64::MAX as u128, 64), -1);
        assert_eq!(wide_to_signed(7, 96), 7);
        assert_eq!(signed_to_wide(-1, 0), 0);
    }
}
