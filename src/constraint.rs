//! Field constraints: literal syntax (IPv4, IPv6, MAC, OID) and bit-width ranges.
//!
//! Every check is a pure function returning `Err(message)` without location; callers append
//! ` on <Type>.<field>` when recording the failure in a [`Validation`](crate::validation::Validation).

use std::net::Ipv6Addr;

/// Syntax or numeric domain a field value must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Unsigned integer of `bits` width (1..=32).
    Uint { bits: u32 },
    /// Signed integer of `bits` width (1..=32).
    Int { bits: u32 },
    Ipv4,
    Ipv6,
    Mac,
    Oid,
}

impl Format {
    /// Inclusive numeric bounds for integer formats. `None` for textual formats and for
    /// a width outside 1..=32.
    pub fn bounds(self) -> Option<(i64, i64)> {
        match self {
            Format::Uint { bits } if (1..=32).contains(&bits) => Some((0, (1i64 << bits) - 1)),
            Format::Int { bits } if (1..=32).contains(&bits) => {
                Some((-(1i64 << (bits - 1)), (1i64 << (bits - 1)) - 1))
            }
            _ => None,
        }
    }
}

const OCTET_NAMES: [&str; 6] = ["0th", "1st", "2nd", "3rd", "4th", "5th"];

/// Dotted-quad IPv4 literal, each octet decimal 0..=255.
pub fn validate_ipv4(ip: &str) -> Result<(), String> {
    if ip.trim().is_empty() {
        return Err("IPv4 cannot be empty".to_string());
    }
    let octets: Vec<&str> = ip.split('.').collect();
    if octets.len() != 4 {
        return Err(format!("Invalid Ipv4 address {}", ip));
    }
    for octet in octets {
        if octet.is_empty() || !octet.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("Invalid Ipv4 address {}", ip));
        }
        match octet.parse::<u32>() {
            Ok(n) if n <= 255 => {}
            _ => return Err(format!("Invalid Ipv4 address {}", ip)),
        }
    }
    Ok(())
}

/// IPv6 literal in any RFC 4291 text form (compressed `::`, embedded IPv4 tail).
pub fn validate_ipv6(ip: &str) -> Result<(), String> {
    if ip.trim().is_empty() {
        return Err("IPv6 cannot be empty".to_string());
    }
    if !ip.contains(':') || ip.parse::<Ipv6Addr>().is_err() {
        return Err(format!("Invalid ipv6 address {}", ip));
    }
    Ok(())
}

/// Six colon-separated hex octets.
pub fn validate_mac(mac: &str) -> Result<(), String> {
    if mac.trim().is_empty() {
        return Err("Mac cannot be empty".to_string());
    }
    let octets: Vec<&str> = mac.split(':').collect();
    if octets.len() != 6 {
        return Err(format!("Invalid Mac address {}", mac));
    }
    for (i, octet) in octets.iter().enumerate() {
        let ok = !octet.is_empty()
            && octet.len() <= 2
            && u8::from_str_radix(octet, 16).is_ok();
        if !ok {
            return Err(format!(
                "Invalid Mac address at {} octet in {} mac",
                OCTET_NAMES[i], mac
            ));
        }
    }
    Ok(())
}

/// Object identifier: at least two dot-separated arcs, each a u32.
pub fn validate_oid(oid: &str) -> Result<(), String> {
    let arcs: Vec<&str> = oid.split('.').collect();
    if arcs.len() < 2 {
        return Err(format!("Invalid oid value {}", oid));
    }
    for arc in arcs {
        if arc.is_empty() || !arc.bytes().all(|b| b.is_ascii_digit()) || arc.parse::<u32>().is_err() {
            return Err(format!("Invalid oid value {}", oid));
        }
    }
    Ok(())
}

/// Inclusive range check.
pub fn check_range(value: i64, min: i64, max: i64) -> Result<(), String> {
    if value < min || value > max {
        return Err(format!("min {} max {} but got {}", min, max, value));
    }
    Ok(())
}

/// Check an integer against the bounds of an integer [`Format`].
pub fn check_bits(value: i64, format: Format) -> Result<(), String> {
    match format.bounds() {
        Some((min, max)) => check_range(value, min, max),
        None => Err(format!("{:?} has no integer range", format)),
    }
}

/// Check a string literal against a textual [`Format`].
pub fn check_literal(value: &str, format: Format) -> Result<(), String> {
    match format {
        Format::Ipv4 => validate_ipv4(value),
        Format::Ipv6 => validate_ipv6(value),
        Format::Mac => validate_mac(value),
        Format::Oid => validate_oid(value),
        Format::Uint { .. } | Format::Int { .. } => value
            .parse::<i64>()
            .map_err(|_| format!("{} is not an integer", value))
            .and_then(|n| check_bits(n, format)),
    }
}

/// List variant: one `(index, message)` per offending element, in index order.
pub fn check_each<T, F>(values: &[T], mut check: F) -> Vec<(usize, String)>
where
    F: FnMut(&T) -> Result<(), String>,
{
    values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| check(v).err().map(|e| (i, e)))
        .collect()
}

pub fn validate_ipv4_slice(values: &[String]) -> Vec<(usize, String)> {
    check_each(values, |v| validate_ipv4(v))
}

pub fn validate_ipv6_slice(values: &[String]) -> Vec<(usize, String)> {
    check_each(values, |v| validate_ipv6(v))
}

pub fn validate_mac_slice(values: &[String]) -> Vec<(usize, String)> {
    check_each(values, |v| validate_mac(v))
}

pub fn validate_oid_slice(values: &[String]) -> Vec<(usize, String)> {
    check_each(values, |v| validate_oid(v))
}
