//! Prefix value objects
//!
//! [`Prefix`] is self-validating: once constructed its byte width names an
//! address family and its length fits inside that width.

use crate::arithmetic::{end_of_range, is_aligned, is_prefix_in_range};
use crate::error::InputError;
use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Address family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressFamily {
    /// 4-byte addresses
    Ipv4,
    /// 16-byte addresses
    Ipv6,
}

impl AddressFamily {
    /// Address width in bytes
    #[inline]
    pub const fn byte_len(self) -> usize {
        match self {
            AddressFamily::Ipv4 => 4,
            AddressFamily::Ipv6 => 16,
        }
    }

    /// Address width in bits
    #[inline]
    pub const fn max_length(self) -> u8 {
        match self {
            AddressFamily::Ipv4 => 32,
            AddressFamily::Ipv6 => 128,
        }
    }

    /// Family for a raw address of `len` bytes
    pub const fn from_byte_len(len: usize) -> Option<Self> {
        match len {
            4 => Some(AddressFamily::Ipv4),
            16 => Some(AddressFamily::Ipv6),
            _ => None,
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::Ipv4 => write!(f, "IPv4"),
            AddressFamily::Ipv6 => write!(f, "IPv6"),
        }
    }
}

/// IP prefix (Value Object)
///
/// # Invariants
/// - `bytes` is 4 or 16 bytes long
/// - `length` is at most the address width
/// - no bit past `length` is set
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Prefix {
    bytes: Vec<u8>,
    length: u8,
}

impl Prefix {
    /// Create prefix with validation
    pub fn new(bytes: impl Into<Vec<u8>>, length: u8) -> Result<Self, InputError> {
        let bytes = bytes.into();
        let family = AddressFamily::from_byte_len(bytes.len())
            .ok_or(InputError::InvalidPrefixBytes(bytes.len()))?;

        if length > family.max_length() {
            return Err(InputError::PrefixLengthOutOfRange {
                length,
                max: family.max_length(),
            });
        }
        if !is_aligned(&bytes, length) {
            return Err(InputError::HostBitsSet { length });
        }

        Ok(Self { bytes, length })
    }

    /// Create prefix, additionally checking the declared family
    pub fn with_family(
        family: AddressFamily,
        bytes: impl Into<Vec<u8>>,
        length: u8,
    ) -> Result<Self, InputError> {
        let bytes = bytes.into();
        if AddressFamily::from_byte_len(bytes.len()).is_some() && family.byte_len() != bytes.len() {
            return Err(InputError::FamilyMismatch {
                family,
                len: bytes.len(),
            });
        }
        Self::new(bytes, length)
    }

    /// Create prefix from an address
    pub fn from_ip(addr: IpAddr, length: u8) -> Result<Self, InputError> {
        Self::new(ip_to_bytes(addr), length)
    }

    /// Address family
    pub fn family(&self) -> AddressFamily {
        if self.bytes.len() == 4 {
            AddressFamily::Ipv4
        } else {
            AddressFamily::Ipv6
        }
    }

    /// Start address bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length in bits
    pub fn length(&self) -> u8 {
        self.length
    }

    /// Start address
    pub fn addr(&self) -> IpAddr {
        bytes_to_ip(&self.bytes).unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
    }

    /// Highest address of the block
    pub fn end(&self) -> Vec<u8> {
        end_of_range(&self.bytes, self.length)
    }

    /// Whether `other` is equal to or more specific than this prefix
    pub fn contains(&self, other: &Prefix) -> bool {
        other.length >= self.length && is_prefix_in_range(&other.bytes, &self.bytes, self.length)
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr(), self.length)
    }
}

impl FromStr for Prefix {
    type Err = InputError;

    /// Parse CIDR notation; host bits are cleared.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let network: IpNetwork = s
            .trim()
            .parse()
            .map_err(|e| InputError::MalformedPrefix(format!("{}: {}", s.trim(), e)))?;
        Self::from_ip(network.network(), network.prefix())
    }
}

impl TryFrom<String> for Prefix {
    type Error = InputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Prefix> for String {
    fn from(prefix: Prefix) -> Self {
        prefix.to_string()
    }
}

/// Raw network-order bytes of an address
pub fn ip_to_bytes(addr: IpAddr) -> Vec<u8> {
    match addr {
        IpAddr::V4(v4) => v4.octets().to_vec(),
        IpAddr::V6(v6) => v6.octets().to_vec(),
    }
}

/// Address for raw bytes, if they are 4 or 16 bytes long
pub fn bytes_to_ip(bytes: &[u8]) -> Option<IpAddr> {
    if let Ok(v4) = <[u8; 4]>::try_from(bytes) {
        return Some(IpAddr::V4(Ipv4Addr::from(v4)));
    }
    <[u8; 16]>::try_from(bytes)
        .ok()
        .map(|v6| IpAddr::V6(Ipv6Addr::from(v6)))
}

/// Serialize raw address bytes as an address string
pub mod ip_bytes {
    use super::{bytes_to_ip, ip_to_bytes};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::net::IpAddr;

    /// Serialize as text when the width is valid, raw bytes otherwise
    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        match bytes_to_ip(bytes) {
            Some(ip) => serializer.collect_str(&ip),
            None => serializer.serialize_bytes(bytes),
        }
    }

    /// Deserialize from an address string
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        let ip: IpAddr = text.parse().map_err(D::Error::custom)?;
        Ok(ip_to_bytes(ip))
    }
}

/// [`ip_bytes`] for optional fields
pub mod ip_bytes_opt {
    use super::{bytes_to_ip, ip_to_bytes};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::net::IpAddr;

    /// Serialize as an optional address string
    pub fn serialize<S: Serializer>(
        bytes: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let text = bytes
            .as_deref()
            .and_then(bytes_to_ip)
            .map(|ip| ip.to_string());
        text.serialize(serializer)
    }

    /// Deserialize from an optional address string
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        let text: Option<String> = Option::deserialize(deserializer)?;
        text.map(|t| {
            t.parse::<IpAddr>()
                .map(ip_to_bytes)
                .map_err(D::Error::custom)
        })
        .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_v4() {
        let prefix: Prefix = "10.0.0.0/24".parse().unwrap();
        assert_eq!(prefix.bytes(), &[10, 0, 0, 0]);
        assert_eq!(prefix.length(), 24);
        assert_eq!(prefix.family(), AddressFamily::Ipv4);
        assert_eq!(prefix.to_string(), "10.0.0.0/24");
    }

    #[test]
    fn test_parse_clears_host_bits() {
        let prefix: Prefix = "10.0.0.77/24".parse().unwrap();
        assert_eq!(prefix.bytes(), &[10, 0, 0, 0]);
    }

    #[test]
    fn test_parse_v6() {
        let prefix: Prefix = "2001:db8::/32".parse().unwrap();
        assert_eq!(prefix.family(), AddressFamily::Ipv6);
        assert_eq!(prefix.bytes().len(), 16);
        assert_eq!(prefix.to_string(), "2001:db8::/32");
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(
            "10.0.0.0/33".parse::<Prefix>(),
            Err(InputError::MalformedPrefix(_))
        ));
        assert!(matches!(
            "not-a-prefix".parse::<Prefix>(),
            Err(InputError::MalformedPrefix(_))
        ));
    }

    #[test]
    fn test_new_validation() {
        assert_eq!(
            Prefix::new(vec![10, 0, 0], 8),
            Err(InputError::InvalidPrefixBytes(3))
        );
        assert_eq!(
            Prefix::new(vec![10, 0, 0, 0], 33),
            Err(InputError::PrefixLengthOutOfRange { length: 33, max: 32 })
        );
        assert!(Prefix::new(vec![0u8; 16], 128).is_ok());
    }

    #[test]
    fn test_new_rejects_host_bits() {
        assert_eq!(
            Prefix::new(vec![10, 0, 0, 5], 24),
            Err(InputError::HostBitsSet { length: 24 })
        );
        assert!(Prefix::new(vec![10, 0, 0, 5], 32).is_ok());

        let mut v6 = vec![0x20, 0x01, 0x0d, 0xb8];
        v6.resize(16, 0);
        v6[6] = 1;
        assert_eq!(
            Prefix::new(v6, 32),
            Err(InputError::HostBitsSet { length: 32 })
        );
    }

    #[test]
    fn test_family_mismatch() {
        assert_eq!(
            Prefix::with_family(AddressFamily::Ipv6, vec![10, 0, 0, 0], 8),
            Err(InputError::FamilyMismatch {
                family: AddressFamily::Ipv6,
                len: 4
            })
        );
    }

    #[test]
    fn test_contains() {
        let agg: Prefix = "10.0.0.0/16".parse().unwrap();
        let more: Prefix = "10.0.3.0/24".parse().unwrap();
        assert!(agg.contains(&more));
        assert!(!more.contains(&agg));
        assert!(agg.contains(&agg));
    }

    #[test]
    fn test_serde_as_string() {
        let prefix: Prefix = "192.0.2.0/24".parse().unwrap();
        let json = serde_json::to_string(&prefix).unwrap();
        assert_eq!(json, "\"192.0.2.0/24\"");
        let back: Prefix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, prefix);
    }
}
