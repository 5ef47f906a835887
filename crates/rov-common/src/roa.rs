//! ROA (Route Origin Authorization) records
//!
//! Produced by the RPKI object pipeline once a ROA has been verified; the
//! validator only ever reads them.

use crate::arithmetic::is_aligned;
use crate::error::InvariantViolation;
use crate::prefix::{self, AddressFamily, Prefix};
use crate::Asn;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated ROA payload
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Roa {
    /// Authorized origin
    pub asn: Asn,
    /// Start address of the authorized prefix
    #[serde(with = "prefix::ip_bytes")]
    pub start: Vec<u8>,
    /// Length of the authorized prefix
    pub prefix_length: u8,
    /// Longest announcement the ROA authorizes
    pub max_length: u8,
    /// Address family of `start`
    pub family: AddressFamily,
}

impl Roa {
    /// Create ROA with validation
    ///
    /// `max_length` defaults to the prefix length.
    pub fn new(asn: Asn, prefix: &Prefix, max_length: Option<u8>) -> Result<Self, InvariantViolation> {
        let roa = Self {
            asn,
            start: prefix.bytes().to_vec(),
            prefix_length: prefix.length(),
            max_length: max_length.unwrap_or(prefix.length()),
            family: prefix.family(),
        };
        roa.check()?;
        Ok(roa)
    }

    /// Check the record invariants
    ///
    /// # Invariants
    /// - `start` width matches `family`
    /// - `prefix_length <= max_length <= width`
    /// - `start` has no bits set past `prefix_length`
    pub fn check(&self) -> Result<(), InvariantViolation> {
        if self.start.len() != self.family.byte_len() {
            return Err(InvariantViolation::FamilyMismatch {
                family: self.family,
                len: self.start.len(),
            });
        }

        let width = self.family.max_length();
        if self.prefix_length > width {
            return Err(InvariantViolation::LengthOutOfRange {
                length: self.prefix_length,
                max: width,
            });
        }
        if self.max_length > width {
            return Err(InvariantViolation::LengthOutOfRange {
                length: self.max_length,
                max: width,
            });
        }
        if self.max_length < self.prefix_length {
            return Err(InvariantViolation::MaxLengthBelowLength {
                length: self.prefix_length,
                max_length: self.max_length,
            });
        }
        if !is_aligned(&self.start, self.prefix_length) {
            return Err(InvariantViolation::HostBitsSet {
                length: self.prefix_length,
            });
        }

        Ok(())
    }

    /// Authorized prefix
    pub fn prefix(&self) -> Result<Prefix, InvariantViolation> {
        self.check()?;
        Prefix::new(self.start.clone(), self.prefix_length)
            .map_err(|_| InvariantViolation::UnknownFamily { len: self.start.len() })
    }
}

impl fmt::Display for Roa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match prefix::bytes_to_ip(&self.start) {
            Some(ip) => write!(
                f,
                "AS{} {}/{}-{}",
                self.asn, ip, self.prefix_length, self.max_length
            ),
            None => write!(f, "AS{} <{} bytes>/{}", self.asn, self.start.len(), self.prefix_length),
        }
    }
}
