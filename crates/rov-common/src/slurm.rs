//! SLURM (RFC 8416) local overrides
//!
//! Assertions act as additional locally trusted ROAs. Filters suppress
//! conclusions for an ASN, a prefix block, or both; an absent field matches
//! anything.

use crate::arithmetic::{end_of_filter_range, end_of_range, is_aligned};
use crate::error::InvariantViolation;
use crate::prefix::{self, AddressFamily, Prefix};
use crate::Asn;
use serde::{Deserialize, Serialize};
use std::fmt;

/// SLURM record kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlurmKind {
    /// Validation output filter
    Filter,
    /// Locally added assertion
    Assertion,
}

/// SLURM prefix filter or assertion
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlurmPrefix {
    /// Origin ASN (required for assertions)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asn: Option<Asn>,
    /// Start address
    #[serde(default, with = "prefix::ip_bytes_opt", skip_serializing_if = "Option::is_none")]
    pub start: Option<Vec<u8>>,
    /// Prefix length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix_length: Option<u8>,
    /// Max length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u8>,
    /// Derived end address, see [`SlurmPrefix::derive_end`]
    #[serde(default, with = "prefix::ip_bytes_opt", skip_serializing_if = "Option::is_none")]
    pub end: Option<Vec<u8>>,
    /// Filter or assertion
    pub kind: SlurmKind,
    /// Operator comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl SlurmPrefix {
    /// Create assertion with validation
    ///
    /// `max_length` defaults to the prefix length.
    pub fn assertion(
        asn: Asn,
        prefix: &Prefix,
        max_length: Option<u8>,
        comment: Option<String>,
    ) -> Result<Self, InvariantViolation> {
        let mut record = Self {
            asn: Some(asn),
            start: Some(prefix.bytes().to_vec()),
            prefix_length: Some(prefix.length()),
            max_length: Some(max_length.unwrap_or(prefix.length())),
            end: None,
            kind: SlurmKind::Assertion,
            comment,
        };
        record.check()?;
        record.end = record.derive_end();
        Ok(record)
    }

    /// Create filter with validation
    ///
    /// At least one of `asn` and `prefix` must be present.
    pub fn filter(
        asn: Option<Asn>,
        prefix: Option<&Prefix>,
        max_length: Option<u8>,
        comment: Option<String>,
    ) -> Result<Self, InvariantViolation> {
        let mut record = Self {
            asn,
            start: prefix.map(|p| p.bytes().to_vec()),
            prefix_length: prefix.map(Prefix::length),
            max_length,
            end: None,
            kind: SlurmKind::Filter,
            comment,
        };
        record.check()?;
        record.end = record.derive_end();
        Ok(record)
    }

    /// Is this an assertion
    pub fn is_assertion(&self) -> bool {
        self.kind == SlurmKind::Assertion
    }

    /// Address family of the prefix, if any
    pub fn family(&self) -> Option<AddressFamily> {
        self.start
            .as_deref()
            .and_then(|s| AddressFamily::from_byte_len(s.len()))
    }

    /// Prefix, if the record carries one
    pub fn prefix(&self) -> Option<Prefix> {
        let start = self.start.clone()?;
        Prefix::new(start, self.prefix_length?).ok()
    }

    /// Effective max length: the declared one, else the prefix length
    pub fn effective_max_length(&self) -> Option<u8> {
        self.max_length.or(self.prefix_length)
    }

    /// End address of the block this record covers
    ///
    /// Assertions end at `end_of_range(start, max_length)`. A filter matches
    /// anywhere inside its prefix, so its end is widened from the prefix
    /// length; a filter max length only caps the announcement length.
    pub fn derive_end(&self) -> Option<Vec<u8>> {
        let start = self.start.as_deref()?;
        let length = self.prefix_length?;
        let end = end_of_range(start, self.effective_max_length()?);

        match self.kind {
            SlurmKind::Filter => Some(end_of_filter_range(start, length, &end)),
            SlurmKind::Assertion => Some(end),
        }
    }

    /// Check the record invariants
    pub fn check(&self) -> Result<(), InvariantViolation> {
        match self.kind {
            SlurmKind::Assertion => {
                if self.asn.is_none() || self.start.is_none() || self.prefix_length.is_none() {
                    return Err(InvariantViolation::IncompleteAssertion);
                }
            }
            SlurmKind::Filter => {
                if self.asn.is_none() && self.start.is_none() {
                    return Err(InvariantViolation::EmptyFilter);
                }
            }
        }

        let start = match (&self.start, self.prefix_length) {
            (Some(start), Some(_)) => start,
            (None, None) => return Ok(()),
            _ => return Err(InvariantViolation::MissingPrefixLength),
        };

        let family = AddressFamily::from_byte_len(start.len())
            .ok_or(InvariantViolation::UnknownFamily { len: start.len() })?;
        let width = family.max_length();

        let length = self.prefix_length.unwrap_or_default();
        if length > width {
            return Err(InvariantViolation::LengthOutOfRange { length, max: width });
        }

        if let Some(max_length) = self.max_length {
            if max_length > width {
                return Err(InvariantViolation::LengthOutOfRange {
                    length: max_length,
                    max: width,
                });
            }
            if max_length < length {
                return Err(InvariantViolation::MaxLengthBelowLength { length, max_length });
            }
        }
        if !is_aligned(start, length) {
            return Err(InvariantViolation::HostBitsSet { length });
        }

        Ok(())
    }
}

impl fmt::Display for SlurmPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            SlurmKind::Filter => "filter",
            SlurmKind::Assertion => "assertion",
        };
        write!(f, "{}", kind)?;
        if let Some(asn) = self.asn {
            write!(f, " AS{}", asn)?;
        }
        if let Some(prefix) = self.prefix() {
            write!(f, " {}", prefix)?;
            if let Some(max_length) = self.max_length {
                write!(f, "-{}", max_length)?;
            }
        }
        Ok(())
    }
}
