//! Error types for route origin validation

use crate::prefix::AddressFamily;
use thiserror::Error;

/// Malformed validation input, rejected before any lookup runs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Prefix byte length is neither 4 nor 16
    #[error("invalid prefix byte length: {0} (expected 4 or 16)")]
    InvalidPrefixBytes(usize),

    /// Declared address family disagrees with the prefix byte length
    #[error("address family {family} does not match {len}-byte prefix")]
    FamilyMismatch {
        /// Declared family
        family: AddressFamily,
        /// Actual byte length
        len: usize,
    },

    /// Prefix length outside `[0, width]`
    #[error("prefix length {length} out of range (max {max})")]
    PrefixLengthOutOfRange {
        /// Requested length
        length: u8,
        /// Address width in bits
        max: u8,
    },

    /// Address has bits set past the prefix length
    #[error("address has host bits set past /{length}")]
    HostBitsSet {
        /// Prefix length
        length: u8,
    },

    /// No origin ASN supplied
    #[error("origin ASN is required")]
    MissingAsn,

    /// Prefix text could not be parsed
    #[error("malformed prefix: {0}")]
    MalformedPrefix(String),
}

/// A stored ROA or SLURM record that breaks its own invariants
///
/// Never returned from a validation: offending records are skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// `max_length < prefix_length`
    #[error("max length {max_length} is below prefix length {length}")]
    MaxLengthBelowLength {
        /// Prefix length
        length: u8,
        /// Declared max length
        max_length: u8,
    },

    /// Address family disagrees with the start byte length
    #[error("address family {family} does not match {len}-byte start prefix")]
    FamilyMismatch {
        /// Declared family
        family: AddressFamily,
        /// Start byte length
        len: usize,
    },

    /// Start prefix is neither 4 nor 16 bytes
    #[error("start prefix of {len} bytes has no address family")]
    UnknownFamily {
        /// Start byte length
        len: usize,
    },

    /// A length exceeds the address width
    #[error("length {length} exceeds address width {max}")]
    LengthOutOfRange {
        /// Offending length
        length: u8,
        /// Address width in bits
        max: u8,
    },

    /// Start address has bits set past the prefix length
    #[error("start address has host bits set past /{length}")]
    HostBitsSet {
        /// Prefix length
        length: u8,
    },

    /// Start prefix without a prefix length, or the reverse
    #[error("prefix and prefix length must be given together")]
    MissingPrefixLength,

    /// Assertion lacks its ASN or prefix
    #[error("assertion requires asn, prefix and prefix length")]
    IncompleteAssertion,

    /// Filter carries neither ASN nor prefix
    #[error("filter requires an asn or a prefix")]
    EmptyFilter,
}

/// A lookup collaborator could not answer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Backing store unreachable
    #[error("lookup unavailable: {0}")]
    Unavailable(String),

    /// Backing store failed while answering
    #[error("storage error: {0}")]
    Storage(String),
}

/// Validation error surfaced to callers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RovError {
    /// Input rejected before any lookup
    #[error("invalid input: {0}")]
    Input(#[from] InputError),

    /// Lookup failure, propagated unmodified
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// Result type for route origin validation
pub type RovResult<T> = Result<T, RovError>;

/// Result type for lookup collaborators
pub type LookupResult<T> = Result<T, LookupError>;
