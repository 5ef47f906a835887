//! Validation input

use rov_common::{AddressFamily, Asn, InputError, Prefix};
use serde::{Deserialize, Serialize};

/// One announcement to validate
///
/// Constructing a query is the only place input is checked; resolvers take
/// its fields as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteQuery {
    /// Announced origin
    pub asn: Asn,
    /// Announced prefix
    pub prefix: Prefix,
    /// `false` requests an exact-match-only check
    pub full_check: bool,
}

impl RouteQuery {
    /// Full check of `prefix` originated by `asn`
    pub fn new(asn: Asn, prefix: Prefix) -> Self {
        Self {
            asn,
            prefix,
            full_check: true,
        }
    }

    /// Set the full check flag
    pub fn with_full_check(mut self, full_check: bool) -> Self {
        self.full_check = full_check;
        self
    }

    /// Build a query from raw parts, rejecting malformed input
    pub fn from_parts(
        asn: Option<Asn>,
        prefix: &[u8],
        prefix_length: u8,
        family: AddressFamily,
        full_check: bool,
    ) -> Result<Self, InputError> {
        let asn = asn.ok_or(InputError::MissingAsn)?;
        let prefix = Prefix::with_family(family, prefix.to_vec(), prefix_length)?;
        Ok(Self {
            asn,
            prefix,
            full_check,
        })
    }

    /// Address family of the announced prefix
    pub fn family(&self) -> AddressFamily {
        self.prefix.family()
    }

    /// Raw prefix bytes
    pub fn bytes(&self) -> &[u8] {
        self.prefix.bytes()
    }

    /// Prefix length
    pub fn length(&self) -> u8 {
        self.prefix.length()
    }
}
