//! Read-only lookup collaborators
//!
//! Implemented by whatever holds the ROA and SLURM record sets. Candidate
//! lists are pre-filtered by byte range only and are not authoritative:
//! resolvers re-check containment before trusting them.

use async_trait::async_trait;
use rov_common::{AddressFamily, Asn, LookupResult, Roa, SlurmPrefix};

/// ROA lookup
#[async_trait]
pub trait RoaLookup: Send + Sync {
    /// ROA with exactly this start prefix and length
    ///
    /// Several ROAs may share a prefix with different origins; this answers
    /// with one of them. Resolvers call [`RoaLookup::find_exact_matches`].
    async fn find_exact_match(&self, prefix: &[u8], length: u8) -> LookupResult<Option<Roa>>;

    /// Every ROA with exactly this start prefix and length
    ///
    /// Defaults to the single answer of [`RoaLookup::find_exact_match`].
    async fn find_exact_matches(&self, prefix: &[u8], length: u8) -> LookupResult<Vec<Roa>> {
        Ok(self.find_exact_match(prefix, length).await?.into_iter().collect())
    }

    /// ROAs that may cover the prefix at a coarser length
    async fn find_covering_aggregate_candidates(
        &self,
        prefix: &[u8],
        length: u8,
        family: AddressFamily,
    ) -> LookupResult<Vec<Roa>>;

    /// ROAs that may be nested inside the prefix
    async fn find_more_specific_candidates(
        &self,
        prefix: &[u8],
        length: u8,
        family: AddressFamily,
    ) -> LookupResult<Vec<Roa>>;

    /// Whether any ROA names this ASN, for any prefix
    async fn exists_for_asn(&self, asn: Asn) -> LookupResult<bool>;
}

/// SLURM lookup
#[async_trait]
pub trait SlurmLookup: Send + Sync {
    /// Assertion with exactly this start prefix and length
    async fn find_assertion_exact_match(
        &self,
        prefix: &[u8],
        length: u8,
    ) -> LookupResult<Option<SlurmPrefix>>;

    /// Every assertion with exactly this start prefix and length
    ///
    /// Defaults to the single answer of
    /// [`SlurmLookup::find_assertion_exact_match`].
    async fn find_assertion_exact_matches(
        &self,
        prefix: &[u8],
        length: u8,
    ) -> LookupResult<Vec<SlurmPrefix>> {
        Ok(self
            .find_assertion_exact_match(prefix, length)
            .await?
            .into_iter()
            .collect())
    }

    /// Assertions that may cover the prefix
    async fn find_assertion_covering_candidates(
        &self,
        prefix: &[u8],
        length: u8,
    ) -> LookupResult<Vec<SlurmPrefix>>;

    /// Assertions that may be nested inside the prefix
    async fn find_assertion_more_specific_candidates(
        &self,
        prefix: &[u8],
        length: u8,
    ) -> LookupResult<Vec<SlurmPrefix>>;

    /// First filter matching the ASN and/or prefix
    async fn find_filter_match(
        &self,
        asn: Asn,
        prefix: &[u8],
        length: u8,
    ) -> LookupResult<Option<SlurmPrefix>>;
}
