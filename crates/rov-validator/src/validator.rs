//! Route validator with tiered resolution
//!
//! Precedence is fixed: local assertions override filters, which override
//! anything derived from the ROA set (RFC 8416 §3 on top of RFC 6483 §2).

use crate::assertion::SlurmAssertionResolver;
use crate::filter::SlurmFilterResolver;
use crate::lookup::{RoaLookup, SlurmLookup};
use crate::query::RouteQuery;
use crate::roa::RoaResolver;
use rov_common::{AddressFamily, Asn, Resolution, RouteValidation, RovResult};
use std::sync::Arc;
use tracing::debug;

/// Route origin validator
///
/// Holds no mutable state: one instance can serve any number of concurrent
/// validations. All blocking happens inside the lookups.
#[derive(Clone)]
pub struct RouteValidator {
    roas: Arc<dyn RoaLookup>,
    slurm: Arc<dyn SlurmLookup>,
}

impl RouteValidator {
    /// Create validator over ROA and SLURM lookups
    pub fn new(roas: Arc<dyn RoaLookup>, slurm: Arc<dyn SlurmLookup>) -> Self {
        Self { roas, slurm }
    }

    /// Validate an announcement given as raw parts
    ///
    /// Malformed input is rejected with [`rov_common::InputError`] before any
    /// lookup runs. `full_check = false` requests an exact-match-only check.
    pub async fn validate(
        &self,
        asn: Asn,
        prefix: &[u8],
        prefix_length: u8,
        family: AddressFamily,
        full_check: bool,
    ) -> RovResult<RouteValidation> {
        let query = RouteQuery::from_parts(Some(asn), prefix, prefix_length, family, full_check)?;
        self.validate_query(&query).await
    }

    /// Validate a checked query
    pub async fn validate_query(&self, query: &RouteQuery) -> RovResult<RouteValidation> {
        if let Resolution::Verdict(v) = SlurmAssertionResolver::new(self.slurm.as_ref())
            .resolve(query)
            .await?
        {
            return Ok(v);
        }

        if let Resolution::Verdict(v) = SlurmFilterResolver::new(self.slurm.as_ref())
            .resolve(query)
            .await?
        {
            return Ok(v);
        }

        let verdict = RoaResolver::new(self.roas.as_ref()).resolve(query).await?;
        debug!(asn = query.asn, prefix = %query.prefix, %verdict, "validated");
        Ok(verdict)
    }

    /// Validate many queries, one result per query in input order
    pub async fn validate_all(&self, queries: &[RouteQuery]) -> Vec<RovResult<RouteValidation>> {
        let mut results = Vec::with_capacity(queries.len());
        for query in queries {
            results.push(self.validate_query(query).await);
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::store::{RoaStore, SlurmStore};
    use rov_common::{
        AsState, InputError, Prefix, PrefixState, Roa, RovError, SlurmPrefix, ValidityState,
    };

    fn prefix(s: &str) -> Prefix {
        s.parse().unwrap()
    }

    fn validator(roas: Vec<Roa>, slurm: Vec<SlurmPrefix>) -> RouteValidator {
        RouteValidator::new(
            Arc::new(RoaStore::with_records(StoreConfig::default(), roas)),
            Arc::new(SlurmStore::with_records(StoreConfig::default(), slurm)),
        )
    }

    #[tokio::test]
    async fn test_assertion_overrides_roa() {
        let p = prefix("10.0.0.0/24");
        let v = validator(
            vec![Roa::new(65001, &p, None).unwrap()],
            vec![SlurmPrefix::assertion(65002, &p, None, None).unwrap()],
        );

        let verdict = v
            .validate(65001, p.bytes(), p.length(), AddressFamily::Ipv4, true)
            .await
            .unwrap();
        assert_eq!(
            verdict.states(),
            (
                Some(ValidityState::Invalid),
                Some(PrefixState::MatchRoa),
                Some(AsState::NonMatching)
            )
        );
        assert!(verdict.matched_roa.is_none());
        assert_eq!(verdict.matched_slurm.and_then(|s| s.asn), Some(65002));
    }

    #[tokio::test]
    async fn test_filter_overrides_roa() {
        let p = prefix("10.0.0.0/24");
        let v = validator(
            vec![Roa::new(65003, &p, None).unwrap()],
            vec![SlurmPrefix::filter(Some(65003), Some(&p), None, None).unwrap()],
        );

        let verdict = v
            .validate(65003, p.bytes(), p.length(), AddressFamily::Ipv4, true)
            .await
            .unwrap();
        assert_eq!(
            verdict.states(),
            (
                Some(ValidityState::Unknown),
                Some(PrefixState::NonIntersecting),
                Some(AsState::NonMatching)
            )
        );
    }

    #[tokio::test]
    async fn test_rejects_malformed_input() {
        let v = validator(vec![], vec![]);
        let err = v
            .validate(65001, &[10, 0, 0], 24, AddressFamily::Ipv4, true)
            .await
            .unwrap_err();
        assert_eq!(err, RovError::Input(InputError::InvalidPrefixBytes(3)));

        let err = v
            .validate(65001, &[10, 0, 0, 0], 40, AddressFamily::Ipv4, true)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RovError::Input(InputError::PrefixLengthOutOfRange { length: 40, max: 32 })
        ));
    }

    #[tokio::test]
    async fn test_rejects_host_bits_before_lookup() {
        // 10.0.0.5/24 would otherwise read as a more specific of 10.0.0.0/24
        let p = prefix("10.0.0.0/24");
        let v = validator(vec![Roa::new(65001, &p, None).unwrap()], vec![]);
        let err = v
            .validate(65001, &[10, 0, 0, 5], 24, AddressFamily::Ipv4, true)
            .await
            .unwrap_err();
        assert_eq!(err, RovError::Input(InputError::HostBitsSet { length: 24 }));
    }

    #[tokio::test]
    async fn test_validate_all_keeps_order() {
        let p = prefix("10.0.0.0/24");
        let v = validator(vec![Roa::new(65001, &p, None).unwrap()], vec![]);
        let results = v
            .validate_all(&[
                RouteQuery::new(65001, p.clone()),
                RouteQuery::new(65002, p.clone()),
            ])
            .await;
        assert_eq!(
            results[0].as_ref().unwrap().validity_state,
            Some(ValidityState::Valid)
        );
        assert_eq!(
            results[1].as_ref().unwrap().validity_state,
            Some(ValidityState::Invalid)
        );
    }
}
