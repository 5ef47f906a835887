//! SLURM assertion resolver
//!
//! Locally added assertions are trusted like ROAs and always take
//! precedence over filters and over the ROA set.

use crate::lookup::SlurmLookup;
use crate::query::RouteQuery;
use rov_common::{
    is_prefix_in_range, AsState, LookupResult, PrefixState, Resolution, RouteValidation,
    SlurmPrefix, ValidityState,
};
use tracing::{debug, warn};

/// Resolves a query against SLURM assertions
///
/// Checks exact, covering and more specific assertions in that order. Never
/// produces a verdict on its own when nothing matches: `NoVerdict` lets the
/// filter and ROA stages run.
pub struct SlurmAssertionResolver<'a> {
    lookup: &'a dyn SlurmLookup,
}

impl<'a> SlurmAssertionResolver<'a> {
    /// Create resolver over a SLURM lookup
    pub fn new(lookup: &'a dyn SlurmLookup) -> Self {
        Self { lookup }
    }

    /// Resolve one query
    pub async fn resolve(&self, query: &RouteQuery) -> LookupResult<Resolution> {
        let (prefix, length) = (query.bytes(), query.length());

        let exact: Vec<SlurmPrefix> = self
            .lookup
            .find_assertion_exact_matches(prefix, length)
            .await?
            .into_iter()
            .filter(usable)
            .collect();
        if let Some(assertion) = pick_origin(exact, query) {
            let as_state = AsState::compare(query.asn, assertion.asn);
            let validity = match as_state {
                AsState::Matching => ValidityState::Valid,
                AsState::NonMatching => ValidityState::Invalid,
            };
            debug!(asn = query.asn, prefix = %query.prefix, %assertion, %validity, "assertion exact match");
            return Ok(verdict(validity, PrefixState::MatchRoa, as_state, assertion, query));
        }

        if !query.full_check {
            return Ok(Resolution::NoVerdict);
        }

        let covering: Vec<SlurmPrefix> = self
            .lookup
            .find_assertion_covering_candidates(prefix, length)
            .await?
            .into_iter()
            .filter(usable)
            .filter(|a| covers(a, query))
            .collect();

        // Assertions act as local ROAs: their max length admits the origin's
        // more specific announcements, anything beyond it is invalid.
        if let Some(assertion) = covering.iter().find(|a| authorizes(a, query)) {
            debug!(asn = query.asn, prefix = %query.prefix, %assertion, "authorized by covering assertion");
            return Ok(verdict(
                ValidityState::Valid,
                PrefixState::MatchRoa,
                AsState::Matching,
                assertion.clone(),
                query,
            ));
        }
        if let Some(assertion) = covering.into_iter().next() {
            let as_state = AsState::compare(query.asn, assertion.asn);
            debug!(asn = query.asn, prefix = %query.prefix, %assertion, "covered by assertion");
            return Ok(verdict(
                ValidityState::Invalid,
                PrefixState::MoreSpecific,
                as_state,
                assertion,
                query,
            ));
        }

        let nested = self
            .lookup
            .find_assertion_more_specific_candidates(prefix, length)
            .await?;
        if let Some(assertion) = nested
            .into_iter()
            .filter(usable)
            .find(|a| nested_in(a, query))
        {
            let as_state = AsState::compare(query.asn, assertion.asn);
            debug!(asn = query.asn, prefix = %query.prefix, %assertion, "aggregates an assertion");
            return Ok(verdict(
                ValidityState::Unknown,
                PrefixState::CoveringAggregate,
                as_state,
                assertion,
                query,
            ));
        }

        Ok(Resolution::NoVerdict)
    }
}

fn verdict(
    validity: ValidityState,
    prefix_state: PrefixState,
    as_state: AsState,
    assertion: SlurmPrefix,
    query: &RouteQuery,
) -> Resolution {
    Resolution::Verdict(RouteValidation::from_slurm(
        validity,
        prefix_state,
        as_state,
        assertion,
        query.full_check,
    ))
}

fn usable(assertion: &SlurmPrefix) -> bool {
    if !assertion.is_assertion() {
        warn!(record = %assertion, "filter returned by an assertion lookup, skipping");
        return false;
    }
    match assertion.check() {
        Ok(()) => true,
        Err(e) => {
            warn!(record = %assertion, error = %e, "skipping invalid SLURM assertion");
            false
        }
    }
}

/// Assertion for the queried origin if one exists, else the lowest ASN
fn pick_origin(assertions: Vec<SlurmPrefix>, query: &RouteQuery) -> Option<SlurmPrefix> {
    assertions
        .into_iter()
        .min_by_key(|a| (a.asn != Some(query.asn), a.asn))
}

/// Assertion names the queried origin and its max length admits the query
fn authorizes(assertion: &SlurmPrefix, query: &RouteQuery) -> bool {
    assertion.asn == Some(query.asn)
        && assertion
            .effective_max_length()
            .is_some_and(|max| query.length() <= max)
}

/// Assertion block strictly contains the queried prefix
fn covers(assertion: &SlurmPrefix, query: &RouteQuery) -> bool {
    match (assertion.start.as_deref(), assertion.prefix_length) {
        (Some(start), Some(length)) => {
            length < query.length() && is_prefix_in_range(query.bytes(), start, length)
        }
        _ => false,
    }
}

/// Assertion prefix lies strictly inside the queried block
fn nested_in(assertion: &SlurmPrefix, query: &RouteQuery) -> bool {
    match (assertion.start.as_deref(), assertion.prefix_length) {
        (Some(start), Some(length)) => {
            length > query.length() && is_prefix_in_range(start, query.bytes(), query.length())
        }
        _ => false,
    }
}
