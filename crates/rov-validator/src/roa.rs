//! ROA resolver (RFC 6483 §2)

use crate::lookup::RoaLookup;
use crate::query::RouteQuery;
use rov_common::{
    is_prefix_in_range, AsState, LookupResult, PrefixState, Roa, RouteValidation, ValidityState,
};
use tracing::{debug, trace, warn};

/// Resolves a query against the validated ROA set
///
/// Always ends in a verdict: exact, covering aggregate, more specific, and
/// finally non-intersecting. An exact-match-only query stops after the
/// exact lookup and yields [`RouteValidation::unevaluated`].
pub struct RoaResolver<'a> {
    lookup: &'a dyn RoaLookup,
}

impl<'a> RoaResolver<'a> {
    /// Create resolver over a ROA lookup
    pub fn new(lookup: &'a dyn RoaLookup) -> Self {
        Self { lookup }
    }

    /// Resolve one query
    pub async fn resolve(&self, query: &RouteQuery) -> LookupResult<RouteValidation> {
        let (prefix, length, family) = (query.bytes(), query.length(), query.family());

        let exact: Vec<Roa> = self
            .lookup
            .find_exact_matches(prefix, length)
            .await?
            .into_iter()
            .filter(usable)
            .collect();
        if let Some(roa) = pick_origin(exact, query) {
            let as_state = AsState::compare(query.asn, Some(roa.asn));
            let validity = match as_state {
                AsState::Matching => ValidityState::Valid,
                AsState::NonMatching => ValidityState::Invalid,
            };
            debug!(asn = query.asn, prefix = %query.prefix, %roa, %validity, "ROA exact match");
            return Ok(RouteValidation::from_roa(
                validity,
                PrefixState::MatchRoa,
                as_state,
                roa,
                query.full_check,
            ));
        }

        if !query.full_check {
            trace!(asn = query.asn, prefix = %query.prefix, "no exact match, quick check ends here");
            return Ok(RouteValidation::unevaluated());
        }

        let covering: Vec<Roa> = self
            .lookup
            .find_covering_aggregate_candidates(prefix, length, family)
            .await?
            .into_iter()
            .filter(usable)
            .filter(|roa| covers(roa, query))
            .collect();

        // RFC 6483 §2: a covering ROA authorizes announcements of its origin
        // up to its max length.
        if let Some(roa) = covering.iter().find(|roa| authorizes(roa, query)) {
            debug!(asn = query.asn, prefix = %query.prefix, %roa, "authorized by covering ROA");
            return Ok(RouteValidation::from_roa(
                ValidityState::Valid,
                PrefixState::MatchRoa,
                AsState::Matching,
                roa.clone(),
                query.full_check,
            ));
        }
        if let Some(roa) = covering.into_iter().next() {
            let as_state = AsState::compare(query.asn, Some(roa.asn));
            debug!(asn = query.asn, prefix = %query.prefix, %roa, "more specific than ROA");
            return Ok(RouteValidation::from_roa(
                ValidityState::Invalid,
                PrefixState::MoreSpecific,
                as_state,
                roa,
                query.full_check,
            ));
        }

        let nested = self
            .lookup
            .find_more_specific_candidates(prefix, length, family)
            .await?;
        if let Some(roa) = nested
            .into_iter()
            .filter(usable)
            .find(|roa| nested_in(roa, query))
        {
            let as_state = AsState::compare(query.asn, Some(roa.asn));
            debug!(asn = query.asn, prefix = %query.prefix, %roa, "aggregates a ROA");
            return Ok(RouteValidation::from_roa(
                ValidityState::Unknown,
                PrefixState::CoveringAggregate,
                as_state,
                roa,
                query.full_check,
            ));
        }

        let as_state = if self.lookup.exists_for_asn(query.asn).await? {
            AsState::Matching
        } else {
            AsState::NonMatching
        };
        debug!(asn = query.asn, prefix = %query.prefix, %as_state, "no intersecting ROA");
        Ok(RouteValidation::non_intersecting(as_state, query.full_check))
    }
}

fn usable(roa: &Roa) -> bool {
    match roa.check() {
        Ok(()) => true,
        Err(e) => {
            warn!(roa = %roa, error = %e, "skipping invalid ROA");
            false
        }
    }
}

/// ROA for the queried origin if one exists, else the lowest ASN
fn pick_origin(roas: Vec<Roa>, query: &RouteQuery) -> Option<Roa> {
    roas.into_iter()
        .min_by_key(|roa| (roa.asn != query.asn, roa.asn))
}

/// ROA names the queried origin and admits its length
fn authorizes(roa: &Roa, query: &RouteQuery) -> bool {
    roa.asn == query.asn && query.length() <= roa.max_length
}

/// ROA block strictly contains the queried prefix
fn covers(roa: &Roa, query: &RouteQuery) -> bool {
    roa.prefix_length < query.length()
        && is_prefix_in_range(query.bytes(), &roa.start, roa.prefix_length)
}

/// ROA prefix lies strictly inside the queried block
fn nested_in(roa: &Roa, query: &RouteQuery) -> bool {
    roa.prefix_length > query.length() && is_prefix_in_range(&roa.start, query.bytes(), query.length())
}
