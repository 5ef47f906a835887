//! SLURM filter resolver

use crate::lookup::SlurmLookup;
use crate::query::RouteQuery;
use rov_common::{
    AsState, LookupResult, PrefixState, Resolution, RouteValidation, SlurmKind, ValidityState,
};
use tracing::{debug, warn};

/// Resolves a query against SLURM filters
///
/// A matching filter suppresses whatever the ROA set would have concluded:
/// the announcement becomes `UNKNOWN / NON_INTERSECTING / NON_MATCHING`.
pub struct SlurmFilterResolver<'a> {
    lookup: &'a dyn SlurmLookup,
}

impl<'a> SlurmFilterResolver<'a> {
    /// Create resolver over a SLURM lookup
    pub fn new(lookup: &'a dyn SlurmLookup) -> Self {
        Self { lookup }
    }

    /// Resolve one query
    pub async fn resolve(&self, query: &RouteQuery) -> LookupResult<Resolution> {
        let Some(filter) = self
            .lookup
            .find_filter_match(query.asn, query.bytes(), query.length())
            .await?
        else {
            return Ok(Resolution::NoVerdict);
        };

        if filter.kind != SlurmKind::Filter {
            warn!(record = %filter, "assertion returned by a filter lookup, skipping");
            return Ok(Resolution::NoVerdict);
        }
        if let Err(e) = filter.check() {
            warn!(record = %filter, error = %e, "skipping invalid SLURM filter");
            return Ok(Resolution::NoVerdict);
        }

        debug!(asn = query.asn, prefix = %query.prefix, %filter, "filtered");
        Ok(Resolution::Verdict(RouteValidation::from_slurm(
            ValidityState::Unknown,
            PrefixState::NonIntersecting,
            AsState::NonMatching,
            filter,
            query.full_check,
        )))
    }
}
