//! Lock-free in-memory record stores with hot-swapping
//!
//! Each store publishes an immutable snapshot through `ArcSwap`; a validation
//! loads one snapshot per lookup call while a loader swaps in the next record
//! set. Candidate queries only compare byte ranges, the way a relational
//! store without bitwise operators would, so their results are supersets the
//! resolvers must re-check.

use crate::config::{CandidateOrder, StoreConfig};
use crate::lookup::{RoaLookup, SlurmLookup};
use arc_swap::ArcSwap;
use async_trait::async_trait;
use rov_common::{
    end_of_range, is_prefix_in_range, AddressFamily, Asn, LookupResult, Roa, SlurmKind,
    SlurmPrefix,
};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of publishing a record set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Records published
    pub accepted: usize,
    /// Records dropped for breaking their invariants
    pub rejected: usize,
}

/// Record indexed by the byte range of its block
#[derive(Debug, Clone)]
struct RangeEntry<T> {
    family: AddressFamily,
    start: Vec<u8>,
    end: Vec<u8>,
    length: u8,
    record: T,
}

impl<T> RangeEntry<T> {
    fn new(family: AddressFamily, start: Vec<u8>, length: u8, record: T) -> Self {
        let end = end_of_range(&start, length);
        Self {
            family,
            start,
            end,
            length,
            record,
        }
    }

    fn is_exact(&self, prefix: &[u8], length: u8) -> bool {
        self.length == length && self.start == prefix
    }

    /// Coarser block whose byte range holds `prefix`
    fn may_cover(&self, family: AddressFamily, prefix: &[u8], length: u8) -> bool {
        self.family == family
            && self.length < length
            && self.start.as_slice() <= prefix
            && prefix <= self.end.as_slice()
    }

    /// Finer block starting inside `[prefix, prefix_end]`
    fn may_nest(&self, family: AddressFamily, prefix: &[u8], prefix_end: &[u8], length: u8) -> bool {
        self.family == family
            && self.length > length
            && prefix <= self.start.as_slice()
            && self.start.as_slice() <= prefix_end
    }
}

fn candidates<'a, T: Clone + 'a>(
    config: &StoreConfig,
    matches: impl Iterator<Item = &'a RangeEntry<T>>,
) -> Vec<T> {
    let mut found: Vec<&RangeEntry<T>> = matches.collect();
    match config.candidate_order {
        CandidateOrder::MostSpecificFirst => found.sort_by(|a, b| b.length.cmp(&a.length)),
        CandidateOrder::LeastSpecificFirst => found.sort_by(|a, b| a.length.cmp(&b.length)),
    }
    found
        .into_iter()
        .take(config.candidate_limit.get())
        .map(|e| e.record.clone())
        .collect()
}

fn family_of(prefix: &[u8]) -> Option<AddressFamily> {
    AddressFamily::from_byte_len(prefix.len())
}

#[derive(Debug, Default)]
struct RoaSnapshot {
    entries: Vec<RangeEntry<Roa>>,
    asns: HashSet<Asn>,
}

/// In-memory ROA set
pub struct RoaStore {
    config: StoreConfig,
    snapshot: ArcSwap<RoaSnapshot>,
    version: AtomicU64,
}

impl RoaStore {
    /// Create empty store
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            snapshot: ArcSwap::from_pointee(RoaSnapshot::default()),
            version: AtomicU64::new(0),
        }
    }

    /// Create store holding `roas`
    pub fn with_records(config: StoreConfig, roas: Vec<Roa>) -> Self {
        let store = Self::new(config);
        store.update(roas);
        store
    }

    /// Atomically replace the ROA set
    pub fn update(&self, roas: Vec<Roa>) -> LoadReport {
        let mut report = LoadReport::default();
        let mut snapshot = RoaSnapshot::default();

        for roa in roas {
            if let Err(e) = roa.check() {
                warn!(%roa, error = %e, "dropping invalid ROA");
                report.rejected += 1;
                continue;
            }
            snapshot.asns.insert(roa.asn);
            snapshot.entries.push(RangeEntry::new(
                roa.family,
                roa.start.clone(),
                roa.prefix_length,
                roa,
            ));
            report.accepted += 1;
        }

        self.snapshot.store(Arc::new(snapshot));
        let version = self.version.fetch_add(1, Ordering::AcqRel) + 1;
        info!(accepted = report.accepted, rejected = report.rejected, version, "ROA set published");
        report
    }

    /// Current version, bumped on every update
    #[inline(always)]
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Number of ROAs
    pub fn len(&self) -> usize {
        self.snapshot.load().entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.snapshot.load().entries.is_empty()
    }

    /// Store configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Copy of the current ROA set
    pub fn records(&self) -> Vec<Roa> {
        self.snapshot
            .load()
            .entries
            .iter()
            .map(|e| e.record.clone())
            .collect()
    }
}

#[async_trait]
impl RoaLookup for RoaStore {
    /// Lowest origin ASN among ROAs sharing the prefix
    async fn find_exact_match(&self, prefix: &[u8], length: u8) -> LookupResult<Option<Roa>> {
        let snapshot = self.snapshot.load();
        Ok(snapshot
            .entries
            .iter()
            .filter(|e| e.is_exact(prefix, length))
            .min_by_key(|e| e.record.asn)
            .map(|e| e.record.clone()))
    }

    async fn find_exact_matches(&self, prefix: &[u8], length: u8) -> LookupResult<Vec<Roa>> {
        let snapshot = self.snapshot.load();
        Ok(snapshot
            .entries
            .iter()
            .filter(|e| e.is_exact(prefix, length))
            .map(|e| e.record.clone())
            .collect())
    }

    async fn find_covering_aggregate_candidates(
        &self,
        prefix: &[u8],
        length: u8,
        family: AddressFamily,
    ) -> LookupResult<Vec<Roa>> {
        let snapshot = self.snapshot.load();
        let matches = snapshot
            .entries
            .iter()
            .filter(|e| e.may_cover(family, prefix, length));
        Ok(candidates(&self.config, matches))
    }

    async fn find_more_specific_candidates(
        &self,
        prefix: &[u8],
        length: u8,
        family: AddressFamily,
    ) -> LookupResult<Vec<Roa>> {
        let snapshot = self.snapshot.load();
        let prefix_end = end_of_range(prefix, length);
        let matches = snapshot
            .entries
            .iter()
            .filter(|e| e.may_nest(family, prefix, &prefix_end, length));
        Ok(candidates(&self.config, matches))
    }

    async fn exists_for_asn(&self, asn: Asn) -> LookupResult<bool> {
        Ok(self.snapshot.load().asns.contains(&asn))
    }
}

#[derive(Debug, Default)]
struct SlurmSnapshot {
    assertions: Vec<RangeEntry<SlurmPrefix>>,
    filters: Vec<SlurmPrefix>,
}

/// In-memory SLURM assertions and filters
pub struct SlurmStore {
    config: StoreConfig,
    snapshot: ArcSwap<SlurmSnapshot>,
    version: AtomicU64,
}

impl SlurmStore {
    /// Create empty store
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            snapshot: ArcSwap::from_pointee(SlurmSnapshot::default()),
            version: AtomicU64::new(0),
        }
    }

    /// Create store holding `records`
    pub fn with_records(config: StoreConfig, records: Vec<SlurmPrefix>) -> Self {
        let store = Self::new(config);
        store.update(records);
        store
    }

    /// Atomically replace all SLURM records
    pub fn update(&self, records: Vec<SlurmPrefix>) -> LoadReport {
        let mut report = LoadReport::default();
        let mut snapshot = SlurmSnapshot::default();

        for mut record in records {
            if let Err(e) = record.check() {
                warn!(%record, error = %e, "dropping invalid SLURM record");
                report.rejected += 1;
                continue;
            }
            record.end = record.derive_end();

            match record.kind {
                SlurmKind::Filter => snapshot.filters.push(record),
                SlurmKind::Assertion => {
                    let (Some(start), Some(length), Some(family)) =
                        (record.start.clone(), record.prefix_length, record.family())
                    else {
                        report.rejected += 1;
                        continue;
                    };
                    snapshot
                        .assertions
                        .push(RangeEntry::new(family, start, length, record));
                }
            }
            report.accepted += 1;
        }

        self.snapshot.store(Arc::new(snapshot));
        let version = self.version.fetch_add(1, Ordering::AcqRel) + 1;
        info!(accepted = report.accepted, rejected = report.rejected, version, "SLURM set published");
        report
    }

    /// Current version, bumped on every update
    #[inline(always)]
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Number of assertions and filters
    pub fn len(&self) -> usize {
        let snapshot = self.snapshot.load();
        snapshot.assertions.len() + snapshot.filters.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(assertions, filters)` counts
    pub fn counts(&self) -> (usize, usize) {
        let snapshot = self.snapshot.load();
        (snapshot.assertions.len(), snapshot.filters.len())
    }

    /// Store configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

/// Whether a filter applies to the announcement
///
/// Absent fields match anything. The prefix must sit inside the filter's
/// whole block, at or below the filter length, and no longer than its max
/// length when one is set.
fn filter_matches(filter: &SlurmPrefix, asn: Asn, prefix: &[u8], length: u8) -> bool {
    if filter.asn.is_some_and(|a| a != asn) {
        return false;
    }

    let (Some(start), Some(filter_length)) = (filter.start.as_deref(), filter.prefix_length) else {
        return true;
    };
    let Some(end) = filter.end.as_deref() else {
        return false;
    };

    start.len() == prefix.len()
        && length >= filter_length
        && filter.max_length.map_or(true, |max| length <= max)
        && start <= prefix
        && prefix <= end
        && is_prefix_in_range(prefix, start, filter_length)
}

#[async_trait]
impl SlurmLookup for SlurmStore {
    async fn find_assertion_exact_match(
        &self,
        prefix: &[u8],
        length: u8,
    ) -> LookupResult<Option<SlurmPrefix>> {
        let snapshot = self.snapshot.load();
        Ok(snapshot
            .assertions
            .iter()
            .filter(|e| e.is_exact(prefix, length))
            .min_by_key(|e| e.record.asn)
            .map(|e| e.record.clone()))
    }

    async fn find_assertion_exact_matches(
        &self,
        prefix: &[u8],
        length: u8,
    ) -> LookupResult<Vec<SlurmPrefix>> {
        let snapshot = self.snapshot.load();
        Ok(snapshot
            .assertions
            .iter()
            .filter(|e| e.is_exact(prefix, length))
            .map(|e| e.record.clone())
            .collect())
    }

    async fn find_assertion_covering_candidates(
        &self,
        prefix: &[u8],
        length: u8,
    ) -> LookupResult<Vec<SlurmPrefix>> {
        let Some(family) = family_of(prefix) else {
            return Ok(Vec::new());
        };
        let snapshot = self.snapshot.load();
        let matches = snapshot
            .assertions
            .iter()
            .filter(|e| e.may_cover(family, prefix, length));
        Ok(candidates(&self.config, matches))
    }

    async fn find_assertion_more_specific_candidates(
        &self,
        prefix: &[u8],
        length: u8,
    ) -> LookupResult<Vec<SlurmPrefix>> {
        let Some(family) = family_of(prefix) else {
            return Ok(Vec::new());
        };
        let snapshot = self.snapshot.load();
        let prefix_end = end_of_range(prefix, length);
        let matches = snapshot
            .assertions
            .iter()
            .filter(|e| e.may_nest(family, prefix, &prefix_end, length));
        Ok(candidates(&self.config, matches))
    }

    async fn find_filter_match(
        &self,
        asn: Asn,
        prefix: &[u8],
        length: u8,
    ) -> LookupResult<Option<SlurmPrefix>> {
        let snapshot = self.snapshot.load();
        Ok(snapshot
            .filters
            .iter()
            .find(|f| filter_matches(f, asn, prefix, length))
            .cloned())
    }
}
