//! Route Origin Validation engine
//!
//! Decides whether an announcement (origin ASN + prefix) is VALID, INVALID
//! or UNKNOWN against a set of validated ROAs, as locally overridden by
//! SLURM assertions and filters.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                           RouteValidator                          │
//! │                                                                   │
//! │  ┌────────────────┐ NoVerdict ┌──────────────┐ NoVerdict ┌─────┐  │
//! │  │ SLURM assertion│──────────►│ SLURM filter │──────────►│ ROA │  │
//! │  │    resolver    │           │   resolver   │           │     │  │
//! │  └────────────────┘           └──────────────┘           └─────┘  │
//! │          │ Verdict                   │ Verdict              │     │
//! │          ▼                           ▼                      ▼     │
//! │                           [RouteValidation]                       │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lookups return *candidates*: the backing store can only compare byte
//! ranges, so every covering or more specific candidate is re-checked with
//! bitwise containment before it decides anything.

#![warn(missing_docs)]

pub mod assertion;
pub mod config;
pub mod filter;
pub mod lookup;
pub mod query;
pub mod roa;
pub mod store;
pub mod validator;

pub use assertion::SlurmAssertionResolver;
pub use config::{CandidateOrder, StoreConfig};
pub use filter::SlurmFilterResolver;
pub use lookup::{RoaLookup, SlurmLookup};
pub use query::RouteQuery;
pub use roa::RoaResolver;
pub use store::{LoadReport, RoaStore, SlurmStore};
pub use validator::RouteValidator;

pub use rov_common::{
    end_of_filter_range, end_of_range, is_prefix_in_range, AddressFamily, AsState, Asn,
    InputError, InvariantViolation, LookupError, LookupResult, Prefix, PrefixState, Resolution,
    Roa, RouteValidation, RovError, RovResult, SlurmKind, SlurmPrefix, ValidityState,
};
