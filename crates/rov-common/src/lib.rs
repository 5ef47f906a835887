//! ROV Common - Shared types for route origin validation
//!
//! This crate provides the building blocks every other ROV crate works with:
//! - Fixed-width prefix arithmetic over raw address bytes
//! - Validated value objects (`Prefix`, `AddressFamily`)
//! - Read-only facts consumed by the validator (`Roa`, `SlurmPrefix`)
//! - The verdict produced for every announcement (`RouteValidation`)
//! - Error handling
//!
//! # Address representation
//!
//! Prefixes are carried as raw network-order bytes (4 for IPv4, 16 for IPv6)
//! plus a length in bits. Two byte sequences of different widths are never
//! comparable: every containment test between them answers `false`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod arithmetic;
pub mod error;
pub mod prefix;
pub mod roa;
pub mod slurm;
pub mod validation;

pub use arithmetic::{end_of_filter_range, end_of_range, is_aligned, is_prefix_in_range};
pub use error::*;
pub use prefix::{AddressFamily, Prefix};
pub use roa::Roa;
pub use slurm::{SlurmKind, SlurmPrefix};
pub use validation::*;

/// Autonomous system number
pub type Asn = u32;
