//! Record sources
//!
//! Turns on-disk data into the read-only facts the validator consumes:
//! - RFC 8416 SLURM files into [`rov_common::SlurmPrefix`] records
//! - Validator VRP exports into [`rov_common::Roa`] records

#![warn(missing_docs)]

pub mod error;
pub mod slurm;
pub mod vrp;

pub use error::{SourceError, SourceResult};
pub use slurm::{load_slurm, parse_slurm, SlurmFile, SlurmSummary};
pub use vrp::{load_vrps, parse_asn, parse_vrps};
