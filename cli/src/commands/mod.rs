//! CLI Commands

pub mod batch;
pub mod check_slurm;
pub mod validate;

use anyhow::{Context, Result};
use rov_sources::{load_slurm, load_vrps};
use rov_validator::{RoaStore, RouteValidator, SlurmStore, StoreConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

/// Where the validator's record sets come from
pub struct Sources {
    pub roas: Option<PathBuf>,
    pub slurm: Option<PathBuf>,
    pub store: StoreConfig,
}

impl Sources {
    /// Load both record sets into fresh stores
    pub fn validator(&self) -> Result<RouteValidator> {
        let roas = match &self.roas {
            Some(path) => load_vrps(path).context("loading ROA set")?,
            None => {
                warn!("no ROA file configured, only SLURM records can match");
                Vec::new()
            }
        };
        let slurm = match &self.slurm {
            Some(path) => load_slurm(path)
                .and_then(|file| file.into_records())
                .context("loading SLURM file")?,
            None => Vec::new(),
        };

        let roa_store = RoaStore::with_records(self.store.clone(), roas);
        let slurm_store = SlurmStore::with_records(self.store.clone(), slurm);
        Ok(RouteValidator::new(Arc::new(roa_store), Arc::new(slurm_store)))
    }
}
