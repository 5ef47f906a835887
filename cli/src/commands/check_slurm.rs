//! Check-slurm command

use crate::output::OutputFormat;
use anyhow::{Context, Result};
use rov_sources::load_slurm;
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;

#[derive(Debug, Serialize, Tabled)]
struct SlurmReport {
    file: String,
    prefix_filters: usize,
    bgpsec_filters: usize,
    prefix_assertions: usize,
    bgpsec_assertions: usize,
}

pub fn handle(file: &Path, format: OutputFormat) -> Result<()> {
    let slurm = load_slurm(file).with_context(|| format!("checking {}", file.display()))?;
    let summary = slurm.summary();

    // Conversion runs the record checks the validator would apply
    slurm
        .into_records()
        .with_context(|| format!("checking {}", file.display()))?;

    format.print_one(&SlurmReport {
        file: file.display().to_string(),
        prefix_filters: summary.prefix_filters,
        bgpsec_filters: summary.bgpsec_filters,
        prefix_assertions: summary.prefix_assertions,
        bgpsec_assertions: summary.bgpsec_assertions,
    })
}
