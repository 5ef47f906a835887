//! SLURM files (RFC 8416 §3)

use crate::error::{SourceError, SourceResult};
use rov_common::{Asn, Prefix, SlurmPrefix};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Parsed SLURM file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlurmFile {
    /// Format version, only 1 is defined
    pub slurm_version: u32,
    /// Entries removing VRPs from the validator output
    pub validation_output_filters: ValidationOutputFilters,
    /// Entries adding locally trusted VRPs
    pub locally_added_assertions: LocallyAddedAssertions,
}

/// `validationOutputFilters` member
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutputFilters {
    /// Prefix filters, in file order
    #[serde(default)]
    pub prefix_filters: Vec<PrefixFilter>,
    /// Accepted and counted, never evaluated
    #[serde(default)]
    pub bgpsec_filters: Vec<serde_json::Value>,
}

/// `locallyAddedAssertions` member
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocallyAddedAssertions {
    /// Prefix assertions, in file order
    #[serde(default)]
    pub prefix_assertions: Vec<PrefixAssertion>,
    /// Accepted and counted, never evaluated
    #[serde(default)]
    pub bgpsec_assertions: Vec<serde_json::Value>,
}

/// Prefix filter entry
///
/// At least one of `asn` and `prefix` must be present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrefixFilter {
    /// Origin to suppress
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asn: Option<Asn>,
    /// Block to suppress, more specifics included
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<Prefix>,
    /// Operator comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Prefix assertion entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrefixAssertion {
    /// Authorized origin
    pub asn: Asn,
    /// Authorized prefix
    pub prefix: Prefix,
    /// Longest authorized announcement, defaults to the prefix length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_prefix_length: Option<u8>,
    /// Operator comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Entry counts of a SLURM file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlurmSummary {
    /// Prefix filter count
    pub prefix_filters: usize,
    /// BGPsec filter count
    pub bgpsec_filters: usize,
    /// Prefix assertion count
    pub prefix_assertions: usize,
    /// BGPsec assertion count
    pub bgpsec_assertions: usize,
}

impl SlurmFile {
    /// Entry counts
    pub fn summary(&self) -> SlurmSummary {
        SlurmSummary {
            prefix_filters: self.validation_output_filters.prefix_filters.len(),
            bgpsec_filters: self.validation_output_filters.bgpsec_filters.len(),
            prefix_assertions: self.locally_added_assertions.prefix_assertions.len(),
            bgpsec_assertions: self.locally_added_assertions.bgpsec_assertions.len(),
        }
    }

    /// Convert prefix filters and assertions into records
    ///
    /// Filters come first, in file order, then assertions. BGPsec entries
    /// are dropped.
    pub fn into_records(self) -> SourceResult<Vec<SlurmPrefix>> {
        let filters = self.validation_output_filters.prefix_filters;
        let assertions = self.locally_added_assertions.prefix_assertions;
        let mut records = Vec::with_capacity(filters.len() + assertions.len());

        for (index, f) in filters.into_iter().enumerate() {
            let record = SlurmPrefix::filter(f.asn, f.prefix.as_ref(), None, f.comment)
                .map_err(|source| SourceError::Invariant {
                    kind: "prefix filter",
                    index,
                    source,
                })?;
            records.push(record);
        }

        for (index, a) in assertions.into_iter().enumerate() {
            let record = SlurmPrefix::assertion(a.asn, &a.prefix, a.max_prefix_length, a.comment)
                .map_err(|source| SourceError::Invariant {
                    kind: "prefix assertion",
                    index,
                    source,
                })?;
            records.push(record);
        }

        Ok(records)
    }
}

/// Parse a SLURM document
pub fn parse_slurm(text: &str) -> SourceResult<SlurmFile> {
    let file: SlurmFile = serde_json::from_str(text)?;
    if file.slurm_version != 1 {
        return Err(SourceError::UnsupportedVersion(file.slurm_version));
    }
    Ok(file)
}

/// Read and parse a SLURM file
pub fn load_slurm(path: impl AsRef<Path>) -> SourceResult<SlurmFile> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file = parse_slurm(&text)?;
    let summary = file.summary();
    info!(
        path = %path.display(),
        filters = summary.prefix_filters,
        assertions = summary.prefix_assertions,
        "SLURM file loaded"
    );
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sections_default() {
        let file = parse_slurm(
            r#"{"slurmVersion": 1, "validationOutputFilters": {}, "locallyAddedAssertions": {}}"#,
        )
        .unwrap();
        assert_eq!(
            file.summary(),
            SlurmSummary {
                prefix_filters: 0,
                bgpsec_filters: 0,
                prefix_assertions: 0,
                bgpsec_assertions: 0
            }
        );
        assert!(file.into_records().unwrap().is_empty());
    }

    #[test]
    fn test_version_must_be_one() {
        let err = parse_slurm(
            r#"{"slurmVersion": 2, "validationOutputFilters": {}, "locallyAddedAssertions": {}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, SourceError::UnsupportedVersion(2)));
    }

    #[test]
    fn test_empty_filter_rejected() {
        let file = parse_slurm(
            r#"{
                "slurmVersion": 1,
                "validationOutputFilters": {"prefixFilters": [{"comment": "nothing"}]},
                "locallyAddedAssertions": {}
            }"#,
        )
        .unwrap();
        let err = file.into_records().unwrap_err();
        assert!(matches!(
            err,
            SourceError::Invariant {
                kind: "prefix filter",
                index: 0,
                ..
            }
        ));
    }
}
