//! Validated ROA payload exports
//!
//! Accepts the JSON shape most relying-party validators emit:
//! `{"roas": [{"asn": "AS65001", "prefix": "10.0.0.0/24", "maxLength": 24, "ta": "..."}]}`.
//! The ASN may also be a bare number.

use crate::error::{SourceError, SourceResult};
use rov_common::{Asn, InputError, Prefix, Roa};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Deserialize)]
struct VrpExport {
    roas: Vec<VrpEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VrpEntry {
    asn: AsnField,
    prefix: String,
    #[serde(default)]
    max_length: Option<u8>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AsnField {
    Number(Asn),
    Text(String),
}

impl AsnField {
    fn resolve(&self) -> Result<Asn, InputError> {
        match self {
            Self::Number(asn) => Ok(*asn),
            Self::Text(s) => parse_asn(s),
        }
    }
}

/// Parse an ASN written as `AS65001`, `as65001` or `65001`
pub fn parse_asn(text: &str) -> Result<Asn, InputError> {
    let text = text.trim();
    let digits = text
        .strip_prefix("AS")
        .or_else(|| text.strip_prefix("as"))
        .unwrap_or(text);
    digits.parse().map_err(|_| InputError::MissingAsn)
}

/// Parse a VRP export into ROAs
pub fn parse_vrps(text: &str) -> SourceResult<Vec<Roa>> {
    let export: VrpExport = serde_json::from_str(text)?;
    export
        .roas
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let asn = entry
                .asn
                .resolve()
                .map_err(|source| SourceError::Input { index, source })?;
            let prefix: Prefix = entry
                .prefix
                .parse()
                .map_err(|source| SourceError::Input { index, source })?;
            Roa::new(asn, &prefix, entry.max_length).map_err(|source| SourceError::Invariant {
                kind: "roa",
                index,
                source,
            })
        })
        .collect()
}

/// Read and parse a VRP export file
pub fn load_vrps(path: impl AsRef<Path>) -> SourceResult<Vec<Roa>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let roas = parse_vrps(&text)?;
    info!(path = %path.display(), roas = roas.len(), "VRP export loaded");
    Ok(roas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rov_common::{AddressFamily, InvariantViolation};

    #[test]
    fn test_asn_forms() {
        let roas = parse_vrps(
            r#"{"roas": [
                {"asn": "AS65001", "prefix": "10.0.0.0/16", "maxLength": 24, "ta": "ripe"},
                {"asn": 65002, "prefix": "2001:db8::/32"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(roas.len(), 2);
        assert_eq!(roas[0].asn, 65001);
        assert_eq!(roas[0].max_length, 24);
        assert_eq!(roas[1].asn, 65002);
        assert_eq!(roas[1].family, AddressFamily::Ipv6);
        assert_eq!(roas[1].max_length, 32);
    }

    #[test]
    fn test_parse_asn() {
        assert_eq!(parse_asn("AS65001"), Ok(65001));
        assert_eq!(parse_asn("as7"), Ok(7));
        assert_eq!(parse_asn(" 4200000000 "), Ok(4_200_000_000));
        assert_eq!(parse_asn("AS"), Err(InputError::MissingAsn));
        assert_eq!(parse_asn("AS4294967296"), Err(InputError::MissingAsn));
    }

    #[test]
    fn test_bad_asn_reports_index() {
        let err = parse_vrps(
            r#"{"roas": [
                {"asn": "AS1", "prefix": "10.0.0.0/8"},
                {"asn": "ASx", "prefix": "10.0.0.0/8"}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SourceError::Input {
                index: 1,
                source: InputError::MissingAsn
            }
        ));
    }

    #[test]
    fn test_max_length_below_length_rejected() {
        let err = parse_vrps(r#"{"roas": [{"asn": 1, "prefix": "10.0.0.0/24", "maxLength": 16}]}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            SourceError::Invariant {
                kind: "roa",
                index: 0,
                source: InvariantViolation::MaxLengthBelowLength { .. }
            }
        ));
    }
}
