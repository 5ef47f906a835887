//! Validate command

use crate::output::{OutputFormat, VerdictRow};
use anyhow::{Context, Result};
use rov_sources::parse_asn;
use rov_validator::{Prefix, RouteValidator};

pub async fn handle(
    validator: &RouteValidator,
    asn: &str,
    prefix: &str,
    quick: bool,
    format: OutputFormat,
) -> Result<()> {
    let asn = parse_asn(asn).with_context(|| format!("invalid ASN {:?}", asn))?;
    let prefix: Prefix = prefix
        .parse()
        .with_context(|| format!("invalid prefix {:?}", prefix))?;

    let validation = validator
        .validate(asn, prefix.bytes(), prefix.length(), prefix.family(), !quick)
        .await?;

    format.print_one(&VerdictRow {
        asn,
        prefix,
        validation,
    })
}
