//! Batch command
//!
//! Input is one `ASN PREFIX` pair per line. Blank lines and lines starting
//! with `#` are skipped.

use crate::output::{OutputFormat, VerdictRow};
use anyhow::{bail, Context, Result};
use rov_sources::parse_asn;
use rov_validator::{Prefix, RouteQuery, RouteValidator};
use std::path::Path;
use tracing::info;

fn parse_line(line: &str) -> Result<Option<RouteQuery>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut fields = line.split_whitespace();
    let (Some(asn), Some(prefix), None) = (fields.next(), fields.next(), fields.next()) else {
        bail!("expected `ASN PREFIX`, got {:?}", line);
    };
    let asn = parse_asn(asn).with_context(|| format!("invalid ASN {:?}", asn))?;
    let prefix: Prefix = prefix
        .parse()
        .with_context(|| format!("invalid prefix {:?}", prefix))?;
    Ok(Some(RouteQuery::new(asn, prefix)))
}

pub async fn handle(validator: RouteValidator, input: &Path, format: OutputFormat) -> Result<()> {
    let text = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("cannot read {}", input.display()))?;

    let mut queries = Vec::new();
    for (n, line) in text.lines().enumerate() {
        if let Some(query) =
            parse_line(line).with_context(|| format!("{}:{}", input.display(), n + 1))?
        {
            queries.push(query);
        }
    }

    let handles: Vec<_> = queries
        .iter()
        .cloned()
        .map(|query| {
            let validator = validator.clone();
            tokio::spawn(async move { validator.validate_query(&query).await })
        })
        .collect();

    let mut rows = Vec::with_capacity(queries.len());
    for (query, handle) in queries.into_iter().zip(handles) {
        let validation = handle.await??;
        rows.push(VerdictRow {
            asn: query.asn,
            prefix: query.prefix,
            validation,
        });
    }

    info!(routes = rows.len(), "batch validated");
    format.print(&rows)
}
