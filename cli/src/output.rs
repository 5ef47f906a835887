//! Output formatting

use clap::ValueEnum;
use rov_validator::{Asn, Prefix, RouteValidation};
use serde::{Deserialize, Serialize};
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

/// One validated announcement
#[derive(Debug, Serialize, Tabled)]
pub struct VerdictRow {
    #[tabled(rename = "ASN")]
    pub asn: Asn,
    #[tabled(rename = "PREFIX")]
    pub prefix: Prefix,
    #[tabled(rename = "VERDICT", display_with = "display_verdict")]
    pub validation: RouteValidation,
}

fn display_verdict(validation: &RouteValidation) -> String {
    validation.to_string()
}

impl OutputFormat {
    /// Print rows, one per line in table form
    pub fn print<T: Serialize + Tabled>(&self, rows: &[T]) -> anyhow::Result<()> {
        match self {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(rows)?),
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(rows)?),
            OutputFormat::Table => println!("{}", Table::new(rows)),
        }
        Ok(())
    }

    /// Print a single item, unwrapped in json and yaml
    pub fn print_one<T: Serialize + Tabled>(&self, row: &T) -> anyhow::Result<()> {
        match self {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(row)?),
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(row)?),
            OutputFormat::Table => println!("{}", Table::new(std::slice::from_ref(row))),
        }
        Ok(())
    }
}
