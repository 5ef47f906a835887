//! Loading fixture files from disk

use rov_common::{AddressFamily, SlurmKind};
use rov_sources::{load_slurm, load_vrps, SlurmSummary, SourceError};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn rfc8416_example_loads() {
    let file = load_slurm(fixture("rfc8416.slurm.json")).unwrap();
    assert_eq!(
        file.summary(),
        SlurmSummary {
            prefix_filters: 3,
            bgpsec_filters: 2,
            prefix_assertions: 2,
            bgpsec_assertions: 1,
        }
    );

    let records = file.into_records().unwrap();
    assert_eq!(records.len(), 5);

    let filters: Vec<_> = records.iter().filter(|r| r.kind == SlurmKind::Filter).collect();
    assert_eq!(filters.len(), 3);
    assert_eq!(filters[1].asn, Some(64496));
    assert!(filters[1].start.is_none());
    assert_eq!(filters[0].asn, None);
    assert_eq!(filters[0].prefix_length, Some(24));

    let v6 = &records[4];
    assert!(v6.is_assertion());
    assert_eq!(v6.family(), Some(AddressFamily::Ipv6));
    assert_eq!(v6.max_length, Some(48));
    assert_eq!(v6.comment.as_deref(), Some("My other important de-aggregated routes"));
}

#[test]
fn vrp_export_loads() {
    let roas = load_vrps(fixture("vrps.json")).unwrap();
    assert_eq!(roas.len(), 3);
    assert_eq!(roas[0].asn, 65001);
    assert_eq!(roas[0].prefix_length, 16);
    assert_eq!(roas[0].max_length, 24);
    assert_eq!(roas[2].family, AddressFamily::Ipv6);
}

#[test]
fn missing_file_names_path() {
    let err = load_vrps(fixture("does-not-exist.json")).unwrap_err();
    match err {
        SourceError::Io { path, .. } => assert!(path.ends_with("does-not-exist.json")),
        other => panic!("unexpected error: {other}"),
    }
}
