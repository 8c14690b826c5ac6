//! Conformance tests that run YAML fixtures against gident
//!
//! Run with: cargo test -p gident-test --test conformance
//!
//! The `fixtures` feature is on by default; `--no-default-features` skips this file.

#![cfg(feature = "fixtures")]

use gident_test::fixture::Fixture;
use std::fs;
use std::path::{Path, PathBuf};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Load and run one fixture file
fn run_fixture_file(name: &str) {
    let path = fixtures_dir().join(name);
    println!("Running fixture file: {}", path.display());

    let yaml = fs::read_to_string(&path).expect("read yaml");

    // Parse potentially multiple fixtures (separated by ---)
    let fixtures = Fixture::from_yaml_multi(&yaml).unwrap_or_else(|e| {
        panic!("Failed to parse {}: {}", path.display(), e);
    });
    assert!(!fixtures.is_empty(), "{} holds no fixtures", path.display());

    for fixture in fixtures {
        println!("  Running: {}", fixture.name);
        fixture.run_and_assert();
    }
}

#[test]
fn test_matching() {
    run_fixture_file("01_matching.yaml");
}

#[test]
fn test_merge() {
    run_fixture_file("02_merge.yaml");
}

#[test]
fn test_ordering() {
    run_fixture_file("03_ordering.yaml");
}

#[test]
fn test_catalog() {
    run_fixture_file("04_catalog.yaml");
}

#[test]
fn every_fixture_file_is_listed() {
    let mut names: Vec<String> = fs::read_dir(fixtures_dir())
        .expect("read dir")
        .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".yaml") || name.ends_with(".yml"))
        .collect();
    names.sort();
    assert_eq!(
        names,
        ["01_matching.yaml", "02_merge.yaml", "03_ordering.yaml", "04_catalog.yaml"]
    );
}
