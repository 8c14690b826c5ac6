//! Conformance test fixture runner
//!
//! Loads YAML fixtures and runs them against gident. Identities are written in
//! display form (`host/plugin[-plugin_instance]/type[-type_instance]`), with
//! `/any/` and `/all/` allowed wherever a field starts.
//!
//! ```yaml
//! name: any_needs_presence
//! description: ANY never matches an empty field
//! cases:
//!   - name: empty_plugin_instance
//!     match: { selector: "db1/load-/any//load", candidate: db1/load/load, expect: false }
//!   - name: resolve_plugin_instance
//!     merge:
//!       selector: "db1/cpu-/any//cpu"
//!       candidate: db1/cpu-0/cpu-idle
//!       flags: [replace_any]
//!       expect: db1/cpu-0/cpu
//! ```

use gident::prelude::*;
use gident::CatalogConfig;
use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// A complete test fixture
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    pub description: String,
    /// Catalog shared by `list` and `select` cases.
    #[serde(default)]
    pub catalog: Option<CatalogConfig>,
    pub cases: Vec<TestCase>,
}

/// Test case: a name plus exactly one operation
#[derive(Debug, Deserialize)]
pub struct TestCase {
    pub name: String,
    #[serde(flatten)]
    pub op: Operation,
}

/// The operation under test and its expected outcome
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Match(MatchCase),
    Merge(MergeCase),
    Compare(CompareCase),
    List(ListCase),
    Select(SelectCase),
}

#[derive(Debug, Deserialize)]
pub struct MatchCase {
    pub selector: String,
    pub candidate: String,
    pub expect: bool,
}

#[derive(Debug, Deserialize)]
pub struct MergeCase {
    pub selector: String,
    pub candidate: String,
    #[serde(default)]
    pub flags: Vec<FlagName>,
    /// Expected result in display form, or `error: <kind>`.
    pub expect: Outcome,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagName {
    ReplaceAll,
    ReplaceAny,
}

#[derive(Debug, Deserialize)]
pub struct CompareCase {
    pub left: String,
    pub right: String,
    pub expect: OrderingName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingName {
    Less,
    Equal,
    Greater,
}

/// Flat listing of the fixture catalog, in order.
#[derive(Debug, Deserialize)]
pub struct ListCase {
    pub expect: Vec<String>,
}

/// Request parameters against the fixture catalog.
#[derive(Debug, Deserialize)]
pub struct SelectCase {
    pub params: BTreeMap<String, String>,
    /// Selector of the chosen configuration.
    #[serde(default)]
    pub config: Option<String>,
    /// The chosen instance, or `error: <kind>`.
    pub expect: Outcome,
}

/// Expected value or expected error kind
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Outcome {
    Error { error: ErrorKind },
    Value(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    Unresolvable,
}

impl ErrorKind {
    fn of(err: &IdentError) -> Self {
        match err {
            IdentError::InvalidArgument { .. } => Self::InvalidArgument,
            IdentError::NotFound { .. } => Self::NotFound,
            IdentError::Unresolvable { .. } => Self::Unresolvable,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Evaluation
// ═══════════════════════════════════════════════════════════════════════════════

fn parse(s: &str) -> Result<GraphIdent, String> {
    s.parse().map_err(|e: IdentError| format!("bad identity {s:?}: {e}"))
}

fn render(result: Result<GraphIdent, IdentError>) -> String {
    match result {
        Ok(ident) => ident.to_string(),
        Err(e) => format!("error: {:?}", ErrorKind::of(&e)),
    }
}

impl Outcome {
    fn render(&self) -> String {
        match self {
            Self::Value(s) => s.clone(),
            Self::Error { error } => format!("error: {error:?}"),
        }
    }
}

impl MatchCase {
    fn eval(&self) -> Result<(String, String), String> {
        let actual = matches(&parse(&self.selector)?, &parse(&self.candidate)?);
        Ok((self.expect.to_string(), actual.to_string()))
    }
}

impl MergeCase {
    fn eval(&self) -> Result<(String, String), String> {
        let flags = self
            .flags
            .iter()
            .fold(MergeFlags::NONE, |acc, flag| match flag {
                FlagName::ReplaceAll => acc | MergeFlags::REPLACE_ALL,
                FlagName::ReplaceAny => acc | MergeFlags::REPLACE_ANY,
            });
        let actual = copy_with_selector(&parse(&self.selector)?, &parse(&self.candidate)?, flags);
        Ok((self.expect.render(), render(actual)))
    }
}

impl CompareCase {
    fn eval(&self) -> Result<(String, String), String> {
        let actual = match parse(&self.left)?.cmp(&parse(&self.right)?) {
            Ordering::Less => OrderingName::Less,
            Ordering::Equal => OrderingName::Equal,
            Ordering::Greater => OrderingName::Greater,
        };
        Ok((format!("{:?}", self.expect), format!("{actual:?}")))
    }
}

impl ListCase {
    fn eval(&self, catalog: &MemoryCatalog) -> (String, String) {
        let actual: Vec<String> = flat_records(catalog)
            .iter()
            .map(|r| {
                // Instances are concrete, so this parses back unchanged
                GraphIdent::new(
                    &r.host,
                    &r.plugin,
                    &r.plugin_instance,
                    &r.type_,
                    &r.type_instance,
                )
                .map_or_else(|e| format!("error: {e}"), |id| id.to_string())
            })
            .collect();
        (self.expect.join(", "), actual.join(", "))
    }
}

impl SelectCase {
    fn eval(&self, catalog: &MemoryCatalog) -> (String, String) {
        let mut expected = self.expect.render();
        if let Some(config) = &self.config {
            expected = format!("{config} => {expected}");
        }
        let actual = SelectionContext::from_params(&self.params).and_then(|ctx| {
            catalog
                .resolve(&ctx)
                .map(|(config, instance)| (config.selector().clone(), instance.ident().clone()))
        });
        let actual = match actual {
            Ok((config, ident)) if self.config.is_some() => format!("{config} => {ident}"),
            Ok((_, ident)) => ident.to_string(),
            Err(e) => render(Err(e)),
        };
        (expected, actual)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runner
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of running a single test case
#[derive(Debug)]
pub struct CaseResult {
    pub case_name: String,
    pub passed: bool,
    pub expected: String,
    pub actual: String,
}

impl Fixture {
    /// Parse a fixture from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Run all test cases and return results
    ///
    /// # Errors
    ///
    /// A malformed identity in a case, a catalog that fails to build, or a
    /// `list`/`select` case in a fixture without a catalog.
    pub fn run(&self) -> Result<Vec<CaseResult>, String> {
        let catalog = self
            .catalog
            .as_ref()
            .map(CatalogConfig::build)
            .transpose()
            .map_err(|e| format!("fixture '{}': {e}", self.name))?;
        let need_catalog = || {
            catalog
                .as_ref()
                .ok_or_else(|| format!("fixture '{}' has no catalog", self.name))
        };

        self.cases
            .iter()
            .map(|case| -> Result<CaseResult, String> {
                let (expected, actual) = match &case.op {
                    Operation::Match(c) => c.eval()?,
                    Operation::Merge(c) => c.eval()?,
                    Operation::Compare(c) => c.eval()?,
                    Operation::List(c) => c.eval(need_catalog()?),
                    Operation::Select(c) => c.eval(need_catalog()?),
                };
                Ok(CaseResult {
                    case_name: case.name.clone(),
                    passed: expected == actual,
                    expected,
                    actual,
                })
            })
            .collect()
    }

    /// Run all test cases and panic on first failure
    pub fn run_and_assert(&self) {
        let results = self
            .run()
            .unwrap_or_else(|e| panic!("Fixture '{}' is malformed: {e}", self.name));
        for result in results {
            assert!(
                result.passed,
                "Fixture '{}' case '{}' failed: expected {:?}, got {:?}",
                self.name, result.case_name, result.expected, result.actual
            );
        }
    }
}
