//! Conformance harness for pxfmt.
//!
//! Loads JSON fixture suites of format cases, runs each case through the
//! library for every requested character-unit type, and aggregates
//! machine-readable pass/fail rows. The binary in `src/bin/harness.rs`
//! drives this from the command line.

use std::fmt::Write as _;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use pxfmt::{CharUnit, FormatArg, append_format, convert, format, try_format};

/// Harness-level failures (fixture I/O and decoding, not case mismatches).
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("failed to read fixture {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse fixture {path}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write report {path}")]
    Report {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Character-unit selection for a fixture case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Narrow,
    Wide,
    Utf8,
}

impl UnitKind {
    /// All three unit types, the default coverage for a case.
    pub const ALL: [UnitKind; 3] = [UnitKind::Narrow, UnitKind::Wide, UnitKind::Utf8];

    /// Stable label used in rows and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            UnitKind::Narrow => "narrow",
            UnitKind::Wide => "wide",
            UnitKind::Utf8 => "utf8",
        }
    }
}

/// One typed positional argument in a fixture case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CaseArg {
    Int(i64),
    Uint(u64),
    Float(f64),
    Char(char),
    Str(String),
}

/// One fixture case: a template, typed arguments, and the expected output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCase {
    pub name: String,
    pub template: String,
    #[serde(default)]
    pub args: Vec<CaseArg>,
    /// When set, the case exercises `append_format` with this prefix as the
    /// target; `expected` is then the full post-append content.
    #[serde(default)]
    pub append_to: Option<String>,
    /// When true, the underlying format must fail (checked via `try_format`)
    /// while the never-fails surface still produces `expected`.
    #[serde(default)]
    pub must_fail: bool,
    /// Unit types to run this case under. Omitted means all three.
    #[serde(default)]
    pub units: Option<Vec<UnitKind>>,
    pub expected: String,
}

/// A named collection of fixture cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSuite {
    pub suite: String,
    pub cases: Vec<FixtureCase>,
}

/// One execution row: a case run under one unit type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRow {
    pub case_name: String,
    pub unit: String,
    pub expected: String,
    pub actual: String,
    pub must_fail: bool,
    pub failed_underneath: bool,
    pub passed: bool,
}

/// Aggregate counters for one suite run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifySummary {
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
}

/// Full result of running one suite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyReport {
    pub suite: String,
    pub rows: Vec<CaseRow>,
    pub summary: VerifySummary,
}

impl VerifyReport {
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.summary.failed == 0
    }
}

/// Loads a fixture suite from a JSON file.
pub fn load_suite(path: &Path) -> Result<FixtureSuite, HarnessError> {
    let display = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| HarnessError::Read {
        path: display.clone(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| HarnessError::Parse {
        path: display,
        source,
    })
}

/// Runs every case in `suite` under its requested unit types.
#[must_use]
pub fn run_suite(suite: &FixtureSuite) -> VerifyReport {
    let mut rows = Vec::new();
    for case in &suite.cases {
        let units = case
            .units
            .clone()
            .unwrap_or_else(|| UnitKind::ALL.to_vec());
        for unit in units {
            rows.push(run_case(case, unit));
        }
    }
    let passed = rows.iter().filter(|r| r.passed).count() as u64;
    let total = rows.len() as u64;
    VerifyReport {
        suite: suite.suite.clone(),
        summary: VerifySummary {
            total,
            passed,
            failed: total - passed,
        },
        rows,
    }
}

/// Runs one case under one unit type and judges the outcome.
#[must_use]
pub fn run_case(case: &FixtureCase, unit: UnitKind) -> CaseRow {
    let (actual, failed_underneath) = match unit {
        UnitKind::Narrow => execute(case, |s| s.as_bytes().to_vec(), convert::narrow::to_string),
        UnitKind::Wide => execute(case, convert::wide::from_str, convert::wide::to_string),
        UnitKind::Utf8 => execute(case, convert::utf8::from_str, convert::utf8::to_string),
    };
    let passed = actual == case.expected && failed_underneath == case.must_fail;
    CaseRow {
        case_name: case.name.clone(),
        unit: unit.as_str().to_string(),
        expected: case.expected.clone(),
        actual,
        must_fail: case.must_fail,
        failed_underneath,
        passed,
    }
}

/// Renders a markdown report of a suite run.
#[must_use]
pub fn render_markdown(report: &VerifyReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Conformance report: {}", report.suite);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{} cases, {} passed, {} failed",
        report.summary.total, report.summary.passed, report.summary.failed
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "| case | unit | expected | actual | status |");
    let _ = writeln!(out, "|---|---|---|---|---|");
    for row in &report.rows {
        let _ = writeln!(
            out,
            "| {} | {} | `{}` | `{}` | {} |",
            row.case_name,
            row.unit,
            row.expected,
            row.actual,
            if row.passed { "pass" } else { "FAIL" }
        );
    }
    out
}

/// Encodes the case for one unit type, runs it, and decodes the result.
///
/// Returns the decoded output of the never-fails surface and whether the
/// checked surface reported a failure.
fn execute<U, E, D>(case: &FixtureCase, encode: E, decode: D) -> (String, bool)
where
    U: CharUnit,
    E: Fn(&str) -> Vec<U>,
    D: Fn(&[U]) -> String,
{
    let template = encode(&case.template);
    // String arguments need owned unit storage the FormatArg list can borrow.
    let storage: Vec<Vec<U>> = case
        .args
        .iter()
        .filter_map(|a| match a {
            CaseArg::Str(s) => Some(encode(s)),
            _ => None,
        })
        .collect();
    let mut strings = storage.iter();
    let args: Vec<FormatArg<'_, U>> = case
        .args
        .iter()
        .map(|a| match a {
            CaseArg::Int(v) => FormatArg::Int(*v),
            CaseArg::Uint(v) => FormatArg::Uint(*v),
            CaseArg::Float(v) => FormatArg::Float(*v),
            CaseArg::Char(v) => FormatArg::Char(*v),
            CaseArg::Str(_) => FormatArg::Str(strings.next().map_or(&[][..], Vec::as_slice)),
        })
        .collect();

    let failed_underneath = try_format(&template, &args).is_err();
    let actual = match &case.append_to {
        Some(prefix) => {
            let mut target = encode(prefix);
            append_format(&mut target, &template, &args);
            decode(&target)
        }
        None => decode(&format(&template, &args)),
    };
    (actual, failed_underneath)
}
