//! CLI entrypoint for the pxfmt conformance harness.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use pxfmt::{FormatArg, format};
use pxfmt_harness::{HarnessError, load_suite, render_markdown, run_suite};

/// Conformance tooling for pxfmt.
#[derive(Debug, Parser)]
#[command(name = "pxfmt-harness")]
#[command(about = "Conformance testing harness for pxfmt")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Verify the library against a JSON fixture suite.
    Verify {
        /// Fixture JSON file.
        #[arg(long)]
        fixture: PathBuf,
        /// Optional markdown report output path.
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Format a template from the command line (narrow units).
    Demo {
        /// The format template, e.g. "Value: %d".
        template: String,
        /// Positional arguments as `kind:value` pairs, where kind is one of
        /// int, uint, float, char, str.
        args: Vec<String>,
    },
}

/// Owned stand-in for a parsed demo argument, borrowed into a `FormatArg`.
enum DemoArg {
    Int(i64),
    Uint(u64),
    Float(f64),
    Char(char),
    Str(String),
}

fn parse_demo_arg(raw: &str) -> Result<DemoArg, String> {
    let (kind, value) = raw
        .split_once(':')
        .ok_or_else(|| format_arg_usage(raw, "missing `kind:` prefix"))?;
    match kind {
        "int" => value
            .parse()
            .map(DemoArg::Int)
            .map_err(|_| format_arg_usage(raw, "not a signed integer")),
        "uint" => value
            .parse()
            .map(DemoArg::Uint)
            .map_err(|_| format_arg_usage(raw, "not an unsigned integer")),
        "float" => value
            .parse()
            .map(DemoArg::Float)
            .map_err(|_| format_arg_usage(raw, "not a float")),
        "char" => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(DemoArg::Char(c)),
                _ => Err(format_arg_usage(raw, "expected exactly one character")),
            }
        }
        "str" => Ok(DemoArg::Str(value.to_string())),
        _ => Err(format_arg_usage(raw, "unknown kind")),
    }
}

fn format_arg_usage(raw: &str, problem: &str) -> String {
    format!("bad argument `{raw}` ({problem}); expected kind:value with kind in int|uint|float|char|str")
}

fn run_verify(fixture: &PathBuf, report_path: Option<&PathBuf>) -> Result<bool, HarnessError> {
    let suite = load_suite(fixture)?;
    let report = run_suite(&suite);

    for row in &report.rows {
        let status = if row.passed { "pass" } else { "FAIL" };
        println!(
            "[{status}] {} ({}) expected `{}` actual `{}`",
            row.case_name, row.unit, row.expected, row.actual
        );
    }
    println!(
        "{}: {} cases, {} passed, {} failed",
        report.suite, report.summary.total, report.summary.passed, report.summary.failed
    );

    if let Some(path) = report_path {
        std::fs::write(path, render_markdown(&report)).map_err(|source| HarnessError::Report {
            path: path.display().to_string(),
            source,
        })?;
    }
    Ok(report.all_passed())
}

fn run_demo(template: &str, raw_args: &[String]) -> Result<(), String> {
    let parsed: Vec<DemoArg> = raw_args
        .iter()
        .map(|raw| parse_demo_arg(raw))
        .collect::<Result<_, _>>()?;
    let args: Vec<FormatArg<'_, u8>> = parsed
        .iter()
        .map(|a| match a {
            DemoArg::Int(v) => FormatArg::Int(*v),
            DemoArg::Uint(v) => FormatArg::Uint(*v),
            DemoArg::Float(v) => FormatArg::Float(*v),
            DemoArg::Char(v) => FormatArg::Char(*v),
            DemoArg::Str(s) => FormatArg::Str(s.as_bytes()),
        })
        .collect();
    let out = format(template.as_bytes(), &args);
    println!("{}", String::from_utf8_lossy(&out));
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        Command::Verify { fixture, report } => match run_verify(&fixture, report.as_ref()) {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::FAILURE,
            Err(err) => {
                eprintln!("error: {err}");
                ExitCode::FAILURE
            }
        },
        Command::Demo { template, args } => match run_demo(&template, &args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("error: {err}");
                ExitCode::FAILURE
            }
        },
    }
}
