// Copyright (C) 2025 Kian Kasad <kian@kasad.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::{Parser, ValueEnum};
use clap_stdin::FileOrStdin;
use codespan_reporting::{
    diagnostic::{Diagnostic as Report, Label},
    files::SimpleFile,
    term::{
        self,
        termcolor::{ColorChoice, StandardStream},
    },
};
use serde::Serialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::{
    calls::CallKind,
    config::{Config, Policy},
    diagnostic::{char_column, Diagnostic},
    error::{Error, RuleError},
    fix::FixSet,
    rules::api::{Rule, SourceInfo},
};

pub mod calls;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod fix;
pub mod helpers;
pub mod rules;
pub mod tokens;

/// Output format for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Annotated source snippets, written to standard error.
    #[default]
    Human,
    /// A JSON array, written to standard output.
    Json,
}

/// Checks the spacing between callees and the parentheses of their argument lists in JavaScript
/// code.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// File to check, or `-' for standard input.
    #[arg(default_value = "-")]
    file: FileOrStdin,

    /// Spacing policy. Overrides the configuration file.
    #[arg(short, long)]
    policy: Option<Policy>,

    /// JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fix violations, rewriting the file in place. When reading standard input, the fixed code
    /// is written to standard output and diagnostics always go to standard error.
    #[arg(long)]
    fix: bool,

    /// Output format for diagnostics.
    #[arg(long, value_enum, default_value_t)]
    format: Format,

    /// List the available rules and exit.
    #[arg(long)]
    list_rules: bool,
}

/// Installs a log subscriber writing to standard error if `RUST_LOG` is set.
fn init_tracing() {
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(true).with_level(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err @ Error::Syntax(_)) => {
            eprintln!("{err}.");
            eprintln!("Ensure your code parses before running the linter.");
            eprintln!("To prevent false positives, the linter will not check code with syntax errors.");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Error> {
    // Load configuration
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(policy) = cli.policy {
        config.policy = policy;
    }
    tracing::debug!(?config, "loaded configuration");
    let rules = rules::get_rules(&config);
    if cli.list_rules {
        list_rules(&mut io::stdout(), &rules).map_err(|source| Error::Io {
            path: PathBuf::from("-"),
            source,
        })?;
        return Ok(ExitCode::SUCCESS);
    }

    // Read input
    let filename = cli.file.filename().to_owned();
    let is_stdin = cli.file.is_stdin();
    let mut code = cli.file.contents()?;

    if cli.fix {
        let fixed = fix_code(&filename, &code, &rules)?;
        if is_stdin {
            print!("{fixed}");
        } else if fixed != code {
            std::fs::write(&filename, &fixed).map_err(|source| Error::Io {
                path: filename.clone().into(),
                source,
            })?;
        }
        code = fixed;
    }

    // Do checks
    let source = parse_checked(&filename, &code)?;
    let mut diagnostics = Vec::new();
    let mut faults = Vec::new();
    for rule in &rules {
        let outcome = rule.check(&source);
        diagnostics.extend(outcome.diagnostics);
        faults.extend(outcome.faults);
    }

    match cli.format {
        Format::Human => print_human(&source, &diagnostics, &faults)?,
        Format::Json if cli.fix && is_stdin => {
            print_json(&mut io::stderr(), &source, &diagnostics)?;
        }
        Format::Json => print_json(&mut io::stdout(), &source, &diagnostics)?,
    }

    if diagnostics.is_empty() && faults.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Parses `code`, refusing code with syntax errors.
fn parse_checked<'a>(filename: &'a str, code: &'a str) -> Result<SourceInfo<'a>, Error> {
    let source = SourceInfo::new(filename, code)?;
    if source.tree.root_node().has_error() {
        return Err(Error::Syntax(filename.to_owned()));
    }
    Ok(source)
}

/// Writes the name, fixability and description of each rule, one per line.
fn list_rules(writer: &mut dyn Write, rules: &[Box<dyn Rule>]) -> io::Result<()> {
    for rule in rules {
        let description = rule.describe();
        let fixable = if description.fixable { "fixable" } else { "" };
        writeln!(writer, "{:<20} {:<8} {}", description.name, fixable, description.description)?;
    }
    Ok(())
}

/// Returns `code` with the fixes from all rules applied.
fn fix_code(filename: &str, code: &str, rules: &[Box<dyn Rule>]) -> Result<String, Error> {
    let source = parse_checked(filename, code)?;
    let fixes = rules
        .iter()
        .flat_map(|rule| rule.check(&source).diagnostics)
        .filter_map(|diagnostic| diagnostic.fix)
        .collect();
    let fixes = FixSet::from_vec(fixes);
    tracing::debug!(count = fixes.len(), "applying fixes");
    Ok(fixes.apply(code))
}

/// Renders diagnostics and faults as annotated snippets on standard error.
fn print_human(
    source: &SourceInfo,
    diagnostics: &[Diagnostic],
    faults: &[RuleError],
) -> Result<(), Error> {
    let file = SimpleFile::new(source.filename, source.code);
    let writer = StandardStream::stderr(ColorChoice::Auto);
    let config = term::Config::default();
    for diagnostic in diagnostics {
        let labels = diagnostic
            .violations
            .iter()
            .map(|span| Label::primary((), span.range.bytes.clone()).with_message(span.label.clone()))
            .chain(diagnostic.references.iter().map(|span| {
                Label::secondary((), span.range.bytes.clone()).with_message(span.label.clone())
            }));
        let mut report = Report::warning()
            .with_code(diagnostic.rule.name)
            .with_message(diagnostic.message.clone())
            .with_labels_iter(labels);
        if let Some(node_type) = diagnostic.node_type() {
            report = report.with_notes(vec![format!("in {node_type}")]);
        }
        term::emit(&mut writer.lock(), &config, &file, &report)?;
    }
    for fault in faults {
        let report = Report::bug().with_message(fault.to_string());
        term::emit(&mut writer.lock(), &config, &file, &report)?;
    }
    Ok(())
}

/// A diagnostic as written in JSON output.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonDiagnostic<'a> {
    rule: &'static str,
    message_kind: &'static str,
    node_kind: Option<CallKind>,
    message: &'a str,
    anchor_offset: usize,
    /// 1-based
    line: usize,
    /// 1-based, counted in characters
    column: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    fix: Option<JsonFix<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonFix<'a> {
    range_start: usize,
    range_end: usize,
    replacement_text: &'a str,
}

/// Writes diagnostics to `writer` as a JSON array.
fn print_json(
    writer: &mut dyn Write,
    source: &SourceInfo,
    diagnostics: &[Diagnostic],
) -> Result<(), Error> {
    let records: Vec<JsonDiagnostic> = diagnostics
        .iter()
        .filter_map(|diagnostic| {
            let anchor = diagnostic.anchor()?;
            Some(JsonDiagnostic {
                rule: diagnostic.rule.name,
                message_kind: diagnostic.message_id,
                node_kind: diagnostic.node_kind,
                message: &diagnostic.message,
                anchor_offset: anchor.bytes.start,
                line: anchor.start_pos.0 + 1,
                column: char_column(anchor.bytes.start, source) + 1,
                fix: diagnostic.fix.as_ref().map(|fix| JsonFix {
                    range_start: fix.range.start,
                    range_end: fix.range.end,
                    replacement_text: &fix.replacement,
                }),
            })
        })
        .collect();
    serde_json::to_writer_pretty(&mut *writer, &records).map_err(Error::Json)?;
    writeln!(writer).map_err(|source| Error::Io {
        path: PathBuf::from("-"),
        source,
    })
}
