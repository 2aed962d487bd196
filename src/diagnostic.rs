//! Diagnostic types

use std::{borrow::Cow, ops::Range};

use crate::{
    calls::CallKind,
    fix::Fix,
    helpers::line_width,
    rules::api::{RuleDescription, SourceInfo},
};

/// Represents a diagnostic message for a rule violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic<'a> {
    /// Description of the rule that was violated.
    pub rule: &'static RuleDescription,

    /// Short, stable identifier of the kind of violation, e.g. `unexpected-space`.
    pub message_id: &'static str,

    /// Message describing the violation.
    pub message: Cow<'a, str>,

    /// Kind of the invocation which was found in violation, if the rule concerns invocations.
    pub node_kind: Option<CallKind>,

    /// Locations of code that violated the rule. The first one is the anchor of the diagnostic.
    pub violations: Vec<Span<'a>>,

    /// Locations of code that are relevant to the violation but are not violations themselves.
    pub references: Vec<Span<'a>>,

    /// Edit which resolves the violation, if one can be made safely.
    pub fix: Option<Fix>,
}

impl<'a> Diagnostic<'a> {
    /// Creates a new `Diagnostic` with the given rule, message ID, and message.
    pub fn new<M>(rule: &'static RuleDescription, message_id: &'static str, message: M) -> Self
    where
        M: Into<Cow<'a, str>>,
    {
        Self {
            rule,
            message_id,
            message: message.into(),
            node_kind: None,
            violations: Vec::new(),
            references: Vec::new(),
            fix: None,
        }
    }

    /// Sets the node kind and returns the modified diagnostic.
    #[must_use]
    pub fn with_node_kind(mut self, node_kind: CallKind) -> Self {
        self.node_kind = Some(node_kind);
        self
    }

    /// Adds a violation span constructed by calling [`Span::new()`] with the given arguments.
    /// Returns the modified diagnostic.
    #[must_use]
    pub fn with_violation_parts<L>(
        mut self,
        filename: &'a str,
        range: SourceRange,
        label: L,
    ) -> Self
    where
        L: Into<Cow<'a, str>>,
    {
        self.violations.push(Span::new(filename, range, label));
        self
    }

    /// Adds a reference span constructed by calling [`Span::new()`] with the given arguments.
    /// Returns the modified diagnostic.
    #[must_use]
    pub fn with_reference_parts<L>(
        mut self,
        filename: &'a str,
        range: SourceRange,
        label: L,
    ) -> Self
    where
        L: Into<Cow<'a, str>>,
    {
        self.references.push(Span::new(filename, range, label));
        self
    }

    /// Attaches a fix and returns the modified diagnostic.
    #[must_use]
    pub fn with_fix(mut self, fix: Option<Fix>) -> Self {
        self.fix = fix;
        self
    }

    /// Returns the type of the syntax node in violation, e.g. `CallExpression`.
    #[must_use]
    pub fn node_type(&self) -> Option<&'static str> {
        self.node_kind.map(CallKind::node_type)
    }

    /// Returns the anchor of this diagnostic, i.e. the range of its first violation.
    #[must_use]
    pub fn anchor(&self) -> Option<&SourceRange> {
        self.violations.first().map(|span| &span.range)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span<'a> {
    /// Name of the source file.
    pub filename: &'a str,

    /// Range of the source code.
    pub range: SourceRange,

    /// Label for the span.
    pub label: Cow<'a, str>,
}

impl<'a> Span<'a> {
    /// Creates a new `Span` with the given filename, range, and label.
    pub fn new<L>(filename: &'a str, range: SourceRange, label: L) -> Self
    where
        L: Into<Cow<'a, str>>,
    {
        Self {
            filename,
            range,
            label: label.into(),
        }
    }
}

/// Represents a range of source code, as both a byte range and line/column positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRange {
    /// Range of bytes in the source code.
    pub bytes: Range<usize>,
    /// Start position (inclusive) in the source code as 0-indexed (row, column).
    pub start_pos: (usize, usize),
    /// End position (exclusive) in the source code as 0-indexed (row, column).
    pub end_pos: (usize, usize),
}

impl SourceRange {
    /// Creates a [`SourceRange`] from just a byte range, using the provided `SourceInfo` to determine
    /// the start and end positions.
    #[must_use]
    pub fn from_byte_range(bytes: Range<usize>, source: &SourceInfo) -> Self {
        let start_pos = position_of(bytes.start, source);
        let end_pos = position_of(bytes.end, source);
        Self {
            bytes,
            start_pos,
            end_pos,
        }
    }
}

/// Returns the 0-indexed row of the byte at `offset` and the part of that row before it.
///
/// An offset pointing at the line terminator is clamped to the end of the line. Input without
/// any lines has everything at the origin.
fn line_prefix<'src>(offset: usize, source: &SourceInfo<'src>) -> (usize, &'src str) {
    let line_i = source
        .lines
        .partition_point(|&(_, pos)| pos <= offset)
        .saturating_sub(1);
    let Some(&(line, line_pos)) = source.lines.get(line_i) else {
        return (0, "");
    };
    (line_i, &line[..offset.saturating_sub(line_pos).min(line.len())])
}

/// Returns the 0-indexed (row, column) position of the byte at `offset`, where the column is a
/// display width.
fn position_of(offset: usize, source: &SourceInfo) -> (usize, usize) {
    let (row, prefix) = line_prefix(offset, source);
    (row, line_width(prefix))
}

/// Returns the 0-indexed column of the byte at `offset`, counted in characters.
///
/// Unlike [`SourceRange::start_pos`], tabs and wide characters count as a single column.
#[must_use]
pub fn char_column(offset: usize, source: &SourceInfo) -> usize {
    line_prefix(offset, source).1.chars().count()
}
