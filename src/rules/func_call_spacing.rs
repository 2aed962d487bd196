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

//! # `func-call-spacing`
//!
//! ```text
//! Spacing between the callee of a call or constructor invocation and the
//! parenthesis opening its argument list must follow the configured policy.
//!
//!   never (default):  f(a, b)     new Foo()
//!   always:           f (a, b)    new Foo ()
//! ```
//!
//! # Implementation notes
//!
//! - The gap is measured from the end of the callee to the call's own opening parenthesis. When
//!   the callee is wrapped in grouping parentheses, as in `(f) (0)`, the gap starts after the
//!   outermost grouping parenthesis.
//!
//! - Gaps containing a comment are never reported or fixed, whatever the policy.
//!
//! - Optional calls (`f?.()`) have the `?.` token in the gap and are not checked.
//!
//! - Under `always`, any amount of whitespace (including a lone newline) is accepted. Fixes insert
//!   a single space.

use std::ops::Range;

use crate::{
    calls::{call_sites, CallKind, CallLikeNode},
    config::Policy,
    diagnostic::{Diagnostic, SourceRange},
    error::RuleError,
    fix::Fix,
    rules::api::{CheckOutcome, Rule, RuleDescription, SourceInfo},
    tokens::TokenStream,
};

/// Kind of spacing violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Whitespace is required but absent.
    MissingSpace,
    /// Whitespace is present but forbidden.
    UnexpectedSpace,
}

impl MessageKind {
    /// Stable identifier of this kind of violation.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            MessageKind::MissingSpace => "missing-space",
            MessageKind::UnexpectedSpace => "unexpected-space",
        }
    }

    /// Human-readable message for this kind of violation.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            MessageKind::MissingSpace => "Missing space between function name and paren.",
            MessageKind::UnexpectedSpace => "Unexpected space between function name and paren.",
        }
    }
}

/// The source between the end of a callee and the opening parenthesis of its argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gap<'src> {
    /// Byte range of the gap.
    pub range: Range<usize>,
    /// Text of the gap.
    pub text: &'src str,
    /// Whether a comment lies in the gap.
    pub has_comment: bool,
    /// Whether a token other than a comment lies in the gap, e.g. `?.`.
    pub has_code: bool,
}

impl Gap<'_> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Result of comparing a [`Gap`] against the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Compliant,
    /// The gap holds something other than whitespace and is left alone.
    Skip,
    Violation(MessageKind),
}

/// A violation found at a single call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: MessageKind,
    pub node_kind: CallKind,
    /// Byte range of the last token of the callee, after grouping parentheses.
    pub anchor: Range<usize>,
    /// Byte range of the gap.
    pub gap: Range<usize>,
    pub fix: Fix,
}

/// Returns the index of the token marking the end of the callee for spacing purposes.
///
/// This is the last token of the callee itself, or the outermost closing parenthesis which only
/// groups the callee, as in `((f))(0)`. A closing parenthesis only groups the callee if its
/// partner opens before the callee starts; the parenthesis closing an inner call, as in `f()()`,
/// is part of the callee.
///
/// # Errors
///
/// Returns an error if no token ends where the callee ends.
pub fn resolve_callee_boundary(
    tokens: &TokenStream,
    callee: &Range<usize>,
) -> Result<usize, RuleError> {
    let mut boundary = tokens
        .ending_at(callee.end)
        .ok_or(RuleError::CalleeBoundaryNotFound { offset: callee.end })?;
    while let Some(next) = tokens.next_code_token(tokens[boundary].range.end) {
        if !tokens[next].is_punctuator(")") {
            break;
        }
        match tokens.matching_paren(next) {
            Some(open) if tokens[open].range.start < callee.start => boundary = next,
            _ => break,
        }
    }
    Ok(boundary)
}

/// Returns the index of the token opening the argument list of `site`.
///
/// Returns `Ok(None)` if the invocation has no parenthesized argument list, as in `new Foo`.
///
/// # Errors
///
/// Returns an error if the argument list doesn't start with a `(` token.
pub fn locate_open_paren(
    tokens: &TokenStream,
    site: &CallLikeNode,
) -> Result<Option<usize>, RuleError> {
    let Some(offset) = site.arguments_open else {
        return Ok(None);
    };
    match tokens.starting_at(offset) {
        Some(paren) if tokens[paren].is_punctuator("(") => Ok(Some(paren)),
        _ => Err(RuleError::ArgumentsNotParenthesized { offset }),
    }
}

/// Measures the gap between the `boundary` and `paren` tokens.
///
/// # Errors
///
/// Returns an error if the gap is inverted or contains text which isn't whitespace but isn't
/// part of any token either.
pub fn measure_gap<'src>(
    tokens: &TokenStream<'src>,
    code: &'src str,
    boundary: usize,
    paren: usize,
) -> Result<Gap<'src>, RuleError> {
    let range = tokens[boundary].range.end..tokens[paren].range.start;
    if range.start > range.end {
        return Err(RuleError::UntokenizedGap {
            start: range.start,
            end: range.end,
        });
    }
    let inside = tokens.between(range.clone());
    let has_comment = inside.iter().any(|token| token.is_comment());
    let has_code = inside.iter().any(|token| !token.is_comment());
    let text = &code[range.clone()];
    if inside.is_empty() && !text.chars().all(char::is_whitespace) {
        return Err(RuleError::UntokenizedGap {
            start: range.start,
            end: range.end,
        });
    }
    Ok(Gap {
        range,
        text,
        has_comment,
        has_code,
    })
}

/// Compares a gap against the policy.
#[must_use]
pub fn classify_gap(gap: &Gap, policy: Policy) -> Classification {
    if gap.has_comment || gap.has_code {
        return Classification::Skip;
    }
    match (policy, gap.is_empty()) {
        (Policy::Never, false) => Classification::Violation(MessageKind::UnexpectedSpace),
        (Policy::Always, true) => Classification::Violation(MessageKind::MissingSpace),
        _ => Classification::Compliant,
    }
}

/// Returns the edit replacing the whole gap with the spacing the policy asks for.
#[must_use]
pub fn emit_fix(gap: &Gap, policy: Policy) -> Fix {
    match policy {
        Policy::Never => Fix::replace(gap.range.clone(), ""),
        Policy::Always => Fix::replace(gap.range.clone(), " "),
    }
}

/// # `func-call-spacing`.
///
/// See module-level documentation for details.
pub struct FuncCallSpacing {
    policy: Policy,
}

impl FuncCallSpacing {
    /// Constructs a new instance of this rule enforcing `policy`.
    #[must_use]
    pub fn new(policy: Policy) -> Self {
        Self { policy }
    }

    /// Checks a single call site.
    ///
    /// # Errors
    ///
    /// Returns an error if the call site doesn't line up with the token stream.
    pub fn check_call(
        &self,
        source: &SourceInfo,
        site: &CallLikeNode,
    ) -> Result<Option<Violation>, RuleError> {
        let tokens = &source.tokens;
        tracing::trace!(kind = ?site.kind, callee = ?site.callee, "checking call site");

        let Some(paren) = locate_open_paren(tokens, site)? else {
            tracing::debug!(callee = ?site.callee, "no argument list");
            return Ok(None);
        };
        let boundary = resolve_callee_boundary(tokens, &site.callee)?;
        let gap = measure_gap(tokens, source.code, boundary, paren)?;

        match classify_gap(&gap, self.policy) {
            Classification::Compliant => Ok(None),
            Classification::Skip => {
                tracing::debug!(gap = ?gap.range, text = gap.text, "gap holds more than whitespace");
                Ok(None)
            }
            Classification::Violation(kind) => {
                tracing::debug!(gap = ?gap.range, id = kind.id(), "spacing violation");
                Ok(Some(Violation {
                    kind,
                    node_kind: site.kind,
                    anchor: tokens[boundary].range.clone(),
                    gap: gap.range.clone(),
                    fix: emit_fix(&gap, self.policy),
                }))
            }
        }
    }

    /// Turns a [`Violation`] into a [`Diagnostic`].
    fn to_diagnostic<'a>(&self, source: &'a SourceInfo, violation: Violation) -> Diagnostic<'a> {
        let label = match violation.kind {
            MessageKind::MissingSpace => "Space expected here",
            MessageKind::UnexpectedSpace => "Space found here",
        };
        self.report(violation.kind.id(), violation.kind.message())
            .with_node_kind(violation.node_kind)
            .with_violation_parts(
                source.filename,
                SourceRange::from_byte_range(violation.anchor, source),
                "Callee ends here",
            )
            .with_reference_parts(
                source.filename,
                SourceRange::from_byte_range(violation.gap, source),
                label,
            )
            .with_fix(Some(violation.fix))
    }
}

impl Rule for FuncCallSpacing {
    fn describe(&self) -> &'static RuleDescription {
        &RuleDescription {
            name: "func-call-spacing",
            description:
                "require or disallow spacing between function identifiers and their invocations",
            fixable: true,
        }
    }

    fn check<'a>(&self, source: &'a SourceInfo) -> CheckOutcome<'a> {
        let mut outcome = CheckOutcome::default();
        for site in call_sites(&source.tree, source.code) {
            match self.check_call(source, &site) {
                Ok(Some(violation)) => {
                    outcome.diagnostics.push(self.to_diagnostic(source, violation));
                }
                Ok(None) => (),
                Err(fault) => {
                    tracing::warn!(%fault, "could not check call site");
                    outcome.faults.push(fault);
                }
            }
        }
        outcome
    }
}
