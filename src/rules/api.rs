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

//! API for [rules][Rule].

use std::borrow::Cow;

use tree_sitter::{Parser, Tree};

use crate::{
    diagnostic::Diagnostic,
    error::{Error, RuleError},
    helpers::{javascript, LinesWithPosition},
    tokens::TokenStream,
};

/// Everything a rule may inspect about a source file.
pub struct SourceInfo<'src> {
    /// Name of the file being checked.
    pub filename: &'src str,
    /// Text/code of the file.
    pub code: &'src str,
    /// [`Tree`] representing the file.
    pub tree: Tree,
    /// Lines of the file, each with the byte offset at which it starts.
    pub lines: Vec<(&'src str, usize)>,
    /// Tokens of the file, comments included.
    pub tokens: TokenStream<'src>,
}

impl<'src> SourceInfo<'src> {
    /// Parses `code` as JavaScript and prepares it for checking.
    ///
    /// # Errors
    ///
    /// Returns an error if the JavaScript grammar can't be loaded or the parser fails.
    pub fn new(filename: &'src str, code: &'src str) -> Result<Self, Error> {
        let mut parser = Parser::new();
        parser.set_language(&javascript())?;
        let tree = parser.parse(code, None).ok_or(Error::ParseFailure)?;
        let tokens = TokenStream::from_tree(&tree, code);
        Ok(Self {
            filename,
            code,
            tree,
            lines: LinesWithPosition::from(code).collect(),
            tokens,
        })
    }
}

/// Static information about a rule.
#[derive(Debug, PartialEq, Eq)]
pub struct RuleDescription {
    /// Identifier of the rule, e.g. `func-call-spacing`.
    pub name: &'static str,
    /// Short description of what the rule enforces.
    pub description: &'static str,
    /// Whether the rule can produce fixes.
    pub fixable: bool,
}

/// Result of checking a file with a rule.
#[derive(Debug, Default)]
pub struct CheckOutcome<'a> {
    /// Violations found, in document order.
    pub diagnostics: Vec<Diagnostic<'a>>,
    /// Internal-consistency faults, one per node that could not be checked.
    pub faults: Vec<RuleError>,
}

/// Represents a linter rule.
pub trait Rule {
    /// Returns the description of this rule.
    fn describe(&self) -> &'static RuleDescription;

    /// Checks a source file for compliance with this rule.
    fn check<'a>(&self, source: &'a SourceInfo) -> CheckOutcome<'a>;

    /// Creates a [`Diagnostic`] for this rule with the given message ID and message.
    fn report<'a, M>(&self, message_id: &'static str, message: M) -> Diagnostic<'a>
    where
        M: Into<Cow<'a, str>>,
        Self: Sized,
    {
        Diagnostic::new(self.describe(), message_id, message)
    }
}
