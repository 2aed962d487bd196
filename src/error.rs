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

//! Error types

use std::path::PathBuf;

/// Errors produced while loading configuration or preparing a source file for checking.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The JavaScript grammar is incompatible with the linked tree-sitter library.
    #[error("Cannot load JavaScript grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// The parser gave up without producing a tree.
    #[error("Failed to parse code")]
    ParseFailure,

    /// The code contains syntax errors and is not checked.
    #[error("Found syntax error(s) in {0}")]
    Syntax(String),

    /// Reading the input file or standard input failed.
    #[error("Cannot read input: {0}")]
    Input(#[from] clap_stdin::StdinError),

    /// Reading or writing a file failed.
    #[error("Cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rendering diagnostics failed.
    #[error("Cannot print diagnostics: {0}")]
    Render(#[from] codespan_reporting::files::Error),

    /// Serializing diagnostics failed.
    #[error("Cannot serialize diagnostics: {0}")]
    Json(#[source] serde_json::Error),

    /// The configuration file is not valid.
    #[error("Invalid configuration in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Internal-consistency faults raised while checking a single call site.
///
/// These mean the tree and the token stream disagree with each other. They are reported per call
/// site, so one fault never prevents the remaining call sites from being checked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// No token ends where the callee expression ends.
    #[error("No token ends at byte {offset}, where the callee ends")]
    CalleeBoundaryNotFound { offset: usize },

    /// The argument list does not begin with an opening parenthesis token.
    #[error("Argument list at byte {offset} does not start with `('")]
    ArgumentsNotParenthesized { offset: usize },

    /// The span between the callee and its parenthesis holds text not covered by any token.
    #[error("Bytes {start}..{end} between callee and argument list contain untokenized text")]
    UntokenizedGap { start: usize, end: usize },
}
