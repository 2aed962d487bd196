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

#[cfg(test)]
pub mod testing;

use tree_sitter::{
    Language, Node, Query, QueryCapture, QueryCursor, StreamingIterator as _, Tree,
};
use unicode_width::UnicodeWidthStr;

/// Returns the tree-sitter [`Language`] for JavaScript.
#[must_use]
pub fn javascript() -> Language {
    tree_sitter_javascript::LANGUAGE.into()
}

/// Helper to handle the boilerplate of creating queries and iterating over the captures.
pub struct QueryHelper<'src> {
    query: Query,
    tree: &'src Tree,
    code: &'src str,
}

impl<'src> QueryHelper<'src> {
    /// Constructs a new [QueryHelper].
    /// This function does not execute the query.
    ///
    /// # Arguments
    ///
    /// - `query_src`: Tree-sitter query to execute.
    /// - `tree`: Tree to execute query on.
    /// - `code`: Source text/code that `tree` represents.
    #[must_use]
    pub fn new(query_src: &str, tree: &'src Tree, code: &'src str) -> Self {
        let query = Query::new(&javascript(), query_src).expect("Failed to parse query");
        Self { query, tree, code }
    }

    /// Executes the query and calls a callback for each capture obtained by the query.
    ///
    /// Captures are delivered in document order.
    ///
    /// # Arguments
    ///
    /// - `handler`: Callback to execute for each capture.
    ///   The arguments to the callback are the name of the capture and the [QueryCapture].
    pub fn for_each_capture<F>(&self, mut handler: F)
    where
        F: FnMut(&str, QueryCapture),
    {
        let mut cursor = QueryCursor::new();
        let capture_names = self.query.capture_names();
        let mut captures =
            cursor.captures(&self.query, self.tree.root_node(), self.code.as_bytes());
        while let Some((qmatch, capture_index_within_match)) = captures.next() {
            let capture = qmatch.captures[*capture_index_within_match];
            let name = capture_names[capture.index as usize];
            handler(name, capture);
        }
    }
}

/// Returns the first child of `node` which is named and is not an extra (i.e. not a comment).
#[must_use]
pub fn first_named_non_extra_child(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    let child = node.named_children(&mut cursor).find(|child| !child.is_extra());
    child
}

/// Iterator over the lines of a string, yielding each line along with the byte offset at which
/// it starts. Line terminators are not included in the yielded lines.
pub struct LinesWithPosition<'a> {
    remaining_input: &'a str,
    index: usize,
}

impl<'a> From<&'a str> for LinesWithPosition<'a> {
    fn from(value: &'a str) -> Self {
        Self {
            remaining_input: value,
            index: 0,
        }
    }
}

impl<'a> Iterator for LinesWithPosition<'a> {
    type Item = (&'a str, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining_input.is_empty() {
            return None;
        }
        let start_index = self.index;
        let eol_index = self.remaining_input.find('\n').unwrap_or(self.remaining_input.len());
        let mut next_line_start = eol_index;
        if eol_index != self.remaining_input.len() {
            // Skip newline
            next_line_start += 1;
        }
        let line = &self.remaining_input[..eol_index];
        self.remaining_input = &self.remaining_input[next_line_start..];
        self.index += next_line_start;
        Some((line, start_index))
    }
}

/// Returns the width of a line in columns.
///
/// Returns the width according to the [unicode_width] module, but with tab characters (U+0009 or
/// `'\t'`) treated as 8 columns wide.
#[must_use]
pub fn line_width(line: &str) -> usize {
    line.width() + line.chars().filter(|c| *c == '\t').count() * 7
}
