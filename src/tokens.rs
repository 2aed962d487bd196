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

//! Flat token stream derived from a syntax tree.
//!
//! Tree-sitter does not expose a token list of its own, so one is rebuilt from the leaves of the
//! tree. Comments are extras in the tree and end up in the stream like any other leaf. Tokens are
//! stored in document order and never overlap, so both their start and end offsets are sorted,
//! which lets every lookup by offset be a binary search.

use std::ops::Range;

use tree_sitter::{Node, Tree};

/// Node kinds which are kept as a single token even though the grammar gives them children.
const ATOMIC_KINDS: &[&str] = &["string", "regex", "number", "comment", "html_comment"];

/// Named leaf kinds which are keywords rather than names or literals.
const KEYWORD_LEAVES: &[&str] = &["this", "super", "null", "undefined", "true", "false"];

/// Broad classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Punctuator,
    Keyword,
    Identifier,
    Literal,
    Comment,
}

/// A single token of the source code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    /// Byte range of the token within the source code.
    pub range: Range<usize>,
    pub text: &'src str,
}

impl Token<'_> {
    /// Returns `true` if this token is the punctuator `punct`.
    #[must_use]
    pub fn is_punctuator(&self, punct: &str) -> bool {
        self.kind == TokenKind::Punctuator && self.text == punct
    }

    #[must_use]
    pub fn is_comment(&self) -> bool {
        self.kind == TokenKind::Comment
    }
}

/// Ordered, read-only sequence of [tokens][Token] with offset-based lookup.
#[derive(Debug, Clone, Default)]
pub struct TokenStream<'src> {
    tokens: Vec<Token<'src>>,
    /// For each token, the index of its partner if it is a balanced parenthesis.
    partners: Vec<Option<usize>>,
}

impl<'src> TokenStream<'src> {
    /// Builds the token stream for `tree`, which must have been parsed from `code`.
    #[must_use]
    pub fn from_tree(tree: &Tree, code: &'src str) -> Self {
        let mut tokens = Vec::new();
        collect_leaves(tree, code, &mut tokens);
        Self::from_tokens(tokens)
    }

    /// Builds a token stream from tokens which are already in document order.
    #[must_use]
    pub fn from_tokens(tokens: Vec<Token<'src>>) -> Self {
        let mut partners = vec![None; tokens.len()];
        let mut open_parens = Vec::new();
        for (i, token) in tokens.iter().enumerate() {
            if token.is_punctuator("(") {
                open_parens.push(i);
            } else if token.is_punctuator(")") {
                if let Some(open) = open_parens.pop() {
                    partners[open] = Some(i);
                    partners[i] = Some(open);
                }
            }
        }
        Self { tokens, partners }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token<'src>> {
        self.tokens.iter()
    }

    /// Returns the index of the token which ends exactly at `offset`.
    #[must_use]
    pub fn ending_at(&self, offset: usize) -> Option<usize> {
        let i = self.tokens.partition_point(|t| t.range.end < offset);
        self.tokens.get(i).filter(|t| t.range.end == offset).map(|_| i)
    }

    /// Returns the index of the token which starts exactly at `offset`.
    #[must_use]
    pub fn starting_at(&self, offset: usize) -> Option<usize> {
        let i = self.tokens.partition_point(|t| t.range.start < offset);
        self.tokens.get(i).filter(|t| t.range.start == offset).map(|_| i)
    }

    /// Returns the index of the last token ending at or before `offset`, comments included.
    #[must_use]
    pub fn before(&self, offset: usize) -> Option<usize> {
        self.tokens.partition_point(|t| t.range.end <= offset).checked_sub(1)
    }

    /// Returns the index of the first token starting at or after `offset`, comments included.
    #[must_use]
    pub fn after(&self, offset: usize) -> Option<usize> {
        let i = self.tokens.partition_point(|t| t.range.start < offset);
        (i < self.tokens.len()).then_some(i)
    }

    /// Like [`after()`][Self::after], but skips over comments.
    #[must_use]
    pub fn next_code_token(&self, offset: usize) -> Option<usize> {
        let first = self.after(offset)?;
        (first..self.tokens.len()).find(|&i| !self.tokens[i].is_comment())
    }

    /// Returns the tokens lying entirely within `range`, comments included.
    #[must_use]
    pub fn between(&self, range: Range<usize>) -> &[Token<'src>] {
        let first = self.tokens.partition_point(|t| t.range.start < range.start);
        let last = self.tokens.partition_point(|t| t.range.end <= range.end);
        if first >= last {
            &[]
        } else {
            &self.tokens[first..last]
        }
    }

    /// Returns the index of the parenthesis balancing the one at `index`.
    ///
    /// Returns `None` if the token is not a parenthesis or has no partner.
    #[must_use]
    pub fn matching_paren(&self, index: usize) -> Option<usize> {
        self.partners.get(index).copied().flatten()
    }
}

impl<'src> std::ops::Index<usize> for TokenStream<'src> {
    type Output = Token<'src>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.tokens[index]
    }
}

/// Appends the leaves of `tree` to `tokens` in document order.
fn collect_leaves<'src>(tree: &Tree, code: &'src str, tokens: &mut Vec<Token<'src>>) {
    let mut cursor = tree.walk();
    loop {
        let node = cursor.node();
        let is_token = node.child_count() == 0 || ATOMIC_KINDS.contains(&node.kind());
        // Zero-width leaves are MISSING nodes inserted during error recovery
        if is_token && !node.byte_range().is_empty() {
            tokens.push(Token {
                kind: classify(node, code),
                range: node.byte_range(),
                text: &code[node.byte_range()],
            });
        }
        if !is_token && cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// Decides the [`TokenKind`] of a leaf node.
fn classify(node: Node, code: &str) -> TokenKind {
    let kind = node.kind();
    if kind.ends_with("comment") {
        TokenKind::Comment
    } else if !node.is_named() {
        let text = &code[node.byte_range()];
        if text.chars().all(|c| c.is_ascii_alphabetic()) {
            TokenKind::Keyword
        } else {
            TokenKind::Punctuator
        }
    } else if KEYWORD_LEAVES.contains(&kind) {
        TokenKind::Keyword
    } else if kind.ends_with("identifier") {
        TokenKind::Identifier
    } else {
        TokenKind::Literal
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::helpers::testing::parse;

    use super::{TokenKind, TokenStream};

    #[test]
    fn kinds_and_texts() {
        let code = "new Foo(/* a */ 'x', 1, this);";
        let tree = parse(code);
        let tokens = TokenStream::from_tree(&tree, code);
        let actual: Vec<(TokenKind, &str)> = tokens.iter().map(|t| (t.kind, t.text)).collect();
        assert_eq!(
            vec![
                (TokenKind::Keyword, "new"),
                (TokenKind::Identifier, "Foo"),
                (TokenKind::Punctuator, "("),
                (TokenKind::Comment, "/* a */"),
                (TokenKind::Literal, "'x'"),
                (TokenKind::Punctuator, ","),
                (TokenKind::Literal, "1"),
                (TokenKind::Punctuator, ","),
                (TokenKind::Keyword, "this"),
                (TokenKind::Punctuator, ")"),
                (TokenKind::Punctuator, ";"),
            ],
            actual
        );
    }

    #[test]
    fn parentheses_are_paired() {
        let code = "( (f) )( (0) )";
        let tree = parse(code);
        let tokens = TokenStream::from_tree(&tree, code);
        let open = |offset| tokens.starting_at(offset).unwrap();
        assert_eq!(tokens.starting_at(6), tokens.matching_paren(open(0)));
        assert_eq!(tokens.starting_at(4), tokens.matching_paren(open(2)));
        assert_eq!(tokens.starting_at(13), tokens.matching_paren(open(7)));
        assert_eq!(tokens.starting_at(11), tokens.matching_paren(open(9)));
        assert_eq!(Some(open(0)), tokens.matching_paren(tokens.starting_at(6).unwrap()));
        // `f` is not a parenthesis
        assert_eq!(None, tokens.matching_paren(tokens.starting_at(3).unwrap()));
    }

    #[test]
    fn offset_lookups() {
        let code = "f /* c */ (a);";
        let tree = parse(code);
        let tokens = TokenStream::from_tree(&tree, code);
        // f, comment, (, a, ), ;
        assert_eq!(6, tokens.len());
        assert_eq!(Some(0), tokens.ending_at(1));
        assert_eq!(None, tokens.ending_at(2));
        assert_eq!(Some(2), tokens.starting_at(10));
        assert_eq!(Some(1), tokens.before(10));
        assert_eq!(Some(0), tokens.before(2));
        assert_eq!(None, tokens.before(0));
        assert_eq!(Some(1), tokens.after(1));
        assert_eq!(Some(2), tokens.next_code_token(1));
        assert_eq!(None, tokens.after(code.len()));
        assert!(tokens[1].is_comment());
        assert!(tokens[2].is_punctuator("("));
        assert!(!tokens[3].is_punctuator("("));
    }

    #[test]
    fn between_includes_comments_only_inside_range() {
        let code = "f /* c */ // d\n(a);";
        let tree = parse(code);
        let tokens = TokenStream::from_tree(&tree, code);
        let inside: Vec<&str> = tokens.between(1..15).iter().map(|t| t.text).collect();
        assert_eq!(vec!["/* c */", "// d"], inside);
        assert!(tokens.between(1..1).is_empty());
        assert!(tokens.between(1..2).is_empty());
    }

    #[test]
    fn template_substitutions_are_tokenized() {
        let code = "`a${f ()}b`;";
        let tree = parse(code);
        let tokens = TokenStream::from_tree(&tree, code);
        let f = tokens.ending_at(5).unwrap();
        assert_eq!("f", tokens[f].text);
        assert!(tokens[f - 1].is_punctuator("${"));
        assert!(tokens[tokens.next_code_token(5).unwrap()].is_punctuator("("));
    }
}
