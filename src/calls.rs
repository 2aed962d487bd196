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

//! Discovery of call sites in a syntax tree.
//!
//! Tree-sitter keeps grouping parentheses in the tree as `parenthesized_expression` nodes. The
//! spacing check reasons about callees the way an ESTree-style tree presents them, where grouping
//! parentheses are not nodes at all, so [`CallLikeNode`] strips them from the callee's range.

use std::{cmp::Reverse, ops::Range};

use indoc::indoc;
use serde::Serialize;
use tree_sitter::{Node, Tree};

use crate::helpers::{first_named_non_extra_child, QueryHelper};

/// Tree-sitter query matching every call and constructor invocation.
const QUERY_STR: &str = indoc! { /* query */ r#"
    (call_expression) @call
    (new_expression) @construct
"# };

/// Kind of invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CallKind {
    /// An ordinary call, e.g. `f(a, b)`.
    Call,
    /// A constructor invocation, e.g. `new Foo()`.
    Construct,
}

impl CallKind {
    /// Name of the node type this kind corresponds to, used when reporting.
    #[must_use]
    pub fn node_type(self) -> &'static str {
        match self {
            CallKind::Call => "CallExpression",
            CallKind::Construct => "NewExpression",
        }
    }
}

/// A call or constructor invocation, reduced to the offsets the spacing check needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallLikeNode {
    pub kind: CallKind,
    /// Byte range of the whole invocation.
    pub range: Range<usize>,
    /// Byte range of the callee, excluding any parentheses which merely group it.
    pub callee: Range<usize>,
    /// Start byte of the opening parenthesis of the argument list, if there is one.
    pub arguments_open: Option<usize>,
}

impl CallLikeNode {
    /// Builds a [`CallLikeNode`] from a `call_expression` or `new_expression` node.
    ///
    /// Returns `None` for any other kind of node.
    #[must_use]
    pub fn from_node(node: Node) -> Option<Self> {
        let (kind, callee_field) = match node.kind() {
            "call_expression" => (CallKind::Call, "function"),
            "new_expression" => (CallKind::Construct, "constructor"),
            _ => return None,
        };

        let mut callee = node.child_by_field_name(callee_field)?;
        while callee.kind() == "parenthesized_expression" {
            match first_named_non_extra_child(callee) {
                Some(inner) => callee = inner,
                None => break,
            }
        }

        // Tagged templates have a template string in place of the argument list
        let arguments_open = node
            .child_by_field_name("arguments")
            .filter(|arguments| arguments.kind() == "arguments")
            .map(|arguments| arguments.start_byte());

        Some(Self {
            kind,
            range: node.byte_range(),
            callee: callee.byte_range(),
            arguments_open,
        })
    }
}

/// Returns every call site in `tree` in document order.
///
/// Nested invocations starting at the same position are ordered outermost first. This is the
/// order sites are visited in, not the order of their gaps: in `(f)()\n(g) ()` the outer call,
/// whose gap is on line 2, comes before the inner one.
#[must_use]
pub fn call_sites(tree: &Tree, code: &str) -> Vec<CallLikeNode> {
    let helper = QueryHelper::new(QUERY_STR, tree, code);
    let mut sites = Vec::new();
    helper.for_each_capture(|_name, capture| {
        if let Some(site) = CallLikeNode::from_node(capture.node) {
            sites.push(site);
        }
    });
    sites.sort_by_key(|site| (site.range.start, Reverse(site.range.end)));
    sites
}

#[cfg(test)]
mod tests {
    use std::process::ExitCode;

    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use crate::helpers::testing::{parse, test_captures};

    use super::{call_sites, CallKind, CallLikeNode, QUERY_STR};

    #[test]
    fn captures() -> ExitCode {
        let input = indoc! {
            /* js */ r"
            f.b().c ();
            //!? call
            //!? call
            var f = new Foo;
                    //!? construct
            new (foo())
            //!? construct
                 //!? call
            tag`x`;
            //!? call
            "
        };
        test_captures(QUERY_STR, input)
    }

    /// Returns `(kind, callee text, text from the argument list on)` for each call site.
    fn describe(code: &str) -> Vec<(CallKind, &str, Option<&str>)> {
        let tree = parse(code);
        call_sites(&tree, code)
            .into_iter()
            .map(|site| {
                (
                    site.kind,
                    &code[site.callee],
                    site.arguments_open.map(|open| &code[open..site.range.end]),
                )
            })
            .collect()
    }

    #[test]
    fn grouping_parentheses_are_stripped_from_callee() {
        assert_eq!(vec![(CallKind::Call, "f", Some("( 0 )"))], describe("( f )( 0 )"));
        assert_eq!(vec![(CallKind::Call, "f", Some("( (0) )"))], describe("( (f) )( (0) )"));
        assert_eq!(
            vec![(CallKind::Call, "f", Some("(0)"))],
            describe("( /* a */ f /* b */ )(0)")
        );
    }

    #[test]
    fn nested_calls_in_document_order() {
        assert_eq!(
            vec![
                (CallKind::Call, "f()()", Some("(0)")),
                (CallKind::Call, "f()", Some("()")),
                (CallKind::Call, "f", Some("()")),
            ],
            describe("( f()() )(0)")
        );
        assert_eq!(
            vec![
                (CallKind::Call, "f.b().c", Some("()")),
                (CallKind::Call, "f.b", Some("()")),
            ],
            describe("f.b().c();")
        );
    }

    #[test]
    fn sites_are_ordered_by_visit_not_by_gap() {
        assert_eq!(
            vec![
                (CallKind::Call, "(f)()\n(g)", Some("()")),
                (CallKind::Call, "(f)()", Some("(g)")),
                (CallKind::Call, "f", Some("()")),
            ],
            describe("(f)()\n(g) ()")
        );
    }

    #[test]
    fn constructors_without_arguments() {
        assert_eq!(vec![(CallKind::Construct, "Foo", None)], describe("var f = new Foo"));
        assert_eq!(
            vec![(CallKind::Construct, "Foo", Some("()"))],
            describe("var f = new Foo ()")
        );
        assert_eq!(
            vec![(CallKind::Construct, "foo()", None), (CallKind::Call, "foo", Some("()"))],
            describe("new (foo())")
        );
    }

    #[test]
    fn tagged_template_has_no_argument_list() {
        assert_eq!(vec![(CallKind::Call, "tag", None)], describe("tag`x`;"));
    }

    #[test]
    fn other_nodes_are_ignored() {
        let tree = parse("f;");
        assert_eq!(None, CallLikeNode::from_node(tree.root_node()));
    }
}
