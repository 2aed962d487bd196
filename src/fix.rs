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

//! Text edits produced by rules, and their application to source code.

use std::ops::Range;

/// A single edit: replace the bytes in `range` with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fix {
    /// Byte range being replaced. May be empty, in which case the fix is an insertion.
    pub range: Range<usize>,
    /// Replacement text. Empty for a deletion.
    pub replacement: String,
}

impl Fix {
    /// Creates a fix replacing `range` with `replacement`.
    pub fn replace<S: Into<String>>(range: Range<usize>, replacement: S) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }
}

/// A set of non-overlapping fixes, sorted by start offset.
///
/// Overlapping fixes are resolved by dropping the later one, so the first fix to claim a range
/// wins.
#[derive(Debug, Default)]
pub struct FixSet {
    fixes: Vec<Fix>,
}

impl FixSet {
    /// Builds a set from fixes in any order.
    #[must_use]
    pub fn from_vec(mut raw: Vec<Fix>) -> Self {
        raw.sort_by_key(|fix| fix.range.start);

        let mut accepted: Vec<Fix> = Vec::with_capacity(raw.len());
        for fix in raw {
            if let Some(last) = accepted.last() {
                // Two insertions at the same offset also conflict
                if fix.range.start < last.range.end || fix.range.start == last.range.start {
                    tracing::debug!(?fix.range, "dropping fix which overlaps another");
                    continue;
                }
            }
            accepted.push(fix);
        }

        Self { fixes: accepted }
    }

    /// Applies the fixes to `code` in a single pass, returning the new code.
    #[must_use]
    pub fn apply(&self, code: &str) -> String {
        let mut result = String::with_capacity(code.len());
        let mut cursor = 0;
        for fix in &self.fixes {
            result.push_str(&code[cursor..fix.range.start]);
            result.push_str(&fix.replacement);
            cursor = fix.range.end;
        }
        result.push_str(&code[cursor..]);
        result
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fixes.len()
    }
}
