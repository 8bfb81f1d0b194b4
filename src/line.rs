// Copyright 2018 Andre-Philippe Paquet
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

//! Parsed representation of a `<number>. <text>` line and the ordering used everywhere.
//!
//! Lines are ordered by their text part first (plain byte comparison) and, when the texts are
//! equal, by their number part as a signed integer.

use std::cmp::Ordering;

use crate::errors::{Result, SortError};

/// A line together with the position of its text part and its parsed number.
///
/// The text part isn't copied: it's a view into the owned line starting right after `". "`.
#[derive(Debug, Clone)]
pub struct LineKey {
    line: String,
    suffix_offset: usize,
    prefix: i64,
}

impl LineKey {
    /// Parses a raw line (without its line terminator).
    pub fn parse(line: String) -> Result<LineKey> {
        let (prefix, suffix_offset) = split(&line)?;
        Ok(LineKey { line, suffix_offset, prefix })
    }

    /// The original line, verbatim.
    #[inline]
    pub fn line(&self) -> &str {
        &self.line
    }

    #[inline]
    pub fn into_line(self) -> String {
        self.line
    }

    /// The text part, after `". "`.
    #[inline]
    pub fn suffix(&self) -> &str {
        &self.line[self.suffix_offset..]
    }

    /// The number part.
    #[inline]
    pub fn prefix(&self) -> i64 {
        self.prefix
    }
}

impl Ord for LineKey {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        compare_parts(self.prefix, self.suffix(), other.prefix, other.suffix())
    }
}

impl PartialOrd for LineKey {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Equality follows the ordering, so "-0. A" and "0. A" are equal keys.
impl PartialEq for LineKey {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LineKey {}

/// Splits a borrowed line into its number and text parts.
pub fn parse_parts(line: &str) -> Result<(i64, &str)> {
    let (prefix, suffix_offset) = split(line)?;
    Ok((prefix, &line[suffix_offset..]))
}

/// Orders two already split lines.
#[inline]
pub fn compare_parts(a_prefix: i64, a_suffix: &str, b_prefix: i64, b_suffix: &str) -> Ordering {
    a_suffix
        .as_bytes()
        .cmp(b_suffix.as_bytes())
        .then(a_prefix.cmp(&b_prefix))
}

/// Returns the parsed number and the byte offset of the text part.
fn split(line: &str) -> Result<(i64, usize)> {
    let bytes = line.as_bytes();
    let dot = match bytes.iter().position(|&b| b == b'.') {
        Some(dot) if bytes.get(dot + 1) == Some(&b' ') => dot,
        _ => return Err(SortError::MissingSeparator { line: line.to_string() }),
    };

    let prefix = line[..dot]
        .parse::<i64>()
        .map_err(|source| SortError::InvalidPrefix { line: line.to_string(), source })?;

    Ok((prefix, dot + 2))
}
