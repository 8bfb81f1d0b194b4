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

//! Error types shared by every stage of the sort pipeline.

use std::io;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for sort operations.
pub type Result<T> = std::result::Result<T, SortError>;

/// Everything that can abort a sort, a merge or a validation.
#[derive(Error, Debug)]
pub enum SortError {
    /// The line has no `.` or the `.` isn't followed by a space.
    #[error("Malformed line '{line}': expected '<number>. <text>'")]
    MissingSeparator { line: String },

    /// The text before the first `.` isn't a signed integer.
    #[error("Malformed line '{line}': invalid number prefix: {source}")]
    InvalidPrefix {
        line: String,
        #[source]
        source: ParseIntError,
    },

    /// Reading or writing one of the files involved failed.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The validator found a line ordered before its predecessor.
    #[error("Sorting is wrong. The number of erroneous line is {line_number}")]
    Unsorted { line_number: u64 },

    #[error("Failed to build sorting thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl SortError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        SortError::Io { path: path.to_path_buf(), source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsorted_message_names_the_line() {
        let err = SortError::Unsorted { line_number: 3 };
        assert_eq!(err.to_string(), "Sorting is wrong. The number of erroneous line is 3");
    }

    #[test]
    fn io_message_contains_path() {
        let err = SortError::io(
            Path::new("/tmp/chunk_7.txt"),
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/chunk_7.txt"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn invalid_prefix_keeps_source() {
        let source = "abc".parse::<i64>().unwrap_err();
        let err = SortError::InvalidPrefix { line: "abc. X".to_string(), source };
        assert!(std::error::Error::source(&err).is_some());
    }
}
