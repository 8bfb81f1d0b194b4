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

//! Checks that a file is ordered the way the sorter orders it.

use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::errors::{Result, SortError};
use crate::line::{compare_parts, parse_parts};
use crate::spill::IO_BUFFER_SIZE;

/// Validates an already opened sequence of lines and returns how many were checked.
///
/// Fails with [`SortError::Unsorted`] carrying the 1-based number of the first line that is
/// smaller than the line before it.
pub fn validate_lines<I, S>(lines: I) -> Result<u64>
where
    I: IntoIterator<Item = Result<S>>,
    S: AsRef<str>,
{
    let mut previous: Option<(i64, String)> = None;
    let mut count = 0u64;

    for line in lines {
        let line = line?;
        count += 1;
        let (prefix, suffix) = parse_parts(line.as_ref())?;

        if let Some((previous_prefix, previous_suffix)) = &previous {
            if compare_parts(*previous_prefix, previous_suffix, prefix, suffix) == Ordering::Greater {
                return Err(SortError::Unsorted { line_number: count });
            }
        }

        match previous.as_mut() {
            Some((previous_prefix, previous_suffix)) => {
                *previous_prefix = prefix;
                previous_suffix.clear();
                previous_suffix.push_str(suffix);
            }
            None => previous = Some((prefix, suffix.to_string())),
        }
    }

    Ok(count)
}

/// Streams `path` and validates its order.
pub fn validate_file(path: &Path) -> Result<u64> {
    let file = File::open(path).map_err(|e| SortError::io(path, e))?;
    let reader = BufReader::with_capacity(IO_BUFFER_SIZE, file);
    validate_lines(reader.lines().map(|line| line.map_err(|e| SortError::io(path, e))))
}
