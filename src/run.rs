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

//! Sorted runs consumed by the merger, one line at a time.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::vec;

use crate::errors::{Result, SortError};
use crate::line::LineKey;

/// Buffer size for reading run files during merge.
const MERGE_BUFFER_SIZE: usize = 64 * 1024;

enum Source {
    File { path: PathBuf, lines: io::Lines<BufReader<File>> },
    Memory(vec::IntoIter<LineKey>),
    Exhausted,
}

/// A sorted, single-pass sequence of lines, backed by a run file or kept in memory.
///
/// The run always holds its smallest not yet consumed line as its head. The underlying file is
/// closed as soon as the last line has been read, or when the run is dropped.
pub struct Run {
    head: Option<LineKey>,
    source: Source,
}

impl Run {
    /// Opens a run file and reads its first line.
    pub fn open(path: &Path) -> Result<Run> {
        let file = File::open(path).map_err(|e| SortError::io(path, e))?;
        let lines = BufReader::with_capacity(MERGE_BUFFER_SIZE, file).lines();
        Run::primed(Source::File { path: path.to_path_buf(), lines })
    }

    /// Wraps an already sorted chunk.
    pub fn from_sorted(chunk: Vec<LineKey>) -> Run {
        let mut iter = chunk.into_iter();
        match iter.next() {
            Some(head) => Run { head: Some(head), source: Source::Memory(iter) },
            None => Run { head: None, source: Source::Exhausted },
        }
    }

    /// Parses already sorted raw lines into a run.
    pub fn from_lines<I, S>(lines: I) -> Result<Run>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let chunk = lines
            .into_iter()
            .map(|line| LineKey::parse(line.into()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Run::from_sorted(chunk))
    }

    fn primed(source: Source) -> Result<Run> {
        let mut run = Run { head: None, source };
        run.head = run.pull()?;
        Ok(run)
    }

    /// The smallest line not yet consumed.
    #[inline]
    pub fn peek(&self) -> Option<&LineKey> {
        self.head.as_ref()
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.head.is_none()
    }

    /// Consumes the head and loads the next line.
    pub fn advance(&mut self) -> Result<Option<LineKey>> {
        let next = self.pull()?;
        Ok(std::mem::replace(&mut self.head, next))
    }

    fn pull(&mut self) -> Result<Option<LineKey>> {
        let next = match &mut self.source {
            Source::File { path, lines } => match lines.next() {
                Some(Ok(line)) => Some(LineKey::parse(line)?),
                Some(Err(e)) => return Err(SortError::io(path, e)),
                None => None,
            },
            Source::Memory(iter) => iter.next(),
            Source::Exhausted => None,
        };

        if next.is_none() {
            self.source = Source::Exhausted;
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempdir::TempDir;

    fn drain(run: &mut Run) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(key) = run.advance().unwrap() {
            lines.push(key.into_line());
        }
        lines
    }

    #[test]
    fn test_memory_run() {
        let mut run = Run::from_lines(vec!["1. A", "2. B"]).unwrap();
        assert_eq!(run.peek().map(|k| k.line()), Some("1. A"));
        assert!(!run.is_exhausted());

        assert_eq!(drain(&mut run), vec!["1. A", "2. B"]);
        assert!(run.is_exhausted());
        assert!(run.advance().unwrap().is_none());
    }

    #[test]
    fn test_empty_run_is_exhausted() {
        let run = Run::from_sorted(Vec::new());
        assert!(run.is_exhausted());
        assert!(run.peek().is_none());
    }

    #[test]
    fn test_file_run() {
        let dir = TempDir::new("run").unwrap();
        let path = dir.path().join("chunk_0.txt");
        fs::write(&path, "1. Apple\n415. Apple\n2. Banana\n").unwrap();

        let mut run = Run::open(&path).unwrap();
        assert_eq!(drain(&mut run), vec!["1. Apple", "415. Apple", "2. Banana"]);
        assert!(run.is_exhausted());
    }

    #[test]
    fn test_empty_file_run() {
        let dir = TempDir::new("run").unwrap();
        let path = dir.path().join("chunk_0.txt");
        fs::write(&path, "").unwrap();

        assert!(Run::open(&path).unwrap().is_exhausted());
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new("run").unwrap();
        let result = Run::open(&dir.path().join("nope.txt"));
        assert!(matches!(result, Err(SortError::Io { .. })));
    }

    #[test]
    fn test_malformed_line_in_file() {
        let dir = TempDir::new("run").unwrap();
        let path = dir.path().join("chunk_0.txt");
        fs::write(&path, "1. A\ngarbage\n").unwrap();

        let mut run = Run::open(&path).unwrap();
        assert!(matches!(run.advance(), Err(SortError::MissingSeparator { .. })));
    }
}
