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

//! Writing sorted chunks to run files and the merged result to the output file.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::errors::{Result, SortError};
use crate::line::LineKey;

pub const RUN_FILE_PREFIX: &str = "chunk_";
pub const RUN_FILE_EXTENSION: &str = "txt";

/// Buffer size for run files and the output file (1 MB).
pub(crate) const IO_BUFFER_SIZE: usize = 1024 * 1024;

/// Path of the run file with the given index inside `dir`.
pub fn run_file_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("{}{}.{}", RUN_FILE_PREFIX, index, RUN_FILE_EXTENSION))
}

/// Buffered newline-terminated line writer that remembers its path for error reporting.
pub struct LineWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    lines: u64,
}

impl LineWriter {
    pub fn create(path: &Path) -> Result<LineWriter> {
        let file = File::create(path).map_err(|e| SortError::io(path, e))?;
        Ok(LineWriter {
            path: path.to_path_buf(),
            writer: BufWriter::with_capacity(IO_BUFFER_SIZE, file),
            lines: 0,
        })
    }

    #[inline]
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        self.writer
            .write_all(line.as_bytes())
            .and_then(|_| self.writer.write_all(b"\n"))
            .map_err(|e| SortError::io(&self.path, e))?;
        self.lines += 1;
        Ok(())
    }

    /// Flushes the buffer and returns the number of lines written.
    pub fn finish(mut self) -> Result<u64> {
        self.writer.flush().map_err(|e| SortError::io(&self.path, e))?;
        Ok(self.lines)
    }
}

/// Writes a sorted chunk, in order, to the run file `index` inside `dir`.
pub fn spill_chunk(dir: &Path, index: usize, chunk: &[LineKey]) -> Result<PathBuf> {
    let path = run_file_path(dir, index);
    let mut writer = LineWriter::create(&path)?;
    for key in chunk {
        writer.write_line(key.line())?;
    }
    let lines = writer.finish()?;
    debug!("Spilled run {} ({} lines) to {}", index, lines, path.display());
    Ok(path)
}

/// Streams merged lines into `path` and returns how many were written.
pub fn write_output<I>(path: &Path, lines: I) -> Result<u64>
where
    I: IntoIterator<Item = Result<String>>,
{
    let mut writer = LineWriter::create(path)?;
    for line in lines {
        writer.write_line(&line?)?;
    }
    writer.finish()
}

/// Deletes run files. Failures are only logged.
pub fn remove_runs(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = fs::remove_file(path) {
            warn!("Could not delete run file {}: {}", path.display(), e);
        }
    }
}
