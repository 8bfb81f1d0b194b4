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

//! Chunked, parallel external sort of a line file.
//!
//! # Pipeline
//!
//! 1. **Plan**: the chunk size is derived once from the input file size.
//! 2. **Produce**: the calling thread streams the input and fills chunks. Each full chunk gets
//!    the next run index and is pushed into a bounded queue, which blocks the producer while
//!    every worker is busy.
//! 3. **Sort and spill**: a pool of workers pops chunks, sorts them and writes them to their run
//!    file. The last, partially filled chunk is sorted in memory and never spilled.
//! 4. **Merge**: every run is merged into the output file.
//!
//! The first error from any stage cancels the producer and the workers and is returned.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, info, warn};
use parking_lot::Mutex;
use rayon::prelude::*;
use tempdir::TempDir;

use crate::errors::{Result, SortError};
use crate::line::LineKey;
use crate::merger::merge;
use crate::planner::{default_max_chunk_size, default_workers, ChunkPlan};
use crate::run::Run;
use crate::spill::{remove_runs, run_file_path, spill_chunk, write_output, IO_BUFFER_SIZE};

const SORT_DIR_PREFIX: &str = "linesort";

/// Sorts `<number>. <text>` files that may not fit in memory.
///
/// # Examples
/// ```no_run
/// use std::path::Path;
/// use linesort::ExternalSorter;
///
/// let mut sorter = ExternalSorter::new();
/// sorter.set_workers(2);
/// let stats = sorter.sort_file(Path::new("sample.txt"), Path::new("sample_output.txt")).unwrap();
/// println!("sorted {} lines", stats.lines);
/// ```
pub struct ExternalSorter {
    max_size: usize,
    workers: usize,
    sort_dir: Option<PathBuf>,
    keep_last_chunk_in_memory: bool,
}

/// What a sort did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SortStats {
    /// Lines read from the input (and written to the output).
    pub lines: u64,
    /// Lines the planner expected from the file size.
    pub estimated_lines: u64,
    /// Lines per chunk.
    pub chunk_size: usize,
    /// Chunks produced, spilled or not.
    pub chunks: usize,
    /// Runs written to disk.
    pub spilled_runs: usize,
    /// Runs merged straight from memory (0 or 1).
    pub resident_runs: usize,
}

impl ExternalSorter {
    pub fn new() -> ExternalSorter {
        ExternalSorter {
            max_size: default_max_chunk_size(),
            workers: default_workers(),
            sort_dir: None,
            keep_last_chunk_in_memory: true,
        }
    }

    /// Sets the maximum number of lines in a chunk.
    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size.max(1);
    }

    /// Sets the number of concurrent chunk sorters.
    pub fn set_workers(&mut self, workers: usize) {
        self.workers = workers.max(1);
    }

    /// Sets the directory in which the temporary run directory is created.
    pub fn set_sort_dir(&mut self, path: PathBuf) {
        self.sort_dir = Some(path);
    }

    /// When enabled (default), the last partially filled chunk is merged from memory instead of
    /// going through a run file.
    pub fn set_keep_last_chunk_in_memory(&mut self, keep: bool) {
        self.keep_last_chunk_in_memory = keep;
    }

    /// Sorts `input` into `output`.
    pub fn sort_file(&self, input: &Path, output: &Path) -> Result<SortStats> {
        let file_size = fs::metadata(input).map_err(|e| SortError::io(input, e))?.len();
        let plan = ChunkPlan::for_file_size(file_size, self.max_size);
        info!(
            "Sorting {} ({} bytes, ~{} lines) in chunks of {} lines with {} workers",
            input.display(),
            file_size,
            plan.estimated_lines,
            plan.chunk_size,
            self.workers
        );

        let sort_dir = self.create_sort_dir()?;
        let produced = self.sort_chunks(input, plan.chunk_size, sort_dir.path())?;

        let mut stats = SortStats {
            lines: produced.lines,
            estimated_lines: plan.estimated_lines,
            chunk_size: plan.chunk_size,
            chunks: produced.spilled.len() + produced.resident.is_some() as usize,
            spilled_runs: produced.spilled.len(),
            resident_runs: produced.resident.is_some() as usize,
        };
        info!(
            "Read {} lines into {} chunks ({} spilled)",
            stats.lines, stats.chunks, stats.spilled_runs
        );

        let mut runs = produced
            .spilled
            .iter()
            .map(|path| Run::open(path))
            .collect::<Result<Vec<_>>>()?;
        if let Some(chunk) = produced.resident {
            runs.push(Run::from_sorted(chunk));
        }

        let merged = merge(runs)?;
        info!("Merging {} runs using {}", stats.chunks, merged.algorithm());
        stats.lines = write_output(output, merged)?;
        info!("Wrote {} lines to {}", stats.lines, output.display());

        remove_runs(&produced.spilled);
        if let Err(e) = sort_dir.close() {
            warn!("Could not delete sort directory: {}", e);
        }

        Ok(stats)
    }

    fn create_sort_dir(&self) -> Result<TempDir> {
        match &self.sort_dir {
            Some(base) => {
                fs::create_dir_all(base).map_err(|e| SortError::io(base, e))?;
                TempDir::new_in(base, SORT_DIR_PREFIX).map_err(|e| SortError::io(base, e))
            }
            None => TempDir::new(SORT_DIR_PREFIX)
                .map_err(|e| SortError::io(&std::env::temp_dir(), e)),
        }
    }

    /// Runs the producer on the calling thread and the sorters on a dedicated pool, and
    /// returns once every full chunk has been spilled.
    fn sort_chunks(&self, input: &Path, chunk_size: usize, dir: &Path) -> Result<Produced> {
        let file = File::open(input).map_err(|e| SortError::io(input, e))?;
        let reader = BufReader::with_capacity(IO_BUFFER_SIZE, file);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("linesort-sorter-{}", i))
            .build()?;

        let (sender, receiver) = bounded::<Chunk>(self.workers);
        let state = PipelineState::default();

        let produced = pool.in_place_scope(|scope| {
            for _ in 0..self.workers {
                let receiver = receiver.clone();
                let state = &state;
                scope.spawn(move |_| sort_worker(receiver, dir, state));
            }
            drop(receiver);

            let producer = Producer {
                input,
                dir,
                chunk_size,
                keep_last_chunk_in_memory: self.keep_last_chunk_in_memory,
                state: &state,
            };
            producer.run(reader, sender)
        });

        if let Some(e) = state.into_error() {
            return Err(e);
        }

        let mut produced = produced;
        if let Some(chunk) = produced.resident.as_mut() {
            pool.install(|| chunk.par_sort_unstable());
            debug!("Kept last chunk ({} lines) in memory", chunk.len());
        }
        Ok(produced)
    }
}

impl Default for ExternalSorter {
    fn default() -> Self {
        ExternalSorter::new()
    }
}

/// A filled chunk and the index of the run it becomes.
struct Chunk {
    index: usize,
    lines: Vec<LineKey>,
}

/// Output of the produce and spill phases.
#[derive(Default)]
struct Produced {
    lines: u64,
    /// Run files, in index order.
    spilled: Vec<PathBuf>,
    /// Sorted last chunk that wasn't spilled.
    resident: Option<Vec<LineKey>>,
}

/// Cancellation flag and first error, shared by the producer and the workers.
#[derive(Default)]
struct PipelineState {
    cancelled: AtomicBool,
    first_error: Mutex<Option<SortError>>,
}

impl PipelineState {
    fn fail(&self, error: SortError) {
        let mut slot = self.first_error.lock();
        if slot.is_none() {
            *slot = Some(error);
        }
        self.cancelled.store(true, Ordering::Release);
    }

    #[inline]
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    fn into_error(self) -> Option<SortError> {
        self.first_error.into_inner()
    }
}

struct Producer<'a> {
    input: &'a Path,
    dir: &'a Path,
    chunk_size: usize,
    keep_last_chunk_in_memory: bool,
    state: &'a PipelineState,
}

impl Producer<'_> {
    /// Fills chunks from `reader` and hands them to the workers. Errors are recorded in the
    /// shared state; whatever was produced so far is returned.
    fn run<R: BufRead>(&self, reader: R, sender: Sender<Chunk>) -> Produced {
        let mut produced = Produced::default();
        if let Err(e) = self.produce(reader, &sender, &mut produced) {
            self.state.fail(e);
        }
        produced
    }

    fn produce<R: BufRead>(
        &self,
        reader: R,
        sender: &Sender<Chunk>,
        produced: &mut Produced,
    ) -> Result<()> {
        let mut chunk = Vec::with_capacity(self.chunk_size);

        for line in reader.lines() {
            let line = line.map_err(|e| SortError::io(self.input, e))?;
            chunk.push(LineKey::parse(line)?);
            produced.lines += 1;

            if chunk.len() == self.chunk_size {
                let full = std::mem::replace(&mut chunk, Vec::with_capacity(self.chunk_size));
                if !self.hand_off(full, sender, produced) {
                    return Ok(());
                }
            }
        }

        if !chunk.is_empty() {
            if self.keep_last_chunk_in_memory {
                produced.resident = Some(chunk);
            } else {
                // cancelled: error already recorded
                self.hand_off(chunk, sender, produced);
            }
        }

        Ok(())
    }

    /// Assigns the next run index to a filled chunk and queues it. Returns false once the
    /// pipeline has been cancelled.
    fn hand_off(&self, lines: Vec<LineKey>, sender: &Sender<Chunk>, produced: &mut Produced) -> bool {
        if self.state.is_cancelled() {
            return false;
        }

        let index = produced.spilled.len();
        debug!("Produced chunk {} ({} lines)", index, lines.len());
        if sender.send(Chunk { index, lines }).is_err() {
            // every worker is gone, which only happens after a failure
            return false;
        }
        produced.spilled.push(run_file_path(self.dir, index));
        true
    }
}

fn sort_worker(receiver: Receiver<Chunk>, dir: &Path, state: &PipelineState) {
    for Chunk { index, mut lines } in receiver.iter() {
        if state.is_cancelled() {
            break;
        }

        lines.sort_unstable();
        if let Err(e) = spill_chunk(dir, index, &lines) {
            state.fail(e);
            break;
        }
    }
}
