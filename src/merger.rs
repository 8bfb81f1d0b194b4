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

//! K-way merge of sorted runs.
//!
//! Two algorithms produce the same ordering:
//!
//! - **Linear scan** for a handful of runs: every step compares the heads of all active runs.
//!   Cheaper than a heap when there are at most [`LINEAR_MERGE_MAX_FAN_IN`] runs.
//! - **Priority queue** for more runs: a binary min-heap holds one head per active run, and the
//!   emitted head is replaced in place by the next line of its run (a single sift-down).

use std::cmp::{Ordering, Reverse};
use std::collections::binary_heap::{BinaryHeap, PeekMut};
use std::fmt;
use std::mem;

use crate::errors::Result;
use crate::line::LineKey;
use crate::run::Run;

/// Largest number of runs merged with the linear scan.
pub const LINEAR_MERGE_MAX_FAN_IN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeAlgorithm {
    LinearScan,
    PriorityQueue,
}

impl MergeAlgorithm {
    pub fn for_fan_in(fan_in: usize) -> MergeAlgorithm {
        if fan_in > LINEAR_MERGE_MAX_FAN_IN {
            MergeAlgorithm::PriorityQueue
        } else {
            MergeAlgorithm::LinearScan
        }
    }
}

impl fmt::Display for MergeAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeAlgorithm::LinearScan => write!(f, "linear scan"),
            MergeAlgorithm::PriorityQueue => write!(f, "priority queue"),
        }
    }
}

/// Merges sorted runs, picking the algorithm from the number of runs.
pub fn merge(runs: Vec<Run>) -> Result<Merge> {
    let algorithm = MergeAlgorithm::for_fan_in(runs.len());
    Merge::with_algorithm(runs, algorithm)
}

/// Lazily merged lines in global order. Single pass; stops after the first error.
pub struct Merge {
    strategy: Strategy,
    failed: bool,
}

enum Strategy {
    Linear(LinearMerge),
    Heap(HeapMerge),
}

impl Merge {
    pub fn with_algorithm(runs: Vec<Run>, algorithm: MergeAlgorithm) -> Result<Merge> {
        let strategy = match algorithm {
            MergeAlgorithm::LinearScan => Strategy::Linear(LinearMerge::new(runs)),
            MergeAlgorithm::PriorityQueue => Strategy::Heap(HeapMerge::new(runs)?),
        };
        Ok(Merge { strategy, failed: false })
    }

    pub fn algorithm(&self) -> MergeAlgorithm {
        match self.strategy {
            Strategy::Linear(_) => MergeAlgorithm::LinearScan,
            Strategy::Heap(_) => MergeAlgorithm::PriorityQueue,
        }
    }

    fn next_key(&mut self) -> Result<Option<LineKey>> {
        match &mut self.strategy {
            Strategy::Linear(merge) => merge.next_key(),
            Strategy::Heap(merge) => merge.next_key(),
        }
    }
}

impl Iterator for Merge {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        match self.next_key() {
            Ok(key) => key.map(|key| Ok(key.into_line())),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Active runs live in `runs[..]`; an exhausted run is replaced by the last one.
struct LinearMerge {
    runs: Vec<Run>,
}

impl LinearMerge {
    fn new(mut runs: Vec<Run>) -> LinearMerge {
        runs.retain(|run| !run.is_exhausted());
        LinearMerge { runs }
    }

    fn next_key(&mut self) -> Result<Option<LineKey>> {
        if self.runs.is_empty() {
            return Ok(None);
        }

        // first run wins on ties
        let mut min_index = 0;
        for index in 1..self.runs.len() {
            if self.runs[index].peek() < self.runs[min_index].peek() {
                min_index = index;
            }
        }

        let key = self.runs[min_index].advance()?;
        if self.runs[min_index].is_exhausted() {
            self.runs.swap_remove(min_index);
        }
        Ok(key)
    }
}

struct HeapEntry {
    key: LineKey,
    run: usize,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

struct HeapMerge {
    runs: Vec<Run>,
    heap: BinaryHeap<Reverse<HeapEntry>>,
}

impl HeapMerge {
    fn new(mut runs: Vec<Run>) -> Result<HeapMerge> {
        let mut heap = BinaryHeap::with_capacity(runs.len());
        for (run, source) in runs.iter_mut().enumerate() {
            if let Some(key) = source.advance()? {
                heap.push(Reverse(HeapEntry { key, run }));
            }
        }
        Ok(HeapMerge { runs, heap })
    }

    fn next_key(&mut self) -> Result<Option<LineKey>> {
        let mut top = match self.heap.peek_mut() {
            Some(top) => top,
            None => return Ok(None),
        };

        let run = top.0.run;
        match self.runs[run].advance()? {
            // replacing the top in place sifts it down once when `top` is dropped
            Some(next) => Ok(Some(mem::replace(&mut top.0.key, next))),
            None => Ok(Some(PeekMut::pop(top).0.key)),
        }
    }
}
