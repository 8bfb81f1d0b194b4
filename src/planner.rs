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

//! Chunk sizing and worker count.

use std::mem;

use crate::line::LineKey;

/// Average line length used to estimate the number of lines from the file size.
pub const ASSUMED_BYTES_PER_LINE: u64 = 50;

/// Upper bound on the memory held by one chunk (512 MB).
pub const CHUNK_MEMORY_CEILING: usize = 512 * 1024 * 1024;

/// Estimated memory held by one buffered line: the key plus its heap-allocated text.
const ESTIMATED_LINE_FOOTPRINT: usize = mem::size_of::<LineKey>() + ASSUMED_BYTES_PER_LINE as usize;

/// Number of lines and lines per chunk for one input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    pub estimated_lines: u64,
    pub chunk_size: usize,
}

impl ChunkPlan {
    pub fn for_file_size(file_size: u64, max_chunk_size: usize) -> ChunkPlan {
        let estimated_lines = estimate_line_count(file_size);
        ChunkPlan { estimated_lines, chunk_size: chunk_size(estimated_lines, max_chunk_size) }
    }
}

/// Largest chunk whose estimated footprint stays under [`CHUNK_MEMORY_CEILING`] and whose
/// buffer can be addressed on this platform.
pub fn default_max_chunk_size() -> usize {
    let by_memory = CHUNK_MEMORY_CEILING / ESTIMATED_LINE_FOOTPRINT;
    let by_address_space = isize::MAX as usize / mem::size_of::<LineKey>();
    by_memory.min(by_address_space)
}

pub fn estimate_line_count(file_size: u64) -> u64 {
    file_size / ASSUMED_BYTES_PER_LINE
}

/// Splits `line_count` lines into the fewest chunks of at most `max_chunk_size` lines, then
/// spreads the lines evenly over those chunks. Never returns less than 1.
pub fn chunk_size(line_count: u64, max_chunk_size: usize) -> usize {
    let max_chunk_size = max_chunk_size.max(1) as u64;
    let chunk_count = line_count.div_ceil(max_chunk_size).max(1);
    ((line_count / chunk_count) as usize).max(1)
}

/// Half the logical CPUs, since hyper-threaded siblings don't speed up sorting.
pub fn default_workers() -> usize {
    (num_cpus::get() / 2).max(1)
}
