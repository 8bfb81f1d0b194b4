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

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;

use linesort::paths::{input_path, output_path, DEFAULT_INPUT_NAME};
use linesort::ExternalSorter;

/// Sorts `<NAME>.txt` into `<NAME>_output.txt`, ordering lines of the form
/// `<number>. <text>` by text, then by number.
#[derive(Parser, Debug)]
#[command(name = "linesort", version)]
struct Args {
    /// Base name of the input file
    #[arg(default_value = DEFAULT_INPUT_NAME)]
    name: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let input = input_path(&args.name);
    let output = output_path(&args.name);

    // run files go next to the input rather than to a possibly memory-backed temp dir
    let mut sorter = ExternalSorter::new();
    let work_dir = match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    sorter.set_sort_dir(work_dir.to_path_buf());

    let start = Instant::now();
    let stats = sorter
        .sort_file(&input, &output)
        .with_context(|| format!("Failed to sort {}", input.display()))?;
    let elapsed = start.elapsed();

    info!(
        "Sorted {} lines ({} chunks of {} lines, {} spilled) into {}",
        stats.lines,
        stats.chunks,
        stats.chunk_size,
        stats.spilled_runs,
        output.display()
    );
    println!("The file was sorted in {:.3?}.", elapsed);
    Ok(())
}
