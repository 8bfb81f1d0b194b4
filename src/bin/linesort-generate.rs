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

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;

use linesort::generate::generate_file;
use linesort::paths::{input_path, DEFAULT_INPUT_NAME};

/// Writes a random `<number>. <text>` file to sort.
#[derive(Parser, Debug)]
#[command(name = "linesort-generate", version)]
struct Args {
    /// Number of lines to generate
    lines: u64,

    /// Base name of the generated file
    #[arg(default_value = DEFAULT_INPUT_NAME)]
    name: String,

    /// Seed for reproducible content
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let path = input_path(&args.name);
    generate_file(&path, args.lines, args.seed)
        .with_context(|| format!("Failed to generate {}", path.display()))?;
    Ok(())
}
