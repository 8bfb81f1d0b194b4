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

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;

use linesort::paths::default_output_path;
use linesort::validate_file;

/// Checks that a file is sorted by text, then by number.
#[derive(Parser, Debug)]
#[command(name = "linesort-validate", version)]
struct Args {
    /// File to check [default: sample_output.txt]
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let path = args.file.unwrap_or_else(default_output_path);
    let lines = validate_file(&path).with_context(|| format!("{} is not valid", path.display()))?;

    info!("Checked {} lines", lines);
    println!("The file is valid.");
    Ok(())
}
