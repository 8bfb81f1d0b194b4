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

//! File naming used by the command line tools.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT_NAME: &str = "sample";
pub const FILE_EXTENSION: &str = "txt";
pub const OUTPUT_SUFFIX: &str = "_output";

/// `<base>.txt`, replacing any extension `base` already has.
pub fn input_path(base: &str) -> PathBuf {
    Path::new(base).with_extension(FILE_EXTENSION)
}

/// `<base>_output.txt`, next to the input.
pub fn output_path(base: &str) -> PathBuf {
    let input = input_path(base);
    let mut name: OsString = input.file_stem().map(OsString::from).unwrap_or_default();
    name.push(OUTPUT_SUFFIX);
    name.push(".");
    name.push(FILE_EXTENSION);
    input.with_file_name(name)
}

/// Output file of the default input.
pub fn default_output_path() -> PathBuf {
    output_path(DEFAULT_INPUT_NAME)
}
