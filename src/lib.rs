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

//! The `linesort` crate sorts text files made of `<number>. <text>` lines, even when the file is
//! much larger than the available memory. Lines are ordered by their text (byte comparison)
//! and then by their number.
//!
//! The input is split into chunks that are sorted in parallel and spilled to temporary run
//! files, which are then merged into the output file.
//!
//! # Examples
//! ```rust
//! use linesort::{merge, Run};
//!
//! let runs = vec![
//!     Run::from_lines(vec!["415. Apple", "30432. Something something something"]).unwrap(),
//!     Run::from_lines(vec!["1. Apple", "32. Cherry is the best"]).unwrap(),
//!     Run::from_lines(vec!["2. Banana is yellow"]).unwrap(),
//! ];
//! let merged: Vec<String> = merge(runs).unwrap().collect::<Result<_, _>>().unwrap();
//!
//! assert_eq!(
//!     merged,
//!     vec![
//!         "1. Apple",
//!         "415. Apple",
//!         "2. Banana is yellow",
//!         "32. Cherry is the best",
//!         "30432. Something something something",
//!     ]
//! );
//! ```

pub mod errors;
pub mod generate;
pub mod line;
pub mod merger;
pub mod paths;
pub mod planner;
pub mod run;
pub mod sorter;
pub mod spill;
pub mod validate;

pub use crate::errors::{Result, SortError};
pub use crate::line::LineKey;
pub use crate::merger::{merge, Merge, MergeAlgorithm};
pub use crate::run::Run;
pub use crate::sorter::{ExternalSorter, SortStats};
pub use crate::validate::{validate_file, validate_lines};
