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

use std::fs;
use std::path::{Path, PathBuf};

use linesort::generate::generate_file;
use linesort::{validate_file, ExternalSorter, SortError};
use tempdir::TempDir;

fn write_lines(dir: &TempDir, name: &str, lines: &[String]) -> PathBuf {
    let path = dir.path().join(name);
    let mut content = String::new();
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    fs::write(&path, content).unwrap();
    path
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path).unwrap().lines().map(String::from).collect()
}

fn sorter(max_size: usize, workers: usize) -> ExternalSorter {
    let mut sorter = ExternalSorter::new();
    sorter.set_max_size(max_size);
    sorter.set_workers(workers);
    sorter
}

#[test]
fn sorts_generated_file_through_many_runs() {
    let dir = TempDir::new("linesort").unwrap();
    let input = dir.path().join("sample.txt");
    let output = dir.path().join("sample_output.txt");
    generate_file(&input, 5000, Some(11)).unwrap();

    let stats = sorter(300, 4).sort_file(&input, &output).unwrap();

    assert_eq!(stats.lines, 5000);
    assert!(stats.chunks > 4, "expected the priority queue merge, got {} runs", stats.chunks);
    assert_eq!(validate_file(&output).unwrap(), 5000);

    let mut expected = read_lines(&input);
    let mut actual = read_lines(&output);
    expected.sort();
    actual.sort();
    assert_eq!(actual, expected);
}

#[test]
fn sorts_with_few_runs() {
    let dir = TempDir::new("linesort").unwrap();
    let input = dir.path().join("sample.txt");
    let output = dir.path().join("sample_output.txt");
    generate_file(&input, 1000, Some(5)).unwrap();

    let stats = sorter(400, 2).sort_file(&input, &output).unwrap();

    assert!(stats.chunks <= 4);
    assert_eq!(validate_file(&output).unwrap(), 1000);
}

#[test]
fn sorting_sorted_output_is_idempotent() {
    let dir = TempDir::new("linesort").unwrap();
    let input = dir.path().join("sample.txt");
    let once = dir.path().join("once.txt");
    let twice = dir.path().join("twice.txt");
    generate_file(&input, 2000, Some(99)).unwrap();

    sorter(150, 3).sort_file(&input, &once).unwrap();
    sorter(150, 3).sort_file(&once, &twice).unwrap();

    assert_eq!(fs::read_to_string(&once).unwrap(), fs::read_to_string(&twice).unwrap());
}

#[test]
fn single_line_file() {
    let dir = TempDir::new("linesort").unwrap();
    let input = write_lines(&dir, "one.txt", &["42. The answer".to_string()]);
    let output = dir.path().join("out.txt");

    let stats = ExternalSorter::new().sort_file(&input, &output).unwrap();

    assert_eq!(stats.lines, 1);
    assert_eq!(read_lines(&output), vec!["42. The answer"]);
}

#[test]
fn identical_suffixes_sort_by_number() {
    let dir = TempDir::new("linesort").unwrap();
    let numbers = [7i64, -3, 1_000_000_000_000, 0, -40, 12, 7, 3];
    let lines: Vec<String> = numbers.iter().map(|n| format!("{}. same text", n)).collect();
    let input = write_lines(&dir, "same.txt", &lines);
    let output = dir.path().join("out.txt");

    sorter(2, 2).sort_file(&input, &output).unwrap();

    let mut sorted = numbers.to_vec();
    sorted.sort();
    let expected: Vec<String> = sorted.iter().map(|n| format!("{}. same text", n)).collect();
    assert_eq!(read_lines(&output), expected);
}

#[test]
fn negative_zero_ties_with_zero() {
    let dir = TempDir::new("linesort").unwrap();
    let lines = vec!["1. A".to_string(), "-0. A".to_string(), "-1. A".to_string(), "0. A".to_string()];
    let input = write_lines(&dir, "zero.txt", &lines);
    let output = dir.path().join("out.txt");

    ExternalSorter::new().sort_file(&input, &output).unwrap();

    let out = read_lines(&output);
    assert_eq!(out[0], "-1. A");
    assert_eq!(out[3], "1. A");
    let mut middle = out[1..3].to_vec();
    middle.sort();
    assert_eq!(middle, vec!["-0. A", "0. A"]);
}

#[test]
fn malformed_input_fails() {
    let dir = TempDir::new("linesort").unwrap();
    let lines = vec!["1. A".to_string(), "x. B".to_string()];
    let input = write_lines(&dir, "bad.txt", &lines);
    let output = dir.path().join("out.txt");

    let result = ExternalSorter::new().sort_file(&input, &output);

    assert!(matches!(result, Err(SortError::InvalidPrefix { .. })));
}

#[test]
fn unwritable_output_fails() {
    let dir = TempDir::new("linesort").unwrap();
    let input = write_lines(&dir, "in.txt", &["1. A".to_string()]);
    let output = dir.path().join("missing").join("out.txt");

    let result = ExternalSorter::new().sort_file(&input, &output);

    assert!(matches!(result, Err(SortError::Io { .. })));
}
