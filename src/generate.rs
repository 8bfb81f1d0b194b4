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

//! Random `<number>. <text>` input files.

use std::path::Path;

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Builder;

use crate::errors::Result;
use crate::spill::LineWriter;

/// Every n-th line reuses the same text so the output has runs of equal suffixes.
pub const SHARED_SUFFIX_EVERY: u64 = 10;

const PROGRESS_EVERY: u64 = 10_000_000;

/// Generates `count` random lines. Lines whose index is a multiple of [`SHARED_SUFFIX_EVERY`]
/// all carry the same text.
pub fn generate_lines<R: Rng>(rng: &mut R, count: u64) -> impl Iterator<Item = String> + '_ {
    let shared = random_uuid(&mut *rng);
    (0..count).map(move |i| {
        let prefix: i32 = rng.gen_range(i32::MIN..i32::MAX);
        if i % SHARED_SUFFIX_EVERY == 0 {
            format!("{}. {}", prefix, shared)
        } else {
            format!("{}. {}", prefix, random_uuid(&mut *rng))
        }
    })
}

/// Writes `count` random lines to `path`. A seed makes the content reproducible.
pub fn generate_file(path: &Path, count: u64, seed: Option<u64>) -> Result<u64> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut writer = LineWriter::create(path)?;
    for (i, line) in (0..).zip(generate_lines(&mut rng, count)) {
        writer.write_line(&line)?;
        if reports_progress(i) {
            info!("The {} lines were generated.", i + 1);
        }
    }
    let written = writer.finish()?;
    info!("The {} lines were generated.", written);
    Ok(written)
}

/// Progress is reported on the first line and then every [`PROGRESS_EVERY`] lines.
#[inline]
fn reports_progress(index: u64) -> bool {
    index % PROGRESS_EVERY == 0
}

/// Version 4 UUID drawn from `rng`, so seeded generators stay reproducible.
fn random_uuid<R: Rng + ?Sized>(rng: &mut R) -> String {
    Builder::from_random_bytes(rng.gen()).into_uuid().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::parse_parts;
    use uuid::{Uuid, Variant, Version};

    #[test]
    fn test_generated_lines_parse() {
        let mut rng = StdRng::seed_from_u64(7);
        let lines: Vec<String> = generate_lines(&mut rng, 100).collect();
        assert_eq!(lines.len(), 100);

        for line in &lines {
            let (_, suffix) = parse_parts(line).unwrap();
            assert_eq!(suffix.len(), 36);
            assert_eq!(suffix.matches('-').count(), 4);
        }
    }

    #[test]
    fn test_suffixes_are_v4_uuids() {
        let mut rng = StdRng::seed_from_u64(11);
        for line in generate_lines(&mut rng, 20) {
            let (_, suffix) = parse_parts(&line).unwrap();
            let uuid = Uuid::parse_str(suffix).unwrap();
            assert_eq!(uuid.get_version(), Some(Version::Random));
            assert_eq!(uuid.get_variant(), Variant::RFC4122);
        }
    }

    #[test]
    fn test_every_tenth_line_shares_suffix() {
        let mut rng = StdRng::seed_from_u64(42);
        let lines: Vec<String> = generate_lines(&mut rng, 31).collect();
        let suffix = |i: usize| parse_parts(&lines[i]).unwrap().1.to_string();

        assert_eq!(suffix(0), suffix(10));
        assert_eq!(suffix(10), suffix(20));
        assert_eq!(suffix(20), suffix(30));
        assert_ne!(suffix(0), suffix(1));
    }

    #[test]
    fn test_seed_is_reproducible() {
        let a: Vec<String> = generate_lines(&mut StdRng::seed_from_u64(1), 20).collect();
        let b: Vec<String> = generate_lines(&mut StdRng::seed_from_u64(1), 20).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_progress_lines() {
        assert!(reports_progress(0));
        assert!(!reports_progress(1));
        assert!(!reports_progress(PROGRESS_EVERY - 1));
        assert!(reports_progress(PROGRESS_EVERY));
        assert!(reports_progress(2 * PROGRESS_EVERY));
    }

    #[test]
    fn test_generate_file() {
        let dir = tempdir::TempDir::new("generate").unwrap();
        let path = dir.path().join("sample.txt");
        assert_eq!(generate_file(&path, 25, Some(3)).unwrap(), 25);
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 25);
    }
}
