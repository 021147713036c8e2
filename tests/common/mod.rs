#![allow(dead_code)]

use ideoz_fixtures::{init_logging, FixtureGenerator};
use std::io::Read;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Fresh generator rooted in a `fixtures` dir inside its own temp dir.
/// The `TempDir` must outlive the generator.
pub fn temp_generator() -> (TempDir, FixtureGenerator) {
    init_logging();
    let root = TempDir::new().expect("Failed to create temp dir");
    let generator = FixtureGenerator::new(root.path().join("fixtures"));
    (root, generator)
}

/// Size of the file on disk.
pub fn file_len(path: &Path) -> u64 {
    std::fs::metadata(path)
        .unwrap_or_else(|e| panic!("Failed to stat {:?}: {}", path, e))
        .len()
}

/// First `n` bytes of a file (fewer if the file is shorter).
pub fn read_prefix(path: &Path, n: usize) -> Vec<u8> {
    let mut head = Vec::with_capacity(n);
    std::fs::File::open(path)
        .unwrap_or_else(|e| panic!("Failed to open {:?}: {}", path, e))
        .take(n as u64)
        .read_to_end(&mut head)
        .expect("Failed to read file head");
    head
}

/// Names of the entries currently in a directory, sorted.
pub fn dir_listing(dir: &Path) -> Vec<PathBuf> {
    let mut names: Vec<PathBuf> = std::fs::read_dir(dir)
        .expect("Failed to read dir")
        .map(|entry| entry.expect("Failed to read dir entry").path())
        .collect();
    names.sort();
    names
}

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(1023), "1023 B");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(10 * 1024 * 1024), "10.0 MB");
    }
}
