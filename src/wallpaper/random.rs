//! Picking the image for a rotation cycle
//!
//! A file is used as is. A directory listing is snapshotted, shuffled with
//! Fisher-Yates and the first entry is taken.

use rand::Rng;
use rand::seq::SliceRandom;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

/// Immediate entries of `dir`, sorted by name. Hidden entries are skipped.
///
/// Names are compared as raw bytes, so entries (and directories) whose names
/// are not valid UTF-8 are listed like any other.
pub fn list_entries(dir: &Path) -> Vec<PathBuf> {
    let Ok(read_dir) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut entries: Vec<PathBuf> = read_dir
        .filter_map(Result::ok)
        .filter(|entry| !entry.file_name().as_bytes().starts_with(b"."))
        .map(|entry| entry.path())
        .collect();
    entries.sort();
    entries
}

/// Returns the entries of `dir` in uniformly random order.
pub fn shuffled_entries<R: Rng + ?Sized>(dir: &Path, rng: &mut R) -> Vec<PathBuf> {
    let mut entries = list_entries(dir);
    entries.shuffle(rng);
    entries
}

/// Resolve a configured source into the image to show.
///
/// Returns `None` when `src` is neither a regular file nor a non-empty
/// directory.
pub fn select<R: Rng + ?Sized>(src: &Path, rng: &mut R) -> Option<PathBuf> {
    if src.is_file() {
        return Some(src.to_path_buf());
    }
    if src.is_dir() {
        return shuffled_entries(src, rng).into_iter().next();
    }
    None
}
