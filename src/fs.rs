//! Filesystem helpers shared by scanning, classification, and removal.

use std::fs;
use std::path::{Component, Path, PathBuf};

/// Canonicalize `path`, falling back to the path itself if it cannot be resolved.
pub fn canonical_or_self(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Check if a path is under (or equal to) a given parent directory.
pub fn is_path_under(path: &Path, parent: &Path) -> bool {
    canonical_or_self(path).starts_with(canonical_or_self(parent))
}

/// Check if a path contains any ".." traversal components.
pub fn path_contains_traversal(path: &Path) -> bool {
    path.components()
        .any(|component| matches!(component, Component::ParentDir))
}

/// Resolve `.` and `..` components without touching the filesystem.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Count files and subdirectories below `dir`, recursively.
///
/// Symlinks are counted as files and never followed. Unreadable
/// subdirectories contribute what could be read.
pub fn count_contents(dir: &Path) -> (usize, usize) {
    let mut files = 0;
    let mut folders = 0;
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let Ok(entries) = fs::read_dir(&current) else {
            continue;
        };
        for entry in entries.flatten() {
            match entry.file_type() {
                Ok(ft) if ft.is_dir() => {
                    folders += 1;
                    pending.push(entry.path());
                }
                Ok(_) => files += 1,
                Err(_) => {}
            }
        }
    }

    (files, folders)
}
