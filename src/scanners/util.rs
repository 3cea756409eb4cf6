//! Small helpers shared by scanner file-name predicates and text-based
//! extraction.

use std::path::Path;

pub fn file_name_is(path: &Path, name: &str) -> bool {
    path.file_name().and_then(|n| n.to_str()) == Some(name)
}

pub fn file_name_is_any(path: &Path, names: &[&str]) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| names.contains(&n))
        .unwrap_or(false)
}

pub fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(ext)
}

pub fn file_name_ends_with(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.ends_with(suffix))
        .unwrap_or(false)
}

/// True when any path component (case-insensitively) contains `needle`,
/// e.g. a `db/migrate/20240101_create_orders.sql` path and needle
/// `"migrat"`.
pub fn path_contains_segment(path: &Path, needle: &str) -> bool {
    path.components().any(|c| {
        c.as_os_str()
            .to_str()
            .map(|s| s.to_ascii_lowercase().contains(needle))
            .unwrap_or(false)
    })
}
