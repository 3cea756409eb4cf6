//! Discovery (§4.4 step 1): walk the root directory respecting
//! `.gitignore`, yielding an ordered sequence of candidate files (§5) —
//! sequential rather than the teacher's parallel walker, since the
//! merger's determinism story starts from a stable discovery order, and
//! file-level parallelism happens one stage later, in parse+dispatch.

use crate::error::ScanError;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

pub fn discover(root: &Path, excludes: &[glob::Pattern]) -> Result<Vec<PathBuf>, ScanError> {
    std::fs::metadata(root).map_err(|source| ScanError::FatalIo {
        path: root.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    let walker = WalkBuilder::new(root).hidden(false).git_ignore(true).git_global(true).git_exclude(true).build();

    for entry in walker {
        let Ok(entry) = entry else { continue };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let path = entry.into_path();
        if is_excluded(&path, root, excludes) {
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

fn is_excluded(path: &Path, root: &Path, excludes: &[glob::Pattern]) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    excludes.iter().any(|pattern| pattern.matches_path(relative))
}

pub fn compile_excludes(patterns: &[String]) -> Vec<glob::Pattern> {
    patterns.iter().filter_map(|p| glob::Pattern::new(p).ok()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn discovers_files_in_deterministic_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.java"), "class B {}").unwrap();
        fs::write(dir.path().join("a.java"), "class A {}").unwrap();
        let files = discover(dir.path(), &[]).unwrap();
        let names: Vec<_> = files.iter().map(|p| p.file_name().unwrap().to_str().unwrap().to_string()).collect();
        assert_eq!(names, vec!["a.java".to_string(), "b.java".to_string()]);
    }

    #[test]
    fn excludes_matching_glob_patterns() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("vendor")).unwrap();
        fs::write(dir.path().join("vendor/lib.java"), "class Lib {}").unwrap();
        fs::write(dir.path().join("App.java"), "class App {}").unwrap();
        let excludes = compile_excludes(&["vendor/**".to_string()]);
        let files = discover(dir.path(), &excludes).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name().unwrap().to_str().unwrap(), "App.java");
    }

    #[test]
    fn nonexistent_root_is_fatal() {
        let result = discover(Path::new("/nonexistent/scanarch-root"), &[]);
        assert!(matches!(result, Err(ScanError::FatalIo { .. })));
    }
}
