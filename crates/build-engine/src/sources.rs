//! Java Source Discovery

use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::BuildError;

const JAVA_SUFFIX: &[u8] = b".java";

/// Collect every `.java` file below `root`
///
/// Directories are traversed, never collected. Any walk error (a missing
/// root, an unreadable directory) aborts discovery. The result is sorted.
pub fn find_java_sources(root: &Path) -> Result<Vec<PathBuf>, BuildError> {
    let mut sources = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|source| BuildError::SourceWalk {
            root: root.to_path_buf(),
            source,
        })?;

        if entry.file_type().is_dir() {
            continue;
        }
        if entry.file_name().as_encoded_bytes().ends_with(JAVA_SUFFIX) {
            sources.push(entry.into_path());
        }
    }

    sources.sort();
    debug!("Found {} Java sources under {:?}", sources.len(), root);
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_java_files_are_collected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("A.java"), b"class A {}").unwrap();
        std::fs::write(dir.path().join("b.txt"), b"not java").unwrap();
        std::fs::write(dir.path().join("sub").join("C.java"), b"class C {}").unwrap();

        let sources = find_java_sources(dir.path()).unwrap();

        assert_eq!(
            sources,
            vec![dir.path().join("A.java"), dir.path().join("sub").join("C.java")]
        );
    }

    #[test]
    fn test_directory_named_like_a_source_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("pkg.java")).unwrap();
        std::fs::write(dir.path().join("pkg.java").join("D.java"), b"class D {}").unwrap();

        let sources = find_java_sources(dir.path()).unwrap();

        assert_eq!(sources, vec![dir.path().join("pkg.java").join("D.java")]);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_java_sources(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, BuildError::SourceWalk { .. }));
    }
}
