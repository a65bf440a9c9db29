//! Artifact Workspace
//!
//! Creates the temporary directories a build writes into and removes the
//! intermediates once the final package exists.

use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

use crate::BuildError;

/// Create `output_dir` (with parents) and each of `dirs`
///
/// A directory that already exists is fine.
pub async fn prepare_output_dirs<P: AsRef<Path>>(
    output_dir: &Path,
    dirs: &[P],
) -> Result<(), BuildError> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|source| BuildError::CreateDir {
            path: output_dir.to_path_buf(),
            source,
        })?;

    for dir in dirs {
        let dir = dir.as_ref();
        match tokio::fs::create_dir(dir).await {
            Ok(()) => debug!("Created {:?}", dir),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => debug!("Reusing {:?}", dir),
            Err(source) => {
                return Err(BuildError::CreateDir {
                    path: dir.to_path_buf(),
                    source,
                })
            }
        }
    }

    Ok(())
}

/// Remove each path in order, directories recursively
///
/// Stops at the first path that cannot be inspected or removed; later paths
/// are left in place.
pub async fn remove_artifacts<P: AsRef<Path>>(paths: &[P]) -> Result<(), BuildError> {
    for path in paths {
        let path = path.as_ref();
        let meta = tokio::fs::metadata(path)
            .await
            .map_err(|source| BuildError::Stat {
                path: path.to_path_buf(),
                source,
            })?;

        let removed = if meta.is_dir() {
            tokio::fs::remove_dir_all(path).await
        } else {
            tokio::fs::remove_file(path).await
        };
        removed.map_err(|source| BuildError::Remove {
            path: path.to_path_buf(),
            source,
        })?;

        debug!("Removed {:?}", path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_prepare_is_idempotent() {
        let root = tempfile::tempdir().unwrap();
        let out = root.path().join("out");
        let generated = out.join("gen");
        let classes = out.join("classes");

        prepare_output_dirs(&out, &[&generated, &classes]).await.unwrap();
        prepare_output_dirs(&out, &[&generated, &classes]).await.unwrap();

        assert!(generated.is_dir());
        assert!(classes.is_dir());
    }

    #[tokio::test]
    async fn test_prepare_fails_when_parent_is_a_file() {
        let root = tempfile::tempdir().unwrap();
        let blocker = root.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        let nested = blocker.join("gen");

        let err = prepare_output_dirs(root.path(), &[&nested]).await.unwrap_err();
        assert!(matches!(err, BuildError::CreateDir { .. }));
    }

    #[tokio::test]
    async fn test_remove_files_and_directories() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("classes.dex");
        let dir = root.path().join("gen");
        std::fs::write(&file, b"dex").unwrap();
        std::fs::create_dir_all(dir.join("com").join("example")).unwrap();
        std::fs::write(dir.join("com").join("example").join("R.java"), b"").unwrap();

        remove_artifacts(&[&file, &dir]).await.unwrap();

        assert!(!file.exists());
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_remove_stops_at_first_missing_path() {
        let root = tempfile::tempdir().unwrap();
        let missing = root.path().join("missing");
        let kept = root.path().join("kept");
        std::fs::write(&kept, b"").unwrap();

        let err = remove_artifacts(&[&missing, &kept]).await.unwrap_err();

        assert!(matches!(err, BuildError::Stat { ref path, .. } if *path == missing));
        assert!(kept.exists());
    }
}
