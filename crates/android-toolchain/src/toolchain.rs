//! Toolchain Resolution
//!
//! Locates the newest build-tools and platform installed in an Android SDK
//! and derives the paths of the binaries and the base library the build
//! pipeline invokes.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Resource compiler binary inside a build-tools directory
pub const AAPT: &str = if cfg!(windows) { "aapt.exe" } else { "aapt" };

/// Bytecode translator inside a build-tools directory
pub const DX: &str = if cfg!(windows) { "dx.bat" } else { "dx" };

/// Alignment tool inside a build-tools directory
pub const ZIPALIGN: &str = if cfg!(windows) { "zipalign.exe" } else { "zipalign" };

/// Base library archive inside a platform directory
pub const ANDROID_JAR: &str = "android.jar";

/// Toolchain resolution errors
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    #[error("cannot normalize SDK path '{}': {source}", .path.display())]
    InvalidPath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no Android SDK directory found at '{}': {source}", .path.display())]
    MissingSdk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("SDK location '{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("cannot list {what} under '{}': {source}", .path.display())]
    Listing {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no {what} versions installed under '{}'", .path.display())]
    Empty { what: &'static str, path: PathBuf },
}

/// Resolved toolchain for one build
///
/// Every path pointed at an existing entry when the value was built. Nothing
/// re-checks them afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    sdk_root: PathBuf,
    build_tools: PathBuf,
    platform: PathBuf,
    android_jar: PathBuf,
    aapt: PathBuf,
    dx: PathBuf,
    zipalign: PathBuf,
}

impl Toolchain {
    /// Resolve the toolchain inside the SDK rooted at `sdk_root`
    pub async fn resolve(sdk_root: impl AsRef<Path>) -> Result<Self, ResolutionError> {
        let sdk_root = sdk_root.as_ref();
        let sdk_root = std::path::absolute(sdk_root).map_err(|source| {
            ResolutionError::InvalidPath {
                path: sdk_root.to_path_buf(),
                source,
            }
        })?;

        match tokio::fs::metadata(&sdk_root).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(ResolutionError::NotADirectory(sdk_root)),
            Err(source) => {
                return Err(ResolutionError::MissingSdk {
                    path: sdk_root,
                    source,
                })
            }
        }

        info!("Resolving Android toolchain in {:?}", sdk_root);

        let build_tools = Self::latest_in(&sdk_root, "build-tools").await?;
        let aapt = build_tools.join(AAPT);
        let dx = build_tools.join(DX);
        let zipalign = build_tools.join(ZIPALIGN);

        let platform = Self::latest_in(&sdk_root, "platforms").await?;
        let android_jar = platform.join(ANDROID_JAR);

        debug!("build-tools: {:?}", build_tools);
        debug!("platform: {:?}", platform);

        Ok(Self {
            sdk_root,
            build_tools,
            platform,
            android_jar,
            aapt,
            dx,
            zipalign,
        })
    }

    async fn latest_in(sdk_root: &Path, what: &'static str) -> Result<PathBuf, ResolutionError> {
        let dir = sdk_root.join(what);
        match latest_version_dir(&dir).await {
            Ok(Some(latest)) => Ok(latest),
            Ok(None) => Err(ResolutionError::Empty { what, path: dir }),
            Err(source) => Err(ResolutionError::Listing {
                what,
                path: dir,
                source,
            }),
        }
    }

    pub fn sdk_root(&self) -> &Path {
        &self.sdk_root
    }

    /// Selected build-tools version directory
    pub fn build_tools(&self) -> &Path {
        &self.build_tools
    }

    /// Selected platform directory
    pub fn platform(&self) -> &Path {
        &self.platform
    }

    /// Platform base library, used as classpath and include set
    pub fn android_jar(&self) -> &Path {
        &self.android_jar
    }

    pub fn aapt(&self) -> &Path {
        &self.aapt
    }

    pub fn dx(&self) -> &Path {
        &self.dx
    }

    pub fn zipalign(&self) -> &Path {
        &self.zipalign
    }
}

/// Return the subdirectory of `dir` whose name orders last byte-wise
///
/// Version directories are assumed to sort chronologically by name; this is
/// not a semantic version comparison, so `9.0.0` outranks `10.0.0`. Plain
/// files are skipped. Returns `Ok(None)` when there is no subdirectory.
pub async fn latest_version_dir(dir: &Path) -> std::io::Result<Option<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut latest: Option<OsString> = None;

    while let Some(entry) = entries.next_entry().await? {
        // Follow symlinks so a linked version directory still counts.
        let path = entry.path();
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => continue,
            Err(e) => {
                warn!("Skipping {:?}: {}", path, e);
                continue;
            }
        }

        let name = entry.file_name();
        let newer = match &latest {
            Some(current) => name.as_encoded_bytes() > current.as_encoded_bytes(),
            None => true,
        };
        if newer {
            latest = Some(name);
        }
    }

    Ok(latest.map(|name| dir.join(name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_sdk(build_tools: &[&str], platforms: &[&str]) -> tempfile::TempDir {
        let sdk = tempfile::tempdir().unwrap();
        std::fs::create_dir(sdk.path().join("build-tools")).unwrap();
        std::fs::create_dir(sdk.path().join("platforms")).unwrap();
        for v in build_tools {
            std::fs::create_dir(sdk.path().join("build-tools").join(v)).unwrap();
        }
        for v in platforms {
            std::fs::create_dir(sdk.path().join("platforms").join(v)).unwrap();
        }
        sdk
    }

    #[tokio::test]
    async fn test_selects_lexicographically_last_build_tools() {
        let sdk = make_sdk(&["29.0.2", "30.0.1", "28.0.3"], &["android-28"]);

        let toolchain = Toolchain::resolve(sdk.path()).await.unwrap();

        assert_eq!(toolchain.build_tools(), sdk.path().join("build-tools").join("30.0.1"));
        assert_eq!(toolchain.aapt(), toolchain.build_tools().join(AAPT));
        assert_eq!(toolchain.dx(), toolchain.build_tools().join(DX));
        assert_eq!(toolchain.zipalign(), toolchain.build_tools().join(ZIPALIGN));
    }

    #[tokio::test]
    async fn test_selection_is_bytewise_not_semver() {
        let sdk = make_sdk(&["10.0.0", "9.0.0"], &["android-9", "android-10"]);

        let toolchain = Toolchain::resolve(sdk.path()).await.unwrap();

        assert!(toolchain.build_tools().ends_with("9.0.0"));
        assert!(toolchain.platform().ends_with("android-9"));
    }

    #[tokio::test]
    async fn test_platform_and_base_library() {
        let sdk = make_sdk(&["30.0.1"], &["android-28", "android-30"]);

        let toolchain = Toolchain::resolve(sdk.path()).await.unwrap();

        assert_eq!(toolchain.platform(), sdk.path().join("platforms").join("android-30"));
        assert_eq!(
            toolchain.android_jar(),
            sdk.path().join("platforms").join("android-30").join(ANDROID_JAR)
        );
        assert!(toolchain.sdk_root().is_absolute());
    }

    #[tokio::test]
    async fn test_empty_build_tools_fails_before_platforms() {
        // No platforms directory at all: reaching it would yield a Listing error.
        let sdk = tempfile::tempdir().unwrap();
        std::fs::create_dir(sdk.path().join("build-tools")).unwrap();

        let err = Toolchain::resolve(sdk.path()).await.unwrap_err();

        match err {
            ResolutionError::Empty { what, .. } => assert_eq!(what, "build-tools"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_files_do_not_count_as_versions() {
        let sdk = make_sdk(&[], &["android-30"]);
        std::fs::write(sdk.path().join("build-tools").join("99.0.0"), b"").unwrap();

        let err = Toolchain::resolve(sdk.path()).await.unwrap_err();
        assert!(matches!(err, ResolutionError::Empty { what: "build-tools", .. }));
    }

    #[tokio::test]
    async fn test_missing_platforms() {
        let sdk = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(sdk.path().join("build-tools").join("30.0.1")).unwrap();

        let err = Toolchain::resolve(sdk.path()).await.unwrap_err();

        assert!(matches!(err, ResolutionError::Listing { what: "platforms", .. }));
        assert!(err.to_string().contains("platforms"));
    }

    #[tokio::test]
    async fn test_empty_platforms() {
        let sdk = make_sdk(&["30.0.1"], &[]);

        let err = Toolchain::resolve(sdk.path()).await.unwrap_err();
        assert!(matches!(err, ResolutionError::Empty { what: "platforms", .. }));
    }

    #[tokio::test]
    async fn test_missing_sdk_root() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = Toolchain::resolve(&missing).await.unwrap_err();
        assert!(matches!(err, ResolutionError::MissingSdk { ref path, .. } if *path == missing));
    }

    #[tokio::test]
    async fn test_sdk_below_a_file_keeps_the_cause() {
        use std::error::Error as _;

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("file"), b"").unwrap();

        let err = Toolchain::resolve(dir.path().join("file").join("sdk"))
            .await
            .unwrap_err();

        assert!(matches!(err, ResolutionError::MissingSdk { .. }));
        assert!(err.source().is_some());
    }

    #[tokio::test]
    async fn test_sdk_location_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("sdk");
        std::fs::write(&file, b"").unwrap();

        let err = Toolchain::resolve(&file).await.unwrap_err();
        assert!(matches!(err, ResolutionError::NotADirectory(ref p) if *p == file));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_dangling_version_link_is_skipped() {
        let sdk = make_sdk(&["30.0.1"], &["android-30"]);
        std::os::unix::fs::symlink(
            sdk.path().join("gone"),
            sdk.path().join("build-tools").join("99.0.0"),
        )
        .unwrap();

        let toolchain = Toolchain::resolve(sdk.path()).await.unwrap();
        assert!(toolchain.build_tools().ends_with("30.0.1"));
    }

    #[tokio::test]
    async fn test_empty_path_cannot_be_normalized() {
        let err = Toolchain::resolve("").await.unwrap_err();
        assert!(matches!(err, ResolutionError::InvalidPath { .. }));
    }

    #[tokio::test]
    async fn test_latest_version_dir_on_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(latest_version_dir(dir.path()).await.unwrap(), None);
    }
}
