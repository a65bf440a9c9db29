//! Android Build Engine
//!
//! Assembles an APK from a manifest, a resource directory and Java sources by
//! running the SDK tools one after another.

pub mod apk;
pub mod command;
pub mod config;
pub mod runner;
pub mod signing;
pub mod sources;
pub mod workspace;

pub use apk::{ApkAnalyzer, ApkSummary};
pub use command::ToolCommand;
pub use config::{ArtifactLayout, BuildConfig, ConfigFile};
pub use runner::{BuildOutput, BuildProgress, BuildRunner, Step};
pub use signing::KeyStore;
pub use sources::find_java_sources;

use std::path::PathBuf;
use std::process::ExitStatus;

/// Build errors
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("cannot read config file '{}': {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file '{}': {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("cannot resolve path '{}': {source}", .path.display())]
    InvalidPath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot create directory '{}': {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot find Java sources under '{}': {source}", .root.display())]
    SourceWalk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("cannot build Java source path: {0}")]
    SourcePath(#[source] std::env::JoinPathsError),
    #[error("{step} failed: cannot launch '{}': {source}", .program.display())]
    Launch {
        step: Step,
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{step} failed: '{}' exited with {status}", .program.display())]
    ToolFailed {
        step: Step,
        program: PathBuf,
        status: ExitStatus,
    },
    #[error("cannot stat '{}': {source}", .path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot remove '{}': {source}", .path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid APK '{}': {source}", .path.display())]
    InvalidApk {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BuildError {
    /// Pipeline step a tool error belongs to
    pub fn step(&self) -> Option<Step> {
        match self {
            BuildError::Launch { step, .. } | BuildError::ToolFailed { step, .. } => Some(*step),
            _ => None,
        }
    }
}
