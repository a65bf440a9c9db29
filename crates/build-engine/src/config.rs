//! Build Configuration
//!
//! Input locations, output layout and signing settings for one build, plus
//! the optional TOML file that overrides the defaults.

use std::path::{Path, PathBuf};
use serde::Deserialize;
use tracing::debug;

use crate::signing::KeyStore;
use crate::BuildError;

/// Default manifest location
pub const DEFAULT_MANIFEST: &str = "AndroidManifest.xml";
/// Default resource directory
pub const DEFAULT_RESOURCES: &str = "xml";
/// Default Java source directory
pub const DEFAULT_JAVA_SOURCES: &str = "java";
/// Default `-source`/`-target` level handed to javac
pub const DEFAULT_JAVA_VERSION: &str = "1.7";

/// Directory receiving the generated resource bindings
pub const GENERATED_SOURCES_DIR: &str = "generated_java_sources";
/// Directory receiving compiled class files
pub const CLASSES_DIR: &str = "java_virtual_machine_bytecode";
/// Translated bytecode file
pub const DEX_FILE: &str = "classes.dex";
/// Unsigned, unaligned package
pub const UNALIGNED_APK: &str = "app.apk.unaligned";
/// Final package
pub const APK: &str = "app.apk";

/// Build configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// AndroidManifest.xml of the app
    pub manifest: PathBuf,

    /// Resource directory (commonly `res`)
    pub resources: PathBuf,

    /// Root of the app's Java sources
    pub java_sources: PathBuf,

    /// Base directory for temporary and final artifacts
    pub output_dir: PathBuf,

    /// JDK to take javac and jarsigner from; `PATH` when unset
    pub java_home: Option<PathBuf>,

    /// Java language level
    pub java_version: String,

    /// Keystore used to sign the package
    pub keystore: KeyStore,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from(DEFAULT_MANIFEST),
            resources: PathBuf::from(DEFAULT_RESOURCES),
            java_sources: PathBuf::from(DEFAULT_JAVA_SOURCES),
            output_dir: PathBuf::from("."),
            java_home: None,
            java_version: DEFAULT_JAVA_VERSION.to_string(),
            keystore: KeyStore::debug(),
        }
    }
}

impl BuildConfig {
    /// Override fields set in a config file
    pub fn apply_file(&mut self, file: &ConfigFile) {
        if let Some(ref manifest) = file.manifest {
            self.manifest = manifest.clone();
        }
        if let Some(ref resources) = file.resources {
            self.resources = resources.clone();
        }
        if let Some(ref java) = file.java {
            self.java_sources = java.clone();
        }
        if let Some(ref out) = file.out {
            self.output_dir = out.clone();
        }
        if let Some(ref java_home) = file.java_home {
            self.java_home = Some(java_home.clone());
        }
        if let Some(ref version) = file.java_version {
            self.java_version = version.clone();
        }
        if let Some(ref keystore) = file.keystore {
            if let Some(ref path) = keystore.path {
                self.keystore.path = path.clone();
            }
            if let Some(ref password) = keystore.password {
                self.keystore.password = password.clone();
            }
            if let Some(ref alias) = keystore.alias {
                self.keystore.alias = alias.clone();
            }
        }
    }

    /// Make every path absolute against the current directory
    pub fn absolutize(&mut self) -> Result<(), BuildError> {
        self.manifest = absolute(&self.manifest)?;
        self.resources = absolute(&self.resources)?;
        self.java_sources = absolute(&self.java_sources)?;
        self.output_dir = absolute(&self.output_dir)?;
        self.keystore.path = absolute(&self.keystore.path)?;
        if let Some(ref java_home) = self.java_home {
            self.java_home = Some(absolute(java_home)?);
        }
        Ok(())
    }

    /// Artifact paths under the output directory
    pub fn layout(&self) -> ArtifactLayout {
        ArtifactLayout::new(&self.output_dir)
    }
}

fn absolute(path: &Path) -> Result<PathBuf, BuildError> {
    std::path::absolute(path).map_err(|source| BuildError::InvalidPath {
        path: path.to_path_buf(),
        source,
    })
}

/// Where each artifact of a build lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    pub generated_sources: PathBuf,
    pub classes: PathBuf,
    pub dex: PathBuf,
    pub unaligned_apk: PathBuf,
    pub apk: PathBuf,
}

impl ArtifactLayout {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            generated_sources: output_dir.join(GENERATED_SOURCES_DIR),
            classes: output_dir.join(CLASSES_DIR),
            dex: output_dir.join(DEX_FILE),
            unaligned_apk: output_dir.join(UNALIGNED_APK),
            apk: output_dir.join(APK),
        }
    }

    /// Directories created before the first step
    pub fn temporary_dirs(&self) -> [&Path; 2] {
        [&self.generated_sources, &self.classes]
    }

    /// Intermediates removed by the last step, in removal order
    pub fn cleanup_paths(&self) -> [&Path; 4] {
        [
            &self.dex,
            &self.unaligned_apk,
            &self.generated_sources,
            &self.classes,
        ]
    }
}

/// Contents of a `--config` TOML file
///
/// Relative paths are taken relative to the file's directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub sdk: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub resources: Option<PathBuf>,
    pub java: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub java_home: Option<PathBuf>,
    pub java_version: Option<String>,
    pub keystore: Option<KeyStoreFile>,
}

/// `[keystore]` table of a config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyStoreFile {
    pub path: Option<PathBuf>,
    pub password: Option<String>,
    pub alias: Option<String>,
}

impl ConfigFile {
    /// Read and parse a config file
    pub async fn load(path: &Path) -> Result<Self, BuildError> {
        debug!("Loading configuration from {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| BuildError::ConfigRead {
                path: path.to_path_buf(),
                source,
            })?;
        let file: ConfigFile = toml::from_str(&content).map_err(|source| BuildError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(file.rebase(base))
    }

    /// Join relative paths onto `base`
    pub fn rebase(mut self, base: &Path) -> Self {
        let join = |p: &mut Option<PathBuf>| {
            if let Some(path) = p.as_mut() {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        };
        join(&mut self.sdk);
        join(&mut self.manifest);
        join(&mut self.resources);
        join(&mut self.java);
        join(&mut self.out);
        join(&mut self.java_home);
        if let Some(ref mut keystore) = self.keystore {
            join(&mut keystore.path);
        }
        self
    }
}
