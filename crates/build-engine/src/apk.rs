//! APK Inspection
//!
//! Reads a finished APK to report what ended up inside it.

use std::path::{Path, PathBuf};
use zip::ZipArchive;
use tracing::debug;

use crate::BuildError;

/// Summary of an APK's contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApkSummary {
    /// APK file path
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Number of archive entries
    pub entries: usize,
    pub has_dex: bool,
    pub has_manifest: bool,
    pub has_resource_table: bool,
    /// A JAR signature is present under META-INF
    pub signed: bool,
}

/// APK Analyzer
pub struct ApkAnalyzer;

impl ApkAnalyzer {
    /// Summarize an APK file
    pub fn summarize(path: &Path) -> Result<ApkSummary, BuildError> {
        let file = std::fs::File::open(path)?;
        let size = file.metadata()?.len();

        let mut archive = ZipArchive::new(file).map_err(|source| BuildError::InvalidApk {
            path: path.to_path_buf(),
            source,
        })?;

        let mut summary = ApkSummary {
            path: path.to_path_buf(),
            size,
            entries: archive.len(),
            has_dex: false,
            has_manifest: false,
            has_resource_table: false,
            signed: false,
        };

        for i in 0..archive.len() {
            let entry = match archive.by_index(i) {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry {} in {:?}: {}", i, path, e);
                    continue;
                }
            };
            let name = entry.name();

            match name {
                "classes.dex" => summary.has_dex = true,
                "AndroidManifest.xml" => summary.has_manifest = true,
                "resources.arsc" => summary.has_resource_table = true,
                _ => {}
            }

            if name.starts_with("META-INF/")
                && (name.ends_with(".RSA") || name.ends_with(".DSA") || name.ends_with(".EC"))
            {
                summary.signed = true;
            }
        }

        Ok(summary)
    }

    /// Get APK size in human-readable format
    pub fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.2} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.2} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.2} KB", bytes as f64 / KB as f64)
        } else {
            format!("{} bytes", bytes)
        }
    }
}
