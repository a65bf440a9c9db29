//! JDK Tools
//!
//! Locates the Java compiler and the JAR signer.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use which::which;

const JAVAC: &str = if cfg!(windows) { "javac.exe" } else { "javac" };
const JARSIGNER: &str = if cfg!(windows) { "jarsigner.exe" } else { "jarsigner" };

/// JDK programs used by the build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JdkTools {
    pub javac: PathBuf,
    pub jarsigner: PathBuf,
}

impl JdkTools {
    /// Locate `javac` and `jarsigner`
    ///
    /// With a JDK home the tools are taken from its `bin` directory. Without
    /// one they are searched on `PATH`; a tool that cannot be found keeps its
    /// bare name and fails when the step that needs it launches it.
    pub fn locate(java_home: Option<&Path>) -> Self {
        match java_home {
            Some(home) => {
                let bin = home.join("bin");
                debug!("Using JDK tools from {:?}", bin);
                Self {
                    javac: bin.join(JAVAC),
                    jarsigner: bin.join(JARSIGNER),
                }
            }
            None => Self {
                javac: Self::on_path(JAVAC),
                jarsigner: Self::on_path(JARSIGNER),
            },
        }
    }

    fn on_path(tool: &str) -> PathBuf {
        match which(tool) {
            Ok(path) => {
                debug!("Found {} at {:?}", tool, path);
                path
            }
            Err(_) => {
                warn!("{} not found on PATH", tool);
                PathBuf::from(tool)
            }
        }
    }
}
