//! CLI argument parsing using clap derive macros

use std::path::PathBuf;
use clap::Parser;

/// Droidpack - build an APK from a manifest, resources and Java sources
///
/// Runs the Android SDK's resource compiler, javac, dx, jarsigner and
/// zipalign in order and stops at the first failing tool.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "droidpack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Android SDK location, in lieu of the ANDROID_HOME environment variable
    #[arg(long, value_name = "DIR")]
    pub sdk: Option<PathBuf>,

    /// AndroidManifest.xml of the app [default: ./AndroidManifest.xml]
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Parent directory of the XML resource files (commonly `res`) [default: ./xml]
    #[arg(long = "xml", visible_alias = "res", value_name = "DIR")]
    pub resources: Option<PathBuf>,

    /// Parent directory of the app's Java sources [default: ./java]
    #[arg(long = "java", value_name = "DIR")]
    pub java_sources: Option<PathBuf>,

    /// Directory for temporary artifacts and the final APK [default: .]
    #[arg(long = "out", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// JDK whose javac and jarsigner are used, in lieu of searching PATH
    #[arg(long, value_name = "DIR")]
    pub java_home: Option<PathBuf>,

    /// Keystore to sign with [default: ~/.android/debug.keystore]
    #[arg(long, value_name = "FILE")]
    pub keystore: Option<PathBuf>,

    /// TOML file with build settings; flags override it
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
