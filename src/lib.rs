//! Droidpack - assemble an Android APK with the stock SDK tools
//!
//! Given an installed Android SDK, a manifest, a resource directory and a
//! tree of Java sources, Droidpack runs the SDK's resource compiler, javac,
//! the bytecode translator, jarsigner and zipalign in sequence and leaves a
//! signed, aligned `app.apk` in the output directory.
//!
//! ## Architecture
//!
//! - `droidpack-android-toolchain`: SDK location, build-tools/platform
//!   resolution, JDK tool lookup
//! - `droidpack-build-engine`: configuration, the eight-step pipeline,
//!   signing and APK inspection
//! - this crate: command-line interface

#![warn(clippy::all)]

pub mod cli;
pub mod commands;

// Re-export main components for library usage
pub use droidpack_android_toolchain as toolchain;
pub use droidpack_build_engine as build;

/// Prelude module for convenient imports
pub mod prelude {
    pub use droidpack_android_toolchain::{JdkTools, Toolchain};
    pub use droidpack_build_engine::{BuildConfig, BuildRunner, ConfigFile};
}
