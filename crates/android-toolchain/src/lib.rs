//! Android Toolchain
//!
//! Finds what an APK build needs from the local machine:
//! - the Android SDK location
//! - the newest build-tools and platform inside it
//! - the JDK compiler and signer

pub mod env;
pub mod jdk;
pub mod toolchain;

pub use env::{sdk_location, sdk_location_from_env, SdkLocationError, ANDROID_HOME};
pub use jdk::JdkTools;
pub use toolchain::{latest_version_dir, ResolutionError, Toolchain};
