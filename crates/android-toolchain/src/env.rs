//! SDK Location
//!
//! Decides which Android SDK a build uses: an explicit location wins,
//! otherwise `ANDROID_HOME` must name one.

use std::ffi::OsString;
use std::path::PathBuf;
use tracing::debug;

/// Environment variable consulted when no SDK location is given
pub const ANDROID_HOME: &str = "ANDROID_HOME";

/// SDK location errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SdkLocationError {
    #[error("ANDROID_HOME must be set as an environment variable or the SDK location must be provided with --sdk")]
    Unset,
    #[error("ANDROID_HOME is set but empty; it must be non-empty, or the SDK location must be provided with --sdk")]
    Empty,
}

/// Pick the SDK location from an explicit path or the environment value
pub fn sdk_location(
    explicit: Option<PathBuf>,
    env_value: Option<OsString>,
) -> Result<PathBuf, SdkLocationError> {
    // An empty explicit location counts as not given.
    if let Some(path) = explicit.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(path);
    }

    match env_value {
        None => Err(SdkLocationError::Unset),
        Some(value) if value.is_empty() => Err(SdkLocationError::Empty),
        Some(value) => {
            debug!("Using SDK from {}", ANDROID_HOME);
            Ok(PathBuf::from(value))
        }
    }
}

/// Same as [`sdk_location`], reading `ANDROID_HOME` from the process environment
pub fn sdk_location_from_env(explicit: Option<PathBuf>) -> Result<PathBuf, SdkLocationError> {
    sdk_location(explicit, std::env::var_os(ANDROID_HOME))
}
