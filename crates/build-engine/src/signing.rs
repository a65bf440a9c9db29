//! APK Signing and Alignment
//!
//! Builds the jarsigner and zipalign invocations for the last two tool steps.

use std::path::{Path, PathBuf};

use crate::command::ToolCommand;
use crate::runner::Step;

/// Debug keystore password
pub const DEBUG_STORE_PASSWORD: &str = "android";
/// Debug key alias
pub const DEBUG_KEY_ALIAS: &str = "androiddebugkey";

/// Keystore information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyStore {
    /// Path to keystore file
    pub path: PathBuf,
    /// Keystore password
    pub password: String,
    /// Key alias
    pub alias: String,
}

impl KeyStore {
    /// Create a new keystore reference
    pub fn new(path: PathBuf, password: &str, alias: &str) -> Self {
        Self {
            path,
            password: password.to_string(),
            alias: alias.to_string(),
        }
    }

    /// The SDK's debug keystore
    pub fn debug() -> Self {
        Self::new(debug_keystore_path(), DEBUG_STORE_PASSWORD, DEBUG_KEY_ALIAS)
    }
}

/// `~/.android/debug.keystore`
pub fn debug_keystore_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".android")
        .join("debug.keystore")
}

/// Sign `apk` in place with `keystore`
pub fn jarsigner_command(jarsigner: &Path, keystore: &KeyStore, apk: &Path) -> ToolCommand {
    ToolCommand::new(Step::Sign, jarsigner)
        .arg("-keystore")
        .arg(&keystore.path)
        .arg("-storepass")
        .arg(&keystore.password)
        .arg(apk)
        .arg(&keystore.alias)
}

/// Align `input` on 4-byte boundaries into `output`, overwriting it
pub fn zipalign_command(zipalign: &Path, input: &Path, output: &Path) -> ToolCommand {
    ToolCommand::new(Step::Align, zipalign)
        .args(["-f", "4"])
        .arg(input)
        .arg(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    fn args(cmd: &ToolCommand) -> Vec<OsString> {
        cmd.get_args().to_vec()
    }

    #[test]
    fn test_debug_keystore() {
        let keystore = KeyStore::debug();
        assert!(keystore.path.ends_with(".android/debug.keystore"));
        assert_eq!(keystore.password, "android");
        assert_eq!(keystore.alias, "androiddebugkey");
    }

    #[test]
    fn test_jarsigner_arguments() {
        let keystore = KeyStore::new(PathBuf::from("/home/me/.android/debug.keystore"), "android", "androiddebugkey");
        let cmd = jarsigner_command(Path::new("jarsigner"), &keystore, Path::new("/out/app.apk.unaligned"));

        assert_eq!(cmd.step(), Step::Sign);
        assert_eq!(
            args(&cmd),
            [
                "-keystore",
                "/home/me/.android/debug.keystore",
                "-storepass",
                "android",
                "/out/app.apk.unaligned",
                "androiddebugkey",
            ]
            .map(OsString::from)
        );
    }

    #[test]
    fn test_zipalign_arguments() {
        let cmd = zipalign_command(
            Path::new("/sdk/build-tools/30.0.1/zipalign"),
            Path::new("/out/app.apk.unaligned"),
            Path::new("/out/app.apk"),
        );

        assert_eq!(cmd.step(), Step::Align);
        assert_eq!(cmd.program(), Path::new("/sdk/build-tools/30.0.1/zipalign"));
        assert_eq!(
            args(&cmd),
            ["-f", "4", "/out/app.apk.unaligned", "/out/app.apk"].map(OsString::from)
        );
    }
}
