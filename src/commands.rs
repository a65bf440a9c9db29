//! Build command
//!
//! Layers defaults, an optional config file and command-line flags into a
//! build configuration, resolves the toolchain and runs the pipeline.

use anyhow::{Context, Result};
use tracing::{info, warn};

use droidpack_android_toolchain::{sdk_location_from_env, JdkTools, Toolchain};
use droidpack_build_engine::{ApkAnalyzer, BuildConfig, BuildOutput, BuildRunner, ConfigFile};

use crate::cli::Cli;

/// Build command options
pub struct BuildCommand {
    pub cli: Cli,
}

impl BuildCommand {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Execute the build command
    ///
    /// An unresolvable SDK location is returned as a bare
    /// [`SdkLocationError`](droidpack_android_toolchain::SdkLocationError)
    /// so the caller can recognize it.
    pub async fn execute(&self) -> Result<BuildOutput> {
        let file = match self.cli.config {
            Some(ref path) => ConfigFile::load(path)
                .await
                .with_context(|| format!("Could not load configuration from {:?}", path))?,
            None => ConfigFile::default(),
        };

        let sdk = sdk_location_from_env(self.cli.sdk.clone().or_else(|| file.sdk.clone()))?;
        let config = self.build_config(&file)?;

        let toolchain = Toolchain::resolve(&sdk)
            .await
            .context("Could not ascertain toolchain")?;
        let jdk = JdkTools::locate(config.java_home.as_deref());

        let runner = BuildRunner::new(config, toolchain, jdk);
        let output = runner.build().await.context("Build failed")?;

        // Inspection reads the archive with blocking I/O.
        let apk = output.path.clone();
        match tokio::task::spawn_blocking(move || ApkAnalyzer::summarize(&apk)).await {
            Ok(Ok(summary)) => info!(
                "{:?}: {}, {} entries, classes.dex: {}, signed: {}",
                summary.path,
                ApkAnalyzer::format_size(summary.size),
                summary.entries,
                summary.has_dex,
                summary.signed
            ),
            Ok(Err(e)) => warn!("Could not inspect {:?}: {}", output.path, e),
            Err(e) => warn!("APK inspection did not finish: {}", e),
        }

        Ok(output)
    }

    /// Defaults, then the config file, then flags
    pub fn build_config(&self, file: &ConfigFile) -> Result<BuildConfig> {
        let mut config = BuildConfig::default();
        config.apply_file(file);

        let cli = &self.cli;
        if let Some(ref manifest) = cli.manifest {
            config.manifest = manifest.clone();
        }
        if let Some(ref resources) = cli.resources {
            config.resources = resources.clone();
        }
        if let Some(ref java) = cli.java_sources {
            config.java_sources = java.clone();
        }
        if let Some(ref out) = cli.output_dir {
            config.output_dir = out.clone();
        }
        if let Some(ref java_home) = cli.java_home {
            config.java_home = Some(java_home.clone());
        }
        if let Some(ref keystore) = cli.keystore {
            config.keystore.path = keystore.clone();
        }

        config
            .absolutize()
            .context("Could not resolve input locations")?;
        Ok(config)
    }
}
