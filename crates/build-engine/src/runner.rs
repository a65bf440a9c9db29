//! Build Runner
//!
//! Runs the eight build steps in order and stops at the first failure.
//! Nothing produced by a failed build is rolled back.

use std::fmt;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{error, info};

use droidpack_android_toolchain::{JdkTools, Toolchain};

use crate::command::ToolCommand;
use crate::config::{ArtifactLayout, BuildConfig, DEX_FILE};
use crate::signing::{jarsigner_command, zipalign_command};
use crate::sources::find_java_sources;
use crate::{workspace, BuildError};

/// A pipeline step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Resource compiler writes R.java for the app's resources
    GenerateBindings,
    /// javac compiles app and generated sources
    CompileSources,
    /// dx turns class files into classes.dex
    TranslateBytecode,
    /// Resource compiler writes the unsigned package
    PackageResources,
    /// Resource compiler adds classes.dex to the package
    InjectBytecode,
    Sign,
    Align,
    /// Intermediates are removed
    CleanUp,
}

impl Step {
    /// Every step, in execution order
    pub const ALL: [Step; 8] = [
        Step::GenerateBindings,
        Step::CompileSources,
        Step::TranslateBytecode,
        Step::PackageResources,
        Step::InjectBytecode,
        Step::Sign,
        Step::Align,
        Step::CleanUp,
    ];

    /// 1-based position in the pipeline
    pub fn index(&self) -> usize {
        match self {
            Step::GenerateBindings => 1,
            Step::CompileSources => 2,
            Step::TranslateBytecode => 3,
            Step::PackageResources => 4,
            Step::InjectBytecode => 5,
            Step::Sign => 6,
            Step::Align => 7,
            Step::CleanUp => 8,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Step::GenerateBindings => "generate resource bindings",
            Step::CompileSources => "compile sources",
            Step::TranslateBytecode => "translate bytecode",
            Step::PackageResources => "package resources",
            Step::InjectBytecode => "inject bytecode",
            Step::Sign => "sign",
            Step::Align => "align",
            Step::CleanUp => "clean up",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({})", self.index(), self.name())
    }
}

/// Build output
#[derive(Debug, Clone)]
pub struct BuildOutput {
    /// Path to the signed, aligned APK
    pub path: PathBuf,
    /// APK size in bytes
    pub size: u64,
    /// Build duration in seconds
    pub duration_secs: f64,
}

/// Build progress
#[derive(Debug, Clone)]
pub enum BuildProgress {
    Started,
    Step { step: Step },
    Completed { output: BuildOutput },
    Failed { step: Option<Step>, error: String },
}

/// Build runner that drives the pipeline
pub struct BuildRunner {
    config: BuildConfig,
    toolchain: Toolchain,
    jdk: JdkTools,
    layout: ArtifactLayout,
}

impl BuildRunner {
    /// Create a new build runner
    ///
    /// `config` paths are expected to be absolute already.
    pub fn new(config: BuildConfig, toolchain: Toolchain, jdk: JdkTools) -> Self {
        let layout = config.layout();
        Self {
            config,
            toolchain,
            jdk,
            layout,
        }
    }

    pub fn layout(&self) -> &ArtifactLayout {
        &self.layout
    }

    /// Run the build
    pub async fn build(&self) -> Result<BuildOutput, BuildError> {
        self.execute(None).await
    }

    /// Run the build, reporting progress on `tx`
    pub async fn build_with_progress(
        &self,
        tx: mpsc::Sender<BuildProgress>,
    ) -> Result<BuildOutput, BuildError> {
        self.execute(Some(&tx)).await
    }

    async fn execute(
        &self,
        tx: Option<&mpsc::Sender<BuildProgress>>,
    ) -> Result<BuildOutput, BuildError> {
        let start = std::time::Instant::now();

        notify(tx, BuildProgress::Started).await;
        info!("Building {:?} into {:?}", self.config.manifest, self.config.output_dir);

        if let Err(e) =
            workspace::prepare_output_dirs(&self.config.output_dir, &self.layout.temporary_dirs())
                .await
        {
            error!("{}", e);
            notify(tx, BuildProgress::Failed { step: None, error: e.to_string() }).await;
            return Err(e);
        }

        for step in Step::ALL {
            notify(tx, BuildProgress::Step { step }).await;
            if let Err(e) = self.run_step(step).await {
                error!("{}", e);
                notify(tx, BuildProgress::Failed { step: Some(step), error: e.to_string() }).await;
                return Err(e);
            }
        }

        let metadata = tokio::fs::metadata(&self.layout.apk)
            .await
            .map_err(|source| BuildError::Stat {
                path: self.layout.apk.clone(),
                source,
            })?;
        let output = BuildOutput {
            path: self.layout.apk.clone(),
            size: metadata.len(),
            duration_secs: start.elapsed().as_secs_f64(),
        };

        info!("Build completed in {:.2}s: {:?}", output.duration_secs, output.path);
        notify(tx, BuildProgress::Completed { output: output.clone() }).await;
        Ok(output)
    }

    /// Run a single step
    pub async fn run_step(&self, step: Step) -> Result<(), BuildError> {
        if let Some(cmd) = self.command(step) {
            return cmd.run().await;
        }

        match step {
            Step::CompileSources => self.compile_sources().await,
            _ => {
                info!("[{}/{}] {}", step.index(), Step::ALL.len(), step.name());
                workspace::remove_artifacts(&self.layout.cleanup_paths()).await
            }
        }
    }

    /// Invocation for a step that runs one tool with fixed arguments
    ///
    /// `None` for compilation, whose arguments depend on source discovery,
    /// and for cleanup.
    pub fn command(&self, step: Step) -> Option<ToolCommand> {
        let cfg = &self.config;
        let tc = &self.toolchain;
        let layout = &self.layout;

        let cmd = match step {
            Step::GenerateBindings => ToolCommand::new(step, tc.aapt())
                .args(["package", "-f", "-m", "-J"])
                .arg(&layout.generated_sources)
                .arg("-M")
                .arg(&cfg.manifest)
                .arg("-S")
                .arg(&cfg.resources)
                .arg("-I")
                .arg(tc.android_jar()),
            Step::TranslateBytecode => ToolCommand::new(step, tc.dx())
                .args(["--dex", "--output"])
                .arg(&layout.dex)
                .arg(&layout.classes),
            Step::PackageResources => ToolCommand::new(step, tc.aapt())
                .args(["package", "-f", "-M"])
                .arg(&cfg.manifest)
                .arg("-S")
                .arg(&cfg.resources)
                .arg("-I")
                .arg(tc.android_jar())
                .arg("-F")
                .arg(&layout.unaligned_apk),
            // The entry name inside the archive is the path as given, so the
            // bytecode file is passed relative to the output directory.
            Step::InjectBytecode => ToolCommand::new(step, tc.aapt())
                .arg("add")
                .arg(&layout.unaligned_apk)
                .arg(DEX_FILE),
            Step::Sign => jarsigner_command(&self.jdk.jarsigner, &cfg.keystore, &layout.unaligned_apk),
            Step::Align => zipalign_command(tc.zipalign(), &layout.unaligned_apk, &layout.apk),
            Step::CompileSources | Step::CleanUp => return None,
        };

        Some(cmd.current_dir(&cfg.output_dir))
    }

    async fn compile_sources(&self) -> Result<(), BuildError> {
        let cfg = &self.config;
        let layout = &self.layout;

        let mut sources = find_java_sources(&cfg.java_sources)?;
        sources.extend(find_java_sources(&layout.generated_sources)?);

        let source_path = std::env::join_paths([&cfg.java_sources, &layout.generated_sources])
            .map_err(BuildError::SourcePath)?;

        ToolCommand::new(Step::CompileSources, &self.jdk.javac)
            .arg("-classpath")
            .arg(self.toolchain.android_jar())
            .arg("-sourcepath")
            .arg(source_path)
            .arg("-d")
            .arg(&layout.classes)
            .arg("-target")
            .arg(&cfg.java_version)
            .arg("-source")
            .arg(&cfg.java_version)
            .args(&sources)
            .current_dir(&cfg.output_dir)
            .run()
            .await
    }
}

async fn notify(tx: Option<&mpsc::Sender<BuildProgress>>, progress: BuildProgress) {
    if let Some(tx) = tx {
        let _ = tx.send(progress).await;
    }
}
