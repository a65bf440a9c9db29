//! External Tool Invocation
//!
//! Every pipeline step that shells out goes through [`ToolCommand`]. Arguments
//! are kept as a list and handed to the child verbatim, so a path containing
//! spaces stays a single argument.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use crate::{BuildError, Step};

/// A single invocation of an external tool
#[derive(Debug, Clone)]
pub struct ToolCommand {
    step: Step,
    program: PathBuf,
    args: Vec<OsString>,
    current_dir: Option<PathBuf>,
}

impl ToolCommand {
    pub fn new(step: Step, program: impl Into<PathBuf>) -> Self {
        Self {
            step,
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Working directory of the child
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// Run the tool to completion
    ///
    /// Standard streams are inherited so prompts from the tool reach the
    /// terminal. There is no timeout.
    pub async fn run(&self) -> Result<(), BuildError> {
        info!("[{}/{}] {}", self.step.index(), Step::ALL.len(), self.step.name());
        debug!("{:?} {:?}", self.program, self.args);

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
        }

        let status = cmd.status().await.map_err(|source| BuildError::Launch {
            step: self.step,
            program: self.program.clone(),
            source,
        })?;

        if !status.success() {
            return Err(BuildError::ToolFailed {
                step: self.step,
                program: self.program.clone(),
                status,
            });
        }

        Ok(())
    }
}
