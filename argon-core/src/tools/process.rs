use std::{ffi::OsStr, path::PathBuf, process::Stdio};
use tokio::process::Command;

#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum ExitStatus {
    Successful,
    Failed(Option<i32>),
}

impl ExitStatus {
    pub fn success(&self) -> bool {
        self == &ExitStatus::Successful
    }

    pub fn message(&self) -> String {
        match self {
            ExitStatus::Successful => "exited successfully".to_owned(),
            ExitStatus::Failed(Some(code)) => format!("exited with error status {}", code),
            ExitStatus::Failed(None) => "exited with unknown error status".to_owned(),
        }
    }
}

impl From<std::process::ExitStatus> for ExitStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        if status.success() {
            ExitStatus::Successful
        } else {
            ExitStatus::Failed(status.code())
        }
    }
}

/// An external executable along with the environment it should run in.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Tool {
    pub path: PathBuf,
    pub env: Vec<(String, String)>,
}

impl Tool {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Tool {
            path: path.into(),
            env: Vec::new(),
        }
    }

    pub fn with_env_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or(self.path.as_os_str())
            .to_string_lossy()
            .into_owned()
    }

    pub(crate) fn command<S: AsRef<OsStr>>(&self, args: impl IntoIterator<Item = S>) -> Command {
        let mut cmd = Command::new(&self.path);
        cmd.envs(self.env.iter().map(|(k, v)| (k, v)))
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        cmd
    }

    /// Runs the tool to completion, keeping stderr for diagnostics.
    pub async fn run<S: AsRef<OsStr>>(
        &self,
        args: impl IntoIterator<Item = S>,
    ) -> std::io::Result<Finished> {
        let output = self
            .command(args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;
        Ok(Finished {
            status: output.status.into(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        })
    }

    /// Runs the tool to completion and returns what it printed to stdout.
    pub async fn read<S: AsRef<OsStr>>(
        &self,
        args: impl IntoIterator<Item = S>,
    ) -> std::io::Result<(ExitStatus, String)> {
        let output = self
            .command(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await?;
        Ok((
            output.status.into(),
            String::from_utf8_lossy(&output.stdout).into_owned(),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct Finished {
    pub status: ExitStatus,
    pub stderr: String,
}
