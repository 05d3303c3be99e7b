//! GPU temperature sources.
//!
//! AMD and nouveau GPUs expose a hwmon channel and are read like any other
//! sensor. NVIDIA's proprietary driver does not, so the temperature is asked
//! from `nvidia-smi` under a hard timeout.

use crate::error::{Result, SystemError};
use crate::sensors::SensorHandle;
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// External diagnostic command printing the GPU temperature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpuCommand {
    /// Program name or path
    pub program: String,
    /// Arguments passed verbatim
    pub args: Vec<String>,
    /// Longest time one invocation may take
    pub timeout: Duration,
}

impl Default for GpuCommand {
    fn default() -> Self {
        Self::new(
            "nvidia-smi",
            [
                "--query-gpu=temperature.gpu",
                "--format=csv,noheader,nounits",
            ],
        )
    }
}

impl GpuCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            timeout: crate::GPU_QUERY_TIMEOUT,
        }
    }

    /// Set the invocation timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether the program exists, either as a path or somewhere on `PATH`.
    pub fn is_available(&self) -> bool {
        let program = Path::new(&self.program);
        if program.components().count() > 1 {
            return program.is_file();
        }

        let Some(paths) = std::env::var_os("PATH") else {
            return false;
        };
        std::env::split_paths(&paths).any(|dir| {
            dir.join(program).is_file()
                || dir
                    .join(format!("{}{}", self.program, std::env::consts::EXE_SUFFIX))
                    .is_file()
        })
    }

    /// Run the command once and parse its output.
    ///
    /// The child is killed if it outlives `timeout`.
    pub async fn query(&self) -> Result<f64> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| SystemError::Timeout(self.timeout))??;

        if !output.status.success() {
            return Err(SystemError::system_error(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }

        parse_temperature(&String::from_utf8_lossy(&output.stdout))
    }
}

impl fmt::Display for GpuCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Parse the first non-empty line of a diagnostic command's output.
///
/// Multi-GPU hosts print one line per device; the first device wins.
pub fn parse_temperature(output: &str) -> Result<f64> {
    let line = output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or_else(|| SystemError::parse_error("empty GPU command output"))?;

    line.parse::<f64>()
        .map_err(|_| SystemError::parse_error(format!("unexpected GPU temperature {:?}", line)))
}

/// Where the GPU temperature comes from, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GpuSource {
    /// A hwmon channel on the GPU driver
    Sensor(SensorHandle),
    /// The external diagnostic command
    Command(GpuCommand),
}

impl fmt::Display for GpuSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuSource::Sensor(handle) => write!(f, "{}", handle),
            GpuSource::Command(command) => write!(f, "`{}`", command),
        }
    }
}
