//! Step outputs and failure reporting through GitHub workflow commands.

use crate::error::Result;
use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

const MULTILINE_DELIMITER: &str = "ghadelimiter_version_bump";

/// Where the step publishes its results
pub trait OutputSink {
    /// Publish every `(name, value)` pair at once; on error none of them
    /// is published.
    fn set_outputs(&self, outputs: &[(&str, String)]) -> Result<()>;

    /// Mark the step failed with `message`.
    fn set_failed(&self, message: &str);
}

/// [OutputSink] writing to the runner's `GITHUB_OUTPUT` file, or to stdout
/// workflow commands when no file is available.
pub struct WorkflowOutputs {
    output_file: Option<PathBuf>,
}

impl WorkflowOutputs {
    pub fn new(output_file: Option<PathBuf>) -> Self {
        WorkflowOutputs { output_file }
    }

    pub fn from_env() -> Self {
        let output_file = env::var_os("GITHUB_OUTPUT")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        Self::new(output_file)
    }
}

/// Format one `GITHUB_OUTPUT` entry, switching to the heredoc form for
/// values spanning lines.
pub fn format_output_entry(name: &str, value: &str) -> String {
    if value.contains('\n') || value.contains('\r') {
        format!(
            "{name}<<{MULTILINE_DELIMITER}\n{value}\n{MULTILINE_DELIMITER}\n"
        )
    } else {
        format!("{name}={value}\n")
    }
}

/// Escape data for a `::command::` line.
pub fn escape_command_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

impl OutputSink for WorkflowOutputs {
    fn set_outputs(&self, outputs: &[(&str, String)]) -> Result<()> {
        match &self.output_file {
            Some(path) => {
                let buffer: String = outputs
                    .iter()
                    .map(|(name, value)| format_output_entry(name, value))
                    .collect();
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                file.write_all(buffer.as_bytes())?;
            }
            None => {
                let buffer: String = outputs
                    .iter()
                    .map(|(name, value)| {
                        format!("::set-output name={}::{}\n", name, escape_command_data(value))
                    })
                    .collect();
                print!("{}", buffer);
            }
        }
        Ok(())
    }

    fn set_failed(&self, message: &str) {
        println!("::error::{}", escape_command_data(message));
    }
}
