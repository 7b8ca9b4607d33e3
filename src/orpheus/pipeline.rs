//! Handoff to the download pipeline.
//!
//! Resolution ends with a [`DownloadJob`]; what happens to it is up to a
//! [`DownloadPipeline`]. Orpheus ships two: printing the job as JSON, and
//! piping it into an external downloader.

use crate::batch::DownloadBatch;
use crate::error::{OrpheusError, Result};
use crate::overrides::CapabilityOverrides;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadJob {
    pub batch: DownloadBatch,
    pub overrides: CapabilityOverrides,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separate_download: Option<String>,
    pub output_path: PathBuf,
}

pub trait DownloadPipeline {
    fn submit(&mut self, job: &DownloadJob) -> Result<()>;
}

/// Writes the job as pretty JSON followed by a newline.
pub struct JsonPipeline<W> {
    output: W,
}

impl<W: Write> JsonPipeline<W> {
    pub fn new(output: W) -> Self {
        Self { output }
    }

    pub fn into_inner(self) -> W {
        self.output
    }
}

impl<W: Write> DownloadPipeline for JsonPipeline<W> {
    fn submit(&mut self, job: &DownloadJob) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.output, job)?;
        writeln!(self.output)?;
        self.output.flush()?;
        Ok(())
    }
}

/// Spawns an external downloader and feeds it the job JSON on stdin.
#[derive(Debug, Clone)]
pub struct CommandPipeline {
    program: String,
}

impl CommandPipeline {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl DownloadPipeline for CommandPipeline {
    fn submit(&mut self, job: &DownloadJob) -> Result<()> {
        let payload = serde_json::to_vec(job)?;
        info!(program = %self.program, items = job.batch.len(), "handing off to download pipeline");

        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| {
                OrpheusError::Pipeline(format!("failed to spawn '{}': {}", self.program, e))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&payload).map_err(|e| {
                OrpheusError::Pipeline(format!("failed to write to '{}': {}", self.program, e))
            })?;
        }

        let status = child.wait().map_err(|e| {
            OrpheusError::Pipeline(format!("failed to wait for '{}': {}", self.program, e))
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(OrpheusError::Pipeline(format!(
                "'{}' exited with {}",
                self.program, status
            )))
        }
    }
}
