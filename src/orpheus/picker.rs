//! # Selection Backends
//!
//! A [`Picker`] presents a [`CandidateTable`] to the user and returns the raw
//! text of their choice. Two implementations exist:
//!
//! - [`FzfPicker`]: runs an external fuzzy finder as a child process. Rows are
//!   fed on stdin, only the visible half of each row is displayed, and the
//!   hidden payload drives a preview pane through a small `awk` filter.
//! - [`PromptPicker`]: prints the header and visible rows, then reads one line.
//!
//! The fuzzy finder is best-effort: launch failures, non-zero exits and empty
//! output all yield `Ok(None)`, which tells the caller to fall back to the
//! prompt. There is no timeout; a picker that never exits blocks the caller.
//!
//! Pickers do no validation beyond trimming; see [`crate::selection`].

use crate::config::PickerConfig;
use crate::error::{OrpheusError, Result};
use crate::format::{CandidateTable, PAYLOAD_DELIMITER, ROW_SEPARATOR};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::debug;

pub trait Picker {
    /// Presents the table and returns the raw selection, or `None` when this
    /// picker could not obtain one.
    fn pick(&mut self, table: &CandidateTable) -> Result<Option<String>>;
}

/// External fuzzy-finder backend (fzf-compatible command line).
#[derive(Debug, Clone)]
pub struct FzfPicker {
    program: PathBuf,
}

impl FzfPicker {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Resolves `command` on `PATH`; `None` when it is not installed.
    pub fn detect(command: &str) -> Option<Self> {
        match which::which(command) {
            Ok(program) => Some(Self::new(program)),
            Err(e) => {
                debug!(command, error = %e, "interactive picker not available");
                None
            }
        }
    }

    /// Probes for the configured picker unless it is disabled.
    pub fn from_config(config: &PickerConfig) -> Option<Self> {
        if config.enabled {
            Self::detect(&config.command)
        } else {
            None
        }
    }

    fn args(&self, header: &str) -> Vec<String> {
        vec![
            "--reverse".to_string(),
            "--header".to_string(),
            header.to_string(),
            "--delimiter".to_string(),
            ROW_SEPARATOR.to_string(),
            "--with-nth".to_string(),
            "1".to_string(),
            "--preview".to_string(),
            format!("echo {{2}} | {}", preview_filter()),
            "--preview-window".to_string(),
            "right:40%:wrap".to_string(),
        ]
    }

    fn run(&self, table: &CandidateTable) -> io::Result<Option<String>> {
        let mut child = Command::new(&self.program)
            .args(self.args(&table.header))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            // The picker may exit before reading everything.
            if let Err(e) = stdin.write_all(table.picker_input().as_bytes()) {
                debug!(error = %e, "picker closed its input early");
            }
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            debug!(status = %output.status, "picker exited unsuccessfully");
            return Ok(None);
        }

        let chosen = String::from_utf8_lossy(&output.stdout);
        Ok(leading_index(&chosen))
    }
}

impl Picker for FzfPicker {
    fn pick(&mut self, table: &CandidateTable) -> Result<Option<String>> {
        match self.run(table) {
            Ok(choice) => Ok(choice),
            Err(e) => {
                debug!(program = %self.program.display(), error = %e, "picker failed");
                Ok(None)
            }
        }
    }
}

/// The `N` of an `N.  …` row echoed back by the picker.
fn leading_index(chosen: &str) -> Option<String> {
    let token = chosen.trim().split('.').next()?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Shell filter rendering a hidden payload into preview lines.
fn preview_filter() -> String {
    format!(
        "awk -F '{}' '{{ \
         print \"Title:   \" $1 ($6 == \"1\" ? \" [E]\" : \"\"); \
         if ($2 != \"\") print \"Artist:  \" $2; \
         if ($3 != \"\") print \"Year:    \" $3; \
         if ($4 != \"\") print \"Length:  \" $4; \
         if ($5 != \"\") print \"Quality: \" $5; \
         }}'",
        PAYLOAD_DELIMITER
    )
}

/// Line-oriented fallback.
pub struct PromptPicker<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptPicker<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl PromptPicker<io::StdinLock<'static>, io::Stderr> {
    /// Reads stdin and prompts on stderr, leaving stdout to the job output.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> Picker for PromptPicker<R, W> {
    fn pick(&mut self, table: &CandidateTable) -> Result<Option<String>> {
        writeln!(self.output, "{}", table.header)?;
        for row in &table.rows {
            writeln!(self.output, "{}", row.visible)?;
        }
        write!(self.output, "Selection: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(OrpheusError::InvalidInput("No selection given".into()));
        }
        Ok(Some(line.trim().to_string()))
    }
}
