use super::MediaModule;
use crate::error::{OrpheusError, Result};
use crate::model::{MediaIdentification, MediaType, SearchResult};
use serde::de::DeserializeOwned;
use std::process::{Command, Stdio};
use tracing::debug;

/// A module backed by an external program.
///
/// The program is invoked once per call:
/// - `<program> search <media_type> <limit> <query>` prints a JSON array of search results
/// - `<program> parse-url <url>` prints one JSON media identification
///
/// Anything other than a zero exit status with valid JSON on stdout is a module error.
#[derive(Debug, Clone)]
pub struct CommandModule {
    module: String,
    program: String,
}

impl CommandModule {
    pub fn new(module: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            program: program.into(),
        }
    }

    fn run<T: DeserializeOwned>(&self, args: &[&str]) -> Result<T> {
        debug!(module = %self.module, program = %self.program, ?args, "invoking module command");

        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                OrpheusError::module(
                    &self.module,
                    format!("failed to launch '{}': {}", self.program, e),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OrpheusError::module(
                &self.module,
                format!(
                    "'{}' exited with {}: {}",
                    self.program,
                    output.status,
                    stderr.trim()
                ),
            ));
        }

        serde_json::from_slice(&output.stdout).map_err(|e| {
            OrpheusError::module(&self.module, format!("unreadable output: {}", e))
        })
    }
}

impl MediaModule for CommandModule {
    fn search(
        &self,
        media_type: MediaType,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        let limit_arg = limit.to_string();
        let mut results: Vec<SearchResult> =
            self.run(&["search", media_type.as_str(), &limit_arg, query])?;
        results.truncate(limit);
        Ok(results)
    }

    fn custom_url_parse(&self, url: &str) -> Result<MediaIdentification> {
        self.run(&["parse-url", url])
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    fn write_script(dir: &Path, body: &str) -> String {
        let path = dir.join("module.sh");
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn search_reads_json_results() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(
            dir.path(),
            r#"[ "$1" = search ] && [ "$2" = album ] && [ "$3" = 5 ] || exit 3
echo "[{\"result_id\": \"9\", \"name\": \"$4\", \"year\": 2001}]""#,
        );

        let module = CommandModule::new("mod", script);
        let results = module.search(MediaType::Album, "blue", 5).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "blue");
        assert_eq!(results[0].year, Some(2001));
    }

    #[test]
    fn parse_url_reads_identification() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(
            dir.path(),
            r#"echo '{"media_type": "playlist", "media_id": "pl-1"}'"#,
        );

        let ident = CommandModule::new("mod", script)
            .custom_url_parse("https://x.example/a/b")
            .unwrap();
        assert_eq!(ident, MediaIdentification::new(MediaType::Playlist, "pl-1"));
    }

    #[test]
    fn failing_command_is_a_module_error() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "echo boom >&2; exit 2");

        let err = CommandModule::new("mod", script)
            .search(MediaType::Track, "x", 1)
            .unwrap_err();
        assert!(matches!(err, OrpheusError::Module { .. }));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn missing_program_is_a_module_error() {
        let err = CommandModule::new("mod", "/nonexistent/orpheus-module")
            .custom_url_parse("https://x")
            .unwrap_err();
        assert!(err.to_string().starts_with("Module mod: failed to launch"));
    }
}
