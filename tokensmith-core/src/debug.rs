//! Trace sink for the token generator's `--debug` mode.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::output::to_json_pretty4;

/// Fixed name of the trace file written to the working directory.
pub const DEBUG_FILE_NAME: &str = "tokens-debug.log";

/// Append-only trace sink. [`DebugLog::Disabled`] discards everything,
/// so collaborators take a sink unconditionally and never branch on
/// whether tracing is active.
#[derive(Debug, Clone)]
pub enum DebugLog {
    File(PathBuf),
    Disabled,
}

impl DebugLog {
    /// Open a file sink. Any previous trace is truncated so the file
    /// exists (empty) even if nothing is ever logged.
    pub fn to_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        fs::write(&path, "").with_context(|| format!("creating {}", path.display()))?;
        Ok(DebugLog::File(path))
    }

    pub fn disabled() -> Self {
        DebugLog::Disabled
    }

    /// Append one line: parts space-joined, strings verbatim, anything
    /// else rendered as indented JSON.
    pub fn log(&self, parts: &[Value]) -> Result<()> {
        let DebugLog::File(path) = self else {
            return Ok(());
        };

        let rendered: Vec<String> = parts.iter().map(render_part).collect::<Result<_>>()?;
        let mut file = OpenOptions::new()
            .append(true)
            .open(path)
            .with_context(|| format!("opening {}", path.display()))?;
        writeln!(file, "{}", rendered.join(" "))?;
        Ok(())
    }
}

fn render_part(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => to_json_pretty4(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn file_is_created_empty_before_any_log_call() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join(DEBUG_FILE_NAME);

        let _log = DebugLog::to_file(&path).expect("open sink");

        assert_eq!(fs::read_to_string(&path).expect("read"), "");
    }

    #[test]
    fn truncates_a_previous_trace() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join(DEBUG_FILE_NAME);
        fs::write(&path, "stale line\n").expect("seed");

        let log = DebugLog::to_file(&path).expect("open sink");
        log.log(&["fresh".into()]).expect("log");

        assert_eq!(fs::read_to_string(&path).expect("read"), "fresh\n");
    }

    #[test]
    fn writes_one_line_per_call_space_joined() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join(DEBUG_FILE_NAME);
        let log = DebugLog::to_file(&path).expect("open sink");

        log.log(&["resolved".into(), "tokens".into()]).expect("log");
        log.log(&["count".into(), json!(3)]).expect("log");

        let text = fs::read_to_string(&path).expect("read");
        assert_eq!(text, "resolved tokens\ncount 3\n");
    }

    #[test]
    fn non_strings_render_as_indented_json() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join(DEBUG_FILE_NAME);
        let log = DebugLog::to_file(&path).expect("open sink");

        log.log(&["payload".into(), json!({ "indent": 4 })])
            .expect("log");

        let text = fs::read_to_string(&path).expect("read");
        assert_eq!(text, "payload {\n    \"indent\": 4\n}\n");
    }

    #[test]
    fn disabled_sink_discards_everything() {
        let tmp = tempdir().expect("tempdir");
        let log = DebugLog::disabled();

        log.log(&["never seen".into()]).expect("log");

        assert_eq!(
            fs::read_dir(tmp.path()).expect("read dir").count(),
            0,
            "disabled sink must not create files"
        );
    }
}
