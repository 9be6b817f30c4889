//! Stylesheet formatting, with config resolved from the working directory.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Name of the optional formatter config file.
pub const CONFIG_FILE_NAME: &str = ".cssfmtrc";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatOptions {
    /// Spaces per nesting level.
    pub indent: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

impl FormatOptions {
    /// Read `.cssfmtrc` from `dir`. A missing file means defaults; an
    /// unreadable or malformed one is an error.
    pub fn resolve(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("malformed formatter config {}", path.display())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err).with_context(|| format!("reading {}", path.display())),
        }
    }
}

/// Re-indent a stylesheet: one trimmed line per input line, nesting
/// tracked by braces, blank lines dropped, exactly one trailing newline.
pub fn format_css(css: &str, opts: &FormatOptions) -> String {
    let mut out = String::with_capacity(css.len());
    let mut depth: usize = 0;

    for raw in css.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('}') {
            depth = depth.saturating_sub(1);
        }
        for _ in 0..depth * opts.indent {
            out.push(' ');
        }
        out.push_str(line);
        out.push('\n');
        if line.ends_with('{') {
            depth += 1;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_config_file_yields_defaults() {
        let tmp = tempdir().expect("tempdir");

        let opts = FormatOptions::resolve(tmp.path()).expect("resolve");

        assert_eq!(opts, FormatOptions::default());
        assert_eq!(opts.indent, 2);
    }

    #[test]
    fn config_file_sets_the_indent_width() {
        let tmp = tempdir().expect("tempdir");
        fs::write(tmp.path().join(CONFIG_FILE_NAME), r#"{ "indent": 4 }"#).expect("seed");

        let opts = FormatOptions::resolve(tmp.path()).expect("resolve");

        assert_eq!(opts.indent, 4);
    }

    #[test]
    fn malformed_config_file_is_an_error() {
        let tmp = tempdir().expect("tempdir");
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "indent = 4").expect("seed");

        assert!(FormatOptions::resolve(tmp.path()).is_err());
    }

    #[test]
    fn reindents_nested_blocks() {
        let rough = ":root {\n--a: 1px;\n}\n\n.card {\n  color: red;\n}\n";

        let formatted = format_css(rough, &FormatOptions::default());

        assert_eq!(
            formatted,
            ":root {\n  --a: 1px;\n}\n.card {\n  color: red;\n}\n"
        );
    }

    #[test]
    fn honours_a_wider_indent() {
        let formatted = format_css(":root {\n--a: 1px;\n}\n", &FormatOptions { indent: 4 });

        assert_eq!(formatted, ":root {\n    --a: 1px;\n}\n");
    }
}
