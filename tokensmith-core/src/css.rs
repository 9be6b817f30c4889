//! Batch stylesheet processing across the package collections.
//!
//! The driver is fail-soft per item: one malformed stylesheet must not
//! block unrelated packages from building. Failures are reported and
//! skipped; the batch itself never aborts.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use glob::glob;

/// Glob patterns covering the two sibling package collections.
pub const CSS_GLOBS: [&str; 3] = [
    "packages/*/src/**/*.css",
    "packages/*/themes/*.css",
    "addons/*/src/**/*.css",
];

/// Transforms one stylesheet. A trait seam so the batch runner can be
/// exercised with failure-injecting processors.
pub trait CssProcessor {
    fn process(&self, path: &Path) -> Result<()>;
}

/// Strips comments, collapses whitespace and writes `<stem>.min.css`
/// next to the source.
#[derive(Debug, Default)]
pub struct MinifyProcessor;

impl CssProcessor for MinifyProcessor {
    fn process(&self, path: &Path) -> Result<()> {
        let source =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let minified = minify(&source)?;
        let out = min_css_path(path);
        fs::write(&out, minified).with_context(|| format!("writing {}", out.display()))?;
        Ok(())
    }
}

/// Outcome of one batch run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub processed: usize,
    pub failed: usize,
}

/// Enumerate stylesheets under `root` matching the fixed patterns.
/// Pattern order is fixed and each pattern yields paths alphabetically,
/// so one run's order is reproducible. Minified outputs from an earlier
/// run are not inputs.
pub fn collect_css_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in CSS_GLOBS {
        let full = root.join(pattern);
        let full = full
            .to_str()
            .ok_or_else(|| anyhow!("non-UTF-8 search root {}", root.display()))?;
        for matched in glob(full).with_context(|| format!("bad glob pattern {pattern}"))? {
            let path = matched?;
            if is_minified_output(&path) {
                continue;
            }
            files.push(path);
        }
    }

    Ok(files)
}

/// Run every file through `processor`, strictly in order. A failing
/// file gets one error line on `report` and the batch moves on.
pub fn run_batch(
    files: &[PathBuf],
    processor: &dyn CssProcessor,
    mut report: impl Write,
) -> Result<BatchOutcome> {
    let mut outcome = BatchOutcome::default();

    for path in files {
        match processor.process(path) {
            Ok(()) => outcome.processed += 1,
            Err(err) => {
                outcome.failed += 1;
                writeln!(report, "failed to process {}: {err:#}", path.display())?;
            }
        }
    }

    Ok(outcome)
}

fn is_minified_output(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.ends_with(".min.css"))
        .unwrap_or(false)
}

/// `<dir>/<stem>.min.css` for `<dir>/<stem>.css`.
fn min_css_path(path: &Path) -> PathBuf {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("out");
    path.with_file_name(format!("{stem}.min.css"))
}

fn minify(source: &str) -> Result<String> {
    let stripped = strip_comments(source);
    check_braces(&stripped)?;

    let mut out = String::with_capacity(stripped.len());
    let mut pending_space = false;
    for ch in stripped.chars() {
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        let structural = matches!(ch, '{' | '}' | ';' | ':' | ',');
        let after_structural = matches!(out.chars().last(), Some('{' | '}' | ';' | ':' | ','));
        if pending_space && !structural && !after_structural {
            out.push(' ');
        }
        out.push(ch);
        pending_space = false;
    }
    out.push('\n');

    Ok(out)
}

/// Catches truncated or malformed stylesheets before emitting output.
fn check_braces(source: &str) -> Result<()> {
    let mut depth: i64 = 0;
    for ch in source.chars() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth < 0 {
                    return Err(anyhow!("unbalanced braces"));
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(anyhow!("unbalanced braces"));
    }
    Ok(())
}

fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            // unterminated comment swallows the tail
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::tempdir;

    fn seed(root: &Path, rel: &str, contents: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(&path, contents).expect("seed");
        path
    }

    #[test]
    fn minify_strips_comments_and_whitespace() {
        let minified = minify(".card {\n  /* spacing */\n  margin: 4px 8px;\n}\n").expect("minify");

        assert_eq!(minified, ".card{margin:4px 8px;}\n");
    }

    #[test]
    fn minify_rejects_unbalanced_braces() {
        assert!(minify(".card { margin: 0;").is_err());
        assert!(minify(".card } margin: 0; {").is_err());
    }

    #[test]
    fn processor_writes_a_sibling_min_file() {
        let tmp = tempdir().expect("tempdir");
        let source = seed(tmp.path(), "pkg/button.css", ".b {\n  color: red;\n}\n");

        MinifyProcessor.process(&source).expect("process");

        let min = fs::read_to_string(tmp.path().join("pkg/button.min.css")).expect("read");
        assert_eq!(min, ".b{color:red;}\n");
    }

    #[test]
    fn collection_follows_pattern_order_and_skips_minified_outputs() {
        let tmp = tempdir().expect("tempdir");
        let in_src = seed(tmp.path(), "packages/alpha/src/button.css", "");
        let in_themes = seed(tmp.path(), "packages/alpha/themes/dark.css", "");
        let in_addons = seed(tmp.path(), "addons/beta/src/extra.css", "");
        seed(tmp.path(), "packages/alpha/src/button.min.css", "");
        seed(tmp.path(), "packages/alpha/readme.css", ""); // outside the patterns

        let files = collect_css_files(tmp.path()).expect("collect");

        assert_eq!(files, [in_src, in_themes, in_addons]);
    }

    /// Records each visited path and fails on one of them.
    struct FailOn<'a> {
        needle: &'a str,
        visited: RefCell<Vec<PathBuf>>,
    }

    impl CssProcessor for FailOn<'_> {
        fn process(&self, path: &Path) -> Result<()> {
            self.visited.borrow_mut().push(path.to_path_buf());
            if path.to_string_lossy().contains(self.needle) {
                return Err(anyhow!("simulated parse failure"));
            }
            Ok(())
        }
    }

    #[test]
    fn one_bad_file_never_aborts_the_batch() {
        let files = vec![
            PathBuf::from("packages/a/src/one.css"),
            PathBuf::from("packages/a/src/two.css"),
            PathBuf::from("packages/b/src/three.css"),
        ];
        let processor = FailOn {
            needle: "two.css",
            visited: RefCell::new(Vec::new()),
        };
        let mut report = Vec::new();

        let outcome = run_batch(&files, &processor, &mut report).expect("batch");

        assert_eq!(processor.visited.borrow().len(), 3, "all files visited");
        assert_eq!(
            outcome,
            BatchOutcome {
                processed: 2,
                failed: 1
            }
        );

        let text = String::from_utf8(report).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1, "exactly one error line");
        assert!(lines[0].contains("two.css"));
        assert!(lines[0].contains("simulated parse failure"));
    }
}
