//! Shared serialization and file-writing helpers.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// Serialize `value` as JSON indented with four spaces. No trailing
/// newline; callers writing files append one themselves.
pub fn to_json_pretty4<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let fmt = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, fmt);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8(buf)?)
}

/// Write `contents` to `path`, creating missing parent directories first.
pub fn write_creating_dirs(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn pretty_json_uses_four_space_indent() {
        let mut map = BTreeMap::new();
        map.insert("accent", "#3559c7");

        let json = to_json_pretty4(&map).expect("serialize");

        assert_eq!(json, "{\n    \"accent\": \"#3559c7\"\n}");
    }

    #[test]
    fn creates_missing_parent_directories() {
        let tmp = tempdir().expect("tempdir");
        let target = tmp.path().join("nested/deeply/out.json");

        write_creating_dirs(&target, "{}\n").expect("write");

        assert_eq!(fs::read_to_string(&target).expect("read"), "{}\n");
    }

    #[test]
    fn writes_to_bare_relative_path() {
        let tmp = tempdir().expect("tempdir");
        let prev = std::env::current_dir().expect("cwd");
        std::env::set_current_dir(tmp.path()).expect("chdir");

        let outcome = write_creating_dirs("out.css".as_ref(), "a{}\n");

        std::env::set_current_dir(prev).expect("chdir back");
        outcome.expect("write without parent");
    }
}
