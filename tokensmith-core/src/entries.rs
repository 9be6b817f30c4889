//! Entry-point discovery and the bundler configuration built from it.
//!
//! A package exposes publishable modules under fixed `src/` categories:
//! component directories each holding an `index.ts`, and four flat
//! categories of standalone modules. A category directory a package
//! does not implement is an expected state, so discovery against a
//! missing directory yields an empty map rather than an error.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use walkdir::WalkDir;

/// Extension of publishable source modules.
pub const SOURCE_EXT: &str = "ts";

/// Package names and prefixes that stay external to the bundle.
pub const EXTERNAL_MODULES: [&str; 4] = ["lit", "lit-html", "tslib", "@tokensmith/tokens"];

/// Patterns excluded from type-declaration emission.
pub const DECLARATION_EXCLUDES: [&str; 2] = ["**/*.test.ts", "**/*.stories.ts"];

/// Flat-scanned categories under `src/`.
const FLAT_CATEGORIES: [&str; 4] = ["helpers", "mixins", "utilities", "types"];

/// Mapping from bundler entry name to source file path.
pub type EntryMap = BTreeMap<String, PathBuf>;

/// Immediate children of `dir`, or `None` when the directory does not
/// exist. The absence is surfaced as a distinct variant here, at the
/// I/O seam; every other failure still propagates.
fn read_dir_if_present(dir: &Path) -> Result<Option<fs::ReadDir>> {
    match fs::read_dir(dir) {
        Ok(listing) => Ok(Some(listing)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).with_context(|| format!("reading {}", dir.display())),
    }
}

/// Register `"<prefix>/<stem>"` for every source file directly in `dir`.
pub fn flat_scan(dir: &Path, prefix: &str) -> Result<EntryMap> {
    let mut entries = EntryMap::new();
    let Some(listing) = read_dir_if_present(dir)? else {
        return Ok(entries);
    };

    for item in listing {
        let path = item?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(SOURCE_EXT) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            entries.insert(format!("{prefix}/{stem}"), path);
        }
    }

    Ok(entries)
}

/// Register `"<prefix>/<subdir>/index"` for every immediate subdirectory
/// of `dir` holding an `index.ts`; subdirectories without one are
/// silently skipped.
pub fn subdir_index_scan(dir: &Path, prefix: &str) -> Result<EntryMap> {
    let mut entries = EntryMap::new();
    let Some(listing) = read_dir_if_present(dir)? else {
        return Ok(entries);
    };

    for item in listing {
        let path = item?.path();
        if !path.is_dir() {
            continue;
        }
        let index = path.join(format!("index.{SOURCE_EXT}"));
        if !index.is_file() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
            entries.insert(format!("{prefix}/{name}/index"), index);
        }
    }

    Ok(entries)
}

/// Build the full entry map for a package: component subdirectories plus
/// the four flat categories. Category prefixes differ, so the merged
/// keys are disjoint by construction. Paths are absolute whenever
/// `package_root` is.
pub fn discover_entries(package_root: &Path) -> Result<EntryMap> {
    let src = package_root.join("src");
    let mut entries = subdir_index_scan(&src.join("components"), "components")?;
    for category in FLAT_CATEGORIES {
        entries.extend(flat_scan(&src.join(category), category)?);
    }
    Ok(entries)
}

/// The surface a bundler consumes for one package.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleConfig {
    pub entries: EntryMap,
    pub external: Vec<String>,
    /// The single emitted module format.
    pub format: String,
    /// One output file per input module, mirroring input structure.
    pub preserve_modules: bool,
    pub declarations: DeclarationConfig,
}

/// The companion type-declaration step: every source file except tests
/// and stories.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationConfig {
    pub exclude: Vec<String>,
    pub inputs: Vec<PathBuf>,
}

impl BundleConfig {
    pub fn for_package(package_root: &Path) -> Result<Self> {
        Ok(Self {
            entries: discover_entries(package_root)?,
            external: EXTERNAL_MODULES.iter().map(|s| s.to_string()).collect(),
            format: "esm".to_string(),
            preserve_modules: true,
            declarations: DeclarationConfig {
                exclude: DECLARATION_EXCLUDES.iter().map(|s| s.to_string()).collect(),
                inputs: declaration_inputs(&package_root.join("src"))?,
            },
        })
    }
}

/// Every source file under `dir`, recursively, minus test and story
/// files. Sorted walk so the list is stable across runs.
pub fn declaration_inputs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    if !dir.exists() {
        return Ok(inputs);
    }

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(SOURCE_EXT) {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.ends_with(".test.ts") || name.ends_with(".stories.ts") {
            continue;
        }
        inputs.push(path.to_path_buf());
    }

    Ok(inputs)
}
