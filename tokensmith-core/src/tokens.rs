//! Design-token data and CSS custom-property generation.
//!
//! The token source is the built-in base set, with an optional
//! `design-tokens.json` overrides file resolved from the working
//! directory and merged over it. A malformed overrides file is a hard
//! error: a bad generation run must not silently produce wrong output.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::debug::DebugLog;

/// Name of the optional overrides file resolved from the working directory.
pub const OVERRIDES_FILE_NAME: &str = "design-tokens.json";

/// One named group of `token -> value` pairs.
pub type TokenGroup = BTreeMap<String, String>;

/// The full token data structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TokenSet {
    pub color: TokenGroup,
    pub spacing: TokenGroup,
    pub radius: TokenGroup,
    pub shadow: TokenGroup,
    pub font_family: TokenGroup,
    pub font_size: TokenGroup,
    pub font_weight: TokenGroup,
    pub line_height: TokenGroup,
}

/// Subset shape accepted from `design-tokens.json`. Unknown groups are
/// rejected rather than ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct TokenOverrides {
    #[serde(default)]
    color: TokenGroup,
    #[serde(default)]
    spacing: TokenGroup,
    #[serde(default)]
    radius: TokenGroup,
    #[serde(default)]
    shadow: TokenGroup,
    #[serde(default)]
    font_family: TokenGroup,
    #[serde(default)]
    font_size: TokenGroup,
    #[serde(default)]
    font_weight: TokenGroup,
    #[serde(default)]
    line_height: TokenGroup,
}

impl TokenSet {
    /// The base set shipped with the design system.
    pub fn builtin() -> Self {
        Self {
            color: group(&[
                ("background", "#ffffff"),
                ("surface", "#f7f7f9"),
                ("border", "#d9dde3"),
                ("text", "#1c2129"),
                ("text-weak", "#5c6670"),
                ("accent", "#3559c7"),
                ("accent-hover", "#2a4ba8"),
                ("danger", "#c73535"),
                ("success", "#21873e"),
                ("warning", "#b88207"),
            ]),
            spacing: group(&[
                ("xs", "4px"),
                ("s", "8px"),
                ("m", "16px"),
                ("l", "24px"),
                ("xl", "40px"),
            ]),
            radius: group(&[("s", "2px"), ("m", "4px"), ("l", "8px"), ("pill", "999px")]),
            shadow: group(&[
                ("s", "0 1px 2px rgba(28, 33, 41, 0.12)"),
                ("m", "0 2px 8px rgba(28, 33, 41, 0.16)"),
                ("l", "0 8px 24px rgba(28, 33, 41, 0.2)"),
            ]),
            font_family: group(&[
                ("heading", "'Inter', sans-serif"),
                ("body", "'Inter', sans-serif"),
                ("mono", "'IBM Plex Mono', monospace"),
            ]),
            font_size: group(&[
                ("xs", "0.75rem"),
                ("s", "0.875rem"),
                ("m", "1rem"),
                ("l", "1.25rem"),
                ("xl", "1.5rem"),
                ("xxl", "2rem"),
            ]),
            font_weight: group(&[("regular", "400"), ("medium", "500"), ("bold", "700")]),
            line_height: group(&[("tight", "1.2"), ("normal", "1.5"), ("loose", "1.7")]),
        }
    }

    /// Resolve the token source: built-in set plus overrides from
    /// `dir`, when the overrides file exists.
    pub fn resolve(dir: &Path, log: &DebugLog) -> Result<Self> {
        let mut tokens = Self::builtin();
        let path = dir.join(OVERRIDES_FILE_NAME);

        match fs::read_to_string(&path) {
            Ok(raw) => {
                let overrides: TokenOverrides = serde_json::from_str(&raw)
                    .with_context(|| format!("malformed token source {}", path.display()))?;
                log.log(&[
                    "merging token overrides from".into(),
                    path.display().to_string().into(),
                ])?;
                tokens.merge(overrides);
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log.log(&["no token overrides file, using built-in set".into()])?;
            }
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", path.display()));
            }
        }

        Ok(tokens)
    }

    fn merge(&mut self, overrides: TokenOverrides) {
        self.color.extend(overrides.color);
        self.spacing.extend(overrides.spacing);
        self.radius.extend(overrides.radius);
        self.shadow.extend(overrides.shadow);
        self.font_family.extend(overrides.font_family);
        self.font_size.extend(overrides.font_size);
        self.font_weight.extend(overrides.font_weight);
        self.line_height.extend(overrides.line_height);
    }

    /// All groups, in stylesheet order.
    pub fn groups(&self) -> [(&'static str, &TokenGroup); 8] {
        [
            ("color", &self.color),
            ("spacing", &self.spacing),
            ("radius", &self.radius),
            ("shadow", &self.shadow),
            ("font-family", &self.font_family),
            ("font-size", &self.font_size),
            ("font-weight", &self.font_weight),
            ("line-height", &self.line_height),
        ]
    }

    /// The typography-relevant groups.
    pub fn font_groups(&self) -> [(&'static str, &TokenGroup); 4] {
        [
            ("font-family", &self.font_family),
            ("font-size", &self.font_size),
            ("font-weight", &self.font_weight),
            ("line-height", &self.line_height),
        ]
    }

    /// Render the set as CSS custom properties under `:root`. Output is
    /// unindented; the caller runs it through the formatter.
    pub fn to_css(&self, prefix: &str, log: &DebugLog) -> Result<String> {
        let mut css = String::from(":root {\n");
        let mut count = 0usize;
        for (group, values) in self.groups() {
            for (name, value) in values {
                css.push_str(&format!(
                    "{}: {};\n",
                    variable_name(prefix, group, name),
                    value
                ));
                count += 1;
            }
        }
        css.push_str("}\n");

        log.log(&["generated css custom properties".into(), json!(count)])?;
        Ok(css)
    }
}

/// `--{prefix}-{group}-{name}`, or `--{group}-{name}` with an empty prefix.
pub fn variable_name(prefix: &str, group: &str, name: &str) -> String {
    if prefix.is_empty() {
        format!("--{group}-{name}")
    } else {
        format!("--{prefix}-{group}-{name}")
    }
}

fn group(pairs: &[(&str, &str)]) -> TokenGroup {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}
