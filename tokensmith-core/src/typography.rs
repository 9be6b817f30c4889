//! Typography stylesheet generation.
//!
//! Unlike the other output modes this generator owns the whole job:
//! it renders the font custom properties plus the named text-style
//! classes and writes the output file itself.

use std::path::Path;

use anyhow::Result;
use serde_json::json;

use crate::debug::DebugLog;
use crate::output::write_creating_dirs;
use crate::tokens::{variable_name, TokenSet};

/// Options handed to the generator.
#[derive(Debug)]
pub struct TypographyOptions<'a> {
    pub debug: &'a DebugLog,
    pub prefix: &'a str,
    pub out_file: &'a Path,
}

/// Named text styles: class stem, family token, size token, weight
/// token, line-height token.
const TEXT_STYLES: [(&str, &str, &str, &str, &str); 6] = [
    ("heading-xl", "heading", "xxl", "bold", "tight"),
    ("heading-l", "heading", "xl", "bold", "tight"),
    ("heading-m", "heading", "l", "medium", "normal"),
    ("body-m", "body", "m", "regular", "normal"),
    ("body-s", "body", "s", "regular", "normal"),
    ("caption", "body", "xs", "regular", "loose"),
];

/// Render the typography stylesheet and write it to `opts.out_file`.
pub fn build(tokens: &TokenSet, opts: &TypographyOptions) -> Result<()> {
    let prefix = opts.prefix;

    let mut css = String::from(":root {\n");
    for (group, values) in tokens.font_groups() {
        for (name, value) in values {
            css.push_str(&format!(
                "  {}: {};\n",
                variable_name(prefix, group, name),
                value
            ));
        }
    }
    css.push_str("}\n");

    for (style, family, size, weight, line_height) in TEXT_STYLES {
        css.push_str(&format!(
            "\n.{} {{\n  font-family: var({});\n  font-size: var({});\n  font-weight: var({});\n  line-height: var({});\n}}\n",
            class_name(prefix, style),
            variable_name(prefix, "font-family", family),
            variable_name(prefix, "font-size", size),
            variable_name(prefix, "font-weight", weight),
            variable_name(prefix, "line-height", line_height),
        ));
    }

    opts.debug
        .log(&["writing typography styles".into(), json!(TEXT_STYLES.len())])?;
    write_creating_dirs(opts.out_file, &css)?;
    Ok(())
}

fn class_name(prefix: &str, style: &str) -> String {
    if prefix.is_empty() {
        style.to_string()
    } else {
        format!("{prefix}-{style}")
    }
}
