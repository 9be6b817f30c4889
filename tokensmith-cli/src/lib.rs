//! tokensmith CLI: build commands for web-component design-system packages.

use std::env;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};

use tokensmith_core::css::{collect_css_files, run_batch, MinifyProcessor};
use tokensmith_core::cssfmt::{format_css, FormatOptions};
use tokensmith_core::debug::{DebugLog, DEBUG_FILE_NAME};
use tokensmith_core::entries::BundleConfig;
use tokensmith_core::output::{to_json_pretty4, write_creating_dirs};
use tokensmith_core::tokens::TokenSet;
use tokensmith_core::typography::{self, TypographyOptions};

/// CLI entrypoint for tokensmith.
#[derive(Debug, Parser)]
#[command(
    name = "tokensmith",
    about = "Build tooling for web-component design-system packages"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate design-token output (raw data, CSS custom properties, or typography CSS)
    Tokens(TokensArgs),
    /// Run every package stylesheet through the CSS processor
    Css,
    /// Emit the bundler configuration for a package
    Entries(EntriesArgs),
}

#[derive(Debug, Args)]
struct TokensArgs {
    /// Output file; missing parent directories are created
    #[arg(short = 'o', long = "out", value_hint = ValueHint::FilePath)]
    out: PathBuf,

    /// Prefix for generated custom-property and class names
    #[arg(short = 'p', long = "prefix", default_value = "")]
    prefix: String,

    /// Trace the generation run into tokens-debug.log
    #[arg(short = 'd', long = "debug", action = ArgAction::SetTrue)]
    debug: bool,

    /// What to generate
    #[arg(long = "output-type", value_enum)]
    output_type: OutputType,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputType {
    /// Raw token data as indented JSON
    Data,
    /// CSS custom properties
    Tokens,
    /// Typography classes and font custom properties
    Typography,
}

#[derive(Debug, Args)]
struct EntriesArgs {
    /// Package root to scan
    #[arg(default_value = ".", value_hint = ValueHint::DirPath)]
    root: PathBuf,

    /// Write the configuration here instead of stdout
    #[arg(short = 'o', long = "out", value_hint = ValueHint::FilePath)]
    out: Option<PathBuf>,
}

/// Parse CLI args and execute the selected command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Tokens(args) => run_tokens(args),
        Command::Css => run_css(),
        Command::Entries(args) => run_entries(args),
    }
}

fn run_tokens(args: TokensArgs) -> Result<()> {
    let cwd = env::current_dir()?;
    let log = if args.debug {
        DebugLog::to_file(cwd.join(DEBUG_FILE_NAME))?
    } else {
        DebugLog::disabled()
    };

    let tokens = TokenSet::resolve(&cwd, &log)?;

    match args.output_type {
        OutputType::Tokens => {
            let opts = FormatOptions::resolve(&cwd)?;
            let css = tokens.to_css(&args.prefix, &log)?;
            write_creating_dirs(&args.out, &format_css(&css, &opts))?;
        }
        OutputType::Typography => {
            typography::build(
                &tokens,
                &TypographyOptions {
                    debug: &log,
                    prefix: &args.prefix,
                    out_file: &args.out,
                },
            )?;
        }
        OutputType::Data => {
            let mut json = to_json_pretty4(&tokens)?;
            json.push('\n');
            write_creating_dirs(&args.out, &json)?;
        }
    }

    println!("Wrote {}", args.out.display());
    if args.debug {
        println!("Debug trace in {DEBUG_FILE_NAME}");
    }
    Ok(())
}

fn run_css() -> Result<()> {
    let cwd = env::current_dir()?;
    let files = collect_css_files(&cwd)?;

    let stderr = io::stderr();
    // Per-file failures are reported and skipped; a clean return here
    // means the process exits 0 even when some files failed.
    run_batch(&files, &MinifyProcessor, stderr.lock())?;
    Ok(())
}

fn run_entries(args: EntriesArgs) -> Result<()> {
    let root = args
        .root
        .canonicalize()
        .with_context(|| format!("resolving package root {}", args.root.display()))?;
    let config = BundleConfig::for_package(&root)?;
    let mut json = to_json_pretty4(&config)?;
    json.push('\n');

    match &args.out {
        Some(path) => {
            write_creating_dirs(path, &json)?;
            println!("Wrote {}", path.display());
        }
        None => print!("{json}"),
    }
    Ok(())
}
