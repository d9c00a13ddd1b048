//! CLI module - Command-line interface definitions and handlers

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::compare::compare_texts;
use crate::core::file_reader::{read_text_file, EncodingStrategy, FileContent, FileReadConfig};
use crate::core::model::Theme;
use crate::core::render::{OutputFormat, RenderConfig, Renderer};
use crate::core::report::NO_DIFFERENCE;
use crate::flows::tree::{compare_trees, write_report, TreeOptions};

/// markdiff - word-level side-by-side diff for text and markup files.
#[derive(Parser, Debug)]
#[command(name = "markdiff")]
#[command(
    author,
    version,
    about,
    long_about = r#"markdiff aligns two versions of a text or markup file word by word and
reports what changed on every line.

Markup is escaped before comparison, so tags are compared as plain words and
malformed markup never causes a failure.

Output modes (file command):
- report: one line per changed row (default)
- html: a side-by-side HTML fragment with highlighted changes
- json: every row with its change kind

Examples:
    markdiff file old/page.xml new/page.xml
    markdiff file old.html new.html --mode html --output diff.html
    markdiff tree releases/v1 releases/v2 --output report.txt
"#
)]
pub struct Cli {
    /// Background color for deleted words.
    #[arg(
        long,
        global = true,
        env = "MARKDIFF_DELETED_COLOR",
        value_name = "COLOR",
        long_help = "Background color for words only present in the old version.\n\n\
Any CSS color value works (e.g. #CB6D6D, red). Overrides the theme file."
    )]
    pub deleted_color: Option<String>,

    /// Background color for inserted words.
    #[arg(
        long,
        global = true,
        env = "MARKDIFF_INSERTED_COLOR",
        value_name = "COLOR",
        long_help = "Background color for words only present in the new version.\n\n\
Overrides the theme file."
    )]
    pub inserted_color: Option<String>,

    /// Background color for padding lines.
    #[arg(
        long,
        global = true,
        env = "MARKDIFF_EDITED_COLOR",
        value_name = "COLOR",
        long_help = "Background color for the filler lines inserted to keep both columns\n\
aligned. Overrides the theme file."
    )]
    pub edited_color: Option<String>,

    /// Background color for neutralized words.
    #[arg(
        long,
        global = true,
        env = "MARKDIFF_NEUTRAL_COLOR",
        value_name = "COLOR",
        long_help = "Background color for matched words displaced onto a line that the\n\
other version splits differently. Overrides the theme file."
    )]
    pub neutral_color: Option<String>,

    /// JSON theme file.
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        long_help = "Read colors from a JSON file such as:\n\n\
  {\"deleted\": \"#CB6D6D\", \"inserted\": \"#99FFCC\", \"edited\": \"#CB6D6D\", \"neutral\": \"#ffffff\"}\n\n\
Missing keys keep their defaults; color flags win over the file."
    )]
    pub theme: Option<PathBuf>,

    /// Refuse inputs with more tokens than this per side.
    #[arg(
        long,
        global = true,
        value_name = "N",
        long_help = "Refuse to compare a file pair when either side has more than N tokens.\n\n\
The alignment table grows with the product of both token counts."
    )]
    pub max_tokens: Option<usize>,

    /// Fail on files that are not valid UTF-8.
    #[arg(
        long,
        global = true,
        long_help = "Fail on input files that are not valid UTF-8.\n\n\
By default invalid bytes are replaced and a warning is logged."
    )]
    pub strict_utf8: bool,

    /// Largest input file to read, in bytes.
    #[arg(
        long,
        global = true,
        value_name = "BYTES",
        long_help = "Refuse input files larger than BYTES (default: 64 MB)."
    )]
    pub max_file_size: Option<u64>,

    /// Disable colored output (when applicable).
    #[arg(
        long,
        global = true,
        long_help = "Disable colored report output. This is useful when piping to files or when your\n\
terminal does not support ANSI colors."
    )]
    pub no_color: bool,

    /// Pretty-print JSON output with indentation.
    #[arg(
        long,
        global = true,
        long_help = "Pretty-print JSON output with indentation for human readability.\n\n\
Has no effect on report/html modes."
    )]
    pub pretty: bool,

    /// Quiet mode (errors only).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Only log errors to stderr. Reports are still printed to stdout."
    )]
    pub quiet: bool,

    /// Verbose mode (more diagnostics).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Enable debug diagnostics on stderr. RUST_LOG overrides this."
    )]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare two files.
    #[command(
        long_about = "Compare OLD against NEW and print the result in the selected mode.\n\n\
Examples:\n\
  markdiff file a.txt b.txt\n\
  markdiff file a.xml b.xml --name chapter1.xml\n\
  markdiff file a.html b.html --mode html --output diff.html\n"
    )]
    File {
        /// The old version.
        #[arg(value_name = "OLD")]
        old: PathBuf,

        /// The new version.
        #[arg(value_name = "NEW")]
        new: PathBuf,

        /// Name printed in the report header.
        #[arg(
            long,
            value_name = "NAME",
            long_help = "Name printed in the report header.\n\n\
Defaults to the file name of NEW."
        )]
        name: Option<String>,

        /// Output mode (report/html/json).
        #[arg(long, default_value = "report", value_name = "MODE")]
        mode: String,

        /// Write the result to FILE instead of stdout.
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Compare two directory trees.
    #[command(
        long_about = "Pair the files of OLD_ROOT and NEW_ROOT by <parent-dir>/<file-name>\n\
(or the bare file name at the top level), compare each pair in report mode and\n\
list the files present on one side only.\n\n\
Examples:\n\
  markdiff tree v1 v2\n\
  markdiff tree v1 v2 --output changes.txt\n"
    )]
    Tree {
        /// Root of the old tree.
        #[arg(value_name = "OLD_ROOT")]
        old_root: PathBuf,

        /// Root of the new tree.
        #[arg(value_name = "NEW_ROOT")]
        new_root: PathBuf,

        /// Write the merged report to FILE instead of stdout.
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

/// Resolve the theme: defaults, then the theme file, then explicit colors
fn resolve_theme(cli: &Cli) -> Result<Theme> {
    let mut theme = match &cli.theme {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read theme {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Invalid theme file {}", path.display()))?
        }
        None => Theme::default(),
    };

    if let Some(color) = &cli.deleted_color {
        theme.deleted = color.clone();
    }
    if let Some(color) = &cli.inserted_color {
        theme.inserted = color.clone();
    }
    if let Some(color) = &cli.edited_color {
        theme.edited = color.clone();
    }
    if let Some(color) = &cli.neutral_color {
        theme.neutral = color.clone();
    }
    if let Some((role, color)) = theme.unsafe_color() {
        bail!(
            "Invalid {} color {:?}: quotes, angle brackets, '&' and ';' are not allowed",
            role,
            color
        );
    }
    Ok(theme)
}

fn read_config(cli: &Cli) -> FileReadConfig {
    let mut config = FileReadConfig::default();
    if cli.strict_utf8 {
        config.encoding_strategy = EncodingStrategy::Strict;
    }
    if let Some(limit) = cli.max_file_size {
        config.max_file_size = limit;
    }
    config
}

/// Color report lines for a terminal
fn highlight(report: &str) -> String {
    report
        .split('\n')
        .map(|line| {
            if line.ends_with("is add in new version") {
                line.green().to_string()
            } else if line.ends_with("is missing in new version") || line.ends_with("is missing") {
                line.red().to_string()
            } else if line.starts_with("Line ") && line.ends_with("in new version") {
                line.yellow().to_string()
            } else if line.ends_with("was skipped") || line == NO_DIFFERENCE {
                line.dimmed().to_string()
            } else if line.is_empty() {
                String::new()
            } else {
                line.bold().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn emit(text: &str, output: Option<&Path>, is_report: bool) -> Result<()> {
    match output {
        Some(path) => write_report(path, text),
        None => {
            let text = if is_report {
                highlight(text)
            } else {
                text.to_string()
            };
            if text.ends_with('\n') {
                print!("{}", text);
            } else {
                println!("{}", text);
            }
            Ok(())
        }
    }
}

fn read_input(path: &Path, config: &FileReadConfig) -> Result<String> {
    match read_text_file(path, config)? {
        FileContent::Text(text) => Ok(text),
        FileContent::Binary => bail!("{} is binary and cannot be compared", path.display()),
    }
}

fn run_file(
    old: &Path,
    new: &Path,
    name: Option<String>,
    mode: &str,
    output: Option<&Path>,
    cli: &Cli,
) -> Result<()> {
    let format: OutputFormat = mode.parse().map_err(anyhow::Error::msg)?;
    let theme = resolve_theme(cli)?;
    let read_config = read_config(cli);

    let old_text = read_input(old, &read_config)?;
    let new_text = read_input(new, &read_config)?;
    let name = name.unwrap_or_else(|| {
        new.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| new.display().to_string())
    });

    let comparison = compare_texts(
        &old_text,
        &new_text,
        &name,
        &format.compare_options(cli.max_tokens),
    )
    .with_context(|| format!("Failed to compare {}", name))?;

    let renderer = Renderer::with_config(
        RenderConfig::new(format)
            .with_pretty(cli.pretty)
            .with_theme(theme),
    );
    let rendered = renderer.render(&comparison);
    emit(&rendered, output, renderer.format() == OutputFormat::Report)
}

fn run_tree(old_root: &Path, new_root: &Path, output: Option<&Path>, cli: &Cli) -> Result<()> {
    let options = TreeOptions {
        read: read_config(cli),
        compare: OutputFormat::Report.compare_options(cli.max_tokens),
        theme: resolve_theme(cli)?,
    };
    let report = compare_trees(old_root, new_root, &options)?;
    emit(&report, output, true)
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    match &cli.command {
        Commands::File {
            old,
            new,
            name,
            mode,
            output,
        } => run_file(old, new, name.clone(), mode, output.as_deref(), &cli),

        Commands::Tree {
            old_root,
            new_root,
            output,
        } => run_tree(old_root, new_root, output.as_deref(), &cli),
    }
}
