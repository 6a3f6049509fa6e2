//! docprep CLI - document structuring and cleanup tool

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docprep::{render, CleaningLevel, DocPrep, ElementKind, JsonFormat, NormalizedDocument};

#[derive(Parser)]
#[command(name = "docprep")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Structure and clean decoded document text", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract document structure as JSON
    Parse {
        /// Input text file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Format hint (defaults to the file extension)
        #[arg(long)]
        hint: Option<String>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Structure and clean a document
    Clean {
        /// Input text file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Cleaning level
        #[arg(short, long, value_enum, default_value = "standard", env = "DOCPREP_LEVEL")]
        level: CleanupLevel,

        /// Format hint (defaults to the file extension)
        #[arg(long)]
        hint: Option<String>,

        /// Emit the full normalized document as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show structure and cleaning information
    Info {
        /// Input text file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Cleaning level
        #[arg(short, long, value_enum, default_value = "standard", env = "DOCPREP_LEVEL")]
        level: CleanupLevel,

        /// Format hint (defaults to the file extension)
        #[arg(long)]
        hint: Option<String>,
    },

    /// Check whether cleaning kept an acceptable result (exit code 2 if not)
    Validate {
        /// Input text file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Cleaning level
        #[arg(short, long, value_enum, default_value = "standard", env = "DOCPREP_LEVEL")]
        level: CleanupLevel,

        /// Format hint (defaults to the file extension)
        #[arg(long)]
        hint: Option<String>,
    },

    /// Clean many files in parallel
    Batch {
        /// Input text files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory (next to each input if not specified)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Cleaning level
        #[arg(short, long, value_enum, default_value = "standard", env = "DOCPREP_LEVEL")]
        level: CleanupLevel,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
enum CleanupLevel {
    /// Unicode, invisible characters, line breaks and whitespace
    Minimal,
    /// Minimal plus header/footer removal (default)
    Standard,
    /// Standard plus redundant line filtering
    Aggressive,
}

impl From<CleanupLevel> for CleaningLevel {
    fn from(level: CleanupLevel) -> Self {
        match level {
            CleanupLevel::Minimal => CleaningLevel::Minimal,
            CleanupLevel::Standard => CleaningLevel::Standard,
            CleanupLevel::Aggressive => CleaningLevel::Aggressive,
        }
    }
}

/// Exit code for a document that failed validation.
const EXIT_INVALID: i32 = 2;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse {
            input,
            output,
            hint,
            compact,
        } => cmd_parse(&input, output.as_deref(), hint.as_deref(), compact),
        Commands::Clean {
            input,
            output,
            level,
            hint,
            json,
        } => cmd_clean(&input, output.as_deref(), level, hint.as_deref(), json),
        Commands::Info { input, level, hint } => cmd_info(&input, level, hint.as_deref()),
        Commands::Validate { input, level, hint } => {
            match cmd_validate(&input, level, hint.as_deref()) {
                Ok(true) => Ok(()),
                Ok(false) => std::process::exit(EXIT_INVALID),
                Err(e) => Err(e),
            }
        }
        Commands::Batch {
            inputs,
            output,
            level,
        } => cmd_batch(&inputs, output.as_deref(), level),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Read a file, or stdin for `-`.
fn read_input(input: &Path) -> io::Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        fs::read_to_string(input)
    }
}

/// Explicit hint, else the file extension.
fn format_hint(input: &Path, hint: Option<&str>) -> String {
    hint.map(str::to_string)
        .or_else(|| {
            input
                .extension()
                .map(|ext| ext.to_string_lossy().into_owned())
        })
        .unwrap_or_default()
}

/// `<stem>.clean.txt` in `output_dir`, or beside the input.
fn clean_output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let name = format!("{}.clean.txt", stem);
    match output_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

fn write_or_print(output: Option<&Path>, content: &str) -> io::Result<()> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn run(input: &Path, level: CleanupLevel, hint: Option<&str>) -> io::Result<NormalizedDocument> {
    let text = read_input(input)?;
    let hint = format_hint(input, hint);
    Ok(DocPrep::new()
        .with_level(level.into())
        .process(&text, &hint))
}

fn cmd_parse(
    input: &Path,
    output: Option<&Path>,
    hint: Option<&str>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_input(input)?;
    let structure = docprep::parse(&text, &format_hint(input, hint));

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = render::to_json(&structure, format)?;
    write_or_print(output, &json)?;

    Ok(())
}

fn cmd_clean(
    input: &Path,
    output: Option<&Path>,
    level: CleanupLevel,
    hint: Option<&str>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = run(input, level, hint)?;

    let content = if json {
        render::to_json(&doc, JsonFormat::Pretty)?
    } else {
        doc.text()
    };
    write_or_print(output, &content)?;

    Ok(())
}

fn cmd_info(
    input: &Path,
    level: CleanupLevel,
    hint: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = run(input, level, hint)?;
    let structure = &doc.structure;
    let meta = &structure.metadata;

    println!("{}", "Document Structure".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    if let Some(ref title) = meta.title {
        println!("{}: {}", "Title".bold(), title);
    }
    println!("{}: {}", "Elements".bold(), meta.total_elements);
    for kind in ElementKind::ALL {
        let count = meta.count_of(kind);
        if count > 0 {
            println!("  {} {}: {}", "├─".dimmed(), kind, count);
        }
    }
    println!("{}: {}", "Words".bold(), meta.word_count);
    println!("{}: {}", "Characters".bold(), meta.char_count);
    println!("{}: {}", "Lines".bold(), meta.line_count);

    if !structure.table_of_contents.is_empty() {
        println!();
        println!("{}", "Table of Contents".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        for entry in &structure.table_of_contents {
            let indent = "  ".repeat(usize::from(entry.level.saturating_sub(1)));
            println!("{}{}", indent, entry.title);
        }
    }

    println!();
    println!("{}", "Cleaning".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let stats = &doc.stats;
    println!("{}: {}", "Level".bold(), doc.metadata.cleaning_level);
    println!("{}: {}", "Language".bold(), doc.detected_language);
    println!("{}: {:.2}", "Quality".bold(), doc.quality_score);
    println!("{}: {:.1}%", "Reduction".bold(), stats.reduction_percentage());
    println!("{}: {}", "Headers removed".bold(), stats.headers_removed);
    println!("{}: {}", "Footers removed".bold(), stats.footers_removed);
    println!("{}: {}", "Invisible chars".bold(), stats.invisible_chars_removed);
    println!("{}: {}", "Line breaks fixed".bold(), stats.line_breaks_fixed);
    println!(
        "{}: {}/{}",
        "Elements kept".bold(),
        doc.metadata.elements_kept,
        doc.metadata.elements_processed
    );

    Ok(())
}

fn cmd_validate(
    input: &Path,
    level: CleanupLevel,
    hint: Option<&str>,
) -> Result<bool, Box<dyn std::error::Error>> {
    let doc = run(input, level, hint)?;
    let report = doc.validate();

    println!("{}", doc.summary().dimmed());
    for warning in &report.warnings {
        println!("{} {}", "warning:".yellow().bold(), warning);
    }
    for error in &report.errors {
        println!("{} {}", "error:".red().bold(), error);
    }

    if report.is_valid {
        println!("{}", "Valid".green().bold());
    } else {
        println!("{}", "Invalid".red().bold());
    }

    Ok(report.is_valid)
}

fn cmd_batch(
    inputs: &[PathBuf],
    output: Option<&Path>,
    level: CleanupLevel,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(dir) = output {
        fs::create_dir_all(dir)?;
    }

    let pb = ProgressBar::new(inputs.len() as u64 * 2);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Reading...");
    let mut documents = Vec::with_capacity(inputs.len());
    for input in inputs {
        documents.push((fs::read_to_string(input)?, format_hint(input, None)));
        pb.inc(1);
    }

    pb.set_message("Cleaning...");
    let results = DocPrep::new()
        .with_level(level.into())
        .process_batch(&documents);

    let mut invalid = 0;
    for (input, doc) in inputs.iter().zip(&results) {
        let path = clean_output_path(input, output);
        fs::write(&path, doc.text())?;
        if !doc.validate().is_valid {
            log::warn!("{} failed validation: {}", input.display(), doc.summary());
            invalid += 1;
        }
        pb.inc(1);
    }

    pb.finish_with_message("Done!");

    println!(
        "\n{} {} files cleaned",
        "Done!".green().bold(),
        results.len()
    );
    if invalid > 0 {
        println!("{} {} failed validation", "warning:".yellow().bold(), invalid);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docprep".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Document structuring and cleanup tool");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hint_from_extension() {
        assert_eq!(format_hint(Path::new("notes.md"), None), "md");
        assert_eq!(format_hint(Path::new("notes.md"), Some("txt")), "txt");
        assert_eq!(format_hint(Path::new("README"), None), "");
    }

    #[test]
    fn test_clean_output_path() {
        assert_eq!(
            clean_output_path(Path::new("docs/report.md"), None),
            PathBuf::from("docs/report.clean.txt")
        );
        assert_eq!(
            clean_output_path(Path::new("docs/report.md"), Some(Path::new("out"))),
            PathBuf::from("out/report.clean.txt")
        );
    }

    #[test]
    fn test_level_mapping() {
        assert_eq!(
            CleaningLevel::from(CleanupLevel::Aggressive),
            CleaningLevel::Aggressive
        );
        assert_eq!(
            CleaningLevel::from(CleanupLevel::Minimal),
            CleaningLevel::Minimal
        );
    }

    #[test]
    fn test_batch_writes_clean_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.md");
        let second = dir.path().join("second.txt");
        fs::write(&first, "# Heading\n\nPage 3\nBody line of the first file.").unwrap();
        fs::write(&second, "Plain   text of the second file.").unwrap();

        let out = dir.path().join("out");
        cmd_batch(&[first, second], Some(&out), CleanupLevel::Standard).unwrap();

        let cleaned = fs::read_to_string(out.join("first.clean.txt")).unwrap();
        assert_eq!(cleaned, "# Heading\n\nBody line of the first file.");
        let cleaned = fs::read_to_string(out.join("second.clean.txt")).unwrap();
        assert_eq!(cleaned, "Plain text of the second file.");
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["docprep", "clean", "in.txt", "--level", "aggressive"])
            .unwrap();
        match cli.command {
            Commands::Clean { level, json, .. } => {
                assert_eq!(level, CleanupLevel::Aggressive);
                assert!(!json);
            }
            _ => panic!("expected clean subcommand"),
        }
        assert!(Cli::try_parse_from(["docprep", "batch"]).is_err());
    }
}
