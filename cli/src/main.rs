//! unoffice CLI - office document ingestion tool

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use unoffice::{
    detect_format_from_path, render, split_text, DocxReader, JsonFormat, LoadOptions, Metadata,
    MetadataValue, OutputUnit, SheetOptions, SheetSelection, Unoffice, XlsxReader,
    DEFAULT_MAX_TOKENS,
};

#[derive(Parser)]
#[command(name = "unoffice")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Turn DOCX and spreadsheet files into JSON text units", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a DOCX file: table units, then page units
    Docx {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Maximum words per page unit
        #[arg(long, env = "UNOFFICE_MAX_WORDS", default_value_t = DEFAULT_MAX_TOKENS)]
        max_words: usize,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Read a spreadsheet workbook into a single unit
    #[command(alias = "xls")]
    Xlsx {
        /// Input workbook (xlsx, xlsm, xlsb, xls, ods)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Sheet to read (repeatable; all sheets if omitted)
        #[arg(long = "sheet", value_name = "NAME")]
        sheets: Vec<String>,

        /// Emit each sheet's name as a row before its data
        #[arg(long)]
        include_sheet_name: bool,

        /// Separator between rows
        #[arg(long, default_value = "\n")]
        row_joiner: String,

        /// Separator between cells
        #[arg(long, default_value = " ")]
        col_joiner: String,

        /// Treat the first row as data instead of column names
        #[arg(long)]
        no_header: bool,

        /// Number of leading rows to skip
        #[arg(long, default_value = "0")]
        skip_rows: usize,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Read any supported files, detecting the format of each
    Load {
        /// Input files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Maximum words per DOCX page unit
        #[arg(long, env = "UNOFFICE_MAX_WORDS", default_value_t = DEFAULT_MAX_TOKENS)]
        max_words: usize,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Split plain text into word-bounded chunks
    Chunk {
        /// Input text file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Maximum tokens per chunk
        #[arg(long, env = "UNOFFICE_MAX_WORDS", default_value_t = DEFAULT_MAX_TOKENS)]
        max_tokens: usize,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show document information
    Info {
        /// Input document
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(clap::Args)]
struct OutputArgs {
    /// Output file (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// JSON layout
    #[arg(long, value_enum, default_value = "pretty")]
    format: OutputFormat,

    /// Extra metadata attached to every unit
    #[arg(long = "extra", value_name = "KEY=VALUE", value_parser = parse_extra)]
    extra: Vec<(String, MetadataValue)>,
}

impl OutputArgs {
    fn extra_info(&self) -> Option<Metadata> {
        if self.extra.is_empty() {
            None
        } else {
            Some(self.extra.iter().cloned().collect())
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Indented JSON array
    Pretty,
    /// Single-line JSON array
    Compact,
    /// One JSON object per line
    Lines,
}

impl From<OutputFormat> for JsonFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Pretty => JsonFormat::Pretty,
            OutputFormat::Compact => JsonFormat::Compact,
            OutputFormat::Lines => JsonFormat::Lines,
        }
    }
}

fn parse_extra(raw: &str) -> Result<(String, MetadataValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {:?}", raw))?;
    if key.is_empty() {
        return Err("metadata key must not be empty".to_string());
    }
    Ok((key.to_string(), MetadataValue::parse_lossy(value)))
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Docx {
            input,
            max_words,
            output,
        }) => cmd_docx(&input, max_words, &output),
        Some(Commands::Xlsx {
            input,
            sheets,
            include_sheet_name,
            row_joiner,
            col_joiner,
            no_header,
            skip_rows,
            output,
        }) => {
            let reader = XlsxReader::new()
                .with_row_joiner(row_joiner)
                .with_col_joiner(col_joiner)
                .with_sheet_options(
                    SheetOptions::new()
                        .with_header(!no_header)
                        .with_skip_rows(skip_rows),
                );
            let selection = if sheets.is_empty() {
                SheetSelection::All
            } else {
                SheetSelection::from(sheets)
            };
            cmd_xlsx(&input, &reader, selection, include_sheet_name, &output)
        }
        Some(Commands::Load {
            inputs,
            max_words,
            output,
        }) => cmd_load(&inputs, max_words, &output),
        Some(Commands::Chunk {
            input,
            max_tokens,
            output,
        }) => cmd_chunk(&input, max_tokens, output.as_deref()),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: unoffice <COMMAND> <FILE>".yellow());
            println!("       unoffice --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_docx(input: &Path, max_words: usize, output: &OutputArgs) -> Result<(), Box<dyn std::error::Error>> {
    let extra = output.extra_info();
    let units = DocxReader::new()
        .with_max_words_per_page(max_words)
        .load(input, extra.as_ref())?;
    write_units(&units, output)
}

fn cmd_xlsx(
    input: &Path,
    reader: &XlsxReader,
    selection: SheetSelection,
    include_sheet_name: bool,
    output: &OutputArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = LoadOptions::new()
        .with_sheets(selection)
        .with_sheet_name_rows(include_sheet_name);
    options.extra_info = output.extra_info();

    let units = reader.load_with(input, &options)?;
    write_units(&units, output)
}

fn cmd_load(inputs: &[PathBuf], max_words: usize, output: &OutputArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut loader = Unoffice::new().with_max_words_per_page(max_words);
    if let Some(extra) = output.extra_info() {
        loader = loader.with_extra_info(extra);
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Loading {} files...", inputs.len()));

    let results = loader.load_files(inputs);
    pb.finish_and_clear();
    log::debug!("loaded {} inputs", results.len());

    let mut units = Vec::new();
    let mut failed = 0;
    for (path, result) in inputs.iter().zip(results) {
        match result {
            Ok(file_units) => {
                eprintln!(
                    "{} {} ({} units)",
                    "Loaded".green(),
                    path.display(),
                    file_units.len()
                );
                units.extend(file_units);
            }
            Err(e) => {
                eprintln!("{} {}: {}", "Failed".red(), path.display(), e);
                failed += 1;
            }
        }
    }

    write_units(&units, output)?;

    if failed > 0 {
        return Err(format!("{} of {} files failed", failed, inputs.len()).into());
    }
    Ok(())
}

fn cmd_chunk(input: &Path, max_tokens: usize, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let text = if input == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(input)?
    };

    let chunks = split_text(&text, max_tokens);
    let json = serde_json::to_string_pretty(&chunks)?;
    emit(&json, output)
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let format = detect_format_from_path(input)?;
    let units = unoffice::load_file(input, None)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), format);
    if let Ok(meta) = fs::metadata(input) {
        println!("{}: {} bytes", "Size".bold(), meta.len());
    }

    println!();
    println!("{}", "Unit Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let tables = units.iter().filter(|u| u.is_table()).count();
    let pages = units.iter().filter(|u| u.page_label().is_some()).count();
    let words: usize = units.iter().map(OutputUnit::word_count).sum();
    let chars: usize = units.iter().map(|u| u.text.chars().count()).sum();

    println!("{}: {}", "Units".bold(), units.len());
    println!("{}: {}", "Table units".bold(), tables);
    println!("{}: {}", "Page units".bold(), pages);
    println!("{}: {}", "Words".bold(), words);
    println!("{}: {}", "Characters".bold(), chars);

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "unoffice".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Office document ingestion tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/unoffice".dimmed());
    println!("License: MIT");
}

fn write_units(units: &[OutputUnit], output: &OutputArgs) -> Result<(), Box<dyn std::error::Error>> {
    let json = render::to_json(units, output.format.into())?;
    emit(&json, output.output.as_deref())
}

fn emit(content: &str, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        eprintln!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}
