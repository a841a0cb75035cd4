//! rowcsv CLI - inspect and convert CSV files

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rowcsv::{CsvReader, CsvWriter, FileFormat, ParseFailure};
use rowcsv_table::CursorCopier;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rowcsv")]
#[command(author, version, about = "Inspect and convert CSV files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the columns and record count of a file
    Info {
        input: PathBuf,

        #[command(flatten)]
        format: FormatArgs,
    },

    /// Print the first rows of a file
    Head {
        input: PathBuf,

        /// Number of rows to print
        #[arg(short = 'n', long, default_value = "10")]
        rows: u64,

        #[command(flatten)]
        format: FormatArgs,
    },

    /// Rewrite a file with different separators
    Convert {
        input: PathBuf,

        output: PathBuf,

        #[command(flatten)]
        format: FormatArgs,

        /// Field separator of the output
        #[arg(long, default_value = ",")]
        to_separator: char,

        /// Decimal separator of the output
        #[arg(long, default_value = ".")]
        to_decimal_separator: char,

        /// Write `Name|Type` header cells
        #[arg(long)]
        to_typed_header: bool,
    },
}

/// Conventions of the input file
#[derive(Args)]
struct FormatArgs {
    /// Field separator
    #[arg(short, long, default_value = ",")]
    separator: char,

    /// Decimal separator
    #[arg(short, long, default_value = ".")]
    decimal_separator: char,

    /// Thousands separator
    #[arg(long, default_value = ",")]
    thousands_separator: String,

    /// Date format, e.g. `dd/MM/yyyy`
    #[arg(long, default_value = "yyyy-MM-dd")]
    date_format: String,

    /// The first line is data, not a header
    #[arg(long)]
    no_header: bool,

    /// Header cells carry `Name|Type`
    #[arg(short, long)]
    typed_header: bool,

    /// Fail on values that do not parse as their column type
    #[arg(long)]
    strict: bool,
}

impl FormatArgs {
    fn build(&self) -> Result<FileFormat> {
        let policy = if self.strict {
            ParseFailure::Error
        } else {
            ParseFailure::Default
        };

        FileFormat::builder()
            .separator(self.separator)
            .decimal_separator(self.decimal_separator)
            .thousands_separator(self.thousands_separator.as_str())
            .date_format(self.date_format.as_str())
            .with_header(!self.no_header)
            .typed_header(self.typed_header)
            .parse_failure(policy)
            .build()
            .context("Invalid input format")
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Info { input, format } => show_info(&input, format.build()?),
        Commands::Head {
            input,
            rows,
            format,
        } => print_head(&input, format.build()?, rows),
        Commands::Convert {
            input,
            output,
            format,
            to_separator,
            to_decimal_separator,
            to_typed_header,
        } => {
            let target = FileFormat::builder()
                .separator(to_separator)
                .decimal_separator(to_decimal_separator)
                .date_format(format.date_format.as_str())
                .typed_header(to_typed_header)
                .build()
                .context("Invalid output format")?;
            convert(&input, &output, format.build()?, target)
        }
    }
}

fn open_reader(input: &Path, format: FileFormat) -> Result<CsvReader<'static>> {
    let mut reader = CsvReader::new(format, Vec::new());
    reader
        .open(input)
        .with_context(|| format!("Failed to open '{}'", input.display()))?;
    Ok(reader)
}

fn show_info(input: &Path, format: FileFormat) -> Result<()> {
    let mut reader = open_reader(input, format)?;

    let mut records = 0u64;
    while reader
        .read()
        .with_context(|| format!("Failed to read '{}'", input.display()))?
    {
        records += 1;
    }

    println!("File: {}", input.display());
    println!("Columns: {}", reader.column_count());
    for (index, column) in reader.columns().iter().enumerate() {
        println!("  {}\t{}\t{}", index, column.name, column.column_type);
    }
    println!("Records: {}", records);

    Ok(())
}

fn print_head(input: &Path, format: FileFormat, rows: u64) -> Result<()> {
    let mut reader = open_reader(input, format.clone())?;
    let mut stdout = io::stdout().lock();
    let mut writer = CsvWriter::new(format);
    writer.open_stream(&mut stdout)?;

    let mut header_written = false;
    while reader.row_number() < rows && reader.read()? {
        if !header_written {
            writer.write_columns(reader.columns())?;
            header_written = true;
        }
        writer.write_typed_row(reader.columns(), reader.values())?;
    }

    writer.close().context("Failed to write to stdout")?;
    Ok(())
}

fn convert(input: &Path, output: &Path, source: FileFormat, target: FileFormat) -> Result<()> {
    let mut reader = open_reader(input, source)?;

    let rows = CursorCopier::new(target)
        .with_progress(|rows: u64| tracing::info!(rows, "rows converted"))
        .copy(&mut reader, output)
        .with_context(|| format!("Failed to convert '{}'", input.display()))?;

    eprintln!("Wrote {} rows to '{}'", rows, output.display());
    Ok(())
}
