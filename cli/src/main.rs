//! fieldex CLI - field/value extraction from documents

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use fieldex::{
    detect_kind, render, source_name, BatchReport, DocumentKind, DocumentStatus, Fieldex,
    GroupingOptions, JsonFormat, LineKind, OrphanPolicy, OutputFormat, ParserOptions, Record,
    RenderOptions, TableCells, TableLayout, TesseractCli,
};

#[derive(Parser)]
#[command(name = "fieldex")]
#[command(version)]
#[command(about = "Extract field/value rows from PDF, DOCX, text, and OCR output", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract fields from documents into one table
    Extract {
        /// Input documents
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "csv")]
        format: Format,

        #[command(flatten)]
        parse: ParseArgs,

        /// Split a contact block field, e.g. "Client Information=Client"
        #[arg(long, value_name = "FIELD=PREFIX", value_parser = parse_contact)]
        split_contact: Vec<(String, String)>,

        /// Add a column naming the source document
        #[arg(long)]
        source_column: bool,

        /// Value written for missing fields
        #[arg(long, default_value = "")]
        filler: String,

        /// Do not write a UTF-8 byte order mark before CSV output
        #[arg(long)]
        no_bom: bool,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print the text lines extracted from a document
    Lines {
        /// Input document
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Mark the lines recognized as field headers
        #[arg(long)]
        classify: bool,

        #[command(flatten)]
        parse: ParseArgs,
    },

    /// Pair the cells of a document table or a table exported as CSV
    Table {
        /// Input DOCX document, or CSV file without a header row
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Which table of the document to read (1-based)
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        table: u32,

        /// Row holding the field names (1-based)
        #[arg(long, requires = "value_row", value_parser = clap::value_parser!(u32).range(1..))]
        field_row: Option<u32>,

        /// Row holding the values (1-based)
        #[arg(long, requires = "field_row", value_parser = clap::value_parser!(u32).range(1..))]
        value_row: Option<u32>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show what fieldex sees in a document
    Info {
        /// Input document
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        parse: ParseArgs,
    },

    /// Show version information
    Version,
}

/// Parser and extractor settings shared by the document commands.
#[derive(clap::Args)]
struct ParseArgs {
    /// Known field name (repeatable); inside its value only other known names start a field
    #[arg(short = 'f', long = "field", value_name = "NAME")]
    fields: Vec<String>,

    /// File with one known field name per line
    #[arg(long, value_name = "PATH", env = "FIELDEX_FIELDS_FILE")]
    fields_file: Option<PathBuf>,

    /// JSON parser profile
    #[arg(long, value_name = "PATH", env = "FIELDEX_PROFILE")]
    profile: Option<PathBuf>,

    /// What to do with lines before the first header
    #[arg(long, value_enum)]
    orphans: Option<Orphans>,

    /// Ignore tables found in documents
    #[arg(long)]
    no_tables: bool,

    /// Do not split "Label 123" lines into field and value
    #[arg(long)]
    no_label_number: bool,

    /// Read images with the tesseract command line tool
    #[arg(long)]
    ocr: bool,

    /// Tesseract language
    #[arg(long, default_value = "eng")]
    ocr_lang: String,

    /// Drop OCR words below this confidence (0-100)
    #[arg(long, value_name = "CONF")]
    min_confidence: Option<f32>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    /// One row per document
    Csv,
    /// Array of {source, fields}
    Json,
    /// One field/value table per document
    Markdown,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => OutputFormat::Csv,
            Format::Json => OutputFormat::Json,
            Format::Markdown => OutputFormat::Markdown,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Orphans {
    /// Drop them
    Discard,
    /// Keep them under an "Unlabeled" field
    Attach,
}

const ORPHAN_FIELD: &str = "Unlabeled";

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            inputs,
            output,
            format,
            parse,
            split_contact,
            source_column,
            filler,
            no_bom,
            compact,
        } => {
            let render_options = RenderOptions::new()
                .with_filler(filler)
                .with_bom(!no_bom)
                .with_source_column(source_column)
                .with_json_format(if compact {
                    JsonFormat::Compact
                } else {
                    JsonFormat::Pretty
                });
            cmd_extract(
                &inputs,
                output.as_deref(),
                format,
                &parse,
                &split_contact,
                &render_options,
            )
        }
        Commands::Lines {
            input,
            classify,
            parse,
        } => cmd_lines(&input, classify, &parse),
        Commands::Table {
            input,
            table,
            field_row,
            value_row,
            output,
        } => cmd_table(&input, table, field_row.zip(value_row), output.as_deref()),
        Commands::Info { input, parse } => cmd_info(&input, &parse),
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

fn parse_contact(arg: &str) -> Result<(String, String), String> {
    let (field, prefix) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=PREFIX, got '{}'", arg))?;
    let (field, prefix) = (field.trim(), prefix.trim());
    if field.is_empty() || prefix.is_empty() {
        return Err(format!("expected FIELD=PREFIX, got '{}'", arg));
    }
    Ok((field.to_string(), prefix.to_string()))
}

/// Read known field names, one per line; blank lines and `#` comments are skipped.
fn read_fields_file(path: &Path) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Cannot read fields file {}: {}", path.display(), e))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
        .collect())
}

fn parser_options(args: &ParseArgs) -> Result<ParserOptions, Box<dyn std::error::Error>> {
    let mut options = match &args.profile {
        Some(path) => ParserOptions::from_json_file(path)?,
        None => ParserOptions::default(),
    };

    let mut known = args.fields.clone();
    if let Some(path) = &args.fields_file {
        known.extend(read_fields_file(path)?);
    }
    for field in known {
        options = options.with_known_field(field);
    }

    match args.orphans {
        Some(Orphans::Attach) => options = options.attach_orphans(ORPHAN_FIELD),
        Some(Orphans::Discard) => options = options.with_orphans(OrphanPolicy::Discard),
        None => {}
    }

    if args.no_label_number {
        options.separators.label_number = false;
    }

    Ok(options)
}

fn build_pipeline(args: &ParseArgs) -> Result<Fieldex, Box<dyn std::error::Error>> {
    let mut fieldex = Fieldex::new().with_parser_options(parser_options(args)?);
    if args.no_tables {
        fieldex = fieldex.without_tables();
    }

    if let Some(confidence) = args.min_confidence {
        fieldex = fieldex.with_grouping(GroupingOptions::default().with_min_confidence(confidence));
    }

    if args.ocr {
        let engine = TesseractCli::new().with_language(&args.ocr_lang);
        if !engine.is_available() {
            return Err("tesseract not found on PATH; install it or drop --ocr".into());
        }
        fieldex = fieldex.with_ocr_engine(Arc::new(engine));
    }

    Ok(fieldex)
}

fn cmd_extract(
    inputs: &[PathBuf],
    output: Option<&Path>,
    format: Format,
    parse: &ParseArgs,
    split_contact: &[(String, String)],
    render_options: &RenderOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut fieldex = build_pipeline(parse)?;
    for (field, prefix) in split_contact {
        fieldex = fieldex.split_contact(field, prefix);
    }

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut report = BatchReport::new();
    for input in inputs {
        pb.set_message(source_name(input));
        let outcome = fieldex.process_file(input);
        match &outcome.status {
            DocumentStatus::Extracted => {}
            DocumentStatus::Empty => pb.println(format!(
                "{} {}: no data extracted",
                "Warning".yellow().bold(),
                outcome.source
            )),
            DocumentStatus::Failed(message) => pb.println(format!(
                "{} {}: {}",
                "Failed".red().bold(),
                outcome.source,
                message
            )),
        }
        report.push(outcome);
        pb.inc(1);
    }
    pb.finish_and_clear();

    if report.all_failed() {
        return Err(format!("all {} documents failed", report.len()).into());
    }
    if report.has_no_data() {
        eprintln!("{}", "No data extracted.".yellow().bold());
        return Ok(());
    }

    let rendered = render::render(&report.records(), format.into(), render_options)?;

    if let Some(path) = output {
        fs::write(path, &rendered)?;
        eprintln!("{} {}", "Saved to".green(), path.display());
    } else {
        print!("{}", rendered);
    }

    eprintln!(
        "{} {} extracted, {} empty, {} failed",
        "Done!".green().bold(),
        report.extracted_count(),
        report.empty_count(),
        report.failed_count()
    );

    Ok(())
}

fn cmd_lines(input: &Path, classify: bool, parse: &ParseArgs) -> Result<(), Box<dyn std::error::Error>> {
    let fieldex = build_pipeline(parse)?;
    let data = fs::read(input)?;
    let extracted = fieldex.extract_lines(&data)?;

    if !classify {
        for line in &extracted.lines {
            println!("{}", line.text);
        }
        return Ok(());
    }

    for (line, kind) in fieldex.parser().classify_lines(&extracted.lines) {
        match kind {
            LineKind::Header { field, value } if value.is_empty() => {
                println!("{} {}", "H".green().bold(), field.bold());
            }
            LineKind::Header { field, value } => {
                println!("{} {} = {}", "H".green().bold(), field.bold(), value);
            }
            LineKind::Continuation => println!("{} {}", "·".dimmed(), line.text),
        }
    }

    Ok(())
}

/// Read the cells of a CSV file without a header row.
fn read_csv_table(data: &[u8]) -> Result<TableCells, Box<dyn std::error::Error>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut table = Vec::new();
    for record in reader.records() {
        table.push(record?.iter().map(String::from).collect());
    }
    Ok(table)
}

/// Pick the `index`-th (1-based) table of a document; plain text is read as CSV.
fn load_table(fieldex: &Fieldex, data: &[u8], index: u32) -> Result<TableCells, Box<dyn std::error::Error>> {
    if detect_kind(data)? == DocumentKind::Text {
        return read_csv_table(data);
    }

    let mut tables = fieldex.extract_lines(data)?.tables;
    let count = tables.len();
    let position = index as usize - 1;
    if position >= count {
        return Err(format!("table {} requested but the document has {}", index, count).into());
    }
    Ok(tables.swap_remove(position))
}

fn cmd_table(
    input: &Path,
    index: u32,
    rows: Option<(u32, u32)>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let fieldex = Fieldex::new();
    let data = fs::read(input)?;
    let table = load_table(&fieldex, &data, index)?;

    let layout = match rows {
        Some((field_row, value_row)) => TableLayout::HeaderRow {
            field_row: field_row as usize - 1,
            value_row: value_row as usize - 1,
        },
        None => TableLayout::Pairwise,
    };

    let fields = fieldex.parse_table(&table, layout)?;
    if fields.is_empty() {
        eprintln!("{}", "No data extracted.".yellow().bold());
        return Ok(());
    }

    let record = Record::new(source_name(input), fields);
    let options = RenderOptions::new().with_bom(output.is_some());
    let rendered = render::render(&[record], OutputFormat::Csv, &options)?;

    if let Some(path) = output {
        fs::write(path, &rendered)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        print!("{}", rendered);
    }

    Ok(())
}

fn cmd_info(input: &Path, parse: &ParseArgs) -> Result<(), Box<dyn std::error::Error>> {
    let fieldex = build_pipeline(parse)?;
    let data = fs::read(input)?;
    let kind = detect_kind(&data)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), kind);
    println!("{}: {} bytes", "Size".bold(), data.len());

    match fieldex.registry().get(kind) {
        Some(extractor) => println!("{}: {}", "Extractor".bold(), extractor.name()),
        None => println!("{}: {}", "Extractor".bold(), "none".red()),
    }

    let extracted = match fieldex.extract_lines(&data) {
        Ok(extracted) => extracted,
        Err(e) => {
            println!("{}: {}", "Status".bold(), e.to_string().red());
            return Ok(());
        }
    };
    let fields = fieldex.parse_extracted(&extracted);

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let non_blank = extracted.lines.iter().filter(|l| !l.is_blank()).count();
    println!("{}: {}", "Lines".bold(), non_blank);
    println!("{}: {}", "Tables".bold(), extracted.tables.len());
    println!("{}: {}", "Fields".bold(), fields.len());

    for pair in &fields {
        println!("  {} {}", "├─".dimmed(), pair.field);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "fieldex".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Field/value extraction from documents");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_contact() {
        assert_eq!(
            parse_contact("Client Information=Client").unwrap(),
            ("Client Information".to_string(), "Client".to_string())
        );
        assert!(parse_contact("Client Information").is_err());
        assert!(parse_contact("=Client").is_err());
    }

    #[test]
    fn test_read_fields_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fields.txt");
        fs::write(&path, "# invoice fields\nDate\n\n  Client Information  \n").unwrap();

        let fields = read_fields_file(&path).unwrap();
        assert_eq!(fields, vec!["Date", "Client Information"]);
    }

    #[test]
    fn test_cli_parses_extract() {
        let cli = Cli::try_parse_from([
            "fieldex",
            "extract",
            "a.pdf",
            "b.txt",
            "-f",
            "Date",
            "--split-contact",
            "Client Information=Client",
            "--format",
            "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Extract {
                inputs,
                parse,
                split_contact,
                ..
            } => {
                assert_eq!(inputs.len(), 2);
                assert_eq!(parse.fields, vec!["Date"]);
                assert_eq!(split_contact[0].1, "Client");
            }
            _ => panic!("expected extract"),
        }
    }

    #[test]
    fn test_load_table_from_csv() {
        let table = load_table(&Fieldex::new(), b"Name,Jane\nDate,7/1/25\n", 1).unwrap();
        assert_eq!(table, vec![vec!["Name", "Jane"], vec!["Date", "7/1/25"]]);
    }

    #[test]
    fn test_load_table_out_of_range() {
        // A document kind with no tables
        let tsv = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext\n\
                   5\t1\t1\t1\t1\t1\t10\t10\t40\t12\t95\tTotal\n";
        let err = load_table(&Fieldex::new(), tsv.as_bytes(), 1).unwrap_err();
        assert!(err.to_string().contains("has 0"));
    }

    #[test]
    fn test_parse_flags_adjust_options() {
        let cli = Cli::try_parse_from(["fieldex", "extract", "a.txt", "--no-label-number", "--no-tables"])
            .unwrap();
        match cli.command {
            Commands::Extract { parse, .. } => {
                let options = parser_options(&parse).unwrap();
                assert!(!options.separators.label_number);
                assert!(options.separators.colon);
                assert!(parse.no_tables);
            }
            _ => panic!("expected extract"),
        }
    }

    #[test]
    fn test_table_rows_require_each_other() {
        assert!(Cli::try_parse_from(["fieldex", "table", "t.csv", "--field-row", "1"]).is_err());
        assert!(Cli::try_parse_from(["fieldex", "table", "t.csv", "--field-row", "0", "--value-row", "2"]).is_err());
    }
}
