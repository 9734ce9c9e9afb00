//! # sheetql-cli
//!
//! Command-line interface for sheetql: VLOOKUP joins between sheets and
//! PostgreSQL INSERT/UPDATE script generation from spreadsheet data.

mod job_file;
mod report;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use job_file::JobFile;
use report::OutputFormat;
use sheetql_core::{
    run_insert, run_update, run_vlookup, with_generated_ids, IdMode, InsertConfig, SqlJobOutput,
    UpdateConfig, VlookupJob, VlookupMapping,
};
use sheetql_sheet::{parse_column_ref, Book, Sheet};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// sheetql - spreadsheet lookups and SQL scripts
#[derive(Parser, Debug)]
#[command(name = "sheetql")]
#[command(author, version, about = "VLOOKUP joins and PostgreSQL scripts from spreadsheets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Job file (YAML or JSON) with defaults for the subcommand
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Report format
    #[arg(short = 'f', long = "format", global = true, default_value = "text")]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the sheets and columns of a workbook
    Sheets {
        /// Workbook or CSV/TSV file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Copy columns from a reference sheet into a target sheet by key
    Vlookup(VlookupArgs),
    /// Generate INSERT statements
    Insert(InsertArgs),
    /// Generate UPDATE statements
    Update(UpdateArgs),
}

#[derive(Args, Debug)]
struct VlookupArgs {
    /// Workbook holding the sheets
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Sheet whose rows are looked up
    #[arg(long)]
    lookup_sheet: Option<String>,

    /// Key column in the lookup sheet (letter or 0-based index; default:
    /// the first column whose header also appears in the reference sheet)
    #[arg(long, value_parser = parse_column)]
    lookup_col: Option<usize>,

    /// Sheet searched for matching keys
    #[arg(long)]
    reference_sheet: Option<String>,

    /// Key column in the reference sheet (default: matched by header)
    #[arg(long, value_parser = parse_column)]
    match_col: Option<usize>,

    /// Sheet receiving the values (defaults to the lookup sheet)
    #[arg(long)]
    target_sheet: Option<String>,

    /// Reference column to copy and target column to write, with an optional header
    #[arg(long = "map", value_name = "RETURN:TARGET[:NAME]", value_parser = parse_mapping)]
    mappings: Vec<VlookupMapping>,

    /// Output workbook, or just the target sheet when it ends in .csv
    /// (default: vlookup_result_<millis>.xlsx)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// List unmatched rows
    #[arg(long)]
    report: bool,

    /// Export even when some rows have no match
    #[arg(long)]
    force: bool,
}

#[derive(Args, Debug)]
struct SqlArgs {
    /// Workbook or CSV/TSV file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Sheet to read (defaults to the first one)
    #[arg(long)]
    sheet: Option<String>,

    /// Target table name
    #[arg(short, long)]
    table: Option<String>,

    /// Primary key column (letter or 0-based index)
    #[arg(long, value_parser = parse_column)]
    pk_col: Option<usize>,

    /// Write empty cells as NULL
    #[arg(long)]
    empty_as_null: bool,

    /// SQL output file (default: <mode>_<table>_<millis>.sql)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also export the sheet as xlsx
    #[arg(long, value_name = "FILE")]
    xlsx: Option<PathBuf>,

    /// List each row with a duplicate or empty primary key
    #[arg(long)]
    report: bool,

    /// Export even when primary keys are duplicated or empty
    #[arg(long)]
    force: bool,
}

#[derive(Args, Debug)]
struct InsertArgs {
    #[command(flatten)]
    common: SqlArgs,

    /// Replace the primary key column with generated IDs
    #[arg(long)]
    generate_ids: bool,

    /// Prefix of generated IDs
    #[arg(long)]
    id_prefix: Option<String>,

    /// Total length of generated IDs, prefix included
    #[arg(long)]
    id_length: Option<usize>,

    /// First generated number
    #[arg(long, allow_negative_numbers = true)]
    id_start: Option<i64>,

    /// List column names in each INSERT
    #[arg(long)]
    column_names: bool,
}

#[derive(Args, Debug)]
struct UpdateArgs {
    #[command(flatten)]
    common: SqlArgs,

    /// Columns to SET (repeat or comma-separate)
    #[arg(long = "set-col", value_delimiter = ',', value_parser = parse_column)]
    set_columns: Vec<usize>,
}

fn parse_column(s: &str) -> std::result::Result<usize, String> {
    parse_column_ref(s).map_err(|e| e.to_string())
}

fn parse_mapping(s: &str) -> std::result::Result<VlookupMapping, String> {
    let mut parts = s.splitn(3, ':');
    let (Some(return_col), Some(target_col)) = (parts.next(), parts.next()) else {
        return Err(format!("expected RETURN:TARGET[:NAME], got '{s}'"));
    };
    let mut mapping = VlookupMapping::new(parse_column(return_col)?, parse_column(target_col)?);
    if let Some(name) = parts.next() {
        mapping = mapping.with_column_name(name);
    }
    Ok(mapping)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    let job = match &cli.config {
        Some(path) => JobFile::load(path)?,
        None => JobFile::default(),
    };

    match cli.command {
        Command::Sheets { file } => report::print_sheets(&open_book(&file)?, cli.format),
        Command::Vlookup(args) => vlookup_command(&args, job, cli.format),
        Command::Insert(args) => insert_command(&args, job, cli.format),
        Command::Update(args) => update_command(&args, job, cli.format),
    }
}

fn open_book(path: &Path) -> Result<Book> {
    Book::open(path).with_context(|| format!("Failed to open workbook: {}", path.display()))
}

fn select_sheet<'a>(book: &'a Book, name: Option<&str>) -> Result<&'a Sheet> {
    match name {
        Some(name) => Ok(book.get_sheet(name)?),
        None => book
            .first_sheet()
            .with_context(|| format!("Workbook '{}' has no sheets", book.name())),
    }
}

fn millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn default_sql_name(mode: &str, table: &str) -> PathBuf {
    PathBuf::from(format!("{mode}_{table}_{}.sql", millis()))
}

/// Write the script as UTF-8 with a byte order mark.
fn write_sql(path: &Path, output: &SqlJobOutput) -> Result<()> {
    let mut text = String::from('\u{feff}');
    text.push_str(&output.script());
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}

fn write_xlsx(path: &Path, sheet: &Sheet) -> Result<()> {
    sheet
        .save_as_xlsx(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}

impl VlookupArgs {
    /// Flags layered over the job file's settings.
    fn job(&self, base: VlookupJob) -> Result<VlookupJob> {
        let mut job = base;
        if let Some(sheet) = &self.lookup_sheet {
            job.lookup_sheet.clone_from(sheet);
        }
        job.lookup_column = self.lookup_col.or(job.lookup_column);
        if let Some(sheet) = &self.reference_sheet {
            job.reference_sheet.clone_from(sheet);
        }
        job.match_column = self.match_col.or(job.match_column);
        if let Some(sheet) = &self.target_sheet {
            job.target_sheet.clone_from(sheet);
        }
        if !self.mappings.is_empty() {
            job.return_mappings = self.mappings.iter().cloned().map(Into::into).collect();
        }

        if job.lookup_sheet.is_empty() || job.reference_sheet.is_empty() {
            bail!("Both --lookup-sheet and --reference-sheet are required");
        }
        if job.target_sheet.is_empty() {
            job.target_sheet.clone_from(&job.lookup_sheet);
        }
        if job.return_mappings.is_empty() {
            bail!("At least one --map RETURN:TARGET is required");
        }
        Ok(job)
    }
}

fn vlookup_command(args: &VlookupArgs, file: JobFile, format: OutputFormat) -> Result<()> {
    let job = args.job(file.vlookup.unwrap_or_default())?;
    let book = open_book(&args.file)?;
    let output = run_vlookup(&job, &book)?;

    let path = (output.is_exportable() || args.force).then(|| {
        args.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("vlookup_result_{}.xlsx", millis())))
    });
    report::print_vlookup(&job, &output, path.as_deref(), args.report, format)?;

    let Some(path) = path else {
        bail!(
            "{} row(s) have no match; export refused (use --force to export anyway)",
            output.output.no_match_count
        );
    };
    let as_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    let written = if as_csv {
        output.result.save_as_csv(&path)
    } else {
        output.into_book(&book)?.save_as_xlsx(&path)
    };
    written.with_context(|| format!("Failed to write {}", path.display()))
}

impl InsertArgs {
    fn config(&self, base: InsertConfig) -> InsertConfig {
        let mut config = base;
        if let Some(table) = &self.common.table {
            config.table_name.clone_from(table);
        }
        if let Some(col) = self.common.pk_col {
            config.pk_column = col;
        }
        if self.generate_ids {
            config.id_mode = IdMode::Generate;
        }
        if let Some(prefix) = &self.id_prefix {
            config.id_prefix.clone_from(prefix);
        }
        if let Some(length) = self.id_length {
            config.id_total_length = length;
        }
        if let Some(start) = self.id_start {
            config.id_start_number = start;
        }
        config.include_column_names |= self.column_names;
        config.treat_empty_as_null |= self.common.empty_as_null;
        config
    }
}

impl UpdateArgs {
    fn config(&self, base: UpdateConfig) -> UpdateConfig {
        let mut config = base;
        if let Some(table) = &self.common.table {
            config.table_name.clone_from(table);
        }
        if let Some(col) = self.common.pk_col {
            config.pk_column = col;
        }
        if !self.set_columns.is_empty() {
            config.set_columns.clone_from(&self.set_columns);
        }
        config.treat_empty_as_null |= self.common.empty_as_null;
        config
    }
}

/// Report, then write the script (and optional xlsx) unless keys are bad.
fn export_sql(
    mode: &str,
    table: &str,
    args: &SqlArgs,
    output: &SqlJobOutput,
    sheet: &Sheet,
    format: OutputFormat,
) -> Result<()> {
    let path = (output.is_exportable() || args.force).then(|| {
        args.output
            .clone()
            .unwrap_or_else(|| default_sql_name(mode, table))
    });
    report::print_sql(mode, output, path.as_deref(), args.report, format)?;

    let Some(path) = path else {
        bail!("Primary key problems found; export refused (use --force to export anyway)");
    };
    write_sql(&path, output)?;
    if let Some(xlsx) = &args.xlsx {
        write_xlsx(xlsx, sheet)?;
    }
    Ok(())
}

fn insert_command(args: &InsertArgs, file: JobFile, format: OutputFormat) -> Result<()> {
    let config = args.config(file.insert.unwrap_or_default());
    let book = open_book(&args.common.file)?;
    let sheet_name = args.common.sheet.as_deref().or(file.sheet.as_deref());
    let sheet = select_sheet(&book, sheet_name)?;

    let output = run_insert(&config, sheet)?;
    let exported = match &output.generated_ids {
        Some(ids) => with_generated_ids(sheet, config.pk_column, ids),
        None => sheet.clone(),
    };
    export_sql("insert", &config.table_name, &args.common, &output, &exported, format)
}

fn update_command(args: &UpdateArgs, file: JobFile, format: OutputFormat) -> Result<()> {
    let config = args.config(file.update.unwrap_or_default());
    let book = open_book(&args.common.file)?;
    let sheet_name = args.common.sheet.as_deref().or(file.sheet.as_deref());
    let sheet = select_sheet(&book, sheet_name)?;

    let output = run_update(&config, sheet)?;
    export_sql("update", &config.table_name, &args.common, &output, sheet, format)
}
