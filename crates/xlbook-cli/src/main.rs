//! xlbook CLI - write XLS and XLSX workbooks from the command line

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use xlbook::demo::demo_book;
use xlbook::prelude::*;

#[derive(Parser)]
#[command(name = "xlbook")]
#[command(author, version, about = "Write XLS and XLSX workbooks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write demo.xls and demo.xlsx
    Demo {
        /// Directory to write into (default: current directory)
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Build a one-sheet workbook; the format follows the output extension
    Write(WriteArgs),
}

#[derive(Args, Debug)]
struct WriteArgs {
    /// Output file (.xls or .xlsx)
    output: PathBuf,

    /// Sheet name
    #[arg(short, long, default_value = "Sheet 1")]
    sheet: String,

    /// Text cell, as ROW:COL=TEXT (0-based) or A1=TEXT; repeatable
    #[arg(short, long = "cell", value_parser = parse_assignment)]
    cells: Vec<(CellAddress, String)>,

    /// Solid fill, as ROW:COL=COLOR or A1=COLOR; COLOR is a palette name or #RRGGBB
    #[arg(short, long = "fill", value_parser = parse_fill)]
    fills: Vec<(CellAddress, Color)>,

    /// Fill pattern used by --fill
    #[arg(short, long, default_value = "solid")]
    pattern: FillPattern,

    /// Horizontal alignment of --cell text (left, center, right, ...)
    #[arg(long, default_value = "general")]
    align: HorizontalAlignment,

    /// Wrap --cell text onto several lines
    #[arg(long)]
    wrap: bool,

    /// Column width in characters, as COL=WIDTH with COL a letter or 0-based index; repeatable
    #[arg(long = "col-width", value_parser = parse_col_width)]
    col_widths: Vec<(u16, f64)>,

    /// JSON file with book settings (font_name, font_size, active_sheet, date_1904)
    #[arg(long)]
    settings: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Demo { out_dir } => write_demo(&out_dir),
        Commands::Write(args) => write_book(&args),
    }
}

fn write_demo(out_dir: &Path) -> Result<()> {
    for kind in [BookKind::Legacy, BookKind::Modern] {
        let path = out_dir.join(format!("demo.{}", kind.extension()));
        let book = demo_book(kind).context("Failed to build demo book")?;
        book.save(&path)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        eprintln!("Wrote '{}'", path.display());
    }
    Ok(())
}

fn write_book(args: &WriteArgs) -> Result<()> {
    let book = build_book(args)?;
    book.save(&args.output)
        .with_context(|| format!("Failed to write '{}'", args.output.display()))?;
    eprintln!(
        "Wrote {} cell(s) to '{}'",
        book.sheet(0).map_or(0, |s| s.cell_count()),
        args.output.display()
    );
    Ok(())
}

fn build_book(args: &WriteArgs) -> Result<Book> {
    let Some(kind) = BookKind::from_path(&args.output) else {
        bail!(
            "Cannot tell the format of '{}': use a .xls or .xlsx extension",
            args.output.display()
        );
    };

    let settings = match &args.settings {
        Some(path) => load_settings(path)?,
        None => BookSettings::default(),
    };
    log::debug!("building {} book with {:?}", kind, settings);

    let mut book = Book::with_settings(kind, settings);
    let mut sheet = book
        .add_sheet(&args.sheet)
        .with_context(|| format!("Invalid sheet name '{}'", args.sheet))?;

    let text_format = Format::new().with_align_h(args.align).with_wrap(args.wrap);
    let text_format = (text_format != Format::default()).then(|| sheet.add_format(text_format));
    for (addr, text) in &args.cells {
        sheet
            .write_string(addr.row, addr.col, text.as_str(), text_format)
            .with_context(|| format!("Cannot write cell {}", addr))?;
    }
    for &(col, width) in &args.col_widths {
        sheet
            .set_col(col, col, width, None, false)
            .with_context(|| format!("Cannot set width of column {}", col))?;
    }
    for (addr, color) in &args.fills {
        sheet
            .cell_format(addr.row, addr.col)
            .with_context(|| format!("Cannot format cell {}", addr))?
            .set(
                Format::new()
                    .with_fill_pattern(args.pattern)
                    .with_foreground(*color),
            );
    }

    if book.settings().active_sheet >= book.sheet_count() {
        log::warn!(
            "active sheet {} does not exist; the first sheet will be active",
            book.settings().active_sheet
        );
    }
    Ok(book)
}

fn load_settings(path: &Path) -> Result<BookSettings> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings '{}'", path.display()))?;
    let settings: BookSettings = serde_json::from_str(&json)
        .with_context(|| format!("Invalid settings file '{}'", path.display()))?;
    settings
        .validate()
        .with_context(|| format!("Invalid settings file '{}'", path.display()))?;
    Ok(settings)
}

/// Parse `ROW:COL` (0-based) or an A1-style reference
fn parse_cell_ref(s: &str) -> std::result::Result<CellAddress, String> {
    match s.split_once(':') {
        Some((row, col)) => {
            let row = row
                .trim()
                .parse()
                .map_err(|_| format!("invalid row in '{}'", s))?;
            let col = col
                .trim()
                .parse()
                .map_err(|_| format!("invalid column in '{}'", s))?;
            Ok(CellAddress::new(row, col))
        }
        None => CellAddress::parse(s).map_err(|e| e.to_string()),
    }
}

fn parse_assignment(s: &str) -> std::result::Result<(CellAddress, String), String> {
    let (cell, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected CELL=VALUE, got '{}'", s))?;
    Ok((parse_cell_ref(cell)?, value.to_string()))
}

fn parse_col_width(s: &str) -> std::result::Result<(u16, f64), String> {
    let (col, width) = s
        .split_once('=')
        .ok_or_else(|| format!("expected COL=WIDTH, got '{}'", s))?;
    let col = col.trim();
    let col = match col.parse::<u16>() {
        Ok(index) => index,
        Err(_) => CellAddress::letters_to_column(col).map_err(|e| e.to_string())?,
    };
    let width = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width in '{}'", s))?;
    Ok((col, width))
}

fn parse_fill(s: &str) -> std::result::Result<(CellAddress, Color), String> {
    let (addr, value) = parse_assignment(s)?;
    let color = Color::parse(&value).ok_or_else(|| format!("unknown color '{}'", value))?;
    Ok((addr, color))
}
