//! Excelsior CLI - inspect and edit xlsx workbooks in place

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use excelsior::prelude::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "excelsior")]
#[command(author, version, about = "Format-preserving xlsx editing tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all sheets in a workbook
    Sheets {
        /// Input workbook
        input: PathBuf,
    },

    /// Create an empty workbook with one sheet
    Create {
        /// Output workbook
        output: PathBuf,

        /// Name of the first sheet
        #[arg(short, long, default_value = "Sheet1")]
        sheet: String,
    },

    /// Set one cell and save the workbook in place
    SetCell {
        /// Workbook to edit
        input: PathBuf,

        /// Cell address, e.g. B7
        cell: String,

        /// Value to store
        value: String,

        /// Sheet to edit (default: first sheet)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Store the value as a number instead of text
        #[arg(short, long)]
        number: bool,

        /// Write to this file instead of overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Set column widths, e.g. `widths book.xlsx A=18.5 B:D=22`
    Widths {
        /// Workbook to edit
        input: PathBuf,

        /// COLUMNS=WIDTH pairs
        #[arg(required = true)]
        widths: Vec<String>,

        /// Sheet to edit (default: first sheet)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Write to this file instead of overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the 0-based index of the last populated row of a column
    LastRow {
        /// Input workbook
        input: PathBuf,

        /// Column (`B`), columns (`B:D`) or cell (`B7`)
        column: String,

        /// Sheet to read (default: first sheet)
        #[arg(short, long)]
        sheet: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sheets { input } => list_sheets(&input),
        Commands::Create { output, sheet } => create(&output, &sheet),
        Commands::SetCell {
            input,
            cell,
            value,
            sheet,
            number,
            output,
        } => set_cell(&input, &cell, &value, sheet.as_deref(), number, output.as_deref()),
        Commands::Widths {
            input,
            widths,
            sheet,
            output,
        } => set_widths(&input, &widths, sheet.as_deref(), output.as_deref()),
        Commands::LastRow {
            input,
            column,
            sheet,
        } => last_row(&input, &column, sheet.as_deref()),
    }
}

fn open(input: &Path, sheet: Option<&str>) -> Result<Editor> {
    Editor::open(input, sheet).with_context(|| format!("Failed to open '{}'", input.display()))
}

fn save(editor: &mut Editor, input: &Path, output: Option<&Path>) -> Result<()> {
    let target = output.unwrap_or(input);
    editor
        .save(target)
        .with_context(|| format!("Failed to write '{}'", target.display()))
}

fn list_sheets(input: &Path) -> Result<()> {
    let scanner = excelsior::scan(input)
        .with_context(|| format!("Failed to open '{}'", input.display()))?;

    for (i, name) in scanner.get_sheets().iter().enumerate() {
        println!("{}\t{}", i, name);
    }

    Ok(())
}

fn create(output: &Path, sheet: &str) -> Result<()> {
    excelsior::create(output, sheet)
        .with_context(|| format!("Failed to create '{}'", output.display()))?;
    eprintln!("Created '{}' with sheet \"{}\"", output.display(), sheet);
    Ok(())
}

fn set_cell(
    input: &Path,
    cell: &str,
    value: &str,
    sheet: Option<&str>,
    number: bool,
    output: Option<&Path>,
) -> Result<()> {
    let mut editor = open(input, sheet)?;

    if number {
        let n: f64 = value
            .trim()
            .parse()
            .with_context(|| format!("'{}' is not a number", value))?;
        editor.set_cell_number(cell, n)?;
    } else {
        editor.set_cell(cell, value)?;
    }

    save(&mut editor, input, output)
}

/// Split `B:D=22` into its column part and width
fn parse_width(spec: &str) -> Result<(String, f64)> {
    let Some((columns, width)) = spec.rsplit_once('=') else {
        bail!("expected COLUMNS=WIDTH, got '{}'", spec);
    };
    let width: f64 = width
        .trim()
        .parse()
        .with_context(|| format!("'{}' is not a width", width))?;
    Ok((columns.trim().to_string(), width))
}

fn set_widths(
    input: &Path,
    widths: &[String],
    sheet: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let pairs = widths
        .iter()
        .map(|w| parse_width(w))
        .collect::<Result<Vec<_>>>()?;

    let mut editor = open(input, sheet)?;
    editor.set_column_widths(pairs)?;
    save(&mut editor, input, output)
}

fn last_row(input: &Path, column: &str, sheet: Option<&str>) -> Result<()> {
    let mut editor = open(input, sheet)?;
    match editor.last_row_index(column)? {
        Some(row) => println!("{}", row),
        None => println!("-"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_width() {
        assert_eq!(parse_width("B:D=22").unwrap(), ("B:D".to_string(), 22.0));
        assert_eq!(parse_width(" A = 18.5").unwrap(), ("A".to_string(), 18.5));
        assert!(parse_width("A").is_err());
        assert!(parse_width("A=wide").is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
