//! Command mode: a line-oriented command language over a [`Sheet`].
//!
//! ```text
//! set A1 =B1+1     # everything after the cell and one space is the cell text
//! clear A1
//! get A1           # evaluated value
//! text A1          # editable text
//! refs A1          # cells the formula reads
//! size
//! values
//! texts
//! ```

use std::io::Write;

use gridcalc_core::{Position, Sheet};

use crate::config::Config;
use crate::error::{GridcalcError, Result};

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Set(Position, String),
    Clear(Position),
    Get(Position),
    Text(Position),
    Refs(Position),
    Size,
    Values,
    Texts,
}

impl Command {
    /// Parse one input line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let line = line.trim_end_matches(['\r', '\n']).trim_start();
        if line.trim_end().is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (name, rest) = line.split_once(' ').unwrap_or((line, ""));
        let command = match name.to_ascii_lowercase().as_str() {
            "set" => {
                let (cell, text) = rest.split_once(' ').unwrap_or((rest, ""));
                Command::Set(parse_cell(cell, "set")?, text.to_string())
            }
            "clear" => Command::Clear(parse_cell(rest.trim(), "clear")?),
            "get" => Command::Get(parse_cell(rest.trim(), "get")?),
            "text" => Command::Text(parse_cell(rest.trim(), "text")?),
            "refs" => Command::Refs(parse_cell(rest.trim(), "refs")?),
            "size" => Command::Size,
            "values" => Command::Values,
            "texts" => Command::Texts,
            _ => return Err(GridcalcError::UnknownCommand(name.to_string())),
        };
        Ok(Some(command))
    }

    /// Run the command against `sheet`, writing any output to `out`.
    pub fn execute<W: Write>(&self, sheet: &mut Sheet, out: &mut W, config: &Config) -> Result<()> {
        match self {
            Command::Set(pos, text) => sheet.set(*pos, text)?,
            Command::Clear(pos) => sheet.clear(*pos)?,
            Command::Get(pos) => writeln!(out, "{}", sheet.value(*pos)?)?,
            Command::Text(pos) => {
                let text = sheet.get(*pos)?.map(|cell| cell.text()).unwrap_or_default();
                writeln!(out, "{}", text)?;
            }
            Command::Refs(pos) => {
                let refs: Vec<String> = sheet
                    .get(*pos)?
                    .map(|cell| cell.referenced_cells())
                    .unwrap_or_default()
                    .iter()
                    .map(Position::to_string)
                    .collect();
                writeln!(out, "{}", refs.join(" "))?;
            }
            Command::Size => {
                let size = sheet.printable_size();
                writeln!(out, "{} {}", size.rows, size.cols)?;
            }
            Command::Values => sheet.print_values_with(out, config.delimiter)?,
            Command::Texts => sheet.print_texts_with(out, config.delimiter)?,
        }
        Ok(())
    }
}

fn parse_cell(name: &str, command: &'static str) -> Result<Position> {
    if name.is_empty() {
        return Err(GridcalcError::MissingArgument(command));
    }
    Position::from_str(name).ok_or_else(|| GridcalcError::InvalidCell(name.to_string()))
}

/// Parse and execute a single line.
pub fn run_line<W: Write>(sheet: &mut Sheet, line: &str, out: &mut W, config: &Config) -> Result<()> {
    match Command::parse(line)? {
        Some(command) => {
            log::debug!("executing {:?}", command);
            command.execute(sheet, out, config)
        }
        None => Ok(()),
    }
}
