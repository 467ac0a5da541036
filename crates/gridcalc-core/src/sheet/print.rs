//! Printing the sheet as delimited rows.
//!
//! Rows are produced lazily so output can stream to any writer. Every row
//! has exactly `printable_size().cols` fields; absent cells are empty fields.

use std::io::{self, Write};

use gridcalc_engine::Position;

use super::Sheet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Render {
    Values,
    Texts,
}

/// Iterator over the printable rows of a sheet, one vector of fields per row.
pub struct Rows<'a> {
    sheet: &'a Sheet,
    render: Render,
    row: usize,
}

impl Iterator for Rows<'_> {
    type Item = Vec<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let size = self.sheet.printable_size();
        if self.row >= size.rows {
            return None;
        }
        let row = self.row;
        self.row += 1;

        let fields = (0..size.cols)
            .map(|col| match self.sheet.cells.get(&Position::new(row, col)) {
                Some(cell) => match self.render {
                    Render::Values => cell.value(self.sheet).to_string(),
                    Render::Texts => cell.text(),
                },
                None => String::new(),
            })
            .collect();
        Some(fields)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.sheet.printable_size().rows.saturating_sub(self.row);
        (remaining, Some(remaining))
    }
}

impl Sheet {
    /// Rows of evaluated values.
    pub fn value_rows(&self) -> Rows<'_> {
        Rows {
            sheet: self,
            render: Render::Values,
            row: 0,
        }
    }

    /// Rows of editable texts.
    pub fn text_rows(&self) -> Rows<'_> {
        Rows {
            sheet: self,
            render: Render::Texts,
            row: 0,
        }
    }

    /// Write evaluated values, tab-separated, one line per row.
    pub fn print_values<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.print_values_with(out, '\t')
    }

    /// Write editable texts, tab-separated, one line per row.
    pub fn print_texts<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.print_texts_with(out, '\t')
    }

    pub fn print_values_with<W: Write>(&self, out: &mut W, delimiter: char) -> io::Result<()> {
        write_rows(out, self.value_rows(), delimiter)
    }

    pub fn print_texts_with<W: Write>(&self, out: &mut W, delimiter: char) -> io::Result<()> {
        write_rows(out, self.text_rows(), delimiter)
    }
}

fn write_rows<W: Write>(out: &mut W, rows: Rows<'_>, delimiter: char) -> io::Result<()> {
    let delimiter = delimiter.to_string();
    for fields in rows {
        writeln!(out, "{}", fields.join(delimiter.as_str()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(name: &str) -> Position {
        Position::from_str(name).unwrap()
    }

    fn texts(sheet: &Sheet) -> String {
        let mut out = Vec::new();
        sheet.print_texts(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn values(sheet: &Sheet) -> String {
        let mut out = Vec::new();
        sheet.print_values(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_print_empty_sheet() {
        let sheet = Sheet::new();
        assert_eq!(texts(&sheet), "");
        assert_eq!(values(&sheet), "");
    }

    #[test]
    fn test_print_texts_pads_sparse_rows() {
        let mut sheet = Sheet::new();
        sheet.set(pos("A1"), "x").unwrap();
        sheet.set(pos("B2"), "=A1").unwrap();
        assert_eq!(texts(&sheet), "x\t\n\t=A1\n");
    }

    #[test]
    fn test_print_values() {
        let mut sheet = Sheet::new();
        sheet.set(pos("A1"), "2").unwrap();
        sheet.set(pos("B1"), "=A1/4").unwrap();
        sheet.set(pos("C1"), "'=escaped").unwrap();
        sheet.set(pos("A3"), "=1/0").unwrap();
        assert_eq!(values(&sheet), "2\t0.5\t=escaped\n\t\t\n#ARITHM!\t\t\n");
    }

    #[test]
    fn test_print_with_custom_delimiter() {
        let mut sheet = Sheet::new();
        sheet.set(pos("A1"), "1").unwrap();
        sheet.set(pos("C1"), "=A1+1").unwrap();
        let mut out = Vec::new();
        sheet.print_values_with(&mut out, ',').unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1,,2\n");
    }

    #[test]
    fn test_print_negative_zero_as_zero() {
        let mut sheet = Sheet::new();
        sheet.set(pos("A1"), "=0*-1").unwrap();
        assert_eq!(values(&sheet), "0\n");
    }

    #[test]
    fn test_rows_are_lazy_and_sized() {
        let mut sheet = Sheet::new();
        sheet.set(pos("B3"), "z").unwrap();
        let mut rows = sheet.text_rows();
        assert_eq!(rows.size_hint(), (3, Some(3)));
        assert_eq!(rows.next(), Some(vec![String::new(), String::new()]));
        assert_eq!(rows.nth(1), Some(vec![String::new(), "z".to_string()]));
        assert_eq!(rows.next(), None);
    }
}
