// Listing and symbol dump output

use crate::script_compiler::lexer::Line;
use crate::script_compiler::symbols::{LabelTable, VariableTable};
use std::io::{self, Write};

/// Bytes shown per listing row before wrapping onto a continuation row.
const BYTES_PER_ROW: usize = 8;

pub struct ListingWriter<W: Write> {
    out: W,
}

impl<W: Write> ListingWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// One row per line: code offset, the bytes that line emitted, line
    /// number and source. Lines that never went through pass 1 are skipped.
    pub fn write_listing(&mut self, lines: &[Line], bytes: &[u8]) -> io::Result<()> {
        writeln!(self.out, "ADDR  BYTES                     LINE  SOURCE")?;
        writeln!(self.out, "----  ------------------------  ----  ------")?;

        for (index, line) in lines.iter().enumerate() {
            let Some(start) = line.code_offset() else {
                continue;
            };
            let end = lines[index + 1..]
                .iter()
                .find_map(Line::code_offset)
                .unwrap_or(bytes.len())
                .min(bytes.len());
            let emitted = bytes.get(start..end).unwrap_or(&[]);

            let mut rows = emitted.chunks(BYTES_PER_ROW);
            let first_row = rows.next().unwrap_or(&[]);
            writeln!(
                self.out,
                "{:04X}  {:<24}  {:>4}  {}",
                start,
                format_bytes(first_row),
                line.number(),
                line.text()
            )?;

            for (row, chunk) in rows.enumerate() {
                writeln!(
                    self.out,
                    "{:04X}  {}",
                    start + (row + 1) * BYTES_PER_ROW,
                    format_bytes(chunk)
                )?;
            }
        }
        Ok(())
    }

    pub fn write_symbols(
        &mut self,
        labels: &LabelTable,
        variables: &VariableTable,
    ) -> io::Result<()> {
        writeln!(self.out, "LABELS")?;
        for (name, offset) in labels.iter() {
            writeln!(self.out, "  {:04X}  {}", offset, name)?;
        }
        writeln!(self.out, "VARIABLES")?;
        for (name, index) in variables.iter() {
            writeln!(self.out, "  {:>4}  {}", index, name)?;
        }
        Ok(())
    }
}

fn format_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
