//! CSV output for normalized rows.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::row::{NormalizedRow, COLUMNS};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Writes `rows` to `path` as UTF-8 with BOM. Returns the number of rows written.
pub fn write_csv(path: &Path, rows: &[NormalizedRow]) -> Result<usize> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let count = write_rows(&mut writer, rows)?;
    writer.flush()?;
    Ok(count)
}

/// The header is written explicitly so an empty extract still carries it.
pub fn write_rows<W: Write>(mut out: W, rows: &[NormalizedRow]) -> Result<usize> {
    out.write_all(UTF8_BOM)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);
    writer.write_record(COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(rows.len())
}
