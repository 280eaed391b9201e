//! CSV export of the entry table

use crate::entry::EntryTable;
use crate::Result;
use csv::WriterBuilder;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Writes the table as CSV, creating missing parent directories
///
/// The file always starts with the `title,summary,url,img_url` header, even
/// when the table is empty. No index column is written.
pub fn write_csv(table: &EntryTable, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = fs::File::create(path)?;
    write_csv_to(table, file)
}

/// Writes the table as CSV to any writer
pub fn write_csv_to<W: Write>(table: &EntryTable, writer: W) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);

    writer.write_record(EntryTable::COLUMNS)?;
    for row in table.rows() {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}
