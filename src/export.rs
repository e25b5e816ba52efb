//! Writing a [`DataSet`] as CSV.

use std::io::Write;
use std::path::Path;

use crate::error::CleaningResult;
use crate::types::DataSet;

/// Write `dataset` with a header row. Nulls are written as empty cells.
pub fn write_csv<W: Write>(dataset: &DataSet, writer: W) -> CleaningResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(dataset.schema.field_names())?;
    for row in &dataset.rows {
        wtr.write_record(row.iter().map(ToString::to_string))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `dataset` to a file at `path`, replacing any existing file.
pub fn write_csv_to_path(dataset: &DataSet, path: impl AsRef<Path>) -> CleaningResult<()> {
    let file = std::fs::File::create(path)?;
    write_csv(dataset, std::io::BufWriter::new(file))
}
