use serde::{Deserialize, Serialize};
use tracing::info;

use std::path::{Path, PathBuf};

use crate::{
    error::{csv_to_io, Error, Result},
    sum::Sum,
    table::{Entry, ReferenceTable},
};

/// Defines the line format of a report file.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ReportRow {
    pub code: String,
    pub name: String,
    pub total: Sum,
}

impl From<&Entry> for ReportRow {
    fn from(entry: &Entry) -> Self {
        Self {
            code: entry.code.clone(),
            name: entry.name.clone(),
            total: entry.sum,
        }
    }
}

/// Writes `table` to its report file in `dir`, replacing any existing one,
/// and returns the path written.
///
/// Each entry becomes one line, in definition order:
///
/// ```txt
/// CODE,NAME,TOTAL
/// ```
///
/// # Errors
///
/// Returns [`Error::Write`] if the file cannot be created, written or
/// flushed.
pub fn write_report(dir: impl AsRef<Path>, table: &ReferenceTable) -> Result<PathBuf> {
    let path = dir.as_ref().join(table.kind().report_file());
    let write_err = |e| Error::write(&path, csv_to_io(e));
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(&path)
        .map_err(write_err)?;
    for entry in table.entries() {
        wtr.serialize(ReportRow::from(entry)).map_err(write_err)?;
    }
    wtr.flush().map_err(|e| Error::write(&path, e))?;
    info!(path = %path.display(), lines = table.len(), "report written");
    Ok(path)
}

/// Reads a report file back.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read or a line isn't in
/// report format.
pub fn read_report(path: impl AsRef<Path>) -> Result<Vec<ReportRow>> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .quoting(false)
        .from_path(path)
        .map_err(|e| Error::from_csv(path, e))?;
    rdr.deserialize::<ReportRow>()
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| Error::from_csv(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableKind;

    fn branches() -> ReferenceTable {
        let mut table = ReferenceTable::new(TableKind::Branch);
        table.insert("003", "Osaka");
        table.insert("001", "Tokyo");
        table.insert("002", "Nagoya");
        table.set_sum("001", Sum::new(1_500));
        table.set_sum("003", Sum::new(9_999_999_999));
        table
    }

    #[test]
    fn write_report_fn_writes_lines_in_definition_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(dir.path(), &branches()).unwrap();
        assert_eq!(path, dir.path().join("branch.out"));
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "003,Osaka,9999999999\n001,Tokyo,1500\n002,Nagoya,0\n"
        );
    }

    #[test]
    fn write_report_fn_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("branch.out"), "stale\nstale\nstale\nstale\n").unwrap();
        let mut table = ReferenceTable::new(TableKind::Branch);
        table.insert("001", "Tokyo");
        let path = write_report(dir.path(), &table).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "001,Tokyo,0\n");
    }

    #[test]
    fn write_report_fn_writes_empty_file_for_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let table = ReferenceTable::new(TableKind::Commodity);
        let path = write_report(dir.path(), &table).unwrap();
        assert_eq!(path.file_name().unwrap(), "commodity.out");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "");
    }

    #[test]
    fn write_report_fn_fails_for_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_report(dir.path().join("gone"), &branches()).unwrap_err();
        assert!(matches!(err, Error::Write { .. }), "{err:?}");
        assert_eq!(err.to_string(), "An unexpected error has occurred");
    }

    #[test]
    fn read_report_fn_recovers_what_was_written() {
        let dir = tempfile::tempdir().unwrap();
        let table = branches();
        let path = write_report(dir.path(), &table).unwrap();
        let rows = read_report(path).unwrap();
        let expected: Vec<ReportRow> = table.entries().iter().map(ReportRow::from).collect();
        assert_eq!(rows, expected);
    }

    #[test]
    fn read_report_fn_rejects_non_numeric_total() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("branch.out");
        std::fs::write(&path, "001,Tokyo,lots\n").unwrap();
        assert!(matches!(read_report(path), Err(Error::Io { .. })));
    }
}
