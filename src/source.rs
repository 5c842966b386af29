//! Raw tables and the sources that fetch them. [`CsvDirectorySource`] reads
//! `<table>.csv` or `<table>.tsv` from the directory named by the source id.

use std::{
    collections::HashMap,
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow, bail};
use encoding_rs::{Encoding, UTF_8};
use log::debug;

use crate::error::SheetError;

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

/// A grid of string cells. Row 0 is the header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Builds a table from string slices, mostly for tests and examples.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Rows after the header.
    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or_default()
    }

    /// Length of the widest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Pads every row with empty cells up to the width of the widest row.
    pub fn normalize(&mut self) {
        let width = self.width();
        for row in &mut self.rows {
            row.resize(width, String::new());
        }
    }

    pub(crate) fn ensure_header(&self) -> Result<(), SheetError> {
        if self.is_empty() {
            Err(SheetError::EmptyTable)
        } else {
            Ok(())
        }
    }
}

/// Fetches raw tables by source id and table name.
///
/// Retries, timeouts and cancellation are the implementor's concern; the
/// pipeline calls `fetch` once per parse and surfaces any error unchanged.
pub trait SheetSource {
    fn fetch(&self, source_id: &str, table_name: &str) -> Result<RawTable>;
}

impl<S: SheetSource + ?Sized> SheetSource for &S {
    fn fetch(&self, source_id: &str, table_name: &str) -> Result<RawTable> {
        (**self).fetch(source_id, table_name)
    }
}

impl<S: SheetSource + ?Sized> SheetSource for Box<S> {
    fn fetch(&self, source_id: &str, table_name: &str) -> Result<RawTable> {
        (**self).fetch(source_id, table_name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: HashMap<(String, String), RawTable>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        source_id: impl Into<String>,
        table_name: impl Into<String>,
        table: RawTable,
    ) -> &mut Self {
        self.tables
            .insert((source_id.into(), table_name.into()), table);
        self
    }

    pub fn with_table(
        mut self,
        source_id: impl Into<String>,
        table_name: impl Into<String>,
        table: RawTable,
    ) -> Self {
        self.insert(source_id, table_name, table);
        self
    }
}

impl SheetSource for MemorySource {
    fn fetch(&self, source_id: &str, table_name: &str) -> Result<RawTable> {
        self.tables
            .get(&(source_id.to_string(), table_name.to_string()))
            .cloned()
            .ok_or_else(|| anyhow!("Table '{table_name}' not found in source '{source_id}'"))
    }
}

#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    delimiter: Option<u8>,
    encoding: &'static Encoding,
}

impl Default for CsvDirectorySource {
    fn default() -> Self {
        Self {
            delimiter: None,
            encoding: UTF_8,
        }
    }
}

impl CsvDirectorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the extension-based delimiter.
    pub fn with_delimiter(mut self, delimiter: Option<u8>) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Finds `<table>.csv`, then `<table>.tsv`, under `directory`.
    pub fn table_path(&self, directory: &Path, table_name: &str) -> Result<PathBuf> {
        for extension in ["csv", "tsv"] {
            let candidate = directory.join(format!("{table_name}.{extension}"));
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
        bail!("No table file named '{table_name}.csv' or '{table_name}.tsv' in {directory:?}")
    }

    pub fn read_table(&self, path: &Path) -> Result<RawTable> {
        let file = File::open(path).with_context(|| format!("Opening table file {path:?}"))?;
        let delimiter = resolve_input_delimiter(path, self.delimiter);
        let rows = read_rows(BufReader::new(file), delimiter, self.encoding)
            .with_context(|| format!("Reading table file {path:?}"))?;
        debug!("Read {} row(s) from {:?}", rows.len(), path);
        Ok(RawTable::new(rows))
    }
}

impl SheetSource for CsvDirectorySource {
    fn fetch(&self, source_id: &str, table_name: &str) -> Result<RawTable> {
        let path = self.table_path(Path::new(source_id), table_name)?;
        self.read_table(&path)
    }
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

/// Reads every record, headers included, without enforcing equal widths.
pub fn read_rows<R: Read>(
    reader: R,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true)
        .from_reader(reader);
    let mut rows = Vec::new();
    let mut record = csv::ByteRecord::new();
    while reader.read_byte_record(&mut record)? {
        rows.push(decode_record(&record, encoding)?);
    }
    Ok(rows)
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_pads_short_rows_with_empty_cells() {
        let mut table = RawTable::from_rows(vec![
            vec!["a", "b", "c"],
            vec!["1"],
            vec!["1", "2", "3", "4"],
        ]);
        assert_eq!(table.width(), 4);
        table.normalize();
        assert!(table.rows().iter().all(|row| row.len() == 4));
        assert_eq!(table.rows()[1], vec!["1", "", "", ""]);
        assert_eq!(table.rows()[0][3], "");
    }

    #[test]
    fn data_rows_exclude_header() {
        let table = RawTable::from_rows(vec![vec!["h"], vec!["1"], vec!["2"]]);
        assert_eq!(table.header().unwrap(), ["h".to_string()]);
        assert_eq!(table.data_rows().len(), 2);
        assert!(RawTable::default().data_rows().is_empty());
    }

    #[test]
    fn memory_source_reports_missing_tables() {
        let source = MemorySource::new().with_table(
            "sheet-1",
            "Users",
            RawTable::from_rows(vec![vec!["ID"]]),
        );
        assert!(source.fetch("sheet-1", "Users").is_ok());
        let err = source.fetch("sheet-1", "Orders").expect_err("missing");
        assert!(err.to_string().contains("'Orders'"));
    }

    #[test]
    fn read_rows_accepts_ragged_records() {
        let data = "id,name,active\n1,Ada\n2,Grace,false,extra\n";
        let rows = read_rows(data.as_bytes(), b',', UTF_8).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], vec!["1", "Ada"]);
        assert_eq!(rows[2].len(), 4);
    }

    #[test]
    fn read_rows_decodes_legacy_encodings() {
        let (encoded, _, _) = encoding_rs::WINDOWS_1252.encode("name\ncafé\n");
        let rows = read_rows(encoded.as_ref(), b',', encoding_rs::WINDOWS_1252).unwrap();
        assert_eq!(rows[1], vec!["café"]);
    }

    #[test]
    fn tsv_extension_selects_tab_delimiter() {
        assert_eq!(
            resolve_input_delimiter(Path::new("Users.tsv"), None),
            DEFAULT_TSV_DELIMITER
        );
        assert_eq!(
            resolve_input_delimiter(Path::new("Users.tsv"), Some(b';')),
            b';'
        );
        assert_eq!(
            resolve_input_delimiter(Path::new("Users.csv"), None),
            DEFAULT_CSV_DELIMITER
        );
    }
}
