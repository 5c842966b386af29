#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use sheet_records::RawTable;
use tempfile::{TempDir, tempdir};

/// Builds a table from string literals, header first.
pub fn table(rows: &[&[&str]]) -> RawTable {
    RawTable::from_rows(rows.iter().map(|row| row.to_vec()))
}

/// Scratch directory acting as a CSV table source; cleaned up on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Root path, usable as a source id for `CsvDirectorySource`.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn source_id(&self) -> String {
        self.path().to_string_lossy().into_owned()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        self.write_bytes(name, contents.as_bytes())
    }

    pub fn write_bytes(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents).expect("write temp file contents");
        path
    }
}
