use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{datetime::DatetimeFormats, naming::pluralize};

/// Where to read a table from and how to read its datetimes.
///
/// Loaded from YAML as:
///
/// ```yaml
/// source_id: 15PTbwnLdGJXb4kgLVVBtZ7HbK3QEj
/// table_name: Users        # optional; defaults to the pluralized record name
/// datetime_formats:        # optional; tried before the built-in defaults
///   - "%d.%m.%Y"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetOptions {
    #[serde(default)]
    pub source_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub datetime_formats: Vec<String>,
}

impl SheetOptions {
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            ..Self::default()
        }
    }

    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    pub fn with_datetime_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.datetime_formats = formats.into_iter().map(Into::into).collect();
        self
    }

    /// The configured table name, or the plural of `record_name` when unset.
    pub fn resolve_table_name(&self, record_name: &str) -> String {
        match self.table_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => pluralize(record_name),
        }
    }

    /// Configured formats followed by the built-in defaults.
    pub fn datetime_formats(&self) -> DatetimeFormats {
        DatetimeFormats::new(self.datetime_formats.iter().cloned())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening options file {path:?}"))?;
        let reader = BufReader::new(file);
        serde_yaml::from_reader(reader).context("Parsing options YAML")
    }
}
