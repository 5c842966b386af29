use thiserror::Error;

use crate::location::CellRef;

/// Failures raised while turning a table into records.
///
/// Every failure aborts the whole parse; no partial record lists are returned.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("no source id provided")]
    MissingSourceId,

    #[error("no table name provided")]
    MissingTableName,

    #[error("table has no header row")]
    EmptyTable,

    #[error("{at}: header '{header}' does not match any field of '{record}'")]
    FieldNotFound {
        at: CellRef,
        header: String,
        record: String,
    },

    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    #[error("{at}: invalid {kind} '{value}': {reason}")]
    InvalidNumber {
        at: CellRef,
        value: String,
        kind: &'static str,
        reason: String,
    },

    #[error("{at}: invalid boolean '{value}'")]
    InvalidBoolean { at: CellRef, value: String },

    #[error("{at}: invalid datetime '{value}'")]
    InvalidDateTime { at: CellRef, value: String },

    #[error("field '{field}' expects {expected} but received {found}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: &'static str,
    },

    #[error("record '{record}' has no field named '{field}'")]
    UnknownField { record: String, field: String },

    #[error(transparent)]
    Transport(anyhow::Error),

    #[error("{table}: {inner}")]
    Table {
        table: String,
        inner: Box<SheetError>,
    },
}

pub type Result<T, E = SheetError> = std::result::Result<T, E>;

impl SheetError {
    pub(crate) fn in_table(self, table: &str) -> Self {
        match self {
            SheetError::Table { .. } => self,
            other => SheetError::Table {
                table: table.to_string(),
                inner: Box::new(other),
            },
        }
    }

    /// Names the record field on a type mismatch raised while assigning it.
    #[doc(hidden)]
    pub fn with_field(self, name: &str) -> Self {
        match self {
            SheetError::TypeMismatch {
                field,
                expected,
                found,
            } if field.is_empty() => SheetError::TypeMismatch {
                field: name.to_string(),
                expected,
                found,
            },
            other => other,
        }
    }

    /// The underlying failure with any table context stripped.
    pub fn root(&self) -> &SheetError {
        match self {
            SheetError::Table { inner, .. } => inner.root(),
            other => other,
        }
    }

    /// Name of the table the failure occurred in, when known.
    pub fn table(&self) -> Option<&str> {
        match self {
            SheetError::Table { table, .. } => Some(table),
            _ => None,
        }
    }

    /// The offending cell for data and header failures.
    pub fn location(&self) -> Option<CellRef> {
        match self.root() {
            SheetError::FieldNotFound { at, .. }
            | SheetError::InvalidNumber { at, .. }
            | SheetError::InvalidBoolean { at, .. }
            | SheetError::InvalidDateTime { at, .. } => Some(*at),
            _ => None,
        }
    }
}
