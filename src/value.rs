use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use crate::{
    error::SheetError,
    schema::{FieldType, ScalarKind},
};

/// A coerced cell. `Null` is the absent value of an optional field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Usize(usize),
    F32(f32),
    F64(f64),
    Bool(bool),
    DateTime(DateTime<FixedOffset>),
    Null,
}

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::String(_) => ScalarKind::String.as_str(),
            Value::I8(_) => ScalarKind::I8.as_str(),
            Value::I16(_) => ScalarKind::I16.as_str(),
            Value::I32(_) => ScalarKind::I32.as_str(),
            Value::I64(_) => ScalarKind::I64.as_str(),
            Value::Isize(_) => ScalarKind::Isize.as_str(),
            Value::U8(_) => ScalarKind::U8.as_str(),
            Value::U16(_) => ScalarKind::U16.as_str(),
            Value::U32(_) => ScalarKind::U32.as_str(),
            Value::U64(_) => ScalarKind::U64.as_str(),
            Value::Usize(_) => ScalarKind::Usize.as_str(),
            Value::F32(_) => ScalarKind::F32.as_str(),
            Value::F64(_) => ScalarKind::F64.as_str(),
            Value::Bool(_) => ScalarKind::Bool.as_str(),
            Value::DateTime(_) => ScalarKind::DateTime.as_str(),
            Value::Null => "null",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The value an unmapped field of `ty` holds.
    pub fn default_for(ty: &FieldType) -> Value {
        match ty {
            FieldType::Scalar(kind) => Value::zero(*kind),
            FieldType::Optional(_) | FieldType::Record(_) | FieldType::List(_) => Value::Null,
        }
    }

    /// Zero value of a scalar kind. Datetimes have none and yield `Null`.
    pub fn zero(kind: ScalarKind) -> Value {
        match kind {
            ScalarKind::String => Value::String(String::new()),
            ScalarKind::I8 => Value::I8(0),
            ScalarKind::I16 => Value::I16(0),
            ScalarKind::I32 => Value::I32(0),
            ScalarKind::I64 => Value::I64(0),
            ScalarKind::Isize => Value::Isize(0),
            ScalarKind::U8 => Value::U8(0),
            ScalarKind::U16 => Value::U16(0),
            ScalarKind::U32 => Value::U32(0),
            ScalarKind::U64 => Value::U64(0),
            ScalarKind::Usize => Value::Usize(0),
            ScalarKind::F32 => Value::F32(0.0),
            ScalarKind::F64 => Value::F64(0.0),
            ScalarKind::Bool => Value::Bool(false),
            ScalarKind::DateTime => Value::Null,
        }
    }

    pub fn as_display(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::I8(v) => v.to_string(),
            Value::I16(v) => v.to_string(),
            Value::I32(v) => v.to_string(),
            Value::I64(v) => v.to_string(),
            Value::Isize(v) => v.to_string(),
            Value::U8(v) => v.to_string(),
            Value::U16(v) => v.to_string(),
            Value::U32(v) => v.to_string(),
            Value::U64(v) => v.to_string(),
            Value::Usize(v) => v.to_string(),
            Value::F32(v) => v.to_string(),
            Value::F64(v) => v.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S %z").to_string(),
            Value::Null => String::new(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

/// A Rust type that can be a record field.
///
/// `field_type` describes the column to the coercion engine; `from_value`
/// converts the coerced [`Value`] back into the field's type.
pub trait CellValue: Sized {
    fn field_type() -> FieldType;

    fn from_value(value: Value) -> Result<Self, SheetError>;
}

fn mismatch(expected: FieldType, found: &Value) -> SheetError {
    SheetError::TypeMismatch {
        field: String::new(),
        expected: expected.to_string(),
        found: found.kind_name(),
    }
}

macro_rules! scalar_cell_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl CellValue for $ty {
                fn field_type() -> FieldType {
                    FieldType::Scalar(ScalarKind::$variant)
                }

                fn from_value(value: Value) -> Result<Self, SheetError> {
                    match value {
                        Value::$variant(inner) => Ok(inner),
                        other => Err(mismatch(Self::field_type(), &other)),
                    }
                }
            }
        )*
    };
}

scalar_cell_value! {
    String => String,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    bool => Bool,
    DateTime<FixedOffset> => DateTime,
}

impl CellValue for DateTime<Utc> {
    fn field_type() -> FieldType {
        FieldType::Scalar(ScalarKind::DateTime)
    }

    fn from_value(value: Value) -> Result<Self, SheetError> {
        DateTime::<FixedOffset>::from_value(value).map(|dt| dt.with_timezone(&Utc))
    }
}

/// Wall-clock time as written in the cell, with any offset dropped.
impl CellValue for NaiveDateTime {
    fn field_type() -> FieldType {
        FieldType::Scalar(ScalarKind::DateTime)
    }

    fn from_value(value: Value) -> Result<Self, SheetError> {
        DateTime::<FixedOffset>::from_value(value).map(|dt| dt.naive_local())
    }
}

impl CellValue for NaiveDate {
    fn field_type() -> FieldType {
        FieldType::Scalar(ScalarKind::DateTime)
    }

    fn from_value(value: Value) -> Result<Self, SheetError> {
        DateTime::<FixedOffset>::from_value(value).map(|dt| dt.date_naive())
    }
}

impl<T: CellValue> CellValue for Option<T> {
    fn field_type() -> FieldType {
        FieldType::optional(T::field_type())
    }

    fn from_value(value: Value) -> Result<Self, SheetError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: CellValue> CellValue for Vec<T> {
    fn field_type() -> FieldType {
        FieldType::List(Box::new(T::field_type()))
    }

    fn from_value(_value: Value) -> Result<Self, SheetError> {
        Err(SheetError::UnsupportedType(Self::field_type().to_string()))
    }
}
