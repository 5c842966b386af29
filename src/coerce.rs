//! Cell coercion: one string cell into one typed [`Value`].
//!
//! Empty cells give `Null` for optional fields and the zero value for strings,
//! numbers and booleans. A required datetime has no zero value and fails.

use std::{fmt::Display, str::FromStr};

use crate::{
    datetime::DatetimeFormats,
    error::SheetError,
    location::CellRef,
    schema::{FieldType, ScalarKind},
    value::Value,
};

pub fn coerce_cell(
    ty: &FieldType,
    cell: &str,
    formats: &DatetimeFormats,
    at: CellRef,
) -> Result<Value, SheetError> {
    match ty {
        FieldType::Optional(_) if cell.is_empty() => Ok(Value::Null),
        FieldType::Optional(inner) => coerce_cell(inner, cell, formats, at),
        FieldType::Scalar(kind) => coerce_scalar(*kind, cell, formats, at),
        FieldType::Record(_) | FieldType::List(_) => {
            Err(SheetError::UnsupportedType(ty.to_string()))
        }
    }
}

pub fn coerce_scalar(
    kind: ScalarKind,
    cell: &str,
    formats: &DatetimeFormats,
    at: CellRef,
) -> Result<Value, SheetError> {
    if cell.is_empty() && kind != ScalarKind::DateTime {
        return Ok(Value::zero(kind));
    }
    let value = match kind {
        ScalarKind::String => Value::String(cell.to_string()),
        ScalarKind::I8 => Value::I8(parse_number(kind, cell, at)?),
        ScalarKind::I16 => Value::I16(parse_number(kind, cell, at)?),
        ScalarKind::I32 => Value::I32(parse_number(kind, cell, at)?),
        ScalarKind::I64 => Value::I64(parse_number(kind, cell, at)?),
        ScalarKind::Isize => Value::Isize(parse_number(kind, cell, at)?),
        ScalarKind::U8 => Value::U8(parse_number(kind, cell, at)?),
        ScalarKind::U16 => Value::U16(parse_number(kind, cell, at)?),
        ScalarKind::U32 => Value::U32(parse_number(kind, cell, at)?),
        ScalarKind::U64 => Value::U64(parse_number(kind, cell, at)?),
        ScalarKind::Usize => Value::Usize(parse_number(kind, cell, at)?),
        ScalarKind::F32 => Value::F32(parse_number(kind, cell, at)?),
        ScalarKind::F64 => Value::F64(parse_number(kind, cell, at)?),
        ScalarKind::Bool => Value::Bool(parse_bool(cell).ok_or_else(|| {
            SheetError::InvalidBoolean {
                at,
                value: cell.to_string(),
            }
        })?),
        ScalarKind::DateTime => Value::DateTime(formats.parse(cell).ok_or_else(|| {
            SheetError::InvalidDateTime {
                at,
                value: cell.to_string(),
            }
        })?),
    };
    Ok(value)
}

fn parse_number<T>(kind: ScalarKind, cell: &str, at: CellRef) -> Result<T, SheetError>
where
    T: FromStr,
    T::Err: Display,
{
    cell.parse::<T>().map_err(|err| SheetError::InvalidNumber {
        at,
        value: cell.to_string(),
        kind: kind.as_str(),
        reason: err.to_string(),
    })
}

/// Case-insensitive `true|t|yes|y|1` and `false|f|no|n|0`.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}
