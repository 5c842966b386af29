use std::{fmt, fs::File, io::BufReader, path::Path, str::FromStr};

use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::error::SheetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Bool,
    DateTime,
}

impl ScalarKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::Isize => "isize",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::Usize => "usize",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
            ScalarKind::Bool => "bool",
            ScalarKind::DateTime => "datetime",
        }
    }

    pub fn variants() -> &'static [&'static str] {
        &[
            "string", "i8", "i16", "i32", "i64", "isize", "u8", "u16", "u32", "u64", "usize",
            "f32", "f64", "bool", "datetime",
        ]
    }

    fn from_token(token: &str) -> Option<Self> {
        let kind = match token.to_ascii_lowercase().as_str() {
            "string" | "str" | "text" => ScalarKind::String,
            "i8" | "int8" => ScalarKind::I8,
            "i16" | "int16" => ScalarKind::I16,
            "i32" | "int32" => ScalarKind::I32,
            "i64" | "int64" | "integer" => ScalarKind::I64,
            "isize" | "int" => ScalarKind::Isize,
            "u8" | "uint8" => ScalarKind::U8,
            "u16" | "uint16" => ScalarKind::U16,
            "u32" | "uint32" => ScalarKind::U32,
            "u64" | "uint64" => ScalarKind::U64,
            "usize" | "uint" => ScalarKind::Usize,
            "f32" | "float32" => ScalarKind::F32,
            "f64" | "float64" | "float" | "double" => ScalarKind::F64,
            "bool" | "boolean" => ScalarKind::Bool,
            "datetime" | "timestamp" | "date-time" => ScalarKind::DateTime,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared type of a record field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Scalar(ScalarKind),
    /// Empty cells become absent; anything else parses as the inner type.
    Optional(Box<FieldType>),
    /// A nested record. Describable so that schemas can be rejected cleanly.
    Record(String),
    /// A container of values. Describable but never coerced.
    List(Box<FieldType>),
}

impl FieldType {
    pub fn optional(inner: FieldType) -> Self {
        FieldType::Optional(Box::new(inner))
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, FieldType::Optional(_))
    }

    /// Fails with [`SheetError::UnsupportedType`] naming the first type the
    /// coercion engine cannot produce.
    pub fn ensure_supported(&self) -> Result<(), SheetError> {
        match self {
            FieldType::Scalar(_) => Ok(()),
            FieldType::Optional(inner) => inner.ensure_supported(),
            FieldType::Record(_) | FieldType::List(_) => {
                Err(SheetError::UnsupportedType(self.to_string()))
            }
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Scalar(kind) => write!(f, "{kind}"),
            FieldType::Optional(inner) => write!(f, "option<{inner}>"),
            FieldType::Record(name) => f.write_str(name),
            FieldType::List(inner) => write!(f, "list<{inner}>"),
        }
    }
}

impl FromStr for FieldType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            bail!("Field type must not be empty");
        }
        if let Some(inner) = trimmed.strip_suffix('?') {
            return Ok(FieldType::optional(inner.parse()?));
        }
        if let Some(inner) = generic_argument(trimmed, &["option", "optional"])? {
            return Ok(FieldType::optional(inner.parse()?));
        }
        if let Some(inner) = generic_argument(trimmed, &["list", "vec"])? {
            return Ok(FieldType::List(Box::new(inner.parse()?)));
        }
        if let Some(kind) = ScalarKind::from_token(trimmed) {
            return Ok(FieldType::Scalar(kind));
        }
        let is_identifier = trimmed
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && trimmed.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if is_identifier {
            return Ok(FieldType::Record(trimmed.to_string()));
        }
        Err(anyhow!(
            "Unknown field type '{value}'. Supported types: {}, option<T>, T?",
            ScalarKind::variants().join(", ")
        ))
    }
}

/// Returns the argument of `wrapper<arg>` when `value` uses one of `wrappers`.
fn generic_argument<'a>(value: &'a str, wrappers: &[&str]) -> Result<Option<&'a str>> {
    let Some(open) = value.find('<') else {
        return Ok(None);
    };
    let wrapper = value[..open].trim();
    if !wrappers.iter().any(|w| w.eq_ignore_ascii_case(wrapper)) {
        return Ok(None);
    }
    let inner = value[open + 1..]
        .strip_suffix('>')
        .ok_or_else(|| anyhow!("Field type '{value}' must close with '>'"))?;
    Ok(Some(inner))
}

impl Serialize for FieldType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = String::deserialize(deserializer)?;
        FieldType::from_str(&token).map_err(|err| de::Error::custom(err.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    /// Explicit column header; takes priority over `name` during resolution.
    #[serde(default, alias = "alias", skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            column: None,
            field_type,
        }
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn column_alias(&self) -> Option<&str> {
        self.column.as_deref().filter(|value| !value.is_empty())
    }

    /// Header text this field is displayed under.
    pub fn display_name(&self) -> &str {
        self.column_alias().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordType {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

impl RecordType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Ensures every declared field can be coerced from a cell.
    pub fn validate(&self) -> Result<(), SheetError> {
        self.fields
            .iter()
            .try_for_each(|field| field.field_type.ensure_supported())
    }

    /// Reads `{ name, fields: [{ name, column?, type }] }` YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening schema file {path:?}"))?;
        let reader = BufReader::new(file);
        let record_type: RecordType =
            serde_yaml::from_reader(reader).context("Parsing schema YAML")?;
        Ok(record_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_type_parses_scalars_and_aliases() {
        assert_eq!(
            "u32".parse::<FieldType>().unwrap(),
            FieldType::Scalar(ScalarKind::U32)
        );
        assert_eq!(
            "uint".parse::<FieldType>().unwrap(),
            FieldType::Scalar(ScalarKind::Usize)
        );
        assert_eq!(
            "Boolean".parse::<FieldType>().unwrap(),
            FieldType::Scalar(ScalarKind::Bool)
        );
        assert_eq!(
            "float".parse::<FieldType>().unwrap(),
            FieldType::Scalar(ScalarKind::F64)
        );
    }

    #[test]
    fn field_type_parses_optional_forms() {
        let expected = FieldType::optional(FieldType::Scalar(ScalarKind::DateTime));
        assert_eq!("datetime?".parse::<FieldType>().unwrap(), expected);
        assert_eq!("option<datetime>".parse::<FieldType>().unwrap(), expected);
        assert_eq!("Optional< timestamp >".parse::<FieldType>().unwrap(), expected);
    }

    #[test]
    fn field_type_treats_unknown_identifiers_as_records() {
        assert_eq!(
            "Address".parse::<FieldType>().unwrap(),
            FieldType::Record("Address".to_string())
        );
        assert_eq!(
            "vec<u8>".parse::<FieldType>().unwrap(),
            FieldType::List(Box::new(FieldType::Scalar(ScalarKind::U8)))
        );
        assert!("not a type".parse::<FieldType>().is_err());
        assert!("option<u8".parse::<FieldType>().is_err());
    }

    #[test]
    fn field_type_display_round_trips_through_from_str() {
        let ty = FieldType::optional(FieldType::List(Box::new(FieldType::Record(
            "Tag".to_string(),
        ))));
        assert_eq!(ty.to_string(), "option<list<Tag>>");
        assert_eq!(ty.to_string().parse::<FieldType>().unwrap(), ty);
    }

    #[test]
    fn ensure_supported_names_the_nested_type() {
        let nested = FieldType::optional(FieldType::Record("Address".to_string()));
        match nested.ensure_supported() {
            Err(SheetError::UnsupportedType(name)) => assert_eq!(name, "Address"),
            other => panic!("expected unsupported type, got {other:?}"),
        }
        assert!(
            FieldType::optional(FieldType::Scalar(ScalarKind::I8))
                .ensure_supported()
                .is_ok()
        );
    }

    #[test]
    fn record_type_deserializes_from_yaml() {
        let yaml = r#"
name: User
fields:
  - name: id
    type: u32
  - name: created_at
    column: Created At
    type: datetime?
"#;
        let record: RecordType = serde_yaml::from_str(yaml).expect("parse schema");
        assert_eq!(record.name, "User");
        assert_eq!(record.fields.len(), 2);
        assert_eq!(record.fields[1].display_name(), "Created At");
        assert!(record.fields[1].field_type.is_optional());
        assert!(record.validate().is_ok());
    }

    #[test]
    fn empty_column_alias_falls_back_to_name() {
        let field = FieldDef::new("email", FieldType::Scalar(ScalarKind::String)).with_column("");
        assert_eq!(field.column_alias(), None);
        assert_eq!(field.display_name(), "email");
    }
}
