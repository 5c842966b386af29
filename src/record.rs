//! Target records: the [`Record`] trait, the [`sheet_record!`] macro that
//! implements it, and [`DynamicRecord`] for schemas loaded at run time.

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{
    error::SheetError,
    schema::RecordType,
    value::Value,
};

pub trait Record: Default {
    /// The registered description, built once per type.
    fn record_type() -> &'static RecordType;

    /// Assigns a coerced value to the field called `field`.
    fn set_field(&mut self, field: &str, value: Value) -> Result<(), SheetError>;
}

/// Declares a struct and implements [`Record`] for it.
///
/// A field attribute `#[column = "Header Text"]` sets the field's column alias;
/// any other field attributes, doc comments included, are kept on the struct.
/// Field types implement [`CellValue`](crate::value::CellValue) and the struct
/// must implement `Default`. The struct also implements `CellValue` as a nested
/// record type, which a parse rejects with [`SheetError::UnsupportedType`].
#[macro_export]
macro_rules! sheet_record {
    (@column column = $column:literal) => {
        ::std::option::Option::Some($column)
    };
    (@column $($other:tt)*) => {
        ::std::option::Option::None
    };

    (@strip { $($head:tt)* } { $($out:tt)* }) => {
        $($head)* { $($out)* }
    };
    (@strip $head:tt { $($out:tt)* }
        { [ #[column = $column:literal] $($attrs:tt)* ] $($decl:tt)* } $($rest:tt)*) => {
        $crate::sheet_record! { @strip $head { $($out)* } { [ $($attrs)* ] $($decl)* } $($rest)* }
    };
    (@strip $head:tt { $($out:tt)* }
        { [ #[$($attr:tt)*] $($attrs:tt)* ] $($decl:tt)* } $($rest:tt)*) => {
        $crate::sheet_record! {
            @strip $head { $($out)* #[$($attr)*] } { [ $($attrs)* ] $($decl)* } $($rest)*
        }
    };
    (@strip $head:tt { $($out:tt)* } { [] $($decl:tt)* } $($rest:tt)*) => {
        $crate::sheet_record! { @strip $head { $($out)* $($decl)* , } $($rest)* }
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$($field_attr:tt)*])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $crate::sheet_record! {
            @strip { $(#[$meta])* $vis struct $name }
            {}
            $( { [ $(#[$($field_attr)*])* ] $field_vis $field : $ty } )*
        }

        impl $crate::record::Record for $name {
            fn record_type() -> &'static $crate::schema::RecordType {
                static RECORD_TYPE: ::std::sync::OnceLock<$crate::schema::RecordType> =
                    ::std::sync::OnceLock::new();
                RECORD_TYPE.get_or_init(|| {
                    $crate::schema::RecordType::new(stringify!($name))
                        $(
                            .field({
                                let field = $crate::schema::FieldDef::new(
                                    stringify!($field),
                                    <$ty as $crate::value::CellValue>::field_type(),
                                );
                                let column: ::std::option::Option<&'static str> =
                                    ::std::option::Option::None
                                    $(.or($crate::sheet_record!(@column $($field_attr)*)))*;
                                match column {
                                    ::std::option::Option::Some(column) => field.with_column(column),
                                    ::std::option::Option::None => field,
                                }
                            })
                        )*
                })
            }

            fn set_field(
                &mut self,
                field: &str,
                value: $crate::value::Value,
            ) -> ::std::result::Result<(), $crate::error::SheetError> {
                match field {
                    $(
                        stringify!($field) => {
                            self.$field = <$ty as $crate::value::CellValue>::from_value(value)
                                .map_err(|err| err.with_field(field))?;
                        }
                    )*
                    other => {
                        return Err($crate::error::SheetError::UnknownField {
                            record: stringify!($name).to_string(),
                            field: other.to_string(),
                        });
                    }
                }
                Ok(())
            }
        }

        impl $crate::value::CellValue for $name {
            fn field_type() -> $crate::schema::FieldType {
                $crate::schema::FieldType::Record(stringify!($name).to_string())
            }

            fn from_value(
                _value: $crate::value::Value,
            ) -> ::std::result::Result<Self, $crate::error::SheetError> {
                Err($crate::error::SheetError::UnsupportedType(
                    stringify!($name).to_string(),
                ))
            }
        }
    };
}

/// A record of a run-time schema: one value per declared field, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicRecord {
    names: Vec<String>,
    values: Vec<Value>,
}

impl DynamicRecord {
    /// Every field set to the default value of its type.
    pub fn new(record_type: &RecordType) -> Self {
        Self {
            names: record_type.fields.iter().map(|f| f.name.clone()).collect(),
            values: record_type
                .fields
                .iter()
                .map(|f| Value::default_for(&f.field_type))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| &self.values[idx])
    }

    pub fn set(&mut self, index: usize, value: Value) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
        }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.names.iter().map(String::as_str).zip(self.values.iter())
    }
}

impl Serialize for DynamicRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
