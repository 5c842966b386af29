use crate::{
    error::SheetError,
    location::CellRef,
    schema::{FieldDef, RecordType},
};

/// One consumed header column and the field it resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnBinding {
    pub column: usize,
    pub field: usize,
}

/// Column-to-field correspondence in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMapping {
    bindings: Vec<ColumnBinding>,
}

impl FieldMapping {
    pub fn bindings(&self) -> &[ColumnBinding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnBinding> {
        self.bindings.iter()
    }

    /// Resolved fields paired with their columns.
    pub fn fields<'a>(
        &'a self,
        record_type: &'a RecordType,
    ) -> impl Iterator<Item = (usize, &'a FieldDef)> + 'a {
        self.bindings
            .iter()
            .map(move |binding| (binding.column, &record_type.fields[binding.field]))
    }
}

/// Resolves each leading non-empty header against `record_type`.
///
/// Resolution stops at the first empty header; columns after it are ignored.
/// A header matches a field's explicit column alias, else a field's name, both
/// exactly. Within each step the first declared field wins.
pub fn resolve_headers(
    record_type: &RecordType,
    headers: &[String],
) -> Result<FieldMapping, SheetError> {
    let mut bindings = Vec::with_capacity(headers.len());
    for (column, header) in headers.iter().enumerate() {
        if header.is_empty() {
            break;
        }
        let field = find_field(record_type, header).ok_or_else(|| SheetError::FieldNotFound {
            at: CellRef::header(column),
            header: header.clone(),
            record: record_type.name.clone(),
        })?;
        bindings.push(ColumnBinding { column, field });
    }
    Ok(FieldMapping { bindings })
}

pub fn find_field(record_type: &RecordType, header: &str) -> Option<usize> {
    let fields = &record_type.fields;
    fields
        .iter()
        .position(|f| f.column_alias() == Some(header))
        .or_else(|| fields.iter().position(|f| f.name == header))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldType, ScalarKind};

    fn user_type() -> RecordType {
        RecordType::new("User")
            .field(FieldDef::new("ID", FieldType::Scalar(ScalarKind::U32)))
            .field(FieldDef::new("Name", FieldType::Scalar(ScalarKind::String)))
            .field(
                FieldDef::new("created_at", FieldType::Scalar(ScalarKind::DateTime))
                    .with_column("Created At"),
            )
    }

    fn headers(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn resolves_by_alias_and_name_in_header_order() {
        let record = user_type();
        let mapping = resolve_headers(&record, &headers(&["Created At", "ID", "Name"])).unwrap();
        assert_eq!(
            mapping.bindings(),
            &[
                ColumnBinding { column: 0, field: 2 },
                ColumnBinding { column: 1, field: 0 },
                ColumnBinding { column: 2, field: 1 },
            ]
        );
    }

    #[test]
    fn stops_at_first_empty_header() {
        let record = user_type();
        let mapping =
            resolve_headers(&record, &headers(&["ID", "", "Unknown Column"])).unwrap();
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn alias_beats_a_field_with_the_same_name() {
        let record = RecordType::new("Row")
            .field(FieldDef::new("Label", FieldType::Scalar(ScalarKind::String)))
            .field(FieldDef::new("title", FieldType::Scalar(ScalarKind::String)).with_column("Label"));
        let mapping = resolve_headers(&record, &headers(&["Label"])).unwrap();
        assert_eq!(mapping.bindings()[0].field, 1);
    }

    #[test]
    fn duplicate_aliases_resolve_to_first_declared_field() {
        let record = RecordType::new("Row")
            .field(FieldDef::new("first", FieldType::Scalar(ScalarKind::String)).with_column("Dup"))
            .field(FieldDef::new("second", FieldType::Scalar(ScalarKind::String)).with_column("Dup"));
        let mapping = resolve_headers(&record, &headers(&["Dup"])).unwrap();
        assert_eq!(mapping.bindings()[0].field, 0);
    }

    #[test]
    fn header_must_match_name_exactly() {
        let record = RecordType::new("Row")
            .field(FieldDef::new("foo", FieldType::Scalar(ScalarKind::String)))
            .field(FieldDef::new("user_id", FieldType::Scalar(ScalarKind::U64)));
        let err = resolve_headers(&record, &headers(&["Foo", "User ID", "USER-ID"]))
            .expect_err("case differs");
        match err {
            SheetError::FieldNotFound { at, header, .. } => {
                assert_eq!(at.to_string(), "A1");
                assert_eq!(header, "Foo");
            }
            other => panic!("expected FieldNotFound, got {other:?}"),
        }

        let err = resolve_headers(&record, &headers(&["foo", "User ID"])).expect_err("spaced");
        assert_eq!(err.location().map(|at| at.to_string()).as_deref(), Some("B1"));
    }

    #[test]
    fn unknown_header_reports_column_letter_and_header_row() {
        let record = user_type();
        let err = resolve_headers(&record, &headers(&["ID", "Foo"])).expect_err("unknown");
        match &err {
            SheetError::FieldNotFound { at, header, record } => {
                assert_eq!(at.to_string(), "B1");
                assert_eq!(header, "Foo");
                assert_eq!(record, "User");
            }
            other => panic!("expected FieldNotFound, got {other:?}"),
        }
    }
}
