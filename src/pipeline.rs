//! Sheet-to-records pipeline.
//!
//! One call runs fetch, header resolution, width normalization, cell coercion
//! and record assembly, in that order, and keeps no state between calls. The
//! first failure aborts the call; no partial record list is ever returned.

use log::{debug, info};

use crate::{
    coerce::coerce_cell,
    config::SheetOptions,
    datetime::DatetimeFormats,
    error::SheetError,
    header::{FieldMapping, resolve_headers},
    location::CellRef,
    record::{DynamicRecord, Record},
    schema::RecordType,
    source::{RawTable, SheetSource},
    value::Value,
};

/// Parses tables from `source` according to `options`.
#[derive(Debug, Clone)]
pub struct SheetParser<S> {
    source: S,
    options: SheetOptions,
}

impl<S: SheetSource> SheetParser<S> {
    pub fn new(source: S, options: SheetOptions) -> Self {
        Self { source, options }
    }

    pub fn options(&self) -> &SheetOptions {
        &self.options
    }

    /// Parses the configured table into records of `R`.
    pub fn parse_into<R: Record>(&self) -> Result<Vec<R>, SheetError> {
        self.run(R::record_type(), assemble_record::<R>)
    }

    /// Parses the configured table against a schema known only at run time.
    pub fn parse_dynamic(&self, record_type: &RecordType) -> Result<Vec<DynamicRecord>, SheetError> {
        self.run(record_type, |record_type, assignments| {
            let mut record = DynamicRecord::new(record_type);
            for (field, value) in assignments {
                record.set(field, value);
            }
            Ok(record)
        })
    }

    fn run<T, F>(&self, record_type: &RecordType, assemble: F) -> Result<Vec<T>, SheetError>
    where
        F: FnMut(&RecordType, Vec<(usize, Value)>) -> Result<T, SheetError>,
    {
        let table_name = self.options.resolve_table_name(&record_type.name);
        if self.options.source_id.trim().is_empty() {
            return Err(SheetError::MissingSourceId);
        }
        if table_name.is_empty() {
            return Err(SheetError::MissingTableName);
        }
        record_type.validate()?;

        info!(
            "Parsing table '{}' from source '{}' into '{}'",
            table_name, self.options.source_id, record_type.name
        );
        let table = self
            .source
            .fetch(&self.options.source_id, &table_name)
            .map_err(|err| SheetError::Transport(err).in_table(&table_name))?;

        let formats = self.options.datetime_formats();
        let records = decode_table(record_type, table, &formats, assemble)
            .map_err(|err| err.in_table(&table_name))?;
        info!(
            "Parsed {} record(s) from table '{}'",
            records.len(),
            table_name
        );
        Ok(records)
    }
}

/// Parses `R` records from the table named by `options` in `source`.
pub fn parse_into<R, S>(source: &S, options: &SheetOptions) -> Result<Vec<R>, SheetError>
where
    R: Record,
    S: SheetSource + ?Sized,
{
    SheetParser::new(source, options.clone()).parse_into::<R>()
}

/// Parses an already fetched table into records of `R`.
///
/// Errors carry cell locations but no table name.
pub fn records_from_table<R: Record>(
    table: RawTable,
    formats: &DatetimeFormats,
) -> Result<Vec<R>, SheetError> {
    let record_type = R::record_type();
    record_type.validate()?;
    decode_table(record_type, table, formats, assemble_record::<R>)
}

fn assemble_record<R: Record>(
    record_type: &RecordType,
    assignments: Vec<(usize, Value)>,
) -> Result<R, SheetError> {
    let mut record = R::default();
    for (field, value) in assignments {
        record.set_field(&record_type.fields[field].name, value)?;
    }
    Ok(record)
}

fn decode_table<T, F>(
    record_type: &RecordType,
    mut table: RawTable,
    formats: &DatetimeFormats,
    mut assemble: F,
) -> Result<Vec<T>, SheetError>
where
    F: FnMut(&RecordType, Vec<(usize, Value)>) -> Result<T, SheetError>,
{
    table.ensure_header()?;
    let mapping = resolve_headers(record_type, &table.rows()[0])?;
    debug!(
        "Resolved {} column(s): {}",
        mapping.len(),
        describe_mapping(&mapping, record_type)
    );

    table.normalize();

    let mut records = Vec::with_capacity(table.data_rows().len());
    for (offset, row) in table.data_rows().iter().enumerate() {
        // Data rows start directly after the header.
        let row_index = offset + 1;
        let assignments = mapping
            .iter()
            .map(|binding| {
                let field = &record_type.fields[binding.field];
                let at = CellRef::from_table_index(binding.column, row_index);
                coerce_cell(&field.field_type, &row[binding.column], formats, at)
                    .map(|value| (binding.field, value))
            })
            .collect::<Result<Vec<_>, _>>()?;
        records.push(assemble(record_type, assignments)?);
    }
    debug!("Decoded {} data row(s)", records.len());
    Ok(records)
}

fn describe_mapping(mapping: &FieldMapping, record_type: &RecordType) -> String {
    mapping
        .fields(record_type)
        .map(|(column, field)| format!("{}={}", CellRef::header(column).column_label(), field.name))
        .collect::<Vec<_>>()
        .join(", ")
}
