use anyhow::{Context, Result};
use log::info;

use crate::{cli::SchemaArgs, config::SheetOptions, schema::RecordType, table};

pub fn execute(args: &SchemaArgs) -> Result<()> {
    let record_type = RecordType::load(&args.schema)
        .with_context(|| format!("Loading schema from {:?}", args.schema))?;
    print!("{}", render(&record_type, args.table.as_deref()));
    info!(
        "Listed {} field(s) from {:?}",
        record_type.fields.len(),
        args.schema
    );
    Ok(())
}

pub fn render(record_type: &RecordType, table_name: Option<&str>) -> String {
    let mut options = SheetOptions::default();
    options.table_name = table_name.map(str::to_string);
    let resolved = options.resolve_table_name(&record_type.name);

    if record_type.fields.is_empty() {
        return format!("Record '{}' declares no fields\ntable: {resolved}\n", record_type.name);
    }

    let rows = record_type
        .fields
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let supported = match field.field_type.ensure_supported() {
                Ok(()) => String::new(),
                Err(_) => "unsupported".to_string(),
            };
            vec![
                (idx + 1).to_string(),
                field.name.clone(),
                field.display_name().to_string(),
                field.field_type.to_string(),
                supported,
            ]
        })
        .collect::<Vec<_>>();
    let headers = ["#", "field", "column", "type", "note"]
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();

    let mut output = table::render_table(&headers, &rows);
    output.push_str(&format!("table: {resolved}\n"));
    output
}
