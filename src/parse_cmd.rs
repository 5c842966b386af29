use anyhow::{Context, Result};
use log::info;

use crate::{
    cli::{OutputFormat, ParseArgs},
    config::SheetOptions,
    pipeline::SheetParser,
    schema::RecordType,
    source::{CsvDirectorySource, resolve_encoding},
    table,
};

pub fn execute(args: &ParseArgs) -> Result<()> {
    let record_type = RecordType::load(&args.schema)
        .with_context(|| format!("Loading schema from {:?}", args.schema))?;
    let options = resolve_options(args)?;
    let encoding = resolve_encoding(args.input_encoding.as_deref())?;
    let source = CsvDirectorySource::new()
        .with_delimiter(args.delimiter)
        .with_encoding(encoding);

    let parser = SheetParser::new(source, options);
    let records = parser
        .parse_dynamic(&record_type)
        .with_context(|| format!("Parsing records of '{}'", record_type.name))?;

    match args.format {
        OutputFormat::Table => {
            let names = record_type
                .fields
                .iter()
                .map(|f| f.name.clone())
                .collect::<Vec<_>>();
            print!("{}", table::render_records(&names, &records));
        }
        OutputFormat::Json => {
            let rendered =
                serde_json::to_string_pretty(&records).context("Serializing records to JSON")?;
            println!("{rendered}");
        }
    }
    info!("Printed {} record(s)", records.len());
    Ok(())
}

/// Options file values overridden by command-line flags. Formats given on the
/// command line are tried before those from the options file.
pub fn resolve_options(args: &ParseArgs) -> Result<SheetOptions> {
    let mut options = match &args.config {
        Some(path) => SheetOptions::load(path)
            .with_context(|| format!("Loading options from {path:?}"))?,
        None => SheetOptions::default(),
    };
    if let Some(source) = &args.source {
        options.source_id = source.clone();
    }
    if let Some(table) = &args.table {
        options.table_name = Some(table.clone());
    }
    if !args.datetime_formats.is_empty() {
        let mut formats = args.datetime_formats.clone();
        formats.append(&mut options.datetime_formats);
        options.datetime_formats = formats;
    }
    Ok(options)
}
