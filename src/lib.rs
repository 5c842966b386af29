//! Map spreadsheet-style tables onto typed records.
//!
//! Row 0 of a table is its header. Each header resolves to a record field by
//! explicit column alias or by field name, and every cell below it is coerced
//! to that field's declared type. See [`pipeline`] for the entry points and
//! [`sheet_record!`] for declaring record types.

pub mod cli;
pub mod coerce;
pub mod config;
pub mod datetime;
pub mod error;
pub mod header;
pub mod location;
pub mod naming;
pub mod parse_cmd;
pub mod pipeline;
pub mod record;
pub mod schema;
pub mod schema_cmd;
pub mod source;
pub mod table;
pub mod value;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

pub use crate::{
    config::SheetOptions,
    datetime::DatetimeFormats,
    error::SheetError,
    pipeline::{SheetParser, parse_into, records_from_table},
    record::{DynamicRecord, Record},
    schema::{FieldDef, FieldType, RecordType, ScalarKind},
    source::{CsvDirectorySource, MemorySource, RawTable, SheetSource},
    value::{CellValue, Value},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("sheet_records", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Parse(args) => parse_cmd::execute(&args),
        Commands::Schema(args) => schema_cmd::execute(&args),
    }
}
