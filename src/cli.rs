use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about = "Map spreadsheet tables onto typed records", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse a table into records described by a schema file
    Parse(ParseArgs),
    /// List the fields of a schema file and the table name it resolves to
    Schema(SchemaArgs),
}

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Schema YAML describing the record type
    #[arg(short, long)]
    pub schema: PathBuf,
    /// Directory holding one `<table>.csv` or `<table>.tsv` file per table
    #[arg(long)]
    pub source: Option<String>,
    /// Table name; defaults to the pluralized record name
    #[arg(short, long)]
    pub table: Option<String>,
    /// Options YAML providing source_id, table_name and datetime_formats
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Additional datetime pattern (chrono strftime syntax), tried in order
    #[arg(long = "datetime-format", action = clap::ArgAction::Append)]
    pub datetime_formats: Vec<String>,
    /// Output format for parsed records
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the table files (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct SchemaArgs {
    /// Schema YAML describing the record type
    #[arg(short, long)]
    pub schema: PathBuf,
    /// Table name override used when reporting the resolved table
    #[arg(short, long)]
    pub table: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
