//! [`Args`] definitions.

use clap::{Parser, ValueEnum};
use derive_more::{Display, Error};

use crate::Entity;

/// Back-office browser of metering equipment records.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// Entity to browse.
    #[arg(value_enum)]
    pub entity: Entity,

    /// Search term to narrow records by.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Filter to narrow records by, as `KEY=VALUE`.
    #[arg(short = 'f', long = "filter", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,

    /// Page to open.
    #[arg(short, long, default_value_t = 1)]
    pub page: u32,

    /// Number of records per page, overriding the configured one.
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Keep reading commands from stdin after the first page.
    #[arg(short, long)]
    pub interactive: bool,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if failed to parse command line arguments.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

/// Output format of a table.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, ValueEnum)]
pub enum Format {
    /// Plain text table.
    #[display("table")]
    Table,

    /// HTML table rows.
    #[display("html")]
    Html,
}

/// Error of parsing a `KEY=VALUE` filter.
#[derive(Clone, Debug, Display, Error)]
#[display("expected `KEY=VALUE`, got `{_0}`")]
pub struct FilterError(#[error(not(source))] String);

/// Parses a `KEY=VALUE` filter.
///
/// # Errors
///
/// If the `input` has no `=` or an empty key.
pub fn parse_filter(input: &str) -> Result<(String, String), FilterError> {
    match input.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_owned(), value.trim().to_owned()))
        }
        Some(_) | None => Err(FilterError(input.to_owned())),
    }
}
