//! Interactive [`Command`]s.

use std::str::FromStr;

use derive_more::{Display, Error};
use serde_json::Value;
use service::infra::{http::Method, Client};
use tracing as log;

use crate::{args::parse_filter, Entity, Table};

/// Command typed by a user in the interactive mode.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    /// Changes the search term.
    Search(String),

    /// Changes the value of a filter.
    Filter {
        /// Key of the filter.
        key: String,

        /// New value of the filter, empty to clear it.
        value: String,
    },

    /// Clears a filter.
    Clear(String),

    /// Navigates to a page.
    Page(u32),

    /// Changes the number of records per page.
    Size(u32),

    /// Navigates to the next page.
    Next,

    /// Navigates to the previous page.
    Previous,

    /// Re-fetches the current page.
    Reload,

    /// Clears the search, filters and navigates to the first page.
    Reset,

    /// Deletes a record.
    Delete(String),

    /// Quits the interactive mode.
    Quit,
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(n, r)| (n, r.trim()));

        let number = |what: &'static str| {
            rest.parse::<u32>()
                .map_err(|_| ParseError::argument(what, rest))
        };
        let nothing = |cmd: Self| {
            if rest.is_empty() {
                Ok(cmd)
            } else {
                Err(ParseError::argument("nothing", rest))
            }
        };

        match name {
            "search" | "s" => Ok(Self::Search(rest.to_owned())),
            "filter" | "f" => parse_filter(rest)
                .map(|(key, value)| Self::Filter { key, value })
                .map_err(|_| ParseError::argument("`KEY=VALUE`", rest)),
            "clear" if !rest.is_empty() => Ok(Self::Clear(rest.to_owned())),
            "clear" => Err(ParseError::argument("filter key", "")),
            "page" | "p" => number("page number").map(Self::Page),
            "size" => number("page size").map(Self::Size),
            "next" | "n" => nothing(Self::Next),
            "prev" | "previous" => nothing(Self::Previous),
            "reload" | "r" => nothing(Self::Reload),
            "reset" => nothing(Self::Reset),
            "delete" if !rest.is_empty() => Ok(Self::Delete(rest.to_owned())),
            "delete" => Err(ParseError::argument("record ID", "")),
            "quit" | "q" | "exit" => nothing(Self::Quit),
            _ => Err(ParseError::Unknown(name.to_owned())),
        }
    }
}

impl Command {
    /// Applies this [`Command`] to the provided [`Table`] of `entity`
    /// records.
    ///
    /// Returns `false` once the interactive mode should be quit.
    pub async fn apply(
        self,
        table: &Table,
        client: &Client,
        entity: Entity,
    ) -> bool {
        match self {
            Self::Search(term) => table.set_search_term(term),
            Self::Filter { key, value } => table.set_filter(key, value),
            Self::Clear(key) => table.clear_filter(key),
            Self::Page(n) => table.go_to_page(n),
            Self::Size(n) => table.set_page_size(n),
            Self::Next => table.next_page(),
            Self::Previous => table.previous_page(),
            Self::Reload => table.reload(),
            Self::Reset => table.reset(),
            Self::Delete(id) => {
                let path = entity.record_path(&id);
                match client.submit(Method::DELETE, &path, &Value::Null).await {
                    Ok(_) => {
                        log::info!("deleted `{entity}` record `{id}`");
                        table.reload();
                    }
                    Err(e) => log::error!(
                        "failed to delete `{entity}` record `{id}`: {e}",
                    ),
                }
            }
            Self::Quit => return false,
        }
        true
    }
}

/// Error of parsing a [`Command`].
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
pub enum ParseError {
    /// Command is not known.
    #[display("unknown command `{_0}`")]
    Unknown(#[error(not(source))] String),

    /// Command argument is invalid.
    #[display("expected {expected}, got `{got}`")]
    Argument {
        /// Description of the expected argument.
        expected: &'static str,

        /// Provided argument.
        got: String,
    },
}

impl ParseError {
    /// Creates a new [`ParseError::Argument`].
    fn argument(expected: &'static str, got: &str) -> Self {
        Self::Argument {
            expected,
            got: got.to_owned(),
        }
    }
}
