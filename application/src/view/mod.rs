//! [`View`]s rendering a table of records.
//!
//! [`View`]: service::View

pub mod html;
pub mod terminal;

use std::{borrow::Cow, cell::RefCell, fmt, io};

use common::datetime;
use itertools::Itertools as _;
use serde_json::Value;
use service::Empty;
use tracing as log;

pub use self::{html::Html, terminal::Terminal};

/// Formats the provided cell `value` for display.
///
/// Dates are shown in the local `DD/MM/YYYY` notation, nested records by
/// their `name`.
#[must_use]
pub fn cell(value: Option<&Value>) -> Cow<'_, str> {
    match value {
        None | Some(Value::Null) => Cow::Borrowed(""),
        Some(Value::Bool(true)) => Cow::Borrowed("Yes"),
        Some(Value::Bool(false)) => Cow::Borrowed("No"),
        Some(Value::Number(n)) => Cow::Owned(n.to_string()),
        Some(Value::String(s)) => {
            datetime::format(s).map_or(Cow::Borrowed(s.as_str()), Cow::Owned)
        }
        Some(Value::Array(items)) => Cow::Owned(
            items.iter().map(|v| cell(Some(v))).join(", "),
        ),
        Some(v @ Value::Object(obj)) => match obj.get("name") {
            Some(Value::String(name)) => Cow::Borrowed(name.as_str()),
            Some(_) | None => Cow::Owned(v.to_string()),
        },
    }
}

/// Returns a human-readable message explaining an [`Empty`] page.
#[must_use]
pub fn empty_message(empty: Empty<'_>) -> String {
    match empty {
        Empty::NoRecords => "No records found.".to_owned(),
        Empty::NoSearchResults { term } => format!("No results for \"{term}\"."),
        Empty::NoFilterResults => {
            "No records match the selected filters.".to_owned()
        }
    }
}

/// Output sink of a view.
struct Sink<W>(RefCell<W>);

impl<W: io::Write> Sink<W> {
    /// Writes the provided `args` as a single line.
    fn line(&self, args: fmt::Arguments<'_>) {
        let mut out = self.0.borrow_mut();
        if let Err(e) = out.write_fmt(args).and_then(|()| out.write_all(b"\n")) {
            log::warn!("failed to write output: {e}");
        }
    }

    /// Flushes the underlying writer.
    fn flush(&self) {
        if let Err(e) = self.0.borrow_mut().flush() {
            log::warn!("failed to flush output: {e}");
        }
    }
}
