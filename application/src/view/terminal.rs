//! [`Terminal`] view.

use std::{cell::RefCell, io};

use common::PageResult;
use derive_more::Debug;
use itertools::Itertools as _;
use serde_json::Value;
use service::{Rows, View};

use super::{cell, empty_message, Sink};
use crate::entity::Column;

/// Separator between columns of a table.
const GAP: &str = "  ";

/// [`View`] rendering records as a plain text table.
#[derive(Debug)]
pub struct Terminal<W> {
    /// Writer the table is printed into.
    #[debug(skip)]
    out: Sink<W>,

    /// Displayed [`Column`]s.
    columns: &'static [Column],

    /// Number of pages shown around the current one in a pager.
    pager_window: u32,
}

impl<W> Terminal<W> {
    /// Creates a new [`Terminal`] view printing the `columns` into `out`.
    #[must_use]
    pub const fn new(
        out: W,
        columns: &'static [Column],
        pager_window: u32,
    ) -> Self {
        Self {
            out: Sink(RefCell::new(out)),
            columns,
            pager_window,
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out.0.into_inner()
    }
}

impl<W: io::Write> View<Value> for Terminal<W> {
    fn render_rows(&self, rows: Rows<'_, Value>) {
        match rows {
            Rows::Loading => self.out.line(format_args!("Loading...")),
            Rows::Empty(empty) => {
                self.out.line(format_args!("{}", empty_message(empty)));
            }
            Rows::Failed(err) => self.out.line(format_args!("Error: {err}")),
            Rows::Items(items) => {
                let cells = items
                    .iter()
                    .map(|record| {
                        self.columns
                            .iter()
                            .map(|c| cell(c.lookup(record)).into_owned())
                            .collect::<Vec<_>>()
                    })
                    .collect::<Vec<_>>();
                let widths = self
                    .columns
                    .iter()
                    .enumerate()
                    .map(|(i, c)| {
                        cells
                            .iter()
                            .map(|row| row[i].chars().count())
                            .chain([c.title.chars().count()])
                            .max()
                            .unwrap_or_default()
                    })
                    .collect::<Vec<_>>();

                let header = self.columns.iter().map(|c| c.title);
                self.out.line(format_args!("{}", pad(header, &widths)));
                self.out.line(format_args!(
                    "{}",
                    widths.iter().map(|w| "-".repeat(*w)).join(GAP),
                ));
                for row in &cells {
                    let row = row.iter().map(String::as_str);
                    self.out.line(format_args!("{}", pad(row, &widths)));
                }
            }
        }
        self.out.flush();
    }

    fn render_pager(&self, page: &PageResult<Value>) {
        if let Some(pager) = page.pager(self.pager_window) {
            self.out.line(format_args!("{pager}"));
            self.out.flush();
        }
    }

    fn render_summary(&self, page: &PageResult<Value>) {
        self.out.line(format_args!("{}", page.summary()));
        self.out.flush();
    }
}

/// Pads the provided `cells` to the `widths` and joins them into a line.
fn pad<'c>(cells: impl Iterator<Item = &'c str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(text, width)| format!("{text:<width$}"))
        .join(GAP)
        .trim_end()
        .to_owned()
}
