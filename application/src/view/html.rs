//! [`Html`] view.

use std::{cell::RefCell, io};

use common::{PageResult, PagerItem};
use derive_more::Debug;
use maud::{html, Markup, PreEscaped};
use serde_json::Value;
use service::{Rows, View};

use super::{cell, empty_message, Sink};
use crate::entity::Column;

/// [`View`] rendering records as HTML table rows, pagination controls and a
/// records-info paragraph.
#[derive(Debug)]
pub struct Html<W> {
    /// Writer the markup is printed into.
    #[debug(skip)]
    out: Sink<W>,

    /// Displayed [`Column`]s.
    columns: &'static [Column],

    /// Number of pages shown around the current one in a pager.
    pager_window: u32,
}

impl<W> Html<W> {
    /// Creates a new [`Html`] view printing the `columns` into `out`.
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

    /// Renders a single row spanning all the columns.
    fn message_row(&self, class: &str, text: &str) -> Markup {
        html! {
            tr class=(class) {
                td colspan=(self.columns.len()) { (text) }
            }
        }
    }

    /// Renders a single `record` row.
    fn record_row(&self, record: &Value) -> Markup {
        html! {
            tr {
                @for column in self.columns {
                    td { (cell(column.lookup(record)).as_ref()) }
                }
            }
        }
    }
}

impl<W: io::Write> View<Value> for Html<W> {
    fn render_rows(&self, rows: Rows<'_, Value>) {
        let message = match rows {
            Rows::Loading => self.message_row("loading", "Loading..."),
            Rows::Empty(empty) => {
                self.message_row("empty", &empty_message(empty))
            }
            Rows::Failed(err) => {
                self.message_row("error", &format!("Error: {err}"))
            }
            Rows::Items(items) => {
                for record in items {
                    let row = self.record_row(record);
                    self.out.line(format_args!("{}", row.into_string()));
                }
                self.out.flush();
                return;
            }
        };
        self.out.line(format_args!("{}", message.into_string()));
        self.out.flush();
    }

    fn render_pager(&self, page: &PageResult<Value>) {
        let Some(pager) = page.pager(self.pager_window) else {
            return;
        };

        let markup = html! {
            nav.pagination {
                ul {
                    @for item in pager.items {
                        @match item {
                            PagerItem::Previous(Some(n)) => {
                                li { button data-page=(n) { (PreEscaped("&laquo;")) } }
                            }
                            PagerItem::Previous(None) => {
                                li.disabled { span { (PreEscaped("&laquo;")) } }
                            }
                            PagerItem::Page { number, current: true } => {
                                li.active { span { (number) } }
                            }
                            PagerItem::Page { number, current: false } => {
                                li { button data-page=(number) { (number) } }
                            }
                            PagerItem::Gap => {
                                li.gap { span { (PreEscaped("&hellip;")) } }
                            }
                            PagerItem::Next(Some(n)) => {
                                li { button data-page=(n) { (PreEscaped("&raquo;")) } }
                            }
                            PagerItem::Next(None) => {
                                li.disabled { span { (PreEscaped("&raquo;")) } }
                            }
                        }
                    }
                }
            }
        };

        self.out.line(format_args!("{}", markup.into_string()));
        self.out.flush();
    }

    fn render_summary(&self, page: &PageResult<Value>) {
        let markup = html! {
            p.records-info { (page.summary().to_string()) }
        };
        self.out.line(format_args!("{}", markup.into_string()));
        self.out.flush();
    }
}
