//! `meterdesk` browses back-office records through a [`DataTable`].

#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod args;
pub mod command;
pub mod config;
pub mod entity;
pub mod view;

use serde_json::Value;
use service::{infra::Endpoint, DataTable, View};
// Used in binary.
use tokio as _;
use tracing_subscriber as _;

pub use self::{
    args::{Args, Format},
    command::Command,
    config::Config,
    entity::Entity,
};

/// [`DataTable`] of raw JSON records fetched from the back-office API.
pub type Table = DataTable<Value, Endpoint<Value>, Box<dyn View<Value>>>;
