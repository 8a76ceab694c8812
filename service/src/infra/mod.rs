//! Infrastructure layer.

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use self::http::{Client, Endpoint};
