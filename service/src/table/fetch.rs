//! [`Fetch`]ing of pages.

use common::{PageResult, Payload, QueryState};
use derive_more::{Display, Error, From};
use serde::de::DeserializeOwned;
#[cfg(feature = "http")]
use tracerr::Traced;

#[cfg(feature = "http")]
use crate::infra::http;

/// Operation fetching a page of records for a [`QueryState`].
pub use common::Handler as Fetch;

/// Conversion of a [`Fetch`] result into a [`PageResult`].
pub trait IntoPage<T> {
    /// Converts this value into a [`PageResult`] answering the provided
    /// [`QueryState`].
    ///
    /// # Errors
    ///
    /// If this value doesn't describe a page of `T`s.
    fn into_page(self, state: &QueryState) -> Result<PageResult<T>, FetchError>;
}

impl<T> IntoPage<T> for PageResult<T> {
    fn into_page(self, _: &QueryState) -> Result<PageResult<T>, FetchError> {
        Ok(self)
    }
}

impl<T> IntoPage<T> for Payload<T> {
    fn into_page(
        self,
        state: &QueryState,
    ) -> Result<PageResult<T>, FetchError> {
        Ok(self.normalize(state))
    }
}

impl<T: DeserializeOwned> IntoPage<T> for serde_json::Value {
    fn into_page(
        self,
        state: &QueryState,
    ) -> Result<PageResult<T>, FetchError> {
        serde_json::from_value::<Payload<T>>(self)
            .map(|p| p.normalize(state))
            .map_err(|e| FetchError::Malformed(e.to_string()))
    }
}

/// Error of [`Fetch`]ing a page.
#[derive(Debug, Display, Error, From)]
pub enum FetchError {
    /// HTTP request failed.
    #[cfg(feature = "http")]
    #[display("HTTP request failed: {_0}")]
    Http(Traced<http::Error>),

    /// Response doesn't describe a page of records.
    #[display("malformed payload: {_0}")]
    #[from(ignore)]
    Malformed(#[error(not(source))] String),

    /// Any other failure of a [`Fetch`] implementation.
    #[display("{_0}")]
    #[from(ignore)]
    Other(#[error(not(source))] String),
}

impl FetchError {
    /// Creates a new [`FetchError::Other`] out of the provided `err`.
    #[must_use]
    pub fn other(err: impl ToString) -> Self {
        Self::Other(err.to_string())
    }
}
