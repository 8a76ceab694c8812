//! HTTP [`Client`] of the back-office API.

use std::{marker::PhantomData, time};

use common::{query::DEFAULT_PAGE_SIZE_PARAM, Handler, Payload, QueryState};
use derive_more::{Debug, Display, Error as StdError, From};
use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    StatusCode,
};
use secrecy::{ExposeSecret as _, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracerr::Traced;
use tracing as log;
use url::Url;

pub use reqwest::Method;

/// Name of the header carrying the CSRF token.
pub const CSRF_HEADER: &str = "x-csrftoken";

/// [`Client`] configuration.
#[derive(Debug)]
pub struct Config {
    /// Base URL every request path is resolved against.
    ///
    /// Treated as a directory: `https://host/desk` resolves `api/users/` into
    /// `https://host/desk/api/users/`.
    pub base_url: Url,

    /// CSRF token to send along with every request, if any.
    pub csrf_token: Option<SecretString>,

    /// Timeout of a single request.
    pub timeout: time::Duration,

    /// Name of the query parameter carrying the page size.
    pub page_size_param: String,
}

impl Config {
    /// Creates a new [`Config`] with default settings for the provided
    /// `base_url`.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            csrf_token: None,
            timeout: time::Duration::from_secs(30),
            page_size_param: DEFAULT_PAGE_SIZE_PARAM.to_owned(),
        }
    }
}

/// JSON client of the back-office API.
///
/// Sends the CSRF token with every request and normalizes the
/// `{success, error}` envelope of responses.
#[derive(Clone, Debug)]
pub struct Client {
    /// Underlying [`reqwest::Client`].
    #[debug(skip)]
    inner: reqwest::Client,

    /// Base URL every request path is resolved against.
    base_url: Url,

    /// Name of the query parameter carrying the page size.
    page_size_param: String,
}

impl Client {
    /// Creates a new [`Client`] out of the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If the CSRF token is not a valid header value, or the underlying
    /// client fails to initialize.
    pub fn new(config: Config) -> Result<Self, Traced<Error>> {
        let Config {
            mut base_url,
            csrf_token,
            timeout,
            page_size_param,
        } = config;

        // Otherwise `Url::join()` replaces the last path segment.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        _ = headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/json"),
        );
        _ = headers.insert(
            "x-requested-with",
            HeaderValue::from_static("XMLHttpRequest"),
        );
        if let Some(token) = csrf_token {
            let mut value = HeaderValue::from_str(token.expose_secret())
                .map_err(Error::from)
                .map_err(tracerr::wrap!())?;
            value.set_sensitive(true);
            _ = headers.insert(CSRF_HEADER, value);
        }

        let inner = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(Error::from)
            .map_err(tracerr::wrap!())?;

        Ok(Self {
            inner,
            base_url,
            page_size_param,
        })
    }

    /// Returns name of the query parameter carrying the page size.
    #[must_use]
    pub fn page_size_param(&self) -> &str {
        &self.page_size_param
    }

    /// Performs a `GET` request of the provided `path` with the `query`
    /// parameters.
    ///
    /// # Errors
    ///
    /// See [`Error`] for details.
    pub async fn get(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Value, Traced<Error>> {
        let url = self.url(path)?;
        log::debug!("GET {url}");
        Self::send(self.inner.get(url).query(query)).await
    }

    /// Submits the provided JSON `body` to the `path` with the `method`
    /// (create, update or delete of a record).
    ///
    /// [`Value::Null`] `body` is not sent at all.
    ///
    /// # Errors
    ///
    /// See [`Error`] for details.
    pub async fn submit(
        &self,
        method: Method,
        path: &str,
        body: &Value,
    ) -> Result<Value, Traced<Error>> {
        let url = self.url(path)?;
        log::debug!("{method} {url}");
        let mut req = self.inner.request(method, url);
        if !body.is_null() {
            req = req.json(body);
        }
        Self::send(req).await
    }

    /// Resolves the `path` against the base URL.
    fn url(&self, path: &str) -> Result<Url, Traced<Error>> {
        self.base_url
            .join(path)
            .map_err(Error::from)
            .map_err(tracerr::wrap!())
    }

    /// Sends the request and normalizes its response.
    async fn send(
        req: reqwest::RequestBuilder,
    ) -> Result<Value, Traced<Error>> {
        let resp = req
            .send()
            .await
            .map_err(Error::from)
            .map_err(tracerr::wrap!())?;
        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(Error::from)
            .map_err(tracerr::wrap!())?;

        let json = if body.is_empty() {
            Ok(Value::Null)
        } else {
            serde_json::from_slice::<Value>(&body)
        };

        if !status.is_success() {
            let message = json
                .ok()
                .as_ref()
                .and_then(error_message)
                .unwrap_or_else(|| {
                    status.canonical_reason().unwrap_or("error").to_owned()
                });
            return Err(tracerr::new!(Error::Status { status, message }));
        }

        let json = json.map_err(Error::from).map_err(tracerr::wrap!())?;
        unwrap_envelope(json).map_err(tracerr::wrap!())
    }
}

/// Normalizes the `{success, error, data}` envelope of a response body.
///
/// - `{success: false, error}` is turned into an [`Error::Rejected`];
/// - `{success: true, data}` is unwrapped into `data`;
/// - anything else is returned as is.
///
/// # Errors
///
/// If the `value` reports an unsuccessful operation.
pub fn unwrap_envelope(value: Value) -> Result<Value, Error> {
    let Value::Object(mut obj) = value else {
        return Ok(value);
    };
    match obj.get("success").and_then(Value::as_bool) {
        Some(false) => Err(Error::Rejected(
            error_message(&Value::Object(obj))
                .unwrap_or_else(|| "request was rejected".to_owned()),
        )),
        Some(true) => Ok(obj.remove("data").unwrap_or(Value::Object(obj))),
        None => Ok(Value::Object(obj)),
    }
}

/// Extracts a human-readable error message from a response body.
fn error_message(value: &Value) -> Option<String> {
    ["error", "detail", "message"]
        .into_iter()
        .find_map(|key| value.get(key))
        .map(|msg| match msg {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
}

/// List endpoint [`Handler`] fetching pages of `T` records.
#[derive(Debug)]
pub struct Endpoint<T> {
    /// [`Client`] performing requests.
    client: Client,

    /// Path of the endpoint.
    path: String,

    /// Type of the records.
    #[debug(skip)]
    _records: PhantomData<fn() -> T>,
}

impl<T> Endpoint<T> {
    /// Creates a new [`Endpoint`] at the `path`.
    #[must_use]
    pub fn new(client: Client, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
            _records: PhantomData,
        }
    }
}

impl<T> Clone for Endpoint<T> {
    fn clone(&self) -> Self {
        Self::new(self.client.clone(), self.path.clone())
    }
}

impl<T: DeserializeOwned> Handler<QueryState> for Endpoint<T> {
    type Ok = Payload<T>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        state: QueryState,
    ) -> Result<Self::Ok, Self::Err> {
        let params = state.to_params(self.client.page_size_param());
        let json = self
            .client
            .get(&self.path, &params)
            .await
            .map_err(tracerr::wrap!())?;
        serde_json::from_value(json)
            .map_err(Error::Shape)
            .map_err(tracerr::wrap!())
    }
}

/// Error of a [`Client`] request.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Request path cannot be resolved into a URL.
    #[display("invalid URL: {_0}")]
    Url(url::ParseError),

    /// CSRF token is not a valid header value.
    #[display("invalid CSRF token: {_0}")]
    Header(header::InvalidHeaderValue),

    /// Request failed to be performed.
    #[display("request failed: {_0}")]
    Transport(reqwest::Error),

    /// Server responded with an unsuccessful status.
    #[display("server responded with `{status}`: {message}")]
    #[from(ignore)]
    Status {
        /// Status of the response.
        status: StatusCode,

        /// Error message of the response.
        message: String,
    },

    /// Response body is not a valid JSON.
    #[display("response is not valid JSON: {_0}")]
    Json(serde_json::Error),

    /// Response body doesn't describe a page of records.
    #[display("unexpected payload shape: {_0}")]
    #[from(ignore)]
    Shape(serde_json::Error),

    /// Server rejected the request.
    #[display("request rejected: {_0}")]
    #[from(ignore)]
    Rejected(#[error(not(source))] String),
}
