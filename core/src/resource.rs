//! Declarative description of one HTTP resource.
//!
//! # Design
//! A `Resource<T>` is built once and never mutated: the consuming builder
//! methods are the only way to set fields, and every getter borrows. It holds
//! no per-call state, so one value can be cloned into as many concurrent loads
//! as needed (`parse` sits behind an `Arc`).
//!
//! The two halves of a load live here as pure functions. `build_request`
//! produces an `HttpRequest`; `parse_response` turns what the transport came
//! back with into exactly one `Outcome`. A `Loader` only glues them to a
//! `Transport`.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use url::Url;

use crate::error::{ApiError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::json::{self, JsonObject};
use crate::outcome::Outcome;

type ParseFn<T> = dyn Fn(JsonObject) -> Outcome<T> + Send + Sync;

/// How `params` travel with the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamEncoding {
    /// Params are kept on the descriptor but not sent.
    #[default]
    Omit,
    /// Params are appended to the URL query string.
    Query,
    /// Params are sent as a JSON object body.
    JsonBody,
}

pub struct Resource<T> {
    method: HttpMethod,
    url: String,
    params: JsonObject,
    headers: Vec<(String, String)>,
    param_encoding: ParamEncoding,
    parse: Arc<ParseFn<T>>,
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            method: self.method,
            url: self.url.clone(),
            params: self.params.clone(),
            headers: self.headers.clone(),
            param_encoding: self.param_encoding,
            parse: Arc::clone(&self.parse),
        }
    }
}

impl<T> fmt::Debug for Resource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("params", &self.params)
            .field("headers", &self.headers)
            .field("param_encoding", &self.param_encoding)
            .finish_non_exhaustive()
    }
}

impl<T> Resource<T> {
    /// Describe a resource. Nothing is validated or fetched here; an empty or
    /// malformed `url` only surfaces when the resource is loaded.
    pub fn new(
        method: HttpMethod,
        url: impl Into<String>,
        parse: impl Fn(JsonObject) -> Outcome<T> + Send + Sync + 'static,
    ) -> Self {
        Self {
            method,
            url: url.into(),
            params: JsonObject::new(),
            headers: Vec::new(),
            param_encoding: ParamEncoding::default(),
            parse: Arc::new(parse),
        }
    }

    /// Append a header. Adding the same key twice sends it twice.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn params(mut self, params: JsonObject) -> Self {
        self.params.extend(params);
        self
    }

    pub fn param_encoding(mut self, encoding: ParamEncoding) -> Self {
        self.param_encoding = encoding;
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn params_map(&self) -> &JsonObject {
        &self.params
    }

    pub fn header_list(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn encoding(&self) -> ParamEncoding {
        self.param_encoding
    }

    /// Run the parse function on an already-decoded body.
    pub fn parse(&self, body: JsonObject) -> Outcome<T> {
        (self.parse)(body)
    }

    /// Describe the request this resource sends.
    ///
    /// Method and URL are taken verbatim and headers are appended in order.
    /// With `ParamEncoding::Omit` (the default) params are not transmitted.
    pub fn build_request(&self) -> Result<HttpRequest, ApiError> {
        if self.url.trim().is_empty() {
            return Err(TransportError::InvalidRequest("empty url".to_string()).into());
        }

        let mut request = HttpRequest {
            method: self.method,
            url: self.url.clone(),
            headers: self.headers.clone(),
            body: None,
        };

        match self.param_encoding {
            ParamEncoding::Omit => {
                if !self.params.is_empty() {
                    tracing::debug!(
                        url = %self.url,
                        count = self.params.len(),
                        "params are not transmitted with ParamEncoding::Omit"
                    );
                }
            }
            ParamEncoding::Query => {
                if !self.params.is_empty() {
                    request.url = self.query_url()?;
                }
            }
            ParamEncoding::JsonBody => {
                if !self.method.allows_body() {
                    return Err(TransportError::InvalidRequest(format!(
                        "{} does not carry a request body",
                        self.method
                    ))
                    .into());
                }
                let body = serde_json::to_string(&self.params).map_err(|e| {
                    TransportError::InvalidRequest(format!("params not serializable: {e}"))
                })?;
                if !request.has_header("content-type") {
                    request
                        .headers
                        .push(("content-type".to_string(), "application/json".to_string()));
                }
                request.body = Some(body);
            }
        }

        Ok(request)
    }

    /// Interpret what the transport returned.
    ///
    /// `parse` runs only on a 2xx response whose body decodes as JSON. Every
    /// other case becomes a failure directly, including a non-2xx response
    /// that arrived without a transport error of its own.
    pub fn parse_response(
        &self,
        exchange: Result<HttpResponse, TransportError>,
    ) -> Outcome<T> {
        let response = match exchange {
            Ok(response) => response,
            Err(err) => return Outcome::Failure(ApiError::TransportError(err)),
        };

        if !response.is_success() {
            return Outcome::Failure(
                TransportError::Status {
                    status: response.status,
                }
                .into(),
            );
        }

        let Some(bytes) = response.body else {
            return Outcome::Failure(
                TransportError::MissingBody {
                    status: response.status,
                }
                .into(),
            );
        };

        match json::decode_object(&bytes) {
            Ok(body) => self.parse(body),
            Err(err) => Outcome::Failure(err),
        }
    }

    fn query_url(&self) -> Result<String, ApiError> {
        let mut url = Url::parse(&self.url)
            .map_err(|e| TransportError::InvalidRequest(format!("{}: {e}", self.url)))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.params {
                match value {
                    Value::String(s) => pairs.append_pair(key, s),
                    other => pairs.append_pair(key, &other.to_string()),
                };
            }
        }
        Ok(url.into())
    }
}
