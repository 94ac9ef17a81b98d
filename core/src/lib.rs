//! Typed HTTP resources: describe a request once, load it, get an `Outcome`.
//!
//! # Overview
//! A `Resource<T>` carries a method, URL, params, headers and a parse function
//! from a decoded JSON object to `Outcome<T>`. A `Loader` sends it through a
//! `Transport` and funnels the response through that parse function. Servers
//! using the `{"code", "data"}` envelope are handled by
//! `envelope::check_for_error`.
//!
//! # Design
//! - `Resource` is immutable and holds no per-call state, so it is cheap to
//!   clone into concurrent loads.
//! - Request building and response interpretation are pure functions on
//!   `Resource`; only `Transport::execute` touches the network.
//! - Every load ends in exactly one `Outcome`, whether the failure came from
//!   the network, the JSON decoder or the envelope code.

pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod json;
pub mod loader;
pub mod outcome;
pub mod resource;
pub mod transport;

pub use config::TransportConfig;
pub use envelope::{check_for_error, envelope_parser, typed_parser};
pub use error::{ApiError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use json::JsonObject;
pub use loader::Loader;
pub use outcome::Outcome;
pub use resource::{ParamEncoding, Resource};
pub use transport::{Transport, UreqTransport};
