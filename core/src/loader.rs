//! Running a `Resource` against a `Transport`.
//!
//! # Design
//! `fetch` is the whole cycle, synchronously: build the request, execute it
//! once, interpret the response. `load` and `load_async` run that same cycle
//! off the caller's thread. Each call reports exactly one `Outcome`; there is
//! no retry and no cancellation. Dropping the returned handle only stops the
//! caller from waiting, the request itself still completes.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::error::{ApiError, TransportError};
use crate::outcome::Outcome;
use crate::resource::Resource;
use crate::transport::{Transport, UreqTransport};

/// Executes resources through a shared transport.
pub struct Loader<X = UreqTransport> {
    transport: Arc<X>,
}

impl<X> Clone for Loader<X> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl Default for Loader<UreqTransport> {
    fn default() -> Self {
        Self::new(UreqTransport::default())
    }
}

impl<X: Transport + 'static> Loader<X> {
    pub fn new(transport: X) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    pub fn transport(&self) -> &X {
        &self.transport
    }

    /// Build, execute and parse on the current thread.
    pub fn fetch<T>(&self, resource: &Resource<T>) -> Outcome<T> {
        let request = match resource.build_request() {
            Ok(request) => request,
            Err(err) => {
                tracing::warn!(url = %resource.url(), error = %err, "request not sent");
                return Outcome::Failure(err);
            }
        };

        let span = tracing::debug_span!("load", method = %request.method, url = %request.url);
        let _enter = span.enter();
        tracing::debug!(headers = request.headers.len(), "dispatching request");

        let exchange = self.transport.execute(request);
        match &exchange {
            Ok(response) => tracing::debug!(status = response.status, "response received"),
            Err(err) => tracing::warn!(error = %err, "transport failed"),
        }

        let outcome = resource.parse_response(exchange);
        if let Some(err) = outcome.error() {
            tracing::debug!(error = %err, "load failed");
        }
        outcome
    }

    /// Start a load on a background thread and return immediately.
    ///
    /// `completion` runs exactly once, on that thread.
    pub fn load<T, F>(&self, resource: &Resource<T>, completion: F) -> JoinHandle<()>
    where
        T: 'static,
        F: FnOnce(Outcome<T>) + Send + 'static,
    {
        let loader = self.clone();
        let resource = resource.clone();
        thread::spawn(move || completion(loader.fetch(&resource)))
    }

    /// Run a load on tokio's blocking pool.
    ///
    /// A panic inside `parse` resumes on the awaiting task.
    pub async fn load_async<T>(&self, resource: &Resource<T>) -> Outcome<T>
    where
        T: Send + 'static,
    {
        let loader = self.clone();
        let resource = resource.clone();
        match tokio::task::spawn_blocking(move || loader.fetch(&resource)).await {
            Ok(outcome) => outcome,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(err) => Outcome::Failure(ApiError::TransportError(TransportError::Io(format!(
                "load task cancelled: {err}"
            )))),
        }
    }
}
