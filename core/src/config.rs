//! Transport settings.
//!
//! # Design
//! Every limit is opt-in. With the defaults no timeout applies and response
//! bodies are read in full whatever their size, so only the server or the
//! network can cut a load short.

use std::time::Duration;

/// Settings for `UreqTransport`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportConfig {
    pub user_agent: String,
    pub timeout: Option<Duration>,
    /// Largest response body accepted, in bytes. `None` reads any size.
    pub max_body: Option<u64>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("resource-core/{}", env!("CARGO_PKG_VERSION")),
            timeout: None,
            max_body: None,
        }
    }
}

impl TransportConfig {
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn max_body(mut self, bytes: u64) -> Self {
        self.max_body = Some(bytes);
        self
    }
}
