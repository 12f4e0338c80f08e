//! Kroki HTTP render backend.
//!
//! Renders diagrams by POSTing the source text to a Kroki service
//! (`{url}/{endpoint}/svg`). The HTTP agent is created once per backend and
//! pools connections across render calls; cloning the backend shares the
//! agent.

use std::time::Duration;

use tracing::debug;
use ureq::Agent;

use crate::backend::{BackendError, RenderBackend};
use crate::language::DiagramLanguage;

/// Default HTTP timeout for render requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Create an HTTP agent with the given timeout.
///
/// Status errors are handled by reading the response body, so 4xx/5xx are
/// not turned into transport errors by the agent itself.
fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// [`RenderBackend`] backed by a Kroki server.
#[derive(Clone)]
pub struct KrokiBackend {
    url: String,
    agent: Agent,
}

impl KrokiBackend {
    /// Create a backend for the given Kroki server URL
    /// (e.g. `"https://kroki.io"`).
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let url = url.trim_end_matches('/').to_owned();
        Self {
            url,
            agent: create_agent(DEFAULT_TIMEOUT),
        }
    }

    /// Set the HTTP timeout for render requests.
    ///
    /// Default is 30 seconds. Increase for slow networks or large diagrams.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.agent = create_agent(timeout);
        self
    }

    /// The configured server URL (without trailing slash).
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl RenderBackend for KrokiBackend {
    fn render_svg(&self, language: DiagramLanguage, source: &str) -> Result<String, BackendError> {
        let endpoint = language.kroki_endpoint();
        let url = format!("{}/{endpoint}/svg", self.url);
        debug!(endpoint, bytes = source.len(), "rendering diagram via kroki");

        let response = self
            .agent
            .post(&url)
            .header("Content-Type", "text/plain")
            .send(source.as_bytes())
            .map_err(|e| BackendError::Http(e.to_string()))?;

        let status = response.status().as_u16();
        let mut body = response.into_body();

        if status >= 400 {
            let detail = body
                .read_to_string()
                .unwrap_or_else(|_| String::from("(unable to read error body)"));
            // Kroki answers 4xx for bad diagram syntax, 5xx for its own faults
            return if status < 500 {
                Err(BackendError::Rejected(detail))
            } else {
                Err(BackendError::Http(format!("HTTP {status}: {detail}")))
            };
        }

        body.read_to_string()
            .map_err(|e| BackendError::InvalidSvg(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_trailing_slash_stripped() {
        let backend = KrokiBackend::new("https://kroki.io/");
        assert_eq!(backend.url(), "https://kroki.io");
    }

    #[test]
    fn test_timeout_builder_chains() {
        let backend = KrokiBackend::new("https://kroki.io").timeout(Duration::from_secs(5));
        assert_eq!(backend.url(), "https://kroki.io");
    }

    #[test]
    fn test_clone_shares_configuration() {
        let backend = KrokiBackend::new("http://localhost:8000");
        let cloned = backend.clone();
        assert_eq!(cloned.url(), backend.url());
    }

    #[test]
    fn test_unreachable_server_is_http_error() {
        // Reserved TEST-NET address: connection fails fast without a server.
        let backend =
            KrokiBackend::new("http://192.0.2.1:9").timeout(Duration::from_millis(200));

        let err = backend
            .render_svg(DiagramLanguage::Mermaid, "graph TD\n A --> B")
            .unwrap_err();

        assert!(matches!(err, BackendError::Http(_)));
    }
}
