//! Blocking HTTPS transport backed by `ureq`.

use std::io::Read;
use std::time::Duration;

use inktrace_core::{
    traits::{HttpRequest, HttpResponse},
    Transport, TransportError,
};

/// Request timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Response bodies larger than this are truncated
const MAX_BODY_BYTES: u64 = 10 * 1024 * 1024;

/// `ureq` agent with a fixed per-request timeout
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    timeout: Duration,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { agent, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn name(&self) -> &'static str {
        "ureq"
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut call = self.agent.request(request.method.as_str(), &request.url);
        for (name, value) in &request.headers {
            call = call.set(name, value);
        }

        let result = match &request.body {
            Some(body) => call.send_bytes(body),
            None => call.call(),
        };

        // ureq reports 4xx/5xx as errors; they are ordinary responses here
        let response = match result {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(err)) => return Err(TransportError(err.to_string())),
        };

        let status = response.status();
        let mut body = Vec::new();
        response
            .into_reader()
            .take(MAX_BODY_BYTES)
            .read_to_end(&mut body)
            .map_err(|e| TransportError(format!("failed to read response body: {e}")))?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inktrace_core::traits::Method;

    #[test]
    fn test_timeout_configuration() {
        assert_eq!(UreqTransport::new().timeout(), DEFAULT_TIMEOUT);
        let transport = UreqTransport::with_timeout(Duration::from_secs(3));
        assert_eq!(transport.timeout(), Duration::from_secs(3));
        assert_eq!(transport.name(), "ureq");
    }

    #[test]
    fn test_unreachable_host_is_transport_error() {
        // Port 9 on localhost is the discard service and is almost never open
        let transport = UreqTransport::with_timeout(Duration::from_millis(500));
        let request = HttpRequest::new(Method::Get, "http://127.0.0.1:9/");
        assert!(transport.send(&request).is_err());
    }
}
