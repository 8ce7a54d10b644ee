use http::Method;

use crate::ids::DispatchId;

/// Request data handed to each pipeline stage.
#[derive(Debug, Clone)]
pub struct ServerRequest {
    /// Dispatch id, taken from `x-request-id` when it parses
    pub id: DispatchId,
    pub method: Method,
    /// Path without the query string
    pub path: String,
    /// Headers with lowercase names
    pub headers: Vec<(String, String)>,
}

impl ServerRequest {
    /// Build from a method and a raw target such as `/widgets/42?tab=specs`.
    #[must_use]
    pub fn new(method: Method, target: &str) -> Self {
        Self::with_headers(method, target, Vec::new())
    }

    #[must_use]
    pub fn with_headers(method: Method, target: &str, headers: Vec<(String, String)>) -> Self {
        let path = target.split_once('?').map_or(target, |(path, _)| path);
        let headers: Vec<(String, String)> = headers
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect();
        let id = DispatchId::from_header_or_new(
            headers
                .iter()
                .find(|(k, _)| k == "x-request-id")
                .map(|(_, v)| v.as_str()),
        );
        Self {
            id,
            method,
            path: if path.is_empty() { "/" } else { path }.to_string(),
            headers,
        }
    }

    /// Get a header by name (case-insensitive)
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
