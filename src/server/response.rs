use tracing::warn;

/// Reason phrase for the status line; `"Unknown"` for unregistered codes.
#[must_use]
pub fn status_reason(status: u16) -> &'static str {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("Unknown")
}

/// Body content types the pipeline produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Html,
    Text,
}

impl ContentType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Html => "text/html; charset=utf-8",
            ContentType::Text => "text/plain; charset=utf-8",
        }
    }

    /// Full header line, as `may_minihttp` wants it.
    #[must_use]
    pub fn header_line(self) -> &'static str {
        match self {
            ContentType::Html => "Content-Type: text/html; charset=utf-8",
            ContentType::Text => "Content-Type: text/plain; charset=utf-8",
        }
    }
}

/// Response being assembled by the pipeline.
///
/// A response is sent at most once; later sends are ignored with a warning.
#[derive(Debug, Clone)]
pub struct ServerResponse {
    status: u16,
    content_type: ContentType,
    body: String,
    sent: bool,
}

impl Default for ServerResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerResponse {
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: 200,
            content_type: ContentType::Text,
            body: String::new(),
            sent: false,
        }
    }

    /// Send a `200` HTML page.
    pub fn send_html(&mut self, html: String) {
        self.send(200, ContentType::Html, html);
    }

    pub fn send(&mut self, status: u16, content_type: ContentType, body: String) {
        if self.sent {
            warn!(
                status = status,
                previous_status = self.status,
                "Response already sent, ignoring second send"
            );
            return;
        }
        self.status = status;
        self.content_type = content_type;
        self.body = body;
        self.sent = true;
    }

    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    #[must_use]
    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    #[must_use]
    pub fn is_sent(&self) -> bool {
        self.sent
    }

    #[must_use]
    pub fn into_body(self) -> String {
        self.body
    }
}
