use std::fmt;

use crate::http::headers::HeaderStore;
use crate::http::message::{DEFAULT_PROTOCOL_VERSION, HttpMessage, Message};
use crate::http::status::reason_phrase;

/// An HTTP response value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    message: Message,
    status: u16,
    reason_phrase: String,
}

impl Response {
    pub fn new(status: u16) -> Self {
        Self::from_parts(status, HeaderStore::new(), "", DEFAULT_PROTOCOL_VERSION, None)
    }

    /// Builds a response from its parts.
    ///
    /// A missing or empty reason falls back to the standard phrase of `status`.
    pub fn from_parts(
        status: u16,
        headers: HeaderStore,
        body: impl Into<String>,
        version: impl Into<String>,
        reason: Option<&str>,
    ) -> Self {
        Self {
            message: Message::new(headers, body, version),
            status,
            reason_phrase: resolve_reason(status, reason.unwrap_or("")),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn reason_phrase(&self) -> &str {
        &self.reason_phrase
    }

    pub fn with_status(&self, status: u16, reason: &str) -> Self {
        let mut new = self.clone();
        new.status = status;
        new.reason_phrase = resolve_reason(status, reason);
        new
    }
}

fn resolve_reason(status: u16, reason: &str) -> String {
    match reason {
        "" => reason_phrase(status).unwrap_or_default().to_string(),
        reason => reason.to_string(),
    }
}

impl HttpMessage for Response {
    fn message(&self) -> &Message {
        &self.message
    }

    fn with_message(&self, message: Message) -> Self {
        Self {
            message,
            ..self.clone()
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // HTTP/<version> <status>[ <reason>]\r\n
        // <header_name>: <header_value>\r\n
        // ...
        // \r\n
        // <body>
        write!(f, "HTTP/{} {}", self.protocol_version(), self.status)?;
        if !self.reason_phrase.is_empty() {
            write!(f, " {}", self.reason_phrase)?;
        }
        write!(f, "\r\n{}\r\n{}", self.headers().stringify(), self.body())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_defaults_to_standard_phrase() {
        assert_eq!(Response::new(404).reason_phrase(), "Not Found");
        assert_eq!(Response::new(299).reason_phrase(), "");

        let response = Response::from_parts(200, HeaderStore::new(), "", "1.1", Some("Fine"));
        assert_eq!(response.reason_phrase(), "Fine");
    }

    #[test]
    fn with_status_returns_new_value() {
        let response = Response::new(200);
        let moved = response.with_status(301, "");
        let teapot = response.with_status(418, "Short and stout");

        assert_eq!(response.status(), 200);
        assert_eq!(moved.status(), 301);
        assert_eq!(moved.reason_phrase(), "Moved Permanently");
        assert_eq!(teapot.reason_phrase(), "Short and stout");
    }

    #[test]
    fn display_serializes_response() {
        let response = Response::new(200)
            .with_header("Content-Type", "text/plain")
            .with_added_header("Set-Cookie", ["a=1", "b=2"])
            .with_body("ok");

        assert_eq!(
            response.to_string(),
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nSet-Cookie: a=1, b=2\r\n\r\nok"
        );
        assert_eq!(Response::new(299).to_string(), "HTTP/1.1 299\r\n\r\n");
    }
}
