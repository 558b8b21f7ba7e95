//! Parts shared by requests and responses.

use crate::http::headers::{HeaderStore, IntoHeaderValues};

pub const DEFAULT_PROTOCOL_VERSION: &str = "1.1";

/// Protocol version, headers and body of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub(crate) protocol_version: String,
    pub(crate) headers: HeaderStore,
    pub(crate) body: String,
}

impl Message {
    pub fn new(headers: HeaderStore, body: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            protocol_version: version.into(),
            headers,
            body: body.into(),
        }
    }
}

/// Read access and copy-on-write modifiers common to [`Request`](crate::http::request::Request)
/// and [`Response`](crate::http::response::Response).
///
/// Every `with*` method returns a new message, the receiver is never modified.
pub trait HttpMessage: Clone {
    fn message(&self) -> &Message;

    /// Returns a copy of `self` carrying `message` instead of its own parts.
    fn with_message(&self, message: Message) -> Self;

    fn protocol_version(&self) -> &str {
        &self.message().protocol_version
    }

    fn headers(&self) -> &HeaderStore {
        &self.message().headers
    }

    fn has_header(&self, name: &str) -> bool {
        self.headers().has(name)
    }

    fn header(&self, name: &str) -> &[String] {
        self.headers().get(name)
    }

    fn header_line(&self, name: &str) -> String {
        self.headers().get_line(name)
    }

    fn body(&self) -> &str {
        &self.message().body
    }

    fn with_protocol_version(&self, version: &str) -> Self {
        if self.protocol_version() == version {
            return self.clone();
        }

        let mut message = self.message().clone();
        message.protocol_version = version.to_string();
        self.with_message(message)
    }

    fn with_header(&self, name: &str, value: impl IntoHeaderValues) -> Self {
        let mut message = self.message().clone();
        message.headers = message.headers.with_set(name, value);
        self.with_message(message)
    }

    fn with_added_header(&self, name: &str, value: impl IntoHeaderValues) -> Self {
        let mut message = self.message().clone();
        message.headers = message.headers.with_added(name, value);
        self.with_message(message)
    }

    fn without_header(&self, name: &str) -> Self {
        if !self.has_header(name) {
            return self.clone();
        }

        let mut message = self.message().clone();
        message.headers = message.headers.with_removed(name);
        self.with_message(message)
    }

    fn with_body(&self, body: impl Into<String>) -> Self {
        let mut message = self.message().clone();
        message.body = body.into();
        self.with_message(message)
    }
}
