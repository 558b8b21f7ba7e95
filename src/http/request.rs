use std::fmt;

use http::Uri;

use crate::error::Result;
use crate::http::headers::HeaderStore;
use crate::http::message::{DEFAULT_PROTOCOL_VERSION, HttpMessage, Message};
use crate::http::validator::Validator;

/// An HTTP request value.
///
/// The method is always stored upper-cased. Unless a request target was set
/// explicitly with [`Request::with_request_target`], the target is derived
/// from the URI path and query.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    message: Message,
    method: String,
    uri: Uri,
    request_target: Option<String>,
}

impl Request {
    pub fn new(method: &str, uri: Uri) -> Self {
        Self::from_parts(method, uri, HeaderStore::new(), "", DEFAULT_PROTOCOL_VERSION)
    }

    /// Builds a request from its parts.
    ///
    /// When `headers` has no `Host` header one is synthesized from the URI and
    /// placed first.
    pub fn from_parts(
        method: &str,
        uri: Uri,
        headers: HeaderStore,
        body: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        let mut request = Self {
            message: Message::new(headers, body, version),
            method: method.to_ascii_uppercase(),
            uri,
            request_target: None,
        };

        if !request.has_header("Host") {
            request.update_host_from_uri();
        }

        request
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// The explicit request target, or `path[?query]` of the URI with `/` for an empty path.
    pub fn request_target(&self) -> String {
        if let Some(target) = &self.request_target {
            return target.clone();
        }

        let mut target = match self.uri.path() {
            "" => "/".to_string(),
            path => path.to_string(),
        };
        if let Some(query) = self.uri.query().filter(|q| !q.is_empty()) {
            target.push('?');
            target.push_str(query);
        }
        target
    }

    pub fn with_request_target(&self, target: &str) -> Result<Self> {
        Validator::validate_request_target(target)?;

        let mut new = self.clone();
        new.request_target = Some(target.to_string());
        Ok(new)
    }

    pub fn with_method(&self, method: &str) -> Self {
        let mut new = self.clone();
        new.method = method.to_ascii_uppercase();
        new
    }

    /// Binds a new URI.
    ///
    /// Unless `preserve_host` is set, the `Host` header is overwritten from the
    /// URI and moved to the front of the headers.
    pub fn with_uri(&self, uri: Uri, preserve_host: bool) -> Self {
        if uri == self.uri {
            return self.clone();
        }

        let mut new = self.clone();
        new.uri = uri;

        if !preserve_host {
            new.update_host_from_uri();
        }

        new
    }

    fn update_host_from_uri(&mut self) {
        let Some(host) = host_from_uri(&self.uri) else {
            return;
        };

        // Host goes first, see https://tools.ietf.org/html/rfc7230#section-5.4
        self.message.headers = self.message.headers.with_leading("Host", host);
    }
}

/// `host[:port]` of `uri`, leaving out the default port of its scheme.
fn host_from_uri(uri: &Uri) -> Option<String> {
    let host = uri.host().filter(|h| !h.is_empty())?;

    let default_port = match uri.scheme_str() {
        Some("http") => Some(80),
        Some("https") => Some(443),
        _ => None,
    };

    match uri.port_u16() {
        Some(port) if Some(port) != default_port => Some(format!("{}:{}", host, port)),
        _ => Some(host.to_string()),
    }
}

impl HttpMessage for Request {
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

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // <METHOD> <target> HTTP/<version>\r\n
        // [Host: <uri host>\r\n]
        // <header_name>: <header_value>\r\n
        // ...
        // \r\n
        // <body>
        write!(
            f,
            "{} {} HTTP/{}\r\n",
            self.method,
            self.request_target(),
            self.protocol_version()
        )?;

        if !self.has_header("Host") {
            if let Some(host) = self.uri.host().filter(|h| !h.is_empty()) {
                write!(f, "Host: {}\r\n", host)?;
            }
        }

        write!(f, "{}\r\n{}", self.headers().stringify(), self.body())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(s: &str) -> Uri {
        s.parse().unwrap()
    }

    fn header_names(request: &Request) -> Vec<&str> {
        request.headers().iter().map(|(name, _)| name).collect()
    }

    #[test]
    fn method_is_upper_cased() {
        let request = Request::new("get", uri("http://example.com"));
        assert_eq!(request.method(), "GET");
        assert_eq!(request.with_method("patch").method(), "PATCH");
        assert_eq!(request.method(), "GET");
    }

    #[test]
    fn host_is_synthesized_first() {
        let headers = HeaderStore::new()
            .with_set("Accept", "*/*")
            .with_set("X-Foo", "bar");
        let request = Request::from_parts("GET", uri("http://example.com:8080/x"), headers, "", "1.1");

        assert_eq!(header_names(&request), ["Host", "Accept", "X-Foo"]);
        assert_eq!(request.header("host"), ["example.com:8080"]);
    }

    #[test]
    fn explicit_host_header_is_kept_at_construction() {
        let headers = HeaderStore::new().with_set("host", "proxy.local");
        let request = Request::from_parts("GET", uri("http://example.com/"), headers, "", "1.1");

        assert_eq!(request.header("Host"), ["proxy.local"]);
    }

    #[test]
    fn default_ports_are_left_out_of_host() {
        let request = Request::new("GET", uri("https://example.com:443/"));
        assert_eq!(request.header_line("Host"), "example.com");

        let request = Request::new("GET", uri("http://example.com:443/"));
        assert_eq!(request.header_line("Host"), "example.com:443");
    }

    #[test]
    fn relative_uri_has_no_host() {
        let request = Request::new("GET", uri("/foo"));
        assert!(!request.has_header("Host"));
        assert_eq!(request.request_target(), "/foo");
    }

    #[test]
    fn request_target_is_derived_from_uri() {
        assert_eq!(Request::new("GET", uri("http://example.com")).request_target(), "/");
        assert_eq!(
            Request::new("GET", uri("http://example.com/a/b?c=d")).request_target(),
            "/a/b?c=d"
        );
        assert_eq!(Request::new("GET", uri("http://example.com/a?")).request_target(), "/a");
    }

    #[test]
    fn explicit_request_target_overrides_and_rejects_whitespace() {
        let request = Request::new("OPTIONS", uri("http://example.com/a"));

        let star = request.with_request_target("*").unwrap();
        assert_eq!(star.request_target(), "*");
        assert_eq!(request.request_target(), "/a");

        assert!(request.with_request_target("/a b").is_err());
    }

    #[test]
    fn with_uri_rewrites_host_unless_preserved() {
        let request = Request::new("GET", uri("http://example.com/"))
            .with_header("Accept", "*/*")
            .with_header("HOST", "first.com");
        assert_eq!(header_names(&request), ["Accept", "HOST"]);

        let moved = request.with_uri(uri("http://second.com/"), false);
        assert_eq!(header_names(&moved), ["HOST", "Accept"]);
        assert_eq!(moved.header("host"), ["second.com"]);

        let preserved = request.with_uri(uri("http://second.com/"), true);
        assert_eq!(preserved.header("host"), ["first.com"]);
        assert_eq!(preserved.uri().host(), Some("second.com"));

        let same = request.with_uri(uri("http://example.com/"), false);
        assert_eq!(same, request);
    }

    #[test]
    fn message_modifiers_return_new_values() {
        let request = Request::new("POST", uri("http://example.com/"));
        let changed = request
            .with_body("payload")
            .with_protocol_version("2")
            .with_added_header("X-Foo", "a")
            .with_added_header("x-foo", "b");

        assert_eq!(request.body(), "");
        assert_eq!(request.protocol_version(), "1.1");
        assert!(!request.has_header("X-Foo"));

        assert_eq!(changed.body(), "payload");
        assert_eq!(changed.protocol_version(), "2");
        assert_eq!(changed.header_line("X-FOO"), "a, b");
        assert!(!changed.without_header("x-foo").has_header("X-Foo"));
    }

    #[test]
    fn display_serializes_request() {
        let request = Request::new("PUT", uri("http://example.com/a?b=c"))
            .with_header("Content-Type", "text/plain")
            .with_body("hello");

        assert_eq!(
            request.to_string(),
            "PUT /a?b=c HTTP/1.1\r\nHost: example.com\r\nContent-Type: text/plain\r\n\r\nhello"
        );

        let without_host = request.without_header("Host");
        assert!(without_host.to_string().starts_with("PUT /a?b=c HTTP/1.1\r\nHost: example.com\r\n"));
    }
}
