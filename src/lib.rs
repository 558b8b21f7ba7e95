//! Immutable HTTP request and response values, with a parser for raw HTTP/1.x
//! messages, a case-insensitive header store and a query string codec.
//!
//! ```
//! use httpmsg::{HttpMessage, parse_request};
//!
//! let request = parse_request("GET /foo?bar=1 HTTP/1.1\r\nHost: example.com\r\n\r\n").unwrap();
//! assert_eq!(request.uri().to_string(), "http://example.com/foo?bar=1");
//! assert_eq!(request.header_line("host"), "example.com");
//! ```

pub mod config;
pub mod error;
pub mod http;

pub use ::http::Uri;

pub use crate::error::{Error, Result};
pub use crate::http::headers::{HeaderStore, IntoHeaderValues};
pub use crate::http::message::{HttpMessage, Message};
pub use crate::http::mime::{mimetype_from_extension, mimetype_from_filename};
pub use crate::http::parser::{ParsedMessage, RawHeaders, parse_message, parse_request, parse_response};
pub use crate::http::query::{QueryEncoding, QueryParams, QueryValue, build_query, parse_query};
pub use crate::http::request::Request;
pub use crate::http::response::Response;
