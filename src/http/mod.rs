//! HTTP message model and codecs.
//!
//! Raw text goes through [`parser::parse_message`], whose start-line and header
//! lines are interpreted by [`parser::parse_request`] or [`parser::parse_response`]
//! into [`request::Request`] and [`response::Response`] values. Both are backed by
//! a [`headers::HeaderStore`].
//!
//! [`query`] is independent and handles URI query components.

pub mod headers;
pub mod message;
pub mod mime;
pub mod parser;
pub mod query;
pub mod request;
pub mod response;
pub mod status;
pub mod validator;
