use http::Uri;
use indexmap::IndexMap;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use tracing::trace;

use crate::error::{Error, Result};
use crate::http::headers::HeaderStore;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::validator::{TargetForm, Validator};

/// Characters the URI grammar forbids in a request target. Non-ASCII characters
/// are always percent-encoded as well.
const TARGET_ESCAPES: &AsciiSet = &CONTROLS.add(b' ').add(b'<').add(b'>').add(b'`');

/// ASCII whitespace stripped around header names and values.
const LINE_WHITESPACE: [char; 6] = [' ', '\t', '\n', '\r', '\0', '\x0b'];

/// Header lines as they appear in a message, keyed by their exact name.
pub type RawHeaders = IndexMap<String, Vec<String>>;

/// A raw message split into its three parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMessage {
    pub start_line: String,
    pub headers: RawHeaders,
    pub body: String,
}

/// Splits off the first line of `input`.
///
/// Returns the line without its `\n` or `\r\n` terminator, and what follows the
/// terminator if there is one.
fn split_line(input: &str) -> (&str, Option<&str>) {
    match input.find('\n') {
        Some(end) => {
            let line = &input[..end];
            let line = line.strip_suffix('\r').unwrap_or(line);
            (line, Some(&input[end + 1..]))
        }
        None => (input, None),
    }
}

/// Splits a raw HTTP message into start-line, header lines and body.
///
/// Headers end at the first empty line; everything after that line's break is
/// the body, verbatim. Lines without a name before a `:` are skipped.
pub fn parse_message(raw: &str) -> Result<ParsedMessage> {
    if raw.is_empty() {
        return Err(Error::MalformedMessage("empty message".to_string()));
    }

    let (start_line, mut rest) = split_line(raw);
    let mut headers = RawHeaders::new();
    let mut body = "";

    while let Some(remaining) = rest {
        let (line, next) = split_line(remaining);

        // Two consecutive line breaks: end of headers
        if line.is_empty() {
            body = next.unwrap_or("");
            break;
        }

        match line.split_once(':') {
            Some((name, value)) if !name.is_empty() => {
                headers
                    .entry(name.trim_matches(LINE_WHITESPACE).to_string())
                    .or_default()
                    .push(value.trim_matches(LINE_WHITESPACE).to_string());
            }
            _ => trace!(line, "skipping line that is not a header"),
        }

        rest = next;
    }

    Ok(ParsedMessage {
        start_line: start_line.to_string(),
        headers,
        body: body.to_string(),
    })
}

/// Builds an absolute URI for an origin-form `target` from the `Host` header.
///
/// Without a `Host` header no authority is known and `target` is returned as is.
/// The scheme is `https` only when the host ends with `:443`.
fn request_uri(target: &str, headers: &RawHeaders) -> String {
    let host = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("host"))
        .and_then(|(_, values)| values.first());

    let target = escape_target(target);
    match host {
        Some(host) => {
            let scheme = if host.ends_with(":443") { "https" } else { "http" };
            format!("{}://{}/{}", scheme, host, target.trim_start_matches('/'))
        }
        None => target,
    }
}

/// Percent-encodes the characters of `target` that a URI cannot hold as is.
/// Existing escapes are left untouched.
fn escape_target(target: &str) -> String {
    utf8_percent_encode(target, TARGET_ESCAPES).to_string()
}

/// Parses a raw request message.
pub fn parse_request(raw: &str) -> Result<Request> {
    let message = parse_message(raw)?;
    let line = Validator::validate_request_line(&message.start_line)?;

    let uri = match line.form {
        TargetForm::Origin => request_uri(line.target, &message.headers).parse::<Uri>()?,
        TargetForm::Absolute => escape_target(line.target).parse::<Uri>()?,
    };

    let request = Request::from_parts(
        line.method,
        uri,
        HeaderStore::from_raw(&message.headers),
        message.body.as_str(),
        line.version,
    );

    match line.form {
        TargetForm::Origin => Ok(request),
        // Keep the absolute-form target so the request serializes back unchanged
        TargetForm::Absolute => request.with_request_target(line.target),
    }
}

/// Parses a raw response message.
pub fn parse_response(raw: &str) -> Result<Response> {
    let message = parse_message(raw)?;
    let line = Validator::validate_status_line(&message.start_line)?;

    Ok(Response::from_parts(
        line.status,
        HeaderStore::from_raw(&message.headers),
        message.body.as_str(),
        line.version,
        line.reason,
    ))
}
