//! Structural checks of start-lines and request targets.
//!
//! Start-lines are tokenized on single spaces (at most three fields) and each
//! field is checked explicitly, no regular expression is involved.

use tracing::debug;

use crate::error::{Error, Result};

/// Shape of a request target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetForm {
    /// `/path?query`
    Origin,
    /// `scheme://authority/path?query`
    Absolute,
}

/// Fields of a request-line: `METHOD TARGET [HTTP/VERSION]`
#[derive(Debug, PartialEq, Eq)]
pub struct RequestLine<'a> {
    pub method: &'a str,
    pub target: &'a str,
    pub version: &'a str,
    pub form: TargetForm,
}

/// Fields of a status-line: `HTTP/VERSION CODE [REASON]`
#[derive(Debug, PartialEq, Eq)]
pub struct StatusLine<'a> {
    pub version: &'a str,
    pub status: u16,
    pub reason: Option<&'a str>,
}

pub struct Validator;

impl Validator {
    fn target_form(target: &str) -> Option<TargetForm> {
        if target.starts_with('/') {
            return Some(TargetForm::Origin);
        }

        let (scheme, _) = target.split_once("://")?;
        if !scheme.is_empty() && scheme.bytes().all(|b| b.is_ascii_alphabetic()) {
            Some(TargetForm::Absolute)
        } else {
            None
        }
    }

    pub fn validate_request_line(line: &str) -> Result<RequestLine<'_>> {
        let malformed = |reason: &str| {
            debug!(start_line = line, reason, "rejected request-line");
            Error::MalformedMessage(format!("invalid request-line {line:?}: {reason}"))
        };

        let mut parts = line.splitn(3, ' ');
        let method = parts.next().unwrap_or("");
        let target = parts.next().unwrap_or("");

        if method.is_empty() || method.contains(char::is_whitespace) {
            return Err(malformed("missing method"));
        }

        let form = Self::target_form(target)
            .ok_or_else(|| malformed("target must be origin-form or absolute-form"))?;

        let version = match parts.next() {
            Some(protocol) => protocol
                .split('/')
                .nth(1)
                .ok_or_else(|| malformed("missing protocol version"))?,
            None => "1.1",
        };

        Ok(RequestLine {
            method,
            target,
            version,
            form,
        })
    }

    pub fn validate_status_line(line: &str) -> Result<StatusLine<'_>> {
        let malformed = |reason: &str| {
            debug!(start_line = line, reason, "rejected status-line");
            Error::MalformedMessage(format!("invalid status-line {line:?}: {reason}"))
        };

        let mut parts = line.splitn(3, ' ');
        let protocol = parts.next().unwrap_or("");
        let version = protocol
            .strip_prefix("HTTP/")
            .ok_or_else(|| malformed("missing HTTP/ prefix"))?;
        // "HTTP/1.1/x" keeps only the first segment
        let version = version.split('/').next().unwrap_or(version);

        let code = parts.next().unwrap_or("");
        if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed("status code must be 3 digits"));
        }
        let status = code
            .parse::<u16>()
            .map_err(|_| malformed("status code must be 3 digits"))?;

        Ok(StatusLine {
            version,
            status,
            reason: parts.next(),
        })
    }

    /// A request target cannot contain whitespace.
    pub fn validate_request_target(target: &str) -> Result<()> {
        if target
            .bytes()
            .any(|b| b.is_ascii_whitespace() || b == b'\x0b')
        {
            debug!(target, "rejected request target");
            return Err(Error::InvalidRequestTarget(target.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_line_fields() {
        let line = Validator::validate_request_line("get /foo?a=1 HTTP/1.0").unwrap();
        assert_eq!(
            line,
            RequestLine {
                method: "get",
                target: "/foo?a=1",
                version: "1.0",
                form: TargetForm::Origin,
            }
        );

        let line = Validator::validate_request_line("GET https://example.com/x").unwrap();
        assert_eq!(line.form, TargetForm::Absolute);
        assert_eq!(line.version, "1.1");
    }

    #[test]
    fn request_line_without_target_is_malformed() {
        for line in [
            "",
            "GET",
            "GET  HTTP/1.1",
            "GET foo HTTP/1.1",
            "GET 1http://x HTTP/1.1",
            "GET ://x HTTP/1.1",
            "GET\t/ HTTP/1.1",
            "GET / HTTP1.1",
        ] {
            assert!(
                matches!(
                    Validator::validate_request_line(line),
                    Err(Error::MalformedMessage(_))
                ),
                "{line:?} should be rejected"
            );
        }
    }

    #[test]
    fn status_line_fields() {
        let line = Validator::validate_status_line("HTTP/1.0 404 Not Found").unwrap();
        assert_eq!(line.version, "1.0");
        assert_eq!(line.status, 404);
        assert_eq!(line.reason, Some("Not Found"));

        let line = Validator::validate_status_line("HTTP/2 204").unwrap();
        assert_eq!(line.version, "2");
        assert_eq!(line.reason, None);

        let line = Validator::validate_status_line("HTTP/1.1 200 ").unwrap();
        assert_eq!(line.reason, Some(""));
    }

    #[test]
    fn status_line_rejects_bad_shapes() {
        for line in ["", "HTTP/1.1", "HTTP/1.1 20", "HTTP/1.1 2000 OK", "HTTP/1.1 abc", "HTTPS/1.1 200"] {
            assert!(
                matches!(
                    Validator::validate_status_line(line),
                    Err(Error::MalformedMessage(_))
                ),
                "{line:?} should be rejected"
            );
        }
    }

    #[test]
    fn request_target_whitespace() {
        assert!(Validator::validate_request_target("/foo?bar=baz").is_ok());
        assert!(Validator::validate_request_target("*").is_ok());
        for target in ["/foo bar", "/foo\tbar", "/foo\nbar", "/foo\x0bbar"] {
            assert!(matches!(
                Validator::validate_request_target(target),
                Err(Error::InvalidRequestTarget(_))
            ));
        }
    }
}
