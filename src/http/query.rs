//! Query string codec.
//!
//! [`parse_query`] decomposes a URI query component (without the leading `?`) into
//! an ordered map, and [`build_query`] recomposes such a map. Nested PHP-style
//! keys such as `foo[a]=1` are not interpreted: `foo[a]` is just a key.

use indexmap::IndexMap;
use indexmap::map::Entry;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Unreserved characters of RFC 3986 are left as is.
const RFC3986: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Form encoding, `~` is escaped and spaces are later rendered as `+`.
const RFC1738: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryEncoding {
    /// No transformation at all.
    None,
    Rfc3986,
    Rfc1738,
    /// `+` means space, then percent-decoding. Only valid for parsing.
    PlusDecode,
}

/// Value of a query key: a single value until the key is seen a second time.
///
/// `None` stands for a key without `=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Single(Option<String>),
    Multi(Vec<Option<String>>),
}

impl QueryValue {
    pub fn values(&self) -> &[Option<String>] {
        match self {
            QueryValue::Single(value) => std::slice::from_ref(value),
            QueryValue::Multi(values) => values,
        }
    }

    fn push(&mut self, value: Option<String>) {
        match self {
            QueryValue::Single(first) => {
                let first = first.take();
                *self = QueryValue::Multi(vec![first, value]);
            }
            QueryValue::Multi(values) => values.push(value),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Single(Some(value.to_string()))
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(values: Vec<&str>) -> Self {
        QueryValue::Multi(values.into_iter().map(|v| Some(v.to_string())).collect())
    }
}

pub type QueryParams = IndexMap<String, QueryValue>;

pub fn parse_query(query: &str, encoding: QueryEncoding) -> QueryParams {
    let mut result = QueryParams::new();

    if query.is_empty() {
        return result;
    }

    for pair in query.split('&') {
        let (key, value) = match pair.split_once('=') {
            Some((key, value)) => (key, Some(value)),
            None => (pair, None),
        };
        let key = decode(key, encoding);
        let value = value.map(|v| decode(v, encoding));

        match result.entry(key) {
            Entry::Occupied(mut entry) => entry.get_mut().push(value),
            Entry::Vacant(entry) => {
                entry.insert(QueryValue::Single(value));
            }
        }
    }

    result
}

/// Builds a query string from `params`, in map order.
///
/// Keys are encoded but never rewritten, so a multi-valued key yields one
/// `key=value` pair per value rather than `key[]=value`.
pub fn build_query(params: &QueryParams, encoding: QueryEncoding) -> Result<String> {
    if params.is_empty() {
        return Ok(String::new());
    }

    if encoding == QueryEncoding::PlusDecode {
        return Err(Error::InvalidEncoding(encoding));
    }

    let mut pairs = Vec::new();
    for (key, value) in params {
        let key = encode(key, encoding);
        for v in value.values() {
            match v {
                Some(v) => pairs.push(format!("{}={}", key, encode(v, encoding))),
                None => pairs.push(key.clone()),
            }
        }
    }

    Ok(pairs.join("&"))
}

fn decode(value: &str, encoding: QueryEncoding) -> String {
    match encoding {
        QueryEncoding::None => value.to_string(),
        QueryEncoding::Rfc3986 | QueryEncoding::Rfc1738 => percent_decode(value),
        QueryEncoding::PlusDecode => percent_decode(&value.replace('+', " ")),
    }
}

fn percent_decode(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}

fn encode(value: &str, encoding: QueryEncoding) -> String {
    match encoding {
        QueryEncoding::Rfc3986 => utf8_percent_encode(value, RFC3986).to_string(),
        // A literal "%20" in the input is escaped to "%2520", so this only hits spaces
        QueryEncoding::Rfc1738 => utf8_percent_encode(value, RFC1738)
            .to_string()
            .replace("%20", "+"),
        QueryEncoding::None | QueryEncoding::PlusDecode => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_keys_become_sequences() {
        let params = parse_query("a=1&a=2&b=3", QueryEncoding::PlusDecode);

        assert_eq!(params.len(), 2);
        assert_eq!(params["a"], QueryValue::from(vec!["1", "2"]));
        assert_eq!(params["b"], QueryValue::from("3"));

        let params = parse_query("a=1&a=2&a", QueryEncoding::None);
        assert_eq!(
            params["a"],
            QueryValue::Multi(vec![Some("1".into()), Some("2".into()), None])
        );
    }

    #[test]
    fn keys_without_equal_sign_have_no_value() {
        let params = parse_query("flag&empty=&x=a=b", QueryEncoding::Rfc3986);

        assert_eq!(params["flag"], QueryValue::Single(None));
        assert_eq!(params["empty"], QueryValue::Single(Some(String::new())));
        assert_eq!(params["x"], QueryValue::from("a=b"));
    }

    #[test]
    fn empty_query_is_empty_map() {
        assert!(parse_query("", QueryEncoding::PlusDecode).is_empty());
        assert_eq!(build_query(&QueryParams::new(), QueryEncoding::Rfc3986).unwrap(), "");
    }

    #[test]
    fn decoding_policies() {
        let raw = "q=a+b%20c";

        assert_eq!(parse_query(raw, QueryEncoding::PlusDecode)["q"], QueryValue::from("a b c"));
        assert_eq!(parse_query(raw, QueryEncoding::Rfc3986)["q"], QueryValue::from("a+b c"));
        assert_eq!(parse_query(raw, QueryEncoding::Rfc1738)["q"], QueryValue::from("a+b c"));
        assert_eq!(parse_query(raw, QueryEncoding::None)["q"], QueryValue::from("a+b%20c"));
    }

    #[test]
    fn encoding_policies() {
        let mut params = QueryParams::new();
        params.insert("k y".to_string(), QueryValue::from("a b~c"));

        assert_eq!(build_query(&params, QueryEncoding::Rfc3986).unwrap(), "k%20y=a%20b~c");
        assert_eq!(build_query(&params, QueryEncoding::Rfc1738).unwrap(), "k+y=a+b%7Ec");
        assert_eq!(build_query(&params, QueryEncoding::None).unwrap(), "k y=a b~c");
    }

    #[test]
    fn build_renders_sequences_and_missing_values() {
        let mut params = QueryParams::new();
        params.insert("a".to_string(), QueryValue::from(vec!["1", "2"]));
        params.insert("flag".to_string(), QueryValue::Single(None));
        params.insert("b".to_string(), QueryValue::Multi(vec![None, Some("3".into())]));

        assert_eq!(
            build_query(&params, QueryEncoding::Rfc3986).unwrap(),
            "a=1&a=2&flag&b&b=3"
        );
    }

    #[test]
    fn plus_decode_is_rejected_for_building() {
        let mut params = QueryParams::new();
        params.insert("a".to_string(), QueryValue::from("1"));

        assert!(matches!(
            build_query(&params, QueryEncoding::PlusDecode),
            Err(Error::InvalidEncoding(QueryEncoding::PlusDecode))
        ));
    }

    #[test]
    fn normal_form_round_trips() {
        for query in ["a=1&a=2&b=3", "foo=bar%2Fbaz&flag", "x=%C3%A9t%C3%A9&y="] {
            let params = parse_query(query, QueryEncoding::Rfc3986);
            assert_eq!(build_query(&params, QueryEncoding::Rfc3986).unwrap(), query);
        }
    }
}
