//! HTTP headers abstraction for [`Request`](crate::http::request::Request) and
//! [`Response`](crate::http::response::Response)
//!
//! This module provides the header store shared by every message type. It supports
//! setting, appending, removing, merging and serializing headers.
//!
//! Headers are kept in two aligned maps:
//! - `names` maps the lowercased header name to the casing it was first registered with,
//! - `values` maps that original name to its ordered list of values.
//!
//! `values` is an ordered map, so iteration order is the emission order of the headers.
//! Two names are the same header iff their ASCII-lowercased forms are byte-equal.
//!
//! A [`HeaderStore`] is a value: every `with_*` operation returns a new store and
//! leaves the receiver untouched.
//!
//! No validation is performed on names or values besides trimming optional
//! whitespace (`' '` and `'\t'`) around values, see
//! <https://tools.ietf.org/html/rfc7230#section-3.2.4>.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::http::parser::RawHeaders;

/// Conversion of a scalar or a sequence into a list of header values.
pub trait IntoHeaderValues {
    fn into_header_values(self) -> Vec<String>;
}

impl IntoHeaderValues for &str {
    fn into_header_values(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoHeaderValues for String {
    fn into_header_values(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoHeaderValues for &String {
    fn into_header_values(self) -> Vec<String> {
        vec![self.clone()]
    }
}

impl IntoHeaderValues for Vec<String> {
    fn into_header_values(self) -> Vec<String> {
        self
    }
}

impl IntoHeaderValues for Vec<&str> {
    fn into_header_values(self) -> Vec<String> {
        self.into_iter().map(str::to_string).collect()
    }
}

impl IntoHeaderValues for &[String] {
    fn into_header_values(self) -> Vec<String> {
        self.to_vec()
    }
}

impl IntoHeaderValues for &[&str] {
    fn into_header_values(self) -> Vec<String> {
        self.iter().map(|v| v.to_string()).collect()
    }
}

impl<const N: usize> IntoHeaderValues for [&str; N] {
    fn into_header_values(self) -> Vec<String> {
        self.iter().map(|v| v.to_string()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderStore {
    names: HashMap<String, String>,
    values: IndexMap<String, Vec<String>>,
}

impl HeaderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from raw parsed header lines, see [`HeaderStore::bulk_merge`].
    pub fn from_raw(raw: &RawHeaders) -> Self {
        Self::new().bulk_merge(raw)
    }

    pub fn has(&self, name: &str) -> bool {
        self.names.contains_key(&normalize(name))
    }

    /// All values registered for `name`, empty if the header is absent.
    pub fn get(&self, name: &str) -> &[String] {
        self.original_name(name)
            .and_then(|original| self.values.get(original))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Values of `name` joined as a single header line.
    pub fn get_line(&self, name: &str) -> String {
        self.get(name).join(", ")
    }

    /// Iterates headers in emission order, with their registered casing.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.values
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Replaces every value of `name`.
    ///
    /// An entry registered under another casing is dropped, and the header is
    /// re-registered at the end of the store under the casing given here.
    pub fn with_set(&self, name: &str, values: impl IntoHeaderValues) -> Self {
        let mut new = self.clone();
        new.set(name, trim_values(values.into_header_values()));
        new
    }

    /// Appends values to `name`, keeping its registered casing and position.
    pub fn with_added(&self, name: &str, values: impl IntoHeaderValues) -> Self {
        let mut new = self.clone();
        new.add(name, trim_values(values.into_header_values()));
        new
    }

    pub fn with_removed(&self, name: &str) -> Self {
        let mut new = self.clone();
        new.remove(name);
        new
    }

    /// Removes every listed header, comparing names case-insensitively.
    pub fn without_keys<I, S>(&self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut new = self.clone();
        for name in names {
            new.remove(name.as_ref());
        }
        new
    }

    /// Merges raw header lines in order. Repeated names accumulate under the
    /// casing they were first seen with.
    pub fn bulk_merge(&self, raw: &RawHeaders) -> Self {
        let mut new = self.clone();
        for (name, values) in raw {
            new.add(name, trim_values(values.clone()));
        }
        new
    }

    /// Sets `name` to a single value and moves it to the front of the store.
    ///
    /// A header already registered under another casing keeps that casing.
    pub(crate) fn with_leading(&self, name: &str, value: String) -> Self {
        let mut new = self.clone();
        let original = new
            .names
            .entry(normalize(name))
            .or_insert_with(|| name.to_string())
            .clone();
        let (index, _) = new.values.insert_full(original, vec![value]);
        new.values.move_index(index, 0);
        new
    }

    /// Serializes headers, one `Name: value, value\r\n` line per header.
    pub fn stringify(&self) -> String {
        let mut result = String::new();
        for (name, values) in &self.values {
            result.push_str(&format!("{}: {}\r\n", name, values.join(", ")));
        }
        result
    }

    fn original_name(&self, name: &str) -> Option<&String> {
        self.names.get(&normalize(name))
    }

    fn set(&mut self, name: &str, values: Vec<String>) {
        let normalized = normalize(name);
        if let Some(previous) = self.names.remove(&normalized) {
            self.values.shift_remove(&previous);
        }
        self.names.insert(normalized, name.to_string());
        self.values.insert(name.to_string(), values);
    }

    fn add(&mut self, name: &str, values: Vec<String>) {
        match self.names.get(&normalize(name)) {
            Some(original) => self
                .values
                .entry(original.clone())
                .or_default()
                .extend(values),
            None => self.set(name, values),
        }
    }

    fn remove(&mut self, name: &str) {
        if let Some(original) = self.names.remove(&normalize(name)) {
            self.values.shift_remove(&original);
        }
    }
}

fn normalize(name: &str) -> String {
    name.to_ascii_lowercase()
}

/// Strips optional whitespace (SP / HTAB) around each value.
fn trim_values(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim_matches([' ', '\t']).to_string())
        .collect()
}
