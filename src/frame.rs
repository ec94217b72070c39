use std::fmt;

use crate::command::Command;

/// Insertion-ordered STOMP header mapping.
///
/// Each header name appears at most once. `insert` on an existing name
/// replaces the value in place, so the order a frame renders in only depends
/// on the order names were first supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Create an empty header mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`.
    ///
    /// Parameters
    /// - `key`: header name, matched case-sensitively.
    /// - `value`: header value, stored as given.
    ///
    /// Returns the previous value when the key was already present; the
    /// header keeps its original position in that case.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => Some(std::mem::replace(v, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Get the value of a header by name (case-sensitive).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if a header named `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove a header by name.
    ///
    /// Returns the removed value, or `None` if no such header existed. The
    /// relative order of the remaining headers is unchanged.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    /// Number of headers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.insert(k, v);
        }
        headers
    }
}

impl<K: Into<String>, V: Into<String>> From<Vec<(K, V)>> for Headers {
    fn from(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl IntoIterator for Headers {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// A STOMP frame: command, headers and an optional text body.
///
/// An absent body (`None`) is distinct from an empty one on the value, but
/// both render identically since the wire format has no way to tell them
/// apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub command: Command,
    pub headers: Headers,
    pub body: Option<String>,
}

impl Frame {
    /// Create a new frame with the given command, no headers and no body.
    pub fn new(command: impl Into<Command>) -> Self {
        Self {
            command: command.into(),
            headers: Headers::new(),
            body: None,
        }
    }

    /// Construct a frame from its parts.
    ///
    /// Parameters
    /// - `command`: the frame command; anything convertible into [`Command`],
    ///   including a wire token such as `"SEND"`.
    /// - `headers`: header mapping; `None` is treated as empty.
    /// - `body`: optional text body.
    ///
    /// Never fails: all inputs are taken as-is.
    pub fn build(command: impl Into<Command>, headers: Option<Headers>, body: Option<String>) -> Self {
        Self {
            command: command.into(),
            headers: headers.unwrap_or_default(),
            body,
        }
    }

    /// Add a header (builder style).
    ///
    /// Parameters
    /// - `key`: header name. Setting an existing name replaces its value.
    /// - `value`: header value.
    ///
    /// Returns the mutated `Frame` allowing builder-style chaining.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Set the frame body (builder style).
    ///
    /// Returns the mutated `Frame` allowing builder-style chaining.
    pub fn set_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Get the value of a header by name.
    ///
    /// Returns the header value (case-sensitive match on the name), or
    /// `None` if no such header exists.
    pub fn get_header(&self, key: &str) -> Option<&str> {
        self.headers.get(key)
    }

    /// Render the frame payload: command line, one `name: value` line per
    /// header, a blank line, then the body if present.
    ///
    /// The frame terminator is not included; see [`crate::codec::marshall`].
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.command)?;
        for (k, v) in self.headers.iter() {
            writeln!(f, "{}: {}", k, v)?;
        }
        writeln!(f)?;
        if let Some(body) = &self.body {
            f.write_str(body)?;
        }
        Ok(())
    }
}
