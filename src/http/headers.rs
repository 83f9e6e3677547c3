//! Ordered header collection shared by [`Request`](crate::http::request::Request)
//! and [`Response`](crate::http::response::Response).
//!
//! Headers are stored in an insertion-ordered map. Names and values are raw,
//! case-sensitive strings; no HTTP semantics are enforced here. A name is
//! unique within the store: writing it again replaces the value but keeps the
//! original position.
//!
//! Parsing is permissive. A raw line without the `": "` separator is kept as
//! a name with no value rather than rejected; lookups on such an entry behave
//! as if the header were absent, while serialization still round-trips it.

use indexmap::IndexMap;

use crate::http::LINE_END;

#[derive(Debug, Clone, Default)]
pub struct Headers {
    entries: IndexMap<String, Option<String>>,
}

impl Headers {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Parses raw header lines of the form `"<name>: <value>"`.
    ///
    /// The split happens on the first `": "` occurrence; the value is the
    /// whole remainder of the line. Duplicate names keep their first position
    /// with the last value. Empty lines are skipped.
    pub fn parse<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut headers = Headers::new();
        for line in lines {
            let line = line.as_ref();
            if line.is_empty() {
                continue;
            }
            match line.split_once(": ") {
                Some((name, value)) => {
                    headers.entries.insert(name.to_string(), Some(value.to_string()))
                }
                None => headers.entries.insert(line.to_string(), None),
            };
        }
        headers
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.entries.insert(name.to_string(), Some(value.to_string()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).and_then(|value| value.as_deref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copies every entry of `other` into `self`, value-less entries
    /// included. Existing names are overwritten in place.
    pub fn extend_from(&mut self, other: &Headers) {
        for (name, value) in &other.entries {
            self.entries.insert(name.clone(), value.clone());
        }
    }

    /// Serializes to wire form: entries joined by CRLF in insertion order,
    /// with no leading or trailing terminator. An entry without a value
    /// serializes as its bare name.
    pub fn serialize(&self) -> String {
        self.entries
            .iter()
            .map(|(name, value)| match value {
                Some(value) => format!("{name}: {value}"),
                None => name.clone(),
            })
            .collect::<Vec<_>>()
            .join(LINE_END)
    }
}
