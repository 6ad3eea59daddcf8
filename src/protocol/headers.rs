//! HTTP header map implementation.
//!
//! Header names are case-insensitive on the wire, so this map stores every
//! name lower-cased and looks names up the same way. Setting a name that is
//! already present merges the values with `", "` instead of overwriting,
//! which is how repeated header lines combine into a single field value.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// A map of header fields keyed by lower-cased name.
///
/// Insertion order is not preserved; HTTP does not attach meaning to the
/// relative order of distinct header names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    fields: HashMap<String, String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a field into the map.
    ///
    /// If the name is already present the new value is appended to the
    /// existing one, separated by `", "`, preserving encounter order within
    /// the joined value.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.entry(name.to_ascii_lowercase()) {
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                existing.push_str(", ");
                existing.push_str(&value);
            }
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
        }
    }

    /// Replaces the value for a name, discarding any previous value.
    pub fn replace(&mut self, name: &str, value: impl Into<String>) {
        self.fields.insert(name.to_ascii_lowercase(), value.into());
    }

    /// Removes a field from the map.
    pub fn remove(&mut self, name: &str) {
        self.fields.remove(&name.to_ascii_lowercase());
    }

    /// Looks up a field value, ignoring the case of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_stores_lower_cased_names() {
        let mut headers = Headers::new();
        headers.set("Host", "localhost:42069");

        assert_eq!(headers.get("host"), Some("localhost:42069"));
        assert_eq!(headers.get("HOST"), Some("localhost:42069"));
        assert_eq!(headers.get("Host"), Some("localhost:42069"));
    }

    #[test]
    fn set_merges_duplicate_names() {
        let mut headers = Headers::new();
        headers.set("set-person", "lane-loves-go");
        headers.set("Set-Person", "prime-loves-zig");
        headers.set("SET-PERSON", "tj-loves-ocaml");

        assert_eq!(headers.get("set-person"), Some("lane-loves-go, prime-loves-zig, tj-loves-ocaml"));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn replace_overwrites_instead_of_merging() {
        let mut headers = Headers::new();
        headers.set("content-type", "text/plain");
        headers.replace("Content-Type", "text/html");

        assert_eq!(headers.get("content-type"), Some("text/html"));
    }

    #[test]
    fn remove_deletes_case_insensitively() {
        let mut headers = Headers::new();
        headers.set("connection", "close");
        headers.remove("Connection");

        assert_eq!(headers.get("connection"), None);
        assert!(headers.is_empty());
    }
}
