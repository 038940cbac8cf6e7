//! # Configuration Sink
//!
//! Flat, string-keyed property set handed to the filesystem client. The same
//! type carries the merged base resources, which are treated as read-only
//! once loaded.
//!
//! Keys iterate in lexicographic order so that two derivations over equal
//! inputs always render identically.

use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};
use std::fmt::Write as _;

/// Mutable key/value configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration {
    entries: BTreeMap<String, String>,
}

impl Configuration {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Value for `key` with surrounding whitespace removed
    pub fn get_trimmed(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim)
    }

    /// Value for `key`, or `default` when unset
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Boolean value for `key`
    ///
    /// Returns `None` when the key is unset or does not hold `true`/`false`
    /// (case-insensitive).
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        let value = self.get_trimmed(key)?;
        if value.eq_ignore_ascii_case("true") {
            Some(true)
        } else if value.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }

    /// Integer value for `key`, `None` when unset or not a valid `i32`
    pub fn get_int(&self, key: &str) -> Option<i32> {
        self.get_trimmed(key)?.parse().ok()
    }

    /// Whether `key` holds any value
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Set `key` to `value`, returning the previous value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) -> Option<String> {
        self.set(key, value.to_string())
    }

    pub fn set_int(&mut self, key: impl Into<String>, value: i32) -> Option<String> {
        self.set(key, value.to_string())
    }

    /// Set `key` to a comma-separated list
    pub fn set_strings<I, S>(&mut self, key: impl Into<String>, values: I) -> Option<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = values
            .into_iter()
            .map(|value| value.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.set(key, joined)
    }

    /// Bind `key` to an implementation identifier
    pub fn set_class(&mut self, key: impl Into<String>, class_name: &str) -> Option<String> {
        self.set(key, class_name)
    }

    /// Set `key` only if it holds no value yet. Returns whether it was written.
    pub fn set_if_unset(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        match self.entries.entry(key.into()) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(value.into());
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }

    pub fn set_bool_if_unset(&mut self, key: impl Into<String>, value: bool) -> bool {
        self.set_if_unset(key, value.to_string())
    }

    /// Remove `key`, returning the value it held
    pub fn unset(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    /// Copy every entry of `other` into this configuration, overwriting
    /// existing values for the same keys
    pub fn copy_from(&mut self, other: &Configuration) {
        self.entries.extend(
            other
                .entries
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as a property file
    ///
    /// The output parses back to an identical configuration with
    /// [`crate::resources::parse_properties`].
    pub fn to_properties_string(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            escape_into(&mut out, key, true);
            out.push('=');
            escape_into(&mut out, value, false);
            out.push('\n');
        }
        out
    }
}

fn escape_into(out: &mut String, text: &str, is_key: bool) {
    for (index, ch) in text.chars().enumerate() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{000C}' => out.push_str("\\f"),
            ' ' if is_key || index == 0 => out.push_str("\\ "),
            '=' | ':' if is_key => {
                out.push('\\');
                out.push(ch);
            }
            '#' | '!' if index == 0 => {
                out.push('\\');
                out.push(ch);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c => out.push(c),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Configuration {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut config = Self::new();
        config.extend(iter);
        config
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Configuration {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl IntoIterator for Configuration {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Configuration {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_if_unset_keeps_existing_value() {
        let mut config = Configuration::new();
        assert!(config.set_bool_if_unset("dfs.client.read.shortcircuit", true));
        assert_eq!(config.get_bool("dfs.client.read.shortcircuit"), Some(true));

        config.set_bool("dfs.client.read.shortcircuit", false);
        assert!(!config.set_bool_if_unset("dfs.client.read.shortcircuit", true));
        assert_eq!(config.get_bool("dfs.client.read.shortcircuit"), Some(false));
    }

    #[test]
    fn test_typed_getters() {
        let config: Configuration = [
            ("ipc.ping.interval", " 10000 "),
            ("dfs.encrypt.data.transfer", "TRUE"),
            ("fs.cache.max-size", "lots"),
        ]
        .into_iter()
        .collect();

        assert_eq!(config.get_int("ipc.ping.interval"), Some(10000));
        assert_eq!(config.get_bool("dfs.encrypt.data.transfer"), Some(true));
        assert_eq!(config.get_int("fs.cache.max-size"), None);
        assert_eq!(config.get_bool("fs.cache.max-size"), None);
        assert_eq!(config.get_int("missing"), None);
        assert_eq!(config.get_or("missing", "fallback"), "fallback");
    }

    #[test]
    fn test_copy_from_overwrites() {
        let mut target: Configuration = [("a", "1"), ("b", "2")].into_iter().collect();
        let source: Configuration = [("b", "20"), ("c", "30")].into_iter().collect();

        target.copy_from(&source);

        assert_eq!(target.len(), 3);
        assert_eq!(target.get("a"), Some("1"));
        assert_eq!(target.get("b"), Some("20"));
        assert_eq!(target.get("c"), Some("30"));
    }

    #[test]
    fn test_set_strings_and_unset() {
        let mut config = Configuration::new();
        config.set_strings("dfs.domain.socket.path", ["/var/run/hdfs.sock"]);
        assert_eq!(config.get("dfs.domain.socket.path"), Some("/var/run/hdfs.sock"));

        config.set_strings("hosts", ["a", "b", "c"]);
        assert_eq!(config.get("hosts"), Some("a,b,c"));

        assert_eq!(config.unset("hosts").as_deref(), Some("a,b,c"));
        assert!(!config.contains_key("hosts"));
        assert_eq!(config.unset("hosts"), None);
    }

    #[test]
    fn test_properties_rendering_escapes() {
        let config: Configuration = [
            ("plain.key", "value"),
            ("key with=colon:", " leading space"),
            ("multi", "line\nbreak\\"),
        ]
        .into_iter()
        .collect();

        let rendered = config.to_properties_string();
        assert!(rendered.contains("plain.key=value\n"));
        assert!(rendered.contains("key\\ with\\=colon\\:=\\ leading space\n"));
        assert!(rendered.contains("multi=line\\nbreak\\\\\n"));
    }

    #[test]
    fn test_serde_as_flat_map() {
        let config: Configuration = [("orc.compress", "ZLIB")].into_iter().collect();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"orc.compress":"ZLIB"}"#);

        let back: Configuration = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
