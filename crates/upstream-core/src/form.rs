//! Ordered accumulator for plain form fields.
//!
//! One [`FormValues`] is created per streaming pass, appended to once per
//! field section in wire order, and consumed exactly once at end of stream,
//! either directly or through the model binder.

use serde::Serialize;

use crate::error::{UploadError, UploadResult};
use crate::limits::Limits;

/// Ordered multi-map of form field values.
///
/// Key matching is exact-string; insertion order is preserved per key and
/// across keys. The total value count across all keys is capped by
/// [`Limits::get_max_value_count`].
#[derive(Debug, Clone, Serialize)]
pub struct FormValues {
    entries: Vec<(String, Vec<String>)>,
    #[serde(skip)]
    value_count: usize,
    #[serde(skip)]
    max_value_count: usize,
}

impl FormValues {
    pub fn new(limits: &Limits) -> Self {
        Self {
            entries: Vec::new(),
            value_count: 0,
            max_value_count: limits.get_max_value_count(),
        }
    }

    /// Append one field value.
    ///
    /// The sentinel token `"undefined"` (case-insensitive) is normalized to
    /// an empty string before insertion; some client-side form libraries
    /// literally serialize an absent value as that text.
    pub fn append(&mut self, key: &str, value: String) -> UploadResult<()> {
        let value = if value.eq_ignore_ascii_case("undefined") {
            String::new()
        } else {
            value
        };

        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key.to_string(), vec![value])),
        }

        self.value_count += 1;
        if self.value_count > self.max_value_count {
            return Err(UploadError::ValueCountExceeded {
                limit: self.max_value_count,
            });
        }
        Ok(())
    }

    /// Get the first value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key).and_then(|values| {
            values.first().map(String::as_str)
        })
    }

    /// Get all values for a key, in order of occurrence.
    #[must_use]
    pub fn get_all(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    /// Iterate keys and their value sequences in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, values)| (k.as_str(), values.as_slice()))
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total value count across all keys.
    #[must_use]
    pub fn value_count(&self) -> usize {
        self.value_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> FormValues {
        FormValues::new(&Limits::default())
    }

    #[test]
    fn test_append_preserves_order() {
        let mut form = form();
        form.append("b", "1".to_string()).unwrap();
        form.append("a", "2".to_string()).unwrap();
        form.append("b", "3".to_string()).unwrap();

        let keys: Vec<&str> = form.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(form.get_all("b").unwrap(), &["1", "3"]);
        assert_eq!(form.get("b"), Some("1"));
        assert_eq!(form.len(), 2);
        assert_eq!(form.value_count(), 3);
    }

    #[test]
    fn test_undefined_sentinel_normalized() {
        let mut form = form();
        form.append("a", "undefined".to_string()).unwrap();
        form.append("b", "UnDeFiNeD".to_string()).unwrap();
        form.append("c", "undefined ".to_string()).unwrap();

        assert_eq!(form.get("a"), Some(""));
        assert_eq!(form.get("b"), Some(""));
        // Only the exact token is normalized.
        assert_eq!(form.get("c"), Some("undefined "));
    }

    #[test]
    fn test_value_count_ceiling() {
        let limits = Limits::new().max_value_count(2);
        let mut form = FormValues::new(&limits);
        form.append("a", "1".to_string()).unwrap();
        form.append("a", "2".to_string()).unwrap();
        let err = form.append("b", "3".to_string()).unwrap_err();
        assert!(matches!(err, UploadError::ValueCountExceeded { limit: 2 }));
    }

    #[test]
    fn test_keys_are_exact_match() {
        let mut form = form();
        form.append("Key", "1".to_string()).unwrap();
        assert_eq!(form.get("key"), None);
        assert_eq!(form.get("Key"), Some("1"));
    }

    #[test]
    fn test_serializes_as_ordered_entries() {
        let mut form = form();
        form.append("tags", "red".to_string()).unwrap();
        form.append("tags", "green".to_string()).unwrap();
        form.append("id", "42".to_string()).unwrap();

        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "entries": [["tags", ["red", "green"]], ["id", ["42"]]]
            })
        );
    }
}
