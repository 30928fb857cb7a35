//! Multi-valued query parameters.

use std::collections::{BTreeMap, HashMap};

/// Query parameters as key to list of values, the shape of a parsed URL query.
///
/// Keys iterate in sorted order so compilation is deterministic. Only the first
/// value of a key is used by the compiler.
///
/// ```
/// use sift::Params;
///
/// let params: Params = [("age_gte", "18"), ("sort", "-name")].into_iter().collect();
/// assert_eq!(params.get("age_gte"), Some("18"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: BTreeMap<String, Vec<String>>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value under `key`.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(key.into()).or_default().push(value.into());
    }

    /// Replaces all values under `key` with one value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), vec![value.into()]);
    }

    /// Builder form of [`append`](Self::append).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(key, value);
        self
    }

    /// First value under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(|v| v.first()).map(String::as_str)
    }

    /// All values under `key`.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.values.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Keys with their first value, in key order. Keys without values are skipped.
    pub fn first_values(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .filter_map(|(key, values)| values.first().map(|v| (key.as_str(), v.as_str())))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.append(key, value);
        }
        params
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Params {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.append(key, value);
        }
    }
}

impl From<HashMap<String, Vec<String>>> for Params {
    fn from(values: HashMap<String, Vec<String>>) -> Self {
        Params {
            values: values.into_iter().collect(),
        }
    }
}

impl From<BTreeMap<String, Vec<String>>> for Params {
    fn from(values: BTreeMap<String, Vec<String>>) -> Self {
        Params { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_value_wins() {
        let params: Params = [("age", "1"), ("age", "2")].into_iter().collect();
        assert_eq!(params.get("age"), Some("1"));
        assert_eq!(params.get_all("age").len(), 2);
    }

    #[test]
    fn keys_iterate_sorted() {
        let params = Params::new().with("z", "1").with("a", "2").with("m", "3");
        let keys: Vec<&str> = params.first_values().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "m", "z"]);
    }

    #[test]
    fn empty_value_lists_are_skipped() {
        let mut raw = HashMap::new();
        raw.insert("name".to_string(), Vec::new());
        raw.insert("age".to_string(), vec!["3".to_string()]);
        let params = Params::from(raw);
        assert_eq!(params.first_values().count(), 1);
        assert_eq!(params.get("name"), None);
    }

    #[test]
    fn set_replaces() {
        let mut params = Params::new().with("page", "1").with("page", "2");
        params.set("page", "5");
        assert_eq!(params.get_all("page"), &["5".to_string()]);
    }
}
