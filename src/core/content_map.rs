use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Flat, insertion-ordered mapping from report path to content.
///
/// Keys are unique: inserting an existing path replaces its value in place.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentMap<T> {
    entries: Vec<(String, T)>,

    /// Position of each path in `entries`
    positions: HashMap<String, usize>,
}

impl<T> ContentMap<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Insert or replace; returns the previous value for `path`, if any.
    pub fn insert(&mut self, path: impl Into<String>, value: T) -> Option<T> {
        let path = path.into();
        match self.positions.get(&path).copied() {
            Some(index) => Some(std::mem::replace(&mut self.entries[index].1, value)),
            None => {
                self.positions.insert(path.clone(), self.entries.len());
                self.entries.push((path, value));
                None
            }
        }
    }

    pub fn get(&self, path: &str) -> Option<&T> {
        self.positions
            .get(path)
            .map(|&index| &self.entries[index].1)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(path, _)| path.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(path, value)| (path.as_str(), value))
    }
}

impl<T> Default for ContentMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IntoIterator for ContentMap<T> {
    type Item = (String, T);
    type IntoIter = std::vec::IntoIter<(String, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<T> FromIterator<(String, T)> for ContentMap<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        let mut map = ContentMap::new();
        for (path, value) in iter {
            map.insert(path, value);
        }
        map
    }
}

impl<T: Serialize> Serialize for ContentMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (path, value) in &self.entries {
            map.serialize_entry(path, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_order_and_uniqueness() {
        let mut map = ContentMap::new();
        assert_eq!(map.insert("b", 1), None);
        assert_eq!(map.insert("a", 2), None);
        assert_eq!(map.insert("b", 3), Some(1));

        assert_eq!(map.len(), 2);
        assert_eq!(map.paths().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(map.get("b"), Some(&3));
        assert!(!map.contains("c"));
    }

    #[test]
    fn test_lookup_after_many_inserts() {
        let map: ContentMap<usize> = (0..10_000).map(|i| (format!("Reports/{}", i), i)).collect();
        assert_eq!(map.len(), 10_000);
        assert_eq!(map.get("Reports/9999"), Some(&9999));
        assert_eq!(map.paths().next(), Some("Reports/0"));
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let map: ContentMap<&str> = vec![("z".to_string(), "1"), ("a".to_string(), "2")]
            .into_iter()
            .collect();
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"z":"1","a":"2"}"#);
    }
}
