use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::collections::HashMap;

use super::paths::join_path;

/// One position in the navigation menu
#[derive(Debug, Clone, PartialEq)]
pub enum MenuEntry {
    /// Expanded branch
    Submenu(Menu),

    /// Depth limit reached; the collapsed subtree becomes one page
    Placeholder,

    /// Non-tree value reached before the depth limit
    Content(Value),

    /// Filename of the page this position links to
    Link(String),
}

impl MenuEntry {
    pub fn is_leaf(&self) -> bool {
        !matches!(self, MenuEntry::Submenu(_))
    }

    pub fn as_submenu(&self) -> Option<&Menu> {
        match self {
            MenuEntry::Submenu(menu) => Some(menu),
            _ => None,
        }
    }

    pub fn as_link(&self) -> Option<&str> {
        match self {
            MenuEntry::Link(filename) => Some(filename),
            _ => None,
        }
    }
}

/// Depth-pruned, insertion-ordered view of a report tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Menu {
    entries: Vec<(String, MenuEntry)>,

    /// Position of each key's first entry in `entries`
    positions: HashMap<String, usize>,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Callers build menus from maps, so keys are already unique.
    pub fn push(&mut self, key: impl Into<String>, entry: MenuEntry) {
        let key = key.into();
        self.positions.entry(key.clone()).or_insert(self.entries.len());
        self.entries.push((key, entry));
    }

    pub fn get(&self, key: &str) -> Option<&MenuEntry> {
        self.positions
            .get(key)
            .map(|&index| &self.entries[index].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MenuEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    /// Slash-joined paths of every leaf position, in menu order
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        self.collect_leaf_paths(None, &mut paths);
        paths
    }

    fn collect_leaf_paths(&self, prefix: Option<&str>, paths: &mut Vec<String>) {
        for (key, entry) in &self.entries {
            let path = join_path(prefix, key);
            match entry {
                MenuEntry::Submenu(menu) => menu.collect_leaf_paths(Some(&path), paths),
                _ => paths.push(path),
            }
        }
    }
}

impl FromIterator<(String, MenuEntry)> for Menu {
    fn from_iter<I: IntoIterator<Item = (String, MenuEntry)>>(iter: I) -> Self {
        let mut menu = Menu::new();
        for (key, entry) in iter {
            menu.push(key, entry);
        }
        menu
    }
}

// Serializes to the shape templates expect: nested objects for submenus, `{}`
// for placeholders, raw values for natural leaves and strings for links.
impl Serialize for Menu {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, entry) in &self.entries {
            map.serialize_entry(key, entry)?;
        }
        map.end()
    }
}

impl Serialize for MenuEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            MenuEntry::Submenu(menu) => menu.serialize(serializer),
            MenuEntry::Placeholder => serializer.serialize_map(Some(0))?.end(),
            MenuEntry::Content(value) => value.serialize(serializer),
            MenuEntry::Link(filename) => serializer.serialize_str(filename),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialized_shape() {
        let inner: Menu = vec![("B".to_string(), MenuEntry::Placeholder)].into_iter().collect();
        let menu: Menu = vec![
            ("A".to_string(), MenuEntry::Submenu(inner)),
            ("X".to_string(), MenuEntry::Content(json!("text"))),
            ("Y".to_string(), MenuEntry::Link("y.html".to_string())),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            serde_json::to_value(&menu).unwrap(),
            json!({"A": {"B": {}}, "X": "text", "Y": "y.html"})
        );
    }

    #[test]
    fn test_get_by_key() {
        let menu: Menu = (0..1_000)
            .map(|i| (format!("Page {}", i), MenuEntry::Link(format!("page_{}.html", i))))
            .collect();
        assert_eq!(menu.len(), 1_000);
        assert_eq!(menu.get("Page 999").and_then(MenuEntry::as_link), Some("page_999.html"));
        assert!(menu.get("Page 1000").is_none());
    }

    #[test]
    fn test_leaf_paths() {
        let mut inner = Menu::new();
        inner.push("Overview", MenuEntry::Placeholder);
        inner.push("Categories", MenuEntry::Placeholder);
        let mut menu = Menu::new();
        menu.push("Products", MenuEntry::Submenu(inner));
        menu.push("Settings", MenuEntry::Content(json!("text")));

        assert_eq!(
            menu.leaf_paths(),
            vec!["Products/Overview", "Products/Categories", "Settings"]
        );
    }
}
