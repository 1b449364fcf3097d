//! Depth-driven flattening of a report tree.
//!
//! A single traversal produces both the navigation [`Menu`] and the flat
//! [`ContentMap`] of payloads, so the two views always agree on where
//! traversal stopped. The depth for each top-level key is resolved once and
//! reused for that key's whole subtree.

use serde_json::Value;
use tracing::{debug, warn};

use super::content_map::ContentMap;
use super::depth::DepthSpec;
use super::menu::{Menu, MenuEntry};
use super::paths::join_path;
use crate::error::{ReportError, Result};

/// Ordered report tree; any JSON object value is a nested tree, anything else is content
pub type Tree = serde_json::Map<String, Value>;

/// Both projections of one traversal
#[derive(Debug, Clone)]
pub struct Flattened {
    pub menu: Menu,
    pub content: ContentMap<Value>,
}

/// Parse a report tree from JSON text. The document root must be an object.
pub fn parse_tree(json: &str) -> Result<Tree> {
    match serde_json::from_str::<Value>(json)? {
        Value::Object(tree) => Ok(tree),
        other => Err(ReportError::Config(format!(
            "report data must be a JSON object at the top level, found {}",
            json_kind(&other)
        ))),
    }
}

/// Flatten `tree` under `depth`, using `fallback` for keys a per-key policy does not cover.
pub fn flatten(tree: &Tree, depth: &DepthSpec, fallback: usize) -> Flattened {
    let mut content = ContentMap::new();
    let mut menu = Menu::new();

    for (key, value) in tree {
        let limit = depth.resolve(key, fallback);
        debug!("Flattening '{}' to depth {}", key, limit);
        if let Some(entry) = visit(key, value, None, 1, limit, &mut content) {
            menu.push(key.clone(), entry);
        }
    }

    Flattened { menu, content }
}

/// Navigation menu for `tree`; see [`flatten`].
pub fn build_menu(tree: &Tree, depth: &DepthSpec, fallback: usize) -> Menu {
    flatten(tree, depth, fallback).menu
}

/// Payloads keyed by report path; see [`flatten`].
pub fn collect_content(tree: &Tree, depth: &DepthSpec, fallback: usize) -> ContentMap<Value> {
    flatten(tree, depth, fallback).content
}

/// Visit one position. Returns `None` when an expanded branch pruned down to
/// nothing; such keys are dropped from the menu rather than kept as empty maps.
fn visit(
    key: &str,
    value: &Value,
    prefix: Option<&str>,
    current_depth: usize,
    limit: usize,
    content: &mut ContentMap<Value>,
) -> Option<MenuEntry> {
    let path = join_path(prefix, key);
    let limit_reached = current_depth >= limit;

    match value {
        Value::Object(children) if !limit_reached => {
            let submenu: Menu = children
                .iter()
                .filter_map(|(child_key, child)| {
                    visit(child_key, child, Some(&path), current_depth + 1, limit, content)
                        .map(|entry| (child_key.clone(), entry))
                })
                .collect();

            if submenu.is_empty() {
                None
            } else {
                Some(MenuEntry::Submenu(submenu))
            }
        }
        _ => {
            if content.insert(path.clone(), value.clone()).is_some() {
                warn!("Report path '{}' occurs more than once; the later page replaces the earlier one", path);
            }
            if limit_reached {
                Some(MenuEntry::Placeholder)
            } else {
                Some(MenuEntry::Content(value.clone()))
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
