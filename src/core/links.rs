use super::menu::{Menu, MenuEntry};
use super::paths::{join_path, path_to_filename};

/// Replace every leaf position in `menu` with the filename of its page.
///
/// Paths are re-derived from each entry's position under `prefix` (`None` for
/// the root). The menu already records where traversal stopped, so no depth
/// policy is consulted here.
pub fn annotate_links(menu: &Menu, prefix: Option<&str>) -> Menu {
    menu.iter()
        .map(|(key, entry)| {
            let path = join_path(prefix, key);
            let linked = match entry {
                MenuEntry::Submenu(submenu) => MenuEntry::Submenu(annotate_links(submenu, Some(&path))),
                MenuEntry::Placeholder | MenuEntry::Content(_) | MenuEntry::Link(_) => {
                    MenuEntry::Link(path_to_filename(&path))
                }
            };
            (key.to_string(), linked)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::depth::DepthSpec;
    use crate::core::flatten::{flatten, Tree};
    use serde_json::{json, Value};

    fn linked(input: Value, depth: DepthSpec) -> Value {
        let tree: Tree = match input {
            Value::Object(map) => map,
            _ => panic!("test tree must be an object"),
        };
        let menu = flatten(&tree, &depth, 2).menu;
        serde_json::to_value(annotate_links(&menu, None)).unwrap()
    }

    #[test]
    fn test_placeholders_and_natural_leaves_become_filenames() {
        let menu = linked(
            json!({
                "Dashboard": {"Monthly Trend": [1, 2]},
                "Products": {"Overview": [3], "Categories": [4]},
                "Settings": "Report configuration"
            }),
            DepthSpec::Uniform(2),
        );

        assert_eq!(
            menu,
            json!({
                "Dashboard": {"Monthly Trend": "dashboard-monthly_trend.html"},
                "Products": {
                    "Overview": "products-overview.html",
                    "Categories": "products-categories.html"
                },
                "Settings": "settings.html"
            })
        );
    }

    #[test]
    fn test_depth_one_links_top_level_keys() {
        let menu = linked(
            json!({"Dashboard": {"Monthly Trend": [1]}, "Settings": "text"}),
            DepthSpec::Uniform(1),
        );
        assert_eq!(menu, json!({"Dashboard": "dashboard.html", "Settings": "settings.html"}));

        let keyed = linked(
            json!({"Dashboard": {"Monthly Trend": [1]}, "Products": {"Overview": [2]}}),
            DepthSpec::PerKey([("Dashboard".to_string(), 1)].into_iter().collect()),
        );
        assert_eq!(
            keyed,
            json!({"Dashboard": "dashboard.html", "Products": {"Overview": "products-overview.html"}})
        );
    }

    #[test]
    fn test_deep_links_follow_full_path() {
        let menu = linked(json!({"A": {"B c": {"D": {"E": 1}}}}), DepthSpec::Uniform(3));
        assert_eq!(menu, json!({"A": {"B c": {"D": "a-b_c-d.html"}}}));
    }

    #[test]
    fn test_empty_key_children_link_to_distinct_pages() {
        let menu = linked(json!({"": {"X": 1}, "X": 2}), DepthSpec::Uniform(3));
        assert_eq!(menu, json!({"": {"X": "-x.html"}, "X": "x.html"}));
    }

    #[test]
    fn test_prefix_and_idempotence() {
        let mut menu = Menu::new();
        menu.push("Overview", MenuEntry::Placeholder);

        let once = annotate_links(&menu, Some("Products"));
        assert_eq!(once.get("Overview").and_then(MenuEntry::as_link), Some("products-overview.html"));
        assert_eq!(annotate_links(&once, Some("Products")), once);
    }

    #[test]
    fn test_empty_menu() {
        assert!(annotate_links(&Menu::new(), None).is_empty());
    }
}
