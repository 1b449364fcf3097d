//! Canonical report paths and the filenames derived from them.

/// Reserved report name of the synthesized table of contents page
pub const TABLE_OF_CONTENTS: &str = "Table of Contents";

/// Separator between keys in a report path
pub const PATH_SEPARATOR: char = '/';

/// Join a parent path and a key; `None` denotes the root.
///
/// The root is tracked apart from the parent text so that children of a key
/// named `""` keep a leading separator (`"/X"`) instead of colliding with a
/// top-level `"X"`.
pub fn join_path(parent: Option<&str>, key: &str) -> String {
    match parent {
        None => key.to_string(),
        Some(parent) => format!("{}{}{}", parent, PATH_SEPARATOR, key),
    }
}

/// Filename stem for a report path: lower-cased, spaces to `_`, `/` to `-`.
///
/// Distinct paths that differ only in case or spacing map to the same stem.
pub fn sanitize_name(path: &str) -> String {
    path.to_lowercase()
        .replace(' ', "_")
        .replace(PATH_SEPARATOR, "-")
}

/// HTML filename for a report path, e.g. `Products/Overview` -> `products-overview.html`.
pub fn path_to_filename(path: &str) -> String {
    format!("{}.html", sanitize_name(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_path() {
        assert_eq!(join_path(None, "Dashboard"), "Dashboard");
        assert_eq!(join_path(Some("Products"), "Overview"), "Products/Overview");
        assert_eq!(join_path(Some("A/B"), "C"), "A/B/C");
    }

    #[test]
    fn test_join_path_under_empty_key() {
        assert_eq!(join_path(None, ""), "");
        assert_eq!(join_path(Some(""), "X"), "/X");
        assert_ne!(join_path(Some(""), "X"), join_path(None, "X"));
    }

    #[test]
    fn test_path_to_filename() {
        assert_eq!(path_to_filename("Products/Overview"), "products-overview.html");
        assert_eq!(path_to_filename("Dashboard/Monthly Trend"), "dashboard-monthly_trend.html");
        assert_eq!(path_to_filename(TABLE_OF_CONTENTS), "table_of_contents.html");
    }

    #[test]
    fn test_filename_is_deterministic_but_not_collision_free() {
        assert_eq!(path_to_filename("A b/C"), path_to_filename("A b/C"));
        // Known limitation: case and spacing differences collapse.
        assert_eq!(path_to_filename("Sales Report"), path_to_filename("sales_report"));
    }
}
