use tera::escape_html;

use super::menu::{Menu, MenuEntry};
use super::paths::{join_path, path_to_filename};

/// Build the table of contents fragment for an unlinked menu.
///
/// Non-empty submenus nest another list; every other position links to the
/// page its path produces.
pub fn table_of_contents(menu: &Menu) -> String {
    let mut html = String::new();
    write_list(menu, None, &mut html);
    html
}

fn write_list(menu: &Menu, prefix: Option<&str>, html: &mut String) {
    html.push_str("<ul>");
    for (key, entry) in menu.iter() {
        let path = join_path(prefix, key);
        let label = escape_html(key);
        html.push_str(&format!("<li><strong>{}</strong>", label));

        match entry {
            MenuEntry::Submenu(submenu) if !submenu.is_empty() => write_list(submenu, Some(&path), html),
            _ => html.push_str(&format!(
                " - <a href=\"{}\">{}</a>",
                escape_html(&path_to_filename(&path)),
                label
            )),
        }

        html.push_str("</li>");
    }
    html.push_str("</ul>");
}
