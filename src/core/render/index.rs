use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tera::{Context, Tera};
use tracing::{debug, warn};

use crate::core::menu::Menu;
use crate::error::Result;

const INDEX_TEMPLATE: &str = "report_template.html";
const MACROS_TEMPLATE: &str = "menu_macros.html";

const DEFAULT_INDEX_TEMPLATE: &str = include_str!("../../../templates/report_template.html");
const DEFAULT_MACROS: &str = include_str!("../../../templates/menu_macros.html");

/// Everything the index template can see
#[derive(Debug, Clone, Serialize)]
pub struct IndexContext<'a> {
    /// Menu with every leaf replaced by its page filename
    pub menu_structure: &'a Menu,

    /// Rendered HTML of the page shown when the index opens
    pub active_content: &'a str,

    /// Report path of `active_content`
    pub active_report: &'a str,

    pub report_title: &'a str,

    /// Filename of the table of contents page
    pub table_of_contents_link: &'a str,

    pub default_icons: &'a IconMap,

    pub generated_at: String,
}

/// Produces the index document from the linked menu and the active page
pub trait IndexRenderer: Send + Sync {
    fn render_index(&self, context: &IndexContext<'_>) -> Result<String>;
}

/// Tera-backed index renderer
pub struct TeraIndexRenderer {
    tera: Tera,
}

impl TeraIndexRenderer {
    /// Use the template at `template_path`, or the built-in template when `None`.
    ///
    /// Custom templates can `{% import "menu_macros.html" as macros %}`.
    pub fn new(template_path: Option<&Path>) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(MACROS_TEMPLATE, DEFAULT_MACROS)?;

        match template_path {
            Some(path) => {
                debug!("Loading index template from {}", path.display());
                tera.add_template_file(path, Some(INDEX_TEMPLATE))?;
            }
            None => tera.add_raw_template(INDEX_TEMPLATE, DEFAULT_INDEX_TEMPLATE)?,
        }

        Ok(Self { tera })
    }
}

impl IndexRenderer for TeraIndexRenderer {
    fn render_index(&self, context: &IndexContext<'_>) -> Result<String> {
        let context = Context::from_serialize(context)?;
        Ok(self.tera.render(INDEX_TEMPLATE, &context)?)
    }
}

/// Menu key to icon name
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct IconMap(BTreeMap<String, String>);

impl IconMap {
    /// Load a JSON object of key to icon name, falling back to the built-in
    /// mapping when the file is missing or malformed.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let loaded = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|content| {
                serde_json::from_str::<BTreeMap<String, String>>(&content).map_err(|e| e.to_string())
            });

        match loaded {
            Ok(icons) => {
                debug!("Loaded {} icon mappings from {}", icons.len(), path.display());
                Self(icons)
            }
            Err(e) => {
                warn!("Could not load icon mappings from {}: {}", path.display(), e);
                Self::fallback()
            }
        }
    }

    pub fn fallback() -> Self {
        Self(
            [
                ("Dashboard", "home"),
                ("Reports", "chart-bar"),
                ("Settings", "cog"),
                ("Table of Contents", "sitemap"),
            ]
            .into_iter()
            .map(|(key, icon)| (key.to_string(), icon.to_string()))
            .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for IconMap {
    fn default() -> Self {
        Self::fallback()
    }
}
