use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::content_map::ContentMap;
use super::depth::{DepthSpec, DEFAULT_DEPTH};
use super::flatten::{flatten, Flattened, Tree};
use super::links::annotate_links;
use super::menu::Menu;
use super::paths::{path_to_filename, TABLE_OF_CONTENTS};
use super::render::{
    create_renderer, is_error_marker, render_all, render_guarded, ContentRenderer, IconMap,
    IndexContext, IndexRenderer, TeraIndexRenderer,
};
use super::toc::table_of_contents;
use crate::config::Config;
use crate::error::Result;

/// Name of the index document written into the output directory
pub const INDEX_FILENAME: &str = "index.html";

const SCRATCH_PREFIX: &str = ".reportree-scratch-";

/// Result of one assembly run, before anything is written
#[derive(Debug, Clone)]
pub struct AssembledReport {
    pub index_document: String,

    /// Menu with every leaf replaced by its page filename
    pub linked_menu: Menu,

    /// Rendered pages keyed by report path, including the table of contents
    pub pages: ContentMap<String>,
}

impl AssembledReport {
    /// `(filename, html)` for every page
    pub fn files(&self) -> impl Iterator<Item = (String, &str)> {
        self.pages
            .iter()
            .map(|(path, html)| (path_to_filename(path), html.as_str()))
    }

    /// Report paths whose rendering failed and hold an error marker instead
    pub fn failed_pages(&self) -> Vec<&str> {
        self.pages
            .iter()
            .filter(|(_, html)| is_error_marker(html))
            .map(|(path, _)| path)
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct ReportSummary {
    pub output_dir: PathBuf,
    pub index_path: PathBuf,
    pub pages_written: usize,
    pub failed_pages: Vec<String>,
}

/// Orchestrates flattening, rendering, link annotation and writing
pub struct ReportAssembler {
    renderer: Arc<dyn ContentRenderer>,
    index_renderer: Box<dyn IndexRenderer>,
    icons: IconMap,
    fallback_depth: usize,
    render_timeout: Duration,
    concurrency: usize,
}

impl ReportAssembler {
    pub fn new(
        renderer: Arc<dyn ContentRenderer>,
        index_renderer: Box<dyn IndexRenderer>,
        icons: IconMap,
    ) -> Self {
        Self {
            renderer,
            index_renderer,
            icons,
            fallback_depth: DEFAULT_DEPTH,
            render_timeout: Duration::from_secs(300),
            concurrency: 1,
        }
    }

    /// Build renderers, icons and limits from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let renderer = create_renderer(&config.render)?;
        let index_renderer = TeraIndexRenderer::new(config.templates.report_template.as_deref())?;
        let icons = IconMap::load(&config.templates.icon_mapping);

        info!("Using {} page renderer", renderer.name());

        Ok(Self::new(renderer, Box::new(index_renderer), icons)
            .with_fallback_depth(config.report.fallback_depth)
            .with_render_timeout(Duration::from_secs(config.render.timeout_secs))
            .with_concurrency(config.render.concurrency))
    }

    pub fn with_fallback_depth(mut self, fallback_depth: usize) -> Self {
        self.fallback_depth = fallback_depth;
        self
    }

    pub fn with_render_timeout(mut self, timeout: Duration) -> Self {
        self.render_timeout = timeout;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Build every page and the index document for `tree`.
    ///
    /// A page that fails to render holds an error marker; a failing index
    /// template aborts the run.
    pub async fn assemble(
        &self,
        tree: &Tree,
        depth: &DepthSpec,
        title: &str,
        active_report: Option<&str>,
        scratch_dir: &Path,
    ) -> Result<AssembledReport> {
        let Flattened { menu, content } = flatten(tree, depth, self.fallback_depth);
        info!(
            "Flattened {} top-level keys into {} pages (depth {})",
            menu.len(),
            content.len(),
            depth
        );

        let mut pending = content;
        let toc = table_of_contents(&menu);
        if pending.insert(TABLE_OF_CONTENTS, Value::String(toc)).is_some() {
            warn!("Report data has its own '{}' entry; it is replaced by the generated one", TABLE_OF_CONTENTS);
        }

        let pages = render_all(
            Arc::clone(&self.renderer),
            pending,
            scratch_dir,
            self.render_timeout,
            self.concurrency,
        )
        .await;

        let linked_menu = annotate_links(&menu, None);

        let active_report = match active_report {
            Some(path) if pages.contains(path) => path,
            Some(path) => {
                warn!("Active report '{}' not found, showing {}", path, TABLE_OF_CONTENTS);
                TABLE_OF_CONTENTS
            }
            None => TABLE_OF_CONTENTS,
        };
        let active_content = pages.get(active_report).map(String::as_str).unwrap_or_default();
        let toc_link = path_to_filename(TABLE_OF_CONTENTS);

        let index_document = self.index_renderer.render_index(&IndexContext {
            menu_structure: &linked_menu,
            active_content,
            active_report,
            report_title: title,
            table_of_contents_link: &toc_link,
            default_icons: &self.icons,
            generated_at: chrono::Utc::now().to_rfc3339(),
        })?;

        Ok(AssembledReport {
            index_document,
            linked_menu,
            pages,
        })
    }

    /// Generate a full report directory: one page per leaf, the table of
    /// contents, and `index.html`.
    ///
    /// The scratch directory is removed before returning, on success or failure.
    pub async fn generate_report(
        &self,
        tree: &Tree,
        output_dir: &Path,
        title: &str,
        depth: &DepthSpec,
        active_report: Option<&str>,
    ) -> Result<ReportSummary> {
        std::fs::create_dir_all(output_dir)?;
        let scratch = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(output_dir)?;
        debug!("Scratch directory: {}", scratch.path().display());

        let outcome = self
            .write_report(tree, output_dir, title, depth, active_report, scratch.path())
            .await;

        if let Err(e) = scratch.close() {
            warn!("Could not remove scratch directory: {}", e);
        }
        if let Err(ref e) = outcome {
            error!("Error generating report: {}", e);
        }

        outcome
    }

    async fn write_report(
        &self,
        tree: &Tree,
        output_dir: &Path,
        title: &str,
        depth: &DepthSpec,
        active_report: Option<&str>,
        scratch_dir: &Path,
    ) -> Result<ReportSummary> {
        let report = self
            .assemble(tree, depth, title, active_report, scratch_dir)
            .await?;

        let mut pages_written = 0;
        for (filename, html) in report.files() {
            if filename == INDEX_FILENAME {
                warn!("A page maps to {}; the index document takes its place", INDEX_FILENAME);
                continue;
            }
            std::fs::write(output_dir.join(&filename), html)?;
            pages_written += 1;
        }

        let index_path = output_dir.join(INDEX_FILENAME);
        std::fs::write(&index_path, &report.index_document)?;

        let failed_pages: Vec<String> = report.failed_pages().into_iter().map(str::to_string).collect();
        if !failed_pages.is_empty() {
            warn!("{} pages failed to render: {}", failed_pages.len(), failed_pages.join(", "));
        }
        info!("Report written to {} ({} pages)", output_dir.display(), pages_written);

        Ok(ReportSummary {
            output_dir: output_dir.to_path_buf(),
            index_path,
            pages_written,
            failed_pages,
        })
    }

    /// Render a single payload to `<output_dir>/<filename of report_name>`,
    /// without menu, table of contents or index.
    pub async fn generate_simple_report(
        &self,
        payload: &Value,
        report_name: &str,
        output_dir: &Path,
    ) -> Result<PathBuf> {
        std::fs::create_dir_all(output_dir)?;
        let scratch = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(output_dir)?;

        let html = render_guarded(
            self.renderer.as_ref(),
            payload,
            report_name,
            scratch.path(),
            self.render_timeout,
        )
        .await;

        let report_path = output_dir.join(path_to_filename(report_name));
        let written = std::fs::write(&report_path, html);

        if let Err(e) = scratch.close() {
            warn!("Could not remove scratch directory: {}", e);
        }
        written?;

        info!("Report created successfully: {}", report_path.display());
        Ok(report_path)
    }
}
