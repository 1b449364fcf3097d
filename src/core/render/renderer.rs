use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::core::content_map::ContentMap;
use crate::error::{ReportError, Result};

/// Turns one content payload into an HTML page
#[async_trait::async_trait]
pub trait ContentRenderer: Send + Sync {
    /// Render `payload` for the report at `report_name`.
    ///
    /// `scratch_dir` is private to the current run and removed when it ends.
    async fn render(&self, payload: &Value, report_name: &str, scratch_dir: &Path) -> Result<String>;

    /// Renderer name for logging
    fn name(&self) -> &str;
}

const ERROR_MARKER_PREFIX: &str = "<div class='error'>Error processing report ";

/// Inline HTML shown in place of a page whose rendering failed
pub fn error_marker(report_name: &str, message: &str) -> String {
    format!(
        "{}{}: {}</div>",
        ERROR_MARKER_PREFIX,
        tera::escape_html(report_name),
        tera::escape_html(message)
    )
}

pub fn is_error_marker(html: &str) -> bool {
    html.starts_with(ERROR_MARKER_PREFIX)
}

/// Render one page, converting failures and timeouts into an error marker.
pub async fn render_guarded(
    renderer: &dyn ContentRenderer,
    payload: &Value,
    report_name: &str,
    scratch_dir: &Path,
    timeout: Duration,
) -> String {
    debug!("Rendering '{}' with {}", report_name, renderer.name());

    let error = match tokio::time::timeout(timeout, renderer.render(payload, report_name, scratch_dir)).await {
        Ok(Ok(html)) => return html,
        Ok(Err(e)) => e,
        Err(_) => ReportError::Timeout {
            report: report_name.to_string(),
            timeout,
        },
    };

    warn!("Error processing content for {}: {}", report_name, error);
    error_marker(report_name, &error.to_string())
}

/// Render every payload with at most `concurrency` renders in flight.
///
/// The result keeps the key order of `content`; completion order does not matter.
pub async fn render_all(
    renderer: Arc<dyn ContentRenderer>,
    content: ContentMap<Value>,
    scratch_dir: &Path,
    timeout: Duration,
    concurrency: usize,
) -> ContentMap<String> {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut handles = Vec::with_capacity(content.len());

    for (path, payload) in content {
        let renderer = Arc::clone(&renderer);
        let semaphore = Arc::clone(&semaphore);
        let scratch_dir = scratch_dir.to_path_buf();
        let report_name = path.clone();

        let handle = tokio::spawn(async move {
            // Held until the render finishes to bound concurrency
            let _permit = semaphore.acquire_owned().await.ok();
            render_guarded(renderer.as_ref(), &payload, &report_name, &scratch_dir, timeout).await
        });
        handles.push((path, handle));
    }

    let mut rendered = ContentMap::new();
    for (path, handle) in handles {
        let html = match handle.await {
            Ok(html) => html,
            Err(e) => {
                warn!("Render task for {} did not complete: {}", path, e);
                error_marker(&path, "render task did not complete")
            }
        };
        rendered.insert(path, html);
    }
    rendered
}
