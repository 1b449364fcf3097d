use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tera::escape_html;
use tokio::process::Command;
use tracing::debug;

use super::renderer::ContentRenderer;
use crate::config::RenderConfig;
use crate::core::paths::sanitize_name;
use crate::error::{ReportError, Result};

/// Factory function to create the page renderer named in config
pub fn create_renderer(config: &RenderConfig) -> Result<Arc<dyn ContentRenderer>> {
    match config.provider.as_str() {
        "builtin" | "html" => Ok(Arc::new(HtmlRenderer::new())),
        "command" => Ok(Arc::new(CommandRenderer::new(config)?)),
        _ => Err(ReportError::Config(format!(
            "Unsupported render provider: {}",
            config.provider
        ))),
    }
}

/// Built-in renderer: turns JSON payloads into plain HTML.
///
/// Strings are taken as HTML fragments, arrays of objects become tables,
/// objects become key/value tables and other values are escaped text.
#[derive(Debug, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        Self
    }

    fn render_value(&self, value: &Value, html: &mut String) {
        match value {
            Value::String(fragment) => html.push_str(fragment),
            Value::Array(rows) if !rows.is_empty() && rows.iter().all(Value::is_object) => {
                self.render_records(rows, html)
            }
            Value::Array(items) => {
                html.push_str("<ul>");
                for item in items {
                    html.push_str("<li>");
                    self.render_value(item, html);
                    html.push_str("</li>");
                }
                html.push_str("</ul>");
            }
            Value::Object(fields) => {
                html.push_str("<table class=\"fields\"><tbody>");
                for (key, field) in fields {
                    html.push_str(&format!("<tr><th>{}</th><td>", escape_html(key)));
                    self.render_value(field, html);
                    html.push_str("</td></tr>");
                }
                html.push_str("</tbody></table>");
            }
            Value::Null => html.push_str("<p><em>empty</em></p>"),
            scalar => html.push_str(&format!("<p>{}</p>", escape_html(&scalar.to_string()))),
        }
    }

    fn render_records(&self, rows: &[Value], html: &mut String) {
        let mut columns: Vec<&str> = Vec::new();
        for row in rows.iter().filter_map(Value::as_object) {
            for key in row.keys() {
                if !columns.contains(&key.as_str()) {
                    columns.push(key);
                }
            }
        }

        html.push_str("<table class=\"records\"><thead><tr>");
        for column in &columns {
            html.push_str(&format!("<th>{}</th>", escape_html(column)));
        }
        html.push_str("</tr></thead><tbody>");

        for row in rows.iter().filter_map(Value::as_object) {
            html.push_str("<tr>");
            for column in &columns {
                html.push_str("<td>");
                match row.get(*column) {
                    Some(Value::String(text)) => html.push_str(&escape_html(text)),
                    Some(Value::Null) | None => {}
                    Some(cell @ (Value::Array(_) | Value::Object(_))) => self.render_value(cell, html),
                    Some(cell) => html.push_str(&escape_html(&cell.to_string())),
                }
                html.push_str("</td>");
            }
            html.push_str("</tr>");
        }
        html.push_str("</tbody></table>");
    }
}

#[async_trait::async_trait]
impl ContentRenderer for HtmlRenderer {
    async fn render(&self, payload: &Value, report_name: &str, _scratch_dir: &Path) -> Result<String> {
        let mut html = format!(
            "<article class=\"report\"><h1>{}</h1>",
            escape_html(report_name)
        );
        self.render_value(payload, &mut html);
        html.push_str("</article>");
        Ok(html)
    }

    fn name(&self) -> &str {
        "builtin"
    }
}

/// Renders pages by running an external program, e.g. a notebook execution
/// and HTML conversion pipeline.
///
/// The payload is written as JSON to the scratch directory; the program must
/// write HTML to the `{output}` path it is given.
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    program: String,
    args: Vec<String>,
}

impl CommandRenderer {
    pub fn new(config: &RenderConfig) -> Result<Self> {
        let program = config.command.clone().ok_or_else(|| {
            ReportError::Config("render.command is required for the command provider".to_string())
        })?;

        Ok(Self {
            program,
            args: config.args.clone(),
        })
    }

    fn expand_args(&self, input: &Path, output: &Path, title: &str) -> Vec<String> {
        let input = input.to_string_lossy();
        let output = output.to_string_lossy();
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{input}", &input)
                    .replace("{output}", &output)
                    .replace("{title}", title)
            })
            .collect()
    }

    fn failure(&self, report_name: &str, message: String) -> ReportError {
        ReportError::Render {
            report: report_name.to_string(),
            message,
        }
    }
}

#[async_trait::async_trait]
impl ContentRenderer for CommandRenderer {
    async fn render(&self, payload: &Value, report_name: &str, scratch_dir: &Path) -> Result<String> {
        let stem = sanitize_name(report_name);
        let input_path = scratch_dir.join(format!("{}.json", stem));
        let output_path = scratch_dir.join(format!("{}.html", stem));

        tokio::fs::write(&input_path, serde_json::to_vec_pretty(payload)?).await?;

        let args = self.expand_args(&input_path, &output_path, report_name);
        debug!("Running {} {:?}", self.program, args);

        // kill_on_drop: a render abandoned on timeout must not leave the process behind
        let output = Command::new(&self.program)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| self.failure(report_name, format!("failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.failure(
                report_name,
                format!("{} exited with {}: {}", self.program, output.status, stderr.trim()),
            ));
        }

        tokio::fs::read_to_string(&output_path).await.map_err(|e| {
            self.failure(
                report_name,
                format!("no HTML produced at {}: {}", output_path.display(), e),
            )
        })
    }

    fn name(&self) -> &str {
        &self.program
    }
}
