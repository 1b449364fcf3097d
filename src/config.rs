use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::{DepthSpec, DEFAULT_DEPTH};
use crate::error::{ReportError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Report layout settings
    pub report: ReportConfig,

    /// Template customization
    pub templates: TemplateConfig,

    /// Page rendering settings
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Title shown in the index page
    pub title: String,

    /// Report output directory
    pub output_dir: PathBuf,

    /// Menu depth: an integer, or a table of top-level key to depth
    pub depth: DepthSpec,

    /// Depth for keys a per-key table covers neither directly nor via `default`
    pub fallback_depth: usize,

    /// Report path shown when the index opens (defaults to the table of contents)
    pub active_report: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Custom index template; the built-in template is used when unset
    pub report_template: Option<PathBuf>,

    /// JSON object mapping menu keys to icon names
    pub icon_mapping: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Page renderer (builtin, command)
    pub provider: String,

    /// Program run by the command renderer
    pub command: Option<String>,

    /// Arguments for the command renderer; `{input}`, `{output}` and `{title}` are substituted
    pub args: Vec<String>,

    /// Per-page render timeout in seconds
    pub timeout_secs: u64,

    /// Maximum number of pages rendered at once
    pub concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report: ReportConfig {
                title: "Report".to_string(),
                output_dir: PathBuf::from("report"),
                depth: DepthSpec::Uniform(DEFAULT_DEPTH),
                fallback_depth: DEFAULT_DEPTH,
                active_report: None,
            },
            templates: TemplateConfig {
                report_template: None,
                icon_mapping: PathBuf::from("templates/report_template_icons.json"),
            },
            render: RenderConfig {
                provider: "builtin".to_string(),
                command: None,
                args: vec![],
                timeout_secs: 300,
                concurrency: 1,
            },
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| ReportError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ReportError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration with fallback to default
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => {
                if p.as_ref().exists() {
                    Self::load(p)
                } else {
                    Ok(Self::default())
                }
            }
            None => {
                // Try common config file locations
                let candidates = [
                    "Reportree.toml",
                    "reportree.toml",
                    ".reportree.toml",
                ];

                for candidate in &candidates {
                    if Path::new(candidate).exists() {
                        return Self::load(candidate);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.report.depth.validate()?;

        if self.report.fallback_depth == 0 {
            return Err(ReportError::Config("fallback_depth must be at least 1".to_string()));
        }
        if self.render.concurrency == 0 {
            return Err(ReportError::Config("render.concurrency must be at least 1".to_string()));
        }
        if self.render.timeout_secs == 0 {
            return Err(ReportError::Config("render.timeout_secs must be at least 1".to_string()));
        }
        if self.render.provider == "command" && self.render.command.is_none() {
            return Err(ReportError::Config(
                "render.command is required for the command provider".to_string(),
            ));
        }

        Ok(())
    }
}
