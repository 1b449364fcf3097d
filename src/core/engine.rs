// src/core/engine.rs
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{info, debug};

use crate::config::Config;
use crate::error::ReportError;
use super::{annotate_links, build_menu, parse_tree, DepthSpec, ReportAssembler, Tree};

/// Config file written by `init`
pub const CONFIG_FILENAME: &str = "Reportree.toml";

/// Main orchestration engine behind the command line
pub struct Engine {
    config: Config,
    assembler: ReportAssembler,
}

impl Engine {
    /// Create a new engine from the config at `config_path`, a discovered
    /// config file, or defaults
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = Config::load_or_default(config_path)?;
        Self::with_config(config)
    }

    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        debug!("Loaded configuration: {:?}", config);

        let assembler = ReportAssembler::from_config(&config)?;
        Ok(Self { config, assembler })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generate a full report from the JSON tree in `input`
    pub async fn generate(
        &self,
        input: &Path,
        output: Option<PathBuf>,
        title: Option<String>,
        depth: Option<DepthSpec>,
        active_report: Option<String>,
    ) -> Result<()> {
        let tree = load_tree(input)?;
        let output_dir = output.unwrap_or_else(|| self.config.report.output_dir.clone());
        let title = title.unwrap_or_else(|| self.config.report.title.clone());
        let depth = depth.unwrap_or_else(|| self.config.report.depth.clone());
        let active_report = active_report.or_else(|| self.config.report.active_report.clone());

        info!("📊 Generating '{}' from {}", title, input.display());
        info!("Output: {}", output_dir.display());
        info!("Depth: {}", depth);

        let summary = self
            .assembler
            .generate_report(&tree, &output_dir, &title, &depth, active_report.as_deref())
            .await
            .with_context(|| format!("Failed to generate report in {}", output_dir.display()))?;

        info!("✅ {} pages written, index at {}", summary.pages_written, summary.index_path.display());
        if !summary.failed_pages.is_empty() {
            info!("⚠️ {} pages contain rendering errors", summary.failed_pages.len());
        }

        Ok(())
    }

    /// Render one JSON payload to a standalone page
    pub async fn single(&self, input: &Path, name: &str, output: Option<PathBuf>) -> Result<()> {
        let content = std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))?;
        let payload: Value = serde_json::from_str(&content).map_err(ReportError::from)?;
        let output_dir = output.unwrap_or_else(|| self.config.report.output_dir.clone());

        let path = self
            .assembler
            .generate_simple_report(&payload, name, &output_dir)
            .await?;

        info!("✅ Wrote {}", path.display());
        Ok(())
    }

    /// Linked menu for the tree in `input`, as pretty JSON
    pub fn menu(&self, input: &Path, depth: Option<DepthSpec>) -> Result<String> {
        let tree = load_tree(input)?;
        let depth = depth.unwrap_or_else(|| self.config.report.depth.clone());

        let menu = build_menu(&tree, &depth, self.config.report.fallback_depth);
        let linked = annotate_links(&menu, None);
        Ok(serde_json::to_string_pretty(&linked)?)
    }

    /// Write a default configuration file into `path`
    pub fn init(&self, path: Option<PathBuf>, force: bool) -> Result<PathBuf> {
        let target_dir = match path {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };
        let config_path = target_dir.join(CONFIG_FILENAME);
        info!("Initializing reportree in: {}", target_dir.display());

        if config_path.exists() && !force {
            return Err(ReportError::Config(format!(
                "{} already exists (use --force to overwrite)",
                config_path.display()
            ))
            .into());
        }

        std::fs::create_dir_all(&target_dir)?;
        Config::default().save(&config_path)?;
        info!("✅ Wrote {}", config_path.display());
        Ok(config_path)
    }
}

fn load_tree(input: &Path) -> Result<Tree> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read report data from {}", input.display()))?;
    let tree = parse_tree(&content)
        .with_context(|| format!("Invalid report data in {}", input.display()))?;
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn write_json(dir: &Path, name: &str, value: Value) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, serde_json::to_string(&value).unwrap()).unwrap();
        path
    }

    fn engine() -> Engine {
        Engine::with_config(Config::default()).unwrap()
    }

    #[test]
    fn test_menu_preview() {
        let dir = tempdir().unwrap();
        let input = write_json(dir.path(), "data.json", json!({"A": {"B": {"C": "leaf"}}, "X": "text"}));

        let menu = engine().menu(&input, None).unwrap();
        let parsed: Value = serde_json::from_str(&menu).unwrap();
        assert_eq!(parsed, json!({"A": {"B": "a-b.html"}, "X": "x.html"}));

        let shallow = engine().menu(&input, Some(DepthSpec::Uniform(1))).unwrap();
        let parsed: Value = serde_json::from_str(&shallow).unwrap();
        assert_eq!(parsed, json!({"A": "a.html", "X": "x.html"}));
    }

    #[test]
    fn test_non_object_input_rejected() {
        let dir = tempdir().unwrap();
        let input = write_json(dir.path(), "data.json", json!([1, 2, 3]));
        assert!(engine().menu(&input, None).is_err());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        let engine = engine();

        let path = engine.init(Some(dir.path().to_path_buf()), false).unwrap();
        assert!(path.exists());
        assert!(Config::load(&path).is_ok());

        assert!(engine.init(Some(dir.path().to_path_buf()), false).is_err());
        assert!(engine.init(Some(dir.path().to_path_buf()), true).is_ok());
    }

    #[tokio::test]
    async fn test_generate_uses_config_defaults() {
        let dir = tempdir().unwrap();
        let input = write_json(dir.path(), "data.json", json!({"Dashboard": {"Trend": [1, 2]}}));
        let mut config = Config::default();
        config.report.output_dir = dir.path().join("out");
        config.report.title = "Configured".to_string();

        let engine = Engine::with_config(config).unwrap();
        engine.generate(&input, None, None, None, None).await.unwrap();

        let index = std::fs::read_to_string(dir.path().join("out").join("index.html")).unwrap();
        assert!(index.contains("<title>Configured</title>"));
        assert!(dir.path().join("out").join("dashboard-trend.html").exists());
    }
}
