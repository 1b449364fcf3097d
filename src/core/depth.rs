//! Depth policy: how many levels of a tree are exposed as menu before the
//! remainder collapses into a single content page.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{ReportError, Result};

/// Depth used when a per-key policy has neither the key nor a `default` entry
pub const DEFAULT_DEPTH: usize = 2;

/// Reserved per-key entry applied to keys that are not listed explicitly
pub const DEFAULT_KEY: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DepthSpec {
    /// One depth for every branch
    Uniform(usize),

    /// Depth per top-level key, with an optional `default` entry
    PerKey(HashMap<String, usize>),
}

impl DepthSpec {
    /// Effective depth for the subtree under the top-level `key`.
    ///
    /// Resolution never fails: a per-key policy that lists neither `key` nor
    /// `default` degrades to `fallback`.
    pub fn resolve(&self, key: &str, fallback: usize) -> usize {
        match self {
            DepthSpec::Uniform(depth) => *depth,
            DepthSpec::PerKey(depths) => depths
                .get(key)
                .or_else(|| depths.get(DEFAULT_KEY))
                .copied()
                .unwrap_or(fallback),
        }
    }

    /// Reject depths of zero; depth counting starts at 1 for the root's children.
    pub fn validate(&self) -> Result<()> {
        match self {
            DepthSpec::Uniform(0) => Err(ReportError::Config(
                "depth must be at least 1".to_string(),
            )),
            DepthSpec::Uniform(_) => Ok(()),
            DepthSpec::PerKey(depths) => {
                let mut zeroed: Vec<&str> = depths
                    .iter()
                    .filter(|(_, depth)| **depth == 0)
                    .map(|(key, _)| key.as_str())
                    .collect();
                if zeroed.is_empty() {
                    return Ok(());
                }
                zeroed.sort_unstable();
                Err(ReportError::Config(format!(
                    "depth must be at least 1 (offending keys: {})",
                    zeroed.join(", ")
                )))
            }
        }
    }

    /// Parse the command-line form: either `3` or `Reports=3,default=1`.
    pub fn parse_cli(input: &str) -> Result<Self> {
        let input = input.trim();
        if let Ok(depth) = input.parse::<usize>() {
            let spec = DepthSpec::Uniform(depth);
            spec.validate()?;
            return Ok(spec);
        }

        let mut depths = HashMap::new();
        for pair in input.split(',').filter(|p| !p.trim().is_empty()) {
            let (key, value) = pair.rsplit_once('=').ok_or_else(|| {
                ReportError::Config(format!("expected KEY=DEPTH, got '{}'", pair.trim()))
            })?;
            let depth = value.trim().parse::<usize>().map_err(|e| {
                ReportError::Config(format!("invalid depth '{}' for '{}': {}", value.trim(), key.trim(), e))
            })?;
            depths.insert(key.trim().to_string(), depth);
        }

        if depths.is_empty() {
            return Err(ReportError::Config("empty depth specification".to_string()));
        }

        let spec = DepthSpec::PerKey(depths);
        spec.validate()?;
        Ok(spec)
    }
}

impl Default for DepthSpec {
    fn default() -> Self {
        DepthSpec::Uniform(DEFAULT_DEPTH)
    }
}

impl fmt::Display for DepthSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepthSpec::Uniform(depth) => write!(f, "{}", depth),
            DepthSpec::PerKey(depths) => {
                let mut pairs: Vec<_> = depths.iter().collect();
                pairs.sort();
                let rendered: Vec<String> = pairs
                    .into_iter()
                    .map(|(key, depth)| format!("{}={}", key, depth))
                    .collect();
                write!(f, "{}", rendered.join(","))
            }
        }
    }
}
