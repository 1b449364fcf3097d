//! reportree: depth-driven HTML reports from nested data trees.
//!
//! A report tree is an ordered JSON object whose nested objects become menu
//! branches. A [`DepthSpec`](core::DepthSpec) decides, per top-level key, how
//! many levels are exposed as menu before the rest of a branch collapses into
//! one page. [`ReportAssembler`](core::ReportAssembler) renders those pages,
//! a table of contents and an index document, and writes them to a directory.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;

pub use crate::config::Config;
pub use crate::core::{
    annotate_links, build_menu, collect_content, flatten, path_to_filename, ContentMap, DepthSpec,
    Engine, Menu, MenuEntry, ReportAssembler, Tree,
};
pub use crate::error::{ReportError, Result};
