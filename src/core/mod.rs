// src/core/mod.rs
mod assembler;
mod content_map;
mod depth;
mod engine;
mod flatten;
mod links;
mod menu;
mod paths;
mod toc;

// Page and index rendering
pub mod render;

pub use assembler::{AssembledReport, ReportAssembler, ReportSummary, INDEX_FILENAME};
pub use content_map::ContentMap;
pub use depth::{DepthSpec, DEFAULT_DEPTH, DEFAULT_KEY};
pub use flatten::{build_menu, collect_content, flatten, parse_tree, Flattened, Tree};
pub use links::annotate_links;
pub use menu::{Menu, MenuEntry};
pub use paths::{join_path, path_to_filename, sanitize_name, TABLE_OF_CONTENTS};
pub use toc::table_of_contents;

// Export the main engine
pub use engine::{Engine, CONFIG_FILENAME};
