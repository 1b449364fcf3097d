//! Page and index rendering.
//!
//! Pages go through a [`ContentRenderer`] chosen by configuration: the
//! built-in HTML renderer, or an external command such as a notebook
//! execution pipeline. The index page goes through an [`IndexRenderer`].

mod renderer;
mod providers;
mod index;

pub use renderer::{error_marker, is_error_marker, render_all, render_guarded, ContentRenderer};
pub use providers::{create_renderer, CommandRenderer, HtmlRenderer};
pub use index::{IconMap, IndexContext, IndexRenderer, TeraIndexRenderer};
