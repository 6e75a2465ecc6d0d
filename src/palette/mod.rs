//! Node palette: built-in templates plus marketplace connectors and
//! sub-workflows fetched from the API.

pub mod catalog;
pub mod template;

pub use catalog::{Palette, PaletteGroup, SUBWORKFLOW_LOGIC_PREFIX};
pub use template::{NodeTemplate, PaletteCategory};
