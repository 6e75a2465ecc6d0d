//! Canvas surface: drag-to-move, drop-from-palette, click-to-connect and
//! edge geometry.

pub mod geometry;
pub mod surface;

pub use geometry::{EdgePath, NodeSize};
pub use surface::{CanvasSurface, KeyChord};
