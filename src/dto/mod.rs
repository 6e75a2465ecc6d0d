//! Translation to and from the backend workflow definition DTO.

pub mod translate;
pub mod types;

pub use translate::{from_definition, parse_definition, to_definition};
pub use types::*;
