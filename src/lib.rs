pub mod api;
pub mod canvas;
pub mod config;
pub mod dto;
pub mod error;
pub mod model;
pub mod palette;
pub mod properties;
pub mod store;
pub mod validate;
pub mod wasm;
