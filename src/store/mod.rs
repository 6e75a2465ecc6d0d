//! Graph state store with undo/redo history and change subscriptions.

pub mod graph;
pub mod history;
pub mod listeners;

pub use graph::{GraphStore, NodePatch};
pub use history::History;
pub use listeners::{StoreEvent, SubscriptionId};
