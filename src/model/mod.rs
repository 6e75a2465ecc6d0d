//! In-memory workflow graph: nodes, connections and workflow metadata.

pub mod connection;
pub mod node;
pub mod workflow;

pub use connection::{Connection, GraphSnapshot};
pub use node::*;
pub use workflow::{WorkflowMeta, WorkflowStatus};
