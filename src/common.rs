mod node;
mod position;

pub use node::SearchNode;
pub use position::{Direction, Position};

pub type AgentId = usize;
