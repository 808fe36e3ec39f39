use crate::common::AgentId;

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TimelineError {
    /// An agent present at one time step has no entry at the next one, which
    /// breaks the forward-carry invariant of the timeline.
    #[error("agent {agent_id} has no entry in the joint state at time step {time_step}")]
    MissingAgent { agent_id: AgentId, time_step: usize },
}
