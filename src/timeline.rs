mod conflict;
mod state;

pub use conflict::{EdgeConflict, MoveConstraint};
pub use state::JointState;

use crate::common::{AgentId, SearchNode};

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use tracing::trace;

// Joint states keyed by time step. A new time step starts as a copy of the
// closest earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Timeline {
    states: BTreeMap<usize, JointState>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_or_update(
        &mut self,
        initial_state: &JointState,
        time_step: usize,
        agent_id: AgentId,
        node: Rc<SearchNode>,
    ) {
        if let Some(state) = self.states.get_mut(&time_step) {
            state.set_node(agent_id, node);
            return;
        }

        // Clone the latest earlier time step, or the baseline if there is none.
        let mut state = self
            .states
            .range(..time_step)
            .next_back()
            .map(|(_, previous)| previous.clone())
            .unwrap_or_else(|| initial_state.clone());
        state.set_node(agent_id, node);
        trace!("create time step {time_step}: {state}");
        self.states.insert(time_step, state);
    }

    pub fn extend_agent_forward(&mut self, from_time_step: usize, agent_id: AgentId, node: Rc<SearchNode>) {
        let mut time_step = from_time_step;
        while let Some(state) = self.states.get_mut(&time_step) {
            state.set_node(agent_id, Rc::clone(&node));
            time_step = match time_step.checked_add(1) {
                Some(next) => next,
                None => break,
            };
        }
    }

    // The agent waits on its last node wherever the timeline runs longer.
    pub fn add_plan(&mut self, initial_state: &JointState, agent_id: AgentId, plan: &[Rc<SearchNode>]) {
        for (time_step, node) in plan.iter().enumerate() {
            self.add_or_update(initial_state, time_step, agent_id, Rc::clone(node));
        }
        if let Some(goal) = plan.last() {
            self.extend_agent_forward(plan.len(), agent_id, Rc::clone(goal));
        }
    }

    // Past the last recorded time step agents are assumed to stay put.
    pub fn state_at(&self, time_step: usize) -> Option<&JointState> {
        self.states
            .get(&time_step)
            .or_else(|| self.states.last_key_value().map(|(_, state)| state))
    }

    pub fn last_time_step(&self) -> Option<usize> {
        self.states.last_key_value().map(|(time_step, _)| *time_step)
    }

    pub fn agent_count(&self) -> usize {
        self.states
            .last_key_value()
            .map_or(0, |(_, state)| state.len())
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &JointState)> {
        self.states.iter().map(|(time_step, state)| (*time_step, state))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }
}

impl fmt::Display for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (time_step, state) in &self.states {
            writeln!(f, "T:{time_step} {state}")?;
        }
        Ok(())
    }
}
