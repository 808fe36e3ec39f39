use super::{JointState, Timeline};
use crate::common::{AgentId, Direction, Position};
use crate::error::TimelineError;
use crate::stat::Stats;

use serde::Serialize;
use std::fmt;
use tracing::{debug, instrument};

// Two agents trading cells between `time_step - 1` and `time_step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EdgeConflict {
    agent_a: AgentId,
    agent_b: AgentId,
    time_step: usize,
    pos_a_before: Position,
    pos_b_before: Position,
    pos_a_after: Position,
    pos_b_after: Position,
}

impl EdgeConflict {
    pub fn agent_a(&self) -> AgentId {
        self.agent_a
    }

    pub fn agent_b(&self) -> AgentId {
        self.agent_b
    }

    pub fn time_step(&self) -> usize {
        self.time_step
    }

    pub fn pos_a_before(&self) -> Position {
        self.pos_a_before
    }

    pub fn pos_b_before(&self) -> Position {
        self.pos_b_before
    }

    pub fn pos_a_after(&self) -> Position {
        self.pos_a_after
    }

    pub fn pos_b_after(&self) -> Position {
        self.pos_b_after
    }

    // One constraint per agent; the outer search branches on the two.
    pub fn constraints(&self) -> [MoveConstraint; 2] {
        [
            MoveConstraint {
                agent_id: self.agent_a,
                from: self.pos_a_before,
                to: self.pos_a_after,
                time_step: self.time_step,
            },
            MoveConstraint {
                agent_id: self.agent_b,
                from: self.pos_b_before,
                to: self.pos_b_after,
                time_step: self.time_step,
            },
        ]
    }
}

impl fmt::Display for EdgeConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "T:{} agent {} {} -> {}, agent {} {} -> {}",
            self.time_step,
            self.agent_a,
            self.pos_a_before,
            self.pos_a_after,
            self.agent_b,
            self.pos_b_before,
            self.pos_b_after
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MoveConstraint {
    pub agent_id: AgentId,
    pub from: Position,
    pub to: Position,
    pub time_step: usize,
}

impl MoveConstraint {
    pub fn is_violated(&self, from: Position, to: Position, time_step: usize) -> bool {
        self.from == from && self.to == to && self.time_step == time_step
    }
}

impl Timeline {
    // Agents are visited in ascending id order and the first swap wins.
    // Waits and diagonal moves are never checked.
    pub fn find_first_edge_conflict(
        &self,
        time_step: usize,
        current: &JointState,
        next: &JointState,
    ) -> Result<Option<EdgeConflict>, TimelineError> {
        for (agent_id, node) in current.iter() {
            let current_position = node.position;
            let next_position = next
                .position(agent_id)
                .ok_or(TimelineError::MissingAgent {
                    agent_id,
                    time_step: time_step + 1,
                })?;

            let direction = Direction::between(current_position, next_position);
            if !direction.is_cardinal() {
                continue;
            }

            let neighbor_position = current_position.step(direction);
            if let Some(conflict) = self.collision_with_neighbor(
                current_position,
                next_position,
                time_step,
                current,
                neighbor_position,
                agent_id,
            )? {
                return Ok(Some(conflict));
            }
        }

        Ok(None)
    }

    fn collision_with_neighbor(
        &self,
        current_position: Position,
        next_position: Position,
        time_step: usize,
        current: &JointState,
        neighbor_position: Position,
        agent_id: AgentId,
    ) -> Result<Option<EdgeConflict>, TimelineError> {
        let Some((neighbor_id, neighbor_node)) = current.agent_at(neighbor_position) else {
            return Ok(None);
        };

        // Without a recorded next state the neighbour is assumed to stay put.
        let Some(next_state) = self.state_at(time_step + 1) else {
            return Ok(None);
        };

        let neighbor_next_position =
            next_state
                .position(neighbor_id)
                .ok_or(TimelineError::MissingAgent {
                    agent_id: neighbor_id,
                    time_step: time_step + 1,
                })?;

        if next_position == neighbor_node.position && neighbor_next_position == current_position {
            Ok(Some(EdgeConflict {
                agent_a: agent_id,
                agent_b: neighbor_id,
                time_step: time_step + 1,
                pos_a_before: current_position,
                pos_b_before: neighbor_node.position,
                pos_a_after: next_position,
                pos_b_after: neighbor_next_position,
            }))
        } else {
            Ok(None)
        }
    }

    #[instrument(skip_all, level = "debug")]
    pub fn edge_conflicts(&self, stats: &mut Stats) -> Result<Vec<EdgeConflict>, TimelineError> {
        let mut conflicts = Vec::new();
        for (time_step, current, next) in self.transitions() {
            stats.transitions_checked += 1;
            if let Some(conflict) = self.find_first_edge_conflict(time_step, current, next)? {
                debug!("edge conflict: {conflict}");
                conflicts.push(conflict);
            }
        }
        stats.edge_conflicts += conflicts.len();
        Ok(conflicts)
    }

    #[instrument(skip_all, level = "debug")]
    pub fn first_edge_conflict(&self, stats: &mut Stats) -> Result<Option<EdgeConflict>, TimelineError> {
        for (time_step, current, next) in self.transitions() {
            stats.transitions_checked += 1;
            if let Some(conflict) = self.find_first_edge_conflict(time_step, current, next)? {
                debug!("edge conflict: {conflict}");
                stats.edge_conflicts += 1;
                return Ok(Some(conflict));
            }
        }
        Ok(None)
    }

    fn transitions(&self) -> impl Iterator<Item = (usize, &JointState, &JointState)> {
        self.states
            .iter()
            .zip(self.states.iter().skip(1))
            .filter(|((time_step, _), (next_time_step, _))| **next_time_step == **time_step + 1)
            .map(|((time_step, current), (_, next))| (*time_step, current, next))
    }
}
