use crate::common::{AgentId, Position, SearchNode};

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

// Ascending agent id order; conflict scans rely on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct JointState {
    nodes: BTreeMap<AgentId, Rc<SearchNode>>,
}

impl JointState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_node(&mut self, agent_id: AgentId, node: Rc<SearchNode>) {
        self.nodes.insert(agent_id, node);
    }

    pub fn node(&self, agent_id: AgentId) -> Option<&Rc<SearchNode>> {
        self.nodes.get(&agent_id)
    }

    pub fn position(&self, agent_id: AgentId) -> Option<Position> {
        self.nodes.get(&agent_id).map(|node| node.position)
    }

    pub fn agent_at(&self, position: Position) -> Option<(AgentId, &Rc<SearchNode>)> {
        self.nodes
            .iter()
            .find(|(_, node)| node.position == position)
            .map(|(agent_id, node)| (*agent_id, node))
    }

    pub fn contains_agent(&self, agent_id: AgentId) -> bool {
        self.nodes.contains_key(&agent_id)
    }

    pub fn agents(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.nodes.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AgentId, &Rc<SearchNode>)> {
        self.nodes.iter().map(|(agent_id, node)| (*agent_id, node))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl FromIterator<(AgentId, Rc<SearchNode>)> for JointState {
    fn from_iter<I: IntoIterator<Item = (AgentId, Rc<SearchNode>)>>(iter: I) -> Self {
        JointState {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for JointState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (agent_id, node) in &self.nodes {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{agent_id}:{}", node.position)?;
            first = false;
        }
        Ok(())
    }
}
