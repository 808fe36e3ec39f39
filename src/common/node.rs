use super::Position;

use serde::Serialize;
use std::rc::Rc;

/// One agent's occupancy of one cell, as produced by a single-agent search.
///
/// Nodes are never mutated once built. A stationary agent shares the same
/// `Rc<SearchNode>` across every time step it waits in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchNode {
    pub position: Position,
    pub g_cost: usize,
    pub h_cost: usize,
    #[serde(skip)]
    pub parent: Option<Rc<SearchNode>>,
}

impl SearchNode {
    pub fn root(position: Position, h_cost: usize) -> Rc<Self> {
        Rc::new(SearchNode {
            position,
            g_cost: 0,
            h_cost,
            parent: None,
        })
    }

    // Uniform cost: every step, including a wait, costs one.
    pub fn child(parent: &Rc<SearchNode>, position: Position, h_cost: usize) -> Rc<Self> {
        Rc::new(SearchNode {
            position,
            g_cost: parent.g_cost + 1,
            h_cost,
            parent: Some(Rc::clone(parent)),
        })
    }

    pub fn f_cost(&self) -> usize {
        self.g_cost + self.h_cost
    }

    pub fn path(&self) -> Vec<Position> {
        let mut path = vec![self.position];
        let mut current = self.parent.as_ref();
        while let Some(node) = current {
            path.push(node.position);
            current = node.parent.as_ref();
        }
        path.reverse();
        path
    }
}
