use anyhow::{bail, Context, Result};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::rc::Rc;
use tracing::info;

use crate::common::{AgentId, Direction, Position, SearchNode};
use crate::timeline::{JointState, Timeline};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentPlan {
    pub id: AgentId,
    pub path: Vec<[i32; 2]>,
}

impl AgentPlan {
    // Uniform-cost search towards the last cell of the path.
    pub fn search_nodes(&self) -> Vec<Rc<SearchNode>> {
        let Some(&goal) = self.path.last() else {
            return Vec::new();
        };
        let goal = Position::from(goal);

        let mut nodes: Vec<Rc<SearchNode>> = Vec::with_capacity(self.path.len());
        for &cell in &self.path {
            let position = Position::from(cell);
            let h_cost = position.manhattan_distance(&goal) as usize;
            let node = match nodes.last() {
                Some(parent) => SearchNode::child(parent, position, h_cost),
                None => SearchNode::root(position, h_cost),
            };
            nodes.push(node);
        }
        nodes
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Scenario {
    pub agents: Vec<AgentPlan>,
}

impl Scenario {
    pub fn load_from_file(path: &str) -> Result<Scenario> {
        let file = File::open(path).with_context(|| format!("cannot open plan file {path}"))?;
        let reader = BufReader::new(file);
        let scenario: Scenario = serde_yaml::from_reader(reader)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Scenario> {
        let scenario: Scenario = serde_yaml::from_str(yaml)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::new();
        for agent in &self.agents {
            if !ids.insert(agent.id) {
                bail!("Agent {} appears more than once", agent.id);
            }
            if agent.path.is_empty() {
                bail!("Agent {} has an empty path", agent.id);
            }
            for (time_step, cells) in agent.path.windows(2).enumerate() {
                let from = Position::from(cells[0]);
                let to = Position::from(cells[1]);
                if !from.is_adjacent_or_same(&to) {
                    bail!(
                        "Agent {} jumps from {from} to {to} at time step {}",
                        agent.id,
                        time_step + 1
                    );
                }
            }
        }
        Ok(())
    }

    /// Random plans on a `width` x `height` grid: distinct start cells, then
    /// at every step a uniformly chosen in-bounds cardinal move or a wait.
    pub fn random_walks<R: Rng + ?Sized>(
        num_agents: usize,
        steps: usize,
        width: usize,
        height: usize,
        rng: &mut R,
    ) -> Result<Scenario> {
        let mut cells: Vec<[i32; 2]> = (0..width as i32)
            .flat_map(|x| (0..height as i32).map(move |y| [x, y]))
            .collect();
        if cells.len() < num_agents {
            bail!("Not enough cells available to place {num_agents} agents");
        }
        cells.shuffle(rng);

        let moves = [
            Direction::Stay,
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
        ];
        let in_bounds = |position: Position| {
            position.x >= 0
                && position.y >= 0
                && (position.x as usize) < width
                && (position.y as usize) < height
        };

        let mut agents = Vec::with_capacity(num_agents);
        for (id, &start) in cells.iter().take(num_agents).enumerate() {
            let mut path = vec![start];
            let mut current = Position::from(start);
            for _ in 0..steps {
                let candidates: Vec<Position> = moves
                    .iter()
                    .map(|&direction| current.step(direction))
                    .filter(|&position| in_bounds(position))
                    .collect();
                // Waiting is always in bounds, so there is a candidate.
                if let Some(&next) = candidates.choose(rng) {
                    current = next;
                }
                path.push(current.into());
            }
            agents.push(AgentPlan { id, path });
        }

        info!("Generate {num_agents} random walks of {steps} steps");
        Ok(Scenario { agents })
    }

    pub fn write_to_yaml(&self, path: &str) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = io::BufWriter::new(file);
        let yaml_data = serde_yaml::to_string(self)?;
        writer.write_all(yaml_data.as_bytes())?;

        Ok(())
    }

    pub fn build_timeline(&self) -> Timeline {
        let plans: Vec<(AgentId, Vec<Rc<SearchNode>>)> = self
            .agents
            .iter()
            .map(|agent| (agent.id, agent.search_nodes()))
            .filter(|(_, nodes)| !nodes.is_empty())
            .collect();

        let initial_state: JointState = plans
            .iter()
            .map(|(agent_id, nodes)| (*agent_id, Rc::clone(&nodes[0])))
            .collect();

        let mut timeline = Timeline::new();
        for (agent_id, nodes) in &plans {
            timeline.add_plan(&initial_state, *agent_id, nodes);
        }
        timeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stat::Stats;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SWAP: &str = "
agents:
  - id: 0
    path: [[0, 0], [1, 0], [2, 0]]
  - id: 1
    path: [[1, 0], [0, 0]]
";

    #[test]
    fn test_read_scenario() {
        let scenario = Scenario::from_yaml_str(SWAP).unwrap();

        assert_eq!(scenario.agents.len(), 2);
        assert_eq!(scenario.agents[1].path, vec![[1, 0], [0, 0]]);
    }

    #[test]
    fn test_build_timeline() {
        let timeline = Scenario::from_yaml_str(SWAP).unwrap().build_timeline();

        assert_eq!(timeline.len(), 3);
        assert_eq!(timeline.agent_count(), 2);
        // Agent 1 waits on its goal once its plan is over.
        assert_eq!(timeline.state_at(2).unwrap().position(1), Some(Position::new(0, 0)));

        let mut stats = Stats::default();
        let conflict = timeline.first_edge_conflict(&mut stats).unwrap().unwrap();
        assert_eq!((conflict.agent_a(), conflict.agent_b()), (0, 1));
        assert_eq!(conflict.time_step(), 1);
    }

    #[test]
    fn test_load_demo_plan() {
        let scenario = Scenario::load_from_file("demos/swap.yaml").unwrap();
        let timeline = scenario.build_timeline();
        assert_eq!(timeline.len(), 4);

        let mut stats = Stats::default();
        let conflicts = timeline.edge_conflicts(&mut stats).unwrap();
        assert_eq!(stats.transitions_checked, 3);
        assert_eq!(conflicts.len(), 2);
        assert_eq!((conflicts[0].agent_a(), conflicts[0].agent_b()), (0, 1));
        assert_eq!((conflicts[1].agent_a(), conflicts[1].agent_b()), (0, 2));
        assert_eq!(conflicts[1].time_step(), 3);
    }

    #[test]
    fn test_search_nodes_costs() {
        let plan = AgentPlan {
            id: 0,
            path: vec![[0, 0], [0, 1], [0, 1], [1, 1]],
        };
        let nodes = plan.search_nodes();

        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[0].h_cost, 2);
        assert_eq!(nodes[3].g_cost, 3);
        assert_eq!(nodes[3].h_cost, 0);
        assert_eq!(nodes[3].path().len(), 4);
    }

    #[test]
    fn test_invalid_scenarios() {
        let duplicate = "agents:\n  - id: 0\n    path: [[0, 0]]\n  - id: 0\n    path: [[1, 1]]\n";
        assert!(Scenario::from_yaml_str(duplicate).is_err());

        let empty = "agents:\n  - id: 0\n    path: []\n";
        assert!(Scenario::from_yaml_str(empty).is_err());

        let jump = "agents:\n  - id: 0\n    path: [[0, 0], [2, 0]]\n";
        assert!(Scenario::from_yaml_str(jump).is_err());
    }

    #[test]
    fn test_random_walks() {
        let mut rng = StdRng::seed_from_u64(0);
        let scenario = Scenario::random_walks(6, 20, 5, 4, &mut rng).unwrap();

        assert_eq!(scenario.agents.len(), 6);
        assert!(scenario.validate().is_ok());

        let starts: HashSet<[i32; 2]> = scenario.agents.iter().map(|agent| agent.path[0]).collect();
        assert_eq!(starts.len(), 6);
        for agent in &scenario.agents {
            assert_eq!(agent.path.len(), 21);
            assert!(agent
                .path
                .iter()
                .all(|&[x, y]| (0..5).contains(&x) && (0..4).contains(&y)));
        }

        let timeline = scenario.build_timeline();
        assert_eq!(timeline.len(), 21);
        assert_eq!(timeline.agent_count(), 6);

        // Same seed, same plans.
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(Scenario::random_walks(6, 20, 5, 4, &mut rng).unwrap(), scenario);
    }

    #[test]
    fn test_random_walks_too_many_agents() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(Scenario::random_walks(5, 3, 2, 2, &mut rng).is_err());
    }
}
