use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
    pub time_steps: usize,
    pub agents: usize,
    pub transitions_checked: usize,
    pub edge_conflicts: usize,
    pub time_us: usize,
}

impl Stats {
    pub fn print(&self) {
        info!(
            "Time steps {:?} Agents {:?} Transitions checked {:?} Edge conflicts {:?} Time(microseconds) {:?}",
            self.time_steps, self.agents, self.transitions_checked, self.edge_conflicts, self.time_us
        );
    }
}
