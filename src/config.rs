use anyhow::anyhow;
use clap::Parser;
use serde::Deserialize;

#[derive(Parser, Debug, Default)]
#[command(
    name = "mapf-timeline",
    about = "Joint-state timeline and edge-conflict detection for multi-agent plans.",
    version = "0.1"
)]
pub struct Cli {
    #[arg(long, help = "Path to a YAML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Path to the YAML plan file; random walks are generated when absent")]
    pub plan_path: Option<String>,

    #[arg(long, help = "Path to write the JSON conflict report to")]
    pub output_path: Option<String>,

    #[arg(long, help = "Number of agents to generate")]
    pub num_agents: Option<usize>,

    #[arg(long, help = "Number of steps in each generated plan")]
    pub steps: Option<usize>,

    #[arg(long, help = "Width of the generated grid")]
    pub width: Option<usize>,

    #[arg(long, help = "Height of the generated grid")]
    pub height: Option<usize>,

    #[arg(long, help = "Seed for the random number generator")]
    pub seed: Option<usize>,

    #[arg(long, help = "Stop at the earliest edge conflict", default_value_t = false)]
    pub stop_at_first: bool,

    #[arg(long, help = "Log the whole timeline", default_value_t = false)]
    pub dump_timeline: bool,

    #[arg(
        long,
        help = "Write generated plans to debug.yaml",
        default_value_t = false
    )]
    pub debug_yaml: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub plan_path: Option<String>,
    pub output_path: Option<String>,
    pub num_agents: usize,
    pub steps: usize,
    pub width: usize,
    pub height: usize,
    pub seed: usize,
    pub stop_at_first: bool,
    pub dump_timeline: bool,
    pub debug_yaml: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            plan_path: None,
            output_path: None,
            num_agents: 10,
            steps: 32,
            width: 16,
            height: 16,
            seed: 0,
            stop_at_first: false,
            dump_timeline: false,
            debug_yaml: false,
        }
    }
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Command line values win over the config file. Flags can only switch
    /// options on.
    pub fn override_from_command_line(mut self, cli: &Cli) -> anyhow::Result<Self> {
        if let Some(plan_path) = &cli.plan_path {
            self.plan_path = Some(plan_path.clone());
        }
        if let Some(output_path) = &cli.output_path {
            self.output_path = Some(output_path.clone());
        }
        if let Some(num_agents) = cli.num_agents {
            self.num_agents = num_agents;
        }
        if let Some(steps) = cli.steps {
            self.steps = steps;
        }
        if let Some(width) = cli.width {
            self.width = width;
        }
        if let Some(height) = cli.height {
            self.height = height;
        }
        if let Some(seed) = cli.seed {
            self.seed = seed;
        }
        self.stop_at_first |= cli.stop_at_first;
        self.dump_timeline |= cli.dump_timeline;
        self.debug_yaml |= cli.debug_yaml;

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        // A plan file brings its own agents and grid.
        if self.plan_path.is_some() {
            return Ok(());
        }

        if self.width == 0 || self.height == 0 {
            return Err(anyhow!(
                "Grid must not be empty, got {}x{}",
                self.width,
                self.height
            ));
        }
        if self.num_agents > self.width * self.height {
            return Err(anyhow!(
                "Cannot place {} agents on a {}x{} grid",
                self.num_agents,
                self.width,
                self.height
            ));
        }
        if self.steps == 0 {
            return Err(anyhow!("Generated plans need at least one step"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_yaml() {
        let config = Config::from_yaml_str("num_agents: 4\nwidth: 8\nstop_at_first: true\n").unwrap();

        assert_eq!(config.num_agents, 4);
        assert_eq!(config.width, 8);
        assert!(config.stop_at_first);
        // Missing keys fall back to defaults.
        assert_eq!(config.height, 16);
        assert_eq!(config.plan_path, None);
    }

    #[test]
    fn test_command_line_overrides() {
        let cli = Cli::parse_from([
            "mapf-timeline",
            "--num-agents",
            "3",
            "--seed",
            "42",
            "--dump-timeline",
        ]);
        let config = Config::from_yaml_str("num_agents: 4\nseed: 1\n")
            .unwrap()
            .override_from_command_line(&cli)
            .unwrap();

        assert_eq!(config.num_agents, 3);
        assert_eq!(config.seed, 42);
        assert!(config.dump_timeline);
        assert!(!config.stop_at_first);
    }

    #[test]
    fn test_validate() {
        assert!(Config::default().validate().is_ok());

        let crowded = Config {
            num_agents: 5,
            width: 2,
            height: 2,
            ..Config::default()
        };
        assert!(crowded.validate().is_err());

        let no_steps = Config {
            steps: 0,
            ..Config::default()
        };
        assert!(no_steps.validate().is_err());

        let from_file = Config {
            plan_path: Some("plans.yaml".to_string()),
            steps: 0,
            ..Config::default()
        };
        assert!(from_file.validate().is_ok());
    }
}
