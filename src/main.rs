use mapf_timeline::config::{Cli, Config};
use mapf_timeline::scenario::Scenario;
use mapf_timeline::stat::Stats;
use mapf_timeline::timeline::EdgeConflict;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
struct Report {
    conflicts: Vec<EdgeConflict>,
    stats: Stats,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();

    let config = if let Some(config_file) = cli.config.as_ref() {
        let config_str = std::fs::read_to_string(config_file)?;
        Config::from_yaml_str(&config_str)
            .with_context(|| format!("error with config file: {config_file}"))?
    } else {
        info!("No config file specified, using default config");
        Config::default()
    }
    .override_from_command_line(&cli)?;

    let scenario = if let Some(plan_path) = config.plan_path.as_deref() {
        Scenario::load_from_file(plan_path)
            .with_context(|| format!("error loading plan file: {plan_path}"))?
    } else {
        let mut rng = StdRng::seed_from_u64(config.seed as u64);
        let scenario = Scenario::random_walks(
            config.num_agents,
            config.steps,
            config.width,
            config.height,
            &mut rng,
        )?;
        if config.debug_yaml {
            scenario.write_to_yaml("debug.yaml")?;
        }
        scenario
    };

    let start_time = Instant::now();
    let timeline = scenario.build_timeline();
    if config.dump_timeline {
        info!("timeline:\n{timeline}");
    } else {
        debug!("timeline:\n{timeline}");
    }

    let mut stats = Stats {
        time_steps: timeline.len(),
        agents: timeline.agent_count(),
        ..Stats::default()
    };
    let conflicts = if config.stop_at_first {
        timeline.first_edge_conflict(&mut stats)?.into_iter().collect()
    } else {
        timeline.edge_conflicts(&mut stats)?
    };
    stats.time_us = start_time.elapsed().as_micros() as usize;

    for conflict in &conflicts {
        info!("edge conflict: {conflict}");
    }
    stats.print();

    if let Some(output_path) = config.output_path.as_deref() {
        let file = File::create(output_path)
            .with_context(|| format!("error creating report file: {output_path}"))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &Report { conflicts, stats })?;
        info!("Report written to {output_path}");
    }

    Ok(())
}
