use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use toml::Table;

use pbfs::dram::config::{DramConfig, SchedulerConfig};
use pbfs::sim::config::{Config, SimConfig};
use pbfs::sim::perf_log::write_summary;
use pbfs::sim::top::Sim;
use pbfs::traffic::TrafficConfig;

#[derive(Parser)]
#[command(version, about)]
struct PbfsArgs {
    #[arg(help="Path to config.toml")]
    config_path: PathBuf,
    #[arg(long, help="Override number of DRAM channels")]
    channels: Option<usize>,
    #[arg(long, help="Override number of traffic threads")]
    threads: Option<usize>,
    #[arg(long, help="Override simulation timeout in cycles")]
    timeout: Option<u64>,
    #[arg(long, help="Write the run summary as JSON to this path")]
    stats_json: Option<PathBuf>,
}

pub fn main() -> anyhow::Result<()> {
    env_logger::init();

    let argv = PbfsArgs::parse();
    let config = fs::read_to_string(&argv.config_path)
        .with_context(|| format!("failed to read config file {}", argv.config_path.display()))?;

    let config_table: Table = toml::from_str(&config).context("cannot parse config toml")?;
    let mut sim_config = SimConfig::from_section(config_table.get("sim"))?;
    let mut dram_config = DramConfig::from_section(config_table.get("dram"))?;
    let mut scheduler_config = SchedulerConfig::from_section(config_table.get("scheduler"))?;
    let mut traffic_config = TrafficConfig::from_section(config_table.get("traffic"))?;

    // override toml configs with argv
    sim_config.timeout = argv.timeout.unwrap_or(sim_config.timeout);
    sim_config.stats_json = argv.stats_json.or(sim_config.stats_json);
    dram_config.num_channels = argv.channels.unwrap_or(dram_config.num_channels);
    traffic_config.num_threads = argv.threads.unwrap_or(traffic_config.num_threads);
    scheduler_config.dram = dram_config;

    let stats_json = sim_config.stats_json.clone();
    let mut sim = Sim::new(sim_config, scheduler_config, traffic_config)?;
    let summary = sim.simulate();

    println!("{}", sim.scheduler().report_statistics());
    if let Some(path) = stats_json {
        write_summary(&path, &summary)?;
    }
    if summary.timed_out {
        anyhow::bail!("simulation timed out after {} cycles", summary.cycles);
    }
    Ok(())
}
