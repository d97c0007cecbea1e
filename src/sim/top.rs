use std::sync::Arc;

use anyhow::ensure;
use log::{info, warn};
use serde::Serialize;

use crate::base::behavior::*;
use crate::dram::config::SchedulerConfig;
use crate::dram::scheduler::PbfsScheduler;
use crate::dram::stats::SchedulerStats;
use crate::sim::config::SimConfig;
use crate::sim::toy_dram::ToyDram;
use crate::sim::Cycle;
use crate::traffic::{TrafficConfig, TrafficGenerator};

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub cycles: Cycle,
    pub timed_out: bool,
    pub requests_generated: u64,
    pub requests_retired: u64,
    pub scheduler: SchedulerStats,
}

pub struct Sim {
    config: SimConfig,
    num_channels: usize,
    scheduler: PbfsScheduler,
    dram: ToyDram,
    traffic: TrafficGenerator,
    cycle: Cycle,
}

impl Sim {
    pub fn new(
        config: SimConfig,
        scheduler_config: SchedulerConfig,
        traffic_config: TrafficConfig,
    ) -> anyhow::Result<Self> {
        scheduler_config.ensure_valid()?;
        traffic_config.ensure_valid()?;
        ensure!(
            traffic_config.num_threads <= scheduler_config.max_threads,
            "{} traffic threads exceed the scheduler's {} thread slots",
            traffic_config.num_threads,
            scheduler_config.max_threads
        );

        let dram_config = scheduler_config.dram;
        Ok(Sim {
            config,
            num_channels: dram_config.num_channels,
            scheduler: PbfsScheduler::new(Arc::new(scheduler_config)),
            dram: ToyDram::new(Arc::new(dram_config)),
            traffic: TrafficGenerator::new(&traffic_config, &dram_config),
            cycle: 0,
        })
    }

    pub fn scheduler(&self) -> &PbfsScheduler {
        &self.scheduler
    }

    pub fn finished(&self) -> bool {
        self.traffic.is_done() && self.dram.pending() == 0
    }

    pub fn simulate(&mut self) -> RunSummary {
        while !self.finished() && self.cycle < self.config.timeout {
            self.tick_one();
        }

        let timed_out = !self.finished();
        if timed_out {
            warn!(
                "timeout after {} cycles, {} requests still queued",
                self.cycle,
                self.dram.pending()
            );
        } else {
            info!("all {} requests retired after {} cycles", self.dram.retired(), self.cycle);
        }

        RunSummary {
            cycles: self.cycle,
            timed_out,
            requests_generated: self.traffic.generated(),
            requests_retired: self.dram.retired(),
            scheduler: *self.scheduler.stats(),
        }
    }
}

impl ModuleBehaviors for Sim {
    fn tick_one(&mut self) {
        self.traffic.inject(self.cycle, &mut self.dram);
        self.dram.begin_cycle(self.cycle);
        for channel in 0..self.num_channels {
            self.scheduler.schedule(channel, &mut self.dram);
        }
        self.scheduler.tick_one();
        self.cycle += 1;
    }

    fn reset(&mut self) {
        self.scheduler.reset();
        self.dram.reset();
        self.traffic.reset();
        self.cycle = 0;
    }
}
