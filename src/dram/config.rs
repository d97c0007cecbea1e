use anyhow::ensure;
use serde::Deserialize;

use crate::dram::drain::{DEFAULT_HI_WATERMARK, DEFAULT_LO_WATERMARK};
use crate::dram::priority::DEFAULT_MAX_THREADS;
use crate::sim::config::Config;
use crate::sim::Cycle;

/// Geometry and timing of the memory system, in DRAM cycles.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct DramConfig {
    pub num_channels: usize,
    pub num_ranks: usize,
    pub num_banks: usize,
    /// row precharge latency
    pub t_rp: Cycle,
    /// row activate to column command latency
    pub t_rcd: Cycle,
    /// column command to data latency
    pub t_cas: Cycle,
    /// capacity of each per-channel read and write queue
    pub queue_capacity: usize,
}

impl Config for DramConfig {}

impl Default for DramConfig {
    fn default() -> Self {
        Self {
            num_channels: 1,
            num_ranks: 2,
            num_banks: 8,
            t_rp: 11,
            t_rcd: 11,
            t_cas: 11,
            queue_capacity: 64,
        }
    }
}

impl DramConfig {
    pub fn ensure_valid(&self) -> anyhow::Result<()> {
        ensure!(self.num_channels > 0, "num_channels must be > 0");
        ensure!(self.num_ranks > 0, "num_ranks must be > 0");
        ensure!(self.num_banks > 0, "num_banks must be > 0");
        ensure!(self.t_rp + self.t_rcd > 0, "t_rp + t_rcd must be > 0");
        ensure!(self.queue_capacity > 0, "queue_capacity must be > 0");
        Ok(())
    }

    pub fn banks_per_channel(&self) -> usize {
        self.num_ranks * self.num_banks
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct SchedulerConfig {
    pub max_threads: usize,
    pub hi_watermark: usize,
    pub lo_watermark: usize,
    #[serde(skip)]
    pub dram: DramConfig,
}

impl Config for SchedulerConfig {}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_threads: DEFAULT_MAX_THREADS,
            hi_watermark: DEFAULT_HI_WATERMARK,
            lo_watermark: DEFAULT_LO_WATERMARK,
            dram: DramConfig::default(),
        }
    }
}

impl SchedulerConfig {
    pub fn ensure_valid(&self) -> anyhow::Result<()> {
        self.dram.ensure_valid()?;
        ensure!(self.max_threads > 0, "max_threads must be > 0");
        ensure!(
            self.lo_watermark <= self.hi_watermark,
            "lo_watermark ({}) must not exceed hi_watermark ({})",
            self.lo_watermark,
            self.hi_watermark
        );
        Ok(())
    }

    /// Row-hit rate above which keeping a row open beats closing it eagerly.
    pub fn break_even_hit_rate(&self) -> f64 {
        let t_rp = self.dram.t_rp as f64;
        t_rp / (t_rp + self.dram.t_rcd as f64)
    }
}
