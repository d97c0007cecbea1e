use anyhow::ensure;
use serde::Deserialize;

use crate::sim::config::Config;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TrafficConfig {
    pub num_threads: usize,
    pub requests_per_thread: u32,
    /// probability that a generated request is a write
    pub write_fraction: f64,
    /// probability that a request reuses its thread's previous bank and row
    pub row_hit_rate: f64,
    pub rows_per_bank: u64,
    pub columns_per_row: u64,
    pub max_injections_per_cycle: usize,
    pub seed: u64,
}

impl Config for TrafficConfig {}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            num_threads: 4,
            requests_per_thread: 256,
            write_fraction: 0.3,
            row_hit_rate: 0.6,
            rows_per_bank: 1 << 14,
            columns_per_row: 128,
            max_injections_per_cycle: 2,
            seed: 0,
        }
    }
}

impl TrafficConfig {
    pub fn ensure_valid(&self) -> anyhow::Result<()> {
        ensure!(self.num_threads > 0, "num_threads must be > 0");
        ensure!(
            (0.0..=1.0).contains(&self.write_fraction),
            "write_fraction must be within [0, 1], got {}",
            self.write_fraction
        );
        ensure!(
            (0.0..=1.0).contains(&self.row_hit_rate),
            "row_hit_rate must be within [0, 1], got {}",
            self.row_hit_rate
        );
        ensure!(self.rows_per_bank > 0, "rows_per_bank must be > 0");
        ensure!(self.columns_per_row > 0, "columns_per_row must be > 0");
        ensure!(self.max_injections_per_cycle > 0, "max_injections_per_cycle must be > 0");
        Ok(())
    }
}
