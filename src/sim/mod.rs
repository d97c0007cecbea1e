pub mod config;
pub mod perf_log;
pub mod top;
pub mod toy_dram;

pub type Cycle = u64;
