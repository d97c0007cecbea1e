pub mod closure;
pub mod command;
pub mod config;
pub mod drain;
pub mod port;
pub mod priority;
pub mod request;
pub mod scheduler;
pub mod stats;

#[cfg(test)]
mod unit_tests;

pub use closure::ClosureTable;
pub use command::DramCommand;
pub use config::{DramConfig, SchedulerConfig};
pub use drain::WriteDrainPolicy;
pub use port::CommandPort;
pub use priority::ThreadPriorities;
pub use request::{DramAddr, QueueKind, Request, RequestId, ThreadId};
pub use scheduler::{CycleOutcome, PbfsScheduler};
pub use stats::SchedulerStats;
