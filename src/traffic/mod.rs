pub mod config;
pub mod generator;

pub use config::TrafficConfig;
pub use generator::TrafficGenerator;
