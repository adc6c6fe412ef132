pub mod config;
pub mod constants;

pub use config::{EfficiencyConfig, EfficiencyConfigError, load_efficiency_config};
