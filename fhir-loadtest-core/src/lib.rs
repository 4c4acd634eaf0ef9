mod config;
mod constants;
mod data;
mod outcome;
mod scenario;
mod stats;
mod thresholds;

pub use config::*;
pub use constants::*;
pub use data::*;
pub use outcome::*;
pub use scenario::*;
pub use stats::*;
pub use thresholds::*;
