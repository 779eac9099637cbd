mod engine;
mod error;
mod milestones;
mod types;

pub use engine::{simulate_drawdown, simulate_growth};
pub use error::{EngineError, EngineResult};
pub use milestones::{find_coast_fire_year, find_crossover_year};
pub use types::{
    DrawdownPlan, DrawdownResult, GrowthPlan, GrowthResult, YearPoint, YearlySeries,
};
