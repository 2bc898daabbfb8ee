//! Graph analyses: cycle detection and change impact

pub mod analyzer;
pub mod cycles;
pub mod impact;
pub mod parallel;

pub use analyzer::Analyzer;
pub use cycles::{find_cycles, CycleDetector};
pub use impact::{impact_of, ImpactIndex};
pub use parallel::{impact_of_all, impact_of_all_with_progress, ProgressUpdate};
