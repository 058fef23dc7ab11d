//! Life-table aggregation of simulated trajectories
//!
//! Turns individual-level trajectory rows into cumulative live-birth
//! tables indexed by embryo transfers or by complete cycles.

mod summary;
mod table;

pub use summary::{summarize, IndividualSummary, LifeTableIndex};
pub use table::{arm_rows, build_life_table, LifeTable, LifeTableRow};
