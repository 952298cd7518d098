//! Column generation over a route pool.
//!
//! The loop alternates between the master relaxation, which prices the
//! current pool and returns one dual per customer, and the pricing oracle,
//! which searches for routes of negative reduced cost under those duals. It
//! stops when pricing proves no such route exists or a budget runs out.
//!
//! - [`MasterProblem`] — the relaxation seam (`solve`, `add_route`)
//! - [`CoveringRelaxation`] — set-covering LP handed to `microlp` through `good_lp`
//! - [`RoutePool`] — columns, duplicates rejected by node sequence
//! - [`ColumnGeneration`] — SOLVE_MASTER → PRICE → ADD_COLUMN | STOP

mod covering;
mod master;
mod pool;
mod runner;

pub use covering::CoveringRelaxation;
pub use master::{MasterProblem, MasterSolution};
pub use pool::RoutePool;
pub use runner::{solve, ColGenConfig, ColGenResult, ColGenStatus, ColumnGeneration};
