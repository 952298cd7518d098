//! Route evaluation: timetables and constraint checks.

mod evaluator;

pub use evaluator::RouteEvaluator;
