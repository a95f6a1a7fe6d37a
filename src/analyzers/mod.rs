//! Derived metrics for normalized student rows.
//!
//! Averages and extremes over positive scores, completion rate,
//! a performance level ladder, and a recent-versus-earlier trend.

pub mod grade;
pub mod metrics;
pub mod trend;
pub mod types;
pub mod utility;
