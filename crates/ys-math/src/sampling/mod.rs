//! Stochastic sampling: events per year, then which events.

pub mod counts;
pub mod pool;
