//! Benchmark support crate for shatter.
//!
//! Builds seeded crawl-like graphs and groups the parameters Criterion
//! benchmarks sweep over for single removal runs and repeated trials.

pub mod error;
pub mod graphs;
pub mod params;
