// Services orchestrating the domain: aggregation, single-rep analysis,
// team rollup, and the rollup cache.
pub mod aggregator;
pub mod analyzer;
pub mod cache;
pub mod rollup;
