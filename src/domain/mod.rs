// Domain-specific error types
pub mod errors;

// Team rollup output types
pub mod insights;

// Per-rep metric groups and snapshots
pub mod metrics;

// Port interfaces
pub mod ports;

// Raw backing-store record shapes
pub mod records;

// Overall scoring and tier classification
pub mod scoring;

// Skill score derivation
pub mod skills;

// Period resolution
pub mod time_window;
