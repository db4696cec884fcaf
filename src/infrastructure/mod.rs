// Adapters implementing the domain ports.
pub mod benchmark;
pub mod in_memory;
