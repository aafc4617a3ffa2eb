pub mod metrics;
pub mod noop;

// Re-export the factory functions for easy access
pub use noop::create as create_noop_storage;
