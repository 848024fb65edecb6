pub mod config;
pub mod error;
pub mod local;
pub mod provider;

/// Re-export key types
pub use config::{AppConfig, ConfigFormat};
pub use error::StorageSystemError;
pub use local::FileStore;
pub use provider::{KeyValueStore, MemoryStore};

// Test module declaration
#[cfg(test)]
mod tests;
