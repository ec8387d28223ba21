pub mod chain;
pub mod config;
pub mod errors;
pub mod registry;

// Re-export commonly used types
pub use chain::{ChainLink, ChainNode};
pub use config::{LinkDefinition, SchemaConfig, SchemaDefinition, TableDefinition};
pub use errors::IndexGraphError;
pub use registry::{ChainRegistry, ChainRegistryBuilder};
