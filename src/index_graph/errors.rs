//! # Index Graph Error Types
//!
//! Error handling for chain registration, schema configuration parsing, and
//! table-to-head-entity chain resolution.
//!
//! Configuration-time errors (duplicate registrations, cycles, dangling link
//! targets, unreadable or unparsable schema files) are fatal: the service must
//! not start with a broken chain graph. `UnknownTable` is the one per-event
//! condition in this module — a replication event naming a table with no
//! registered chain is a data-stream condition, and the dispatcher logs and
//! skips it rather than aborting the stream.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum IndexGraphError {
    #[error("table '{table}' is already registered")]
    DuplicateRegistration { table: String },
    #[error("chain starting at '{start}' never reaches a head entity (cycle: {path})")]
    CyclicChain { start: String, path: String },
    #[error("no chain registered for table '{table}'")]
    UnknownTable { table: String },
    #[error("link on '{table}' names undefined table '{next}'")]
    UnknownLinkTarget { table: String, next: String },
    #[error("failed to read schema file: {error}")]
    ConfigReadError { error: String },
    #[error("failed to parse schema: {error}")]
    ConfigParseError { error: String },
    #[error("invalid schema: {message}")]
    InvalidConfig { message: String },
}
