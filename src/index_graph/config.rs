//! Schema configuration for the chain graph.
//!
//! Chains are defined in YAML, one entry per table contributing to a head
//! entity. A table without a `link` is a head entity; every other table names
//! the next table on its path to the head:
//!
//! ```yaml
//! schema:
//!   name: work_index          # optional
//!   tables:
//!     - table: work           # head entity, no link
//!     - table: work_alias
//!       link: { next: work, local_column: id, remote_column: work }
//!     - table: artist_credit_name
//!       link: { next: work, local_column: artist_credit, remote_column: artist_credit }
//!     - table: artist
//!       link: { next: artist_credit_name, local_column: id, remote_column: artist }
//! ```
//!
//! `local_column` is the column on the table's own rows; `remote_column` is
//! the column on the `next` table that references them.
//!
//! [`SchemaConfig::build`] turns the named definitions into the shared node
//! graph and a frozen [`ChainRegistry`]. All failure modes here are fatal at
//! startup: duplicate table names, links naming an undefined table, and
//! cycles in the named link graph (reported with the offending path).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::chain::ChainNode;
use super::errors::IndexGraphError;
use super::registry::{ChainRegistry, ChainRegistryBuilder};

/// Top-level schema configuration loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    pub schema: SchemaDefinition,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDefinition {
    /// Optional schema name, used only for logging.
    #[serde(default)]
    pub name: Option<String>,
    pub tables: Vec<TableDefinition>,
}

/// One table contributing to a head entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDefinition {
    pub table: String,
    /// Absent exactly on head entities.
    #[serde(default)]
    pub link: Option<LinkDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkDefinition {
    pub next: String,
    pub local_column: String,
    pub remote_column: String,
}

impl SchemaConfig {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, IndexGraphError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| IndexGraphError::ConfigReadError {
                error: e.to_string(),
            })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, IndexGraphError> {
        let config: Self =
            serde_yaml::from_str(content).map_err(|e| IndexGraphError::ConfigParseError {
                error: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Structural validation: non-empty table list, non-empty identifiers.
    pub fn validate(&self) -> Result<(), IndexGraphError> {
        if self.schema.tables.is_empty() {
            return Err(IndexGraphError::InvalidConfig {
                message: "schema defines no tables".to_string(),
            });
        }
        for def in &self.schema.tables {
            if def.table.is_empty() {
                return Err(IndexGraphError::InvalidConfig {
                    message: "table name cannot be empty".to_string(),
                });
            }
            if let Some(link) = &def.link {
                if link.next.is_empty() || link.local_column.is_empty() || link.remote_column.is_empty() {
                    return Err(IndexGraphError::InvalidConfig {
                        message: format!("link on '{}' has an empty field", def.table),
                    });
                }
            }
        }
        Ok(())
    }

    /// Build the shared node graph and freeze it into a registry.
    ///
    /// Construction is memoized per table name, so chains converging on the
    /// same tail share the identical nodes. Cycles among the named links are
    /// detected via the in-progress construction stack.
    pub fn build(&self) -> Result<ChainRegistry, IndexGraphError> {
        self.validate()?;

        let mut defs: HashMap<&str, &TableDefinition> = HashMap::new();
        for def in &self.schema.tables {
            if defs.insert(def.table.as_str(), def).is_some() {
                return Err(IndexGraphError::DuplicateRegistration {
                    table: def.table.clone(),
                });
            }
        }

        let mut built: HashMap<String, Arc<ChainNode>> = HashMap::new();
        let mut builder = ChainRegistryBuilder::new();
        for def in &self.schema.tables {
            let mut visiting = Vec::new();
            let node = build_node(def, &defs, &mut built, &mut visiting)?;
            builder.register(node)?;
        }
        let registry = builder.freeze()?;
        log::info!(
            "built chain registry '{}' with {} tables",
            self.schema.name.as_deref().unwrap_or("unnamed"),
            registry.len()
        );
        Ok(registry)
    }
}

fn build_node(
    def: &TableDefinition,
    defs: &HashMap<&str, &TableDefinition>,
    built: &mut HashMap<String, Arc<ChainNode>>,
    visiting: &mut Vec<String>,
) -> Result<Arc<ChainNode>, IndexGraphError> {
    if let Some(node) = built.get(&def.table) {
        return Ok(node.clone());
    }
    if visiting.iter().any(|t| t == &def.table) {
        let mut path: Vec<&str> = visiting.iter().map(String::as_str).collect();
        path.push(&def.table);
        return Err(IndexGraphError::CyclicChain {
            start: visiting[0].clone(),
            path: path.join(" -> "),
        });
    }

    let node = match &def.link {
        None => ChainNode::new_head(&def.table),
        Some(link) => {
            let next_def =
                defs.get(link.next.as_str())
                    .ok_or_else(|| IndexGraphError::UnknownLinkTarget {
                        table: def.table.clone(),
                        next: link.next.clone(),
                    })?;
            visiting.push(def.table.clone());
            let next = build_node(next_def, defs, built, visiting)?;
            visiting.pop();
            ChainNode::new_linked(&def.table, next, &link.local_column, &link.remote_column)
        }
    };
    built.insert(def.table.clone(), node.clone());
    Ok(node)
}
