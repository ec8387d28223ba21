use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::chain::ChainNode;
use super::errors::IndexGraphError;

/// Mutable registration phase of the chain registry.
///
/// Registration runs single-threaded during service initialization; the
/// explicit [`freeze`](ChainRegistryBuilder::freeze) handoff produces the
/// read-only [`ChainRegistry`], so no reader can ever observe a partially
/// built table map.
#[derive(Debug, Default)]
pub struct ChainRegistryBuilder {
    nodes: HashMap<String, Arc<ChainNode>>,
}

impl ChainRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a start node keyed by its table name.
    pub fn register(&mut self, node: Arc<ChainNode>) -> Result<(), IndexGraphError> {
        let table = node.table().to_string();
        if self.nodes.contains_key(&table) {
            return Err(IndexGraphError::DuplicateRegistration { table });
        }
        self.nodes.insert(table, node);
        Ok(())
    }

    /// Validate every registered chain and publish the immutable registry.
    ///
    /// Each chain must reach a head within a bound equal to the total number
    /// of distinct nodes reachable from any registration; a walk that exceeds
    /// the bound is reported as a cycle. The node graph itself cannot cycle
    /// (links are fixed at construction), so this guards the builder against
    /// misuse through hand-built node graphs rather than the common path.
    pub fn freeze(self) -> Result<ChainRegistry, IndexGraphError> {
        let bound = self.distinct_node_count();
        for node in self.nodes.values() {
            let mut current: &ChainNode = node;
            let mut trail = vec![current.table().to_string()];
            let mut steps = 0usize;
            while let Some(link) = current.link() {
                steps += 1;
                if steps > bound {
                    return Err(IndexGraphError::CyclicChain {
                        start: node.table().to_string(),
                        path: trail.join(" -> "),
                    });
                }
                current = &link.next;
                trail.push(current.table().to_string());
            }
        }
        Ok(ChainRegistry { nodes: self.nodes })
    }

    fn distinct_node_count(&self) -> usize {
        let mut seen: HashSet<*const ChainNode> = HashSet::new();
        for node in self.nodes.values() {
            let mut current: &ChainNode = node;
            while seen.insert(current as *const ChainNode) {
                match current.link() {
                    Some(link) => current = &link.next,
                    None => break,
                }
            }
        }
        seen.len()
    }
}

/// Read-only map from a table name to the start node of its chain.
///
/// Immutable after [`ChainRegistryBuilder::freeze`]; lookups and impact
/// resolution over it are safe from any number of threads without locking.
#[derive(Debug)]
pub struct ChainRegistry {
    nodes: HashMap<String, Arc<ChainNode>>,
}

impl ChainRegistry {
    /// Look up the chain start node registered for a table.
    pub fn lookup(&self, table: &str) -> Result<&Arc<ChainNode>, IndexGraphError> {
        self.nodes.get(table).ok_or_else(|| IndexGraphError::UnknownTable {
            table: table.to_string(),
        })
    }

    /// Number of registered start nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Registered table names, in no particular order.
    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }
}
