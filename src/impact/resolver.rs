//! Impact resolution: which head-entity rows must be reindexed after a
//! change, and the join-minimal projection that fetches their ids.
//!
//! The generated statement never touches the table that changed: the caller
//! already knows the changed rows' key values, so the filter is applied to
//! the next table on the chain, on the column by which that table references
//! the changed rows. Every join strictly between that table and the head is
//! emitted head-outward, so each JOIN's right-hand table has already appeared
//! earlier in the statement.

use crate::index_graph::chain::ChainNode;

use super::errors::ImpactError;
use super::keys::ChangeKeys;

/// Outcome of resolving a change event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Impact {
    /// The changed table is itself the head entity; the event's keys already
    /// are the head ids and no query is needed.
    HeadIds,
    /// Projection to run against the relational store; selects the `id`
    /// column of every affected head-entity row.
    Query(String),
}

/// Resolve the head-entity impact of changed rows in `start`'s table.
///
/// Deterministic: a fixed `(start, keys)` pair always yields the same SQL
/// text. Pure over immutable chain data, safe to call concurrently.
pub fn resolve(start: &ChainNode, keys: &ChangeKeys) -> Result<Impact, ImpactError> {
    if keys.is_empty() {
        return Err(ImpactError::EmptyKeys);
    }
    let Some(start_link) = start.link() else {
        return Ok(Impact::HeadIds);
    };

    // path = [start, n1, ..., head]; the statement covers n1..head only.
    let path = start.path();
    let head = path[path.len() - 1];
    let mut sql = format!("SELECT {0}.id FROM {0}", head.table());

    for node in path[1..path.len() - 1].iter().rev() {
        let Some(link) = node.link() else { continue };
        sql.push_str(&format!(
            " JOIN {table} ON ({table}.{local} = {next}.{remote})",
            table = node.table(),
            local = link.local_column,
            next = link.next.table(),
            remote = link.remote_column,
        ));
    }

    sql.push_str(&format!(
        " WHERE {}.{} IN ({})",
        path[1].table(),
        start_link.remote_column,
        keys.sql_list(),
    ));
    Ok(Impact::Query(sql))
}
