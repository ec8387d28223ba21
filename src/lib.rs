//! Reindexer - incremental reindex impact resolution for a search index
//!
//! This crate keeps a denormalized full-text search index consistent with a
//! normalized relational store. For every replicated row change it resolves
//! the set of head entities (the top-level documents actually present in the
//! index) that derive data from the changed rows, through:
//! - A foreign-key chain model over the relational schema
//! - A name-keyed chain registry, built once at startup and then frozen
//! - Join-minimal SQL projection generation for the affected head ids
//! - Change-event dispatch with a skip-and-continue error policy

pub mod config;
pub mod dispatch;
pub mod impact;
pub mod index_graph;
