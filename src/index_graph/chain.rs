use std::fmt;
use std::sync::Arc;

/// One foreign-key hop from a table toward the next table on its path to a
/// head entity.
///
/// `local_column` lives on the owning node's table. `remote_column` lives on
/// `next`'s table and is the column by which that table references the owning
/// node's rows.
#[derive(Debug, Clone)]
pub struct ChainLink {
    pub next: Arc<ChainNode>,
    pub local_column: String,
    pub remote_column: String,
}

/// A single table's position in a foreign-key chain toward a head entity.
///
/// A head entity (a table whose rows are themselves search documents) carries
/// no link; every other node carries exactly one. `next` references are
/// shared: chains starting at different tables converge on the same
/// intermediate and head nodes, so a node may be pointed to by several
/// independent chains at once.
///
/// Nodes are immutable once built. The `next` pointer is fixed before the
/// `Arc` is ever shared, so a constructed node graph cannot contain a cycle;
/// cycles can only exist in the named schema configuration and are rejected
/// while it is being built (see [`super::config::SchemaConfig::build`]).
#[derive(Debug)]
pub enum ChainNode {
    Head { table: String },
    Linked { table: String, link: ChainLink },
}

impl ChainNode {
    /// Create a head-entity node.
    pub fn new_head(table: impl Into<String>) -> Arc<Self> {
        Arc::new(ChainNode::Head {
            table: table.into(),
        })
    }

    /// Create a node linked to the next table on its chain.
    pub fn new_linked(
        table: impl Into<String>,
        next: Arc<ChainNode>,
        local_column: impl Into<String>,
        remote_column: impl Into<String>,
    ) -> Arc<Self> {
        Arc::new(ChainNode::Linked {
            table: table.into(),
            link: ChainLink {
                next,
                local_column: local_column.into(),
                remote_column: remote_column.into(),
            },
        })
    }

    pub fn table(&self) -> &str {
        match self {
            ChainNode::Head { table } | ChainNode::Linked { table, .. } => table,
        }
    }

    /// True iff this node is a head entity (no link).
    pub fn is_head(&self) -> bool {
        matches!(self, ChainNode::Head { .. })
    }

    pub fn link(&self) -> Option<&ChainLink> {
        match self {
            ChainNode::Head { .. } => None,
            ChainNode::Linked { link, .. } => Some(link),
        }
    }

    /// The head entity this chain terminates at. Defined for every node,
    /// including the head itself.
    pub fn head(&self) -> &ChainNode {
        let mut node = self;
        while let Some(link) = node.link() {
            node = &link.next;
        }
        node
    }

    /// The ordered node path `[self, n1, ..., head]`.
    pub fn path(&self) -> Vec<&ChainNode> {
        let mut path = vec![self];
        let mut node = self;
        while let Some(link) = node.link() {
            node = &link.next;
            path.push(node);
        }
        path
    }

    /// Number of links between this node and its head. Zero for a head.
    pub fn hop_count(&self) -> usize {
        self.path().len() - 1
    }
}

impl fmt::Display for ChainNode {
    /// Renders the whole chain, e.g. `artist -> artist_credit_name -> work`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut node = self;
        write!(f, "{}", node.table())?;
        while let Some(link) = node.link() {
            node = &link.next;
            write!(f, " -> {}", node.table())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_node_has_no_link() {
        let work = ChainNode::new_head("work");
        assert!(work.is_head());
        assert!(work.link().is_none());
        assert_eq!(work.hop_count(), 0);
    }

    #[test]
    fn linked_node_is_not_head() {
        let work = ChainNode::new_head("work");
        let alias = ChainNode::new_linked("work_alias", work, "id", "work");
        assert!(!alias.is_head());
        assert_eq!(alias.link().unwrap().remote_column, "work");
        assert_eq!(alias.hop_count(), 1);
    }

    #[test]
    fn head_returns_same_node_from_anywhere_on_the_chain() {
        let work = ChainNode::new_head("work");
        let acn = ChainNode::new_linked("artist_credit_name", work.clone(), "artist_credit", "artist_credit");
        let artist = ChainNode::new_linked("artist", acn.clone(), "id", "artist");

        assert!(std::ptr::eq(artist.head(), work.as_ref()));
        assert!(std::ptr::eq(acn.head(), work.as_ref()));
        assert!(std::ptr::eq(work.head(), work.as_ref()));
    }

    #[test]
    fn two_chains_share_the_same_head() {
        let work = ChainNode::new_head("work");
        let alias = ChainNode::new_linked("work_alias", work.clone(), "id", "work");
        let tag = ChainNode::new_linked("work_tag", work.clone(), "id", "work");

        assert!(std::ptr::eq(alias.head(), tag.head()));
        assert_eq!(Arc::strong_count(&work), 3);
    }

    #[test]
    fn path_is_ordered_start_to_head() {
        let work = ChainNode::new_head("work");
        let acn = ChainNode::new_linked("artist_credit_name", work, "artist_credit", "artist_credit");
        let artist = ChainNode::new_linked("artist", acn, "id", "artist");

        let tables: Vec<&str> = artist.path().iter().map(|n| n.table()).collect();
        assert_eq!(tables, vec!["artist", "artist_credit_name", "work"]);
    }

    #[test]
    fn display_renders_the_chain() {
        let work = ChainNode::new_head("work");
        let acn = ChainNode::new_linked("artist_credit_name", work, "artist_credit", "artist_credit");
        let artist = ChainNode::new_linked("artist", acn, "id", "artist");
        assert_eq!(artist.to_string(), "artist -> artist_credit_name -> work");
    }
}
