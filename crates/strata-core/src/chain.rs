//! Per-dialect version chains.
//!
//! A [`VersionChain`] holds a module's declared versions for one dialect,
//! sorted ascending by [`VersionParameters`]. Each [`VersionNode`] carries
//! `previous`/`next` links stored as indices into the chain.
//!
//! Links are computed *before* sorting by default ([`LinkOrder::Declaration`]),
//! so they follow the order versions were declared in rather than the sorted
//! order. Ledgers written by earlier deployments were produced by walking
//! declaration order, so this stays the default; [`LinkOrder::Sorted`] derives
//! the links from sorted positions instead. For descriptors that declare
//! versions in ascending order the two are identical.

use crate::descriptor::VersionSpec;
use crate::error::{CoreError, CoreResult};
use crate::version::{compare_versions, VersionParameters};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How `previous`/`next` links are derived when a chain is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkOrder {
    /// Link entries in declaration order, then sort
    #[default]
    Declaration,
    /// Link entries by their sorted position
    Sorted,
}

/// One declared version of a module within a dialect chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionNode {
    version: String,
    parameters: VersionParameters,
    scripts: Vec<String>,
    previous: Option<usize>,
    next: Option<usize>,
}

impl VersionNode {
    /// Version string exactly as declared.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Parsed numeric parameters of [`version`](Self::version).
    pub fn parameters(&self) -> VersionParameters {
        self.parameters
    }

    /// Upgrade script names in declaration order.
    pub fn scripts(&self) -> &[String] {
        &self.scripts
    }

    /// Chain index of the predecessor, if any.
    pub fn previous_index(&self) -> Option<usize> {
        self.previous
    }

    /// Chain index of the successor, if any.
    pub fn next_index(&self) -> Option<usize> {
        self.next
    }
}

/// Outcome of resolving a version string against a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionLookup<'a> {
    /// A node's declared version equals the lookup key
    Found(&'a VersionNode),
    /// No node matched; the chain's final node stands in
    FallenThroughToLast(&'a VersionNode),
    /// The chain has no nodes
    Empty,
}

impl<'a> VersionLookup<'a> {
    /// The resolved node, whether matched exactly or by fallback.
    pub fn node(&self) -> Option<&'a VersionNode> {
        match *self {
            VersionLookup::Found(node) | VersionLookup::FallenThroughToLast(node) => Some(node),
            VersionLookup::Empty => None,
        }
    }

    /// Whether the lookup key matched a declared version exactly.
    pub fn is_exact(&self) -> bool {
        matches!(self, VersionLookup::Found(_))
    }
}

/// Ascending sequence of [`VersionNode`]s for one module and dialect.
#[derive(Debug, Clone, Default)]
pub struct VersionChain {
    nodes: Vec<VersionNode>,
    by_version: HashMap<String, usize>,
}

impl VersionChain {
    /// Build a chain from declared entries.
    ///
    /// `module` and `dialect` are only used for error reporting. Fails if a
    /// version string cannot be parsed or two entries resolve to the same
    /// [`VersionParameters`].
    pub fn build(
        module: &str,
        dialect: &str,
        entries: &[VersionSpec],
        link_order: LinkOrder,
    ) -> CoreResult<Self> {
        let len = entries.len();

        // Declaration-order nodes, linked to their declared neighbours.
        let mut declared = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| -> CoreResult<Option<VersionNode>> {
                Ok(Some(VersionNode {
                    version: entry.version.clone(),
                    parameters: VersionParameters::parse(&entry.version)?,
                    scripts: entry.upgrade.clone(),
                    previous: i.checked_sub(1),
                    next: (i + 1 < len).then_some(i + 1),
                }))
            })
            .collect::<CoreResult<Vec<_>>>()?;

        let parameters_of = |i: usize| {
            declared[i]
                .as_ref()
                .map(VersionNode::parameters)
                .unwrap_or_default()
        };

        // Stable sort of declaration indices.
        let mut order: Vec<usize> = (0..len).collect();
        order.sort_by(|&a, &b| compare_versions(&parameters_of(a), &parameters_of(b)));

        for pair in order.windows(2) {
            if parameters_of(pair[0]) == parameters_of(pair[1]) {
                return Err(CoreError::DuplicateVersion {
                    module: module.to_string(),
                    dialect: dialect.to_string(),
                    version: parameters_of(pair[1]).to_string(),
                });
            }
        }

        let mut position = vec![0; len];
        for (pos, &decl) in order.iter().enumerate() {
            position[decl] = pos;
        }

        let mut nodes = Vec::with_capacity(len);
        for (pos, &decl) in order.iter().enumerate() {
            let Some(mut node) = declared[decl].take() else {
                continue;
            };
            match link_order {
                LinkOrder::Declaration => {
                    node.previous = node.previous.map(|d| position[d]);
                    node.next = node.next.map(|d| position[d]);
                }
                LinkOrder::Sorted => {
                    node.previous = pos.checked_sub(1);
                    node.next = (pos + 1 < len).then_some(pos + 1);
                }
            }
            nodes.push(node);
        }

        let mut by_version = HashMap::with_capacity(len);
        for (idx, node) in nodes.iter().enumerate() {
            by_version.entry(node.version.clone()).or_insert(idx);
        }

        Ok(Self { nodes, by_version })
    }

    /// Number of versions in the chain.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the chain declares no versions.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in ascending version order.
    pub fn nodes(&self) -> &[VersionNode] {
        &self.nodes
    }

    /// The lowest version, if any.
    pub fn first(&self) -> Option<&VersionNode> {
        self.nodes.first()
    }

    /// The highest version, if any.
    pub fn last(&self) -> Option<&VersionNode> {
        self.nodes.last()
    }

    /// Node at `index`.
    pub fn get(&self, index: usize) -> Option<&VersionNode> {
        self.nodes.get(index)
    }

    /// Successor of `node` following its `next` link.
    pub fn next(&self, node: &VersionNode) -> Option<&VersionNode> {
        node.next.and_then(|i| self.nodes.get(i))
    }

    /// Predecessor of `node` following its `previous` link.
    pub fn previous(&self, node: &VersionNode) -> Option<&VersionNode> {
        node.previous.and_then(|i| self.nodes.get(i))
    }

    /// Resolve `key` by exact match on the declared version string.
    ///
    /// When nothing matches, the chain's final node is returned as
    /// [`VersionLookup::FallenThroughToLast`]. Callers normally pass a key
    /// produced by [`crate::version::comparison_key`].
    ///
    /// Keys are compared against declared strings, not parsed versions. A
    /// chain declared as `"1.0"`/`"1.1"` never matches the ledger key
    /// `"1.0.0"`, so the lookup falls through to the last node and a later
    /// retarget within that chain applies nothing.
    pub fn lookup(&self, key: &str) -> VersionLookup<'_> {
        if let Some(node) = self.by_version.get(key).and_then(|&i| self.nodes.get(i)) {
            return VersionLookup::Found(node);
        }
        match self.nodes.last() {
            Some(last) => VersionLookup::FallenThroughToLast(last),
            None => VersionLookup::Empty,
        }
    }
}

#[cfg(test)]
#[path = "chain_test.rs"]
mod tests;
