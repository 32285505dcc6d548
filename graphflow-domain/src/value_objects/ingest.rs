// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Desired Ingest
//!
//! The graph intent accumulated for one record: an ordered set of nodes, an
//! ordered set of relationships, and the property updates attached to each.
//! `DesiredIngest::merge` folds one ingest into another following the
//! spec's merge rule: property maps merge: **later writes win** on
//! conflicting scalar keys.

use serde_json::Value;
use std::collections::BTreeMap;

/// `(type, key-fields)` — the identity of a node independent of its
/// properties. Two `NodeIngest`s with the same identity refer to the same
/// graph node and must merge rather than duplicate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NodeIdentity {
    pub node_type: String,
    /// Sorted so that identity comparison and `Ord` (needed to dedupe
    /// deterministically) don't depend on the order fields were inserted.
    pub key_fields: BTreeMap<String, String>,
}

impl NodeIdentity {
    pub fn new(node_type: impl Into<String>, key_fields: BTreeMap<String, String>) -> Self {
        Self {
            node_type: node_type.into(),
            key_fields,
        }
    }
}

/// The two endpoint identities plus the relationship's own type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RelationshipIdentity {
    pub relationship_type: String,
    pub start: NodeIdentity,
    pub end: NodeIdentity,
}

/// A node to ingest: its identity plus accumulated properties.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeIngest {
    pub identity: NodeIdentity,
    pub properties: BTreeMap<String, Value>,
}

impl NodeIngest {
    pub fn new(identity: NodeIdentity) -> Self {
        Self {
            identity,
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Merges `other`'s properties into `self`; `other`'s values win on key
    /// collisions since it represents the later write.
    fn merge_from(&mut self, other: &NodeIngest) {
        for (k, v) in &other.properties {
            self.properties.insert(k.clone(), v.clone());
        }
    }
}

/// A relationship to ingest: its identity plus accumulated properties.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipIngest {
    pub identity: RelationshipIdentity,
    pub properties: BTreeMap<String, Value>,
}

impl RelationshipIngest {
    pub fn new(identity: RelationshipIdentity) -> Self {
        Self {
            identity,
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    fn merge_from(&mut self, other: &RelationshipIngest) {
        for (k, v) in &other.properties {
            self.properties.insert(k.clone(), v.clone());
        }
    }
}

/// The graph intent accumulated for one record (or sub-context).
///
/// Nodes and relationships are kept in an order-preserving `Vec`; merging a
/// node/relationship that already has an entry updates that entry in place
/// rather than appending, so first-seen order is preserved across merges
/// (the spec's "ordered set" wording).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesiredIngest {
    nodes: Vec<NodeIngest>,
    relationships: Vec<RelationshipIngest>,
}

impl DesiredIngest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[NodeIngest] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [NodeIngest] {
        &mut self.nodes
    }

    pub fn relationships(&self) -> &[RelationshipIngest] {
        &self.relationships
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.relationships.is_empty()
    }

    /// Adds or merges a node. If a node with the same identity already
    /// exists, its properties are merged (later writes win); otherwise the
    /// node is appended, preserving first-seen order.
    pub fn add_node(&mut self, node: NodeIngest) {
        if let Some(existing) = self.nodes.iter_mut().find(|n| n.identity == node.identity) {
            existing.merge_from(&node);
        } else {
            self.nodes.push(node);
        }
    }

    /// Adds or merges a relationship, with the same merge-by-identity rule
    /// as `add_node`.
    pub fn add_relationship(&mut self, relationship: RelationshipIngest) {
        if let Some(existing) = self
            .relationships
            .iter_mut()
            .find(|r| r.identity == relationship.identity)
        {
            existing.merge_from(&relationship);
        } else {
            self.relationships.push(relationship);
        }
    }

    /// Folds `other` into `self` in place, preserving `self`'s node/
    /// relationship order and appending any identities `self` hasn't seen.
    pub fn merge(&mut self, other: DesiredIngest) {
        for node in other.nodes {
            self.add_node(node);
        }
        for rel in other.relationships {
            self.add_relationship(rel);
        }
    }
}

/// Grouping key writers use to batch like node-ingest operations for batch
/// execution. Carries no execution logic: chunking, retries, and the
/// database-specific query shape are all out of the core's scope.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct OperationOnNodeIdentity {
    pub node_type: String,
}

impl From<&NodeIdentity> for OperationOnNodeIdentity {
    fn from(identity: &NodeIdentity) -> Self {
        Self {
            node_type: identity.node_type.clone(),
        }
    }
}

/// Grouping key for relationship-ingest operations, analogous to
/// `OperationOnNodeIdentity`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct OperationOnRelationshipIdentity {
    pub relationship_type: String,
}

impl From<&RelationshipIdentity> for OperationOnRelationshipIdentity {
    fn from(identity: &RelationshipIdentity) -> Self {
        Self {
            relationship_type: identity.relationship_type.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn person(id: &str) -> NodeIdentity {
        let mut key_fields = BTreeMap::new();
        key_fields.insert("id".to_string(), id.to_string());
        NodeIdentity::new("Person", key_fields)
    }

    #[test]
    fn add_node_merges_by_identity_and_later_writes_win() {
        let mut ingest = DesiredIngest::new();
        ingest.add_node(NodeIngest::new(person("1")).with_property("name", json!("Alice")));
        ingest.add_node(NodeIngest::new(person("1")).with_property("name", json!("Alicia")));
        assert_eq!(ingest.nodes().len(), 1);
        assert_eq!(ingest.nodes()[0].properties["name"], json!("Alicia"));
    }

    #[test]
    fn add_node_preserves_first_seen_order() {
        let mut ingest = DesiredIngest::new();
        ingest.add_node(NodeIngest::new(person("2")));
        ingest.add_node(NodeIngest::new(person("1")));
        ingest.add_node(NodeIngest::new(person("2")).with_property("age", json!(30)));
        assert_eq!(ingest.nodes()[0].identity, person("2"));
        assert_eq!(ingest.nodes()[1].identity, person("1"));
    }

    #[test]
    fn merge_combines_two_ingests() {
        let mut a = DesiredIngest::new();
        a.add_node(NodeIngest::new(person("1")).with_property("name", json!("Alice")));
        let mut b = DesiredIngest::new();
        b.add_node(NodeIngest::new(person("1")).with_property("age", json!(30)));
        a.merge(b);
        assert_eq!(a.nodes().len(), 1);
        assert_eq!(a.nodes()[0].properties["name"], json!("Alice"));
        assert_eq!(a.nodes()[0].properties["age"], json!(30));
    }
}
