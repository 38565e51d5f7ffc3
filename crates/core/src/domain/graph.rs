//! The Domain graph: nodes, groups, and edges (spec §3, §4.2).
//!
//! All mutations are pure: each method receives `&self` and returns a new
//! [`Domain`] (or fails), in the shape of the teacher's `Network`
//! mutation methods — except here every mutator actually clones and
//! returns, since spec §4.2 requires it ("They receive the current graph
//! and return a new graph").

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::ids::{EdgeId, Kind, NodeId};

/// Opaque per-node payload (spec §3: "label, icon, `isGroup` flag").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub label: Option<String>,
    pub icon: Option<String>,
    /// Renderer hint: treat this node as a group even before it has
    /// children (spec §4.9: `isGroup = children.len()>0 || data.isGroup || edges.len()>0`).
    #[serde(default)]
    pub is_group: bool,
}

/// Opaque per-edge payload (spec §3: "optional source/target handle hints").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
}

/// A node record in the Domain tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainNode {
    pub id: NodeId,
    pub children: Vec<NodeId>,
    /// Edges that *reside* at this node (this node is their LCG).
    pub edges: Vec<EdgeId>,
    pub data: NodeData,
}

/// An edge record in the Domain tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEdgeRecord {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub data: EdgeData,
}

/// The structural graph: a tree of nodes/groups rooted at a sentinel,
/// with edges residing at each edge's Lowest Common Group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Domain {
    #[serde(with = "indexmap::map::serde_seq")]
    nodes: IndexMap<NodeId, DomainNode>,
    parent: HashMap<NodeId, NodeId>,
    #[serde(with = "indexmap::map::serde_seq")]
    edges: IndexMap<EdgeId, DomainEdgeRecord>,
    edge_container: HashMap<EdgeId, NodeId>,
}

impl Default for Domain {
    fn default() -> Self {
        Self::new()
    }
}

impl Domain {
    /// An empty Domain: just the sentinel root.
    pub fn new() -> Self {
        let mut nodes = IndexMap::new();
        nodes.insert(
            NodeId::root(),
            DomainNode {
                id: NodeId::root(),
                children: Vec::new(),
                edges: Vec::new(),
                data: NodeData::default(),
            },
        );
        Self {
            nodes,
            parent: HashMap::new(),
            edges: IndexMap::new(),
            edge_container: HashMap::new(),
        }
    }

    // ---------------------------------------------------------------
    // Identity
    // ---------------------------------------------------------------

    /// Invariant 1: every node and edge id appears at most once "in the
    /// whole tree" — `addNode`/`addEdge` fail if `id` collides with a node
    /// **or** an edge already present, i.e. nodes and edges share one id
    /// namespace.
    fn id_exists(&self, raw: &str) -> bool {
        self.nodes.keys().any(|k| k.as_str() == raw) || self.edges.keys().any(|k| k.as_str() == raw)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn contains_edge(&self, id: &EdgeId) -> bool {
        self.edges.contains_key(id)
    }

    pub fn find_node_by_id(&self, id: &NodeId) -> Option<&DomainNode> {
        self.nodes.get(id)
    }

    pub fn get_edge(&self, id: &EdgeId) -> Option<&DomainEdgeRecord> {
        self.edges.get(id)
    }

    pub fn find_parent(&self, id: &NodeId) -> Option<&NodeId> {
        self.parent.get(id)
    }

    pub fn children(&self, id: &NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Kind is derived, never stored: a node is a Group iff it has ≥1 child.
    pub fn kind(&self, id: &NodeId) -> Kind {
        if self.children(id).is_empty() {
            Kind::Node
        } else {
            Kind::Group
        }
    }

    /// All non-root node ids.
    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.keys().filter(|k| !k.is_root())
    }

    pub fn edges(&self) -> impl Iterator<Item = &DomainEdgeRecord> {
        self.edges.values()
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = &EdgeId> {
        self.edges.keys()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len() - 1 // exclude sentinel root
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // ---------------------------------------------------------------
    // Traversal
    // ---------------------------------------------------------------

    /// Root-to-`id` path, inclusive of both ends.
    pub fn path_to_root(&self, id: &NodeId) -> Vec<NodeId> {
        let mut path = vec![id.clone()];
        let mut cur = id.clone();
        while let Some(p) = self.parent.get(&cur).cloned() {
            path.push(p.clone());
            cur = p;
        }
        path.reverse();
        path
    }

    /// The Lowest Common Group: the deepest node on the common root-path
    /// prefix of `ids` (spec §3, §GLOSSARY).
    pub fn find_lcg(&self, ids: &[NodeId]) -> NodeId {
        if ids.is_empty() {
            return NodeId::root();
        }
        let paths: Vec<Vec<NodeId>> = ids.iter().map(|i| self.path_to_root(i)).collect();
        let min_len = paths.iter().map(|p| p.len()).min().unwrap_or(0);
        let mut lcg = NodeId::root();
        for depth in 0..min_len {
            let candidate = &paths[0][depth];
            if paths.iter().all(|p| &p[depth] == candidate) {
                lcg = candidate.clone();
            } else {
                break;
            }
        }
        lcg
    }

    /// `id` and every one of its descendants (including `id`).
    pub fn subtree_ids(&self, id: &NodeId) -> HashSet<NodeId> {
        let mut out = HashSet::new();
        let mut stack = vec![id.clone()];
        while let Some(cur) = stack.pop() {
            if out.insert(cur.clone()) {
                stack.extend(self.children(&cur).iter().cloned());
            }
        }
        out
    }

    /// `candidate` is `ancestor` itself, or a descendant of `ancestor`.
    fn is_within(&self, candidate: &NodeId, ancestor: &NodeId) -> bool {
        let mut cur = candidate.clone();
        loop {
            if &cur == ancestor {
                return true;
            }
            match self.parent.get(&cur) {
                Some(p) => cur = p.clone(),
                None => return false,
            }
        }
    }

    /// All descendant Groups of `scope` (including `scope` if it is one),
    /// used by the mode handlers (spec §4.7).
    pub fn descendant_groups(&self, scope: &NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![scope.clone()];
        while let Some(cur) = stack.pop() {
            if matches!(self.kind(&cur), Kind::Group) {
                out.push(cur.clone());
            }
            stack.extend(self.children(&cur).iter().cloned());
        }
        out
    }

    /// Every edge whose source or target is in `node_ids`.
    pub fn edges_touching(&self, node_ids: &HashSet<NodeId>) -> Vec<EdgeId> {
        self.edges
            .values()
            .filter(|e| node_ids.contains(&e.source) || node_ids.contains(&e.target))
            .map(|e| e.id.clone())
            .collect()
    }

    // ---------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------

    pub fn add_node(
        &self,
        id: impl Into<NodeId>,
        parent_id: &NodeId,
        data: NodeData,
    ) -> Result<Domain, DomainError> {
        let id = id.into();
        if self.id_exists(id.as_str()) {
            return Err(DomainError::DuplicateId(id.0));
        }
        if !self.nodes.contains_key(parent_id) {
            return Err(DomainError::UnknownEndpoint(parent_id.clone()));
        }
        let mut g = self.clone();
        g.nodes.insert(
            id.clone(),
            DomainNode {
                id: id.clone(),
                children: Vec::new(),
                edges: Vec::new(),
                data,
            },
        );
        g.nodes.get_mut(parent_id).expect("checked above").children.push(id.clone());
        g.parent.insert(id, parent_id.clone());
        Ok(g)
    }

    pub fn add_edge(
        &self,
        id: impl Into<EdgeId>,
        source: &NodeId,
        target: &NodeId,
        data: EdgeData,
    ) -> Result<Domain, DomainError> {
        let id = id.into();
        if self.id_exists(id.as_str()) {
            return Err(DomainError::DuplicateId(id.0));
        }
        if !self.nodes.contains_key(source) {
            return Err(DomainError::UnknownEndpoint(source.clone()));
        }
        if !self.nodes.contains_key(target) {
            return Err(DomainError::UnknownEndpoint(target.clone()));
        }
        let lcg = self.find_lcg(&[source.clone(), target.clone()]);
        let mut g = self.clone();
        g.edges.insert(
            id.clone(),
            DomainEdgeRecord {
                id: id.clone(),
                source: source.clone(),
                target: target.clone(),
                data,
            },
        );
        g.nodes.get_mut(&lcg).expect("LCG always exists").edges.push(id.clone());
        g.edge_container.insert(id, lcg);
        Ok(g)
    }

    fn remove_edge_record(&mut self, id: &EdgeId) {
        if let Some(container) = self.edge_container.remove(id) {
            if let Some(n) = self.nodes.get_mut(&container) {
                n.edges.retain(|e| e != id);
            }
        }
        self.edges.shift_remove(id);
    }

    /// Removes the subtree rooted at `id` and every edge anywhere in the
    /// tree incident to any id in that subtree. No-op (returns an
    /// unchanged clone) if `id` doesn't exist or is the root — this keeps
    /// concurrent multi-select deletes idempotent (spec §8 S2).
    pub fn delete_node(&self, id: &NodeId) -> Domain {
        if id.is_root() || !self.nodes.contains_key(id) {
            return self.clone();
        }
        let mut g = self.clone();
        let subtree = g.subtree_ids(id);

        if let Some(p) = g.parent.get(id).cloned() {
            if let Some(pn) = g.nodes.get_mut(&p) {
                pn.children.retain(|c| c != id);
            }
        }

        let doomed_edges: Vec<EdgeId> = g
            .edges
            .values()
            .filter(|e| subtree.contains(&e.source) || subtree.contains(&e.target))
            .map(|e| e.id.clone())
            .collect();
        for eid in &doomed_edges {
            g.remove_edge_record(eid);
        }

        for nid in &subtree {
            g.nodes.shift_remove(nid);
            g.parent.remove(nid);
        }
        g
    }

    pub fn delete_edge(&self, id: &EdgeId) -> Result<Domain, DomainError> {
        if !self.edges.contains_key(id) {
            return Err(DomainError::NotFound(id.0.clone()));
        }
        let mut g = self.clone();
        g.remove_edge_record(id);
        Ok(g)
    }

    /// Detaches and reattaches `id` under `new_parent_id`. Returns
    /// [`DomainError::AlreadyContains`] (harmless, swallowed by the
    /// orchestrator) when `new_parent_id` is already `id`'s parent.
    pub fn move_node(&self, id: &NodeId, new_parent_id: &NodeId) -> Result<Domain, DomainError> {
        if !self.nodes.contains_key(id) {
            return Err(DomainError::NotFound(id.0.clone()));
        }
        if !self.nodes.contains_key(new_parent_id) {
            return Err(DomainError::UnknownEndpoint(new_parent_id.clone()));
        }
        let current_parent = self.parent.get(id).cloned().unwrap_or_else(NodeId::root);
        if &current_parent == new_parent_id {
            return Err(DomainError::AlreadyContains {
                id: id.clone(),
                parent: new_parent_id.clone(),
            });
        }
        if self.is_within(new_parent_id, id) {
            return Err(DomainError::Cycle {
                id: id.clone(),
                new_parent: new_parent_id.clone(),
            });
        }

        let mut g = self.clone();
        if let Some(pn) = g.nodes.get_mut(&current_parent) {
            pn.children.retain(|c| c != id);
        }
        g.nodes.get_mut(new_parent_id).expect("checked above").children.push(id.clone());
        g.parent.insert(id.clone(), new_parent_id.clone());
        g.relocate_edges_after_reparent();
        Ok(g)
    }

    /// After a reparent, some edges' LCG may have changed; relocate their
    /// container without touching the `DomainEdgeRecord` itself (their
    /// ViewState entry, keyed by `EdgeId`, is untouched either way).
    fn relocate_edges_after_reparent(&mut self) {
        let edge_ids: Vec<EdgeId> = self.edges.keys().cloned().collect();
        for eid in edge_ids {
            let (src, tgt) = {
                let e = &self.edges[&eid];
                (e.source.clone(), e.target.clone())
            };
            let new_container = self.find_lcg(&[src, tgt]);
            let old_container = self.edge_container.get(&eid).cloned();
            if old_container.as_ref() != Some(&new_container) {
                if let Some(old) = old_container {
                    if let Some(n) = self.nodes.get_mut(&old) {
                        n.edges.retain(|e| e != &eid);
                    }
                }
                self.nodes.get_mut(&new_container).expect("LCG always exists").edges.push(eid.clone());
                self.edge_container.insert(eid, new_container);
            }
        }
    }

    /// Creates a new Group under `parent_id` and reparents each of `ids`
    /// into it.
    pub fn group_nodes(
        &self,
        ids: &[NodeId],
        parent_id: &NodeId,
        new_group_id: impl Into<NodeId>,
    ) -> Result<Domain, DomainError> {
        let new_group_id = new_group_id.into();
        let mut g = self.add_node(
            new_group_id.clone(),
            parent_id,
            NodeData {
                is_group: true,
                ..Default::default()
            },
        )?;
        for id in ids {
            g = g.move_node(id, &new_group_id)?;
        }
        Ok(g)
    }

    /// Reparents `group_id`'s children to its own parent, then removes the
    /// (now childless) group node.
    pub fn ungroup_node(&self, group_id: &NodeId) -> Result<Domain, DomainError> {
        if !self.nodes.contains_key(group_id) {
            return Err(DomainError::NotFound(group_id.0.clone()));
        }
        let parent = self.parent.get(group_id).cloned().unwrap_or_else(NodeId::root);
        let children: Vec<NodeId> = self.nodes[group_id].children.clone();
        let mut g = self.clone();
        for child in &children {
            g = g.move_node(child, &parent)?;
        }
        Ok(g.delete_node(group_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn root() -> NodeId {
        NodeId::root()
    }

    #[test]
    fn add_node_rejects_duplicate_id() {
        let d = Domain::new().add_node("a", &root(), NodeData::default()).unwrap();
        let err = d.add_node("a", &root(), NodeData::default()).unwrap_err();
        assert!(matches!(err, DomainError::DuplicateId(id) if id == "a"));
    }

    #[test]
    fn duplicate_id_spans_node_and_edge_namespace() {
        let d = Domain::new()
            .add_node("a", &root(), NodeData::default())
            .unwrap()
            .add_node("b", &root(), NodeData::default())
            .unwrap()
            .add_edge("e1", &"a".into(), &"b".into(), EdgeData::default())
            .unwrap();
        let err = d.add_node("e1", &root(), NodeData::default()).unwrap_err();
        assert!(matches!(err, DomainError::DuplicateId(id) if id == "e1"));
    }

    #[test]
    fn incident_purge_on_delete() {
        let d = Domain::new()
            .add_node("a", &root(), NodeData::default())
            .unwrap()
            .add_node("b", &root(), NodeData::default())
            .unwrap()
            .add_node("c", &root(), NodeData::default())
            .unwrap()
            .add_edge("ab", &"a".into(), &"b".into(), EdgeData::default())
            .unwrap()
            .add_edge("bc", &"b".into(), &"c".into(), EdgeData::default())
            .unwrap();

        let d = d.delete_node(&"b".into());
        assert_eq!(d.node_count(), 2);
        assert!(!d.contains_edge(&"ab".into()));
        assert!(!d.contains_edge(&"bc".into()));
        assert_eq!(d.edge_count(), 0);
    }

    #[test]
    fn lcg_root_for_distinct_groups() {
        let d = Domain::new()
            .add_node("g1", &root(), NodeData::default())
            .unwrap()
            .add_node("n1", &"g1".into(), NodeData::default())
            .unwrap()
            .add_node("n2", &root(), NodeData::default())
            .unwrap();
        assert_eq!(d.find_lcg(&["n1".into(), "n2".into()]), root());
    }

    #[test]
    fn lcg_sibling_nodes_in_one_group() {
        let d = Domain::new()
            .add_node("g1", &root(), NodeData::default())
            .unwrap()
            .add_node("n1", &"g1".into(), NodeData::default())
            .unwrap()
            .add_node("n2", &"g1".into(), NodeData::default())
            .unwrap();
        assert_eq!(d.find_lcg(&["n1".into(), "n2".into()]), NodeId::from("g1"));
    }

    #[test]
    fn edge_relocates_to_new_lcg_on_reparent() {
        let d = Domain::new()
            .add_node("g1", &root(), NodeData::default())
            .unwrap()
            .add_node("n1", &"g1".into(), NodeData::default())
            .unwrap()
            .add_node("n2", &root(), NodeData::default())
            .unwrap()
            .add_edge("e1", &"n1".into(), &"n2".into(), EdgeData::default())
            .unwrap();
        assert_eq!(d.get_edge(&"e1".into()).unwrap().source, NodeId::from("n1"));
        assert!(d.find_node_by_id(&root()).unwrap().edges.contains(&"e1".into()));

        let d = d.move_node(&"n2".into(), &"g1".into()).unwrap();
        assert!(!d.find_node_by_id(&root()).unwrap().edges.contains(&"e1".into()));
        assert!(d.find_node_by_id(&"g1".into()).unwrap().edges.contains(&"e1".into()));
    }

    #[test]
    fn move_to_current_parent_is_already_contains() {
        let d = Domain::new().add_node("a", &root(), NodeData::default()).unwrap();
        let err = d.move_node(&"a".into(), &root()).unwrap_err();
        assert!(matches!(err, DomainError::AlreadyContains { .. }));
    }

    #[test]
    fn move_into_own_descendant_is_cycle() {
        let d = Domain::new()
            .add_node("g1", &root(), NodeData::default())
            .unwrap()
            .add_node("n1", &"g1".into(), NodeData::default())
            .unwrap();
        let err = d.move_node(&"g1".into(), &"n1".into()).unwrap_err();
        assert!(matches!(err, DomainError::Cycle { .. }));
    }

    #[test]
    fn group_then_ungroup_restores_flat_children() {
        let d = Domain::new()
            .add_node("a", &root(), NodeData::default())
            .unwrap()
            .add_node("b", &root(), NodeData::default())
            .unwrap();
        let d = d.group_nodes(&["a".into(), "b".into()], &root(), "g1").unwrap();
        assert_eq!(d.children(&"g1".into()).len(), 2);
        assert!(matches!(d.kind(&"g1".into()), Kind::Group));

        let d = d.ungroup_node(&"g1".into()).unwrap();
        assert!(!d.contains_node(&"g1".into()));
        let mut root_children = d.children(&root()).to_vec();
        root_children.sort();
        assert_eq!(root_children, vec![NodeId::from("a"), NodeId::from("b")]);
    }

    #[test]
    fn delete_node_is_idempotent_on_missing_id() {
        let d = Domain::new();
        let d2 = d.delete_node(&"missing".into());
        assert_eq!(d2.node_count(), 0);
    }

    #[test]
    fn json_roundtrip_preserves_structure() {
        let d = Domain::new()
            .add_node("a", &root(), NodeData::default())
            .unwrap()
            .add_node("b", &root(), NodeData::default())
            .unwrap()
            .add_edge("ab", &"a".into(), &"b".into(), EdgeData::default())
            .unwrap();
        let json = serde_json::to_string(&d).unwrap();
        let restored: Domain = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.node_count(), d.node_count());
        assert_eq!(restored.edge_count(), d.edge_count());
        assert_eq!(restored.find_lcg(&["a".into(), "b".into()]), root());
    }
}
