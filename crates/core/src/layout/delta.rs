//! The patch a layout run hands back to the orchestrator to merge into
//! ViewState (spec §4.5 "Output delta").

use indexmap::IndexMap;

use crate::domain::{EdgeId, NodeId};
use crate::viewstate::{EdgeGeometry, GroupGeometry, NodeGeometry, ViewState};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewStateDelta {
    pub node: IndexMap<NodeId, NodeGeometry>,
    pub group: IndexMap<NodeId, GroupGeometry>,
    pub edge: IndexMap<EdgeId, EdgeGeometry>,
}

impl ViewStateDelta {
    pub fn is_empty(&self) -> bool {
        self.node.is_empty() && self.group.is_empty() && self.edge.is_empty()
    }

    /// Applies every patch onto `vs` in place.
    pub fn merge_into(self, vs: &mut ViewState) {
        for (id, geo) in self.node {
            vs.node.insert(id, geo);
        }
        for (id, geo) in self.group {
            vs.group.insert(id, geo);
        }
        for (id, geo) in self.edge {
            vs.edge.insert(id, geo);
        }
    }
}
