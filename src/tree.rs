//! Bounded search-tree capture for visualization.
//!
//! Every algorithm records discovered states into a [`TreeRecorder`] so the
//! UI can render the explored portion of the state space. The buffer is
//! capped: past [`MAX_TREE_NODES`] nodes, recording silently stops while the
//! search itself continues unaffected.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::puzzle::{heuristic, state_key, JugState};

/// Cap on recorded nodes, for rendering performance only.
pub const MAX_TREE_NODES: usize = 200;

/// One discovered state in the rendered search tree
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTreeNode {
    /// Canonical state key, unique within the tree
    pub id: String,
    pub state: JugState,
    /// Key of the node this state was discovered from; `None` for the root
    pub parent_id: Option<String>,
    pub depth: usize,
    pub heuristic: u32,
    pub g_cost: usize,
    pub f_cost: usize,
    /// Set after a solution is found, on exactly the winning path's nodes
    pub is_path: bool,
}

/// Accumulator for the search tree, one per `solve` invocation.
///
/// Recording is idempotent per state key: a state is entered once, the
/// first time it is discovered, and revisits are no-ops.
#[derive(Debug)]
pub struct TreeRecorder {
    goal_state: JugState,
    nodes: Vec<SearchTreeNode>,
    seen: HashSet<String>,
}

impl TreeRecorder {
    pub fn new(goal_state: &[u32]) -> Self {
        Self {
            goal_state: goal_state.to_vec(),
            nodes: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Record a discovered state. No-op if the state was already recorded
    /// or the buffer is full.
    pub fn record(&mut self, state: &[u32], parent_id: Option<&str>, depth: usize) {
        if self.nodes.len() >= MAX_TREE_NODES {
            return;
        }
        let id = state_key(state);
        if !self.seen.insert(id.clone()) {
            return;
        }
        let h = heuristic(state, &self.goal_state);
        let g = depth;
        self.nodes.push(SearchTreeNode {
            id,
            state: state.to_vec(),
            parent_id: parent_id.map(str::to_owned),
            depth,
            heuristic: h,
            g_cost: g,
            f_cost: g + h as usize,
            is_path: false,
        });
    }

    /// Back-mark the nodes whose states appear in the winning path.
    pub fn mark_path(&mut self, path: &[JugState]) {
        let path_keys: HashSet<String> = path.iter().map(|s| state_key(s)).collect();
        for node in &mut self.nodes {
            node.is_path = path_keys.contains(&node.id);
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn into_nodes(self) -> Vec<SearchTreeNode> {
        self.nodes
    }
}
