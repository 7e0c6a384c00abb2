//! Puzzle representation types that match the UI's JSON format.
//!
//! These types are designed to serialize directly to the JSON shapes the
//! jug widget UI consumes (camelCase fields, tagged move objects), so the
//! solver output can be fed to the renderer unchanged.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Fill levels of the jugs, index i = current volume in jug i.
///
/// Invariant (maintained by the move generator, never checked here):
/// `0 <= state[i] <= capacities[i]` for all i.
pub type JugState = Vec<u32>;

/// Successor list returned by [`get_possible_moves`].
///
/// Stays inline for up to three jugs (n*(n+1) candidate moves).
pub type MoveList = SmallVec<[(JugState, Move); 12]>;

/// Search strategy tag - matches the UI's algorithm selector values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchAlgorithm {
    #[serde(rename = "BFS")]
    Bfs,
    #[serde(rename = "DFS")]
    Dfs,
    #[serde(rename = "IDDFS")]
    Iddfs,
    #[serde(rename = "UCS")]
    Ucs,
    #[serde(rename = "A*")]
    AStar,
}

impl SearchAlgorithm {
    /// All five strategies, in display order.
    pub const ALL: [SearchAlgorithm; 5] = [
        SearchAlgorithm::Bfs,
        SearchAlgorithm::Dfs,
        SearchAlgorithm::Iddfs,
        SearchAlgorithm::Ucs,
        SearchAlgorithm::AStar,
    ];

    /// The string tag used in JSON and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            SearchAlgorithm::Bfs => "BFS",
            SearchAlgorithm::Dfs => "DFS",
            SearchAlgorithm::Iddfs => "IDDFS",
            SearchAlgorithm::Ucs => "UCS",
            SearchAlgorithm::AStar => "A*",
        }
    }

    /// Parse a tag, case-insensitively. Accepts "ASTAR" as an alias for "A*".
    pub fn from_tag(tag: &str) -> Option<SearchAlgorithm> {
        match tag.to_ascii_uppercase().as_str() {
            "BFS" => Some(SearchAlgorithm::Bfs),
            "DFS" => Some(SearchAlgorithm::Dfs),
            "IDDFS" => Some(SearchAlgorithm::Iddfs),
            "UCS" => Some(SearchAlgorithm::Ucs),
            "A*" | "ASTAR" => Some(SearchAlgorithm::AStar),
            _ => None,
        }
    }
}

impl std::fmt::Display for SearchAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single action on the jugs - matches the UI's Move JSON
/// (`{"type":"POUR","jugIndex":0,"targetJugIndex":1}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Move {
    #[serde(rename = "FILL")]
    Fill {
        #[serde(rename = "jugIndex")]
        jug_index: usize,
    },
    #[serde(rename = "EMPTY")]
    Empty {
        #[serde(rename = "jugIndex")]
        jug_index: usize,
    },
    #[serde(rename = "POUR")]
    Pour {
        #[serde(rename = "jugIndex")]
        jug_index: usize,
        #[serde(rename = "targetJugIndex")]
        target_jug_index: usize,
    },
}

impl Move {
    /// Human-readable description with 1-based jug numbers
    pub fn description(&self) -> String {
        match *self {
            Move::Fill { jug_index } => format!("Fill Jug {}", jug_index + 1),
            Move::Empty { jug_index } => format!("Empty Jug {}", jug_index + 1),
            Move::Pour {
                jug_index,
                target_jug_index,
            } => format!("Pour Jug {} into Jug {}", jug_index + 1, target_jug_index + 1),
        }
    }
}

/// The complete puzzle configuration consumed by the CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JugConfig {
    pub capacities: Vec<u32>,
    pub initial_state: JugState,
    pub goal_state: JugState,
}

/// Canonical key for a state, e.g. `[4,0]`.
///
/// Used as the identity of visited-set entries and search tree nodes.
pub fn state_key(state: &[u32]) -> String {
    use std::fmt::Write;

    let mut key = String::with_capacity(state.len() * 3 + 2);
    key.push('[');
    for (i, level) in state.iter().enumerate() {
        if i > 0 {
            key.push(',');
        }
        let _ = write!(key, "{level}");
    }
    key.push(']');
    key
}

/// Element-wise goal test.
pub fn is_goal_reached(state: &[u32], goal_state: &[u32]) -> bool {
    state == goal_state
}

/// Manhattan distance to the goal: sum of per-jug absolute differences.
///
/// A* uses this as its goal-distance estimate; the other strategies report
/// it as node metadata only. Note a single EMPTY or POUR can close several
/// units of distance at unit cost, so this can overestimate the true
/// remaining moves.
pub fn heuristic(state: &[u32], goal_state: &[u32]) -> u32 {
    state
        .iter()
        .zip(goal_state.iter())
        .map(|(&level, &goal)| level.abs_diff(goal))
        .sum()
}

/// Enumerate every legal successor of `state` together with the move that
/// produces it.
///
/// The order is contractual: for each jug i in ascending order, FILL(i),
/// then EMPTY(i), then POUR(i, j) for each j != i in ascending order. DFS
/// branch order and UCS/A* tie-breaks depend on it.
pub fn get_possible_moves(state: &[u32], capacities: &[u32]) -> MoveList {
    let mut moves = MoveList::new();
    let n = state.len();

    for i in 0..n {
        // Fill
        if state[i] < capacities[i] {
            let mut next = state.to_vec();
            next[i] = capacities[i];
            moves.push((next, Move::Fill { jug_index: i }));
        }

        // Empty
        if state[i] > 0 {
            let mut next = state.to_vec();
            next[i] = 0;
            moves.push((next, Move::Empty { jug_index: i }));
        }

        // Pour
        for j in 0..n {
            if i != j && state[i] > 0 && state[j] < capacities[j] {
                let amount = state[i].min(capacities[j] - state[j]);
                let mut next = state.to_vec();
                next[i] -= amount;
                next[j] += amount;
                moves.push((
                    next,
                    Move::Pour {
                        jug_index: i,
                        target_jug_index: j,
                    },
                ));
            }
        }
    }

    moves
}
