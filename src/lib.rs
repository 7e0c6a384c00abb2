//! Search engine for generalized water-jug puzzles.
//!
//! This crate finds FILL/EMPTY/POUR sequences transforming an initial jug
//! state into a goal state, using any of five interchangeable strategies
//! (BFS, DFS, IDDFS, UCS, A*). Alongside the solution it captures a bounded
//! trace of the explored search tree for visualization, and can derive a
//! single next-step hint for an interactive UI.

pub mod hint;
pub mod puzzle;
pub mod solver;
pub mod tree;

// Re-export main types
pub use hint::{get_hint, Hint};
pub use puzzle::{
    get_possible_moves, heuristic, is_goal_reached, state_key, JugConfig, JugState, Move,
    MoveList, SearchAlgorithm,
};
pub use solver::{solve, SearchAnalytics, SolverResult};
pub use tree::{SearchTreeNode, TreeRecorder, MAX_TREE_NODES};
