//! Next-step hints derived from a full solver run.
//!
//! A hint is one invocation of the search pipeline from the *current*
//! state, reduced to the first recommended move and a human-readable
//! message for the UI.

use serde::{Deserialize, Serialize};

use crate::puzzle::{is_goal_reached, Move, SearchAlgorithm};
use crate::solver::solve;

/// A suggested next action
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    /// Absent when the puzzle is already solved or the goal is unreachable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_move: Option<Move>,
    /// Remaining moves to the goal; 0 when already there, -1 when unreachable
    pub steps_to_goal: i64,
    pub message: String,
}

/// Derive a hint for the current state.
///
/// Runs the full solver unless the goal is already reached. An unreachable
/// goal yields the `steps_to_goal = -1` sentinel naming the algorithm that
/// failed, never an error.
pub fn get_hint(
    current_state: &[u32],
    goal_state: &[u32],
    capacities: &[u32],
    algorithm: SearchAlgorithm,
) -> Hint {
    if is_goal_reached(current_state, goal_state) {
        return Hint {
            next_move: None,
            steps_to_goal: 0,
            message: "You've already reached the goal! Great job.".to_string(),
        };
    }

    let Some(solution) = solve(current_state, goal_state, capacities, algorithm) else {
        return Hint {
            next_move: None,
            steps_to_goal: -1,
            message: format!(
                "No solution found from this state using {algorithm}. \
                 The goal may be unreachable - try a different strategy or reset."
            ),
        };
    };

    let next_move = solution.moves[0];
    let steps_to_goal = solution.moves.len() as i64;

    let action = match next_move {
        Move::Fill { jug_index } => format!("Try filling Jug {}.", jug_index + 1),
        Move::Empty { jug_index } => format!("Try emptying Jug {}.", jug_index + 1),
        Move::Pour {
            jug_index,
            target_jug_index,
        } => format!(
            "Try pouring Jug {} into Jug {}.",
            jug_index + 1,
            target_jug_index + 1
        ),
    };
    let plural = if steps_to_goal == 1 { "step" } else { "steps" };

    Hint {
        next_move: Some(next_move),
        steps_to_goal,
        message: format!(
            "{action} You are {steps_to_goal} {plural} away from the goal using {algorithm}."
        ),
    }
}
