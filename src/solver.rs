//! The five search strategies over the jug state space.
//!
//! All strategies share the same contract: expand states with
//! [`get_possible_moves`], test the goal on expansion, record discovered
//! states into a bounded [`TreeRecorder`], and either return a
//! [`SolverResult`] or `None` once the frontier is exhausted. What differs
//! per strategy is frontier discipline and visited-set timing:
//!
//! - BFS marks visited at enqueue, DFS at pop (a state may sit on the stack
//!   several times but is expanded once).
//! - IDDFS keeps a visited set per branch, copied at each recursion level,
//!   so sibling branches may legitimately revisit states pruned elsewhere.
//!   The copies cost O(depth) extra sets per path; fine for puzzle-sized
//!   spaces, and sharing one set instead would change the semantics.
//! - UCS and A* keep a best-cost map and discard dominated entries at pop.

use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::puzzle::{
    get_possible_moves, heuristic, is_goal_reached, state_key, JugState, Move, SearchAlgorithm,
};
use crate::tree::{SearchTreeNode, TreeRecorder};

/// Depth bound for iterative deepening; reaching it means "no solution".
const MAX_IDDFS_DEPTH: usize = 1000;

/// Counters observed during a search; never influence control flow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchAnalytics {
    pub algorithm: SearchAlgorithm,
    /// States popped/dequeued and goal-tested, counted once per expansion
    pub nodes_expanded: usize,
    /// Size of the frontier structure at termination
    pub frontier_size: usize,
    pub time_taken_ms: f64,
    /// Maximum path length - 1 among expanded states
    pub max_depth: usize,
    pub solution_depth: usize,
    /// Heuristic of the search start state
    pub current_heuristic: u32,
}

/// A successful search: the state path, the moves connecting it, the
/// captured search tree, and the run's analytics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverResult {
    pub path: Vec<JugState>,
    pub moves: Vec<Move>,
    pub tree: Vec<SearchTreeNode>,
    pub analytics: SearchAnalytics,
}

/// A frontier entry carrying the partial answer alongside the state
#[derive(Debug, Clone)]
struct SearchFrame {
    state: JugState,
    path: Vec<JugState>,
    moves: Vec<Move>,
}

impl SearchFrame {
    fn root(initial_state: &[u32]) -> Self {
        Self {
            state: initial_state.to_vec(),
            path: vec![initial_state.to_vec()],
            moves: Vec::new(),
        }
    }

    fn child(&self, next_state: JugState, mv: Move) -> Self {
        let mut path = self.path.clone();
        path.push(next_state.clone());
        let mut moves = self.moves.clone();
        moves.push(mv);
        Self {
            state: next_state,
            path,
            moves,
        }
    }

    fn depth(&self) -> usize {
        self.path.len() - 1
    }
}

/// Priority-queue entry for UCS/A*. The sequence number makes ordering
/// among equal priorities FIFO, so node-discovery order is reproducible.
#[derive(Debug)]
struct FrontierEntry {
    priority: usize,
    seq: u64,
    frame: SearchFrame,
    cost: usize,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reversed so the max-heap pops the lowest priority, then the
        // earliest insertion.
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Solve a jug puzzle with the requested strategy.
///
/// Returns `None` when the goal is unreachable (frontier exhausted, or the
/// IDDFS depth bound runs out) - that is a defined outcome, not an error.
pub fn solve(
    initial_state: &[u32],
    goal_state: &[u32],
    capacities: &[u32],
    algorithm: SearchAlgorithm,
) -> Option<SolverResult> {
    let start_time = Instant::now();
    match algorithm {
        SearchAlgorithm::Bfs => solve_bfs(initial_state, goal_state, capacities, start_time),
        SearchAlgorithm::Dfs => solve_dfs(initial_state, goal_state, capacities, start_time),
        SearchAlgorithm::Iddfs => solve_iddfs(initial_state, goal_state, capacities, start_time),
        SearchAlgorithm::Ucs | SearchAlgorithm::AStar => {
            solve_best_first(initial_state, goal_state, capacities, algorithm, start_time)
        }
    }
}

/// Bookkeeping shared by the strategies: the tree buffer, the expansion
/// counters, and result assembly. One per `solve` invocation.
struct SearchRun<'a> {
    initial_state: &'a [u32],
    goal_state: &'a [u32],
    tree: TreeRecorder,
    start_time: Instant,
    nodes_expanded: usize,
    max_depth: usize,
}

impl<'a> SearchRun<'a> {
    fn new(initial_state: &'a [u32], goal_state: &'a [u32], start_time: Instant) -> Self {
        let mut tree = TreeRecorder::new(goal_state);
        tree.record(initial_state, None, 0);
        Self {
            initial_state,
            goal_state,
            tree,
            start_time,
            nodes_expanded: 0,
            max_depth: 0,
        }
    }

    fn expanded(&mut self, depth: usize) {
        self.nodes_expanded += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Assemble the result once a goal frame has been expanded.
    fn finish(
        mut self,
        frame: SearchFrame,
        algorithm: SearchAlgorithm,
        frontier_size: usize,
    ) -> SolverResult {
        self.tree.mark_path(&frame.path);
        SolverResult {
            analytics: SearchAnalytics {
                algorithm,
                nodes_expanded: self.nodes_expanded,
                frontier_size,
                time_taken_ms: self.start_time.elapsed().as_secs_f64() * 1000.0,
                max_depth: self.max_depth,
                solution_depth: frame.moves.len(),
                current_heuristic: heuristic(self.initial_state, self.goal_state),
            },
            path: frame.path,
            moves: frame.moves,
            tree: self.tree.into_nodes(),
        }
    }
}

/// FIFO frontier; visited marked at enqueue. Optimal in move count because
/// frames are dequeued in non-decreasing depth order.
fn solve_bfs(
    initial_state: &[u32],
    goal_state: &[u32],
    capacities: &[u32],
    start_time: Instant,
) -> Option<SolverResult> {
    let mut run = SearchRun::new(initial_state, goal_state, start_time);

    let mut queue: VecDeque<SearchFrame> = VecDeque::new();
    queue.push_back(SearchFrame::root(initial_state));
    let mut visited: HashSet<String> = HashSet::new();
    visited.insert(state_key(initial_state));

    while let Some(frame) = queue.pop_front() {
        run.expanded(frame.depth());

        if is_goal_reached(&frame.state, goal_state) {
            let frontier_size = queue.len();
            return Some(run.finish(frame, SearchAlgorithm::Bfs, frontier_size));
        }

        let parent_key = state_key(&frame.state);
        for (next_state, mv) in get_possible_moves(&frame.state, capacities) {
            if visited.insert(state_key(&next_state)) {
                run.tree.record(&next_state, Some(&parent_key), frame.path.len());
                queue.push_back(frame.child(next_state, mv));
            }
        }
    }

    None
}

/// LIFO frontier; visited marked at pop, duplicate pops skipped. Successors
/// are pushed in reverse generator order so that after the LIFO pop, jugs
/// are still explored in ascending order. First goal found wins.
fn solve_dfs(
    initial_state: &[u32],
    goal_state: &[u32],
    capacities: &[u32],
    start_time: Instant,
) -> Option<SolverResult> {
    let mut run = SearchRun::new(initial_state, goal_state, start_time);

    let mut stack: Vec<SearchFrame> = vec![SearchFrame::root(initial_state)];
    let mut visited: HashSet<String> = HashSet::new();

    while let Some(frame) = stack.pop() {
        if !visited.insert(state_key(&frame.state)) {
            continue;
        }

        run.expanded(frame.depth());

        if is_goal_reached(&frame.state, goal_state) {
            let frontier_size = stack.len();
            return Some(run.finish(frame, SearchAlgorithm::Dfs, frontier_size));
        }

        let parent_key = state_key(&frame.state);
        for (next_state, mv) in get_possible_moves(&frame.state, capacities).into_iter().rev() {
            if !visited.contains(&state_key(&next_state)) {
                run.tree.record(&next_state, Some(&parent_key), frame.path.len());
                stack.push(frame.child(next_state, mv));
            }
        }
    }

    None
}

/// Depth-limited passes with limit = 0, 1, 2, ... Reproduces BFS's optimal
/// depth with DFS's memory profile. The captured tree holds only the
/// winning path; unsuccessful passes are discarded work.
fn solve_iddfs(
    initial_state: &[u32],
    goal_state: &[u32],
    capacities: &[u32],
    start_time: Instant,
) -> Option<SolverResult> {
    let root = SearchFrame::root(initial_state);

    for limit in 0..MAX_IDDFS_DEPTH {
        let visited = HashSet::new();
        if let Some((frame, nodes_expanded)) =
            depth_limited_search(&root, goal_state, capacities, limit, &visited)
        {
            // Only the winning pass is captured; the discarded shallower
            // passes never make it into the tree.
            let mut run = SearchRun::new(initial_state, goal_state, start_time);
            run.nodes_expanded = nodes_expanded;
            run.max_depth = limit;
            let mut parent_key: Option<String> = None;
            for (depth, state) in frame.path.iter().enumerate() {
                run.tree.record(state, parent_key.as_deref(), depth);
                parent_key = Some(state_key(state));
            }

            return Some(run.finish(frame, SearchAlgorithm::Iddfs, 0));
        }
    }

    None
}

/// One depth-limited pass. `visited` holds the ancestors of this branch
/// only; each recursion level works on its own copy, so a state pruned in
/// one branch may still be explored from a sibling.
fn depth_limited_search(
    frame: &SearchFrame,
    goal_state: &[u32],
    capacities: &[u32],
    limit: usize,
    visited: &HashSet<String>,
) -> Option<(SearchFrame, usize)> {
    if is_goal_reached(&frame.state, goal_state) {
        return Some((frame.clone(), 1));
    }
    if limit == 0 {
        return None;
    }

    let mut branch = visited.clone();
    branch.insert(state_key(&frame.state));
    let mut tested = 1;

    for (next_state, mv) in get_possible_moves(&frame.state, capacities) {
        if branch.contains(&state_key(&next_state)) {
            continue;
        }
        let child = frame.child(next_state, mv);
        match depth_limited_search(&child, goal_state, capacities, limit - 1, &branch) {
            Some((solution, expanded)) => return Some((solution, tested + expanded)),
            None => tested += 1,
        }
    }

    None
}

/// UCS and A*: stable min-priority frontier with a best-cost map. A state
/// may be pushed many times; a popped entry whose key already settled at an
/// equal or cheaper cost is dominated and discarded without expansion.
/// Priority is g(n) for UCS, g(n) + h(n) for A*.
fn solve_best_first(
    initial_state: &[u32],
    goal_state: &[u32],
    capacities: &[u32],
    algorithm: SearchAlgorithm,
    start_time: Instant,
) -> Option<SolverResult> {
    let mut run = SearchRun::new(initial_state, goal_state, start_time);

    let mut heap: BinaryHeap<FrontierEntry> = BinaryHeap::new();
    let mut seq: u64 = 0;
    heap.push(FrontierEntry {
        priority: 0,
        seq,
        frame: SearchFrame::root(initial_state),
        cost: 0,
    });
    seq += 1;

    let mut best_cost: HashMap<String, usize> = HashMap::new();

    while let Some(entry) = heap.pop() {
        let frame = entry.frame;
        let key = state_key(&frame.state);

        if best_cost.get(&key).is_some_and(|&settled| settled <= entry.cost) {
            continue;
        }
        best_cost.insert(key.clone(), entry.cost);

        // First settle: enter the node in case discovery-time recording
        // was cut off by the tree cap.
        let parent_key = if frame.path.len() > 1 {
            Some(state_key(&frame.path[frame.path.len() - 2]))
        } else {
            None
        };
        run.tree.record(&frame.state, parent_key.as_deref(), frame.depth());

        run.expanded(frame.depth());

        if is_goal_reached(&frame.state, goal_state) {
            let frontier_size = heap.len();
            return Some(run.finish(frame, algorithm, frontier_size));
        }

        for (next_state, mv) in get_possible_moves(&frame.state, capacities) {
            let next_cost = entry.cost + 1;
            let priority = match algorithm {
                SearchAlgorithm::AStar => next_cost + heuristic(&next_state, goal_state) as usize,
                _ => next_cost,
            };
            run.tree.record(&next_state, Some(&key), frame.path.len());
            heap.push(FrontierEntry {
                priority,
                seq,
                frame: frame.child(next_state, mv),
                cost: next_cost,
            });
            seq += 1;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Check the result against the solve contract: path endpoints, one
    /// legal generator move per step, and consistent analytics.
    fn assert_valid_solution(
        result: &SolverResult,
        initial_state: &[u32],
        goal_state: &[u32],
        capacities: &[u32],
    ) {
        assert_eq!(result.path[0], initial_state);
        assert_eq!(result.path[result.path.len() - 1], goal_state);
        assert_eq!(result.moves.len(), result.path.len() - 1);
        assert_eq!(result.analytics.solution_depth, result.moves.len());
        assert_eq!(
            result.analytics.current_heuristic,
            heuristic(initial_state, goal_state)
        );

        for (step, mv) in result.moves.iter().enumerate() {
            let successors = get_possible_moves(&result.path[step], capacities);
            assert!(
                successors
                    .iter()
                    .any(|(next, m)| m == mv && *next == result.path[step + 1]),
                "step {step} is not a legal move"
            );
        }
    }

    fn assert_valid_tree(result: &SolverResult) {
        let ids: HashSet<&str> = result.tree.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids.len(), result.tree.len(), "duplicate tree node ids");
        for node in &result.tree {
            if let Some(parent) = &node.parent_id {
                assert!(ids.contains(parent.as_str()), "dangling parent {parent}");
            }
        }
    }

    #[test]
    fn test_bfs_classic_five_three() {
        // The classic "measure 4 with a 5 and a 3" takes 6 moves to (4,3)
        // and a 7th to empty the small jug.
        let result = solve(&[0, 0], &[4, 0], &[5, 3], SearchAlgorithm::Bfs).unwrap();
        assert_eq!(result.moves.len(), 7);
        assert_valid_solution(&result, &[0, 0], &[4, 0], &[5, 3]);

        let result = solve(&[0, 0], &[4, 3], &[5, 3], SearchAlgorithm::Bfs).unwrap();
        assert_eq!(result.moves.len(), 6);
        assert_valid_solution(&result, &[0, 0], &[4, 3], &[5, 3]);
    }

    #[test]
    fn test_ucs_and_astar_match_bfs_optimum() {
        let bfs = solve(&[0, 0], &[4, 0], &[5, 3], SearchAlgorithm::Bfs).unwrap();
        for algorithm in [SearchAlgorithm::Ucs, SearchAlgorithm::AStar] {
            let result = solve(&[0, 0], &[4, 0], &[5, 3], algorithm).unwrap();
            assert_eq!(result.moves.len(), bfs.moves.len(), "{algorithm}");
            assert_valid_solution(&result, &[0, 0], &[4, 0], &[5, 3]);
        }
    }

    #[test]
    fn test_iddfs_finds_bfs_depth() {
        let bfs = solve(&[0, 0], &[4, 0], &[5, 3], SearchAlgorithm::Bfs).unwrap();
        let iddfs = solve(&[0, 0], &[4, 0], &[5, 3], SearchAlgorithm::Iddfs).unwrap();
        assert_eq!(iddfs.moves.len(), bfs.moves.len());
        assert_eq!(iddfs.analytics.max_depth, iddfs.moves.len());
        assert_eq!(iddfs.analytics.frontier_size, 0);
        assert_valid_solution(&iddfs, &[0, 0], &[4, 0], &[5, 3]);
    }

    #[test]
    fn test_already_at_goal_is_zero_moves() {
        for algorithm in SearchAlgorithm::ALL {
            let result = solve(&[4, 0], &[4, 0], &[5, 3], algorithm).unwrap();
            assert_eq!(result.moves.len(), 0, "{algorithm}");
            assert_eq!(result.path, vec![vec![4, 0]], "{algorithm}");
            assert_eq!(result.analytics.solution_depth, 0, "{algorithm}");
        }
    }

    #[test]
    fn test_unreachable_goal_is_none_for_all() {
        // (2,2) leaves neither jug empty nor full, and every move ends
        // with the touched jug at one of those bounds.
        for algorithm in SearchAlgorithm::ALL {
            assert!(
                solve(&[0, 0], &[2, 2], &[5, 3], algorithm).is_none(),
                "{algorithm}"
            );
        }
    }

    #[test]
    fn test_single_jug_interior_level_unreachable() {
        // With no second vessel a jug only ever holds 0 or its capacity.
        assert!(solve(&[0], &[5], &[10], SearchAlgorithm::AStar).is_none());
        assert!(solve(&[0], &[5], &[10], SearchAlgorithm::Bfs).is_none());
        // The boundary levels remain reachable.
        let result = solve(&[0], &[10], &[10], SearchAlgorithm::Bfs).unwrap();
        assert_eq!(result.moves, vec![Move::Fill { jug_index: 0 }]);
    }

    #[test]
    fn test_dfs_three_jugs() {
        let result = solve(&[0, 0, 0], &[2, 2, 3], &[7, 5, 3], SearchAlgorithm::Dfs).unwrap();
        assert_valid_solution(&result, &[0, 0, 0], &[2, 2, 3], &[7, 5, 3]);
        assert_valid_tree(&result);
    }

    #[test]
    fn test_ucs_six_four() {
        // fill 6, pour into 4, empty 4.
        let result = solve(&[0, 0], &[2, 0], &[6, 4], SearchAlgorithm::Ucs).unwrap();
        assert_eq!(result.moves.len(), 3);
        assert_valid_solution(&result, &[0, 0], &[2, 0], &[6, 4]);
    }

    #[test]
    fn test_iddfs_seven_four() {
        let bfs = solve(&[0, 0], &[1, 0], &[7, 4], SearchAlgorithm::Bfs).unwrap();
        let iddfs = solve(&[0, 0], &[1, 0], &[7, 4], SearchAlgorithm::Iddfs).unwrap();
        assert_eq!(iddfs.moves.len(), bfs.moves.len());
        assert_valid_solution(&iddfs, &[0, 0], &[1, 0], &[7, 4]);
    }

    #[test]
    fn test_astar_pour_chain() {
        let result = solve(&[5, 0, 0], &[0, 3, 2], &[5, 3, 2], SearchAlgorithm::AStar).unwrap();
        // Two pours distribute the full large jug.
        assert_eq!(result.moves.len(), 2);
        assert_valid_solution(&result, &[5, 0, 0], &[0, 3, 2], &[5, 3, 2]);
    }

    #[test]
    fn test_four_jugs() {
        // (1,1,1,1) has no empty or full jug, so no move can produce it.
        assert!(solve(&[0; 4], &[1, 1, 1, 1], &[8, 5, 3, 2], SearchAlgorithm::AStar).is_none());
        // (1,1,1,2) keeps the smallest jug full and is reachable.
        let result =
            solve(&[0; 4], &[1, 1, 1, 2], &[8, 5, 3, 2], SearchAlgorithm::AStar).unwrap();
        assert_valid_solution(&result, &[0; 4], &[1, 1, 1, 2], &[8, 5, 3, 2]);
    }

    #[test]
    fn test_determinism() {
        for algorithm in SearchAlgorithm::ALL {
            let a = solve(&[0, 0], &[4, 0], &[5, 3], algorithm).unwrap();
            let b = solve(&[0, 0], &[4, 0], &[5, 3], algorithm).unwrap();
            assert_eq!(a.path, b.path, "{algorithm}");
            assert_eq!(a.moves, b.moves, "{algorithm}");
            assert_eq!(a.analytics.nodes_expanded, b.analytics.nodes_expanded);
        }
    }

    #[test]
    fn test_tree_invariants_and_path_marking() {
        let result = solve(&[0, 0], &[4, 0], &[5, 3], SearchAlgorithm::Bfs).unwrap();
        assert_valid_tree(&result);

        // The whole 5-3 space is 16 reachable states, well under the cap,
        // so every path state is in the tree and marked.
        let marked: HashSet<&str> = result
            .tree
            .iter()
            .filter(|n| n.is_path)
            .map(|n| n.id.as_str())
            .collect();
        let path_keys: HashSet<String> = result.path.iter().map(|s| state_key(s)).collect();
        assert_eq!(marked.len(), path_keys.len());
        for key in &path_keys {
            assert!(marked.contains(key.as_str()));
        }
    }

    #[test]
    fn test_iddfs_tree_is_winning_path_only() {
        let result = solve(&[0, 0], &[4, 0], &[5, 3], SearchAlgorithm::Iddfs).unwrap();
        assert_eq!(result.tree.len(), result.path.len());
        assert!(result.tree.iter().all(|n| n.is_path));
        assert!(result.tree[0].parent_id.is_none());
        for (i, node) in result.tree.iter().enumerate().skip(1) {
            assert_eq!(node.parent_id.as_deref(), Some(result.tree[i - 1].id.as_str()));
            assert_eq!(node.depth, i);
        }
    }

    #[test]
    fn test_analytics_counters() {
        let result = solve(&[0, 0], &[4, 0], &[5, 3], SearchAlgorithm::Bfs).unwrap();
        assert!(result.analytics.nodes_expanded >= result.path.len());
        assert!(result.analytics.max_depth >= result.moves.len() - 1);
        assert_eq!(result.analytics.algorithm, SearchAlgorithm::Bfs);
        assert_eq!(result.analytics.current_heuristic, 4);
    }

    #[test]
    fn test_ucs_optimal_from_every_reachable_state() {
        // UCS is Dijkstra under unit costs, so it must match the BFS
        // distance from every reachable start; A* must at least produce a
        // valid solution from each.
        let capacities = [5u32, 3];
        let goal = [4u32, 0];

        let mut reachable: Vec<JugState> = vec![vec![0, 0]];
        let mut seen: HashSet<String> = HashSet::new();
        seen.insert(state_key(&[0, 0]));
        let mut cursor = 0;
        while cursor < reachable.len() {
            let state = reachable[cursor].clone();
            cursor += 1;
            for (next, _) in get_possible_moves(&state, &capacities) {
                if seen.insert(state_key(&next)) {
                    reachable.push(next);
                }
            }
        }
        assert_eq!(reachable.len(), 16);

        for state in &reachable {
            let bfs = solve(state, &goal, &capacities, SearchAlgorithm::Bfs).unwrap();
            let ucs = solve(state, &goal, &capacities, SearchAlgorithm::Ucs).unwrap();
            assert_eq!(ucs.moves.len(), bfs.moves.len(), "from {:?}", state);

            let astar = solve(state, &goal, &capacities, SearchAlgorithm::AStar).unwrap();
            assert_valid_solution(&astar, state, &goal, &capacities);
        }
    }

    #[test]
    fn test_best_first_tie_break_is_insertion_order() {
        // From (0,0) with caps (5,3) UCS's first expansion pushes both
        // fills at cost 1; the earlier insertion (fill jug 0) must pop
        // first, so the solution to (5,0) starts immediately.
        let result = solve(&[0, 0], &[5, 0], &[5, 3], SearchAlgorithm::Ucs).unwrap();
        assert_eq!(result.moves, vec![Move::Fill { jug_index: 0 }]);
        assert_eq!(result.analytics.nodes_expanded, 2);
    }
}
