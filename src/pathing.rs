use std::collections::hash_map::Entry;
use std::collections::VecDeque;
use std::error::Error;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use log::{debug, trace};
use serde_derive::{Deserialize, Serialize};

use crate::errors::MazeError;
use crate::priority_queue::MinPriorityQueue;
use crate::searchable::Searchable;
use crate::utils::{fnv_hashmap, FnvHashMap};

/// Nodes from the start to the goal, both included.
pub type Path<N> = Vec<N>;

/// Child to parent links of a search tree. The root maps to `None`.
pub type ParentMap<N> = FnvHashMap<N, Option<N>>;

/// Lifecycle of a search engine. An engine searches once; `reset` returns it to `Idle`.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum SearchState {
    Idle,
    Searching,
    Found,
    Exhausted,
}

impl Default for SearchState {
    fn default() -> Self {
        SearchState::Idle
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum SearchError {
    /// `search` called on an engine that is not `Idle`.
    AlreadySearched(SearchState),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SearchError::AlreadySearched(state) => {
                write!(f, "search engine already used (state {:?}), reset it first", state)
            }
        }
    }
}

impl Error for SearchError {}

/// A one-shot search over any `Searchable` problem.
pub trait SearchEngine {
    /// `Ok(None)` when the goal cannot be reached from the start.
    fn search<P: Searchable>(&mut self, problem: &P)
                             -> Result<Option<Path<P::Node>>, SearchError>;

    fn state(&self) -> SearchState;

    /// Nodes taken off the frontier so far, the start and goal included.
    fn states_expanded(&self) -> usize;

    fn reset(&mut self);
}

/// State and counter bookkeeping shared by the engines.
#[derive(Debug, Clone, Default)]
struct SearchProgress {
    state: SearchState,
    states_expanded: usize,
}

impl SearchProgress {
    fn begin(&mut self) -> Result<(), SearchError> {
        if self.state != SearchState::Idle {
            return Err(SearchError::AlreadySearched(self.state));
        }
        self.state = SearchState::Searching;
        Ok(())
    }

    #[inline]
    fn expanded(&mut self) {
        self.states_expanded += 1;
    }

    fn finish<N>(&mut self, path: Option<Path<N>>) -> Option<Path<N>> {
        self.state = if path.is_some() {
            SearchState::Found
        } else {
            SearchState::Exhausted
        };
        path
    }

    fn reset(&mut self) {
        *self = SearchProgress::default();
    }
}

/// Walk the parent links back from `goal` to the root and return the nodes root first.
pub fn reconstruct_path<N: Copy + Eq + Hash>(parents: &ParentMap<N>, goal: N) -> Path<N> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&Some(parent)) = parents.get(&current) {
        path.push(parent);
        current = parent;
    }
    path.reverse();
    path
}

/// Insertion and removal order is all that separates depth first from breadth first.
trait Frontier<N> {
    fn insert(&mut self, node: N);
    fn remove(&mut self) -> Option<N>;
}

impl<N> Frontier<N> for Vec<N> {
    fn insert(&mut self, node: N) {
        self.push(node);
    }
    fn remove(&mut self) -> Option<N> {
        self.pop()
    }
}

impl<N> Frontier<N> for VecDeque<N> {
    fn insert(&mut self, node: N) {
        self.push_back(node);
    }
    fn remove(&mut self) -> Option<N> {
        self.pop_front()
    }
}

fn uninformed_search<P, F>(problem: &P,
                           mut frontier: F,
                           progress: &mut SearchProgress)
                           -> Option<Path<P::Node>>
    where P: Searchable,
          F: Frontier<P::Node>
{
    let goal = problem.finish_node();
    let start = problem.start_node();

    let mut parents: ParentMap<P::Node> = fnv_hashmap(64);
    parents.insert(start, None);
    frontier.insert(start);

    while let Some(current) = frontier.remove() {
        progress.expanded();
        if current == goal {
            return Some(reconstruct_path(&parents, current));
        }

        let mut neighbours = problem.node_neighbours(current);
        while let Some(neighbour) = neighbours.pop() {
            // A parent is fixed the first time a node is discovered
            if let Entry::Vacant(slot) = parents.entry(neighbour) {
                slot.insert(Some(current));
                frontier.insert(neighbour);
            }
        }
    }
    None
}

/// Stack based search. Finds some path, not necessarily a short one.
#[derive(Debug, Clone, Default)]
pub struct DepthFirstSearch {
    progress: SearchProgress,
}

impl DepthFirstSearch {
    pub fn new() -> DepthFirstSearch {
        DepthFirstSearch::default()
    }
}

impl SearchEngine for DepthFirstSearch {
    fn search<P: Searchable>(&mut self, problem: &P)
                             -> Result<Option<Path<P::Node>>, SearchError> {
        self.progress.begin()?;
        let path = uninformed_search(problem, Vec::new(), &mut self.progress);
        debug!("dfs expanded {} states", self.progress.states_expanded);
        Ok(self.progress.finish(path))
    }

    fn state(&self) -> SearchState {
        self.progress.state
    }

    fn states_expanded(&self) -> usize {
        self.progress.states_expanded
    }

    fn reset(&mut self) {
        self.progress.reset();
    }
}

/// Queue based search. With unit step costs the path found is a shortest one.
#[derive(Debug, Clone, Default)]
pub struct BreadthFirstSearch {
    progress: SearchProgress,
}

impl BreadthFirstSearch {
    pub fn new() -> BreadthFirstSearch {
        BreadthFirstSearch::default()
    }
}

impl SearchEngine for BreadthFirstSearch {
    fn search<P: Searchable>(&mut self, problem: &P)
                             -> Result<Option<Path<P::Node>>, SearchError> {
        self.progress.begin()?;
        let path = uninformed_search(problem, VecDeque::new(), &mut self.progress);
        debug!("bfs expanded {} states", self.progress.states_expanded);
        Ok(self.progress.finish(path))
    }

    fn state(&self) -> SearchState {
        self.progress.state
    }

    fn states_expanded(&self) -> usize {
        self.progress.states_expanded
    }

    fn reset(&mut self) {
        self.progress.reset();
    }
}

/// Best first search on `g + h` with unit step costs.
///
/// A node whose cost improves is pushed again rather than updated in place, so the queue can hold
/// stale entries. A stale entry is dropped when it surfaces and does not count as an expansion.
/// Shortest paths are guaranteed when the heuristic never overestimates.
#[derive(Debug, Clone, Default)]
pub struct AStarSearch {
    progress: SearchProgress,
}

impl AStarSearch {
    pub fn new() -> AStarSearch {
        AStarSearch::default()
    }
}

impl SearchEngine for AStarSearch {
    fn search<P: Searchable>(&mut self, problem: &P)
                             -> Result<Option<Path<P::Node>>, SearchError> {
        self.progress.begin()?;

        let goal = problem.finish_node();
        let start = problem.start_node();

        let mut parents: ParentMap<P::Node> = fnv_hashmap(64);
        let mut costs: FnvHashMap<P::Node, usize> = fnv_hashmap(64);
        let mut frontier = MinPriorityQueue::with_capacity(64);
        parents.insert(start, None);
        costs.insert(start, 0);
        frontier.push(start, problem.heuristic(start, goal));

        let mut path = None;
        while let Some((current, estimate)) = frontier.pop_with_priority() {
            // Every queued node has a recorded cost
            let cost = costs.get(&current).cloned().unwrap_or_default();
            if estimate > cost + problem.heuristic(current, goal) {
                trace!("a* dropping stale entry for {:?} at estimate {}", current, estimate);
                continue;
            }

            self.progress.expanded();
            trace!("a* expanding {:?} at estimate {}", current, estimate);
            if current == goal {
                path = Some(reconstruct_path(&parents, current));
                break;
            }

            let tentative = cost + 1;
            let mut neighbours = problem.node_neighbours(current);
            while let Some(neighbour) = neighbours.pop() {
                let improves = costs.get(&neighbour).map_or(true, |&known| tentative < known);
                if improves {
                    costs.insert(neighbour, tentative);
                    parents.insert(neighbour, Some(current));
                    frontier.push(neighbour, tentative + problem.heuristic(neighbour, goal));
                }
            }
        }

        debug!("a* expanded {} states", self.progress.states_expanded);
        Ok(self.progress.finish(path))
    }

    fn state(&self) -> SearchState {
        self.progress.state
    }

    fn states_expanded(&self) -> usize {
        self.progress.states_expanded
    }

    fn reset(&mut self) {
        self.progress.reset();
    }
}

/// The selectable search algorithms.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, Serialize, Deserialize)]
pub enum SearchKind {
    #[serde(rename = "dfs")]
    DepthFirst,
    #[serde(rename = "bfs")]
    BreadthFirst,
    #[serde(rename = "astar")]
    AStar,
}

impl SearchKind {
    pub const ALL: [SearchKind; 3] = [SearchKind::DepthFirst,
                                      SearchKind::BreadthFirst,
                                      SearchKind::AStar];

    pub fn name(self) -> &'static str {
        match self {
            SearchKind::DepthFirst => "dfs",
            SearchKind::BreadthFirst => "bfs",
            SearchKind::AStar => "astar",
        }
    }

    /// Whether a found path is guaranteed to be a shortest one.
    pub fn is_optimal(self) -> bool {
        self != SearchKind::DepthFirst
    }

    pub fn solver(self) -> Solver {
        Solver::new(self)
    }

    /// Search with a fresh engine of this kind.
    pub fn run<P: Searchable>(self, problem: &P) -> SearchOutcome<P::Node> {
        let mut solver = self.solver();
        // a fresh engine is always Idle
        let path = solver.search(problem).ok().and_then(|path| path);
        SearchOutcome {
            kind: self,
            path: path,
            states_expanded: solver.states_expanded(),
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SearchKind {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<SearchKind, MazeError> {
        let s = s.trim();
        let alias = if s.eq_ignore_ascii_case("a*") { "astar" } else { s };
        SearchKind::ALL.iter()
                       .cloned()
                       .find(|kind| kind.name().eq_ignore_ascii_case(alias))
                       .ok_or(MazeError::UnknownSearch)
    }
}

/// Result of a single completed search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome<N> {
    pub kind: SearchKind,
    pub path: Option<Path<N>>,
    pub states_expanded: usize,
}

impl<N> SearchOutcome<N> {
    /// Number of moves along the path, if one was found.
    pub fn path_length(&self) -> Option<usize> {
        self.path.as_ref().map(|p| p.len().saturating_sub(1))
    }
}

/// Any one of the engines, chosen at runtime.
#[derive(Debug, Clone)]
pub enum Solver {
    DepthFirst(DepthFirstSearch),
    BreadthFirst(BreadthFirstSearch),
    AStar(AStarSearch),
}

impl Solver {
    pub fn new(kind: SearchKind) -> Solver {
        match kind {
            SearchKind::DepthFirst => Solver::DepthFirst(DepthFirstSearch::new()),
            SearchKind::BreadthFirst => Solver::BreadthFirst(BreadthFirstSearch::new()),
            SearchKind::AStar => Solver::AStar(AStarSearch::new()),
        }
    }

    pub fn kind(&self) -> SearchKind {
        match *self {
            Solver::DepthFirst(_) => SearchKind::DepthFirst,
            Solver::BreadthFirst(_) => SearchKind::BreadthFirst,
            Solver::AStar(_) => SearchKind::AStar,
        }
    }
}

impl SearchEngine for Solver {
    fn search<P: Searchable>(&mut self, problem: &P)
                             -> Result<Option<Path<P::Node>>, SearchError> {
        match *self {
            Solver::DepthFirst(ref mut engine) => engine.search(problem),
            Solver::BreadthFirst(ref mut engine) => engine.search(problem),
            Solver::AStar(ref mut engine) => engine.search(problem),
        }
    }

    fn state(&self) -> SearchState {
        match *self {
            Solver::DepthFirst(ref engine) => engine.state(),
            Solver::BreadthFirst(ref engine) => engine.state(),
            Solver::AStar(ref engine) => engine.state(),
        }
    }

    fn states_expanded(&self) -> usize {
        match *self {
            Solver::DepthFirst(ref engine) => engine.states_expanded(),
            Solver::BreadthFirst(ref engine) => engine.states_expanded(),
            Solver::AStar(ref engine) => engine.states_expanded(),
        }
    }

    fn reset(&mut self) {
        match *self {
            Solver::DepthFirst(ref mut engine) => engine.reset(),
            Solver::BreadthFirst(ref mut engine) => engine.reset(),
            Solver::AStar(ref mut engine) => engine.reset(),
        }
    }
}
