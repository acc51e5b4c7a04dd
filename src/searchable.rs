use std::fmt::Debug;
use std::hash::Hash;

use smallvec::SmallVec;

/// Neighbour lists are small for lattice problems; bigger graphs spill onto the heap.
pub type NodeSmallVec<N> = SmallVec<[N; 8]>;

/// A graph search problem as seen by the search engines in `pathing`.
///
/// Engines only ever talk to a problem through these four operations, so anything that can name
/// a start, a goal, the neighbours of a node and a distance estimate can be searched.
pub trait Searchable {
    type Node: Copy + Eq + Hash + Debug;

    fn start_node(&self) -> Self::Node;

    fn finish_node(&self) -> Self::Node;

    /// Nodes one unit-cost step away from `node`. Engines consume the list from the back.
    fn node_neighbours(&self, node: Self::Node) -> NodeSmallVec<Self::Node>;

    /// Estimated cost between two nodes. Must never overestimate for A* to return shortest paths.
    fn heuristic(&self, a: Self::Node, b: Self::Node) -> usize;
}
