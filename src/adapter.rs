use crate::cells::{Coordinate3D, Direction};
use crate::errors::MazeError;
use crate::grid::Maze3D;
use crate::searchable::{NodeSmallVec, Searchable};
use crate::units::NodeId;

/// Presents a borrowed maze as a `Searchable` problem over node ids.
///
/// The start is the maze's entrance unless a different starting position has been set, which
/// leaves the maze itself untouched. Neighbours are read from the live wall state.
#[derive(Debug, Clone)]
pub struct MazeAdapter<'a> {
    maze: &'a Maze3D,
    start_override: Option<Coordinate3D>,
}

impl<'a> MazeAdapter<'a> {
    pub fn new(maze: &'a Maze3D) -> MazeAdapter<'a> {
        MazeAdapter {
            maze: maze,
            start_override: None,
        }
    }

    pub fn maze(&self) -> &Maze3D {
        self.maze
    }

    /// Search from `coord` instead of the entrance.
    pub fn set_start(&mut self, coord: Coordinate3D) -> Result<(), MazeError> {
        self.maze.check_bounds(coord)?;
        self.start_override = Some(coord);
        Ok(())
    }

    pub fn clear_start(&mut self) {
        self.start_override = None;
    }

    fn node_of(&self, coord: Coordinate3D) -> NodeId {
        // entrance, exit and override are all bounds checked on the way in
        self.maze.dimensions().flatten(coord)
    }
}

impl<'a> Searchable for MazeAdapter<'a> {
    type Node = NodeId;

    fn start_node(&self) -> NodeId {
        self.node_of(self.start_override.unwrap_or_else(|| self.maze.entrance()))
    }

    fn finish_node(&self) -> NodeId {
        self.node_of(self.maze.exit())
    }

    fn node_neighbours(&self, node: NodeId) -> NodeSmallVec<NodeId> {
        let coord = match self.maze.cell_coordinates(node) {
            Ok(c) => c,
            Err(_) => return NodeSmallVec::new(),
        };
        let cell = match self.maze.cell_at(coord) {
            Ok(c) => c,
            Err(_) => return NodeSmallVec::new(),
        };
        Direction::SCAN_ORDER.iter()
                             .filter(|dir| cell.is_open(**dir))
                             .filter_map(|dir| coord.offset(*dir))
                             .filter(|neighbour| self.maze.is_valid_coordinate(*neighbour))
                             .map(|neighbour| self.node_of(neighbour))
                             .collect()
    }

    fn heuristic(&self, a: NodeId, b: NodeId) -> usize {
        match (self.maze.cell_coordinates(a), self.maze.cell_coordinates(b)) {
            (Ok(a_coord), Ok(b_coord)) => a_coord.manhattan_distance(b_coord),
            _ => 0,
        }
    }
}


#[cfg(test)]
mod tests {

    use super::*;
    use crate::grid::Strictness;

    fn gc(x: u32, y: u32, z: u32) -> Coordinate3D {
        Coordinate3D::new(x, y, z)
    }

    #[test]
    fn start_and_finish_follow_entrance_and_exit() {
        let mut maze = Maze3D::with_size(3, 3, 2).unwrap();
        maze.set_entrance(gc(1, 0, 0)).unwrap();
        maze.set_exit(gc(2, 2, 1)).unwrap();
        let adapter = MazeAdapter::new(&maze);
        assert_eq!(adapter.start_node(), 1);
        assert_eq!(adapter.finish_node(), 17);
    }

    #[test]
    fn start_override_leaves_maze_alone() {
        let maze = Maze3D::with_size(3, 3, 1).unwrap();
        let mut adapter = MazeAdapter::new(&maze);
        adapter.set_start(gc(1, 1, 0)).unwrap();
        assert_eq!(adapter.start_node(), 4);
        assert_eq!(adapter.maze().entrance(), gc(0, 0, 0));
        assert!(adapter.set_start(gc(3, 0, 0)).is_err());
        assert_eq!(adapter.start_node(), 4);
        adapter.clear_start();
        assert_eq!(adapter.start_node(), 0);
    }

    #[test]
    fn neighbours_only_through_open_walls_in_scan_order() {
        let mut maze = Maze3D::with_size(3, 3, 3).unwrap();
        let centre = gc(1, 1, 1);
        for dir in &[Direction::West, Direction::North, Direction::Above, Direction::South] {
            maze.remove_wall(centre, *dir, Strictness::Strict).unwrap();
        }
        let adapter = MazeAdapter::new(&maze);
        let centre_id = maze.cell_id(centre).unwrap();
        let expected = [gc(1, 0, 1), gc(1, 1, 2), gc(1, 2, 1), gc(0, 1, 1)]
            .iter()
            .map(|c| maze.cell_id(*c).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(adapter.node_neighbours(centre_id).to_vec(), expected);
        assert!(adapter.node_neighbours(0).is_empty());
        assert!(adapter.node_neighbours(1000).is_empty());
    }

    #[test]
    fn neighbours_track_live_walls() {
        let mut maze = Maze3D::with_size(2, 1, 1).unwrap();
        assert!(MazeAdapter::new(&maze).node_neighbours(0).is_empty());
        maze.remove_wall(gc(0, 0, 0), Direction::East, Strictness::Strict).unwrap();
        assert_eq!(MazeAdapter::new(&maze).node_neighbours(0).to_vec(), vec![1]);
    }

    #[test]
    fn manhattan_heuristic() {
        let maze = Maze3D::with_size(4, 4, 4).unwrap();
        let adapter = MazeAdapter::new(&maze);
        let a = maze.cell_id(gc(0, 3, 1)).unwrap();
        let b = maze.cell_id(gc(2, 0, 3)).unwrap();
        assert_eq!(adapter.heuristic(a, b), 7);
        assert_eq!(adapter.heuristic(b, a), 7);
        assert_eq!(adapter.heuristic(a, a), 0);
    }
}
