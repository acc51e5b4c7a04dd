use std::fmt;

use petgraph::graph::{NodeIndex, UnGraph};
use rand::Rng;
use rand_xorshift::XorShiftRng;
use serde_derive::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cells::{Cell, Coordinate3D, Direction};
use crate::errors::MazeError;
use crate::grid_dimensions::GridDimensions3D;
use crate::units::{FloorSize, Height, Length, NodeId, NodesCount, Width};

pub type CoordinateSmallVec = SmallVec<[Coordinate3D; 6]>;

/// How `Maze3D::remove_wall` reacts to a wall on the lattice boundary.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Strictness {
    /// Fail with `MazeError::NoNeighbour`.
    Strict,
    /// Report `Ok(false)` and leave the maze untouched.
    Lenient,
}

/// A 3d lattice of cells with six walls each, plus an entrance and an exit.
///
/// Connectivity only ever changes through `remove_wall`, which opens both sides of a wall
/// together so that neighbouring cells always agree about the wall between them.
/// `set_wall` is the raw single-cell primitive underneath it.
#[derive(Clone, Eq, PartialEq)]
pub struct Maze3D {
    dimensions: GridDimensions3D,
    cells: Vec<Cell>,
    entrance: Coordinate3D,
    exit: Coordinate3D,
}

/// The flat persisted form of a maze: cells in node id order, restored verbatim.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MazeSnapshot {
    pub length: usize,
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Cell>,
    pub entrance: Coordinate3D,
    pub exit: Coordinate3D,
}

impl fmt::Debug for Maze3D {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "Maze3D :: dimensions: {:?}, passages: {}, entrance: {}, exit: {}",
               self.dimensions,
               self.passages_count(),
               self.entrance,
               self.exit)
    }
}

impl Maze3D {
    /// A fully walled maze. The entrance is the origin and the exit the far corner until a
    /// generator says otherwise.
    pub fn new(dimensions: GridDimensions3D) -> Maze3D {
        let NodesCount(cells_count) = dimensions.size();
        Maze3D {
            dimensions: dimensions,
            cells: vec![Cell::closed(); cells_count],
            entrance: Coordinate3D::new(0, 0, 0),
            exit: dimensions.far_corner(),
        }
    }

    pub fn with_size(length: usize, width: usize, height: usize) -> Result<Maze3D, MazeError> {
        let dimensions = GridDimensions3D::new(Length(length), Width(width), Height(height))?;
        Ok(Maze3D::new(dimensions))
    }

    #[inline]
    pub fn dimensions(&self) -> &GridDimensions3D {
        &self.dimensions
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.dimensions.size().0
    }

    #[inline]
    pub fn floorsize(&self) -> usize {
        let FloorSize(floorsize) = self.dimensions.floorsize();
        floorsize
    }

    #[inline]
    pub fn entrance(&self) -> Coordinate3D {
        self.entrance
    }

    #[inline]
    pub fn exit(&self) -> Coordinate3D {
        self.exit
    }

    pub fn set_entrance(&mut self, coord: Coordinate3D) -> Result<(), MazeError> {
        self.check_bounds(coord)?;
        self.entrance = coord;
        Ok(())
    }

    pub fn set_exit(&mut self, coord: Coordinate3D) -> Result<(), MazeError> {
        self.check_bounds(coord)?;
        self.exit = coord;
        Ok(())
    }

    /// Non-failing bounds probe.
    #[inline]
    pub fn is_valid_coordinate(&self, coord: Coordinate3D) -> bool {
        self.dimensions.is_valid_coordinate(coord)
    }

    #[inline]
    pub fn check_bounds(&self, coord: Coordinate3D) -> Result<(), MazeError> {
        self.dimensions.check_bounds(coord)
    }

    pub fn cell_at(&self, coord: Coordinate3D) -> Result<&Cell, MazeError> {
        let id = self.dimensions.node_id(coord)?;
        Ok(&self.cells[id])
    }

    #[inline]
    pub fn cell_id(&self, coord: Coordinate3D) -> Result<NodeId, MazeError> {
        self.dimensions.node_id(coord)
    }

    #[inline]
    pub fn cell_coordinates(&self, node: NodeId) -> Result<Coordinate3D, MazeError> {
        self.dimensions.coordinate(node)
    }

    /// Sets one wall flag of one cell. The neighbour's matching wall is left alone.
    pub fn set_wall(&mut self, coord: Coordinate3D, direction: Direction, value: bool)
                    -> Result<(), MazeError> {
        let id = self.dimensions.node_id(coord)?;
        self.cells[id].set_wall(direction, value);
        Ok(())
    }

    /// The adjacent coordinate in `direction`, or None when that crosses the lattice boundary.
    /// Fails only if `coord` itself is out of bounds.
    pub fn neighbour_at_direction(&self, coord: Coordinate3D, direction: Direction)
                                  -> Result<Option<Coordinate3D>, MazeError> {
        self.check_bounds(coord)?;
        Ok(coord.offset(direction).filter(|neighbour| self.is_valid_coordinate(*neighbour)))
    }

    /// Every in-bounds neighbour, walled off or not, in scan order.
    pub fn neighbours(&self, coord: Coordinate3D) -> Result<CoordinateSmallVec, MazeError> {
        self.check_bounds(coord)?;
        Ok(Direction::SCAN_ORDER.iter()
                                .filter_map(|dir| coord.offset(*dir))
                                .filter(|neighbour| self.is_valid_coordinate(*neighbour))
                                .collect())
    }

    /// Opens the wall between `coord` and its neighbour in `direction`, on both sides.
    ///
    /// Returns `Ok(true)` when the wall was opened. A boundary wall is an error under
    /// `Strictness::Strict` and `Ok(false)` under `Strictness::Lenient`.
    pub fn remove_wall(&mut self,
                       coord: Coordinate3D,
                       direction: Direction,
                       strictness: Strictness)
                       -> Result<bool, MazeError> {
        match self.neighbour_at_direction(coord, direction)? {
            Some(neighbour) => {
                let here = self.dimensions.flatten(coord);
                let there = self.dimensions.flatten(neighbour);
                self.cells[here].set_wall(direction, false);
                self.cells[there].set_wall(direction.opposite(), false);
                Ok(true)
            }
            None => {
                match strictness {
                    Strictness::Strict => {
                        Err(MazeError::NoNeighbour {
                            coord: coord,
                            direction: direction,
                        })
                    }
                    Strictness::Lenient => Ok(false),
                }
            }
        }
    }

    /// Neighbours reachable through an open wall, in scan order.
    pub fn links(&self, coord: Coordinate3D) -> Result<CoordinateSmallVec, MazeError> {
        let cell = self.cell_at(coord)?;
        Ok(Direction::SCAN_ORDER.iter()
                                .filter(|dir| cell.is_open(**dir))
                                .filter_map(|dir| coord.offset(*dir))
                                .filter(|neighbour| self.is_valid_coordinate(*neighbour))
                                .collect())
    }

    /// Is there an open passage from `coord` towards `direction`?
    pub fn is_neighbour_linked(&self, coord: Coordinate3D, direction: Direction) -> bool {
        match (self.cell_at(coord), self.neighbour_at_direction(coord, direction)) {
            (Ok(cell), Ok(Some(_))) => cell.is_open(direction),
            _ => false,
        }
    }

    /// Number of open passages between adjacent cells.
    pub fn passages_count(&self) -> usize {
        self.iter_passages().count()
    }

    /// Each open passage once, as `(cell, neighbour)` pairs going East, South or Above.
    pub fn iter_passages(&self) -> impl Iterator<Item = (Coordinate3D, Coordinate3D)> + '_ {
        static FORWARD: [Direction; 3] = [Direction::East, Direction::South, Direction::Above];
        self.dimensions.iter().flat_map(move |coord| {
            let cell = self.cells[self.dimensions.flatten(coord)];
            FORWARD.iter()
                   .filter(move |dir| cell.is_open(**dir))
                   .filter_map(move |dir| coord.offset(*dir))
                   .filter(move |neighbour| self.is_valid_coordinate(*neighbour))
                   .map(move |neighbour| (coord, neighbour))
        })
    }

    /// Every coordinate in node id order.
    pub fn iter(&self) -> impl Iterator<Item = Coordinate3D> {
        self.dimensions.iter()
    }

    /// A uniformly chosen cell on the bottom level.
    pub fn random_floor_cell(&self, rng: &mut XorShiftRng) -> Coordinate3D {
        Coordinate3D::new(rng.gen_range(0..self.dimensions.length().0) as u32,
                          rng.gen_range(0..self.dimensions.width().0) as u32,
                          0)
    }

    pub fn random_cell(&self, rng: &mut XorShiftRng) -> Coordinate3D {
        let index = rng.gen_range(0..self.size());
        Coordinate3D::new((index % self.dimensions.length().0) as u32,
                          ((index % self.floorsize()) / self.dimensions.length().0) as u32,
                          (index / self.floorsize()) as u32)
    }

    pub fn snapshot(&self) -> MazeSnapshot {
        MazeSnapshot {
            length: self.dimensions.length().0,
            width: self.dimensions.width().0,
            height: self.dimensions.height().0,
            cells: self.cells.clone(),
            entrance: self.entrance,
            exit: self.exit,
        }
    }

    /// Rebuilds a maze from a snapshot, taking the cells as they are.
    pub fn from_snapshot(snapshot: MazeSnapshot) -> Result<Maze3D, MazeError> {
        let dimensions = GridDimensions3D::new(Length(snapshot.length),
                                               Width(snapshot.width),
                                               Height(snapshot.height))?;
        let NodesCount(expected_cells) = dimensions.size();
        if snapshot.cells.len() != expected_cells {
            return Err(MazeError::SnapshotMismatch {
                expected_cells: expected_cells,
                actual_cells: snapshot.cells.len(),
            });
        }
        dimensions.check_bounds(snapshot.entrance)?;
        dimensions.check_bounds(snapshot.exit)?;

        Ok(Maze3D {
            dimensions: dimensions,
            cells: snapshot.cells,
            entrance: snapshot.entrance,
            exit: snapshot.exit,
        })
    }

    /// The passage structure as an undirected petgraph graph. Node indices equal node ids.
    pub fn passage_graph(&self) -> UnGraph<(), ()> {
        let mut graph = UnGraph::with_capacity(self.size(), self.size());
        for _ in 0..self.size() {
            let _ = graph.add_node(());
        }
        for (a, b) in self.iter_passages() {
            let a_index = NodeIndex::new(self.dimensions.flatten(a));
            let b_index = NodeIndex::new(self.dimensions.flatten(b));
            let _ = graph.add_edge(a_index, b_index, ());
        }
        graph
    }
}


#[cfg(test)]
mod tests {

    use super::*;
    use itertools::Itertools;
    use quickcheck::quickcheck;
    use rand::SeedableRng;

    fn maze(l: usize, w: usize, h: usize) -> Maze3D {
        Maze3D::with_size(l, w, h).expect("valid dimensions")
    }

    fn gc(x: u32, y: u32, z: u32) -> Coordinate3D {
        Coordinate3D::new(x, y, z)
    }

    #[test]
    fn starts_fully_walled_with_default_entrance_and_exit() {
        let m = maze(3, 4, 2);
        assert_eq!(m.size(), 24);
        assert_eq!(m.floorsize(), 12);
        assert_eq!(m.entrance(), gc(0, 0, 0));
        assert_eq!(m.exit(), gc(2, 3, 1));
        assert_eq!(m.passages_count(), 0);
        for coord in m.iter() {
            let cell = m.cell_at(coord).unwrap();
            assert!(Direction::ALL.iter().all(|dir| cell.has_wall(*dir)));
        }
    }

    #[test]
    fn zero_dimension_rejected() {
        assert!(Maze3D::with_size(0, 3, 3).is_err());
        assert!(Maze3D::with_size(3, 3, 0).is_err());
    }

    #[test]
    fn out_of_bounds_operations_fail() {
        let mut m = maze(2, 2, 2);
        let outside = gc(2, 0, 0);
        let expected = Err(MazeError::OutOfBounds {
            coord: outside,
            length: 2,
            width: 2,
            height: 2,
        });
        assert_eq!(m.cell_at(outside).map(|_| ()), expected);
        assert_eq!(m.cell_id(outside).map(|_| ()), expected);
        assert_eq!(m.set_wall(outside, Direction::North, false), expected);
        assert_eq!(m.neighbour_at_direction(outside, Direction::West).map(|_| ()), expected);
        assert_eq!(m.remove_wall(outside, Direction::West, Strictness::Lenient).map(|_| ()),
                   expected);
        assert_eq!(m.set_entrance(outside), expected);
        assert!(!m.is_valid_coordinate(outside));
    }

    #[test]
    fn neighbour_at_dir() {
        let m = maze(2, 2, 2);
        let check = |coord, dir, expected: Option<Coordinate3D>| {
            assert_eq!(m.neighbour_at_direction(coord, dir), Ok(expected));
        };
        check(gc(0, 0, 0), Direction::North, None);
        check(gc(0, 0, 0), Direction::West, None);
        check(gc(0, 0, 0), Direction::Below, None);
        check(gc(0, 0, 0), Direction::South, Some(gc(0, 1, 0)));
        check(gc(0, 0, 0), Direction::East, Some(gc(1, 0, 0)));
        check(gc(0, 0, 0), Direction::Above, Some(gc(0, 0, 1)));

        check(gc(1, 1, 1), Direction::South, None);
        check(gc(1, 1, 1), Direction::East, None);
        check(gc(1, 1, 1), Direction::Above, None);
        check(gc(1, 1, 1), Direction::North, Some(gc(1, 0, 1)));
        check(gc(1, 1, 1), Direction::West, Some(gc(0, 1, 1)));
        check(gc(1, 1, 1), Direction::Below, Some(gc(1, 1, 0)));
    }

    #[test]
    fn neighbour_cells() {
        let m = maze(3, 3, 3);
        let sorted = |coord| m.neighbours(coord).unwrap().iter().cloned().sorted().collect_vec();
        assert_eq!(sorted(gc(0, 0, 0)), vec![gc(0, 0, 1), gc(0, 1, 0), gc(1, 0, 0)]);
        assert_eq!(sorted(gc(1, 1, 1)).len(), 6);
        assert_eq!(sorted(gc(2, 1, 2)).len(), 4);
    }

    #[test]
    fn reads_do_not_mutate() {
        let m = maze(3, 3, 1);
        let before = m.clone();
        for _ in 0..3 {
            let _ = m.neighbour_at_direction(gc(1, 1, 0), Direction::East);
            let _ = m.cell_at(gc(1, 1, 0));
        }
        assert_eq!(m.neighbour_at_direction(gc(1, 1, 0), Direction::East),
                   m.neighbour_at_direction(gc(1, 1, 0), Direction::East));
        assert_eq!(m, before);
    }

    #[test]
    fn set_wall_is_one_sided() {
        let mut m = maze(2, 1, 1);
        m.set_wall(gc(0, 0, 0), Direction::East, false).unwrap();
        assert!(m.cell_at(gc(0, 0, 0)).unwrap().is_open(Direction::East));
        assert!(m.cell_at(gc(1, 0, 0)).unwrap().has_wall(Direction::West));
    }

    #[test]
    fn remove_wall_opens_both_sides() {
        let mut m = maze(3, 3, 3);
        for dir in Direction::ALL.iter() {
            let centre = gc(1, 1, 1);
            assert_eq!(m.remove_wall(centre, *dir, Strictness::Strict), Ok(true));
            let neighbour = m.neighbour_at_direction(centre, *dir).unwrap().unwrap();
            assert!(m.cell_at(centre).unwrap().is_open(*dir));
            assert!(m.cell_at(neighbour).unwrap().is_open(dir.opposite()));
        }
        assert_eq!(m.passages_count(), 6);
        assert_eq!(m.links(gc(1, 1, 1)).unwrap().len(), 6);
    }

    #[test]
    fn remove_boundary_wall() {
        let mut m = maze(2, 2, 1);
        let corner = gc(0, 0, 0);
        assert_eq!(m.remove_wall(corner, Direction::North, Strictness::Strict),
                   Err(MazeError::NoNeighbour {
                       coord: corner,
                       direction: Direction::North,
                   }));
        assert_eq!(m.remove_wall(corner, Direction::Above, Strictness::Lenient), Ok(false));
        assert!(m.cell_at(corner).unwrap().has_wall(Direction::North));
        assert!(m.cell_at(corner).unwrap().has_wall(Direction::Above));
    }

    #[test]
    fn linking_cells() {
        let mut m = maze(1, 4, 1);
        let (a, b, c) = (gc(0, 1, 0), gc(0, 2, 0), gc(0, 3, 0));
        assert!(m.links(a).unwrap().is_empty());

        m.remove_wall(a, Direction::South, Strictness::Strict).unwrap();
        assert_eq!(&*m.links(a).unwrap(), &[b]);
        assert_eq!(&*m.links(b).unwrap(), &[a]);
        assert!(m.is_neighbour_linked(a, Direction::South));
        assert!(m.is_neighbour_linked(b, Direction::North));
        assert!(!m.is_neighbour_linked(b, Direction::South));

        m.remove_wall(c, Direction::North, Strictness::Strict).unwrap();
        assert_eq!(m.links(b).unwrap().iter().cloned().sorted().collect_vec(), vec![a, c]);
        assert_eq!(m.iter_passages().collect_vec(), vec![(a, b), (b, c)]);
    }

    #[test]
    fn wall_symmetry_holds_after_random_removals() {
        fn prop(seed: u64, removals: Vec<(u8, u8, u8, u8)>) -> bool {
            let mut m = maze(3, 3, 3);
            let mut rng = XorShiftRng::seed_from_u64(seed);
            for (x, y, z, d) in removals {
                let coord = gc(x as u32 % 3, y as u32 % 3, z as u32 % 3);
                let dir = Direction::ALL[d as usize % 6];
                let _ = m.remove_wall(coord, dir, Strictness::Lenient);
            }
            let _ = m.remove_wall(m.random_cell(&mut rng),
                                  Direction::rand_direction(&mut rng),
                                  Strictness::Lenient);
            m.iter().all(|coord| {
                Direction::ALL.iter().all(|dir| {
                    match m.neighbour_at_direction(coord, *dir).unwrap() {
                        Some(neighbour) => {
                            m.cell_at(coord).unwrap()[*dir] ==
                            m.cell_at(neighbour).unwrap()[dir.opposite()]
                        }
                        None => m.cell_at(coord).unwrap().has_wall(*dir),
                    }
                })
            })
        }
        quickcheck(prop as fn(u64, Vec<(u8, u8, u8, u8)>) -> bool);
    }

    #[test]
    fn random_cells_in_bounds() {
        let m = maze(4, 3, 5);
        let mut rng = XorShiftRng::seed_from_u64(99);
        for _ in 0..1000 {
            assert!(m.is_valid_coordinate(m.random_cell(&mut rng)));
            let floor = m.random_floor_cell(&mut rng);
            assert!(m.is_valid_coordinate(floor));
            assert_eq!(floor.z, 0);
        }
    }

    #[test]
    fn snapshot_restores_cells_verbatim() {
        let mut m = maze(3, 2, 2);
        m.remove_wall(gc(0, 0, 0), Direction::Above, Strictness::Strict).unwrap();
        m.set_wall(gc(2, 1, 1), Direction::West, false).unwrap();
        m.set_exit(gc(1, 1, 1)).unwrap();

        let restored = Maze3D::from_snapshot(m.snapshot()).unwrap();
        assert_eq!(restored, m);
        // the one-sided wall is not "repaired"
        assert!(restored.cell_at(gc(2, 1, 1)).unwrap().is_open(Direction::West));
        assert!(restored.cell_at(gc(1, 1, 1)).unwrap().has_wall(Direction::East));
    }

    #[test]
    fn snapshot_json_shape() {
        let m = maze(1, 1, 1);
        let json = serde_json::to_value(&m.snapshot()).unwrap();
        assert_eq!(json["cells"][0], serde_json::json!([true, true, true, true, true, true]));
        assert_eq!(json["entrance"], serde_json::json!({"x": 0, "y": 0, "z": 0}));
        assert_eq!(json["length"], serde_json::json!(1));
    }

    #[test]
    fn inconsistent_snapshots_rejected() {
        let mut snapshot = maze(2, 2, 1).snapshot();
        snapshot.cells.pop();
        assert_eq!(Maze3D::from_snapshot(snapshot.clone()),
                   Err(MazeError::SnapshotMismatch {
                       expected_cells: 4,
                       actual_cells: 3,
                   }));

        let mut snapshot = maze(2, 2, 1).snapshot();
        snapshot.exit = gc(0, 0, 1);
        assert!(Maze3D::from_snapshot(snapshot).is_err());
    }

    #[test]
    fn passage_graph_mirrors_open_walls() {
        let mut m = maze(2, 2, 1);
        m.remove_wall(gc(0, 0, 0), Direction::East, Strictness::Strict).unwrap();
        m.remove_wall(gc(1, 0, 0), Direction::South, Strictness::Strict).unwrap();
        let graph = m.passage_graph();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.find_edge(NodeIndex::new(0), NodeIndex::new(1)).is_some());
        assert!(graph.find_edge(NodeIndex::new(1), NodeIndex::new(3)).is_some());
        assert!(graph.find_edge(NodeIndex::new(0), NodeIndex::new(2)).is_none());
    }
}
