use std::error::Error;
use std::fmt;

use crate::cells::{Coordinate3D, Direction};
use crate::units::NodeId;

/// Failures of bounds-checked maze operations.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum MazeError {
    /// A coordinate lies outside `[0,length) x [0,width) x [0,height)`.
    OutOfBounds {
        coord: Coordinate3D,
        length: usize,
        width: usize,
        height: usize,
    },
    /// Removing a wall that faces the lattice boundary.
    NoNeighbour {
        coord: Coordinate3D,
        direction: Direction,
    },
    /// One of the dimensions is zero, or their product overflows.
    InvalidDimensions {
        length: usize,
        width: usize,
        height: usize,
    },
    /// A node id outside `[0, size)`.
    InvalidNode { node: NodeId, size: usize },
    /// Snapshot data inconsistent with its stated dimensions.
    SnapshotMismatch { expected_cells: usize, actual_cells: usize },
    UnknownGenerator,
    UnknownSearch,
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            MazeError::OutOfBounds { coord, length, width, height } => {
                if coord.x as usize >= length {
                    write!(f, "x {} is out of bounds (max x = {})", coord.x, length)
                } else if coord.y as usize >= width {
                    write!(f, "y {} is out of bounds (max y = {})", coord.y, width)
                } else {
                    write!(f, "z {} is out of bounds (max z = {})", coord.z, height)
                }
            }
            MazeError::NoNeighbour { coord, direction } => {
                write!(f,
                       "neighbour {:?} of cell ({}, {}, {}) is out of bounds",
                       direction, coord.x, coord.y, coord.z)
            }
            MazeError::InvalidDimensions { length, width, height } => {
                write!(f,
                       "invalid maze dimensions {}x{}x{}, every dimension must be at least 1",
                       length, width, height)
            }
            MazeError::InvalidNode { node, size } => {
                write!(f, "node id {} is out of range (maze has {} cells)", node, size)
            }
            MazeError::SnapshotMismatch { expected_cells, actual_cells } => {
                write!(f,
                       "snapshot holds {} cells but its dimensions require {}",
                       actual_cells, expected_cells)
            }
            MazeError::UnknownGenerator => {
                write!(f, "unknown generator, expected one of: random, dfs, aldous-broder")
            }
            MazeError::UnknownSearch => {
                write!(f, "unknown search, expected one of: dfs, bfs, astar")
            }
        }
    }
}

impl Error for MazeError {}
