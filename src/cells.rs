use std::fmt;
use std::ops::Index;

use rand::Rng;
use rand_xorshift::XorShiftRng;
use serde_derive::{Deserialize, Serialize};

/// The six axis-aligned ways out of a cell.
///
/// The discriminants are fixed so that a direction and its opposite are always three apart,
/// see `Direction::opposite`.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Direction {
    North = 0,
    West = 1,
    Above = 2,
    South = 3,
    East = 4,
    Below = 5,
}

pub const DIRECTIONS_COUNT: usize = 6;

impl Direction {
    /// All directions in ordinal order.
    pub const ALL: [Direction; DIRECTIONS_COUNT] = [Direction::North,
                                                    Direction::West,
                                                    Direction::Above,
                                                    Direction::South,
                                                    Direction::East,
                                                    Direction::Below];

    /// The order in which generators and the maze adapter look around a cell.
    pub const SCAN_ORDER: [Direction; DIRECTIONS_COUNT] = [Direction::North,
                                                           Direction::Above,
                                                           Direction::Below,
                                                           Direction::East,
                                                           Direction::South,
                                                           Direction::West];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Direction> {
        Direction::ALL.get(index).cloned()
    }

    /// `(d + 3) mod 6`
    #[inline]
    pub fn opposite(self) -> Direction {
        Direction::ALL[(self.index() + 3) % DIRECTIONS_COUNT]
    }

    pub fn rand_direction(rng: &mut XorShiftRng) -> Direction {
        Direction::ALL[rng.gen_range(0..DIRECTIONS_COUNT)]
    }
}

/// One lattice cell: a wall flag per direction, `true` meaning blocked.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cell {
    walls: [bool; DIRECTIONS_COUNT],
}

impl Cell {
    /// A cell with every wall standing.
    pub fn closed() -> Cell {
        Cell { walls: [true; DIRECTIONS_COUNT] }
    }

    #[inline]
    pub fn has_wall(&self, direction: Direction) -> bool {
        self.walls[direction.index()]
    }

    #[inline]
    pub fn is_open(&self, direction: Direction) -> bool {
        !self.has_wall(direction)
    }

    #[inline]
    pub fn set_wall(&mut self, direction: Direction, value: bool) {
        self.walls[direction.index()] = value;
    }

    pub fn walls(&self) -> [bool; DIRECTIONS_COUNT] {
        self.walls
    }

    pub fn open_directions(&self) -> impl Iterator<Item = Direction> + '_ {
        (0..DIRECTIONS_COUNT).filter_map(Direction::from_index)
                               .filter(move |dir| self.is_open(*dir))
    }
}

impl Default for Cell {
    fn default() -> Cell {
        Cell::closed()
    }
}

impl Index<Direction> for Cell {
    type Output = bool;

    fn index(&self, direction: Direction) -> &bool {
        &self.walls[direction.index()]
    }
}

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Coordinate3D {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl Coordinate3D {
    pub fn new(x: u32, y: u32, z: u32) -> Coordinate3D {
        Coordinate3D { x: x, y: y, z: z }
    }

    /// The coordinate one step away, or None if that would go below zero on some axis.
    /// Upper bounds are the grid's business.
    pub fn offset(self, direction: Direction) -> Option<Coordinate3D> {
        let Coordinate3D { x, y, z } = self;
        match direction {
            Direction::North => y.checked_sub(1).map(|y| Coordinate3D { y: y, ..self }),
            Direction::South => y.checked_add(1).map(|y| Coordinate3D { y: y, ..self }),
            Direction::West => x.checked_sub(1).map(|x| Coordinate3D { x: x, ..self }),
            Direction::East => x.checked_add(1).map(|x| Coordinate3D { x: x, ..self }),
            Direction::Above => z.checked_add(1).map(|z| Coordinate3D { z: z, ..self }),
            Direction::Below => z.checked_sub(1).map(|z| Coordinate3D { z: z, ..self }),
        }
    }

    /// L1 distance.
    pub fn manhattan_distance(self, other: Coordinate3D) -> usize {
        let delta = |a: u32, b: u32| (if a > b { a - b } else { b - a }) as usize;
        delta(self.x, other.x) + delta(self.y, other.y) + delta(self.z, other.z)
    }
}

impl fmt::Display for Coordinate3D {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
