//! **mazes3d** is a 3d lattice maze generation and route finding library.
//!
//! Generators build a `grid::Maze3D`, `adapter::MazeAdapter` presents it as a
//! `searchable::Searchable` problem, and the engines in `pathing` search any such problem.

pub mod adapter;
pub mod cells;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_dimensions;
pub mod pathing;
pub mod priority_queue;
pub mod searchable;
pub mod session;
pub mod units;
pub mod utils;
