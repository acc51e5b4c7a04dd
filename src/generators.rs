use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use bit_set::BitSet;
use log::{debug, trace, warn};
use rand::Rng;
use rand_xorshift::XorShiftRng;
use serde_derive::{Deserialize, Serialize};

use crate::cells::{Coordinate3D, Direction, DIRECTIONS_COUNT};
use crate::errors::MazeError;
use crate::grid::{Maze3D, Strictness};
use crate::grid_dimensions::GridDimensions3D;
use crate::units::{Height, Length, Width};

/// Neighbour slots indexed by `Direction::index`, None where there is nothing to move to.
type NeighbourSlots = [Option<Coordinate3D>; DIRECTIONS_COUNT];

/// Builds a maze from scratch on a fully walled lattice, choosing its entrance and exit.
pub trait MazeGenerator {
    fn generate(&self, dimensions: GridDimensions3D, rng: &mut XorShiftRng)
                -> Result<Maze3D, MazeError>;

    /// Validates raw extents before generating.
    fn generate_with_size(&self,
                          length: usize,
                          width: usize,
                          height: usize,
                          rng: &mut XorShiftRng)
                          -> Result<Maze3D, MazeError> {
        let dimensions = GridDimensions3D::new(Length(length), Width(width), Height(height))?;
        self.generate(dimensions, rng)
    }
}

/// Knocks down a random handful of walls everywhere, then carves a random walk from a floor cell
/// to wherever the walk stops, which becomes the exit.
///
/// Only the walk itself is guaranteed to be connected. Cells off the walk may be unreachable.
#[derive(Debug, Copy, Clone, Default)]
pub struct RandomCarveGenerator;

/// Randomised depth first search with an explicit stack. Produces a perfect maze.
///
/// The exit is the first dead end backed out of once a third of the cells' worth of steps
/// have been taken.
#[derive(Debug, Copy, Clone, Default)]
pub struct RecursiveBacktrackerGenerator;

/// Random walk that links every newly discovered cell to the cell it was entered from.
/// Samples spanning trees without bias, but takes as long as the walk needs to hit the last
/// unvisited cell, which is unbounded.
#[derive(Debug, Copy, Clone, Default)]
pub struct AldousBroderGenerator;

impl MazeGenerator for RandomCarveGenerator {
    fn generate(&self, dimensions: GridDimensions3D, rng: &mut XorShiftRng)
                -> Result<Maze3D, MazeError> {
        let mut maze = Maze3D::new(dimensions);

        for coord in dimensions.iter() {
            let removals = rng.gen_range(0..=DIRECTIONS_COUNT);
            for _ in 0..removals {
                let _ = maze.remove_wall(coord,
                                         Direction::rand_direction(rng),
                                         Strictness::Lenient)?;
            }
        }
        let shortcuts = maze.passages_count();

        let entrance = maze.random_floor_cell(rng);
        maze.set_entrance(entrance)?;

        let steps = carve_walk_steps(maze.floorsize(), rng);

        let mut current = entrance;
        for _ in 0..steps {
            let direction = Direction::rand_direction(rng);
            if let Some(next) = maze.neighbour_at_direction(current, direction)? {
                maze.remove_wall(current, direction, Strictness::Strict)?;
                current = next;
            }
        }
        maze.set_exit(current)?;

        debug!("random carve: {} shortcut passages, {} walk steps from {} to {}",
               shortcuts, steps, entrance, current);
        Ok(maze)
    }
}

impl MazeGenerator for RecursiveBacktrackerGenerator {
    fn generate(&self, dimensions: GridDimensions3D, rng: &mut XorShiftRng)
                -> Result<Maze3D, MazeError> {
        let mut maze = Maze3D::new(dimensions);
        let entrance = maze.random_floor_cell(rng);
        maze.set_entrance(entrance)?;

        let threshold = backtracker_exit_threshold(maze.size());
        let exit = carve_backtracking_walk(&mut maze, entrance, threshold, rng)?;
        maze.set_exit(exit_or_entrance(exit, entrance, "recursive backtracker"))?;
        Ok(maze)
    }
}

impl MazeGenerator for AldousBroderGenerator {
    fn generate(&self, dimensions: GridDimensions3D, rng: &mut XorShiftRng)
                -> Result<Maze3D, MazeError> {
        let mut maze = Maze3D::new(dimensions);
        let entrance = maze.random_floor_cell(rng);
        maze.set_entrance(entrance)?;

        let threshold = aldous_broder_exit_threshold(maze.size());
        let exit = carve_spanning_walk(&mut maze, entrance, threshold, rng)?;
        maze.set_exit(exit_or_entrance(exit, entrance, "aldous-broder"))?;
        Ok(maze)
    }
}

#[inline]
fn backtracker_exit_threshold(cells_count: usize) -> usize {
    cells_count / 3
}

/// `floor(cells / 1.5)` without going through floats.
#[inline]
fn aldous_broder_exit_threshold(cells_count: usize) -> usize {
    2 * (cells_count / 3) + (2 * (cells_count % 3)) / 3
}

/// Somewhere in `[floorsize / 2, floorsize]`.
fn carve_walk_steps(floorsize: usize, rng: &mut XorShiftRng) -> usize {
    let min_steps = floorsize / 2;
    min_steps + rng.gen_range(0..=floorsize - min_steps)
}

/// Depth first carving from `entrance` over every cell of the maze.
///
/// Returns the first cell backed out of once more than `exit_threshold` steps have been taken,
/// counting moves forward and back alike.
fn carve_backtracking_walk(maze: &mut Maze3D,
                           entrance: Coordinate3D,
                           exit_threshold: usize,
                           rng: &mut XorShiftRng)
                           -> Result<Option<Coordinate3D>, MazeError> {
    let mut visited = BitSet::with_capacity(maze.size());
    visited.insert(maze.cell_id(entrance)?);

    let mut stack = vec![entrance];
    let mut current = entrance;
    let mut exit = None;
    let mut steps = 0usize;

    while !stack.is_empty() {
        let candidates = unvisited_neighbours(maze, current, &visited)?;

        if let Some((direction, next)) = pick_neighbour(&candidates, rng) {
            maze.remove_wall(current, direction, Strictness::Strict)?;
            visited.insert(maze.cell_id(next)?);
            stack.push(next);
            trace!("backtracker: {} -> {}", current, next);
            current = next;
        } else {
            if exit.is_none() && steps > exit_threshold {
                exit = Some(current);
            }
            stack.pop();
            if let Some(&previous) = stack.last() {
                current = previous;
            }
        }
        steps += 1;
    }

    debug!("recursive backtracker: visited {} cells in {} steps, exit at {:?}",
           visited.len(), steps, exit);
    Ok(exit)
}

/// Aldous-Broder random walk from `entrance` until every cell has been visited.
///
/// Returns where the walker stood when the visited count first went past `exit_threshold`.
fn carve_spanning_walk(maze: &mut Maze3D,
                       entrance: Coordinate3D,
                       exit_threshold: usize,
                       rng: &mut XorShiftRng)
                       -> Result<Option<Coordinate3D>, MazeError> {
    let cells_count = maze.size();
    let mut visited = BitSet::with_capacity(cells_count);
    visited.insert(maze.cell_id(entrance)?);
    let mut visited_count = 1;

    let mut current = entrance;
    let mut exit = None;
    let mut steps = 0usize;

    while visited_count < cells_count {
        let candidates = in_bounds_neighbours(maze, current)?;
        let (direction, next) = match pick_neighbour(&candidates, rng) {
            Some(choice) => choice,
            None => break,
        };

        let next_id = maze.cell_id(next)?;
        if !visited.contains(next_id) {
            maze.remove_wall(current, direction, Strictness::Strict)?;
            visited.insert(next_id);
            visited_count += 1;
        }
        if exit.is_none() && visited_count > exit_threshold {
            exit = Some(current);
        }
        current = next;
        steps += 1;
    }

    debug!("aldous-broder: visited {} cells in {} steps, exit at {:?}",
           visited_count, steps, exit);
    Ok(exit)
}

fn exit_or_entrance(exit: Option<Coordinate3D>, entrance: Coordinate3D, generator: &str)
                    -> Coordinate3D {
    match exit {
        Some(e) => e,
        None => {
            warn!("{}: no exit chosen during generation, using the entrance {}",
                  generator, entrance);
            entrance
        }
    }
}

fn in_bounds_neighbours(maze: &Maze3D, coord: Coordinate3D) -> Result<NeighbourSlots, MazeError> {
    let mut slots = [None; DIRECTIONS_COUNT];
    for &direction in Direction::SCAN_ORDER.iter() {
        slots[direction.index()] = maze.neighbour_at_direction(coord, direction)?;
    }
    Ok(slots)
}

fn unvisited_neighbours(maze: &Maze3D, coord: Coordinate3D, visited: &BitSet)
                        -> Result<NeighbourSlots, MazeError> {
    let mut slots = in_bounds_neighbours(maze, coord)?;
    for slot in slots.iter_mut() {
        if let Some(neighbour) = *slot {
            if visited.contains(maze.cell_id(neighbour)?) {
                *slot = None;
            }
        }
    }
    Ok(slots)
}

/// Rolls a direction and walks round the slots from there until one is filled.
fn pick_neighbour(slots: &NeighbourSlots, rng: &mut XorShiftRng)
                  -> Option<(Direction, Coordinate3D)> {
    if slots.iter().all(Option::is_none) {
        return None;
    }
    let mut choice = rng.gen_range(0..DIRECTIONS_COUNT);
    loop {
        if let Some(coord) = slots[choice] {
            return Direction::from_index(choice).map(|direction| (direction, coord));
        }
        choice = (choice + 1) % DIRECTIONS_COUNT;
    }
}

/// Opens up to `count` randomly chosen walls that are still standing, skipping boundary walls.
/// Returns the number of walls actually opened.
pub fn carve_extra_passages(maze: &mut Maze3D, count: usize, rng: &mut XorShiftRng)
                            -> Result<usize, MazeError> {
    let mut opened = 0;
    for _ in 0..count {
        let coord = maze.random_cell(rng);
        let direction = Direction::rand_direction(rng);
        if maze.cell_at(coord)?.has_wall(direction) &&
           maze.remove_wall(coord, direction, Strictness::Lenient)? {
            opened += 1;
        }
    }
    debug!("extra carving: opened {} of {} attempted walls", opened, count);
    Ok(opened)
}

/// The selectable generation algorithms.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, Serialize, Deserialize)]
pub enum GeneratorKind {
    #[serde(rename = "random")]
    RandomCarve,
    #[serde(rename = "dfs")]
    RecursiveBacktracker,
    #[serde(rename = "aldous-broder")]
    AldousBroder,
}

impl GeneratorKind {
    pub const ALL: [GeneratorKind; 3] = [GeneratorKind::RandomCarve,
                                         GeneratorKind::RecursiveBacktracker,
                                         GeneratorKind::AldousBroder];

    pub fn generator(self) -> Box<dyn MazeGenerator> {
        match self {
            GeneratorKind::RandomCarve => Box::new(RandomCarveGenerator),
            GeneratorKind::RecursiveBacktracker => Box::new(RecursiveBacktrackerGenerator),
            GeneratorKind::AldousBroder => Box::new(AldousBroderGenerator),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GeneratorKind::RandomCarve => "random",
            GeneratorKind::RecursiveBacktracker => "dfs",
            GeneratorKind::AldousBroder => "aldous-broder",
        }
    }

    /// Whether every cell is guaranteed to be reachable from the entrance.
    pub fn is_perfect(self) -> bool {
        self != GeneratorKind::RandomCarve
    }

    pub fn generate(self, dimensions: GridDimensions3D, rng: &mut XorShiftRng)
                    -> Result<Maze3D, MazeError> {
        self.generator().generate(dimensions, rng)
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for GeneratorKind {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<GeneratorKind, MazeError> {
        GeneratorKind::ALL.iter()
                          .cloned()
                          .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
                          .ok_or(MazeError::UnknownGenerator)
    }
}

/// Generates a maze and reports how long it took.
pub fn timed_generate(generator: &dyn MazeGenerator,
                      dimensions: GridDimensions3D,
                      rng: &mut XorShiftRng)
                      -> Result<(Maze3D, Duration), MazeError> {
    let start = Instant::now();
    let maze = generator.generate(dimensions, rng)?;
    let elapsed = start.elapsed();
    debug!("generation took {}ms", elapsed.as_millis());
    Ok((maze, elapsed))
}
