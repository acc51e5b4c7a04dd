use log::{debug, info};
use rand_xorshift::XorShiftRng;
use serde_derive::{Deserialize, Serialize};

use crate::adapter::MazeAdapter;
use crate::cells::{Coordinate3D, Direction};
use crate::errors::MazeError;
use crate::generators::GeneratorKind;
use crate::grid::{Maze3D, MazeSnapshot};
use crate::grid_dimensions::GridDimensions3D;
use crate::pathing::{SearchKind, SearchOutcome};
use crate::units::NodeId;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum MoveOutcome {
    /// A wall is in the way; the player stays put.
    Blocked,
    Moved,
    /// Moved, and the new position is the maze exit.
    ReachedExit,
}

/// Everything needed to resume a game later.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub maze: MazeSnapshot,
    pub position: Coordinate3D,
    pub generator: GeneratorKind,
    pub search: SearchKind,
}

/// A player walking a maze, with the most recent solution from where they stood.
///
/// The solution is searched from the player's position rather than the entrance, and is thrown
/// away whenever the player moves or a different search kind is asked for.
#[derive(Debug, Clone)]
pub struct MazeSession {
    maze: Maze3D,
    generator: GeneratorKind,
    search: SearchKind,
    position: Coordinate3D,
    solution: Option<SearchOutcome<NodeId>>,
}

impl MazeSession {
    pub fn new(maze: Maze3D, generator: GeneratorKind) -> MazeSession {
        let position = maze.entrance();
        MazeSession {
            maze: maze,
            generator: generator,
            search: SearchKind::AStar,
            position: position,
            solution: None,
        }
    }

    /// Start a game on a freshly generated maze.
    pub fn generate(generator: GeneratorKind,
                    dimensions: GridDimensions3D,
                    rng: &mut XorShiftRng)
                    -> Result<MazeSession, MazeError> {
        let maze = generator.generate(dimensions, rng)?;
        Ok(MazeSession::new(maze, generator))
    }

    pub fn maze(&self) -> &Maze3D {
        &self.maze
    }

    pub fn maze_mut(&mut self) -> &mut Maze3D {
        self.solution = None;
        &mut self.maze
    }

    pub fn generator(&self) -> GeneratorKind {
        self.generator
    }

    /// The search kind used by `hint`, which is the one most recently passed to `solve`.
    pub fn search_kind(&self) -> SearchKind {
        self.search
    }

    pub fn position(&self) -> Coordinate3D {
        self.position
    }

    pub fn at_exit(&self) -> bool {
        self.position == self.maze.exit()
    }

    pub fn move_player(&mut self, direction: Direction) -> Result<MoveOutcome, MazeError> {
        if !self.maze.cell_at(self.position)?.is_open(direction) {
            return Ok(MoveOutcome::Blocked);
        }
        let next = match self.maze.neighbour_at_direction(self.position, direction)? {
            Some(coord) => coord,
            None => return Ok(MoveOutcome::Blocked),
        };

        self.position = next;
        self.solution = None;
        if self.at_exit() {
            info!("reached the exit at {}", next);
            Ok(MoveOutcome::ReachedExit)
        } else {
            Ok(MoveOutcome::Moved)
        }
    }

    /// Path from the current position to the exit, reusing the last search when still valid.
    pub fn solve(&mut self, kind: SearchKind) -> Result<&SearchOutcome<NodeId>, MazeError> {
        let outcome = match self.solution.take().filter(|cached| cached.kind == kind) {
            Some(cached) => cached,
            None => {
                let mut adapter = MazeAdapter::new(&self.maze);
                adapter.set_start(self.position)?;
                let outcome = kind.run(&adapter);
                debug!("{} from {}: {} states expanded, path length {:?}",
                       kind,
                       self.position,
                       outcome.states_expanded,
                       outcome.path_length());
                outcome
            }
        };
        self.search = kind;
        Ok(self.solution.insert(outcome))
    }

    /// The solution's cells on the player's current level, at most `steps` of them. The first is
    /// the player's own cell. Empty when the exit cannot be reached.
    pub fn hint(&mut self, steps: usize) -> Result<Vec<Coordinate3D>, MazeError> {
        let level = self.position.z;
        let kind = self.search;
        let path = match self.solve(kind)?.path {
            Some(ref path) => path.clone(),
            None => return Ok(Vec::new()),
        };

        let mut hint = Vec::with_capacity(steps);
        for node in path {
            if hint.len() == steps {
                break;
            }
            let coord = self.maze.cell_coordinates(node)?;
            if coord.z == level {
                hint.push(coord);
            }
        }
        Ok(hint)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            maze: self.maze.snapshot(),
            position: self.position,
            generator: self.generator,
            search: self.search,
        }
    }

    /// Resume a saved game. The restored session has no cached solution.
    pub fn restore(snapshot: SessionSnapshot) -> Result<MazeSession, MazeError> {
        let maze = Maze3D::from_snapshot(snapshot.maze)?;
        maze.check_bounds(snapshot.position)?;
        Ok(MazeSession {
            maze: maze,
            generator: snapshot.generator,
            search: snapshot.search,
            position: snapshot.position,
            solution: None,
        })
    }
}
