use docopt::Docopt;
use itertools::Itertools;
use log::info;
use mazes3d::{
    adapter::MazeAdapter,
    generators::{self, GeneratorKind},
    grid::Maze3D,
    grid_dimensions::GridDimensions3D,
    pathing::SearchKind,
    session::{MazeSession, SessionSnapshot},
    units::{Height, Length, Width},
    utils,
};
use serde_derive::Deserialize;
use std::{
    fs::File,
    io,
    io::prelude::*,
};

const USAGE: &str = "Mazes3d

Usage:
    mazes3d_driver -h | --help
    mazes3d_driver [--length=<l> --width=<w> --height=<h>] [--generator=<g>] [--search=<s>] [--seed=<n>] [--extra-passages=<n>] [--hint=<n>] [--save=<path>] [--save-edges=<path>]
    mazes3d_driver --load=<path> [--search=<s>] [--hint=<n>] [--save=<path>] [--save-edges=<path>]

Options:
    -h --help              Show this screen.
    --length=<l>           Cells along x [default: 10].
    --width=<w>            Cells along y [default: 10].
    --height=<h>           Levels along z [default: 3].
    --generator=<g>        One of random, dfs, aldous-broder [default: dfs].
    --search=<s>           One of dfs, bfs, astar. Used for the printed solution and hint [default: astar].
    --seed=<n>             Seed the generator for a reproducible maze.
    --extra-passages=<n>   After generating, try to knock down n more random walls.
    --hint=<n>             Print the next n cells of the solution on the player's level.
    --save=<path>          Save the maze and player state as JSON.
    --load=<path>          Load a maze and player state saved with --save instead of generating.
    --save-edges=<path>    Serialize the maze to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based vertex indices.
";
#[derive(Debug, Deserialize)]
struct DriverArgs {
    flag_length: usize,
    flag_width: usize,
    flag_height: usize,
    flag_generator: String,
    flag_search: String,
    flag_seed: Option<u64>,
    flag_extra_passages: Option<usize>,
    flag_hint: Option<usize>,
    flag_save: String,
    flag_load: String,
    flag_save_edges: String,
}

mod errors {
    use error_chain::*;
    error_chain! {

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
            Json(::serde_json::Error);
            Maze(::mazes3d::errors::MazeError);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {
    env_logger::init();

    let args: DriverArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;
    let search_kind = args.flag_search.parse::<SearchKind>()?;
    let mut rng = utils::seeded_rng(args.flag_seed);

    let mut session = if args.flag_load.is_empty() {
        let generator_kind = args.flag_generator.parse::<GeneratorKind>()?;
        let dimensions = GridDimensions3D::new(Length(args.flag_length),
                                               Width(args.flag_width),
                                               Height(args.flag_height))?;
        let (maze, elapsed) = generators::timed_generate(generator_kind.generator().as_ref(),
                                                         dimensions,
                                                         &mut rng)?;
        println!("{} generation took {}ms", generator_kind, elapsed.as_millis());
        MazeSession::new(maze, generator_kind)
    } else {
        load_session(&args.flag_load)?
    };

    if let Some(wall_count) = args.flag_extra_passages {
        let opened = generators::carve_extra_passages(session.maze_mut(), wall_count, &mut rng)?;
        info!("opened {} extra passages", opened);
    }

    print_maze_summary(session.maze());
    compare_search_engines(session.maze());

    let position = session.position();
    let outcome = session.solve(search_kind)?.clone();
    match outcome.path {
        Some(ref path) => {
            let route = path.iter()
                            .map(|node| session.maze().cell_coordinates(*node))
                            .collect::<::std::result::Result<Vec<_>, _>>()?;
            println!("{} solution from {}: {}", search_kind, position, route.iter().join(" -> "));
        }
        None => println!("{} found no way from {} to the exit", search_kind, position),
    }

    if let Some(steps) = args.flag_hint {
        let hint = session.hint(steps)?;
        println!("hint: {}", hint.iter().join(" -> "));
    }

    if !args.flag_save.is_empty() {
        save_session(&session.snapshot(), &args.flag_save)?;
    }

    if !args.flag_save_edges.is_empty() {
        save_maze_graph(session.maze(), &args.flag_save_edges)?;
    }

    Ok(())
}

fn print_maze_summary(maze: &Maze3D) {
    let dimensions = maze.dimensions();
    println!("maze {}x{}x{}, {} cells, {} passages, entrance {}, exit {}",
             dimensions.length().0,
             dimensions.width().0,
             dimensions.height().0,
             maze.size(),
             maze.passages_count(),
             maze.entrance(),
             maze.exit());
}

/// Run every engine from the entrance and report how hard each one worked.
fn compare_search_engines(maze: &Maze3D) {
    let adapter = MazeAdapter::new(maze);
    for kind in SearchKind::ALL.iter() {
        let outcome = kind.run(&adapter);
        let length = outcome.path_length()
                            .map_or_else(|| "none".to_string(), |l| l.to_string());
        println!("{:>6}: {:>6} states expanded, path length {}",
                 kind.name(),
                 outcome.states_expanded,
                 length);
    }
}

fn load_session(file_path: &str) -> Result<MazeSession> {
    let file = File::open(file_path)
        .chain_err(|| format!("Failed to open saved maze {}", file_path))?;
    let snapshot: SessionSnapshot = serde_json::from_reader(io::BufReader::new(file))?;
    Ok(MazeSession::restore(snapshot)?)
}

fn save_session(snapshot: &SessionSnapshot, file_path: &str) -> Result<()> {
    let data = serde_json::to_string_pretty(snapshot)?;
    write_text_to_file(&data, file_path)
        .chain_err(|| format!("Failed to write maze to {}", file_path))?;
    Ok(())
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}

fn save_maze_graph(maze: &Maze3D, file_path: &str) -> Result<()> {

    let mut graph_data = String::new();
    graph_data.push_str(&format!("{} {}\n", maze.size(), maze.passages_count()));

    for (src, dst) in maze.iter_passages() {
        let src_as_1_based_index = maze.cell_id(src)? + 1;
        let dst_as_1_based_index = maze.cell_id(dst)? + 1;
        graph_data.push_str(&format!("{} {}\n", src_as_1_based_index, dst_as_1_based_index));
    }

    write_text_to_file(&graph_data, file_path)
        .chain_err(|| format!("Failed to write maze graph to text file {}", file_path))?;

    Ok(())
}
