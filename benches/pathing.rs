use criterion::{
    Criterion,
    criterion_group,
    criterion_main
};
use mazes3d::adapter::MazeAdapter;
use mazes3d::generators::GeneratorKind;
use mazes3d::grid::Maze3D;
use mazes3d::grid_dimensions::GridDimensions3D;
use mazes3d::pathing::SearchKind;
use mazes3d::units::{Height, Length, Width};
use mazes3d::utils;

fn large_perfect_maze() -> Maze3D {
    let dims = GridDimensions3D::new(Length(60), Width(60), Height(6)).unwrap();
    GeneratorKind::RecursiveBacktracker.generate(dims, &mut utils::seeded_rng(Some(7))).unwrap()
}

fn bench_search(c: &mut Criterion, kind: SearchKind) {
    let maze = large_perfect_maze();
    c.bench_function(&format!("{}_search_60x60x6", kind), move |b| {
        let adapter = MazeAdapter::new(&maze);
        b.iter(|| kind.run(&adapter))
    });
}

fn bench_dfs(c: &mut Criterion) {
    bench_search(c, SearchKind::DepthFirst);
}

fn bench_bfs(c: &mut Criterion) {
    bench_search(c, SearchKind::BreadthFirst);
}

fn bench_astar(c: &mut Criterion) {
    bench_search(c, SearchKind::AStar);
}

fn bench_passage_graph(c: &mut Criterion) {
    let maze = large_perfect_maze();
    c.bench_function("passage_graph_60x60x6", move |b| {
        b.iter(|| maze.passage_graph())
    });
}

criterion_group!(benches, bench_dfs, bench_bfs, bench_astar, bench_passage_graph);
criterion_main!(benches);
