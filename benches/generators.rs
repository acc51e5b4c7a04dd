use criterion::{criterion_group, criterion_main, Criterion};
use mazes3d::{
    generators::{self, GeneratorKind},
    grid_dimensions::GridDimensions3D,
    units::{Height, Length, Width},
    utils,
};

fn dims_16x16x4() -> GridDimensions3D {
    GridDimensions3D::new(Length(16), Width(16), Height(4)).unwrap()
}

fn bench_random_carve_maze_16x16x4(c: &mut Criterion) {
    let dims = dims_16x16x4();
    let mut rng = utils::seeded_rng(Some(1));
    c.bench_function("random_carve_maze_16x16x4", move |b| {
        b.iter(|| GeneratorKind::RandomCarve.generate(dims, &mut rng))
    });
}

fn bench_recursive_backtracker_maze_16x16x4(c: &mut Criterion) {
    let dims = dims_16x16x4();
    let mut rng = utils::seeded_rng(Some(1));
    c.bench_function("recursive_backtracker_maze_16x16x4", move |b| {
        b.iter(|| GeneratorKind::RecursiveBacktracker.generate(dims, &mut rng))
    });
}

fn bench_aldous_broder_maze_16x16x4(c: &mut Criterion) {
    let dims = dims_16x16x4();
    let mut rng = utils::seeded_rng(Some(1));
    c.bench_function("aldous_broder_maze_16x16x4", move |b| {
        b.iter(|| GeneratorKind::AldousBroder.generate(dims, &mut rng))
    });
}

fn bench_extra_passages_100(c: &mut Criterion) {
    let mut rng = utils::seeded_rng(Some(1));
    let maze = GeneratorKind::RecursiveBacktracker.generate(dims_16x16x4(), &mut rng).unwrap();
    c.bench_function("extra_passages_100", move |b| {
        b.iter(|| {
            let mut m = maze.clone();
            generators::carve_extra_passages(&mut m, 100, &mut rng)
        })
    });
}

criterion_group!(
    benches,
    bench_random_carve_maze_16x16x4,
    bench_recursive_backtracker_maze_16x16x4,
    bench_aldous_broder_maze_16x16x4,
    bench_extra_passages_100
);
criterion_main!(benches);
