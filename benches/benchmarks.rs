use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use glam::DVec3;
use std::hint::black_box;

use holetrim::{
    CutoffOptions, PipelineConfig, PolyMesh, TrimOptions, estimate_cutoff, find_boundary_loops,
    smooth_boundaries, trim_arm_holes, trim_hole,
};

const SEGMENTS: usize = 256;
const RINGS: usize = 128;

// Open tube whose rings rise towards the middle.
fn sleeve() -> PolyMesh {
    let mut mesh = PolyMesh::open_tube(1.0, 8.0, SEGMENTS, RINGS).unwrap();
    for r in 0..=RINGS {
        let lift = 5.0 * r.min(RINGS - r) as f64;
        for s in 0..SEGMENTS {
            let v = ((r * SEGMENTS + s) as u32).into();
            let p = mesh.point(v).unwrap();
            mesh.set_point(v, p + DVec3::Y * lift).unwrap();
        }
    }
    mesh
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");

    group.bench_function("open_tube", |b| {
        b.iter(|| {
            let mesh = PolyMesh::open_tube(1.0, 8.0, black_box(SEGMENTS), RINGS).unwrap();
            black_box(mesh);
        });
    });

    group.bench_function("delete_all_faces", |b| {
        b.iter_batched(
            sleeve,
            |mut mesh| {
                for f in mesh.faces() {
                    mesh.delete_face(f).unwrap();
                }
                black_box(mesh);
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_boundary(c: &mut Criterion) {
    let mut group = c.benchmark_group("boundary");
    let mesh = sleeve();

    group.bench_function("find_boundary_loops", |b| {
        b.iter(|| {
            let loops = find_boundary_loops(black_box(&mesh)).unwrap();
            black_box(loops);
        });
    });

    group.bench_function("smooth_boundaries", |b| {
        b.iter_batched(
            || {
                let mesh = sleeve();
                let loops = find_boundary_loops(&mesh).unwrap();
                (mesh, loops)
            },
            |(mut mesh, mut loops)| {
                smooth_boundaries(&mut mesh, &mut loops, 10).unwrap();
                black_box(loops);
            },
            BatchSize::SmallInput,
        );
    });

    let loops = find_boundary_loops(&mesh).unwrap();
    group.bench_function("estimate_cutoff", |b| {
        let opts = CutoffOptions::default().with_fraction(1.0);
        b.iter(|| {
            let est = estimate_cutoff(&mesh, black_box(&loops[0]), &opts).unwrap();
            black_box(est);
        });
    });

    group.finish();
}

fn bench_trimming(c: &mut Criterion) {
    let mut group = c.benchmark_group("trimming");

    group.bench_function("trim_hole", |b| {
        b.iter_batched(
            || {
                let mesh = sleeve();
                let mut loops = find_boundary_loops(&mesh).unwrap();
                let bloop = loops.swap_remove(0);
                (mesh, bloop)
            },
            |(mut mesh, bloop)| {
                let outcome = trim_hole(&mut mesh, bloop, 0.0, &TrimOptions::default()).unwrap();
                black_box(outcome);
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("trim_arm_holes", |b| {
        let config = PipelineConfig::default().with_candidates(2);
        b.iter_batched(
            sleeve,
            |mut mesh| {
                let report = trim_arm_holes(&mut mesh, &config).unwrap();
                black_box(report);
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_construction,
    bench_boundary,
    bench_trimming
);
criterion_main!(benches);
