//! Benchmarks for the pose estimation hot path.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use face_pose_sync::camera_model::{project_point, CameraIntrinsics, DistortionCoeffs};
use face_pose_sync::constants::REFERENCE_MODEL_POINTS;
use face_pose_sync::orientation::decompose;
use face_pose_sync::pnp_solver::{IterativePnp, PnpBackend};
use nalgebra::{Rotation3, Vector2, Vector3};

fn bench_pnp_solve(c: &mut Criterion) {
    let solver = IterativePnp::default();
    let intrinsics = CameraIntrinsics::from_dimensions(640.0, 480.0);
    let distortion = DistortionCoeffs::calibrated();

    let model: Vec<Vector3<f64>> = REFERENCE_MODEL_POINTS
        .iter()
        .map(|p| Vector3::new(p[0], p[1], p[2]))
        .collect();
    let rotation = Rotation3::from_euler_angles(0.15, 0.25, 0.05);
    let translation = Vector3::new(0.5, -0.5, 45.0);
    let observed: Vec<Vector2<f64>> = model
        .iter()
        .map(|p| project_point(&(rotation * p + translation), &intrinsics, &distortion))
        .collect();

    c.bench_function("pnp_solve", |b| {
        b.iter(|| {
            solver.solve(
                black_box(&model),
                black_box(&observed),
                &intrinsics,
                &distortion,
            )
        });
    });
}

fn bench_euler_decompose(c: &mut Criterion) {
    let matrix = Rotation3::from_euler_angles(0.3, -0.2, 0.7).matrix().clone_owned();

    c.bench_function("euler_decompose", |b| {
        b.iter(|| decompose(black_box(&matrix)));
    });
}

criterion_group!(benches, bench_pnp_solve, bench_euler_decompose);
criterion_main!(benches);
