use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use glam::DMat3;
use omniview_camera::PinholeCamera;
use omniview_image::Image;
use omniview_imgproc::{
    parallel::ExecutionStrategy,
    reproject::{remap_perspective, remap_split, RemapOptions, SplitBranch, SplitViewParams},
};

fn bench_remap_perspective(c: &mut Criterion) {
    let mut group = c.benchmark_group("RemapPerspective");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        let image_size = [*width, *height].into();
        let src = Image::<u8, 3>::new(image_size, vec![0u8; width * height * 3]).unwrap();
        let dst = Image::<u8, 3>::from_size_val(image_size, 0).unwrap();

        // a wide pinhole stands in for the fisheye
        let model = PinholeCamera::centered(*width as f64 / 4.0, *width as f64 / 4.0, *width, *height)
            .unwrap();
        let camera = PinholeCamera::centered(*width as f64 / 2.0, *width as f64 / 2.0, *width, *height)
            .unwrap();
        let rotation = DMat3::from_rotation_y(0.2);

        for (name, strategy) in [
            ("serial", ExecutionStrategy::Serial),
            ("par_rows", ExecutionStrategy::ParallelRows),
        ] {
            let options = RemapOptions {
                strategy,
                ..Default::default()
            };
            group.bench_with_input(
                BenchmarkId::new(name, &parameter_string),
                &(&src, &dst),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| {
                        remap_perspective(
                            black_box(src),
                            black_box(&mut dst),
                            black_box(&model),
                            black_box(&camera),
                            black_box(&rotation),
                            black_box(&options),
                        )
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_remap_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("RemapSplit");

    for (width, height) in [(512, 224), (1024, 448)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        let image_size = [*width, *height].into();
        let src = Image::<u8, 3>::new(image_size, vec![0u8; width * height * 3]).unwrap();
        let dst = Image::<u8, 3>::from_size_val(image_size, 0).unwrap();

        let model = PinholeCamera::centered(*width as f64 / 4.0, *width as f64 / 4.0, *width, *height)
            .unwrap();
        let half = |yaw: f64| SplitBranch {
            fx: *width as f64 / 4.0,
            fy: *width as f64 / 4.0,
            rotation: DMat3::IDENTITY,
            yaw,
        };
        let params = SplitViewParams::centered(image_size, half(0.3), half(-0.3));
        let options = RemapOptions {
            strategy: ExecutionStrategy::ParallelRows,
            ..Default::default()
        };

        group.bench_with_input(
            BenchmarkId::new("par_rows", &parameter_string),
            &(&src, &dst),
            |b, i| {
                let (src, mut dst) = (i.0, i.1.clone());
                b.iter(|| {
                    remap_split(
                        black_box(src),
                        black_box(&mut dst),
                        black_box(&model),
                        black_box(&params),
                        black_box(&options),
                    )
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_remap_perspective, bench_remap_split);
criterion_main!(benches);
