use std::io::Write;

use glam::{DVec2, DVec3};
use omniview_3d::{average_rotations, io::extrinsic::read_extrinsic_txt};
use omniview_camera::{PinholeCamera, WorldToCamera};
use omniview_image::Image;
use omniview_imgproc::{
    parallel::ExecutionStrategy,
    reproject::{remap_perspective, remap_split, RemapOptions, SplitBranch, SplitViewParams},
};

const IDENTITY_EXTRINSIC: &str = "\
1 0 0 0
0 1 0 0
0 0 1 0
0 0 0 1
";

/// Images every ray at the same pixel.
struct FixedPixel(DVec2);

impl WorldToCamera for FixedPixel {
    fn world_to_camera(&self, _ray: DVec3) -> Option<DVec2> {
        Some(self.0)
    }
}

fn gradient(width: usize, height: usize) -> Image<u8, 3> {
    let mut data = Vec::with_capacity(width * height * 3);
    for row in 0..height {
        for col in 0..width {
            data.extend_from_slice(&[(col % 256) as u8, (row % 256) as u8, 128]);
        }
    }
    Image::new([width, height].into(), data).unwrap()
}

#[test]
fn identity_extrinsic_fixed_model() -> Result<(), Box<dyn std::error::Error>> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(IDENTITY_EXTRINSIC.as_bytes())?;

    let rotations = average_rotations(&read_extrinsic_txt(file.path())?)?;
    assert_eq!(rotations.first, glam::DMat3::IDENTITY);
    assert_eq!(rotations.second, glam::DMat3::IDENTITY);

    let src = gradient(200, 200);
    let model = FixedPixel(DVec2::new(100.0, 100.0));
    let camera = PinholeCamera::centered(40.0, 40.0, 50, 50)?;

    for rotation in [rotations.first, rotations.second] {
        let mut dst = Image::<u8, 3>::from_size_val([50, 50].into(), 0)?;
        remap_perspective(&src, &mut dst, &model, &camera, &rotation, &RemapOptions::default())?;
        assert!(dst.as_slice().chunks_exact(3).all(|p| p == [100, 100, 128]));
    }
    Ok(())
}

#[test]
fn identity_pinhole_reproduces_source() -> Result<(), Box<dyn std::error::Error>> {
    let src = gradient(33, 17);
    let identity = PinholeCamera::new(1.0, 1.0, 0.0, 0.0)?;

    let options = RemapOptions {
        strategy: ExecutionStrategy::ParallelRows,
        ..Default::default()
    };
    let mut dst = Image::<u8, 3>::from_size_val(src.size(), 0)?;
    remap_perspective(&src, &mut dst, &identity, &identity, &glam::DMat3::IDENTITY, &options)?;

    assert_eq!(dst, src);
    Ok(())
}

#[test]
fn split_view_fixed_model() -> Result<(), Box<dyn std::error::Error>> {
    let src = gradient(64, 64);
    let model = FixedPixel(DVec2::new(10.0, 20.0));
    let mut dst = Image::<u8, 3>::from_size_val([32, 16].into(), 0)?;

    let half = |fx: f64, yaw: f64| SplitBranch {
        fx,
        fy: fx,
        rotation: glam::DMat3::IDENTITY,
        yaw,
    };
    let params = SplitViewParams::centered(
        dst.size(),
        half(20.0, 20f64.to_radians()),
        half(10.0, (-60f64).to_radians()),
    );
    remap_split(&src, &mut dst, &model, &params, &RemapOptions::default())?;

    assert!(dst.as_slice().chunks_exact(3).all(|p| p == [10, 20, 128]));
    Ok(())
}
