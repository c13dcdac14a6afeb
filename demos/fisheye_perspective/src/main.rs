use argh::FromArgs;
use serde::Deserialize;
use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, SystemTime},
};

use omniview::{
    camera::{LoadCalibration, OcamModel, PinholeCamera},
    image::Image,
    imgproc::{interpolation::PixelRounding, parallel::ExecutionStrategy, reproject::RemapOptions},
    io::functional::{read_image_rgb8, write_image_rgb8},
    PairSide, SeamConfig, Session,
};

/// Upper bound of the interactive intrinsics.
const MAX_PARAM: f64 = 5000.0;

#[derive(FromArgs)]
/// Reproject the images of two fisheye cameras to level perspective views
struct Args {
    /// path to the calibration file of the first camera
    #[argh(option)]
    calib1: PathBuf,

    /// path to the calibration file of the second camera
    #[argh(option)]
    calib2: PathBuf,

    /// path to the image of the first camera
    #[argh(option)]
    image1: PathBuf,

    /// path to the image of the second camera
    #[argh(option)]
    image2: PathBuf,

    /// path to the 4x4 pose of the second camera relative to the first
    #[argh(option)]
    extrinsic: PathBuf,

    /// path of the first output image
    #[argh(option, default = "PathBuf::from(\"undistorted_perspective1.jpg\")")]
    output1: PathBuf,

    /// path of the second output image
    #[argh(option, default = "PathBuf::from(\"undistorted_perspective2.jpg\")")]
    output2: PathBuf,

    /// the focal length in x of the virtual camera
    #[argh(option, default = "480.0")]
    fx: f64,

    /// the focal length in y of the virtual camera
    #[argh(option, default = "360.0")]
    fy: f64,

    /// json file with `fx`, `fy`, `xc` and `yc`; re-rendered on change
    #[argh(option)]
    params: Option<PathBuf>,

    /// json file with a split view configuration; renders split views when given
    #[argh(option)]
    seam: Option<PathBuf>,

    /// truncate projected coordinates instead of rounding them
    #[argh(switch)]
    floor: bool,

    /// render rows in parallel
    #[argh(switch)]
    parallel: bool,

    /// write the outputs and exit without waiting for Ctrl-C
    #[argh(switch)]
    once: bool,
}

/// Intrinsics of the virtual camera set at runtime.
#[derive(Debug, Deserialize)]
struct ViewParams {
    fx: f64,
    fy: f64,
    xc: f64,
    yc: f64,
}

impl ViewParams {
    fn camera(&self) -> Option<PinholeCamera> {
        let in_range = |v: f64| (0.0..=MAX_PARAM).contains(&v);
        if ![self.fx, self.fy, self.xc, self.yc].into_iter().all(in_range) {
            return None;
        }
        PinholeCamera::new(self.fx, self.fy, self.xc, self.yc).ok()
    }
}

struct Pair {
    models: [OcamModel; 2],
    images: [Image<u8, 3>; 2],
}

fn render(
    session: &Session,
    pair: &Pair,
    seam: Option<&SeamConfig>,
) -> Result<[Image<u8, 3>; 2], omniview::SessionError> {
    let view = |side: PairSide, i: usize| {
        let (src, model) = (&pair.images[i], &pair.models[i]);
        match seam {
            Some(seam) => session.remap_seam(side, src, model, src.size(), seam),
            None => session.remap_view(side, src, model, src.size()),
        }
    };
    Ok([view(PairSide::First, 0)?, view(PairSide::Second, 1)?])
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

fn read_params(path: &Path) -> Result<ViewParams, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    if args.output1 == args.output2 {
        return Err("the two output paths must differ".into());
    }

    let pair = Pair {
        models: [OcamModel::load(&args.calib1)?, OcamModel::load(&args.calib2)?],
        images: [read_image_rgb8(&args.image1)?, read_image_rgb8(&args.image2)?],
    };

    let seam = match &args.seam {
        Some(path) => Some(serde_json::from_str::<SeamConfig>(&std::fs::read_to_string(
            path,
        )?)?),
        None => None,
    };

    let size = pair.images[0].size();
    let camera = PinholeCamera::centered(args.fx, args.fy, size.width, size.height)?;
    let mut session = Session::from_extrinsic_file(&args.extrinsic, camera)?;
    session.set_options(RemapOptions {
        rounding: if args.floor {
            PixelRounding::Floor
        } else {
            PixelRounding::Round
        },
        strategy: if args.parallel {
            ExecutionStrategy::ParallelRows
        } else {
            ExecutionStrategy::Serial
        },
    });

    log::info!("corrective rotations: {:?}", session.rotations());

    let mut outputs = render(&session, &pair, seam.as_ref())?;

    if !args.once {
        // create a cancel token to stop waiting for parameter changes
        let cancel_token = Arc::new(AtomicBool::new(false));

        ctrlc::set_handler({
            let cancel_token = cancel_token.clone();
            move || {
                println!("Received Ctrl-C signal. Sending cancel signal !!");
                cancel_token.store(true, Ordering::SeqCst);
            }
        })?;

        let mut last_change = args.params.as_deref().and_then(modified);

        while !cancel_token.load(Ordering::SeqCst) {
            std::thread::sleep(Duration::from_millis(100));

            let Some(params_path) = args.params.as_deref() else {
                continue;
            };

            let change = modified(params_path);
            if change.is_none() || change == last_change {
                continue;
            }
            last_change = change;

            let camera = match read_params(params_path) {
                Ok(params) => params.camera(),
                Err(e) => {
                    log::warn!("ignoring unreadable parameters: {e}");
                    continue;
                }
            };

            let Some(camera) = camera else {
                log::warn!("ignoring out of range parameters");
                continue;
            };

            session.set_camera(camera)?;
            outputs = render(&session, &pair, seam.as_ref())?;
            log::info!("re-rendered with {:?}", camera);
        }
    }

    let [dst1, dst2] = outputs;
    for (path, image) in [(&args.output1, &dst1), (&args.output2, &dst2)] {
        write_image_rgb8(path, image)?;
        println!("Image {} saved", path.display());
    }

    Ok(())
}
