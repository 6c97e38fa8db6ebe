use clap::Parser;
use landmark_fix::{prelude::*, report::write_report};
use serde::Deserialize;
use std::{
    error::Error,
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::PathBuf,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uom::si::{angle::radian, f64::Angle};

/// Replay a recorded run and write the corrected trajectory.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON dataset with the map, the initial pose and the frames.
    #[arg(short, long)]
    dataset: PathBuf,

    /// Where to write the frame log. Defaults to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Extract cylinders from all scans in parallel before correcting.
    #[arg(short, long)]
    parallel: bool,
}

#[derive(Deserialize)]
struct Dataset {
    #[serde(default)]
    config: LocalizerConfig,
    #[serde(default)]
    geometry: LinearBeamGeometry,
    reference_map: ReferenceMap,
    initial_pose: Pose,
    frames: Vec<Frame>,
}

#[derive(Deserialize)]
struct Frame {
    #[serde(default)]
    motion: Motion,
    scan: RangeScan,
}

/// Odometry between two frames: drive `forward` along the heading, then
/// turn by `turn` radians.
#[derive(Clone, Copy, Default, Deserialize)]
struct Motion {
    forward: f64,
    turn: f64,
}

impl Motion {
    fn predict(&self, pose: Pose) -> Pose {
        let heading = pose.heading.get::<radian>();
        Pose::new(
            pose.x + self.forward * heading.cos(),
            pose.y + self.forward * heading.sin(),
            pose.heading + Angle::new::<radian>(self.turn),
        )
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().compact().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    let dataset: Dataset = serde_json::from_reader(BufReader::new(File::open(&args.dataset)?))?;
    info!(
        frames = dataset.frames.len(),
        landmarks = dataset.reference_map.len(),
        "loaded {}",
        args.dataset.display()
    );

    let localizer = Localizer::new(dataset.config, dataset.geometry, dataset.reference_map)?;
    let (motions, scans): (Vec<Motion>, Vec<RangeScan>) = dataset
        .frames
        .into_iter()
        .map(|frame| (frame.motion, frame.scan))
        .unzip();
    let predict = |pose: Pose, i: usize| motions[i].predict(pose);

    let reports = match args.parallel {
        true => localizer.par_run(dataset.initial_pose, &scans, predict),
        false => localizer.run(dataset.initial_pose, &scans, predict),
    };

    let corrected = reports.iter().filter(|r| r.is_corrected()).count();
    info!(corrected, total = reports.len(), "replay finished");

    // Each write! on a raw file is a system call.
    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    for report in &reports {
        write_report(&mut out, report)?;
    }
    out.flush()?;

    Ok(())
}
