use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser};
use handeye_core::{Pose, Real, POSE_VECTOR_LEN};
use handeye_pipeline::{
    run_hand_eye_calibration, EyePoses, HandEyeConfig, HandEyeInput, HandEyeReport, HandPoses,
};
use log::info;

/// Hand-eye calibration from time-aligned hand and eye pose streams.
///
/// Pose files are headerless CSV: the first column (timestamp or index) is
/// ignored, the next seven are `tx, ty, tz, qx, qy, qz, qw`.
#[derive(Debug, Parser)]
#[command(author, version, about = "Dual-quaternion hand-eye calibration")]
#[command(group(
    ArgGroup::new("hand")
        .required(true)
        .args(["aligned_poses_b_h_csv_file", "aligned_poses_h_b_csv_file"])
))]
#[command(group(
    ArgGroup::new("eye")
        .required(true)
        .args(["aligned_poses_w_e_csv_file", "aligned_poses_e_w_csv_file"])
))]
struct Args {
    /// Hand poses expressed in the base frame (`^B T_H`).
    #[arg(long)]
    aligned_poses_b_h_csv_file: Option<PathBuf>,

    /// Base poses expressed in the hand frame (`^H T_B`), inverted on load.
    #[arg(long)]
    aligned_poses_h_b_csv_file: Option<PathBuf>,

    /// Eye poses expressed in the world frame (`^W T_E`).
    #[arg(long)]
    aligned_poses_w_e_csv_file: Option<PathBuf>,

    /// World poses expressed in the eye frame (`^E T_W`), inverted on load.
    #[arg(long)]
    aligned_poses_e_w_csv_file: Option<PathBuf>,

    /// Optional path to a JSON HandEyeConfig. Defaults are used if omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Optional CSV output for the eye path expressed in the hand frame.
    #[arg(long)]
    aligned_poses_out: Option<PathBuf>,
}

fn load_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(value)
}

fn read_pose_csv(path: &Path) -> Result<Vec<Pose>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut poses = Vec::new();
    // Records are numbered from 1, comment lines excluded.
    for (number, rec) in (1..).zip(rdr.records()) {
        let rec = rec.with_context(|| format!("failed to read {}", path.display()))?;
        if rec.len() < POSE_VECTOR_LEN + 1 {
            bail!(
                "{}: record {number} has {} columns, expected at least {}",
                path.display(),
                rec.len(),
                POSE_VECTOR_LEN + 1
            );
        }
        let values = rec
            .iter()
            .skip(1)
            .take(POSE_VECTOR_LEN)
            .enumerate()
            .map(|(k, field)| {
                field.parse::<Real>().with_context(|| {
                    format!("{}: record {number}, column {}", path.display(), k + 2)
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let pose = Pose::from_slice(&values)
            .with_context(|| format!("{}: record {number}", path.display()))?;
        poses.push(pose);
    }
    info!("read {} poses from {}", poses.len(), path.display());
    Ok(poses)
}

fn write_aligned_poses_csv(path: &Path, poses: &[Pose]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for (index, pose) in poses.iter().enumerate() {
        let [tx, ty, tz, qx, qy, qz, qw] = pose.to_pose_vector();
        wtr.serialize((index, tx, ty, tz, qx, qy, qz, qw))?;
    }
    wtr.flush()?;
    info!("wrote {} aligned poses to {}", poses.len(), path.display());
    Ok(())
}

fn load_input(args: &Args) -> Result<HandEyeInput> {
    let hand = match (&args.aligned_poses_b_h_csv_file, &args.aligned_poses_h_b_csv_file) {
        (Some(path), None) => HandPoses::BaseToHand(read_pose_csv(path)?),
        (None, Some(path)) => HandPoses::HandToBase(read_pose_csv(path)?),
        _ => bail!("exactly one of the hand pose files (B_H or H_B) must be given"),
    };
    let eye = match (&args.aligned_poses_w_e_csv_file, &args.aligned_poses_e_w_csv_file) {
        (Some(path), None) => EyePoses::WorldToEye(read_pose_csv(path)?),
        (None, Some(path)) => EyePoses::EyeToWorld(read_pose_csv(path)?),
        _ => bail!("exactly one of the eye pose files (W_E or E_W) must be given"),
    };
    Ok(HandEyeInput { hand, eye })
}

fn run_hand_eye_from_files(args: &Args) -> Result<HandEyeReport> {
    let input = load_input(args)?;
    let config = match &args.config {
        Some(path) => load_json_file::<HandEyeConfig>(path)?,
        None => HandEyeConfig::default(),
    };

    let report = run_hand_eye_calibration(&input, &config)?;
    if let Some(path) = &args.aligned_poses_out {
        write_aligned_poses_csv(path, &report.eye_path_in_hand_frame)?;
    }
    Ok(report)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = try_main() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let args = Args::parse();
    let report = run_hand_eye_from_files(&args)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
