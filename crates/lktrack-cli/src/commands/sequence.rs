use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use lktrack_core::config::TrackingConfig;
use lktrack_core::frame::Rect;
use lktrack_core::track::track_configured;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::TrackingArgs;
use crate::io::{list_images, load_frame};
use crate::summary::print_config_summary;

#[derive(Args)]
pub struct SequenceArgs {
    /// Directory of frames, tracked in file-name order
    pub dir: PathBuf,

    /// Rectangle in the first frame as x1,y1,x2,y2 (repeatable)
    #[arg(long = "rect", required = true, allow_hyphen_values = true)]
    pub rects: Vec<Rect>,

    #[command(flatten)]
    pub tracking: TrackingArgs,

    /// Save the per-frame rectangles as TOML
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Rectangles of one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameTrack {
    pub index: usize,
    pub file: String,
    pub rects: Vec<Rect>,
}

/// Result of tracking a whole sequence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackReport {
    pub method: String,
    pub frames: Vec<FrameTrack>,
}

pub fn run(args: &SequenceArgs) -> Result<()> {
    let config = args.tracking.resolve()?;
    let paths = list_images(&args.dir)?;
    if paths.len() < 2 {
        bail!(
            "Need at least two images in {}, found {}",
            args.dir.display(),
            paths.len()
        );
    }

    print_config_summary(&config, paths.len(), args.rects.len());

    let pb = ProgressBar::new(paths.len() as u64 - 1);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    pb.set_message("Tracking");

    let report = track_sequence(&paths, &args.rects, &config, |done| {
        pb.set_position(done as u64);
    })?;
    pb.finish_with_message("Done");

    if let Some(ref path) = args.output {
        let toml_str = toml::to_string_pretty(&report)?;
        std::fs::write(path, toml_str)
            .with_context(|| format!("Failed to write track to {}", path.display()))?;
        println!("\nTrack saved to {}", path.display());
    } else {
        print_report(&report);
    }

    Ok(())
}

/// Track `rects` frame to frame through `paths`; each rectangle is moved
/// by its estimated motion before the next pair is tracked.
pub fn track_sequence<F>(
    paths: &[PathBuf],
    rects: &[Rect],
    config: &TrackingConfig,
    mut on_pair: F,
) -> Result<TrackReport>
where
    F: FnMut(usize),
{
    let Some(first) = paths.first() else {
        bail!("No frames to track");
    };

    let mut template = load_frame(first, 0)?;
    let mut current = rects.to_vec();
    let mut frames = vec![FrameTrack {
        index: template.index,
        file: file_name(first),
        rects: current.clone(),
    }];

    for (i, path) in paths.iter().enumerate().skip(1) {
        let target = load_frame(path, i)?;

        current = current
            .par_iter()
            .map(|rect| {
                track_configured(&template.data, &target.data, rect, config)
                    .map(|motion| motion.apply_to_rect(rect))
                    .with_context(|| {
                        format!(
                            "Frames {} -> {}: tracking failed for rect {rect}",
                            template.index, target.index
                        )
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            from = template.index,
            to = target.index,
            file = %path.display(),
            rects = current.len(),
            "frame tracked"
        );
        frames.push(FrameTrack {
            index: target.index,
            file: file_name(path),
            rects: current.clone(),
        });
        on_pair(target.index);
        template = target;
    }

    Ok(TrackReport {
        method: config.method.to_string(),
        frames,
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_report(report: &TrackReport) {
    println!("\n{:>5}  {:<24}  Rectangles", "Frame", "File");
    println!("{}", "-".repeat(60));
    for frame in &report.frames {
        let rects: Vec<String> = frame.rects.iter().map(|r| r.to_string()).collect();
        println!(
            "{:>5}  {:<24}  {}",
            frame.index,
            frame.file,
            rects.join("  ")
        );
    }
}
