use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use lktrack_core::frame::Rect;
use lktrack_core::track::track_configured;
use rayon::prelude::*;

use super::TrackingArgs;
use crate::io::load_frame;
use crate::summary::{print_config_summary, print_motion};

#[derive(Args)]
pub struct PairArgs {
    /// Template image
    pub template: PathBuf,

    /// Target image
    pub target: PathBuf,

    /// Rectangle to track as x1,y1,x2,y2 (repeatable)
    #[arg(long = "rect", required = true, allow_hyphen_values = true)]
    pub rects: Vec<Rect>,

    #[command(flatten)]
    pub tracking: TrackingArgs,
}

pub fn run(args: &PairArgs) -> Result<()> {
    let config = args.tracking.resolve()?;
    let template = load_frame(&args.template, 0)?;
    let target = load_frame(&args.target, 1)?;

    print_config_summary(&config, 2, args.rects.len());

    let motions = args
        .rects
        .par_iter()
        .map(|rect| {
            track_configured(&template.data, &target.data, rect, &config)
                .with_context(|| format!("Tracking failed for rect {rect}"))
        })
        .collect::<Result<Vec<_>>>()?;

    for (rect, motion) in args.rects.iter().zip(&motions) {
        print_motion(rect, motion);
    }

    Ok(())
}
