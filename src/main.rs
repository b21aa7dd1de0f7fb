use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use eframe::egui;

use stageview::app::StageViewApp;
use stageview::stage::{Direction, StageConfig};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Staged image viewer with bounded before/after navigation"
)]
struct Args {
    /// Image files to preload, one per stage in order
    #[arg(value_name = "IMAGE")]
    images: Vec<PathBuf>,

    /// Number of stages to step through
    #[arg(short, long, default_value_t = 2)]
    stages: i64,

    /// Label for a stage (repeat once per stage, in order)
    #[arg(short, long = "label", value_name = "LABEL")]
    labels: Vec<String>,

    /// Step declared by the back control (must be a negative integer)
    #[arg(long, default_value = "-1")]
    back_step: String,

    /// Step declared by the forward control (must be a positive integer)
    #[arg(long, default_value = "1")]
    forward_step: String,

    /// Cross-fade duration between stages, in seconds
    #[arg(long, default_value_t = 0.35)]
    fade_secs: f32,
}

fn stage_labels(given: &[String], stage_count: usize) -> Vec<String> {
    if !given.is_empty() {
        let mut labels: Vec<String> = given.iter().take(stage_count).cloned().collect();
        for idx in labels.len()..stage_count {
            labels.push(format!("Stage {}", idx + 1));
        }
        return labels;
    }
    if stage_count == 2 {
        return vec![String::from("Before"), String::from("After")];
    }
    (0..stage_count)
        .map(|idx| format!("Stage {}", idx + 1))
        .collect()
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = StageConfig::from_stage_count(args.stages)?;
    let back = Direction::parse(&args.back_step)?;
    let forward = Direction::parse(&args.forward_step)?;
    if !back.goes_back() {
        return Err(anyhow!("--back-step must be negative, got {}", back.delta()));
    }
    if forward.goes_back() {
        return Err(anyhow!(
            "--forward-step must be positive, got {}",
            forward.delta()
        ));
    }
    if args.images.len() > config.stage_count() {
        return Err(anyhow!(
            "{} images given but only {} stage(s) configured",
            args.images.len(),
            config.stage_count()
        ));
    }
    if !(0.0..=10.0).contains(&args.fade_secs) {
        return Err(anyhow!("--fade-secs must be between 0 and 10"));
    }

    let labels = stage_labels(&args.labels, config.stage_count());
    let images = args.images;
    let fade_secs = args.fade_secs;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(egui::vec2(1100.0, 750.0)),
        ..Default::default()
    };

    eframe::run_native(
        "stageview",
        native_options,
        Box::new(move |cc| {
            let app = StageViewApp::new(cc, config, labels, images, back, forward, fade_secs)?;
            Ok(Box::new(app) as Box<dyn eframe::App>)
        }),
    )?;

    Ok(())
}
