//! # lottie-animator
//!
//! Evaluates a Lottie animation through the animator node graph and prints
//! the resulting drawing parameters.
//!
//! ## Commands
//! - `render`: evaluate a frame range and print one JSON line per frame
//! - `keypaths`: list every overridable property keypath
//! - `info`: show frame range, markers and node counts

mod overrides;
mod report;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lottie_core::LottiePlayer;
use lottie_data::model::LottieJson;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "lottie-animator")]
#[command(about = "Frame-driven evaluator for keyframed vector animations")]
#[command(version)]
struct Cli {
    /// Animation JSON file
    #[arg(short, long, env = "LOTTIE_FILE")]
    file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a frame range and print render outputs as JSON lines
    Render {
        /// First frame (defaults to the animation in-point)
        #[arg(long, env = "LOTTIE_START")]
        start: Option<f32>,

        /// Last frame, inclusive (defaults to the animation out-point)
        #[arg(long, env = "LOTTIE_END")]
        end: Option<f32>,

        /// Frame increment
        #[arg(long, default_value = "1.0", env = "LOTTIE_STEP")]
        step: f32,

        /// Start from a named marker instead of --start/--end
        #[arg(long, conflicts_with_all = ["start", "end"])]
        marker: Option<String>,

        /// Property overrides in KEYPATH=VALUE format, VALUE being JSON
        #[arg(short, long = "set")]
        set: Vec<String>,

        /// Only print nodes rebuilt during each frame
        #[arg(long)]
        changed_only: bool,
    },

    /// List every overridable property keypath
    Keypaths {
        /// Filter pattern (optional)
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Show animation summary
    Info,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("lottie_animator=info,lottie_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let model = load_model(&cli.file)?;

    match cli.command {
        Commands::Render {
            start,
            end,
            step,
            marker,
            set,
            changed_only,
        } => {
            let mut player = LottiePlayer::from_model(&model)?;
            overrides::apply_all(&mut player.graph, &set)?;
            let (start, end) = match marker {
                Some(name) => player
                    .marker_range(&name)
                    .with_context(|| format!("no marker named '{name}'"))?,
                None => (
                    start.unwrap_or(player.in_point),
                    end.unwrap_or(player.out_point),
                ),
            };
            cmd_render(&mut player, start, end, step, changed_only)
        }
        Commands::Keypaths { filter } => {
            let player = LottiePlayer::from_model(&model)?;
            report::print_keypaths(&player.graph, filter.as_deref());
            Ok(())
        }
        Commands::Info => {
            let player = LottiePlayer::from_model(&model)?;
            report::print_info(&model, &player);
            Ok(())
        }
    }
}

fn load_model(path: &Path) -> Result<LottieJson> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let model = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    tracing::info!("Loaded animation: {}", path.display());
    Ok(model)
}

fn cmd_render(
    player: &mut LottiePlayer,
    start: f32,
    end: f32,
    step: f32,
    changed_only: bool,
) -> Result<()> {
    anyhow::ensure!(step > 0.0, "--step must be positive, got {step}");
    anyhow::ensure!(end >= start, "end frame {end} is before start frame {start}");

    let frames = frame_count(start, end, step);
    let mut total_rebuilt = 0;
    for i in 0..frames {
        player.set_frame((start + i as f32 * step).min(end));
        let stats = player.update();
        total_rebuilt += stats.rebuilt;
        report::print_frame(&player.graph, player.current_frame, stats, changed_only)?;
    }

    tracing::info!(
        "Evaluated {} frames, {} node rebuilds",
        frames,
        total_rebuilt
    );
    Ok(())
}

/// Number of frames in `start..=end` at `step`. A frame that lands within
/// float error of `end` is kept.
fn frame_count(start: f32, end: f32, step: f32) -> u64 {
    let span = (end - start) / step;
    (span + 1e-4 * span.max(1.0)).floor() as u64 + 1
}
