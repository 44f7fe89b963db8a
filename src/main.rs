//! Swing Analyzer - Throw Trajectory Analysis
//!
//! Analyzes exported throw trajectories offline: turning points, revolution
//! segments and angle statistics.

use swing_analyzer::app::cli::{Cli, Commands, ConfigAction};
use swing_analyzer::config::TrackingConfig;
use swing_analyzer::revolution::{build_ellipses, EllipseStatistics};
use swing_analyzer::types::Trajectory;
use swing_analyzer::TurningPointDetector;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments first so we can use --verbose to set log level
    let cli = Cli::parse_args();

    // Initialize tracing (--verbose enables debug-level output)
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    // Load config
    let config = if let Some(path) = &cli.config {
        TrackingConfig::load(path)?
    } else {
        TrackingConfig::load_default()?
    };

    match cli.command {
        Commands::Analyze {
            input,
            duration,
            frame_rate,
            json,
        } => {
            run_analyze(&input, duration, frame_rate, json, &config)?;
        }
        Commands::Config { action } => {
            run_config(action, &config)?;
        }
    }

    Ok(())
}

fn run_analyze(
    input: &std::path::Path,
    duration: Option<f64>,
    frame_rate: f64,
    json: bool,
    config: &TrackingConfig,
) -> anyhow::Result<()> {
    if !input.exists() {
        anyhow::bail!("Trajectory file not found: {:?}", input);
    }

    let is_csv = input
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    let trajectory = if is_csv {
        Trajectory::load_csv(input, frame_rate)?
    } else {
        Trajectory::load(input)?
    };

    info!(
        samples = trajectory.len(),
        duration_secs = trajectory.duration_secs(),
        "loaded trajectory from {:?}",
        input
    );

    let detector = TurningPointDetector::new(config.clone());
    let detection = detector.detect_with_duration(&trajectory, duration);

    if json {
        println!("{}", serde_json::to_string_pretty(&detection)?);
        return Ok(());
    }

    println!("Detection ({:?})", detection.strategy);
    println!("  Turning points: {}", detection.turning_points.len());
    for (i, tp) in detection.turning_points.iter().enumerate() {
        println!(
            "  TP{}: frame {} ({:.3}, {:.3}) {}",
            i,
            tp.frame_index,
            tp.point.x,
            tp.point.y,
            if tp.is_maximum { "MAX" } else { "MIN" }
        );
    }

    for warning in &detection.warnings {
        println!("  Warning: {:?}", warning);
    }

    let ellipses = build_ellipses(&detection.turning_points, &trajectory);
    if ellipses.is_empty() {
        println!("No revolutions detected.");
        return Ok(());
    }

    println!("\nRevolutions: {}", ellipses.len());
    for ellipse in &ellipses {
        let direction = if ellipse.tilt_angle > 0.0 { "left" } else { "right" };
        println!(
            "  Revolution {}: frames {}..={}, tilt {:.2} deg ({})",
            ellipse.number, ellipse.first_frame, ellipse.last_frame, ellipse.tilt_angle, direction
        );
    }

    let stats = EllipseStatistics::from_ellipses(&ellipses, &trajectory);
    println!("\nStatistics");
    println!("  Average width:    {:.3}", stats.average_width);
    println!("  Average height:   {:.3}", stats.average_height);
    println!("  Average duration: {:.2} s", stats.average_duration_secs);
    println!("  Average tilt:     {:.2} deg", stats.average_tilt_angle);
    println!("  Consistency:      {:.2}", stats.consistency_score);

    Ok(())
}

fn run_config(action: ConfigAction, config: &TrackingConfig) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            println!("Configuration ({:?}):\n", TrackingConfig::default_path());
            println!("{}", config.to_toml()?);
        }
        ConfigAction::Init { force } => {
            let config_path = TrackingConfig::default_path();

            if config_path.exists() && !force {
                anyhow::bail!(
                    "Config already exists at {:?}. Use --force to overwrite.",
                    config_path
                );
            }

            config.save_default()?;
            println!("Created config at {:?}", config_path);
            println!("\nConfig content:\n{}", config.to_toml()?);
        }
    }

    Ok(())
}
