use clap::Parser;
use image::ImageReader;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use conefinder::detection::steps::*;
use conefinder::{AreaBounds, HsvRange, Pipeline, SideBounds};

#[derive(Parser)]
#[command(name = "conefinder")]
#[command(about = "Find a traffic cone in an image and report its center and orientation")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Save debug outputs to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Save the input image annotated with the detection
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the detection as JSON
    #[arg(long)]
    json: bool,

    /// Median filter radius (0 disables blurring)
    #[arg(long, default_value_t = 5)]
    blur_radius: u32,

    /// Lower HSV bound, hue in 0..180
    #[arg(long, value_name = "H,S,V", value_parser = parse_hsv, default_value = "18,0,0")]
    lower: [u8; 3],

    /// Upper HSV bound, hue in 0..180
    #[arg(long, value_name = "H,S,V", value_parser = parse_hsv, default_value = "20,250,255")]
    upper: [u8; 3],

    /// Contours must enclose strictly more than this many pixels
    #[arg(long, default_value_t = AreaBounds::default().min)]
    min_area: f64,

    /// Contours must enclose strictly fewer than this many pixels
    #[arg(long, default_value_t = AreaBounds::default().max)]
    max_area: f64,

    /// Minimum number of polygon sides (enables the side filter)
    #[arg(long, requires = "max_sides")]
    min_sides: Option<usize>,

    /// Maximum number of polygon sides (enables the side filter)
    #[arg(long, requires = "min_sides")]
    max_sides: Option<usize>,
}

fn parse_hsv(s: &str) -> Result<[u8; 3], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected H,S,V but got '{}'", s));
    }
    let mut hsv = [0u8; 3];
    for (slot, part) in hsv.iter_mut().zip(&parts) {
        *slot = part.parse().map_err(|e| format!("invalid component '{}': {}", part, e))?;
    }
    Ok(hsv)
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(path = ?args.image_path, "loading image");

    // Load image
    let img = ImageReader::open(&args.image_path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;

    tracing::info!(width = img.width(), height = img.height(), "image loaded");

    let side_bounds = match (args.min_sides, args.max_sides) {
        (Some(min), Some(max)) => Some(SideBounds::new(min, max)),
        _ => None,
    };

    // Build pipeline
    let mut pipeline = Pipeline::new()
        .add_step_boxed(Box::new(MedianBlurStep { radius: args.blur_radius }))
        .add_step_boxed(Box::new(HsvMaskStep {
            range: HsvRange::new(args.lower, args.upper),
        }))
        .add_step_boxed(Box::new(ConeAnalysisStep {
            area_bounds: AreaBounds::new(args.min_area, args.max_area),
            side_bounds,
        }));

    if args.output.is_some() || args.debug_out.is_some() {
        pipeline = pipeline.add_step_boxed(Box::new(AnnotateStep));
    }

    // Enable debug mode if requested
    if let Some(debug_dir) = args.debug_out {
        pipeline = pipeline.with_debug(debug_dir)?;
    }

    let results = pipeline.run(img)?;

    let Some(item) = results.first() else {
        if let Some(output) = &args.output {
            tracing::warn!(path = ?output, "no cone detected, annotated image not written");
        }
        if args.json {
            println!("null");
        } else {
            println!("No cone detected.");
        }
        return Ok(());
    };

    let detection = detection_from_metadata(item)
        .ok_or_else(|| anyhow::anyhow!("Cone analysis produced incomplete metadata"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&detection)?);
    } else {
        println!("=== Cone Detection ===");
        println!("Center:          ({}, {})", detection.center.x, detection.center.y);
        println!("Farthest point:  ({}, {})", detection.farthest_point.x, detection.farthest_point.y);
        println!("Orientation:     {:.1}°", detection.orientation);
        println!("Area:            {:.0} px²", detection.area);
    }

    if let Some(output) = args.output {
        item.image.save(&output)
            .map_err(|e| anyhow::anyhow!("Failed to save annotated image: {}", e))?;
        tracing::info!(path = ?output, "saved annotated image");
    }

    Ok(())
}
