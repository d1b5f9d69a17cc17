use anyhow::{Context, Result};
use clap::Parser;
use glyph_art::{to_html, Converter, Dictionary, EdgeDetector, MatchParams};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

/// Generate text art from an image
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Path to the input image
    image: PathBuf,
    /// Path to the glyph dictionary
    #[arg(long)]
    dictionary: PathBuf,
    /// Path to the output HTML file (defaults to <image>.html)
    #[arg(long)]
    output_html: Option<PathBuf>,
    /// Optional path for plain text output
    #[arg(long)]
    output_text: Option<PathBuf>,
    /// Resize the longer edge of the input before processing
    #[arg(long, default_value_t = 800)]
    max_size: u32,
    /// Gaussian blur radius applied during edge detection
    #[arg(long, default_value_t = 1.2)]
    gaussian_radius: f32,
    /// Weight of the ink density difference in the match cost
    #[arg(long, default_value_t = MatchParams::default().density_weight)]
    density_weight: f32,
    /// Cost of skipping one column with a blank
    #[arg(long, default_value_t = MatchParams::default().fallback_penalty)]
    fallback_penalty: f32,
}

fn run() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let t0 = Instant::now();
    let dictionary = Dictionary::open(&args.dictionary)
        .with_context(|| format!("Failed to load {}", args.dictionary.display()))?;
    let edges = EdgeDetector::new(args.gaussian_radius).open(&args.image, args.max_size)?;
    let params = MatchParams::default()
        .with_density_weight(args.density_weight)
        .with_fallback_penalty(args.fallback_penalty);
    let lines = Converter::new(&dictionary)
        .with_params(params)
        .text_lines(&edges)?;
    eprintln!("converted {} rows in {:?}", lines.len(), t0.elapsed());

    let output_html = match args.output_html {
        Some(path) => path,
        None => args.image.with_extension("html"),
    };
    fs::write(&output_html, to_html(&lines))
        .with_context(|| format!("Failed to write {}", output_html.display()))?;

    if let Some(path) = args.output_text {
        fs::write(&path, lines.join("\n"))
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:?}", err);
        std::process::exit(1);
    }
}
