use anyhow::{Context, Result};
use glyph_art::{EdgeDetector, CHAR_HEIGHT};

fn run() -> Result<()> {
    let path = std::env::args().nth(1).expect("Usage: edges IMAGE [SIGMA]");
    let sigma = match std::env::args().nth(2) {
        Some(s) => s.parse().with_context(|| format!("Invalid sigma {}", s))?,
        None => EdgeDetector::default().gaussian_sigma,
    };
    let edges = EdgeDetector::new(sigma).open(&path, 800)?;
    eprintln!(
        "{}x{} edge image, {} text rows",
        edges.width(),
        edges.height(),
        edges.height() / CHAR_HEIGHT
    );
    edges.save("edges.png")?;
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:?}", err);
    }
}
