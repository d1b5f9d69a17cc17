use anyhow::Result;
use glyph_art::{Converter, Dictionary, EdgeDetector};

fn main() -> Result<()> {
    let dictionary = Dictionary::open("glyphs.txt")?;
    let edges = EdgeDetector::default().open("images/photo.png", 800)?;
    let text = Converter::new(&dictionary).text(&edges)?;
    println!("{}", text);
    Ok(())
}
