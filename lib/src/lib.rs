//! Text art from edge images, built from a dictionary of variable-width glyphs
//!
//! The image is cut into bands of [CHAR_HEIGHT] rows. Each band is tiled left to right
//! with dictionary glyphs of any width, choosing the tiling with the lowest total
//! dissimilarity, and the chosen characters become one text line.
//!
//! # Basic usage
//! ```no_run
//! # use glyph_art::{Converter, Dictionary, EdgeDetector, Error};
//! let dictionary = Dictionary::open("glyphs.txt")?;
//! let edges = EdgeDetector::default().open("photo.png", 800)?;
//! let lines = Converter::new(&dictionary).text_lines(&edges)?;
//! for line in lines {
//!     println!("{}", line);
//! }
//! # Ok::<(), Error>(())
//! ```
//!
//! # Pipeline
//! 1. [Dictionary] parses the glyph templates once and groups them by width
//! 2. [CostTable] scores every glyph against every window of a band
//! 3. [segment] finds the cheapest gapless tiling, falling back to a one column blank
//! 4. [assemble_line] turns the tiling into text
//!
//! With the default `rayon` feature the bands of an image are processed in parallel.

mod converter;
mod cost;
mod dictionary;
mod edges;
mod error;
mod glyph;
pub mod graph;
mod html;
mod line;
mod segmenter;
mod table;

pub use converter::Converter;
pub use cost::{Feature, MatchParams, BODY_ROWS, COST_TOLERANCE, NORM_EPSILON};
pub use dictionary::{Dictionary, WidthGroup};
pub use edges::{remove_isolated, resize_to_max, EdgeDetector};
pub use error::{Error, FormatIssue};
pub use glyph::{GlyphTemplate, BLANK_CHAR, CHAR_HEIGHT, MAX_GLYPH_WIDTH, SKIP_ROWS};
pub use html::to_html;
pub use line::{apply_fixups, assemble_line, LEADING_SPACE};
pub use segmenter::{segment, Choice, Segmentation, Span};
pub use table::{CostTable, Match, RowBlock, WidthCosts};
