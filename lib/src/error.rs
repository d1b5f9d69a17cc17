use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The first line of a dictionary is not a glyph count
    #[error("Invalid glyph count {0:?}")]
    InvalidCount(String),
    /// Malformed dictionary entry, `index` counts glyphs from 0
    #[error("Malformed glyph {index}: {issue}")]
    Format { index: usize, issue: FormatIssue },
    #[error("Row block is {width}x{height}, expected height {expected} and a non-zero width")]
    Shape { width: u32, height: u32, expected: u32 },
    /// A bug in the cost model or the segmenter, never a user error
    #[error("Internal invariant violated: {0}")]
    InvariantViolation(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Conversion cancelled")]
    Cancelled,
    /// Error reading a dictionary
    #[error("Dictionary could not be read")]
    DictionaryReadError(#[from] io::Error),
    /// Error decoding image
    #[error("Image {path} could not be decoded")]
    ImageError {
        path: String,
        source: image::error::ImageError,
    },
    #[error("Image could not be decoded")]
    ImageDecode(#[from] image::error::ImageError),
}

/// What is wrong with a single dictionary entry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatIssue {
    #[error("missing character line")]
    MissingChar,
    #[error("missing width line")]
    MissingWidth,
    #[error("width {0:?} is not a positive integer")]
    InvalidWidth(String),
    #[error("bitmap has only {rows} rows")]
    TruncatedBitmap { rows: usize },
    #[error("data found after the last declared glyph")]
    TrailingData,
}
