use crate::error::{Error, FormatIssue};
use crate::glyph::{GlyphTemplate, CHAR_HEIGHT, MAX_GLYPH_WIDTH};
use log::debug;
use std::fs;
use std::io::BufRead;
use std::path::Path;

/// Indices of the glyphs that share one width, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct WidthGroup {
    width: usize,
    members: Vec<usize>,
}

impl WidthGroup {
    pub fn width(&self) -> usize {
        self.width
    }

    /// Indices into [Dictionary::glyphs]
    pub fn members(&self) -> &[usize] {
        &self.members
    }
}

/// The glyph alphabet, immutable once loaded.
///
/// Groups are ordered by the first appearance of each width in the source. Both the
/// group order and the member order decide ties during matching.
#[derive(Debug, Clone)]
pub struct Dictionary {
    glyphs: Vec<GlyphTemplate>,
    groups: Vec<WidthGroup>,
    blank: GlyphTemplate,
}

impl Dictionary {
    pub fn new(glyphs: Vec<GlyphTemplate>) -> Dictionary {
        let mut groups: Vec<WidthGroup> = Vec::new();
        for (index, glyph) in glyphs.iter().enumerate() {
            match groups.iter_mut().find(|g| g.width == glyph.width()) {
                Some(group) => group.members.push(index),
                None => groups.push(WidthGroup {
                    width: glyph.width(),
                    members: vec![index],
                }),
            }
        }
        debug!(
            "dictionary with {} glyphs in {} width groups",
            glyphs.len(),
            groups.len()
        );
        Dictionary {
            glyphs,
            groups,
            blank: GlyphTemplate::blank(1),
        }
    }

    /// Parse the line oriented dictionary format.
    ///
    /// ```text
    /// N                  glyph count
    /// c                  character line, only the first character is used
    /// w                  width in columns, 1 to MAX_GLYPH_WIDTH
    /// 0100...            CHAR_HEIGHT bitmap rows, `1` is ink
    /// ```
    /// The character, width and bitmap block repeats `N` times. Blank lines before a
    /// character line are skipped.
    ///
    /// # Errors
    /// * [Error::InvalidCount] when the first line is not a count
    /// * [Error::Format] naming the glyph that is incomplete or malformed, or glyph `N`
    ///   when data follows the last declared glyph
    pub fn parse(source: &str) -> Result<Dictionary, Error> {
        let mut lines = source.lines();
        let count_line = lines.next().unwrap_or("");
        let count: usize = count_line
            .trim()
            .parse()
            .map_err(|_| Error::InvalidCount(count_line.to_string()))?;

        let mut glyphs = Vec::with_capacity(count);
        for index in 0..count {
            let fail = |issue| Error::Format { index, issue };
            let ch = lines
                .by_ref()
                .find(|line| !line.is_empty())
                .and_then(|line| line.chars().next())
                .ok_or_else(|| fail(FormatIssue::MissingChar))?;

            let width_line = lines
                .next()
                .ok_or_else(|| fail(FormatIssue::MissingWidth))?
                .trim();
            let width = match width_line.parse::<u32>() {
                Ok(width) if width > 0 && width <= MAX_GLYPH_WIDTH => width,
                _ => return Err(fail(FormatIssue::InvalidWidth(width_line.to_string()))),
            };

            let rows: Vec<&str> = lines.by_ref().take(CHAR_HEIGHT as usize).collect();
            if rows.len() < CHAR_HEIGHT as usize {
                return Err(fail(FormatIssue::TruncatedBitmap { rows: rows.len() }));
            }
            glyphs.push(GlyphTemplate::from_rows(ch, width, &rows));
        }

        if lines.any(|line| !line.trim().is_empty()) {
            return Err(Error::Format {
                index: count,
                issue: FormatIssue::TrailingData,
            });
        }
        Ok(Dictionary::new(glyphs))
    }

    pub fn from_reader<R: BufRead>(mut reader: R) -> Result<Dictionary, Error> {
        let mut source = String::new();
        reader.read_to_string(&mut source)?;
        Dictionary::parse(&source)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Dictionary, Error> {
        let source = fs::read_to_string(path)?;
        Dictionary::parse(&source)
    }

    pub fn glyphs(&self) -> &[GlyphTemplate] {
        &self.glyphs
    }

    /// # Panics
    /// If `index` is out of range, see [get](Dictionary::get)
    pub fn glyph(&self, index: usize) -> &GlyphTemplate {
        &self.glyphs[index]
    }

    pub fn get(&self, index: usize) -> Option<&GlyphTemplate> {
        self.glyphs.get(index)
    }

    pub fn groups(&self) -> &[WidthGroup] {
        &self.groups
    }

    /// The width 1 filler used by the segmenter's fallback step.
    pub fn blank(&self) -> &GlyphTemplate {
        &self.blank
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}
