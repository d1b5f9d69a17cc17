use crate::cost::{body_columns, Feature};
use crate::Error;
use image::{GrayImage, Luma};

/// Height of every glyph and of every band of the input image.
pub const CHAR_HEIGHT: u32 = 18;

/// Top rows of a glyph that are left out of matching.
pub const SKIP_ROWS: u32 = 2;

/// Widest glyph a dictionary may declare.
pub const MAX_GLYPH_WIDTH: u32 = 1024;

/// Character emitted for the blank filler.
pub const BLANK_CHAR: char = ' ';

const INK: Luma<u8> = Luma([0]);
const BACKGROUND: Luma<u8> = Luma([255]);

/// One dictionary entry: a character and its `CHAR_HEIGHT` x `width` bitmap.
///
/// The matching feature is computed once when the template is built.
#[derive(Debug, Clone)]
pub struct GlyphTemplate {
    ch: char,
    bitmap: GrayImage,
    feature: Feature,
}

impl GlyphTemplate {
    /// Build a template from dictionary rows, `1` is ink and anything else background.
    ///
    /// Rows shorter than `width` are padded with background, extra characters are ignored.
    pub fn from_rows<S: AsRef<str>>(ch: char, width: u32, rows: &[S]) -> GlyphTemplate {
        let mut bitmap = GrayImage::from_pixel(width, CHAR_HEIGHT, BACKGROUND);
        for (y, row) in rows.iter().take(CHAR_HEIGHT as usize).enumerate() {
            for (x, c) in row.as_ref().chars().take(width as usize).enumerate() {
                if c == '1' {
                    bitmap.put_pixel(x as u32, y as u32, INK);
                }
            }
        }
        GlyphTemplate::with_bitmap(ch, bitmap)
    }

    /// Build a template from a grayscale bitmap of height `CHAR_HEIGHT`.
    pub fn from_bitmap(ch: char, bitmap: GrayImage) -> Result<GlyphTemplate, Error> {
        let (width, height) = bitmap.dimensions();
        if height != CHAR_HEIGHT || width == 0 {
            return Err(Error::Shape {
                width,
                height,
                expected: CHAR_HEIGHT,
            });
        }
        Ok(GlyphTemplate::with_bitmap(ch, bitmap))
    }

    /// The all-background filler glyph.
    pub fn blank(width: u32) -> GlyphTemplate {
        let bitmap = GrayImage::from_pixel(width.max(1), CHAR_HEIGHT, BACKGROUND);
        GlyphTemplate::with_bitmap(BLANK_CHAR, bitmap)
    }

    fn with_bitmap(ch: char, bitmap: GrayImage) -> GlyphTemplate {
        let feature = Feature::from_body(&body_columns(&bitmap));
        GlyphTemplate {
            ch,
            bitmap,
            feature,
        }
    }

    pub fn ch(&self) -> char {
        self.ch
    }

    pub fn width(&self) -> usize {
        self.bitmap.width() as usize
    }

    pub fn bitmap(&self) -> &GrayImage {
        &self.bitmap
    }

    pub fn feature(&self) -> &Feature {
        &self.feature
    }

    pub fn mean(&self) -> f32 {
        self.feature.mean()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::BODY_ROWS;

    fn stripe_rows() -> Vec<&'static str> {
        vec!["010"; CHAR_HEIGHT as usize]
    }

    #[test]
    fn test_from_rows() {
        let glyph = GlyphTemplate::from_rows('|', 3, &stripe_rows());
        assert_eq!(glyph.ch(), '|');
        assert_eq!(glyph.width(), 3);
        assert_eq!(glyph.bitmap().get_pixel(0, 5)[0], 255);
        assert_eq!(glyph.bitmap().get_pixel(1, 5)[0], 0);
        assert_eq!(glyph.feature().len(), 3 * BODY_ROWS);
        assert!((glyph.mean() - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let rows = vec!["1"; CHAR_HEIGHT as usize];
        let glyph = GlyphTemplate::from_rows('[', 4, &rows);
        for y in 0..CHAR_HEIGHT {
            assert_eq!(glyph.bitmap().get_pixel(0, y)[0], 0);
            for x in 1..4 {
                assert_eq!(glyph.bitmap().get_pixel(x, y)[0], 255);
            }
        }
    }

    #[test]
    fn test_only_ones_are_ink() {
        let rows = vec!["x#2 1"; CHAR_HEIGHT as usize];
        let glyph = GlyphTemplate::from_rows('.', 5, &rows);
        let ink: Vec<u32> = (0..5)
            .filter(|&x| glyph.bitmap().get_pixel(x, 7)[0] == 0)
            .collect();
        assert_eq!(ink, vec![4]);
    }

    #[test]
    fn test_top_rows_do_not_affect_feature() {
        let mut rows = stripe_rows();
        rows[0] = "111";
        rows[1] = "101";
        let noisy = GlyphTemplate::from_rows('|', 3, &rows);
        let clean = GlyphTemplate::from_rows('|', 3, &stripe_rows());
        assert_eq!(noisy.feature(), clean.feature());
    }

    #[test]
    fn test_blank() {
        let blank = GlyphTemplate::blank(1);
        assert_eq!(blank.ch(), BLANK_CHAR);
        assert_eq!(blank.width(), 1);
        assert_eq!(blank.mean(), 1.0);
        assert_eq!(GlyphTemplate::blank(0).width(), 1);
    }

    #[test]
    fn test_from_bitmap_checks_height() {
        let bitmap = GrayImage::from_pixel(3, 10, Luma([255]));
        assert!(matches!(
            GlyphTemplate::from_bitmap('x', bitmap),
            Err(Error::Shape { height: 10, .. })
        ));
    }
}
