use crate::dictionary::Dictionary;
use crate::segmenter::Segmentation;
use crate::Error;

/// Full-width space that starts every line.
pub const LEADING_SPACE: char = '\u{3000}';

// Applied in order. Renderers collapse runs of ASCII spaces, and the two bigrams
// render as a doubled stroke in the reference font.
const FIXUPS: &[(&str, &str)] = &[("  ", "\u{3000}"), ("l!", "|."), ("j!", "\u{ff5d}")];

/// Turn a segmented row into its text line.
///
/// # Errors
/// [Error::InvariantViolation] if a span names a glyph `dictionary` does not have
pub fn assemble_line(
    segmentation: &Segmentation,
    dictionary: &Dictionary,
) -> Result<String, Error> {
    let mut text = String::with_capacity(segmentation.spans().len() + 3);
    text.push(LEADING_SPACE);
    for glyph in segmentation.glyphs(dictionary) {
        text.push(glyph?.ch());
    }
    Ok(apply_fixups(&text))
}

/// Typographic substitutions for a raw line.
pub fn apply_fixups(text: &str) -> String {
    FIXUPS
        .iter()
        .fold(text.to_string(), |line, (from, to)| line.replace(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmenter::{Choice, Span};

    #[test]
    fn test_apply_fixups() {
        assert_eq!(apply_fixups("a  b"), "a\u{3000}b");
        assert_eq!(apply_fixups("   "), "\u{3000} ");
        assert_eq!(apply_fixups("    "), "\u{3000}\u{3000}");
        assert_eq!(apply_fixups("xl!y"), "x|.y");
        assert_eq!(apply_fixups("j!"), "\u{ff5d}");
        assert_eq!(apply_fixups("lj!!"), "l\u{ff5d}!");
        assert_eq!(apply_fixups("plain"), "plain");
    }

    #[test]
    fn test_assemble_line() {
        let dict = Dictionary::parse(&crate::dictionary::tests::source(&[
            ("l", "2", "10"),
            ("!", "1", "1"),
        ]))
        .unwrap();
        let span = |x, width, choice| Span {
            x,
            width,
            choice,
            cost: 0.0,
        };
        let seg = Segmentation::new(
            vec![
                span(0, 2, Choice::Glyph(0)),
                span(2, 1, Choice::Glyph(1)),
                span(3, 1, Choice::Blank),
                span(4, 1, Choice::Blank),
                span(5, 1, Choice::Glyph(1)),
            ],
            0.2,
        );
        assert_eq!(assemble_line(&seg, &dict).unwrap(), "\u{3000}|.\u{3000}!");
    }

    #[test]
    fn test_empty_row() {
        let dict = Dictionary::parse("0").unwrap();
        let seg = Segmentation::new(Vec::new(), 0.0);
        assert_eq!(assemble_line(&seg, &dict).unwrap(), "\u{3000}");
    }

    #[test]
    fn test_glyph_from_another_dictionary() {
        let dict = Dictionary::parse("0").unwrap();
        let seg = Segmentation::new(
            vec![Span {
                x: 0,
                width: 2,
                choice: Choice::Glyph(42),
                cost: 0.0,
            }],
            0.0,
        );
        assert!(matches!(
            assemble_line(&seg, &dict),
            Err(Error::InvariantViolation(_))
        ));
    }
}
