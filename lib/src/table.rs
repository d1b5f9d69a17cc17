use crate::cost::{body_columns, checked_cost, Feature, MatchParams, BODY_ROWS};
use crate::dictionary::Dictionary;
use crate::glyph::CHAR_HEIGHT;
use crate::Error;
use image::{GenericImageView, Luma};
use log::trace;

/// One `CHAR_HEIGHT` pixel band of the input image, ready for window extraction.
#[derive(Debug, Clone)]
pub struct RowBlock {
    body: Vec<f32>,
    width: usize,
}

impl RowBlock {
    /// Take the matched rows of `band`, which must be exactly `CHAR_HEIGHT` high and
    /// at least one column wide.
    pub fn new<I>(band: &I) -> Result<RowBlock, Error>
    where
        I: GenericImageView<Pixel = Luma<u8>>,
    {
        let (width, height) = band.dimensions();
        if height != CHAR_HEIGHT || width == 0 {
            return Err(Error::Shape {
                width,
                height,
                expected: CHAR_HEIGHT,
            });
        }
        Ok(RowBlock {
            body: body_columns(band),
            width: width as usize,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// The window of `width` columns starting at column `x`.
    pub fn window(&self, x: usize, width: usize) -> &[f32] {
        &self.body[x * BODY_ROWS..(x + width) * BODY_ROWS]
    }
}

/// Best glyph for one start column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    /// Index into [Dictionary::glyphs]
    pub glyph: usize,
    pub cost: f32,
}

/// Best matches of one glyph width, indexed by start column.
#[derive(Debug, Clone, PartialEq)]
pub struct WidthCosts {
    width: usize,
    matches: Vec<Match>,
}

impl WidthCosts {
    pub fn new(width: usize, matches: Vec<Match>) -> WidthCosts {
        WidthCosts { width, matches }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// Best match for a glyph starting at column `x`, if one fits there.
    pub fn get(&self, x: usize) -> Option<&Match> {
        self.matches.get(x)
    }
}

/// Per-width best matches for every start column of one row.
#[derive(Debug, Clone, PartialEq)]
pub struct CostTable {
    row_width: usize,
    entries: Vec<WidthCosts>,
}

impl CostTable {
    pub fn new(row_width: usize, entries: Vec<WidthCosts>) -> CostTable {
        CostTable { row_width, entries }
    }

    /// Match every glyph of the dictionary against every window of the row.
    ///
    /// Windows are normalized once per width, then each glyph of that width is scored
    /// against all of them. A glyph replaces the current best only with a strictly
    /// lower cost, so the earliest declared glyph wins ties. Widths larger than the row
    /// are left out.
    ///
    /// # Errors
    /// [Error::InvariantViolation] if the cost model yields NaN or a negative cost.
    pub fn build(
        row: &RowBlock,
        dictionary: &Dictionary,
        params: &MatchParams,
    ) -> Result<CostTable, Error> {
        let mut entries = Vec::with_capacity(dictionary.groups().len());
        for group in dictionary.groups() {
            let width = group.width();
            if width > row.width() {
                trace!("width {} does not fit in row of {}", width, row.width());
                continue;
            }
            let positions = row.width() - width + 1;
            let windows: Vec<Feature> = (0..positions)
                .map(|x| Feature::from_body(row.window(x, width)))
                .collect();

            let mut best: Vec<Option<Match>> = vec![None; positions];
            for &index in group.members() {
                let glyph = dictionary.glyph(index).feature();
                for (x, (window, slot)) in windows.iter().zip(best.iter_mut()).enumerate() {
                    let cost = checked_cost(params.cost(window, glyph), x, width)?;
                    match slot {
                        Some(current) if cost >= current.cost => {}
                        _ => *slot = Some(Match { glyph: index, cost }),
                    }
                }
            }

            let matches = best
                .into_iter()
                .enumerate()
                .map(|(x, m)| {
                    m.ok_or_else(|| {
                        Error::InvariantViolation(format!(
                            "no glyph scored at column {} for width {}",
                            x, width
                        ))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            trace!(
                "width {}: {} glyphs over {} positions",
                width,
                group.members().len(),
                positions
            );
            entries.push(WidthCosts { width, matches });
        }
        Ok(CostTable {
            row_width: row.width(),
            entries,
        })
    }

    pub fn row_width(&self) -> usize {
        self.row_width
    }

    /// Widths in dictionary group order.
    pub fn entries(&self) -> &[WidthCosts] {
        &self.entries
    }

    pub fn get(&self, width: usize) -> Option<&WidthCosts> {
        self.entries.iter().find(|e| e.width == width)
    }
}
