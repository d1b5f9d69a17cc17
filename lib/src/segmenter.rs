use crate::cost::MatchParams;
use crate::dictionary::Dictionary;
use crate::glyph::GlyphTemplate;
use crate::table::CostTable;
use crate::Error;

/// What fills a span of the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// The one column blank filler
    Blank,
    /// Index into [Dictionary::glyphs]
    Glyph(usize),
}

impl Choice {
    /// The template this choice refers to.
    ///
    /// # Errors
    /// [Error::InvariantViolation] if the glyph index is not in `dictionary`, which
    /// happens when the cost table was built against another dictionary
    pub fn glyph<'d>(&self, dictionary: &'d Dictionary) -> Result<&'d GlyphTemplate, Error> {
        match *self {
            Choice::Blank => Ok(dictionary.blank()),
            Choice::Glyph(index) => dictionary.get(index).ok_or_else(|| {
                Error::InvariantViolation(format!(
                    "glyph {} is not in a dictionary of {}",
                    index,
                    dictionary.len()
                ))
            }),
        }
    }
}

/// One tile of a segmented row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    /// First column covered
    pub x: usize,
    pub width: usize,
    pub choice: Choice,
    /// Cost of this tile alone
    pub cost: f32,
}

/// A gapless left-to-right tiling of a row.
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation {
    spans: Vec<Span>,
    total_cost: f32,
}

impl Segmentation {
    pub(crate) fn new(spans: Vec<Span>, total_cost: f32) -> Segmentation {
        Segmentation { spans, total_cost }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn total_cost(&self) -> f32 {
        self.total_cost
    }

    /// Number of columns covered, equal to the row width.
    pub fn width(&self) -> usize {
        self.spans.iter().map(|s| s.width).sum()
    }

    pub fn glyphs<'a>(
        &'a self,
        dictionary: &'a Dictionary,
    ) -> impl Iterator<Item = Result<&'a GlyphTemplate, Error>> + 'a {
        self.spans.iter().map(move |s| s.choice.glyph(dictionary))
    }
}

/// Cost of a table entry, rejecting values no cost model can produce.
pub(crate) fn edge_cost(cost: f32, x: usize, width: usize) -> Result<f32, Error> {
    if cost.is_nan() || cost < 0.0 {
        return Err(Error::InvariantViolation(format!(
            "cost table holds {} at column {} for width {}",
            cost, x, width
        )));
    }
    Ok(cost)
}

/// Find the cheapest tiling of the row described by `table`.
///
/// Columns `0..=W` are the nodes of a DAG. Every table entry `(x, w)` is an edge
/// `x -> x + w` and every column has a fallback edge `x -> x + 1` priced at
/// `params.fallback_penalty`, so a tiling always exists. Costs to reach the row end are
/// resolved from the right. At each column the fallback is the first candidate and
/// only a strictly cheaper glyph replaces it; between widths the one listed first in
/// the table wins a tie.
///
/// # Errors
/// * [Error::InvalidParameter] for a negative or non-finite fallback penalty
/// * [Error::InvariantViolation] for NaN or negative table costs
pub fn segment(table: &CostTable, params: &MatchParams) -> Result<Segmentation, Error> {
    params.validate()?;
    let width = table.row_width();
    let fallback = params.fallback_penalty;
    let unreached = |x: usize| {
        Error::InvariantViolation(format!("column {} has no path to the row end", x))
    };

    let mut best_cost: Vec<Option<f32>> = vec![None; width + 1];
    let mut best_choice: Vec<Option<Span>> = vec![None; width];
    best_cost[width] = Some(0.0);

    for x in (0..width).rev() {
        let mut total = best_cost[x + 1].ok_or_else(|| unreached(x + 1))? + fallback;
        let mut choice = Span {
            x,
            width: 1,
            choice: Choice::Blank,
            cost: fallback,
        };
        for entry in table.entries() {
            let w = entry.width();
            if w == 0 || x + w > width {
                continue;
            }
            let m = match entry.get(x) {
                Some(m) => m,
                None => continue,
            };
            let cost = edge_cost(m.cost, x, w)?;
            let candidate = cost + best_cost[x + w].ok_or_else(|| unreached(x + w))?;
            if candidate < total {
                total = candidate;
                choice = Span {
                    x,
                    width: w,
                    choice: Choice::Glyph(m.glyph),
                    cost,
                };
            }
        }
        best_cost[x] = Some(total);
        best_choice[x] = Some(choice);
    }

    let mut spans = Vec::new();
    let mut x = 0;
    while x < width {
        let span = best_choice[x].ok_or_else(|| unreached(x))?;
        spans.push(span);
        x += span.width.max(1);
    }
    if x != width {
        return Err(Error::InvariantViolation(format!(
            "segmentation ends at column {} of {}",
            x, width
        )));
    }
    let total_cost = best_cost[0].ok_or_else(|| unreached(0))?;
    Ok(Segmentation::new(spans, total_cost))
}
