use crate::glyph::{CHAR_HEIGHT, SKIP_ROWS};
use crate::Error;
use image::{GenericImageView, Luma};

/// Added to every feature norm so blank glyphs and windows do not divide by zero.
pub const NORM_EPSILON: f32 = 1.0e-6;

/// Rounding slack below zero that a cost may show before it is treated as a defect.
pub const COST_TOLERANCE: f32 = 1.0e-4;

/// Number of rows per column that take part in matching.
pub const BODY_ROWS: usize = (CHAR_HEIGHT - SKIP_ROWS) as usize;

/// Tunable weights of the cost model and the segmenter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchParams {
    /// Weight of the mean intensity difference added to the shape cost
    pub density_weight: f32,
    /// Cost of advancing one column with the blank filler
    pub fallback_penalty: f32,
}

impl Default for MatchParams {
    fn default() -> Self {
        MatchParams {
            density_weight: 0.3,
            fallback_penalty: 0.1,
        }
    }
}

impl MatchParams {
    pub fn with_density_weight(mut self, density_weight: f32) -> Self {
        self.density_weight = density_weight;
        self
    }

    pub fn with_fallback_penalty(mut self, fallback_penalty: f32) -> Self {
        self.fallback_penalty = fallback_penalty;
        self
    }

    /// Both weights must be finite and non-negative, otherwise costs lose their ordering.
    pub fn validate(&self) -> Result<(), Error> {
        for (name, value) in [
            ("density_weight", self.density_weight),
            ("fallback_penalty", self.fallback_penalty),
        ]
        .iter()
        {
            if !value.is_finite() || *value < 0.0 {
                return Err(Error::InvalidParameter(format!("{} = {}", name, value)));
            }
        }
        Ok(())
    }

    /// Dissimilarity between an image window and a glyph of the same shape.
    ///
    /// `1 - cos(window, glyph) + density_weight * |mean(window) - mean(glyph)|`.
    /// Lower is better, an exact match is close to 0.
    pub fn cost(&self, window: &Feature, glyph: &Feature) -> f32 {
        1.0 - window.similarity(glyph) + self.density_weight * (window.mean - glyph.mean).abs()
    }
}

/// Mean-centered intensity vector of the matched region of a glyph or window.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    centered: Vec<f32>,
    norm: f32,
    mean: f32,
}

impl Feature {
    /// Build a feature from intensities in the 0..1 range.
    pub fn from_body(body: &[f32]) -> Feature {
        let count = body.len().max(1) as f32;
        let mean = body.iter().sum::<f32>() / count;
        let centered: Vec<f32> = body.iter().map(|v| v - mean).collect();
        let norm = centered.iter().map(|v| v * v).sum::<f32>().sqrt() + NORM_EPSILON;
        Feature {
            centered,
            norm,
            mean,
        }
    }

    pub fn centered(&self) -> &[f32] {
        &self.centered
    }

    pub fn norm(&self) -> f32 {
        self.norm
    }

    /// Mean intensity, 0 is all ink and 1 is all background.
    pub fn mean(&self) -> f32 {
        self.mean
    }

    pub fn len(&self) -> usize {
        self.centered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centered.is_empty()
    }

    /// Cosine similarity of the centered vectors, in [-1, 1].
    pub fn similarity(&self, other: &Feature) -> f32 {
        debug_assert_eq!(self.len(), other.len());
        let dot: f32 = self
            .centered
            .iter()
            .zip(other.centered.iter())
            .map(|(a, b)| a * b)
            .sum();
        dot / (self.norm * other.norm)
    }
}

/// Reject NaN and clearly negative costs, clamp rounding noise to 0.
pub(crate) fn checked_cost(cost: f32, x: usize, width: usize) -> Result<f32, Error> {
    if cost.is_nan() || cost < -COST_TOLERANCE {
        return Err(Error::InvariantViolation(format!(
            "cost {} at column {} for width {}",
            cost, x, width
        )));
    }
    Ok(cost.max(0.0))
}

/// Intensities of the matched rows, scaled to 0..1 and stored column by column.
///
/// Column-major order makes every window of a band a contiguous slice.
pub(crate) fn body_columns<I>(img: &I) -> Vec<f32>
where
    I: GenericImageView<Pixel = Luma<u8>>,
{
    let (width, height) = img.dimensions();
    let mut body = Vec::with_capacity(width as usize * BODY_ROWS);
    for x in 0..width {
        for y in SKIP_ROWS..height.min(CHAR_HEIGHT) {
            body.push(img.get_pixel(x, y)[0] as f32 / 255.0);
        }
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stripe(width: usize, ink: &[usize]) -> Vec<f32> {
        let mut body = Vec::new();
        for x in 0..width {
            let v = if ink.contains(&x) { 0.0 } else { 1.0 };
            body.extend(std::iter::repeat(v).take(BODY_ROWS));
        }
        body
    }

    #[test]
    fn test_self_match_is_near_zero() {
        let params = MatchParams::default();
        let glyph = Feature::from_body(&stripe(3, &[1]));
        let window = Feature::from_body(&stripe(3, &[1]));
        let cost = params.cost(&window, &glyph);
        assert!(cost.abs() < 1e-4, "cost {}", cost);
    }

    #[test]
    fn test_blank_window_has_zero_similarity() {
        let blank = Feature::from_body(&stripe(3, &[]));
        assert_eq!(blank.mean(), 1.0);
        assert!(blank.centered().iter().all(|&v| v == 0.0));
        assert!((blank.norm() - NORM_EPSILON).abs() < 1e-9);

        let glyph = Feature::from_body(&stripe(3, &[1]));
        let cost = MatchParams::default().cost(&blank, &glyph);
        let expected = 1.0 + 0.3 * (1.0 - glyph.mean());
        assert!((cost - expected).abs() < 1e-5, "{} != {}", cost, expected);
    }

    #[test]
    fn test_cost_is_non_negative() {
        let params = MatchParams::default();
        let patterns: Vec<Vec<usize>> = vec![
            vec![],
            vec![0],
            vec![1],
            vec![3],
            vec![0, 1],
            vec![1, 2, 3],
            vec![0, 2],
            vec![0, 1, 2, 3],
        ];
        for a in &patterns {
            for b in &patterns {
                let wa = Feature::from_body(&stripe(4, a));
                let wb = Feature::from_body(&stripe(4, b));
                let cost = params.cost(&wa, &wb);
                assert!(cost >= -COST_TOLERANCE, "{:?} vs {:?}: {}", a, b, cost);
            }
        }
    }

    #[test]
    fn test_density_penalty_separates_inverse_patterns() {
        // same correlation magnitude, different ink density
        let params = MatchParams::default();
        let sparse = Feature::from_body(&stripe(4, &[0]));
        let dense = Feature::from_body(&stripe(4, &[1, 2, 3]));
        let plain = MatchParams::default().with_density_weight(0.0);
        assert!(params.cost(&sparse, &dense) > plain.cost(&sparse, &dense));
    }

    #[test]
    fn test_checked_cost() {
        assert_eq!(checked_cost(-1e-6, 0, 1).unwrap(), 0.0);
        assert_eq!(checked_cost(0.5, 0, 1).unwrap(), 0.5);
        assert!(matches!(
            checked_cost(f32::NAN, 3, 2),
            Err(Error::InvariantViolation(_))
        ));
        assert!(matches!(
            checked_cost(-0.5, 3, 2),
            Err(Error::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_validate_params() {
        assert!(MatchParams::default().validate().is_ok());
        assert!(MatchParams::default()
            .with_fallback_penalty(-0.1)
            .validate()
            .is_err());
        assert!(MatchParams::default()
            .with_density_weight(f32::NAN)
            .validate()
            .is_err());
    }
}
