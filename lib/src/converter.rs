use crate::cost::MatchParams;
use crate::dictionary::Dictionary;
use crate::glyph::CHAR_HEIGHT;
use crate::html::to_html;
use crate::line::assemble_line;
use crate::segmenter::{segment, Segmentation};
use crate::table::{CostTable, RowBlock};
use crate::Error;
use image::{GenericImageView, GrayImage, Luma};
use log::debug;
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};

/// Converts edge images to text lines with one shared dictionary.
///
/// The converter only borrows the dictionary, any number of converters and threads
/// can share it.
#[derive(Debug, Clone, Copy)]
pub struct Converter<'d> {
    dictionary: &'d Dictionary,
    params: MatchParams,
}

impl<'d> Converter<'d> {
    pub fn new(dictionary: &'d Dictionary) -> Converter<'d> {
        Converter {
            dictionary,
            params: MatchParams::default(),
        }
    }

    pub fn with_params(mut self, params: MatchParams) -> Converter<'d> {
        self.params = params;
        self
    }

    pub fn dictionary(&self) -> &'d Dictionary {
        self.dictionary
    }

    pub fn params(&self) -> &MatchParams {
        &self.params
    }

    /// Segment one band of exactly `CHAR_HEIGHT` rows.
    ///
    /// # Errors
    /// * [Error::Shape] if the band has the wrong height or no columns
    /// * [Error::InvariantViolation] if the cost model or segmenter misbehaves
    pub fn solve_row<I>(&self, band: &I) -> Result<Segmentation, Error>
    where
        I: GenericImageView<Pixel = Luma<u8>>,
    {
        let row = RowBlock::new(band)?;
        let table = CostTable::build(&row, self.dictionary, &self.params)?;
        segment(&table, &self.params)
    }

    /// Segment one band and assemble its text line.
    pub fn row_line<I>(&self, band: &I) -> Result<String, Error>
    where
        I: GenericImageView<Pixel = Luma<u8>>,
    {
        let segmentation = self.solve_row(band)?;
        assemble_line(&segmentation, self.dictionary)
    }

    /// One text line per complete band of `image`, top to bottom.
    ///
    /// Rows left over below the last complete band are ignored.
    pub fn text_lines(&self, image: &GrayImage) -> Result<Vec<String>, Error> {
        self.lines(image, None)
    }

    /// Like [text_lines](Converter::text_lines), checking `cancel` before each row.
    ///
    /// # Errors
    /// [Error::Cancelled] once `cancel` is set
    pub fn text_lines_cancellable(
        &self,
        image: &GrayImage,
        cancel: &AtomicBool,
    ) -> Result<Vec<String>, Error> {
        self.lines(image, Some(cancel))
    }

    /// Text lines joined with newlines.
    pub fn text(&self, image: &GrayImage) -> Result<String, Error> {
        Ok(self.text_lines(image)?.join("\n"))
    }

    /// Text lines wrapped in an HTML page.
    pub fn html(&self, image: &GrayImage) -> Result<String, Error> {
        Ok(to_html(&self.text_lines(image)?))
    }

    fn lines(&self, image: &GrayImage, cancel: Option<&AtomicBool>) -> Result<Vec<String>, Error> {
        self.params.validate()?;
        let (width, height) = image.dimensions();
        let count = height / CHAR_HEIGHT;
        debug!("{}x{} image, {} rows", width, height, count);

        let line = |i: u32| -> Result<String, Error> {
            if cancel.map_or(false, |flag| flag.load(Ordering::Relaxed)) {
                return Err(Error::Cancelled);
            }
            let band = image.view(0, i * CHAR_HEIGHT, width, CHAR_HEIGHT);
            let segmentation = self.solve_row(&band)?;
            debug!(
                "row {}: {} spans, cost {:.3}",
                i,
                segmentation.spans().len(),
                segmentation.total_cost()
            );
            assemble_line(&segmentation, self.dictionary)
        };

        #[cfg(feature = "rayon")]
        let lines = (0..count).into_par_iter().map(line).collect();
        #[cfg(not(feature = "rayon"))]
        let lines = (0..count).map(line).collect();
        lines
    }
}
