use glyph_art::{to_html, Converter, Dictionary, EdgeDetector};
use pyo3::{create_exception, exceptions::PyException, prelude::*, wrap_pyfunction, PyErr};

create_exception!(pyglyph_art, GlyphArtException, PyException);

const MAX_SIZE: u32 = 800;

fn convert(image_filename: &str, dictionary_filename: &str) -> Result<Vec<String>, GlyphArtError> {
    let dictionary = Dictionary::open(dictionary_filename)?;
    let edges = EdgeDetector::default().open(image_filename, MAX_SIZE)?;
    let lines = Converter::new(&dictionary).text_lines(&edges)?;
    Ok(lines)
}

#[pyfunction]
fn text_lines_from_file(image_filename: String, dictionary_filename: String) -> PyResult<Vec<String>> {
    Ok(convert(&image_filename, &dictionary_filename)?)
}

#[pyfunction]
fn html_from_file(image_filename: String, dictionary_filename: String) -> PyResult<String> {
    let lines = convert(&image_filename, &dictionary_filename)?;
    Ok(to_html(&lines))
}

/// Wrapper around glyph_art::Error so we convert to PyErr
struct GlyphArtError(glyph_art::Error);

impl From<glyph_art::Error> for GlyphArtError {
    fn from(err: glyph_art::Error) -> GlyphArtError {
        GlyphArtError(err)
    }
}

impl From<GlyphArtError> for PyErr {
    fn from(err: GlyphArtError) -> PyErr {
        PyErr::new::<GlyphArtException, String>(err.0.to_string())
    }
}

#[pymodule]
fn pyglyph_art(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(text_lines_from_file, m)?)?;
    m.add_function(wrap_pyfunction!(html_from_file, m)?)?;
    Ok(())
}
