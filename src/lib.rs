mod error;
mod fonts;
mod model;
mod pdf;
pub mod publish;
mod text;

pub use error::Error;
pub use fonts::{FontRole, FontSources};
pub use model::{
    ConsentDocumentInput, DocumentRequest, ModuleRecord, PDF_CONTENT_TYPE, PatientName,
    ProviderRecord, RenderOptions, RenderedDocument, Section, SubmissionRecord,
};
pub use pdf::{DrawOp, Page, PageGeometry, Rgb};
pub use text::{looks_like_heading, parse_sections, sanitize};

use std::time::Instant;

use fonts::FontSet;

/// Lay out a consent document without serializing it. Pages come back with
/// footers already stamped.
pub fn layout_consent_document(
    input: &ConsentDocumentInput,
    options: &RenderOptions,
) -> Result<Vec<Page>, Error> {
    let fonts = FontSet::load(&options.fonts)?;
    Ok(pdf::layout(input, &fonts, PageGeometry::LETTER, &options.brand))
}

/// Lay out and serialize a consent document. Either a complete PDF is returned
/// or an error; there is no partial output.
pub fn render_consent_document(
    input: &ConsentDocumentInput,
    options: &RenderOptions,
) -> Result<RenderedDocument, Error> {
    let t0 = Instant::now();

    let fonts = FontSet::load(&options.fonts)?;
    let t_fonts = t0.elapsed();

    let geometry = PageGeometry::LETTER;
    let pages = pdf::layout(input, &fonts, geometry, &options.brand);
    let t_layout = t0.elapsed();

    let bytes = pdf::render(input, &pages, &fonts, geometry, &options.brand)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: fonts={:.1}ms, layout={:.1}ms, render={:.1}ms, total={:.1}ms ({} pages, {} bytes)",
        t_fonts.as_secs_f64() * 1000.0,
        (t_layout - t_fonts).as_secs_f64() * 1000.0,
        (t_total - t_layout).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        pages.len(),
        bytes.len(),
    );

    Ok(RenderedDocument {
        bytes,
        page_count: pages.len(),
        content_type: PDF_CONTENT_TYPE,
    })
}
