mod compose;
mod footer;
mod layout;
mod page;

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Datelike, Timelike, Utc};
use pdf_writer::{Content, Date, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::error::Error;
use crate::fonts::{EmbeddedFont, FontRole, FontSet, embed_fonts};
use crate::model::ConsentDocumentInput;

pub use page::{DrawOp, Page, PageGeometry, Rgb};

/// Lay out a whole document: body composition, then footers once the page
/// count is known.
pub(crate) fn layout(
    input: &ConsentDocumentInput,
    fonts: &FontSet,
    geometry: PageGeometry,
    brand: &str,
) -> Vec<Page> {
    let mut pages = compose::compose(input, fonts, geometry);
    footer::stamp_footers(&mut pages, fonts, &geometry, brand);
    pages
}

fn set_fill(content: &mut Content, [r, g, b]: Rgb) {
    content.set_fill_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
}

fn set_stroke(content: &mut Content, [r, g, b]: Rgb) {
    content.set_stroke_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
}

fn paint(content: &mut Content, op: &DrawOp, fonts: &BTreeMap<FontRole, EmbeddedFont>) {
    match op {
        DrawOp::Text {
            x,
            y,
            text,
            font,
            size,
            color,
            ..
        } => {
            let Some(embedded) = fonts.get(font) else {
                return;
            };
            content.begin_text();
            set_fill(content, *color);
            content
                .set_font(Name(font.pdf_name().as_bytes()), *size)
                .next_line(*x, *y)
                .show(Str(&embedded.encode(text)))
                .end_text();
        }
        DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
        } => {
            content.save_state();
            if let Some(color) = fill {
                set_fill(content, *color);
            }
            if let Some((color, line_width)) = stroke {
                set_stroke(content, *color);
                content.set_line_width(*line_width);
            }
            content.rect(*x, *y, *width, *height);
            match (fill, stroke) {
                (Some(_), Some(_)) => content.fill_nonzero_and_stroke(),
                (Some(_), None) => content.fill_nonzero(),
                (None, Some(_)) => content.stroke(),
                (None, None) => content.end_path(),
            };
            content.restore_state();
        }
        DrawOp::Line {
            from,
            to,
            thickness,
            color,
        } => {
            content.save_state();
            set_stroke(content, *color);
            content
                .set_line_width(*thickness)
                .move_to(from.0, from.1)
                .line_to(to.0, to.1)
                .stroke();
            content.restore_state();
        }
    }
}

fn used_chars(pages: &[Page]) -> BTreeMap<FontRole, BTreeSet<char>> {
    let mut used: BTreeMap<FontRole, BTreeSet<char>> = BTreeMap::new();
    for op in pages.iter().flat_map(|page| page.paint_order()) {
        if let DrawOp::Text { text, font, .. } = op {
            used.entry(*font).or_default().extend(text.chars());
        }
    }
    used
}

fn pdf_date(at: DateTime<Utc>) -> Date {
    Date::new(at.year().clamp(0, 9999) as u16)
        .month(at.month() as u8)
        .day(at.day() as u8)
        .hour(at.hour() as u8)
        .minute(at.minute() as u8)
        .second(at.second() as u8)
        .utc_offset_hour(0)
        .utc_offset_minute(0)
}

/// Serialize laid-out pages into a PDF. Output depends only on the pages, the
/// fonts and the input metadata, so identical inputs give identical bytes.
pub(crate) fn render(
    input: &ConsentDocumentInput,
    pages: &[Page],
    fonts: &FontSet,
    geometry: PageGeometry,
    brand: &str,
) -> Result<Vec<u8>, Error> {
    if pages.is_empty() {
        return Err(Error::Render("document has no pages".into()));
    }

    let t0 = std::time::Instant::now();
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();

    let embedded = embed_fonts(&mut pdf, fonts, &used_chars(pages), &mut alloc)?;
    let t_fonts = t0.elapsed();

    let n = pages.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, page) in pages.iter().enumerate() {
        let mut content = Content::new();
        for op in page.paint_order() {
            paint(&mut content, op, &embedded);
        }
        let raw = content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
    }
    let t_content = t0.elapsed();

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, geometry.width, geometry.height))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        let mut font_dict = resources.fonts();
        for (role, font) in &embedded {
            font_dict.pair(Name(role.pdf_name().as_bytes()), font.font_ref);
        }
    }

    let title = format!("Consent Form - {}", input.procedure_title());
    let subject = format!("Signed consent of {}", input.patient_display_name());
    let producer = format!("consent-pdf {}", env!("CARGO_PKG_VERSION"));
    let mut info = pdf.document_info(info_id);
    info.title(TextStr(&title))
        .subject(TextStr(&subject))
        .creator(TextStr(brand))
        .producer(TextStr(&producer))
        .creation_date(pdf_date(input.signed_at));
    if let Some(author) = input.practice_heading() {
        info.author(TextStr(author));
    }
    drop(info);

    log::info!(
        "Render phases: font_embed={:.1}ms, content={:.1}ms, assembly={:.1}ms ({n} pages)",
        t_fonts.as_secs_f64() * 1000.0,
        (t_content - t_fonts).as_secs_f64() * 1000.0,
        (t0.elapsed() - t_content).as_secs_f64() * 1000.0,
    );

    Ok(pdf.finish())
}
