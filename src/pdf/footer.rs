use crate::fonts::{FontRole, FontSet};

use super::layout::{LIGHT_BORDER, LIGHT_GRAY};
use super::page::{DrawOp, Page, PageGeometry};

pub(crate) const LEGAL_NOTICE: &str =
    "This document was electronically signed and is legally binding.";

const FOOTER_SIZE: f32 = 8.0;
const FOOTER_RULE_WIDTH: f32 = 0.5;
const NOTICE_DROP: f32 = 12.0;
const PAGE_LINE_DROP: f32 = 24.0;

/// Stamp the footer block on every page. Runs once the page count is final;
/// stamping again replaces the previous footer rather than adding to it.
pub(crate) fn stamp_footers(pages: &mut [Page], fonts: &FontSet, geometry: &PageGeometry, brand: &str) {
    let total = pages.len();
    for (i, page) in pages.iter_mut().enumerate() {
        page.set_footer(footer_ops(i + 1, total, fonts, geometry, brand));
    }
}

fn footer_ops(
    page_number: usize,
    total: usize,
    fonts: &FontSet,
    geometry: &PageGeometry,
    brand: &str,
) -> Vec<DrawOp> {
    let font = fonts.get(FontRole::Sans);
    let descent = font.descent_at_size(FOOTER_SIZE);
    let text = |y: f32, line: String| DrawOp::Text {
        x: geometry.margin,
        y,
        text: font.prepare(&line).into_owned(),
        font: FontRole::Sans,
        size: FOOTER_SIZE,
        color: LIGHT_GRAY,
        descent,
    };

    vec![
        DrawOp::Line {
            from: (geometry.margin, geometry.margin),
            to: (geometry.width - geometry.margin, geometry.margin),
            thickness: FOOTER_RULE_WIDTH,
            color: LIGHT_BORDER,
        },
        text(geometry.margin - NOTICE_DROP, LEGAL_NOTICE.to_string()),
        text(
            geometry.margin - PAGE_LINE_DROP,
            format!("Generated by {brand}  \u{2022}  Page {page_number} of {total}"),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_page_gets_its_number_and_total() {
        let fonts = FontSet::standard();
        let mut pages = vec![Page::default(); 3];
        stamp_footers(&mut pages, &fonts, &PageGeometry::LETTER, "ClearConsent");
        for (i, page) in pages.iter().enumerate() {
            let texts: Vec<&str> = page.footer().iter().filter_map(DrawOp::text).collect();
            assert_eq!(texts[0], LEGAL_NOTICE);
            assert_eq!(
                texts[1],
                format!("Generated by ClearConsent  \u{2022}  Page {} of 3", i + 1)
            );
        }
    }

    #[test]
    fn restamping_is_idempotent() {
        let fonts = FontSet::standard();
        let mut pages = vec![Page::default(); 2];
        stamp_footers(&mut pages, &fonts, &PageGeometry::LETTER, "ClearConsent");
        let once = pages.clone();
        stamp_footers(&mut pages, &fonts, &PageGeometry::LETTER, "ClearConsent");
        assert_eq!(pages, once);
        assert_eq!(pages[0].footer().len(), 3);
    }

    #[test]
    fn footer_stays_below_content_floor() {
        let fonts = FontSet::standard();
        let mut pages = vec![Page::default()];
        let geometry = PageGeometry::LETTER;
        stamp_footers(&mut pages, &fonts, &geometry, "Acme Health");
        for op in pages[0].footer() {
            assert!(op.bottom() >= 0.0);
            assert!(op.bottom() < geometry.content_floor());
        }
        assert!(pages[0].texts().any(|t| t.starts_with("Generated by Acme Health")));
    }
}
