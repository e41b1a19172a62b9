use crate::fonts::{FontEntry, FontRole, FontSet};
use crate::text::sanitize;

use super::page::{DrawOp, Page, PageGeometry, Rgb};

pub(super) const BLACK: Rgb = [0, 0, 0];
pub(super) const DARK_GRAY: Rgb = [51, 51, 51];
pub(super) const GRAY: Rgb = [102, 102, 102];
pub(super) const LIGHT_GRAY: Rgb = [153, 153, 153];
pub(super) const BORDER: Rgb = [191, 191, 191];
pub(super) const LIGHT_BORDER: Rgb = [217, 217, 217];
pub(super) const ACCENT: Rgb = [26, 77, 153];
pub(super) const SIGNATURE_BLUE: Rgb = [13, 38, 128];
pub(super) const BOX_BG: Rgb = [247, 247, 247];
pub(super) const WHITE: Rgb = [255, 255, 255];

/// Horizontal inset of box content from the left margin.
const INSET: f32 = 8.0;

const BOX_MIN_SPACE: f32 = 60.0;
const BOX_BAR_HEIGHT: f32 = 24.0;
const BOX_TITLE_SIZE: f32 = 10.0;
const BOX_TITLE_INSET: f32 = 10.0;
const BOX_BAR_GAP: f32 = 8.0;
const BOX_PADDING_TOP: f32 = 16.0;
const BOX_PADDING_BOTTOM: f32 = 10.0;
/// Space above the content on pages a box continues onto.
const BOX_CONTINUATION_PADDING: f32 = 10.0;
const BOX_GAP_AFTER: f32 = 16.0;
const BOX_BORDER_WIDTH: f32 = 0.75;

const BODY_SIZE: f32 = 10.0;
const BODY_LINE: f32 = 14.0;
const PARAGRAPH_GAP: f32 = 4.0;
const BULLET_INDENT: f32 = 12.0;
/// Bullet text wraps at the content width less this much.
const BULLET_WRAP_INSET: f32 = 24.0;

const LABEL_SIZE: f32 = 9.0;
const VALUE_SIZE: f32 = 10.0;
const LABEL_GAP: f32 = 6.0;
const LABEL_LINE: f32 = 16.0;

const SUBHEADING_SPACE: f32 = 24.0;
const SUBHEADING_DROP: f32 = 6.0;
const SUBHEADING_SIZE: f32 = 11.0;
const SUBHEADING_LINE: f32 = 16.0;

const SIGNATURE_BOX_WIDTH: f32 = 280.0;
const SIGNATURE_BOX_HEIGHT: f32 = 44.0;
const SIGNATURE_SIZE: f32 = 20.0;
const SIGNATURE_TEXT_INSET: f32 = 16.0;
const SIGNATURE_BASELINE_DROP: f32 = 30.0;
const SIGNATURE_GAP: f32 = 12.0;
const AUDIT_SIZE: f32 = 8.0;
const AUDIT_LINE: f32 = 12.0;
/// Box, gap, two label lines, spacer and the audit line, kept on one page.
const SIGNATURE_BLOCK_HEIGHT: f32 =
    SIGNATURE_BOX_HEIGHT + SIGNATURE_GAP + 2.0 * LABEL_LINE + 4.0 + AUDIT_LINE;

/// Greedy word wrap: packs words while the measured line fits `max_width`.
/// A word wider than `max_width` gets a line of its own and is never split.
pub(crate) fn wrap_text(
    text: &str,
    font: &FontEntry,
    font_size: f32,
    max_width: f32,
) -> Vec<String> {
    let clean = sanitize(text);
    let clean = font.prepare(&clean);
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in clean.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{line} {word}")
        };
        if !line.is_empty() && font.text_width(&candidate, font_size) > max_width {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        } else {
            line = candidate;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

struct LayoutCursor {
    page_index: usize,
    y: f32,
}

/// Where a boxed section's content began, captured before running it.
struct BoxStart {
    page_index: usize,
    op_index: usize,
    y: f32,
}

/// Cursor-driven compositor for one document. Owns its pages and cursor
/// exclusively; pages are created only when the cursor would cross the
/// content floor.
pub(crate) struct LayoutEngine<'a> {
    fonts: &'a FontSet,
    geometry: PageGeometry,
    pages: Vec<Page>,
    cursor: LayoutCursor,
}

impl<'a> LayoutEngine<'a> {
    pub(crate) fn new(fonts: &'a FontSet, geometry: PageGeometry) -> Self {
        Self {
            fonts,
            geometry,
            pages: vec![Page::default()],
            cursor: LayoutCursor {
                page_index: 0,
                y: geometry.top(),
            },
        }
    }

    #[cfg(test)]
    fn y(&self) -> f32 {
        self.cursor.y
    }

    /// Move the cursor down, stopping at the content floor.
    pub(crate) fn advance(&mut self, dy: f32) {
        self.cursor.y = (self.cursor.y - dy).max(self.geometry.content_floor());
    }

    /// Left edge of box content.
    pub(crate) fn inset(&self) -> f32 {
        self.geometry.margin + INSET
    }

    fn page_mut(&mut self) -> &mut Page {
        &mut self.pages[self.cursor.page_index]
    }

    /// Start a new page unless `needed` points still fit above the content floor.
    pub(crate) fn ensure_space(&mut self, needed: f32) {
        if self.cursor.y - needed < self.geometry.content_floor() {
            self.pages.push(Page::default());
            self.cursor.page_index = self.pages.len() - 1;
            self.cursor.y = self.geometry.top();
            log::debug!(
                "layout: page {} started ({needed:.1}pt requested)",
                self.pages.len()
            );
        }
    }

    fn text_at(&mut self, x: f32, y: f32, text: &str, font: FontRole, size: f32, color: Rgb) {
        let entry = self.fonts.get(font);
        let text = entry.prepare(text).into_owned();
        let descent = entry.descent_at_size(size);
        self.page_mut().push(DrawOp::Text {
            x,
            y,
            text,
            font,
            size,
            color,
            descent,
        });
    }

    /// One unwrapped line at `x`, `height` points tall.
    pub(crate) fn line(
        &mut self,
        x: f32,
        text: &str,
        font: FontRole,
        size: f32,
        color: Rgb,
        height: f32,
    ) {
        self.ensure_space(height);
        self.text_at(x, self.cursor.y, text, font, size, color);
        self.advance(height);
    }

    /// Wrapped text at `x`, each visual line checked for space on its own.
    pub(crate) fn wrapped(
        &mut self,
        x: f32,
        text: &str,
        font: FontRole,
        size: f32,
        color: Rgb,
        line_height: f32,
    ) {
        let max_width = self.geometry.margin + self.geometry.content_width() - INSET - x;
        for line in wrap_text(text, self.fonts.get(font), size, max_width) {
            self.line(x, &line, font, size, color, line_height);
        }
    }

    /// Full-width horizontal rule at the cursor.
    pub(crate) fn rule(&mut self, color: Rgb, thickness: f32) {
        self.ensure_space(thickness);
        let y = self.cursor.y;
        let g = self.geometry;
        self.page_mut().push(DrawOp::Line {
            from: (g.margin, y),
            to: (g.width - g.margin, y),
            thickness,
            color,
        });
    }

    /// Title bar, then `content`, then a background box sized to whatever
    /// `content` drew, inserted behind it. Content that flowed onto later pages
    /// gets one box fragment per page.
    pub(crate) fn section_box(&mut self, title: &str, content: impl FnOnce(&mut Self)) {
        self.ensure_space(BOX_MIN_SPACE);
        let g = self.geometry;
        let bar_index = self.pages[self.cursor.page_index].len();
        let bar_bottom = self.cursor.y - BOX_BAR_HEIGHT;
        let title_height = self.fonts.get(FontRole::SansBold).height_at_size(BOX_TITLE_SIZE);
        let title_y = bar_bottom + (BOX_BAR_HEIGHT - title_height) / 2.0;

        self.page_mut().push(DrawOp::Rect {
            x: g.margin,
            y: bar_bottom,
            width: g.content_width(),
            height: BOX_BAR_HEIGHT,
            fill: Some(ACCENT),
            stroke: None,
        });
        self.text_at(
            g.margin + BOX_TITLE_INSET,
            title_y,
            title,
            FontRole::SansBold,
            BOX_TITLE_SIZE,
            WHITE,
        );
        self.advance(BOX_BAR_HEIGHT + BOX_BAR_GAP);

        let start = BoxStart {
            page_index: self.cursor.page_index,
            op_index: bar_index,
            y: self.cursor.y,
        };
        content(self);
        self.insert_box_fragments(&start);
        self.advance(BOX_GAP_AFTER);
    }

    fn insert_box_fragments(&mut self, start: &BoxStart) {
        let g = self.geometry;
        let floor = g.content_floor();
        let end_page = self.cursor.page_index;
        let end_y = self.cursor.y;

        for page_index in start.page_index..=end_page {
            let (top, op_index) = if page_index == start.page_index {
                (start.y + BOX_PADDING_TOP, start.op_index)
            } else {
                (g.top() + BOX_CONTINUATION_PADDING, 0)
            };
            let bottom = if page_index == end_page {
                (end_y - BOX_PADDING_BOTTOM).max(floor)
            } else {
                floor
            };
            if top <= bottom {
                continue;
            }
            self.pages[page_index].insert(
                op_index,
                DrawOp::Rect {
                    x: g.margin,
                    y: bottom,
                    width: g.content_width(),
                    height: top - bottom,
                    fill: Some(BOX_BG),
                    stroke: Some((BORDER, BOX_BORDER_WIDTH)),
                },
            );
        }
    }

    /// Bold label with a regular value on the same baseline.
    pub(crate) fn label_value(&mut self, label: &str, value: &str) {
        self.ensure_space(LABEL_LINE);
        let x = self.inset();
        let y = self.cursor.y;
        let label_font = self.fonts.get(FontRole::SansBold);
        let label_width = label_font.text_width(&label_font.prepare(label), LABEL_SIZE);
        self.text_at(x, y, label, FontRole::SansBold, LABEL_SIZE, GRAY);
        self.text_at(
            x + label_width + LABEL_GAP,
            y,
            value,
            FontRole::Sans,
            VALUE_SIZE,
            BLACK,
        );
        self.advance(LABEL_LINE);
    }

    pub(crate) fn paragraph(&mut self, text: &str) {
        let x = self.inset();
        self.wrapped(x, text, FontRole::Serif, BODY_SIZE, DARK_GRAY, BODY_LINE);
        self.advance(PARAGRAPH_GAP);
    }

    /// Bullet glyph on the first visual line only; continuation lines align
    /// with the text, not the glyph.
    pub(crate) fn bullet(&mut self, text: &str) {
        let bullet_x = self.inset();
        let text_x = bullet_x + BULLET_INDENT;
        let max_width = self.geometry.content_width() - BULLET_WRAP_INSET;
        let lines = wrap_text(text, self.fonts.get(FontRole::Serif), BODY_SIZE, max_width);
        for (i, line) in lines.iter().enumerate() {
            self.ensure_space(BODY_LINE);
            let y = self.cursor.y;
            if i == 0 {
                self.text_at(bullet_x, y, "\u{2022}", FontRole::Sans, BODY_SIZE, ACCENT);
            }
            self.text_at(text_x, y, line, FontRole::Serif, BODY_SIZE, DARK_GRAY);
            self.advance(BODY_LINE);
        }
    }

    pub(crate) fn subheading(&mut self, text: &str) {
        let x = self.inset();
        let max_width = self.geometry.content_width() - 2.0 * INSET;
        let lines = wrap_text(text, self.fonts.get(FontRole::SansBold), SUBHEADING_SIZE, max_width);
        for (i, line) in lines.iter().enumerate() {
            if i == 0 {
                self.ensure_space(SUBHEADING_SPACE);
                self.advance(SUBHEADING_DROP);
            } else {
                self.ensure_space(SUBHEADING_LINE);
            }
            let y = self.cursor.y;
            self.text_at(x, y, line, FontRole::SansBold, SUBHEADING_SIZE, ACCENT);
            self.advance(SUBHEADING_LINE);
        }
    }

    /// Typed signature in a white box, followed by signer, date and audit lines.
    /// The whole block is placed as one unit.
    pub(crate) fn signature_block(
        &mut self,
        signature: &str,
        signed_by: &str,
        signed_date: &str,
        submission_id: &str,
    ) {
        self.ensure_space(SIGNATURE_BLOCK_HEIGHT);
        let x = self.inset();
        let y = self.cursor.y;
        self.page_mut().push(DrawOp::Rect {
            x,
            y: y - SIGNATURE_BOX_HEIGHT,
            width: SIGNATURE_BOX_WIDTH,
            height: SIGNATURE_BOX_HEIGHT,
            fill: Some(WHITE),
            stroke: Some((BORDER, 1.0)),
        });

        let font = self.fonts.get(FontRole::SerifItalic);
        let available = SIGNATURE_BOX_WIDTH - 2.0 * (SIGNATURE_TEXT_INSET - INSET);
        let natural = font.text_width(&font.prepare(signature), SIGNATURE_SIZE);
        let size = if natural > available {
            SIGNATURE_SIZE * available / natural
        } else {
            SIGNATURE_SIZE
        };
        self.text_at(
            self.geometry.margin + SIGNATURE_TEXT_INSET,
            y - SIGNATURE_BASELINE_DROP,
            signature,
            FontRole::SerifItalic,
            size,
            SIGNATURE_BLUE,
        );
        self.advance(SIGNATURE_BOX_HEIGHT + SIGNATURE_GAP);

        self.label_value("Signed by:", signed_by);
        self.label_value("Date:", signed_date);
        self.advance(4.0);
        self.line(
            x,
            &format!("Submission ID: {submission_id}"),
            FontRole::Sans,
            AUDIT_SIZE,
            LIGHT_GRAY,
            AUDIT_LINE,
        );
    }

    pub(crate) fn finish(self) -> Vec<Page> {
        self.pages
    }
}
