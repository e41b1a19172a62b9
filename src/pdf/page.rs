use crate::fonts::FontRole;

pub type Rgb = [u8; 3];

/// Physical page and margin geometry shared by every page of a document.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    /// Space above the bottom margin kept free for the footer.
    pub footer_reserve: f32,
}

impl PageGeometry {
    /// US Letter with 0.75in margins.
    pub const LETTER: PageGeometry = PageGeometry {
        width: 612.0,
        height: 792.0,
        margin: 54.0,
        footer_reserve: 50.0,
    };

    pub fn top(&self) -> f32 {
        self.height - self.margin
    }

    /// Lowest y content may reach.
    pub fn content_floor(&self) -> f32 {
        self.margin + self.footer_reserve
    }

    pub fn content_width(&self) -> f32 {
        self.width - self.margin * 2.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        /// Baseline.
        y: f32,
        text: String,
        font: FontRole,
        size: f32,
        color: Rgb,
        /// Distance the glyphs may reach below the baseline.
        descent: f32,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<Rgb>,
        stroke: Option<(Rgb, f32)>,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        thickness: f32,
        color: Rgb,
    },
}

impl DrawOp {
    /// Lowest y this op paints at.
    pub fn bottom(&self) -> f32 {
        match self {
            DrawOp::Text { y, descent, .. } => y - descent,
            DrawOp::Rect { y, .. } => *y,
            DrawOp::Line { from, to, thickness, .. } => from.1.min(to.1) - thickness / 2.0,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            DrawOp::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// One page: content ops in paint order plus the footer block stamped after layout.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    ops: Vec<DrawOp>,
    footer: Vec<DrawOp>,
}

impl Page {
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn footer(&self) -> &[DrawOp] {
        &self.footer
    }

    /// Content ops followed by footer ops, the order they are painted in.
    pub fn paint_order(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().chain(self.footer.iter())
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.paint_order().filter_map(DrawOp::text)
    }

    pub(crate) fn len(&self) -> usize {
        self.ops.len()
    }

    pub(crate) fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    /// Insert behind everything already drawn from `index` on.
    pub(crate) fn insert(&mut self, index: usize, op: DrawOp) {
        self.ops.insert(index.min(self.ops.len()), op);
    }

    pub(crate) fn set_footer(&mut self, ops: Vec<DrawOp>) {
        self.footer = ops;
    }
}
