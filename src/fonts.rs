use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use pdf_writer::{Name, Pdf, Rect, Ref};
use ttf_parser::Face;

use crate::error::Error;

/// The four faces a consent document is set in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FontRole {
    Sans,
    SansBold,
    Serif,
    SerifItalic,
}

impl FontRole {
    pub const ALL: [FontRole; 4] = [
        FontRole::Sans,
        FontRole::SansBold,
        FontRole::Serif,
        FontRole::SerifItalic,
    ];

    fn index(self) -> usize {
        match self {
            FontRole::Sans => 0,
            FontRole::SansBold => 1,
            FontRole::Serif => 2,
            FontRole::SerifItalic => 3,
        }
    }

    /// Resource name used in page content streams.
    pub(crate) fn pdf_name(self) -> &'static str {
        match self {
            FontRole::Sans => "F1",
            FontRole::SansBold => "F2",
            FontRole::Serif => "F3",
            FontRole::SerifItalic => "F4",
        }
    }

    fn standard(self) -> &'static StandardMetrics {
        match self {
            FontRole::Sans => &HELVETICA,
            FontRole::SansBold => &HELVETICA_BOLD,
            FontRole::Serif => &TIMES_ROMAN,
            FontRole::SerifItalic => &TIMES_ITALIC,
        }
    }
}

/// Optional TrueType/OpenType programs replacing the built-in standard fonts.
#[derive(Clone, Default)]
pub struct FontSources {
    programs: [Option<Vec<u8>>; 4],
}

impl FontSources {
    pub fn with(mut self, role: FontRole, data: Vec<u8>) -> Self {
        self.programs[role.index()] = Some(data);
        self
    }

    pub fn with_file(self, role: FontRole, path: &Path) -> Result<Self, Error> {
        let data = std::fs::read(path).map_err(|e| {
            Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())))
        })?;
        Ok(self.with(role, data))
    }

    pub fn get(&self, role: FontRole) -> Option<&[u8]> {
        self.programs[role.index()].as_deref()
    }
}

struct StandardMetrics {
    base_name: &'static str,
    /// Advance widths for ASCII 32..=126 in 1000-units (Adobe AFM).
    ascii: [u16; 95],
    /// Advance widths for WinAnsi 0x80..=0xFF; 0 where the code is unassigned.
    high: [u16; 128],
    ascender: f32,
    descender: f32,
}

#[rustfmt::skip]
static HELVETICA: StandardMetrics = StandardMetrics {
    base_name: "Helvetica",
    ascii: [
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        278, 278, 584, 584, 584, 556, 1015,
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        278, 278, 278, 469, 556, 333,
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
        334, 260, 334, 584,
    ],
    high: [
        556, 0, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
        0, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 0, 500, 667,
        278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
        400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
        667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
        722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
        556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
        556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
    ],
    ascender: 718.0,
    descender: -207.0,
};

#[rustfmt::skip]
static HELVETICA_BOLD: StandardMetrics = StandardMetrics {
    base_name: "Helvetica-Bold",
    ascii: [
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        333, 333, 584, 584, 584, 611, 975,
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        333, 278, 333, 584, 556, 333,
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
        389, 280, 389, 584,
    ],
    high: [
        556, 0, 278, 556, 500, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
        0, 278, 278, 500, 500, 350, 556, 1000, 333, 1000, 556, 333, 944, 0, 500, 667,
        278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
        400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
        722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
        722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
        556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
        611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
    ],
    ascender: 718.0,
    descender: -207.0,
};

#[rustfmt::skip]
static TIMES_ROMAN: StandardMetrics = StandardMetrics {
    base_name: "Times-Roman",
    ascii: [
        250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
        278, 278, 564, 564, 564, 444, 921,
        722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889,
        722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611,
        333, 278, 333, 469, 500, 333,
        444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778,
        500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444,
        480, 200, 480, 541,
    ],
    high: [
        500, 0, 333, 500, 444, 1000, 500, 500, 333, 1000, 556, 333, 889, 0, 611, 0,
        0, 333, 333, 444, 444, 350, 500, 1000, 333, 980, 389, 333, 722, 0, 444, 722,
        250, 333, 500, 500, 500, 500, 200, 500, 333, 760, 276, 500, 564, 333, 760, 333,
        400, 564, 300, 300, 333, 500, 453, 250, 333, 300, 310, 500, 750, 750, 750, 444,
        722, 722, 722, 722, 722, 722, 889, 667, 611, 611, 611, 611, 333, 333, 333, 333,
        722, 722, 722, 722, 722, 722, 722, 564, 722, 722, 722, 722, 722, 722, 556, 500,
        444, 444, 444, 444, 444, 444, 667, 444, 444, 444, 444, 444, 278, 278, 278, 278,
        500, 500, 500, 500, 500, 500, 500, 564, 500, 500, 500, 500, 500, 500, 500, 500,
    ],
    ascender: 683.0,
    descender: -217.0,
};

#[rustfmt::skip]
static TIMES_ITALIC: StandardMetrics = StandardMetrics {
    base_name: "Times-Italic",
    ascii: [
        250, 333, 420, 500, 500, 833, 778, 214, 333, 333, 500, 675, 250, 333, 250, 278,
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
        333, 333, 675, 675, 675, 500, 920,
        611, 611, 667, 722, 611, 611, 722, 722, 333, 444, 667, 556, 833,
        667, 722, 611, 722, 611, 500, 556, 722, 611, 833, 611, 556, 556,
        389, 278, 389, 422, 500, 333,
        500, 500, 444, 500, 444, 278, 500, 500, 278, 278, 444, 278, 722,
        500, 500, 500, 500, 389, 389, 278, 500, 444, 667, 444, 444, 389,
        400, 275, 400, 541,
    ],
    high: [
        500, 0, 333, 500, 556, 889, 500, 500, 333, 1000, 500, 333, 944, 0, 556, 0,
        0, 333, 333, 556, 556, 350, 500, 889, 333, 980, 389, 333, 667, 0, 389, 556,
        250, 389, 500, 500, 500, 500, 275, 500, 333, 760, 276, 500, 675, 333, 760, 333,
        400, 675, 300, 300, 333, 500, 523, 250, 333, 300, 310, 500, 750, 750, 750, 500,
        611, 611, 611, 611, 611, 611, 889, 667, 611, 611, 611, 611, 333, 333, 333, 333,
        722, 667, 722, 722, 722, 722, 722, 675, 722, 722, 722, 722, 722, 556, 611, 500,
        500, 500, 500, 500, 500, 500, 667, 444, 444, 444, 444, 444, 278, 278, 278, 278,
        500, 500, 500, 500, 500, 500, 500, 675, 500, 500, 500, 500, 500, 444, 500, 444,
    ],
    ascender: 683.0,
    descender: -217.0,
};

impl StandardMetrics {
    fn winansi_widths(&self) -> Vec<f32> {
        (32u8..=255u8)
            .map(|byte| match byte {
                32..=126 => self.ascii[(byte - 32) as usize] as f32,
                0x80..=0xFF => self.high[(byte - 0x80) as usize] as f32,
                _ => 0.0,
            })
            .collect()
    }
}

enum FontProgram {
    Standard(&'static str),
    TrueType(Vec<u8>),
}

pub(crate) struct FontEntry {
    role: FontRole,
    program: FontProgram,
    widths_1000: Vec<f32>,
    char_widths_1000: Option<HashMap<char, f32>>,
    ascender_ratio: f32,
    descender_ratio: f32,
}

impl FontEntry {
    fn standard(role: FontRole) -> Self {
        let metrics = role.standard();
        FontEntry {
            role,
            program: FontProgram::Standard(metrics.base_name),
            widths_1000: metrics.winansi_widths(),
            char_widths_1000: None,
            ascender_ratio: metrics.ascender / 1000.0,
            descender_ratio: metrics.descender / 1000.0,
        }
    }

    fn truetype(role: FontRole, data: &[u8]) -> Result<Self, Error> {
        let face = Face::parse(data, 0)
            .map_err(|e| Error::Font(format!("{role:?}: cannot parse font program: {e}")))?;
        let units = face.units_per_em() as f32;
        let advance = |gid| {
            face.glyph_hor_advance(gid)
                .map(|adv| adv as f32 / units * 1000.0)
                .unwrap_or(0.0)
        };

        let mut char_widths = HashMap::new();
        if let Some(cmap) = face.tables().cmap {
            for subtable in cmap.subtables {
                if !subtable.is_unicode() {
                    continue;
                }
                subtable.codepoints(|cp| {
                    if let Some(ch) = char::from_u32(cp)
                        && let Some(gid) = subtable.glyph_index(cp)
                    {
                        char_widths.entry(ch).or_insert_with(|| advance(gid));
                    }
                });
            }
        }
        if char_widths.is_empty() {
            return Err(Error::Font(format!("{role:?}: font has no Unicode character map")));
        }

        let widths_1000: Vec<f32> = (32u8..=255u8)
            .map(|byte| {
                face.glyph_index(winansi_to_char(byte))
                    .map(advance)
                    .unwrap_or(0.0)
            })
            .collect();

        Ok(FontEntry {
            role,
            program: FontProgram::TrueType(data.to_vec()),
            widths_1000,
            char_widths_1000: Some(char_widths),
            ascender_ratio: face.ascender() as f32 / units,
            descender_ratio: face.descender() as f32 / units,
        })
    }

    /// Width of a single character in 1000-units. Uses the face's own map when the
    /// font is embedded, falls back to the WinAnsi table.
    pub(crate) fn char_width_1000(&self, ch: char) -> f32 {
        if let Some(ref map) = self.char_widths_1000
            && let Some(&w) = map.get(&ch)
        {
            return w;
        }
        let byte = char_to_winansi(ch);
        if byte >= 32 {
            self.widths_1000[(byte - 32) as usize]
        } else {
            0.0
        }
    }

    pub(crate) fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars()
            .map(|ch| self.char_width_1000(ch) * font_size / 1000.0)
            .sum()
    }

    /// Ascender-to-descender height at the given size.
    pub(crate) fn height_at_size(&self, font_size: f32) -> f32 {
        (self.ascender_ratio - self.descender_ratio) * font_size
    }

    pub(crate) fn descent_at_size(&self, font_size: f32) -> f32 {
        -self.descender_ratio * font_size
    }

    /// Text as it will be drawn: the standard fonts only encode WinAnsi, so anything
    /// outside it becomes `?` before measuring.
    pub(crate) fn prepare<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self.program {
            FontProgram::TrueType(_) => Cow::Borrowed(text),
            FontProgram::Standard(_) => {
                if text.chars().all(|c| char_to_winansi(c) >= 32) {
                    Cow::Borrowed(text)
                } else {
                    log::warn!("{:?}: replacing characters outside WinAnsi in {text:?}", self.role);
                    Cow::Owned(
                        text.chars()
                            .map(|c| if char_to_winansi(c) >= 32 { c } else { '?' })
                            .collect(),
                    )
                }
            }
        }
    }
}

/// Fonts for one document. Owned per invocation; nothing is cached globally.
pub(crate) struct FontSet {
    entries: [FontEntry; 4],
}

impl FontSet {
    pub(crate) fn standard() -> Self {
        FontSet {
            entries: FontRole::ALL.map(FontEntry::standard),
        }
    }

    pub(crate) fn load(sources: &FontSources) -> Result<Self, Error> {
        let mut set = Self::standard();
        for role in FontRole::ALL {
            if let Some(data) = sources.get(role) {
                set.entries[role.index()] = FontEntry::truetype(role, data)?;
                log::debug!("load fonts: {role:?} uses a supplied font program ({} bytes)", data.len());
            }
        }
        Ok(set)
    }

    pub(crate) fn get(&self, role: FontRole) -> &FontEntry {
        &self.entries[role.index()]
    }
}

/// A font written into the PDF, ready to encode text for content streams.
pub(crate) struct EmbeddedFont {
    pub(crate) font_ref: Ref,
    char_to_gid: Option<HashMap<char, u16>>,
}

impl EmbeddedFont {
    pub(crate) fn encode(&self, text: &str) -> Vec<u8> {
        match &self.char_to_gid {
            Some(map) => encode_as_gids(text, map),
            None => to_winansi_bytes(text),
        }
    }
}

/// Windows-1252 (WinAnsi) byte to Unicode char mapping.
/// Bytes 0x80-0x9F are remapped; all others map directly to their Unicode codepoint.
fn winansi_to_char(byte: u8) -> char {
    match byte {
        0x80 => '\u{20AC}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8E => '\u{017D}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}', // bullet
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        _ => byte as char,
    }
}

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007E => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str encoding.
fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(char_to_winansi)
        .filter(|&b| b >= 32)
        .collect()
}

/// Encode UTF-8 text as big-endian 2-byte glyph IDs for CIDFont content streams.
fn encode_as_gids(text: &str, char_to_gid: &HashMap<char, u16>) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 2);
    for ch in text.chars() {
        let gid = char_to_gid.get(&ch).copied().unwrap_or(0);
        out.push((gid >> 8) as u8);
        out.push((gid & 0xFF) as u8);
    }
    out
}

/// Embed a TrueType/OpenType font as a CIDFont (Type0 composite) with Identity-H encoding.
/// The font data is subsetted to the characters the document draws.
fn embed_truetype(
    pdf: &mut Pdf,
    font_ref: Ref,
    font_name: &str,
    font_data: &[u8],
    used_chars: &BTreeSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Result<HashMap<char, u16>, Error> {
    let face = Face::parse(font_data, 0)
        .map_err(|e| Error::Font(format!("{font_name}: cannot parse font program: {e}")))?;

    let units = face.units_per_em() as f32;
    let ascent = face.ascender() as f32 / units * 1000.0;
    let descent = face.descender() as f32 / units * 1000.0;
    let cap_height = face
        .capital_height()
        .map(|h| h as f32 / units * 1000.0)
        .unwrap_or(700.0);

    let bb = face.global_bounding_box();
    let bbox = Rect::new(
        bb.x_min as f32 / units * 1000.0,
        bb.y_min as f32 / units * 1000.0,
        bb.x_max as f32 / units * 1000.0,
        bb.y_max as f32 / units * 1000.0,
    );

    // BTreeSet iteration keeps glyph renumbering stable between runs.
    let mut remapper = subsetter::GlyphRemapper::new();
    let mut char_to_gid = HashMap::new();
    let mut gid_widths: Vec<(u16, f32)> = Vec::new();
    for &ch in used_chars {
        if let Some(gid) = face.glyph_index(ch) {
            let new_gid = remapper.remap(gid.0);
            char_to_gid.insert(ch, new_gid);
            let w = face
                .glyph_hor_advance(gid)
                .map(|adv| adv as f32 / units * 1000.0)
                .unwrap_or(0.0);
            gid_widths.push((new_gid, w));
        }
    }
    gid_widths.sort_by_key(|&(gid, _)| gid);
    gid_widths.dedup_by_key(|&mut (gid, _)| gid);

    let subset_data = subsetter::subset(font_data, 0, &remapper)
        .map_err(|e| Error::Font(format!("{font_name}: font cannot be subset for embedding: {e}")))?;

    let data_len = i32::try_from(subset_data.len())
        .map_err(|_| Error::Font(format!("{font_name}: font program too large")))?;
    let descriptor_ref = alloc();
    let data_ref = alloc();
    pdf.stream(data_ref, &subset_data)
        .pair(Name(b"Length1"), data_len);

    let ps_name = font_name.replace(' ', "");

    pdf.font_descriptor(descriptor_ref)
        .name(Name(ps_name.as_bytes()))
        .flags(pdf_writer::types::FontFlags::NON_SYMBOLIC)
        .bbox(bbox)
        .italic_angle(0.0)
        .ascent(ascent)
        .descent(descent)
        .cap_height(cap_height)
        .stem_v(80.0)
        .font_file2(data_ref);

    let cid_font_ref = alloc();
    let system_info = pdf_writer::types::SystemInfo {
        registry: pdf_writer::Str(b"Adobe"),
        ordering: pdf_writer::Str(b"Identity"),
        supplement: 0,
    };
    {
        let mut cid = pdf.cid_font(cid_font_ref);
        cid.subtype(pdf_writer::types::CidFontType::Type2);
        cid.base_font(Name(ps_name.as_bytes()));
        cid.system_info(system_info);
        cid.font_descriptor(descriptor_ref);
        cid.default_width(0.0);
        cid.cid_to_gid_map_predefined(Name(b"Identity"));
        if !gid_widths.is_empty() {
            let mut w = cid.widths();
            for &(gid, width) in &gid_widths {
                w.consecutive(gid, [width]);
            }
        }
    }

    let tounicode_ref = alloc();
    let cmap_name = format!("{}-UTF16", ps_name);
    let mut cmap = pdf_writer::types::UnicodeCmap::new(
        Name(cmap_name.as_bytes()),
        pdf_writer::types::SystemInfo {
            registry: pdf_writer::Str(b"Adobe"),
            ordering: pdf_writer::Str(b"Identity"),
            supplement: 0,
        },
    );
    let mut pairs: Vec<(u16, char)> = char_to_gid.iter().map(|(&ch, &gid)| (gid, ch)).collect();
    pairs.sort();
    for (gid, ch) in pairs {
        cmap.pair(gid, ch);
    }
    let cmap_data = cmap.finish();
    pdf.stream(tounicode_ref, cmap_data.as_slice());

    pdf.type0_font(font_ref)
        .base_font(Name(ps_name.as_bytes()))
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_font_ref)
        .to_unicode(tounicode_ref);

    Ok(char_to_gid)
}

/// Write every font of the set into the PDF. Standard fonts become simple Type1
/// references; supplied programs are subset to `used_chars`.
pub(crate) fn embed_fonts(
    pdf: &mut Pdf,
    fonts: &FontSet,
    used_chars: &BTreeMap<FontRole, BTreeSet<char>>,
    alloc: &mut impl FnMut() -> Ref,
) -> Result<BTreeMap<FontRole, EmbeddedFont>, Error> {
    let empty = BTreeSet::new();
    let mut embedded = BTreeMap::new();
    for role in FontRole::ALL {
        let t0 = std::time::Instant::now();
        let font_ref = alloc();
        let char_to_gid = match &fonts.get(role).program {
            FontProgram::Standard(base_name) => {
                pdf.type1_font(font_ref)
                    .base_font(Name(base_name.as_bytes()))
                    .encoding_predefined(Name(b"WinAnsiEncoding"));
                None
            }
            FontProgram::TrueType(data) => {
                let mut used = used_chars.get(&role).unwrap_or(&empty).clone();
                used.insert(' ');
                let name = format!("Consent{role:?}");
                Some(embed_truetype(pdf, font_ref, &name, data, &used, alloc)?)
            }
        };
        log::debug!(
            "embed_fonts: {role:?} → {:.1}ms",
            t0.elapsed().as_secs_f64() * 1000.0,
        );
        embedded.insert(role, EmbeddedFont { font_ref, char_to_gid });
    }
    Ok(embedded)
}
