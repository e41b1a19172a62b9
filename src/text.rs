use crate::model::Section;

/// Lines at or above this many characters are never promoted to headings.
const HEADING_MAX_CHARS: usize = 80;

/// Collapse tabs, line breaks and whitespace runs to single spaces and trim.
pub fn sanitize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Heading heuristic for unmarked lines: starts with an uppercase ASCII letter,
/// contains no sentence punctuation (`.`, `!`, `?`) and is shorter than 80 chars.
///
/// Short unpunctuated sentences ("Call us today") are classified as headings too;
/// there is no escape syntax.
pub fn looks_like_heading(line: &str) -> bool {
    line.starts_with(|c: char| c.is_ascii_uppercase())
        && !line.contains(['.', '!', '?'])
        && line.chars().count() < HEADING_MAX_CHARS
}

enum LineKind<'a> {
    Heading(&'a str),
    Bullet(&'a str),
    Paragraph(&'a str),
}

fn classify(line: &str) -> LineKind<'_> {
    if let Some(rest) = line.strip_prefix("# ") {
        LineKind::Heading(rest.trim())
    } else if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("• ")) {
        LineKind::Bullet(rest.trim())
    } else if looks_like_heading(line) {
        LineKind::Heading(line)
    } else {
        LineKind::Paragraph(line)
    }
}

fn flush(sections: &mut Vec<Section>, current: &mut Section) {
    let done = std::mem::take(current);
    if !done.is_empty() {
        sections.push(done);
    }
}

/// Split a free-form consent description into sections. Blank input yields no sections.
pub fn parse_sections(raw: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current = Section::default();

    for line in raw.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
        match classify(line) {
            LineKind::Heading(title) => {
                flush(&mut sections, &mut current);
                current = Section::titled(title);
            }
            LineKind::Bullet(item) => current.bullets.push(item.to_string()),
            LineKind::Paragraph(text) => current.paragraphs.push(text.to_string()),
        }
    }
    flush(&mut sections, &mut current);

    sections
}
