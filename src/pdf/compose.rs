use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::fonts::{FontRole, FontSet};
use crate::model::ConsentDocumentInput;
use crate::text::parse_sections;

use super::layout::{BLACK, BORDER, DARK_GRAY, GRAY, LayoutEngine};
use super::page::{Page, PageGeometry};

const ACKNOWLEDGMENT: &str = "I have reviewed all consent materials and understand the information \
provided. I voluntarily agree to the procedure/treatment described and understand the risks, \
benefits, and alternatives.";

/// Space kept free before the signature box so it never starts near a page bottom.
const SIGNATURE_SECTION_SPACE: f32 = 180.0;

/// en-US long form, e.g. "Monday, January 15, 2024 at 02:30 PM EST".
const SIGNED_AT_FORMAT: &str = "%A, %B %-d, %Y at %I:%M %p %Z";

/// Format the signing instant in the provider's zone. Unknown or missing zone
/// ids fall back to UTC.
pub(crate) fn format_signed_at(signed_at: DateTime<Utc>, timezone_id: Option<&str>) -> String {
    let tz = match timezone_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => id.parse::<Tz>().unwrap_or_else(|_| {
            log::warn!("format_signed_at: unknown timezone {id:?}, using UTC");
            Tz::UTC
        }),
        None => Tz::UTC,
    };
    signed_at.with_timezone(&tz).format(SIGNED_AT_FORMAT).to_string()
}

/// Lay out the document body top to bottom. Footers are not stamped here.
pub(crate) fn compose(
    input: &ConsentDocumentInput,
    fonts: &FontSet,
    geometry: PageGeometry,
) -> Vec<Page> {
    let mut e = LayoutEngine::new(fonts, geometry);
    let left = geometry.margin;
    let inset = e.inset();

    e.line(left, "CONSENT FORM", FontRole::SansBold, 24.0, BLACK, 30.0);
    if let Some(heading) = input.practice_heading() {
        e.wrapped(left, heading, FontRole::SansBold, 12.0, DARK_GRAY, 16.0);
    }
    if let Some(provider) = input.provider_line() {
        e.wrapped(left, &provider, FontRole::Sans, 10.0, GRAY, 14.0);
    }
    e.advance(8.0);
    e.rule(BORDER, 0.75);
    e.advance(16.0);

    e.section_box("PROCEDURE / TREATMENT", |e| {
        e.wrapped(inset, input.procedure_title(), FontRole::SansBold, 14.0, BLACK, 18.0);
    });

    let patient = input.patient_display_name();
    e.section_box("PATIENT INFORMATION", |e| {
        e.label_value("Name:", &patient);
        e.label_value("Email:", input.email_display());
    });

    let sections = input
        .consent_body
        .as_deref()
        .map(parse_sections)
        .unwrap_or_default();
    if sections.is_empty() {
        log::debug!("compose: no consent body for {}", input.submission_id);
    } else {
        e.section_box("CONSENT INFORMATION", |e| {
            for section in &sections {
                if let Some(heading) = &section.heading {
                    e.subheading(heading);
                }
                for paragraph in &section.paragraphs {
                    e.paragraph(paragraph);
                }
                for bullet in &section.bullets {
                    e.bullet(bullet);
                }
            }
        });
    }

    e.section_box("ACKNOWLEDGMENT", |e| e.paragraph(ACKNOWLEDGMENT));

    e.ensure_space(SIGNATURE_SECTION_SPACE);
    let signed_date = format_signed_at(input.signed_at, input.timezone_id.as_deref());
    e.section_box("DIGITAL SIGNATURE", |e| {
        e.signature_block(
            input.signature_display(),
            &patient,
            &signed_date,
            &input.submission_id,
        );
    });

    e.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn signed_at_uses_provider_zone() {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 19, 30, 0).unwrap();
        assert_eq!(
            format_signed_at(at, Some("America/New_York")),
            "Monday, January 15, 2024 at 02:30 PM EST"
        );
    }

    #[test]
    fn unknown_or_missing_zone_is_utc() {
        let at = Utc.with_ymd_and_hms(2024, 7, 4, 9, 5, 0).unwrap();
        let expected = "Thursday, July 4, 2024 at 09:05 AM UTC";
        assert_eq!(format_signed_at(at, None), expected);
        assert_eq!(format_signed_at(at, Some("")), expected);
        assert_eq!(format_signed_at(at, Some("Mars/Olympus_Mons")), expected);
    }
}
