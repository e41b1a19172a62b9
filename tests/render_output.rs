mod common;

use rayon::prelude::*;

use consent_pdf::{Error, FontRole, FontSources, RenderOptions, render_consent_document};

use common::{long_body, sample_input, sparse_input};

fn page_objects(pdf: &[u8]) -> usize {
    let needle = b"/Type /Page";
    pdf.windows(needle.len() + 1)
        .filter(|w| &w[..needle.len()] == needle && w[needle.len()] != b's')
        .count()
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

#[test]
fn rendered_document_is_a_complete_pdf() {
    common::init_logging();
    let mut input = sample_input();
    input.consent_body = Some(long_body(3000));
    let doc = render_consent_document(&input, &RenderOptions::default()).expect("render");

    assert_eq!(doc.content_type, "application/pdf");
    assert!(doc.bytes.starts_with(b"%PDF-"));
    assert!(doc.bytes.trim_ascii_end().ends_with(b"%%EOF"));
    assert!(doc.page_count > 1);
    assert_eq!(page_objects(&doc.bytes), doc.page_count);
    assert!(contains(&doc.bytes, format!("/Count {}", doc.page_count).as_bytes()));
    assert!(contains(&doc.bytes, b"/FlateDecode"));

    let out = common::output_dir("render_output").join("long_body.pdf");
    std::fs::write(&out, &doc.bytes).ok();
}

#[test]
fn standard_fonts_are_referenced_not_embedded() {
    let doc = render_consent_document(&sample_input(), &RenderOptions::default()).expect("render");
    for base in ["Helvetica", "Helvetica-Bold", "Times-Roman", "Times-Italic"] {
        assert!(
            contains(&doc.bytes, format!("/BaseFont /{base}").as_bytes()),
            "{base} missing"
        );
    }
    assert!(!contains(&doc.bytes, b"/FontFile2"));
}

#[test]
fn identical_input_gives_identical_bytes() {
    let mut input = sample_input();
    input.consent_body = Some(long_body(1200));
    let a = render_consent_document(&input, &RenderOptions::default()).expect("render");
    let b = render_consent_document(&input, &RenderOptions::default()).expect("render");
    assert_eq!(a.bytes, b.bytes);
    assert_eq!(a.page_count, b.page_count);
}

#[test]
fn parallel_invocations_do_not_interfere() {
    let inputs: Vec<_> = (0..8)
        .map(|i| {
            let mut input = sample_input();
            input.submission_id = format!("sub-{i}");
            input.consent_body = Some(long_body(300 * (i + 1)));
            input
        })
        .collect();

    let sequential: Vec<Vec<u8>> = inputs
        .iter()
        .map(|input| {
            render_consent_document(input, &RenderOptions::default())
                .expect("render")
                .bytes
        })
        .collect();
    let parallel: Vec<Vec<u8>> = inputs
        .par_iter()
        .map(|input| {
            render_consent_document(input, &RenderOptions::default())
                .expect("render")
                .bytes
        })
        .collect();

    assert_eq!(sequential, parallel);
}

#[test]
fn creation_date_comes_from_the_signing_time() {
    let doc = render_consent_document(&sparse_input(), &RenderOptions::default()).expect("render");
    assert!(contains(&doc.bytes, b"D:20240115193000"));
}

#[test]
fn unparseable_font_program_fails_without_output() {
    let options = RenderOptions {
        fonts: FontSources::default().with(FontRole::Serif, b"definitely not a font".to_vec()),
        ..RenderOptions::default()
    };
    let result = render_consent_document(&sample_input(), &options);
    assert!(matches!(result, Err(Error::Font(_))), "got {:?}", result.err());
}

#[test]
fn missing_font_file_is_an_io_error() {
    let result = FontSources::default().with_file(FontRole::Sans, "tests/no-such-font.ttf".as_ref());
    assert!(matches!(result, Err(Error::Io(_))));
}
