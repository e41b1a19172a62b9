mod common;

use consent_pdf::publish::{
    DocumentStore, PUBLISHED_LINK_TTL, publish_consent_document, storage_key,
};
use consent_pdf::{DocumentRequest, Error, RenderOptions};

use common::{MemoryRecords, MemoryStore, submission};

#[test]
fn publishes_and_links_for_a_year() {
    common::init_logging();
    let records = MemoryRecords::with_submission(submission("sub-1"));
    let store = MemoryStore::default();

    let published = publish_consent_document(
        &DocumentRequest::new("sub-1"),
        &records,
        &store,
        &RenderOptions::default(),
    )
    .expect("publish");

    assert_eq!(published.storage_key, "prov-1/sub-1.pdf");
    assert!(published.regenerated);
    assert_eq!(
        published.url.as_deref(),
        Some(format!("memory://prov-1/sub-1.pdf?ttl={}", PUBLISHED_LINK_TTL.as_secs()).as_str())
    );
    let objects = store.objects.borrow();
    let (bytes, content_type) = &objects["prov-1/sub-1.pdf"];
    assert!(bytes.starts_with(b"%PDF-"));
    assert_eq!(content_type, "application/pdf");
}

#[test]
fn blank_submission_id_is_rejected() {
    let records = MemoryRecords::default();
    let store = MemoryStore::default();
    let result = publish_consent_document(
        &DocumentRequest::new("  "),
        &records,
        &store,
        &RenderOptions::default(),
    );
    assert!(matches!(result, Err(Error::MissingField("submissionId"))));
}

#[test]
fn missing_submission_is_not_found_and_uploads_nothing() {
    let records = MemoryRecords::with_submission(submission("sub-1"));
    let store = MemoryStore::default();
    let result = publish_consent_document(
        &DocumentRequest::new("sub-404"),
        &records,
        &store,
        &RenderOptions::default(),
    );
    assert!(matches!(result, Err(Error::NotFound(_))));
    assert_eq!(store.uploads.get(), 0);
}

#[test]
fn keep_reuses_stored_copy_without_rendering() {
    let sub = submission("sub-1");
    let records = MemoryRecords::with_submission(sub.clone());
    let store = MemoryStore::default();
    store
        .upload(&storage_key(&sub), b"%PDF-cached", "application/pdf")
        .expect("seed");
    store.uploads.set(0);

    let request = DocumentRequest {
        regenerate: false,
        ..DocumentRequest::new("sub-1")
    };
    let published =
        publish_consent_document(&request, &records, &store, &RenderOptions::default())
            .expect("publish");

    assert!(!published.regenerated);
    assert_eq!(published.page_count, None);
    assert_eq!(published.url.as_deref(), Some("memory://prov-1/sub-1.pdf?ttl=3600"));
    assert_eq!(store.uploads.get(), 0);
    assert_eq!(store.objects.borrow()["prov-1/sub-1.pdf"].0, b"%PDF-cached");
}

#[test]
fn keep_without_stored_copy_regenerates() {
    let records = MemoryRecords::with_submission(submission("sub-1"));
    let store = MemoryStore::default();
    let request = DocumentRequest {
        regenerate: false,
        ..DocumentRequest::new("sub-1")
    };
    let published =
        publish_consent_document(&request, &records, &store, &RenderOptions::default())
            .expect("publish");
    assert!(published.regenerated);
    assert_eq!(store.uploads.get(), 1);
}

#[test]
fn regenerate_overwrites_stored_copy() {
    let sub = submission("sub-1");
    let records = MemoryRecords::with_submission(sub.clone());
    let store = MemoryStore::default();
    store
        .upload(&storage_key(&sub), b"%PDF-stale", "application/pdf")
        .expect("seed");

    publish_consent_document(
        &DocumentRequest::new("sub-1"),
        &records,
        &store,
        &RenderOptions::default(),
    )
    .expect("publish");
    assert_ne!(store.objects.borrow()["prov-1/sub-1.pdf"].0, b"%PDF-stale");
}

#[test]
fn upload_failure_is_a_publish_error() {
    let records = MemoryRecords::with_submission(submission("sub-1"));
    let store = MemoryStore {
        fail_uploads: true,
        ..MemoryStore::default()
    };
    let result = publish_consent_document(
        &DocumentRequest::new("sub-1"),
        &records,
        &store,
        &RenderOptions::default(),
    );
    assert!(matches!(result, Err(Error::Publish(_))));
}

#[test]
fn link_failure_after_upload_reports_no_url() {
    let records = MemoryRecords::with_submission(submission("sub-1"));
    let store = MemoryStore {
        fail_links: true,
        ..MemoryStore::default()
    };
    let published = publish_consent_document(
        &DocumentRequest::new("sub-1"),
        &records,
        &store,
        &RenderOptions::default(),
    )
    .expect("publish");
    assert_eq!(published.url, None);
    assert_eq!(store.uploads.get(), 1);
}

#[test]
fn failed_module_lookup_falls_back_to_placeholder_title() {
    let mut records = MemoryRecords::with_submission(submission("sub-1"));
    records.failing_modules = true;
    let store = MemoryStore::default();
    let published = publish_consent_document(
        &DocumentRequest::new("sub-1"),
        &records,
        &store,
        &RenderOptions::default(),
    )
    .expect("publish");
    assert_eq!(published.page_count, Some(1));
}

#[test]
fn unsigned_submission_uses_creation_time() {
    let mut sub = submission("sub-1");
    sub.signed_at = None;
    let input = consent_pdf::ConsentDocumentInput::from_records(&sub, None, None);
    assert_eq!(input.signed_at, sub.created_at);
    assert_eq!(input.procedure_name, None);
    assert_eq!(input.timezone_id, None);
}
