#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use consent_pdf::publish::{DocumentStore, RecordSource};
use consent_pdf::{
    ConsentDocumentInput, DrawOp, Error, ModuleRecord, Page, PatientName, ProviderRecord,
    SubmissionRecord,
};

pub const CONTENT_FLOOR: f32 = 104.0;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn signed_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 19, 30, 0).unwrap()
}

pub fn sample_input() -> ConsentDocumentInput {
    ConsentDocumentInput {
        patient_name: PatientName::new("Ada", "Lovelace"),
        patient_email: "ada@example.com".to_string(),
        procedure_name: Some("Wisdom Tooth Extraction".to_string()),
        consent_body: Some(
            "Overview\nThe procedure removes one or more wisdom teeth.\n\
             Risks\n- swelling and bruising\n- numbness of the lip or tongue\n\
             Aftercare\nAvoid drinking through a straw for a week."
                .to_string(),
        ),
        signature_text: "Ada Lovelace".to_string(),
        signed_at: signed_at(),
        provider_display_name: Some("Dr. Grace Hopper".to_string()),
        practice_name: Some("Harbor Dental".to_string()),
        timezone_id: Some("America/New_York".to_string()),
        submission_id: "sub-0001".to_string(),
    }
}

/// Input with only the fields a bare submission always carries.
pub fn sparse_input() -> ConsentDocumentInput {
    ConsentDocumentInput {
        patient_name: PatientName::default(),
        patient_email: String::new(),
        procedure_name: None,
        consent_body: None,
        signature_text: String::new(),
        signed_at: signed_at(),
        provider_display_name: None,
        practice_name: None,
        timezone_id: None,
        submission_id: "sub-sparse".to_string(),
    }
}

/// Roughly `words` words of body text split into headed sections, paragraphs and bullets.
pub fn long_body(words: usize) -> String {
    const VOCAB: [&str; 12] = [
        "the", "procedure", "may", "cause", "temporary", "discomfort", "and", "in", "rare",
        "cases", "lasting", "numbness",
    ];
    let mut out = String::new();
    let mut written = 0;
    let mut block = 0;
    while written < words {
        if block % 6 == 0 {
            out.push_str(&format!("# Part {}\n", block / 6 + 1));
        }
        let len = 40 + (block * 7) % 60;
        let sentence: Vec<&str> = (0..len).map(|i| VOCAB[(i + block) % VOCAB.len()]).collect();
        if block % 3 == 2 {
            out.push_str("- ");
        }
        out.push_str(&sentence.join(" "));
        out.push_str(".\n");
        written += len;
        block += 1;
    }
    out
}

pub fn all_ops(pages: &[Page]) -> impl Iterator<Item = (usize, &DrawOp)> {
    pages
        .iter()
        .enumerate()
        .flat_map(|(i, page)| page.ops().iter().map(move |op| (i, op)))
}

pub fn all_texts(pages: &[Page]) -> Vec<String> {
    pages
        .iter()
        .flat_map(|p| p.texts().map(str::to_string))
        .collect()
}

/// Output directory for rendered artifacts: tests/output/<name>/
pub fn output_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("tests/output").join(name);
    std::fs::create_dir_all(&dir).ok();
    dir
}

pub fn find_system_font(candidates: &[&str]) -> Option<PathBuf> {
    candidates
        .iter()
        .map(Path::new)
        .find(|p| p.is_file())
        .map(Path::to_path_buf)
}

pub fn submission(id: &str) -> SubmissionRecord {
    SubmissionRecord {
        id: id.to_string(),
        patient_first_name: Some("Ada".to_string()),
        patient_last_name: Some("Lovelace".to_string()),
        patient_email: Some("ada@example.com".to_string()),
        signature: Some("Ada Lovelace".to_string()),
        signed_at: Some(signed_at()),
        created_at: signed_at(),
        provider_id: "prov-1".to_string(),
        module_id: Some("mod-1".to_string()),
    }
}

#[derive(Default)]
pub struct MemoryRecords {
    pub submissions: HashMap<String, SubmissionRecord>,
    pub modules: HashMap<String, ModuleRecord>,
    pub providers: HashMap<String, ProviderRecord>,
    pub failing_modules: bool,
}

impl MemoryRecords {
    pub fn with_submission(submission: SubmissionRecord) -> Self {
        let mut records = MemoryRecords::default();
        records.modules.insert(
            "mod-1".to_string(),
            ModuleRecord {
                name: Some("Wisdom Tooth Extraction".to_string()),
                description: Some("Risks\nSwelling is common.".to_string()),
            },
        );
        records.providers.insert(
            "prov-1".to_string(),
            ProviderRecord {
                full_name: Some("Dr. Grace Hopper".to_string()),
                practice_name: Some("Harbor Dental".to_string()),
                timezone: Some("America/New_York".to_string()),
            },
        );
        records
            .submissions
            .insert(submission.id.clone(), submission);
        records
    }
}

impl RecordSource for MemoryRecords {
    fn submission(&self, id: &str) -> Result<Option<SubmissionRecord>, Error> {
        Ok(self.submissions.get(id).cloned())
    }

    fn module(&self, id: &str) -> Result<Option<ModuleRecord>, Error> {
        if self.failing_modules {
            return Err(Error::Records("modules table unavailable".to_string()));
        }
        Ok(self.modules.get(id).cloned())
    }

    fn provider(&self, id: &str) -> Result<Option<ProviderRecord>, Error> {
        Ok(self.providers.get(id).cloned())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub objects: RefCell<HashMap<String, (Vec<u8>, String)>>,
    pub uploads: Cell<usize>,
    pub fail_uploads: bool,
    pub fail_links: bool,
}

impl DocumentStore for MemoryStore {
    fn upload(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<(), Error> {
        if self.fail_uploads {
            return Err(Error::Io(std::io::Error::other("bucket is read-only")));
        }
        self.uploads.set(self.uploads.get() + 1);
        self.objects
            .borrow_mut()
            .insert(key.to_string(), (bytes.to_vec(), content_type.to_string()));
        Ok(())
    }

    fn signed_url(&self, key: &str, expires_in: Duration) -> Result<String, Error> {
        if self.fail_links {
            return Err(Error::Publish("link service unavailable".to_string()));
        }
        if !self.objects.borrow().contains_key(key) {
            return Err(Error::NotFound(key.to_string()));
        }
        Ok(format!("memory://{key}?ttl={}", expires_in.as_secs()))
    }
}
