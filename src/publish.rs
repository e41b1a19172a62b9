use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::{
    ConsentDocumentInput, DocumentRequest, ModuleRecord, ProviderRecord, RenderOptions,
    SubmissionRecord,
};

/// Lifetime of a link handed out for an already stored document.
pub const CACHED_LINK_TTL: Duration = Duration::from_secs(60 * 60);
/// Lifetime of a link handed out right after publishing.
pub const PUBLISHED_LINK_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

pub trait RecordSource {
    fn submission(&self, id: &str) -> Result<Option<SubmissionRecord>, Error>;
    fn module(&self, id: &str) -> Result<Option<ModuleRecord>, Error>;
    fn provider(&self, id: &str) -> Result<Option<ProviderRecord>, Error>;
}

pub trait DocumentStore {
    /// Store `bytes` under `key`, replacing any existing object.
    fn upload(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<(), Error>;
    /// Time-limited retrieval URL for an existing object.
    fn signed_url(&self, key: &str, expires_in: Duration) -> Result<String, Error>;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PublishedDocument {
    #[serde(rename = "fileName")]
    pub storage_key: String,
    /// `None` when the document was stored but no link could be issued.
    #[serde(rename = "pdfUrl")]
    pub url: Option<String>,
    /// Pages rendered; `None` when a stored copy was reused.
    #[serde(rename = "pageCount")]
    pub page_count: Option<usize>,
    pub regenerated: bool,
}

pub fn storage_key(submission: &SubmissionRecord) -> String {
    format!("{}/{}.pdf", submission.provider_id, submission.id)
}

/// Render and store the consent document for `request.submission_id`.
///
/// With `regenerate == false` an existing stored copy is reused when a link can
/// be issued for it. A missing submission fails before anything is rendered;
/// a failed upload fails after rendering with [`Error::Publish`].
pub fn publish_consent_document(
    request: &DocumentRequest,
    records: &impl RecordSource,
    store: &impl DocumentStore,
    options: &RenderOptions,
) -> Result<PublishedDocument, Error> {
    let submission_id = request.submission_id.trim();
    if submission_id.is_empty() {
        return Err(Error::MissingField("submissionId"));
    }

    let submission = records
        .submission(submission_id)?
        .ok_or_else(|| Error::NotFound(format!("submission {submission_id}")))?;
    let key = storage_key(&submission);

    if !request.regenerate {
        match store.signed_url(&key, CACHED_LINK_TTL) {
            Ok(url) => {
                log::info!("publish: reusing stored document {key}");
                return Ok(PublishedDocument {
                    storage_key: key,
                    url: Some(url),
                    page_count: None,
                    regenerated: false,
                });
            }
            Err(e) => log::warn!("publish: no usable stored copy of {key} ({e}), regenerating"),
        }
    }

    let module = match submission.module_id.as_deref() {
        Some(module_id) => optional_lookup("module", module_id, records.module(module_id)),
        None => None,
    };
    let provider = optional_lookup(
        "provider",
        &submission.provider_id,
        records.provider(&submission.provider_id),
    );

    let input = ConsentDocumentInput::from_records(&submission, module.as_ref(), provider.as_ref());
    let rendered = crate::render_consent_document(&input, options)?;

    store
        .upload(&key, &rendered.bytes, rendered.content_type)
        .map_err(|e| Error::Publish(format!("upload of {key} failed: {e}")))?;

    let url = match store.signed_url(&key, PUBLISHED_LINK_TTL) {
        Ok(url) => Some(url),
        Err(e) => {
            log::warn!("publish: stored {key} but could not issue a link: {e}");
            None
        }
    };

    Ok(PublishedDocument {
        storage_key: key,
        url,
        page_count: Some(rendered.page_count),
        regenerated: true,
    })
}

fn optional_lookup<T>(kind: &str, id: &str, result: Result<Option<T>, Error>) -> Option<T> {
    match result {
        Ok(Some(record)) => Some(record),
        Ok(None) => {
            log::warn!("publish: {kind} {id} not found, using fallbacks");
            None
        }
        Err(e) => {
            log::warn!("publish: {kind} {id} lookup failed ({e}), using fallbacks");
            None
        }
    }
}

/// One submission with its module and provider, as exported from the records
/// backend.
#[derive(Clone, Debug, Deserialize)]
pub struct RecordBundle {
    pub submission: SubmissionRecord,
    #[serde(default)]
    pub module: Option<ModuleRecord>,
    #[serde(default)]
    pub provider: Option<ProviderRecord>,
}

impl RecordBundle {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn request(&self) -> DocumentRequest {
        DocumentRequest::new(self.submission.id.clone())
    }
}

impl RecordSource for RecordBundle {
    fn submission(&self, id: &str) -> Result<Option<SubmissionRecord>, Error> {
        Ok((self.submission.id == id).then(|| self.submission.clone()))
    }

    fn module(&self, id: &str) -> Result<Option<ModuleRecord>, Error> {
        let matches = self.submission.module_id.as_deref() == Some(id);
        Ok(self.module.clone().filter(|_| matches))
    }

    fn provider(&self, id: &str) -> Result<Option<ProviderRecord>, Error> {
        let matches = self.submission.provider_id == id;
        Ok(self.provider.clone().filter(|_| matches))
    }
}

/// Document store backed by a local directory. Links are `file://` URLs
/// carrying the requested lifetime as an `expires` query parameter.
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, Error> {
        let relative = Path::new(key);
        let plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if key.is_empty() || !plain {
            return Err(Error::Publish(format!("invalid storage key {key:?}")));
        }
        Ok(self.root.join(relative))
    }
}

impl DocumentStore for DirectoryStore {
    fn upload(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<(), Error> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, bytes)?;
        log::debug!("DirectoryStore: wrote {} ({content_type}, {} bytes)", path.display(), bytes.len());
        Ok(())
    }

    fn signed_url(&self, key: &str, expires_in: Duration) -> Result<String, Error> {
        let path = self.path_for(key)?;
        if !path.is_file() {
            return Err(Error::NotFound(format!("stored document {key}")));
        }
        let absolute = std::fs::canonicalize(&path)?;
        Ok(format!(
            "file://{}?expires={}",
            absolute.display(),
            expires_in.as_secs()
        ))
    }
}
