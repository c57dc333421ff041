use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use std::collections::HashMap;
use uuid::Uuid;

pub const BLOB_PREFIX: &str = "/blob/";

/// Uploaded bytes held for the lifetime of the session.
#[derive(Debug, Clone)]
pub struct Blob {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Blob {
    /// `Content-Disposition` value that survives non-ASCII file names.
    pub fn disposition(&self) -> String {
        format!(
            "inline; filename*=UTF-8''{}",
            utf8_percent_encode(&self.file_name, NON_ALPHANUMERIC)
        )
    }
}

#[derive(Debug, Default)]
pub struct BlobStore {
    blobs: HashMap<Uuid, Blob>,
}

pub fn locator(id: Uuid) -> String {
    format!("{BLOB_PREFIX}{id}")
}

/// Blob handle from a locator produced by [`locator`]; other urls are not ours.
pub fn parse_locator(url: &str) -> Option<Uuid> {
    url.strip_prefix(BLOB_PREFIX).and_then(|s| Uuid::parse_str(s).ok())
}

impl BlobStore {
    pub fn insert(&mut self, blob: Blob) -> Uuid {
        let id = Uuid::new_v4();
        self.blobs.insert(id, blob);
        id
    }

    pub fn get(&self, id: &Uuid) -> Option<&Blob> {
        self.blobs.get(id)
    }

    pub fn release(&mut self, url: &str) -> bool {
        parse_locator(url)
            .and_then(|id| self.blobs.remove(&id))
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }
}
