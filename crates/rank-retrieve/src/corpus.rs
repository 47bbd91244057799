//! CorpusManager (C7): the single source of truth for (passage, metadata)
//! pairs. Assigns dense `DocIndex`es in insertion order and keeps the
//! passage list and metadata list in lockstep (invariant 1: their
//! lengths are always equal).
//!
//! Deletion is per-document (`document_id`) or global (`clear`); either
//! way the manager rebuilds its contiguous `0..N-1` indexing rather than
//! leaving holes, since `DocIndex` stability is only promised "for the
//! lifetime of an index" and a deletion ends that lifetime for the
//! affected slots.

use crate::error::RetrieveError;
use crate::metadata::{Metadata, MetadataValue};

/// Owns the append-only passage list and its parallel metadata list.
#[derive(Debug, Default)]
pub struct CorpusManager {
    passages: Vec<String>,
    metadata: Vec<Metadata>,
}

impl CorpusManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    pub fn passages(&self) -> &[String] {
        &self.passages
    }

    pub fn metadata(&self) -> &[Metadata] {
        &self.metadata
    }

    /// Appends `texts` with either caller-supplied `metadata` (one entry
    /// per text) or, if `None`, a synthesized `{"doc_id": <next index>}`
    /// per passage. When `document_id` is given it is force-written into
    /// every new passage's metadata under the `document_id` key, even if
    /// the caller's metadata already had a different value there — this
    /// matches the upstream ingestion API, which always lets the
    /// explicit `document_id` parameter win.
    ///
    /// Returns the assigned `DocIndex`es. Fails with `InvalidInput` if a
    /// supplied metadata list's length does not match `texts`'.
    pub fn add(
        &mut self,
        texts: &[String],
        metadata: Option<Vec<Metadata>>,
        document_id: Option<&str>,
    ) -> Result<Vec<u32>, RetrieveError> {
        if let Some(ref m) = metadata {
            if m.len() != texts.len() {
                return Err(RetrieveError::InvalidInput(format!(
                    "metadata length {} does not match texts length {}",
                    m.len(),
                    texts.len()
                )));
            }
        }

        let start = self.passages.len();
        let mut new_metadata = metadata.unwrap_or_else(|| {
            (0..texts.len())
                .map(|i| {
                    let mut m = Metadata::new();
                    m.insert(
                        "doc_id".to_string(),
                        MetadataValue::Int((start + i) as i64),
                    );
                    m
                })
                .collect()
        });

        if let Some(doc_id) = document_id {
            for m in &mut new_metadata {
                m.insert(
                    "document_id".to_string(),
                    MetadataValue::Str(doc_id.to_string()),
                );
            }
        }

        let indices: Vec<u32> = (start..start + texts.len()).map(|i| i as u32).collect();
        self.passages.extend_from_slice(texts);
        self.metadata.extend(new_metadata);
        log::info!("corpus now contains {} passages", self.passages.len());
        Ok(indices)
    }

    /// Removes every passage whose `document_id` metadata equals `id`,
    /// reassigning the remaining passages contiguous indices in their
    /// original relative order. Returns the number of passages removed.
    pub fn remove_document(&mut self, id: &str) -> usize {
        let before = self.passages.len();
        let mut kept_passages = Vec::with_capacity(before);
        let mut kept_metadata = Vec::with_capacity(before);
        for (passage, meta) in self.passages.drain(..).zip(self.metadata.drain(..)) {
            if crate::metadata::document_id(&meta) == Some(id) {
                continue;
            }
            kept_passages.push(passage);
            kept_metadata.push(meta);
        }
        let removed = before - kept_passages.len();
        self.passages = kept_passages;
        self.metadata = kept_metadata;
        if removed == 0 {
            log::warn!("no passages matched document_id {id}");
        } else {
            log::info!("removed {removed} passages for document_id {id}");
        }
        removed
    }

    /// Removes every passage, resetting `DocIndex` assignment to start
    /// at 0 again.
    pub fn clear(&mut self) {
        self.passages.clear();
        self.metadata.clear();
        log::info!("corpus cleared");
    }

    /// Returns the `DocIndex`es whose metadata's `document_id` is in
    /// `document_ids`. `None` means "no filter" (every index).
    pub fn filter_indices(&self, document_ids: Option<&[String]>) -> Vec<u32> {
        match document_ids {
            None => (0..self.passages.len() as u32).collect(),
            Some(ids) => self
                .metadata
                .iter()
                .enumerate()
                .filter_map(|(i, m)| {
                    let doc_id = crate::metadata::document_id(m)?;
                    ids.iter().any(|id| id == doc_id).then_some(i as u32)
                })
                .collect(),
        }
    }
}
