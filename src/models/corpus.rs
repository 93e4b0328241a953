use crate::error::AppError;
use crate::models::Document;
use std::path::Path;
use std::sync::Arc;
use validator::Validate;

/// Result type for corpus operations
pub type CorpusResult<T> = std::result::Result<T, CorpusError>;

/// Errors raised while loading a corpus file
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON
    #[error("Failed to parse corpus: {0}")]
    Parse(#[from] serde_json::Error),

    /// A document failed validation
    #[error("Invalid document at position {position}: {message}")]
    InvalidDocument { position: usize, message: String },
}

impl From<CorpusError> for AppError {
    fn from(err: CorpusError) -> Self {
        match err {
            CorpusError::Io(err) => AppError::Io(err),
            _ => AppError::Corpus(err.to_string()),
        }
    }
}

/// Read-only, shareable document set
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Arc<[Document]>,
}

impl Corpus {
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents: documents.into(),
        }
    }

    /// Parse a JSON array of documents
    pub fn from_json_str(json: &str) -> CorpusResult<Self> {
        let documents: Vec<Document> = serde_json::from_str(json)?;

        for (position, document) in documents.iter().enumerate() {
            document
                .validate()
                .map_err(|e| CorpusError::InvalidDocument {
                    position,
                    message: e.to_string(),
                })?;
        }

        Ok(Self::new(documents))
    }

    /// Load a JSON array of documents from disk
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> CorpusResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let corpus = Self::from_json_str(&raw)?;
        tracing::info!(
            path = %path.as_ref().display(),
            documents = corpus.len(),
            "Loaded corpus"
        );
        Ok(corpus)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn get(&self, index: usize) -> Option<&Document> {
        self.documents.get(index)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl From<Vec<Document>> for Corpus {
    fn from(documents: Vec<Document>) -> Self {
        Self::new(documents)
    }
}
