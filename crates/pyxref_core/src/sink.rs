//! The sink interface the core writes its output through. The
//! persisted wire format is entirely the sink's business; the core's only
//! contract is "one `Metadata` message, then one `Document` message per
//! file".

use crate::error::Result;
use crate::model::{Document, Metadata};

pub trait DocumentSink {
    fn write_metadata(&mut self, metadata: Metadata) -> Result<()>;

    fn write_document(&mut self, document: Document) -> Result<()>;
}

/// An in-memory sink, mostly for tests: collects everything written to it.
#[derive(Debug, Default)]
pub struct VecSink {
    pub metadata: Option<Metadata>,
    pub documents: Vec<Document>,
}

impl DocumentSink for VecSink {
    fn write_metadata(&mut self, metadata: Metadata) -> Result<()> {
        self.metadata = Some(metadata);
        Ok(())
    }

    fn write_document(&mut self, document: Document) -> Result<()> {
        self.documents.push(document);
        Ok(())
    }
}
