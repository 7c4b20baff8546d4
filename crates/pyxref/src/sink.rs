//! The bundled [`DocumentSink`]: length-delimited `serde_json` records (one
//! JSON value per line) written to a file or stdout. Stands in for the
//! "structured binary stream" `spec.md` §6 leaves unspecified.

use std::io::Write;

use pyxref_core::error::IndexError;
use pyxref_core::model::{Document, Metadata};
use pyxref_core::sink::DocumentSink;

#[derive(serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Record<'a> {
    Metadata(&'a Metadata),
    Document(&'a Document),
}

pub struct JsonLinesSink<W> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> JsonLinesSink<W> {
        JsonLinesSink { writer }
    }

    fn write_record(&mut self, record: &Record) -> pyxref_core::error::Result<()> {
        let line = serde_json::to_string(record)
            .map_err(|err| IndexError::SinkWriteFailed(anyhow::Error::new(err)))?;
        writeln!(self.writer, "{line}").map_err(|err| IndexError::SinkWriteFailed(anyhow::Error::new(err)))
    }
}

impl<W: Write> DocumentSink for JsonLinesSink<W> {
    fn write_metadata(&mut self, metadata: Metadata) -> pyxref_core::error::Result<()> {
        self.write_record(&Record::Metadata(&metadata))
    }

    fn write_document(&mut self, document: Document) -> pyxref_core::error::Result<()> {
        self.write_record(&Record::Document(&document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyxref_core::model::{Document, Metadata, ToolInfo};

    #[test]
    fn writes_one_json_line_per_record() {
        let mut buf = Vec::new();
        {
            let mut sink = JsonLinesSink::new(&mut buf);
            sink.write_document(Document::new("m.py")).unwrap();
            sink.write_metadata(Metadata::new(
                "file:///proj",
                ToolInfo {
                    name: "pyxref".to_string(),
                    version: "0.0.0".to_string(),
                    arguments: vec!["pyxref".to_string()],
                },
            ))
            .unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"type\":\"document\""));
        assert!(lines[1].contains("\"type\":\"metadata\""));
    }
}
