//! Document ingestion — format detection and per-format text extraction.
//!
//! Everything here works on in-memory buffers; nothing is written to disk.

pub mod docx;
pub mod pdf;
pub mod plain_text;

use bytes::Bytes;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Unsupported file format '{0}'. Please upload PDF, DOCX, or TXT file.")]
    UnsupportedFormat(String),

    #[error("Error extracting text from {format}: {reason}")]
    Extraction {
        format: &'static str,
        reason: String,
    },

    #[error("File is not valid UTF-8 text: {0}")]
    Decode(#[from] std::string::FromUtf8Error),
}

impl IngestError {
    pub(crate) fn extraction(format: &'static str, reason: impl ToString) -> Self {
        IngestError::Extraction {
            format,
            reason: reason.to_string(),
        }
    }
}

/// The closed set of document families we can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    PlainText,
    /// Paragraph-oriented word-processor documents (DOCX).
    FlowDocument,
    /// Page-oriented documents (PDF).
    PageDocument,
}

impl DocumentFormat {
    /// Picks the format from the text after the last `.` in `declared_name`, case-insensitively.
    pub fn detect(declared_name: &str) -> Result<Self, IngestError> {
        let extension = declared_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(DocumentFormat::PageDocument),
            "docx" | "doc" => Ok(DocumentFormat::FlowDocument),
            "txt" => Ok(DocumentFormat::PlainText),
            _ => Err(IngestError::UnsupportedFormat(extension)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::PlainText => "TXT",
            DocumentFormat::FlowDocument => "DOCX",
            DocumentFormat::PageDocument => "PDF",
        }
    }
}

/// An uploaded file as received. Lives for one request only.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub bytes: Bytes,
    pub declared_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub content: String,
}

/// Routes `bytes` to the extractor matching `declared_name`'s extension.
pub fn dispatch(declared_name: &str, bytes: &[u8]) -> Result<ExtractedText, IngestError> {
    let format = DocumentFormat::detect(declared_name)?;
    let content = match format {
        DocumentFormat::PageDocument => pdf::extract_pages(bytes)?,
        DocumentFormat::FlowDocument => docx::extract_flow(bytes)?,
        DocumentFormat::PlainText => plain_text::decode(bytes)?,
    };
    info!(
        format = format.as_str(),
        bytes = bytes.len(),
        chars = content.chars().count(),
        "Text extraction complete"
    );
    Ok(ExtractedText { content })
}

/// Runs [`dispatch`] on the blocking pool so parsing never stalls the runtime.
pub async fn extract_document(document: RawDocument) -> Result<ExtractedText, IngestError> {
    // Reject unknown extensions before paying for a blocking task.
    let format = DocumentFormat::detect(&document.declared_name)?;
    tokio::task::spawn_blocking(move || dispatch(&document.declared_name, &document.bytes))
        .await
        .map_err(|e| IngestError::extraction(format.as_str(), format!("task join error: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_supported_extensions_any_case() {
        let cases = [
            ("resume.pdf", DocumentFormat::PageDocument),
            ("RESUME.PDF", DocumentFormat::PageDocument),
            ("cv.docx", DocumentFormat::FlowDocument),
            ("cv.DocX", DocumentFormat::FlowDocument),
            ("old.doc", DocumentFormat::FlowDocument),
            ("notes.txt", DocumentFormat::PlainText),
            ("notes.TXT", DocumentFormat::PlainText),
            ("my.resume.final.pdf", DocumentFormat::PageDocument),
        ];
        for (name, expected) in cases {
            assert_eq!(DocumentFormat::detect(name).unwrap(), expected, "{name}");
        }
    }

    #[test]
    fn test_detect_unknown_extension_names_it() {
        match DocumentFormat::detect("photo.PNG") {
            Err(IngestError::UnsupportedFormat(ext)) => assert_eq!(ext, "png"),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_detect_missing_extension_is_unsupported() {
        assert!(matches!(
            DocumentFormat::detect("resume"),
            Err(IngestError::UnsupportedFormat(ext)) if ext.is_empty()
        ));
        assert!(matches!(
            DocumentFormat::detect("resume."),
            Err(IngestError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_dispatch_txt_decodes() {
        let text = dispatch("resume.txt", "John Doe\nSoftware Engineer".as_bytes()).unwrap();
        assert_eq!(text.content, "John Doe\nSoftware Engineer");
    }

    #[test]
    fn test_dispatch_txt_invalid_utf8_is_decode_error() {
        let err = dispatch("resume.txt", &[0x66, 0x6f, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, IngestError::Decode(_)));
    }

    #[test]
    fn test_dispatch_corrupt_pdf_is_extraction_error() {
        let err = dispatch("resume.pdf", b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, IngestError::Extraction { format: "PDF", .. }));
    }

    #[test]
    fn test_dispatch_legacy_doc_goes_through_flow_extractor() {
        // A binary .doc is not a ZIP container, so the flow extractor rejects it.
        let err = dispatch("resume.doc", &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1]).unwrap_err();
        assert!(matches!(err, IngestError::Extraction { format: "DOCX", .. }));
    }

    #[test]
    fn test_dispatch_unsupported_never_reads_bytes() {
        let err = dispatch("resume.rtf", b"{\\rtf1}").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported file format 'rtf'. Please upload PDF, DOCX, or TXT file."
        );
    }

    #[tokio::test]
    async fn test_extract_document_runs_off_runtime() {
        let doc = RawDocument {
            bytes: Bytes::from_static(b"plain resume"),
            declared_name: "Resume.Txt".to_string(),
        };
        let text = extract_document(doc).await.unwrap();
        assert_eq!(text.content, "plain resume");
    }
}
