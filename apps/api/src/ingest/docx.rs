//! DOCX text extraction.
//!
//! A DOCX file is a ZIP archive; the body lives in `word/document.xml` as a
//! sequence of `w:p` paragraphs made of runs holding `w:t` text nodes.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use super::IngestError;

const FORMAT: &str = "DOCX";
const DOCUMENT_PART: &str = "word/document.xml";

/// Upper bound on the inflated size of `word/document.xml`.
const MAX_DOCUMENT_XML_BYTES: u64 = 32 * 1024 * 1024;

/// Extracts every paragraph's text in document order, joined with `\n`.
pub fn extract_flow(bytes: &[u8]) -> Result<String, IngestError> {
    extract_flow_capped(bytes, MAX_DOCUMENT_XML_BYTES)
}

fn extract_flow_capped(bytes: &[u8], max_xml_bytes: u64) -> Result<String, IngestError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| IngestError::extraction(FORMAT, format!("not a DOCX archive: {e}")))?;

    let part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| IngestError::extraction(FORMAT, format!("{DOCUMENT_PART}: {e}")))?;
    if part.size() > max_xml_bytes {
        return Err(too_large(max_xml_bytes));
    }

    // The declared size can lie, so the read itself is bounded too.
    let mut xml = String::new();
    part.take(max_xml_bytes + 1)
        .read_to_string(&mut xml)
        .map_err(|e| IngestError::extraction(FORMAT, format!("{DOCUMENT_PART}: {e}")))?;
    if xml.len() as u64 > max_xml_bytes {
        return Err(too_large(max_xml_bytes));
    }

    Ok(paragraphs(&xml)?.join("\n"))
}

fn too_large(max_xml_bytes: u64) -> IngestError {
    IngestError::extraction(
        FORMAT,
        format!("{DOCUMENT_PART} inflates past {max_xml_bytes} bytes"),
    )
}

/// Walks the document XML and returns the text of each paragraph.
///
/// Paragraphs nested inside another (text boxes) are emitted when they close,
/// so they appear before the paragraph that contains them. `mc:Fallback`
/// subtrees repeat their `mc:Choice` sibling and are skipped.
fn paragraphs(xml: &str) -> Result<Vec<String>, IngestError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut buf = Vec::new();
    let mut out = Vec::new();
    let mut open: Vec<String> = Vec::new();
    let mut in_text = false;
    // Runs nest through drawings holding text boxes.
    let mut run_depth = 0usize;
    let mut fallback_depth = 0usize;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| xml_error(&reader, e))?;

        if fallback_depth > 0 {
            match event {
                Event::Start(ref e) if e.local_name().as_ref() == b"Fallback" => {
                    fallback_depth += 1
                }
                Event::End(ref e) if e.local_name().as_ref() == b"Fallback" => {
                    fallback_depth -= 1
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
            continue;
        }

        match event {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"p" => open.push(String::new()),
                b"r" => run_depth += 1,
                b"t" => in_text = true,
                b"Fallback" => fallback_depth = 1,
                _ => {}
            },
            Event::End(ref e) => match e.local_name().as_ref() {
                b"p" => {
                    if let Some(paragraph) = open.pop() {
                        out.push(paragraph);
                    }
                }
                b"r" => run_depth = run_depth.saturating_sub(1),
                b"t" => in_text = false,
                _ => {}
            },
            // Tab stops under `w:pPr/w:tabs` share the `tab` name; only
            // tabs inside a run are content.
            Event::Empty(ref e) => match e.local_name().as_ref() {
                b"p" => out.push(String::new()),
                b"tab" if run_depth > 0 => push_char(&mut open, '\t'),
                b"br" | b"cr" if run_depth > 0 => push_char(&mut open, '\n'),
                _ => {}
            },
            Event::Text(ref e) if in_text => {
                let text = e.unescape().map_err(|err| xml_error(&reader, err))?;
                if let Some(paragraph) = open.last_mut() {
                    paragraph.push_str(&text);
                }
            }
            Event::CData(ref e) if in_text => {
                if let Some(paragraph) = open.last_mut() {
                    paragraph.push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !open.is_empty() {
        return Err(IngestError::extraction(
            FORMAT,
            format!("{DOCUMENT_PART}: unterminated paragraph"),
        ));
    }

    Ok(out)
}

fn push_char(open: &mut [String], c: char) {
    if let Some(paragraph) = open.last_mut() {
        paragraph.push(c);
    }
}

fn xml_error(reader: &Reader<&[u8]>, err: quick_xml::Error) -> IngestError {
    IngestError::extraction(
        FORMAT,
        format!(
            "{DOCUMENT_PART}: {err} at byte {}",
            reader.buffer_position()
        ),
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
    const MC_NS: &str = "http://schemas.openxmlformats.org/markup-compatibility/2006";

    /// Wraps body XML in a `w:document` and packs it into an in-memory DOCX.
    pub(crate) fn build_docx(body: &str) -> Vec<u8> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{W_NS}" xmlns:mc="{MC_NS}"><w:body>{body}</w:body></w:document>"#
        );
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        writer.start_file("[Content_Types].xml", options).unwrap();
        writer.write_all(b"<Types/>").unwrap();
        writer.start_file(DOCUMENT_PART, options).unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    fn para(text: &str) -> String {
        format!("<w:p><w:r><w:t>{text}</w:t></w:r></w:p>")
    }

    #[test]
    fn test_extract_flow_joins_paragraphs_with_newline() {
        let bytes = build_docx(&format!("{}{}", para("Hello"), para("World")));
        assert_eq!(extract_flow(&bytes).unwrap(), "Hello\nWorld");
    }

    #[test]
    fn test_extract_flow_concatenates_runs_within_paragraph() {
        let body = r#"<w:p><w:r><w:t xml:space="preserve">Senior </w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>Engineer</w:t></w:r></w:p>"#;
        assert_eq!(extract_flow(&build_docx(body)).unwrap(), "Senior Engineer");
    }

    #[test]
    fn test_extract_flow_keeps_empty_paragraphs() {
        let body = format!("{}<w:p/>{}", para("Top"), para("Bottom"));
        assert_eq!(extract_flow(&build_docx(&body)).unwrap(), "Top\n\nBottom");
    }

    #[test]
    fn test_extract_flow_unescapes_entities() {
        let bytes = build_docx(&para("R&amp;D &lt;lead&gt;"));
        assert_eq!(extract_flow(&bytes).unwrap(), "R&D <lead>");
    }

    #[test]
    fn test_extract_flow_tabs_and_breaks() {
        let body = "<w:p><w:r><w:t>2019</w:t><w:tab/><w:t>Acme</w:t><w:br/><w:t>Remote</w:t></w:r></w:p>";
        assert_eq!(extract_flow(&build_docx(body)).unwrap(), "2019\tAcme\nRemote");
    }

    #[test]
    fn test_extract_flow_ignores_tab_stop_definitions() {
        let body = r#"<w:p><w:pPr><w:tabs><w:tab w:val="right" w:pos="9360"/></w:tabs></w:pPr><w:r><w:t>Acme</w:t><w:tab/><w:t>2019</w:t></w:r></w:p>"#;
        assert_eq!(extract_flow(&build_docx(body)).unwrap(), "Acme\t2019");
    }

    #[test]
    fn test_extract_flow_reads_text_box_once() {
        let text_box = para("Contact");
        let body = format!(
            r#"<w:p><w:r><mc:AlternateContent><mc:Choice Requires="wps"><w:drawing><wps:txbx><w:txbxContent>{text_box}</w:txbxContent></wps:txbx></w:drawing></mc:Choice><mc:Fallback><w:pict><v:textbox><w:txbxContent>{text_box}</w:txbxContent></v:textbox></w:pict></mc:Fallback></mc:AlternateContent></w:r></w:p>{}"#,
            para("Body")
        );
        let text = extract_flow(&build_docx(&body)).unwrap();
        assert_eq!(text.matches("Contact").count(), 1, "{text:?}");
        assert_eq!(text, "Contact\n\nBody");
    }

    #[test]
    fn test_extract_flow_rejects_oversized_document_part() {
        let bytes = build_docx(&para(&"x".repeat(256)));
        let err = extract_flow_capped(&bytes, 128).unwrap_err();
        assert!(err.to_string().contains("inflates past 128 bytes"), "{err}");
        assert!(extract_flow_capped(&bytes, MAX_DOCUMENT_XML_BYTES).is_ok());
    }

    #[test]
    fn test_extract_flow_ignores_text_outside_t_nodes() {
        let body = "<w:p><w:r><w:instrText>PAGE</w:instrText><w:t>Visible</w:t></w:r></w:p>";
        assert_eq!(extract_flow(&build_docx(body)).unwrap(), "Visible");
    }

    #[test]
    fn test_extract_flow_empty_body_is_empty_text() {
        assert_eq!(extract_flow(&build_docx("")).unwrap(), "");
    }

    #[test]
    fn test_extract_flow_not_a_zip() {
        let err = extract_flow(b"plain bytes").unwrap_err();
        assert!(err.to_string().contains("not a DOCX archive"), "{err}");
    }

    #[test]
    fn test_extract_flow_missing_document_part() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("other.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<x/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let err = extract_flow(&bytes).unwrap_err();
        assert!(err.to_string().contains(DOCUMENT_PART), "{err}");
    }

    #[test]
    fn test_extract_flow_broken_xml() {
        let err = extract_flow(&build_docx("<w:p><w:r><w:t>oops</w:r></w:p>")).unwrap_err();
        assert!(matches!(err, IngestError::Extraction { format: "DOCX", .. }));
    }
}
