use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use textbrief_common::{Result, TextBriefError};
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";

/// Extract raw text from a .docx (OOXML) package.
///
/// Legacy binary .doc files are not zip archives and fail here.
pub(crate) fn extract_word(bytes: &[u8]) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| {
        TextBriefError::extraction(format!(
            "Failed to parse Word document. Please ensure it is a valid .docx file. ({})",
            e
        ))
    })?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| TextBriefError::extraction(format!("Missing {}: {}", DOCUMENT_PART, e)))?
        .read_to_string(&mut xml)
        .map_err(|e| TextBriefError::extraction(format!("Failed to read {}: {}", DOCUMENT_PART, e)))?;

    document_text(&xml)
}

/// Walk `word/document.xml`: text runs are concatenated, paragraphs end with a newline
fn document_text(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => out.push('\t'),
                b"w:br" | b"w:cr" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| TextBriefError::extraction(format!("Invalid document text: {}", e)))?;
                out.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(TextBriefError::extraction(format!(
                    "Malformed document XML at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    Ok(out)
}
