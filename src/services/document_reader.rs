// Document Reader Service
// Extracts plain text from submitted report files

use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("DOCX parse error: {0}")]
    Docx(String),
    #[error("PDF parse error: {0}")]
    Pdf(String),
    #[error("No text found in {0}")]
    Empty(String),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DocumentKind {
    PlainText,
    Docx,
    Pdf,
}

impl DocumentKind {
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let ext = Path::new(file_name)
            .extension()?
            .to_string_lossy()
            .to_ascii_lowercase();
        match ext.as_str() {
            "txt" | "md" => Some(Self::PlainText),
            "docx" => Some(Self::Docx),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }
}

fn docx_text(bytes: &[u8]) -> Result<String, DocumentError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| DocumentError::Docx(e.to_string()))?;

    let mut paragraphs = Vec::new();
    for child in docx.document.children {
        let DocumentChild::Paragraph(para) = child else {
            continue;
        };
        let mut line = String::new();
        for pc in &para.children {
            if let ParagraphChild::Run(run) = pc {
                for rc in &run.children {
                    match rc {
                        RunChild::Text(t) => line.push_str(&t.text),
                        RunChild::Tab(_) => line.push('\t'),
                        _ => {}
                    }
                }
            }
        }
        paragraphs.push(line);
    }

    // Word paragraphs become blank-line separated blocks.
    Ok(paragraphs.join("\n\n"))
}

/// Extract text from a submitted file by extension.
pub fn extract_text(file_name: &str, bytes: &[u8]) -> Result<String, DocumentError> {
    let kind = DocumentKind::from_file_name(file_name)
        .ok_or_else(|| DocumentError::UnsupportedType(file_name.to_string()))?;
    debug!(file_name, ?kind, bytes = bytes.len(), "document.extract");

    let text = match kind {
        DocumentKind::PlainText => String::from_utf8_lossy(bytes).into_owned(),
        DocumentKind::Docx => docx_text(bytes)?,
        DocumentKind::Pdf => {
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| DocumentError::Pdf(e.to_string()))?
        }
    };

    if text.trim().is_empty() {
        return Err(DocumentError::Empty(file_name.to_string()));
    }

    info!(file_name, chars = text.chars().count(), "document.extracted");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_file_name() {
        assert_eq!(DocumentKind::from_file_name("report.TXT"), Some(DocumentKind::PlainText));
        assert_eq!(DocumentKind::from_file_name("a/b/독후감.docx"), Some(DocumentKind::Docx));
        assert_eq!(DocumentKind::from_file_name("scan.pdf"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_file_name("image.png"), None);
        assert_eq!(DocumentKind::from_file_name("noext"), None);
    }

    #[test]
    fn test_extract_plain_text() {
        let text = extract_text("report.txt", "독후감 내용입니다.".as_bytes()).unwrap();
        assert_eq!(text, "독후감 내용입니다.");
    }

    #[test]
    fn test_extract_rejects_empty_and_unknown() {
        assert!(matches!(extract_text("blank.txt", b"  \n"), Err(DocumentError::Empty(_))));
        assert!(matches!(extract_text("photo.jpg", b"x"), Err(DocumentError::UnsupportedType(_))));
    }

    #[test]
    fn test_extract_invalid_docx() {
        assert!(matches!(extract_text("broken.docx", b"not a zip"), Err(DocumentError::Docx(_))));
    }

    #[test]
    fn test_extract_docx_paragraphs() {
        let mut buf = std::io::Cursor::new(Vec::new());
        docx_rs::Docx::new()
            .add_paragraph(docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text("첫 문단")))
            .add_paragraph(docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text("둘째 문단")))
            .build()
            .pack(&mut buf)
            .unwrap();

        let text = extract_text("r.docx", &buf.into_inner()).unwrap();
        assert_eq!(text, "첫 문단\n\n둘째 문단");
    }
}
