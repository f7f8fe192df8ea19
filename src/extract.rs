//! Page-level text extraction from the catalog document.
//!
//! The document arrives as bytes. PDFs are decoded with `pdf-extract`; any
//! other content is treated as UTF-8 text with form feeds (`\x0c`) between
//! pages, which is also what `pdftotext` produces. Each page is read through
//! [`PageSource::page_text`] and fails on its own, so one bad page never
//! costs the rest of the document.

use std::panic::{self, AssertUnwindSafe};

use pdf_extract::PlainTextOutput;
use thiserror::Error;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_TEXT: &str = "text/plain";

const PDF_MAGIC: &[u8] = b"%PDF-";
const PAGE_BREAK: u8 = b'\x0c';

/// Failure to open the document or to read a single page.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),
    #[error("page {page} could not be extracted: {message}")]
    PdfPage { page: usize, message: String },
    #[error("page {page} is out of range (document has {count} pages)")]
    PageOutOfRange { page: usize, count: usize },
    #[error("page {page} is not valid UTF-8: {source}")]
    Encoding {
        page: usize,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// Random access to the text of a document's pages. Pages are 1-based.
pub trait PageSource: Send + Sync {
    fn page_count(&self) -> usize;
    fn page_text(&self, page: usize) -> Result<String, ExtractError>;
}

/// Sniffs the content type from the leading bytes.
pub fn detect_content_type(bytes: &[u8]) -> &'static str {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    if bytes[start..].starts_with(PDF_MAGIC) {
        MIME_PDF
    } else {
        MIME_TEXT
    }
}

/// An opened catalog document.
#[derive(Debug)]
pub enum Document {
    /// Per-page extractor output, or why that page could not be decoded.
    Pdf(Vec<Result<String, String>>),
    /// Raw page bytes, decoded on access.
    Text(Vec<Vec<u8>>),
}

/// Opens a document from its bytes, choosing the decoder by content type.
///
/// Only a PDF whose structure cannot be loaded at all is an error here.
/// Pages that fail to decode are kept as failures and surface from
/// [`PageSource::page_text`].
pub fn open_document(bytes: &[u8]) -> Result<Document, ExtractError> {
    match detect_content_type(bytes) {
        MIME_PDF => extract_pdf_pages(bytes).map(Document::Pdf),
        _ => Ok(Document::Text(split_text_pages(bytes))),
    }
}

fn extract_pdf_pages(bytes: &[u8]) -> Result<Vec<Result<String, String>>, ExtractError> {
    // pdf-extract and lopdf panic on some malformed inputs instead of
    // returning Err.
    let mut doc = panic::catch_unwind(|| pdf_extract::Document::load_mem(bytes))
        .map_err(|_| ExtractError::Pdf("extractor panicked on malformed input".to_string()))?
        .map_err(|e| ExtractError::Pdf(e.to_string()))?;
    if doc.is_encrypted() {
        doc.decrypt("")
            .map_err(|e| ExtractError::Pdf(format!("encrypted document: {}", e)))?;
    }

    Ok(doc
        .get_pages()
        .keys()
        .map(|&page_num| extract_pdf_page(&doc, page_num))
        .collect())
}

fn extract_pdf_page(doc: &pdf_extract::Document, page_num: u32) -> Result<String, String> {
    let mut text = String::new();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut output = PlainTextOutput::new(&mut text);
        pdf_extract::output_doc_page(doc, &mut output, page_num)
    }));
    match outcome {
        Ok(Ok(())) => Ok(text),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err("extractor panicked on malformed page".to_string()),
    }
}

fn split_text_pages(bytes: &[u8]) -> Vec<Vec<u8>> {
    if bytes.is_empty() {
        return Vec::new();
    }
    bytes
        .split(|b| *b == PAGE_BREAK)
        .map(|page| page.to_vec())
        .collect()
}

impl PageSource for Document {
    fn page_count(&self) -> usize {
        match self {
            Document::Pdf(pages) => pages.len(),
            Document::Text(pages) => pages.len(),
        }
    }

    fn page_text(&self, page: usize) -> Result<String, ExtractError> {
        let count = self.page_count();
        if page == 0 || page > count {
            return Err(ExtractError::PageOutOfRange { page, count });
        }
        match self {
            Document::Pdf(pages) => pages[page - 1]
                .clone()
                .map_err(|message| ExtractError::PdfPage { page, message }),
            Document::Text(pages) => String::from_utf8(pages[page - 1].clone())
                .map_err(|source| ExtractError::Encoding { page, source }),
        }
    }
}
