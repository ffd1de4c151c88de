use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use super::IngestError;

const FORMAT: &str = "PDF";

/// Extracts the text of every page in document order and concatenates the pages
/// with no separator. A page without text contributes an empty string.
pub fn extract_pages(bytes: &[u8]) -> Result<String, IngestError> {
    // pdf-extract panics on some malformed font programs; treat that as a bad document.
    let pages = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }))
    .map_err(|_| {
        warn!("PDF parser panicked on malformed input");
        IngestError::extraction(FORMAT, "document could not be parsed")
    })?
    .map_err(|e| IngestError::extraction(FORMAT, e))?;

    debug!(page_count = pages.len(), "PDF pages extracted");
    Ok(concat_pages(pages))
}

/// Joins page texts with no separator. pdf-extract opens every page with a
/// blank line of its own, which is not page content and is dropped here.
fn concat_pages<I>(pages: I) -> String
where
    I: IntoIterator<Item = String>,
{
    pages.into_iter().fold(String::new(), |mut text, page| {
        text.push_str(page.trim_start_matches('\n'));
        text
    })
}
