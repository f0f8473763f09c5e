use std::{path::Path, sync::LazyLock};

use regex::Regex;
use tracing::{debug, warn};
use crate::{error::Result, traits::TextExtractor};

/// Printable runs kept by the fallback PDF scan. Whitespace is listed
/// explicitly: within Latin-1 it is the ASCII set plus NBSP, not NEL.
static READABLE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z0-9 \t\n\r\x0B\x0C\x{A0},.\-:;()]+").unwrap());

/// Structure-unaware PDF scan: every byte becomes one Latin-1 character and
/// runs of readable characters are joined with single spaces.
///
/// Compressed content streams yield noise; uncompressed text survives.
#[derive(Debug, Clone, Default)]
pub struct PdfFallbackExtractor;

impl TextExtractor for PdfFallbackExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String> {
        let latin1: String = bytes.iter().map(|&byte| byte as char).collect();
        let runs: Vec<&str> = READABLE_RUN
            .find_iter(&latin1)
            .map(|run| run.as_str())
            .collect();
        debug!("Fallback PDF scan found {} readable runs", runs.len());
        Ok(runs.join(" "))
    }
}

/// UTF-8 text documents, invalid sequences replaced
#[derive(Debug, Clone, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

/// Pick an extractor from the document's media type
pub fn extractor_for_name(name: impl AsRef<Path>) -> Box<dyn TextExtractor> {
    let mime = mime_guess::from_path(name).first_or_octet_stream();
    if mime.type_() == mime_guess::mime::TEXT {
        Box::new(PlainTextExtractor)
    } else {
        Box::new(PdfFallbackExtractor)
    }
}

/// Run an extractor, degrading any failure to empty text
pub fn extract_text_or_degraded(extractor: &dyn TextExtractor, bytes: &[u8]) -> String {
    match extractor.extract_text(bytes) {
        Ok(text) => text,
        Err(error) => {
            let degraded = error.into_degraded();
            warn!("⚠️ {} ({})", degraded.user_message(), degraded);
            String::new()
        }
    }
}
