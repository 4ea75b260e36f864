// ============================================================
// ENCODING DETECTION
// ============================================================
// Best-effort normalization of CSV cells to UTF-8

use encoding_rs::{Encoding, WINDOWS_1251, WINDOWS_1252};

/// Minimum share of plausible characters for a decode to be accepted
const MIN_CONFIDENCE: f32 = 0.5;

/// Source encodings considered, in order of preference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    Utf8,
    Windows1251,
    Windows1252,
    Latin1,
}

impl SourceEncoding {
    pub const CANDIDATES: [SourceEncoding; 4] = [
        SourceEncoding::Utf8,
        SourceEncoding::Windows1251,
        SourceEncoding::Windows1252,
        SourceEncoding::Latin1,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SourceEncoding::Utf8 => "UTF-8",
            SourceEncoding::Windows1251 => "Windows-1251",
            SourceEncoding::Windows1252 => "Windows-1252",
            SourceEncoding::Latin1 => "ISO-8859-1",
        }
    }

    /// Strict decode; `None` when the bytes are not valid in this encoding
    fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            SourceEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_string),
            SourceEncoding::Windows1251 => decode_single_byte(WINDOWS_1251, bytes),
            SourceEncoding::Windows1252 => decode_single_byte(WINDOWS_1252, bytes),
            // ISO-8859-1 maps every byte to the code point of the same value
            SourceEncoding::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
        }
    }
}

fn decode_single_byte(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

/// Share of characters a human would plausibly type in catalog text
fn confidence(text: &str) -> f32 {
    let total = text.chars().count();
    if total == 0 {
        return 1.0;
    }
    let plausible = text
        .chars()
        .filter(|c| {
            c.is_alphanumeric()
                || c.is_whitespace()
                || c.is_ascii_punctuation()
                || matches!(c, '–' | '—' | '„' | '“' | '”' | '«' | '»' | '№' | '€' | '°')
        })
        .count();
    plausible as f32 / total as f32
}

/// Detect the encoding of `bytes` among the fixed candidate set.
///
/// Valid UTF-8 always wins. Otherwise every single-byte candidate that
/// decodes cleanly is scored and the most plausible one is returned; ties
/// go to the earlier candidate. `None` means detection failed.
pub fn detect(bytes: &[u8]) -> Option<SourceEncoding> {
    if std::str::from_utf8(bytes).is_ok() {
        return Some(SourceEncoding::Utf8);
    }

    let mut best: Option<(SourceEncoding, f32)> = None;
    for candidate in &SourceEncoding::CANDIDATES[1..] {
        let Some(text) = candidate.decode(bytes) else {
            continue;
        };
        let score = confidence(&text);
        if score < MIN_CONFIDENCE {
            continue;
        }
        if best.map(|(_, s)| score > s).unwrap_or(true) {
            best = Some((*candidate, score));
        }
    }
    best.map(|(encoding, _)| encoding)
}

/// Decode a raw cell to UTF-8.
///
/// When detection fails the bytes are passed through, with invalid
/// sequences replaced so the result is still a valid string.
pub fn to_utf8(bytes: &[u8]) -> String {
    match detect(bytes) {
        Some(SourceEncoding::Utf8) => String::from_utf8_lossy(bytes).into_owned(),
        Some(encoding) => {
            tracing::debug!(encoding = encoding.name(), "transcoding cell to UTF-8");
            encoding
                .decode(bytes)
                .unwrap_or_else(|| String::from_utf8_lossy(bytes).into_owned())
        }
        None => {
            tracing::debug!("cell encoding not detected, passing bytes through");
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}
