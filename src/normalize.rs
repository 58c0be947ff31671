use chardetng::EncodingDetector;
use encoding_rs::{Encoding, GB18030, GBK, UTF_8, WINDOWS_1252};

/// Decodes a captured blob of unknown encoding into text. Detection first,
/// then a fixed candidate list; an undecodable input yields an empty string,
/// which callers must treat as "no content" rather than an error.
pub fn decode_bytes(raw: &[u8]) -> String {
    if raw.is_empty() { return String::new(); }
    let mut det = EncodingDetector::new();
    det.feed(raw, true);
    let guessed = det.guess(None, true);
    let (text, _, had_errors) = guessed.decode(raw);
    if !had_errors { return text.into_owned(); }
    let candidates: [&'static Encoding; 4] = [UTF_8, GBK, GB18030, WINDOWS_1252];
    for enc in candidates {
        let (text, _, had_errors) = enc.decode(raw);
        if !had_errors { return text.into_owned(); }
    }
    String::new()
}
