//! Character encoding detection for fetched pages.
//!
//! Order of precedence:
//! 1. `charset=` in the HTTP `Content-Type` header
//! 2. `<meta charset>` / `http-equiv` declaration near the top of the document
//! 3. Statistical detection over the raw bytes
//!
//! Undecodable sequences are replaced rather than rejected.

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use tracing::debug;

/// How many leading bytes are scanned for a `<meta>` charset declaration.
const META_SNIFF_LIMIT: usize = 4096;

/// Decode a page body to text.
pub fn decode_html(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = detect_encoding(body, content_type);
    let (text, _, had_errors) = encoding.decode(body);
    if had_errors {
        debug!(encoding = encoding.name(), "Replaced malformed sequences while decoding");
    }
    text.into_owned()
}

/// Pick the encoding for a page body.
pub fn detect_encoding(body: &[u8], content_type: Option<&str>) -> &'static Encoding {
    if let Some(encoding) = content_type
        .and_then(charset_param)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        return encoding;
    }

    if let Some(encoding) = sniff_meta_charset(body) {
        return encoding;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(body, true);
    detector.guess(None, true)
}

/// Extract the `charset` parameter of a `Content-Type` value.
pub fn charset_param(content_type: &str) -> Option<String> {
    let lower = content_type.to_ascii_lowercase();
    let start = lower.find("charset=")? + "charset=".len();
    let value = lower[start..]
        .split(';')
        .next()?
        .trim()
        .trim_matches(|c| c == '"' || c == '\'');
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn sniff_meta_charset(body: &[u8]) -> Option<&'static Encoding> {
    let head = &body[..body.len().min(META_SNIFF_LIMIT)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();

    let mut search_from = 0;
    while let Some(pos) = head[search_from..].find("charset=") {
        let start = search_from + pos + "charset=".len();
        let label: String = head[start..]
            .trim_start_matches(|c| c == '"' || c == '\'')
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
            return Some(encoding);
        }
        search_from = start;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{GBK, UTF_8};

    #[test]
    fn test_charset_param() {
        assert_eq!(
            charset_param("text/html; charset=GBK").as_deref(),
            Some("gbk")
        );
        assert_eq!(
            charset_param("text/html; charset=\"utf-8\"; foo=bar").as_deref(),
            Some("utf-8")
        );
        assert_eq!(charset_param("text/html"), None);
    }

    #[test]
    fn test_header_charset_wins() {
        let (bytes, _, _) = GBK.encode("基金重仓股走强");
        let text = decode_html(&bytes, Some("text/html; charset=gbk"));
        assert_eq!(text, "基金重仓股走强");
    }

    #[test]
    fn test_meta_charset_used_without_header() {
        let mut body = b"<html><head><meta charset=\"gb2312\"></head><body>".to_vec();
        let (bytes, _, _) = GBK.encode("白酒板块");
        body.extend_from_slice(&bytes);
        body.extend_from_slice(b"</body></html>");

        assert_eq!(detect_encoding(&body, None), GBK);
        assert!(decode_html(&body, None).contains("白酒板块"));
    }

    #[test]
    fn test_plain_utf8_detected() {
        let body = "<p>贵州茅台发布年报</p>".as_bytes();
        assert_eq!(detect_encoding(body, Some("text/html")), UTF_8);
    }
}
