//! `data:` URL encoding and parsing.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::Blob;
use crate::error::{Result, TransformError};

/// `data:<mime>;base64,<payload>` for a blob.
pub fn to_data_url(blob: &Blob) -> String {
    format!("data:{};base64,{}", blob.mime_type(), STANDARD.encode(&blob.bytes))
}

/// Split a base64 `data:` URL into its MIME type and decoded payload.
///
/// The MIME type defaults to `text/plain` when omitted. Percent-encoded
/// (non-base64) payloads are rejected.
pub fn parse_data_url(url: &str) -> Result<(String, Vec<u8>)> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| TransformError::ImageLoad(format!("not a data URL: {}", preview(url))))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| TransformError::ImageLoad("data URL has no payload".to_string()))?;

    let mut params = header.split(';');
    let mime = match params.next() {
        Some(mime) if !mime.is_empty() => mime.to_ascii_lowercase(),
        _ => "text/plain".to_string(),
    };
    if !params.any(|p| p.eq_ignore_ascii_case("base64")) {
        return Err(TransformError::ImageLoad(
            "only base64 data URLs are supported".to_string(),
        ));
    }

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| TransformError::ImageLoad(format!("invalid base64 payload: {e}")))?;
    Ok((mime, bytes))
}

fn preview(url: &str) -> &str {
    match url.char_indices().nth(32) {
        Some((idx, _)) => &url[..idx],
        None => url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::ImageMime;

    #[test]
    fn test_data_url_shape() {
        let blob = Blob {
            mime: ImageMime::Png,
            bytes: b"hello".to_vec(),
        };
        assert_eq!(to_data_url(&blob), "data:image/png;base64,aGVsbG8=");
    }

    #[test]
    fn test_parse() {
        let (mime, bytes) = parse_data_url("data:image/jpeg;base64,aGVsbG8=").unwrap();
        assert_eq!(mime, "image/jpeg");
        assert_eq!(bytes, b"hello");

        let (mime, _) = parse_data_url("data:;base64,aGVsbG8=").unwrap();
        assert_eq!(mime, "text/plain");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_data_url("http://example.com/a.png").is_err());
        assert!(parse_data_url("data:image/png;base64").is_err());
        assert!(parse_data_url("data:image/png,hello").is_err());
        assert!(parse_data_url("data:image/png;base64,***").is_err());
    }
}
