//! Data-URI encoding for uploaded images.
//!
//! The record stores the whole image inline as `data:<mime>;base64,...`,
//! same as the blob format it replaces. The MIME type comes from magic
//! bytes, not from anything the shell claims about the file.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::ImageError;
use crate::MAX_IMAGE_BYTES;

/// MIME type from the payload's magic bytes.
#[must_use]
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        "image/png"
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        "image/gif"
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "application/octet-stream"
    }
}

/// Encodes the file as a storable data URI.
///
/// Empty payloads and payloads past `MAX_IMAGE_BYTES` are rejected before
/// any encoding work; the blob write never sees a bad image.
pub fn to_data_uri(bytes: &[u8]) -> Result<String, ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::Empty);
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(ImageError::TooLarge {
            size: bytes.len(),
            max: MAX_IMAGE_BYTES,
        });
    }

    Ok(format!(
        "data:{};base64,{}",
        sniff_mime(bytes),
        STANDARD.encode(bytes)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00];

    #[test]
    fn sniffs_the_common_formats() {
        assert_eq!(sniff_mime(PNG_HEADER), "image/png");
        assert_eq!(sniff_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
        assert_eq!(sniff_mime(b"GIF89a trailer"), "image/gif");
        assert_eq!(sniff_mime(b"RIFF\x00\x00\x00\x00WEBPVP8 "), "image/webp");
        assert_eq!(sniff_mime(b"plain text"), "application/octet-stream");
    }

    #[test]
    fn truncated_headers_fall_back_to_octet_stream() {
        assert_eq!(sniff_mime(b"RIFF"), "application/octet-stream");
        assert_eq!(sniff_mime(&[0x89, 0x50]), "application/octet-stream");
    }

    #[test]
    fn encodes_a_png_payload() {
        let uri = to_data_uri(PNG_HEADER).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
        let encoded = uri.trim_start_matches("data:image/png;base64,");
        assert_eq!(STANDARD.decode(encoded).unwrap(), PNG_HEADER);
    }

    #[test]
    fn rejects_an_empty_payload() {
        assert!(matches!(to_data_uri(&[]), Err(ImageError::Empty)));
    }

    #[test]
    fn rejects_an_oversize_payload() {
        let huge = vec![0_u8; MAX_IMAGE_BYTES + 1];
        assert!(matches!(
            to_data_uri(&huge),
            Err(ImageError::TooLarge { .. })
        ));
    }
}
