/// `data:<mime>;base64,<payload>` encoding used by the service for images
use base64::{engine::general_purpose, Engine as _};

use crate::error::DataUrlError;

/// Split a data URL into its MIME type and decoded bytes
pub fn decode(url: &str) -> Result<(String, Vec<u8>), DataUrlError> {
    let rest = url.trim().strip_prefix("data:").ok_or(DataUrlError::MissingPrefix)?;
    let (header, payload) = rest.split_once(',').ok_or(DataUrlError::MissingPrefix)?;

    let mime = header
        .strip_suffix(";base64")
        .ok_or(DataUrlError::NotBase64)?;
    let mime = if mime.is_empty() { "application/octet-stream" } else { mime };

    let bytes = general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| DataUrlError::Payload(e.to_string()))?;

    Ok((mime.to_string(), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_png_url() {
        let (mime, bytes) = decode("data:image/png;base64,AQID").unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[test]
    fn test_decode_jpeg_with_whitespace() {
        let (mime, bytes) = decode("  data:image/jpeg;base64,/9j/\n").unwrap();
        assert_eq!(mime, "image/jpeg");
        assert_eq!(bytes, vec![0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert_eq!(decode("/images/a.jpg"), Err(DataUrlError::MissingPrefix));
        assert_eq!(decode("data:image/png,plain"), Err(DataUrlError::NotBase64));
        assert!(matches!(
            decode("data:image/png;base64,@@@"),
            Err(DataUrlError::Payload(_))
        ));
    }
}
