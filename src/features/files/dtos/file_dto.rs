use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Maximum accepted upload size (5MB)
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Image types accepted for report and completion evidence
pub const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];

pub fn is_mime_type_allowed(content_type: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&content_type)
}

/// File extension for an accepted content type
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

/// Upload file request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadFileDto {
    /// The image to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// Response DTO for an uploaded file
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileResponseDto {
    /// Opaque storage path, the value to put in `images` arrays
    pub path: String,
    /// URL the file can be fetched from
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_only_listed_image_types() {
        assert!(is_mime_type_allowed("image/jpeg"));
        assert!(is_mime_type_allowed("image/png"));
        assert!(!is_mime_type_allowed("application/pdf"));
        assert!(!is_mime_type_allowed("text/html"));
        assert!(!is_mime_type_allowed("image/svg+xml"));
    }

    #[test]
    fn every_allowed_type_has_an_extension() {
        for mime in ALLOWED_MIME_TYPES {
            assert!(extension_for(mime).is_some(), "no extension for {}", mime);
        }
        assert_eq!(extension_for("application/pdf"), None);
    }
}
