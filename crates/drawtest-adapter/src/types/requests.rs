/*
[INPUT]:  Local files picked by the user and their bytes
[OUTPUT]: Upload parts with file name and content type
[POS]:    Data layer - request payloads
[UPDATE]: When accepted file types change
*/

use std::path::Path;
use std::sync::Arc;

/// One drawing ready to be sent as a multipart part.
///
/// Bytes are shared, so cloning an image into the store is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Arc<[u8]>,
}

impl ImageFile {
    /// Build an image, deriving the content type from the file extension
    pub fn new(file_name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            data: data.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether the service accepts this type (images and PDF)
    pub fn is_accepted_type(&self) -> bool {
        self.content_type.starts_with("image/") || self.content_type == "application/pdf"
    }
}

/// Content type guessed from a file name extension
pub fn content_type_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("house.JPG", "image/jpeg")]
    #[case("animal.jpeg", "image/jpeg")]
    #[case("me.png", "image/png")]
    #[case("scan.pdf", "application/pdf")]
    #[case("notes.txt", "application/octet-stream")]
    #[case("no_extension", "application/octet-stream")]
    fn test_content_type_for(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(content_type_for(name), expected);
    }

    #[test]
    fn test_accepted_types() {
        assert!(ImageFile::new("a.png", vec![1u8]).is_accepted_type());
        assert!(ImageFile::new("a.pdf", vec![1u8]).is_accepted_type());
        assert!(!ImageFile::new("a.zip", vec![1u8]).is_accepted_type());
    }
}
