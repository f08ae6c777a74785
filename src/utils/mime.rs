use std::path::Path;

/// Media types the converter accepts as input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Png,
    Jpeg,
    Gif,
    Tiff,
    /// Anything we do not recognize; still staged and handed to the encoder,
    /// which is the authority on what it can decode.
    Other,
}

impl MediaType {
    /// Classify a filename by its extension, case-insensitively.
    pub fn from_name(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" => Self::Png,
            "jpg" | "jpeg" => Self::Jpeg,
            "gif" => Self::Gif,
            "tiff" | "tif" => Self::Tiff,
            _ => Self::Other,
        }
    }

    /// The MIME string reported to the frontend for this media type.
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Tiff => "image/tiff",
            Self::Other => "application/octet-stream",
        }
    }
}

/// Map a filename to its MIME string.
pub fn mime_for_name(name: &str) -> &'static str {
    MediaType::from_name(name).mime()
}
