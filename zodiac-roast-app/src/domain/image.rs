/// Raw caricature bytes fetched from an image provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl GeneratedImage {
    pub fn extension(&self) -> &'static str {
        match self.content_type.split(';').next().unwrap_or_default().trim() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }
}

/// A persisted image: its opaque storage reference and public URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub storage_ref: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_from_content_type() {
        let image = |ct: &str| GeneratedImage {
            bytes: vec![],
            content_type: ct.to_string(),
        };
        assert_eq!(image("image/jpeg").extension(), "jpg");
        assert_eq!(image("image/webp; charset=binary").extension(), "webp");
        assert_eq!(image("application/octet-stream").extension(), "png");
    }
}
