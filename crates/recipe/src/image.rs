use base64::{Engine, engine::general_purpose::STANDARD};
use foodgram_shared::invalid;
use std::path::PathBuf;
use validator::ValidationError;

const RECIPES_DIR: &str = "recipes";

/// Stores uploaded recipe images under a media root. Paths handed back are
/// relative to that root.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

pub(crate) struct DecodedImage {
    pub extension: String,
    pub bytes: Vec<u8>,
}

/// Parses `data:image/<type>;base64,<payload>`.
pub(crate) fn decode(data_url: &str) -> Result<DecodedImage, ValidationError> {
    let Some((header, payload)) = data_url
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
    else {
        return Err(invalid("Upload the image as a base64 data URL."));
    };

    if !header.starts_with("image/") {
        return Err(invalid("The uploaded file is not an image."));
    }

    let Some(extension) = mime_guess::get_mime_extensions_str(header)
        .and_then(|exts| exts.iter().find(|ext| **ext == "jpg").or(exts.first()))
        .map(|ext| ext.to_string())
    else {
        return Err(invalid("Unsupported image type."));
    };

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|_| invalid("The image payload is not valid base64."))?;

    if bytes.is_empty() {
        return Err(invalid("The uploaded image is empty."));
    }

    Ok(DecodedImage { extension, bytes })
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub(crate) async fn save(&self, image: DecodedImage) -> std::io::Result<String> {
        let dir = self.root.join(RECIPES_DIR);
        tokio::fs::create_dir_all(&dir).await?;

        let name = format!("{}.{}", ulid::Ulid::new().to_string().to_lowercase(), image.extension);
        tokio::fs::write(dir.join(&name), image.bytes).await?;

        Ok(format!("{RECIPES_DIR}/{name}"))
    }

    /// Removes a stored image, failures are logged and swallowed.
    pub(crate) async fn remove(&self, path: &str) {
        if path.contains("..") {
            return;
        }

        match tokio::fs::remove_file(self.root.join(path)).await {
            Ok(_) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => tracing::warn!(path, error = %err, "failed to remove recipe image"),
        }
    }
}
