use crate::domain::GeneratedImage;
use zodiac_roast_errors::AppError;

const MAX_IMAGE_BYTES: usize = 20 * 1024 * 1024;

/// Fetches a generated image from the vendor's temporary URL.
pub async fn download_image(
    http_client: &reqwest::Client,
    url: &str,
) -> Result<GeneratedImage, AppError> {
    download_capped(http_client, url, MAX_IMAGE_BYTES).await
}

/// Reads the body chunk by chunk and gives up as soon as it passes `max_bytes`.
async fn download_capped(
    http_client: &reqwest::Client,
    url: &str,
    max_bytes: usize,
) -> Result<GeneratedImage, AppError> {
    let mut response = http_client
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::ImageGeneration(format!("download failed: {e}")))?;

    if !response.status().is_success() {
        return Err(AppError::ImageGeneration(format!(
            "download failed: {}",
            response.status()
        )));
    }

    if let Some(declared) = response.content_length() {
        if declared > max_bytes as u64 {
            return Err(too_large(declared));
        }
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("image/png")
        .to_string();

    let mut bytes = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| AppError::ImageGeneration(format!("download failed: {e}")))?
    {
        if bytes.len() + chunk.len() > max_bytes {
            return Err(too_large((bytes.len() + chunk.len()) as u64));
        }
        bytes.extend_from_slice(&chunk);
    }

    if bytes.is_empty() {
        return Err(AppError::ImageGeneration("downloaded image is empty".to_string()));
    }

    Ok(GeneratedImage {
        bytes,
        content_type,
    })
}

fn too_large(size: u64) -> AppError {
    AppError::ImageGeneration(format!("downloaded image too large: {size} bytes"))
}
