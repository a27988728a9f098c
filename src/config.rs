use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://lorcana.brybry.fr/api";

/// Environment variable overriding the backend base URL.
pub const BASE_URL_ENV: &str = "API_URL";

/// Storage key (and file name) under which the session token is persisted.
pub const TOKEN_STORAGE_KEY: &str = "userToken";

/// Card payload fields that may carry the image reference, in probe order.
pub const CANDIDATE_IMAGE_FIELDS: [&str; 4] = ["image", "image_url", "imageUrl", "img_url"];

pub fn base_url_from_env() -> String {
    match std::env::var(BASE_URL_ENV) {
        Ok(url) if !url.trim().is_empty() => url.trim().to_string(),
        _ => DEFAULT_BASE_URL.to_string(),
    }
}

pub fn default_data_dir() -> PathBuf {
    if let Some(data) = dirs::data_local_dir() {
        data.join("lorcana-collection-sdk")
    } else {
        PathBuf::from(".lorcana-collection-sdk")
    }
}
