//! Image hosting.
//!
//! `POST /api/v1/image/upload` takes `multipart/form-data` with a `file`
//! part, `fileName` and an optional `dirID`; the reply is an image record:
//!
//! ```json
//! { "fileID": 555, "directUrl": "https://img.123pan.cn/a.png",
//!   "filename": "a.png", "size": 2048, "format": "png" }
//! ```
//!
//! `POST /api/v1/image/copy` with `{ "fileID": ... }` copies an image that is
//! already in the drive and returns `{ "directUrl": ... }`.

use crate::client::Pan123Client;
use crate::error::{Pan123Error, Result};
use crate::types::ImageInfo;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::json;
use std::path::Path;

/// Accepted file extensions, lowercase.
pub const SUPPORTED_IMAGE_FORMATS: &[&str] =
    &["bmp", "gif", "jpeg", "jpg", "png", "svg", "tif", "tiff", "webp"];

#[derive(Deserialize)]
struct DirectUrl {
    #[serde(rename = "directUrl", default)]
    direct_url: String,
}

/// Lowercased extension of `path` if it is a supported image format.
fn image_format(path: &Path) -> Result<String> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if SUPPORTED_IMAGE_FORMATS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(Pan123Error::UnsupportedImageFormat(format!(
            "{ext:?} (supported: {})",
            SUPPORTED_IMAGE_FORMATS.join(", ")
        )))
    }
}

impl Pan123Client {
    /// Upload a local image, optionally into folder `dir_id`.
    pub async fn upload_image(&self, path: &Path, dir_id: Option<u64>) -> Result<ImageInfo> {
        let format = image_format(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let data = tokio::fs::read(path).await?;

        let part = Part::bytes(data)
            .file_name(name.clone())
            .mime_str(&format!("image/{format}"))?;
        let mut form = Form::new().text("fileName", name).part("file", part);
        if let Some(dir) = dir_id {
            form = form.text("dirID", dir.to_string());
        }
        self.post_multipart("/api/v1/image/upload", form).await
    }

    /// Copy an image already in the drive to image hosting; returns its
    /// direct URL.
    pub async fn copy_cloud_image(&self, file_id: u64) -> Result<String> {
        let reply: DirectUrl = self
            .post("/api/v1/image/copy", &json!({ "fileID": file_id }))
            .await?;
        Ok(reply.direct_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_are_case_insensitive() {
        assert_eq!(image_format(Path::new("a/photo.PNG")).unwrap(), "png");
        assert_eq!(image_format(Path::new("scan.tif")).unwrap(), "tif");
        assert!(matches!(
            image_format(Path::new("notes.txt")),
            Err(Pan123Error::UnsupportedImageFormat(_))
        ));
        assert!(image_format(Path::new("no_extension")).is_err());
    }
}
