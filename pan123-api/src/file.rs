//! File listing, search, move, rename, copy, trash and download.
//!
//! # Endpoints
//!
//! ## `list_files`: `GET /api/v2/file/list`
//!
//! Query: `parentFileId`, `limit` (max 100), `lastFileId` (cursor),
//! `searchData` + `searchMode` (0 fuzzy, 1 exact).
//!
//! ```json
//! {
//!   "lastFileId": -1,
//!   "fileList": [{
//!     "fileId": 5373646, "filename": "a.mp4", "type": 0, "size": 1024,
//!     "etag": "4b5c...", "status": 2, "parentFileId": 0, "category": 2,
//!     "trashed": 0
//!   }]
//! }
//! ```
//!
//! Entries with `trashed` set are still returned by this endpoint; filter
//! them if needed.
//!
//! ## `download_url`: `GET /api/v1/file/download_info`
//!
//! Response: `{ "DownloadURL": "https://..." }`. The URL is short-lived and
//! needs no authorization header.

use crate::client::Pan123Client;
use crate::error::{Pan123Error, Result};
use crate::pager::paginate;
use crate::types::{FileInfo, FileList, ListQuery};
use crate::validate;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::json;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::debug;

#[derive(Deserialize)]
struct DownloadInfo {
    #[serde(rename = "DownloadURL", alias = "downloadUrl", default)]
    download_url: String,
}

#[derive(Deserialize)]
struct CopiedFile {
    #[serde(rename = "fileID", default)]
    file_id: u64,
}

impl Pan123Client {
    /// List one page of a folder, or search the drive when
    /// [`ListQuery::search`] is set.
    pub async fn list_files(&self, query: &ListQuery) -> Result<FileList> {
        validate::page_limit(query.limit)?;
        self.get("/api/v2/file/list", &query.to_query()).await
    }

    /// Stream every entry of a folder (or search), fetching pages as needed.
    ///
    /// `query.last_file_id` is ignored; listing always starts at the first
    /// page.
    pub fn list_all_files(&self, query: ListQuery) -> impl Stream<Item = Result<FileInfo>> + '_ {
        paginate(move |cursor| {
            let page_query = ListQuery {
                last_file_id: cursor,
                ..query.clone()
            };
            async move {
                let page = self.list_files(&page_query).await?;
                Ok((page.file_list, page.last_file_id))
            }
        })
    }

    /// Get one file or folder by ID.
    pub async fn file_info(&self, file_id: u64) -> Result<FileInfo> {
        self.get("/api/v1/file/info", &[("fileID", file_id)]).await
    }

    /// Move files or folders to the trash (1..=100 per call).
    pub async fn trash_files(&self, file_ids: &[u64]) -> Result<()> {
        validate::batch_size(file_ids.len(), "delete")?;
        let _: IgnoredAny = self
            .post("/api/v1/file/trash", &json!({ "fileIDs": file_ids }))
            .await?;
        Ok(())
    }

    /// Move files or folders into `target_parent_id` (1..=100 per call).
    pub async fn move_files(&self, file_ids: &[u64], target_parent_id: u64) -> Result<()> {
        validate::batch_size(file_ids.len(), "move")?;
        let body = json!({ "fileIDs": file_ids, "toParentFileID": target_parent_id });
        let _: IgnoredAny = self.post("/api/v1/file/move", &body).await?;
        Ok(())
    }

    /// Rename a file or folder. The new name is checked with
    /// [`validate::filename`] first.
    pub async fn rename_file(&self, file_id: u64, new_name: &str) -> Result<()> {
        validate::filename(new_name)?;
        let body = json!({ "fileId": file_id, "fileName": new_name });
        let _: IgnoredAny = self.put("/api/v1/file/name", &body).await?;
        Ok(())
    }

    /// Copy a file or folder into `target_parent_id`, returning the new ID
    /// (`0` if the server does not report one).
    pub async fn copy_file(&self, file_id: u64, target_parent_id: u64) -> Result<u64> {
        let body = json!({ "fileID": file_id, "targetParentID": target_parent_id });
        let copied: CopiedFile = self.post("/api/v1/file/copy", &body).await?;
        Ok(copied.file_id)
    }

    /// Get a temporary download URL for a file.
    pub async fn download_url(&self, file_id: u64) -> Result<String> {
        let info: DownloadInfo = self
            .get("/api/v1/file/download_info", &[("fileID", file_id)])
            .await?;
        if info.download_url.is_empty() {
            return Err(Pan123Error::Download("no download URL available".into()));
        }
        Ok(info.download_url)
    }

    /// Download a file into memory.
    pub async fn download_file(&self, file_id: u64) -> Result<Bytes> {
        let url = self.download_url(file_id).await?;
        let resp = self.http().get(&url).send().await?.error_for_status()?;
        Ok(resp.bytes().await?)
    }

    /// Download a file to `dest`, creating parent directories.
    ///
    /// Returns the number of bytes written.
    pub async fn download_file_to(&self, file_id: u64, dest: &Path) -> Result<u64> {
        let url = self.download_url(file_id).await?;
        let resp = self.http().get(&url).send().await?.error_for_status()?;

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::File::create(dest).await?;
        let mut written = 0u64;
        let mut body = std::pin::pin!(resp.bytes_stream());
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        debug!(file_id, bytes = written, dest = %dest.display(), "download finished");
        Ok(written)
    }
}
