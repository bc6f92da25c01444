//! Recycle bin.
//!
//! | Method                   | Endpoint                             |
//! |--------------------------|--------------------------------------|
//! | `list_trash`             | `GET /api/v1/file/trash/list`        |
//! | `restore_file`           | `POST /api/v1/file/trash/restore`    |
//! | `delete_permanently`     | `POST /api/v1/file/trash/delete`     |
//! | `empty_trash`            | `POST /api/v1/file/trash/empty`      |
//!
//! Listing uses the same `{ lastFileId, fileList }` page shape as
//! `/api/v2/file/list`.

use crate::client::Pan123Client;
use crate::error::Result;
use crate::pager::paginate;
use crate::types::{FileInfo, FileList};
use crate::validate;
use futures::Stream;
use serde::de::IgnoredAny;
use serde_json::json;

impl Pan123Client {
    /// List one page of the trash.
    pub async fn list_trash(&self, limit: u32, last_file_id: Option<i64>) -> Result<FileList> {
        validate::page_limit(limit)?;
        let mut query = vec![("limit", limit.to_string())];
        if let Some(last) = last_file_id {
            query.push(("lastFileId", last.to_string()));
        }
        self.get("/api/v1/file/trash/list", &query).await
    }

    /// Stream every trashed entry.
    pub fn list_all_trash(&self, limit: u32) -> impl Stream<Item = Result<FileInfo>> + '_ {
        paginate(move |cursor| async move {
            let page = self.list_trash(limit, cursor).await?;
            Ok((page.file_list, page.last_file_id))
        })
    }

    /// Restore a trashed file to its original folder.
    pub async fn restore_file(&self, file_id: u64) -> Result<()> {
        let _: IgnoredAny = self
            .post("/api/v1/file/trash/restore", &json!({ "fileID": file_id }))
            .await?;
        Ok(())
    }

    /// Delete a trashed file for good.
    pub async fn delete_permanently(&self, file_id: u64) -> Result<()> {
        let _: IgnoredAny = self
            .post("/api/v1/file/trash/delete", &json!({ "fileID": file_id }))
            .await?;
        Ok(())
    }

    pub async fn empty_trash(&self) -> Result<()> {
        let _: IgnoredAny = self
            .post("/api/v1/file/trash/empty", &json!({}))
            .await?;
        Ok(())
    }
}
