//! Folder creation.
//!
//! Endpoint: `POST /upload/v1/file/mkdir`
//!
//! Request: `{ "parentID": 0, "name": "photos" }`
//!
//! Response data: `{ "dirID": 14663228 }`

use crate::client::Pan123Client;
use crate::error::Result;
use crate::validate;
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
struct CreatedDir {
    #[serde(rename = "dirID", default)]
    dir_id: u64,
}

impl Pan123Client {
    /// Create a folder under `parent_file_id` (`0` for the root) and return
    /// its ID.
    pub async fn create_folder(&self, parent_file_id: u64, name: &str) -> Result<u64> {
        validate::filename(name)?;
        let body = json!({ "parentID": parent_file_id, "name": name });
        let dir: CreatedDir = self.post("/upload/v1/file/mkdir", &body).await?;
        Ok(dir.dir_id)
    }
}
