//! Offline (server side) downloads.
//!
//! `POST /api/v1/offline/download`
//!
//! ```json
//! { "url": "https://example.com/a.zip", "fileName": "a.zip", "dirID": 42,
//!   "callBackUrl": "https://example.com/hook" }
//! ```
//!
//! Response data: `{ "taskID": 394756 }`. Progress is polled with
//! `GET /api/v1/offline/progress?taskID=...`.

use crate::client::Pan123Client;
use crate::error::{Pan123Error, Result};
use crate::types::{OfflineTask, OfflineTaskOptions};
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
struct CreatedTask {
    #[serde(rename = "taskID")]
    task_id: u64,
}

fn check_protocol(url: &str) -> Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(Pan123Error::UnsupportedProtocol(
            url.chars().take(20).collect(),
        ))
    }
}

impl Pan123Client {
    /// Start downloading `url` into the drive. Only HTTP(S) is accepted.
    pub async fn create_offline_task(&self, url: &str, opts: &OfflineTaskOptions) -> Result<u64> {
        check_protocol(url)?;
        let mut body = json!({ "url": url });
        if let Some(name) = &opts.file_name {
            body["fileName"] = json!(name);
        }
        if let Some(dir) = opts.dir_id {
            body["dirID"] = json!(dir);
        }
        if let Some(cb) = &opts.callback_url {
            body["callBackUrl"] = json!(cb);
        }
        let task: CreatedTask = self.post("/api/v1/offline/download", &body).await?;
        Ok(task.task_id)
    }

    pub async fn offline_progress(&self, task_id: u64) -> Result<OfflineTask> {
        self.get("/api/v1/offline/progress", &[("taskID", task_id)])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_http_urls() {
        assert!(check_protocol("http://example.com/a").is_ok());
        assert!(check_protocol("https://example.com/a").is_ok());
        let err = check_protocol("ftp://example.com/some/long/path").unwrap_err();
        assert!(matches!(err, Pan123Error::UnsupportedProtocol(ref s) if s == "ftp://example.com/so"));
        assert!(check_protocol("magnet:?xt=urn").is_err());
    }
}
