//! Video transcoding.
//!
//! | Method                  | Endpoint                               |
//! |-------------------------|----------------------------------------|
//! | `create_transcode_task` | `POST /api/v1/video/transcode`         |
//! | `transcode_status`      | `GET /api/v1/video/transcode/status`   |
//! | `play_url`              | `GET /api/v1/video/play`               |

use crate::client::Pan123Client;
use crate::error::Result;
use crate::types::TranscodeTask;
use serde::Deserialize;
use serde_json::json;

pub const DEFAULT_RESOLUTION: &str = "720p";
pub const DEFAULT_FORMAT: &str = "m3u8";

#[derive(Deserialize)]
struct CreatedTask {
    #[serde(rename = "taskID")]
    task_id: u64,
}

#[derive(Deserialize)]
struct PlayUrl {
    #[serde(rename = "playUrl", default)]
    play_url: String,
}

impl Pan123Client {
    /// Queue a transcode of `file_id`, e.g. to `"1080p"` / `"mp4"`.
    pub async fn create_transcode_task(
        &self,
        file_id: u64,
        resolution: &str,
        format: &str,
    ) -> Result<u64> {
        let body = json!({ "fileID": file_id, "resolution": resolution, "format": format });
        let task: CreatedTask = self.post("/api/v1/video/transcode", &body).await?;
        Ok(task.task_id)
    }

    pub async fn transcode_status(&self, task_id: u64) -> Result<TranscodeTask> {
        self.get("/api/v1/video/transcode/status", &[("taskID", task_id)])
            .await
    }

    /// Play URL of a transcoded video; empty if none is available yet.
    pub async fn play_url(&self, file_id: u64) -> Result<String> {
        let reply: PlayUrl = self.get("/api/v1/video/play", &[("fileID", file_id)]).await?;
        Ok(reply.play_url)
    }
}
