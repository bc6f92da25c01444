//! Chunked file upload.
//!
//! Uploading is a three step protocol:
//!
//! 1. `POST /upload/v2/file/create` with the file's MD5 and size. If the
//!    server already holds identical content it answers `reuse: true` and the
//!    file exists immediately (rapid upload). Otherwise it returns a
//!    `preuploadID`, a `sliceSize` and a list of upload `servers`.
//! 2. Each slice is sent as `multipart/form-data` to
//!    `{server}/upload/v2/file/slice`:
//!
//!    ```text
//!    preuploadID = <id>
//!    sliceNo     = 1, 2, ...
//!    sliceMD5    = <md5 of the slice>
//!    slice       = <bytes>  (filename "slice_{n}")
//!    ```
//!
//! 3. `POST /upload/v2/file/upload_complete` with `{ "preuploadID": ... }`.
//!    The server may still be verifying the slices; it then answers
//!    `completed: false` or fails with code `20103` ("文件校验中"), and the
//!    call is repeated.

use crate::client::{NO_QUERY, Pan123Client};
use crate::error::{Pan123Error, Result};
use crate::types::{CreateFileResponse, CreateUpload, DuplicatePolicy, UploadComplete, UploadDomains};
use crate::validate;
use serde::Deserialize;
use serde_json::json;
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};

/// Number of `upload_complete` attempts before giving up.
pub const COMPLETE_ATTEMPTS: usize = 10;
const VERIFYING_CODE: i64 = 20103;
const VERIFYING_MESSAGE: &str = "校验中";
const READ_BUF: usize = 64 * 1024;

/// Progress callback, called with `(uploaded_bytes, total_bytes)` after each
/// slice.
pub type Progress<'a> = &'a (dyn Fn(u64, u64) + Send + Sync);

/// Options for [`Pan123Client::upload_file`].
#[derive(Default, Clone, Copy)]
pub struct UploadOptions<'a> {
    /// Name in the drive; defaults to the local file name.
    pub filename: Option<&'a str>,
    pub duplicate: Option<DuplicatePolicy>,
    pub progress: Option<Progress<'a>>,
}

#[derive(Deserialize)]
struct SliceReply {
    #[serde(default = "unknown_code")]
    code: i64,
    #[serde(default)]
    message: String,
}

fn unknown_code() -> i64 {
    -1
}

/// Lowercase hex MD5 of `data`.
pub fn md5_hex(data: &[u8]) -> String {
    format!("{:x}", md5::compute(data))
}

/// Lowercase hex MD5 of a file, read in chunks.
pub async fn file_md5(path: &Path) -> Result<String> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut ctx = md5::Context::new();
    let mut buf = vec![0u8; READ_BUF];
    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        ctx.consume(&buf[..n]);
    }
    Ok(format!("{:x}", ctx.compute()))
}

fn next_slice_no(slice_no: u32) -> Result<u32> {
    slice_no
        .checked_add(1)
        .ok_or_else(|| Pan123Error::Upload(format!("too many slices (over {slice_no})")))
}

fn is_verifying(err: &Pan123Error) -> bool {
    match err {
        Pan123Error::Api { code, message, .. } => {
            *code == VERIFYING_CODE || message.contains(VERIFYING_MESSAGE)
        }
        _ => false,
    }
}

impl Pan123Client {
    /// Upload servers for slice data.
    pub async fn upload_domain(&self) -> Result<Vec<String>> {
        let domains: UploadDomains = self.get("/upload/v2/file/upload_domain", NO_QUERY).await?;
        Ok(domains.into())
    }

    /// Step 1: announce a file.
    ///
    /// The name is validated unless `contain_dir` is set, in which case it
    /// is a relative path.
    pub async fn create_upload(&self, req: &CreateUpload) -> Result<CreateFileResponse> {
        if !req.contain_dir {
            validate::filename(&req.filename)?;
        }
        let mut body = json!({
            "parentFileID": req.parent_file_id,
            "filename": req.filename,
            "etag": req.etag,
            "size": req.size,
        });
        if let Some(dup) = req.duplicate {
            body["duplicate"] = json!(dup as u8);
        }
        if req.contain_dir {
            body["containDir"] = json!(true);
        }
        self.post("/upload/v2/file/create", &body).await
    }

    /// Step 2: send one slice (`slice_no` starts at 1).
    pub async fn upload_slice(
        &self,
        server: &str,
        preupload_id: &str,
        slice_no: u32,
        data: Vec<u8>,
        slice_md5: &str,
    ) -> Result<()> {
        let part = reqwest::multipart::Part::bytes(data)
            .file_name(format!("slice_{slice_no}"))
            .mime_str("application/octet-stream")?;
        let form = reqwest::multipart::Form::new()
            .text("preuploadID", preupload_id.to_owned())
            .text("sliceNo", slice_no.to_string())
            .text("sliceMD5", slice_md5.to_owned())
            .part("slice", part);

        let token = self.bearer().await?;
        let url = format!("{}/upload/v2/file/slice", server.trim_end_matches('/'));
        let reply: SliceReply = self
            .http()
            .post(url)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if reply.code != 0 {
            return Err(Pan123Error::Upload(format!(
                "slice {slice_no} failed: {}",
                reply.message
            )));
        }
        Ok(())
    }

    /// Step 3: ask the server to assemble the slices.
    pub async fn upload_complete(&self, preupload_id: &str) -> Result<UploadComplete> {
        self.post(
            "/upload/v2/file/upload_complete",
            &json!({ "preuploadID": preupload_id }),
        )
        .await
    }

    /// Upload a local file into `parent_file_id`, returning the new file ID.
    ///
    /// Slices are sent one after another. A rapid upload returns the ID
    /// reported by the server, or `0` when it reports none.
    pub async fn upload_file(
        &self,
        path: &Path,
        parent_file_id: u64,
        opts: UploadOptions<'_>,
    ) -> Result<u64> {
        let size = validate::upload_source(path).await?;
        let filename = match opts.filename {
            Some(name) => name.to_owned(),
            None => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| Pan123Error::Validation("path has no file name".into()))?,
        };
        validate::filename(&filename)?;

        let etag = file_md5(path).await?;
        debug!(%filename, size, %etag, "creating upload");
        let created = self
            .create_upload(&CreateUpload {
                parent_file_id,
                filename: filename.clone(),
                etag,
                size,
                duplicate: opts.duplicate,
                contain_dir: false,
            })
            .await?;

        if created.is_rapid_upload() {
            info!(%filename, "rapid upload, content already on server");
            return Ok(created.file_id.unwrap_or(0));
        }

        let (Some(preupload_id), Some(slice_size)) =
            (created.preupload_id.as_deref(), created.slice_size.filter(|s| *s > 0))
        else {
            return Err(Pan123Error::Upload(
                "invalid upload response: missing preuploadID or sliceSize".into(),
            ));
        };
        let server = created
            .servers
            .first()
            .map_or_else(|| self.base_url().to_owned(), Clone::clone);

        let mut file = tokio::fs::File::open(path).await?;
        let mut uploaded = 0u64;
        let mut slice_no = 1u32;
        loop {
            let mut data = Vec::new();
            (&mut file).take(slice_size).read_to_end(&mut data).await?;
            if data.is_empty() {
                break;
            }
            let len = data.len() as u64;
            let slice_md5 = md5_hex(&data);
            self.upload_slice(&server, preupload_id, slice_no, data, &slice_md5)
                .await?;

            uploaded += len;
            debug!(slice_no, uploaded, size, "slice uploaded");
            if let Some(progress) = opts.progress {
                progress(uploaded, size);
            }
            slice_no = next_slice_no(slice_no)?;
        }

        self.wait_upload_complete(preupload_id).await
    }

    async fn wait_upload_complete(&self, preupload_id: &str) -> Result<u64> {
        for attempt in 1..=COMPLETE_ATTEMPTS {
            match self.upload_complete(preupload_id).await {
                Ok(done) if done.completed && done.file_id != 0 => {
                    info!(file_id = done.file_id, "upload completed");
                    return Ok(done.file_id);
                }
                Ok(_) => debug!(attempt, "upload not completed yet"),
                Err(e) if is_verifying(&e) => warn!(attempt, "server still verifying: {e}"),
                Err(e) => return Err(e),
            }
            tokio::time::sleep(self.upload_poll_interval).await;
        }
        Err(Pan123Error::Upload(format!(
            "upload completion timed out after {COMPLETE_ATTEMPTS} attempts"
        )))
    }
}
