//! Async client for the 123pan Open Platform API.
//!
//! Covers the file, folder, upload, trash, share, direct-link, offline
//! download, image hosting and video transcoding endpoints of
//! `https://open-api.123pan.com`.
//!
//! # Authentication
//!
//! Calls are authorized with a bearer token obtained from a client ID and
//! secret issued by the 123pan developer console. The client fetches the
//! token on first use and renews it once it expires. With token storage
//! enabled the token is also cached in `.env`, so later runs skip the token
//! request.
//!
//! ```no_run
//! use pan123_api::Pan123Client;
//!
//! # async fn run() -> pan123_api::Result<()> {
//! // Reads PAN123_CLIENT_ID / PAN123_CLIENT_SECRET from the environment or .env
//! let client = Pan123Client::new()?;
//! let me = client.user_info().await?;
//! println!("{} uses {} bytes", me.nickname, me.space_used);
//! # Ok(())
//! # }
//! ```
//!
//! # API endpoint mapping
//!
//! | Method                                       | Endpoint                                 |
//! |----------------------------------------------|------------------------------------------|
//! | [`Pan123Client::access_token`]               | `POST /api/v1/access_token`              |
//! | [`Pan123Client::user_info`]                  | `GET /api/v1/user/info`                  |
//! | [`Pan123Client::list_files`]                 | `GET /api/v2/file/list`                  |
//! | [`Pan123Client::file_info`]                  | `GET /api/v1/file/info`                  |
//! | [`Pan123Client::move_files`]                 | `POST /api/v1/file/move`                 |
//! | [`Pan123Client::rename_file`]                | `PUT /api/v1/file/name`                  |
//! | [`Pan123Client::copy_file`]                  | `POST /api/v1/file/copy`                 |
//! | [`Pan123Client::trash_files`]                | `POST /api/v1/file/trash`                |
//! | [`Pan123Client::download_url`]               | `GET /api/v1/file/download_info`         |
//! | [`Pan123Client::create_folder`]              | `POST /upload/v1/file/mkdir`             |
//! | [`Pan123Client::upload_file`]                | `/upload/v2/file/{create,slice,upload_complete}` |
//! | [`Pan123Client::list_trash`]                 | `GET /api/v1/file/trash/list`            |
//! | [`Pan123Client::create_share`]               | `POST /api/v1/share/create`              |
//! | [`Pan123Client::list_shares`]                | `GET /api/v1/share/list`                 |
//! | [`Pan123Client::enable_direct_link`]         | `POST /api/v1/direct-link/enable`        |
//! | [`Pan123Client::create_offline_task`]        | `POST /api/v1/offline/download`          |
//! | [`Pan123Client::upload_image`]               | `POST /api/v1/image/upload`              |
//! | [`Pan123Client::create_transcode_task`]      | `POST /api/v1/video/transcode`           |
//!
//! Each module documents the request and response shapes of its endpoints.

pub mod auth;
pub mod client;
pub mod config;
mod direct_link;
pub mod error;
mod file;
mod folder;
pub mod image;
mod offline;
mod pager;
mod share;
mod trash;
pub mod types;
pub mod upload;
mod user;
pub mod validate;
pub mod video;

pub use auth::{AccessToken, TokenStore};
pub use client::{ClientBuilder, Pan123Client};
pub use config::Settings;
pub use error::{ApiErrorKind, Pan123Error, Result};
pub use upload::UploadOptions;
