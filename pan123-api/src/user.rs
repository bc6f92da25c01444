//! User profile API.
//!
//! Endpoint: `GET /api/v1/user/info`
//!
//! Response data:
//! ```json
//! {
//!   "uid": 1814435971,
//!   "nickname": "用户名",
//!   "headImage": "https://...",
//!   "spaceUse": 104857600,
//!   "spaceCapacity": 2199023255552,
//!   "spacePermanent": 2199023255552,
//!   "spaceTemp": 0,
//!   "vip": false
//! }
//! ```

use crate::client::{NO_QUERY, Pan123Client};
use crate::error::Result;
use crate::types::UserInfo;

impl Pan123Client {
    /// Get the account profile and storage quota.
    pub async fn user_info(&self) -> Result<UserInfo> {
        self.get("/api/v1/user/info", NO_QUERY).await
    }
}
