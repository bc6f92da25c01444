//! Direct-link space, its logs and the developer IP blacklist.
//!
//! | Method                       | Endpoint                                           |
//! |------------------------------|----------------------------------------------------|
//! | `direct_link_offline_logs`   | `GET /api/v1/directlink/offline/logs`              |
//! | `direct_link_traffic_logs`   | `GET /api/v1/directlink/traffic/logs`              |
//! | `enable_direct_link`         | `POST /api/v1/direct-link/enable`                  |
//! | `disable_direct_link`        | `POST /api/v1/direct-link/disable`                 |
//! | `direct_link_url`            | `GET /api/v1/direct-link/url`                      |
//! | `refresh_direct_link_cache`  | `POST /api/v1/direct-link/cache/refresh`           |
//! | `toggle_ip_blacklist`        | `POST /api/v1/developer/config/forbide-ip/switch`  |
//! | `update_ip_blacklist`        | `POST /api/v1/developer/config/forbide-ip/update`  |
//! | `ip_blacklist`               | `GET /api/v1/developer/config/forbide-ip/list`     |
//!
//! The log endpoints are page based (`page`, `pageSize`) rather than cursor
//! based. The blacklist endpoints need developer privileges.

use crate::client::{NO_QUERY, Pan123Client};
use crate::error::{Pan123Error, Result};
use crate::types::{IpBlacklist, OfflineLogPage, TrafficLogPage};
use crate::validate::MAX_BLACKLIST_IPS;
use serde::Deserialize;
use serde::de::IgnoredAny;
use serde_json::json;

#[derive(Deserialize)]
struct FolderName {
    #[serde(default)]
    filename: String,
}

#[derive(Deserialize)]
struct LinkUrl {
    #[serde(default)]
    url: String,
}

#[derive(Deserialize)]
struct SwitchReply {
    #[serde(rename = "Done", default)]
    done: bool,
}

impl Pan123Client {
    /// Offline logs of the direct-link space, `page` starting at 1.
    pub async fn direct_link_offline_logs(&self, page: u32, page_size: u32) -> Result<OfflineLogPage> {
        self.get(
            "/api/v1/directlink/offline/logs",
            &[("page", page), ("pageSize", page_size)],
        )
        .await
    }

    /// Daily traffic between two `YYYY-MM-DD` dates.
    pub async fn direct_link_traffic_logs(
        &self,
        start_date: &str,
        end_date: &str,
        page: u32,
        page_size: u32,
    ) -> Result<TrafficLogPage> {
        let query = [
            ("startDate", start_date.to_owned()),
            ("endDate", end_date.to_owned()),
            ("page", page.to_string()),
            ("pageSize", page_size.to_string()),
        ];
        self.get("/api/v1/directlink/traffic/logs", &query).await
    }

    /// Turn a folder into a direct-link space; returns the folder name.
    pub async fn enable_direct_link(&self, folder_id: u64) -> Result<String> {
        let reply: FolderName = self
            .post("/api/v1/direct-link/enable", &json!({ "fileID": folder_id }))
            .await?;
        Ok(reply.filename)
    }

    pub async fn disable_direct_link(&self, folder_id: u64) -> Result<String> {
        let reply: FolderName = self
            .post("/api/v1/direct-link/disable", &json!({ "fileID": folder_id }))
            .await?;
        Ok(reply.filename)
    }

    /// Direct URL of a file inside a direct-link space.
    pub async fn direct_link_url(&self, file_id: u64) -> Result<String> {
        let reply: LinkUrl = self
            .get("/api/v1/direct-link/url", &[("fileID", file_id)])
            .await?;
        Ok(reply.url)
    }

    pub async fn refresh_direct_link_cache(&self) -> Result<()> {
        let _: IgnoredAny = self
            .post("/api/v1/direct-link/cache/refresh", &json!({}))
            .await?;
        Ok(())
    }

    /// Enable or disable the IP blacklist; returns the server's `Done` flag.
    pub async fn toggle_ip_blacklist(&self, enable: bool) -> Result<bool> {
        let status = if enable { 1 } else { 2 };
        let reply: SwitchReply = self
            .post(
                "/api/v1/developer/config/forbide-ip/switch",
                &json!({ "Status": status }),
            )
            .await?;
        Ok(reply.done)
    }

    /// Replace the blacklist with `ips` (IPv4, at most 2000).
    pub async fn update_ip_blacklist(&self, ips: &[String]) -> Result<()> {
        if ips.len() > MAX_BLACKLIST_IPS {
            return Err(Pan123Error::Validation(format!(
                "IP list cannot exceed {MAX_BLACKLIST_IPS} addresses, got {}",
                ips.len()
            )));
        }
        let _: IgnoredAny = self
            .post(
                "/api/v1/developer/config/forbide-ip/update",
                &json!({ "IpList": ips }),
            )
            .await?;
        Ok(())
    }

    pub async fn ip_blacklist(&self) -> Result<IpBlacklist> {
        self.get("/api/v1/developer/config/forbide-ip/list", NO_QUERY)
            .await
    }
}
