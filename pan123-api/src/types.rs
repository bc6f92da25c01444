//! Data types for 123pan Open Platform requests and responses.
//!
//! Response types are deserialized from the `data` field of the API
//! envelope. Field names follow Rust conventions (`snake_case`); the API's
//! camelCase names (and its inconsistent `ID` / `Id` suffixes) are mapped
//! with serde attributes.

use serde::{Deserialize, Deserializer, Serialize};

const SHARE_URL_PREFIX: &str = "https://www.123pan.com/s/";
const MIB: f64 = 1024.0 * 1024.0;
const GIB: f64 = MIB * 1024.0;

// ── user ──

/// Account profile and quota.
///
/// Returned by [`Pan123Client::user_info`](crate::Pan123Client::user_info).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(rename = "uid")]
    pub user_id: u64,
    pub nickname: String,
    /// Bytes in use.
    #[serde(rename = "spaceUse", alias = "spaceUsed", default)]
    pub space_used: u64,
    /// Total bytes available to the account.
    #[serde(rename = "spaceCapacity", default)]
    pub space_capacity: u64,
    #[serde(rename = "spacePermanent", skip_serializing_if = "Option::is_none")]
    pub space_permanent: Option<u64>,
    #[serde(rename = "spaceTemp", skip_serializing_if = "Option::is_none")]
    pub space_temp: Option<u64>,
    #[serde(rename = "headImage", skip_serializing_if = "Option::is_none")]
    pub head_image: Option<String>,
    /// Phone number the account is registered with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passport: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vip: Option<bool>,
}

// ── files ──

/// A file or folder entry.
///
/// API JSON fields: `fileId`, `filename`, `type` (0 = file, 1 = folder),
/// `size`, `etag` (MD5), `status`, `parentFileId`, `category`, `trashed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInfo {
    #[serde(rename = "fileId", alias = "fileID")]
    pub file_id: u64,
    pub filename: String,
    #[serde(rename = "type")]
    pub file_type: u8,
    pub size: u64,
    #[serde(default)]
    pub etag: String,
    #[serde(default)]
    pub status: i32,
    #[serde(rename = "parentFileId", alias = "parentFileID", default)]
    pub parent_file_id: u64,
    #[serde(default)]
    pub category: i32,
    /// The API sends either a boolean or `0` / `1`.
    #[serde(default, deserialize_with = "bool_or_int")]
    pub trashed: bool,
    #[serde(rename = "createAt", skip_serializing_if = "Option::is_none")]
    pub create_at: Option<String>,
    #[serde(rename = "updateAt", skip_serializing_if = "Option::is_none")]
    pub update_at: Option<String>,
}

impl FileInfo {
    pub fn is_folder(&self) -> bool {
        self.file_type == 1
    }

    pub fn is_file(&self) -> bool {
        self.file_type == 0
    }
}

/// One page of a directory or trash listing.
///
/// `last_file_id` is the cursor for the next page, `-1` on the last page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileList {
    #[serde(rename = "lastFileId")]
    pub last_file_id: i64,
    #[serde(rename = "fileList", default)]
    pub file_list: Vec<FileInfo>,
}

impl FileList {
    pub fn has_more(&self) -> bool {
        self.last_file_id != -1
    }
}

/// Keyword matching mode for [`ListQuery::search`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    #[default]
    Fuzzy = 0,
    Exact = 1,
}

/// Parameters for [`Pan123Client::list_files`](crate::Pan123Client::list_files).
#[derive(Debug, Clone)]
pub struct ListQuery {
    /// Folder to list, `0` for the root.
    pub parent_file_id: u64,
    /// Page size, 1..=100.
    pub limit: u32,
    /// Cursor from the previous page.
    pub last_file_id: Option<i64>,
    /// Search keyword. When set the whole drive is searched.
    pub search: Option<String>,
    pub search_mode: SearchMode,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            parent_file_id: 0,
            limit: 100,
            last_file_id: None,
            search: None,
            search_mode: SearchMode::Fuzzy,
        }
    }
}

impl ListQuery {
    pub fn in_folder(parent_file_id: u64) -> Self {
        Self {
            parent_file_id,
            ..Self::default()
        }
    }

    pub fn search(keyword: impl Into<String>, mode: SearchMode) -> Self {
        Self {
            search: Some(keyword.into()),
            search_mode: mode,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut q = vec![
            ("parentFileId", self.parent_file_id.to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(last) = self.last_file_id {
            q.push(("lastFileId", last.to_string()));
        }
        if let Some(keyword) = self.search.as_deref().filter(|s| !s.is_empty()) {
            q.push(("searchData", keyword.to_owned()));
            q.push(("searchMode", (self.search_mode as u8).to_string()));
        }
        q
    }
}

// ── upload ──

/// How the server handles a name clash on upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Keep both, the new file gets a suffixed name.
    KeepBoth = 1,
    Overwrite = 2,
}

/// Parameters for [`Pan123Client::create_upload`](crate::Pan123Client::create_upload).
#[derive(Debug, Clone)]
pub struct CreateUpload {
    pub parent_file_id: u64,
    /// File name, or a relative path when `contain_dir` is set (missing
    /// folders are created by the server).
    pub filename: String,
    /// MD5 of the whole file, lowercase hex.
    pub etag: String,
    pub size: u64,
    pub duplicate: Option<DuplicatePolicy>,
    pub contain_dir: bool,
}

/// Reply to an upload creation.
///
/// When `reuse` is set the server already holds identical content and the
/// file was created instantly ("rapid upload"); otherwise the slices must be
/// sent to one of `servers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFileResponse {
    pub reuse: bool,
    #[serde(rename = "fileID", default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<u64>,
    #[serde(rename = "preuploadID", default, skip_serializing_if = "Option::is_none")]
    pub preupload_id: Option<String>,
    #[serde(rename = "sliceSize", default, skip_serializing_if = "Option::is_none")]
    pub slice_size: Option<u64>,
    #[serde(default)]
    pub servers: Vec<String>,
}

impl CreateFileResponse {
    pub fn is_rapid_upload(&self) -> bool {
        self.reuse
    }
}

/// Reply to `upload_complete`; `completed` stays false while the server
/// is still verifying the slices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadComplete {
    pub completed: bool,
    #[serde(rename = "fileID", default)]
    pub file_id: u64,
}

/// The upload domain endpoint answers either with a bare list or with
/// `{ "servers": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum UploadDomains {
    List(Vec<String>),
    Object {
        #[serde(default)]
        servers: Vec<String>,
    },
}

impl From<UploadDomains> for Vec<String> {
    fn from(d: UploadDomains) -> Self {
        match d {
            UploadDomains::List(servers) | UploadDomains::Object { servers } => servers,
        }
    }
}

// ── shares ──

/// Validity period of a share link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareExpiry {
    Permanent,
    OneDay,
    SevenDays,
    ThirtyDays,
}

impl ShareExpiry {
    /// Value of the API `shareExpire` field, in days (`0` = permanent).
    pub fn days(self) -> u32 {
        match self {
            Self::Permanent => 0,
            Self::OneDay => 1,
            Self::SevenDays => 7,
            Self::ThirtyDays => 30,
        }
    }
}

impl TryFrom<u32> for ShareExpiry {
    type Error = crate::Pan123Error;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        match days {
            0 => Ok(Self::Permanent),
            1 => Ok(Self::OneDay),
            7 => Ok(Self::SevenDays),
            30 => Ok(Self::ThirtyDays),
            other => Err(crate::Pan123Error::InvalidSharePeriod(other)),
        }
    }
}

/// Which downloads of a share may consume the owner's traffic package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficSwitch {
    AllOff = 1,
    GuestOnly = 2,
    OverQuotaOnly = 3,
    AllOn = 4,
}

/// Optional settings for a new free share.
#[derive(Debug, Clone, Default)]
pub struct ShareOptions {
    /// Extraction code.
    pub password: Option<String>,
    pub traffic_switch: Option<TrafficSwitch>,
    pub traffic_limit_switch: Option<bool>,
    /// Traffic limit in bytes.
    pub traffic_limit: Option<u64>,
}

/// Fields to change on an existing free share; `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct ShareUpdate {
    pub name: Option<String>,
    pub expiry: Option<ShareExpiry>,
    pub password: Option<String>,
    pub traffic_switch: Option<TrafficSwitch>,
    pub traffic_limit_switch: Option<bool>,
    pub traffic_limit: Option<u64>,
}

/// Fields to change on an existing paid share.
#[derive(Debug, Clone, Default)]
pub struct PaidShareUpdate {
    pub name: Option<String>,
    pub expiry: Option<ShareExpiry>,
    /// Price in cents.
    pub price: Option<u64>,
    pub password: Option<String>,
}

/// A share link as listed by the share endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareInfo {
    #[serde(rename = "shareId", alias = "shareID")]
    pub share_id: u64,
    #[serde(rename = "shareKey")]
    pub share_key: String,
    #[serde(rename = "shareName")]
    pub share_name: String,
    /// Expiry date; the API sends a date string or a unix timestamp.
    #[serde(default, deserialize_with = "string_or_number")]
    pub expiration: String,
    /// `1` once the link has expired.
    #[serde(default)]
    pub expired: i32,
    #[serde(rename = "sharePwd", default)]
    pub share_pwd: String,
    #[serde(rename = "trafficSwitch", default = "one")]
    pub traffic_switch: u8,
    #[serde(rename = "trafficLimitSwitch", default = "one")]
    pub traffic_limit_switch: u8,
    #[serde(rename = "trafficLimit", default)]
    pub traffic_limit: u64,
    #[serde(rename = "bytesCharge", default)]
    pub bytes_charge: u64,
    #[serde(rename = "previewCount", default)]
    pub preview_count: u64,
    #[serde(rename = "downloadCount", default)]
    pub download_count: u64,
    #[serde(rename = "saveCount", default)]
    pub save_count: u64,
}

impl ShareInfo {
    pub fn share_url(&self) -> String {
        format!("{SHARE_URL_PREFIX}{}", self.share_key)
    }

    pub fn is_expired(&self) -> bool {
        self.expired == 1
    }

    pub fn has_password(&self) -> bool {
        !self.share_pwd.is_empty()
    }
}

/// One page of shares; `last_share_id` is `-1` on the last page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareList {
    #[serde(rename = "lastShareId")]
    pub last_share_id: i64,
    #[serde(rename = "shareList", default)]
    pub share_list: Vec<ShareInfo>,
}

impl ShareList {
    pub fn has_more(&self) -> bool {
        self.last_share_id != -1
    }
}

/// A newly created share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedShare {
    #[serde(rename = "shareID", alias = "shareId")]
    pub share_id: u64,
    #[serde(rename = "shareKey")]
    pub share_key: String,
}

impl CreatedShare {
    pub fn share_url(&self) -> String {
        format!("{SHARE_URL_PREFIX}{}", self.share_key)
    }
}

// ── direct links ──

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfflineLog {
    #[serde(rename = "logID")]
    pub log_id: u64,
    pub timestamp: String,
    #[serde(rename = "ipAddress")]
    pub ip_address: String,
    pub action: String,
}

/// A page of direct-link offline logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfflineLogPage {
    #[serde(default)]
    pub logs: Vec<OfflineLog>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "one_u32")]
    pub page: u32,
    #[serde(rename = "pageSize", default = "ten")]
    pub page_size: u32,
}

impl OfflineLogPage {
    pub fn has_more(&self) -> bool {
        u64::from(self.page) * u64::from(self.page_size) < self.total
    }
}

/// Daily direct-link traffic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficLog {
    pub date: String,
    /// Bytes served.
    #[serde(rename = "trafficUsed")]
    pub traffic_used: u64,
    #[serde(rename = "requestCount")]
    pub request_count: u64,
}

impl TrafficLog {
    #[allow(clippy::cast_precision_loss)]
    pub fn traffic_mb(&self) -> f64 {
        self.traffic_used as f64 / MIB
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn traffic_gb(&self) -> f64 {
        self.traffic_used as f64 / GIB
    }
}

/// A page of direct-link traffic logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficLogPage {
    #[serde(default)]
    pub logs: Vec<TrafficLog>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "one_u32")]
    pub page: u32,
    #[serde(rename = "pageSize", default = "ten")]
    pub page_size: u32,
}

impl TrafficLogPage {
    pub fn has_more(&self) -> bool {
        u64::from(self.page) * u64::from(self.page_size) < self.total
    }

    pub fn total_traffic_mb(&self) -> f64 {
        self.logs.iter().map(TrafficLog::traffic_mb).sum()
    }

    pub fn total_traffic_gb(&self) -> f64 {
        self.logs.iter().map(TrafficLog::traffic_gb).sum()
    }

    pub fn total_requests(&self) -> u64 {
        self.logs.iter().map(|l| l.request_count).sum()
    }
}

/// Direct-link IP blacklist configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpBlacklist {
    #[serde(rename = "ipList", default)]
    pub ip_list: Vec<String>,
    /// `1` enabled, `2` disabled.
    pub status: u8,
}

impl IpBlacklist {
    pub fn is_enabled(&self) -> bool {
        self.status == 1
    }
}

// ── offline download ──

/// Optional settings for an offline download task.
#[derive(Debug, Clone, Default)]
pub struct OfflineTaskOptions {
    /// Target file name, including extension.
    pub file_name: Option<String>,
    /// Target folder. The root folder is not allowed; without it the server
    /// uses its "来自:离线下载" folder.
    pub dir_id: Option<u64>,
    /// URL notified when the task finishes.
    pub callback_url: Option<String>,
}

/// Offline download task state.
///
/// `status`: `0` succeeded, `1` failed, `2` in progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfflineTask {
    #[serde(rename = "taskID", default)]
    pub task_id: u64,
    pub status: i32,
    /// Percent complete.
    #[serde(default, alias = "process")]
    pub progress: f64,
    #[serde(rename = "failReason", default)]
    pub fail_reason: String,
    #[serde(rename = "fileID", default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<u64>,
    #[serde(default)]
    pub url: String,
}

impl OfflineTask {
    pub fn is_success(&self) -> bool {
        self.status == 0
    }

    pub fn is_failed(&self) -> bool {
        self.status == 1
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == 2
    }
}

// ── image hosting ──

/// An image stored in image hosting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageInfo {
    #[serde(rename = "fileID")]
    pub file_id: u64,
    #[serde(rename = "directUrl")]
    pub direct_url: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub format: String,
}

impl ImageInfo {
    #[allow(clippy::cast_precision_loss)]
    pub fn size_mb(&self) -> f64 {
        self.size as f64 / MIB
    }
}

// ── video ──

/// Video transcode task state.
///
/// `status`: `0` queued, `1` running, `2` done, `3` failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscodeTask {
    #[serde(rename = "taskID")]
    pub task_id: u64,
    #[serde(rename = "fileID")]
    pub file_id: u64,
    pub status: i32,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub resolution: String,
    #[serde(default)]
    pub format: String,
    #[serde(rename = "playUrl", default, skip_serializing_if = "Option::is_none")]
    pub play_url: Option<String>,
}

impl TranscodeTask {
    pub fn is_queued(&self) -> bool {
        self.status == 0
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == 1
    }

    pub fn is_success(&self) -> bool {
        self.status == 2
    }

    pub fn is_failed(&self) -> bool {
        self.status == 3
    }
}

// ── serde helpers ──

fn one() -> u8 {
    1
}

fn one_u32() -> u32 {
    1
}

fn ten() -> u32 {
    10
}

fn bool_or_int<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Option::<Flag>::deserialize(d)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Int(i)) => i != 0,
        None => false,
    })
}

fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Str(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<Loose>::deserialize(d)? {
        Some(Loose::Str(s)) => s,
        Some(Loose::Int(i)) => i.to_string(),
        Some(Loose::Float(f)) => f.to_string(),
        None => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn file_info_kinds_and_trashed_flag() {
        let file: FileInfo = serde_json::from_value(json!({
            "fileId": 123, "filename": "test.txt", "type": 0, "size": 1024,
            "etag": "abc123", "status": 1, "parentFileId": 0, "category": 0,
            "trashed": false
        }))
        .unwrap();
        assert!(file.is_file());
        assert!(!file.is_folder());
        assert!(!file.trashed);

        let folder: FileInfo = serde_json::from_value(json!({
            "fileId": 456, "filename": "folder", "type": 1, "size": 0,
            "etag": "", "status": 1, "parentFileId": 0, "category": 0
        }))
        .unwrap();
        assert!(folder.is_folder());
        assert!(!folder.trashed);

        let deleted: FileInfo = serde_json::from_value(json!({
            "fileId": 789, "filename": "deleted.txt", "type": 0, "size": 1024,
            "etag": "def456", "status": 1, "parentFileId": 0, "category": 0,
            "trashed": 1
        }))
        .unwrap();
        assert!(deleted.trashed);
    }

    #[test]
    fn file_list_cursor() {
        let page: FileList = serde_json::from_value(json!({
            "lastFileId": 100,
            "fileList": [{ "fileId": 1, "filename": "a", "type": 0, "size": 1 }]
        }))
        .unwrap();
        assert!(page.has_more());
        assert_eq!(page.file_list.len(), 1);

        let last: FileList = serde_json::from_value(json!({ "lastFileId": -1 })).unwrap();
        assert!(!last.has_more());
        assert!(last.file_list.is_empty());
    }

    #[test]
    fn list_query_parameters() {
        let q = ListQuery::in_folder(42).limit(50).to_query();
        assert_eq!(
            q,
            vec![("parentFileId", "42".to_owned()), ("limit", "50".to_owned())]
        );

        let mut search = ListQuery::search("report", SearchMode::Exact);
        search.last_file_id = Some(7);
        let q = search.to_query();
        assert!(q.contains(&("lastFileId", "7".to_owned())));
        assert!(q.contains(&("searchData", "report".to_owned())));
        assert!(q.contains(&("searchMode", "1".to_owned())));
    }

    #[test]
    fn user_info_accepts_both_space_names() {
        let a: UserInfo = serde_json::from_value(json!({
            "uid": 123456, "nickname": "TestUser",
            "spaceUse": 104_857_600u64, "spaceCapacity": 10_737_418_240u64
        }))
        .unwrap();
        assert_eq!(a.user_id, 123_456);
        assert_eq!(a.space_used, 104_857_600);
        assert_eq!(a.space_capacity, 10_737_418_240);

        let b: UserInfo = serde_json::from_value(json!({
            "uid": 999999, "nickname": "TestUser", "spaceUsed": 1,
            "spaceCapacity": 2, "spacePermanent": 3
        }))
        .unwrap();
        assert_eq!(b.space_used, 1);
        assert_eq!(b.space_permanent, Some(3));
    }

    #[test]
    fn upload_responses() {
        let rapid: CreateFileResponse =
            serde_json::from_value(json!({ "reuse": true, "fileID": 12345 })).unwrap();
        assert!(rapid.is_rapid_upload());
        assert_eq!(rapid.file_id, Some(12345));

        let normal: CreateFileResponse = serde_json::from_value(json!({
            "reuse": false, "preuploadID": "upload_123", "sliceSize": 4_194_304,
            "servers": ["https://upload1.123pan.com", "https://upload2.123pan.com"]
        }))
        .unwrap();
        assert!(!normal.is_rapid_upload());
        assert_eq!(normal.preupload_id.as_deref(), Some("upload_123"));
        assert_eq!(normal.slice_size, Some(4_194_304));
        assert_eq!(normal.servers.len(), 2);

        let done: UploadComplete =
            serde_json::from_value(json!({ "completed": false })).unwrap();
        assert!(!done.completed);
        assert_eq!(done.file_id, 0);

        let list: Vec<String> = serde_json::from_value::<UploadDomains>(json!(["https://a"]))
            .unwrap()
            .into();
        assert_eq!(list, vec!["https://a"]);
        let obj: Vec<String> = serde_json::from_value::<UploadDomains>(json!({ "servers": [] }))
            .unwrap()
            .into();
        assert!(obj.is_empty());
    }

    #[test]
    fn share_expiry_values() {
        for days in [0, 1, 7, 30] {
            assert_eq!(ShareExpiry::try_from(days).unwrap().days(), days);
        }
        let err = ShareExpiry::try_from(5).unwrap_err();
        assert!(matches!(err, crate::Pan123Error::InvalidSharePeriod(5)));
    }

    #[test]
    fn share_info_helpers() {
        let share: ShareInfo = serde_json::from_value(json!({
            "shareId": 111_222, "shareName": "Share 1", "shareKey": "key1",
            "sharePwd": "1234", "expiration": 1_735_660_799, "expired": 0
        }))
        .unwrap();
        assert_eq!(share.share_url(), "https://www.123pan.com/s/key1");
        assert_eq!(share.expiration, "1735660799");
        assert!(share.has_password());
        assert!(!share.is_expired());
        assert_eq!(share.traffic_switch, 1);

        let created: CreatedShare =
            serde_json::from_value(json!({ "shareID": 1, "shareKey": "abc123" })).unwrap();
        assert_eq!(created.share_url(), "https://www.123pan.com/s/abc123");
    }

    #[test]
    fn traffic_page_totals() {
        let page: TrafficLogPage = serde_json::from_value(json!({
            "logs": [
                { "date": "2024-01-01", "trafficUsed": 1_048_576, "requestCount": 3 },
                { "date": "2024-01-02", "trafficUsed": 2_097_152, "requestCount": 4 }
            ],
            "total": 25, "page": 2, "pageSize": 10
        }))
        .unwrap();
        assert!((page.total_traffic_mb() - 3.0).abs() < f64::EPSILON);
        assert_eq!(page.total_requests(), 7);
        assert!(page.has_more());

        let empty: OfflineLogPage = serde_json::from_value(json!({})).unwrap();
        assert_eq!((empty.page, empty.page_size, empty.total), (1, 10, 0));
        assert!(!empty.has_more());
    }

    #[test]
    fn task_states() {
        let task: OfflineTask = serde_json::from_value(json!({
            "taskID": 555_666, "status": 2, "progress": 50, "failReason": "",
            "fileID": 123_456, "url": "https://example.com/file.zip"
        }))
        .unwrap();
        assert!(task.is_in_progress());
        assert_eq!(task.file_id, Some(123_456));

        let video: TranscodeTask = serde_json::from_value(json!({
            "taskID": 777_888, "fileID": 123_456, "status": 1, "progress": 100
        }))
        .unwrap();
        assert!(video.is_in_progress());
        assert!(!video.is_success());

        let blacklist: IpBlacklist =
            serde_json::from_value(json!({ "ipList": ["10.0.0.1"], "status": 1 })).unwrap();
        assert!(blacklist.is_enabled());
    }
}
