//! Share links, free and paid.
//!
//! | Method              | Endpoint                          |
//! |---------------------|-----------------------------------|
//! | `create_share`      | `POST /api/v1/share/create`       |
//! | `list_shares`       | `GET /api/v1/share/list`          |
//! | `update_share`      | `PUT /api/v1/share/update`        |
//! | `create_paid_share` | `POST /api/v1/share/paid/create`  |
//! | `list_paid_shares`  | `GET /api/v1/share/paid/list`     |
//! | `update_paid_share` | `PUT /api/v1/share/paid/update`   |
//!
//! Create request:
//!
//! ```json
//! {
//!   "shareName": "docs", "shareExpire": 7, "fileIDList": "14663228,14663229",
//!   "sharePwd": "1234", "trafficSwitch": 2, "trafficLimitSwitch": 2,
//!   "trafficLimit": 1073741824
//! }
//! ```
//!
//! Response data: `{ "shareID": 87187530, "shareKey": "PvitVv-abcd" }`.
//! The public link is `https://www.123pan.com/s/{shareKey}`.
//!
//! Update and the paid endpoints may answer 404 for accounts without the
//! feature.

use crate::client::Pan123Client;
use crate::error::{Pan123Error, Result};
use crate::pager::paginate;
use crate::types::{
    CreatedShare, PaidShareUpdate, ShareExpiry, ShareInfo, ShareList, ShareOptions, ShareUpdate,
    TrafficSwitch,
};
use crate::validate::{self, MAX_BATCH_SIZE};
use futures::Stream;
use serde::de::IgnoredAny;
use serde_json::{Map, Value, json};

/// Comma separated ID list, as `fileIDList` expects.
fn file_id_list(file_ids: &[u64]) -> Result<String> {
    if file_ids.is_empty() {
        return Err(Pan123Error::Validation(
            "at least one file is required to share".into(),
        ));
    }
    if file_ids.len() > MAX_BATCH_SIZE {
        return Err(Pan123Error::ShareLimitExceeded(file_ids.len()));
    }
    Ok(file_ids
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(","))
}

/// `trafficLimitSwitch`: `2` on, `1` off.
fn limit_switch(on: bool) -> u8 {
    if on { 2 } else { 1 }
}

fn put_traffic(
    body: &mut Map<String, Value>,
    switch: Option<TrafficSwitch>,
    limit_on: Option<bool>,
    limit: Option<u64>,
) {
    if let Some(s) = switch {
        body.insert("trafficSwitch".into(), json!(s as u8));
    }
    if let Some(on) = limit_on {
        body.insert("trafficLimitSwitch".into(), json!(limit_switch(on)));
    }
    if let Some(bytes) = limit {
        body.insert("trafficLimit".into(), json!(bytes));
    }
}

fn share_page_query(limit: u32, last_share_id: Option<i64>) -> Result<Vec<(&'static str, String)>> {
    validate::page_limit(limit)?;
    let mut query = vec![("limit", limit.to_string())];
    if let Some(last) = last_share_id {
        query.push(("lastShareId", last.to_string()));
    }
    Ok(query)
}

impl Pan123Client {
    /// Create a free share link for up to 100 files or folders.
    pub async fn create_share(
        &self,
        file_ids: &[u64],
        name: &str,
        expiry: ShareExpiry,
        opts: &ShareOptions,
    ) -> Result<CreatedShare> {
        let mut body = Map::new();
        body.insert("shareName".into(), json!(name));
        body.insert("shareExpire".into(), json!(expiry.days()));
        body.insert("fileIDList".into(), json!(file_id_list(file_ids)?));
        if let Some(pwd) = &opts.password {
            body.insert("sharePwd".into(), json!(pwd));
        }
        put_traffic(
            &mut body,
            opts.traffic_switch,
            opts.traffic_limit_switch,
            opts.traffic_limit,
        );
        self.post("/api/v1/share/create", &Value::Object(body)).await
    }

    pub async fn list_shares(&self, limit: u32, last_share_id: Option<i64>) -> Result<ShareList> {
        let query = share_page_query(limit, last_share_id)?;
        self.get("/api/v1/share/list", &query).await
    }

    /// Stream every free share.
    pub fn list_all_shares(&self, limit: u32) -> impl Stream<Item = Result<ShareInfo>> + '_ {
        paginate(move |cursor| async move {
            let page = self.list_shares(limit, cursor).await?;
            Ok((page.share_list, page.last_share_id))
        })
    }

    /// Change the given fields of a free share.
    pub async fn update_share(&self, share_id: u64, update: &ShareUpdate) -> Result<()> {
        let mut body = Map::new();
        body.insert("shareId".into(), json!(share_id));
        if let Some(name) = &update.name {
            body.insert("shareName".into(), json!(name));
        }
        if let Some(expiry) = update.expiry {
            body.insert("shareExpire".into(), json!(expiry.days()));
        }
        if let Some(pwd) = &update.password {
            body.insert("sharePwd".into(), json!(pwd));
        }
        put_traffic(
            &mut body,
            update.traffic_switch,
            update.traffic_limit_switch,
            update.traffic_limit,
        );
        let _: IgnoredAny = self
            .put("/api/v1/share/update", &Value::Object(body))
            .await?;
        Ok(())
    }

    /// Create a paid share; `price` is in cents.
    pub async fn create_paid_share(
        &self,
        file_ids: &[u64],
        name: &str,
        expiry: ShareExpiry,
        price: u64,
        password: Option<&str>,
    ) -> Result<CreatedShare> {
        let mut body = json!({
            "shareName": name,
            "shareExpire": expiry.days(),
            "fileIDList": file_id_list(file_ids)?,
            "price": price,
        });
        if let Some(pwd) = password {
            body["sharePwd"] = json!(pwd);
        }
        self.post("/api/v1/share/paid/create", &body).await
    }

    pub async fn list_paid_shares(
        &self,
        limit: u32,
        last_share_id: Option<i64>,
    ) -> Result<ShareList> {
        let query = share_page_query(limit, last_share_id)?;
        self.get("/api/v1/share/paid/list", &query).await
    }

    pub async fn update_paid_share(&self, share_id: u64, update: &PaidShareUpdate) -> Result<()> {
        let mut body = json!({ "shareId": share_id });
        if let Some(name) = &update.name {
            body["shareName"] = json!(name);
        }
        if let Some(expiry) = update.expiry {
            body["shareExpire"] = json!(expiry.days());
        }
        if let Some(price) = update.price {
            body["price"] = json!(price);
        }
        if let Some(pwd) = &update.password {
            body["sharePwd"] = json!(pwd);
        }
        let _: IgnoredAny = self.put("/api/v1/share/paid/update", &body).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_list_is_comma_joined() {
        assert_eq!(file_id_list(&[1, 2, 3]).unwrap(), "1,2,3");
        assert!(matches!(
            file_id_list(&[]),
            Err(Pan123Error::Validation(_))
        ));
        let many: Vec<u64> = (0..101).collect();
        assert!(matches!(
            file_id_list(&many),
            Err(Pan123Error::ShareLimitExceeded(101))
        ));
    }

    #[test]
    fn traffic_fields() {
        let mut body = Map::new();
        put_traffic(&mut body, Some(TrafficSwitch::GuestOnly), Some(false), Some(1024));
        assert_eq!(
            Value::Object(body),
            json!({ "trafficSwitch": 2, "trafficLimitSwitch": 1, "trafficLimit": 1024 })
        );

        let mut body = Map::new();
        put_traffic(&mut body, None, Some(true), None);
        assert_eq!(Value::Object(body), json!({ "trafficLimitSwitch": 2 }));
    }

    #[test]
    fn page_query_checks_limit() {
        assert!(share_page_query(0, None).is_err());
        assert_eq!(
            share_page_query(20, Some(9)).unwrap(),
            vec![("limit", "20".to_owned()), ("lastShareId", "9".to_owned())]
        );
    }
}
