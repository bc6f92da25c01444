mod common;

use axum::extract::{Multipart, Query};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use common::ok;
use futures::TryStreamExt;
use pan123_api::Pan123Error;
use pan123_api::types::{
    OfflineTaskOptions, PaidShareUpdate, ShareExpiry, ShareOptions, ShareUpdate, TrafficSwitch,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::AtomicUsize;
use std::sync::{Arc, Mutex};

type Log = Arc<Mutex<Vec<(String, Value)>>>;

/// JSON endpoint that records its body under `name` and answers `reply`.
fn recorder(
    name: &'static str,
    log: &Log,
    reply: Value,
) -> axum::routing::MethodRouter {
    let log = log.clone();
    post(move |Json(body): Json<Value>| {
        let log = log.clone();
        let reply = reply.clone();
        async move {
            log.lock().unwrap().push((name.to_owned(), body));
            ok(reply)
        }
    })
}

fn put_recorder(name: &'static str, log: &Log) -> axum::routing::MethodRouter {
    let log = log.clone();
    put(move |Json(body): Json<Value>| {
        let log = log.clone();
        async move {
            log.lock().unwrap().push((name.to_owned(), body));
            ok(Value::Null)
        }
    })
}

fn share(id: u64, key: &str) -> Value {
    json!({
        "shareId": id, "shareKey": key, "shareName": format!("share {id}"),
        "expiration": "2025-12-31 23:59:59", "expired": 0, "sharePwd": ""
    })
}

async fn server() -> (String, Log) {
    let log: Log = Arc::default();
    let router = Router::new()
        // shares
        .route(
            "/api/v1/share/create",
            recorder("share", &log, json!({ "shareID": 5, "shareKey": "abc" })),
        )
        .route(
            "/api/v1/share/paid/create",
            recorder("paid", &log, json!({ "shareID": 6, "shareKey": "paid" })),
        )
        .route("/api/v1/share/update", put_recorder("share_update", &log))
        .route("/api/v1/share/paid/update", put_recorder("paid_update", &log))
        .route(
            "/api/v1/share/list",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                match q.get("lastShareId").map(String::as_str) {
                    None => ok(json!({ "lastShareId": 11, "shareList": [share(10, "k10"), share(11, "k11")] })),
                    _ => ok(json!({ "lastShareId": -1, "shareList": [share(12, "k12")] })),
                }
            }),
        )
        // trash
        .route(
            "/api/v1/file/trash/list",
            get(|| async {
                ok(json!({ "lastFileId": -1, "fileList": [{
                    "fileId": 1, "filename": "gone.txt", "type": 0, "size": 1, "trashed": 1
                }] }))
            }),
        )
        .route("/api/v1/file/trash/restore", recorder("restore", &log, Value::Null))
        .route("/api/v1/file/trash/delete", recorder("purge", &log, Value::Null))
        .route("/api/v1/file/trash/empty", recorder("empty", &log, Value::Null))
        // direct links
        .route(
            "/api/v1/direct-link/enable",
            recorder("enable", &log, json!({ "filename": "public" })),
        )
        .route(
            "/api/v1/direct-link/url",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                ok(json!({ "url": format!("https://vip.123pan.cn/{}", q["fileID"]) }))
            }),
        )
        .route(
            "/api/v1/developer/config/forbide-ip/switch",
            recorder("ip_switch", &log, json!({ "Done": true })),
        )
        .route(
            "/api/v1/developer/config/forbide-ip/update",
            recorder("ip_update", &log, Value::Null),
        )
        .route(
            "/api/v1/directlink/traffic/logs",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                assert_eq!(q["startDate"], "2024-01-01");
                assert_eq!(q["pageSize"], "2");
                ok(json!({
                    "logs": [{ "date": "2024-01-01", "trafficUsed": 1_048_576, "requestCount": 5 }],
                    "total": 1, "page": 1, "pageSize": 2
                }))
            }),
        )
        // offline
        .route(
            "/api/v1/offline/download",
            recorder("offline", &log, json!({ "taskID": 900 })),
        )
        .route(
            "/api/v1/offline/progress",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                assert_eq!(q["taskID"], "900");
                ok(json!({ "taskID": 900, "status": 0, "process": 100, "fileID": 31 }))
            }),
        )
        // image
        .route(
            "/api/v1/image/upload",
            post(|mut form: Multipart| async move {
                let mut fields = HashMap::new();
                while let Some(field) = form.next_field().await.unwrap() {
                    let name = field.name().unwrap().to_owned();
                    if name == "file" {
                        assert_eq!(field.content_type(), Some("image/png"));
                        assert_eq!(field.file_name(), Some("pic.PNG"));
                        let len = field.bytes().await.unwrap().len();
                        fields.insert(name, len.to_string());
                    } else {
                        fields.insert(name, field.text().await.unwrap());
                    }
                }
                assert_eq!(fields["fileName"], "pic.PNG");
                assert_eq!(fields["dirID"], "3");
                ok(json!({
                    "fileID": 70, "directUrl": "https://img.example/pic.png",
                    "filename": "pic.PNG", "size": fields["file"].parse::<u64>().unwrap(),
                    "format": "png"
                }))
            }),
        )
        // video
        .route(
            "/api/v1/video/transcode",
            recorder("transcode", &log, json!({ "taskID": 44 })),
        )
        .route(
            "/api/v1/video/play",
            get(|| async { ok(json!({ "playUrl": "https://play.example/v.m3u8" })) }),
        );

    let base = common::serve(common::token_route(router, Arc::new(AtomicUsize::new(0)))).await;
    (base, log)
}

fn take(log: &Log) -> Vec<(String, Value)> {
    std::mem::take(&mut *log.lock().unwrap())
}

#[tokio::test]
async fn shares() {
    let (base, log) = server().await;
    let client = common::client(&base);

    let opts = ShareOptions {
        password: Some("1234".into()),
        traffic_switch: Some(TrafficSwitch::AllOn),
        traffic_limit_switch: Some(true),
        traffic_limit: Some(1024),
    };
    let created = client
        .create_share(&[1, 2, 3], "docs", ShareExpiry::SevenDays, &opts)
        .await
        .unwrap();
    assert_eq!(created.share_url(), "https://www.123pan.com/s/abc");

    client
        .update_share(5, &ShareUpdate {
            expiry: Some(ShareExpiry::Permanent),
            ..ShareUpdate::default()
        })
        .await
        .unwrap();
    client
        .create_paid_share(&[4], "paid", ShareExpiry::ThirtyDays, 199, None)
        .await
        .unwrap();
    client
        .update_paid_share(6, &PaidShareUpdate {
            price: Some(299),
            ..PaidShareUpdate::default()
        })
        .await
        .unwrap();

    assert_eq!(
        take(&log),
        vec![
            ("share".to_owned(), json!({
                "shareName": "docs", "shareExpire": 7, "fileIDList": "1,2,3",
                "sharePwd": "1234", "trafficSwitch": 4, "trafficLimitSwitch": 2,
                "trafficLimit": 1024
            })),
            ("share_update".to_owned(), json!({ "shareId": 5, "shareExpire": 0 })),
            ("paid".to_owned(), json!({
                "shareName": "paid", "shareExpire": 30, "fileIDList": "4", "price": 199
            })),
            ("paid_update".to_owned(), json!({ "shareId": 6, "price": 299 })),
        ]
    );

    let all: Vec<_> = client.list_all_shares(2).try_collect().await.unwrap();
    let keys: Vec<&str> = all.iter().map(|s| s.share_key.as_str()).collect();
    assert_eq!(keys, ["k10", "k11", "k12"]);

    let too_many: Vec<u64> = (0..101).collect();
    assert!(matches!(
        client
            .create_share(&too_many, "x", ShareExpiry::OneDay, &ShareOptions::default())
            .await,
        Err(Pan123Error::ShareLimitExceeded(101))
    ));
    assert!(take(&log).is_empty());
}

#[tokio::test]
async fn trash() {
    let (base, log) = server().await;
    let client = common::client(&base);

    let trashed: Vec<_> = client.list_all_trash(100).try_collect().await.unwrap();
    assert_eq!(trashed.len(), 1);
    assert!(trashed[0].trashed);

    client.restore_file(1).await.unwrap();
    client.delete_permanently(2).await.unwrap();
    client.empty_trash().await.unwrap();
    assert_eq!(
        take(&log),
        vec![
            ("restore".to_owned(), json!({ "fileID": 1 })),
            ("purge".to_owned(), json!({ "fileID": 2 })),
            ("empty".to_owned(), json!({})),
        ]
    );
}

#[tokio::test]
async fn direct_links() {
    let (base, log) = server().await;
    let client = common::client(&base);

    assert_eq!(client.enable_direct_link(8).await.unwrap(), "public");
    assert_eq!(
        client.direct_link_url(9).await.unwrap(),
        "https://vip.123pan.cn/9"
    );
    assert!(client.toggle_ip_blacklist(false).await.unwrap());
    client
        .update_ip_blacklist(&["10.0.0.1".to_owned()])
        .await
        .unwrap();

    let page = client
        .direct_link_traffic_logs("2024-01-01", "2024-01-31", 1, 2)
        .await
        .unwrap();
    assert_eq!(page.total_requests(), 5);
    assert!(!page.has_more());

    let too_many = vec!["1.1.1.1".to_owned(); 2001];
    assert!(matches!(
        client.update_ip_blacklist(&too_many).await,
        Err(Pan123Error::Validation(_))
    ));

    assert_eq!(
        take(&log),
        vec![
            ("enable".to_owned(), json!({ "fileID": 8 })),
            ("ip_switch".to_owned(), json!({ "Status": 2 })),
            ("ip_update".to_owned(), json!({ "IpList": ["10.0.0.1"] })),
        ]
    );
}

#[tokio::test]
async fn offline_downloads() {
    let (base, log) = server().await;
    let client = common::client(&base);

    let opts = OfflineTaskOptions {
        file_name: Some("a.zip".into()),
        dir_id: Some(12),
        callback_url: None,
    };
    let task = client
        .create_offline_task("https://example.com/a.zip", &opts)
        .await
        .unwrap();
    assert_eq!(task, 900);

    let progress = client.offline_progress(task).await.unwrap();
    assert!(progress.is_success());
    assert!((progress.progress - 100.0).abs() < f64::EPSILON);
    assert_eq!(progress.file_id, Some(31));

    assert!(matches!(
        client
            .create_offline_task("ftp://example.com/a.zip", &opts)
            .await,
        Err(Pan123Error::UnsupportedProtocol(_))
    ));
    assert_eq!(
        take(&log),
        vec![(
            "offline".to_owned(),
            json!({ "url": "https://example.com/a.zip", "fileName": "a.zip", "dirID": 12 })
        )]
    );
}

#[tokio::test]
async fn image_and_video() {
    let (base, log) = server().await;
    let client = common::client(&base);
    let dir = tempfile::tempdir().unwrap();

    let png = dir.path().join("pic.PNG");
    std::fs::write(&png, [0x89, b'P', b'N', b'G']).unwrap();
    let image = client.upload_image(&png, Some(3)).await.unwrap();
    assert_eq!(image.file_id, 70);
    assert_eq!(image.size, 4);

    let txt = dir.path().join("notes.txt");
    std::fs::write(&txt, "x").unwrap();
    assert!(matches!(
        client.upload_image(&txt, None).await,
        Err(Pan123Error::UnsupportedImageFormat(_))
    ));

    let task = client
        .create_transcode_task(55, "1080p", "mp4")
        .await
        .unwrap();
    assert_eq!(task, 44);
    assert_eq!(
        client.play_url(55).await.unwrap(),
        "https://play.example/v.m3u8"
    );
    assert_eq!(
        take(&log),
        vec![(
            "transcode".to_owned(),
            json!({ "fileID": 55, "resolution": "1080p", "format": "mp4" })
        )]
    );
}
