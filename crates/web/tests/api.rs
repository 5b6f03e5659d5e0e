use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use catalog::CatalogLoader;
use dal::MemoryStore;
use pretty_assertions::assert_eq;
use records::InventoryManager;
use serde_json::{json, Value};
use settings::InventoryConfig;
use tower::ServiceExt;
use web::{router, AppState};

const NIC_CATALOG: &str = r#"[
  {"brand": "Intel", "series": "X710", "models": [{"model": "X710-DA2", "ports": 2}, {"model": "X710-DA4", "ports": 4}]},
  {"brand": "Mellanox", "series": "ConnectX-5", "models": [{"model": "MCX512A", "ports": 2}]}
]"#;

fn app(dir: &tempfile::TempDir) -> Router {
    let manager = InventoryManager::new(
        Arc::new(MemoryStore::new()),
        CatalogLoader::new(dir.path()),
        InventoryConfig::default(),
    );
    router(AppState::new(manager))
}

async fn call(app: &Router, method: Method, query: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(format!("/api/components?{query}"))
        .header("content-type", "application/json")
        .body(match body {
            Some(v) => Body::from(v.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn add_then_get_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);

    let (status, added) = call(
        &app,
        Method::POST,
        "action=add&type=ram",
        Some(json!({"serial_number": "RAM-T1", "status": "available"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(added["success"], json!(true));
    assert_eq!(added["status_code"], json!(201));
    let id = added["data"]["id"].as_i64().unwrap();

    let (status, got) = call(&app, Method::GET, &format!("action=get&type=ram&id={id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(got["data"]["serial_number"], json!("RAM-T1"));
    assert_eq!(got["data"]["status"], json!("available"));
    assert_eq!(got["data"]["identifier"], added["data"]["identifier"]);
}

#[tokio::test]
async fn invalid_type_fails_for_every_action() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);

    for action in ["list", "options", "get", "add", "update", "delete"] {
        let (status, body) = call(
            &app,
            Method::POST,
            &format!("action={action}&type=gpu&id=1"),
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{action}");
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["data"], Value::Null);
    }
}

#[tokio::test]
async fn malformed_query_string_gets_an_envelope() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);

    let (status, body) = call(&app, Method::GET, "action=list&action=get&type=cpu", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["status_code"], json!(400));
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("invalid query string"));
    assert_eq!(body["data"], Value::Null);
}

#[tokio::test]
async fn duplicate_serial_is_a_conflict() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);
    let body = json!({"serial_number": "CPU-1"});

    let (status, _) = call(&app, Method::POST, "action=add&type=cpu", Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, env) = call(&app, Method::POST, "action=add&type=cpu", Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(env["status_code"], json!(409));
    assert!(env["message"].as_str().unwrap().contains("CPU-1"));
}

#[tokio::test]
async fn in_use_requires_server() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);

    let (status, env) = call(
        &app,
        Method::POST,
        "action=add&type=storage",
        Some(json!({"serial_number": "SSD-1", "status": "inUse"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(env["message"].as_str().unwrap().contains("server identifier"));

    let (_, list) = call(&app, Method::GET, "action=list&type=storage", None).await;
    assert_eq!(list["data"]["total"], json!(0));
}

#[tokio::test]
async fn nic_list_by_status() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);

    for (n, status) in ["failed", "failed", "available", "failed", "available"]
        .iter()
        .enumerate()
    {
        let (code, _) = call(
            &app,
            Method::POST,
            "action=add&type=nic",
            Some(json!({
                "serial_number": format!("NIC-{n}"),
                "status": status,
                "mac_address": format!("00:1b:21:aa:bb:0{n}"),
            })),
        )
        .await;
        assert_eq!(code, StatusCode::CREATED);
    }

    let (status, env) = call(
        &app,
        Method::GET,
        "action=list&type=nic&status=failed&limit=10&offset=0",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(env["data"]["records"].as_array().unwrap().len(), 3);
    assert_eq!(env["data"]["total"], json!(3));
    assert_eq!(env["data"]["has_more"], json!(false));
}

#[tokio::test]
async fn update_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);

    let (_, added) = call(
        &app,
        Method::POST,
        "action=add&type=caddy",
        Some(json!({"serial_number": "CD-1", "location": "DC2"})),
    )
    .await;
    let id = added["data"]["id"].as_i64().unwrap();

    let (status, _) = call(
        &app,
        Method::POST,
        &format!("action=update&type=caddy&id={id}"),
        Some(json!({"serial_number": "CD-2"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, env) = call(
        &app,
        Method::POST,
        &format!("action=update&type=caddy&id={id}"),
        Some(json!({"location": null, "flag": "inspect"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(env["data"]["location"], Value::Null);
    assert_eq!(env["data"]["flag"], json!("inspect"));

    let (status, _) = call(&app, Method::GET, &format!("action=delete&type=caddy&id={id}"), None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, _) = call(&app, Method::POST, &format!("action=delete&type=caddy&id={id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(&app, Method::GET, &format!("action=get&type=caddy&id={id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn options_narrow_the_catalog() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("nic.json"), NIC_CATALOG).unwrap();
    let app = app(&dir);

    let (_, env) = call(&app, Method::GET, "action=options&type=nic", None).await;
    assert_eq!(env["data"], json!({"level": "brands", "options": ["Intel", "Mellanox"]}));

    let (_, env) = call(&app, Method::GET, "action=options&type=nic&brand=Intel", None).await;
    assert_eq!(env["data"], json!({"level": "series", "options": ["X710"]}));

    let (_, env) = call(
        &app,
        Method::GET,
        "action=options&type=nic&brand=Intel&series=X710",
        None,
    )
    .await;
    let models = env["data"]["options"].as_array().unwrap();
    assert_eq!(models.len(), 2);
    assert_eq!(models[1]["model"], json!("X710-DA4"));
    assert_eq!(models[1]["index"], json!(1));

    // missing catalog degrades to no options
    let (status, env) = call(&app, Method::GET, "action=options&type=motherboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(env["data"]["options"], json!([]));
}
