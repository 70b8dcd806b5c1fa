use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use affinity_api::{
    config::Config,
    routes::{create_router, AppState},
};

fn create_test_server() -> TestServer {
    let state = AppState::new();
    let app = create_router(state, &Config::default());
    TestServer::new(app).unwrap()
}

async fn train(server: &TestServer, user_id: &str, category: &str, product_id: Option<&str>) {
    let mut body = json!({ "userId": user_id, "category": category });
    if let Some(product_id) = product_id {
        body["productId"] = json!(product_id);
    }
    server.post("/train").json(&body).await.assert_status_ok();
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["users"], 0);
}

#[tokio::test]
async fn test_train_returns_counts() {
    let server = create_test_server();

    let response = server
        .post("/train")
        .json(&json!({ "userId": "u1", "category": "스포츠", "productId": "a" }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body, json!({ "message": "ok", "counts": { "스포츠": 1 } }));

    let response = server
        .post("/train")
        .json(&json!({ "userId": "u1", "category": "학습" }))
        .await;
    let body: Value = response.json();
    assert_eq!(body["counts"]["스포츠"], 1);
    assert_eq!(body["counts"]["학습"], 1);
}

#[tokio::test]
async fn test_train_requires_user_and_category() {
    let server = create_test_server();

    for body in [
        json!({ "category": "스포츠" }),
        json!({ "userId": "u1" }),
        json!({ "userId": "", "category": "스포츠" }),
        json!([]),
    ] {
        let response = server.post("/train").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let error: Value = response.json();
        assert_eq!(error["message"], "userId and category are required");
    }

    let health: Value = server.get("/health").await.json();
    assert_eq!(health["users"], 0);
}

#[tokio::test]
async fn test_train_ignores_unknown_category() {
    let server = create_test_server();
    train(&server, "u1", "스포츠", Some("a")).await;

    let response = server
        .post("/train")
        .json(&json!({ "userId": "u1", "category": "unknown-category", "productId": "a" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body, json!({ "message": "ignored" }));

    let prefs: Value = server.get("/users/u1/preferences").await.json();
    assert_eq!(prefs["categoryCounts"], json!({ "스포츠": 1 }));
    assert_eq!(prefs["productCounts"], json!({ "a": 1 }));
}

#[tokio::test]
async fn test_preferences_unknown_user_is_not_found() {
    let server = create_test_server();
    let response = server.get("/users/nobody/preferences").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_recommend_prefers_trained_category() {
    let server = create_test_server();
    for _ in 0..3 {
        train(&server, "u1", "스포츠", None).await;
    }

    let response = server
        .post("/recommend")
        .json(&json!({
            "userId": "u1",
            "catalog": [
                { "_id": "b", "name": "Book", "category": "학습" },
                { "_id": "a", "name": "Ball", "category": "스포츠" }
            ],
            "purchasedIds": [],
            "k": 2
        }))
        .await;
    response.assert_status_ok();

    let names: Vec<String> = response.json();
    assert_eq!(names, vec!["Ball", "Book"]);
}

#[tokio::test]
async fn test_recommend_repeat_purchase_wins() {
    let server = create_test_server();
    for _ in 0..5 {
        train(&server, "u1", "음식", Some("a")).await;
    }

    let names: Vec<String> = server
        .post("/recommend")
        .json(&json!({
            "userId": "u1",
            "catalog": [
                { "_id": "z", "name": "Bread", "category": "음식" },
                { "_id": "a", "name": "Kimchi", "category": "음식" }
            ]
        }))
        .await
        .json();
    assert_eq!(names, vec!["Kimchi", "Bread"]);
}

#[tokio::test]
async fn test_recommend_excludes_purchased_and_defaults_k() {
    let server = create_test_server();

    let catalog: Vec<Value> = (0..8)
        .map(|i| json!({ "_id": format!("p{i}"), "name": format!("Item {i}"), "category": "음식" }))
        .collect();

    let names: Vec<String> = server
        .post("/recommend")
        .json(&json!({ "catalog": catalog, "purchasedIds": ["p0", "p2"], "k": 0 }))
        .await
        .json();
    assert_eq!(names, vec!["Item 1", "Item 3", "Item 4", "Item 5", "Item 6"]);
}

#[tokio::test]
async fn test_recommend_tolerates_malformed_input() {
    let server = create_test_server();

    let response = server
        .post("/recommend")
        .json(&json!({ "catalog": "nope", "purchasedIds": 7, "k": "many" }))
        .await;
    response.assert_status_ok();
    let names: Vec<Value> = response.json();
    assert!(names.is_empty());

    let names: Vec<Value> = server
        .post("/recommend")
        .json(&json!({ "catalog": [{ "_id": "a", "category": "음식" }, 12] }))
        .await
        .json();
    assert_eq!(names, vec![Value::Null]);
}

#[tokio::test]
async fn test_train_ignores_english_category_names() {
    let server = create_test_server();

    let body: Value = server
        .post("/train")
        .json(&json!({ "userId": "u1", "category": "sports" }))
        .await
        .json();
    assert_eq!(body, json!({ "message": "ignored" }));
    server
        .get("/users/u1/preferences")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_recommend_numeric_ids_do_not_match_string_ids() {
    let server = create_test_server();

    let names: Vec<String> = server
        .post("/recommend")
        .json(&json!({
            "catalog": [
                { "_id": "5", "name": "Str", "category": "음식" },
                { "_id": 6, "name": "Num", "category": "음식" }
            ],
            "purchasedIds": [5, "6"]
        }))
        .await
        .json();
    assert_eq!(names, vec!["Str", "Num"]);
}

#[tokio::test]
async fn test_recommend_empty_catalog() {
    let server = create_test_server();
    train(&server, "u1", "스포츠", Some("a")).await;

    let names: Vec<String> = server
        .post("/recommend")
        .json(&json!({ "userId": "u1", "catalog": [], "k": 3 }))
        .await
        .json();
    assert!(names.is_empty());
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("6f1c2b9e-3d4a-4e8b-9a1f-0c2d3e4f5a6b"),
        )
        .await;
    assert_eq!(
        response.header("x-request-id"),
        "6f1c2b9e-3d4a-4e8b-9a1f-0c2d3e4f5a6b"
    );

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("checkout-42"),
        )
        .await;
    let generated = response.header("x-request-id");
    assert_ne!(generated, "checkout-42");
    assert!(uuid::Uuid::parse_str(generated.to_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_cors_allows_any_origin_by_default() {
    let server = create_test_server();

    let response = server
        .post("/recommend")
        .add_header(header::ORIGIN, HeaderValue::from_static("http://shop.example.com"))
        .json(&json!({ "catalog": [] }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.header("access-control-allow-origin"), "*");
}
