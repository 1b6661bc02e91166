use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tourgid_api::{build_app_with, build_router, ApiConfig, ApiState};
use tourgid_core::Catalog;
use tourgid_gateway::{CompletionBackend, ScriptedClient};
use tower::ServiceExt;

const ROUTE_REPLY: &str = r#"{"intent":"get_route","confidence":0.92,"destination":"Байтерек","response_text":"Строю маршрут к Байтереку","reasoning":["пользователь просит маршрут"]}"#;

fn app(client: ScriptedClient) -> Router {
    let catalog = Catalog::seeded().expect("seed catalog should parse");
    build_router(ApiState::new(catalog, CompletionBackend::Scripted(client)))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, parsed)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = send(app(ScriptedClient::reply("{}")), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["version"], "1.0.0");
    assert!(body["timestamp"].is_string());
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn root_lists_endpoints() {
    let (status, body) = send(app(ScriptedClient::reply("{}")), get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");
    assert_eq!(body["endpoints"]["ai_voice"], "/ai/process-voice");
    assert_eq!(body["endpoints"]["routes"], "/ai/generate-route");
}

#[tokio::test]
async fn attractions_count_matches_data() {
    let (status, body) = send(app(ScriptedClient::reply("{}")), get("/attractions")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let data = body["data"].as_array().expect("data array");
    assert_eq!(body["count"], data.len());

    let baiterek = data
        .iter()
        .find(|item| item["id"] == "ast001")
        .expect("ast001 present");
    assert_eq!(baiterek["name"], "Байтерек");
    assert_eq!(baiterek["working_hours"]["dayOff"], Value::Null);
}

#[tokio::test]
async fn attraction_lookup_by_id() {
    let app = app(ScriptedClient::reply("{}"));

    let (status, body) = send(app.clone(), get("/attractions/pvl009")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Баянаульский национальный парк");

    let (status, body) = send(app, get("/attractions/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn generate_route_for_baiterek() {
    let request = post_json(
        "/ai/generate-route",
        json!({ "destination_id": "ast001", "preferences": ["scenic", "historical"] }),
    );
    let (status, body) = send(app(ScriptedClient::reply("{}")), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["destination"]["id"], "ast001");
    assert_eq!(
        body["data"]["route"]["end"],
        json!({ "latitude": 51.1283, "longitude": 71.4306 })
    );
    assert_eq!(body["data"]["route"]["difficulty_level"], "easy");
    assert_eq!(body["data"]["preferences"], json!(["scenic", "historical"]));
}

#[tokio::test]
async fn generate_route_unknown_destination_is_not_found() {
    let request = post_json(
        "/ai/generate-route",
        json!({ "destination_id": "does-not-exist" }),
    );
    let (status, body) = send(app(ScriptedClient::reply("{}")), request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Destination not found");
}

#[tokio::test]
async fn process_voice_attaches_route() {
    let request = post_json(
        "/ai/process-voice",
        json!({
            "query": "Найди маршрут к Байтереку",
            "user_location": { "latitude": 52.3, "longitude": 76.95 }
        }),
    );
    let (status, body) = send(app(ScriptedClient::reply(ROUTE_REPLY)), request).await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["intent"], "get_route");
    assert_eq!(data["destination"]["name"], "Байтерек");
    assert_eq!(data["destination"]["opening_hours"], "10:00 - 22:00");
    assert!(data["fetchai_route"].is_object());
    assert_eq!(data["fetchai_route"]["waypoints"].as_array().unwrap().len(), 2);
    assert_eq!(data["route_data"]["destination"]["id"], "ast001");
    assert_eq!(data["preferences"], json!([]));
    assert_eq!(data["response_text"], "Строю маршрут к Байтереку");
    assert_eq!(data["alternatives"][0]["type"], "comprehensive");
}

#[tokio::test]
async fn process_voice_survives_outage() {
    let request = post_json("/ai/process-voice", json!({ "query": "Где Хан Шатыр?" }));
    let (status, body) = send(app(ScriptedClient::outage("connection refused")), request).await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["intent"], "general");
    assert_eq!(data["confidence"], 0.5);
    assert_eq!(
        data["response_text"],
        "Извините, у меня проблемы с подключением к AI. Попробуйте позже."
    );
    assert_eq!(data["destination"], Value::Null);
    assert_eq!(data["fetchai_route"], Value::Null);
}

#[tokio::test]
async fn process_voice_rejects_bad_input() {
    let app = app(ScriptedClient::reply(ROUTE_REPLY));

    let (status, body) = send(
        app.clone(),
        post_json("/ai/process-voice", json!({ "query": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = send(app, post_json("/ai/process-voice", json!({ "text": "hi" }))).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn unknown_endpoint_and_favicon() {
    let app = app(ScriptedClient::reply("{}"));

    let (status, body) = send(app.clone(), get("/routes")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Endpoint not found");

    let (status, _) = send(app, get("/favicon.ico")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn app_builds_without_api_key() {
    let app = build_app_with(&ApiConfig::default())
        .await
        .expect("app should build");

    let request = post_json("/ai/process-voice", json!({ "query": "маршрут к Байтереку" }));
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["confidence"], 0.5);
}
