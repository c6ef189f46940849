//! End-to-end dispatch tests: HTTP client → gateway → mock command engine.

use command_gateway::lifecycle::Shutdown;
use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;

use common::{client, start_gateway, start_mock_engine, unused_addr, MockReply};

async fn get_json(url: &str) -> (StatusCode, Value) {
    let res = client().get(url).send().await.unwrap();
    let status = res.status();
    (status, res.json().await.unwrap())
}

#[tokio::test]
async fn test_status_without_engine_call() {
    let engine = start_mock_engine(|_| MockReply::ok(&[])).await;
    let shutdown = Shutdown::new();
    let base = start_gateway(engine.addr, &shutdown).await;

    let (status, body) = get_json(&format!("{base}/api/status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "it-gateway");
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
    assert!(engine.received().is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_hello_forwards_name() {
    let engine = start_mock_engine(|cmd| {
        let greeting = format!("Hello, {}!", cmd.params.get("name").cloned().unwrap_or_default());
        MockReply::ok(&[("message", greeting.as_str()), ("from", "plugin")])
    })
    .await;
    let shutdown = Shutdown::new();
    let base = start_gateway(engine.addr, &shutdown).await;

    let (status, body) = get_json(&format!("{base}/api/hello")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Hello, World!");
    assert_eq!(body["from"], "plugin");
    assert_eq!(body["timestamp"], "");

    let last = engine.last().unwrap();
    assert_eq!(last.command, "HelloWorld");
    assert_eq!(last.params.get("name").map(String::as_str), Some("World"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_route_captures_become_params() {
    let engine = start_mock_engine(|cmd| {
        let id = cmd.params.get("userID").cloned().unwrap_or_default();
        MockReply::ok(&[("userID", id.as_str()), ("email", "a@b.c")])
    })
    .await;
    let shutdown = Shutdown::new();
    let base = start_gateway(engine.addr, &shutdown).await;

    let (status, body) = get_json(&format!("{base}/api/users/42")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["userID"], "42");
    assert_eq!(body["email"], "a@b.c");
    assert_eq!(body["firstName"], "");
    assert_eq!(engine.last().unwrap().command, "GetUser");

    let res = client().delete(format!("{base}/api/users/42")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(engine.last().unwrap().command, "DeleteUser");

    shutdown.trigger();
}

#[tokio::test]
async fn test_create_poll_json_body() {
    let engine = start_mock_engine(|_| MockReply::ok(&[("pollID", "9"), ("result", "success")])).await;
    let shutdown = Shutdown::new();
    let base = start_gateway(engine.addr, &shutdown).await;

    let res = client()
        .post(format!("{base}/api/chats/3/polls"))
        .json(&json!({
            "creatorUserID": 5,
            "question": "Lunch?",
            "type": "single_choice",
            "options": ["Pizza", "Sushi"],
            "isAnonymous": true
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"pollID": "9", "result": "success"}));

    let sent = engine.last().unwrap();
    assert_eq!(sent.command, "CreatePoll");
    assert_eq!(sent.params["chatID"], "3");
    assert_eq!(sent.params["creatorUserID"], "5");
    assert_eq!(sent.params["options"], r#"["Pizza","Sushi"]"#);
    assert_eq!(sent.params["allowChangeVote"], "false");
    assert_eq!(sent.params["isAnonymous"], "true");
    assert!(!sent.params.contains_key("expiresAt"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_edit_poll_clears_expiry_from_form_body() {
    let engine = start_mock_engine(|_| MockReply::ok(&[("pollID", "7"), ("result", "success")])).await;
    let shutdown = Shutdown::new();
    let base = start_gateway(engine.addr, &shutdown).await;

    let res = client()
        .put(format!("{base}/api/polls/7"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("actorUserID=2&expiresAt=null")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let sent = engine.last().unwrap();
    assert_eq!(sent.command, "EditPoll");
    assert_eq!(sent.params["expiresAt"], "null");
    assert!(!sent.params.contains_key("question"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_nested_json_fields_decoded() {
    let engine = start_mock_engine(|_| {
        MockReply::ok(&[
            ("pollID", "7"),
            ("options", r#"[{"optionID":1,"text":"Yes"}]"#),
            ("responses", "not json"),
        ])
    })
    .await;
    let shutdown = Shutdown::new();
    let base = start_gateway(engine.addr, &shutdown).await;

    let (status, body) = get_json(&format!("{base}/api/polls/7")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["options"], json!([{"optionID": 1, "text": "Yes"}]));
    assert_eq!(body["responses"], "not json");
    assert_eq!(body["pollID"], "7");

    shutdown.trigger();
}

#[tokio::test]
async fn test_routing_errors() {
    let engine = start_mock_engine(|_| MockReply::ok(&[])).await;
    let shutdown = Shutdown::new();
    let base = start_gateway(engine.addr, &shutdown).await;

    let (status, body) = get_json(&format!("{base}/api/nowhere")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Endpoint not found"}));

    let res = client().post(format!("{base}/api/polls/7")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Method not allowed");
    assert_eq!(body["allowed"], json!(["DELETE", "GET", "PUT"]));

    assert!(engine.received().is_empty());
    shutdown.trigger();
}

#[tokio::test]
async fn test_validation_stops_before_engine() {
    let engine = start_mock_engine(|_| MockReply::ok(&[])).await;
    let shutdown = Shutdown::new();
    let base = start_gateway(engine.addr, &shutdown).await;

    let res = client()
        .post(format!("{base}/api/messages"))
        .json(&json!({"userID": 1, "name": "n"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"error": "Missing required parameter: message"}));

    let (status, body) = get_json(&format!("{base}/api/chats/5/members?userID=0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid parameter: userID"}));

    assert!(engine.received().is_empty());
    shutdown.trigger();
}

#[tokio::test]
async fn test_backend_failures_normalized() {
    let engine = start_mock_engine(|cmd| match cmd.command.as_str() {
        "GetPoll" => MockReply::status("404 Not Found").with_body(r#"{"error":"Poll not found"}"#),
        "DeletePoll" => MockReply::status("Broken"),
        _ => MockReply::status("500 Custom Failure"),
    })
    .await;
    let shutdown = Shutdown::new();
    let base = start_gateway(engine.addr, &shutdown).await;

    let (status, body) = get_json(&format!("{base}/api/polls")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "500 Custom Failure"}));

    let (status, body) = get_json(&format!("{base}/api/polls/3")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "404 Not Found - Poll not found"}));

    let res = client().delete(format!("{base}/api/polls/3")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

    shutdown.trigger();
}

#[tokio::test]
async fn test_engine_unreachable() {
    let shutdown = Shutdown::new();
    let base = start_gateway(unused_addr().await, &shutdown).await;

    let (status, body) = get_json(&format!("{base}/api/hello?name=Ada")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, json!({"error": "Error connecting to backend"}));

    shutdown.trigger();
}

#[tokio::test]
async fn test_options_and_body_limit() {
    let engine = start_mock_engine(|_| MockReply::ok(&[])).await;
    let shutdown = Shutdown::new();
    let base = start_gateway(engine.addr, &shutdown).await;

    let res = client()
        .request(reqwest::Method::OPTIONS, format!("{base}/api/polls/7"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().is_empty());

    let res = client()
        .post(format!("{base}/api/messages"))
        .header("content-type", "application/json")
        .body(format!(r#"{{"message":"{}"}}"#, "x".repeat(8192)))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"error": "Request body too large"}));

    assert!(engine.received().is_empty());
    shutdown.trigger();
}

#[tokio::test]
async fn test_request_id_echoed() {
    let engine = start_mock_engine(|_| MockReply::ok(&[])).await;
    let shutdown = Shutdown::new();
    let base = start_gateway(engine.addr, &shutdown).await;

    let res = client().get(format!("{base}/api/status")).send().await.unwrap();
    assert!(res.headers().contains_key("x-request-id"));

    let res = client()
        .get(format!("{base}/api/status"))
        .header("x-request-id", "fixed-id")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "fixed-id");

    shutdown.trigger();
}
