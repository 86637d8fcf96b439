use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use api_rest::{router, AppState};
use api_shared::config::DEFAULT_MAX_UPLOAD_BYTES;
use api_shared::TokenConfig;
use mcg_core::{EntityStore, PasswordHashing, RecordResult};

const BOUNDARY: &str = "mcg-test-boundary";

struct PlainHasher;

impl PasswordHashing for PlainHasher {
    fn hash(&self, plaintext: &str) -> RecordResult<String> {
        Ok(format!("plain${plaintext}"))
    }

    fn verify(&self, digest: &str, plaintext: &str) -> RecordResult<bool> {
        Ok(digest == format!("plain${plaintext}"))
    }
}

fn app() -> Router {
    let token = TokenConfig::new("test-secret".into(), "localhost".into(), Duration::from_secs(600))
        .expect("valid token config");
    router(AppState::new(
        EntityStore::new(),
        Arc::new(PlainHasher),
        &token,
        DEFAULT_MAX_UPLOAD_BYTES,
    ))
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.expect("request should complete");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request should build")
}

fn multipart_request(uri: &str, token: &str, fields: &[(&str, &[u8])]) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        if *name == "data" {
            body.extend_from_slice(
                b"Content-Disposition: form-data; name=\"data\"; filename=\"scan.bin\"\r\n\
                  Content-Type: application/octet-stream\r\n\r\n",
            );
        } else {
            body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            );
        }
        body.extend_from_slice(value);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .expect("request should build")
}

async fn login(app: &Router) -> String {
    let (status, _) = send(
        app,
        json_request(
            "POST",
            "/public/users",
            None,
            json!({"username": "doctor1", "password": "secret1"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/public/users/login",
            None,
            json!({"username": "doctor1", "password": "secret1"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"]
        .as_str()
        .expect("login should return a token")
        .to_string()
}

fn john_smith() -> Value {
    json!({
        "name": "John Smith",
        "address": "1 Main Street",
        "phoneNumber": "8044955579",
        "externalIdentifier": "123",
        "dateOfBirth": "1970-03-14T00:00:00Z"
    })
}

#[tokio::test]
async fn health_is_public() {
    let app = app();
    let (status, body) = send(&app, empty_request("GET", "/public/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let app = app();

    let (status, body) = send(&app, empty_request("GET", "/patients?name=x", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let (status, _) = send(
        &app,
        json_request("POST", "/patients", Some("not-a-token"), john_smith()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_password_is_bad_request() {
    let app = app();
    login(&app).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/public/users/login",
            None,
            json!({"username": "doctor1", "password": "nope123"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "password does not match");
}

#[tokio::test]
async fn duplicate_username_is_conflict() {
    let app = app();
    login(&app).await;

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/public/users",
            None,
            json!({"username": "doctor1", "password": "other12"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn create_patient_then_duplicate_is_conflict() {
    let app = app();
    let token = login(&app).await;

    let (status, body) = send(
        &app,
        json_request("POST", "/patients", Some(&token), john_smith()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["externalIdentifier"], "123");

    let (status, body) = send(
        &app,
        json_request("POST", "/patients", Some(&token), john_smith()),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["error"]["message"],
        "patient with matching externalIdentifier already exists"
    );
}

#[tokio::test]
async fn invalid_patient_is_bad_request() {
    let app = app();
    let token = login(&app).await;

    let (status, body) = send(
        &app,
        json_request("POST", "/patients", Some(&token), json!({"name": "John Smith"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn update_patient_replaces_fields() {
    let app = app();
    let token = login(&app).await;
    send(&app, json_request("POST", "/patients", Some(&token), john_smith())).await;

    let mut changed = john_smith();
    changed["address"] = json!("2 Side Street");
    let (status, body) = send(
        &app,
        json_request("PUT", "/patients/1", Some(&token), changed),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["address"], "2 Side Street");

    let (status, body) = send(
        &app,
        json_request("PUT", "/patients/99", Some(&token), john_smith()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "patient id not found");
}

#[tokio::test]
async fn attachments_conditions_search_and_cascade() {
    let app = app();
    let token = login(&app).await;
    send(&app, json_request("POST", "/patients", Some(&token), john_smith())).await;

    for name in ["brain scan", "knee scan"] {
        let (status, body) = send(
            &app,
            multipart_request(
                "/patients/1/attachments",
                &token,
                &[
                    ("name", name.as_bytes()),
                    ("description", "axial".as_bytes()),
                    ("type", "MRI".as_bytes()),
                    ("data", "hello".as_bytes()),
                ],
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"], "aGVsbG8=");
    }

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/patients/1/diagnosedConditions",
            Some(&token),
            json!({"name": "Flu", "code": "J11", "date": "2024-01-03T00:00:00Z"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        empty_request("GET", "/patients?attachmentType=MRI", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let results = body.as_array().expect("search returns a list");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["attachments"].as_array().map(Vec::len), Some(2));
    assert_eq!(results[0]["diagnosedConditions"].as_array().map(Vec::len), Some(1));

    let (status, body) = send(&app, empty_request("GET", "/patients", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]), "no criteria means no results");

    let (status, _) = send(&app, empty_request("DELETE", "/patients/1", Some(&token))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    for uri in [
        "/patients?attachmentType=MRI",
        "/patients?diagnosedConditionName=Flu",
        "/patients?externalIdentifier=123",
    ] {
        let (_, body) = send(&app, empty_request("GET", uri, Some(&token))).await;
        assert_eq!(body, json!([]), "{uri} should find nothing after delete");
    }

    let (status, _) = send(&app, empty_request("DELETE", "/attachments/1", Some(&token))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "attachment went with its patient");
}

#[tokio::test]
async fn empty_attachment_data_is_rejected() {
    let app = app();
    let token = login(&app).await;
    send(&app, json_request("POST", "/patients", Some(&token), john_smith())).await;

    let (status, body) = send(
        &app,
        multipart_request(
            "/patients/1/attachments",
            &token,
            &[
                ("name", "brain scan".as_bytes()),
                ("type", "MRI".as_bytes()),
                ("data", "".as_bytes()),
            ],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "data was empty");
}

#[tokio::test]
async fn large_attachment_is_accepted() {
    let app = app();
    let token = login(&app).await;
    send(&app, json_request("POST", "/patients", Some(&token), john_smith())).await;

    let scan = vec![7u8; 3 * 1024 * 1024];
    let (status, body) = send(
        &app,
        multipart_request(
            "/patients/1/attachments",
            &token,
            &[
                ("name", "full body scan".as_bytes()),
                ("type", "CT".as_bytes()),
                ("data", scan.as_slice()),
            ],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let encoded = body["data"].as_str().expect("data is base64 text");
    assert_eq!(encoded.len(), (scan.len() + 2) / 3 * 4);
}

#[tokio::test]
async fn dependents_of_unknown_patient_are_rejected() {
    let app = app();
    let token = login(&app).await;

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/patients/42/diagnosedConditions",
            Some(&token),
            json!({"name": "Flu", "code": "J11", "date": "2024-01-03T00:00:00Z"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_single_condition_keeps_patient() {
    let app = app();
    let token = login(&app).await;
    send(&app, json_request("POST", "/patients", Some(&token), john_smith())).await;
    send(
        &app,
        json_request(
            "POST",
            "/patients/1/diagnosedConditions",
            Some(&token),
            json!({"name": "Flu", "code": "J11", "date": "2024-01-03T00:00:00Z"}),
        ),
    )
    .await;

    let (status, _) = send(
        &app,
        empty_request("DELETE", "/diagnosedConditions/1", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, empty_request("GET", "/patients?name=John%20Smith", Some(&token))).await;
    assert_eq!(body[0]["diagnosedConditions"], json!([]));
}

#[tokio::test]
async fn openapi_document_is_public() {
    let app = app();
    let (status, body) = send(&app, empty_request("GET", "/public/openapi.json", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/patients"].is_object());
}
