use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use portfolio_backend::{
    cache::MediaCache,
    config::Config,
    contact::ContactRelay,
    domain::{MailTransport, MediaSource, OutgoingMail},
    errors::{MailError, MediaError},
    instagram::MediaService,
    models::RawMedia,
    oauth::InstagramOAuth,
    routes::create_router,
    AppState,
};
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::sync::Mutex;
use tower::ServiceExt;

struct FakeSource {
    calls: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl MediaSource for FakeSource {
    async fn fetch_media(&self, _access_token: &str, limit: u32) -> Result<Vec<RawMedia>, MediaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(MediaError::FetchFailed(anyhow::anyhow!("connection reset")));
        }
        let raw: Vec<RawMedia> = (0..limit)
            .map(|i| {
                let media_type = if i % 3 == 2 { "VIDEO" } else { "IMAGE" };
                let caption = (i == 0).then_some("Great day #automotive shoot");
                serde_json::from_value(json!({
                    "id": format!("m{}", i),
                    "media_type": media_type,
                    "media_url": format!("https://cdn.example/m{}.jpg", i),
                    "permalink": format!("https://instagram.com/p/m{}", i),
                    "caption": caption,
                }))
                .unwrap()
            })
            .collect();
        Ok(raw)
    }
}

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
    fail_with: Option<String>,
}

#[async_trait]
impl MailTransport for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        if let Some(msg) = &self.fail_with {
            return Err(MailError::Transport(msg.clone()));
        }
        self.sent.lock().await.push(mail);
        Ok(())
    }
}

struct Harness {
    router: Router,
    source: Arc<FakeSource>,
    mailer: Arc<RecordingMailer>,
}

fn config(extra: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = [
        ("INSTAGRAM_CLIENT_ID", "client-123"),
        ("INSTAGRAM_CLIENT_SECRET", "shh"),
        ("EMAIL_USER", "studio@example.com"),
        ("EMAIL_PASS", "app-password"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    vars.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    Config::from_lookup(|key| vars.get(key).cloned()).expect("test config should load")
}

fn harness_with(config: Config, oauth_base: &str, fail_media: bool, mailer: RecordingMailer) -> Harness {
    let source = Arc::new(FakeSource {
        calls: AtomicUsize::new(0),
        fail: fail_media,
    });
    let mailer = Arc::new(mailer);
    let media = MediaService::new(source.clone(), MediaCache::new(Duration::from_secs(3600)));
    let oauth = InstagramOAuth::with_endpoints(reqwest::Client::new(), &config.instagram, oauth_base, oauth_base);
    let contact = ContactRelay::new(mailer.clone(), config.mail.recipient.clone());

    let state = Arc::new(AppState {
        config,
        media,
        oauth,
        contact,
    });
    Harness {
        router: create_router(state),
        source,
        mailer,
    }
}

fn harness() -> Harness {
    harness_with(
        config(&[
            ("INSTAGRAM_ACCESS_TOKEN", "long-lived"),
            ("INSTAGRAM_VERIFY_TOKEN", "verify-me"),
        ]),
        "http://127.0.0.1:9",
        false,
        RecordingMailer::default(),
    )
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, bytes) = send(router, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_endpoint_responds() {
    let h = harness();
    let (status, body) = send_json(&h.router, get("/api/test")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Backend server is running!");
}

#[tokio::test]
async fn media_endpoint_processes_and_caches() {
    let h = harness();

    let (status, body) = send_json(&h.router, get("/api/instagram/media?limit=6")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let data = body["data"].as_array().unwrap();
    // Videos (every third item) are dropped.
    assert_eq!(data.len(), 4);
    assert_eq!(data[0]["category"], "Automotive");
    assert_eq!(data[1]["category"], "Portrait");
    assert_eq!(data[1]["title"], "Instagram Photo 2");

    let (_, again) = send_json(&h.router, get("/api/instagram/media?limit=30")).await;
    assert_eq!(again["data"].as_array().unwrap().len(), 4);
    assert_eq!(h.source.calls.load(Ordering::SeqCst), 1);

    let (status, cleared) = send_json(&h.router, Request::post("/api/instagram/clear-cache").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["success"], true);

    send_json(&h.router, get("/api/instagram/media")).await;
    assert_eq!(h.source.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn empty_limit_falls_back_to_default() {
    let h = harness();
    let (status, body) = send_json(&h.router, get("/api/instagram/media?limit=")).await;
    assert_eq!(status, StatusCode::OK);
    // Twelve fetched, four of them videos.
    assert_eq!(body["data"].as_array().unwrap().len(), 8);
    assert_eq!(h.source.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn non_numeric_limit_is_rejected() {
    let h = harness();
    let (status, body) = send_json(&h.router, get("/api/instagram/media?limit=lots")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(h.source.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn media_endpoint_requires_access_token() {
    let h = harness_with(config(&[]), "http://127.0.0.1:9", false, RecordingMailer::default());
    let (status, body) = send_json(&h.router, get("/api/instagram/media")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Instagram access token not configured");
    assert_eq!(h.source.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn media_upstream_failure_is_opaque() {
    let h = harness_with(
        config(&[("INSTAGRAM_ACCESS_TOKEN", "long-lived")]),
        "http://127.0.0.1:9",
        true,
        RecordingMailer::default(),
    );
    let (status, body) = send_json(&h.router, get("/api/instagram/media")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "success": false, "message": "Failed to fetch Instagram media" }));
}

#[tokio::test]
async fn contact_with_empty_subject_is_rejected_without_sending() {
    let h = harness();
    let (status, body) = send_json(
        &h.router,
        post_json(
            "/api/contact",
            json!({ "name": "Jamie", "email": "jamie@example.com", "subject": "", "message": "Hello" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "All fields are required");
    assert!(h.mailer.sent.lock().await.is_empty());
}

#[tokio::test]
async fn contact_is_relayed() {
    let h = harness();
    let (status, body) = send_json(
        &h.router,
        post_json(
            "/api/contact",
            json!({ "name": "Jamie", "email": "jamie@example.com", "subject": "Sports Event", "message": "Line one\nLine two" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let sent = h.mailer.sent.lock().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "studio@example.com");
    assert!(sent[0].html_body.contains("Line one<br>Line two"));
}

#[tokio::test]
async fn contact_transport_failure_reports_error_detail() {
    let h = harness_with(
        config(&[]),
        "http://127.0.0.1:9",
        false,
        RecordingMailer {
            fail_with: Some("Connection refused".into()),
            ..Default::default()
        },
    );
    let (status, body) = send_json(
        &h.router,
        post_json(
            "/api/contact",
            json!({ "name": "Jamie", "email": "jamie@example.com", "subject": "Other", "message": "Hi" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Failed to send message. Please try again later.");
    assert_eq!(body["error"], "Connection refused");
}

#[tokio::test]
async fn malformed_contact_json_is_a_client_error() {
    let h = harness();
    let request = Request::post("/api/contact")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send_json(&h.router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn authorize_redirects_to_instagram() {
    let h = harness();
    let response = h.router.clone().oneshot(get("/auth/instagram")).await.unwrap();
    assert!(response.status().is_redirection());
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("http://127.0.0.1:9/oauth/authorize?client_id=client-123"));
    assert!(location.contains("response_type=code"));
}

#[tokio::test]
async fn callback_without_code_is_bad_request() {
    let h = harness();
    let (status, body) = send_json(&h.router, get("/auth/instagram/callback")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Authorization code not received");
}

#[tokio::test]
async fn callback_surfaces_provider_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/oauth/access_token")
        .with_status(400)
        .with_body(r#"{"error_type":"OAuthException","code":400,"error_message":"Invalid platform app"}"#)
        .create_async()
        .await;

    let h = harness_with(config(&[]), &server.url(), false, RecordingMailer::default());
    let (status, body) = send_json(&h.router, get("/auth/instagram/callback?code=abc")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to authenticate with Instagram");
    assert_eq!(body["error"], "Invalid platform app");
}

#[tokio::test]
async fn callback_returns_long_lived_token() {
    let mut server = mockito::Server::new_async().await;
    let _code = server
        .mock("POST", "/oauth/access_token")
        .with_status(200)
        .with_body(r#"{"access_token":"short","user_id":1}"#)
        .create_async()
        .await;
    let _exchange = server
        .mock("GET", "/access_token")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#"{"access_token":"long","token_type":"bearer","expires_in":5183944}"#)
        .create_async()
        .await;

    let h = harness_with(config(&[]), &server.url(), false, RecordingMailer::default());
    let (status, body) = send_json(&h.router, get("/auth/instagram/callback?code=abc")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["token"], "long");
    assert_eq!(body["expires_in"], 5183944);
}

#[tokio::test]
async fn refresh_uses_configured_token() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/refresh_access_token")
        .match_query(mockito::Matcher::UrlEncoded("access_token".into(), "long-lived".into()))
        .with_status(200)
        .with_body(r#"{"access_token":"renewed","token_type":"bearer","expires_in":5184000}"#)
        .create_async()
        .await;

    let h = harness_with(
        config(&[("INSTAGRAM_ACCESS_TOKEN", "long-lived")]),
        &server.url(),
        false,
        RecordingMailer::default(),
    );
    let (status, body) = send_json(&h.router, get("/auth/instagram/refresh_token")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token"], "renewed");
    mock.assert_async().await;
}

#[tokio::test]
async fn refresh_without_configured_token_is_config_error() {
    let h = harness_with(config(&[]), "http://127.0.0.1:9", false, RecordingMailer::default());
    let (status, body) = send_json(&h.router, get("/auth/instagram/refresh_token")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Instagram access token not configured");
}

#[tokio::test]
async fn webhook_handshake_echoes_challenge_only_for_valid_token() {
    let h = harness();

    let (status, body) = send(
        &h.router,
        get("/auth/webhook?hub.mode=subscribe&hub.verify_token=verify-me&hub.challenge=1158201444"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"1158201444");

    let (status, _) = send(
        &h.router,
        get("/auth/webhook?hub.mode=subscribe&hub.verify_token=wrong&hub.challenge=1"),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&h.router, get("/auth/webhook")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn webhook_events_are_acknowledged() {
    let h = harness();
    let (status, body) = send(
        &h.router,
        post_json("/auth/webhook", json!({ "object": "instagram", "entry": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"EVENT_RECEIVED");
}
