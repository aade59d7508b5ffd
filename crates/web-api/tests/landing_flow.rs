//! 落地/捕获端到端流程测试
//!
//! 用内存事件存储直接驱动路由，不起真实服务器。

use std::sync::Arc;

use application::{
    EngagementService, EngagementServiceDependencies, MemoryAuditLog, MemoryTrackingStore,
    SystemClock,
};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use domain::{EngagementKind, TokenCodec};
use tower::ServiceExt;
use web_api::{router, AppState};

const KEY: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

struct Harness {
    app: Router,
    codec: Arc<TokenCodec>,
    store: MemoryTrackingStore,
    audit: MemoryAuditLog,
}

fn harness() -> Harness {
    let codec = Arc::new(TokenCodec::new(KEY).unwrap());
    let store = MemoryTrackingStore::new();
    let audit = MemoryAuditLog::new();
    let engagement = Arc::new(EngagementService::new(EngagementServiceDependencies {
        store: Arc::new(store.clone()),
        audit: Arc::new(audit.clone()),
        clock: Arc::new(SystemClock),
    }));
    let app = router(AppState::new(codec.clone(), engagement));
    Harness {
        app,
        codec,
        store,
        audit,
    }
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8_lossy(&body).into_owned())
}

async fn post_form(app: &Router, uri: &str, form: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .header(header::USER_AGENT, "UnitTest/1.0")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8_lossy(&body).into_owned())
}

#[tokio::test]
async fn valid_token_records_opened_and_renders_capture_form() {
    let h = harness();
    let token = h.codec.encode(42, 7).unwrap();

    let (status, body) = get(&h.app, &format!("/redirect?data={}", token)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"name="user_id" value="42""#));
    assert!(body.contains(r#"name="campaign_id" value="7""#));
    assert!(body.contains(r#"action="/login""#));

    let events = h.store.snapshot().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].recipient_id, 42);
    assert_eq!(events[0].campaign_id, 7);
    assert_eq!(events[0].kind, EngagementKind::Opened);
    assert!(events[0].submission.is_none());
}

#[tokio::test]
async fn repeated_opens_append_one_event_each() {
    let h = harness();
    let token = h.codec.encode(42, 7).unwrap();

    for _ in 0..3 {
        let (status, _) = get(&h.app, &format!("/redirect?data={}", token)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let events = h.store.snapshot().await;
    assert_eq!(events.len(), 3);
    assert!(events
        .iter()
        .all(|e| e.recipient_id == 42 && e.campaign_id == 7 && e.kind == EngagementKind::Opened));
}

#[tokio::test]
async fn malformed_token_is_rejected_without_writing_events() {
    let h = harness();

    let (status, body) = get(&h.app, "/redirect?data=not-a-real-token").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    // 笼统拒绝，不回显内部细节
    assert!(body.contains("Invalid or expired link"));
    assert!(!body.to_lowercase().contains("decode"));
    assert!(h.store.snapshot().await.is_empty());
    // 细节进了内部审计日志
    let entries = h.audit.entries().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, "landing");
}

#[tokio::test]
async fn tampered_token_is_rejected() {
    let h = harness();
    let token = h.codec.encode(42, 7).unwrap();
    let mut tampered = token.into_bytes();
    let last = tampered.len() - 1;
    tampered[last] = if tampered[last] == b'A' { b'B' } else { b'A' };
    let tampered = String::from_utf8(tampered).unwrap();

    let (status, _) = get(&h.app, &format!("/redirect?data={}", tampered)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(h.store.snapshot().await.is_empty());
}

#[tokio::test]
async fn missing_token_is_rejected() {
    let h = harness();
    let (status, _) = get(&h.app, "/redirect").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(h.store.snapshot().await.is_empty());
}

#[tokio::test]
async fn submission_records_compromised_with_request_context() {
    let h = harness();

    let (status, body) = post_form(
        &h.app,
        "/login",
        "user_id=42&campaign_id=7&submitted_email=a%40b.com&submitted_pass=x",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("phishing simulation"));

    let events = h.store.snapshot().await;
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.recipient_id, 42);
    assert_eq!(event.campaign_id, 7);
    assert_eq!(event.kind, EngagementKind::Compromised);
    let submission = event.submission.as_ref().unwrap();
    assert_eq!(submission.submitted_email, "a@b.com");
    assert_eq!(submission.submitted_pass, "x");
    assert_eq!(submission.user_agent, "UnitTest/1.0");
}

#[tokio::test]
async fn submission_with_unusable_identifiers_still_teaches() {
    let h = harness();

    let (status, body) = post_form(
        &h.app,
        "/login",
        "user_id=abc&campaign_id=&submitted_email=a%40b.com",
    )
    .await;

    // 教育页照常渲染，但不落下伪造的事件
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("phishing simulation"));
    assert!(h.store.snapshot().await.is_empty());
}

#[tokio::test]
async fn full_engagement_scenario_open_then_submit() {
    let h = harness();
    let token = h.codec.encode(42, 7).unwrap();

    let (status, body) = get(&h.app, &format!("/redirect?data={}", token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"value="42""#));

    let (status, body) = post_form(
        &h.app,
        "/login",
        "user_id=42&campaign_id=7&submitted_email=a%40b.com&submitted_pass=x",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("phishing simulation"));

    let events = h.store.snapshot().await;
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, EngagementKind::Opened);
    assert_eq!(events[1].kind, EngagementKind::Compromised);
    assert!(events
        .iter()
        .all(|e| e.recipient_id == 42 && e.campaign_id == 7));
    assert_eq!(
        events[1].submission.as_ref().unwrap().submitted_email,
        "a@b.com"
    );
}

#[tokio::test]
async fn health_endpoint_answers() {
    let h = harness();
    let (status, body) = get(&h.app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("running"));
}
