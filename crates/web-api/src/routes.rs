use std::net::SocketAddr;

use axum::{
    extract::{rejection::FormRejection, ConnectInfo, Query, State},
    http::{header, request::Parts},
    response::Html,
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::warn;

use domain::SubmissionRecord;

use crate::{error::ApiError, state::AppState, templates};

#[derive(Debug, Deserialize)]
struct LandingQuery {
    #[serde(default)]
    data: String,
}

/// 捕获页表单。所有字段都有默认值：无论提交什么都要完成教育闭环，
/// 绝不因为缺字段把接收人挡在 4xx 上。
#[derive(Debug, Default, Deserialize)]
struct CaptureForm {
    #[serde(default)]
    user_id: String,
    #[serde(default)]
    campaign_id: String,
    #[serde(default)]
    submitted_email: String,
    #[serde(default)]
    submitted_pass: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/redirect", get(resolve_landing))
        .route("/login", post(capture_submission))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn home() -> &'static str {
    "Awareness server is running!"
}

/// 落地解析：解码令牌，记录打开事件，渲染捕获页。
/// 任何解码失败都以同一句笼统文案拒绝，细节只进内部日志。
async fn resolve_landing(
    State(state): State<AppState>,
    Query(query): Query<LandingQuery>,
) -> Result<Html<String>, ApiError> {
    let (recipient_id, campaign_id) = match state.codec.decode(&query.data) {
        Ok(pair) => pair,
        Err(err) => {
            state
                .engagement
                .report_decode_failure(&format!("{}: {:?}", err, truncate(&query.data)))
                .await;
            return Err(ApiError::bad_request(
                "Invalid or expired link. Please contact your IT/security team.",
            ));
        }
    };

    // 重复打开各记一条；写入失败不挡住页面渲染
    if let Err(err) = state
        .engagement
        .record_opened(recipient_id, campaign_id)
        .await
    {
        warn!(error = %err, recipient_id, campaign_id, "opened event not recorded");
    }

    Ok(Html(templates::login_page(recipient_id, campaign_id)))
}

/// 凭据捕获：记录提交事件并渲染教育页。
/// 从调用方视角永远成功，无论提交内容如何都渲染教育页。
async fn capture_submission(
    State(state): State<AppState>,
    parts: Parts,
    form: Result<Form<CaptureForm>, FormRejection>,
) -> Html<String> {
    let form = form.map(|Form(inner)| inner).unwrap_or_default();
    let user_agent = parts
        .headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("Unknown")
        .to_string();
    let ip_address = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    match (
        form.user_id.trim().parse::<i64>(),
        form.campaign_id.trim().parse::<i64>(),
    ) {
        (Ok(recipient_id), Ok(campaign_id)) => {
            let submission = SubmissionRecord {
                submitted_email: form.submitted_email,
                submitted_pass: form.submitted_pass,
                user_agent,
                ip_address,
            };
            if let Err(err) = state
                .engagement
                .record_compromised(recipient_id, campaign_id, submission)
                .await
            {
                warn!(error = %err, recipient_id, campaign_id, "compromised event not recorded");
            }
        }
        _ => {
            warn!(
                user_id = %form.user_id,
                campaign_id = %form.campaign_id,
                "capture submission with non-numeric identifiers, skipping record"
            );
        }
    }

    Html(templates::awareness_page())
}

fn truncate(token: &str) -> &str {
    let cut = token
        .char_indices()
        .nth(32)
        .map(|(i, _)| i)
        .unwrap_or(token.len());
    &token[..cut]
}
