//! 精简的 WebDriver 协议客户端
//!
//! 只覆盖驱动消息通道会话所需的那几个端点：建会话（持久化浏览器配置）、
//! 导航、查元素、按键输入、关会话。走 W3C JSON 协议。

use application::SessionError;
use serde_json::{json, Value};

/// 元素定位策略
#[derive(Debug, Clone, Copy)]
pub enum Locator {
    Css,
    XPath,
}

impl Locator {
    fn strategy(&self) -> &'static str {
        match self {
            Locator::Css => "css selector",
            Locator::XPath => "xpath",
        }
    }
}

const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

pub struct WebDriverClient {
    http: reqwest::Client,
    base_url: String,
    session_id: String,
}

impl WebDriverClient {
    /// 建立一个新的浏览器会话。
    ///
    /// `profile_dir` 作为持久化的用户数据目录传给浏览器，
    /// 这样带外登录只需要在第一次运行时完成一次。
    pub async fn connect(base_url: &str, profile_dir: &str) -> Result<Self, SessionError> {
        let http = reqwest::Client::new();
        let base_url = base_url.trim_end_matches('/').to_string();
        let body = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": {
                        "args": [
                            format!("--user-data-dir={}", profile_dir),
                            "--profile-directory=Default",
                            "--disable-extensions",
                            "--start-maximized",
                            "--lang=en",
                        ]
                    }
                }
            }
        });

        let value = post_json(&http, &format!("{}/session", base_url), &body).await?;
        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| SessionError::Protocol("missing sessionId in response".to_string()))?
            .to_string();

        Ok(Self {
            http,
            base_url,
            session_id,
        })
    }

    pub async fn navigate(&self, url: &str) -> Result<(), SessionError> {
        let endpoint = format!("{}/session/{}/url", self.base_url, self.session_id);
        post_json(&self.http, &endpoint, &json!({ "url": url })).await?;
        Ok(())
    }

    /// 查找单个元素。找不到返回 Ok(None)，其它协议错误才是 Err。
    pub async fn find_element(
        &self,
        locator: Locator,
        selector: &str,
    ) -> Result<Option<String>, SessionError> {
        let endpoint = format!("{}/session/{}/element", self.base_url, self.session_id);
        let body = json!({ "using": locator.strategy(), "value": selector });

        let response = self
            .http
            .post(&endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| SessionError::Transport(e.to_string()))?;

        let status = response.status();
        let payload: Value = response
            .json()
            .await
            .map_err(|e| SessionError::Transport(e.to_string()))?;
        let value = payload.get("value").cloned().unwrap_or(Value::Null);

        if status.is_success() {
            let element_id = value
                .get(ELEMENT_KEY)
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    SessionError::Protocol("element response missing element id".to_string())
                })?
                .to_string();
            return Ok(Some(element_id));
        }

        match value.get("error").and_then(Value::as_str) {
            Some("no such element") => Ok(None),
            Some(other) => Err(SessionError::Protocol(format!(
                "find element failed: {}",
                other
            ))),
            None => Err(SessionError::Protocol(format!(
                "find element failed with status {}",
                status
            ))),
        }
    }

    /// 向元素发送按键序列
    pub async fn send_keys(&self, element_id: &str, text: &str) -> Result<(), SessionError> {
        let endpoint = format!(
            "{}/session/{}/element/{}/value",
            self.base_url, self.session_id, element_id
        );
        post_json(&self.http, &endpoint, &json!({ "text": text })).await?;
        Ok(())
    }

    pub async fn click(&self, element_id: &str) -> Result<(), SessionError> {
        let endpoint = format!(
            "{}/session/{}/element/{}/click",
            self.base_url, self.session_id, element_id
        );
        post_json(&self.http, &endpoint, &json!({})).await?;
        Ok(())
    }

    pub async fn delete_session(&self) -> Result<(), SessionError> {
        let endpoint = format!("{}/session/{}", self.base_url, self.session_id);
        self.http
            .delete(&endpoint)
            .send()
            .await
            .map_err(|e| SessionError::Transport(e.to_string()))?;
        Ok(())
    }
}

/// POST 一个 JSON 请求，返回响应的 `value` 字段；非 2xx 映射为协议错误。
async fn post_json(
    http: &reqwest::Client,
    endpoint: &str,
    body: &Value,
) -> Result<Value, SessionError> {
    let response = http
        .post(endpoint)
        .json(body)
        .send()
        .await
        .map_err(|e| SessionError::Transport(e.to_string()))?;

    let status = response.status();
    let payload: Value = response
        .json()
        .await
        .map_err(|e| SessionError::Transport(e.to_string()))?;
    let value = payload.get("value").cloned().unwrap_or(Value::Null);

    if !status.is_success() {
        let detail = value
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(SessionError::Protocol(format!(
            "webdriver request failed ({}): {}",
            status, detail
        )));
    }
    Ok(value)
}
