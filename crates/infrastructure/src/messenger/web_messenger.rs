//! 网页端消息通道会话适配器
//!
//! 通过 WebDriver 驱动网页版即时通讯客户端：登录码探测、预填消息的
//! 会话视图、输入框探测（主选择器 + 回退选择器）、回车提交。

use application::{MessengerSession, SessionError};
use async_trait::async_trait;
use tracing::debug;

use super::client::{Locator, WebDriverClient};

/// 登录界面上待扫描的登录码标志
const LOGIN_CODE_SELECTOR: &str = "canvas[aria-label='Scan me!']";
/// 输入框主选择器
const COMPOSE_SELECTOR: &str = "//div[@contenteditable='true'][@data-tab='10']";
/// 输入框回退选择器，界面改版后主选择器可能失效
const COMPOSE_FALLBACK_SELECTOR: &str = "//div[@contenteditable='true']";
/// WebDriver 回车键码
const ENTER_KEY: &str = "\u{E007}";

#[derive(Debug, Clone)]
pub struct WebMessengerConfig {
    /// WebDriver 服务端地址
    pub webdriver_url: String,
    /// 持久化浏览器配置目录，登录状态跨运行保留
    pub profile_dir: String,
    /// 通道首页，打开后等待登录
    pub home_url: String,
    /// 预填发送视图的基础地址
    pub send_url: String,
}

impl Default for WebMessengerConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            profile_dir: "SenderProfile".to_string(),
            home_url: "https://web.whatsapp.com/".to_string(),
            send_url: "https://web.whatsapp.com/send".to_string(),
        }
    }
}

/// 基于 WebDriver 的消息通道会话
pub struct WebMessenger {
    client: WebDriverClient,
    config: WebMessengerConfig,
    compose_element: Option<String>,
}

impl WebMessenger {
    /// 打开会话：建立浏览器会话并导航到通道首页。
    /// 之后由投递引擎轮询 `login_pending` 等操作员完成扫码。
    pub async fn open(config: WebMessengerConfig) -> Result<Self, SessionError> {
        let client = WebDriverClient::connect(&config.webdriver_url, &config.profile_dir).await?;
        client.navigate(&config.home_url).await?;
        Ok(Self {
            client,
            config,
            compose_element: None,
        })
    }
}

#[async_trait]
impl MessengerSession for WebMessenger {
    async fn login_pending(&mut self) -> Result<bool, SessionError> {
        let marker = self
            .client
            .find_element(Locator::Css, LOGIN_CODE_SELECTOR)
            .await?;
        Ok(marker.is_some())
    }

    async fn open_conversation(&mut self, phone: &str, message: &str) -> Result<(), SessionError> {
        self.compose_element = None;
        let url = reqwest::Url::parse_with_params(
            &self.config.send_url,
            &[("phone", phone), ("text", message)],
        )
        .map_err(|e| SessionError::Protocol(format!("invalid send url: {}", e)))?;
        debug!(phone, "opening conversation view");
        self.client.navigate(url.as_str()).await
    }

    async fn compose_ready(&mut self) -> Result<bool, SessionError> {
        let element = match self
            .client
            .find_element(Locator::XPath, COMPOSE_SELECTOR)
            .await?
        {
            Some(id) => Some(id),
            None => {
                self.client
                    .find_element(Locator::XPath, COMPOSE_FALLBACK_SELECTOR)
                    .await?
            }
        };
        self.compose_element = element;
        Ok(self.compose_element.is_some())
    }

    async fn send(&mut self) -> Result<(), SessionError> {
        let element = self
            .compose_element
            .as_deref()
            .ok_or_else(|| SessionError::Protocol("compose surface not located".to_string()))?;
        self.client.click(element).await?;
        self.client.send_keys(element, ENTER_KEY).await
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        self.client.delete_session().await
    }
}
